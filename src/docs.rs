//! Markdown documentation generated from schemas.
//!
//! Pages follow the layout the Terraform registry renders: a title, the
//! resource description, then Required, Optional and Read-Only attribute
//! lists, followed by one section per nested block.

use std::fmt::Write;

use crate::schema::{Attribute, Block, NestedBlock, Schema};

/// How descriptions are written into the generated page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DescriptionKind {
    /// Descriptions are literal text; Markdown metacharacters are escaped.
    Plain,
    /// Descriptions are Markdown and pass through untouched.
    #[default]
    Markdown,
}

/// Options for [`render_schema_docs`].
#[derive(Debug, Clone, Default)]
pub struct DocsOptions {
    /// How to treat descriptions.
    pub description_kind: DescriptionKind,
    /// Subtitle shown after the name, such as `Resource` or `Data Source`.
    pub subcategory: Option<String>,
}

impl DocsOptions {
    /// Options with the given description kind.
    pub fn new(description_kind: DescriptionKind) -> Self {
        Self {
            description_kind,
            subcategory: None,
        }
    }

    /// Set the subtitle shown after the name.
    pub fn with_subcategory(mut self, subcategory: impl Into<String>) -> Self {
        self.subcategory = Some(subcategory.into());
        self
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Section {
    Required,
    Optional,
    ReadOnly,
}

impl Section {
    const ALL: [Section; 3] = [Section::Required, Section::Optional, Section::ReadOnly];

    fn heading(self) -> &'static str {
        match self {
            Section::Required => "Required",
            Section::Optional => "Optional",
            Section::ReadOnly => "Read-Only",
        }
    }
}

fn attribute_section(attr: &Attribute) -> Section {
    if attr.flags.required {
        Section::Required
    } else if attr.flags.optional {
        Section::Optional
    } else {
        Section::ReadOnly
    }
}

fn block_section(nested: &NestedBlock) -> Section {
    let read_only = nested
        .block
        .attributes
        .values()
        .all(|attr| attr.flags.is_read_only());
    if nested.min_items > 0 {
        Section::Required
    } else if read_only && nested.computed {
        Section::ReadOnly
    } else {
        Section::Optional
    }
}

/// Render a Markdown page for the resource or data source `name`.
pub fn render_schema_docs(name: &str, schema: &Schema, options: &DocsOptions) -> String {
    let mut out = String::new();
    match &options.subcategory {
        Some(subcategory) => {
            let _ = writeln!(out, "# {} ({})", name, subcategory);
        },
        None => {
            let _ = writeln!(out, "# {}", name);
        },
    }
    out.push('\n');

    if let Some(description) = &schema.block.description {
        out.push_str(&describe(description, options.description_kind));
        out.push_str("\n\n");
    }

    out.push_str("## Schema\n");
    render_block(&mut out, &schema.block, "", options.description_kind);
    out
}

fn render_block(out: &mut String, block: &Block, prefix: &str, kind: DescriptionKind) {
    for section in Section::ALL {
        let mut lines = Vec::new();

        for (name, attr) in &block.attributes {
            if attribute_section(attr) != section {
                continue;
            }
            let mut line = format!("- `{}` ({})", name, type_label(attr));
            if let Some(description) = &attr.description {
                line.push(' ');
                line.push_str(&describe(description, kind));
            }
            if let Some(default) = &attr.default {
                let _ = write!(line, " Defaults to `{}`.", default);
            }
            if !attr.allowed_values.is_empty() {
                let _ = write!(line, " Must be one of: `{}`.", attr.allowed_values.join("`, `"));
            }
            lines.push(line);
        }

        for (name, nested) in &block.blocks {
            if block_section(nested) != section {
                continue;
            }
            let anchor = anchor(prefix, name);
            let mut line = format!(
                "- `{}` ({}) (see [below for nested schema](#{}))",
                name,
                block_label(nested),
                anchor
            );
            if let Some(description) = &nested.block.description {
                line.push(' ');
                line.push_str(&describe(description, kind));
            }
            lines.push(line);
        }

        if lines.is_empty() {
            continue;
        }
        let _ = writeln!(out, "\n### {}\n", section.heading());
        for line in lines {
            out.push_str(&line);
            out.push('\n');
        }
    }

    for (name, nested) in &block.blocks {
        let anchor = anchor(prefix, name);
        let path = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{}.{}", prefix, name)
        };
        let _ = writeln!(out, "\n<a id=\"{}\"></a>", anchor);
        let _ = writeln!(out, "### Nested Schema for `{}`", path);
        render_block(out, &nested.block, &path, kind);
    }
}

fn type_label(attr: &Attribute) -> String {
    let base = attr.attr_type.type_name();
    if attr.flags.sensitive {
        format!("{}, Sensitive", base)
    } else {
        base
    }
}

fn block_label(nested: &NestedBlock) -> String {
    match (nested.min_items, nested.max_items) {
        (_, 0) => "Block List".to_string(),
        (_, max) => format!("Block List, Max: {}", max),
    }
}

fn anchor(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        format!("nestedblock--{}", name)
    } else {
        format!("nestedblock--{}--{}", prefix.replace('.', "--"), name)
    }
}

fn describe(description: &str, kind: DescriptionKind) -> String {
    match kind {
        DescriptionKind::Markdown => description.to_string(),
        DescriptionKind::Plain => escape_markdown(description),
    }
}

/// Escape characters Markdown would otherwise interpret.
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(
            c,
            '\\' | '`' | '*' | '_' | '[' | ']' | '<' | '>' | '#' | '|' | '{' | '}'
        ) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
