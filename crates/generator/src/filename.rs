//! Output file naming

use anyhow::{anyhow, Result};
use crd2jsonschema_crd::CrdSchema;

pub const DEFAULT_FILENAME_FORMAT: &str = "{kind}-{group}-{version}";

/// File name template with `{kind}`, `{group}`, `{fullgroup}` and
/// `{version}` placeholders. `{{` and `}}` produce literal braces.
///
/// `{group}` expands to the first dot-delimited segment of the API group,
/// `{fullgroup}` to the whole group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilenameTemplate {
    source: String,
    segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(Field),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Kind,
    Group,
    FullGroup,
    Version,
}

impl Field {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "kind" => Some(Self::Kind),
            "group" => Some(Self::Group),
            "fullgroup" => Some(Self::FullGroup),
            "version" => Some(Self::Version),
            _ => None,
        }
    }

    fn value<'a>(&self, schema: &'a CrdSchema) -> &'a str {
        match self {
            Self::Kind => schema.kind.as_str(),
            Self::Group => schema.short_group(),
            Self::FullGroup => schema.group.as_str(),
            Self::Version => schema.version.as_str(),
        }
    }
}

impl FilenameTemplate {
    pub fn parse(template: &str) -> Result<Self> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = template.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    literal.push('{');
                }
                '{' => {
                    let mut name = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some(c) if c != '{' => name.push(c),
                            _ => {
                                return Err(anyhow!(
                                    "Unbalanced '{{' in filename format '{template}'"
                                ))
                            }
                        }
                    }

                    let field = Field::from_name(&name).ok_or_else(|| {
                        anyhow!(
                            "Unknown placeholder '{{{name}}}' in filename format '{template}' \
                             (expected kind, group, fullgroup or version)"
                        )
                    })?;

                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Placeholder(field));
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    literal.push('}');
                }
                '}' => {
                    return Err(anyhow!(
                        "Single '}}' encountered in filename format '{template}'"
                    ))
                }
                c => literal.push(c),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            source: template.to_string(),
            segments,
        })
    }

    /// Render the file name for a schema: the expanded template, lower-cased,
    /// with a `.json` suffix
    pub fn render(&self, schema: &CrdSchema) -> String {
        let mut name = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => name.push_str(text),
                Segment::Placeholder(field) => name.push_str(field.value(schema)),
            }
        }

        format!("{}.json", name.to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl Default for FilenameTemplate {
    fn default() -> Self {
        Self {
            source: DEFAULT_FILENAME_FORMAT.to_string(),
            segments: vec![
                Segment::Placeholder(Field::Kind),
                Segment::Literal("-".to_string()),
                Segment::Placeholder(Field::Group),
                Segment::Literal("-".to_string()),
                Segment::Placeholder(Field::Version),
            ],
        }
    }
}
