//! Frontmatter split, parse and render.
//!
//! A note may open with a YAML block fenced by `---` lines or a TOML block
//! fenced by `+++` lines. A block that is never closed is treated as body
//! text.

use super::{MetaMap, MetaValue};
use thiserror::Error;

/// Top-level keys written as native TOML datetimes when they parse as one.
const DATE_KEYS: &[&str] = &["date", "updated", "lastmod"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontmatterFormat {
    Yaml,
    Toml,
}

impl FrontmatterFormat {
    pub const fn delimiter(self) -> &'static str {
        match self {
            Self::Yaml => "---",
            Self::Toml => "+++",
        }
    }
}

#[derive(Debug, Error)]
pub enum FrontmatterError {
    #[error("invalid YAML frontmatter: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid TOML frontmatter: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("cannot write TOML frontmatter: {0}")]
    TomlWrite(#[from] toml::ser::Error),

    #[error("frontmatter must be a mapping, found {0}")]
    NotAMapping(&'static str),
}

/// Raw frontmatter block and the body after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Split<'a> {
    pub format: Option<FrontmatterFormat>,
    pub raw: &'a str,
    pub body: &'a str,
}

/// A note's parsed metadata plus its body.
#[derive(Debug, Clone)]
pub struct Document<'a> {
    /// Format found in the source, `None` without frontmatter.
    pub format: Option<FrontmatterFormat>,
    pub meta: MetaMap,
    pub body: &'a str,
}

/// Separate the frontmatter block from the body.
pub fn split(content: &str) -> Split<'_> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let plain = Split {
        format: None,
        raw: "",
        body: content,
    };

    let mut lines = content.split_inclusive('\n');
    let Some(first) = lines.next() else {
        return plain;
    };
    let format = match first.trim_end() {
        "---" => FrontmatterFormat::Yaml,
        "+++" => FrontmatterFormat::Toml,
        _ => return plain,
    };

    let raw_start = first.len();
    let mut offset = raw_start;
    for line in lines {
        if line.trim_end() == format.delimiter() {
            return Split {
                format: Some(format),
                raw: &content[raw_start..offset],
                body: &content[offset + line.len()..],
            };
        }
        offset += line.len();
    }
    plain
}

/// Split and parse a note.
pub fn parse(content: &str) -> Result<Document<'_>, FrontmatterError> {
    let split = split(content);
    let meta = match split.format {
        None => MetaMap::new(),
        Some(FrontmatterFormat::Yaml) => parse_yaml(split.raw)?,
        Some(FrontmatterFormat::Toml) => parse_toml(split.raw)?,
    };
    Ok(Document {
        format: split.format,
        meta,
        body: split.body,
    })
}

/// Serialize `meta` as a frontmatter block followed by `body`.
pub fn render(meta: &MetaMap, body: &str, format: FrontmatterFormat) -> Result<String, FrontmatterError> {
    let header = match format {
        FrontmatterFormat::Yaml if meta.is_empty() => String::new(),
        FrontmatterFormat::Yaml => serde_yaml::to_string(&serde_yaml::Value::Mapping(to_yaml_mapping(meta)))?,
        FrontmatterFormat::Toml => toml::to_string(&to_toml_document(meta))?,
    };

    let delimiter = format.delimiter();
    let body = body.trim_start_matches(['\r', '\n']);
    let mut out = String::with_capacity(header.len() + body.len() + 12);
    out.push_str(delimiter);
    out.push('\n');
    out.push_str(&header);
    if !header.is_empty() && !header.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(delimiter);
    out.push_str("\n\n");
    out.push_str(body);
    Ok(out)
}

// ============================================================================
// YAML
// ============================================================================

fn parse_yaml(raw: &str) -> Result<MetaMap, FrontmatterError> {
    if raw.trim().is_empty() {
        return Ok(MetaMap::new());
    }
    match serde_yaml::from_str(raw)? {
        serde_yaml::Value::Mapping(map) => Ok(from_yaml_mapping(map)),
        serde_yaml::Value::Null => Ok(MetaMap::new()),
        serde_yaml::Value::Sequence(_) => Err(FrontmatterError::NotAMapping("a sequence")),
        _ => Err(FrontmatterError::NotAMapping("a scalar")),
    }
}

fn from_yaml(value: serde_yaml::Value) -> MetaValue {
    use serde_yaml::Value;
    match value {
        Value::Null => MetaValue::Null,
        Value::Bool(b) => MetaValue::Bool(b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => MetaValue::Integer(i),
            None => n.as_f64().map_or(MetaValue::Null, MetaValue::Float),
        },
        Value::String(s) => MetaValue::String(s),
        Value::Sequence(items) => MetaValue::Sequence(items.into_iter().map(from_yaml).collect()),
        Value::Mapping(map) => MetaValue::Mapping(from_yaml_mapping(map)),
        Value::Tagged(tagged) => from_yaml(tagged.value),
    }
}

fn from_yaml_mapping(map: serde_yaml::Mapping) -> MetaMap {
    map.into_iter()
        .filter_map(|(key, value)| {
            let key = match key {
                serde_yaml::Value::String(s) => s,
                serde_yaml::Value::Number(n) => n.to_string(),
                serde_yaml::Value::Bool(b) => b.to_string(),
                _ => return None,
            };
            Some((key, from_yaml(value)))
        })
        .collect()
}

fn to_yaml(value: &MetaValue) -> serde_yaml::Value {
    use serde_yaml::Value;
    match value {
        MetaValue::Null => Value::Null,
        MetaValue::Bool(b) => Value::Bool(*b),
        MetaValue::Integer(i) => Value::Number((*i).into()),
        MetaValue::Float(f) => Value::Number((*f).into()),
        MetaValue::String(s) => Value::String(s.clone()),
        MetaValue::Sequence(items) => Value::Sequence(items.iter().map(to_yaml).collect()),
        MetaValue::Mapping(map) => Value::Mapping(to_yaml_mapping(map)),
    }
}

fn to_yaml_mapping(map: &MetaMap) -> serde_yaml::Mapping {
    let mut out = serde_yaml::Mapping::new();
    for (key, value) in map.iter() {
        out.insert(serde_yaml::Value::String(key.to_string()), to_yaml(value));
    }
    out
}

// ============================================================================
// TOML
// ============================================================================

fn parse_toml(raw: &str) -> Result<MetaMap, FrontmatterError> {
    let table: toml::Table = toml::from_str(raw)?;
    Ok(from_toml_table(table))
}

fn from_toml(value: toml::Value) -> MetaValue {
    use toml::Value;
    match value {
        Value::String(s) => MetaValue::String(s),
        Value::Integer(i) => MetaValue::Integer(i),
        Value::Float(f) => MetaValue::Float(f),
        Value::Boolean(b) => MetaValue::Bool(b),
        Value::Datetime(dt) => MetaValue::String(dt.to_string()),
        Value::Array(items) => MetaValue::Sequence(items.into_iter().map(from_toml).collect()),
        Value::Table(table) => MetaValue::Mapping(from_toml_table(table)),
    }
}

fn from_toml_table(table: toml::Table) -> MetaMap {
    table.into_iter().map(|(k, v)| (k, from_toml(v))).collect()
}

/// TOML has no null: null entries and null array items are dropped.
fn to_toml(value: &MetaValue) -> Option<toml::Value> {
    use toml::Value;
    Some(match value {
        MetaValue::Null => return None,
        MetaValue::Bool(b) => Value::Boolean(*b),
        MetaValue::Integer(i) => Value::Integer(*i),
        MetaValue::Float(f) => Value::Float(*f),
        MetaValue::String(s) => Value::String(s.clone()),
        MetaValue::Sequence(items) => Value::Array(items.iter().filter_map(to_toml).collect()),
        MetaValue::Mapping(map) => Value::Table(to_toml_table(map)),
    })
}

fn to_toml_table(map: &MetaMap) -> toml::Table {
    map.iter()
        .filter_map(|(k, v)| to_toml(v).map(|v| (k.to_string(), v)))
        .collect()
}

fn to_toml_document(map: &MetaMap) -> toml::Table {
    let mut table = to_toml_table(map);
    for key in DATE_KEYS {
        let datetime = table
            .get(*key)
            .and_then(toml::Value::as_str)
            .and_then(|s| s.trim().parse::<toml::value::Datetime>().ok());
        if let Some(datetime) = datetime {
            table.insert((*key).to_string(), toml::Value::Datetime(datetime));
        }
    }
    table
}
