use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod flat;
pub mod widget;

pub use flat::FlatRecord;
pub use widget::WidgetRecord;

/// Upstream response layout the service is configured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Schema {
    /// ip-api.com style: one flat object, fields chosen through a `fields` query parameter.
    #[default]
    Flat,
    /// ipinfo.io widget style: nested asn/company/privacy/abuse/domains objects.
    Widget,
}

impl Schema {
    pub fn as_str(&self) -> &'static str {
        match self {
            Schema::Flat => "flat",
            Schema::Widget => "widget",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            Schema::Flat => flat::DEFAULT_BASE_URL,
            Schema::Widget => widget::DEFAULT_BASE_URL,
        }
    }

    /// Field selector sent upstream, if the API takes one.
    pub fn default_fields(&self) -> Option<&'static str> {
        match self {
            Schema::Flat => Some(flat::DEFAULT_FIELDS),
            Schema::Widget => None,
        }
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Schema {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "flat" => Ok(Schema::Flat),
            "widget" => Ok(Schema::Widget),
            other => Err(format!("unknown upstream schema '{}'", other)),
        }
    }
}

/// A parsed upstream response in whichever schema was configured.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Record {
    Flat(FlatRecord),
    Widget(WidgetRecord),
}

impl Record {
    /// Structural parse only: unknown keys are ignored, missing keys default,
    /// mistyped values are an error.
    pub fn parse(schema: Schema, bytes: &[u8]) -> serde_json::Result<Self> {
        Ok(match schema {
            Schema::Flat => Record::Flat(serde_json::from_slice(bytes)?),
            Schema::Widget => Record::Widget(serde_json::from_slice(bytes)?),
        })
    }

    pub fn schema(&self) -> Schema {
        match self {
            Record::Flat(_) => Schema::Flat,
            Record::Widget(_) => Schema::Widget,
        }
    }

    /// The address the record describes.
    pub fn ip(&self) -> &str {
        match self {
            Record::Flat(r) => &r.query,
            Record::Widget(r) => &r.ip,
        }
    }

    /// Upstream message when the API answered 200 but flagged the lookup as failed.
    pub fn soft_failure(&self) -> Option<&str> {
        match self {
            Record::Flat(r) if r.status.eq_ignore_ascii_case("fail") => Some(&r.message),
            _ => None,
        }
    }

    pub fn sections(&self) -> Vec<Section> {
        match self {
            Record::Flat(r) => r.sections(),
            Record::Widget(r) => r.sections(),
        }
    }
}

/// A titled group of fields, rendered as one accordion item.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub id: &'static str,
    pub title: &'static str,
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub label: &'static str,
    pub value: String,
}

impl Field {
    pub fn new(label: &'static str, value: impl ToString) -> Self {
        Self {
            label,
            value: value.to_string(),
        }
    }
}

// JSON null on any field falls back to its zero value.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
