use chrono::{DateTime, Local, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use super::ReadingContext;

/// A glucose reading as stored by the server.
///
/// `id` is assigned remotely and is the only identity the store uses.
/// `context` stays a plain string here: the server is free to return
/// contexts this client does not know about.
///
/// Decoding is lenient about everything but the id: a fractional `value`
/// is rounded, and a missing `context` or `takenAt` reads as empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlucoseLog {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(deserialize_with = "deserialize_value")]
    pub value: i32,
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub taken_at: String,
}

/// Why a create response could not be turned into a [`GlucoseLog`].
#[derive(Debug, Clone, PartialEq)]
pub enum CreatedLogError {
    /// The body has no usable `id` field.
    MissingId,
    /// The body has an id but the remaining fields do not parse.
    Malformed(String),
}

impl GlucoseLog {
    pub fn new(
        id: impl Into<String>,
        value: i32,
        context: impl Into<String>,
        taken_at: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            value,
            context: context.into(),
            taken_at: taken_at.into(),
        }
    }

    /// Validates the body of a create response.
    ///
    /// The only hard requirement is a non-empty `id`; a string or an integer
    /// is accepted.
    pub fn from_created(body: serde_json::Value) -> Result<Self, CreatedLogError> {
        let has_id = match body.get("id") {
            Some(serde_json::Value::String(s)) => !s.is_empty(),
            Some(serde_json::Value::Number(_)) => true,
            _ => false,
        };
        if !has_id {
            return Err(CreatedLogError::MissingId);
        }
        serde_json::from_value(body).map_err(|e| CreatedLogError::Malformed(e.to_string()))
    }

    /// Decodes a list response record by record. Records that cannot be
    /// decoded are logged and left out; the rest keep their order.
    pub fn from_list(records: Vec<serde_json::Value>) -> Vec<Self> {
        let total = records.len();
        let logs: Vec<Self> = records
            .into_iter()
            .enumerate()
            .filter_map(|(i, record)| match serde_json::from_value(record) {
                Ok(log) => Some(log),
                Err(e) => {
                    tracing::warn!("Skipping glucose log #{} in list response: {}", i, e);
                    None
                }
            })
            .collect();
        if logs.len() < total {
            tracing::warn!("Kept {} of {} glucose logs", logs.len(), total);
        }
        logs
    }

    /// Parses `taken_at`, if it is a valid RFC 3339 timestamp.
    pub fn taken_at_time(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.taken_at)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// List row text: `168 mg/dL  fasting 8:05 AM, 1 Jan`.
    pub fn summary(&self) -> String {
        let when = match self.taken_at_time() {
            Some(t) => {
                let local = t.with_timezone(&Local);
                format!("{}, {}", local.format("%-I:%M %p"), local.format("%-d %b"))
            }
            None => self.taken_at.clone(),
        };
        format!("{} mg/dL  {} {}", self.value, self.context, when)
    }
}

impl fmt::Display for GlucoseLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Glucose Log: {}", self.id)?;
        writeln!(f, "{}", "=".repeat(30))?;
        writeln!(f, "Value:    {} mg/dL", self.value)?;
        writeln!(f, "Context:  {}", self.context)?;
        write!(f, "Taken at: {}", self.taken_at)
    }
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    match RawId::deserialize(deserializer)? {
        RawId::Text(s) => Ok(s),
        RawId::Number(n) => Ok(n.to_string()),
    }
}

/// Whole or fractional numbers; fractions are rounded to the nearest integer.
fn deserialize_value<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    let rounded = raw.round();
    if !rounded.is_finite() || rounded < i32::MIN as f64 || rounded > i32::MAX as f64 {
        return Err(serde::de::Error::custom(format!(
            "glucose value {} out of range",
            raw
        )));
    }
    Ok(rounded as i32)
}

/// Body of `POST /glucose`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGlucoseLog {
    pub value: i32,
    pub context: ReadingContext,
    #[serde(serialize_with = "serialize_iso")]
    pub taken_at: DateTime<Utc>,
}

impl NewGlucoseLog {
    pub fn new(value: i32, context: ReadingContext, taken_at: DateTime<Utc>) -> Self {
        Self {
            value,
            context,
            taken_at,
        }
    }
}

/// Millisecond precision with a `Z` suffix, e.g. `2025-01-01T08:00:00.000Z`.
pub fn to_iso_string(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn serialize_iso<S>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&to_iso_string(dt))
}
