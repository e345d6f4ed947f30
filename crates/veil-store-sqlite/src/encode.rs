//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. Structured fields (the PII
//! value, reasons, processing requirements, metadata) are stored as compact
//! JSON.

use chrono::{DateTime, SecondsFormat, Utc};
use veil_core::{
  data::{Metadata, RecordedPersonalData},
  value::PiiValue,
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

/// Fixed-width UTC encoding, so SQL string comparison on `disposed_at`
/// agrees with chronological order.
pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── JSON columns ────────────────────────────────────────────────────────────

pub fn encode_value(value: &PiiValue) -> Result<String> {
  Ok(serde_json::to_string(value)?)
}

pub fn encode_string_list(items: &[String]) -> Result<String> {
  Ok(serde_json::to_string(items)?)
}

pub fn encode_metadata(metadata: &Metadata) -> Result<String> {
  Ok(serde_json::to_string(metadata)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `personal_data` row.
pub struct RawRecord {
  pub reference_token:         String,
  pub personal_token:          String,
  pub key_name:                String,
  pub value_json:              String,
  pub source:                  String,
  pub reasons:                 String,
  pub processing_requirements: String,
  pub disposed_at:             Option<String>,
  pub metadata:                String,
  pub recorded_at:             String,
}

impl RawRecord {
  /// Read one row; column order must match the SELECT lists in `store`.
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      reference_token:         row.get(0)?,
      personal_token:          row.get(1)?,
      key_name:                row.get(2)?,
      value_json:              row.get(3)?,
      source:                  row.get(4)?,
      reasons:                 row.get(5)?,
      processing_requirements: row.get(6)?,
      disposed_at:             row.get(7)?,
      metadata:                row.get(8)?,
      recorded_at:             row.get(9)?,
    })
  }

  pub fn into_recorded(self) -> Result<RecordedPersonalData> {
    Ok(RecordedPersonalData {
      reference_token: self.reference_token,
      personal_token: self.personal_token,
      key_name: self.key_name,
      value: serde_json::from_str(&self.value_json)?,
      source: self.source,
      reasons: serde_json::from_str(&self.reasons)?,
      processing_requirements: serde_json::from_str(
        &self.processing_requirements,
      )?,
      disposed_at: self.disposed_at.as_deref().map(decode_dt).transpose()?,
      metadata: serde_json::from_str(&self.metadata)?,
      recorded_at: decode_dt(&self.recorded_at)?,
    })
  }
}
