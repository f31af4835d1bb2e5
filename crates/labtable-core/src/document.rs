//! Settings document exchanged with the backend
//!
//! Wire shape:
//! ```json
//! { "<id>_port": "...", "last_tid": 3, "data": [ { "testid": "3", "run(y/n)": "y" } ] }
//! ```
//!
//! Loading is lenient: `last_tid` may be a number or a numeric string, record
//! values are stringified, and `data` may be an array or an object keyed by
//! row id (the daily log format). Top-level keys this crate does not own are
//! kept in [`SettingsDocument::extra`] and written back unchanged.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::row::RowId;

/// The whole table at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsDocument {
    /// Last test id handed out; missing means 0
    #[serde(default, deserialize_with = "de_last_tid")]
    pub last_tid: RowId,

    #[serde(default, deserialize_with = "de_records")]
    pub data: Vec<RowRecord>,

    /// Port fields and any backend-owned keys (`mac`, `loop_delay`...)
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl SettingsDocument {
    /// Parse a document from JSON text.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to pretty JSON, as written by the file store.
    pub fn to_json_pretty(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Port fields: top-level keys ending in `suffix`, values stringified.
    pub fn ports(&self, suffix: &str) -> Vec<(String, String)> {
        self.extra
            .iter()
            .filter(|(key, _)| key.ends_with(suffix))
            .map(|(key, value)| (key.clone(), stringify(value)))
            .collect()
    }

    pub fn set_port(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.extra.insert(key.into(), Value::String(value.into()));
    }
}

/// One persisted row: field key → cell text, in column order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowRecord(Vec<(String, String)>);

impl RowRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field, replacing an existing one with the same key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key, value)),
        }
    }

    /// Case-insensitive lookup.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RowRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = RowRecord::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

impl Serialize for RowRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for RowRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(RowRecordVisitor)
    }
}

/// Keeps fields in arrival order.
struct RowRecordVisitor;

impl<'de> Visitor<'de> for RowRecordVisitor {
    type Value = RowRecord;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a row record object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<RowRecord, A::Error> {
        let mut record = RowRecord::new();
        while let Some((key, value)) = access.next_entry::<String, Value>()? {
            record.insert(key, stringify(&value));
        }
        Ok(record)
    }
}

/// Response body of a save: `{"status": "..."}`.
///
/// The backend echoes the whole document back; everything but `status` is
/// ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveStatus {
    #[serde(default)]
    pub status: String,
}

impl SaveStatus {
    /// Status text the backend returns for a successful save.
    pub const SUCCESS: &'static str = "success!";

    pub fn success() -> Self {
        Self {
            status: Self::SUCCESS.to_string(),
        }
    }
}

/// Render a JSON value as cell text. `null` becomes empty.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Read a test counter leniently.
///
/// Numbers and strings with leading digits are accepted (`"12abc"` → 12);
/// anything else is 0.
pub fn parse_counter(value: &Value) -> RowId {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as RowId))
            .unwrap_or(0),
        Value::String(s) => {
            let digits: String = s
                .trim_start()
                .chars()
                .take_while(|c| c.is_ascii_digit())
                .collect();
            digits.parse().unwrap_or(0)
        }
        _ => 0,
    }
}

fn de_last_tid<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<RowId, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(parse_counter(&value))
}

fn de_records<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Vec<RowRecord>, D::Error> {
    deserializer.deserialize_any(RecordsVisitor)
}

/// `data` as an array of records, or an object keyed by row id (daily logs).
struct RecordsVisitor;

impl RecordsVisitor {
    fn unexpected(shape: impl fmt::Display) -> Vec<RowRecord> {
        tracing::warn!("Ignoring settings data of unexpected shape: {}", shape);
        Vec::new()
    }
}

impl<'de> Visitor<'de> for RecordsVisitor {
    type Value = Vec<RowRecord>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an array or object of row records")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut access: A) -> std::result::Result<Self::Value, A::Error> {
        let mut records = Vec::new();
        while let Some(LenientRecord(record)) = access.next_element::<LenientRecord>()? {
            records.extend(record);
        }
        Ok(records)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<Self::Value, A::Error> {
        let mut records = Vec::new();
        while let Some((_, LenientRecord(record))) =
            access.next_entry::<IgnoredAny, LenientRecord>()?
        {
            records.extend(record);
        }
        Ok(records)
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<Self::Value, E> {
        Ok(Vec::new())
    }

    fn visit_none<E: de::Error>(self) -> std::result::Result<Self::Value, E> {
        Ok(Vec::new())
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<Self::Value, E> {
        Ok(Self::unexpected(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Self::Value, E> {
        Ok(Self::unexpected(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Self::Value, E> {
        Ok(Self::unexpected(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Self::Value, E> {
        Ok(Self::unexpected(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Self::Value, E> {
        Ok(Self::unexpected(v))
    }
}

/// One slot of `data`; anything but an object is skipped.
struct LenientRecord(Option<RowRecord>);

impl<'de> Deserialize<'de> for LenientRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(LenientRecordVisitor)
    }
}

struct LenientRecordVisitor;

impl LenientRecordVisitor {
    fn skipped(entry: impl fmt::Display) -> LenientRecord {
        tracing::warn!("Skipping malformed row record: {}", entry);
        LenientRecord(None)
    }
}

impl<'de> Visitor<'de> for LenientRecordVisitor {
    type Value = LenientRecord;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a row record")
    }

    fn visit_map<A: MapAccess<'de>>(self, access: A) -> std::result::Result<Self::Value, A::Error> {
        RowRecordVisitor.visit_map(access).map(|record| LenientRecord(Some(record)))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut access: A) -> std::result::Result<Self::Value, A::Error> {
        while access.next_element::<IgnoredAny>()?.is_some() {}
        Ok(Self::skipped("array"))
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<Self::Value, E> {
        Ok(Self::skipped("null"))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<Self::Value, E> {
        Ok(Self::skipped(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Self::Value, E> {
        Ok(Self::skipped(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Self::Value, E> {
        Ok(Self::skipped(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Self::Value, E> {
        Ok(Self::skipped(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Self::Value, E> {
        Ok(Self::skipped(v))
    }
}
