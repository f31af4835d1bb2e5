//! Typed push events streamed by the backend

use serde_json::Value;

use crate::row::RowId;

/// An event received on the push channel.
#[derive(Debug, Clone, PartialEq)]
pub enum PushEvent {
    /// The row now streaming data; `None` when nothing is ("inactive")
    Active(Option<RowId>),

    /// New waveform samples for a row
    Update { rowid: Option<RowId>, amp: Vec<f64> },
}

impl PushEvent {
    /// Build a typed event from an event name and its JSON payload.
    ///
    /// Returns `None` for event names this client does not handle.
    pub fn parse_event(event: &str, payload: &Value) -> Option<Self> {
        match event {
            "active" => Some(PushEvent::Active(
                payload.get("rowid").and_then(parse_row_id),
            )),
            "update" => {
                let rowid = payload.get("rowid").and_then(parse_row_id);
                let amp = payload
                    .get("amp")
                    .and_then(Value::as_array)
                    .map(|samples| {
                        samples
                            .iter()
                            .map(|s| s.as_f64().unwrap_or(f64::NAN))
                            .collect()
                    })
                    .unwrap_or_default();
                Some(PushEvent::Update { rowid, amp })
            }
            _ => None,
        }
    }

    pub fn rowid(&self) -> Option<RowId> {
        match self {
            PushEvent::Active(rowid) => *rowid,
            PushEvent::Update { rowid, .. } => *rowid,
        }
    }

    /// Short description for logs.
    pub fn summary(&self) -> String {
        match self {
            PushEvent::Active(Some(id)) => format!("active row {}", id),
            PushEvent::Active(None) => "no active row".to_string(),
            PushEvent::Update { rowid, amp } => format!(
                "update for row {} ({} samples)",
                rowid.map_or_else(|| "?".to_string(), |id| id.to_string()),
                amp.len()
            ),
        }
    }
}

/// Row ids arrive as numbers or numeric strings; anything else matches no row.
pub fn parse_row_id(value: &Value) -> Option<RowId> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
