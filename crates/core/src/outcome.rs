//! Result of a write through the adapter

use savegame_shared::RemoteError;
use serde::{Serialize, Serializer};
use serde_json::Value;

/// How a save or statistics write ended.
///
/// Only `Saved` reached the remote store. `Fallback` still persisted the
/// payload, but locally.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    /// Upserted remotely; `data` holds the rows the backend returned
    Saved { data: Vec<Value> },
    /// Adapter is offline; written to the local slot
    Offline,
    /// Remote write failed; written to the local slot instead
    Fallback { error: RemoteError },
}

impl SaveOutcome {
    pub fn success(&self) -> bool {
        !matches!(self, SaveOutcome::Fallback { .. })
    }

    /// Whether the payload ended up in the local store
    pub fn is_offline(&self) -> bool {
        !matches!(self, SaveOutcome::Saved { .. })
    }

    pub fn data(&self) -> Option<&[Value]> {
        match self {
            SaveOutcome::Saved { data } => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&RemoteError> {
        match self {
            SaveOutcome::Fallback { error } => Some(error),
            _ => None,
        }
    }
}

/// Wire view: `{success, data?, error?, offline?}`
#[derive(Serialize)]
struct OutcomeView<'a> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a [Value]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    offline: Option<bool>,
}

impl Serialize for SaveOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        OutcomeView {
            success: self.success(),
            data: self.data(),
            error: self.error().map(|e| e.to_string()),
            offline: self.is_offline().then_some(true),
        }
        .serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flags() {
        let saved = SaveOutcome::Saved { data: vec![] };
        assert!(saved.success());
        assert!(!saved.is_offline());

        assert!(SaveOutcome::Offline.success());
        assert!(SaveOutcome::Offline.is_offline());

        let fallback = SaveOutcome::Fallback {
            error: RemoteError::Unavailable("down".to_string()),
        };
        assert!(!fallback.success());
        assert!(fallback.is_offline());
        assert!(fallback.error().is_some());
    }

    #[test]
    fn test_wire_view() {
        assert_eq!(
            serde_json::to_value(SaveOutcome::Offline).unwrap(),
            json!({"success": true, "offline": true})
        );

        assert_eq!(
            serde_json::to_value(SaveOutcome::Saved {
                data: vec![json!({"player_name": "alice"})]
            })
            .unwrap(),
            json!({"success": true, "data": [{"player_name": "alice"}]})
        );

        assert_eq!(
            serde_json::to_value(SaveOutcome::Fallback {
                error: RemoteError::Transport("connection refused".to_string())
            })
            .unwrap(),
            json!({
                "success": false,
                "error": "Transport error: connection refused",
                "offline": true
            })
        );
    }
}
