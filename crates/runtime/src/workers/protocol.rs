//! Messages exchanged with a script worker.
//!
//! The JSON shape (`kind` tag, `self`/`opponent`/`action` fields) is the
//! public isolation protocol; in-process the enums travel over channels
//! unencoded.

use arena_core::{ActorSnapshot, Decision};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum WorkerRequest {
    /// Load `source`, replacing whatever the worker held before.
    Compile { source: String },
    /// Compute one decision from the two snapshots.
    Execute {
        #[serde(rename = "self")]
        me: ActorSnapshot,
        opponent: ActorSnapshot,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum WorkerResponse {
    Compiled {
        success: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    Result {
        success: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        action: Option<Decision>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
}

/// A response stamped with the generation of the worker that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub generation: u64,
    pub response: WorkerResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn execute_request_uses_wire_field_names() {
        let request = WorkerRequest::Execute {
            me: ActorSnapshot {
                x: 1.0,
                ..Default::default()
            },
            opponent: ActorSnapshot::default(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["kind"], "execute");
        assert_eq!(json["self"]["x"], 1.0);
        assert!(json.get("opponent").is_some());
    }

    #[test]
    fn result_response_parses_partial_action() {
        let json = r#"{"kind":"result","success":true,"action":{"left":true}}"#;
        let response: WorkerResponse = serde_json::from_str(json).unwrap();
        let WorkerResponse::Result {
            success,
            action: Some(action),
            error,
        } = response
        else {
            panic!("expected a result response");
        };
        assert!(success && action.move_left && !action.guard);
        assert!(error.is_none());
    }

    #[test]
    fn compiled_response_omits_missing_error() {
        let json = serde_json::to_string(&WorkerResponse::Compiled {
            success: true,
            error: None,
        })
        .unwrap();
        assert_eq!(json, r#"{"kind":"compiled","success":true}"#);
    }
}
