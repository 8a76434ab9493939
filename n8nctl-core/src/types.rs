//! Domain types for n8n workflow definitions.
//!
//! Node payloads, the connection graph, and settings are carried as opaque
//! JSON values; the reconciliation core never interprets them.
//! Optional fields use `Option` so that "unset" stays distinct from `false`
//! or empty.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Server-assigned workflow identifier.
///
/// Only the remote instance mints these; local code never invents one.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkflowId(pub String);

impl WorkflowId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// An empty string is treated the same as an absent identifier.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for WorkflowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for WorkflowId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for WorkflowId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Instance-specific tag identifier. Not portable between instances.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagId(pub String);

impl fmt::Display for TagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for TagId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TagId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Domain structs
// ---------------------------------------------------------------------------

/// A workflow tag. The name is the cross-instance join key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<TagId>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Tag {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Returns the identifier when it is present and non-empty.
    pub fn resolved_id(&self) -> Option<&TagId> {
        self.id.as_ref().filter(|id| !id.0.is_empty())
    }
}

/// A workflow definition as stored locally or returned by the REST API.
///
/// Fields the API returns but this type does not name are dropped on decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<WorkflowId>,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(default)]
    pub nodes: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connections: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub static_data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Workflow {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// The identifier, if assigned and non-empty.
    pub fn resolved_id(&self) -> Option<&WorkflowId> {
        self.id.as_ref().filter(|id| !id.is_empty())
    }

    /// `true` only when the active flag is explicitly set to `true`.
    pub fn wants_active(&self) -> bool {
        self.active == Some(true)
    }

    /// Local tags, or an empty slice when unset.
    pub fn tag_list(&self) -> &[Tag] {
        self.tags.as_deref().unwrap_or(&[])
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn newtype_display() {
        assert_eq!(WorkflowId::from("42").to_string(), "42");
        assert_eq!(TagId::from("t1").to_string(), "t1");
    }

    #[test]
    fn empty_id_is_not_resolved() {
        let mut wf = Workflow::named("A");
        wf.id = Some(WorkflowId::from(""));
        assert!(wf.resolved_id().is_none());

        wf.id = Some(WorkflowId::from("7"));
        assert_eq!(wf.resolved_id().map(WorkflowId::as_str), Some("7"));
    }

    #[test]
    fn active_is_tri_state() {
        let mut wf = Workflow::named("A");
        assert!(!wf.wants_active());
        wf.active = Some(false);
        assert!(!wf.wants_active());
        wf.active = Some(true);
        assert!(wf.wants_active());
    }

    #[test]
    fn decodes_api_shape_and_drops_unknown_fields() {
        let wf: Workflow = serde_json::from_value(json!({
            "id": "7",
            "name": "B",
            "active": false,
            "nodes": [{"name": "Start", "type": "n8n-nodes-base.start", "typeVersion": 1}],
            "connections": {},
            "settings": {"executionOrder": "v1"},
            "versionId": "abc",
            "tags": [{"id": "1", "name": "prod", "createdAt": "2024-01-01T00:00:00.000Z"}],
            "createdAt": "2024-01-01T00:00:00.000Z",
            "updatedAt": "2024-01-02T00:00:00.000Z"
        }))
        .expect("decode");

        assert_eq!(wf.id, Some(WorkflowId::from("7")));
        assert_eq!(wf.active, Some(false));
        assert_eq!(wf.nodes.len(), 1);
        assert_eq!(wf.tag_list()[0].name, "prod");
        assert!(wf.tag_list()[0].created_at.is_some());
        assert!(wf.updated_at.is_some());

        let back = serde_json::to_value(&wf).expect("encode");
        assert!(back.get("versionId").is_none());
    }

    #[test]
    fn absent_optionals_are_not_serialized() {
        let value = serde_json::to_value(Workflow::named("A")).expect("encode");
        assert_eq!(value, json!({"name": "A", "nodes": []}));
    }
}
