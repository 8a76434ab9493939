//! Drift detection: structural equality over normalized workflows.

use serde_json::{Map, Value};

use crate::types::{Tag, Workflow};

/// Return a copy with server-owned and volatile fields discounted.
///
/// - `createdAt` / `updatedAt` and the `shared` ownership block are cleared
/// - a missing connection map becomes an empty one
/// - a missing settings object becomes an empty one
/// - tags keep only `id` and `name`
pub fn normalize(workflow: &Workflow) -> Workflow {
    let mut clean = workflow.clone();
    clean.created_at = None;
    clean.updated_at = None;
    clean.shared = None;

    if clean.connections.is_none() {
        clean.connections = Some(Map::new());
    }
    if clean.settings.is_none() {
        clean.settings = Some(Value::Object(Map::new()));
    }

    if let Some(tags) = clean.tags.as_mut() {
        for tag in tags.iter_mut() {
            *tag = Tag {
                id: tag.id.clone(),
                name: tag.name.clone(),
                created_at: None,
                updated_at: None,
            };
        }
    }

    clean
}

/// `true` when `actual` and `desired` differ structurally.
///
/// With `normalize` set, both sides go through [`normalize`] first so that
/// timestamps and absent-vs-empty connection maps never register as drift.
pub fn has_drift(actual: &Workflow, desired: &Workflow, normalize: bool) -> bool {
    if normalize {
        self::normalize(actual) != self::normalize(desired)
    } else {
        actual != desired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{TagId, WorkflowId};
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn sample() -> Workflow {
        Workflow {
            id: Some(WorkflowId::from("1")),
            name: "Sample".to_string(),
            active: Some(true),
            nodes: vec![json!({"name": "Start", "typeVersion": 2.0})],
            connections: None,
            tags: Some(vec![Tag {
                id: Some(TagId::from("t1")),
                name: "prod".to_string(),
                created_at: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
                updated_at: None,
            }]),
            created_at: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
            updated_at: Some(Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap()),
            ..Workflow::default()
        }
    }

    #[test]
    fn workflow_never_drifts_from_itself() {
        let wf = sample();
        assert!(!has_drift(&wf, &wf, true));
        assert!(!has_drift(&wf, &wf, false));
    }

    #[test]
    fn timestamps_are_ignored_when_normalizing() {
        let a = sample();
        let mut b = sample();
        b.updated_at = Some(Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap());
        b.created_at = None;
        if let Some(tags) = b.tags.as_mut() {
            tags[0].updated_at = Some(Utc::now());
            tags[0].created_at = None;
        }
        assert!(!has_drift(&a, &b, true));
        assert!(has_drift(&a, &b, false));
    }

    #[test]
    fn absent_and_empty_connections_compare_equal() {
        let a = sample();
        let mut b = sample();
        b.connections = Some(Map::new());
        assert!(!has_drift(&a, &b, true));
    }

    #[test]
    fn node_changes_are_drift() {
        let a = sample();
        let mut b = sample();
        b.nodes[0] = json!({"name": "Start", "typeVersion": 3.0});
        assert!(has_drift(&a, &b, true));
    }

    #[test]
    fn normalize_is_idempotent() {
        let once = normalize(&sample());
        assert_eq!(normalize(&once), once);
    }
}
