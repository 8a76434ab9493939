//! Reconciliation Planner: local + remote snapshot -> [`ChangeSet`].

use n8nctl_core::{has_drift, Tag, Workflow};

/// Operations one workflow needs. Computed per pass, never persisted.
///
/// `needs_activation` and `needs_deactivation` are never both set, and
/// neither is set unless the local active flag is explicitly present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeSet {
    pub needs_content_update: bool,
    pub needs_activation: bool,
    pub needs_deactivation: bool,
    pub needs_tag_update: bool,
}

impl ChangeSet {
    /// `true` when nothing needs to happen.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Copy without the fields that have their own reconciliation step.
fn content_only(workflow: &Workflow) -> Workflow {
    Workflow {
        id: None,
        active: None,
        tags: None,
        ..workflow.clone()
    }
}

/// Tags reduced to `(id, name)` in their original order.
fn tag_keys(tags: &[Tag]) -> Vec<(Option<&str>, &str)> {
    tags.iter()
        .map(|t| (t.resolved_id().map(|id| id.0.as_str()), t.name.as_str()))
        .collect()
}

/// Compute what must change to bring `remote` in line with `local`.
///
/// With no remote, only activation (local wants active) and tags (local has
/// any) are flagged; creation itself is decided upstream. A local active
/// flag that is unset never triggers activation or deactivation.
pub fn plan(local: &Workflow, remote: Option<&Workflow>) -> ChangeSet {
    let local_tags = local.tag_list();

    let Some(remote) = remote else {
        return ChangeSet {
            needs_activation: local.wants_active(),
            needs_tag_update: !local_tags.is_empty(),
            ..ChangeSet::default()
        };
    };

    let needs_content_update = has_drift(&content_only(remote), &content_only(local), true);

    let (needs_activation, needs_deactivation) = match (local.active, remote.active) {
        (Some(true), Some(false) | None) => (true, false),
        (Some(false), Some(true)) => (false, true),
        _ => (false, false),
    };

    let remote_tags = remote.tag_list();
    let needs_tag_update = !local_tags.is_empty()
        && (remote_tags.is_empty() || tag_keys(local_tags) != tag_keys(remote_tags));

    ChangeSet {
        needs_content_update,
        needs_activation,
        needs_deactivation,
        needs_tag_update,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use n8nctl_core::{TagId, WorkflowId};
    use rstest::rstest;
    use serde_json::json;

    fn wf(active: Option<bool>) -> Workflow {
        Workflow {
            id: Some(WorkflowId::from("7")),
            name: "B".to_string(),
            active,
            nodes: vec![json!({"name": "Start"})],
            ..Workflow::default()
        }
    }

    fn tag(id: Option<&str>, name: &str) -> Tag {
        Tag {
            id: id.map(TagId::from),
            name: name.to_string(),
            ..Tag::default()
        }
    }

    #[rstest]
    #[case(None, false)]
    #[case(Some(false), false)]
    #[case(Some(true), true)]
    fn absent_remote_activates_only_when_asked(#[case] active: Option<bool>, #[case] expected: bool) {
        let changes = plan(&wf(active), None);
        assert_eq!(changes.needs_activation, expected);
        assert!(!changes.needs_content_update);
        assert!(!changes.needs_deactivation);
    }

    #[test]
    fn absent_remote_with_tags_needs_tag_update() {
        let mut local = wf(None);
        local.tags = Some(vec![tag(None, "prod")]);
        assert!(plan(&local, None).needs_tag_update);
        assert!(!plan(&wf(None), None).needs_tag_update);
    }

    #[rstest]
    #[case::activate(Some(true), Some(false), true, false)]
    #[case::activate_unset_remote(Some(true), None, true, false)]
    #[case::deactivate(Some(false), Some(true), false, true)]
    #[case::already_active(Some(true), Some(true), false, false)]
    #[case::local_unset_is_no_opinion(None, Some(true), false, false)]
    #[case::false_vs_unset(Some(false), None, false, false)]
    fn activation_matrix(
        #[case] local: Option<bool>,
        #[case] remote: Option<bool>,
        #[case] activate: bool,
        #[case] deactivate: bool,
    ) {
        let changes = plan(&wf(local), Some(&wf(remote)));
        assert_eq!(changes.needs_activation, activate);
        assert_eq!(changes.needs_deactivation, deactivate);
        assert!(!(changes.needs_activation && changes.needs_deactivation));
    }

    #[test]
    fn activation_difference_is_not_content_drift() {
        let changes = plan(&wf(Some(true)), Some(&wf(Some(false))));
        assert_eq!(
            changes,
            ChangeSet {
                needs_activation: true,
                ..ChangeSet::default()
            }
        );
    }

    #[test]
    fn content_drift_ignores_id_and_timestamps() {
        let local = wf(None);
        let mut remote = wf(None);
        remote.id = Some(WorkflowId::from("other"));
        remote.updated_at = Some(Utc::now());
        remote.connections = Some(serde_json::Map::new());
        assert!(plan(&local, Some(&remote)).is_empty());

        remote.nodes.push(json!({"name": "Extra"}));
        assert!(plan(&local, Some(&remote)).needs_content_update);
    }

    #[test]
    fn tags_compare_by_id_and_name() {
        let mut local = wf(None);
        let mut remote = wf(None);
        local.tags = Some(vec![tag(Some("1"), "prod")]);
        remote.tags = Some(vec![Tag {
            created_at: Some(Utc::now()),
            ..tag(Some("1"), "prod")
        }]);
        assert!(!plan(&local, Some(&remote)).needs_tag_update);

        remote.tags = Some(vec![tag(Some("2"), "dev")]);
        assert!(plan(&local, Some(&remote)).needs_tag_update);

        remote.tags = None;
        assert!(plan(&local, Some(&remote)).needs_tag_update);
    }

    #[test]
    fn empty_local_tags_never_strip_remote_tags() {
        let local = wf(None);
        let mut remote = wf(None);
        remote.tags = Some(vec![tag(Some("1"), "prod")]);
        assert!(!plan(&local, Some(&remote)).needs_tag_update);
    }
}
