//! Tag Reconciler: local tag names -> remote tag ids, one assignment call
//! per workflow.

use std::collections::HashMap;

use n8nctl_api::{fetch_all_tags, WorkflowApi};
use n8nctl_core::{TagId, Workflow, WorkflowId};

use crate::error::SyncError;
use crate::progress::{execute_or_dry_run, Progress};

/// Resolves tags for the workflows of one pass.
///
/// The remote name -> id map is fetched on first use (never in dry-run) and
/// kept up to date as tags are created, so later workflows reuse tags an
/// earlier one created.
#[derive(Debug, Default)]
pub struct TagReconciler {
    remote: Option<HashMap<String, TagId>>,
}

impl TagReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    fn remote_map<A: WorkflowApi + ?Sized>(
        &mut self,
        api: &A,
    ) -> Result<&mut HashMap<String, TagId>, SyncError> {
        if self.remote.is_none() {
            let tags = fetch_all_tags(api)?;
            tracing::debug!("fetched {} remote tag(s)", tags.len());
            let map = tags
                .into_iter()
                .filter_map(|t| t.resolved_id().cloned().map(|id| (t.name, id)))
                .collect();
            self.remote = Some(map);
        }
        Ok(self.remote.get_or_insert_with(HashMap::new))
    }

    /// Turn `workflow`'s tags into remote ids, creating missing tags.
    ///
    /// Tags that already carry an id are used as-is. In dry-run, tags
    /// without an id are only reported.
    pub fn resolve<A: WorkflowApi + ?Sized>(
        &mut self,
        api: &A,
        workflow: &Workflow,
        dry_run: bool,
        progress: &mut Progress,
    ) -> Result<Vec<TagId>, SyncError> {
        let mut ids = Vec::new();

        for tag in workflow.tag_list() {
            if let Some(id) = tag.resolved_id() {
                ids.push(id.clone());
                continue;
            }

            if dry_run {
                progress.say(format!(
                    "Would create tag '{}' for workflow '{}'",
                    tag.name, workflow.name
                ));
                continue;
            }

            let remote = self.remote_map(api)?;
            if let Some(id) = remote.get(&tag.name) {
                ids.push(id.clone());
                continue;
            }

            let created = api.create_tag(&tag.name)?;
            let id = created
                .resolved_id()
                .cloned()
                .ok_or_else(|| SyncError::MissingIdentifier {
                    name: tag.name.clone(),
                })?;
            progress.say(format!("Created tag '{}' (ID: {id})", tag.name));
            remote.insert(tag.name.clone(), id.clone());
            ids.push(id);
        }

        Ok(ids)
    }

    /// Resolve tags and assign them to workflow `id` in one call.
    ///
    /// Nothing is assigned when no ids resolved, except in dry-run where the
    /// assignment is always reported.
    pub fn reconcile<A: WorkflowApi + ?Sized>(
        &mut self,
        api: &A,
        workflow: &Workflow,
        id: &WorkflowId,
        dry_run: bool,
        progress: &mut Progress,
    ) -> Result<(), SyncError> {
        if workflow.tag_list().is_empty() {
            return Ok(());
        }

        let ids = self.resolve(api, workflow, dry_run, progress)?;
        if ids.is_empty() && !dry_run {
            return Ok(());
        }

        execute_or_dry_run(
            progress,
            dry_run,
            format!("Would update tags for workflow '{}' (ID: {id})", workflow.name),
            || {
                api.set_workflow_tags(id, &ids)?;
                let message = format!("Updated tags for workflow '{}' (ID: {id})", workflow.name);
                Ok(((), message))
            },
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use n8nctl_api::fake::{Call, FakeApi};
    use n8nctl_core::Tag;

    fn tagged(tags: Vec<Tag>) -> Workflow {
        let mut wf = Workflow::named("Tagged");
        wf.id = Some(WorkflowId::from("1"));
        wf.tags = Some(tags);
        wf
    }

    #[test]
    fn resolves_existing_and_creates_missing() {
        let api = FakeApi::new()
            .with_workflow(tagged(vec![]))
            .with_tag("10", "prod");
        let wf = tagged(vec![Tag::named("prod"), Tag::named("etl")]);
        let mut progress = Progress::new();

        TagReconciler::new()
            .reconcile(&api, &wf, &WorkflowId::from("1"), false, &mut progress)
            .unwrap();

        let calls = api.calls();
        assert_eq!(calls[0], Call::CreateTag("etl".to_string()));
        assert!(matches!(
            &calls[1],
            Call::SetTags(id, ids) if id.as_str() == "1" && ids.len() == 2 && ids[0] == TagId::from("10")
        ));
        assert_eq!(calls.len(), 2);
        assert!(progress.messages()[0].starts_with("Created tag 'etl' (ID: "));
        assert!(progress.messages().iter().all(|m| !m.starts_with("Would ")));
    }

    #[test]
    fn remote_map_is_fetched_once_and_updated() {
        let api = FakeApi::new()
            .with_workflow(tagged(vec![]))
            .with_workflow({
                let mut w = tagged(vec![]);
                w.id = Some(WorkflowId::from("2"));
                w
            });
        let wf = tagged(vec![Tag::named("new")]);
        let mut reconciler = TagReconciler::new();
        let mut progress = Progress::new();

        reconciler
            .reconcile(&api, &wf, &WorkflowId::from("1"), false, &mut progress)
            .unwrap();
        reconciler
            .reconcile(&api, &wf, &WorkflowId::from("2"), false, &mut progress)
            .unwrap();

        let creates = api
            .calls()
            .into_iter()
            .filter(|c| matches!(c, Call::CreateTag(_)))
            .count();
        assert_eq!(creates, 1);
        assert_eq!(api.reads(), vec!["list_tags"]);
    }

    #[test]
    fn dry_run_fetches_and_mutates_nothing() {
        let api = FakeApi::new().with_tag("10", "prod");
        let wf = tagged(vec![Tag::named("prod"), Tag::named("etl")]);
        let mut progress = Progress::new();

        TagReconciler::new()
            .reconcile(&api, &wf, &WorkflowId::from("1"), true, &mut progress)
            .unwrap();

        assert!(api.calls().is_empty());
        assert!(api.reads().is_empty());
        assert_eq!(
            progress.messages(),
            [
                "Would create tag 'prod' for workflow 'Tagged'",
                "Would create tag 'etl' for workflow 'Tagged'",
                "Would update tags for workflow 'Tagged' (ID: 1)",
            ]
        );
    }
}
