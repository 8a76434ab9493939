//! In-memory [`WorkflowApi`] for tests.
//!
//! Every mutating call is recorded in order so tests can assert exactly what
//! a pass did (or, in dry-run, that it did nothing). Listing pages can be
//! scripted to simulate misbehaving servers.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet, VecDeque};

use n8nctl_core::{Tag, TagId, Workflow, WorkflowId};

use crate::client::{outbound_payload, Page, WorkflowApi};
use crate::error::ApiError;

/// A recorded mutating call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    CreateWorkflow(String),
    UpdateWorkflow(WorkflowId),
    Activate(WorkflowId),
    Deactivate(WorkflowId),
    Delete(WorkflowId),
    CreateTag(String),
    SetTags(WorkflowId, Vec<TagId>),
}

#[derive(Default)]
struct State {
    workflows: BTreeMap<WorkflowId, Workflow>,
    tags: Vec<Tag>,
    next_id: u64,
    calls: Vec<Call>,
    reads: Vec<String>,
    workflow_pages: Option<VecDeque<Page<Workflow>>>,
    failing_deletes: HashSet<WorkflowId>,
}

/// Fake n8n instance.
#[derive(Default)]
pub struct FakeApi {
    state: RefCell<State>,
}

fn not_found(what: &str) -> ApiError {
    ApiError::NotFound {
        url: format!("fake://{what}"),
    }
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a remote workflow. Workflows without an id get one assigned.
    pub fn with_workflow(self, mut workflow: Workflow) -> Self {
        {
            let mut state = self.state.borrow_mut();
            let id = match workflow.resolved_id() {
                Some(id) => id.clone(),
                None => state.mint_id(),
            };
            workflow.id = Some(id.clone());
            state.workflows.insert(id, workflow);
        }
        self
    }

    /// Seed a remote tag.
    pub fn with_tag(self, id: &str, name: &str) -> Self {
        self.state.borrow_mut().tags.push(Tag {
            id: Some(TagId::from(id)),
            name: name.to_string(),
            ..Tag::default()
        });
        self
    }

    /// Serve these pages from `list_workflows`, in order, instead of the
    /// seeded workflows. Once exhausted an empty final page is returned.
    pub fn with_workflow_pages(self, pages: Vec<Page<Workflow>>) -> Self {
        self.state.borrow_mut().workflow_pages = Some(pages.into());
        self
    }

    /// Make `delete_workflow(id)` fail with a 500.
    pub fn failing_delete(self, id: &str) -> Self {
        self.state
            .borrow_mut()
            .failing_deletes
            .insert(WorkflowId::from(id));
        self
    }

    /// Mutating calls made so far, in order.
    pub fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    /// Read-only calls made so far (`list_workflows`, `get_workflow:<id>`,
    /// `list_tags`).
    pub fn reads(&self) -> Vec<String> {
        self.state.borrow().reads.clone()
    }

    pub fn workflow(&self, id: &str) -> Option<Workflow> {
        self.state
            .borrow()
            .workflows
            .get(&WorkflowId::from(id))
            .cloned()
    }

    pub fn workflow_count(&self) -> usize {
        self.state.borrow().workflows.len()
    }

    pub fn tags(&self) -> Vec<Tag> {
        self.state.borrow().tags.clone()
    }
}

impl State {
    fn mint_id(&mut self) -> WorkflowId {
        self.next_id += 1;
        WorkflowId(format!("{}", 1000 + self.next_id))
    }

    fn stored(&mut self, id: &WorkflowId) -> Result<&mut Workflow, ApiError> {
        self.workflows
            .get_mut(id)
            .ok_or_else(|| not_found(&format!("workflows/{id}")))
    }
}

fn paged<T: Clone>(items: &[T], cursor: Option<&str>, limit: usize) -> Page<T> {
    let offset = cursor.and_then(|c| c.parse::<usize>().ok()).unwrap_or(0);
    let end = (offset + limit.max(1)).min(items.len());
    let data = items.get(offset..end).map(<[T]>::to_vec).unwrap_or_default();
    let next_cursor = (end < items.len()).then(|| end.to_string());
    Page { data, next_cursor }
}

impl WorkflowApi for FakeApi {
    fn list_workflows(
        &self,
        cursor: Option<&str>,
        limit: usize,
    ) -> Result<Page<Workflow>, ApiError> {
        let mut state = self.state.borrow_mut();
        state.reads.push("list_workflows".to_string());
        if let Some(pages) = state.workflow_pages.as_mut() {
            return Ok(pages.pop_front().unwrap_or_else(|| Page::last(Vec::new())));
        }
        let all: Vec<Workflow> = state.workflows.values().cloned().collect();
        Ok(paged(&all, cursor, limit))
    }

    fn get_workflow(&self, id: &WorkflowId) -> Result<Workflow, ApiError> {
        let mut state = self.state.borrow_mut();
        state.reads.push(format!("get_workflow:{id}"));
        state.stored(id).map(|wf| wf.clone())
    }

    fn create_workflow(&self, workflow: &Workflow) -> Result<Workflow, ApiError> {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::CreateWorkflow(workflow.name.clone()));
        let id = state.mint_id();
        let mut created = outbound_payload(workflow);
        created.id = Some(id.clone());
        created.active = Some(false);
        created.tags = Some(Vec::new());
        state.workflows.insert(id, created.clone());
        Ok(created)
    }

    fn update_workflow(&self, id: &WorkflowId, workflow: &Workflow) -> Result<Workflow, ApiError> {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::UpdateWorkflow(id.clone()));
        let stored = state.stored(id)?;
        let mut updated = outbound_payload(workflow);
        updated.id = stored.id.clone();
        updated.active = stored.active;
        updated.tags = stored.tags.clone();
        *stored = updated.clone();
        Ok(updated)
    }

    fn activate_workflow(&self, id: &WorkflowId) -> Result<Workflow, ApiError> {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::Activate(id.clone()));
        let stored = state.stored(id)?;
        stored.active = Some(true);
        Ok(stored.clone())
    }

    fn deactivate_workflow(&self, id: &WorkflowId) -> Result<Workflow, ApiError> {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::Deactivate(id.clone()));
        let stored = state.stored(id)?;
        stored.active = Some(false);
        Ok(stored.clone())
    }

    fn delete_workflow(&self, id: &WorkflowId) -> Result<(), ApiError> {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::Delete(id.clone()));
        if state.failing_deletes.contains(id) {
            return Err(ApiError::Status {
                status: 500,
                url: format!("fake://workflows/{id}"),
                body: "delete refused".to_string(),
            });
        }
        state
            .workflows
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| not_found(&format!("workflows/{id}")))
    }

    fn list_tags(&self, cursor: Option<&str>, limit: usize) -> Result<Page<Tag>, ApiError> {
        let mut state = self.state.borrow_mut();
        state.reads.push("list_tags".to_string());
        Ok(paged(&state.tags, cursor, limit))
    }

    fn create_tag(&self, name: &str) -> Result<Tag, ApiError> {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::CreateTag(name.to_string()));
        let tag = Tag {
            id: Some(TagId(format!("tag-{}", state.tags.len() + 1))),
            name: name.to_string(),
            ..Tag::default()
        };
        state.tags.push(tag.clone());
        Ok(tag)
    }

    fn set_workflow_tags(&self, id: &WorkflowId, tag_ids: &[TagId]) -> Result<Vec<Tag>, ApiError> {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::SetTags(id.clone(), tag_ids.to_vec()));

        let mut assigned = Vec::with_capacity(tag_ids.len());
        for tag_id in tag_ids {
            let tag = state
                .tags
                .iter()
                .find(|t| t.id.as_ref() == Some(tag_id))
                .cloned()
                .ok_or_else(|| not_found(&format!("tags/{tag_id}")))?;
            assigned.push(tag);
        }

        state.stored(id)?.tags = Some(assigned.clone());
        Ok(assigned)
    }
}
