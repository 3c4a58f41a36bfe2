//! The project store.

use std::sync::{Arc, Mutex, RwLock};

use chrono::Utc;
use thiserror::Error;

use projboard_core::DomainError;
use projboard_events::{Command, EventBus, InMemoryEventBus, Subscription, execute};
use projboard_projects::{
    CreateProject, MoveProject, Project, ProjectCommand, ProjectId, ProjectStatus,
};

use crate::listener::{FnListener, ListenerRegistry, StateListener};
use crate::snapshot::Snapshot;

/// Snapshot of the store's projects.
pub type ProjectSnapshot = Snapshot<Project>;

impl Snapshot<Project> {
    /// Projects in the given partition, in insertion order.
    pub fn with_status(&self, status: ProjectStatus) -> Vec<Project> {
        self.iter()
            .filter(|p| p.status() == status)
            .cloned()
            .collect()
    }

    pub fn find(&self, id: ProjectId) -> Option<&Project> {
        self.iter().find(|p| p.id_typed() == id)
    }
}

#[derive(Debug, Error)]
pub enum StateError {
    #[error("project store lock poisoned")]
    Poisoned,

    #[error(transparent)]
    Domain(#[from] DomainError),
}

#[derive(Debug, Default)]
struct Inner {
    projects: Vec<Project>,
    revision: u64,
}

impl Inner {
    fn snapshot(&self) -> ProjectSnapshot {
        Snapshot::new(self.revision, self.projects.clone())
    }
}

/// Observable, insertion-ordered project store.
///
/// Construct one per application and share it by `Arc`. Projects are only
/// created by [`add_project`](Self::add_project) and only change status through
/// [`move_project`](Self::move_project); there is no deletion.
///
/// Mutations are synchronous: every listener has been notified by the time a
/// mutating call returns. The store lock is released before listeners run, so
/// listeners may read the store. Mutations are dispatched one at a time, so
/// observers see revisions in order even with concurrent writers.
#[derive(Debug, Default)]
pub struct ProjectState {
    inner: RwLock<Inner>,
    dispatch: Mutex<()>,
    listeners: ListenerRegistry<Project>,
    bus: InMemoryEventBus<ProjectSnapshot>,
}

impl ProjectState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience for the common case of sharing the store.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Register a listener for every future mutation.
    pub fn add_listener(&self, listener: Arc<dyn StateListener<Project>>) {
        self.listeners.add(listener);
    }

    /// Register a closure for every future mutation.
    pub fn on_change<F>(&self, f: F)
    where
        F: Fn(&ProjectSnapshot) + Send + Sync + 'static,
    {
        self.listeners.add(Arc::new(FnListener(f)));
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Channel-based alternative to listeners: receives a snapshot per mutation.
    pub fn subscribe(&self) -> Subscription<ProjectSnapshot> {
        self.bus.subscribe()
    }

    /// Append a new Active project and notify observers.
    ///
    /// No field validation happens here; that is the input boundary's job.
    pub fn add_project(
        &self,
        title: impl Into<String>,
        description: impl Into<String>,
        people: u32,
    ) -> Result<ProjectId, StateError> {
        let project_id = ProjectId::generate();
        let command = ProjectCommand::CreateProject(CreateProject {
            project_id,
            title: title.into(),
            description: description.into(),
            people,
            occurred_at: Utc::now(),
        });

        let mut project = Project::empty(project_id);
        execute(&mut project, &command)?;

        let _dispatch = self.dispatch.lock().map_err(|_| StateError::Poisoned)?;
        let snapshot = {
            let mut inner = self.inner.write().map_err(|_| StateError::Poisoned)?;
            inner.projects.push(project);
            inner.revision += 1;
            inner.snapshot()
        };

        tracing::info!(
            project_id = %project_id,
            revision = snapshot.revision(),
            "project added"
        );
        self.publish(snapshot);
        Ok(project_id)
    }

    /// Move a project to `status`.
    ///
    /// Returns `Ok(false)` without notifying anyone when the id is unknown or the
    /// project already has that status.
    pub fn move_project(&self, id: ProjectId, status: ProjectStatus) -> Result<bool, StateError> {
        let command = ProjectCommand::MoveProject(MoveProject {
            project_id: id,
            status,
            occurred_at: Utc::now(),
        });

        let _dispatch = self.dispatch.lock().map_err(|_| StateError::Poisoned)?;
        let snapshot = {
            let mut inner = self.inner.write().map_err(|_| StateError::Poisoned)?;
            let Some(project) = inner.projects.iter_mut().find(|p| p.id_typed() == id) else {
                tracing::debug!(project_id = %command.target_aggregate_id(), "move ignored: unknown project");
                return Ok(false);
            };

            let events = execute(project, &command)?;
            if events.is_empty() {
                tracing::debug!(project_id = %id, %status, "move ignored: status unchanged");
                return Ok(false);
            }

            inner.revision += 1;
            inner.snapshot()
        };

        tracing::info!(
            project_id = %id,
            %status,
            revision = snapshot.revision(),
            "project moved"
        );
        self.publish(snapshot);
        Ok(true)
    }

    /// Current contents.
    pub fn snapshot(&self) -> Result<ProjectSnapshot, StateError> {
        let inner = self.inner.read().map_err(|_| StateError::Poisoned)?;
        Ok(inner.snapshot())
    }

    pub fn get(&self, id: ProjectId) -> Result<Option<Project>, StateError> {
        let inner = self.inner.read().map_err(|_| StateError::Poisoned)?;
        Ok(inner.projects.iter().find(|p| p.id_typed() == id).cloned())
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|i| i.projects.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn publish(&self, snapshot: ProjectSnapshot) {
        self.listeners.notify_all(&snapshot);
        if let Err(err) = self.bus.publish(snapshot) {
            tracing::warn!(error = ?err, "failed to publish snapshot to subscribers");
        }
    }
}
