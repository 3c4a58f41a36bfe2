//! Composition root: one store, one host, the form and both lists.

use std::sync::{Arc, Mutex};

use projboard_projects::{ProjectId, ProjectStatus};
use projboard_state::ProjectState;

use crate::document::Document;
use crate::drag::DataTransfer;
use crate::error::BoardError;
use crate::host::{HostError, RenderHost};
use crate::project_input::ProjectInput;
use crate::project_item::ProjectItem;
use crate::project_list::ProjectList;

/// The assembled board.
///
/// Owns the shared [`ProjectState`] and render host and hands them to each view
/// explicitly. Gesture helpers replay the same handler sequence a pointer would
/// (drag start, drag over, drop or leave, drag end).
pub struct ProjectBoard<H> {
    host: Arc<Mutex<H>>,
    state: Arc<ProjectState>,
    input: ProjectInput<H>,
    active: Arc<ProjectList<H>>,
    finished: Arc<ProjectList<H>>,
}

impl ProjectBoard<Document> {
    /// Board rendered into a fresh in-memory [`Document`] with its own store.
    pub fn in_memory() -> Result<Self, BoardError> {
        Self::mount(Document::with_board_templates(), ProjectState::shared())
    }
}

impl<H> ProjectBoard<H>
where
    H: RenderHost + 'static,
{
    /// Mount the form, then the active list, then the finished list.
    pub fn mount(host: H, state: Arc<ProjectState>) -> Result<Self, BoardError> {
        let host = Arc::new(Mutex::new(host));
        let input = ProjectInput::new(host.clone(), state.clone())?;
        let active = ProjectList::new(ProjectStatus::Active, host.clone(), state.clone())?;
        let finished = ProjectList::new(ProjectStatus::Finished, host.clone(), state.clone())?;

        tracing::debug!(listeners = state.listener_count(), "board mounted");

        Ok(Self {
            host,
            state,
            input,
            active,
            finished,
        })
    }

    pub fn state(&self) -> &Arc<ProjectState> {
        &self.state
    }

    pub fn input(&self) -> &ProjectInput<H> {
        &self.input
    }

    pub fn list(&self, status: ProjectStatus) -> &Arc<ProjectList<H>> {
        match status {
            ProjectStatus::Active => &self.active,
            ProjectStatus::Finished => &self.finished,
        }
    }

    /// Run `f` against the render host.
    pub fn with_host<R>(&self, f: impl FnOnce(&mut H) -> R) -> Result<R, BoardError> {
        let mut host = self.host.lock().map_err(|_| HostError::Poisoned)?;
        Ok(f(&mut *host))
    }

    /// Type into the form and submit it.
    pub fn submit(
        &self,
        title: &str,
        description: &str,
        people: &str,
    ) -> Result<ProjectId, BoardError> {
        self.input.fill(title, description, people)?;
        self.input.submit()
    }

    /// Drag a rendered project onto the `target` list and drop it.
    ///
    /// Returns whether the project changed status.
    pub fn drag_project(&self, id: ProjectId, target: ProjectStatus) -> Result<bool, BoardError> {
        let item = self.rendered_item(id)?;
        let mut transfer = DataTransfer::new();
        item.drag_start(&mut transfer);

        let list = self.list(target);
        let moved = if list.drag_over(&transfer)? {
            list.drop_handler(&transfer)?
        } else {
            false
        };

        item.drag_end(&transfer);
        Ok(moved)
    }

    /// Drag a rendered project over the `target` list and leave without dropping.
    pub fn hover_project(&self, id: ProjectId, target: ProjectStatus) -> Result<(), BoardError> {
        let item = self.rendered_item(id)?;
        let mut transfer = DataTransfer::new();
        item.drag_start(&mut transfer);

        let list = self.list(target);
        list.drag_over(&transfer)?;
        list.drag_leave()?;

        item.drag_end(&transfer);
        Ok(())
    }

    /// Resolve a full id or an unambiguous prefix of one.
    pub fn resolve(&self, needle: &str) -> Result<ProjectId, BoardError> {
        let needle = needle.trim();
        if let Ok(id) = needle.parse::<ProjectId>() {
            return Ok(id);
        }

        let snapshot = self.state.snapshot()?;
        let matches: Vec<ProjectId> = snapshot
            .iter()
            .map(|p| p.id_typed())
            .filter(|id| !needle.is_empty() && id.to_string().starts_with(needle))
            .collect();

        match matches.as_slice() {
            [id] => Ok(*id),
            [] => Err(BoardError::UnknownProject(needle.to_string())),
            many => Err(BoardError::AmbiguousProject {
                prefix: needle.to_string(),
                matches: many.len(),
            }),
        }
    }

    fn rendered_item(&self, id: ProjectId) -> Result<ProjectItem, BoardError> {
        ProjectStatus::ALL
            .iter()
            .find_map(|status| self.list(*status).item(id))
            .ok_or_else(|| BoardError::UnknownProject(id.to_string()))
    }
}

impl<H> core::fmt::Debug for ProjectBoard<H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ProjectBoard")
            .field("state", &self.state)
            .field("active", &self.active)
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mount_lays_out_form_then_lists() {
        let board = ProjectBoard::in_memory().unwrap();
        let ids = board
            .with_host(|doc| {
                let app = doc.element_by_id("app").unwrap();
                doc.children(app)
                    .iter()
                    .map(|c| doc.element_id(*c).unwrap_or_default().to_string())
                    .collect::<Vec<_>>()
            })
            .unwrap();
        assert_eq!(ids, vec!["user-input", "active-projects", "finished-projects"]);
        assert_eq!(board.state().listener_count(), 2);
    }

    #[test]
    fn dragging_an_unrendered_project_fails() {
        let board = ProjectBoard::in_memory().unwrap();
        let err = board
            .drag_project(ProjectId::generate(), ProjectStatus::Finished)
            .unwrap_err();
        assert!(matches!(err, BoardError::UnknownProject(_)));
    }

    #[test]
    fn hover_leaves_project_in_place() {
        let board = ProjectBoard::in_memory().unwrap();
        let id = board.submit("Build API", "Design REST endpoints", "3").unwrap();

        board.hover_project(id, ProjectStatus::Finished).unwrap();

        assert_eq!(board.list(ProjectStatus::Active).assigned_projects().len(), 1);
        assert!(board.list(ProjectStatus::Finished).assigned_projects().is_empty());
    }

    #[test]
    fn resolve_accepts_unique_prefixes() {
        let board = ProjectBoard::in_memory().unwrap();
        let id = board.submit("Build API", "Design REST endpoints", "3").unwrap();
        let full = id.to_string();

        assert_eq!(board.resolve(&full).unwrap(), id);
        assert_eq!(board.resolve(&full[..8]).unwrap(), id);
        assert!(matches!(board.resolve("zzz"), Err(BoardError::UnknownProject(_))));
        assert!(matches!(board.resolve(""), Err(BoardError::UnknownProject(_))));
    }

    #[test]
    fn resolve_reports_ambiguous_prefixes() {
        let board = ProjectBoard::in_memory().unwrap();
        board.submit("Build API", "Design REST endpoints", "3").unwrap();
        board.submit("Write docs", "Document the endpoints", "1").unwrap();

        // UUIDv7 ids minted in the same millisecond share their leading digits.
        let first = board.state().snapshot().unwrap().items()[0].id_typed().to_string();
        let second = board.state().snapshot().unwrap().items()[1].id_typed().to_string();
        let common = first
            .chars()
            .zip(second.chars())
            .take_while(|(a, b)| a == b)
            .count();
        if common > 0 {
            assert!(matches!(
                board.resolve(&first[..common]),
                Err(BoardError::AmbiguousProject { matches: 2, .. })
            ));
        }
    }

    #[test]
    fn dropping_the_board_frees_the_store() {
        let board = ProjectBoard::in_memory().unwrap();
        let id = board.submit("Build API", "Design REST endpoints", "3").unwrap();
        board.drag_project(id, ProjectStatus::Finished).unwrap();
        let state = Arc::downgrade(board.state());

        drop(board);

        assert!(state.upgrade().is_none());
    }

    #[test]
    fn rerendering_does_not_grow_the_document() {
        let board = ProjectBoard::in_memory().unwrap();
        let ids: Vec<_> = (0..10)
            .map(|i| board.submit(&format!("Project {i}"), "Some description", "2").unwrap())
            .collect();
        let settled = board.with_host(|doc| doc.live_elements()).unwrap();

        for _ in 0..5 {
            for id in &ids {
                board.drag_project(*id, ProjectStatus::Finished).unwrap();
                board.drag_project(*id, ProjectStatus::Active).unwrap();
            }
        }

        assert_eq!(board.with_host(|doc| doc.live_elements()).unwrap(), settled);
    }
}
