//! One status partition of the board (the drop target).

use std::sync::{Arc, Mutex, Weak};

use projboard_projects::{Project, ProjectId, ProjectStatus};
use projboard_state::{ProjectSnapshot, ProjectState, StateListener};

use crate::component::Component;
use crate::drag::{DataTransfer, DragState, TEXT_PLAIN};
use crate::error::BoardError;
use crate::host::{ElementRef, HostError, InsertPosition, RenderHost};
use crate::project_item::ProjectItem;

/// CSS class marking a list as a live drop target.
pub const DROPPABLE_CLASS: &str = "droppable";

#[derive(Debug, Default)]
struct ListView {
    assigned: Vec<Project>,
    items: Vec<ProjectItem>,
    drag: DragState,
}

/// Renders the projects of one status and accepts drops that move projects
/// into it.
///
/// The list registers itself with the store on construction and re-renders on
/// every snapshot. Locks are never held across a store call: a drop releases
/// the host before asking the store to move, because the resulting
/// notification re-enters this list to render.
///
/// The store owns the list through its listener registry, so the list only
/// keeps a weak handle back to the store.
pub struct ProjectList<H> {
    status: ProjectStatus,
    host: Arc<Mutex<H>>,
    state: Weak<ProjectState>,
    component: Component,
    list_element: ElementRef,
    view: Mutex<ListView>,
}

impl<H> ProjectList<H>
where
    H: RenderHost + 'static,
{
    /// Mount the list at the end of `app` and subscribe it to `state`.
    pub fn new(
        status: ProjectStatus,
        host: Arc<Mutex<H>>,
        state: Arc<ProjectState>,
    ) -> Result<Arc<Self>, BoardError> {
        let (component, list_element) = {
            let mut h = host.lock().map_err(|_| HostError::Poisoned)?;
            let component = Component::mount(
                &mut *h,
                "project-list",
                "app",
                InsertPosition::BeforeEnd,
                Some(&format!("{status}-projects")),
            )?;
            let list_element = Self::render_content(&mut *h, &component, status)?;
            (component, list_element)
        };

        let list = Arc::new(Self {
            status,
            host,
            state: Arc::downgrade(&state),
            component,
            list_element,
            view: Mutex::new(ListView::default()),
        });
        state.add_listener(list.clone());
        Ok(list)
    }

    fn render_content(
        host: &mut H,
        component: &Component,
        status: ProjectStatus,
    ) -> Result<ElementRef, HostError> {
        let root = component.element();
        let ul = host.require_tag(root, "ul")?;
        host.set_element_id(ul, &Self::list_id_for(status))?;
        let heading = host.require_tag(root, "h2")?;
        host.set_text(
            heading,
            &format!("{} PROJECTS", status.as_str().to_uppercase()),
        )?;
        Ok(ul)
    }

    fn list_id_for(status: ProjectStatus) -> String {
        format!("{status}-project-list")
    }

    pub fn status(&self) -> ProjectStatus {
        self.status
    }

    pub fn list_id(&self) -> String {
        Self::list_id_for(self.status)
    }

    pub fn component(&self) -> &Component {
        &self.component
    }

    /// Projects rendered by the last notification, in store order.
    pub fn assigned_projects(&self) -> Vec<Project> {
        self.view
            .lock()
            .map(|v| v.assigned.clone())
            .unwrap_or_default()
    }

    pub fn item(&self, id: ProjectId) -> Option<ProjectItem> {
        let view = self.view.lock().ok()?;
        view.items.iter().find(|i| i.id() == id).cloned()
    }

    pub fn drag_state(&self) -> DragState {
        self.view.lock().map(|v| v.drag).unwrap_or_default()
    }

    /// A drag moves over the list. Returns whether the drag is accepted.
    pub fn drag_over(&self, transfer: &DataTransfer) -> Result<bool, BoardError> {
        if transfer.first_type() != Some(TEXT_PLAIN) {
            tracing::debug!(list = %self.status, "drag over ignored: unsupported payload");
            return Ok(false);
        }

        self.set_drag_state(DragState::DragHover)?;
        let mut host = self.host.lock().map_err(|_| HostError::Poisoned)?;
        host.add_class(self.list_element, DROPPABLE_CLASS)?;
        Ok(true)
    }

    /// The drag leaves without dropping.
    pub fn drag_leave(&self) -> Result<(), BoardError> {
        self.set_drag_state(DragState::Idle)?;
        let mut host = self.host.lock().map_err(|_| HostError::Poisoned)?;
        host.remove_class(self.list_element, DROPPABLE_CLASS)?;
        Ok(())
    }

    /// The drag is released over the list: move the carried project here.
    ///
    /// Returns whether the store changed. Payloads that do not name a known
    /// project are ignored.
    pub fn drop_handler(&self, transfer: &DataTransfer) -> Result<bool, BoardError> {
        self.drag_leave()?;

        let Some(payload) = transfer.get_data(TEXT_PLAIN) else {
            tracing::debug!(list = %self.status, "drop ignored: no project id");
            return Ok(false);
        };
        let Ok(id) = payload.parse::<ProjectId>() else {
            tracing::debug!(list = %self.status, %payload, "drop ignored: malformed project id");
            return Ok(false);
        };

        let Some(state) = self.state.upgrade() else {
            tracing::debug!(list = %self.status, "drop ignored: store is gone");
            return Ok(false);
        };

        Ok(state.move_project(id, self.status)?)
    }

    fn set_drag_state(&self, next: DragState) -> Result<(), BoardError> {
        let mut view = self.view.lock().map_err(|_| HostError::Poisoned)?;
        if view.drag != next {
            tracing::debug!(list = %self.status, from = ?view.drag, to = ?next, "drag state");
            view.drag = next;
        }
        Ok(())
    }

    /// Replace the rendered items. On failure the list is left empty rather
    /// than half rendered.
    fn render_projects(&self, projects: &[Project]) -> Result<Vec<ProjectItem>, HostError> {
        let mut host = self.host.lock().map_err(|_| HostError::Poisoned)?;
        host.clear_children(self.list_element)?;
        let list_id = self.list_id();
        let rendered: Result<Vec<_>, _> = projects
            .iter()
            .map(|p| ProjectItem::mount(&mut *host, &list_id, p.clone()))
            .collect();

        if rendered.is_err() {
            host.clear_children(self.list_element)?;
        }
        rendered
    }
}

impl<H> StateListener<Project> for ProjectList<H>
where
    H: RenderHost + 'static,
{
    fn notify(&self, snapshot: &ProjectSnapshot) {
        let relevant = snapshot.with_status(self.status);

        let items = self.render_projects(&relevant).unwrap_or_else(|err| {
            tracing::warn!(list = %self.status, error = %err, "failed to render projects");
            Vec::new()
        });

        match self.view.lock() {
            Ok(mut view) => {
                view.assigned = relevant;
                view.items = items;
            }
            Err(_) => tracing::warn!(list = %self.status, "list view lock poisoned"),
        }
    }
}

impl<H> core::fmt::Debug for ProjectList<H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ProjectList")
            .field("status", &self.status)
            .field("component", &self.component)
            .finish_non_exhaustive()
    }
}
