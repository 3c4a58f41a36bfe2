//! One rendered project (the drag source).

use projboard_projects::{Project, ProjectId};

use crate::component::Component;
use crate::drag::{DataTransfer, DropEffect, TEXT_PLAIN};
use crate::host::{HostError, InsertPosition, RenderHost};

/// "1 Person" for exactly one, "<n> Persons" otherwise.
pub fn persons_phrase(people: u32) -> String {
    if people == 1 {
        "1 Person".to_string()
    } else {
        format!("{people} Persons")
    }
}

/// A project rendered as a list item.
///
/// The item element's id is the project id. As a drag source it only ever
/// writes that id; the drop target decides what happens with it.
#[derive(Debug, Clone)]
pub struct ProjectItem {
    component: Component,
    project: Project,
}

impl ProjectItem {
    pub fn mount<H>(host: &mut H, list_id: &str, project: Project) -> Result<Self, HostError>
    where
        H: RenderHost + ?Sized,
    {
        let id = project.id_typed().to_string();
        let component = Component::mount(
            host,
            "single-project",
            list_id,
            InsertPosition::BeforeEnd,
            Some(&id),
        )?;
        let item = Self { component, project };
        item.render_content(host)?;
        Ok(item)
    }

    fn render_content<H>(&self, host: &mut H) -> Result<(), HostError>
    where
        H: RenderHost + ?Sized,
    {
        let root = self.component.element();
        let title = host.require_tag(root, "h2")?;
        host.set_text(title, self.project.title())?;
        let persons = host.require_tag(root, "h3")?;
        host.set_text(persons, &format!("{} assigned", self.persons()))?;
        let description = host.require_tag(root, "p")?;
        host.set_text(description, self.project.description())?;
        Ok(())
    }

    pub fn id(&self) -> ProjectId {
        self.project.id_typed()
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn component(&self) -> &Component {
        &self.component
    }

    pub fn persons(&self) -> String {
        persons_phrase(self.project.people())
    }

    pub fn drag_start(&self, transfer: &mut DataTransfer) {
        transfer.set_data(TEXT_PLAIN, self.id().to_string());
        transfer.set_effect_allowed(DropEffect::Move);
        tracing::debug!(project_id = %self.id(), "drag started");
    }

    pub fn drag_end(&self, _transfer: &DataTransfer) {
        tracing::debug!(project_id = %self.id(), "drag ended");
    }
}
