//! Template-backed view base.

use crate::host::{ElementRef, HostError, InsertPosition, RenderHost};

/// A template instance attached to a host element.
///
/// Mounting clones `template_id`, optionally assigns the new element an id, and
/// inserts it into the element with id `host_element_id`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Component {
    host_element: ElementRef,
    element: ElementRef,
}

impl Component {
    pub fn mount<H>(
        host: &mut H,
        template_id: &str,
        host_element_id: &str,
        position: InsertPosition,
        new_element_id: Option<&str>,
    ) -> Result<Self, HostError>
    where
        H: RenderHost + ?Sized,
    {
        let host_element = host
            .element_by_id(host_element_id)
            .ok_or_else(|| HostError::ElementNotFound(host_element_id.to_string()))?;

        let element = host.instantiate(template_id)?;
        if let Some(id) = new_element_id {
            host.set_element_id(element, id)?;
        }
        host.insert(host_element, position, element)?;

        Ok(Self {
            host_element,
            element,
        })
    }

    pub fn host_element(&self) -> ElementRef {
        self.host_element
    }

    pub fn element(&self) -> ElementRef {
        self.element
    }
}
