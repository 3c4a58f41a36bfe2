//! Rendering surface boundary.
//!
//! Views never build markup themselves: they instantiate named templates, attach
//! them to host elements, and set ids, text, input values and CSS classes.

use thiserror::Error;

/// Opaque handle to an element owned by a [`RenderHost`].
///
/// Handles to elements that have since been freed are stale: hosts reject them
/// instead of resolving them to whatever reuses the slot.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ElementRef {
    pub(crate) index: usize,
    pub(crate) generation: u32,
}

/// Where an element is attached relative to its host's children.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum InsertPosition {
    /// Prepend (before the first child).
    AfterBegin,
    /// Append (after the last child).
    BeforeEnd,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HostError {
    #[error("unknown template '{0}'")]
    UnknownTemplate(String),

    #[error("no element with id '{0}'")]
    ElementNotFound(String),

    #[error("no <{0}> element inside the component")]
    MissingChild(String),

    #[error("stale element handle")]
    StaleElement,

    #[error("render host lock poisoned")]
    Poisoned,
}

/// A surface the views render into.
pub trait RenderHost: Send {
    /// Clone the named template and return its first element (detached).
    fn instantiate(&mut self, template_id: &str) -> Result<ElementRef, HostError>;

    /// Attach `element` to `host` at `position`.
    fn insert(
        &mut self,
        host: ElementRef,
        position: InsertPosition,
        element: ElementRef,
    ) -> Result<(), HostError>;

    /// Look up an attached element by id.
    fn element_by_id(&self, id: &str) -> Option<ElementRef>;

    /// First descendant of `root` (depth-first) with the given tag.
    fn query_tag(&self, root: ElementRef, tag: &str) -> Option<ElementRef>;

    /// First descendant of `root` (depth-first) with the given id.
    fn query_id(&self, root: ElementRef, id: &str) -> Option<ElementRef>;

    fn set_element_id(&mut self, element: ElementRef, id: &str) -> Result<(), HostError>;

    fn set_text(&mut self, element: ElementRef, text: &str) -> Result<(), HostError>;

    /// Current value of an input element.
    fn value(&self, element: ElementRef) -> Result<String, HostError>;

    fn set_value(&mut self, element: ElementRef, value: &str) -> Result<(), HostError>;

    fn add_class(&mut self, element: ElementRef, class: &str) -> Result<(), HostError>;

    fn remove_class(&mut self, element: ElementRef, class: &str) -> Result<(), HostError>;

    fn has_class(&self, element: ElementRef, class: &str) -> bool;

    /// Detach every child of `element` and free the detached subtrees.
    fn clear_children(&mut self, element: ElementRef) -> Result<(), HostError>;

    /// Show a blocking message to the user.
    fn alert(&mut self, message: &str);

    /// Like [`query_tag`](Self::query_tag), but missing children are an error.
    fn require_tag(&self, root: ElementRef, tag: &str) -> Result<ElementRef, HostError> {
        self.query_tag(root, tag)
            .ok_or_else(|| HostError::MissingChild(tag.to_string()))
    }

    /// Like [`query_id`](Self::query_id), but missing children are an error.
    fn require_id(&self, root: ElementRef, id: &str) -> Result<ElementRef, HostError> {
        self.query_id(root, id)
            .ok_or_else(|| HostError::ElementNotFound(id.to_string()))
    }
}
