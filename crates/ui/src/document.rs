//! In-memory element tree implementing [`RenderHost`].

use std::collections::{BTreeSet, HashMap};
use std::fmt::Write as _;

use crate::host::{ElementRef, HostError, InsertPosition, RenderHost};

/// Template node: the blueprint an element tree is cloned from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    text: String,
    children: Vec<Template>,
}

impl Template {
    pub fn element(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            id: None,
            classes: Vec::new(),
            text: String::new(),
            children: Vec::new(),
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn child(mut self, child: Template) -> Self {
        self.children.push(child);
        self
    }
}

#[derive(Debug, Clone)]
struct Node {
    tag: String,
    id: Option<String>,
    classes: BTreeSet<String>,
    text: String,
    value: String,
    children: Vec<ElementRef>,
    parent: Option<ElementRef>,
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Slab-backed element tree with named templates.
///
/// The tree starts as `body > div#app`. Subtrees detached by
/// [`clear_children`](RenderHost::clear_children) are freed and their slots
/// reused; handles into them become stale.
#[derive(Debug)]
pub struct Document {
    slots: Vec<Slot>,
    free: Vec<usize>,
    body: ElementRef,
    templates: HashMap<String, Template>,
    alerts: Vec<String>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Empty document (`body > div#app`) without templates.
    pub fn new() -> Self {
        let mut doc = Self {
            slots: Vec::new(),
            free: Vec::new(),
            body: ElementRef {
                index: 0,
                generation: 0,
            },
            templates: HashMap::new(),
            alerts: Vec::new(),
        };
        let body = doc.build(&Template::element("body"), None);
        let app = doc.build(&Template::element("div").id("app"), Some(body));
        if let Some(node) = doc.node_mut_opt(body) {
            node.children.push(app);
        }
        doc.body = body;
        doc
    }

    /// Document with the three templates the board uses.
    pub fn with_board_templates() -> Self {
        let mut doc = Self::new();

        doc.register_template(
            "project-input",
            Template::element("form")
                .child(
                    Template::element("div")
                        .class("form-control")
                        .child(Template::element("label").text("Title"))
                        .child(Template::element("input").id("title")),
                )
                .child(
                    Template::element("div")
                        .class("form-control")
                        .child(Template::element("label").text("Description"))
                        .child(Template::element("textarea").id("description")),
                )
                .child(
                    Template::element("div")
                        .class("form-control")
                        .child(Template::element("label").text("People"))
                        .child(Template::element("input").id("people")),
                )
                .child(Template::element("button").text("ADD PROJECT")),
        );

        doc.register_template(
            "project-list",
            Template::element("section")
                .class("projects")
                .child(Template::element("header").child(Template::element("h2")))
                .child(Template::element("ul")),
        );

        doc.register_template(
            "single-project",
            Template::element("li")
                .child(Template::element("h2"))
                .child(Template::element("h3"))
                .child(Template::element("p")),
        );

        doc
    }

    pub fn register_template(&mut self, id: impl Into<String>, template: Template) {
        self.templates.insert(id.into(), template);
    }

    pub fn body(&self) -> ElementRef {
        self.body
    }

    /// Messages shown via [`alert`](RenderHost::alert), oldest first.
    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }

    pub fn take_alerts(&mut self) -> Vec<String> {
        std::mem::take(&mut self.alerts)
    }

    pub fn tag(&self, element: ElementRef) -> Option<&str> {
        self.node(element).map(|n| n.tag.as_str())
    }

    pub fn text(&self, element: ElementRef) -> Option<&str> {
        self.node(element).map(|n| n.text.as_str())
    }

    pub fn element_id(&self, element: ElementRef) -> Option<&str> {
        self.node(element).and_then(|n| n.id.as_deref())
    }

    pub fn children(&self, element: ElementRef) -> &[ElementRef] {
        self.node(element)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// Elements currently allocated, attached or not.
    pub fn live_elements(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Indented outline of the attached tree, one element per line.
    pub fn outline(&self) -> String {
        let mut out = String::new();
        self.write_outline(self.body, 0, &mut out);
        out
    }

    fn write_outline(&self, element: ElementRef, depth: usize, out: &mut String) {
        let Some(node) = self.node(element) else {
            return;
        };
        let _ = write!(out, "{}{}", "  ".repeat(depth), node.tag);
        if let Some(id) = &node.id {
            let _ = write!(out, "#{id}");
        }
        for class in &node.classes {
            let _ = write!(out, ".{class}");
        }
        if !node.text.is_empty() {
            let _ = write!(out, " {:?}", node.text);
        }
        if !node.value.is_empty() {
            let _ = write!(out, " [value={:?}]", node.value);
        }
        out.push('\n');
        for child in &node.children {
            self.write_outline(*child, depth + 1, out);
        }
    }

    fn build(&mut self, template: &Template, parent: Option<ElementRef>) -> ElementRef {
        let element = self.alloc(Node {
            tag: template.tag.clone(),
            id: template.id.clone(),
            classes: template.classes.iter().cloned().collect(),
            text: template.text.clone(),
            value: String::new(),
            children: Vec::new(),
            parent,
        });
        for child in &template.children {
            let child_ref = self.build(child, Some(element));
            if let Some(node) = self.node_mut_opt(element) {
                node.children.push(child_ref);
            }
        }
        element
    }

    fn alloc(&mut self, node: Node) -> ElementRef {
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index];
                slot.node = Some(node);
                ElementRef {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                ElementRef {
                    index: self.slots.len() - 1,
                    generation: 0,
                }
            }
        }
    }

    /// Free `element` and everything below it.
    fn release(&mut self, element: ElementRef) {
        let Some(slot) = self
            .slots
            .get_mut(element.index)
            .filter(|slot| slot.generation == element.generation)
        else {
            return;
        };
        let Some(node) = slot.node.take() else {
            return;
        };
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(element.index);
        for child in node.children {
            self.release(child);
        }
    }

    fn node(&self, element: ElementRef) -> Option<&Node> {
        self.slots
            .get(element.index)
            .filter(|slot| slot.generation == element.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    fn node_mut_opt(&mut self, element: ElementRef) -> Option<&mut Node> {
        self.slots
            .get_mut(element.index)
            .filter(|slot| slot.generation == element.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    fn node_mut(&mut self, element: ElementRef) -> Result<&mut Node, HostError> {
        self.node_mut_opt(element).ok_or(HostError::StaleElement)
    }

    fn find_descendant(
        &self,
        root: ElementRef,
        matches: &dyn Fn(&Node) -> bool,
    ) -> Option<ElementRef> {
        let node = self.node(root)?;
        for child in &node.children {
            if self.node(*child).is_some_and(matches) {
                return Some(*child);
            }
            if let Some(found) = self.find_descendant(*child, matches) {
                return Some(found);
            }
        }
        None
    }
}

impl RenderHost for Document {
    fn instantiate(&mut self, template_id: &str) -> Result<ElementRef, HostError> {
        let template = self
            .templates
            .get(template_id)
            .cloned()
            .ok_or_else(|| HostError::UnknownTemplate(template_id.to_string()))?;
        Ok(self.build(&template, None))
    }

    fn insert(
        &mut self,
        host: ElementRef,
        position: InsertPosition,
        element: ElementRef,
    ) -> Result<(), HostError> {
        if host == element || self.node(host).is_none() {
            return Err(HostError::StaleElement);
        }
        let old_parent = self.node_mut(element)?.parent.replace(host);
        if let Some(node) = old_parent.and_then(|p| self.node_mut_opt(p)) {
            node.children.retain(|c| *c != element);
        }

        let host_node = self.node_mut(host)?;
        match position {
            InsertPosition::AfterBegin => host_node.children.insert(0, element),
            InsertPosition::BeforeEnd => host_node.children.push(element),
        }
        Ok(())
    }

    fn element_by_id(&self, id: &str) -> Option<ElementRef> {
        self.query_id(self.body, id)
    }

    fn query_tag(&self, root: ElementRef, tag: &str) -> Option<ElementRef> {
        self.find_descendant(root, &|n: &Node| n.tag == tag)
    }

    fn query_id(&self, root: ElementRef, id: &str) -> Option<ElementRef> {
        self.find_descendant(root, &|n: &Node| n.id.as_deref() == Some(id))
    }

    fn set_element_id(&mut self, element: ElementRef, id: &str) -> Result<(), HostError> {
        self.node_mut(element)?.id = Some(id.to_string());
        Ok(())
    }

    fn set_text(&mut self, element: ElementRef, text: &str) -> Result<(), HostError> {
        self.node_mut(element)?.text = text.to_string();
        Ok(())
    }

    fn value(&self, element: ElementRef) -> Result<String, HostError> {
        self.node(element)
            .map(|n| n.value.clone())
            .ok_or(HostError::StaleElement)
    }

    fn set_value(&mut self, element: ElementRef, value: &str) -> Result<(), HostError> {
        self.node_mut(element)?.value = value.to_string();
        Ok(())
    }

    fn add_class(&mut self, element: ElementRef, class: &str) -> Result<(), HostError> {
        self.node_mut(element)?.classes.insert(class.to_string());
        Ok(())
    }

    fn remove_class(&mut self, element: ElementRef, class: &str) -> Result<(), HostError> {
        self.node_mut(element)?.classes.remove(class);
        Ok(())
    }

    fn has_class(&self, element: ElementRef, class: &str) -> bool {
        self.node(element)
            .is_some_and(|n| n.classes.contains(class))
    }

    fn clear_children(&mut self, element: ElementRef) -> Result<(), HostError> {
        let children = std::mem::take(&mut self.node_mut(element)?.children);
        for child in children {
            self.release(child);
        }
        Ok(())
    }

    fn alert(&mut self, message: &str) {
        tracing::warn!(%message, "alert");
        self.alerts.push(message.to_string());
    }
}
