//! Drag gesture payloads and the drop-target state machine.

/// Payload type carrying a project id.
pub const TEXT_PLAIN: &str = "text/plain";

/// Transfer mode a drag source allows.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum DropEffect {
    #[default]
    None,
    Copy,
    Move,
    Link,
}

/// Data carried by a drag gesture: typed string payloads in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataTransfer {
    entries: Vec<(String, String)>,
    effect_allowed: DropEffect,
}

impl DataTransfer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `data` under `format`, replacing any earlier value of that type.
    pub fn set_data(&mut self, format: &str, data: impl Into<String>) {
        let data = data.into();
        match self.entries.iter_mut().find(|(f, _)| f == format) {
            Some(entry) => entry.1 = data,
            None => self.entries.push((format.to_string(), data)),
        }
    }

    pub fn get_data(&self, format: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(f, _)| f == format)
            .map(|(_, d)| d.as_str())
    }

    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(f, _)| f.as_str())
    }

    pub fn first_type(&self) -> Option<&str> {
        self.types().next()
    }

    pub fn effect_allowed(&self) -> DropEffect {
        self.effect_allowed
    }

    pub fn set_effect_allowed(&mut self, effect: DropEffect) {
        self.effect_allowed = effect;
    }
}

/// Drop-target gesture state.
///
/// `Idle -> DragHover` on an accepted drag-over; `DragHover -> Idle` on drop or
/// drag-leave. Entity status is untouched by this machine; only a drop asks the
/// store for a transition.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    DragHover,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_data_replaces_same_type_and_keeps_order() {
        let mut transfer = DataTransfer::new();
        transfer.set_data(TEXT_PLAIN, "a");
        transfer.set_data("text/uri-list", "b");
        transfer.set_data(TEXT_PLAIN, "c");

        assert_eq!(transfer.get_data(TEXT_PLAIN), Some("c"));
        assert_eq!(transfer.types().collect::<Vec<_>>(), vec![TEXT_PLAIN, "text/uri-list"]);
        assert_eq!(transfer.first_type(), Some(TEXT_PLAIN));
    }

    #[test]
    fn empty_transfer_has_no_types() {
        let transfer = DataTransfer::new();
        assert_eq!(transfer.first_type(), None);
        assert_eq!(transfer.get_data(TEXT_PLAIN), None);
        assert_eq!(transfer.effect_allowed(), DropEffect::None);
    }
}
