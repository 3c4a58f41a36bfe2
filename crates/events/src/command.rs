use projboard_core::AggregateId;

/// A command targets a specific aggregate.
///
/// Commands represent **intent** (e.g. "move project X to Finished"). They are
/// transient and are turned into events by the aggregate that handles them.
/// A command that would change nothing yields no events rather than an error.
pub trait Command: Clone + core::fmt::Debug + Send + Sync + 'static {
    fn target_aggregate_id(&self) -> AggregateId;
}
