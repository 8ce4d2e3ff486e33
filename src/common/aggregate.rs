use crate::common::DomainEvent;

pub trait AggregateRoot {
    type Event: DomainEvent;

    fn aggregate_id(&self) -> &str;

    /// Number of events recorded since creation
    fn version(&self) -> u64;

    fn uncommitted_events(&self) -> &[Self::Event];

    /// Drain the uncommitted events, leaving the outbox empty
    fn take_uncommitted_events(&mut self) -> Vec<Self::Event>;

    fn add_event(&mut self, event: Self::Event);
}
