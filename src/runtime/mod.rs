//! Record execution runtime.
//!
//! [`ExecutionRecord`] is the persisted per-contact state, [`Executor`]
//! steps records through a compiled workflow, and [`Channel`] fans
//! execution events and logs out to subscribers.

mod channel;
mod executor;
mod record;

pub use channel::{Channel, ChannelEvent, ChannelOptions, FlowEventHandle, FlowEventHandleAsync, FlowLogHandle, FlowLogHandleAsync};
pub use executor::Executor;
pub use record::{ExecutionRecord, HistoryEntry, RecordId, RecordStatus};
