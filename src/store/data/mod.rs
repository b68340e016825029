mod event;
mod log;
mod record;
mod workflow;

pub use event::Event;
pub use log::Log;
pub use record::Record;
pub use workflow::Workflow;
