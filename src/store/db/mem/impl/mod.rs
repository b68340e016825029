mod event;
mod log;
mod record;
mod workflow;
