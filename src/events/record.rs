/// Per-record execution events. Timestamps are milliseconds.
#[derive(Debug, Clone)]
pub enum RecordEvent {
    Enrolled(i64),
    NodeEntered(i64),
    /// Record suspended; resumes at the given instant.
    Waiting(i64),
    /// One webhook attempt failed and will be retried.
    Retry,
    Completed(i64),
    Failed(String),
    Exited(String),
}

impl RecordEvent {
    pub fn str(&self) -> &str {
        match self {
            RecordEvent::Enrolled(_) => "Enrolled",
            RecordEvent::NodeEntered(_) => "NodeEntered",
            RecordEvent::Waiting(_) => "Waiting",
            RecordEvent::Retry => "Retry",
            RecordEvent::Completed(_) => "Completed",
            RecordEvent::Failed(_) => "Failed",
            RecordEvent::Exited(_) => "Exited",
        }
    }
}
