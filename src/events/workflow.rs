#[derive(Debug, Clone)]
pub enum WorkflowEvent {
    Deployed,
    Activated,
    Paused,
    Archived,
}

impl WorkflowEvent {
    pub fn str(&self) -> &str {
        match self {
            WorkflowEvent::Deployed => "Deployed",
            WorkflowEvent::Activated => "Activated",
            WorkflowEvent::Paused => "Paused",
            WorkflowEvent::Archived => "Archived",
        }
    }
}
