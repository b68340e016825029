use std::sync::Arc;

use tokio::runtime::Runtime;

use crate::{
    events::FlowEvent,
    runtime::Channel,
    store::{Store, data},
    utils,
};

/// Background subscriber that persists every event and log entry flowing
/// through the channel. Record state itself is persisted by the advance
/// tasks; the monitor only keeps the audit trail.
pub struct Monitor {
    store: Arc<Store>,
    channel: Arc<Channel>,

    runtime: Arc<Runtime>,
}

impl Monitor {
    pub fn new(
        store: Arc<Store>,
        channel: Arc<Channel>,
        runtime: Arc<Runtime>,
    ) -> Self {
        Self {
            store,
            channel,
            runtime,
        }
    }

    pub fn monitor(&self) {
        let store = self.store.clone();
        let channel = self.channel.clone();

        self.runtime.spawn(async move {
            let mut event_queue = channel.event_queue().subscribe();
            while let Ok(event_msg) = event_queue.recv().await {
                let event = &event_msg;
                let _ = store.events().create(&data::Event {
                    id: utils::longid(),
                    rid: event.rid.clone(),
                    wid: event.wid.clone(),
                    nid: event.nid.clone(),
                    name: match &event.event {
                        FlowEvent::Workflow(e) => e.str().to_string(),
                        FlowEvent::Record(e) => e.str().to_string(),
                    },
                    message: format!("{:?}", event.event),
                    timestamp: utils::time::time_millis(),
                });
            }
        });

        let store = self.store.clone();
        let channel = self.channel.clone();

        self.runtime.spawn(async move {
            let mut log_queue = channel.log_queue().subscribe();
            while let Ok(log_msg) = log_queue.recv().await {
                let log = &log_msg;
                let _ = store.logs().create(&data::Log {
                    id: utils::longid(),
                    rid: log.rid.clone(),
                    nid: log.nid.clone(),
                    content: log.content.clone(),
                    timestamp: log.timestamp,
                });
            }
        });
    }
}
