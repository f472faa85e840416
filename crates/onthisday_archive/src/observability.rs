use serde::Serialize;

use crate::store::ArchiveStore;

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct Health {
    pub ready: bool,
    pub sports: usize,
    pub events: usize,
}

impl Health {
    /// Readiness means the store answers; an empty archive is still ready.
    pub async fn probe(store: &dyn ArchiveStore) -> Self {
        match (store.list_sports().await, store.list_events().await) {
            (Ok(sports), Ok(events)) => Self {
                ready: true,
                sports: sports.len(),
                events: events.len(),
            },
            _ => Self {
                ready: false,
                sports: 0,
                events: 0,
            },
        }
    }
}
