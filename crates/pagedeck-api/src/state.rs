use std::sync::{Arc, Mutex};

use pagedeck_db::Database;
use pagedeck_graph::GraphApi;
use pagedeck_types::api::{Flash, FlashLevel};

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Arc<Database>,
    pub graph: Arc<dyn GraphApi>,
    pub flashes: FlashQueue,
}

impl AppStateInner {
    pub fn new(db: Database, graph: Arc<dyn GraphApi>) -> Self {
        Self {
            db: Arc::new(db),
            graph,
            flashes: FlashQueue::default(),
        }
    }
}

/// Messages shown once on the next dashboard render.
#[derive(Default)]
pub struct FlashQueue {
    pending: Mutex<Vec<Flash>>,
}

impl FlashQueue {
    pub fn push(&self, level: FlashLevel, message: impl Into<String>) {
        let flash = Flash {
            level,
            message: message.into(),
        };
        self.pending
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(flash);
    }

    /// Take every pending message, oldest first.
    pub fn drain(&self) -> Vec<Flash> {
        std::mem::take(&mut *self.pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner()))
    }
}
