use crate::domain_model::{RelationshipRecord, UserId};
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// In-process document collection backing the relationship graph.
///
/// `docs` holds committed records. `write_latch` serializes writers: an open
/// transaction holds it for its whole lifetime, a single-document
/// conditional update takes it for one mutation. Plain reads go straight to
/// `docs` and observe committed state.
pub struct GraphStore {
    pub(crate) docs: DashMap<UserId, RelationshipRecord>,
    pub(crate) write_latch: Arc<Mutex<()>>,
}

impl GraphStore {
    pub fn new() -> GraphStore {
        GraphStore {
            docs: DashMap::new(),
            write_latch: Arc::new(Mutex::new(())),
        }
    }
}
