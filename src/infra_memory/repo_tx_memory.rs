use crate::domain_model::{RelationshipRecord, UserId};
use crate::domain_port::{StorageTx, TxManager};
use crate::infra_memory::GraphStore;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::OwnedMutexGuard;

pub struct MemoryTxManager {
    store: Arc<GraphStore>,
}

impl MemoryTxManager {
    pub fn new(store: Arc<GraphStore>) -> Self {
        MemoryTxManager { store }
    }
}

#[async_trait::async_trait]
impl TxManager for MemoryTxManager {
    async fn begin<'t>(&'t self) -> anyhow::Result<Box<dyn StorageTx<'t> + 't>> {
        let latch = self.store.write_latch.clone().lock_owned().await;
        Ok(Box::new(MemoryTx::new(self.store.clone(), latch)))
    }
}

/// A write transaction over [`GraphStore`].
///
/// Holds the store's write latch from `begin` until commit or abort, so
/// every read inside the transaction observes one consistent committed
/// state. Mutations stage a copy of the touched document; `commit`
/// publishes all staged documents, and dropping the transaction publishes
/// nothing.
pub struct MemoryTx {
    store: Arc<GraphStore>,
    staged: HashMap<UserId, RelationshipRecord>,
    _latch: OwnedMutexGuard<()>,
}

impl MemoryTx {
    fn new(store: Arc<GraphStore>, latch: OwnedMutexGuard<()>) -> Self {
        MemoryTx {
            store,
            staged: HashMap::new(),
            _latch: latch,
        }
    }

    /// Staged view first, committed state second.
    pub(crate) fn read(&self, user: UserId) -> Option<RelationshipRecord> {
        if let Some(rec) = self.staged.get(&user) {
            return Some(rec.clone());
        }
        self.store.docs.get(&user).map(|rec| rec.value().clone())
    }

    /// Copy-on-first-touch handle for mutation. Creates the document with
    /// empty defaults when it does not exist yet (upsert semantics).
    pub(crate) fn stage(&mut self, user: UserId) -> &mut RelationshipRecord {
        let docs = &self.store.docs;
        self.staged
            .entry(user)
            .or_insert_with(|| match docs.get(&user) {
                Some(rec) => rec.value().clone(),
                None => RelationshipRecord::new(user),
            })
    }
}

#[async_trait::async_trait]
impl<'t> StorageTx<'t> for MemoryTx {
    async fn commit(self: Box<Self>) -> anyhow::Result<()> {
        let tx = *self;
        for (user, rec) in tx.staged {
            tx.store.docs.insert(user, rec);
        }
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> anyhow::Result<()> {
        Ok(())
    }
}
