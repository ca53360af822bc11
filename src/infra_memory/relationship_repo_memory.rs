use super::util::downcast;
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use crate::infra_memory::GraphStore;
use std::sync::Arc;

pub struct MemoryRelationshipRepo {
    store: Arc<GraphStore>,
}

impl MemoryRelationshipRepo {
    pub fn new(store: Arc<GraphStore>) -> Self {
        MemoryRelationshipRepo { store }
    }
}

#[async_trait::async_trait]
impl RelationshipRepo for MemoryRelationshipRepo {
    async fn ensure_record_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        user: UserId,
    ) -> Result<(), RelationError> {
        let tx = downcast(tx);
        tx.stage(user);

        Ok(())
    }

    async fn get_record_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        user: UserId,
    ) -> Result<Option<RelationshipRecord>, RelationError> {
        let tx = downcast(tx);

        Ok(tx.read(user))
    }

    async fn push_outgoing_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        from: UserId,
        to: UserId,
    ) -> Result<(), RelationError> {
        let tx = downcast(tx);
        tx.stage(from).add_outgoing(to);

        Ok(())
    }

    async fn pull_outgoing_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        from: UserId,
        to: UserId,
    ) -> Result<bool, RelationError> {
        let tx = downcast(tx);

        Ok(tx.stage(from).remove_outgoing(to))
    }

    async fn push_friend_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        user: UserId,
        other: UserId,
    ) -> Result<(), RelationError> {
        let tx = downcast(tx);
        tx.stage(user).add_friend(other);

        Ok(())
    }

    async fn pull_friend_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        user: UserId,
        other: UserId,
    ) -> Result<(), RelationError> {
        let tx = downcast(tx);
        tx.stage(user).remove_friend(other);

        Ok(())
    }

    async fn pull_outgoing(&self, from: UserId, to: UserId) -> Result<bool, RelationError> {
        // serialize against open transactions, then mutate the one document
        let _latch = self.store.write_latch.lock().await;

        let matched = match self.store.docs.get_mut(&from) {
            Some(mut rec) => rec.remove_outgoing(to),
            None => false,
        };

        Ok(matched)
    }

    async fn get_record(
        &self,
        user: UserId,
    ) -> Result<Option<RelationshipRecord>, RelationError> {
        Ok(self.store.docs.get(&user).map(|rec| rec.value().clone()))
    }

    async fn find_requesters(
        &self,
        target: UserId,
    ) -> Result<Vec<RelationshipRecord>, RelationError> {
        let mut requesters: Vec<RelationshipRecord> = self
            .store
            .docs
            .iter()
            .filter(|entry| entry.value().has_outgoing(target))
            .map(|entry| entry.value().clone())
            .collect();

        // iteration order of the map is arbitrary; give callers a stable one
        requesters.sort_by_key(|rec| rec.user_id);

        Ok(requesters)
    }
}
