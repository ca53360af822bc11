use crate::application_port::{RelationError, RelationshipService};
use crate::domain_model::{RelationshipRecord, UserId};
use crate::domain_port::{RelationshipRepo, TxManager};
use std::sync::Arc;

pub struct RealRelationshipService {
    relationship_repo: Arc<dyn RelationshipRepo>,
    tx_manager: Arc<dyn TxManager>,
}

impl RealRelationshipService {
    pub fn new(
        relationship_repo: Arc<dyn RelationshipRepo>,
        tx_manager: Arc<dyn TxManager>,
    ) -> RealRelationshipService {
        RealRelationshipService {
            relationship_repo,
            tx_manager,
        }
    }
}

#[async_trait::async_trait]
impl RelationshipService for RealRelationshipService {
    async fn send_request(&self, actor: UserId, target: UserId) -> Result<(), RelationError> {
        if actor == target {
            return Err(RelationError::SelfRelation);
        }

        let mut tx = self
            .tx_manager
            .begin()
            .await
            .map_err(|e| RelationError::TxAborted(e.to_string()))?;

        // both records must exist before the precondition reads
        self.relationship_repo
            .ensure_record_in_tx(&mut *tx, actor)
            .await?;
        self.relationship_repo
            .ensure_record_in_tx(&mut *tx, target)
            .await?;

        let actor_rec = self
            .relationship_repo
            .get_record_in_tx(&mut *tx, actor)
            .await?
            .ok_or_else(|| RelationError::Store("record missing after upsert".to_string()))?;
        let target_rec = self
            .relationship_repo
            .get_record_in_tx(&mut *tx, target)
            .await?
            .ok_or_else(|| RelationError::Store("record missing after upsert".to_string()))?;

        // precondition checks against the snapshot; an early return drops
        // the transaction and aborts it
        if actor_rec.is_friend(target) {
            return Err(RelationError::AlreadyFriends);
        }
        if actor_rec.has_outgoing(target) {
            return Err(RelationError::RequestAlreadySent);
        }
        if target_rec.has_outgoing(actor) {
            return Err(RelationError::RequestAlreadyReceived);
        }

        self.relationship_repo
            .push_outgoing_in_tx(&mut *tx, actor, target)
            .await?;

        tx.commit()
            .await
            .map_err(|e| RelationError::TxAborted(e.to_string()))?;

        Ok(())
    }

    async fn cancel_request(&self, actor: UserId, target: UserId) -> Result<(), RelationError> {
        // single document, conditioned on presence: no transaction needed
        let matched = self.relationship_repo.pull_outgoing(actor, target).await?;
        if !matched {
            return Err(RelationError::NoPendingRequest);
        }

        Ok(())
    }

    async fn accept_request(&self, actor: UserId, target: UserId) -> Result<(), RelationError> {
        let mut tx = self
            .tx_manager
            .begin()
            .await
            .map_err(|e| RelationError::TxAborted(e.to_string()))?;

        // linearization point: only one accept/reject racing on the same
        // pending request can match this pull
        let matched = self
            .relationship_repo
            .pull_outgoing_in_tx(&mut *tx, target, actor)
            .await?;
        if !matched {
            return Err(RelationError::NoPendingRequest);
        }

        // guarded pushes keep the friend lists duplicate-free
        self.relationship_repo
            .push_friend_in_tx(&mut *tx, actor, target)
            .await?;
        self.relationship_repo
            .push_friend_in_tx(&mut *tx, target, actor)
            .await?;

        tx.commit()
            .await
            .map_err(|e| RelationError::TxAborted(e.to_string()))?;

        Ok(())
    }

    async fn reject_request(&self, actor: UserId, target: UserId) -> Result<(), RelationError> {
        // single document, conditioned on presence: no transaction needed
        let matched = self.relationship_repo.pull_outgoing(target, actor).await?;
        if !matched {
            return Err(RelationError::NoPendingRequest);
        }

        Ok(())
    }

    async fn end_friendship(&self, actor: UserId, target: UserId) -> Result<(), RelationError> {
        let mut tx = self
            .tx_manager
            .begin()
            .await
            .map_err(|e| RelationError::TxAborted(e.to_string()))?;

        // check both sides of the pair in one snapshot, then mutate both.
        // Two concurrent calls from opposite sides may both pass the check;
        // the pulls converge on the same not-friends state.
        let actor_rec = self
            .relationship_repo
            .get_record_in_tx(&mut *tx, actor)
            .await?;
        let target_rec = self
            .relationship_repo
            .get_record_in_tx(&mut *tx, target)
            .await?;

        let mutual = match (&actor_rec, &target_rec) {
            (Some(a), Some(t)) => a.is_friend(target) && t.is_friend(actor),
            _ => false,
        };
        if !mutual {
            return Err(RelationError::NoFriendship);
        }

        self.relationship_repo
            .pull_friend_in_tx(&mut *tx, actor, target)
            .await?;
        self.relationship_repo
            .pull_friend_in_tx(&mut *tx, target, actor)
            .await?;

        tx.commit()
            .await
            .map_err(|e| RelationError::TxAborted(e.to_string()))?;

        Ok(())
    }

    async fn validate_friendship(
        &self,
        actor: UserId,
        target: UserId,
    ) -> Result<(), RelationError> {
        match self.relationship_repo.get_record(actor).await? {
            Some(rec) if rec.is_friend(target) => Ok(()),
            _ => Err(RelationError::NoFriendship),
        }
    }

    async fn incoming_requests(
        &self,
        actor: UserId,
    ) -> Result<Vec<RelationshipRecord>, RelationError> {
        self.relationship_repo.find_requesters(actor).await
    }

    async fn list_friends(&self, actor: UserId) -> Result<Vec<UserId>, RelationError> {
        match self.relationship_repo.get_record(actor).await? {
            Some(rec) => Ok(rec.friends),
            None => Ok(Vec::new()),
        }
    }
}
