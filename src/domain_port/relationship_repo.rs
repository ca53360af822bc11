use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::repo_tx::StorageTx;

/// Document collection holding one [`RelationshipRecord`] per user.
///
/// `_in_tx` methods operate on the transaction's snapshot and take effect at
/// commit. The remaining methods are single-document: the conditional pull
/// relies on the store's native atomic find-and-modify, and the reads return
/// committed state.
#[async_trait::async_trait]
pub trait RelationshipRepo: Send + Sync {
    /// Upsert a record with empty defaults so precondition reads see it.
    async fn ensure_record_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        user: UserId,
    ) -> Result<(), RelationError>;

    async fn get_record_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        user: UserId,
    ) -> Result<Option<RelationshipRecord>, RelationError>;

    /// Append `to` to `from`'s pending requests (guarded against duplicates).
    async fn push_outgoing_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        from: UserId,
        to: UserId,
    ) -> Result<(), RelationError>;

    /// Remove the pending request `from` -> `to`; reports whether it matched.
    async fn pull_outgoing_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        from: UserId,
        to: UserId,
    ) -> Result<bool, RelationError>;

    /// Add `other` to `user`'s friend list (guarded against duplicates).
    async fn push_friend_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        user: UserId,
        other: UserId,
    ) -> Result<(), RelationError>;

    /// Drop `other` from `user`'s friend list if present.
    async fn pull_friend_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        user: UserId,
        other: UserId,
    ) -> Result<(), RelationError>;

    /// Atomic single-document conditional pull of the request `from` -> `to`,
    /// outside any transaction; reports whether it matched.
    async fn pull_outgoing(&self, from: UserId, to: UserId) -> Result<bool, RelationError>;

    async fn get_record(
        &self,
        user: UserId,
    ) -> Result<Option<RelationshipRecord>, RelationError>;

    /// All records whose pending requests name `target`.
    async fn find_requesters(
        &self,
        target: UserId,
    ) -> Result<Vec<RelationshipRecord>, RelationError>;
}
