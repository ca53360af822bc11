use crate::domain_model::*;

#[derive(Debug, thiserror::Error)]
pub enum RelationError {
    #[error("cannot relate a user to themselves")]
    SelfRelation,
    #[error("friendship already established")]
    AlreadyFriends,
    #[error("friend request already sent")]
    RequestAlreadySent,
    #[error("friend request already received from the other user")]
    RequestAlreadyReceived,
    #[error("no such pending friend request")]
    NoPendingRequest,
    #[error("no mutual friendship exists")]
    NoFriendship,
    #[error("store error: {0}")]
    Store(String),
    #[error("transaction aborted: {0}")]
    TxAborted(String),
}

/// Friend-request lifecycle over the social graph.
///
/// Per ordered pair the states are NONE -> PENDING (`send_request`) ->
/// FRIENDS (`accept_request`); PENDING -> NONE via `cancel_request` /
/// `reject_request`; FRIENDS -> NONE via `end_friendship`. A rejected
/// operation leaves the graph completely unchanged.
#[async_trait::async_trait]
pub trait RelationshipService: Send + Sync {
    /// Open a pending request from `actor` to `target`.
    ///
    /// Fails when the two are already friends or a request is already
    /// pending in either direction. Creates both users' records on first
    /// contact.
    async fn send_request(&self, actor: UserId, target: UserId) -> Result<(), RelationError>;

    /// Withdraw a request previously sent by `actor` to `target`.
    async fn cancel_request(&self, actor: UserId, target: UserId) -> Result<(), RelationError>;

    /// Accept the request `target` sent to `actor`, establishing a
    /// symmetric friendship.
    async fn accept_request(&self, actor: UserId, target: UserId) -> Result<(), RelationError>;

    /// Decline the request `target` sent to `actor`.
    async fn reject_request(&self, actor: UserId, target: UserId) -> Result<(), RelationError>;

    /// Dissolve the mutual friendship between `actor` and `target`.
    ///
    /// Converges rather than elects a winner: two concurrent calls from
    /// opposite sides may both report success, and the committed state is
    /// not-friends on both records either way.
    async fn end_friendship(&self, actor: UserId, target: UserId) -> Result<(), RelationError>;

    /// Succeeds iff `target` is currently in `actor`'s friend list.
    async fn validate_friendship(
        &self,
        actor: UserId,
        target: UserId,
    ) -> Result<(), RelationError>;

    /// All records holding a pending request directed at `actor`.
    async fn incoming_requests(
        &self,
        actor: UserId,
    ) -> Result<Vec<RelationshipRecord>, RelationError>;

    /// Current friends of `actor`; empty when `actor` has no record yet.
    async fn list_friends(&self, actor: UserId) -> Result<Vec<UserId>, RelationError>;
}
