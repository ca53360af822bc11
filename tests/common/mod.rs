use amity::application_impl::RealRelationshipService;
use amity::application_port::RelationshipService;
use amity::domain_model::UserId;
use amity::domain_port::{RelationshipRepo, TxManager};
use amity::infra_memory::{GraphStore, MemoryRelationshipRepo, MemoryTxManager};
use std::sync::Arc;

pub struct Harness {
    pub service: Arc<dyn RelationshipService>,
    pub repo: Arc<dyn RelationshipRepo>,
}

/// Fresh service wired to a fresh in-memory store, through the same ports
/// production wiring uses.
pub fn harness() -> Harness {
    let store = Arc::new(GraphStore::new());
    let repo: Arc<dyn RelationshipRepo> = Arc::new(MemoryRelationshipRepo::new(store.clone()));
    let tx_manager: Arc<dyn TxManager> = Arc::new(MemoryTxManager::new(store));
    let service: Arc<dyn RelationshipService> =
        Arc::new(RealRelationshipService::new(repo.clone(), tx_manager));

    Harness { service, repo }
}

pub fn user() -> UserId {
    UserId(uuid::Uuid::new_v4())
}

/// Committed-state invariants for one pair: friendship is symmetric, and the
/// pair is never simultaneously friends and pending in either direction.
pub async fn assert_pair_invariants(repo: &Arc<dyn RelationshipRepo>, a: UserId, b: UserId) {
    let rec_a = repo.get_record(a).await.unwrap();
    let rec_b = repo.get_record(b).await.unwrap();

    let a_lists_b = rec_a.as_ref().is_some_and(|r| r.is_friend(b));
    let b_lists_a = rec_b.as_ref().is_some_and(|r| r.is_friend(a));
    assert_eq!(a_lists_b, b_lists_a, "friendship must be symmetric");

    if a_lists_b {
        assert!(
            !rec_a.as_ref().unwrap().has_outgoing(b),
            "friends must have no pending request a -> b"
        );
        assert!(
            !rec_b.as_ref().unwrap().has_outgoing(a),
            "friends must have no pending request b -> a"
        );
    }
}

/// Number of pending requests between the two users, counting both
/// directions.
pub async fn pending_between(repo: &Arc<dyn RelationshipRepo>, a: UserId, b: UserId) -> usize {
    let rec_a = repo.get_record(a).await.unwrap();
    let rec_b = repo.get_record(b).await.unwrap();

    let mut pending = 0;
    if rec_a.is_some_and(|r| r.has_outgoing(b)) {
        pending += 1;
    }
    if rec_b.is_some_and(|r| r.has_outgoing(a)) {
        pending += 1;
    }
    pending
}
