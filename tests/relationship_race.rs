mod common;

use amity::application_port::{RelationError, RelationshipService};
use amity::domain_model::UserId;
use common::*;
use futures_util::future::join_all;
use std::sync::Arc;
use tokio::sync::Barrier;

const ROUNDS: usize = 24;

async fn race<F1, F2>(first: F1, second: F2) -> Vec<Result<(), RelationError>>
where
    F1: std::future::Future<Output = Result<(), RelationError>> + Send + 'static,
    F2: std::future::Future<Output = Result<(), RelationError>> + Send + 'static,
{
    let gate = Arc::new(Barrier::new(2));
    let g1 = gate.clone();
    let g2 = gate;

    let t1 = tokio::spawn(async move {
        g1.wait().await;
        first.await
    });
    let t2 = tokio::spawn(async move {
        g2.wait().await;
        second.await
    });

    join_all([t1, t2])
        .await
        .into_iter()
        .map(|joined| joined.unwrap())
        .collect()
}

fn wins(outcomes: &[Result<(), RelationError>]) -> usize {
    outcomes.iter().filter(|r| r.is_ok()).count()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn mutual_request_race_has_exactly_one_winner() {
    for _ in 0..ROUNDS {
        let Harness { service, repo } = harness();
        let alice = user();
        let bob = user();

        let s1 = service.clone();
        let s2 = service.clone();
        let outcomes = race(
            async move { s1.send_request(alice, bob).await },
            async move { s2.send_request(bob, alice).await },
        )
        .await;

        assert_eq!(wins(&outcomes), 1, "outcomes: {outcomes:?}");
        for err in outcomes.iter().filter_map(|r| r.as_ref().err()) {
            assert!(
                matches!(err, RelationError::RequestAlreadyReceived),
                "loser saw: {err}"
            );
        }

        // exactly one pending direction, no friendship
        assert_eq!(pending_between(&repo, alice, bob).await, 1);
        assert!(service.validate_friendship(alice, bob).await.is_err());
        assert_pair_invariants(&repo, alice, bob).await;
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn accept_vs_reject_race_has_exactly_one_winner() {
    for _ in 0..ROUNDS {
        let Harness { service, repo } = harness();
        let alice = user();
        let bob = user();

        service.send_request(alice, bob).await.unwrap();

        let s1 = service.clone();
        let s2 = service.clone();
        let outcomes = race(
            async move { s1.accept_request(bob, alice).await },
            async move { s2.reject_request(bob, alice).await },
        )
        .await;

        assert_eq!(wins(&outcomes), 1, "outcomes: {outcomes:?}");
        for err in outcomes.iter().filter_map(|r| r.as_ref().err()) {
            assert!(
                matches!(err, RelationError::NoPendingRequest),
                "loser saw: {err}"
            );
        }

        // the request is consumed either way; friendship exists iff accept won
        assert_eq!(pending_between(&repo, alice, bob).await, 0);
        let accepted = outcomes[0].is_ok();
        assert_eq!(service.validate_friendship(alice, bob).await.is_ok(), accepted);
        assert_eq!(service.validate_friendship(bob, alice).await.is_ok(), accepted);
        assert_pair_invariants(&repo, alice, bob).await;
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn double_accept_race_commits_once() {
    for _ in 0..ROUNDS {
        let Harness { service, repo } = harness();
        let alice = user();
        let bob = user();

        service.send_request(alice, bob).await.unwrap();

        let s1 = service.clone();
        let s2 = service.clone();
        let outcomes = race(
            async move { s1.accept_request(bob, alice).await },
            async move { s2.accept_request(bob, alice).await },
        )
        .await;

        assert_eq!(wins(&outcomes), 1, "outcomes: {outcomes:?}");

        // no duplicate friend entries from the residual race
        let rec = repo.get_record(alice).await.unwrap().unwrap();
        assert_eq!(rec.friends, vec![bob]);
        let rec = repo.get_record(bob).await.unwrap().unwrap();
        assert_eq!(rec.friends, vec![alice]);
        assert_pair_invariants(&repo, alice, bob).await;
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn cancel_vs_accept_race_has_exactly_one_winner() {
    for _ in 0..ROUNDS {
        let Harness { service, repo } = harness();
        let alice = user();
        let bob = user();

        service.send_request(alice, bob).await.unwrap();

        let s1 = service.clone();
        let s2 = service.clone();
        let outcomes = race(
            async move { s1.cancel_request(alice, bob).await },
            async move { s2.accept_request(bob, alice).await },
        )
        .await;

        assert_eq!(wins(&outcomes), 1, "outcomes: {outcomes:?}");

        // consistent end state: friends iff the accept side won
        assert_eq!(pending_between(&repo, alice, bob).await, 0);
        let accepted = outcomes[1].is_ok();
        assert_eq!(service.validate_friendship(alice, bob).await.is_ok(), accepted);
        assert_pair_invariants(&repo, alice, bob).await;
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_end_friendship_converges() {
    for _ in 0..ROUNDS {
        let Harness { service, repo } = harness();
        let alice = user();
        let bob = user();

        service.send_request(alice, bob).await.unwrap();
        service.accept_request(bob, alice).await.unwrap();

        let s1 = service.clone();
        let s2 = service.clone();
        let outcomes = race(
            async move { s1.end_friendship(alice, bob).await },
            async move { s2.end_friendship(bob, alice).await },
        )
        .await;

        // idempotent convergence: one or both calls may succeed, the
        // committed state is not-friends regardless
        assert!(wins(&outcomes) >= 1, "outcomes: {outcomes:?}");
        for err in outcomes.iter().filter_map(|r| r.as_ref().err()) {
            assert!(
                matches!(err, RelationError::NoFriendship),
                "loser saw: {err}"
            );
        }

        assert!(service.validate_friendship(alice, bob).await.is_err());
        assert!(service.validate_friendship(bob, alice).await.is_err());
        assert_pair_invariants(&repo, alice, bob).await;
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn disjoint_pairs_proceed_independently() {
    let Harness { service, repo } = harness();

    let pairs: Vec<(UserId, UserId)> = (0..16).map(|_| (user(), user())).collect();

    let mut tasks = Vec::new();
    for (a, b) in pairs.clone() {
        let service: Arc<dyn RelationshipService> = service.clone();
        tasks.push(tokio::spawn(async move {
            service.send_request(a, b).await?;
            service.accept_request(b, a).await?;
            Ok::<(), RelationError>(())
        }));
    }

    for joined in join_all(tasks).await {
        joined.unwrap().unwrap();
    }

    for (a, b) in pairs {
        service.validate_friendship(a, b).await.unwrap();
        service.validate_friendship(b, a).await.unwrap();
        assert_pair_invariants(&repo, a, b).await;
    }
}
