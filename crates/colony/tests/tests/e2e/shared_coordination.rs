//! E2E: guardians acting from separate tasks against one shared network.

use colony_network::{NetworkResult, SharedNetwork};
use colony_tests::{actor, World};
use colony_types::{Address, ErrorCode, Slot, Version, Word};

async fn shared_world(guardians: &[&str]) -> (SharedNetwork, Address, Address) {
    let mut w = World::new().unwrap();
    w.add_colony_versions(2).unwrap();
    let colony = w.colony;
    w.guardians(colony, guardians).unwrap();
    (SharedNetwork::new(w.net), w.owner, colony)
}

#[tokio::test]
async fn parallel_guardians_reach_quorum() {
    let names = ["g1", "g2", "g3", "g4"];
    let (shared, owner, colony) = shared_world(&names).await;
    shared
        .transact(|net| net.enter_recovery(owner, colony))
        .await
        .unwrap();

    let handles: Vec<_> = names
        .iter()
        .map(|name| {
            let shared = shared.clone();
            let who = actor(name);
            tokio::spawn(async move { shared.transact(|net| net.approve_exit(who, colony)).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    // Five roles (owner included), four approvals.
    let (roles, approvals) = shared
        .read(|net| -> NetworkResult<(u64, u64)> {
            Ok((net.num_recovery_roles(&colony)?, net.approval_count(&colony)?))
        })
        .await
        .unwrap();
    assert_eq!((roles, approvals), (5, 4));

    shared
        .transact(|net| net.exit_recovery(actor("g1"), colony, Some(Version(2))))
        .await
        .unwrap();
    let version = shared.transact(|net| net.colony_version(colony)).await.unwrap();
    assert_eq!(version, Version(2));
}

#[tokio::test]
async fn racing_double_approval_counts_once() {
    let (shared, owner, colony) = shared_world(&["g1", "g2"]).await;
    shared
        .transact(|net| net.enter_recovery(owner, colony))
        .await
        .unwrap();

    let g1 = actor("g1");
    let a = {
        let shared = shared.clone();
        tokio::spawn(async move { shared.transact(|net| net.approve_exit(g1, colony)).await })
    };
    let b = {
        let shared = shared.clone();
        tokio::spawn(async move { shared.transact(|net| net.approve_exit(g1, colony)).await })
    };
    let results = [a.await.unwrap(), b.await.unwrap()];

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    let rejected = results.iter().find_map(|r| r.as_ref().err()).map(|e| e.code());
    assert_eq!(rejected, Some(ErrorCode::AlreadyApproved));
    assert_eq!(shared.read(|net| net.approval_count(&colony)).await.unwrap(), 1);
}

#[tokio::test]
async fn edit_racing_approvals_resets_the_round() {
    let (shared, owner, colony) = shared_world(&["g1", "g2"]).await;
    shared
        .transact(|net| -> NetworkResult<()> {
            net.enter_recovery(owner, colony)?;
            net.approve_exit(actor("g1"), colony)?;
            net.approve_exit(actor("g2"), colony)
        })
        .await
        .unwrap();

    let editor = {
        let shared = shared.clone();
        tokio::spawn(async move {
            shared
                .transact(|net| net.edit_slot(owner, colony, Slot::index(40), Word::from_u64(3)))
                .await
        })
    };
    editor.await.unwrap().unwrap();

    let err = shared
        .transact(|net| net.exit_recovery(owner, colony, None))
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::InsufficientApprovals);
}
