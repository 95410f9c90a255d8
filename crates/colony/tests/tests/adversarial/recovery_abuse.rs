//! Adversarial test: recovery powers stay with the right people and the
//! right contract.

use colony_tests::{actor, World};
use colony_types::{ErrorCode, ReputationLogEntry, Slot, Word};

#[test]
fn double_approval_rejected() {
    let mut w = World::new().unwrap();
    let colony = w.colony;
    w.guardians(colony, &["alice", "bob"]).unwrap();
    w.net.enter_recovery(w.owner, colony).unwrap();

    w.net.approve_exit(actor("alice"), colony).unwrap();
    let err = w.net.approve_exit(actor("alice"), colony).unwrap_err();
    assert_eq!(err.code(), ErrorCode::AlreadyApproved);
    assert_eq!(w.net.approval_count(&colony).unwrap(), 1);

    // A single voter still cannot carry a three-role quorum.
    let err = w.net.exit_recovery(actor("alice"), colony, None).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InsufficientApprovals);
}

#[test]
fn outsiders_have_no_recovery_powers() {
    let mut w = World::new().unwrap();
    let colony = w.colony;
    let mallory = actor("mallory");

    let err = w.net.enter_recovery(mallory, colony).unwrap_err();
    assert_eq!(err.code(), ErrorCode::Authorization);
    let err = w.net.set_recovery_role(mallory, colony, mallory).unwrap_err();
    assert_eq!(err.code(), ErrorCode::Authorization);

    w.net.enter_recovery(w.owner, colony).unwrap();
    let err = w
        .net
        .edit_slot(mallory, colony, Slot::index(40), Word::from_u64(1))
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::Authorization);
    let err = w.net.approve_exit(mallory, colony).unwrap_err();
    assert_eq!(err.code(), ErrorCode::Authorization);
    let err = w.net.exit_recovery(mallory, colony, None).unwrap_err();
    assert_eq!(err.code(), ErrorCode::Authorization);
}

#[test]
fn guardianship_does_not_cross_contracts() {
    let mut w = World::new().unwrap();
    let colony = w.colony;
    let other = w.net.create_colony(actor("founder"), actor("tkn")).unwrap();
    w.guardians(colony, &["alice"]).unwrap();

    let err = w.net.enter_recovery(actor("alice"), other).unwrap_err();
    assert_eq!(err.code(), ErrorCode::Authorization);
    assert!(!w.net.is_in_recovery(&other).unwrap());

    // One colony in recovery leaves the others running.
    w.net.enter_recovery(actor("alice"), colony).unwrap();
    assert!(!w.net.is_in_recovery(&other).unwrap());
    assert!(!w.net.is_in_recovery(&w.net.address()).unwrap());
}

#[test]
fn replacement_log_needs_network_guardian() {
    let mut w = World::new().unwrap();
    let network = w.net.address();
    let cycle = actor("mining-cycle");
    let entry = ReputationLogEntry {
        user: actor("worker"),
        amount: 1_000,
        skill_id: 3,
        colony: w.colony,
        n_updates: 4,
        n_previous_updates: 12,
    };

    // A colony guardian is not a network guardian.
    let colony = w.colony;
    w.guardians(colony, &["alice"]).unwrap();
    w.net.set_recovery_role(w.owner, network, w.owner).unwrap();
    w.net.enter_recovery(w.owner, network).unwrap();

    let err = w
        .net
        .set_replacement_log_entry(actor("alice"), cycle, 0, &entry)
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::Authorization);
    assert_eq!(w.net.replacement_log_entry(cycle, 0), None);

    w.net.set_replacement_log_entry(w.owner, cycle, 0, &entry).unwrap();
    assert_eq!(w.net.replacement_log_entry(cycle, 0), Some(entry));
}

#[test]
fn replacement_log_is_network_only() {
    let mut w = World::new().unwrap();
    let colony = w.colony;
    w.net.enter_recovery(w.owner, colony).unwrap();
    let entry = ReputationLogEntry {
        user: actor("worker"),
        amount: -1,
        skill_id: 1,
        colony,
        n_updates: 1,
        n_previous_updates: 0,
    };
    // Colony recovery cannot reach the network's log.
    let err = w
        .net
        .set_replacement_log_entry(w.owner, actor("cycle"), 0, &entry)
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotInRecoveryMode);
}

#[test]
fn self_removal_blocked_in_recovery() {
    let mut w = World::new().unwrap();
    let colony = w.colony;
    w.net.enter_recovery(w.owner, colony).unwrap();
    let err = w.net.remove_recovery_role(w.owner, colony, w.owner).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InRecoveryMode);
    assert!(w.net.has_recovery_role(&colony, &w.owner).unwrap());
}
