//! E2E: a colony's guardians repair state and vote it back to normal mode.

use colony_network::NetworkError;
use colony_tests::{actor, World};
use colony_types::{ErrorCode, Slot, Word};

/// Owner plus two guardians: three recovery roles.
fn three_guardians() -> World {
    let mut w = World::new().unwrap();
    let colony = w.colony;
    w.guardians(colony, &["alice", "bob"]).unwrap();
    assert_eq!(w.net.num_recovery_roles(&colony).unwrap(), 3);
    w
}

#[test]
fn edit_then_exit_with_two_of_three() {
    let mut w = three_guardians();
    let (colony, alice, bob) = (w.colony, actor("alice"), actor("bob"));
    let value = Word::from_hex("0xdeadbeef").unwrap();

    w.net.enter_recovery(alice, colony).unwrap();
    w.net.edit_slot(alice, colony, Slot::index(5), value).unwrap();

    w.net.approve_exit(alice, colony).unwrap();
    let err = w.net.exit_recovery(alice, colony, None).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InsufficientApprovals);

    w.net.approve_exit(bob, colony).unwrap();
    w.net.exit_recovery(bob, colony, None).unwrap();

    assert!(!w.net.is_in_recovery(&colony).unwrap());
    assert_eq!(w.net.read_slot(&colony, &Slot::index(5)).unwrap(), value);
}

#[test]
fn zero_and_one_approvals_are_not_enough() {
    let mut w = three_guardians();
    let colony = w.colony;
    w.net.enter_recovery(w.owner, colony).unwrap();

    assert_eq!(
        w.net.exit_recovery(w.owner, colony, None).unwrap_err().code(),
        ErrorCode::InsufficientApprovals
    );
    w.net.approve_exit(w.owner, colony).unwrap();
    assert_eq!(
        w.net.exit_recovery(w.owner, colony, None).unwrap_err().code(),
        ErrorCode::InsufficientApprovals
    );
    w.net.approve_exit(actor("bob"), colony).unwrap();
    w.net.exit_recovery(w.owner, colony, None).unwrap();
}

#[test]
fn approvals_reset_on_next_entry() {
    let mut w = three_guardians();
    let colony = w.colony;
    w.net.enter_recovery(w.owner, colony).unwrap();
    w.net.approve_exit(w.owner, colony).unwrap();
    w.net.approve_exit(actor("alice"), colony).unwrap();
    w.net.exit_recovery(w.owner, colony, None).unwrap();

    w.net.enter_recovery(w.owner, colony).unwrap();
    assert_eq!(w.net.approval_count(&colony).unwrap(), 0);
    // Last episode's approvals do not carry over.
    w.net.approve_exit(w.owner, colony).unwrap();
    assert_eq!(w.net.approval_count(&colony).unwrap(), 1);
}

#[test]
fn edits_invalidate_gathered_approvals() {
    let mut w = three_guardians();
    let colony = w.colony;
    w.net.enter_recovery(w.owner, colony).unwrap();
    w.net.approve_exit(w.owner, colony).unwrap();
    w.net.approve_exit(actor("alice"), colony).unwrap();

    w.net
        .edit_slot(actor("bob"), colony, Slot::index(40), Word::from_u64(1))
        .unwrap();
    assert_eq!(w.net.approval_count(&colony).unwrap(), 0);
    assert!(w.net.exit_recovery(w.owner, colony, None).is_err());
}

#[test]
fn protected_slot_rejected_even_with_full_quorum() {
    let mut w = three_guardians();
    let colony = w.colony;
    w.net.enter_recovery(w.owner, colony).unwrap();
    for who in [w.owner, actor("alice"), actor("bob")] {
        w.net.approve_exit(who, colony).unwrap();
    }

    let err = w
        .net
        .edit_slot(w.owner, colony, Slot::index(0), Word::from_u64(1))
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::ProtectedVariable);
    // The rejected edit did not reset the round.
    assert_eq!(w.net.approval_count(&colony).unwrap(), 3);
}

#[test]
fn role_changes_frozen_during_recovery() {
    let mut w = three_guardians();
    let colony = w.colony;
    w.net.enter_recovery(w.owner, colony).unwrap();

    let err = w.net.set_recovery_role(w.owner, colony, actor("carol")).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InRecoveryMode);
    let err = w.net.remove_recovery_role(w.owner, colony, w.owner).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InRecoveryMode);
    assert_eq!(w.net.num_recovery_roles(&colony).unwrap(), 3);
}

#[test]
fn recovery_entry_points_need_recovery_mode() {
    let mut w = three_guardians();
    let colony = w.colony;
    assert_eq!(
        w.net.approve_exit(w.owner, colony).unwrap_err().code(),
        ErrorCode::NotInRecoveryMode
    );
    assert_eq!(
        w.net
            .edit_slot(w.owner, colony, Slot::index(40), Word::from_u64(1))
            .unwrap_err()
            .code(),
        ErrorCode::NotInRecoveryMode
    );
    assert!(matches!(
        w.net.exit_recovery(w.owner, colony, None).unwrap_err(),
        NetworkError::Recovery(_)
    ));
}

#[test]
fn removed_guardian_cannot_enter() {
    let mut w = three_guardians();
    let colony = w.colony;
    w.net.remove_recovery_role(w.owner, colony, actor("bob")).unwrap();
    assert_eq!(w.net.num_recovery_roles(&colony).unwrap(), 2);
    assert_eq!(
        w.net.enter_recovery(actor("bob"), colony).unwrap_err().code(),
        ErrorCode::Authorization
    );
}

#[test]
fn event_log_tells_the_story() {
    let mut w = three_guardians();
    let colony = w.colony;
    let since = w.net.events().last().map(|r| r.seq).unwrap_or(0);

    w.net.enter_recovery(w.owner, colony).unwrap();
    w.net
        .edit_slot(w.owner, colony, Slot::index(40), Word::from_u64(7))
        .unwrap();
    w.net.approve_exit(w.owner, colony).unwrap();
    w.net.approve_exit(actor("alice"), colony).unwrap();
    w.net.exit_recovery(w.owner, colony, None).unwrap();

    let names: Vec<&str> = w.net.events().since(since).map(|r| r.event.name()).collect();
    assert_eq!(
        names,
        vec![
            "recovery_mode_entered",
            "recovery_storage_slot_set",
            "recovery_mode_exit_approved",
            "recovery_mode_exit_approved",
            "recovery_mode_exited",
        ]
    );
    assert!(w.net.events().since(since).all(|r| r.source == colony));
}
