//! E2E: colony versions are registered in order and colonies move forward
//! one repoint at a time.

use colony_network::{colony_sig, NetworkError};
use colony_tests::{actor, World};
use colony_types::{CallData, ErrorCode, RoleSet, Token, Version};

#[test]
fn upgrade_to_any_newer_registered_version() {
    let mut w = World::new().unwrap();
    w.add_colony_versions(3).unwrap();
    assert_eq!(w.net.current_colony_version(), Version(3));

    // Skipping a version is allowed for colonies.
    w.net.upgrade_colony(w.owner, w.colony, Version(3)).unwrap();
    assert_eq!(w.net.colony_version(w.colony).unwrap(), Version(3));

    let out = w
        .net
        .static_call(w.colony, &CallData::bare(colony_sig::VERSION))
        .unwrap();
    assert_eq!(out, vec![Token::from(3u64)]);
}

#[test]
fn must_be_newer_and_registered() {
    let mut w = World::new().unwrap();
    w.add_colony_versions(2).unwrap();
    w.net.upgrade_colony(w.owner, w.colony, Version(2)).unwrap();

    let err = w.net.upgrade_colony(w.owner, w.colony, Version(2)).unwrap_err();
    assert_eq!(err.code(), ErrorCode::MustBeNewer);
    let err = w.net.upgrade_colony(w.owner, w.colony, Version(1)).unwrap_err();
    assert_eq!(err.code(), ErrorCode::MustBeNewer);
    let err = w.net.upgrade_colony(w.owner, w.colony, Version(9)).unwrap_err();
    assert_eq!(err.code(), ErrorCode::MustBeRegistered);
}

#[test]
fn upgrade_needs_colony_root() {
    let mut w = World::new().unwrap();
    w.add_colony_versions(2).unwrap();
    let admin = actor("admin");
    w.set_roles(w.colony, admin, RoleSet::from_roles(&[colony_types::ColonyRole::Administration]))
        .unwrap();

    let err = w.net.upgrade_colony(admin, w.colony, Version(2)).unwrap_err();
    assert_eq!(err.code(), ErrorCode::Authorization);
    assert_eq!(w.net.colony_version(w.colony).unwrap(), Version(1));
}

#[test]
fn version_numbers_come_from_the_bundle() {
    let mut w = World::new().unwrap();
    // A bundle that declares version 3 cannot be registered as version 2.
    let v3 = w.net.deploy_colony_version(Version(3), Vec::new()).unwrap();
    let err = w.net.add_colony_version(w.owner, v3).unwrap_err();
    assert_eq!(err.code(), ErrorCode::BadVersionOrder);
    assert_eq!(w.net.current_colony_version(), Version(1));
}

#[test]
fn only_meta_colony_root_registers_versions() {
    let mut w = World::new().unwrap();
    let v2 = w.net.deploy_colony_version(Version(2), Vec::new()).unwrap();
    let err = w.net.add_colony_version(actor("mallory"), v2).unwrap_err();
    assert_eq!(err.code(), ErrorCode::Authorization);
}

#[test]
fn new_colonies_start_at_current_version() {
    let mut w = World::new().unwrap();
    w.add_colony_versions(2).unwrap();
    let fresh = w.net.create_colony(actor("founder"), actor("tkn")).unwrap();
    assert_eq!(w.net.colony_version(fresh).unwrap(), Version(2));
    assert_eq!(w.net.colony_version(w.colony).unwrap(), Version(1));
}

#[test]
fn exit_recovery_with_upgrade() {
    let mut w = World::new().unwrap();
    w.add_colony_versions(2).unwrap();
    let colony = w.colony;
    w.net.enter_recovery(w.owner, colony).unwrap();

    // Upgrades through the ordinary path are locked out.
    let err = w.net.upgrade_colony(w.owner, colony, Version(2)).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InRecoveryMode);

    w.net.approve_exit(w.owner, colony).unwrap();
    let err = w.net.exit_recovery(w.owner, colony, Some(Version(5))).unwrap_err();
    assert_eq!(err.code(), ErrorCode::MustBeRegistered);
    assert!(w.net.is_in_recovery(&colony).unwrap());

    w.net.exit_recovery(w.owner, colony, Some(Version(2))).unwrap();
    assert!(!w.net.is_in_recovery(&colony).unwrap());
    assert_eq!(w.net.colony_version(colony).unwrap(), Version(2));
}

#[test]
fn exit_with_upgrade_is_colony_only() {
    let mut w = World::new().unwrap();
    w.add_colony_versions(2).unwrap();
    let id = w.publish_extension("OneTxPayment", 1, RoleSet::EMPTY).unwrap();
    let instance = w
        .net
        .install_extension(w.owner, w.colony, id, Version(1))
        .unwrap();

    let err = w.net.exit_recovery(w.owner, instance, Some(Version(2))).unwrap_err();
    assert!(matches!(err, NetworkError::NotAColony(a) if a == instance));
}
