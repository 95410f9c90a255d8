//! E2E: publishing, installing, enabling, upgrading, and removing an
//! extension in a colony.

use colony_network::colony_sig;
use colony_tests::{actor, World};
use colony_types::{Address, CallData, ColonyRole, DomainId, ErrorCode, ExtensionId, RoleSet, Token, Version};

const PAYMENT: &str = "OneTxPayment";

fn payment_roles() -> RoleSet {
    RoleSet::from_roles(&[ColonyRole::Funding, ColonyRole::Administration])
}

fn administration() -> RoleSet {
    RoleSet::from_roles(&[ColonyRole::Administration])
}

fn has_role(w: &mut World, colony: Address, user: Address, domain: u64, role: ColonyRole) -> bool {
    let call = CallData::new(
        colony_sig::HAS_USER_ROLE,
        vec![Token::from(user), Token::from(domain), Token::from(role as u64)],
    );
    w.net.static_call(colony, &call).unwrap() == vec![Token::from(true)]
}

#[test]
fn non_root_installs_latest_only() {
    let mut w = World::new().unwrap();
    let admin = actor("admin");
    let second = w.net.create_colony(w.owner, actor("token-2")).unwrap();
    w.set_roles(w.colony, admin, administration()).unwrap();
    w.set_roles(second, admin, administration()).unwrap();

    // With versions 1 and 2 published, 2 is the latest.
    let id = w.publish_extension(PAYMENT, 2, payment_roles()).unwrap();
    w.net.install_extension(admin, w.colony, id, Version(2)).unwrap();

    // Once 3 exists, 2 and 1 are root-only.
    w.publish_extension(PAYMENT, 3, payment_roles()).unwrap();
    let err = w.net.install_extension(admin, second, id, Version(2)).unwrap_err();
    assert_eq!(err.code(), ErrorCode::RootOrLatestOnly);
    let err = w.net.install_extension(admin, second, id, Version(1)).unwrap_err();
    assert_eq!(err.code(), ErrorCode::RootOrLatestOnly);

    w.net.install_extension(w.owner, second, id, Version(1)).unwrap();
    assert_eq!(w.net.installed_extension_version(id, second).unwrap(), Version(1));
    assert_eq!(w.net.installed_extension_version(id, w.colony).unwrap(), Version(2));
}

#[test]
fn outsiders_cannot_install() {
    let mut w = World::new().unwrap();
    let id = w.publish_extension(PAYMENT, 1, payment_roles()).unwrap();
    let err = w
        .net
        .install_extension(actor("mallory"), w.colony, id, Version(1))
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::Authorization);
    assert_eq!(w.net.extension_installation(id, w.colony), None);
}

#[test]
fn one_installation_per_colony() {
    let mut w = World::new().unwrap();
    let id = w.publish_extension(PAYMENT, 1, payment_roles()).unwrap();
    w.net.install_extension(w.owner, w.colony, id, Version(1)).unwrap();
    let err = w.net.install_extension(w.owner, w.colony, id, Version(1)).unwrap_err();
    assert_eq!(err.code(), ErrorCode::AlreadyInstalled);
}

#[test]
fn unknown_version_is_bad_version() {
    let mut w = World::new().unwrap();
    let id = w.publish_extension(PAYMENT, 1, payment_roles()).unwrap();
    let err = w.net.install_extension(w.owner, w.colony, id, Version(4)).unwrap_err();
    assert_eq!(err.code(), ErrorCode::BadVersion);
}

#[test]
fn enable_and_disable_move_roles() {
    let mut w = World::new().unwrap();
    let id = w.publish_extension(PAYMENT, 1, payment_roles()).unwrap();
    let instance = w.net.install_extension(w.owner, w.colony, id, Version(1)).unwrap();
    let colony = w.colony;

    w.net.enable_extension(w.owner, colony, id, DomainId(1)).unwrap();
    assert!(has_role(&mut w, colony, instance, 1, ColonyRole::Funding));
    assert!(has_role(&mut w, colony, instance, 1, ColonyRole::Administration));
    assert!(!has_role(&mut w, colony, instance, 1, ColonyRole::Root));

    w.net.disable_extension(w.owner, colony, id, DomainId(1)).unwrap();
    assert!(!has_role(&mut w, colony, instance, 1, ColonyRole::Funding));
}

#[test]
fn enable_checks_domains() {
    let mut w = World::new().unwrap();
    let colony = w.colony;
    let payment = w.publish_extension(PAYMENT, 1, payment_roles()).unwrap();
    let governor = w
        .publish_extension("Governor", 1, RoleSet::from_roles(&[ColonyRole::Root]))
        .unwrap();
    w.net.install_extension(w.owner, colony, payment, Version(1)).unwrap();
    w.net.install_extension(w.owner, colony, governor, Version(1)).unwrap();

    let err = w.net.enable_extension(w.owner, colony, payment, DomainId(2)).unwrap_err();
    assert_eq!(err.code(), ErrorCode::DomainNotFound);

    w.net
        .call(w.owner, colony, &CallData::bare(colony_sig::ADD_DOMAIN))
        .unwrap();
    w.net.enable_extension(w.owner, colony, payment, DomainId(2)).unwrap();

    // Root-bearing extensions stay in the top-level domain.
    let err = w.net.enable_extension(w.owner, colony, governor, DomainId(2)).unwrap_err();
    assert_eq!(err.code(), ErrorCode::DomainNotAllowedForRole);
    w.net.enable_extension(w.owner, colony, governor, DomainId(1)).unwrap();
}

#[test]
fn deprecated_extensions_cannot_be_enabled() {
    let mut w = World::new().unwrap();
    let id = w.publish_extension(PAYMENT, 1, payment_roles()).unwrap();
    let colony = w.colony;
    w.net.install_extension(w.owner, colony, id, Version(1)).unwrap();
    w.net.deprecate_extension(w.owner, colony, id, true).unwrap();

    let err = w.net.enable_extension(w.owner, colony, id, DomainId(1)).unwrap_err();
    assert_eq!(err.code(), ErrorCode::ExtensionDeprecated);

    w.net.deprecate_extension(w.owner, colony, id, false).unwrap();
    w.net.enable_extension(w.owner, colony, id, DomainId(1)).unwrap();
}

#[test]
fn upgrades_step_by_one() {
    let mut w = World::new().unwrap();
    let id = w.publish_extension(PAYMENT, 3, payment_roles()).unwrap();
    let colony = w.colony;
    let instance = w.net.install_extension(w.owner, colony, id, Version(1)).unwrap();

    let err = w.net.upgrade_extension(w.owner, colony, id, Version(3)).unwrap_err();
    assert_eq!(err.code(), ErrorCode::BadIncrement);

    w.net.upgrade_extension(w.owner, colony, id, Version(2)).unwrap();
    w.net.upgrade_extension(w.owner, colony, id, Version(3)).unwrap();
    assert_eq!(w.net.installed_extension_version(id, colony).unwrap(), Version(3));
    // The instance keeps its address across upgrades.
    assert_eq!(w.net.extension_installation(id, colony), Some(instance));

    let err = w.net.upgrade_extension(w.owner, colony, id, Version(4)).unwrap_err();
    assert_eq!(err.code(), ErrorCode::BadVersion);
}

#[test]
fn upgrade_needs_root() {
    let mut w = World::new().unwrap();
    let admin = actor("admin");
    w.set_roles(w.colony, admin, administration()).unwrap();
    let id = w.publish_extension(PAYMENT, 2, payment_roles()).unwrap();
    w.net.install_extension(w.owner, w.colony, id, Version(1)).unwrap();

    let err = w.net.upgrade_extension(admin, w.colony, id, Version(2)).unwrap_err();
    assert_eq!(err.code(), ErrorCode::Authorization);
}

#[test]
fn uninstall_sweeps_balance_and_allows_reinstall() {
    let mut w = World::new().unwrap();
    let id = w.publish_extension(PAYMENT, 1, payment_roles()).unwrap();
    let colony = w.colony;
    let instance = w.net.install_extension(w.owner, colony, id, Version(1)).unwrap();
    w.net.credit(instance, 500);

    let swept = w.net.uninstall_extension(w.owner, colony, id).unwrap();
    assert_eq!(swept, 500);
    assert_eq!(w.net.balance(&colony), 500);
    assert_eq!(w.net.balance(&instance), 0);
    assert_eq!(w.net.extension_installation(id, colony), None);
    assert!(!w.net.ledger().contains(&instance));

    let err = w.net.uninstall_extension(w.owner, colony, id).unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotInstalled);

    let again = w.net.install_extension(w.owner, colony, id, Version(1)).unwrap();
    assert_ne!(again, instance);
}

#[test]
fn colony_in_recovery_blocks_lifecycle() {
    let mut w = World::new().unwrap();
    let id = w.publish_extension(PAYMENT, 1, payment_roles()).unwrap();
    let colony = w.colony;
    w.net.enter_recovery(w.owner, colony).unwrap();

    let err = w.net.install_extension(w.owner, colony, id, Version(1)).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InRecoveryMode);
}

#[test]
fn identifiers_are_name_hashes() {
    let mut w = World::new().unwrap();
    let id = w.publish_extension(PAYMENT, 1, RoleSet::EMPTY).unwrap();
    assert_eq!(id, ExtensionId::from_name(PAYMENT));
    assert_eq!(w.net.extension_latest_version(id), Version(1));
    assert_eq!(w.net.extension_latest_version(ExtensionId::from_name("Other")), Version(0));
}
