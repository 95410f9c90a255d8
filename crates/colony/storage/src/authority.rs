//! Role checks over the header `roles` mapping.

use colony_types::{Address, ColonyRole, DomainId, RoleSet};

use crate::layout::header;
use crate::store::Storage;

pub fn roles_of(storage: &Storage, user: &Address, domain: DomainId) -> RoleSet {
    storage.get_entry(header::ROLES, &(*user, domain))
}

pub fn has_role(storage: &Storage, user: &Address, domain: DomainId, role: ColonyRole) -> bool {
    roles_of(storage, user, domain).contains(role)
}

/// Root in the top-level domain.
pub fn is_root(storage: &Storage, user: &Address) -> bool {
    has_role(storage, user, DomainId::ROOT, ColonyRole::Root)
}

/// Whether `user` holds any of `roles` in the top-level domain.
pub fn has_any_root_domain_role(storage: &Storage, user: &Address, roles: RoleSet) -> bool {
    roles_of(storage, user, DomainId::ROOT).0 & roles.0 != 0
}

pub fn grant(storage: &mut Storage, user: &Address, domain: DomainId, roles: RoleSet) -> RoleSet {
    let updated = roles_of(storage, user, domain).union(roles);
    storage.set_entry(header::ROLES, &(*user, domain), updated);
    updated
}

pub fn revoke(storage: &mut Storage, user: &Address, domain: DomainId, roles: RoleSet) -> RoleSet {
    let updated = roles_of(storage, user, domain).difference(roles);
    storage.set_entry(header::ROLES, &(*user, domain), updated);
    updated
}
