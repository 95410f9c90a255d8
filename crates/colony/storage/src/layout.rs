//! The frozen slot numbering for every contract family.
//!
//! Slots 0..=6 form a header shared by all families. Family-specific fields
//! start at [`header::FIRST_FAMILY_SLOT`]. Once a version ships, existing
//! numbers never move; new fields are appended.

use serde::{Deserialize, Serialize};
use std::fmt;

use colony_types::{Slot, Word};

use crate::value::SlotValue;

/// Contract families. Each has its own layout and protected set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Family {
    Network,
    Colony,
    Extension,
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Family::Network => write!(f, "network"),
            Family::Colony => write!(f, "colony"),
            Family::Extension => write!(f, "extension"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Scalar,
    Mapping,
}

/// Documentation row for one slot in a layout.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct FieldInfo {
    pub index: u64,
    pub name: &'static str,
    pub kind: FieldKind,
}

/// A contract family's frozen layout.
///
/// `protected_slots` can never be edited directly. For `protected_mappings`
/// every entry is protected; the base slot itself holds no data and is
/// protected only if it is also listed in `protected_slots`.
#[derive(Debug, Serialize)]
pub struct Layout {
    pub family: Family,
    pub protected_slots: &'static [u64],
    pub protected_mappings: &'static [u64],
    pub fields: &'static [FieldInfo],
}

impl Layout {
    pub fn is_protected(&self, slot: &Slot) -> bool {
        match slot {
            Slot::Index(n) => self.protected_slots.contains(n),
            Slot::Entry { base, .. } => self.protected_mappings.contains(base),
        }
    }

    pub fn field(&self, index: u64) -> Option<&FieldInfo> {
        self.fields.iter().find(|f| f.index == index)
    }
}

pub fn layout_for(family: Family) -> &'static Layout {
    match family {
        Family::Network => &network::LAYOUT,
        Family::Colony => &colony::LAYOUT,
        Family::Extension => &extension::LAYOUT,
    }
}

/// Recovery bookkeeping packed into header slot 3.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RecoveryHeader {
    pub in_recovery: bool,
    pub role_count: u64,
    pub approval_count: u64,
}

impl SlotValue for RecoveryHeader {
    fn to_word(&self) -> Word {
        let mut out = [0u8; 32];
        out[15] = self.in_recovery as u8;
        out[16..24].copy_from_slice(&self.role_count.to_be_bytes());
        out[24..32].copy_from_slice(&self.approval_count.to_be_bytes());
        Word(out)
    }

    fn from_word(word: &Word) -> Self {
        let mut roles = [0u8; 8];
        let mut approvals = [0u8; 8];
        roles.copy_from_slice(&word.0[16..24]);
        approvals.copy_from_slice(&word.0[24..32]);
        Self {
            in_recovery: word.0[15] != 0,
            role_count: u64::from_be_bytes(roles),
            approval_count: u64::from_be_bytes(approvals),
        }
    }
}

/// Slots 0..=6, shared by every family.
pub mod header {
    use colony_types::{Address, DomainId, RoleSet};

    use super::{FieldInfo, FieldKind, RecoveryHeader};
    use crate::field::{Field, Mapping};

    /// `(user, domain) → roles`.
    pub const ROLES: Mapping<(Address, DomainId), RoleSet> = Mapping::new(0);
    pub const OWNER: Field<Address> = Field::new(1);
    pub const RESOLVER: Field<Address> = Field::new(2);
    pub const RECOVERY: Field<RecoveryHeader> = Field::new(3);
    /// Scopes approvals; advanced on entering recovery and on every edit.
    pub const APPROVAL_ROUND: Field<u64> = Field::new(4);
    /// `approver → round in which they approved`.
    pub const RECOVERY_APPROVALS: Mapping<Address, u64> = Mapping::new(5);
    pub const RECOVERY_ROLES: Mapping<Address, bool> = Mapping::new(6);

    pub const FIRST_FAMILY_SLOT: u64 = 7;

    pub(super) const FIELDS: [FieldInfo; 7] = [
        FieldInfo {
            index: 0,
            name: "roles",
            kind: FieldKind::Mapping,
        },
        FieldInfo {
            index: 1,
            name: "owner",
            kind: FieldKind::Scalar,
        },
        FieldInfo {
            index: 2,
            name: "resolver",
            kind: FieldKind::Scalar,
        },
        FieldInfo {
            index: 3,
            name: "recovery",
            kind: FieldKind::Scalar,
        },
        FieldInfo {
            index: 4,
            name: "approval_round",
            kind: FieldKind::Scalar,
        },
        FieldInfo {
            index: 5,
            name: "recovery_approvals",
            kind: FieldKind::Mapping,
        },
        FieldInfo {
            index: 6,
            name: "recovery_roles",
            kind: FieldKind::Mapping,
        },
    ];
}

const HEADER_PROTECTED_MAPPINGS: [u64; 3] = [0, 5, 6];

pub mod colony {
    use colony_types::Address;

    use super::{header, Family, FieldInfo, FieldKind, Layout, HEADER_PROTECTED_MAPPINGS};
    use crate::field::Field;

    pub const NETWORK: Field<Address> = Field::new(7);
    pub const TOKEN: Field<Address> = Field::new(8);
    pub const DOMAIN_COUNT: Field<u64> = Field::new(9);

    /// First slot free for business modules.
    pub const FIRST_BUSINESS_SLOT: u64 = 32;

    const FIELDS: [FieldInfo; 10] = [
        header::FIELDS[0],
        header::FIELDS[1],
        header::FIELDS[2],
        header::FIELDS[3],
        header::FIELDS[4],
        header::FIELDS[5],
        header::FIELDS[6],
        FieldInfo {
            index: 7,
            name: "network",
            kind: FieldKind::Scalar,
        },
        FieldInfo {
            index: 8,
            name: "token",
            kind: FieldKind::Scalar,
        },
        FieldInfo {
            index: 9,
            name: "domain_count",
            kind: FieldKind::Scalar,
        },
    ];

    pub static LAYOUT: Layout = Layout {
        family: Family::Colony,
        protected_slots: &[0, 1, 2, 3, 4, 7],
        protected_mappings: &HEADER_PROTECTED_MAPPINGS,
        fields: &FIELDS,
    };
}

pub mod extension {
    use colony_types::Address;

    use super::{header, Family, FieldInfo, FieldKind, Layout, HEADER_PROTECTED_MAPPINGS};
    use crate::field::Field;

    pub const COLONY: Field<Address> = Field::new(7);
    pub const DEPRECATED: Field<bool> = Field::new(8);

    pub const FIRST_BUSINESS_SLOT: u64 = 32;

    const FIELDS: [FieldInfo; 9] = [
        header::FIELDS[0],
        header::FIELDS[1],
        header::FIELDS[2],
        header::FIELDS[3],
        header::FIELDS[4],
        header::FIELDS[5],
        header::FIELDS[6],
        FieldInfo {
            index: 7,
            name: "colony",
            kind: FieldKind::Scalar,
        },
        FieldInfo {
            index: 8,
            name: "deprecated",
            kind: FieldKind::Scalar,
        },
    ];

    pub static LAYOUT: Layout = Layout {
        family: Family::Extension,
        protected_slots: &[0, 1, 2, 3, 4, 7],
        protected_mappings: &HEADER_PROTECTED_MAPPINGS,
        fields: &FIELDS,
    };
}

pub mod network {
    use colony_types::{Address, ExtensionId, RoleSet, Version, Word};

    use super::{header, Family, FieldInfo, FieldKind, Layout, HEADER_PROTECTED_MAPPINGS};
    use crate::field::{Field, Mapping};

    pub const META_COLONY: Field<Address> = Field::new(7);
    pub const CURRENT_COLONY_VERSION: Field<Version> = Field::new(8);
    pub const COLONY_VERSION_RESOLVERS: Mapping<Version, Address> = Mapping::new(9);
    pub const COLONY_COUNT: Field<u64> = Field::new(10);
    /// `index (from 1) → colony`.
    pub const COLONIES: Mapping<u64, Address> = Mapping::new(11);
    pub const EXTENSION_RESOLVERS: Mapping<(ExtensionId, Version), Address> = Mapping::new(12);
    pub const EXTENSION_ROLES: Mapping<ExtensionId, RoleSet> = Mapping::new(13);
    pub const EXTENSION_LATEST: Mapping<ExtensionId, Version> = Mapping::new(14);
    /// `(extension, colony) → instance`.
    pub const INSTALLATIONS: Mapping<(ExtensionId, Address), Address> = Mapping::new(15);
    pub const REPUTATION_ROOT_HASH: Field<Word> = Field::new(16);
    /// `(cycle, index) → entry`, six fields at offsets 0..=5.
    pub const REPLACEMENT_LOG: Mapping<(Address, u64), Word> = Mapping::new(17);
    pub const REPLACEMENT_LOG_SET: Mapping<(Address, u64), bool> = Mapping::new(18);

    const FIELDS: [FieldInfo; 19] = [
        header::FIELDS[0],
        header::FIELDS[1],
        header::FIELDS[2],
        header::FIELDS[3],
        header::FIELDS[4],
        header::FIELDS[5],
        header::FIELDS[6],
        FieldInfo {
            index: 7,
            name: "meta_colony",
            kind: FieldKind::Scalar,
        },
        FieldInfo {
            index: 8,
            name: "current_colony_version",
            kind: FieldKind::Scalar,
        },
        FieldInfo {
            index: 9,
            name: "colony_version_resolvers",
            kind: FieldKind::Mapping,
        },
        FieldInfo {
            index: 10,
            name: "colony_count",
            kind: FieldKind::Scalar,
        },
        FieldInfo {
            index: 11,
            name: "colonies",
            kind: FieldKind::Mapping,
        },
        FieldInfo {
            index: 12,
            name: "extension_resolvers",
            kind: FieldKind::Mapping,
        },
        FieldInfo {
            index: 13,
            name: "extension_roles",
            kind: FieldKind::Mapping,
        },
        FieldInfo {
            index: 14,
            name: "extension_latest",
            kind: FieldKind::Mapping,
        },
        FieldInfo {
            index: 15,
            name: "installations",
            kind: FieldKind::Mapping,
        },
        FieldInfo {
            index: 16,
            name: "reputation_root_hash",
            kind: FieldKind::Scalar,
        },
        FieldInfo {
            index: 17,
            name: "replacement_log",
            kind: FieldKind::Mapping,
        },
        FieldInfo {
            index: 18,
            name: "replacement_log_set",
            kind: FieldKind::Mapping,
        },
    ];

    pub static LAYOUT: Layout = Layout {
        family: Family::Network,
        protected_slots: &[0, 1, 2, 3, 4, 7],
        protected_mappings: &HEADER_PROTECTED_MAPPINGS,
        fields: &FIELDS,
    };
}
