use serde::{Deserialize, Serialize};
use std::fmt;

/// Permission roles held by an address within a domain.
///
/// The discriminant is the bit position inside a [`RoleSet`]. Bit 4 is
/// retired and never assigned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum ColonyRole {
    Recovery = 0,
    Root = 1,
    Arbitration = 2,
    Architecture = 3,
    Funding = 5,
    Administration = 6,
}

impl ColonyRole {
    pub const ALL: [ColonyRole; 6] = [
        ColonyRole::Recovery,
        ColonyRole::Root,
        ColonyRole::Arbitration,
        ColonyRole::Architecture,
        ColonyRole::Funding,
        ColonyRole::Administration,
    ];

    pub fn bit(self) -> u8 {
        1 << (self as u8)
    }

    pub fn from_index(index: u8) -> Option<ColonyRole> {
        Self::ALL.into_iter().find(|r| *r as u8 == index)
    }
}

impl fmt::Display for ColonyRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColonyRole::Recovery => "Recovery",
            ColonyRole::Root => "Root",
            ColonyRole::Arbitration => "Arbitration",
            ColonyRole::Architecture => "Architecture",
            ColonyRole::Funding => "Funding",
            ColonyRole::Administration => "Administration",
        };
        f.write_str(name)
    }
}

/// A bitmask of [`ColonyRole`]s.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleSet(pub u8);

impl RoleSet {
    pub const EMPTY: RoleSet = RoleSet(0);
    /// Every bit that names a [`ColonyRole`].
    pub const DEFINED: RoleSet = RoleSet(0b0110_1111);

    /// A set from a raw mask, or `None` if the mask has bits that name no role.
    pub fn from_mask(mask: u8) -> Option<RoleSet> {
        (mask & !Self::DEFINED.0 == 0).then_some(RoleSet(mask))
    }

    pub fn from_roles(roles: &[ColonyRole]) -> Self {
        Self(roles.iter().fold(0, |acc, r| acc | r.bit()))
    }

    pub fn contains(self, role: ColonyRole) -> bool {
        self.0 & role.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn union(self, other: RoleSet) -> RoleSet {
        RoleSet(self.0 | other.0)
    }

    pub fn difference(self, other: RoleSet) -> RoleSet {
        RoleSet(self.0 & !other.0)
    }

    pub fn with(self, role: ColonyRole) -> RoleSet {
        RoleSet(self.0 | role.bit())
    }

    pub fn iter(self) -> impl Iterator<Item = ColonyRole> {
        ColonyRole::ALL.into_iter().filter(move |r| self.contains(*r))
    }
}

impl From<ColonyRole> for RoleSet {
    fn from(role: ColonyRole) -> Self {
        RoleSet(role.bit())
    }
}

impl fmt::Debug for RoleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl fmt::Display for RoleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.iter().map(|r| r.to_string()).collect();
        write!(f, "[{}]", names.join(", "))
    }
}
