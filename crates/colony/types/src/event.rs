//! Observable lifecycle events.
//!
//! Events are emitted by registries, recovery entry points, and business
//! modules, and collected by the network into an append-only log for
//! off-chain consumers.

use serde::{Deserialize, Serialize};

use crate::address::{Address, Word};
use crate::call::Token;
use crate::ids::{DomainId, ExtensionId, Version};
use crate::roles::RoleSet;
use crate::slot::Slot;

/// A replacement entry for a reputation-mining cycle's update log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReputationLogEntry {
    pub user: Address,
    pub amount: i128,
    pub skill_id: u64,
    pub colony: Address,
    pub n_updates: u128,
    pub n_previous_updates: u128,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    ColonyVersionAdded {
        version: Version,
        resolver: Address,
    },
    ColonyAdded {
        index: u64,
        colony: Address,
        token: Address,
    },
    MetaColonyCreated {
        colony: Address,
    },
    ColonyUpgraded {
        colony: Address,
        old_version: Version,
        new_version: Version,
    },
    ExtensionAddedToNetwork {
        extension_id: ExtensionId,
        version: Version,
    },
    ExtensionInstalled {
        extension_id: ExtensionId,
        colony: Address,
        version: Version,
        instance: Address,
    },
    ExtensionEnabled {
        extension_id: ExtensionId,
        colony: Address,
        domain: DomainId,
        roles: RoleSet,
    },
    ExtensionDisabled {
        extension_id: ExtensionId,
        colony: Address,
        domain: DomainId,
    },
    ExtensionUpgraded {
        extension_id: ExtensionId,
        colony: Address,
        version: Version,
    },
    ExtensionDeprecated {
        extension_id: ExtensionId,
        colony: Address,
        deprecated: bool,
    },
    ExtensionUninstalled {
        extension_id: ExtensionId,
        colony: Address,
        swept: u128,
    },
    RecoveryRoleSet {
        user: Address,
        granted: bool,
    },
    RecoveryModeEntered {
        by: Address,
    },
    RecoveryStorageSlotSet {
        by: Address,
        slot: Slot,
        from: Word,
        to: Word,
    },
    RecoveryModeExitApproved {
        by: Address,
    },
    RecoveryModeExited {
        by: Address,
    },
    ReplacementReputationUpdateLogEntrySet {
        cycle: Address,
        index: u64,
    },
    ColonyRoleSet {
        user: Address,
        domain: DomainId,
        roles: RoleSet,
    },
    /// Free-form event raised by a business module.
    Custom {
        topic: String,
        data: Vec<Token>,
    },
}

impl Event {
    /// Short snake_case name, matching the serialized tag.
    pub fn name(&self) -> &'static str {
        match self {
            Event::ColonyVersionAdded { .. } => "colony_version_added",
            Event::ColonyAdded { .. } => "colony_added",
            Event::MetaColonyCreated { .. } => "meta_colony_created",
            Event::ColonyUpgraded { .. } => "colony_upgraded",
            Event::ExtensionAddedToNetwork { .. } => "extension_added_to_network",
            Event::ExtensionInstalled { .. } => "extension_installed",
            Event::ExtensionEnabled { .. } => "extension_enabled",
            Event::ExtensionDisabled { .. } => "extension_disabled",
            Event::ExtensionUpgraded { .. } => "extension_upgraded",
            Event::ExtensionDeprecated { .. } => "extension_deprecated",
            Event::ExtensionUninstalled { .. } => "extension_uninstalled",
            Event::RecoveryRoleSet { .. } => "recovery_role_set",
            Event::RecoveryModeEntered { .. } => "recovery_mode_entered",
            Event::RecoveryStorageSlotSet { .. } => "recovery_storage_slot_set",
            Event::RecoveryModeExitApproved { .. } => "recovery_mode_exit_approved",
            Event::RecoveryModeExited { .. } => "recovery_mode_exited",
            Event::ReplacementReputationUpdateLogEntrySet { .. } => {
                "replacement_reputation_update_log_entry_set"
            }
            Event::ColonyRoleSet { .. } => "colony_role_set",
            Event::Custom { .. } => "custom",
        }
    }
}
