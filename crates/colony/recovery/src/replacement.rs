//! Corrections to a mining cycle's reputation update log.
//!
//! The log itself belongs to the reputation-mining collaborator; the network
//! only holds replacement entries, writable while in recovery mode.

use colony_storage::{layout::network, Family, Storage};
use colony_types::{Address, Event, ReputationLogEntry, Word};
use tracing::info;

use crate::controller::RecoveryController;
use crate::error::RecoveryError;

const USER: u64 = 0;
const AMOUNT: u64 = 1;
const SKILL_ID: u64 = 2;
const COLONY: u64 = 3;
const N_UPDATES: u64 = 4;
const N_PREVIOUS_UPDATES: u64 = 5;

impl RecoveryController<'_> {
    pub fn set_replacement_log_entry(
        &mut self,
        caller: Address,
        cycle: Address,
        index: u64,
        entry: &ReputationLogEntry,
    ) -> Result<Event, RecoveryError> {
        self.check_edit(&caller)?;
        let storage = self.storage_mut();
        if storage.layout().family != Family::Network {
            return Err(RecoveryError::WrongFamily(storage.layout().family));
        }
        let key = (cycle, index);
        let field = |offset| network::REPLACEMENT_LOG.field_slot(&key, offset);
        storage.write(field(USER), Word::from_address(&entry.user));
        storage.write(field(AMOUNT), Word::from_i128(entry.amount));
        storage.write(field(SKILL_ID), Word::from_u64(entry.skill_id));
        storage.write(field(COLONY), Word::from_address(&entry.colony));
        storage.write(field(N_UPDATES), Word::from_u128(entry.n_updates));
        storage.write(field(N_PREVIOUS_UPDATES), Word::from_u128(entry.n_previous_updates));
        storage.set_entry(network::REPLACEMENT_LOG_SET, &key, true);
        info!(by = %caller, cycle = %cycle, index, "Replacement log entry set");
        Ok(Event::ReplacementReputationUpdateLogEntrySet { cycle, index })
    }
}

/// The replacement for entry `index` of `cycle`, if one was set.
pub fn replacement_log_entry(storage: &Storage, cycle: Address, index: u64) -> Option<ReputationLogEntry> {
    let key = (cycle, index);
    if !storage.get_entry(network::REPLACEMENT_LOG_SET, &key) {
        return None;
    }
    let field = |offset| storage.read(&network::REPLACEMENT_LOG.field_slot(&key, offset));
    Some(ReputationLogEntry {
        user: field(USER).to_address(),
        amount: field(AMOUNT).low_i128(),
        skill_id: field(SKILL_ID).low_u64(),
        colony: field(COLONY).to_address(),
        n_updates: field(N_UPDATES).low_u128(),
        n_previous_updates: field(N_PREVIOUS_UPDATES).low_u128(),
    })
}
