use colony_storage::{authority, layout::header, RecoveryHeader, Storage};
use colony_types::{Address, Event, Slot, Word};
use tracing::{info, warn};

use crate::error::RecoveryError;
use crate::policy::QuorumPolicy;

/// The Normal/Recovery state machine of one contract, over its storage.
///
/// Every transition returns the event it produced; the caller decides where
/// events are recorded.
pub struct RecoveryController<'s> {
    storage: &'s mut Storage,
    policy: QuorumPolicy,
}

impl<'s> RecoveryController<'s> {
    pub fn new(storage: &'s mut Storage, policy: QuorumPolicy) -> Self {
        Self { storage, policy }
    }

    fn state(&self) -> RecoveryHeader {
        self.storage.get(header::RECOVERY)
    }

    pub fn is_in_recovery(&self) -> bool {
        self.state().in_recovery
    }

    pub fn num_recovery_roles(&self) -> u64 {
        self.state().role_count
    }

    pub fn approval_count(&self) -> u64 {
        self.state().approval_count
    }

    pub fn approval_round(&self) -> u64 {
        self.storage.get(header::APPROVAL_ROUND)
    }

    pub fn has_recovery_role(&self, user: &Address) -> bool {
        self.storage.get_entry(header::RECOVERY_ROLES, user)
    }

    pub fn has_approved(&self, user: &Address) -> bool {
        let round = self.approval_round();
        round > 0 && self.storage.get_entry(header::RECOVERY_APPROVALS, user) == round
    }

    pub fn policy(&self) -> QuorumPolicy {
        self.policy
    }

    pub(crate) fn storage_mut(&mut self) -> &mut Storage {
        &mut *self.storage
    }

    /// Preconditions shared by every raw edit made in recovery mode.
    pub(crate) fn check_edit(&self, caller: &Address) -> Result<(), RecoveryError> {
        self.require_recovery()?;
        self.require_recovery_role(caller)
    }

    fn require_recovery(&self) -> Result<(), RecoveryError> {
        if self.is_in_recovery() {
            Ok(())
        } else {
            Err(RecoveryError::NotInRecoveryMode)
        }
    }

    fn require_normal(&self) -> Result<(), RecoveryError> {
        if self.is_in_recovery() {
            Err(RecoveryError::InRecoveryMode)
        } else {
            Ok(())
        }
    }

    fn require_recovery_role(&self, caller: &Address) -> Result<(), RecoveryError> {
        if self.has_recovery_role(caller) {
            Ok(())
        } else {
            warn!(caller = %caller, "Recovery call without recovery role");
            Err(RecoveryError::Unauthorized {
                caller: *caller,
                needed: "the recovery role",
            })
        }
    }

    fn require_root(&self, caller: &Address) -> Result<(), RecoveryError> {
        if authority::is_root(&*self.storage, caller) {
            Ok(())
        } else {
            Err(RecoveryError::Unauthorized {
                caller: *caller,
                needed: "root in the root domain",
            })
        }
    }

    /// Start a fresh approval round; prior approvals stop counting.
    fn reset_approvals(&mut self) {
        let round = self.approval_round() + 1;
        self.storage.set(header::APPROVAL_ROUND, round);
        let mut state = self.state();
        state.approval_count = 0;
        self.storage.set(header::RECOVERY, state);
    }

    pub fn set_recovery_role(&mut self, caller: Address, user: Address) -> Result<Event, RecoveryError> {
        self.require_normal()?;
        self.require_root(&caller)?;
        if !self.has_recovery_role(&user) {
            self.storage.set_entry(header::RECOVERY_ROLES, &user, true);
            let mut state = self.state();
            state.role_count += 1;
            self.storage.set(header::RECOVERY, state);
        }
        info!(user = %user, roles = self.num_recovery_roles(), "Recovery role granted");
        Ok(Event::RecoveryRoleSet {
            user,
            granted: true,
        })
    }

    pub fn remove_recovery_role(&mut self, caller: Address, user: Address) -> Result<Event, RecoveryError> {
        self.require_normal()?;
        self.require_root(&caller)?;
        if self.has_recovery_role(&user) {
            self.storage.set_entry(header::RECOVERY_ROLES, &user, false);
            let mut state = self.state();
            state.role_count -= 1;
            self.storage.set(header::RECOVERY, state);
        }
        info!(user = %user, roles = self.num_recovery_roles(), "Recovery role removed");
        Ok(Event::RecoveryRoleSet {
            user,
            granted: false,
        })
    }

    pub fn enter_recovery(&mut self, caller: Address) -> Result<Event, RecoveryError> {
        self.require_recovery_role(&caller)?;
        self.require_normal()?;
        self.reset_approvals();
        let mut state = self.state();
        state.in_recovery = true;
        self.storage.set(header::RECOVERY, state);
        info!(by = %caller, round = self.approval_round(), "Recovery mode entered");
        Ok(Event::RecoveryModeEntered { by: caller })
    }

    /// Raw write to an unprotected slot. Invalidates approvals gathered so far.
    pub fn edit_slot(&mut self, caller: Address, slot: Slot, value: Word) -> Result<Event, RecoveryError> {
        self.check_edit(&caller)?;
        if self.storage.is_protected(&slot) {
            warn!(by = %caller, slot = %slot, "Protected slot edit rejected");
            return Err(RecoveryError::ProtectedVariable(slot));
        }
        let from = self.storage.write(slot, value);
        self.reset_approvals();
        info!(by = %caller, slot = %slot, from = %from, to = %value, "Recovery storage slot set");
        Ok(Event::RecoveryStorageSlotSet {
            by: caller,
            slot,
            from,
            to: value,
        })
    }

    pub fn approve_exit(&mut self, caller: Address) -> Result<Event, RecoveryError> {
        self.require_recovery()?;
        self.require_recovery_role(&caller)?;
        if self.has_approved(&caller) {
            return Err(RecoveryError::AlreadyApproved(caller));
        }
        let round = self.approval_round();
        self.storage.set_entry(header::RECOVERY_APPROVALS, &caller, round);
        let mut state = self.state();
        state.approval_count += 1;
        self.storage.set(header::RECOVERY, state);
        info!(by = %caller, approvals = state.approval_count, "Recovery exit approved");
        Ok(Event::RecoveryModeExitApproved { by: caller })
    }

    /// Check every precondition of [`exit_recovery`](Self::exit_recovery)
    /// without changing state.
    pub fn check_exit(&self, caller: &Address) -> Result<(), RecoveryError> {
        self.require_recovery()?;
        self.require_recovery_role(caller)?;
        let state = self.state();
        let need = self.policy.required(state.role_count);
        if state.approval_count < need {
            return Err(RecoveryError::InsufficientApprovals {
                have: state.approval_count,
                need,
            });
        }
        Ok(())
    }

    pub fn exit_recovery(&mut self, caller: Address) -> Result<Event, RecoveryError> {
        self.check_exit(&caller)?;
        let mut state = self.state();
        state.in_recovery = false;
        state.approval_count = 0;
        self.storage.set(header::RECOVERY, state);
        info!(by = %caller, "Recovery mode exited");
        Ok(Event::RecoveryModeExited { by: caller })
    }
}
