use colony_dispatch::{FunctionSpec, Invocation, Module, ModuleError};
use colony_types::{Selector, Token};

use crate::controller::RecoveryController;
use crate::policy::QuorumPolicy;

const ORIGIN: &str = "ContractRecovery";

pub const ENTER: &str = "enterRecoveryMode()";
pub const SET_SLOT: &str = "setStorageSlotRecovery(uint256,bytes32)";
pub const APPROVE_EXIT: &str = "approveExitRecovery()";
pub const EXIT: &str = "exitRecoveryMode()";
pub const SET_ROLE: &str = "setRecoveryRole(address)";
pub const REMOVE_ROLE: &str = "removeRecoveryRole(address)";
pub const NUM_ROLES: &str = "numRecoveryRoles()";
pub const IS_IN_RECOVERY: &str = "isInRecoveryMode()";
pub const APPROVAL_COUNT: &str = "getRecoveryApprovalCount()";

/// Recovery entry points, shared by every contract family.
#[derive(Debug, Default, Clone, Copy)]
pub struct RecoveryModule {
    policy: QuorumPolicy,
}

impl RecoveryModule {
    pub fn new(policy: QuorumPolicy) -> Self {
        Self { policy }
    }
}

impl Module for RecoveryModule {
    fn name(&self) -> &str {
        ORIGIN
    }

    fn functions(&self) -> Vec<FunctionSpec> {
        vec![
            FunctionSpec::recovery(ENTER, ORIGIN),
            FunctionSpec::recovery(SET_SLOT, ORIGIN),
            FunctionSpec::recovery(APPROVE_EXIT, ORIGIN),
            FunctionSpec::recovery(EXIT, ORIGIN),
            FunctionSpec::mutating(SET_ROLE, ORIGIN),
            FunctionSpec::mutating(REMOVE_ROLE, ORIGIN),
            FunctionSpec::view(NUM_ROLES, ORIGIN),
            FunctionSpec::view(IS_IN_RECOVERY, ORIGIN),
            FunctionSpec::view(APPROVAL_COUNT, ORIGIN),
        ]
    }

    fn invoke(&self, call: &mut Invocation<'_>) -> Result<Vec<Token>, ModuleError> {
        let selector = call.selector;
        let is = |sig: &str| selector == Selector::from_signature(sig);
        let caller = call.caller;

        if is(NUM_ROLES) || is(IS_IN_RECOVERY) || is(APPROVAL_COUNT) {
            let rc = RecoveryController::new(&mut *call.storage, self.policy);
            let out = if is(NUM_ROLES) {
                Token::from(rc.num_recovery_roles())
            } else if is(IS_IN_RECOVERY) {
                Token::from(rc.is_in_recovery())
            } else {
                Token::from(rc.approval_count())
            };
            return Ok(vec![out]);
        }

        let event = if is(ENTER) {
            RecoveryController::new(&mut *call.storage, self.policy).enter_recovery(caller)?
        } else if is(SET_SLOT) {
            let slot = call.slot_arg(0)?;
            let value = call.word_arg(1)?;
            RecoveryController::new(&mut *call.storage, self.policy).edit_slot(caller, slot, value)?
        } else if is(APPROVE_EXIT) {
            RecoveryController::new(&mut *call.storage, self.policy).approve_exit(caller)?
        } else if is(EXIT) {
            RecoveryController::new(&mut *call.storage, self.policy).exit_recovery(caller)?
        } else if is(SET_ROLE) {
            let user = call.address_arg(0)?;
            RecoveryController::new(&mut *call.storage, self.policy).set_recovery_role(caller, user)?
        } else if is(REMOVE_ROLE) {
            let user = call.address_arg(0)?;
            RecoveryController::new(&mut *call.storage, self.policy).remove_recovery_role(caller, user)?
        } else {
            return Err(ModuleError::revert(format!(
                "{ORIGIN} has no function {selector}"
            )));
        };
        call.emit(event);
        Ok(vec![])
    }
}
