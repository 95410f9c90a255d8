//! E2E: calls reach modules through resolvers, and business modules ride
//! along with colony versions.

use std::sync::Arc;

use colony_dispatch::{FunctionSpec, Invocation, Module, ModuleError};
use colony_network::colony_sig;
use colony_recovery::RecoveryModule;
use colony_tests::{actor, World};
use colony_types::{CallData, ErrorCode, Event, Slot, Token, Version, Word};

const NOTE_SLOT: u64 = 32;

/// Business module keeping a single number in the first business slot.
struct Notebook;

impl Module for Notebook {
    fn name(&self) -> &str {
        "Notebook"
    }

    fn functions(&self) -> Vec<FunctionSpec> {
        vec![
            FunctionSpec::mutating("setNote(uint256)", "Notebook"),
            FunctionSpec::mutating("setNoteThenFail(uint256)", "Notebook"),
            FunctionSpec::view("note()", "Notebook"),
        ]
    }

    fn invoke(&self, call: &mut Invocation<'_>) -> Result<Vec<Token>, ModuleError> {
        let selector = call.selector;
        let is = |sig: &str| selector == colony_types::Selector::from_signature(sig);
        if is("note()") {
            return Ok(vec![Token::from(call.storage.read(&Slot::index(NOTE_SLOT)).low_u64())]);
        }
        let value = call.u64_arg(0)?;
        call.storage.write(Slot::index(NOTE_SLOT), Word::from_u64(value));
        if is("setNoteThenFail(uint256)") {
            return Err(ModuleError::revert("second thoughts"));
        }
        call.emit(Event::Custom {
            topic: "NoteSet".to_string(),
            data: vec![Token::from(value)],
        });
        Ok(vec![])
    }
}

/// Claims `version()` under a different origin than the colony core.
struct Impostor;

impl Module for Impostor {
    fn name(&self) -> &str {
        "Impostor"
    }

    fn functions(&self) -> Vec<FunctionSpec> {
        vec![FunctionSpec::view("version()", "Impostor")]
    }

    fn invoke(&self, _call: &mut Invocation<'_>) -> Result<Vec<Token>, ModuleError> {
        Ok(vec![Token::from(99u64)])
    }
}

fn with_notebook() -> World {
    let mut w = World::new().unwrap();
    let v2 = w
        .net
        .deploy_colony_version(Version(2), vec![Arc::new(Notebook)])
        .unwrap();
    w.net.add_colony_version(w.owner, v2).unwrap();
    w.net.upgrade_colony(w.owner, w.colony, Version(2)).unwrap();
    w
}

#[test]
fn business_module_arrives_with_upgrade() {
    let mut w = World::new().unwrap();
    let note = CallData::bare("note()");
    let err = w.net.static_call(w.colony, &note).unwrap_err();
    assert_eq!(err.code(), ErrorCode::UnroutableCall);

    let mut w = with_notebook();
    let outcome = w
        .net
        .call(actor("anyone"), w.colony, &CallData::new("setNote(uint256)", vec![Token::from(42u64)]))
        .unwrap();
    assert_eq!(outcome.events.len(), 1);
    assert_eq!(w.net.static_call(w.colony, &note).unwrap(), vec![Token::from(42u64)]);
    assert_eq!(w.net.events().last().map(|r| r.source), Some(w.colony));
}

#[test]
fn failed_call_leaves_no_writes() {
    let mut w = with_notebook();
    let colony = w.colony;
    w.net
        .call(w.owner, colony, &CallData::new("setNote(uint256)", vec![Token::from(1u64)]))
        .unwrap();
    let err = w
        .net
        .call(w.owner, colony, &CallData::new("setNoteThenFail(uint256)", vec![Token::from(2u64)]))
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::Reverted);
    assert_eq!(
        w.net.read_slot(&colony, &Slot::index(NOTE_SLOT)).unwrap(),
        Word::from_u64(1)
    );
}

#[test]
fn clashing_modules_fail_at_build_time() {
    let mut w = World::new().unwrap();
    let err = w
        .net
        .deploy_colony_version(Version(2), vec![Arc::new(Impostor)])
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::AmbiguousBinding);
}

#[test]
fn shared_recovery_module_is_not_a_clash() {
    // Re-supplying the recovery module binds its functions twice under one
    // origin, which is an intentional overload.
    let mut w = World::new().unwrap();
    let resolver = w
        .net
        .deploy_colony_version(Version(2), vec![Arc::new(RecoveryModule::default())])
        .unwrap();
    assert!(w.net.host().has_resolver(&resolver));
}

#[test]
fn recovery_reachable_through_dispatch() {
    let mut w = with_notebook();
    let colony = w.colony;
    w.net
        .call(w.owner, colony, &CallData::bare("enterRecoveryMode()"))
        .unwrap();
    let out = w
        .net
        .static_call(colony, &CallData::bare("isInRecoveryMode()"))
        .unwrap();
    assert_eq!(out, vec![Token::from(true)]);

    // Business writes are refused; views still answer.
    let err = w
        .net
        .call(w.owner, colony, &CallData::new("setNote(uint256)", vec![Token::from(5u64)]))
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::InRecoveryMode);
    w.net.static_call(colony, &CallData::bare("note()")).unwrap();

    // The raw edit path works through dispatch too.
    w.net
        .call(
            w.owner,
            colony,
            &CallData::new(
                "setStorageSlotRecovery(uint256,bytes32)",
                vec![Token::from(NOTE_SLOT), Token::from(Word::from_u64(77))],
            ),
        )
        .unwrap();
    assert_eq!(
        w.net.static_call(colony, &CallData::bare("note()")).unwrap(),
        vec![Token::from(77u64)]
    );
}

#[test]
fn colony_views_report_identity() {
    let mut w = World::new().unwrap();
    let network = w.net.address();
    let out = w
        .net
        .static_call(w.colony, &CallData::bare(colony_sig::GET_NETWORK))
        .unwrap();
    assert_eq!(out, vec![Token::from(network)]);
    let out = w
        .net
        .static_call(w.colony, &CallData::bare(colony_sig::GET_TOKEN))
        .unwrap();
    assert_eq!(out, vec![Token::from(actor("token"))]);
}
