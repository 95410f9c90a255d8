//! Declarative scenarios: a TOML list of steps run in order against a fresh
//! network.
//!
//! ```toml
//! owner = "owner"
//!
//! [[step]]
//! op = "deploy_colony_version"
//! version = 1
//! label = "colony_v1"
//!
//! [[step]]
//! op = "enter_recovery"
//! caller = "alice"
//! target = "colony"
//! expect = "AUTHORIZATION"
//! ```
//!
//! Names resolve to labelled contracts first, `network` to the network
//! itself, `0x...` to a literal address, and anything else to the address
//! derived from the name. A malformed `0x...` name is a parse error.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use colony_network::{ColonyNetwork, NetworkConfig, NetworkError};
use colony_types::{Address, ColonyRole, DomainId, ExtensionId, RoleSet, Slot, Version, Word};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("failed to read scenario: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid scenario: {0}")]
    Parse(String),

    #[error("step {step} ({op}): unexpected failure: {source}")]
    Failed {
        step: usize,
        op: &'static str,
        source: NetworkError,
    },

    #[error("step {step} ({op}): expected {expected}, but it succeeded")]
    UnexpectedSuccess {
        step: usize,
        op: &'static str,
        expected: String,
    },

    #[error("step {step} ({op}): expected {expected}, got {actual}")]
    WrongError {
        step: usize,
        op: &'static str,
        expected: String,
        actual: String,
    },

    #[error("step {step} ({op}): {detail}")]
    Assertion {
        step: usize,
        op: &'static str,
        detail: String,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    #[serde(default = "default_owner")]
    pub owner: String,
    #[serde(default)]
    pub config: Option<NetworkConfig>,
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

fn default_owner() -> String {
    "owner".to_string()
}

impl Scenario {
    pub fn from_toml_str(text: &str) -> Result<Self, ScenarioError> {
        let scenario: Scenario = toml::from_str(text).map_err(|e| ScenarioError::Parse(e.to_string()))?;
        scenario.check_addresses()?;
        Ok(scenario)
    }

    /// Reject `0x` names that are neither a declared label nor a well-formed
    /// address, so a typo cannot fall through to a label-derived address.
    fn check_addresses(&self) -> Result<(), ScenarioError> {
        let labels: BTreeSet<&str> = self.steps.iter().filter_map(|s| s.action.label()).collect();
        for (i, step) in self.steps.iter().enumerate() {
            for name in step.action.addresses() {
                if !name.starts_with("0x") || labels.contains(name) {
                    continue;
                }
                Address::from_hex(name).map_err(|e| {
                    ScenarioError::Parse(format!("step {} ({}): bad address {name}: {e}", i + 1, step.action.op()))
                })?;
            }
        }
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Step {
    #[serde(flatten)]
    pub action: Action,
    /// Error code the step must fail with, e.g. `IN_RECOVERY_MODE`.
    #[serde(default)]
    pub expect: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Action {
    DeployColonyVersion {
        version: u64,
        label: String,
    },
    DeployExtensionVersion {
        name: String,
        version: u64,
        label: String,
    },
    Initialise {
        caller: String,
        resolver: String,
    },
    CreateMetaColony {
        caller: String,
        token: String,
        label: String,
    },
    CreateColony {
        caller: String,
        token: String,
        label: String,
    },
    AddColonyVersion {
        caller: String,
        resolver: String,
    },
    UpgradeColony {
        caller: String,
        colony: String,
        version: u64,
    },
    AddExtension {
        caller: String,
        name: String,
        resolver: String,
        #[serde(default)]
        roles: Vec<ColonyRole>,
    },
    InstallExtension {
        caller: String,
        colony: String,
        name: String,
        version: u64,
        #[serde(default)]
        label: Option<String>,
    },
    EnableExtension {
        caller: String,
        colony: String,
        name: String,
        domain: u64,
    },
    DisableExtension {
        caller: String,
        colony: String,
        name: String,
        domain: u64,
    },
    UpgradeExtension {
        caller: String,
        colony: String,
        name: String,
        version: u64,
    },
    DeprecateExtension {
        caller: String,
        colony: String,
        name: String,
        deprecated: bool,
    },
    UninstallExtension {
        caller: String,
        colony: String,
        name: String,
    },
    SetRecoveryRole {
        caller: String,
        target: String,
        user: String,
    },
    RemoveRecoveryRole {
        caller: String,
        target: String,
        user: String,
    },
    EnterRecovery {
        caller: String,
        target: String,
    },
    EditSlot {
        caller: String,
        target: String,
        slot: u64,
        value: String,
    },
    ApproveExit {
        caller: String,
        target: String,
    },
    ExitRecovery {
        caller: String,
        target: String,
        #[serde(default)]
        version: Option<u64>,
    },
    AssertSlot {
        target: String,
        slot: u64,
        value: String,
    },
    AssertRecovery {
        target: String,
        in_recovery: bool,
    },
    AssertColonyVersion {
        colony: String,
        version: u64,
    },
}

impl Action {
    /// The label this step binds its result to, if any.
    pub fn label(&self) -> Option<&str> {
        match self {
            Action::DeployColonyVersion { label, .. }
            | Action::DeployExtensionVersion { label, .. }
            | Action::CreateMetaColony { label, .. }
            | Action::CreateColony { label, .. } => Some(label.as_str()),
            Action::InstallExtension { label, .. } => label.as_deref(),
            _ => None,
        }
    }

    /// Every field naming an address: a label, `network`, a `0x` literal, or
    /// any other text hashed into an actor address.
    pub fn addresses(&self) -> Vec<&str> {
        match self {
            Action::DeployColonyVersion { .. } | Action::DeployExtensionVersion { .. } => vec![],
            Action::Initialise { caller, resolver } | Action::AddColonyVersion { caller, resolver } => {
                vec![caller.as_str(), resolver.as_str()]
            }
            Action::CreateMetaColony { caller, token, .. } | Action::CreateColony { caller, token, .. } => {
                vec![caller.as_str(), token.as_str()]
            }
            Action::AddExtension { caller, resolver, .. } => vec![caller.as_str(), resolver.as_str()],
            Action::UpgradeColony { caller, colony, .. }
            | Action::InstallExtension { caller, colony, .. }
            | Action::EnableExtension { caller, colony, .. }
            | Action::DisableExtension { caller, colony, .. }
            | Action::UpgradeExtension { caller, colony, .. }
            | Action::DeprecateExtension { caller, colony, .. }
            | Action::UninstallExtension { caller, colony, .. } => vec![caller.as_str(), colony.as_str()],
            Action::SetRecoveryRole { caller, target, user }
            | Action::RemoveRecoveryRole { caller, target, user } => vec![caller.as_str(), target.as_str(), user.as_str()],
            Action::EnterRecovery { caller, target }
            | Action::EditSlot { caller, target, .. }
            | Action::ApproveExit { caller, target }
            | Action::ExitRecovery { caller, target, .. } => vec![caller.as_str(), target.as_str()],
            Action::AssertSlot { target, .. } | Action::AssertRecovery { target, .. } => vec![target.as_str()],
            Action::AssertColonyVersion { colony, .. } => vec![colony.as_str()],
        }
    }

    pub fn op(&self) -> &'static str {
        match self {
            Action::DeployColonyVersion { .. } => "deploy_colony_version",
            Action::DeployExtensionVersion { .. } => "deploy_extension_version",
            Action::Initialise { .. } => "initialise",
            Action::CreateMetaColony { .. } => "create_meta_colony",
            Action::CreateColony { .. } => "create_colony",
            Action::AddColonyVersion { .. } => "add_colony_version",
            Action::UpgradeColony { .. } => "upgrade_colony",
            Action::AddExtension { .. } => "add_extension",
            Action::InstallExtension { .. } => "install_extension",
            Action::EnableExtension { .. } => "enable_extension",
            Action::DisableExtension { .. } => "disable_extension",
            Action::UpgradeExtension { .. } => "upgrade_extension",
            Action::DeprecateExtension { .. } => "deprecate_extension",
            Action::UninstallExtension { .. } => "uninstall_extension",
            Action::SetRecoveryRole { .. } => "set_recovery_role",
            Action::RemoveRecoveryRole { .. } => "remove_recovery_role",
            Action::EnterRecovery { .. } => "enter_recovery",
            Action::EditSlot { .. } => "edit_slot",
            Action::ApproveExit { .. } => "approve_exit",
            Action::ExitRecovery { .. } => "exit_recovery",
            Action::AssertSlot { .. } => "assert_slot",
            Action::AssertRecovery { .. } => "assert_recovery",
            Action::AssertColonyVersion { .. } => "assert_colony_version",
        }
    }
}

/// How one step ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Done,
    /// Failed with the expected code.
    Rejected(String),
}

#[derive(Debug, Clone)]
pub struct StepReport {
    pub index: usize,
    pub op: &'static str,
    pub outcome: StepOutcome,
}

/// Executes scenario steps against one network.
pub struct Runner {
    network: ColonyNetwork,
    labels: BTreeMap<String, Address>,
}

impl Runner {
    pub fn new(owner: &str, config: NetworkConfig) -> Result<Self, ScenarioError> {
        let owner = Address::from_label(owner);
        let network = ColonyNetwork::new(owner, config).map_err(|source| ScenarioError::Failed {
            step: 0,
            op: "new",
            source,
        })?;
        Ok(Self {
            network,
            labels: BTreeMap::new(),
        })
    }

    pub fn network(&self) -> &ColonyNetwork {
        &self.network
    }

    /// Run every step, stopping at the first one that does not go as declared.
    pub fn run(&mut self, steps: &[Step]) -> Result<Vec<StepReport>, ScenarioError> {
        let mut reports = Vec::with_capacity(steps.len());
        for (i, step) in steps.iter().enumerate() {
            let index = i + 1;
            let op = step.action.op();
            debug!(step = index, op, "Running step");

            if let Some(detail) = self.check(&step.action) {
                return Err(ScenarioError::Assertion { step: index, op, detail });
            }
            let outcome = match (self.apply(&step.action), &step.expect) {
                (Ok(()), None) => StepOutcome::Done,
                (Ok(()), Some(expected)) => {
                    return Err(ScenarioError::UnexpectedSuccess {
                        step: index,
                        op,
                        expected: expected.clone(),
                    })
                }
                (Err(source), None) => return Err(ScenarioError::Failed { step: index, op, source }),
                (Err(err), Some(expected)) => {
                    let actual = err.code().as_str();
                    if actual != expected.as_str() {
                        return Err(ScenarioError::WrongError {
                            step: index,
                            op,
                            expected: expected.clone(),
                            actual: actual.to_string(),
                        });
                    }
                    StepOutcome::Rejected(actual.to_string())
                }
            };
            reports.push(StepReport { index, op, outcome });
        }
        info!(steps = reports.len(), "Scenario complete");
        Ok(reports)
    }

    fn resolve(&self, name: &str) -> Address {
        if let Some(address) = self.labels.get(name) {
            return *address;
        }
        if name == "network" {
            return self.network.address();
        }
        if name.starts_with("0x") {
            if let Ok(address) = Address::from_hex(name) {
                return address;
            }
        }
        Address::from_label(name)
    }

    fn label(&mut self, name: &str, address: Address) {
        self.labels.insert(name.to_string(), address);
    }

    fn word(value: &str) -> Result<Word, NetworkError> {
        Word::from_hex(value).map_err(|e| NetworkError::Config(format!("bad word {value}: {e}")))
    }

    /// Evaluate an assertion step. `None` means it held, or `action` is not
    /// an assertion.
    fn check(&mut self, action: &Action) -> Option<String> {
        let result = match action {
            Action::AssertSlot { target, slot, value } => {
                let expected = match Self::word(value) {
                    Ok(word) => word,
                    Err(e) => return Some(e.to_string()),
                };
                self.network
                    .read_slot(&self.resolve(target), &Slot::index(*slot))
                    .map(|actual| (actual != expected).then(|| format!("slot {slot} is {actual}, expected {expected}")))
            }
            Action::AssertRecovery { target, in_recovery } => self
                .network
                .is_in_recovery(&self.resolve(target))
                .map(|actual| {
                    (actual != *in_recovery).then(|| format!("{target} recovery mode is {actual}"))
                }),
            Action::AssertColonyVersion { colony, version } => {
                let address = self.resolve(colony);
                self.network.colony_version(address).map(|actual| {
                    (actual != Version(*version)).then(|| format!("{colony} runs {actual}, expected v{version}"))
                })
            }
            _ => Ok(None),
        };
        result.unwrap_or_else(|e| Some(e.to_string()))
    }

    fn apply(&mut self, action: &Action) -> Result<(), NetworkError> {
        match action {
            Action::DeployColonyVersion { version, label } => {
                let resolver = self.network.deploy_colony_version(Version(*version), Vec::new())?;
                self.label(label, resolver);
            }
            Action::DeployExtensionVersion { name, version, label } => {
                let resolver = self
                    .network
                    .deploy_extension_version(name, Version(*version), Vec::new())?;
                self.label(label, resolver);
            }
            Action::Initialise { caller, resolver } => {
                let (caller, resolver) = (self.resolve(caller), self.resolve(resolver));
                self.network.initialise(caller, resolver)?;
            }
            Action::CreateMetaColony { caller, token, label } => {
                let (caller, token) = (self.resolve(caller), self.resolve(token));
                let colony = self.network.create_meta_colony(caller, token)?;
                self.label(label, colony);
            }
            Action::CreateColony { caller, token, label } => {
                let (caller, token) = (self.resolve(caller), self.resolve(token));
                let colony = self.network.create_colony(caller, token)?;
                self.label(label, colony);
            }
            Action::AddColonyVersion { caller, resolver } => {
                let (caller, resolver) = (self.resolve(caller), self.resolve(resolver));
                self.network.add_colony_version(caller, resolver)?;
            }
            Action::UpgradeColony { caller, colony, version } => {
                let (caller, colony) = (self.resolve(caller), self.resolve(colony));
                self.network.upgrade_colony(caller, colony, Version(*version))?;
            }
            Action::AddExtension { caller, name, resolver, roles } => {
                let (caller, resolver) = (self.resolve(caller), self.resolve(resolver));
                self.network
                    .add_extension(caller, ExtensionId::from_name(name), resolver, RoleSet::from_roles(roles))?;
            }
            Action::InstallExtension { caller, colony, name, version, label } => {
                let (caller, colony) = (self.resolve(caller), self.resolve(colony));
                let instance =
                    self.network
                        .install_extension(caller, colony, ExtensionId::from_name(name), Version(*version))?;
                if let Some(label) = label {
                    self.label(label, instance);
                }
            }
            Action::EnableExtension { caller, colony, name, domain } => {
                let (caller, colony) = (self.resolve(caller), self.resolve(colony));
                self.network
                    .enable_extension(caller, colony, ExtensionId::from_name(name), DomainId(*domain))?;
            }
            Action::DisableExtension { caller, colony, name, domain } => {
                let (caller, colony) = (self.resolve(caller), self.resolve(colony));
                self.network
                    .disable_extension(caller, colony, ExtensionId::from_name(name), DomainId(*domain))?;
            }
            Action::UpgradeExtension { caller, colony, name, version } => {
                let (caller, colony) = (self.resolve(caller), self.resolve(colony));
                self.network
                    .upgrade_extension(caller, colony, ExtensionId::from_name(name), Version(*version))?;
            }
            Action::DeprecateExtension { caller, colony, name, deprecated } => {
                let (caller, colony) = (self.resolve(caller), self.resolve(colony));
                self.network
                    .deprecate_extension(caller, colony, ExtensionId::from_name(name), *deprecated)?;
            }
            Action::UninstallExtension { caller, colony, name } => {
                let (caller, colony) = (self.resolve(caller), self.resolve(colony));
                self.network
                    .uninstall_extension(caller, colony, ExtensionId::from_name(name))?;
            }
            Action::SetRecoveryRole { caller, target, user } => {
                let (caller, target, user) = (self.resolve(caller), self.resolve(target), self.resolve(user));
                self.network.set_recovery_role(caller, target, user)?;
            }
            Action::RemoveRecoveryRole { caller, target, user } => {
                let (caller, target, user) = (self.resolve(caller), self.resolve(target), self.resolve(user));
                self.network.remove_recovery_role(caller, target, user)?;
            }
            Action::EnterRecovery { caller, target } => {
                let (caller, target) = (self.resolve(caller), self.resolve(target));
                self.network.enter_recovery(caller, target)?;
            }
            Action::EditSlot { caller, target, slot, value } => {
                let (caller, target) = (self.resolve(caller), self.resolve(target));
                let value = Self::word(value)?;
                self.network.edit_slot(caller, target, Slot::index(*slot), value)?;
            }
            Action::ApproveExit { caller, target } => {
                let (caller, target) = (self.resolve(caller), self.resolve(target));
                self.network.approve_exit(caller, target)?;
            }
            Action::ExitRecovery { caller, target, version } => {
                let (caller, target) = (self.resolve(caller), self.resolve(target));
                self.network.exit_recovery(caller, target, version.map(Version))?;
            }
            Action::AssertSlot { .. } | Action::AssertRecovery { .. } | Action::AssertColonyVersion { .. } => {}
        }
        Ok(())
    }
}

/// Load, run, and return the runner for inspection.
pub fn run_scenario(scenario: &Scenario, config: Option<NetworkConfig>) -> Result<(Runner, Vec<StepReport>), ScenarioError> {
    let config = config
        .or_else(|| scenario.config.clone())
        .unwrap_or_default();
    let mut runner = Runner::new(&scenario.owner, config)?;
    let reports = runner.run(&scenario.steps)?;
    Ok((runner, reports))
}
