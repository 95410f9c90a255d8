use std::collections::BTreeMap;

use colony_types::{selector::canonical_signature, Address, Selector};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::DispatchError;
use crate::host::Host;
use crate::interface::Interface;

/// One selector's route.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    pub signature: String,
    pub target: Address,
}

/// Maps selectors to module addresses.
///
/// Once deployed to a [`Host`], only the resolver's owner can add bindings,
/// through [`Host::register`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolver {
    bindings: BTreeMap<Selector, Binding>,
}

/// Who claimed a selector while a resolver was being built.
struct Claim<'m> {
    module: &'m str,
    origin: &'static str,
    signature: &'static str,
    target: Address,
}

impl Resolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind every selector of `interface` to the first supplied module that
    /// implements it.
    ///
    /// Two named modules may both implement a selector only when they declare
    /// the same origin (the shared function was inherited, not redefined).
    /// Construction fails if any interface selector is left unbound.
    pub fn build(
        interface: &Interface,
        modules: &[(&str, Address)],
        host: &Host,
    ) -> Result<Self, DispatchError> {
        let wanted: BTreeMap<Selector, &str> = interface.selectors().collect();
        let mut claims: BTreeMap<Selector, Claim<'_>> = BTreeMap::new();

        for (name, address) in modules {
            let module = host
                .module(address)
                .ok_or(DispatchError::UnknownModule(*address))?;
            for f in module.functions() {
                let selector = f.selector();
                if !wanted.contains_key(&selector) {
                    continue;
                }
                match claims.get(&selector) {
                    Some(existing)
                        if existing.origin != f.origin || existing.signature != f.signature =>
                    {
                        return Err(DispatchError::AmbiguousBinding {
                            selector,
                            signature: f.signature.to_string(),
                            first: existing.module.to_string(),
                            second: name.to_string(),
                        });
                    }
                    Some(_) => {}
                    None => {
                        claims.insert(
                            selector,
                            Claim {
                                module: name,
                                origin: f.origin,
                                signature: f.signature,
                                target: *address,
                            },
                        );
                    }
                }
            }
        }

        let mut resolver = Resolver::new();
        for (selector, signature) in &wanted {
            let claim = claims
                .get(selector)
                .ok_or_else(|| DispatchError::IncompleteInterface {
                    interface: interface.name.clone(),
                    signature: signature.to_string(),
                })?;
            debug!(
                selector = %selector,
                signature = %signature,
                module = claim.module,
                "Bound selector"
            );
            resolver.register(signature, claim.target);
        }
        Ok(resolver)
    }

    /// Bind (or rebind) a single signature.
    pub fn register(&mut self, signature: &str, target: Address) -> Selector {
        let signature = canonical_signature(signature);
        let selector = Selector::from_signature(&signature);
        self.bindings.insert(selector, Binding { signature, target });
        selector
    }

    /// The bound target, or the zero address when nothing is bound.
    pub fn lookup(&self, selector: Selector) -> Address {
        self.bindings
            .get(&selector)
            .map(|b| b.target)
            .unwrap_or(Address::ZERO)
    }

    pub fn signature(&self, selector: Selector) -> Option<&str> {
        self.bindings.get(&selector).map(|b| b.signature.as_str())
    }

    pub fn string_to_selector(signature: &str) -> Selector {
        Selector::from_signature(signature)
    }

    pub fn bindings(&self) -> impl Iterator<Item = (&Selector, &Binding)> {
        self.bindings.iter()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
