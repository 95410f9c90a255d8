//! Property tests: a resolver either binds every selector its interface
//! requires, or is never built.

use colony_dispatch::{DispatchError, FunctionSpec, Host, Interface, Invocation, Module, ModuleError, Resolver};
use colony_types::{Address, Selector, Token};
use proptest::prelude::*;
use std::sync::Arc;

const POOL: [&str; 8] = [
    "alpha()",
    "beta(uint256)",
    "gamma(address)",
    "delta(bytes32)",
    "epsilon(uint256,address)",
    "zeta()",
    "eta(bool)",
    "theta(int256)",
];

const ORIGINS: [&str; 2] = ["Left", "Right"];

struct Claims {
    name: String,
    functions: Vec<FunctionSpec>,
}

impl Module for Claims {
    fn name(&self) -> &str {
        &self.name
    }

    fn functions(&self) -> Vec<FunctionSpec> {
        self.functions.clone()
    }

    fn invoke(&self, _call: &mut Invocation<'_>) -> Result<Vec<Token>, ModuleError> {
        Ok(Vec::new())
    }
}

/// Per module: which pool signatures it claims, and under which origin.
fn arb_modules() -> impl Strategy<Value = Vec<(Vec<bool>, usize)>> {
    prop::collection::vec((prop::collection::vec(any::<bool>(), POOL.len()), 0..ORIGINS.len()), 1..4)
}

proptest! {
    #[test]
    fn bound_everywhere_or_not_built(
        wanted in prop::collection::vec(any::<bool>(), POOL.len()),
        modules in arb_modules(),
    ) {
        let mut host = Host::new();
        let mut named = Vec::new();
        for (i, (claims, origin)) in modules.iter().enumerate() {
            let functions = POOL
                .iter()
                .zip(claims)
                .filter(|(_, claimed)| **claimed)
                .map(|(sig, _)| FunctionSpec::view(*sig, ORIGINS[*origin]))
                .collect();
            let address = host.deploy_module(Arc::new(Claims { name: format!("m{i}"), functions }));
            named.push((format!("m{i}"), address));
        }
        let names: Vec<(&str, Address)> = named.iter().map(|(n, a)| (n.as_str(), *a)).collect();
        let signatures: Vec<&str> = POOL.iter().zip(&wanted).filter(|(_, w)| **w).map(|(s, _)| *s).collect();
        let iface = Interface::new("IProp", signatures.clone());

        let covered = signatures.iter().all(|sig| {
            let idx = POOL.iter().position(|p| p == sig).unwrap();
            modules.iter().any(|(claims, _)| claims[idx])
        });
        let consistent = signatures.iter().all(|sig| {
            let idx = POOL.iter().position(|p| p == sig).unwrap();
            let mut origins = modules.iter().filter(|(c, _)| c[idx]).map(|(_, o)| *o);
            match origins.next() {
                Some(first) => origins.all(|o| o == first),
                None => true,
            }
        });

        match Resolver::build(&iface, &names, &host) {
            Ok(resolver) => {
                prop_assert!(covered && consistent);
                for sig in &signatures {
                    prop_assert!(!resolver.lookup(Selector::from_signature(sig)).is_zero());
                }
                prop_assert_eq!(resolver.len(), signatures.len());
            }
            Err(DispatchError::IncompleteInterface { .. }) => prop_assert!(!covered),
            Err(DispatchError::AmbiguousBinding { .. }) => prop_assert!(!consistent),
            Err(other) => prop_assert!(false, "unexpected error {other}"),
        }
    }
}
