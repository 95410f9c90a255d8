use colony_types::{selector::canonical_signature, Selector};
use serde::{Deserialize, Serialize};

use crate::module::Module;

/// The public surface a resolver must cover: a name plus canonical
/// signatures.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interface {
    pub name: String,
    pub signatures: Vec<String>,
}

impl Interface {
    pub fn new<S: AsRef<str>>(name: impl Into<String>, signatures: impl IntoIterator<Item = S>) -> Self {
        let mut out = Self {
            name: name.into(),
            signatures: Vec::new(),
        };
        for sig in signatures {
            out.push(sig.as_ref());
        }
        out
    }

    /// The union of every function the given modules expose.
    pub fn from_modules(name: impl Into<String>, modules: &[&dyn Module]) -> Self {
        let mut out = Self::new(name, std::iter::empty::<&str>());
        for module in modules {
            for f in module.functions() {
                out.push(f.signature);
            }
        }
        out
    }

    fn push(&mut self, signature: &str) {
        let canonical = canonical_signature(signature);
        if !self.signatures.contains(&canonical) {
            self.signatures.push(canonical);
        }
    }

    pub fn selectors(&self) -> impl Iterator<Item = (Selector, &str)> {
        self.signatures
            .iter()
            .map(|s| (Selector::from_signature(s), s.as_str()))
    }

    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }
}
