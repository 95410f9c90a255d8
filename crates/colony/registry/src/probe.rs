//! Read what a resolver declares about the code behind it.

use colony_dispatch::{Dispatcher, Host};
use colony_storage::Layout;
use colony_types::{Address, CallData, ExtensionId, Token, Version};

use crate::error::RegistryError;

fn probe(host: &Host, layout: &'static Layout, resolver: Address, signature: &str) -> Result<Token, RegistryError> {
    if resolver.is_zero() || !host.has_resolver(&resolver) {
        return Err(RegistryError::BadResolver(resolver));
    }
    let mut scratch = Dispatcher::new(Address::ZERO, layout, Address::ZERO, resolver);
    scratch
        .static_call(host, &CallData::bare(signature))
        .ok()
        .and_then(|out| out.into_iter().next())
        .ok_or(RegistryError::BadResolver(resolver))
}

/// The `version()` a resolver's implementation reports.
pub fn declared_version(host: &Host, layout: &'static Layout, resolver: Address) -> Result<Version, RegistryError> {
    probe(host, layout, resolver, "version()")?
        .as_uint()
        .and_then(|v| u64::try_from(v).ok())
        .map(Version)
        .ok_or(RegistryError::BadResolver(resolver))
}

/// The `identifier()` an extension resolver's implementation reports.
pub fn declared_identifier(host: &Host, layout: &'static Layout, resolver: Address) -> Result<ExtensionId, RegistryError> {
    probe(host, layout, resolver, "identifier()")?
        .as_word()
        .map(|w| ExtensionId(w.0))
        .ok_or(RegistryError::BadResolver(resolver))
}
