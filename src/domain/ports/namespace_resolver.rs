//! Namespace resolution port.

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::Namespace;

/// Decides which namespace a caller operates in.
///
/// The core never infers a namespace; adapters resolve it once per request and
/// pass it explicitly into every service call.
pub trait NamespaceResolver: Send + Sync {
    /// Resolve from the caller's requested namespace name, if any.
    fn resolve(&self, requested: Option<&str>) -> DomainResult<Namespace>;
}

/// Honours an explicit request, otherwise falls back to a default.
#[derive(Debug, Clone, Copy)]
pub struct DefaultNamespaceResolver {
    default: Namespace,
}

impl DefaultNamespaceResolver {
    pub const fn new(default: Namespace) -> Self {
        Self { default }
    }
}

impl NamespaceResolver for DefaultNamespaceResolver {
    fn resolve(&self, requested: Option<&str>) -> DomainResult<Namespace> {
        match requested.map(str::trim).filter(|s| !s.is_empty()) {
            None => Ok(self.default),
            Some(name) => Namespace::from_str(name).ok_or_else(|| DomainError::InvalidValue {
                field: "namespace",
                reason: format!("unknown namespace '{name}'"),
            }),
        }
    }
}

/// Always resolves to the same namespace, ignoring the request.
#[derive(Debug, Clone, Copy)]
pub struct FixedNamespaceResolver(pub Namespace);

impl NamespaceResolver for FixedNamespaceResolver {
    fn resolve(&self, _requested: Option<&str>) -> DomainResult<Namespace> {
        Ok(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_resolver() {
        let resolver = DefaultNamespaceResolver::new(Namespace::Production);
        assert_eq!(resolver.resolve(None).unwrap(), Namespace::Production);
        assert_eq!(resolver.resolve(Some("")).unwrap(), Namespace::Production);
        assert_eq!(resolver.resolve(Some("test")).unwrap(), Namespace::Test);
        assert!(matches!(
            resolver.resolve(Some("staging")),
            Err(DomainError::InvalidValue { field: "namespace", .. })
        ));
    }

    #[test]
    fn test_fixed_resolver_ignores_request() {
        let resolver = FixedNamespaceResolver(Namespace::Test);
        assert_eq!(resolver.resolve(Some("production")).unwrap(), Namespace::Test);
    }
}
