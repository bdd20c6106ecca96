//! Roles and brand scopes.
//!
//! The console has exactly two roles. An aggregator sees every brand; a brand
//! user is pinned to a single brand scope. Encoding the scope inside the
//! `Brand` variant makes "scope present iff Brand" a property of the type
//! rather than a convention each call site has to remember.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ValidationError;

/// Brand/tenant name a brand session is restricted to.
///
/// Case is preserved and comparisons are exact: `Nike` and `nike` are
/// different scopes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BrandScope(String);

impl BrandScope {
    /// Creates a new BrandScope, returning error if blank.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::empty_field("scope"));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for BrandScope {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BrandScope> for String {
    fn from(scope: BrandScope) -> Self {
        scope.0
    }
}

impl fmt::Display for BrandScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Role discriminant without the scope payload.
///
/// Used for route requirements and `has_role` checks, where only the kind of
/// role matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleKind {
    Aggregator,
    Brand,
}

impl fmt::Display for RoleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoleKind::Aggregator => write!(f, "aggregator"),
            RoleKind::Brand => write!(f, "brand"),
        }
    }
}

/// A console role, carrying the brand scope for brand users.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Role {
    /// Full visibility across every brand.
    Aggregator,
    /// Restricted to records owned by one brand.
    Brand(BrandScope),
}

impl Role {
    /// Builds a role from its kind and an optional scope.
    ///
    /// Fails when an aggregator is given a scope or a brand is given none.
    pub fn from_parts(kind: RoleKind, scope: Option<String>) -> Result<Self, ValidationError> {
        match (kind, scope) {
            (RoleKind::Aggregator, None) => Ok(Role::Aggregator),
            (RoleKind::Aggregator, Some(_)) => Err(ValidationError::invalid_format(
                "scope",
                "aggregator role must not carry a scope",
            )),
            (RoleKind::Brand, Some(scope)) => Ok(Role::Brand(BrandScope::new(scope)?)),
            (RoleKind::Brand, None) => Err(ValidationError::empty_field("scope")),
        }
    }

    pub fn kind(&self) -> RoleKind {
        match self {
            Role::Aggregator => RoleKind::Aggregator,
            Role::Brand(_) => RoleKind::Brand,
        }
    }

    pub fn scope(&self) -> Option<&BrandScope> {
        match self {
            Role::Aggregator => None,
            Role::Brand(scope) => Some(scope),
        }
    }

    pub fn is(&self, kind: RoleKind) -> bool {
        self.kind() == kind
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Aggregator => write!(f, "aggregator"),
            Role::Brand(scope) => write!(f, "brand({})", scope),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brand_scope_rejects_blank() {
        assert!(BrandScope::new("").is_err());
        assert!(BrandScope::new("   ").is_err());
    }

    #[test]
    fn brand_scope_preserves_case() {
        let scope = BrandScope::new("PepsiCo").unwrap();
        assert_eq!(scope.as_str(), "PepsiCo");
        assert_ne!(scope, BrandScope::new("pepsico").unwrap());
    }

    #[test]
    fn role_from_parts_accepts_valid_combinations() {
        assert_eq!(
            Role::from_parts(RoleKind::Aggregator, None).unwrap(),
            Role::Aggregator
        );
        let brand = Role::from_parts(RoleKind::Brand, Some("Nike".to_string())).unwrap();
        assert_eq!(brand.scope().map(BrandScope::as_str), Some("Nike"));
    }

    #[test]
    fn role_from_parts_rejects_aggregator_with_scope() {
        let result = Role::from_parts(RoleKind::Aggregator, Some("Nike".to_string()));
        assert!(matches!(result, Err(ValidationError::InvalidFormat { .. })));
    }

    #[test]
    fn role_from_parts_rejects_brand_without_scope() {
        let result = Role::from_parts(RoleKind::Brand, None);
        assert!(matches!(result, Err(ValidationError::EmptyField { .. })));
    }

    #[test]
    fn role_kind_and_predicates() {
        let brand = Role::Brand(BrandScope::new("HUL").unwrap());
        assert_eq!(brand.kind(), RoleKind::Brand);
        assert!(brand.is(RoleKind::Brand));
        assert!(!brand.is(RoleKind::Aggregator));
        assert!(Role::Aggregator.scope().is_none());
    }

    #[test]
    fn role_kind_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&RoleKind::Brand).unwrap(), "\"brand\"");
        let kind: RoleKind = serde_json::from_str("\"aggregator\"").unwrap();
        assert_eq!(kind, RoleKind::Aggregator);
    }
}
