//! Role and scope vocabulary
//!
//! This module defines the closed set of organization roles and resource scopes,
//! the role templates used by invitations and role assignment, and the
//! per-organization role catalogue that templates are validated against.

use serde::{Deserialize, Serialize};

use crate::error::{OrgError, OrgResult};

/// Role a member can hold within an organization.
///
/// Roles are not hierarchical. A member may hold several roles at once, and the
/// same role at several scopes.
///
/// # Examples
///
/// ```
/// use orgmgr_domain::RoleId;
///
/// assert_eq!(RoleId::parse("administrator"), Some(RoleId::Administrator));
/// assert_eq!(RoleId::Accountant.as_str(), "Accountant");
/// assert_eq!(RoleId::parse("owner"), None);
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RoleId {
    /// Full control over the organization, its members and invitations
    Administrator,

    /// Day-to-day management of shops and members
    Manager,

    /// Access to financial reports and payouts
    Accountant,

    /// API and integration access
    Integrator,
}

impl RoleId {
    /// All known roles, in catalogue order.
    pub const ALL: [RoleId; 4] = [
        RoleId::Administrator,
        RoleId::Manager,
        RoleId::Accountant,
        RoleId::Integrator,
    ];

    /// Parse role from string representation (case-insensitive).
    ///
    /// # Returns
    ///
    /// `Some(RoleId)` if valid, `None` otherwise
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "administrator" => Some(Self::Administrator),
            "manager" => Some(Self::Manager),
            "accountant" => Some(Self::Accountant),
            "integrator" => Some(Self::Integrator),
            _ => None,
        }
    }

    /// Get the canonical string representation of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Administrator => "Administrator",
            Self::Manager => "Manager",
            Self::Accountant => "Accountant",
            Self::Integrator => "Integrator",
        }
    }
}

impl std::fmt::Display for RoleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of resource a role can be narrowed to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ResourceScopeId {
    /// A single shop of the organization
    Shop,
}

impl ResourceScopeId {
    /// Parse scope kind from string representation (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "shop" => Some(Self::Shop),
            _ => None,
        }
    }

    /// Get the canonical string representation of the scope kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Shop => "Shop",
        }
    }
}

impl std::fmt::Display for ResourceScopeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Narrowing of a role to one resource.
///
/// A scope always names the resource it applies to, so a scope kind without a
/// resource id cannot be represented.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct RoleScope {
    /// Scope kind
    pub id: ResourceScopeId,

    /// Identifier of the scoped resource
    pub resource_id: String,
}

impl RoleScope {
    /// Create a shop scope.
    pub fn shop(resource_id: impl Into<String>) -> Self {
        Self {
            id: ResourceScopeId::Shop,
            resource_id: resource_id.into(),
        }
    }
}

/// Template of a role, not yet bound to a member.
///
/// Invitations carry these until they are accepted; role assignment requests
/// carry one.
///
/// # Examples
///
/// ```
/// use orgmgr_domain::{MemberRoleSpec, RoleId, RoleScope};
///
/// let admin = MemberRoleSpec::new(RoleId::Administrator);
/// assert!(admin.scope.is_none());
///
/// let shop_manager = MemberRoleSpec::scoped(RoleId::Manager, RoleScope::shop("shop-1"));
/// assert_eq!(shop_manager.scope_resource_id(), Some("shop-1"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct MemberRoleSpec {
    /// Role to grant
    pub role_id: RoleId,

    /// Optional narrowing to a single resource
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<RoleScope>,
}

impl MemberRoleSpec {
    /// Creates an organization-wide role template.
    pub fn new(role_id: RoleId) -> Self {
        Self {
            role_id,
            scope: None,
        }
    }

    /// Creates a role template narrowed to one resource.
    pub fn scoped(role_id: RoleId, scope: RoleScope) -> Self {
        Self {
            role_id,
            scope: Some(scope),
        }
    }

    /// Identifier of the scoped resource, if any.
    pub fn scope_resource_id(&self) -> Option<&str> {
        self.scope.as_ref().map(|s| s.resource_id.as_str())
    }
}

/// Role available in an organization's catalogue.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoleDefinition {
    /// Role identifier
    pub role_id: RoleId,

    /// Human-readable name
    pub name: String,

    /// Scope kinds this role may be narrowed to
    #[serde(default)]
    pub scopes: Vec<ResourceScopeId>,
}

impl RoleDefinition {
    /// Creates a role definition.
    pub fn new(role_id: RoleId, name: impl Into<String>, scopes: Vec<ResourceScopeId>) -> Self {
        Self {
            role_id,
            name: name.into(),
            scopes,
        }
    }

    /// Check if this role may be narrowed to the given scope kind.
    pub fn allows_scope(&self, scope: ResourceScopeId) -> bool {
        self.scopes.contains(&scope)
    }
}

/// Catalogue installed into every new organization.
pub fn default_catalogue() -> Vec<RoleDefinition> {
    vec![
        RoleDefinition::new(RoleId::Administrator, "Administrator", Vec::new()),
        RoleDefinition::new(RoleId::Manager, "Manager", vec![ResourceScopeId::Shop]),
        RoleDefinition::new(RoleId::Accountant, "Accountant", vec![ResourceScopeId::Shop]),
        RoleDefinition::new(RoleId::Integrator, "Integrator", vec![ResourceScopeId::Shop]),
    ]
}

/// Validate a role template against a catalogue.
///
/// The role must be present in the catalogue, and a scoped template must use a
/// scope kind the role allows and name a non-empty resource.
pub fn validate_spec(catalogue: &[RoleDefinition], spec: &MemberRoleSpec) -> OrgResult<()> {
    let definition = catalogue
        .iter()
        .find(|d| d.role_id == spec.role_id)
        .ok_or_else(|| {
            OrgError::Validation(format!("role {} is not available in this organization", spec.role_id))
        })?;

    if let Some(scope) = &spec.scope {
        if !definition.allows_scope(scope.id) {
            return Err(OrgError::Validation(format!(
                "role {} cannot be scoped to {}",
                spec.role_id, scope.id
            )));
        }
        if scope.resource_id.trim().is_empty() {
            return Err(OrgError::Validation(format!(
                "scope {} requires a resource id",
                scope.id
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_round_trip() {
        for role in RoleId::ALL {
            assert_eq!(RoleId::parse(role.as_str()), Some(role));
        }
        assert_eq!(RoleId::parse("ACCOUNTANT"), Some(RoleId::Accountant));
        assert_eq!(RoleId::parse("superuser"), None);
    }

    #[test]
    fn test_scope_parse() {
        assert_eq!(ResourceScopeId::parse("shop"), Some(ResourceScopeId::Shop));
        assert_eq!(ResourceScopeId::parse("wallet"), None);
    }

    #[test]
    fn test_validate_known_unscoped_role() {
        let catalogue = default_catalogue();
        assert!(validate_spec(&catalogue, &MemberRoleSpec::new(RoleId::Administrator)).is_ok());
    }

    #[test]
    fn test_validate_scoped_role() {
        let catalogue = default_catalogue();
        let spec = MemberRoleSpec::scoped(RoleId::Manager, RoleScope::shop("shop-1"));
        assert!(validate_spec(&catalogue, &spec).is_ok());
    }

    #[test]
    fn test_validate_rejects_disallowed_scope() {
        let catalogue = default_catalogue();
        let spec = MemberRoleSpec::scoped(RoleId::Administrator, RoleScope::shop("shop-1"));
        assert!(matches!(
            validate_spec(&catalogue, &spec),
            Err(OrgError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_rejects_role_missing_from_catalogue() {
        let catalogue = vec![RoleDefinition::new(RoleId::Administrator, "Admin", Vec::new())];
        let spec = MemberRoleSpec::new(RoleId::Integrator);
        assert!(matches!(
            validate_spec(&catalogue, &spec),
            Err(OrgError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_rejects_blank_resource() {
        let catalogue = default_catalogue();
        let spec = MemberRoleSpec::scoped(RoleId::Accountant, RoleScope::shop("  "));
        assert!(validate_spec(&catalogue, &spec).is_err());
    }

    #[test]
    fn test_role_serializes_canonically() {
        let json = serde_json::to_string(&MemberRoleSpec::new(RoleId::Manager)).unwrap();
        assert_eq!(json, r#"{"role_id":"Manager"}"#);
    }
}
