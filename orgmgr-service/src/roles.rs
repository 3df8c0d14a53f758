//! Organization role catalogue

use std::sync::Arc;

use orgmgr_domain::{OrgError, OrgResult, Organization, RoleDefinition, RoleId};
use orgmgr_store::DomainStore;

/// Read access to the roles an organization offers.
#[derive(Clone)]
pub struct RoleCatalogueService {
    store: Arc<dyn DomainStore>,
}

impl RoleCatalogueService {
    pub fn new(store: Arc<dyn DomainStore>) -> Self {
        Self { store }
    }

    /// One role of the organization's catalogue.
    pub async fn get_role(&self, org_id: &str, role_id: RoleId) -> OrgResult<RoleDefinition> {
        self.organization(org_id)
            .await?
            .role(role_id)
            .cloned()
            .ok_or_else(|| OrgError::not_found("role", role_id))
    }

    /// The organization's whole catalogue.
    pub async fn list_roles(&self, org_id: &str) -> OrgResult<Vec<RoleDefinition>> {
        Ok(self.organization(org_id).await?.roles)
    }

    async fn organization(&self, org_id: &str) -> OrgResult<Organization> {
        self.store
            .find_organization(org_id)
            .await?
            .ok_or_else(|| OrgError::not_found("organization", org_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orgmgr_domain::ResourceScopeId;
    use orgmgr_store::{ChangeSet, MemoryStore};

    #[tokio::test]
    async fn test_catalogue_lookup() {
        let store = Arc::new(MemoryStore::new());
        let org = Organization::new("Acme", "alice").with_roles(vec![RoleDefinition::new(
            RoleId::Manager,
            "Shop manager",
            vec![ResourceScopeId::Shop],
        )]);
        store
            .commit(ChangeSet::new().put_organization(org.clone()))
            .await
            .unwrap();
        let roles = RoleCatalogueService::new(store);

        assert_eq!(roles.list_roles(&org.id).await.unwrap().len(), 1);
        assert_eq!(
            roles.get_role(&org.id, RoleId::Manager).await.unwrap().name,
            "Shop manager"
        );
        assert!(matches!(
            roles.get_role(&org.id, RoleId::Accountant).await,
            Err(OrgError::NotFound(_))
        ));
        assert!(matches!(
            roles.list_roles("missing").await,
            Err(OrgError::NotFound(_))
        ));
    }
}
