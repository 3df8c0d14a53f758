//! Organization management
//!
//! Creation provisions the billing party before anything is stored, so an
//! organization never exists without its party.

use std::sync::Arc;

use orgmgr_domain::{Caller, NewOrganization, OrgError, OrgResult, Organization};
use orgmgr_store::{ChangeSet, DomainStore};
use tracing::{debug, error, info, instrument};

use crate::collaborators::PartyProvisioner;

/// Organization service.
#[derive(Clone)]
pub struct OrganizationService {
    store: Arc<dyn DomainStore>,
    parties: Arc<dyn PartyProvisioner>,
}

impl OrganizationService {
    pub fn new(store: Arc<dyn DomainStore>, parties: Arc<dyn PartyProvisioner>) -> Self {
        Self { store, parties }
    }

    /// Create an organization owned by the caller.
    ///
    /// # Errors
    ///
    /// - `Validation` when the name is blank
    /// - `DependencyFailure` when the party cannot be provisioned; nothing is
    ///   stored in that case
    #[instrument(skip(self, caller, request), fields(user_id = %caller.id, name = %request.name))]
    pub async fn create(&self, caller: &Caller, request: NewOrganization) -> OrgResult<Organization> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(OrgError::Validation("organization name is required".to_string()));
        }

        let org = Organization::new(name, &caller.id).with_metadata(request.metadata);

        self.parties
            .create_party(&org.party, &caller.id, &caller.email)
            .await
            .map_err(|e| {
                error!(party_id = %org.party, error = %e, "Party provisioning failed");
                OrgError::DependencyFailure(format!("party provisioning failed: {}", e))
            })?;

        self.store
            .commit(ChangeSet::new().put_organization(org.clone()))
            .await?;

        info!(org_id = %org.id, party_id = %org.party, "Organization created");
        Ok(org)
    }

    /// Rename an organization.
    #[instrument(skip(self))]
    pub async fn modify(&self, org_id: &str, name: &str) -> OrgResult<Organization> {
        let name = name.trim();
        if name.is_empty() {
            return Err(OrgError::Validation("organization name is required".to_string()));
        }

        let mut org = self
            .get(org_id)
            .await?
            .ok_or_else(|| OrgError::not_found("organization", org_id))?;
        org.rename(name);

        self.store
            .commit(ChangeSet::new().put_organization(org.clone()))
            .await?;

        info!("Organization renamed");
        Ok(org)
    }

    /// Find an organization by ID.
    pub async fn get(&self, org_id: &str) -> OrgResult<Option<Organization>> {
        debug!(org_id = %org_id, "Get organization");
        Ok(self.store.find_organization(org_id).await?)
    }

    /// Organizations owned by the user.
    pub async fn find_by_owner(&self, user_id: &str) -> OrgResult<Vec<Organization>> {
        Ok(self.store.organizations_by_owner(user_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::CollaboratorError;
    use async_trait::async_trait;
    use orgmgr_store::MemoryStore;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Ledger {
        parties: Mutex<Vec<(String, String, String)>>,
        fail: bool,
    }

    #[async_trait]
    impl PartyProvisioner for Ledger {
        async fn create_party(
            &self,
            party_id: &str,
            user_id: &str,
            email: &str,
        ) -> Result<(), CollaboratorError> {
            if self.fail {
                return Err(CollaboratorError::Unavailable("ledger down".into()));
            }
            self.parties.lock().unwrap().push((
                party_id.to_string(),
                user_id.to_string(),
                email.to_string(),
            ));
            Ok(())
        }
    }

    fn alice() -> Caller {
        Caller::new("alice", "alice@example.com")
    }

    #[tokio::test]
    async fn test_create_provisions_party() {
        let ledger = Arc::new(Ledger::default());
        let service = OrganizationService::new(Arc::new(MemoryStore::new()), ledger.clone());

        let org = service.create(&alice(), NewOrganization::new("Acme")).await.unwrap();

        assert_eq!(org.owner, "alice");
        assert_eq!(
            ledger.parties.lock().unwrap().clone(),
            vec![(org.party.clone(), "alice".to_string(), "alice@example.com".to_string())]
        );
        assert_eq!(service.get(&org.id).await.unwrap(), Some(org));
    }

    #[tokio::test]
    async fn test_party_failure_stores_nothing() {
        let ledger = Arc::new(Ledger {
            fail: true,
            ..Ledger::default()
        });
        let service = OrganizationService::new(Arc::new(MemoryStore::new()), ledger);

        let result = service.create(&alice(), NewOrganization::new("Acme")).await;

        assert!(matches!(result, Err(OrgError::DependencyFailure(_))));
        assert!(service.find_by_owner("alice").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_modify_renames_only() {
        let service = OrganizationService::new(
            Arc::new(MemoryStore::new()),
            Arc::new(Ledger::default()),
        );
        let org = service.create(&alice(), NewOrganization::new("Acme")).await.unwrap();

        let renamed = service.modify(&org.id, "Acme Holdings").await.unwrap();

        assert_eq!(renamed.name, "Acme Holdings");
        assert_eq!(renamed.owner, org.owner);
        assert_eq!(renamed.party, org.party);
        assert!(matches!(
            service.modify("missing", "x").await,
            Err(OrgError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_blank_name_rejected() {
        let service = OrganizationService::new(
            Arc::new(MemoryStore::new()),
            Arc::new(Ledger::default()),
        );
        assert!(matches!(
            service.create(&alice(), NewOrganization::new("   ")).await,
            Err(OrgError::Validation(_))
        ));
    }
}
