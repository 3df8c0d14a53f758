//! Caller fragment assembly

use std::sync::Arc;

use orgmgr_domain::OrgResult;
use orgmgr_store::DomainStore;
use tracing::debug;

use crate::context::{RoleFragment, UserFragment, UserOrgFragment};

/// Builds the user part of a policy context from the domain store.
#[derive(Clone)]
pub struct UserContextProvider {
    store: Arc<dyn DomainStore>,
}

impl UserContextProvider {
    pub fn new(store: Arc<dyn DomainStore>) -> Self {
        Self { store }
    }

    /// Describe the user, the organizations they own or joined, and their roles
    /// in each.
    ///
    /// A user without a member record is described with the given email.
    pub async fn user_fragment(&self, user_id: &str, email: &str) -> OrgResult<UserFragment> {
        let member = self.store.find_member(user_id).await?;
        let organizations = self.store.organizations_for_user(user_id, None).await?;
        let roles = if member.is_some() {
            self.store.member_roles(user_id).await?
        } else {
            Vec::new()
        };

        debug!(
            user_id = %user_id,
            organizations = organizations.len(),
            roles = roles.len(),
            "Built user fragment"
        );

        let orgs = organizations
            .iter()
            .map(|org| UserOrgFragment {
                id: org.id.clone(),
                owner: org.owner.clone(),
                party: org.party.clone(),
                roles: roles
                    .iter()
                    .filter(|r| r.is_active_in(&org.id))
                    .map(RoleFragment::from)
                    .collect(),
            })
            .collect();

        Ok(UserFragment {
            id: user_id.to_string(),
            email: member.map(|m| m.email).unwrap_or_else(|| email.to_string()),
            orgs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orgmgr_domain::{Member, MemberRole, MemberRoleSpec, Organization, RoleId};
    use orgmgr_store::{ChangeSet, MemoryStore};

    #[tokio::test]
    async fn test_user_without_member_record() {
        let store = Arc::new(MemoryStore::new());
        let owned = Organization::new("Owned", "alice");
        store
            .commit(ChangeSet::new().put_organization(owned.clone()))
            .await
            .unwrap();

        let provider = UserContextProvider::new(store);
        let fragment = provider
            .user_fragment("alice", "alice@example.com")
            .await
            .unwrap();

        assert_eq!(fragment.email, "alice@example.com");
        assert_eq!(fragment.orgs.len(), 1);
        assert_eq!(fragment.orgs[0].id, owned.id);
        assert!(fragment.orgs[0].roles.is_empty());
    }

    #[tokio::test]
    async fn test_roles_grouped_per_organization() {
        let store = Arc::new(MemoryStore::new());
        let first = Organization::new("First", "alice");
        let second = Organization::new("Second", "alice");
        let manager = MemberRole::from_spec("bob", &first.id, &MemberRoleSpec::new(RoleId::Manager));
        let accountant =
            MemberRole::from_spec("bob", &second.id, &MemberRoleSpec::new(RoleId::Accountant));

        store
            .commit(
                ChangeSet::new()
                    .put_organization(first.clone())
                    .put_organization(second.clone())
                    .put_member(Member::new("bob", "bob@example.com"))
                    .put_member_role(manager)
                    .put_member_role(accountant)
                    .link_member(&first.id, "bob")
                    .link_member(&second.id, "bob"),
            )
            .await
            .unwrap();

        let provider = UserContextProvider::new(store);
        let fragment = provider.user_fragment("bob", "ignored@example.com").await.unwrap();

        assert_eq!(fragment.email, "bob@example.com");
        let first_fragment = fragment.orgs.iter().find(|o| o.id == first.id).unwrap();
        assert_eq!(first_fragment.roles.len(), 1);
        assert_eq!(first_fragment.roles[0].role_id, RoleId::Manager);
        let second_fragment = fragment.orgs.iter().find(|o| o.id == second.id).unwrap();
        assert_eq!(second_fragment.roles[0].role_id, RoleId::Accountant);
    }
}
