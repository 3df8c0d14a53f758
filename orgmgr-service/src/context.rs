//! Member context switching

use std::sync::Arc;

use orgmgr_domain::{MemberContext, OrgError, OrgResult};
use orgmgr_store::{ChangeSet, DomainStore};
use tracing::{info, instrument};

/// Tracks which organization each member is working in.
#[derive(Clone)]
pub struct ContextService {
    store: Arc<dyn DomainStore>,
}

impl ContextService {
    pub fn new(store: Arc<dyn DomainStore>) -> Self {
        Self { store }
    }

    /// Select the user's working organization.
    ///
    /// An existing context is updated. A first switch is only allowed for
    /// users who are members somewhere or own an organization.
    #[instrument(skip(self))]
    pub async fn switch_context(&self, user_id: &str, org_id: &str) -> OrgResult<MemberContext> {
        if self.store.find_organization(org_id).await?.is_none() {
            return Err(OrgError::not_found("organization", org_id));
        }

        let context = match self.store.find_member_context(user_id).await? {
            Some(mut context) => {
                context.switch_organization(org_id);
                context
            }
            None => {
                let known = self.store.find_member(user_id).await?.is_some()
                    || !self.store.organizations_by_owner(user_id).await?.is_empty();
                if !known {
                    return Err(OrgError::not_found("member", user_id));
                }
                MemberContext::new(user_id, org_id)
            }
        };

        self.store
            .commit(ChangeSet::new().put_member_context(context.clone()))
            .await?;

        info!("Context switched");
        Ok(context)
    }

    /// The user's current context.
    pub async fn find_context(&self, user_id: &str) -> OrgResult<MemberContext> {
        self.store
            .find_member_context(user_id)
            .await?
            .ok_or_else(|| OrgError::not_found("member context", user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orgmgr_domain::Organization;
    use orgmgr_store::MemoryStore;

    #[tokio::test]
    async fn test_owner_can_switch_and_update() {
        let store = Arc::new(MemoryStore::new());
        let first = Organization::new("First", "alice");
        let second = Organization::new("Second", "alice");
        store
            .commit(
                ChangeSet::new()
                    .put_organization(first.clone())
                    .put_organization(second.clone()),
            )
            .await
            .unwrap();
        let contexts = ContextService::new(store);

        assert!(matches!(
            contexts.find_context("alice").await,
            Err(OrgError::NotFound(_))
        ));

        contexts.switch_context("alice", &first.id).await.unwrap();
        let ctx = contexts.switch_context("alice", &second.id).await.unwrap();

        assert_eq!(ctx.organization_id, second.id);
        assert_eq!(contexts.find_context("alice").await.unwrap(), ctx);
    }

    #[tokio::test]
    async fn test_unknown_user_cannot_switch() {
        let store = Arc::new(MemoryStore::new());
        let org = Organization::new("Acme", "alice");
        store
            .commit(ChangeSet::new().put_organization(org.clone()))
            .await
            .unwrap();
        let contexts = ContextService::new(store);

        assert!(matches!(
            contexts.switch_context("stranger", &org.id).await,
            Err(OrgError::NotFound(_))
        ));
        assert!(matches!(
            contexts.switch_context("alice", "missing").await,
            Err(OrgError::NotFound(_))
        ));
    }
}
