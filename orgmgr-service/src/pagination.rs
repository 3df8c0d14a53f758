//! Organization pagination
//!
//! Lists the organizations a user owns or belongs to, in pages keyed by
//! organization ID. The continuation token is simply the last ID of the
//! previous page, so pages stay stable as long as membership does not change
//! between fetches. No snapshot is taken.

use std::sync::Arc;

use orgmgr_domain::{OrgResult, OrganizationPage};
use orgmgr_store::DomainStore;
use tracing::debug;

/// Cursor-based listing of a user's organizations.
#[derive(Clone)]
pub struct OrganizationPager {
    store: Arc<dyn DomainStore>,
}

impl OrganizationPager {
    pub fn new(store: Arc<dyn DomainStore>) -> Self {
        Self { store }
    }

    /// Fetch one page.
    ///
    /// `limit` of `None` or `0` means the default page size. A returned
    /// continuation token of `None` marks the last page.
    pub async fn find_all_organizations(
        &self,
        user_id: &str,
        limit: Option<usize>,
        continuation_token: Option<&str>,
    ) -> OrgResult<OrganizationPage> {
        let remaining = self
            .store
            .organizations_for_user(user_id, continuation_token)
            .await?;

        let page = OrganizationPage::from_remaining(remaining, limit);
        debug!(
            user_id = %user_id,
            returned = page.result.len(),
            more = page.continuation_token.is_some(),
            "Listed organizations"
        );
        Ok(page)
    }
}
