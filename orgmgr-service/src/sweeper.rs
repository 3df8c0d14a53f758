//! Periodic invitation expiry.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

use crate::invitation::InvitationManager;

/// Shortest period the loop runs with; `tokio::time::interval` rejects zero.
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Background task running [`InvitationManager::sweep_expired`] on a fixed
/// period until shutdown is signalled.
///
/// # Example
///
/// ```rust,no_run
/// use orgmgr_service::{ExpirySweeper, InvitationManager};
/// use std::time::Duration;
/// use tokio::sync::watch;
///
/// async fn run(invitations: InvitationManager) {
///     let (shutdown, signal) = watch::channel(false);
///     let handle = ExpirySweeper::new(invitations, Duration::from_secs(300)).spawn(signal);
///
///     // ... later
///     shutdown.send(true).unwrap();
///     handle.await.unwrap();
/// }
/// ```
pub struct ExpirySweeper {
    invitations: InvitationManager,
    period: Duration,
}

impl ExpirySweeper {
    /// A zero `period` is raised to one millisecond.
    pub fn new(invitations: InvitationManager, period: Duration) -> Self {
        Self {
            invitations,
            period: period.max(MIN_PERIOD),
        }
    }

    /// Run the sweep loop on a new task.
    pub fn spawn(self, shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }

    /// Sweep every period until `shutdown` turns true or its sender is dropped.
    /// Sweep failures are logged and the loop keeps going.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!(period_secs = self.period.as_secs(), "Invitation sweeper started");
        let mut ticker = tokio::time::interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match self.invitations.sweep_expired().await {
                        Ok(expired) => debug!(expired, "Sweep finished"),
                        Err(e) => error!(error = %e, "Invitation sweep failed"),
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!("Invitation sweeper stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::{CollaboratorError, Notifier};
    use async_trait::async_trait;
    use chrono::Utc;
    use orgmgr_domain::{
        Invitation, InvitationRequest, InvitationStatusName, Invitee, MemberRoleSpec, Organization,
        RoleId,
    };
    use orgmgr_store::{ChangeSet, DomainStore, MemoryStore};
    use std::sync::Arc;

    struct Silent;

    #[async_trait]
    impl Notifier for Silent {
        async fn send_invitation(&self, _: &str, _: &str) -> Result<(), CollaboratorError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_sweeper_expires_and_stops() {
        let store = Arc::new(MemoryStore::new());
        let org = Organization::new("Acme", "alice");
        let stale = Invitation::new(
            &org.id,
            InvitationRequest::new(Invitee::by_email(
                "bob@example.com",
                vec![MemberRoleSpec::new(RoleId::Manager)],
            )),
            chrono::Duration::days(7),
        )
        .unwrap()
        .with_expires_at(Utc::now() - chrono::Duration::minutes(1));
        store
            .commit(
                ChangeSet::new()
                    .put_organization(org)
                    .put_invitation(stale.clone()),
            )
            .await
            .unwrap();

        let invitations =
            InvitationManager::new(store.clone(), Arc::new(Silent), chrono::Duration::days(7));
        let (shutdown, signal) = watch::channel(false);
        let handle = ExpirySweeper::new(invitations, Duration::from_millis(10)).spawn(signal);

        // The first tick fires immediately.
        tokio::time::sleep(Duration::from_millis(50)).await;
        shutdown.send(true).unwrap();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .unwrap()
            .unwrap();

        let swept = store.find_invitation(&stale.id).await.unwrap().unwrap();
        assert_eq!(swept.status_name(), InvitationStatusName::Expired);
    }

    #[tokio::test]
    async fn test_zero_period_still_runs() {
        let store = Arc::new(MemoryStore::new());
        let invitations =
            InvitationManager::new(store, Arc::new(Silent), chrono::Duration::days(7));
        let (shutdown, signal) = watch::channel(false);
        let handle = ExpirySweeper::new(invitations, Duration::ZERO).spawn(signal);

        tokio::time::sleep(Duration::from_millis(10)).await;
        shutdown.send(true).unwrap();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .unwrap()
            .unwrap();
    }
}
