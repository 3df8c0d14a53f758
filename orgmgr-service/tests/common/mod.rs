//! Shared fixtures for the service integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use orgmgr_access::{AccessConfig, DecisionError, DecisionPoint, Operation, PolicyContext, Resolution};
use orgmgr_domain::Caller;
use orgmgr_service::{CollaboratorError, Notifier, OrgManager, OrgManagerConfig, PartyProvisioner};
use orgmgr_store::MemoryStore;

/// Decision point answering with a fixed resolution and recording every
/// context it is asked about.
pub struct ScriptedDecision {
    resolution: Resolution,
    seen: Mutex<Vec<PolicyContext>>,
}

impl ScriptedDecision {
    pub fn allowing() -> Self {
        Self::new(Resolution::Allowed)
    }

    pub fn restricting() -> Self {
        Self::new(Resolution::Restricted)
    }

    fn new(resolution: Resolution) -> Self {
        Self {
            resolution,
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    pub fn operations(&self) -> Vec<Operation> {
        self.seen.lock().unwrap().iter().map(|c| c.operation).collect()
    }

    pub fn last(&self) -> Option<PolicyContext> {
        self.seen.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl DecisionPoint for ScriptedDecision {
    async fn decide(&self, context: &PolicyContext) -> Result<Resolution, DecisionError> {
        self.seen.lock().unwrap().push(context.clone());
        Ok(self.resolution)
    }
}

/// Decision point that cannot be reached.
pub struct UnreachableDecision;

#[async_trait]
impl DecisionPoint for UnreachableDecision {
    async fn decide(&self, _: &PolicyContext) -> Result<Resolution, DecisionError> {
        Err(DecisionError::Unavailable("connection refused".to_string()))
    }
}

/// Party provisioner remembering created parties, optionally failing.
#[derive(Default)]
pub struct PartyLedger {
    fail: bool,
    parties: Mutex<Vec<String>>,
}

impl PartyLedger {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn parties(&self) -> Vec<String> {
        self.parties.lock().unwrap().clone()
    }
}

#[async_trait]
impl PartyProvisioner for PartyLedger {
    async fn create_party(&self, party_id: &str, _: &str, _: &str) -> Result<(), CollaboratorError> {
        if self.fail {
            return Err(CollaboratorError::Unavailable("ledger offline".to_string()));
        }
        self.parties.lock().unwrap().push(party_id.to_string());
        Ok(())
    }
}

/// Notifier keeping every delivered (token, recipient) pair.
#[derive(Default)]
pub struct Outbox {
    fail: bool,
    sent: Mutex<Vec<(String, String)>>,
}

impl Outbox {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for Outbox {
    async fn send_invitation(&self, token: &str, email: &str) -> Result<(), CollaboratorError> {
        if self.fail {
            return Err(CollaboratorError::Unavailable("smtp down".to_string()));
        }
        self.sent
            .lock()
            .unwrap()
            .push((token.to_string(), email.to_string()));
        Ok(())
    }
}

/// A manager over a fresh memory store with handles to every fake.
pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub decision: Arc<ScriptedDecision>,
    pub parties: Arc<PartyLedger>,
    pub outbox: Arc<Outbox>,
    pub manager: OrgManager,
}

impl Harness {
    pub fn new() -> Self {
        Self::build(ScriptedDecision::allowing(), Outbox::default(), AccessConfig::default())
    }

    pub fn build(decision: ScriptedDecision, outbox: Outbox, access: AccessConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        let decision = Arc::new(decision);
        let parties = Arc::new(PartyLedger::default());
        let outbox = Arc::new(outbox);
        let manager = OrgManager::new(
            store.clone(),
            decision.clone(),
            parties.clone(),
            outbox.clone(),
            OrgManagerConfig::default().with_access(access),
        )
        .unwrap();

        Self {
            store,
            decision,
            parties,
            outbox,
            manager,
        }
    }
}

pub fn alice() -> Caller {
    Caller::new("alice", "alice@example.com")
}

pub fn bob() -> Caller {
    Caller::new("bob", "bob@example.com")
}

pub fn carol() -> Caller {
    Caller::new("carol", "carol@example.com")
}
