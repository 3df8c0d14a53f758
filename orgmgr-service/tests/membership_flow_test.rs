//! End-to-end membership flows through the organization manager.
//!
//! Every call goes through `OrgManager`, so the access checker, the services
//! and the memory store are exercised together:
//! 1. Invitation redemption by the right and the wrong user
//! 2. Role assignment and the last-role guard
//! 3. Expulsion across several organizations
//! 4. Context switching and the role catalogue

mod common;

use common::{alice, bob, carol, Harness};
use orgmgr_domain::{
    Caller, InvitationRequest, InvitationStatusName, Invitee, MemberRoleSpec, NewOrganization,
    OrgError, Organization, RoleId, RoleScope,
};
use orgmgr_service::OrgManager;
use orgmgr_store::DomainStore;

async fn org(manager: &OrgManager, owner: &Caller, name: &str) -> Organization {
    manager
        .create_org(owner, NewOrganization::new(name))
        .await
        .unwrap()
}

/// Invite `email` into the organization and return the accept token.
async fn invite(
    manager: &OrgManager,
    owner: &Caller,
    org_id: &str,
    email: &str,
    roles: Vec<MemberRoleSpec>,
) -> String {
    manager
        .create_invitation(
            owner,
            org_id,
            InvitationRequest::new(Invitee::by_email(email, roles)),
        )
        .await
        .unwrap()
        .accept_token
}

#[tokio::test]
async fn test_acme_invitation_redeemed_by_invitee_only() {
    let h = Harness::new();
    let acme = org(&h.manager, &alice(), "Acme").await;
    assert_eq!(h.parties.parties(), vec![acme.party.clone()]);

    let invitation = h
        .manager
        .create_invitation(
            &alice(),
            &acme.id,
            InvitationRequest::new(Invitee::by_email(
                "bob@example.com",
                vec![MemberRoleSpec::new(RoleId::Administrator)],
            )),
        )
        .await
        .unwrap();
    assert_eq!(
        h.outbox.sent(),
        vec![(invitation.accept_token.clone(), "bob@example.com".to_string())]
    );

    // Someone else holding the token is turned away.
    let impostor = Caller::new("u2", "alice@example.com");
    let err = h
        .manager
        .join_org(&impostor, &invitation.accept_token)
        .await
        .unwrap_err();
    assert!(matches!(err, OrgError::AccessDenied(_)));
    assert!(!h.store.is_member(&acme.id, "u2").await.unwrap());

    let membership = h
        .manager
        .join_org(&bob(), &invitation.accept_token)
        .await
        .unwrap();
    assert_eq!(membership.organization.id, acme.id);
    assert_eq!(membership.member.member.id, "bob");
    assert_eq!(membership.member.roles.len(), 1);
    assert_eq!(membership.member.roles[0].role_id, RoleId::Administrator);
    assert!(membership.member.roles[0].active);

    let stored = h
        .manager
        .get_invitation(&alice(), &acme.id, &invitation.id)
        .await
        .unwrap();
    assert_eq!(stored.status_name(), InvitationStatusName::Accepted);
    assert_eq!(stored.accepted_member_id(), Some("bob"));

    // A second redemption fails on the terminal state.
    let err = h
        .manager
        .join_org(&bob(), &invitation.accept_token)
        .await
        .unwrap_err();
    assert!(matches!(err, OrgError::InvitationAlreadyAccepted { .. }));
}

#[tokio::test]
async fn test_invitee_email_matches_case_insensitively() {
    let h = Harness::new();
    let acme = org(&h.manager, &alice(), "Acme").await;
    let token = invite(
        &h.manager,
        &alice(),
        &acme.id,
        "bob@example.com",
        vec![MemberRoleSpec::new(RoleId::Accountant)],
    )
    .await;

    let shouting = Caller::new("bob", "BOB@Example.com");
    let membership = h.manager.join_org(&shouting, &token).await.unwrap();
    assert_eq!(membership.member.roles[0].role_id, RoleId::Accountant);
}

#[tokio::test]
async fn test_join_grants_every_template() {
    let h = Harness::new();
    let acme = org(&h.manager, &alice(), "Acme").await;
    let token = invite(
        &h.manager,
        &alice(),
        &acme.id,
        "bob@example.com",
        vec![
            MemberRoleSpec::new(RoleId::Administrator),
            MemberRoleSpec::scoped(RoleId::Manager, RoleScope::shop("shop-1")),
        ],
    )
    .await;

    h.manager.join_org(&bob(), &token).await.unwrap();

    let member = h
        .manager
        .get_org_member(&alice(), &acme.id, "bob")
        .await
        .unwrap();
    let mut granted: Vec<_> = member
        .roles
        .iter()
        .map(|r| (r.role_id, r.scope_resource_id().map(str::to_string), r.active))
        .collect();
    granted.sort();
    assert_eq!(
        granted,
        vec![
            (RoleId::Administrator, None, true),
            (RoleId::Manager, Some("shop-1".to_string()), true),
        ]
    );
}

#[tokio::test]
async fn test_last_role_cannot_be_removed() {
    let h = Harness::new();
    let acme = org(&h.manager, &alice(), "Acme").await;
    let token = invite(
        &h.manager,
        &alice(),
        &acme.id,
        "bob@example.com",
        vec![MemberRoleSpec::new(RoleId::Administrator)],
    )
    .await;
    let joined = h.manager.join_org(&bob(), &token).await.unwrap();
    let admin = joined.member.roles[0].clone();

    let err = h
        .manager
        .remove_member_role(&alice(), &acme.id, "bob", &admin.id)
        .await
        .unwrap_err();
    assert!(matches!(err, OrgError::LastRoleViolation));

    let manager_role = h
        .manager
        .assign_member_role(
            &alice(),
            &acme.id,
            "bob",
            MemberRoleSpec::scoped(RoleId::Manager, RoleScope::shop("shop-1")),
        )
        .await
        .unwrap();

    let removed = h
        .manager
        .remove_member_role(&alice(), &acme.id, "bob", &admin.id)
        .await
        .unwrap();
    assert_eq!(removed.id, admin.id);
    assert!(!removed.active);

    let member = h
        .manager
        .get_org_member(&alice(), &acme.id, "bob")
        .await
        .unwrap();
    assert_eq!(member.roles.len(), 1);
    assert_eq!(member.roles[0].id, manager_role.id);

    let err = h
        .manager
        .remove_member_role(&alice(), &acme.id, "bob", &manager_role.id)
        .await
        .unwrap_err();
    assert!(matches!(err, OrgError::LastRoleViolation));
}

#[tokio::test]
async fn test_assign_rejects_roles_outside_catalogue_rules() {
    let h = Harness::new();
    let acme = org(&h.manager, &alice(), "Acme").await;
    let token = invite(
        &h.manager,
        &alice(),
        &acme.id,
        "bob@example.com",
        vec![MemberRoleSpec::new(RoleId::Manager)],
    )
    .await;
    h.manager.join_org(&bob(), &token).await.unwrap();

    let err = h
        .manager
        .assign_member_role(
            &alice(),
            &acme.id,
            "bob",
            MemberRoleSpec::scoped(RoleId::Administrator, RoleScope::shop("shop-1")),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, OrgError::Validation(_)));

    // Carol never joined.
    let err = h
        .manager
        .assign_member_role(
            &alice(),
            &acme.id,
            "carol",
            MemberRoleSpec::new(RoleId::Manager),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, OrgError::NotFound(_)));
}

#[tokio::test]
async fn test_expel_leaves_other_organizations_alone() {
    let h = Harness::new();
    let acme = org(&h.manager, &alice(), "Acme").await;
    let globex = org(&h.manager, &carol(), "Globex").await;

    for (owner, org_id) in [(alice(), &acme.id), (carol(), &globex.id)] {
        let token = invite(
            &h.manager,
            &owner,
            org_id,
            "bob@example.com",
            vec![MemberRoleSpec::new(RoleId::Integrator)],
        )
        .await;
        h.manager.join_org(&bob(), &token).await.unwrap();
    }

    h.manager
        .expel_org_member(&alice(), &acme.id, "bob")
        .await
        .unwrap();

    assert!(!h.store.is_member(&acme.id, "bob").await.unwrap());
    let roles = h.store.member_roles("bob").await.unwrap();
    assert!(!roles
        .iter()
        .any(|r| r.organization_id == acme.id && r.active));

    let globex_member = h
        .manager
        .get_org_member(&carol(), &globex.id, "bob")
        .await
        .unwrap();
    assert_eq!(globex_member.roles.len(), 1);
    assert!(globex_member.roles[0].active);

    let page = h
        .manager
        .list_org_membership(&bob(), None, None)
        .await
        .unwrap();
    let ids: Vec<_> = page.result.iter().map(|o| o.id.clone()).collect();
    assert_eq!(ids, vec![globex.id.clone()]);

    let err = h
        .manager
        .get_org_member(&alice(), &acme.id, "bob")
        .await
        .unwrap_err();
    assert!(matches!(err, OrgError::NotFound(_)));
}

#[tokio::test]
async fn test_cancel_membership_unlinks_caller() {
    let h = Harness::new();
    let acme = org(&h.manager, &alice(), "Acme").await;
    let token = invite(
        &h.manager,
        &alice(),
        &acme.id,
        "bob@example.com",
        vec![MemberRoleSpec::new(RoleId::Accountant)],
    )
    .await;
    h.manager.join_org(&bob(), &token).await.unwrap();

    let membership = h
        .manager
        .inquire_org_membership(&bob(), &acme.id)
        .await
        .unwrap();
    assert_eq!(membership.organization.name, "Acme");

    h.manager
        .cancel_org_membership(&bob(), &acme.id)
        .await
        .unwrap();
    assert!(!h.store.is_member(&acme.id, "bob").await.unwrap());

    let members = h
        .manager
        .list_org_members(&alice(), &acme.id)
        .await
        .unwrap();
    assert!(members.is_empty());
}

#[tokio::test]
async fn test_context_and_catalogue() {
    let h = Harness::new();
    let acme = org(&h.manager, &alice(), "Acme").await;
    let renamed = h
        .manager
        .modify_org(&alice(), &acme.id, "Acme Corp")
        .await
        .unwrap();
    assert_eq!(renamed.name, "Acme Corp");
    assert_eq!(
        h.manager.get_org(&alice(), &acme.id).await.unwrap().name,
        "Acme Corp"
    );

    let context = h.manager.switch_context(&alice(), &acme.id).await.unwrap();
    assert_eq!(context.organization_id, acme.id);
    assert_eq!(h.manager.get_context(&alice()).await.unwrap(), context);

    let roles = h.manager.list_roles(&alice(), &acme.id).await.unwrap();
    assert_eq!(roles.len(), RoleId::ALL.len());
    let manager_role = h
        .manager
        .get_role(&alice(), &acme.id, RoleId::Manager)
        .await
        .unwrap();
    assert_eq!(manager_role.role_id, RoleId::Manager);

    let err = h
        .manager
        .modify_org(&alice(), &acme.id, "   ")
        .await
        .unwrap_err();
    assert!(matches!(err, OrgError::Validation(_)));
}
