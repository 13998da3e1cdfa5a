mod common;

use engine::{EngineError, MAX_MEMBERS_PER_GROUP, NewTransaction};
use uuid::Uuid;

use common::{engine, group_with_members, register};

#[tokio::test]
async fn add_member_starts_with_zero_balances() {
    let engine = engine().await;
    let alice = register(&engine, "Alice").await;
    let bob = register(&engine, "Bob").await;
    let group = engine.create_group(alice.id, "Trip", None).await.unwrap();

    let membership = engine.add_member(bob.id, group.id).await.unwrap();
    assert_eq!(membership.user_id, bob.id);
    assert_eq!(membership.group_id, group.id);
    assert_eq!(membership.outgoing_amount, 0);
    assert_eq!(membership.incoming_amount, 0);
}

#[tokio::test]
async fn readding_active_member_conflicts() {
    let engine = engine().await;
    let alice = register(&engine, "Alice").await;
    let bob = register(&engine, "Bob").await;
    let group = group_with_members(&engine, &alice, &[&bob]).await;

    assert_eq!(
        engine.add_member(bob.id, group.id).await.unwrap_err(),
        EngineError::ExistingKey("user already exists in specified group".to_string())
    );
    assert_eq!(
        engine.add_member(alice.id, group.id).await.unwrap_err(),
        EngineError::ExistingKey("user already exists in specified group".to_string())
    );
}

#[tokio::test]
async fn add_member_requires_user_and_group() {
    let engine = engine().await;
    let alice = register(&engine, "Alice").await;
    let group = engine.create_group(alice.id, "Trip", None).await.unwrap();

    assert_eq!(
        engine
            .add_member(Uuid::new_v4(), group.id)
            .await
            .unwrap_err(),
        EngineError::KeyNotFound("user not found".to_string())
    );
    assert_eq!(
        engine
            .add_member(alice.id, Uuid::new_v4())
            .await
            .unwrap_err(),
        EngineError::KeyNotFound("group not found".to_string())
    );
}

#[tokio::test]
async fn eleventh_member_is_rejected() {
    let engine = engine().await;
    let owner = register(&engine, "Owner").await;
    let group = engine.create_group(owner.id, "Big", None).await.unwrap();

    // The owner already holds one seat.
    for i in 1..MAX_MEMBERS_PER_GROUP {
        let user = register(&engine, &format!("member{i}")).await;
        engine.add_member(user.id, group.id).await.unwrap();
    }

    let late = register(&engine, "Late").await;
    assert_eq!(
        engine.add_member(late.id, group.id).await.unwrap_err(),
        EngineError::LimitExceeded("maximum number of people already added".to_string())
    );
}

#[tokio::test]
async fn removed_member_frees_a_seat_and_can_rejoin() {
    let engine = engine().await;
    let alice = register(&engine, "Alice").await;
    let bob = register(&engine, "Bob").await;
    let group = group_with_members(&engine, &alice, &[&bob]).await;
    let membership = engine.membership(bob.id, group.id).await.unwrap();

    engine.remove_member(group.id, membership.id).await.unwrap();

    assert_eq!(
        engine.membership(bob.id, group.id).await.unwrap_err(),
        EngineError::KeyNotFound("user not found in this group".to_string())
    );
    assert_eq!(
        engine
            .remove_member(group.id, membership.id)
            .await
            .unwrap_err(),
        EngineError::KeyNotFound("user not found in group".to_string())
    );

    let again = engine.add_member(bob.id, group.id).await.unwrap();
    assert_ne!(again.id, membership.id);
}

#[tokio::test]
async fn remove_member_checks_the_group() {
    let engine = engine().await;
    let alice = register(&engine, "Alice").await;
    let bob = register(&engine, "Bob").await;
    let group = group_with_members(&engine, &alice, &[&bob]).await;
    let other = engine.create_group(alice.id, "Other", None).await.unwrap();
    let membership = engine.membership(bob.id, group.id).await.unwrap();

    assert_eq!(
        engine
            .remove_member(other.id, membership.id)
            .await
            .unwrap_err(),
        EngineError::KeyNotFound("user not found in group".to_string())
    );
}

#[tokio::test]
async fn group_members_show_pairwise_amounts_for_the_requester() {
    let engine = engine().await;
    let alice = register(&engine, "Alice").await;
    let bob = register(&engine, "Bob").await;
    let carol = register(&engine, "Carol").await;
    let group = group_with_members(&engine, &alice, &[&bob, &carol]).await;

    // Bob owes Alice 100, Alice owes Bob 30, Carol owes Bob 7.
    for (payer, payee, amount) in [
        (alice.id, bob.id, 100),
        (bob.id, alice.id, 30),
        (bob.id, carol.id, 7),
    ] {
        engine
            .add_transaction(group.id, NewTransaction {
                payer_id: payer,
                payee_id: payee,
                amount,
                description: None,
            })
            .await
            .unwrap();
    }

    let members = engine.group_members(group.id, alice.id).await.unwrap();
    assert_eq!(members.len(), 3);

    let row = |id: Uuid| members.iter().find(|m| m.user.id == id).unwrap();
    assert_eq!(row(alice.id).summary.incoming_amount, 0);
    assert_eq!(row(alice.id).summary.outgoing_amount, 0);
    assert_eq!(row(bob.id).summary.incoming_amount, 100);
    assert_eq!(row(bob.id).summary.outgoing_amount, 30);
    assert_eq!(row(carol.id).summary.incoming_amount, 0);
    assert_eq!(row(carol.id).summary.outgoing_amount, 0);

    assert_eq!(
        engine
            .group_members(Uuid::new_v4(), alice.id)
            .await
            .unwrap_err(),
        EngineError::KeyNotFound("group not found".to_string())
    );
}

#[tokio::test]
async fn user_memberships_total_each_group() {
    let engine = engine().await;
    let alice = register(&engine, "Alice").await;
    let bob = register(&engine, "Bob").await;
    let trip = group_with_members(&engine, &alice, &[&bob]).await;
    let flat = engine.create_group(bob.id, "Flat", None).await.unwrap();
    engine.add_member(alice.id, flat.id).await.unwrap();

    for (group_id, payer, payee, amount) in [
        (trip.id, alice.id, bob.id, 40),
        (trip.id, alice.id, bob.id, 2),
        (flat.id, bob.id, alice.id, 15),
    ] {
        engine
            .add_transaction(group_id, NewTransaction {
                payer_id: payer,
                payee_id: payee,
                amount,
                description: None,
            })
            .await
            .unwrap();
    }

    let memberships = engine.user_memberships(alice.id).await.unwrap();
    assert_eq!(memberships.len(), 2);

    let in_trip = memberships.iter().find(|m| m.group.id == trip.id).unwrap();
    assert_eq!(in_trip.summary.outgoing_amount, 42);
    assert_eq!(in_trip.summary.incoming_amount, 0);

    let in_flat = memberships.iter().find(|m| m.group.id == flat.id).unwrap();
    assert_eq!(in_flat.summary.outgoing_amount, 0);
    assert_eq!(in_flat.summary.incoming_amount, 15);

    assert_eq!(
        engine.user_memberships(Uuid::new_v4()).await.unwrap_err(),
        EngineError::KeyNotFound("user not found".to_string())
    );
}
