mod common;

use engine::{EngineError, GroupChanges, MAX_GROUPS_PER_USER, Pagination};
use uuid::Uuid;

use common::{engine, group_with_members, register};

#[tokio::test]
async fn creator_becomes_first_member() {
    let engine = engine().await;
    let alice = register(&engine, "Alice").await;

    let group = engine
        .create_group(alice.id, "  Trip  ", Some(" summer "))
        .await
        .unwrap();
    assert_eq!(group.name, "Trip");
    assert_eq!(group.tag.as_deref(), Some("summer"));
    assert_eq!(group.created_by, alice.id);
    assert_eq!(group.total_spent, 0);

    let membership = engine.membership(alice.id, group.id).await.unwrap();
    assert_eq!(membership.outgoing_amount, 0);
    assert_eq!(membership.incoming_amount, 0);
}

#[tokio::test]
async fn create_group_validates_input() {
    let engine = engine().await;
    let alice = register(&engine, "Alice").await;

    assert!(matches!(
        engine.create_group(alice.id, "   ", None).await,
        Err(EngineError::InvalidInput(_))
    ));
    assert_eq!(
        engine
            .create_group(Uuid::new_v4(), "Trip", None)
            .await
            .unwrap_err(),
        EngineError::KeyNotFound("user not found".to_string())
    );
}

#[tokio::test]
async fn eleventh_group_is_rejected() {
    let engine = engine().await;
    let alice = register(&engine, "Alice").await;

    for i in 0..MAX_GROUPS_PER_USER {
        engine
            .create_group(alice.id, &format!("group {i}"), None)
            .await
            .unwrap();
    }

    assert_eq!(
        engine
            .create_group(alice.id, "one too many", None)
            .await
            .unwrap_err(),
        EngineError::LimitExceeded("maximum groups already created".to_string())
    );

    // The cap is per creator.
    let bob = register(&engine, "Bob").await;
    engine.create_group(bob.id, "bob's", None).await.unwrap();
}

#[tokio::test]
async fn only_creator_updates_group() {
    let engine = engine().await;
    let alice = register(&engine, "Alice").await;
    let bob = register(&engine, "Bob").await;
    let group = engine
        .create_group(alice.id, "Trip", Some("summer"))
        .await
        .unwrap();

    let changes = GroupChanges {
        name: "Road trip".to_string(),
        tag: None,
        total_spent: Some(4_200),
    };
    assert_eq!(
        engine
            .update_group(group.id, bob.id, changes.clone())
            .await
            .unwrap_err(),
        EngineError::Forbidden("only admin can update this group".to_string())
    );

    let updated = engine
        .update_group(group.id, alice.id, changes)
        .await
        .unwrap();
    assert_eq!(updated.name, "Road trip");
    assert_eq!(updated.tag, None);
    assert_eq!(updated.total_spent, 4_200);
    assert_eq!(engine.group(group.id).await.unwrap(), updated);

    assert_eq!(
        engine
            .update_group(Uuid::new_v4(), alice.id, GroupChanges {
                name: "x".to_string(),
                ..GroupChanges::default()
            })
            .await
            .unwrap_err(),
        EngineError::KeyNotFound("group not found".to_string())
    );
}

#[tokio::test]
async fn delete_group_removes_dependent_rows() {
    let engine = engine().await;
    let alice = register(&engine, "Alice").await;
    let bob = register(&engine, "Bob").await;
    let carol = register(&engine, "Carol").await;
    let group = group_with_members(&engine, &alice, &[&bob]).await;
    engine
        .add_transaction(group.id, engine::NewTransaction {
            payer_id: alice.id,
            payee_id: bob.id,
            amount: 30,
            description: None,
        })
        .await
        .unwrap();
    engine.invite(alice.id, carol.id, group.id).await.unwrap();

    assert_eq!(
        engine.delete_group(group.id, bob.id).await.unwrap_err(),
        EngineError::Forbidden("only admin can delete this group".to_string())
    );

    engine.delete_group(group.id, alice.id).await.unwrap();

    assert_eq!(
        engine.group(group.id).await.unwrap_err(),
        EngineError::KeyNotFound("group not found".to_string())
    );
    assert!(engine.user_memberships(bob.id).await.unwrap().is_empty());
    assert!(
        engine
            .invitations(&engine::InvitationFilter {
                user_id: Some(carol.id)
            })
            .await
            .unwrap()
            .is_empty()
    );
    assert_eq!(
        engine.delete_group(group.id, alice.id).await.unwrap_err(),
        EngineError::KeyNotFound("group not found".to_string())
    );
}

#[tokio::test]
async fn user_groups_are_paginated_with_total() {
    let engine = engine().await;
    let alice = register(&engine, "Alice").await;
    let bob = register(&engine, "Bob").await;
    for i in 0..5 {
        engine
            .create_group(alice.id, &format!("group {i}"), None)
            .await
            .unwrap();
    }
    engine.create_group(bob.id, "bob's", None).await.unwrap();

    let (first, total) = engine
        .user_groups(alice.id, Pagination {
            limit: 2,
            offset: 0,
        })
        .await
        .unwrap();
    assert_eq!(total, 5);
    assert_eq!(first.len(), 2);
    assert!(first.iter().all(|g| g.group.created_by == alice.id));
    assert_eq!(first[0].creator.as_ref().map(|u| u.id), Some(alice.id));

    let (rest, _) = engine
        .user_groups(alice.id, Pagination {
            limit: 10,
            offset: 2,
        })
        .await
        .unwrap();
    assert_eq!(rest.len(), 3);
    assert!(rest.iter().all(|g| first.iter().all(|f| f.group.id != g.group.id)));

    assert_eq!(
        engine
            .user_groups(Uuid::new_v4(), Pagination::default())
            .await
            .unwrap_err(),
        EngineError::KeyNotFound("user not found".to_string())
    );
}
