mod common;

use engine::{Engine, EngineError, Group, NetBalance, NewTransaction, User};
use uuid::Uuid;

use common::{engine, group_with_members, register};

fn entry(payer: &User, payee: &User, amount: i64) -> NewTransaction {
    NewTransaction {
        payer_id: payer.id,
        payee_id: payee.id,
        amount,
        description: Some("dinner".to_string()),
    }
}

async fn pair(engine: &Engine) -> (User, User, Group) {
    let alice = register(engine, "Alice").await;
    let bob = register(engine, "Bob").await;
    let group = group_with_members(engine, &alice, &[&bob]).await;
    (alice, bob, group)
}

#[tokio::test]
async fn add_transaction_refreshes_both_parties() {
    let engine = engine().await;
    let (alice, bob, group) = pair(&engine).await;

    let tx = engine
        .add_transaction(group.id, entry(&alice, &bob, 50))
        .await
        .unwrap();
    assert!(tx.is_outstanding());
    assert_eq!(tx.description.as_deref(), Some("dinner"));

    let payer = engine.membership(alice.id, group.id).await.unwrap();
    let payee = engine.membership(bob.id, group.id).await.unwrap();
    assert_eq!(payer.incoming_amount, 50);
    assert_eq!(payer.outgoing_amount, 0);
    assert_eq!(payee.outgoing_amount, 50);
    assert_eq!(payee.incoming_amount, 0);

    engine
        .add_transaction(group.id, entry(&bob, &alice, 20))
        .await
        .unwrap();
    let payer = engine.membership(alice.id, group.id).await.unwrap();
    assert_eq!(payer.incoming_amount, 50);
    assert_eq!(payer.outgoing_amount, 20);
}

#[tokio::test]
async fn aggregates_are_scoped_to_the_group() {
    let engine = engine().await;
    let (alice, bob, trip) = pair(&engine).await;
    let flat = group_with_members(&engine, &alice, &[&bob]).await;

    engine
        .add_transaction(trip.id, entry(&alice, &bob, 10))
        .await
        .unwrap();
    engine
        .add_transaction(flat.id, entry(&alice, &bob, 5))
        .await
        .unwrap();

    assert_eq!(
        engine
            .membership(alice.id, trip.id)
            .await
            .unwrap()
            .incoming_amount,
        10
    );
    assert_eq!(
        engine
            .membership(alice.id, flat.id)
            .await
            .unwrap()
            .incoming_amount,
        5
    );
}

#[tokio::test]
async fn add_transaction_validates_input() {
    let engine = engine().await;
    let (alice, bob, group) = pair(&engine).await;
    let stranger = register(&engine, "Stranger").await;

    assert!(matches!(
        engine.add_transaction(group.id, entry(&alice, &bob, 0)).await,
        Err(EngineError::InvalidAmount(_))
    ));
    assert!(matches!(
        engine
            .add_transaction(group.id, entry(&alice, &alice, 10))
            .await,
        Err(EngineError::InvalidInput(_))
    ));
    assert_eq!(
        engine
            .add_transaction(group.id, entry(&alice, &stranger, 10))
            .await
            .unwrap_err(),
        EngineError::KeyNotFound("user not found in this group".to_string())
    );
    assert_eq!(
        engine
            .add_transaction(Uuid::new_v4(), entry(&alice, &bob, 10))
            .await
            .unwrap_err(),
        EngineError::KeyNotFound("group not found".to_string())
    );

    // Nothing was stored by the failed attempts.
    assert!(engine.net_balances(bob.id, group.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn batch_is_all_or_nothing() {
    let engine = engine().await;
    let (alice, bob, group) = pair(&engine).await;

    let err = engine
        .add_transactions(group.id, vec![
            entry(&alice, &bob, 10),
            entry(&bob, &alice, 0),
        ])
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));
    assert!(engine.net_balances(bob.id, group.id).await.unwrap().is_empty());
    assert_eq!(
        engine
            .membership(alice.id, group.id)
            .await
            .unwrap()
            .incoming_amount,
        0
    );

    let recorded = engine
        .add_transactions(group.id, vec![
            entry(&alice, &bob, 10),
            entry(&alice, &bob, 15),
        ])
        .await
        .unwrap();
    assert_eq!(recorded.len(), 2);
    assert_eq!(
        engine
            .membership(bob.id, group.id)
            .await
            .unwrap()
            .outgoing_amount,
        25
    );

    assert!(matches!(
        engine.add_transactions(group.id, Vec::new()).await,
        Err(EngineError::InvalidInput(_))
    ));
}

#[tokio::test]
async fn only_payee_marks_paid() {
    let engine = engine().await;
    let (alice, bob, group) = pair(&engine).await;
    let tx = engine
        .add_transaction(group.id, entry(&alice, &bob, 50))
        .await
        .unwrap();

    assert_eq!(
        engine
            .mark_transaction_paid(tx.id, alice.id)
            .await
            .unwrap_err(),
        EngineError::Forbidden("only payee can mark transaction as paid".to_string())
    );

    let paid = engine.mark_transaction_paid(tx.id, bob.id).await.unwrap();
    assert!(paid.is_paid);
    assert!(!paid.is_outstanding());

    assert_eq!(
        engine
            .membership(alice.id, group.id)
            .await
            .unwrap()
            .incoming_amount,
        0
    );
    assert_eq!(
        engine
            .membership(bob.id, group.id)
            .await
            .unwrap()
            .outgoing_amount,
        0
    );
    assert!(engine.net_balances(bob.id, group.id).await.unwrap().is_empty());

    assert_eq!(
        engine
            .mark_transaction_paid(Uuid::new_v4(), bob.id)
            .await
            .unwrap_err(),
        EngineError::KeyNotFound("transaction not found".to_string())
    );
}

#[tokio::test]
async fn only_payer_deletes_and_aggregates_stay_stale() {
    let engine = engine().await;
    let (alice, bob, group) = pair(&engine).await;
    let tx = engine
        .add_transaction(group.id, entry(&alice, &bob, 50))
        .await
        .unwrap();

    assert_eq!(
        engine.delete_transaction(tx.id, bob.id).await.unwrap_err(),
        EngineError::Forbidden("only payer can delete a transaction".to_string())
    );

    engine.delete_transaction(tx.id, alice.id).await.unwrap();

    // The cached aggregate still includes the deleted row...
    assert_eq!(
        engine
            .membership(alice.id, group.id)
            .await
            .unwrap()
            .incoming_amount,
        50
    );
    // ...while live queries already ignore it.
    assert!(engine.net_balances(bob.id, group.id).await.unwrap().is_empty());
    assert_eq!(
        engine.transaction(tx.id).await.unwrap_err(),
        EngineError::KeyNotFound("transaction not found".to_string())
    );
    assert_eq!(
        engine.delete_transaction(tx.id, alice.id).await.unwrap_err(),
        EngineError::KeyNotFound("transaction not found".to_string())
    );

    // The next mutation recomputes from the ledger.
    engine
        .add_transaction(group.id, entry(&alice, &bob, 5))
        .await
        .unwrap();
    assert_eq!(
        engine
            .membership(alice.id, group.id)
            .await
            .unwrap()
            .incoming_amount,
        5
    );

    // An explicit recompute catches up as well.
    let extra = engine
        .add_transaction(group.id, entry(&alice, &bob, 7))
        .await
        .unwrap();
    engine.delete_transaction(extra.id, alice.id).await.unwrap();
    let summary = engine.recompute_balances(alice.id, group.id).await.unwrap();
    assert_eq!(summary.incoming_amount, 5);
}

#[tokio::test]
async fn paid_transaction_can_still_be_deleted() {
    let engine = engine().await;
    let (alice, bob, group) = pair(&engine).await;
    let tx = engine
        .add_transaction(group.id, entry(&alice, &bob, 50))
        .await
        .unwrap();
    engine.mark_transaction_paid(tx.id, bob.id).await.unwrap();

    engine.delete_transaction(tx.id, alice.id).await.unwrap();
}

#[tokio::test]
async fn net_balances_list_what_the_requester_owes_each_payer() {
    let engine = engine().await;
    let x = register(&engine, "X").await;
    let y = register(&engine, "Y").await;
    let group = group_with_members(&engine, &x, &[&y]).await;

    engine
        .add_transaction(group.id, entry(&x, &y, 100))
        .await
        .unwrap();

    assert_eq!(
        engine.net_balances(y.id, group.id).await.unwrap(),
        vec![NetBalance {
            counterparty_id: x.id,
            amount: 100,
        }]
    );
}

#[tokio::test]
async fn net_balances_are_grouped_and_sorted() {
    let engine = engine().await;
    let alice = register(&engine, "Alice").await;
    let bob = register(&engine, "Bob").await;
    let carol = register(&engine, "Carol").await;
    let group = group_with_members(&engine, &alice, &[&bob, &carol]).await;

    engine
        .add_transactions(group.id, vec![
            entry(&bob, &alice, 40),
            entry(&bob, &alice, 30),
            entry(&carol, &alice, 25),
            entry(&alice, &bob, 1_000),
        ])
        .await
        .unwrap();

    assert_eq!(
        engine.net_balances(alice.id, group.id).await.unwrap(),
        vec![
            NetBalance {
                counterparty_id: carol.id,
                amount: 25,
            },
            NetBalance {
                counterparty_id: bob.id,
                amount: 70,
            },
        ]
    );

    assert_eq!(
        engine
            .net_balances(alice.id, Uuid::new_v4())
            .await
            .unwrap_err(),
        EngineError::KeyNotFound("group not found".to_string())
    );
}
