//! Ledger endpoints.

use api_types::{
    Message,
    transaction::{NetBalance, Transaction, TransactionNew},
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::NewTransaction;
use uuid::Uuid;

use crate::{AuthUser, ServerError, server::ServerState, views};

fn entry(payload: TransactionNew) -> NewTransaction {
    NewTransaction {
        payer_id: payload.payer_id,
        payee_id: payload.payee_id,
        amount: payload.amount,
        description: payload.description,
    }
}

pub async fn add(
    State(state): State<ServerState>,
    Path(group_id): Path<Uuid>,
    Json(payload): Json<TransactionNew>,
) -> Result<(StatusCode, Json<Transaction>), ServerError> {
    let tx = state.engine.add_transaction(group_id, entry(payload)).await?;
    Ok((StatusCode::CREATED, Json(views::transaction(tx))))
}

/// Record a batch of transactions; nothing is stored if one of them fails
pub async fn add_many(
    State(state): State<ServerState>,
    Path(group_id): Path<Uuid>,
    Json(payload): Json<Vec<TransactionNew>>,
) -> Result<(StatusCode, Json<Vec<Transaction>>), ServerError> {
    let entries = payload.into_iter().map(entry).collect();
    let recorded = state.engine.add_transactions(group_id, entries).await?;
    Ok((
        StatusCode::CREATED,
        Json(recorded.into_iter().map(views::transaction).collect()),
    ))
}

pub async fn mark_paid(
    Extension(auth): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(transaction_id): Path<Uuid>,
) -> Result<(StatusCode, Json<Transaction>), ServerError> {
    let tx = state
        .engine
        .mark_transaction_paid(transaction_id, auth.0)
        .await?;
    Ok((StatusCode::ACCEPTED, Json(views::transaction(tx))))
}

pub async fn delete(
    Extension(auth): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(transaction_id): Path<Uuid>,
) -> Result<(StatusCode, Json<Message>), ServerError> {
    state
        .engine
        .delete_transaction(transaction_id, auth.0)
        .await?;
    Ok((StatusCode::ACCEPTED, Json(Message::new("transaction deleted"))))
}

/// What each member of the group owes the caller
pub async fn net_balances(
    Extension(auth): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(group_id): Path<Uuid>,
) -> Result<Json<Vec<NetBalance>>, ServerError> {
    let balances = state.engine.net_balances(auth.0, group_id).await?;
    Ok(Json(balances.into_iter().map(views::net_balance).collect()))
}
