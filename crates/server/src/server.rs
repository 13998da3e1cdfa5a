use axum::{
    Json, Router,
    extract::Request,
    middleware::{self, Next},
    response::Response,
    routing::{delete, get, post, put},
};
use std::{sync::Arc, time::Instant};

use api_types::Message;
use engine::Engine;

use crate::{auth, groups, invitations, memberships, transactions, users};

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub keys: auth::TokenKeys,
}

/// Log every request, and 5xx answers at error level.
async fn http_logger(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    if status.is_server_error() {
        tracing::error!(%method, %path, status = status.as_u16(), elapsed_ms, "request failed");
    } else {
        tracing::info!(%method, %path, status = status.as_u16(), elapsed_ms, "request");
    }
    response
}

async fn hello() -> Json<Message> {
    Json(Message::new("Hello world!!"))
}

pub fn router(state: ServerState) -> Router {
    let protected = Router::new()
        .route("/users", get(users::list))
        .route("/users/{id}", get(users::get))
        .route("/user/{user_id}/group", post(groups::create))
        .route(
            "/user/{user_id}/group/{group_id}",
            put(groups::update).delete(groups::delete),
        )
        .route("/user/{user_id}/groups", get(groups::list))
        .route("/user/{user_id}/memberships", get(memberships::list_for_user))
        .route("/group/{group_id}", get(groups::get))
        .route("/group/{group_id}/user", post(memberships::add))
        .route("/group/{group_id}/users", get(memberships::list_for_group))
        .route(
            "/group/{group_id}/user/{membership_id}",
            delete(memberships::remove),
        )
        .route("/group/{group_id}/transaction", post(transactions::add))
        .route(
            "/group/{group_id}/transactions",
            post(transactions::add_many).get(transactions::net_balances),
        )
        .route(
            "/transaction/{id}",
            put(transactions::mark_paid).delete(transactions::delete),
        )
        .route(
            "/user-invitations",
            post(invitations::invite).get(invitations::list),
        )
        .route(
            "/user-invitations/{id}",
            put(invitations::answer).delete(invitations::delete),
        )
        .route(
            "/groups/{group_id}/user-invitations",
            get(invitations::list_for_group),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_auth,
        ));

    Router::new()
        .route("/", get(hello))
        .route("/register", post(users::register))
        .route("/login", post(users::login))
        .route("/logout", get(users::logout))
        .merge(protected)
        .layer(middleware::from_fn(http_logger))
        .with_state(state)
}

pub async fn run_with_listener(
    engine: Engine,
    keys: auth::TokenKeys,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
        keys,
    };

    axum::serve(listener, router(state)).await
}
