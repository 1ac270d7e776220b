//! Admin endpoints
//!
//! Guarded by the shared `AUTH` secret instead of a user token.

use actix_web::{get, web, HttpResponse};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    configuration::{AppState, State},
    error::Error,
    push::send,
    types::PushPayload,
};

// =============================================================================
// Test Push
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct TestPushResponse {
    pub data: bool,
    pub deliveries: usize,
}

#[derive(Debug, Deserialize)]
pub struct TestPushQuery {
    auth: Option<String>,
    user_id: Uuid,
}

#[get("/test-push")]
pub async fn test_push(
    state: web::Data<AppState<State>>,
    query: web::Query<TestPushQuery>,
) -> Result<HttpResponse, Error> {
    let auth = query
        .auth
        .to_owned()
        .ok_or_else(|| Error::MissingParams(String::from("auth")))?;

    if auth != state.config.auth {
        return Ok(HttpResponse::Ok().json(TestPushResponse {
            data: false,
            deliveries: 0,
        }));
    };

    let handles =
        send(state.as_ref().clone(), query.user_id, test_payload()).await?;

    Ok(HttpResponse::Ok().json(TestPushResponse {
        data: true,
        deliveries: handles.len(),
    }))
}

fn test_payload() -> PushPayload {
    PushPayload {
        title: String::from("PetCare"),
        body: String::from("Test notification: push delivery is working."),
        tag: Some(String::from("test-push")),
        url: Some(String::from("/settings")),
        icon: None,
    }
}
