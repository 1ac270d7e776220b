//! Push subscription endpoints
//!
//! Server-side mirror of the browser's push subscriptions, keyed by
//! `(user_id, endpoint)`.

use actix_web::{delete, get, http::header, post, web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};

use super::auth::AuthUser;
use crate::{
    client::SubscriptionStore,
    configuration::{AppState, State},
    error::Error,
    model::Push_Subscription,
    types::{EndpointBody, SubscriptionDescriptor},
};

// =============================================================================
// VAPID Public Key
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct VapidKeyResponse {
    pub public_key: String,
}

#[get("/push/vapid-public-key")]
pub async fn vapid_public_key(
    state: web::Data<AppState<State>>,
) -> Result<HttpResponse, Error> {
    let public_key = state.config.vapid_public_key_b64()?;
    Ok(HttpResponse::Ok().json(VapidKeyResponse { public_key }))
}

// =============================================================================
// Subscriptions
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct SubscriptionResponse {
    pub result: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubscriptionItem {
    pub endpoint: String,
    pub user_agent: Option<String>,
}

#[post("/push/subscriptions")]
pub async fn subscribe(
    state: web::Data<AppState<State>>,
    user: AuthUser,
    descriptor: web::Json<SubscriptionDescriptor>,
    req: HttpRequest,
) -> Result<HttpResponse, Error> {
    descriptor.validate()?;

    let user_agent = if let Some(item) = req.headers().get(header::USER_AGENT) {
        Some(item.to_str()?.to_string())
    } else {
        None
    };

    let record =
        Push_Subscription::from_descriptor(user.user_id, &descriptor, user_agent)?;
    state.database.push_subscription.persist(&record).await?;

    Ok(HttpResponse::Ok().json(SubscriptionResponse { result: true }))
}

#[delete("/push/subscriptions")]
pub async fn unsubscribe(
    state: web::Data<AppState<State>>,
    user: AuthUser,
    body: web::Json<EndpointBody>,
) -> Result<HttpResponse, Error> {
    if body.endpoint.trim().is_empty() {
        return Err(Error::MissingParams(String::from("endpoint")));
    }

    state
        .database
        .push_subscription
        .remove(user.user_id, &body.endpoint)
        .await?;

    Ok(HttpResponse::Ok().json(SubscriptionResponse { result: true }))
}

#[get("/push/subscriptions")]
pub async fn subscriptions(
    state: web::Data<AppState<State>>,
    user: AuthUser,
) -> Result<HttpResponse, Error> {
    let items = state
        .database
        .push_subscription
        .get_by_user(user.user_id)
        .await?
        .into_iter()
        .map(|item| SubscriptionItem {
            endpoint: item.endpoint,
            user_agent: item.user_agent,
        })
        .collect::<Vec<_>>();

    Ok(HttpResponse::Ok().json(items))
}
