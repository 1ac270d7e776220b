use base64::{engine::general_purpose::URL_SAFE_NO_PAD as BASE64_URL, Engine};
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Url;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::{
    configuration::{AppState, State},
    error::Error,
    model::Push_Subscription,
    types::{Claims, PushHeader, PushPayload, Urgency},
};

/// Fans a payload out to every stored subscription of `user_id`. Each
/// delivery runs as its own bounded task; the handles are returned for
/// callers that must wait (one-shot CLI runs).
pub async fn send(
    app_state: AppState<State>,
    user_id: Uuid,
    payload: PushPayload,
) -> Result<Vec<JoinHandle<()>>, Error> {
    let items = deliverable(
        app_state
            .database
            .push_subscription
            .get_by_user(user_id)
            .await?,
    );

    let push_headers = PushHeader {
        ttl: app_state.config.push_ttl,
        urgency: Urgency::High,
    };

    let mut handles = vec![];

    for subscription in items {
        let app_state = app_state.clone();
        handles.push(send_push_task(
            app_state,
            subscription,
            push_headers.clone(),
            payload.clone(),
        ));
    }

    Ok(handles)
}

/// Drops stored rows that could never be delivered.
pub fn deliverable(items: Vec<Push_Subscription>) -> Vec<Push_Subscription> {
    items
        .into_iter()
        .filter(|item| match item.to_descriptor().validate() {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(
                    "Skipping malformed push subscription {}: {}",
                    item.endpoint,
                    e
                );
                false
            },
        })
        .collect()
}

pub fn send_push_task(
    state: AppState<State>,
    subscription: Push_Subscription,
    push_header: PushHeader,
    payload: PushPayload,
) -> JoinHandle<()> {
    let permits = state.push_permits.clone();
    tokio::spawn(async move {
        let _permit = match permits.acquire().await {
            Ok(permit) => permit,
            Err(_) => {
                tracing::error!("Push notification semaphore closed");
                return;
            },
        };
        let res = send_push(state, subscription, push_header, payload).await;
        if let Err(e) = res {
            tracing::error!("Push notification failed: {}", e);
        };
    })
}

pub async fn send_push(
    state: AppState<State>,
    subscription: Push_Subscription,
    push_header: PushHeader,
    payload: PushPayload,
) -> Result<(), Error> {
    let exp = Utc::now().timestamp() + push_header.ttl;
    let claims = vapid_claims(&subscription.endpoint, &state.config.mail_to, exp)?;

    let key = EncodingKey::from_ec_pem(&state.config.vapid_private_key)?;
    let token = encode(&Header::new(Algorithm::ES256), &claims, &key)?;

    let p256dh = BASE64_URL.decode(subscription.p256dh.trim_end_matches('='))?;
    let auth = BASE64_URL.decode(subscription.auth.trim_end_matches('='))?;

    let data = ece::encrypt(&p256dh, &auth, payload.to_string().as_bytes())?;
    let endpoint = subscription.endpoint.to_owned();

    let status = state
        .http
        .post_push(subscription.endpoint, token, push_header, data)
        .await?;

    if state.config.status_code_to_delete.contains(&status) {
        tracing::info!("Push endpoint gone ({}), removing subscription", status);
        state
            .database
            .push_subscription
            .delete_by_endpoint(&endpoint)
            .await?;
    } else if status >= 400 {
        tracing::warn!("Push service rejected message with status {}", status);
    }

    Ok(())
}

/// VAPID claims: the audience is the origin of the push service endpoint.
pub fn vapid_claims(
    endpoint: &str,
    mail_to: &str,
    exp: i64,
) -> Result<Claims, Error> {
    let url = Url::parse(endpoint)?;

    let scheme = url.scheme();
    let host = if let Some(h) = url.host() {
        h.to_string()
    } else {
        return Err(Error::InvalidOption {
            option: String::from("host"),
        });
    };

    let aud = match url.port() {
        Some(port) => format!("{}://{}:{}", scheme, host, port),
        None => format!("{}://{}", scheme, host),
    };
    let sub = format!("mailto:{}", mail_to);

    Ok(Claims { aud, sub, exp })
}
