use std::{collections::HashMap, time::Duration};

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    error::Error,
    model::{Push_Subscription, Table},
    types::EndpointBody,
};

/// Server-side mirror of push subscriptions, keyed by `(user_id, endpoint)`.
#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    /// Insert or replace; repeating a call never adds a second row.
    async fn persist(&self, record: &Push_Subscription) -> Result<(), Error>;

    async fn remove(&self, user_id: Uuid, endpoint: &str) -> Result<(), Error>;
}

#[async_trait]
impl SubscriptionStore for Table<Push_Subscription> {
    async fn persist(&self, record: &Push_Subscription) -> Result<(), Error> {
        self.upsert(record).await?;
        Ok(())
    }

    async fn remove(&self, user_id: Uuid, endpoint: &str) -> Result<(), Error> {
        self.delete(user_id, endpoint).await?;
        Ok(())
    }
}

/// In-process store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<(Uuid, String), Push_Subscription>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }

    pub async fn get(
        &self,
        user_id: Uuid,
        endpoint: &str,
    ) -> Option<Push_Subscription> {
        self.records
            .lock()
            .await
            .get(&(user_id, endpoint.to_owned()))
            .cloned()
    }
}

#[async_trait]
impl SubscriptionStore for MemoryStore {
    async fn persist(&self, record: &Push_Subscription) -> Result<(), Error> {
        let key = (record.user_id, record.endpoint.to_owned());
        self.records.lock().await.insert(key, record.clone());
        Ok(())
    }

    async fn remove(&self, user_id: Uuid, endpoint: &str) -> Result<(), Error> {
        self.records
            .lock()
            .await
            .remove(&(user_id, endpoint.to_owned()));
        Ok(())
    }
}

/// Talks to `/api/push/subscriptions` with the signed-in user's token. The
/// server derives the owner from the token, so `user_id` only has to match
/// the token subject.
#[derive(Debug, Clone)]
pub struct RemoteStore {
    base_url: Url,
    token: String,
    http: Client,
}

impl RemoteStore {
    pub fn new(
        base_url: &str,
        token: String,
        timeout: u64,
    ) -> Result<RemoteStore, Error> {
        let base_url = Url::parse(base_url)?;
        let http = Client::builder()
            .timeout(Duration::from_secs(timeout))
            .build()?;

        Ok(RemoteStore {
            base_url,
            token,
            http,
        })
    }

    fn subscriptions_url(&self) -> Result<Url, Error> {
        Ok(self.base_url.join("/api/push/subscriptions")?)
    }

    fn check(status: StatusCode, action: &str) -> Result<(), Error> {
        if status.is_success() {
            return Ok(());
        }

        Err(Error::ServerError(format!(
            "{} subscription returned {}",
            action, status
        )))
    }
}

#[async_trait]
impl SubscriptionStore for RemoteStore {
    async fn persist(&self, record: &Push_Subscription) -> Result<(), Error> {
        let descriptor = record.to_descriptor();

        let response = self
            .http
            .post(self.subscriptions_url()?)
            .bearer_auth(&self.token)
            .json(&descriptor)
            .send()
            .await?;

        Self::check(response.status(), "persist")
    }

    async fn remove(&self, _user_id: Uuid, endpoint: &str) -> Result<(), Error> {
        let body = EndpointBody {
            endpoint: endpoint.to_owned(),
        };

        let response = self
            .http
            .delete(self.subscriptions_url()?)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;

        Self::check(response.status(), "remove")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(user_id: Uuid, endpoint: &str, auth: &str) -> Push_Subscription {
        Push_Subscription {
            user_id,
            endpoint: endpoint.to_owned(),
            p256dh: String::from("BNcR"),
            auth: auth.to_owned(),
            expiration: None,
            user_agent: None,
        }
    }

    #[tokio::test]
    async fn test_persist_twice_keeps_one_record() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();

        store
            .persist(&record(user, "https://push.example/a", "k1"))
            .await
            .unwrap();
        store
            .persist(&record(user, "https://push.example/a", "k2"))
            .await
            .unwrap();

        assert_eq!(store.len().await, 1);
        let stored = store.get(user, "https://push.example/a").await.unwrap();
        assert_eq!(stored.auth, "k2");
    }

    #[tokio::test]
    async fn test_devices_are_separate_records() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();

        store
            .persist(&record(user, "https://push.example/phone", "k"))
            .await
            .unwrap();
        store
            .persist(&record(user, "https://push.example/laptop", "k"))
            .await
            .unwrap();
        store
            .persist(&record(Uuid::new_v4(), "https://push.example/phone", "k"))
            .await
            .unwrap();

        assert_eq!(store.len().await, 3);

        store.remove(user, "https://push.example/phone").await.unwrap();
        assert_eq!(store.len().await, 2);

        store.remove(user, "https://push.example/phone").await.unwrap();
        assert_eq!(store.len().await, 2);
    }

    #[test]
    fn test_remote_store_targets_subscription_route() {
        let store = RemoteStore::new(
            "https://app.petcare.test/some/page",
            String::from("token"),
            5,
        )
        .unwrap();

        assert_eq!(
            store.subscriptions_url().unwrap().as_str(),
            "https://app.petcare.test/api/push/subscriptions"
        );
    }

    #[test]
    fn test_remote_store_rejects_error_status() {
        assert!(RemoteStore::check(StatusCode::OK, "persist").is_ok());
        assert!(matches!(
            RemoteStore::check(StatusCode::BAD_GATEWAY, "remove"),
            Err(Error::ServerError(_))
        ));
    }
}
