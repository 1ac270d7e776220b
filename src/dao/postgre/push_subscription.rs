use sqlx::error::Error;
use uuid::Uuid;

use super::QueryResult;
use crate::model::{Push_Subscription, Table};

impl Table<Push_Subscription> {
    /// One row per `(user_id, endpoint)`; a repeated subscribe refreshes
    /// the keys in place.
    pub async fn upsert(
        &self,
        subscription: &Push_Subscription,
    ) -> Result<QueryResult, Error> {
        sqlx::query(
            r#"
            INSERT INTO push_subscriptions (user_id, endpoint, p256dh, auth, expiration, user_agent)
            VALUES($1, $2, $3, $4, $5, $6)
            ON CONFLICT (user_id, endpoint) DO UPDATE SET
                p256dh = EXCLUDED.p256dh,
                auth = EXCLUDED.auth,
                expiration = EXCLUDED.expiration,
                user_agent = COALESCE(EXCLUDED.user_agent, push_subscriptions.user_agent),
                updated_at = NOW()
            "#,
        )
        .bind(subscription.user_id)
        .bind(&subscription.endpoint)
        .bind(&subscription.p256dh)
        .bind(&subscription.auth)
        .bind(subscription.expiration)
        .bind(&subscription.user_agent)
        .execute(&self.pool)
        .await
    }

    pub async fn get_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<Push_Subscription>, Error> {
        sqlx::query_as(
            r#"
            SELECT user_id, endpoint, p256dh, auth, expiration, user_agent
            FROM push_subscriptions
            WHERE user_id = $1
            AND (expiration IS NULL OR expiration > NOW())
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn delete(
        &self,
        user_id: Uuid,
        endpoint: &str,
    ) -> Result<QueryResult, Error> {
        sqlx::query(
            r#"
            DELETE FROM push_subscriptions WHERE user_id = $1 AND endpoint = $2
            "#,
        )
        .bind(user_id)
        .bind(endpoint)
        .execute(&self.pool)
        .await
    }

    /// Drops every row for an endpoint the push service reported gone.
    pub async fn delete_by_endpoint(
        &self,
        endpoint: &str,
    ) -> Result<QueryResult, Error> {
        sqlx::query(
            r#"
            DELETE FROM push_subscriptions WHERE endpoint = $1
            "#,
        )
        .bind(endpoint)
        .execute(&self.pool)
        .await
    }
}
