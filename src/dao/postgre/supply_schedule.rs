use chrono::NaiveDate;
use sqlx::error::Error;
use uuid::Uuid;

use crate::model::{Supply_Schedule, Table};

impl Table<Supply_Schedule> {
    pub async fn get_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<Supply_Schedule>, Error> {
        sqlx::query_as(
            r#"
            SELECT * FROM supply_schedules
            WHERE user_id = $1
            ORDER BY next_reminder ASC NULLS LAST
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn next_reminders_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<Option<NaiveDate>>, Error> {
        let data: Vec<(Option<NaiveDate>,)> = sqlx::query_as(
            r#"
            SELECT next_reminder FROM supply_schedules WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(data.into_iter().map(|(date,)| date).collect())
    }
}
