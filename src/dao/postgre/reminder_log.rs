use chrono::NaiveDate;
use sqlx::error::Error;
use uuid::Uuid;

use super::QueryResult;
use crate::model::{Reminder_Log, Table};

impl Table<Reminder_Log> {
    /// Returns `true` only for the first claim of a record on a given day.
    pub async fn try_claim(
        &self,
        health_record_id: Uuid,
        reminded_on: NaiveDate,
    ) -> Result<bool, Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO reminder_log (health_record_id, reminded_on)
            VALUES($1, $2)
            ON CONFLICT (health_record_id, reminded_on) DO NOTHING
            "#,
        )
        .bind(health_record_id)
        .bind(reminded_on)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Undoes a claim whose delivery never started.
    pub async fn release(
        &self,
        health_record_id: Uuid,
        reminded_on: NaiveDate,
    ) -> Result<QueryResult, Error> {
        sqlx::query(
            r#"
            DELETE FROM reminder_log
            WHERE health_record_id = $1 AND reminded_on = $2
            "#,
        )
        .bind(health_record_id)
        .bind(reminded_on)
        .execute(&self.pool)
        .await
    }
}
