use chrono::NaiveDate;
use sqlx::error::Error;
use uuid::Uuid;

use crate::{
    model::{Due_Record, Health_Record, Table},
    types::NewHealthRecord,
};

impl Table<Health_Record> {
    pub async fn insert(
        &self,
        user_id: Uuid,
        record: &NewHealthRecord,
        next_due_date: Option<NaiveDate>,
    ) -> Result<Health_Record, Error> {
        let frequency_months = record.frequency_months.map(|m| m as i32);

        sqlx::query_as(
            r#"
            INSERT INTO health_records (
                pet_id, user_id, record_type, title, description,
                date_administered, next_due_date, frequency_months, veterinarian
            )
            VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(record.pet_id)
        .bind(user_id)
        .bind(record.record_type.trim())
        .bind(record.title.trim())
        .bind(&record.description)
        .bind(record.date_administered)
        .bind(next_due_date)
        .bind(frequency_months)
        .bind(&record.veterinarian)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn get_by_user(
        &self,
        user_id: Uuid,
        pet_id: Option<Uuid>,
    ) -> Result<Vec<Health_Record>, Error> {
        sqlx::query_as(
            r#"
            SELECT * FROM health_records
            WHERE user_id = $1
            AND ($2::UUID IS NULL OR pet_id = $2)
            ORDER BY next_due_date ASC NULLS LAST, date_administered DESC
            "#,
        )
        .bind(user_id)
        .bind(pet_id)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn next_due_dates_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<Option<NaiveDate>>, Error> {
        let data: Vec<(Option<NaiveDate>,)> = sqlx::query_as(
            r#"
            SELECT next_due_date FROM health_records WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(data.into_iter().map(|(date,)| date).collect())
    }

    /// Records across all users due on or before `until`.
    pub async fn get_due(
        &self,
        until: NaiveDate,
    ) -> Result<Vec<Due_Record>, Error> {
        sqlx::query_as(
            r#"
            SELECT
                hr.id,
                hr.user_id,
                hr.title,
                p.name AS pet_name,
                hr.next_due_date
            FROM health_records hr
            INNER JOIN pets p ON p.id = hr.pet_id
            WHERE hr.next_due_date IS NOT NULL
            AND hr.next_due_date <= $1
            ORDER BY hr.next_due_date ASC
            "#,
        )
        .bind(until)
        .fetch_all(&self.pool)
        .await
    }
}
