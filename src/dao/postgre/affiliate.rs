use sqlx::error::Error;
use uuid::Uuid;

use super::QueryResult;
use crate::model::{Affiliate_Click, Affiliate_Product, Table};

impl Table<Affiliate_Product> {
    /// Active products for any of `species`, plus species-agnostic ones.
    pub async fn get_recommended(
        &self,
        species: Vec<String>,
        limit: i64,
    ) -> Result<Vec<Affiliate_Product>, Error> {
        sqlx::query_as(
            r#"
            SELECT * FROM affiliate_products
            WHERE is_active = true
            AND (species IS NULL OR LOWER(species) = ANY($1))
            ORDER BY (species IS NULL) ASC, name ASC
            LIMIT $2
            "#,
        )
        .bind(species)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn get_active(
        &self,
        product_id: Uuid,
    ) -> Result<Option<Affiliate_Product>, Error> {
        sqlx::query_as(
            r#"
            SELECT * FROM affiliate_products WHERE id = $1 AND is_active = true
            "#,
        )
        .bind(product_id)
        .persistent(true)
        .fetch_optional(&self.pool)
        .await
    }
}

impl Table<Affiliate_Click> {
    pub async fn insert(
        &self,
        user_id: Uuid,
        product_id: Uuid,
    ) -> Result<QueryResult, Error> {
        sqlx::query(
            r#"
            INSERT INTO affiliate_clicks (user_id, product_id)
            VALUES($1, $2)
            "#,
        )
        .bind(user_id)
        .bind(product_id)
        .execute(&self.pool)
        .await
    }
}
