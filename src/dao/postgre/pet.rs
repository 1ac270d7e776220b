use sqlx::error::Error;
use uuid::Uuid;

use crate::{
    model::{Pet, Table},
    types::NewPet,
};

impl Table<Pet> {
    pub async fn insert(
        &self,
        user_id: Uuid,
        pet: &NewPet,
    ) -> Result<Pet, Error> {
        sqlx::query_as(
            r#"
            INSERT INTO pets (user_id, name, species, breed, birth_date, weight_kg, photo_url)
            VALUES($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(pet.name.trim())
        .bind(pet.species.trim().to_lowercase())
        .bind(&pet.breed)
        .bind(pet.birth_date)
        .bind(&pet.weight_kg)
        .bind(&pet.photo_url)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn get_by_user(&self, user_id: Uuid) -> Result<Vec<Pet>, Error> {
        sqlx::query_as(
            r#"
            SELECT * FROM pets WHERE user_id = $1 ORDER BY created_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn count_by_user(&self, user_id: Uuid) -> Result<i64, Error> {
        let (value,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM pets WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .persistent(true)
        .fetch_one(&self.pool)
        .await?;

        Ok(value)
    }

    pub async fn species_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<String>, Error> {
        let data: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT DISTINCT LOWER(species) FROM pets WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(data.into_iter().map(|(species,)| species).collect())
    }

    pub async fn isOwned(
        &self,
        user_id: Uuid,
        pet_id: Uuid,
    ) -> Result<bool, Error> {
        let (value,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM pets WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(pet_id)
        .bind(user_id)
        .persistent(true)
        .fetch_one(&self.pool)
        .await?;

        Ok(value > 0)
    }
}
