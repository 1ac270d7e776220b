//! Dashboard, recommendations and affiliate click tracking

use actix_web::{get, post, web, HttpResponse};
use chrono::Local;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::auth::AuthUser;
use crate::{
    configuration::{AppState, State},
    error::Error,
    model::Dashboard_Stats,
};

const RECOMMENDATION_LIMIT: i64 = 12;

// =============================================================================
// Stats
// =============================================================================

#[get("/dashboard/stats")]
pub async fn stats(
    state: web::Data<AppState<State>>,
    user: AuthUser,
) -> Result<HttpResponse, Error> {
    let (total_pets, due_dates, supply_reminders) = tokio::try_join!(
        state.database.pet.count_by_user(user.user_id),
        state.database.health_record.next_due_dates_by_user(user.user_id),
        state
            .database
            .supply_schedule
            .next_reminders_by_user(user.user_id),
    )?;

    let today = Local::now().date_naive();
    let data =
        Dashboard_Stats::tally(total_pets, &due_dates, &supply_reminders, today);

    Ok(HttpResponse::Ok().json(data))
}

// =============================================================================
// Recommendations
// =============================================================================

#[get("/recommendations")]
pub async fn recommendations(
    state: web::Data<AppState<State>>,
    user: AuthUser,
) -> Result<HttpResponse, Error> {
    let species = state.database.pet.species_by_user(user.user_id).await?;
    let data = state
        .database
        .affiliate_product
        .get_recommended(species, RECOMMENDATION_LIMIT)
        .await?;

    Ok(HttpResponse::Ok().json(data))
}

// =============================================================================
// Affiliate Click
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct ClickResponse {
    pub affiliate_url: String,
}

#[post("/affiliate/{product_id}/click")]
pub async fn affiliate_click(
    state: web::Data<AppState<State>>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, Error> {
    let product_id = path.into_inner();
    let product = state
        .database
        .affiliate_product
        .get_active(product_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("product {}", product_id)))?;

    state
        .database
        .affiliate_click
        .insert(user.user_id, product_id)
        .await?;

    Ok(HttpResponse::Ok().json(ClickResponse {
        affiliate_url: product.affiliate_url,
    }))
}
