//! Pet and supply schedule endpoints

use actix_web::{get, post, web, HttpResponse};

use super::auth::AuthUser;
use crate::{
    configuration::{AppState, State},
    error::Error,
    types::NewPet,
};

// =============================================================================
// Pets
// =============================================================================

#[get("/pets")]
pub async fn pets(
    state: web::Data<AppState<State>>,
    user: AuthUser,
) -> Result<HttpResponse, Error> {
    let data = state.database.pet.get_by_user(user.user_id).await?;
    Ok(HttpResponse::Ok().json(data))
}

#[post("/pets")]
pub async fn create_pet(
    state: web::Data<AppState<State>>,
    user: AuthUser,
    pet: web::Json<NewPet>,
) -> Result<HttpResponse, Error> {
    pet.validate()?;

    let data = state.database.pet.insert(user.user_id, &pet).await?;
    Ok(HttpResponse::Created().json(data))
}

// =============================================================================
// Supply Schedules
// =============================================================================

#[get("/supply-schedules")]
pub async fn supply_schedules(
    state: web::Data<AppState<State>>,
    user: AuthUser,
) -> Result<HttpResponse, Error> {
    let data = state
        .database
        .supply_schedule
        .get_by_user(user.user_id)
        .await?;
    Ok(HttpResponse::Ok().json(data))
}
