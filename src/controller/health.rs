//! Health record endpoints
//!
//! Vaccination status is computed on every read and never stored.

use actix_web::{get, post, web, HttpResponse};
use chrono::Local;
use serde::Deserialize;
use uuid::Uuid;

use super::auth::AuthUser;
use crate::{
    configuration::{AppState, State},
    error::Error,
    model::Health_Record_View,
    types::NewHealthRecord,
};

#[derive(Debug, Deserialize)]
pub struct HealthRecordsQuery {
    pet_id: Option<Uuid>,
}

#[get("/health-records")]
pub async fn health_records(
    state: web::Data<AppState<State>>,
    user: AuthUser,
    query: web::Query<HealthRecordsQuery>,
) -> Result<HttpResponse, Error> {
    let today = Local::now().date_naive();
    let data = state
        .database
        .health_record
        .get_by_user(user.user_id, query.pet_id)
        .await?
        .into_iter()
        .map(|record| Health_Record_View::at(record, today))
        .collect::<Vec<_>>();

    Ok(HttpResponse::Ok().json(data))
}

#[post("/health-records")]
pub async fn create_health_record(
    state: web::Data<AppState<State>>,
    user: AuthUser,
    record: web::Json<NewHealthRecord>,
) -> Result<HttpResponse, Error> {
    record.validate()?;

    let owned = state
        .database
        .pet
        .isOwned(user.user_id, record.pet_id)
        .await?;

    if !owned {
        return Err(Error::NotFound(format!("pet {}", record.pet_id)));
    }

    let next_due_date = record.resolve_next_due_date()?;
    let data = state
        .database
        .health_record
        .insert(user.user_id, &record, next_due_date)
        .await?;

    let today = Local::now().date_naive();
    Ok(HttpResponse::Created().json(Health_Record_View::at(data, today)))
}
