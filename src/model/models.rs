//! Consolidated database models
//!
//! All database entity structs organized by domain sections.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{types::BigDecimal as SqlxBigDecimal, FromRow};
use uuid::Uuid;

use crate::{
    error::Error,
    types::{SubscriptionDescriptor, SubscriptionKeys},
    vaccination::{self, Status, VaccinationStatus},
};

// =============================================================================
// PET DOMAIN
// =============================================================================

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Pet {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub species: String,
    pub breed: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub weight_kg: Option<SqlxBigDecimal>,
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Health_Record {
    pub id: Uuid,
    pub pet_id: Uuid,
    pub user_id: Uuid,
    pub record_type: String,
    pub title: String,
    pub description: Option<String>,
    pub date_administered: NaiveDate,
    pub next_due_date: Option<NaiveDate>,
    pub frequency_months: Option<i32>,
    pub veterinarian: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A health record together with its status, computed at read time.
#[derive(Debug, Serialize)]
pub struct Health_Record_View {
    #[serde(flatten)]
    pub record: Health_Record,
    pub vaccination_status: VaccinationStatus,
}

impl Health_Record_View {
    pub fn at(record: Health_Record, today: NaiveDate) -> Self {
        let vaccination_status =
            vaccination::classify_at(record.next_due_date, today);
        Health_Record_View {
            record,
            vaccination_status,
        }
    }
}

/// Due record joined with its pet name, scanned by the reminder pass.
#[derive(Debug, Clone, FromRow)]
pub struct Due_Record {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub pet_name: String,
    pub next_due_date: NaiveDate,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Supply_Schedule {
    pub id: Uuid,
    pub pet_id: Uuid,
    pub user_id: Uuid,
    pub supply_name: String,
    pub frequency_days: i32,
    pub last_purchased: Option<NaiveDate>,
    pub next_reminder: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// AFFILIATE DOMAIN
// =============================================================================

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Affiliate_Product {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub species: Option<String>,
    pub price: Option<SqlxBigDecimal>,
    pub affiliate_url: String,
    pub image_url: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Affiliate_Click {
    pub id: Uuid,
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub clicked_at: DateTime<Utc>,
}

// =============================================================================
// PUSH DOMAIN
// =============================================================================

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Push_Subscription {
    pub user_id: Uuid,
    pub endpoint: String,
    pub p256dh: String,
    pub auth: String,
    pub expiration: Option<DateTime<Utc>>,
    pub user_agent: Option<String>,
}

impl Push_Subscription {
    pub fn from_descriptor(
        user_id: Uuid,
        descriptor: &SubscriptionDescriptor,
        user_agent: Option<String>,
    ) -> Result<Self, Error> {
        let expiration = if let Some(ms) = descriptor.expiration_time {
            let at = DateTime::from_timestamp_millis(ms).ok_or_else(|| {
                Error::DecodeDateTimeError(format!(
                    "Subscription expiration parse {}",
                    ms
                ))
            })?;
            Some(at)
        } else {
            None
        };

        Ok(Push_Subscription {
            user_id,
            endpoint: descriptor.endpoint.to_owned(),
            p256dh: descriptor.keys.p256dh.to_owned(),
            auth: descriptor.keys.auth.to_owned(),
            expiration,
            user_agent,
        })
    }

    pub fn to_descriptor(&self) -> SubscriptionDescriptor {
        SubscriptionDescriptor {
            endpoint: self.endpoint.to_owned(),
            expiration_time: self.expiration.map(|at| at.timestamp_millis()),
            keys: SubscriptionKeys {
                p256dh: self.p256dh.to_owned(),
                auth: self.auth.to_owned(),
            },
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct Reminder_Log {
    pub health_record_id: Uuid,
    pub reminded_on: NaiveDate,
}

// =============================================================================
// DASHBOARD
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dashboard_Stats {
    pub total_pets: i64,
    pub overdue: i64,
    pub due_soon: i64,
    pub upcoming: i64,
    pub supplies_due: i64,
}

pub const SUPPLY_WINDOW_DAYS: i64 = 7;

impl Dashboard_Stats {
    /// Buckets every due date through the classifier; records without a
    /// due date count as neither overdue nor due.
    pub fn tally(
        total_pets: i64,
        next_due_dates: &[Option<NaiveDate>],
        supply_reminders: &[Option<NaiveDate>],
        today: NaiveDate,
    ) -> Self {
        let mut stats = Dashboard_Stats {
            total_pets,
            ..Default::default()
        };

        for date in next_due_dates.iter().flatten() {
            match vaccination::classify_at(Some(*date), today).status {
                Status::Overdue => stats.overdue += 1,
                Status::DueSoon => stats.due_soon += 1,
                Status::Upcoming => stats.upcoming += 1,
                Status::Current => {},
            }
        }

        stats.supplies_due = supply_reminders
            .iter()
            .flatten()
            .filter(|date| {
                vaccination::days_between(**date, today) <= SUPPLY_WINDOW_DAYS
            })
            .count() as i64;

        stats
    }
}
