use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{error::Error, vaccination};

pub const MAX_FREQUENCY_MONTHS: u32 = 120;

#[derive(Debug, Deserialize)]
pub struct NewPet {
    pub name: String,
    pub species: String,
    pub breed: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub weight_kg: Option<BigDecimal>,
    pub photo_url: Option<String>,
}

impl NewPet {
    pub fn validate(&self) -> Result<(), Error> {
        if self.name.trim().is_empty() {
            return Err(Error::MissingParams(String::from("name")));
        }

        if self.species.trim().is_empty() {
            return Err(Error::MissingParams(String::from("species")));
        }

        if let Some(weight) = &self.weight_kg {
            if weight <= &BigDecimal::from(0) {
                return Err(Error::InvalidOption {
                    option: format!("weight_kg {}", weight),
                });
            }
        }

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct NewHealthRecord {
    pub pet_id: Uuid,
    pub record_type: String,
    pub title: String,
    pub description: Option<String>,
    pub date_administered: NaiveDate,
    pub next_due_date: Option<NaiveDate>,
    pub frequency_months: Option<u32>,
    pub veterinarian: Option<String>,
}

impl NewHealthRecord {
    pub fn validate(&self) -> Result<(), Error> {
        if self.title.trim().is_empty() {
            return Err(Error::MissingParams(String::from("title")));
        }

        if self.record_type.trim().is_empty() {
            return Err(Error::MissingParams(String::from("record_type")));
        }

        if let Some(months) = self.frequency_months {
            if months == 0 || months > MAX_FREQUENCY_MONTHS {
                return Err(Error::InvalidOption {
                    option: format!(
                        "frequency_months {}. Valid range: 1-{}",
                        months, MAX_FREQUENCY_MONTHS
                    ),
                });
            }
        }

        Ok(())
    }

    /// An explicit due date wins; otherwise it is derived from the
    /// administered date and the frequency.
    pub fn resolve_next_due_date(&self) -> Result<Option<NaiveDate>, Error> {
        if let Some(date) = self.next_due_date {
            return Ok(Some(date));
        }

        match self.frequency_months {
            Some(months) => Ok(Some(vaccination::next_due(
                self.date_administered,
                months,
            )?)),
            None => Ok(None),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EndpointBody {
    pub endpoint: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn record() -> NewHealthRecord {
        NewHealthRecord {
            pet_id: Uuid::new_v4(),
            record_type: String::from("vaccination"),
            title: String::from("Rabies"),
            description: None,
            date_administered: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            next_due_date: None,
            frequency_months: Some(12),
            veterinarian: None,
        }
    }

    #[test]
    fn test_next_due_date_derived_from_frequency() {
        let r = record();
        assert!(r.validate().is_ok());
        assert_eq!(
            r.resolve_next_due_date().unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 15)
        );
    }

    #[test]
    fn test_explicit_next_due_date_wins() {
        let mut r = record();
        r.next_due_date = NaiveDate::from_ymd_opt(2024, 7, 1);
        assert_eq!(
            r.resolve_next_due_date().unwrap(),
            NaiveDate::from_ymd_opt(2024, 7, 1)
        );
    }

    #[test]
    fn test_no_frequency_and_no_date_leaves_it_unset() {
        let mut r = record();
        r.frequency_months = None;
        assert_eq!(r.resolve_next_due_date().unwrap(), None);
    }

    #[test]
    fn test_frequency_out_of_range() {
        let mut r = record();
        r.frequency_months = Some(0);
        assert!(r.validate().is_err());
        r.frequency_months = Some(MAX_FREQUENCY_MONTHS + 1);
        assert!(r.validate().is_err());
    }

    #[test]
    fn test_pet_requires_name_and_positive_weight() {
        let mut pet = NewPet {
            name: String::from("Biscuit"),
            species: String::from("dog"),
            breed: None,
            birth_date: None,
            weight_kg: Some(BigDecimal::from_str("12.5").unwrap()),
            photo_url: None,
        };
        assert!(pet.validate().is_ok());

        pet.weight_kg = Some(BigDecimal::from(0));
        assert!(pet.validate().is_err());

        pet.weight_kg = None;
        pet.name = String::from("  ");
        assert!(matches!(pet.validate(), Err(Error::MissingParams(_))));
    }
}
