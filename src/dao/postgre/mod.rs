pub use self::types::{PoolOption, PoolType, QueryResult};

mod affiliate;
mod health_record;
mod pet;
mod push_subscription;
mod reminder_log;
mod supply_schedule;
mod types;
