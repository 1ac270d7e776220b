use crate::{
    configuration::Config,
    dao::{PoolOption, PoolType},
    error::Error,
    model::{
        Affiliate_Click, Affiliate_Product, Health_Record, Pet,
        Push_Subscription, Reminder_Log, Supply_Schedule, Table,
    },
};

#[derive(Debug)]
pub struct DatabasePool {
    pub pet: Table<Pet>,
    pub health_record: Table<Health_Record>,
    pub supply_schedule: Table<Supply_Schedule>,
    pub affiliate_product: Table<Affiliate_Product>,
    pub affiliate_click: Table<Affiliate_Click>,
    pub push_subscription: Table<Push_Subscription>,
    pub reminder_log: Table<Reminder_Log>,
    pub pool: PoolType,
}

impl DatabasePool {
    pub async fn new(config: &Config) -> Result<DatabasePool, Error> {
        let pool = PoolOption::new()
            .max_connections(20)
            .connect(config.database_url.as_str())
            .await?;

        Ok(DatabasePool::from_pool(pool))
    }

    pub fn from_pool(pool: PoolType) -> DatabasePool {
        DatabasePool {
            pet: Table::new(pool.clone()),
            health_record: Table::new(pool.clone()),
            supply_schedule: Table::new(pool.clone()),
            affiliate_product: Table::new(pool.clone()),
            affiliate_click: Table::new(pool.clone()),
            push_subscription: Table::new(pool.clone()),
            reminder_log: Table::new(pool.clone()),
            pool,
        }
    }
}
