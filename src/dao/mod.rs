mod postgre;

pub use self::postgre::{PoolOption, PoolType, QueryResult};
