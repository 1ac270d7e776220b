use std::marker::{self, PhantomData};

use crate::dao::PoolType;

/// Typed handle over one table; queries live in `dao::postgre::*` as
/// `impl Table<Row>` blocks.
#[derive(Debug)]
pub struct Table<T> {
    pub pool: PoolType,
    _phantomdata: marker::PhantomData<T>,
}

impl<T> Table<T> {
    pub fn new(pool: PoolType) -> Self {
        Table {
            pool,
            _phantomdata: PhantomData,
        }
    }
}

impl<T> Clone for Table<T> {
    fn clone(&self) -> Self {
        Table::new(self.pool.clone())
    }
}
