use sqlx::{Postgres, Transaction};
use std::sync::Arc;
use tokio::sync::Mutex;

/// One open transaction shared by every repository of a session
///
/// Commit and rollback take the transaction out; repositories used afterwards
/// fail with "Transaction has been consumed".
#[derive(Clone)]
pub struct Executor {
    pub tx: Arc<Mutex<Option<Transaction<'static, Postgres>>>>,
}

impl Executor {
    pub fn new(tx: Transaction<'static, Postgres>) -> Self {
        Self {
            tx: Arc::new(Mutex::new(Some(tx))),
        }
    }

    pub async fn commit(&self) -> Result<(), sqlx::Error> {
        let transaction = self.tx.lock().await.take();
        match transaction {
            Some(transaction) => transaction.commit().await,
            None => Err(sqlx::Error::Configuration(
                "Transaction has been consumed".into(),
            )),
        }
    }

    pub async fn rollback(&self) -> Result<(), sqlx::Error> {
        let transaction = self.tx.lock().await.take();
        match transaction {
            Some(transaction) => transaction.rollback().await,
            None => Ok(()),
        }
    }
}
