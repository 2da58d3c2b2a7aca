use crate::error::Result;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{Postgres, Transaction};
use std::future::Future;
use std::pin::Pin;
use tracing::debug;

/// 트랜잭션 안에서 실행되는 작업
pub type TxFuture<'c, R> = Pin<Box<dyn Future<Output = Result<R>> + Send + 'c>>;

pub struct DatabaseManager {
    pool: PgPool,
}

impl DatabaseManager {
    /// 커넥션 풀 생성
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    /// 작업이 성공하면 커밋, 실패하면 롤백 후 오류 전달
    pub async fn transaction<F, R>(&self, work: F) -> Result<R>
    where
        F: for<'c> FnOnce(&'c mut Transaction<'static, Postgres>) -> TxFuture<'c, R>,
    {
        let mut tx = self.pool.begin().await?;
        match work(&mut tx).await {
            Ok(value) => {
                tx.commit().await?;
                Ok(value)
            }
            Err(e) => {
                debug!("{:<12} --> 트랜잭션 롤백: {}", "Database", e);
                tx.rollback().await?;
                Err(e)
            }
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}
