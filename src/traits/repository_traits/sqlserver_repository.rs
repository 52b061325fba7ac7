use crate::common::*;

#[async_trait]
pub trait SqlServerRepository: Send + Sync {
    async fn select_rows(&self, sql: &str) -> Result<Vec<Value>, anyhow::Error>;
}
