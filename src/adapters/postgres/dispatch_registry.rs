use crate::domain::dispatch::DispatchStatus;
use crate::domain::value_objects::{RequestId, ServiceId};
use crate::ports::dispatch_registry::{DispatchRegistry as DispatchRegistryTrait, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

/// DispatchRegistryのPostgreSQL実装
///
/// (リクエスト, サービス)を主キーとするレコードへのupsert。
/// `updated_at`の更新がホスト側の陳腐化検出の起点になる。
#[allow(dead_code)]
pub struct DispatchRegistry {
    pool: PgPool,
}

#[allow(dead_code)]
impl DispatchRegistry {
    /// PostgreSQLコネクションプールから新しいDispatchRegistryを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DispatchRegistryTrait for DispatchRegistry {
    async fn mark(
        &self,
        request_id: RequestId,
        service_id: &ServiceId,
        status: DispatchStatus,
        error: Option<String>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO dispatched_services (request_id, service_id, status, error_text, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (request_id, service_id)
            DO UPDATE SET
                status = EXCLUDED.status,
                error_text = EXCLUDED.error_text,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(request_id.value())
        .bind(service_id.as_str())
        .bind(status.as_str())
        .bind(error)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
