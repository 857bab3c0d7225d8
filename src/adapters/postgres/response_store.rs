use crate::domain::responses::{ServiceResponse, ServiceResponseKind};
use crate::domain::value_objects::{RequestId, ResponseId, ServiceId};
use crate::ports::response_store::{Result, ServiceResponseStore as ServiceResponseStoreTrait};
use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};
use std::str::FromStr;

/// PostgreSQLの行データをServiceResponseに変換する
///
/// ビューデータはJSONBで保存され、スキーマの変化に強い。
/// 種別タグの文字列からの変換でエラーハンドリングを行う。
fn map_row_to_response(row: &PgRow) -> Result<ServiceResponse> {
    let kind_str: &str = row.get("kind");
    let kind = ServiceResponseKind::from_str(kind_str).map_err(|e| {
        Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
            as Box<dyn std::error::Error + Send + Sync>
    })?;

    let view_data: serde_json::Value = row.get("view_data");
    let view_data = match view_data {
        serde_json::Value::Object(map) => map,
        other => {
            return Err(Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("view_data is not a JSON object: {}", other),
            )));
        }
    };

    Ok(ServiceResponse {
        id: ResponseId::from_uuid(row.get("id")),
        request_id: RequestId::from_uuid(row.get("request_id")),
        service_id: ServiceId::new(row.get::<String, _>("service_id")),
        kind,
        view_data,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

/// ServiceResponseStoreのPostgreSQL実装
///
/// `request_status`レスポンスの「リクエストあたり1件」は部分一意
/// インデックスで強制される（マイグレーション参照）。アプリケーション側の
/// 慣習ではなくストレージ層の制約として守られる。
#[allow(dead_code)]
pub struct ResponseStore {
    pool: PgPool,
}

#[allow(dead_code)]
impl ResponseStore {
    /// PostgreSQLコネクションプールから新しいResponseStoreを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ServiceResponseStoreTrait for ResponseStore {
    async fn add(&self, response: ServiceResponse) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO service_responses (
                id,
                request_id,
                service_id,
                kind,
                view_data,
                created_at,
                updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(response.id.value())
        .bind(response.request_id.value())
        .bind(response.service_id.as_str())
        .bind(response.kind.as_str())
        .bind(serde_json::Value::Object(response.view_data.clone()))
        .bind(response.created_at)
        .bind(response.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update(&self, response: &ServiceResponse) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE service_responses
            SET view_data = $2, updated_at = $3
            WHERE id = $1
            "#,
        )
        .bind(response.id.value())
        .bind(serde_json::Value::Object(response.view_data.clone()))
        .bind(response.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_for_request(&self, request_id: RequestId) -> Result<Vec<ServiceResponse>> {
        let rows = sqlx::query(
            r#"
            SELECT id, request_id, service_id, kind, view_data, created_at, updated_at
            FROM service_responses
            WHERE request_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(request_id.value())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_row_to_response).collect()
    }

    async fn find_request_prompt(
        &self,
        request_id: RequestId,
        service_id: &ServiceId,
    ) -> Result<Option<ServiceResponse>> {
        let row = sqlx::query(
            r#"
            SELECT id, request_id, service_id, kind, view_data, created_at, updated_at
            FROM service_responses
            WHERE request_id = $1 AND service_id = $2 AND kind = 'request_prompt'
            ORDER BY created_at ASC
            LIMIT 1
            "#,
        )
        .bind(request_id.value())
        .bind(service_id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_row_to_response).transpose()
    }

    async fn find_status(&self, request_id: RequestId) -> Result<Option<ServiceResponse>> {
        // 部分一意インデックスにより高々1件
        let row = sqlx::query(
            r#"
            SELECT id, request_id, service_id, kind, view_data, created_at, updated_at
            FROM service_responses
            WHERE request_id = $1 AND kind = 'request_status'
            "#,
        )
        .bind(request_id.value())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_row_to_response).transpose()
    }
}
