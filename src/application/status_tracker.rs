use crate::domain::responses::{ServiceResponse, ServiceResponseKind, StatusFields};
use crate::domain::value_objects::{RequestId, ServiceId};
use crate::ports::response_store::ServiceResponseStore;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// ステータストラッカー
///
/// (リクエスト, サービス)ごとに厳密に1件の`request_status`レスポンスを
/// 維持する冪等アップサート。既存レコードがあればフィールドをマージして
/// 更新し、無ければ作る。
///
/// フォアグラウンド（バリデーション失敗の記録）とバックグラウンド
/// （ベンダー呼び出しの終端記録）が同じレコードに書くため、リクエストID
/// ごとの非同期ロックで書き手を直列化する。重複レコードが作られないこと、
/// 更新が失われないことはこの直列化とストレージ層の一意性制約の両方で守る。
pub struct StatusTracker {
    store: Arc<dyn ServiceResponseStore>,
    locks: Mutex<HashMap<RequestId, Arc<tokio::sync::Mutex<()>>>>,
}

impl StatusTracker {
    pub fn new(store: Arc<dyn ServiceResponseStore>) -> Self {
        Self {
            store,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// ステータスレコードへの冪等アップサート
    ///
    /// `fields`で指定しなかったフィールドは前の値を保つ。
    /// レコードは作成されるか更新されるだけで、削除されることはない。
    pub async fn set_status(
        &self,
        request_id: RequestId,
        service_id: &ServiceId,
        fields: StatusFields,
    ) -> Result<()> {
        let lock = self.lock_for(request_id);
        let _guard = lock.lock().await;

        match self.store.find_status(request_id).await? {
            Some(mut existing) => {
                existing.merge_status_fields(fields);
                self.store.update(&existing).await?;
            }
            None => {
                let mut response =
                    ServiceResponse::new(request_id, service_id.clone(), ServiceResponseKind::RequestStatus);
                response.merge_status_fields(fields);
                self.store.add(response).await?;
            }
        }

        Ok(())
    }

    /// リクエストIDごとのロックを取得する
    ///
    /// ロックマップ自体の保護は同期Mutexで足りる（保持区間は挿入だけ）。
    fn lock_for(&self, request_id: RequestId) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.locks.lock().unwrap();
        locks
            .entry(request_id)
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }
}
