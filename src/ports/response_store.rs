use crate::domain::responses::ServiceResponse;
use crate::domain::value_objects::{RequestId, ServiceId};
use async_trait::async_trait;

#[allow(dead_code)]
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// サービスレスポンス永続化ポート
///
/// 解決リクエストに添付される型付きレスポンスの保存・検索を抽象化する。
/// `request_status`レスポンスは「リクエストあたり厳密に1件」という
/// 不変条件を持ち、ストレージ層の一意性制約で強制される（アプリケーション
/// 側の走査による慣習ではなく）。
#[allow(dead_code)]
#[async_trait]
pub trait ServiceResponseStore: Send + Sync {
    /// レスポンスを新規追加する
    ///
    /// `request_status`の追加は一意性制約に守られる。同じリクエストに
    /// 2件目のステータスを追加しようとするとエラーになる。
    async fn add(&self, response: ServiceResponse) -> Result<()>;

    /// 既存レスポンスの内容を保存する（ビューデータの更新）
    async fn update(&self, response: &ServiceResponse) -> Result<()>;

    /// リクエストに付いた全レスポンスを返す
    async fn list_for_request(&self, request_id: RequestId) -> Result<Vec<ServiceResponse>>;

    /// (リクエスト, サービス)の`request_prompt`レスポンスを探す
    async fn find_request_prompt(
        &self,
        request_id: RequestId,
        service_id: &ServiceId,
    ) -> Result<Option<ServiceResponse>>;

    /// リクエストの`request_status`レスポンスをキー検索する
    ///
    /// 不変条件により高々1件。
    async fn find_status(&self, request_id: RequestId) -> Result<Option<ServiceResponse>>;
}
