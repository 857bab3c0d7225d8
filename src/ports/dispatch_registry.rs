use crate::domain::dispatch::DispatchStatus;
use crate::domain::value_objects::{RequestId, ServiceId};
use async_trait::async_trait;

#[allow(dead_code)]
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// ディスパッチレコード遷移ポート
///
/// (リクエスト, サービス)ごとの完了マーカーはホストのディスパッチ基盤が
/// 所有する。このサブシステムは遷移を書き込むだけで、ライフサイクルや
/// タイムアウト検出には関与しない。
#[allow(dead_code)]
#[async_trait]
pub trait DispatchRegistry: Send + Sync {
    /// ディスパッチレコードを指定の状態に遷移させる
    ///
    /// `InProgress`への再遷移はホスト側の陳腐化タイマーを巻き直す。
    /// 失敗系の遷移にはエラーの説明文を添えられる。
    async fn mark(
        &self,
        request_id: RequestId,
        service_id: &ServiceId,
        status: DispatchStatus,
        error: Option<String>,
    ) -> Result<()>;
}
