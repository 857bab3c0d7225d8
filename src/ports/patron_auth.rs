use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// No authenticator was supplied at construction.
    ///
    /// Deployments must provide a `PatronAuthenticator` wired to their local
    /// auth system; there is no usable default.
    #[error(
        "no patron authentication capability configured; \
         deployments must supply a PatronAuthenticator at construction"
    )]
    NotConfigured,

    #[error("patron authentication failed: {0}")]
    Failed(String),
}

/// 利用者認証ポート
///
/// 申込に使う利用者バーコードを得る手段。実装はホスト環境のSSOや
/// ILSに依存するため、構築時に外部から注入される。テストでは
/// インスタンス単位で差し替える（プロセス全域の可変状態は持たない）。
#[allow(dead_code)]
#[async_trait]
pub trait PatronAuthenticator: Send + Sync {
    /// 現在の利用者のバーコードを返す
    async fn patron_barcode(&self) -> Result<String, AuthError>;
}

/// 未設定時の実装。呼ばれたら設定エラーで大声で失敗する。
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredPatronAuth;

#[async_trait]
impl PatronAuthenticator for UnconfiguredPatronAuth {
    async fn patron_barcode(&self) -> Result<String, AuthError> {
        Err(AuthError::NotConfigured)
    }
}
