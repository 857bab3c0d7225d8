use crate::ports::patron_auth::AuthError;
use thiserror::Error;

/// 申込オーケストレーションの基盤エラー
///
/// バリデーション失敗はエラーではなく`SubmitResponse`として表現される
/// （ステータスレコードへの記録とリダイレクトという副作用を伴うため）。
/// ここに現れるのは永続化層・ディスパッチ層の障害だけで、この
/// サブシステムの回復範囲を超えるためそのまま伝播させる。
#[derive(Debug, Error)]
pub enum SubmitError {
    /// リクエスト検索の失敗
    #[error("Citation request lookup failed")]
    Repository(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// レスポンスストアの失敗
    #[error("Service response store error")]
    Store(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// ディスパッチレコードの失敗
    #[error("Dispatch registry error")]
    Dispatch(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// バックグラウンド申込タスクのエラー
///
/// ベンダー障害はここに含まれない：終端ステータスとして記録済みの
/// 「処理された結果」だから。ここに現れるのは認証設定の欠落と、
/// 結果を記録しようとした時の永続化障害である。
#[derive(Debug, Error)]
pub enum BackgroundTaskError {
    #[error("Patron authentication error")]
    Auth(#[from] AuthError),

    #[error("Service response store error")]
    Store(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Dispatch registry error")]
    Dispatch(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// プリチェックアダプタの基盤エラー
///
/// ベンダー障害は`FailedTemporary`として記録され、ここには現れない。
#[derive(Debug, Error)]
pub enum PrecheckError {
    #[error("Service response store error")]
    Store(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Dispatch registry error")]
    Dispatch(#[source] Box<dyn std::error::Error + Send + Sync>),
}
