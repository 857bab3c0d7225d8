use crate::application::SubmitError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// API層のエラー型
///
/// アプリケーション層の基盤エラーをラップし、HTTPレスポンスへの
/// マッピングを提供する。
#[derive(Debug)]
pub struct ApiError(SubmitError);

impl From<SubmitError> for ApiError {
    fn from(err: SubmitError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // 500 Internal Server Error - 永続化層・ディスパッチ層の障害。
        // 詳細はログに記録し、クライアントには一般的なメッセージのみを返す
        tracing::error!("Submission infrastructure error: {:?}", self.0);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "An unexpected error occurred",
        )
            .into_response()
    }
}
