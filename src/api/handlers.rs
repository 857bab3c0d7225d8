use crate::application::{
    SubmissionDeps, SubmitRequestCommand, SubmitResponse, submit_request as execute_submit_request,
};
use axum::{
    Form,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;

use super::{error::ApiError, types::SubmitParams};

// ============================================================================
// State
// ============================================================================

/// ハンドラー間で共有されるアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub submission_deps: SubmissionDeps,
}

// ============================================================================
// Submission handlers
// ============================================================================

/// GET /borrow-direct/:service_id/:request_id - 申込を受け付ける
///
/// 既定のメソッド。POSTボディを落とすSSOフロントドア経由でも動くように
/// パラメータはクエリ文字列で受ける。
pub async fn submit_request_query(
    State(state): State<Arc<AppState>>,
    Path((service_id, request_id)): Path<(String, String)>,
    Query(params): Query<SubmitParams>,
) -> Response {
    submit(state, service_id, request_id, params).await
}

/// POST /borrow-direct/:service_id/:request_id - 申込を受け付ける
///
/// フォームボディから同じパラメータを読む変種。
pub async fn submit_request_form(
    State(state): State<Arc<AppState>>,
    Path((service_id, request_id)): Path<(String, String)>,
    Form(params): Form<SubmitParams>,
) -> Response {
    submit(state, service_id, request_id, params).await
}

/// 申込処理の本体
///
/// 検証と状態遷移はアプリケーション層が行い、ここではHTTPレスポンスへの
/// 変換だけを行う。バックグラウンドタスクのハンドルはここで破棄され、
/// タスクはデタッチされて走り続ける（テストだけがハンドルを待つ）。
async fn submit(
    state: Arc<AppState>,
    service_id: String,
    request_id: String,
    params: SubmitParams,
) -> Response {
    let cmd = SubmitRequestCommand {
        service_id,
        request_id,
        pickup_location: params.pickup_location,
        redirect: params.redirect,
    };

    match execute_submit_request(&state.submission_deps, cmd).await {
        Ok(submission) => match submission.response {
            // 303 See Other - 結果ページまたはホワイトリスト済みのURLへ
            SubmitResponse::Redirect(url) => Redirect::to(&url).into_response(),

            // 403 - redirectパラメータがホワイトリストを通らなかった
            SubmitResponse::RedirectRejected(diagnostic) => {
                (StatusCode::FORBIDDEN, diagnostic).into_response()
            }

            // 400 - ステータスレコードを付ける先のコンテキストが無い
            SubmitResponse::ContextMissing(message) => {
                (StatusCode::BAD_REQUEST, message).into_response()
            }
        },
        Err(e) => ApiError::from(e).into_response(),
    }
}
