use crate::config::GatewayConfig;
use crate::domain::citation::CitationRequest;
use crate::domain::dispatch::DispatchStatus;
use crate::domain::responses::{StatusFields, SubmissionStatus};
use crate::domain::value_objects::{Isbn, PickupLocation, RequestId, ServiceId};
use crate::domain::whitelist::UrlWhitelist;
use crate::ports::dispatch_registry::DispatchRegistry;
use crate::ports::patron_auth::PatronAuthenticator;
use crate::ports::request_repository::CitationRequestRepository;
use crate::ports::response_store::ServiceResponseStore;
use crate::ports::vendor_client::{BorrowDirectClient, VendorError};
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinHandle;
use uuid::Uuid;

use super::errors::{BackgroundTaskError, SubmitError};
use super::status_tracker::StatusTracker;

/// 申込オーケストレータの依存関係
///
/// すべての依存が明示的に渡される（関数型の原則）。
/// `patron_auth`はプロセス全域の可変状態ではなく、構築時に注入され
/// テストではインスタンス単位で差し替えられる。
#[derive(Clone)]
pub struct SubmissionDeps {
    pub config: Arc<GatewayConfig>,
    pub service_id: ServiceId,
    pub requests: Arc<dyn CitationRequestRepository>,
    pub responses: Arc<dyn ServiceResponseStore>,
    pub dispatch: Arc<dyn DispatchRegistry>,
    pub vendor: Arc<dyn BorrowDirectClient>,
    pub patron_auth: Arc<dyn PatronAuthenticator>,
    pub status_tracker: Arc<StatusTracker>,
    pub whitelist: UrlWhitelist,
}

/// 申込コマンド
///
/// パスパラメータは未検証の文字列のまま受け取り、ここで解決する。
#[derive(Debug, Clone)]
pub struct SubmitRequestCommand {
    pub service_id: String,
    pub request_id: String,
    pub pickup_location: Option<String>,
    pub redirect: Option<String>,
}

/// 申込処理のHTTP応答内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitResponse {
    /// 303 See Other
    Redirect(String),
    /// 403 - redirectパラメータがホワイトリストを通らなかった。
    /// 黙って結果ページに戻すのではなく明示的に拒否することで、
    /// ホワイトリストの設定ミスを表面化させる。
    RedirectRejected(String),
    /// 400 - ステータスレコードを付ける先のコンテキストが存在しない
    ContextMissing(String),
}

/// 申込処理の結果
pub struct Submission {
    pub response: SubmitResponse,
    /// バックグラウンド申込タスクのハンドル
    ///
    /// テストが完了を待ち合わせるためだけに公開する。プロダクションの
    /// 制御フローはこれに依存してはならず、破棄してタスクをデタッチする。
    pub background: Option<JoinHandle<Result<(), BackgroundTaskError>>>,
}

/// 直接借受の申込を受け付ける
///
/// バリデーションは厳密に次の順で行い、最初の失敗で打ち切る：
/// 1. サービスIDが既知であること（コンテキストが無いので直接エラー応答）
/// 2. リクエストIDが既知であること（同上）
/// 3. 受取場所が指定されていること（ValidationError）
/// 4. `request_prompt`レスポンスが存在すること（Error）
/// 5. 受取場所がそのリストに含まれること（Error）
///
/// すべて通れば：ディスパッチをInProgressに（ホストの陳腐化タイマーを
/// 巻き直す）、ステータスをInProgressに（前回のエラーメッセージは消去）、
/// ベンダー呼び出しをバックグラウンドで起動し、即座にリダイレクトを返す。
///
/// 順序の不変条件：InProgressの書き込みはタスク起動より前にawaitされる。
/// 終端ステータスがInProgressより先に観測されることはない。
pub async fn submit_request(
    deps: &SubmissionDeps,
    cmd: SubmitRequestCommand,
) -> Result<Submission, SubmitError> {
    // 1. サービスIDの解決
    if cmd.service_id != deps.service_id.as_str() {
        return Ok(direct_error(format!(
            "No such service for id `{}`",
            cmd.service_id
        )));
    }

    // 2. リクエストIDの解決
    let Some(request) = lookup_request(deps, &cmd.request_id).await? else {
        return Ok(direct_error(format!(
            "No Request with id `{}`",
            cmd.request_id
        )));
    };
    let request_id = request.id;

    // 3. 受取場所の存在
    let pickup_location = cmd
        .pickup_location
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());
    let Some(pickup_location) = pickup_location else {
        return register_error(
            deps,
            request_id,
            SubmissionStatus::ValidationError,
            deps.config.pickup_validation_message.clone(),
        )
        .await;
    };

    // 4. 既存のrequest_promptレスポンス
    //    ベンダー自身は受取場所を検証しない（不正な場所を送った時の挙動が
    //    不明）ので、こちらで出来る限り慎重に検証する。
    let prompt = deps
        .responses
        .find_request_prompt(request_id, &deps.service_id)
        .await
        .map_err(SubmitError::Store)?;
    let Some(prompt) = prompt else {
        return register_error(
            deps,
            request_id,
            SubmissionStatus::Error,
            format!(
                "No existing bd_request_prompt response found for request {}",
                request_id
            ),
        )
        .await;
    };

    // 5. 受取場所がプロンプトのリストに含まれること
    if !prompt
        .pickup_locations()
        .iter()
        .any(|loc| loc == pickup_location)
    {
        return register_error(
            deps,
            request_id,
            SubmissionStatus::Error,
            format!(
                "Pickup location `{}` not listed as acceptable in bd_request_prompt response {}",
                pickup_location,
                prompt.id.value()
            ),
        )
        .await;
    }

    // a. ディスパッチレコードをInProgressに戻す。申込が確認されないまま
    //    タイムアウトした場合のエラー化はホスト側が拾う。
    deps.dispatch
        .mark(request_id, &deps.service_id, DispatchStatus::InProgress, None)
        .await
        .map_err(SubmitError::Dispatch)?;

    // b. ステータスレコードをInProgressに。前回の失敗が残っていたら
    //    そのエラーメッセージを消す。
    deps.status_tracker
        .set_status(
            request_id,
            &deps.service_id,
            StatusFields::new(SubmissionStatus::InProgress).clear_error_user_message(),
        )
        .await
        .map_err(SubmitError::Store)?;

    // c. ベンダーの申込往復は遅いのでバックグラウンドに逃がす。
    //    プロセスが途中で死ねば申込は失われるが、ホストがタイムアウトを
    //    検出してエラー表示する。
    let background = tokio::spawn(run_vendor_submission(BackgroundContext {
        config: deps.config.clone(),
        service_id: deps.service_id.clone(),
        dispatch: deps.dispatch.clone(),
        vendor: deps.vendor.clone(),
        patron_auth: deps.patron_auth.clone(),
        status_tracker: deps.status_tracker.clone(),
        request_id,
        pickup_location: PickupLocation::new(pickup_location),
        isbn: request.citation.normalized_isbn(),
    }));

    // d. 即座にリダイレクト応答。redirectパラメータはホワイトリストを
    //    通った時だけ尊重する。
    let response = match cmd.redirect.as_deref().filter(|s| !s.is_empty()) {
        None => SubmitResponse::Redirect(resolve_menu_url(deps, request_id)),
        Some(redirect) if deps.whitelist.is_whitelisted(redirect) => {
            SubmitResponse::Redirect(redirect.to_string())
        }
        Some(redirect) => SubmitResponse::RedirectRejected(format!(
            "Redirect target `{}` is not in the configured redirect whitelist",
            redirect
        )),
    };

    Ok(Submission {
        response,
        background: Some(background),
    })
}

// ============================================================================
// バリデーション補助
// ============================================================================

async fn lookup_request(
    deps: &SubmissionDeps,
    raw_request_id: &str,
) -> Result<Option<CitationRequest>, SubmitError> {
    let Ok(uuid) = Uuid::parse_str(raw_request_id) else {
        return Ok(None);
    };

    deps.requests
        .get(RequestId::from_uuid(uuid))
        .await
        .map_err(SubmitError::Repository)
}

fn direct_error(message: String) -> Submission {
    Submission {
        response: SubmitResponse::ContextMissing(message),
        background: None,
    }
}

/// コンテキストが存在する段階のバリデーション失敗を記録して戻す
///
/// ステータスレコードにエラーを書き、結果ページへ303で戻す。
/// ValidationError（利用者起因）はログしない。
async fn register_error(
    deps: &SubmissionDeps,
    request_id: RequestId,
    status: SubmissionStatus,
    message: String,
) -> Result<Submission, SubmitError> {
    if status != SubmissionStatus::ValidationError {
        tracing::error!(request_id = %request_id, "{}", message);
    }

    deps.status_tracker
        .set_status(
            request_id,
            &deps.service_id,
            StatusFields::new(status).with_error_user_message(message),
        )
        .await
        .map_err(SubmitError::Store)?;

    Ok(Submission {
        response: SubmitResponse::Redirect(resolve_menu_url(deps, request_id)),
        background: None,
    })
}

fn resolve_menu_url(deps: &SubmissionDeps, request_id: RequestId) -> String {
    let mut url = deps.config.resolve_base_url.clone();
    url.query_pairs_mut()
        .append_pair("request_id", &request_id.to_string());
    url.into()
}

// ============================================================================
// バックグラウンド申込タスク
// ============================================================================

struct BackgroundContext {
    config: Arc<GatewayConfig>,
    service_id: ServiceId,
    dispatch: Arc<dyn DispatchRegistry>,
    vendor: Arc<dyn BorrowDirectClient>,
    patron_auth: Arc<dyn PatronAuthenticator>,
    status_tracker: Arc<StatusTracker>,
    request_id: RequestId,
    pickup_location: PickupLocation,
    isbn: Option<Isbn>,
}

/// ベンダーへの申込本体
///
/// 終端ステータス（Successful/Error）の記録までがこのタスクの責務。
/// ベンダー障害は記録して`Ok`で終わる（処理済みの結果だから）。
/// 記録中の永続化障害と認証設定の欠落は`Err`で伝播する——この
/// サブシステムの回復範囲を超えた障害である。
async fn run_vendor_submission(ctx: BackgroundContext) -> Result<(), BackgroundTaskError> {
    let barcode = match ctx.patron_auth.patron_barcode().await {
        Ok(barcode) => barcode,
        Err(error) => {
            tracing::error!(
                action = "request_item",
                outcome = "auth_error",
                request_id = %ctx.request_id,
                error = %error,
                "Cannot place BorrowDirect request without a patron barcode"
            );
            record_failure(&ctx, error.to_string(), None).await?;
            return Err(BackgroundTaskError::Auth(error));
        }
    };

    let started = Instant::now();
    let outcome = match tokio::time::timeout(
        ctx.config.vendor_timeout,
        ctx.vendor.request_item(
            &barcode,
            &ctx.config.library_symbol,
            &ctx.pickup_location,
            ctx.isbn.as_ref(),
        ),
    )
    .await
    {
        Ok(result) => result,
        Err(_) => Err(VendorError::Timeout(ctx.config.vendor_timeout)),
    };
    let elapsed_ms = started.elapsed().as_millis() as u64;

    match outcome {
        Ok(confirmation) => {
            tracing::info!(
                action = "request_item",
                outcome = "success",
                elapsed_ms,
                isbn = ctx.isbn.as_ref().map(|i| i.as_str()),
                request_number = %confirmation.request_number,
                "BorrowDirect request placed"
            );

            ctx.dispatch
                .mark(
                    ctx.request_id,
                    &ctx.service_id,
                    DispatchStatus::Successful,
                    None,
                )
                .await
                .map_err(BackgroundTaskError::Dispatch)?;
            ctx.status_tracker
                .set_status(
                    ctx.request_id,
                    &ctx.service_id,
                    StatusFields::new(SubmissionStatus::Successful)
                        .with_request_number(confirmation.request_number),
                )
                .await
                .map_err(BackgroundTaskError::Store)?;
            Ok(())
        }
        Err(error) => {
            tracing::error!(
                action = "request_item",
                outcome = "error",
                elapsed_ms,
                isbn = ctx.isbn.as_ref().map(|i| i.as_str()),
                error = %error,
                "Error placing BorrowDirect request"
            );

            record_failure(&ctx, error.to_string(), error.user_message().map(str::to_string))
                .await?;
            Ok(())
        }
    }
}

/// 恒久失敗の記録
///
/// `user_message`が無ければ`error_user_message`は空のままにし、
/// UIには汎用の失敗メッセージが出る。
async fn record_failure(
    ctx: &BackgroundContext,
    error_text: String,
    user_message: Option<String>,
) -> Result<(), BackgroundTaskError> {
    ctx.dispatch
        .mark(
            ctx.request_id,
            &ctx.service_id,
            DispatchStatus::FailedFatal,
            Some(error_text),
        )
        .await
        .map_err(BackgroundTaskError::Dispatch)?;

    let fields = match user_message {
        Some(message) => {
            StatusFields::new(SubmissionStatus::Error).with_error_user_message(message)
        }
        None => StatusFields::new(SubmissionStatus::Error).clear_error_user_message(),
    };
    ctx.status_tracker
        .set_status(ctx.request_id, &ctx.service_id, fields)
        .await
        .map_err(BackgroundTaskError::Store)?;

    Ok(())
}
