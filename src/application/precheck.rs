use crate::config::GatewayConfig;
use crate::domain::citation::CitationRequest;
use crate::domain::dispatch::DispatchStatus;
use crate::domain::responses::ServiceResponse;
use crate::domain::search_url::build_search_url;
use crate::domain::value_objects::ServiceId;
use crate::ports::dispatch_registry::DispatchRegistry;
use crate::ports::local_availability::LocalAvailability;
use crate::ports::response_store::ServiceResponseStore;
use crate::ports::vendor_client::{BorrowDirectClient, VendorError};
use std::sync::Arc;
use std::time::Instant;

use super::errors::PrecheckError;

/// プリチェックアダプタの依存関係
///
/// 関数型DDDの原則に従い、データ構造として定義。
/// 振る舞いは持たず、純粋な関数に依存関係を渡す。
#[derive(Clone)]
pub struct PrecheckDeps {
    pub config: Arc<GatewayConfig>,
    pub service_id: ServiceId,
    pub vendor: Arc<dyn BorrowDirectClient>,
    pub responses: Arc<dyn ServiceResponseStore>,
    pub dispatch: Arc<dyn DispatchRegistry>,
    pub availability: Arc<dyn LocalAvailability>,
}

/// 可用性プリチェックを実行する
///
/// 0件以上のサービスレスポンスを追加し、ディスパッチレコードを
/// 完了（SuccessfulまたはFailedTemporary）にする。
///
/// 判定順序：
/// 1. 参照元IDが抑止セットに入っている、書誌が逐次刊行物・論文である、
///    または地元で入手可能 → 何もせずSuccessful
/// 2. それ以外は必ずフォールバックの検索リンクを先に出す
/// 3. 使えるISBNがありリモートプリチェックが有効なら、ベンダーに照会：
///    申込可能 → `request_prompt`、不可 → `not_available`、
///    エラー → ログしてFailedTemporary（検索リンクだけが残る）
/// 4. ISBNが無い・機能が無効なら照会は飛ばしてSuccessful
///
/// ベンダーのエラーはここで吸収され、呼び出し元には伝播しない。
/// 永続化層のエラーだけが伝播する。
pub async fn handle(deps: &PrecheckDeps, request: &CitationRequest) -> Result<(), PrecheckError> {
    // 1. 対象外のリクエストは黙って成功扱いにする
    if is_suppressed(deps, request)
        || request.citation.is_serial_like()
        || deps.availability.locally_available(request)
    {
        return mark(deps, request, DispatchStatus::Successful, None).await;
    }

    // 2. フォールバックの検索リンクは常に先に出す
    //    プリチェックが失敗してもこのリンクだけは利用者に見える。
    let search_url = build_search_url(
        &deps.config.search_base_url,
        &request.citation,
        deps.config.limit_title_words,
    );
    deps.responses
        .add(ServiceResponse::link_to_search(
            request.id,
            deps.service_id.clone(),
            search_url,
        ))
        .await
        .map_err(PrecheckError::Store)?;

    // 3. ISBNがありプリチェックが有効ならベンダーに照会する
    let isbn = match request.citation.normalized_isbn() {
        Some(isbn) if deps.config.enable_precheck => isbn,
        _ => return mark(deps, request, DispatchStatus::Successful, None).await,
    };

    let started = Instant::now();
    let outcome = match tokio::time::timeout(
        deps.config.vendor_timeout,
        deps.vendor.find_item(
            &deps.config.find_item_patron_barcode,
            &deps.config.library_symbol,
            &isbn,
        ),
    )
    .await
    {
        Ok(result) => result,
        Err(_) => Err(VendorError::Timeout(deps.config.vendor_timeout)),
    };
    let elapsed_ms = started.elapsed().as_millis() as u64;

    match outcome {
        Ok(found) => {
            if deps.config.log_find_item_success {
                tracing::debug!(
                    action = "find_item",
                    outcome = "success",
                    elapsed_ms,
                    isbn = %isbn,
                    requestable = found.requestable,
                    "BorrowDirect FindItem returned"
                );
            }

            let response = if found.requestable {
                ServiceResponse::request_prompt(
                    request.id,
                    deps.service_id.clone(),
                    found.pickup_locations,
                )
            } else {
                ServiceResponse::not_available(request.id, deps.service_id.clone())
            };
            deps.responses
                .add(response)
                .await
                .map_err(PrecheckError::Store)?;

            mark(deps, request, DispatchStatus::Successful, None).await
        }
        Err(error) => {
            // ベンダーが可用性を確認させてくれなかった。ログして一時失敗に
            // しておけばホストの再試行機構が後で拾う。タイムアウトなど
            // 一過性の問題であることが多い。
            tracing::error!(
                action = "find_item",
                outcome = "error",
                elapsed_ms,
                isbn = %isbn,
                error = %error,
                "BorrowDirect FindItem failed; the fallback search link stays as the only outcome"
            );

            mark(
                deps,
                request,
                DispatchStatus::FailedTemporary,
                Some(error.to_string()),
            )
            .await
        }
    }
}

fn is_suppressed(deps: &PrecheckDeps, request: &CitationRequest) -> bool {
    request
        .referrer_id
        .as_deref()
        .is_some_and(|rfr_id| deps.config.suppress_referrer_ids.iter().any(|s| s == rfr_id))
}

async fn mark(
    deps: &PrecheckDeps,
    request: &CitationRequest,
    status: DispatchStatus,
    error: Option<String>,
) -> Result<(), PrecheckError> {
    deps.dispatch
        .mark(request.id, &deps.service_id, status, error)
        .await
        .map_err(PrecheckError::Dispatch)
}
