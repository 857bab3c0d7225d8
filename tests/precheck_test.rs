use borrow_direct_gateway::adapters::mock::{
    DispatchRegistry, FindItemScript, ResponseStore, VendorClient,
};
use borrow_direct_gateway::application::precheck::{self, PrecheckDeps};
use borrow_direct_gateway::config::GatewayConfig;
use borrow_direct_gateway::domain::citation::{
    Citation, CitationRequest, Genre, Holding, MatchReliability,
};
use borrow_direct_gateway::domain::dispatch::DispatchStatus;
use borrow_direct_gateway::domain::responses::ServiceResponseKind;
use borrow_direct_gateway::domain::value_objects::{RequestId, ServiceId};
use borrow_direct_gateway::ports::local_availability::HoldingsAvailability;
use borrow_direct_gateway::ports::vendor_client::VendorError;
use std::sync::Arc;
use std::time::Duration;

// ============================================================================
// テストハーネス
// ============================================================================

struct Harness {
    deps: PrecheckDeps,
    responses: Arc<ResponseStore>,
    dispatch: Arc<DispatchRegistry>,
    vendor: Arc<VendorClient>,
    service_id: ServiceId,
}

fn harness_with_config(config: GatewayConfig) -> Harness {
    let config = Arc::new(config);
    let responses = Arc::new(ResponseStore::new());
    let dispatch = Arc::new(DispatchRegistry::new());
    let vendor = Arc::new(VendorClient::new());
    let availability = Arc::new(HoldingsAvailability::new(config.available_statuses.clone()));
    let service_id = ServiceId::new("BorrowDirect");

    let deps = PrecheckDeps {
        config,
        service_id: service_id.clone(),
        vendor: vendor.clone(),
        responses: responses.clone(),
        dispatch: dispatch.clone(),
        availability,
    };

    Harness {
        deps,
        responses,
        dispatch,
        vendor,
        service_id,
    }
}

fn harness() -> Harness {
    harness_with_config(GatewayConfig::default())
}

fn book_request(isbn: Option<&str>) -> CitationRequest {
    CitationRequest {
        id: RequestId::new(),
        referrer_id: None,
        citation: Citation {
            title: Some("Biological foundations of language".to_string()),
            author: Some("Lenneberg, Eric H.".to_string()),
            isbn: isbn.map(str::to_string),
            genre: Genre::Book,
            ..Citation::default()
        },
        holdings: Vec::new(),
    }
}

fn article_request() -> CitationRequest {
    CitationRequest {
        id: RequestId::new(),
        referrer_id: None,
        citation: Citation {
            title: Some("The Atlantic monthly".to_string()),
            article_title: Some("The coming anarchy".to_string()),
            author: Some("Kaplan, Robert D.".to_string()),
            issn: Some("1072-7825".to_string()),
            genre: Genre::Article,
            ..Citation::default()
        },
        holdings: Vec::new(),
    }
}

// ============================================================================
// 対象外リクエストのスキップ
// ============================================================================

#[tokio::test]
async fn suppressed_referrer_does_nothing_and_dispatches_successful() {
    let h = harness();
    let mut request = book_request(Some("9789810743734"));
    request.referrer_id = Some("info:sid/BD".to_string());

    precheck::handle(&h.deps, &request).await.unwrap();

    assert!(h.responses.snapshot(request.id).is_empty());
    assert_eq!(
        h.dispatch.status_of(request.id, &h.service_id),
        Some(DispatchStatus::Successful)
    );
    assert!(h.vendor.find_item_calls().is_empty());
}

#[tokio::test]
async fn article_like_citation_is_skipped() {
    let h = harness();
    let request = article_request();

    precheck::handle(&h.deps, &request).await.unwrap();

    assert!(h.responses.snapshot(request.id).is_empty());
    assert_eq!(
        h.dispatch.status_of(request.id, &h.service_id),
        Some(DispatchStatus::Successful)
    );
    assert!(h.vendor.find_item_calls().is_empty());
}

#[tokio::test]
async fn locally_available_item_is_skipped() {
    let h = harness();
    let mut request = book_request(Some("9789810743734"));
    request.holdings.push(Holding {
        status: "Available".to_string(),
        match_reliability: MatchReliability::Exact,
    });

    precheck::handle(&h.deps, &request).await.unwrap();

    assert!(h.responses.snapshot(request.id).is_empty());
    assert_eq!(
        h.dispatch.status_of(request.id, &h.service_id),
        Some(DispatchStatus::Successful)
    );
    assert!(h.vendor.find_item_calls().is_empty());
}

// ============================================================================
// フォールバック検索リンク
// ============================================================================

#[tokio::test]
async fn book_without_isbn_gets_a_search_link() {
    let h = harness();
    let request = book_request(None);

    precheck::handle(&h.deps, &request).await.unwrap();

    let responses = h.responses.snapshot(request.id);
    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0].kind, ServiceResponseKind::LinkToSearch);
    let url = responses[0].url().expect("search link has a url");
    assert!(url.contains("title="));
    assert!(url.contains("author="));

    assert_eq!(
        h.dispatch.status_of(request.id, &h.service_id),
        Some(DispatchStatus::Successful)
    );
    assert!(h.vendor.find_item_calls().is_empty());
}

#[tokio::test]
async fn disabled_precheck_skips_the_vendor_but_keeps_the_link() {
    let config = GatewayConfig {
        enable_precheck: false,
        ..GatewayConfig::default()
    };
    let h = harness_with_config(config);
    let request = book_request(Some("9789810743734"));

    precheck::handle(&h.deps, &request).await.unwrap();

    let responses = h.responses.snapshot(request.id);
    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0].kind, ServiceResponseKind::LinkToSearch);
    assert!(h.vendor.find_item_calls().is_empty());
    assert_eq!(
        h.dispatch.status_of(request.id, &h.service_id),
        Some(DispatchStatus::Successful)
    );
}

// ============================================================================
// リモートプリチェック
// ============================================================================

#[tokio::test]
async fn requestable_item_gets_a_request_prompt_with_pickup_locations() {
    let h = harness();
    h.vendor.script_find_item(FindItemScript::Requestable(vec![
        "one".to_string(),
        "two".to_string(),
        "three".to_string(),
    ]));
    let request = book_request(Some("978-981-07-4373-4"));

    precheck::handle(&h.deps, &request).await.unwrap();

    // ISBNはハイフンを剥がした形でベンダーに渡る
    assert_eq!(h.vendor.find_item_calls(), vec!["9789810743734"]);

    let responses = h.responses.snapshot(request.id);
    assert_eq!(responses.len(), 2);

    let prompt = responses
        .iter()
        .find(|r| r.kind == ServiceResponseKind::RequestPrompt)
        .expect("request_prompt response exists");
    assert_eq!(prompt.pickup_locations(), vec!["one", "two", "three"]);

    assert!(
        responses
            .iter()
            .any(|r| r.kind == ServiceResponseKind::LinkToSearch)
    );
    assert_eq!(
        h.dispatch.status_of(request.id, &h.service_id),
        Some(DispatchStatus::Successful)
    );
}

#[tokio::test]
async fn non_requestable_item_gets_not_available() {
    let h = harness();
    h.vendor.script_find_item(FindItemScript::NotRequestable);
    let request = book_request(Some("9789810743734"));

    precheck::handle(&h.deps, &request).await.unwrap();

    let responses = h.responses.snapshot(request.id);
    assert_eq!(responses.len(), 2);
    assert!(
        responses
            .iter()
            .any(|r| r.kind == ServiceResponseKind::NotAvailable)
    );
    assert_eq!(
        h.dispatch.status_of(request.id, &h.service_id),
        Some(DispatchStatus::Successful)
    );
}

#[tokio::test]
async fn vendor_error_leaves_only_the_search_link_and_fails_temporary() {
    let h = harness();
    h.vendor.script_find_item(FindItemScript::Fail(VendorError::Timeout(
        Duration::from_secs(20),
    )));
    let request = book_request(Some("9789810743734"));

    precheck::handle(&h.deps, &request).await.unwrap();

    // エラー時はフォールバックリンクだけが残る
    let responses = h.responses.snapshot(request.id);
    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0].kind, ServiceResponseKind::LinkToSearch);

    assert_eq!(
        h.dispatch.status_of(request.id, &h.service_id),
        Some(DispatchStatus::FailedTemporary)
    );
    let error = h
        .dispatch
        .error_of(request.id, &h.service_id)
        .expect("dispatch carries the vendor error");
    assert!(error.contains("timed out"));
}
