use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use borrow_direct_gateway::adapters::mock::{
    DispatchRegistry, RequestRepository, ResponseStore, StaticPatronAuth, VendorClient,
};
use borrow_direct_gateway::api::handlers::AppState;
use borrow_direct_gateway::api::router::create_router;
use borrow_direct_gateway::application::{StatusTracker, SubmissionDeps};
use borrow_direct_gateway::config::{GatewayConfig, SubmitMethod};
use borrow_direct_gateway::domain::citation::{Citation, CitationRequest, Genre};
use borrow_direct_gateway::domain::responses::{
    ServiceResponse, ServiceResponseKind, SubmissionStatus,
};
use borrow_direct_gateway::domain::value_objects::{RequestId, ServiceId};
use borrow_direct_gateway::domain::whitelist::UrlWhitelist;
use std::sync::Arc;
use tower::ServiceExt;

// ============================================================================
// E2Eテスト用のヘルパー関数
// ============================================================================

struct TestApp {
    router: axum::Router,
    requests: Arc<RequestRepository>,
    responses: Arc<ResponseStore>,
    service_id: ServiceId,
}

/// インメモリアダプターと実際のAPIルーターでアプリを組み立てる
fn setup_app(config: GatewayConfig) -> TestApp {
    let config = Arc::new(config);
    let requests = Arc::new(RequestRepository::new());
    let responses = Arc::new(ResponseStore::new());
    let dispatch = Arc::new(DispatchRegistry::new());
    let vendor = Arc::new(VendorClient::new());
    let status_tracker = Arc::new(StatusTracker::new(responses.clone()));
    let whitelist = UrlWhitelist::new(&config.redirect_whitelist);
    let service_id = ServiceId::new("BorrowDirect");

    let submission_deps = SubmissionDeps {
        config,
        service_id: service_id.clone(),
        requests: requests.clone(),
        responses: responses.clone(),
        dispatch,
        vendor,
        patron_auth: Arc::new(StaticPatronAuth::new("12345678")),
        status_tracker,
        whitelist,
    };

    let router = create_router(Arc::new(AppState { submission_deps }));

    TestApp {
        router,
        requests,
        responses,
        service_id,
    }
}

/// 申込可能な状態まで揃ったリクエストを登録する
fn submittable_request(app: &TestApp) -> RequestId {
    let request = CitationRequest {
        id: RequestId::new(),
        referrer_id: None,
        citation: Citation {
            title: Some("Biological foundations of language".to_string()),
            isbn: Some("9789810743734".to_string()),
            genre: Genre::Book,
            ..Citation::default()
        },
        holdings: Vec::new(),
    };
    let request_id = request.id;
    app.requests.add_request(request);

    app.responses.seed(ServiceResponse::request_prompt(
        request_id,
        app.service_id.clone(),
        vec!["one".to_string(), "two".to_string(), "three".to_string()],
    ));

    request_id
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

// ============================================================================
// 申込エンドポイント
// ============================================================================

#[tokio::test]
async fn good_submission_redirects_303_to_the_result_page() {
    let app = setup_app(GatewayConfig::default());
    let request_id = submittable_request(&app);

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!(
                    "/borrow-direct/BorrowDirect/{}?pickup_location=one",
                    request_id
                ))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let location = response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(location.contains(&request_id.to_string()));

    // ハンドラーが戻った時点でInProgressが観測できる
    let status = app
        .responses
        .snapshot(request_id)
        .into_iter()
        .find(|r| r.kind == ServiceResponseKind::RequestStatus)
        .expect("status record exists");
    assert!(matches!(
        status.status(),
        Some(SubmissionStatus::InProgress | SubmissionStatus::Successful)
    ));
}

#[tokio::test]
async fn unknown_request_id_is_a_400_with_the_diagnostic_body() {
    let app = setup_app(GatewayConfig::default());

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/borrow-direct/BorrowDirect/bad_id?pickup_location=one")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await, "No Request with id `bad_id`");
}

#[tokio::test]
async fn unknown_service_id_is_a_400() {
    let app = setup_app(GatewayConfig::default());
    let request_id = submittable_request(&app);

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!(
                    "/borrow-direct/no_such_service/{}?pickup_location=one",
                    request_id
                ))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_text(response).await,
        "No such service for id `no_such_service`"
    );
}

#[tokio::test]
async fn missing_pickup_location_redirects_back_to_the_result_page() {
    let app = setup_app(GatewayConfig::default());
    let request_id = submittable_request(&app);

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/borrow-direct/BorrowDirect/{}", request_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let status = app
        .responses
        .snapshot(request_id)
        .into_iter()
        .find(|r| r.kind == ServiceResponseKind::RequestStatus)
        .expect("status record exists");
    assert_eq!(status.status(), Some(SubmissionStatus::ValidationError));
}

// ============================================================================
// リダイレクトのホワイトリスト
// ============================================================================

#[tokio::test]
async fn whitelisted_redirect_target_is_honored() {
    let config = GatewayConfig {
        redirect_whitelist: vec!["//example.org".to_string()],
        ..GatewayConfig::default()
    };
    let app = setup_app(config);
    let request_id = submittable_request(&app);

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!(
                    "/borrow-direct/BorrowDirect/{}?pickup_location=one&redirect=http%3A%2F%2Fexample.org",
                    request_id
                ))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "http://example.org"
    );
}

#[tokio::test]
async fn non_whitelisted_redirect_target_is_a_403() {
    let config = GatewayConfig {
        redirect_whitelist: vec!["//good.example".to_string()],
        ..GatewayConfig::default()
    };
    let app = setup_app(config);
    let request_id = submittable_request(&app);

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!(
                    "/borrow-direct/BorrowDirect/{}?pickup_location=one&redirect=http%3A%2F%2Fevil.example",
                    request_id
                ))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(body_text(response).await.contains("http://evil.example"));
}

// ============================================================================
// メソッド設定
// ============================================================================

#[tokio::test]
async fn post_method_reads_a_form_body() {
    let config = GatewayConfig {
        submit_method: SubmitMethod::Post,
        ..GatewayConfig::default()
    };
    let app = setup_app(config);
    let request_id = submittable_request(&app);

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/borrow-direct/BorrowDirect/{}", request_id))
                .header(
                    header::CONTENT_TYPE,
                    "application/x-www-form-urlencoded",
                )
                .body(Body::from("pickup_location=one"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn health_check_works() {
    let app = setup_app(GatewayConfig::default());

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
