use std::sync::Arc;

use serde_json::Value;
use url::Url;
use wiremock::matchers::{body_string_contains, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

use hometax_watch::extract::{MockOutcome, NO_CLASS, NO_TITLE};
use hometax_watch::{
    BannerImage, HistoryStore, MemoryHistory, MockExtractor, Runner, SlackNotifier,
};

fn banner(list_index: usize, src: &str, alt: &str) -> BannerImage {
    BannerImage {
        list_index,
        image_index: 0,
        src: src.to_string(),
        alt: alt.to_string(),
        title: NO_TITLE.to_string(),
        class_name: NO_CLASS.to_string(),
    }
}

fn three_banners() -> Vec<BannerImage> {
    vec![
        banner(0, "/banners/a.png", "연말정산 간소화 안내"),
        banner(1, "/banners/b.png", "전자세금계산서 발급"),
        banner(2, "/banners/c.png", "현금영수증 조회"),
    ]
}

fn runner_with(
    extractor: MockExtractor,
    history: Arc<MemoryHistory>,
    server: &MockServer,
) -> Runner {
    let notifier = SlackNotifier::new(Url::parse(&server.uri()).unwrap(), "KST").unwrap();
    Runner::new(Box::new(extractor), history, notifier)
}

fn body_json(body: &str) -> Value {
    serde_json::from_str(body).unwrap()
}

#[tokio::test]
async fn first_run_persists_and_notifies_every_banner() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_string_contains("신규 배너"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let history = Arc::new(MemoryHistory::new());
    let runner = runner_with(
        MockExtractor::with_banners(three_banners()),
        Arc::clone(&history),
        &server,
    );

    let response = runner.handle().await;
    assert_eq!(response.status_code, 200);

    let body = body_json(&response.body);
    assert_eq!(body["total_images_count"], 3);
    assert_eq!(body["new_images_count"], 3);
    assert_eq!(body["unique_total_count"], 3);
    assert_eq!(body["unique_new_count"], 3);
    assert_eq!(body["notification_sent"], true);
    assert!(body["execution_time"].as_str().unwrap().ends_with("초"));

    assert_eq!(history.len(), 3);
}

#[tokio::test]
async fn unchanged_page_suppresses_notification_and_writes_nothing() {
    let server = MockServer::start().await;

    let history = Arc::new(MemoryHistory::new());
    history.save_new(&three_banners()).await;

    let runner = runner_with(
        MockExtractor::with_banners(three_banners()),
        Arc::clone(&history),
        &server,
    );

    let response = runner.handle().await;
    assert_eq!(response.status_code, 200);

    let body = body_json(&response.body);
    assert_eq!(body["total_images_count"], 3);
    assert_eq!(body["new_images_count"], 0);
    assert_eq!(body["unique_new_count"], 0);
    // Suppressed sends still count as success.
    assert_eq!(body["notification_sent"], true);

    assert_eq!(history.len(), 3);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn missing_container_is_a_soft_failure() {
    let server = MockServer::start().await;

    let history = Arc::new(MemoryHistory::new());
    let runner = runner_with(
        MockExtractor::with_banners(Vec::new()),
        Arc::clone(&history),
        &server,
    );

    let response = runner.handle().await;
    assert_eq!(response.status_code, 200);

    let body = body_json(&response.body);
    assert_eq!(body["total_images_count"], 0);
    assert_eq!(body["new_images_count"], 0);
    assert_eq!(body["notification_sent"], true);

    assert!(history.is_empty());
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn browser_failure_sends_one_failure_notice_and_reports_500() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_string_contains("스크래핑 실패"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let history = Arc::new(MemoryHistory::new());
    let runner = runner_with(
        MockExtractor::failing("chrome did not start"),
        Arc::clone(&history),
        &server,
    );

    let response = runner.handle().await;
    assert_eq!(response.status_code, 500);

    let body = body_json(&response.body);
    assert_eq!(body["message"], "홈택스 스크래핑 실패");
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("chrome did not start"));

    assert!(history.is_empty());
}

#[tokio::test]
async fn failure_notice_failure_is_swallowed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let history = Arc::new(MemoryHistory::new());
    let runner = runner_with(
        MockExtractor::failing("chrome did not start"),
        Arc::clone(&history),
        &server,
    );

    // The webhook rejecting the failure notice must not change the outcome.
    let response = runner.handle().await;
    assert_eq!(response.status_code, 500);
}

#[tokio::test]
async fn second_run_with_same_banners_finds_nothing_new() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let history = Arc::new(MemoryHistory::new());
    let runner = runner_with(
        MockExtractor::new(vec![
            MockOutcome::Banners(three_banners()),
            MockOutcome::Banners(three_banners()),
        ]),
        Arc::clone(&history),
        &server,
    );

    let first = body_json(&runner.handle().await.body);
    assert_eq!(first["new_images_count"], 3);

    let second = body_json(&runner.handle().await.body);
    assert_eq!(second["new_images_count"], 0);
    assert_eq!(second["notification_sent"], true);

    assert_eq!(history.len(), 3);
}

#[tokio::test]
async fn repositioned_banner_is_not_new() {
    let server = MockServer::start().await;

    let history = Arc::new(MemoryHistory::new());
    history
        .save_new(&[banner(0, "/banners/a.png", "연말정산 간소화 안내")])
        .await;

    // Same (src, alt), different slot in the markup.
    let runner = runner_with(
        MockExtractor::with_banners(vec![banner(5, "/banners/a.png", "연말정산 간소화 안내")]),
        Arc::clone(&history),
        &server,
    );

    let body = body_json(&runner.handle().await.body);
    assert_eq!(body["new_images_count"], 0);
    assert_eq!(history.len(), 1);
    assert!(server.received_requests().await.unwrap().is_empty());
}
