//! End-to-end crawl tests
//!
//! These tests run the full coordinator against a wiremock endpoint and
//! assert on the report, the request counts, and the resulting database.

use aquatrans::config::CrawlConfig;
use aquatrans::crawler::Coordinator;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ENDPOINT_PATH: &str = "/OpenData/AquaticTransData.aspx";

/// Two transaction entries for one ROC date, in the endpoint's shape.
fn sample_payload(roc_date: &str) -> serde_json::Value {
    serde_json::json!([
        {
            "魚貨名稱": "吳郭魚",
            "品種代碼": 1071,
            "市場名稱": "台北",
            "上價": 80.5,
            "下價": 45.2,
            "中價": 62.0,
            "平均價": 61.8,
            "交易日期": roc_date,
            "交易量": 1520.3
        },
        {
            "魚貨名稱": "白鯧",
            "品種代碼": 2011,
            "市場名稱": "高雄",
            "上價": 520.0,
            "下價": 310.0,
            "中價": 410.0,
            "平均價": 405.5,
            "交易日期": roc_date,
            "交易量": 88.0
        }
    ])
}

fn test_config(server: &MockServer, db_path: &Path, start: &str, end: &str) -> CrawlConfig {
    let mut config = CrawlConfig::new(
        start.parse::<NaiveDate>().unwrap(),
        end.parse::<NaiveDate>().unwrap(),
    );
    config.max_tasks = 2;
    config.max_tries = 3;
    config.database_path = db_path.to_path_buf();
    config.endpoint = format!("{}{}", server.uri(), ENDPOINT_PATH);
    config.retry_delay = Duration::from_millis(10);
    config
}

fn db_path(dir: &tempfile::TempDir) -> PathBuf {
    dir.path().join("crawl.db")
}

fn count_rows(db_path: &Path) -> i64 {
    let conn = rusqlite::Connection::open(db_path).unwrap();
    conn.query_row("SELECT COUNT(*) FROM aquatic_trans", [], |row| row.get(0))
        .unwrap()
}

fn count_rows_for_date(db_path: &Path, roc_date: &str) -> i64 {
    let conn = rusqlite::Connection::open(db_path).unwrap();
    conn.query_row(
        "SELECT COUNT(*) FROM aquatic_trans WHERE date = ?1",
        [roc_date],
        |row| row.get(0),
    )
    .unwrap()
}

async fn mount_success(server: &MockServer, roc_date: &str) {
    Mock::given(method("GET"))
        .and(path(ENDPOINT_PATH))
        .and(query_param("StartDate", roc_date))
        .and(query_param("EndDate", roc_date))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_payload(roc_date)))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn three_day_crawl_stores_all_records() {
    let server = MockServer::start().await;
    for roc_date in ["1090101", "1090102", "1090103"] {
        mount_success(&server, roc_date).await;
    }

    let dir = tempfile::tempdir().unwrap();
    let db = db_path(&dir);
    let config = test_config(&server, &db, "2020-01-01", "2020-01-03");

    let mut coordinator = Coordinator::new(config).unwrap();
    let report = coordinator.run().await.unwrap();
    coordinator.close().unwrap();

    assert_eq!(report.items, 3);
    assert_eq!(report.stats.completed, 3);
    assert_eq!(report.stats.failed, 0);
    assert_eq!(report.stats.records, 6);
    assert_eq!(count_rows(&db), 6);
}

#[tokio::test]
async fn transient_failures_are_retried_until_success() {
    let server = MockServer::start().await;
    mount_success(&server, "1090101").await;
    mount_success(&server, "1090103").await;

    // The second date fails its first two attempts with a server error,
    // then succeeds: three requests for that date in total.
    Mock::given(method("GET"))
        .and(path(ENDPOINT_PATH))
        .and(query_param("StartDate", "1090102"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(ENDPOINT_PATH))
        .and(query_param("StartDate", "1090102"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_payload("1090102")))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let db = db_path(&dir);
    let config = test_config(&server, &db, "2020-01-01", "2020-01-03");

    let mut coordinator = Coordinator::new(config).unwrap();
    let report = coordinator.run().await.unwrap();
    coordinator.close().unwrap();

    assert_eq!(report.items, 3);
    assert_eq!(report.stats.completed, 3);
    assert_eq!(report.stats.failed, 0);
    assert_eq!(report.stats.records, 6);
    assert_eq!(count_rows_for_date(&db, "1090102"), 2);
}

#[tokio::test]
async fn retries_exhaust_after_max_tries() {
    let server = MockServer::start().await;

    // Permanently failing: exactly max_tries requests, then the item is
    // dropped and still acknowledged (the crawl completes).
    Mock::given(method("GET"))
        .and(path(ENDPOINT_PATH))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let db = db_path(&dir);
    let config = test_config(&server, &db, "2020-01-01", "2020-01-01");

    let mut coordinator = Coordinator::new(config).unwrap();
    let report = coordinator.run().await.unwrap();
    coordinator.close().unwrap();

    assert_eq!(report.items, 1);
    assert_eq!(report.stats.failed, 1);
    assert_eq!(report.stats.completed, 0);
    assert_eq!(report.stats.records, 0);
    assert_eq!(count_rows(&db), 0);
}

#[tokio::test]
async fn invalid_json_is_dropped_without_retry() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ENDPOINT_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("not json at all", "application/json"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let db = db_path(&dir);
    let config = test_config(&server, &db, "2020-01-01", "2020-01-01");

    let mut coordinator = Coordinator::new(config).unwrap();
    let report = coordinator.run().await.unwrap();
    coordinator.close().unwrap();

    assert_eq!(report.items, 1);
    assert_eq!(report.stats.parse_failures, 1);
    assert_eq!(report.stats.completed, 0);
    assert_eq!(count_rows(&db), 0);
}

#[tokio::test]
async fn non_json_content_type_completes_with_no_records() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ENDPOINT_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html")
                .set_body_string("<html>no data for this date</html>"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let db = db_path(&dir);
    let config = test_config(&server, &db, "2020-01-01", "2020-01-01");

    let mut coordinator = Coordinator::new(config).unwrap();
    let report = coordinator.run().await.unwrap();
    coordinator.close().unwrap();

    assert_eq!(report.stats.completed, 1);
    assert_eq!(report.stats.records, 0);
    assert_eq!(count_rows(&db), 0);
}

#[tokio::test]
async fn redirects_are_dropped_without_retry() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ENDPOINT_PATH))
        .respond_with(
            ResponseTemplate::new(302).insert_header("location", "http://example.com/moved"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let db = db_path(&dir);
    let config = test_config(&server, &db, "2020-01-01", "2020-01-01");

    let mut coordinator = Coordinator::new(config).unwrap();
    let report = coordinator.run().await.unwrap();
    coordinator.close().unwrap();

    assert_eq!(report.stats.dropped, 1);
    assert_eq!(report.stats.completed, 0);
    assert_eq!(count_rows(&db), 0);
}

#[tokio::test]
async fn wide_ranges_are_bounded_by_the_worker_pool() {
    let server = MockServer::start().await;

    // Ten dates, two workers; every date must still be fetched exactly once.
    Mock::given(method("GET"))
        .and(path(ENDPOINT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(10)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let db = db_path(&dir);
    let config = test_config(&server, &db, "2020-03-01", "2020-03-10");

    let mut coordinator = Coordinator::new(config).unwrap();
    let report = coordinator.run().await.unwrap();
    coordinator.close().unwrap();

    assert_eq!(report.items, 10);
    assert_eq!(report.stats.completed, 10);
    assert_eq!(report.stats.records, 0);
}
