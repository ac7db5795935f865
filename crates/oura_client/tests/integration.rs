use oura_client::http_client::ReqwestOuraClient;
use oura_client::{Collection, OuraClient, OuraError, PageRequest, RangeQuery, Root, TokenStore};
use secrecy::SecretString;
use std::sync::Arc;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn root_for(server: &MockServer, token: Option<&str>) -> Root {
    let tokens = match token {
        Some(t) => TokenStore::with_token(SecretString::from(t.to_string())),
        None => TokenStore::new(),
    };
    let client = ReqwestOuraClient::new(&server.uri(), tokens.clone());
    Root::new(Arc::new(client), tokens)
}

#[tokio::test]
async fn one_sends_bearer_token_and_passes_fields_through() {
    let server = MockServer::start().await;
    let body = serde_json::json!({
        "id": "sleep-1",
        "day": "2024-01-02",
        "score": 82,
        "contributors": {"deep_sleep": 77, "rem_sleep": 91}
    });
    Mock::given(method("GET"))
        .and(path("/daily_sleep/sleep-1"))
        .and(header("authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let root = root_for(&server, Some("tok"));
    let rec = root.daily_sleep().one("sleep-1").await.expect("record");
    assert_eq!(rec.id, "sleep-1");
    assert_eq!(rec.day(), Some("2024-01-02"));
    assert_eq!(serde_json::to_value(&rec).unwrap(), body);
}

#[tokio::test]
async fn page_queries_window_and_reverses_items() {
    let server = MockServer::start().await;
    let body = serde_json::json!({
        "data": [
            {"id": "a3", "day": "2024-01-20"},
            {"id": "a2", "day": "2024-01-19"},
            {"id": "a1", "day": "2024-01-14"}
        ],
        "next_token": null
    });
    Mock::given(method("GET"))
        .and(path("/daily_activity"))
        .and(query_param("start_date", "2024-01-14"))
        .and(query_param("end_date", "2024-01-20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let root = root_for(&server, Some("tok"));
    let req = PageRequest::between("2024-01-01", "2024-01-20").with_page_size(7);
    let page = root.daily_activity().page(&req).await.expect("page");

    let ids: Vec<_> = page.items.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["a1", "a2", "a3"]);
    let next = page.next.expect("continuation");
    assert_eq!(next.page, Some(2));
    assert_eq!(next.start_date.as_deref(), Some("2024-01-01"));
    assert_eq!(next.end_date.as_deref(), Some("2024-01-20"));
}

#[tokio::test]
async fn fetch_next_follows_continuation_until_done() {
    let server = MockServer::start().await;
    for (start, end) in [
        ("2024-01-14", "2024-01-20"),
        ("2024-01-07", "2024-01-13"),
        ("2024-01-01", "2024-01-06"),
    ] {
        Mock::given(method("GET"))
            .and(path("/daily_readiness"))
            .and(query_param("start_date", start))
            .and(query_param("end_date", end))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [{"id": format!("r-{end}"), "day": end}]
            })))
            .expect(1)
            .mount(&server)
            .await;
    }

    let root = root_for(&server, Some("tok"));
    let readiness = root.daily_readiness();
    let mut page = readiness
        .page(&PageRequest::between("2024-01-01", "2024-01-20"))
        .await
        .expect("first page");
    let mut ids = vec![page.items[0].id.clone()];
    while let Some(next) = readiness.fetch_next(&page).await.expect("next page") {
        ids.push(next.items[0].id.clone());
        page = next;
    }
    assert_eq!(ids, vec!["r-2024-01-20", "r-2024-01-13", "r-2024-01-06"]);
}

#[tokio::test]
async fn not_found_surfaces_remote_api_error_without_retry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/daily_stress/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("{\"detail\":\"Not found\"}"))
        .expect(1)
        .mount(&server)
        .await;

    let root = root_for(&server, Some("tok"));
    let err = root.daily_stress().one("missing").await.unwrap_err();
    match err {
        OuraError::RemoteApi { status, body } => {
            assert_eq!(status, 404);
            assert!(body.contains("Not found"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    server.verify().await;
}

#[tokio::test]
async fn non_200_success_status_is_still_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/daily_sleep/s1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let root = root_for(&server, Some("tok"));
    let err = root.daily_sleep().one("s1").await.unwrap_err();
    assert!(matches!(err, OuraError::RemoteApi { status: 204, .. }));
}

#[tokio::test]
async fn missing_token_sends_no_authorization_and_gets_401() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/daily_sleep"))
        .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
        .mount(&server)
        .await;

    let root = root_for(&server, None);
    let err = root
        .daily_sleep()
        .page(&PageRequest::default())
        .await
        .unwrap_err();
    assert!(matches!(err, OuraError::RemoteApi { status: 401, .. }));

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
    assert!(received[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn configure_applies_to_subsequent_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/daily_sleep/s1"))
        .and(header("authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "s1"})))
        .expect(2)
        .mount(&server)
        .await;

    let root = root_for(&server, None);
    root.configure("fresh").await;
    let item = root.daily_sleep().one("s1").await.expect("record");

    let r = root.daily_sleep().gref(&item);
    let again = root.resolve(&r).await.expect("resolved via gref");
    assert_eq!(again, item);
}

#[tokio::test]
async fn range_passes_next_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/daily_stress"))
        .and(query_param("start_date", "2024-02-01"))
        .and(query_param("next_token", "page-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [{"id": "st1", "day": "2024-02-03", "stress_high": 3600}],
            "next_token": "page-3"
        })))
        .mount(&server)
        .await;

    let root = root_for(&server, Some("tok"));
    let resp = root
        .daily_stress()
        .range(&RangeQuery {
            start_date: Some("2024-02-01".into()),
            end_date: None,
            next_token: Some("page-2".into()),
        })
        .await
        .expect("range");
    assert_eq!(resp.data.len(), 1);
    assert_eq!(resp.next_token.as_deref(), Some("page-3"));

    let received = server.received_requests().await.unwrap();
    assert!(!received[0].url.query().unwrap_or("").contains("end_date"));
}

#[tokio::test]
async fn malformed_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/daily_activity/a1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = ReqwestOuraClient::new(&server.uri(), TokenStore::new());
    let err = client
        .get_document(Collection::DailyActivity, "a1")
        .await
        .unwrap_err();
    match err {
        OuraError::Decode(msg) => assert!(msg.contains("not json")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn invalid_date_fails_before_any_request() {
    let server = MockServer::start().await;
    let root = root_for(&server, Some("tok"));
    let err = root
        .daily_sleep()
        .page(&PageRequest::between("yesterday", "2024-01-20"))
        .await
        .unwrap_err();
    assert!(matches!(err, OuraError::InvalidDate(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn one_keeps_id_inside_collection_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/daily_stress/x"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "stress-x"})))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/daily_sleep/a%2Fb%3Fc=1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "a/b?c=1"})))
        .expect(1)
        .mount(&server)
        .await;

    let root = root_for(&server, Some("tok"));
    let sleep = root.daily_sleep();

    let err = sleep.one("../daily_stress/x").await.unwrap_err();
    assert!(matches!(err, OuraError::RemoteApi { status: 404, .. }));

    let rec = sleep.one("a/b?c=1").await.expect("record");
    assert_eq!(rec.id, "a/b?c=1");

    let received = server.received_requests().await.unwrap();
    assert_eq!(received[0].url.path(), "/daily_sleep/..%2Fdaily_stress%2Fx");
    assert!(received.iter().all(|r| r.url.query().is_none()));
}
