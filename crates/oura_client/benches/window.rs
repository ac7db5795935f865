use chrono::NaiveDate;
use criterion::{Criterion, criterion_group, criterion_main};
use oura_client::http_client::ReqwestOuraClient;
use oura_client::window::compute_at;
use oura_client::{Collection, CollectionResolver, PageRequest, TokenStore};
use std::hint::black_box;
use std::sync::Arc;
use tokio::runtime::Builder;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn bench_compute_window(c: &mut Criterion) {
    let today = NaiveDate::from_ymd_opt(2024, 6, 15).expect("date");
    let req = PageRequest::between("2023-01-01", "2024-06-15")
        .with_page_size(10)
        .with_page(12);
    c.bench_function("compute_window", |b| {
        b.iter(|| compute_at(black_box(&req), today).expect("plan"))
    });
}

fn bench_page_fetch(c: &mut Criterion) {
    let rt = Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("tokio runtime");

    let server = rt.block_on(async {
        let server = MockServer::start().await;
        let data: Vec<_> = (0..10)
            .rev()
            .map(|i| serde_json::json!({"id": format!("s{i}"), "day": format!("2024-01-{:02}", i + 1), "score": 80}))
            .collect();
        Mock::given(method("GET"))
            .and(path("/daily_sleep"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "data": data })))
            .mount(&server)
            .await;
        server
    });

    let client = ReqwestOuraClient::new(&server.uri(), TokenStore::new());
    let resolver = CollectionResolver::new(Arc::new(client), Collection::DailySleep);
    let req = PageRequest::between("2024-01-01", "2024-01-10");
    c.bench_function("daily_sleep_page", |b| {
        b.to_async(&rt).iter(|| {
            let resolver = resolver.clone();
            let req = req.clone();
            async move {
                resolver.page(&req).await.expect("page");
            }
        })
    });
}

criterion_group!(benches, bench_compute_window, bench_page_fetch);
criterion_main!(benches);
