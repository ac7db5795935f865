use oura_client::{PageRequest, Root, config::Config};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Example: expects OURA_PERSONAL_ACCESS_TOKEN in env
    let cfg = Config::from_env()?;
    let root = Root::from_config(&cfg)?;
    println!("status: {}", root.status().await);

    let page_size = std::env::var("OURA_PAGE_SIZE")
        .ok()
        .and_then(|v| v.parse::<i64>().ok());
    let req = PageRequest {
        page_size,
        ..PageRequest::default()
    };

    let page = root
        .daily_sleep()
        .page(&req)
        .await
        .map_err(|e| format!("failed to fetch sleep: {}", e))?;

    if page.items.is_empty() {
        println!("No sleep summaries returned (check date range or token)");
        return Ok(());
    }

    for item in page.items {
        let score = item
            .fields
            .get("score")
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".into());
        println!("- {} score {}", item.day().unwrap_or("?"), score);
    }

    Ok(())
}
