use futures_util::StreamExt;
use oura_client::{PageRequest, Root, config::Config};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config::from_env()?;
    let root = Root::from_config(&cfg)?;

    let start = std::env::var("OURA_START_DATE").unwrap_or_else(|_| "2024-01-01".into());
    let end = std::env::var("OURA_END_DATE").unwrap_or_else(|_| "2024-01-31".into());

    let pages = root.daily_readiness().pages(PageRequest::between(start, end));
    futures_util::pin_mut!(pages);
    while let Some(page) = pages.next().await {
        let page = page?;
        for item in &page.items {
            println!("{} {}", item.day().unwrap_or("?"), item.id);
        }
    }
    Ok(())
}
