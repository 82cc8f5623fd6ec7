use async_trait::async_trait;
use crawlkit::{Crawler, Request, Transport};

/// Fetches one page and reports how long it took
#[derive(Default)]
pub struct ExampleCrawler;

#[async_trait]
impl Crawler for ExampleCrawler {
    async fn run(&mut self) -> anyhow::Result<()> {
        let transport = Transport::new().with_user_agent("{{ project_name }}/0.1");
        let req = Request::from_secs("https://example.com/", 10.0, 3.0)?;
        let resp = transport.process_request(&req).await?;
        println!(
            "{} {} ({} bytes, {:.3}s)",
            resp.code(),
            resp.effective_url(),
            resp.bytes_downloaded(),
            resp.times().total_secs()
        );
        Ok(())
    }
}
