use std::time::Duration;

use clap::Parser;
use futures::future::join_all;
use rand::Rng;
use tracing::{info, warn};

use mvvm_core::{Error, Event, EventAggregator, SubscriberId, ThreadDispatcher};
use mvvm_core::ext::init_logger_with_filter;

#[derive(Debug, Parser)]
struct Args {
    /// Events published concurrently.
    #[arg(short, long, default_value_t = 8)]
    count: usize,
    /// How long a publisher waits for the ui thread, in milliseconds.
    #[arg(short, long, default_value_t = 50)]
    timeout: u64,
}

#[derive(Debug, Event)]
struct SearchResult {
    query: usize,
    hits: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger_with_filter("mvvm_core=debug,async_publish=info");
    let args = Args::parse();
    let ui = ThreadDispatcher::new("ui")?;
    let aggregator = EventAggregator::new();
    let list = SubscriberId::new();
    aggregator.subscribe_on(&list, ui.clone(), |result: &SearchResult| {
        let render = rand::thread_rng().gen_range(10..100);
        std::thread::sleep(Duration::from_millis(render));
        info!("query {} rendered {} hits in {}ms", result.query, result.hits, render);
        Ok(())
    });
    let timeout = Duration::from_millis(args.timeout);
    let publishes = (0..args.count).map(|query| {
        let aggregator = aggregator.clone();
        async move {
            let hits = rand::thread_rng().gen_range(0..500);
            aggregator.publish_timeout(SearchResult { query, hits }, timeout).await
        }
    });
    for result in join_all(publishes).await {
        match result {
            Ok(delivered) => info!("delivered {}", delivered),
            Err(Error::PublishTimeout { event, timeout }) => warn!("{} still rendering after {:?}", event, timeout),
            Err(error) => return Err(error.into()),
        }
    }
    let delivered = aggregator.publish_async(SearchResult { query: args.count, hits: 0 }).await?;
    info!("final publish delivered {}", delivered);
    aggregator.unsubscribe_all(&list);
    ui.shutdown();
    Ok(())
}
