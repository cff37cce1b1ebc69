use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use clap::Parser;
use rand::Rng;
use tracing::info;

use mvvm_core::{Event, EventAggregator, SubscriberId, ThreadDispatcher};
use mvvm_core::ext::init_logger_with_filter;

#[derive(Debug, Parser)]
struct Args {
    /// Worker threads publishing progress.
    #[arg(short, long, default_value_t = 4)]
    workers: usize,
    /// Progress events published by every worker.
    #[arg(short, long, default_value_t = 10)]
    events: usize,
}

#[derive(Debug, Event)]
struct Progress {
    worker: usize,
    percent: usize,
}

#[derive(Debug, Event)]
#[event(name = "worker.finished")]
struct Finished(usize);

fn main() -> anyhow::Result<()> {
    init_logger_with_filter("mvvm_core=debug,ui_thread=info");
    let args = Args::parse();
    let ui = ThreadDispatcher::new("ui")?;
    let aggregator = EventAggregator::new();
    let progress_bar = SubscriberId::new();
    let rendered = Arc::new(AtomicU64::new(0));
    let counter = rendered.clone();
    aggregator.subscribe_on(&progress_bar, ui.clone(), move |progress: &Progress| {
        let frame = counter.fetch_add(1, Ordering::Relaxed) + 1;
        info!("frame {} worker {} at {}%", frame, progress.worker, progress.percent);
        Ok(())
    });
    aggregator.subscribe(&progress_bar, |finished: &Finished| {
        info!("worker {} finished", finished.0);
        Ok(())
    });
    std::thread::scope(|scope| {
        for worker in 0..args.workers {
            let aggregator = &aggregator;
            let events = args.events;
            scope.spawn(move || {
                let mut rng = rand::thread_rng();
                for step in 1..=events {
                    std::thread::sleep(Duration::from_millis(rng.gen_range(1..20)));
                    aggregator.publish(Progress { worker, percent: step * 100 / events });
                }
                aggregator.publish(Finished(worker));
            });
        }
    });
    aggregator.unsubscribe_all(&progress_bar);
    ui.shutdown();
    info!("rendered {} frames", rendered.load(Ordering::Relaxed));
    info!("{:?}", aggregator);
    Ok(())
}
