//! Two timers driven the way a UI would drive them, rendered as log lines.
//!
//! Run with `RUST_LOG=tickstore=debug cargo run --example timer_app` to see
//! the store's own tracing output as well.

use std::time::Duration;
use tickstore::{TimerPair, WidgetCollection};
use tokio::time;
use tracing::info;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

fn render(index: usize, pair: &TimerPair) {
    let counter = pair.counter.get();
    let view = pair.derived.get();

    let mut buttons = Vec::new();
    if view.can_start {
        buttons.push("Start");
    }
    if view.can_stop {
        buttons.push("Stop");
    }
    if view.can_reset {
        buttons.push("Reset");
    }

    info!(
        timer = index,
        count = counter.count,
        double_count = view.double_count,
        buttons = ?buttons,
        "render"
    );
}

fn render_all(widgets: &WidgetCollection) {
    for (index, pair) in widgets.iter().enumerate() {
        render(index, pair);
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut widgets = WidgetCollection::default();
    widgets.push();
    info!("1. One timer, started");
    widgets
        .get(0)
        .ok_or_else(|| anyhow::anyhow!("collection is empty"))?
        .counter
        .start()?;

    time::sleep(Duration::from_millis(1_200)).await;
    render_all(&widgets);

    info!("2. Adding a second timer");
    let second = widgets.push().clone();
    second.counter.start()?;
    time::sleep(Duration::from_millis(1_100)).await;
    render_all(&widgets);

    info!("3. Stopping the first timer");
    if let Some(first) = widgets.get(0) {
        first.counter.stop();
    }
    time::sleep(Duration::from_millis(1_000)).await;
    render_all(&widgets);

    info!("4. Resetting the first timer");
    if let Some(first) = widgets.get(0) {
        first.counter.reset();
    }
    render_all(&widgets);

    info!("5. Removing the last timer");
    widgets.remove_last();
    time::sleep(Duration::from_millis(1_000)).await;
    render_all(&widgets);
    info!(still_counting = second.counter.is_running(), "removed timer");

    widgets.clear();
    info!("done");
    Ok(())
}
