use coin_tracker_sdk::{render, CoinGeckoSource, CoinTracker};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Top Coins Tracker Example");
    println!("=========================");

    let source = Arc::new(CoinGeckoSource::new()?);
    let tracker = CoinTracker::new(source);
    let mut state_rx = tracker.subscribe();
    tracker.mount();

    // Render the first few view transitions, then tear the widget down.
    for _ in 0..4 {
        state_rx.changed().await?;
        println!("\n{:-<50}", "");
        println!("{}", render(&state_rx.borrow_and_update()));
    }

    tracker.unmount();
    Ok(())
}
