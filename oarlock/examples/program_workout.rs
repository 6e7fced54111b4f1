//! Program a 2000 m workout with 500 m splits and watch it run

use std::time::Duration;
use tokio::time::sleep;

use oarlock::{HidContext, HidTransport, Monitor};

#[tokio::main]
async fn main() -> oarlock::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let context = HidContext::new()?;
    let monitor = Monitor::new(Box::new(HidTransport::pm5(&context)));

    monitor.connect().await?;

    // Bring the monitor back to a programmable state.
    println!("Resetting monitor...");
    monitor.go_finished().await?;
    monitor.go_idle().await?;

    println!("Programming 2000 m with 500 m splits...");
    monitor.start_fixed_distance(2000, 500).await?;

    loop {
        sleep(Duration::from_secs(1)).await;

        let snapshot = monitor.snapshot().await?;
        println!("{}", snapshot);

        if snapshot.workout_state.is_some_and(|s| s.is_over()) {
            break;
        }
    }

    println!("Done!");
    monitor.go_to_main_screen().await?;
    monitor.disconnect().await?;

    Ok(())
}
