//! Read a live workout snapshot from the first attached monitor

use oarlock::{HidContext, HidTransport, Monitor};

#[tokio::main]
async fn main() -> oarlock::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let context = HidContext::new()?;

    for info in context.enumerate() {
        println!("found: {}", info);
    }

    let monitor = Monitor::new(Box::new(HidTransport::pm5(&context)));

    monitor.connect().await?;
    println!("✓ Connected");

    let version = monitor.version().await?;
    println!("✓ Model {} (fw {})", version.model, version.software_version);

    let erg = monitor.erg_machine_type().await?;
    println!("✓ Machine: {}", erg);

    let snapshot = monitor.snapshot().await?;
    println!("{}", snapshot);

    monitor.disconnect().await?;
    println!("✓ Disconnected");

    Ok(())
}
