//! Minimal process harness: listen on "hello", greet whoever publishes.
//!
//! Run with:
//! ```sh
//! cargo run --example hello --features memory,logging
//! ```
//!
//! A background task publishes a few demo notifications, then the process
//! waits for Ctrl-C / SIGTERM and shuts down in order.

use std::sync::Arc;
use std::time::Duration;

use relisten::{
    Config, Greeter, Hook, HookSet, Listener, LogHook, MemoryHub, Subscription, Watchdog,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let hub = MemoryHub::new();
    let hooks = HookSet::new(vec![Arc::new(LogHook) as Arc<dyn Hook>]);
    let config = Config::default();

    let listener = Listener::start(
        hub.clone(),
        Subscription::channel("hello"),
        config,
        hooks.clone(),
    )
    .await?; // an unreachable store here is fatal: log and exit

    let handle = listener.handle();
    let watchdog =
        Watchdog::new(Greeter::default(), hooks).with_idle_timeout(config.idle_timeout);
    let loop_task = tokio::spawn(watchdog.run(listener));

    // Demo traffic, including the empty-payload fallback case.
    let publisher = hub.clone();
    tokio::spawn(async move {
        for payload in ["Ann", "", "Bob"] {
            tokio::time::sleep(Duration::from_secs(1)).await;
            publisher.publish("hello", payload);
        }
    });

    println!("Waiting for notifications, press Ctrl+C to exit...");
    relisten::wait_for_shutdown_signal().await?;

    handle.close();
    loop_task.await?;
    Ok(())
}
