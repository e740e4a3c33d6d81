//! # Component Registry Sample
//!
//! Boots the inventory components, places a few orders, then waits for
//! Ctrl-C (or a short timeout) and shuts everything down in reverse
//! dependency order.
//!
//! - **components**: the components and the names they are registered under.
//! - **lifecycle**: `AppSystem`, which drives the registry.
//!
//! ```bash
//! RUST_LOG=debug cargo run -p component-sample
//! COMPONENT_REGISTRY_DUPLICATES=replace SAMPLE_INITIAL_STOCK=3 cargo run -p component-sample
//! ```

use component_registry::tracing::setup_tracing;
use component_registry::RegistryConfig;
use component_sample::lifecycle::AppSystem;
use component_sample::model::ProductId;
use std::time::Duration;
use tracing::{error, info, warn};

// The registry is single-threaded, so everything stays on one runtime thread.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Setup tracing once for the entire application
    setup_tracing();

    let config = RegistryConfig::from_env()?;
    info!(?config, "Starting application");

    let mut system = AppSystem::new(config)?;
    if let Err(err) = system.start() {
        // release whatever did get set up before reporting
        system.shutdown()?;
        return Err(err.into());
    }

    let service = system.service()?;
    for (id, quantity) in [(1, 2), (2, 1), (1, 50)] {
        let id = ProductId(id);
        let result = service.borrow_mut().reserve(id, quantity);
        match result {
            Ok(remaining) => info!(product_id = %id, remaining, "Reservation accepted"),
            Err(e) => warn!(product_id = %id, error = %e, "Reservation rejected"),
        }
    }

    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                error!(error = %e, "Failed to listen for Ctrl-C");
            }
            info!("Ctrl-C received");
        }
        _ = tokio::time::sleep(Duration::from_millis(200)) => {
            info!("Demo finished");
        }
    }

    system.shutdown()?;
    info!("Application completed successfully");
    Ok(())
}
