//! # Observability & Tracing
//!
//! The registry logs through the `tracing` crate with structured fields:
//!
//! - **Phase completion** (`info`): `Phase complete` with the phase and a component count
//! - **Per component steps** (`debug`): `Running step` with the component and step
//! - **Ordering decisions** (`debug`): `setup_after` / `teardown_after` calls, satisfied or resolved
//! - **Failures** (`warn`): failed steps, detected cycles, replaced duplicates
//!
//! ```bash
//! RUST_LOG=info cargo run     # one line per phase
//! RUST_LOG=debug cargo run    # every step and ordering call
//! RUST_LOG=component_registry=debug cargo run
//! ```
//!
//! With `RUST_LOG=debug` a setup run with ordering reads like:
//!
//! ```text
//! DEBUG Running step component="app.Service" step=setup
//! DEBUG setup_after resolving component="storage.Store"
//! DEBUG Running step component="storage.Store" step=setup
//! INFO  Phase complete phase=set up components=3
//! ```

/// Installs a compact `fmt` subscriber filtered by `RUST_LOG`.
///
/// Call once at program start. A second call panics because a global default
/// subscriber is already set.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
