//! Logging hooks for ringmpmc-rs.
//!
//! The ring buffer emits a handful of events, none on the claim/publish path:
//!
//! | Level   | Event                                                      |
//! |---------|------------------------------------------------------------|
//! | `debug` | buffer created (requested and realised capacity, metrics)  |
//! | `info`  | first `dispose()` call, with the number of pending items   |
//! | `trace` | `poll` gave up after its timeout                           |
//! | `error` | a slot sequence fell more than a lap behind (then panics)  |
//!
//! Enable with `--features tracing`; without it every macro here expands to
//! nothing. Filter with `RUST_LOG`, e.g. `RUST_LOG=ringmpmc_rs=info`.

/// Initialize a tracing subscriber with timestamps and thread ids.
///
/// Call this at the start of tests or example binaries to see ring buffer
/// events. Does nothing if the `tracing` feature is not enabled.
#[cfg(feature = "tracing")]
pub fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ringmpmc_rs=trace"));

    // A second initialisation (e.g. from another test) is not an error.
    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_thread_names(true)
                .with_timer(fmt::time::uptime()),
        )
        .with(filter)
        .try_init();
}

#[cfg(not(feature = "tracing"))]
pub const fn init_tracing() {}

#[cfg(feature = "tracing")]
pub(crate) use tracing::{debug, error, info, trace};

// Without the feature every event macro swallows its arguments.
#[cfg(not(feature = "tracing"))]
macro_rules! discard_event {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
pub(crate) use {
    discard_event as debug, discard_event as error, discard_event as info, discard_event as trace,
};
