//! Logging utilities and structured logging support

pub use log::{debug, error, info, trace, warn};

/// Initialize the logging system
///
/// Honors `RUST_LOG` when set; otherwise falls back to `default_level`.
/// Calling this more than once is harmless.
pub fn init(default_level: log::LevelFilter) {
    let _ = env_logger::Builder::new()
        .filter_level(default_level)
        .parse_default_env()
        .try_init();
}

#[cfg(test)]
pub(crate) use capture::{init_for_tests, take_records};
