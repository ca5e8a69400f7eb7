//! Logging abstraction layer.
//!
//! The navigation core logs through crate-local macros so that the host
//! application can pick its backend with a feature flag. The two backends
//! are **mutually exclusive**; enable at most one.
//!
//! | Feature    | Backend         | Default |
//! |------------|-----------------|---------|
//! | `log`      | `log` crate     | yes     |
//! | `tracing`  | `tracing` crate | no      |
//!
//! With neither feature enabled every macro expands to nothing.
//!
//! # What is logged where
//!
//! | Level | Events |
//! |-------|--------|
//! | `error` | redirect loops, guard failures |
//! | `warn` | denied navigations, paths with no route, unknown menu entries, session routes skipped over a path conflict, unreadable stored values, tabs kept open after a failed switch |
//! | `info` | navigation start and completion, access routes generated, sign-out, external links |
//! | `debug` | guard redirects, matcher rebuilds, menu rebuilds, restored and closed tabs |
//! | `trace` | individual guard verdicts, middleware hooks, cache hits and misses, menu search |
//!
//! ```ignore
//! use console_navigator::{debug_log, warn_log};
//!
//! debug_log!("Rebuilt {} menu items", menus.len());
//! warn_log!("No route registered for '{}'", path);
//! ```

/// Emit a **trace**-level log message.
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::trace!($($arg)*);
        #[cfg(feature = "log")]
        ::log::trace!($($arg)*);
    };
}

/// Emit a **debug**-level log message.
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::debug!($($arg)*);
        #[cfg(feature = "log")]
        ::log::debug!($($arg)*);
    };
}

/// Emit an **info**-level log message.
#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::info!($($arg)*);
        #[cfg(feature = "log")]
        ::log::info!($($arg)*);
    };
}

/// Emit a **warn**-level log message.
#[macro_export]
macro_rules! warn_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::warn!($($arg)*);
        #[cfg(feature = "log")]
        ::log::warn!($($arg)*);
    };
}

/// Emit an **error**-level log message.
#[macro_export]
macro_rules! error_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::error!($($arg)*);
        #[cfg(feature = "log")]
        ::log::error!($($arg)*);
    };
}
