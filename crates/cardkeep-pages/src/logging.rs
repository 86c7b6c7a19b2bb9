//! Logging macros for cardkeep-pages
//!
//! Thin wrappers over `tracing` with the `cardkeep_pages` target, so a
//! subscriber can filter the template engine separately from the host.
//!
//! | Macro | Level | Condition |
//! |-------|-------|-----------|
//! | `debug_log!` | `DEBUG` | `debug-hooks` feature + `debug_assertions` |
//! | `info_log!` | `INFO` | always |
//! | `warn_log!` | `WARN` | always |
//! | `error_log!` | `ERROR` | always |
//!
//! ## Example
//!
//! ```ignore
//! use cardkeep_pages::{debug_log, error_log, info_log, warn_log};
//!
//! debug_log!("Resolved {} paths", paths.len());
//! info_log!("Mounted screen {}", name);
//! warn_log!("Transition {:?} is not armed", name);
//! error_log!("Live binding failed: {}", error);
//! ```

/// Logs a debug message (requires `debug-hooks` feature + `debug_assertions`)
///
/// Compiles to a no-op when the conditions are not met.
#[macro_export]
#[cfg(all(debug_assertions, feature = "debug-hooks"))]
macro_rules! debug_log {
	($($arg:tt)*) => {{
		$crate::__private::tracing::debug!(target: "cardkeep_pages", $($arg)*);
	}};
}

/// No-op debug_log when conditions are not met
#[macro_export]
#[cfg(not(all(debug_assertions, feature = "debug-hooks")))]
macro_rules! debug_log {
	($($arg:tt)*) => {{}};
}

/// Logs an info message
#[macro_export]
macro_rules! info_log {
	($($arg:tt)*) => {{
		$crate::__private::tracing::info!(target: "cardkeep_pages", $($arg)*);
	}};
}

/// Logs a warning message
#[macro_export]
macro_rules! warn_log {
	($($arg:tt)*) => {{
		$crate::__private::tracing::warn!(target: "cardkeep_pages", $($arg)*);
	}};
}

/// Logs an error message
#[macro_export]
macro_rules! error_log {
	($($arg:tt)*) => {{
		$crate::__private::tracing::error!(target: "cardkeep_pages", $($arg)*);
	}};
}

#[cfg(test)]
mod tests {
	use crate::{debug_log, error_log, info_log, warn_log};
	use rstest::rstest;

	#[rstest]
	fn test_logging_macros_compile() {
		debug_log!("Debug message: {}", 42);
		info_log!("Info message: {}", "test");
		warn_log!("Warning message: {:?}", vec![1, 2, 3]);
		error_log!("Error message: {}", "error");
	}

	#[rstest]
	fn test_logging_macros_no_args() {
		debug_log!("Simple debug");
		info_log!("Simple info");
		warn_log!("Simple warning");
		error_log!("Simple error");
	}
}
