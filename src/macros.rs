//! Logging macros for the process-wide logger.
//!
//! Each macro takes a facility, a printf-style template and any number of
//! arguments convertible into [`Param`](crate::Param):
//!
//! ```
//! use rust_clog::{info, warning};
//!
//! // Silently ignored until `rust_clog::api::init` has been called
//! info!("Server", "listening on port %d", 8080);
//! warning!("Disk", "only %.1f%% free on %s", 3.5, "/var");
//! info!("Server", "no arguments");
//! ```

/// Log at an explicit level.
///
/// ```
/// use rust_clog::{log, Level};
/// log!(Level::Fail, "Job", "step %d of %d failed", 3, 5);
/// ```
#[macro_export]
macro_rules! log {
    ($level:expr, $iface:expr, $template:expr $(, $arg:expr)*) => {
        $crate::api::log(
            $level,
            $iface,
            $template,
            vec![$($crate::Param::from($arg)),*],
        )
    };
}

#[macro_export]
macro_rules! debug {
    ($iface:expr, $template:expr $(, $arg:expr)*) => {
        $crate::api::debug($iface, $template, vec![$($crate::Param::from($arg)),*])
    };
}

#[macro_export]
macro_rules! info {
    ($iface:expr, $template:expr $(, $arg:expr)*) => {
        $crate::api::info($iface, $template, vec![$($crate::Param::from($arg)),*])
    };
}

#[macro_export]
macro_rules! success {
    ($iface:expr, $template:expr $(, $arg:expr)*) => {
        $crate::api::success($iface, $template, vec![$($crate::Param::from($arg)),*])
    };
}

#[macro_export]
macro_rules! warning {
    ($iface:expr, $template:expr $(, $arg:expr)*) => {
        $crate::api::warning($iface, $template, vec![$($crate::Param::from($arg)),*])
    };
}

#[macro_export]
macro_rules! fail {
    ($iface:expr, $template:expr $(, $arg:expr)*) => {
        $crate::api::fail($iface, $template, vec![$($crate::Param::from($arg)),*])
    };
}

/// Log an error-level message.
///
/// ```
/// use rust_clog::error;
/// let code = 500;
/// error!("Http", "request failed with status %d", code);
/// ```
#[macro_export]
macro_rules! error {
    ($iface:expr, $template:expr $(, $arg:expr)*) => {
        $crate::api::error($iface, $template, vec![$($crate::Param::from($arg)),*])
    };
}

#[macro_export]
macro_rules! catastrophe {
    ($iface:expr, $template:expr $(, $arg:expr)*) => {
        $crate::api::catastrophe($iface, $template, vec![$($crate::Param::from($arg)),*])
    };
}
