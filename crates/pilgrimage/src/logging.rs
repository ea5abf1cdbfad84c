//! Logging configuration for pilgrimage.
//!
//! Every store mutation emits a `tracing` event under its module target:
//!
//! - `pilgrimage::session`: sign-in, sign-out, profile edits, SOS records
//! - `pilgrimage::notification`: enqueue, dismissal, timer scheduling
//! - `pilgrimage::localization`: language switches and unknown codes
//! - `pilgrimage::sos`: escalation transitions and rejected attempts
//!
//! `RUST_LOG=pilgrimage::sos=debug` narrows output to one store.

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Target of the SOS state machine. Its warnings survive `--quiet`.
pub const SOS_TARGET: &str = "pilgrimage::sos";

/// Verbosity level for logging output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Only errors, plus rejected SOS attempts.
    Quiet,
    /// Sign-in, sign-out and SOS activation.
    #[default]
    Normal,
    /// Every store mutation.
    Verbose,
    /// Timer bookkeeping as well.
    Trace,
}

impl Verbosity {
    /// Convert verbosity to tracing level filter.
    #[must_use]
    pub fn to_level_filter(&self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Normal => Level::INFO,
            Self::Verbose => Level::DEBUG,
            Self::Trace => Level::TRACE,
        }
    }

    /// Filter directives used when `RUST_LOG` is unset.
    #[must_use]
    pub fn default_filter(&self) -> String {
        let level = self.to_level_filter();
        match self {
            Self::Quiet => format!("pilgrimage={level},{SOS_TARGET}={}", Level::WARN),
            _ => format!("pilgrimage={level}"),
        }
    }
}

/// Initialize the logging system.
///
/// The filter comes from `verbosity` unless `RUST_LOG` is set, which takes
/// precedence. Calling this more than once is harmless.
///
/// # Examples
///
/// ```no_run
/// use pilgrimage::{init_logging, logging::Verbosity};
///
/// init_logging(Verbosity::Verbose);
/// ```
pub fn init_logging(verbosity: Verbosity) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.default_filter()));

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        fmt::layer()
            .with_target(true)
            .without_time()
            .with_writer(std::io::stderr),
    );

    // A subscriber may already be installed
    let _ = subscriber.try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_to_level() {
        assert_eq!(Verbosity::Quiet.to_level_filter(), Level::ERROR);
        assert_eq!(Verbosity::Normal.to_level_filter(), Level::INFO);
        assert_eq!(Verbosity::Verbose.to_level_filter(), Level::DEBUG);
        assert_eq!(Verbosity::Trace.to_level_filter(), Level::TRACE);
    }

    #[test]
    fn test_quiet_keeps_sos_warnings() {
        assert_eq!(
            Verbosity::Quiet.default_filter(),
            "pilgrimage=ERROR,pilgrimage::sos=WARN"
        );
        assert_eq!(Verbosity::Verbose.default_filter(), "pilgrimage=DEBUG");
    }

    #[test]
    fn test_default_filters_parse() {
        for verbosity in [
            Verbosity::Quiet,
            Verbosity::Normal,
            Verbosity::Verbose,
            Verbosity::Trace,
        ] {
            assert!(EnvFilter::try_new(verbosity.default_filter()).is_ok());
        }
    }

    #[test]
    fn test_sos_target_matches_module_path() {
        assert_eq!(SOS_TARGET, format!("{}::sos", env!("CARGO_PKG_NAME")));
    }

    #[test]
    fn test_init_logging_twice() {
        init_logging(Verbosity::Normal);
        init_logging(Verbosity::Trace);
    }
}
