//! Logging setup shared by the `quad_targets` crates and the CLI.
//!
//! Two backends are available:
//! - [`init_with_level`] installs a small `log` backend that writes
//!   `[  0.012s DEBUG quad_targets_detector] message` lines to stderr;
//! - with feature `tracing`, [`init_tracing`] installs a `tracing-subscriber`
//!   that also reports the detector's stage spans, as text or JSON.
//!
//! Both take the same level; messages from crates outside the `quad_targets`
//! family are capped at `warn` so a `--log-level trace` run stays readable.

use std::io::Write;
use std::str::FromStr;
use std::sync::OnceLock;
use std::time::Instant;

use log::{LevelFilter, Log, Metadata, Record};

#[cfg(feature = "tracing")]
use tracing_subscriber::fmt::format::FmtSpan;
#[cfg(feature = "tracing")]
use tracing_subscriber::util::SubscriberInitExt;
#[cfg(feature = "tracing")]
use tracing_subscriber::{fmt, EnvFilter};

/// Crate prefix of the detector family; everything else is capped at `warn`.
const OWN_PREFIX: &str = "quad_targets";

fn own_crate(target: &str) -> bool {
    target.starts_with(OWN_PREFIX)
}

struct QuadTargetsLogger {
    level: LevelFilter,
    started: Instant,
}

impl QuadTargetsLogger {
    fn threshold(&self, target: &str) -> LevelFilter {
        if own_crate(target) {
            self.level
        } else {
            self.level.min(LevelFilter::Warn)
        }
    }
}

impl Log for QuadTargetsLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.threshold(metadata.target())
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let elapsed = self.started.elapsed().as_secs_f64();
        let krate = record.target().split("::").next().unwrap_or("");
        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(
            stderr,
            "[{:7.3}s {:>5} {}] {}",
            elapsed,
            record.level(),
            krate,
            record.args()
        );
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static LOGGER: OnceLock<QuadTargetsLogger> = OnceLock::new();

/// Install the stderr logger for detector and pose messages at `level`.
///
/// Only the first call installs anything; later calls return `Ok(())`.
pub fn init_with_level(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    if LOGGER.get().is_none() {
        let logger = LOGGER.get_or_init(|| QuadTargetsLogger {
            level,
            started: Instant::now(),
        });
        log::set_logger(logger)?;
        log::set_max_level(level);
    }
    Ok(())
}

/// Parse a `--log-level` value: `off|error|warn|info|debug|trace`,
/// case-insensitive.
pub fn parse_level(s: &str) -> Option<LevelFilter> {
    LevelFilter::from_str(s.trim()).ok()
}

/// `EnvFilter` directives for `level`: the `quad_targets` crates at `level`,
/// everything else at most at `warn`.
#[cfg(feature = "tracing")]
fn default_directives(level: LevelFilter) -> String {
    let own = level.as_str().to_ascii_lowercase();
    let rest = level.min(LevelFilter::Warn).as_str().to_ascii_lowercase();
    [
        rest.clone(),
        format!("quad_targets={own}"),
        format!("quad_targets_core={own}"),
        format!("quad_targets_vision={own}"),
        format!("quad_targets_detector={own}"),
        format!("quad_targets_pose={own}"),
    ]
    .join(",")
}

/// Install a `tracing` subscriber on stderr that records detector stage
/// spans when they close. `RUST_LOG` wins over `level` when set.
#[cfg(feature = "tracing")]
pub fn init_tracing(json: bool, level: LevelFilter) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(level)));
    if json {
        let _ = fmt()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::CLOSE)
            .with_writer(std::io::stderr)
            .json()
            .flatten_event(true)
            .finish()
            .try_init();
    } else {
        let _ = fmt()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::CLOSE)
            .with_writer(std::io::stderr)
            .with_timer(fmt::time::Uptime::default())
            .finish()
            .try_init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_levels() {
        assert_eq!(parse_level("debug"), Some(LevelFilter::Debug));
        assert_eq!(parse_level(" WARN "), Some(LevelFilter::Warn));
        assert_eq!(parse_level("loud"), None);
    }

    #[test]
    fn foreign_crates_are_capped_at_warn() {
        let logger = QuadTargetsLogger {
            level: LevelFilter::Trace,
            started: Instant::now(),
        };
        assert_eq!(
            logger.threshold("quad_targets_detector::pipeline"),
            LevelFilter::Trace
        );
        assert_eq!(logger.threshold("imageproc::edges"), LevelFilter::Warn);

        let quiet = QuadTargetsLogger {
            level: LevelFilter::Error,
            started: Instant::now(),
        };
        assert_eq!(quiet.threshold("imageproc"), LevelFilter::Error);
    }

    #[cfg(feature = "tracing")]
    #[test]
    fn tracing_directives_follow_the_level() {
        let d = default_directives(LevelFilter::Debug);
        assert!(d.starts_with("warn,"));
        assert!(d.contains("quad_targets_detector=debug"));
        assert!(EnvFilter::try_new(&d).is_ok());
        assert!(default_directives(LevelFilter::Off).starts_with("off,"));
    }
}
