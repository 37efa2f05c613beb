use crate::config::ConfigError;
use chrono::Timelike;
use std::str::FromStr;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::fmt::{format::Writer, time::FormatTime};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub struct SystemTime;

impl FormatTime for SystemTime {
    fn format_time(&self, w: &mut Writer<'_>) -> core::fmt::Result {
        let time = chrono::prelude::Local::now();
        write!(
            w,
            "{:02}:{:02}:{:02}.{:03}",
            time.hour() % 24,
            time.minute(),
            time.second(),
            time.timestamp_subsec_millis()
        )
    }
}

fn default_level(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "clashlint=warn",
        1 => "clashlint=info",
        2 => "clashlint=debug",
        _ => "clashlint=trace",
    }
}

/// Install the global subscriber. Logs go to stderr so stdout stays clean for
/// reports and repaired configurations. `RUST_LOG` overrides the verbosity.
pub fn init_tracing(verbosity: u8, json: bool) -> Result<(), ConfigError> {
    let filter = EnvFilter::builder()
        .with_default_directive(
            Directive::from_str(default_level(verbosity))
                .map_err(|_| ConfigError::Internal("Tracing filter"))?,
        )
        .from_env_lossy();
    let registry = tracing_subscriber::registry().with(filter);
    let result = if json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_timer(SystemTime),
            )
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .compact()
                    .with_writer(std::io::stderr)
                    .with_timer(SystemTime),
            )
            .try_init()
    };
    result.map_err(|_| ConfigError::Internal("Tracing subscriber already set"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_level() {
        for v in 0..5 {
            assert!(Directive::from_str(default_level(v)).is_ok());
        }
        assert_eq!(default_level(0), "clashlint=warn");
        assert_eq!(default_level(9), "clashlint=trace");
    }
}
