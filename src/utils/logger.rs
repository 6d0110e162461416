use tracing_subscriber::{
    layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

/// How log events are rendered on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One short line per event, for a terminal.
    Compact,
    /// One JSON object per event, for a log collector.
    Json,
}

impl LogFormat {
    pub fn from_flag(json: bool) -> Self {
        if json {
            Self::Json
        } else {
            Self::Compact
        }
    }
}

fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        "place_picker=debug,info"
    } else {
        "place_picker=info"
    }
}

/// Installs the global subscriber. `RUST_LOG` overrides the default directives.
pub fn init_logger(format: LogFormat, verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));

    let output = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);
    let output: Box<dyn Layer<Registry> + Send + Sync> = match format {
        LogFormat::Compact => output.compact().boxed(),
        LogFormat::Json => output.json().boxed(),
    };

    tracing_subscriber::registry().with(output).with(filter).init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_raises_crate_level_to_debug() {
        assert_eq!(default_directives(true), "place_picker=debug,info");
        assert_eq!(default_directives(false), "place_picker=info");
    }

    #[test]
    fn json_flag_selects_format() {
        assert_eq!(LogFormat::from_flag(true), LogFormat::Json);
        assert_eq!(LogFormat::from_flag(false), LogFormat::Compact);
    }
}
