use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Target of the events that echo each result's `debug_trace`.
pub const TRACE_TARGET: &str = "dom_extract::trace";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogOptions {
    pub verbose: bool,
    /// JSON lines instead of the compact human format.
    pub json: bool,
    /// Also emit every `debug_trace` entry at trace level.
    pub mirror_trace: bool,
}

impl LogOptions {
    /// Filter used when `RUST_LOG` is not set.
    pub fn directives(&self) -> String {
        let mut directives = vec![if self.verbose {
            "info,dom_extract=debug".to_string()
        } else {
            "dom_extract=info".to_string()
        }];
        if self.mirror_trace {
            directives.push(format!("{}=trace", TRACE_TARGET));
        }
        directives.join(",")
    }
}

pub fn init_logger(options: LogOptions) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(options.directives()));

    // stdout 留給結果輸出，日誌一律寫到 stderr
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(options.mirror_trace)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    if options.json {
        tracing_subscriber::registry().with(filter).with(layer.json()).init();
    } else {
        tracing_subscriber::registry().with(filter).with(layer.compact()).init();
    }
}

/// Echoes one document's extraction trace. A no-op unless the trace target is enabled.
pub fn mirror_debug_trace(title: &str, trace: &[String]) {
    for entry in trace {
        tracing::trace!(target: TRACE_TARGET, document = title, "{}", entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives() {
        assert_eq!(LogOptions::default().directives(), "dom_extract=info");
        let verbose = LogOptions {
            verbose: true,
            ..Default::default()
        };
        assert_eq!(verbose.directives(), "info,dom_extract=debug");
    }

    #[test]
    fn test_mirror_trace_enables_trace_target() {
        let options = LogOptions {
            mirror_trace: true,
            ..Default::default()
        };
        assert_eq!(options.directives(), "dom_extract=info,dom_extract::trace=trace");
        assert!(EnvFilter::try_new(options.directives()).is_ok());
    }
}
