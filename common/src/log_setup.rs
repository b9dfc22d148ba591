use std::path::Path;
use std::sync::OnceLock;

use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::{MakeWriterExt, WithMaxLevel};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Installs the global subscriber.
///
/// `RUST_LOG` wins over `base_level`. Console output goes to stdout, with
/// warnings and errors mirrored to stderr. When `log_dir` is given, a daily
/// rolling file is written there as well.
pub fn setup_logging(base_level: &str, log_dir: Option<&Path>) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(base_level))
        .unwrap_or_else(|e| panic!("Invalid log filter: {}", e));

    let console_writer = std::io::stdout.and(warnings_only(std::io::stderr));

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(true)
        .with_writer(console_writer);

    let file_layer = log_dir.map(|dir| {
        std::fs::create_dir_all(dir)
            .unwrap_or_else(|e| panic!("Failed to create logs directory: {}", e));

        let file_appender = tracing_appender::rolling::Builder::new()
            .rotation(tracing_appender::rolling::Rotation::DAILY)
            .filename_prefix("defect_scan")
            .filename_suffix("log")
            .max_log_files(5)
            .build(dir)
            .unwrap_or_else(|e| panic!("Failed to create log file appender: {}", e));

        let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
        LOG_GUARD.set(guard).expect("Logging already initialized");

        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_line_number(true)
            .with_file(true)
            .with_ansi(false)
            .with_writer(file_writer)
            .boxed()
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .unwrap_or_else(|e| panic!("Logger initialization failed: {}", e));
}

/// Passes only `WARN` and `ERROR` events through to `writer`.
fn warnings_only<W>(writer: W) -> WithMaxLevel<W>
where
    W: for<'a> MakeWriter<'a>,
{
    writer.with_max_level(Level::WARN)
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    use super::*;

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl Write for Capture {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_stderr_mirror_keeps_only_warnings() {
        let capture = Capture::default();
        let make_writer = {
            let capture = capture.clone();
            move || capture.clone()
        };

        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::TRACE)
            .with_ansi(false)
            .with_writer(warnings_only(make_writer))
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            tracing::trace!("trace-line");
            tracing::debug!("debug-line");
            tracing::info!("info-line");
            tracing::warn!("warn-line");
            tracing::error!("error-line");
        });

        let output = String::from_utf8(capture.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("warn-line"), "{output}");
        assert!(output.contains("error-line"), "{output}");
        assert!(!output.contains("info-line"), "{output}");
        assert!(!output.contains("debug-line"), "{output}");
        assert!(!output.contains("trace-line"), "{output}");
    }
}
