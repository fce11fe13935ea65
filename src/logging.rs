//! Tracing subscriber setup.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use ariasnap_config::{ConfigLoader, LoggingConfig};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

const LOG_FILE_PREFIX: &str = "ariasnap";
const MAX_LOG_FILES: usize = 30;

static GUARD: OnceLock<WorkerGuard> = OnceLock::new();

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Install the global subscriber described by `config`.
///
/// `RUST_LOG` overrides `config.level`. With `config.dir` set, logs also go
/// to daily rolling files in that directory.
pub fn init(config: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let filter = env_filter(&config.level);
    let mut layers: Vec<BoxedLayer> = vec![console_layer(config.json)];
    if let Some(dir) = &config.dir {
        layers.push(file_layer(&log_dir(dir), config.json)?);
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()?;
    Ok(())
}

fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

fn log_dir(dir: &str) -> PathBuf {
    PathBuf::from(ConfigLoader::expand_path(dir))
}

fn console_layer(json: bool) -> BoxedLayer {
    if json {
        fmt::layer().json().with_target(true).boxed()
    } else {
        fmt::layer().with_target(true).with_ansi(true).boxed()
    }
}

fn file_appender(dir: &Path) -> Result<RollingFileAppender, Box<dyn std::error::Error>> {
    std::fs::create_dir_all(dir)?;
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix("log")
        .max_log_files(MAX_LOG_FILES)
        .build(dir)?;
    Ok(appender)
}

fn file_layer(dir: &Path, json: bool) -> Result<BoxedLayer, Box<dyn std::error::Error>> {
    let (writer, guard) = tracing_appender::non_blocking(file_appender(dir)?);
    // The worker flushes until the guard drops; keep the first one for the
    // life of the process.
    let _ = GUARD.set(guard);

    let layer = if json {
        fmt::layer().json().with_writer(writer).boxed()
    } else {
        fmt::layer().with_writer(writer).with_ansi(false).boxed()
    };
    Ok(layer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_appender_creates_directory() {
        let temp = tempfile::TempDir::new().unwrap();
        let dir = temp.path().join("logs").join("nested");
        assert!(file_appender(&dir).is_ok());
        assert!(dir.is_dir());
    }

    #[test]
    fn test_log_dir_keeps_plain_paths() {
        assert_eq!(log_dir("/var/log/ariasnap"), PathBuf::from("/var/log/ariasnap"));
    }

    #[test]
    fn test_init_installs_subscriber_once() {
        let temp = tempfile::TempDir::new().unwrap();
        let config = LoggingConfig {
            level: "debug".to_string(),
            json: true,
            dir: Some(temp.path().to_string_lossy().into_owned()),
        };
        assert!(init(&config).is_ok());
        tracing::info!("logging initialized");
        assert!(init(&LoggingConfig::default()).is_err());
    }
}
