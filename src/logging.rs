//! Tracing setup: console plus `info.log` and `error.log`.
//!
//! Every line reads `[timestamp] [LEVEL   ] target: message`. `info.log`
//! rolls over by size, keeping numbered backups; `error.log` only appends.

use crate::{ConfigError, LoggingSection};
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{Event, Subscriber, info};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields, MakeWriter};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// File name of the INFO+ log.
pub const INFO_LOG: &str = "info.log";
/// File name of the WARN+ log.
pub const ERROR_LOG: &str = "error.log";

const TIMESTAMP: &str = "%Y-%m-%d %H:%M:%S";

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

fn create_dir(dir: &Path) -> Result<(), ConfigError> {
    std::fs::create_dir_all(dir).map_err(|e| {
        ConfigError::new(format!("Failed to create log dir {}: {}", dir.display(), e))
    })
}

fn append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// Opens a log file for appending, creating the directory if needed.
pub fn open_log(dir: &Path, name: &str) -> Result<Arc<File>, ConfigError> {
    create_dir(dir)?;
    let path = dir.join(name);
    let file = append(&path)
        .map_err(|e| ConfigError::new(format!("Failed to open {}: {}", path.display(), e)))?;
    Ok(Arc::new(file))
}

/// Event layout shared by every destination.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineFormat;

impl<S, N> FormatEvent<S, N> for LineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let meta = event.metadata();
        let level = meta.level().to_string();
        write!(
            writer,
            "[{}] [{:<8}] {}: ",
            chrono::Local::now().format(TIMESTAMP),
            level,
            meta.target()
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

fn line_layer<S, W>(writer: W) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt::layer()
        .event_format(LineFormat)
        .with_ansi(false)
        .with_writer(writer)
}

#[derive(Debug)]
struct Live {
    file: File,
    len: u64,
}

/// Size-capped log file.
///
/// Once the next write would push the file past `max_bytes`, `name` becomes
/// `name.1`, older copies shift up to `name.<backups>` and a fresh file is
/// started. A `max_bytes` of 0 never rolls.
#[derive(Debug)]
pub struct RollingFile {
    path: PathBuf,
    max_bytes: u64,
    backups: u32,
    live: Mutex<Live>,
}

impl RollingFile {
    /// Opens (or creates) `dir/name`, creating the directory if needed.
    pub fn open(
        dir: &Path,
        name: &str,
        max_bytes: u64,
        backups: u32,
    ) -> Result<Self, ConfigError> {
        create_dir(dir)?;
        let path = dir.join(name);
        let file = append(&path)
            .map_err(|e| ConfigError::new(format!("Failed to open {}: {}", path.display(), e)))?;
        let len = file
            .metadata()
            .map_err(|e| ConfigError::new(format!("Failed to stat {}: {}", path.display(), e)))?
            .len();
        Ok(Self {
            path,
            max_bytes,
            backups,
            live: Mutex::new(Live { file, len }),
        })
    }

    fn backup(&self, index: u32) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(format!(".{}", index));
        PathBuf::from(name)
    }

    fn roll(&self, live: &mut Live) -> io::Result<()> {
        live.file.flush()?;
        if self.backups == 0 {
            live.file.set_len(0)?;
            live.len = 0;
            return Ok(());
        }
        for index in (1..self.backups).rev() {
            let from = self.backup(index);
            if from.exists() {
                let to = self.backup(index + 1);
                if to.exists() {
                    std::fs::remove_file(&to)?;
                }
                std::fs::rename(&from, &to)?;
            }
        }
        let first = self.backup(1);
        if first.exists() {
            std::fs::remove_file(&first)?;
        }
        std::fs::rename(&self.path, &first)?;
        live.file = append(&self.path)?;
        live.len = 0;
        Ok(())
    }
}

/// Writer handed out per event; holds the file lock for its lifetime.
#[derive(Debug)]
pub struct RollingWriter<'a> {
    owner: &'a RollingFile,
    live: MutexGuard<'a, Live>,
}

impl Write for RollingWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let max = self.owner.max_bytes;
        if max > 0 && self.live.len > 0 && self.live.len + buf.len() as u64 > max {
            self.owner.roll(&mut self.live)?;
        }
        let written = self.live.file.write(buf)?;
        self.live.len += written as u64;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.live.file.flush()
    }
}

impl<'a> MakeWriter<'a> for RollingFile {
    type Writer = RollingWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        RollingWriter {
            owner: self,
            live: self.live.lock().unwrap_or_else(PoisonError::into_inner),
        }
    }
}

/// Installs the global subscriber.
///
/// Stdout and `info.log` follow `RUST_LOG` (or the configured level);
/// `error.log` only takes WARN and above. Either side can be switched off.
pub fn init_tracing(logging: &LoggingSection) -> Result<(), ConfigError> {
    let stdout = logging
        .console()
        .then(|| line_layer(io::stdout).with_filter(env_filter(logging.level())));

    let (info_file, error_file) = if *logging.files() {
        let info_log = RollingFile::open(
            logging.dir(),
            INFO_LOG,
            *logging.max_bytes(),
            *logging.backups(),
        )?;
        let error_log = open_log(logging.dir(), ERROR_LOG)?;
        let info_layer = line_layer(info_log).with_filter(env_filter(logging.level()));
        let error_layer = line_layer(error_log).with_filter(LevelFilter::WARN);
        (Some(info_layer), Some(error_layer))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(stdout)
        .with(info_file)
        .with(error_file)
        .try_init()
        .map_err(|e| ConfigError::new(format!("Failed to install tracing subscriber: {}", e)))?;

    info!(
        dir = %logging.dir().display(),
        files = logging.files(),
        max_bytes = logging.max_bytes(),
        "Tracing initialized"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(path: PathBuf) -> String {
        std::fs::read_to_string(path).expect("read")
    }

    #[test]
    fn test_open_log_creates_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let nested = dir.path().join("logs");
        let file = open_log(&nested, INFO_LOG).expect("log file");
        assert!(nested.join(INFO_LOG).exists());
        assert!(file.metadata().expect("metadata").is_file());
    }

    #[test]
    fn test_open_log_appends() {
        let dir = tempfile::tempdir().expect("tempdir");
        for line in ["one\n", "two\n"] {
            let file = open_log(dir.path(), ERROR_LOG).expect("log file");
            (&*file).write_all(line.as_bytes()).expect("write");
        }
        assert_eq!(read(dir.path().join(ERROR_LOG)), "one\ntwo\n");
    }

    #[test]
    fn test_rolls_past_size_limit() {
        let dir = tempfile::tempdir().expect("tempdir");
        let log = RollingFile::open(dir.path(), INFO_LOG, 16, 2).expect("log file");
        for line in ["first line\n", "second line\n", "third line\n", "fourth line\n"] {
            log.make_writer().write_all(line.as_bytes()).expect("write");
        }

        assert_eq!(read(dir.path().join(INFO_LOG)), "fourth line\n");
        assert_eq!(read(dir.path().join("info.log.1")), "third line\n");
        assert_eq!(read(dir.path().join("info.log.2")), "second line\n");
        assert!(!dir.path().join("info.log.3").exists());
    }

    #[test]
    fn test_reopened_file_counts_existing_bytes() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join(INFO_LOG), "0123456789").expect("seed file");
        let log = RollingFile::open(dir.path(), INFO_LOG, 16, 1).expect("log file");
        log.make_writer().write_all(b"abcdefgh").expect("write");

        assert_eq!(read(dir.path().join(INFO_LOG)), "abcdefgh");
        assert_eq!(read(dir.path().join("info.log.1")), "0123456789");
    }

    #[test]
    fn test_zero_limit_never_rolls() {
        let dir = tempfile::tempdir().expect("tempdir");
        let log = RollingFile::open(dir.path(), INFO_LOG, 0, 5).expect("log file");
        for _ in 0..50 {
            log.make_writer().write_all(b"0123456789").expect("write");
        }
        assert_eq!(read(dir.path().join(INFO_LOG)).len(), 500);
        assert!(!dir.path().join("info.log.1").exists());
    }

    #[test]
    fn test_lines_use_bracketed_layout() {
        let dir = tempfile::tempdir().expect("tempdir");
        let log = RollingFile::open(dir.path(), INFO_LOG, 0, 0).expect("log file");
        let subscriber = tracing_subscriber::registry().with(line_layer(log));
        tracing::subscriber::with_default(subscriber, || {
            info!(target: "arcade", player = 7, "game started");
            tracing::warn!(target: "arcade::table", "session expired");
        });

        let content = read(dir.path().join(INFO_LOG));
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with('['));
        assert!(lines[0].contains("] [INFO    ] arcade: game started player=7"));
        assert!(lines[1].contains("] [WARN    ] arcade::table: session expired"));
        // "[YYYY-MM-DD HH:MM:SS]"
        assert_eq!(lines[0].find(']'), Some(20));
    }
}
