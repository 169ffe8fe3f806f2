use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Maximum log file size before rotation (5 MB)
const MAX_LOG_SIZE: u64 = 5 * 1024 * 1024;
/// Size to keep after rotation (1 MB of most recent logs)
const KEEP_SIZE: u64 = 1024 * 1024;

pub const LOG_FILE_NAME: &str = "runway.log";

const ROTATION_MARKER: &[u8] = b"--- runway.log truncated ---\n";

/// Drop a leading partial line from a tail read at an arbitrary offset.
fn whole_lines(tail: &[u8]) -> &[u8] {
    match tail.iter().position(|&b| b == b'\n') {
        Some(newline) => &tail[newline + 1..],
        None => tail,
    }
}

/// Cut the log back to its most recent `keep` bytes once it grows past
/// `max_size`. A missing file is left missing.
fn truncate_log(log_path: &Path, max_size: u64, keep: u64) -> io::Result<()> {
    let len = match fs::metadata(log_path) {
        Ok(meta) => meta.len(),
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e),
    };
    if len <= max_size {
        return Ok(());
    }

    let mut tail = Vec::with_capacity(keep as usize);
    let mut file = File::open(log_path)?;
    file.seek(SeekFrom::End(-(keep.min(len) as i64)))?;
    file.read_to_end(&mut tail)?;

    let mut file = File::create(log_path)?;
    file.write_all(ROTATION_MARKER)?;
    file.write_all(whole_lines(&tail))
}

/// Shared handle to the open log file
#[derive(Clone)]
struct LogWriterFactory {
    file: Arc<Mutex<File>>,
}

struct LogWriter {
    file: Arc<Mutex<File>>,
}

impl LogWriter {
    fn locked(&self) -> io::Result<std::sync::MutexGuard<'_, File>> {
        self.file
            .lock()
            .map_err(|_| io::Error::other("log file lock poisoned"))
    }
}

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.locked()?.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.locked()?.flush()
    }
}

impl<'a> MakeWriter<'a> for LogWriterFactory {
    type Writer = LogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogWriter {
            file: self.file.clone(),
        }
    }
}

fn env_filter(level: &str) -> EnvFilter {
    let default_filter = format!("runway={level},runway_core=warn");
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter))
}

/// Initialize logging.
///
/// With `data_dir` set, events go to `{data_dir}/runway.log` with size-based
/// rotation: past 5MB the file is cut back to its last 1MB. Otherwise they go
/// to stderr so they never mix with report output on stdout.
/// `RUST_LOG` takes precedence over `level`.
pub fn init_logging(data_dir: Option<&Path>, level: &str) -> color_eyre::Result<()> {
    let Some(data_dir) = data_dir else {
        tracing_subscriber::registry()
            .with(env_filter(level))
            .with(fmt::layer().with_writer(io::stderr).with_target(false))
            .init();
        return Ok(());
    };

    fs::create_dir_all(data_dir)?;
    let log_path = data_dir.join(LOG_FILE_NAME);

    if let Err(e) = truncate_log(&log_path, MAX_LOG_SIZE, KEEP_SIZE) {
        eprintln!("Warning: Failed to rotate log file: {e}");
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;
    let writer_factory = LogWriterFactory {
        file: Arc::new(Mutex::new(file)),
    };

    tracing_subscriber::registry()
        .with(env_filter(level))
        .with(
            fmt::layer()
                .with_writer(writer_factory)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(false),
        )
        .init();

    tracing::info!(log_path = %log_path.display(), "runway logging initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_whole_lines_drops_partial_head() {
        assert_eq!(whole_lines(b"ond line\nthird\n"), b"third\n");
        assert_eq!(whole_lines(b"no newline"), b"no newline");
        assert_eq!(whole_lines(b""), b"");
    }

    #[test]
    fn test_small_log_is_left_alone() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(LOG_FILE_NAME);
        fs::write(&path, "one\ntwo\n").unwrap();

        truncate_log(&path, 1024, 4).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "one\ntwo\n");
    }

    #[test]
    fn test_oversized_log_keeps_recent_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(LOG_FILE_NAME);
        fs::write(&path, "first line\nsecond line\nthird\n").unwrap();

        // The last 10 bytes start inside "second line"
        truncate_log(&path, 16, 10).unwrap();
        let content = fs::read(&path).unwrap();
        assert!(content.starts_with(ROTATION_MARKER));
        assert_eq!(&content[ROTATION_MARKER.len()..], b"third\n");
    }

    #[test]
    fn test_missing_log_is_not_an_error() {
        let dir = tempdir().unwrap();
        assert!(truncate_log(&dir.path().join("absent.log"), 1, 1).is_ok());
        assert!(!dir.path().join("absent.log").exists());
    }
}
