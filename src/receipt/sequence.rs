//! Persisted receipt numbering.
//!
//! The counter file holds the last issued number as plain decimal text. A
//! missing or unreadable file counts as zero, so the first receipt is `0001`.

use parking_lot::Mutex;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

const SEQUENCE_WIDTH: usize = 4;

/// Storage for the last issued sequence number.
pub trait SequenceStore: Send + Sync {
    /// Last issued value. Absent or corrupt state reads as zero.
    fn read(&self) -> u64;
    fn write(&self, value: u64) -> io::Result<()>;
}

/// Counter file on disk, replaced atomically on every write.
#[derive(Debug, Clone)]
pub struct FileSequenceStore {
    path: PathBuf,
}

impl FileSequenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SequenceStore for FileSequenceStore {
    fn read(&self) -> u64 {
        match fs::read_to_string(&self.path) {
            Ok(content) => content.trim().parse().unwrap_or_else(|_| {
                log::warn!(
                    "Counter file {} is corrupt, restarting from zero",
                    self.path.display()
                );
                0
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => 0,
            Err(e) => {
                log::warn!(
                    "Counter file {} is unreadable ({}), restarting from zero",
                    self.path.display(),
                    e
                );
                0
            }
        }
    }

    fn write(&self, value: u64) -> io::Result<()> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(value.to_string().as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

/// In-memory store, mainly for tests.
#[derive(Debug, Default)]
pub struct MemorySequenceStore {
    value: Mutex<u64>,
    fail_writes: bool,
}

impl MemorySequenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(value: u64) -> Self {
        Self {
            value: Mutex::new(value),
            fail_writes: false,
        }
    }

    /// A store whose writes always fail, leaving the stored value untouched.
    pub fn read_only(value: u64) -> Self {
        Self {
            value: Mutex::new(value),
            fail_writes: true,
        }
    }
}

impl SequenceStore for MemorySequenceStore {
    fn read(&self) -> u64 {
        *self.value.lock()
    }

    fn write(&self, value: u64) -> io::Result<()> {
        if self.fail_writes {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "store is read-only",
            ));
        }
        *self.value.lock() = value;
        Ok(())
    }
}

/// Issues zero-padded, monotonically increasing receipt numbers.
///
/// Read-increment-write runs under a lock, so callers sharing one counter
/// never receive the same number. Separate processes writing the same file
/// are not coordinated.
pub struct SequenceCounter<S: SequenceStore> {
    store: S,
    lock: Mutex<()>,
}

impl<S: SequenceStore> SequenceCounter<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consume and return the next number.
    ///
    /// A failed write is logged and the number is still returned; the next
    /// call will then hand out the same value again.
    pub fn next(&self) -> String {
        let _guard = self.lock.lock();
        let next = self.store.read().saturating_add(1);
        if let Err(e) = self.store.write(next) {
            log::error!("Failed to persist receipt counter value {}: {}", next, e);
        }
        format_sequence(next)
    }
}

impl SequenceCounter<FileSequenceStore> {
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self::new(FileSequenceStore::new(path))
    }
}

/// Zero-pad a sequence number to at least four digits.
pub fn format_sequence(value: u64) -> String {
    format!("{:0width$}", value, width = SEQUENCE_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_starts_at_one_without_counter_file() {
        let dir = tempfile::tempdir().unwrap();
        let counter = SequenceCounter::from_file(dir.path().join("invoice_counter.txt"));

        assert_eq!(counter.next(), "0001");
        assert_eq!(counter.next(), "0002");
        assert_eq!(
            fs::read_to_string(dir.path().join("invoice_counter.txt")).unwrap(),
            "2"
        );
    }

    #[test]
    fn test_corrupt_counter_file_counts_as_zero() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("invoice_counter.txt");
        fs::write(&path, "not a number").unwrap();

        let counter = SequenceCounter::from_file(&path);
        assert_eq!(counter.next(), "0001");
    }

    #[test]
    fn test_existing_counter_is_continued() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("invoice_counter.txt");
        fs::write(&path, "41\n").unwrap();

        let counter = SequenceCounter::from_file(&path);
        assert_eq!(counter.next(), "0042");
    }

    #[test]
    fn test_width_grows_past_four_digits() {
        let counter = SequenceCounter::new(MemorySequenceStore::starting_at(9999));
        assert_eq!(counter.next(), "10000");
    }

    #[test]
    fn test_failed_write_repeats_number() {
        let counter = SequenceCounter::new(MemorySequenceStore::read_only(6));
        assert_eq!(counter.next(), "0007");
        assert_eq!(counter.next(), "0007");
    }

    #[test]
    fn test_concurrent_callers_get_distinct_numbers() {
        let dir = tempfile::tempdir().unwrap();
        let counter = Arc::new(SequenceCounter::from_file(
            dir.path().join("invoice_counter.txt"),
        ));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let counter = Arc::clone(&counter);
                thread::spawn(move || (0..10).map(|_| counter.next()).collect::<Vec<_>>())
            })
            .collect();

        let mut all: Vec<String> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        all.sort();
        all.dedup();
        assert_eq!(all.len(), 80);
        assert_eq!(counter.store().read(), 80);
    }
}
