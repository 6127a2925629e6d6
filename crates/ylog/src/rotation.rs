//! Log files which are rotated once they grow past a size limit, with old rotated files pruned
//! by count or age.

use std::{
    fmt,
    fs::{self, OpenOptions},
    io::{self, Write},
    num::NonZeroUsize,
    path::{Path, PathBuf},
    time::Duration,
};

use chrono::TimeDelta;
use file_rotate::{
    ContentLimit, FileRotate,
    compression::Compression,
    suffix::{AppendTimestamp, FileLimit},
};

use super::FileConfig;

const MEGABYTE: u64 = 1024 * 1024;
const DEFAULT_MAX_SIZE_MEGABYTES: u64 = 100;
const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// When a [`RollingFile`] is rotated, and which rotated files are kept.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RotationPolicy {
    /// Maximum size of the active file in bytes. Once a write takes the file past this size,
    /// the next write goes to a fresh file.
    pub max_size: u64,

    /// Maximum number of rotated files to keep. If `None`, rotated files are limited by
    /// [`RotationPolicy::max_age`] instead.
    pub max_backups: Option<NonZeroUsize>,

    /// Maximum age of rotated files, based on the timestamp in their names. Only applies if
    /// [`RotationPolicy::max_backups`] is `None`; if both are `None`, every rotated file is
    /// kept.
    pub max_age: Option<Duration>,
}

impl RotationPolicy {
    /// Derives the rotation policy from a [`FileConfig`], where sizes are in megabytes, ages in
    /// days, and zero means "use the default" (100 megabytes) or "unlimited".
    pub fn from_config(config: &FileConfig) -> Self {
        let max_size_megabytes = match config.max_size {
            0 => DEFAULT_MAX_SIZE_MEGABYTES,
            max_size => max_size,
        };

        Self {
            max_size: max_size_megabytes.saturating_mul(MEGABYTE),
            max_backups: NonZeroUsize::new(config.max_backups),
            max_age: (config.max_age > 0)
                .then(|| Duration::from_secs(config.max_age.saturating_mul(SECONDS_PER_DAY))),
        }
    }

    fn content_limit(&self) -> ContentLimit {
        let max_size = usize::try_from(self.max_size).unwrap_or(usize::MAX);
        ContentLimit::BytesSurpassed(max_size.max(1))
    }

    fn file_limit(&self) -> FileLimit {
        match (self.max_backups, self.max_age) {
            (Some(max_backups), _) => FileLimit::MaxFiles(max_backups.get()),
            (None, Some(max_age)) => {
                FileLimit::Age(TimeDelta::from_std(max_age).unwrap_or(TimeDelta::MAX))
            }
            (None, None) => FileLimit::Unlimited,
        }
    }
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self::from_config(&FileConfig::default())
    }
}

/// An append-only log file which is rotated according to a [`RotationPolicy`].
///
/// Rotating renames the active file to `<name>.<local timestamp>` in the same directory (for
/// example `info.log.20240501T101530`, with a `.1`, `.2`, … suffix if several rotations happen
/// within a second) and reopens an empty file under the original name. Each write is kept whole
/// within a single file.
pub struct RollingFile {
    path: PathBuf,
    inner: FileRotate<AppendTimestamp>,
}

impl RollingFile {
    /// Opens the log file for appending, creating it and its parent directories if necessary.
    ///
    /// # Errors
    ///
    /// Returns an error if the directories or the file cannot be created or opened.
    pub fn open(path: impl Into<PathBuf>, policy: RotationPolicy) -> io::Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        // `FileRotate` only reports an unwritable file on the first write
        OpenOptions::new().create(true).append(true).open(&path)?;

        let inner = FileRotate::new(
            &path,
            AppendTimestamp::default(policy.file_limit()),
            policy.content_limit(),
            Compression::None,
            #[cfg(unix)]
            None,
        );

        Ok(Self { path, inner })
    }

    /// The path of the active log file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Write for RollingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl fmt::Debug for RollingFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RollingFile")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}
