//! Per-level file sink
//!
//! Each distinct filename in the routing table gets exactly one append-only
//! handle; levels that share a filename share the handle. Lines look like
//! `[LEVEL] iface: message`.

use crate::core::{FileConfig, Level, LoggerError, Result, Sink};
use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{LineWriter, Write};
use std::path::{Path, PathBuf};

struct RoutedFile {
    path: PathBuf,
    writer: LineWriter<File>,
}

pub struct FileSink {
    files: Vec<RoutedFile>,
    /// Index into `files`, by `Level::index()`
    routes: [Option<usize>; Level::COUNT],
}

impl FileSink {
    /// Build the sink described by `config`.
    ///
    /// Returns `Ok(None)` when no base directory is configured.
    pub fn open(config: &FileConfig) -> Result<Option<Self>> {
        match config.base_dir.as_deref() {
            Some(dir) if config.is_enabled() => {
                let routes = config
                    .per_level
                    .iter()
                    .map(|(level, name)| (*level, name.as_str()));
                Self::new(dir, routes).map(Some)
            }
            _ => Ok(None),
        }
    }

    /// Create `base_dir` and open one file per distinct non-empty filename.
    ///
    /// On failure every handle opened so far is closed before the error is
    /// returned.
    pub fn new<'a>(
        base_dir: &Path,
        routes: impl IntoIterator<Item = (Level, &'a str)>,
    ) -> Result<Self> {
        fs::create_dir_all(base_dir).map_err(|e| {
            LoggerError::io_operation(
                "creating log directory",
                base_dir.display().to_string(),
                e,
            )
        })?;

        let mut files: Vec<RoutedFile> = Vec::new();
        let mut by_name: HashMap<&str, usize> = HashMap::new();
        let mut level_routes = [None; Level::COUNT];

        for (level, filename) in routes {
            if filename.is_empty() {
                continue;
            }
            let idx = match by_name.get(filename) {
                Some(idx) => *idx,
                None => {
                    let path = base_dir.join(filename);
                    let file = OpenOptions::new()
                        .create(true)
                        .append(true)
                        .open(&path)
                        .map_err(|e| {
                            LoggerError::io_operation(
                                "opening log file",
                                path.display().to_string(),
                                e,
                            )
                        })?;
                    files.push(RoutedFile {
                        path,
                        writer: LineWriter::new(file),
                    });
                    by_name.insert(filename, files.len() - 1);
                    files.len() - 1
                }
            };
            level_routes[level.index()] = Some(idx);
        }

        Ok(Self {
            files,
            routes: level_routes,
        })
    }

    /// Paths of the open files, in opening order
    pub fn paths(&self) -> Vec<&Path> {
        self.files.iter().map(|f| f.path.as_path()).collect()
    }

    pub fn is_routed(&self, level: Level) -> bool {
        self.routes[level.index()].is_some()
    }

    pub fn is_closed(&self) -> bool {
        self.files.is_empty() && self.routes.iter().all(Option::is_none)
    }
}

impl Sink for FileSink {
    fn write(&mut self, level: Level, iface: &str, text: &str) -> Result<()> {
        let Some(idx) = self.routes[level.index()] else {
            return Ok(());
        };
        let routed = &mut self.files[idx];
        let line = format!("[{}] {}: {}\n", level, iface, text);
        routed.writer.write_all(line.as_bytes()).map_err(|e| {
            LoggerError::io_operation("writing log file", routed.path.display().to_string(), e)
        })
    }

    /// Flush and sync every handle; the first failure is returned after all
    /// handles have been tried.
    fn flush(&mut self) -> Result<()> {
        let mut first_err = None;
        for routed in &mut self.files {
            let synced = routed
                .writer
                .flush()
                .and_then(|()| routed.writer.get_ref().sync_all());
            if let Err(e) = synced {
                first_err.get_or_insert_with(|| {
                    LoggerError::io_operation(
                        "syncing log file",
                        routed.path.display().to_string(),
                        e,
                    )
                });
            }
        }
        first_err.map_or(Ok(()), Err)
    }

    fn close(&mut self) -> Result<()> {
        let result = self.flush();
        self.routes = [None; Level::COUNT];
        self.files.clear();
        result
    }

    fn name(&self) -> &str {
        "file"
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        let _ = self.close();
    }
}
