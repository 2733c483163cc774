//! Index construction: parallel walk, suffix sort, serialization.
//!
//! `build_index` is the whole pipeline: write a placeholder paths count,
//! register the root, run the walker pool to quiescence, sort the suffix
//! array, append the files and suffixes sections, and backpatch the count.

pub mod registrar;
pub mod sorter;
pub mod walker;

use std::fs::{self, File};
use std::io::{BufWriter, Seek, Write};
use std::path::Path;
use std::sync::Arc;
use std::thread;

use crate::core::errors::{FlocateError, Result};
use crate::index::format;
use registrar::Registrar;
use sorter::sort_suffixes;
use walker::Walker;

/// Tuning knobs for the indexer.
#[derive(Debug, Clone)]
pub struct IndexerConfig {
    /// Worker pool size for both the walker and the sorter.
    pub parallelism: usize,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            parallelism: default_parallelism(),
        }
    }
}

/// Pool size used when none is configured: `max(2, hardware threads)`.
pub fn default_parallelism() -> usize {
    thread::available_parallelism()
        .map_or(2, std::num::NonZeroUsize::get)
        .max(2)
}

/// Build an index of `root` into an already-open output stream.
///
/// `out_path` is used for error reporting only. The stream must be seekable
/// so the paths count written first can be patched once traversal finishes.
/// Returns the stream after the final flush.
pub fn build_index<W>(root: &Path, out: W, out_path: &Path, config: &IndexerConfig) -> Result<W>
where
    W: Write + Seek + Send + 'static,
{
    let root = fs::canonicalize(root).map_err(|_| FlocateError::InvalidRoot {
        path: root.to_path_buf(),
    })?;
    if !root.is_dir() {
        return Err(FlocateError::InvalidRoot { path: root });
    }

    let mut out = out;
    format::write_count(&mut out, 0).map_err(|e| FlocateError::io(out_path, e))?;

    // The root is indexed like any other entry; the walker only registers
    // what it finds *inside* directories.
    let registrar = Arc::new(Registrar::new(out, out_path.to_path_buf()));
    registrar.register(&root)?;

    Walker::new(config.parallelism).run(root, &registrar);

    let registrar = Arc::into_inner(registrar).ok_or_else(|| FlocateError::Runtime {
        details: "registrar still shared after walker pool joined".to_string(),
    })?;
    let (mut out, paths_count, files, suffixes) = registrar.into_parts();

    let files = Arc::new(files);
    let suffixes = sort_suffixes(suffixes, &files, config.parallelism);

    format::write_tail(&mut out, &files, &suffixes).map_err(|e| FlocateError::io(out_path, e))?;
    format::backpatch_paths_count(&mut out, paths_count)
        .map_err(|e| FlocateError::io(out_path, e))?;

    Ok(out)
}

/// Build an index of `root` into a freshly created file at `out_path`.
pub fn build_index_file(root: &Path, out_path: &Path, config: &IndexerConfig) -> Result<()> {
    let file = File::create(out_path).map_err(|e| FlocateError::io(out_path, e))?;
    build_index(root, BufWriter::new(file), out_path, config)?;
    Ok(())
}
