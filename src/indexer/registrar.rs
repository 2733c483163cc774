//! Concurrent append stores for the three index sections.
//!
//! Each store is guarded by its own mutex so walker workers can grow them
//! concurrently. The path is written to the output stream and its id
//! assigned inside a single critical section, which is what makes disk
//! order equal `path_id` order. `file_id` is assigned under a different
//! lock, so the two ids are unrelated; only the back-references tie the
//! sections together.

#![allow(clippy::cast_possible_truncation)]

use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::core::errors::{FlocateError, Result};
use crate::core::paths::{basename_bytes, path_bytes};
use crate::index::descriptors::{FileDescriptor, SuffixDescriptor};
use crate::index::format;

struct PathsOut<W> {
    writer: W,
    count: u32,
}

/// Shared append-only stores fed by the walker workers.
pub struct Registrar<W> {
    out: Mutex<PathsOut<W>>,
    out_path: PathBuf,
    files: Mutex<Vec<FileDescriptor>>,
    suffixes: Mutex<Vec<SuffixDescriptor>>,
}

impl<W: Write> Registrar<W> {
    /// Wrap an output stream positioned just past the paths-count
    /// placeholder. `out_path` is used in error messages only.
    pub fn new(writer: W, out_path: PathBuf) -> Self {
        Self {
            out: Mutex::new(PathsOut { writer, count: 0 }),
            out_path,
            files: Mutex::new(Vec::new()),
            suffixes: Mutex::new(Vec::new()),
        }
    }

    /// Stream one path record and return its id (the pre-increment count).
    pub fn write_path(&self, path: &[u8]) -> Result<u32> {
        let mut out = self.out.lock();
        if out.count == u32::MAX {
            return Err(FlocateError::IndexFull {
                what: "paths count",
            });
        }
        format::write_bytes(&mut out.writer, path)
            .map_err(|e| FlocateError::io(&self.out_path, e))?;
        let path_id = out.count;
        out.count += 1;
        Ok(path_id)
    }

    /// Append a file descriptor and return its id.
    pub fn add_file(&self, path_id: u32, name: Vec<u8>) -> Result<u32> {
        let mut files = self.files.lock();
        if files.len() >= u32::MAX as usize {
            return Err(FlocateError::IndexFull {
                what: "files count",
            });
        }
        let file_id = files.len() as u32;
        files.push(FileDescriptor::new(path_id, name));
        Ok(file_id)
    }

    /// Append one suffix descriptor per byte offset of a basename of
    /// `name_len` bytes.
    pub fn add_suffixes(&self, file_id: u32, name_len: u32) -> Result<()> {
        let mut suffixes = self.suffixes.lock();
        if u32::MAX as usize - suffixes.len() < name_len as usize {
            return Err(FlocateError::IndexFull {
                what: "suffixes count",
            });
        }
        for offset in 0..name_len {
            suffixes.push(SuffixDescriptor::new(file_id, offset));
        }
        Ok(())
    }

    /// Register one canonicalized entry: path, then file, then suffixes.
    ///
    /// The order guarantees that any suffix referring to file id F can only
    /// exist once files\[F\] is populated in the final image.
    pub fn register(&self, entry: &Path) -> Result<()> {
        let name = basename_bytes(entry);
        let name_len = u32::try_from(name.len()).map_err(|_| FlocateError::IndexFull {
            what: "basename length",
        })?;

        let path_id = self.write_path(&path_bytes(entry))?;
        let file_id = self.add_file(path_id, name)?;
        self.add_suffixes(file_id, name_len)
    }

    /// Tear down into the output stream, the paths count, and the two
    /// in-memory sections. Call only after all workers have joined.
    pub fn into_parts(self) -> (W, u32, Vec<FileDescriptor>, Vec<SuffixDescriptor>) {
        let out = self.out.into_inner();
        (
            out.writer,
            out.count,
            self.files.into_inner(),
            self.suffixes.into_inner(),
        )
    }
}
