//! Substring queries over the sorted suffix array.
//!
//! A pattern P occurs in basename N iff some suffix of N has P as a prefix,
//! so the substring query reduces to locating the contiguous run of
//! suffixes that start with P. Two binary searches find the run; the file
//! ids in it are de-duplicated into ascending order and resolved to paths.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::Path;

use crate::core::errors::{FlocateError, Result};
use crate::core::paths::bytes_to_path;
use crate::index::format::Index;

/// A loaded index plus the query operations on it.
pub struct Locator {
    index: Index,
}

impl Locator {
    /// Wrap an already-loaded index.
    pub fn new(index: Index) -> Self {
        Self { index }
    }

    /// Open and parse an index file.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| FlocateError::io(path, e))?;
        Ok(Self::new(Index::load(BufReader::new(file))?))
    }

    /// The underlying index.
    pub fn index(&self) -> &Index {
        &self.index
    }

    /// Half-open range of suffixes whose denoted substring starts with
    /// `pattern`.
    ///
    /// An empty pattern is a prefix of every suffix, so it selects the
    /// whole array.
    fn suffix_range(&self, pattern: &[u8]) -> (usize, usize) {
        let files = self.index.files();
        let suffixes = self.index.suffixes();

        let lo = suffixes.partition_point(|sd| sd.suffix_bytes(files) < pattern);
        let hi = lo + suffixes[lo..].partition_point(|sd| sd.suffix_bytes(files).starts_with(pattern));
        (lo, hi)
    }

    /// Ids of every file whose basename contains `pattern`, ascending.
    pub fn matching_file_ids(&self, pattern: &[u8]) -> BTreeSet<u32> {
        let (lo, hi) = self.suffix_range(pattern);
        self.index.suffixes()[lo..hi]
            .iter()
            .map(crate::index::descriptors::SuffixDescriptor::file_id)
            .collect()
    }

    /// Paths of every matching file, each exactly once, in file id order.
    ///
    /// Purely in-memory: no staleness filtering, so results are
    /// deterministic for a fixed index.
    pub fn matches(&self, pattern: &[u8]) -> Vec<&[u8]> {
        self.matching_file_ids(pattern)
            .into_iter()
            .map(|file_id| {
                let path_id = self.index.files()[file_id as usize].path_id();
                self.index.paths()[path_id as usize].as_slice()
            })
            .collect()
    }

    /// Print every matching path that still exists, one per line.
    ///
    /// Entries whose filesystem object is gone are suppressed silently; a
    /// stale index is not an error.
    pub fn print_matches<Out: Write>(&self, pattern: &[u8], out: &mut Out) -> io::Result<()> {
        for path in self.matches(pattern) {
            if bytes_to_path(path).exists() {
                out.write_all(path)?;
                out.write_all(b"\n")?;
            }
        }
        Ok(())
    }
}
