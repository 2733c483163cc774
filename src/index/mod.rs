//! The on-disk and in-memory index model shared by both programs.
//!
//! An index is three parallel sections: the paths stream, the files vector
//! (basename + back-index into paths), and the suffix array (one record per
//! byte offset of every basename, sorted lexicographically by the substring
//! it denotes).

pub mod descriptors;
pub mod format;
