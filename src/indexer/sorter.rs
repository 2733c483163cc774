//! Bucketed parallel sort of the suffix array.
//!
//! Suffixes are partitioned into 256 buckets by the first byte of the
//! substring they denote, the buckets are sorted independently by a worker
//! pool, and the results are concatenated in bucket order. Because the
//! bucket index *is* the first byte, concatenation order equals the global
//! unsigned-byte lexicographic order and no merge phase is needed.

use std::sync::Arc;
use std::thread;

use crossbeam_channel as channel;

use crate::index::descriptors::{FileDescriptor, SuffixDescriptor};

/// One bucket per possible first byte.
pub const ALPHABET: usize = 256;

/// Sort the suffix array lexicographically by denoted substring.
///
/// Equal suffixes may land in any relative order; consumers only rely on
/// the range boundaries, not on intra-equal ordering.
pub fn sort_suffixes(
    suffixes: Vec<SuffixDescriptor>,
    files: &Arc<Vec<FileDescriptor>>,
    parallelism: usize,
) -> Vec<SuffixDescriptor> {
    let total = suffixes.len();

    // Single-threaded pre-pass: the offset is always inside the basename,
    // so the first byte always exists.
    let mut buckets: Vec<Vec<SuffixDescriptor>> = (0..ALPHABET).map(|_| Vec::new()).collect();
    for sd in suffixes {
        buckets[sd.first_byte(files) as usize].push(sd);
    }

    let (task_tx, task_rx) = channel::unbounded::<(usize, Vec<SuffixDescriptor>)>();
    let (done_tx, done_rx) = channel::unbounded::<(usize, Vec<SuffixDescriptor>)>();

    for task in buckets.into_iter().enumerate() {
        let _ = task_tx.send(task);
    }
    drop(task_tx);

    let workers: Vec<_> = (0..parallelism.max(1))
        .map(|_| {
            let task_rx = task_rx.clone();
            let done_tx = done_tx.clone();
            let files = Arc::clone(files);

            thread::spawn(move || {
                // Each bucket is owned by exactly one worker from pop to
                // completion; no locking is needed around the sort itself.
                for (bucket_index, mut bucket) in task_rx {
                    bucket.sort_unstable_by(|a, b| {
                        a.suffix_bytes(&files).cmp(b.suffix_bytes(&files))
                    });
                    if done_tx.send((bucket_index, bucket)).is_err() {
                        return;
                    }
                }
            })
        })
        .collect();

    drop(task_rx);
    drop(done_tx);

    let mut sorted: Vec<Vec<SuffixDescriptor>> = (0..ALPHABET).map(|_| Vec::new()).collect();
    for (bucket_index, bucket) in done_rx {
        sorted[bucket_index] = bucket;
    }

    for handle in workers {
        let _ = handle.join();
    }

    let mut result = Vec::with_capacity(total);
    for bucket in sorted {
        result.extend(bucket);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn file_set(names: &[&[u8]]) -> Arc<Vec<FileDescriptor>> {
        Arc::new(
            names
                .iter()
                .enumerate()
                .map(|(i, name)| FileDescriptor::new(i as u32, name.to_vec()))
                .collect(),
        )
    }

    fn all_suffixes(files: &[FileDescriptor]) -> Vec<SuffixDescriptor> {
        let mut suffixes = Vec::new();
        for (file_id, fd) in files.iter().enumerate() {
            for offset in 0..fd.name().len() {
                suffixes.push(SuffixDescriptor::new(file_id as u32, offset as u32));
            }
        }
        suffixes
    }

    fn assert_sorted(suffixes: &[SuffixDescriptor], files: &[FileDescriptor]) {
        for pair in suffixes.windows(2) {
            assert!(
                pair[0].suffix_bytes(files) <= pair[1].suffix_bytes(files),
                "{:?} > {:?}",
                pair[0].suffix_bytes(files),
                pair[1].suffix_bytes(files)
            );
        }
    }

    #[test]
    fn sorts_across_buckets_and_within_them() {
        let files = file_set(&[b"banana", b"apple.txt", b"zoo"]);
        let sorted = sort_suffixes(all_suffixes(&files), &files, 4);

        assert_eq!(sorted.len(), "banana".len() + "apple.txt".len() + "zoo".len());
        assert_sorted(&sorted, &files);
    }

    #[test]
    fn preserves_the_multiset_of_suffixes() {
        let files = file_set(&[b"aa", b"ab", b"ba"]);
        let input = all_suffixes(&files);
        let before: HashSet<(u32, u32)> = input.iter().map(|s| (s.file_id(), s.offset())).collect();

        let sorted = sort_suffixes(input, &files, 3);
        let after: HashSet<(u32, u32)> = sorted.iter().map(|s| (s.file_id(), s.offset())).collect();

        assert_eq!(sorted.len(), 6);
        assert_eq!(before, after);
    }

    #[test]
    fn high_bytes_sort_after_ascii() {
        let files = file_set(&[&[0xFF, 0x01], b"zz"]);
        let sorted = sort_suffixes(all_suffixes(&files), &files, 2);

        assert_sorted(&sorted, &files);
        // The 0xFF-led suffix must come last.
        assert_eq!(sorted.last().unwrap().suffix_bytes(&files)[0], 0xFF);
    }

    #[test]
    fn empty_input_sorts_to_empty() {
        let files = file_set(&[]);
        assert!(sort_suffixes(Vec::new(), &files, 2).is_empty());
    }

    #[test]
    fn single_worker_produces_the_same_byte_order() {
        let files = file_set(&[b"report-2024.pdf", b"report-2025.pdf", b"notes"]);
        let serial = sort_suffixes(all_suffixes(&files), &files, 1);
        let parallel = sort_suffixes(all_suffixes(&files), &files, 8);

        let bytes =
            |v: &[SuffixDescriptor]| v.iter().map(|s| s.suffix_bytes(&files).to_vec()).collect::<Vec<_>>();
        assert_eq!(bytes(&serial), bytes(&parallel));
    }

    #[test]
    fn equal_basenames_from_different_files_interleave_freely() {
        let files = file_set(&[b"dup", b"dup"]);
        let sorted = sort_suffixes(all_suffixes(&files), &files, 2);

        assert_sorted(&sorted, &files);
        // Both files contribute each of the three suffixes.
        let ids: HashSet<u32> = sorted.iter().map(SuffixDescriptor::file_id).collect();
        assert_eq!(ids, HashSet::from([0, 1]));
    }
}
