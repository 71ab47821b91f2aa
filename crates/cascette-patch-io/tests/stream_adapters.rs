#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
//! Integration tests for the ranged reader and the pre-allocating writer

use cascette_patch_io::{
    FileRandomAccess, IoConfig, PatchIoError, PreallocatedFileWriter, RandomAccessObject,
    RangedFileReader, SyncMode,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::io::{Read, Write};
use std::path::Path;
use tempfile::tempdir;

fn write_fixture(path: &Path, len: usize) -> Vec<u8> {
    let data: Vec<u8> = (0..len).map(|i| (i * 7 % 256) as u8).collect();
    std::fs::write(path, &data).unwrap();
    data
}

// --- Pre-allocated output ---

#[test]
fn preallocated_size_before_first_write() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("sized.bin");

    // Larger than one fill chunk, not a multiple of it
    let writer = PreallocatedFileWriter::create(&path, 10_000).unwrap();
    assert_eq!(std::fs::metadata(&path).unwrap().len(), 10_000);
    drop(writer);
}

#[test]
fn preallocated_with_config() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("sized.bin");
    let config = IoConfig::new()
        .with_fill_chunk_size(1024)
        .with_sync_mode(SyncMode::Data);

    let mut writer = PreallocatedFileWriter::with_config(&path, 3000, &config).unwrap();
    assert_eq!(std::fs::metadata(&path).unwrap().len(), 3000);

    let payload = vec![0x5A; 3000];
    writer.write_all(&payload).unwrap();
    writer.flush().unwrap();
    writer.close().unwrap();

    assert_eq!(std::fs::read(&path).unwrap(), payload);
}

#[test]
fn preallocated_output_feeds_ranged_reader() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("patched.bin");

    let mut writer = PreallocatedFileWriter::create(&path, 64).unwrap();
    for i in 0..64u8 {
        writer.write_byte(i).unwrap();
    }
    writer.close().unwrap();

    let mut reader = RangedFileReader::open_range(&path, 60, 4).unwrap();
    let mut out = Vec::new();
    reader.read_to_end(&mut out).unwrap();
    assert_eq!(out, vec![60, 61, 62, 63]);
}

// --- Ranged reads ---

#[test]
fn one_handle_serves_several_entries() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("archive.bin");
    let data = write_fixture(&path, 1000);

    let entries = [(0u64, 100u64), (500, 250), (999, 1), (1000, 0), (100, 400)];
    let mut reader = RangedFileReader::open(&path).unwrap();

    for (offset, length) in entries {
        reader.set_range(offset, length).unwrap();
        assert_eq!(reader.available().unwrap(), length as usize);

        let mut out = Vec::new();
        reader.read_to_end(&mut out).unwrap();
        let start = offset as usize;
        assert_eq!(out, &data[start..start + length as usize]);
        assert_eq!(reader.read_byte().unwrap(), None);
    }
    reader.close().unwrap();
}

#[test]
fn range_past_file_length_rejected() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("small.bin");
    write_fixture(&path, 10);

    let mut reader = RangedFileReader::open(&path).unwrap();
    let err = reader.set_range(5, 6).unwrap_err();
    assert!(matches!(err, PatchIoError::IllegalRange { .. }));
    let err = reader.set_range(1, u64::MAX).unwrap_err();
    assert!(matches!(err, PatchIoError::IllegalRange { .. }));
}

#[test]
fn reader_and_random_access_share_layout() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("mixed.bin");

    let mut rao = FileRandomAccess::create(&path).unwrap();
    rao.write_i32(0x1122_3344).unwrap();
    rao.write_i64(-2).unwrap();
    rao.close().unwrap();

    let mut reader = RangedFileReader::open_range(&path, 4, 8).unwrap();
    let mut long = [0u8; 8];
    reader.read_exact(&mut long).unwrap();
    assert_eq!(i64::from_be_bytes(long), -2);
}

// --- Properties ---

proptest! {
    /// A ranged reader yields exactly the window's bytes, then end-of-stream
    #[test]
    fn ranged_reader_yields_window(
        len in 0usize..2048,
        a in any::<prop::sample::Index>(),
        b in any::<prop::sample::Index>(),
    ) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("window.bin");
        let data = write_fixture(&path, len);

        let offset = a.index(len + 1);
        let length = b.index(len - offset + 1);

        let mut reader = RangedFileReader::open_range(&path, offset as u64, length as u64).unwrap();
        let mut out = Vec::new();
        reader.read_to_end(&mut out).unwrap();

        prop_assert_eq!(&out[..], &data[offset..offset + length]);
        prop_assert_eq!(reader.read_byte().unwrap(), None);
        prop_assert_eq!(reader.available().unwrap(), 0);
    }

    /// Reading after any number of resets reproduces the bytes from the mark
    #[test]
    fn mark_reset_reproduces_bytes(
        skip in 0u64..256,
        chunk in 1usize..128,
        rounds in 1usize..5,
    ) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mark.bin");
        let data = write_fixture(&path, 512);

        let mut reader = RangedFileReader::open(&path).unwrap();
        reader.skip(skip).unwrap();
        reader.mark().unwrap();

        let start = skip as usize;
        for _ in 0..rounds {
            let mut buf = vec![0u8; chunk];
            reader.read_exact(&mut buf).unwrap();
            prop_assert_eq!(&buf[..], &data[start..start + chunk]);
            reader.reset().unwrap();
            prop_assert_eq!(reader.position().unwrap(), skip);
        }
    }
}
