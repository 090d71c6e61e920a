//! Hostile-archive scenarios: traversal, link escapes and decompression
//! bombs.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use stagehand_core::ExtractConfig;
use stagehand_core::QuotaResource;
use stagehand_core::StageError;
use stagehand_core::extract;
use stagehand_core::extract_with_config;
use stagehand_core::test_utils::TarTestBuilder;
use stagehand_core::test_utils::ZipTestBuilder;
use stagehand_core::test_utils::create_test_zip;
use stagehand_core::test_utils::write_archive;
use std::fs;
use std::io::Write;
use tempfile::TempDir;

#[test]
fn test_zip_traversal_variants() {
    let names = [
        "../evil.txt",
        "../../etc/passwd",
        "foo/../../evil.txt",
        "foo/bar/../../../evil.txt",
        "..\\evil.txt",
        "foo\\..\\..\\evil.txt",
    ];

    for name in names {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("evil.zip");
        write_archive(&archive, &create_test_zip(&[(name, b"x")]));
        let out = temp.path().join("out");

        let err = extract(&archive, &out).unwrap_err();
        assert!(
            matches!(err, StageError::PathTraversal { .. }),
            "{name} was not rejected: {err:?}"
        );
        assert!(!temp.path().join("evil.txt").exists(), "{name} escaped");
    }
}

#[test]
fn test_absolute_entry_names_rejected() {
    for name in ["/tmp/evil.txt", "\\evil.txt", "C:/evil.txt"] {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("abs.zip");
        write_archive(&archive, &create_test_zip(&[(name, b"x")]));

        let err = extract(&archive, temp.path().join("out")).unwrap_err();
        assert!(
            matches!(err, StageError::PathTraversal { .. }),
            "{name} was not rejected: {err:?}"
        );
    }
}

#[test]
fn test_inner_parent_segment_rejected() {
    let temp = TempDir::new().unwrap();
    let archive = temp.path().join("inner.zip");
    write_archive(&archive, &create_test_zip(&[("a/../b.txt", b"x")]));

    let err = extract(&archive, temp.path().join("out")).unwrap_err();
    assert!(matches!(err, StageError::PathTraversal { .. }));
}

#[test]
fn test_symlink_then_write_through_it() {
    let temp = TempDir::new().unwrap();
    let outside = temp.path().join("outside");
    fs::create_dir_all(&outside).unwrap();
    let data = TarTestBuilder::new()
        .add_symlink("escape", outside.to_str().unwrap())
        .add_file("escape/payload.txt", b"pwned")
        .build();
    let archive = temp.path().join("link.tar");
    write_archive(&archive, &data);

    let out = temp.path().join("out");
    let report = extract(&archive, &out).unwrap();
    assert_eq!(report.entries_skipped, 1);
    assert!(!outside.join("payload.txt").exists());
    assert!(out.join("escape/payload.txt").is_file());
}

#[test]
#[cfg(unix)]
fn test_preexisting_symlink_in_destination() {
    let temp = TempDir::new().unwrap();
    let outside = temp.path().join("outside");
    fs::create_dir_all(&outside).unwrap();
    let out = temp.path().join("out");
    fs::create_dir_all(&out).unwrap();
    std::os::unix::fs::symlink(&outside, out.join("docs")).unwrap();

    let archive = temp.path().join("in.zip");
    write_archive(&archive, &create_test_zip(&[("docs/readme.md", b"x")]));

    let err = extract(&archive, &out).unwrap_err();
    assert!(matches!(err, StageError::PathTraversal { .. }));
    assert!(!outside.join("readme.md").exists());
}

#[test]
fn test_zip_symlink_entry_not_materialized() {
    let temp = TempDir::new().unwrap();
    let data = ZipTestBuilder::new()
        .add_file("real.txt", b"data")
        .add_symlink("link", "/etc/passwd")
        .build();
    let archive = temp.path().join("links.zip");
    write_archive(&archive, &data);

    let out = temp.path().join("out");
    let report = extract(&archive, &out).unwrap();
    assert_eq!(report.files_extracted, 1);
    assert_eq!(report.entries_skipped, 1);
    assert!(fs::symlink_metadata(out.join("link")).is_err());
}

#[test]
fn test_compression_bomb_stops_at_file_limit() {
    let temp = TempDir::new().unwrap();
    let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated);
    writer.start_file("bomb.bin", options).unwrap();
    let zeros = vec![0u8; 1024 * 1024];
    for _ in 0..4 {
        writer.write_all(&zeros).unwrap();
    }
    let data = writer.finish().unwrap().into_inner();
    assert!(data.len() < 64 * 1024);

    let archive = temp.path().join("bomb.zip");
    write_archive(&archive, &data);
    let config = ExtractConfig::default().with_max_file_size(1024 * 1024);

    let err = extract_with_config(&archive, temp.path().join("out"), &config).unwrap_err();
    assert!(matches!(
        err.quota_resource(),
        Some(QuotaResource::FileSize { max, .. }) if *max == 1024 * 1024
    ));
    let written = fs::metadata(temp.path().join("out/bomb.bin")).unwrap().len();
    assert!(written <= 1024 * 1024);
}

#[test]
fn test_total_size_limit_across_files() {
    let temp = TempDir::new().unwrap();
    let chunk: &[u8] = &[b'a'; 4096];
    let archive = temp.path().join("many.zip");
    write_archive(
        &archive,
        &create_test_zip(&[("1.txt", chunk), ("2.txt", chunk), ("3.txt", chunk)]),
    );
    let config = ExtractConfig::default().with_max_total_size(10_000);

    let err = extract_with_config(&archive, temp.path().join("out"), &config).unwrap_err();
    assert!(matches!(
        err.quota_resource(),
        Some(QuotaResource::TotalSize { .. })
    ));
    assert!(err.leaves_partial_output());
}

#[test]
fn test_depth_limit() {
    let temp = TempDir::new().unwrap();
    let deep = (0..10).map(|i| format!("d{i}")).collect::<Vec<_>>().join("/") + "/f.txt";
    let archive = temp.path().join("deep.zip");
    write_archive(&archive, &create_test_zip(&[(deep.as_str(), b"x")]));
    let config = ExtractConfig::default().with_max_path_depth(5);

    let err = extract_with_config(&archive, temp.path().join("out"), &config).unwrap_err();
    assert!(matches!(err, StageError::SecurityViolation { .. }));
}
