//
// Copyright (c) 2026 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use mocat_i18n::gettext_lib::mo_file::{Endianness, MoWriter};
use mocat_i18n::{CatalogLoader, GettextLoader, LoadError, Translation, TranslationDomain};
use std::fs::File;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const HEADER: &str = "Content-Type: text/plain; charset=UTF-8\n\
                      Plural-Forms: nplurals=2; plural=(n != 1);\n";

/// Write a catalog into a fresh temporary directory
pub fn write_catalog(writer: &MoWriter) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("messages.mo");
    let mut file = File::create(&path).unwrap();
    writer.write_to(&mut file).unwrap();
    (temp_dir, path)
}

fn french(order: Endianness) -> MoWriter {
    MoWriter::new(order)
        .entry("", HEADER)
        .entry("hello", "bonjour")
        .plural_entry(&["apple", "apples"], &["pomme", "pommes"])
}

fn load(path: &Path) -> Result<TranslationDomain, LoadError> {
    let loader: Box<dyn CatalogLoader> = Box::new(GettextLoader::new());
    loader.load(path, "fr")
}

/// Test loading a little-endian catalog from disk
#[test]
fn test_load_little_endian() {
    let (_dir, path) = write_catalog(&french(Endianness::Little));
    let domain = load(&path).unwrap();

    assert_eq!(domain.translate("hello"), Some("bonjour"));
    assert_eq!(
        domain.get("apple"),
        Some(&Translation::Plural(vec![
            "pomme".to_string(),
            "pommes".to_string()
        ]))
    );
    assert_eq!(
        domain.get("apples"),
        Some(&Translation::Singular(String::new()))
    );
    assert!(!domain.contains(""));

    let rule = domain.plural_rule().unwrap();
    assert_eq!(rule.evaluate(0), 1);
    assert_eq!(rule.evaluate(1), 0);
    assert_eq!(rule.evaluate(2), 1);
    assert_eq!(domain.translate_plural("apple", 2), Some("pommes"));
}

/// Test that big-endian catalogs decode to the same domain
#[test]
fn test_load_big_endian_matches() {
    let (_le_dir, le_path) = write_catalog(&french(Endianness::Little));
    let (_be_dir, be_path) = write_catalog(&french(Endianness::Big));

    assert_eq!(load(&le_path).unwrap(), load(&be_path).unwrap());
}

/// Test that loading the same file twice yields equal domains
#[test]
fn test_load_twice() {
    let (_dir, path) = write_catalog(&french(Endianness::Big));
    assert_eq!(load(&path).unwrap(), load(&path).unwrap());
}

/// Test one loader shared between threads
#[test]
fn test_concurrent_loads() {
    let (_le_dir, le_path) = write_catalog(&french(Endianness::Little));
    let (_be_dir, be_path) = write_catalog(&french(Endianness::Big));
    let loader = GettextLoader::new();
    let expected = loader.load_path(&le_path).unwrap();

    std::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let path = if i % 2 == 0 { &le_path } else { &be_path };
                let loader = &loader;
                s.spawn(move || loader.load_path(path).unwrap())
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}

/// Test a missing file
#[test]
fn test_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    let err = load(&temp_dir.path().join("absent.mo")).unwrap_err();

    assert!(matches!(err, LoadError::Open { .. }));
    assert!(!err.is_format_error());
}

/// Test a file of zero bytes where the magic number should be
#[test]
fn test_zeroed_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("zero.mo");
    std::fs::write(&path, [0u8; 32]).unwrap();

    let err = load(&path).unwrap_err();
    assert!(matches!(err, LoadError::BadMagic(0)));
    assert!(err.is_format_error());
}

/// Test that an unknown major revision is rejected
#[test]
fn test_major_revision_two() {
    let (_dir, path) = write_catalog(&french(Endianness::Little).revision(0x0002_0000));
    let err = load(&path).unwrap_err();

    assert!(matches!(err, LoadError::UnsupportedRevision(0x0002_0000)));
    assert!(err.is_format_error());
}

/// Test a catalog cut short inside its string data
#[test]
fn test_truncated_strings() {
    let data = french(Endianness::Little).to_bytes().unwrap();
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("short.mo");
    std::fs::write(&path, &data[..data.len() - 4]).unwrap();

    let err = load(&path).unwrap_err();
    assert!(matches!(err, LoadError::StringOutOfBounds { .. }));
}
