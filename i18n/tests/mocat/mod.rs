//
// Copyright (c) 2026 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use crate::loader::write_catalog;
use mocat_i18n::gettext_lib::mo_file::{Endianness, MoWriter};
use plib::testing::{run_test, run_test_with_checker, TestPlan};
use std::path::Path;

fn catalog(plural_forms: &str) -> MoWriter {
    MoWriter::new(Endianness::Little)
        .entry(
            "",
            format!("Content-Type: text/plain; charset=UTF-8\nPlural-Forms: {plural_forms}\n"),
        )
        .entry("hello", "bonjour")
        .plural_entry(&["apple", "apples"], &["pomme", "pommes"])
        .entry("two\nlines", "deux\nlignes")
}

fn mocat(args: &[&str], path: &Path, msgids: &[&str], expected_out: &str) {
    let mut all: Vec<&str> = args.to_vec();
    all.push(path.to_str().unwrap());
    all.extend_from_slice(msgids);

    let mut plan = TestPlan::new("mocat", &all);
    plan.expected_out = String::from(expected_out);
    run_test(plan);
}

/// Test listing every entry of a catalog
#[test]
fn test_mocat_list() {
    let (_dir, path) = write_catalog(&catalog("nplurals=2; plural=(n != 1);"));
    mocat(
        &[],
        &path,
        &[],
        "hello => bonjour\n\
         apple => pomme | pommes\n\
         apples => \n\
         two\\nlines => deux\\nlignes\n",
    );
}

/// Test singular lookups, including a missing msgid
#[test]
fn test_mocat_lookup() {
    let (_dir, path) = write_catalog(&catalog("nplurals=2; plural=(n != 1);"));
    mocat(&[], &path, &["hello", "goodbye"], "bonjour\ngoodbye\n");
}

/// Test plural selection with -n
#[test]
fn test_mocat_plural_count() {
    let (_dir, path) = write_catalog(&catalog("nplurals=2; plural=(n != 1);"));
    mocat(&["-n", "1"], &path, &["apple"], "pomme\n");
    mocat(&["-n", "0"], &path, &["apple"], "pommes\n");
    mocat(&["--count", "7"], &path, &["apple", "hello"], "pommes\nbonjour\n");
}

/// Test plural selection following the catalog's own rule
#[test]
fn test_mocat_plural_rule() {
    // French-style rule: zero takes the singular form
    let (_dir, path) = write_catalog(&catalog("nplurals=2; plural=(n > 1);"));
    mocat(&["-n", "0"], &path, &["apple"], "pomme\n");
    mocat(&["-n", "2"], &path, &["apple"], "pommes\n");
}

/// Test the decoded header output
#[test]
fn test_mocat_header() {
    let (_dir, path) = write_catalog(&catalog("nplurals=2; plural=(n != 1);"));
    let plan = TestPlan::new("mocat", &["-H", path.to_str().unwrap()]);

    run_test_with_checker(plan, |_, output| {
        let stdout = String::from_utf8_lossy(&output.stdout);
        let lines: Vec<&str> = stdout.lines().collect();
        assert_eq!(lines[0], "byte order: little-endian");
        assert_eq!(lines[1], "revision: 0.0");
        assert_eq!(lines[2], "strings: 4");
        assert_eq!(lines[3], "original table: 28");
        assert_eq!(lines[4], "translated table: 60");
        assert!(lines[5].starts_with("hash table: 0 entries at "));
        assert_eq!(lines[6], "plural rule: nplurals=2; plural=(n != 1);");
        assert!(output.stderr.is_empty());
        assert_eq!(output.status.code(), Some(0));
    });
}

/// Test a malformed Plural-Forms header with and without --strict
#[test]
fn test_mocat_strict_plural_forms() {
    let (_dir, path) = write_catalog(&catalog("nplurals=2; plural=n % 0;"));
    mocat(&["-n", "5"], &path, &["apple"], "pommes\n");

    let mut plan = TestPlan::new("mocat", &["--strict", path.to_str().unwrap()]);
    plan.expected_err =
        String::from("mocat: malformed Plural-Forms header: division by zero at offset 2\n");
    plan.expected_exit_code = 1;
    run_test(plan);
}

/// Test that -H reports the catalog it loaded, strictness included
#[test]
fn test_mocat_header_strict() {
    let (_dir, path) = write_catalog(&catalog("nplurals=2; plural=n % 0;"));

    let plan = TestPlan::new("mocat", &["-H", path.to_str().unwrap()]);
    run_test_with_checker(plan, |_, output| {
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.ends_with("plural rule: none\n"));
        assert_eq!(output.status.code(), Some(0));
    });

    let mut plan = TestPlan::new("mocat", &["-H", "--strict", path.to_str().unwrap()]);
    plan.expected_err =
        String::from("mocat: malformed Plural-Forms header: division by zero at offset 2\n");
    plan.expected_exit_code = 1;
    run_test(plan);
}

/// Test a file that is not a catalog
#[test]
fn test_mocat_bad_magic() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let path = temp_dir.path().join("bogus.mo");
    std::fs::write(&path, [0u8; 28]).unwrap();

    let mut plan = TestPlan::new("mocat", &[path.to_str().unwrap()]);
    plan.expected_err = String::from("mocat: not a gettext catalog: bad magic number 0x00000000\n");
    plan.expected_exit_code = 1;
    run_test(plan);
}

/// Test a catalog that does not exist
#[test]
fn test_mocat_missing_file() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let path = temp_dir.path().join("absent.mo");
    let plan = TestPlan::new("mocat", &[path.to_str().unwrap()]);

    run_test_with_checker(plan, |_, output| {
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.starts_with("mocat: could not open "));
        assert!(output.stdout.is_empty());
        assert_eq!(output.status.code(), Some(1));
    });
}
