//
// Copyright (c) 2026 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! mocat - inspect and query GNU gettext message catalogs
//!
//! With only a catalog argument, every entry is listed in load order.
//! Given MSGIDs, their translations are printed one per line, falling back
//! to the MSGID itself when the catalog has no entry.

use std::path::PathBuf;
use std::process::exit;

use clap::Parser;
use mocat_i18n::gettext_lib::mo_file::{LoadError, MoHeader};
use mocat_i18n::{CatalogLoader, GettextLoader, LoaderOptions, Translation, TranslationDomain};

/// mocat - inspect and query GNU gettext message catalogs
#[derive(Parser)]
#[command(version, about)]
struct Args {
    #[arg(short = 'H', long = "header", help = "Print the decoded catalog header")]
    header: bool,

    #[arg(short = 'n', long = "count", help = "Select the plural form for COUNT")]
    count: Option<u64>,

    #[arg(short = 'l', long = "locale", default_value = "C", help = "Locale the catalog belongs to")]
    locale: String,

    #[arg(long, help = "Fail on a malformed Plural-Forms header")]
    strict: bool,

    #[arg(help = "Compiled .mo catalog")]
    file: PathBuf,

    #[arg(help = "Messages to translate")]
    msgids: Vec<String>,
}

/// Escape newlines and tabs so each entry stays on one line
fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\\' => out.push_str("\\\\"),
            _ => out.push(c),
        }
    }
    out
}

fn render(translation: &Translation) -> String {
    match translation {
        Translation::Singular(s) => escape(s),
        Translation::Plural(forms) => forms
            .iter()
            .map(|s| escape(s))
            .collect::<Vec<_>>()
            .join(" | "),
    }
}

fn print_header(header: &MoHeader, domain: &TranslationDomain) {
    println!("byte order: {}", header.endianness);
    println!(
        "revision: {}.{}",
        header.major_revision(),
        header.minor_revision()
    );
    println!("strings: {}", header.nstrings);
    println!("original table: {}", header.orig_tab_offset);
    println!("translated table: {}", header.trans_tab_offset);
    println!(
        "hash table: {} entries at {}",
        header.hash_tab_size, header.hash_tab_offset
    );
    match domain.plural_rule() {
        Some(rule) => println!("plural rule: {}", rule),
        None => println!("plural rule: none"),
    }
}

fn run(args: &Args) -> Result<(), LoadError> {
    let options = LoaderOptions::new().strict_plural_forms(args.strict);
    let loader = GettextLoader::with_options(options);

    if args.header {
        let (header, domain) = loader.load_path_with_header(&args.file)?;
        print_header(&header, &domain);
        return Ok(());
    }

    let domain = loader.load(&args.file, &args.locale)?;

    if args.msgids.is_empty() {
        for (msgid, translation) in domain.iter() {
            println!("{} => {}", escape(msgid), render(translation));
        }
        return Ok(());
    }

    for msgid in &args.msgids {
        let translated = match args.count {
            Some(n) => domain.translate_plural(msgid, n),
            None => domain.translate(msgid),
        };
        println!("{}", translated.unwrap_or(msgid.as_str()));
    }
    Ok(())
}

fn main() {
    env_logger::init();

    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("mocat: {}", e);
        exit(1);
    }
}
