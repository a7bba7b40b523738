//
// Copyright (c) 2026 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! Catalog loading
//!
//! [`GettextLoader`] turns a .mo file into a [`TranslationDomain`].  The
//! loader keeps no state between calls: every load builds its own
//! [`MoCursor`], so one loader may serve many threads at once.

use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;

use log::{debug, trace, warn};

use crate::gettext_lib::domain::{Translation, TranslationDomain};
use crate::gettext_lib::mo_file::{LoadError, MoCursor, MoHeader, Table};
use crate::gettext_lib::plural::PluralRule;

/// A source of translation domains, one per catalog file and locale
pub trait CatalogLoader: Send + Sync {
    fn load(&self, path: &Path, locale: &str) -> Result<TranslationDomain, LoadError>;
}

/// Knobs for [`GettextLoader`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoaderOptions {
    /// Fail the load on a malformed `Plural-Forms` header instead of
    /// dropping the rule with a warning
    pub strict_plural_forms: bool,
}

impl LoaderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strict_plural_forms(mut self, strict: bool) -> Self {
        self.strict_plural_forms = strict;
        self
    }
}

/// Loader for GNU gettext .mo catalogs
#[derive(Debug, Clone, Copy, Default)]
pub struct GettextLoader {
    options: LoaderOptions,
}

impl GettextLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: LoaderOptions) -> Self {
        GettextLoader { options }
    }

    /// Load the catalog at `path`
    pub fn load_path(&self, path: &Path) -> Result<TranslationDomain, LoadError> {
        self.load_path_with_header(path).map(|(_, domain)| domain)
    }

    /// Load the catalog at `path`, keeping the header it was decoded from
    pub fn load_path_with_header(
        &self,
        path: &Path,
    ) -> Result<(MoHeader, TranslationDomain), LoadError> {
        let file = File::open(path).map_err(|source| LoadError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        self.decode(BufReader::new(file))
    }

    /// Load a catalog held in memory
    pub fn load_bytes(&self, data: &[u8]) -> Result<TranslationDomain, LoadError> {
        self.load_from_reader(Cursor::new(data))
    }

    /// Load a catalog from any seekable source
    pub fn load_from_reader<R: Read + Seek>(
        &self,
        reader: R,
    ) -> Result<TranslationDomain, LoadError> {
        self.decode(reader).map(|(_, domain)| domain)
    }

    fn decode<R: Read + Seek>(
        &self,
        reader: R,
    ) -> Result<(MoHeader, TranslationDomain), LoadError> {
        let mut cursor = MoCursor::new(reader)?;
        let header = cursor.read_header()?;
        debug!(
            "{} catalog, revision {}.{}, {} strings",
            header.endianness,
            header.major_revision(),
            header.minor_revision(),
            header.nstrings
        );

        let originals =
            cursor.read_table(Table::Original, header.orig_tab_offset, header.nstrings)?;
        let translations =
            cursor.read_table(Table::Translated, header.trans_tab_offset, header.nstrings)?;

        let mut domain = TranslationDomain::new();
        for (index, (&orig, &trans)) in originals.iter().zip(&translations).enumerate() {
            let msgids = if orig.length > 0 {
                cursor.read_segments(Table::Original, index, orig)?
            } else {
                vec![String::new()]
            };

            if trans.length == 0 {
                trace!("string {index}: no translation");
                continue;
            }
            let msgstrs = cursor.read_segments(Table::Translated, index, trans)?;

            let mut msgids = msgids.into_iter();
            let msgid = msgids.next().unwrap_or_default();
            if msgids.len() > 0 && msgstrs.len() > 1 {
                trace!("string {index}: {msgid:?} with {} forms", msgstrs.len());
                domain.insert(msgid, Translation::Plural(msgstrs));
                for alias in msgids {
                    domain.insert(alias, Translation::Singular(String::new()));
                }
            } else {
                trace!("string {index}: {msgid:?}");
                let msgstr = msgstrs.into_iter().next().unwrap_or_default();
                domain.insert(msgid, Translation::Singular(msgstr));
            }
        }

        self.apply_metadata(&mut domain)?;
        debug!("loaded {} messages", domain.len());
        Ok((header, domain))
    }

    /// Pull the header entry (msgid "") out of the domain and attach its
    /// plural rule
    fn apply_metadata(&self, domain: &mut TranslationDomain) -> Result<(), LoadError> {
        let Some(metadata) = domain.remove("") else {
            return Ok(());
        };

        for line in metadata.singular().split('\n') {
            let Some((name, value)) = line.split_once(':') else {
                continue;
            };
            if !name.trim().eq_ignore_ascii_case("plural-forms") {
                continue;
            }

            match PluralRule::parse(value) {
                Ok(rule) => {
                    debug!("plural rule: {rule}");
                    domain.set_plural_rule(rule);
                }
                Err(err) if self.options.strict_plural_forms => return Err(err.into()),
                Err(err) => warn!("ignoring Plural-Forms {:?}: {err}", value.trim()),
            }
        }
        Ok(())
    }
}

impl CatalogLoader for GettextLoader {
    fn load(&self, path: &Path, locale: &str) -> Result<TranslationDomain, LoadError> {
        debug!("loading {} for locale {locale}", path.display());
        self.load_path(path)
    }
}
