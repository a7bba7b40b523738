//
// Copyright (c) 2026 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! In-memory translation table produced by a catalog load

use std::collections::HashMap;

use crate::gettext_lib::plural::PluralRule;

/// Translation stored under one msgid
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Translation {
    Singular(String),
    /// One string per plural form, in form-index order
    Plural(Vec<String>),
}

impl Translation {
    /// The singular string, or form 0 of a plural entry
    pub fn singular(&self) -> &str {
        match self {
            Translation::Singular(s) => s,
            Translation::Plural(forms) => forms.first().map_or("", String::as_str),
        }
    }

    pub fn forms(&self) -> &[String] {
        match self {
            Translation::Singular(s) => std::slice::from_ref(s),
            Translation::Plural(forms) => forms,
        }
    }

    pub fn is_plural(&self) -> bool {
        matches!(self, Translation::Plural(_))
    }
}

/// Messages of one catalog, in load order, plus its plural rule.
///
/// Inserting an existing msgid replaces the translation and keeps the entry's
/// original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationDomain {
    entries: Vec<(String, Translation)>,
    index: HashMap<String, usize>,
    plural_rule: Option<PluralRule>,
}

impl TranslationDomain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, msgid: String, translation: Translation) {
        match self.index.get(&msgid) {
            Some(&pos) => self.entries[pos].1 = translation,
            None => {
                self.index.insert(msgid.clone(), self.entries.len());
                self.entries.push((msgid, translation));
            }
        }
    }

    pub fn get(&self, msgid: &str) -> Option<&Translation> {
        self.index.get(msgid).map(|&pos| &self.entries[pos].1)
    }

    pub fn contains(&self, msgid: &str) -> bool {
        self.index.contains_key(msgid)
    }

    pub fn remove(&mut self, msgid: &str) -> Option<Translation> {
        let pos = self.index.remove(msgid)?;
        let (_, translation) = self.entries.remove(pos);
        for slot in self.index.values_mut() {
            if *slot > pos {
                *slot -= 1;
            }
        }
        Some(translation)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Translation)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn plural_rule(&self) -> Option<&PluralRule> {
        self.plural_rule.as_ref()
    }

    pub fn set_plural_rule(&mut self, rule: PluralRule) {
        self.plural_rule = Some(rule);
    }

    /// Look up a singular message
    pub fn translate(&self, msgid: &str) -> Option<&str> {
        self.get(msgid).map(Translation::singular)
    }

    /// Look up the form of `msgid` that applies to count `n`.
    ///
    /// Without an attached rule the Germanic rule `n != 1` is used.  An index
    /// past the stored forms selects the last one.
    pub fn translate_plural(&self, msgid: &str, n: u64) -> Option<&str> {
        let forms = self.get(msgid)?.forms();
        let index = match &self.plural_rule {
            Some(rule) => rule.evaluate(n),
            None => usize::from(n != 1),
        };
        forms.get(index).or_else(|| forms.last()).map(String::as_str)
    }

    /// Add every entry of `other`, replacing existing translations.  Its plural
    /// rule, when present, replaces ours.
    pub fn merge(&mut self, other: TranslationDomain) {
        for (msgid, translation) in other.entries {
            self.insert(msgid, translation);
        }
        if other.plural_rule.is_some() {
            self.plural_rule = other.plural_rule;
        }
    }
}

impl FromIterator<(String, Translation)> for TranslationDomain {
    fn from_iter<I: IntoIterator<Item = (String, Translation)>>(iter: I) -> Self {
        let mut domain = TranslationDomain::new();
        for (msgid, translation) in iter {
            domain.insert(msgid, translation);
        }
        domain
    }
}
