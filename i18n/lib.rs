//
// Copyright (c) 2026 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! mocat-i18n library
//!
//! Loading of GNU gettext .mo message catalogs:
//! - mo_file: binary layout, bounds-checked reader, writer
//! - plural: Plural-Forms rule parsing and evaluation
//! - domain: in-memory translation table
//! - loader: catalog loader tying the above together

pub mod gettext_lib;

pub use gettext_lib::domain::{Translation, TranslationDomain};
pub use gettext_lib::loader::{CatalogLoader, GettextLoader, LoaderOptions};
pub use gettext_lib::mo_file::LoadError;
pub use gettext_lib::plural::{PluralError, PluralRule};
