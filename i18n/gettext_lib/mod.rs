//
// Copyright (c) 2026 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! gettext catalog support
//!
//! This module reads GNU .mo catalogs into translation domains and
//! evaluates the plural rules declared in their header entry.

pub mod domain;
pub mod loader;
pub mod mo_file;
pub mod plural;
