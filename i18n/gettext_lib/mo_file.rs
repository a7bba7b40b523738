//
// Copyright (c) 2026 Jeff Garzik
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! GNU .mo binary catalog layout
//!
//! A .mo file starts with a 28-byte header of 32-bit words:
//!
//! | offset | field                              |
//! |--------|------------------------------------|
//! | 0      | magic number                       |
//! | 4      | revision (major in the high 16 bits) |
//! | 8      | number of strings N                |
//! | 12     | offset of the original string table|
//! | 16     | offset of the translated string table |
//! | 20     | size of the hash table             |
//! | 24     | offset of the hash table           |
//!
//! Each string table holds N `(length, offset)` pairs.  The magic number
//! fixes the byte order of every word in the file.
//!
//! [`MoCursor`] reads this layout from any seekable source, [`MoWriter`]
//! produces it.

use std::fmt;
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::PathBuf;

use byteorder::{BigEndian, ByteOrder, LittleEndian, ReadBytesExt};

use crate::gettext_lib::plural::PluralError;

/// Magic number of a little-endian .mo file, as a little-endian word
pub const MO_MAGIC_LE: u32 = 0x950412de;

/// The same magic bytes seen through a little-endian read of a big-endian file
pub const MO_MAGIC_BE: u32 = 0xde120495;

/// Byte order of the 32-bit words in a catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endianness {
    Little,
    Big,
}

impl Endianness {
    /// Byte order announced by the first four bytes, read little-endian
    pub fn from_magic(magic: u32) -> Option<Self> {
        match magic {
            MO_MAGIC_LE => Some(Endianness::Little),
            MO_MAGIC_BE => Some(Endianness::Big),
            _ => None,
        }
    }

    fn read_u32(self, buf: &[u8]) -> u32 {
        match self {
            Endianness::Little => LittleEndian::read_u32(buf),
            Endianness::Big => BigEndian::read_u32(buf),
        }
    }

    fn put_u32(self, out: &mut Vec<u8>, value: u32) {
        let mut word = [0u8; 4];
        match self {
            Endianness::Little => LittleEndian::write_u32(&mut word, value),
            Endianness::Big => BigEndian::write_u32(&mut word, value),
        }
        out.extend_from_slice(&word);
    }
}

impl fmt::Display for Endianness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endianness::Little => f.write_str("little-endian"),
            Endianness::Big => f.write_str("big-endian"),
        }
    }
}

/// Which of the two string tables an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Original,
    Translated,
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Table::Original => f.write_str("original"),
            Table::Translated => f.write_str("translated"),
        }
    }
}

/// Error raised while loading a catalog
#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("could not open {} for reading: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("truncated catalog: missing {what}")]
    Truncated { what: &'static str },
    #[error("not a gettext catalog: bad magic number 0x{0:08x}")]
    BadMagic(u32),
    #[error("unknown major revision {}", .0 >> 16)]
    UnsupportedRevision(u32),
    #[error("{table} string table ({count} entries at offset {offset}) runs past end of file")]
    TableOutOfBounds { table: Table, offset: u32, count: u32 },
    #[error("{table} string {index} ({length} bytes at offset {offset}) runs past end of file")]
    StringOutOfBounds {
        table: Table,
        index: usize,
        offset: u32,
        length: u32,
    },
    #[error("{table} string {index} is not valid UTF-8")]
    InvalidUtf8 { table: Table, index: usize },
    #[error("malformed Plural-Forms header: {0}")]
    PluralForms(#[from] PluralError),
}

impl LoadError {
    /// True for errors caused by the catalog contents rather than by
    /// opening or reading the file.
    pub fn is_format_error(&self) -> bool {
        !matches!(self, LoadError::Open { .. } | LoadError::Io(_))
    }
}

/// Decoded catalog header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoHeader {
    pub endianness: Endianness,
    pub revision: u32,
    pub nstrings: u32,
    pub orig_tab_offset: u32,
    pub trans_tab_offset: u32,
    /// Hash table fields are decoded but lookups never use them
    pub hash_tab_size: u32,
    pub hash_tab_offset: u32,
}

impl MoHeader {
    pub const SIZE: u64 = 28;

    pub fn major_revision(&self) -> u32 {
        self.revision >> 16
    }

    pub fn minor_revision(&self) -> u32 {
        self.revision & 0xffff
    }
}

/// One `(length, offset)` pair of a string table; length excludes the
/// trailing NUL
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StringDescriptor {
    pub length: u32,
    pub offset: u32,
}

impl StringDescriptor {
    pub const SIZE: u64 = 8;
}

/// Read position over one catalog.
///
/// Created per load; carries the source, its byte order and its length so
/// every read can be bounds-checked before it happens.
#[derive(Debug)]
pub struct MoCursor<R> {
    reader: R,
    order: Endianness,
    len: u64,
}

impl<R: Read + Seek> MoCursor<R> {
    /// Validate the magic number and fix the byte order.
    pub fn new(mut reader: R) -> Result<Self, LoadError> {
        let len = reader.seek(SeekFrom::End(0))?;
        if len < 4 {
            return Err(LoadError::Truncated {
                what: "magic number",
            });
        }

        reader.seek(SeekFrom::Start(0))?;
        let magic = reader.read_u32::<LittleEndian>()?;
        let order = Endianness::from_magic(magic).ok_or(LoadError::BadMagic(magic))?;

        Ok(MoCursor { reader, order, len })
    }

    pub fn endianness(&self) -> Endianness {
        self.order
    }

    fn read_u32(&mut self) -> Result<u32, LoadError> {
        let value = match self.order {
            Endianness::Little => self.reader.read_u32::<LittleEndian>()?,
            Endianness::Big => self.reader.read_u32::<BigEndian>()?,
        };
        Ok(value)
    }

    /// Read the remaining header words; only major revisions 0 and 1 are
    /// accepted.
    pub fn read_header(&mut self) -> Result<MoHeader, LoadError> {
        if self.len < MoHeader::SIZE {
            return Err(LoadError::Truncated { what: "header" });
        }

        self.reader.seek(SeekFrom::Start(4))?;
        let revision = self.read_u32()?;
        if revision >> 16 > 1 {
            return Err(LoadError::UnsupportedRevision(revision));
        }

        let nstrings = self.read_u32()?;
        let orig_tab_offset = self.read_u32()?;
        let trans_tab_offset = self.read_u32()?;
        let hash_tab_size = self.read_u32()?;
        let hash_tab_offset = self.read_u32()?;

        Ok(MoHeader {
            endianness: self.order,
            revision,
            nstrings,
            orig_tab_offset,
            trans_tab_offset,
            hash_tab_size,
            hash_tab_offset,
        })
    }

    fn fits(&self, offset: u64, length: u64) -> bool {
        offset
            .checked_add(length)
            .is_some_and(|end| end <= self.len)
    }

    /// Read all `count` descriptors of a string table in one pass.
    pub fn read_table(
        &mut self,
        table: Table,
        offset: u32,
        count: u32,
    ) -> Result<Vec<StringDescriptor>, LoadError> {
        let size = u64::from(count) * StringDescriptor::SIZE;
        if !self.fits(u64::from(offset), size) {
            return Err(LoadError::TableOutOfBounds {
                table,
                offset,
                count,
            });
        }

        // size is bounded by the file length checked above
        let mut buf = vec![0u8; size as usize];
        self.reader.seek(SeekFrom::Start(u64::from(offset)))?;
        self.reader.read_exact(&mut buf)?;

        let order = self.order;
        Ok(buf
            .chunks_exact(StringDescriptor::SIZE as usize)
            .map(|pair| StringDescriptor {
                length: order.read_u32(&pair[..4]),
                offset: order.read_u32(&pair[4..]),
            })
            .collect())
    }

    /// Read the string at `desc` and split it on NUL bytes.
    ///
    /// Always yields at least one segment.
    pub fn read_segments(
        &mut self,
        table: Table,
        index: usize,
        desc: StringDescriptor,
    ) -> Result<Vec<String>, LoadError> {
        if !self.fits(u64::from(desc.offset), u64::from(desc.length)) {
            return Err(LoadError::StringOutOfBounds {
                table,
                index,
                offset: desc.offset,
                length: desc.length,
            });
        }

        let mut buf = vec![0u8; desc.length as usize];
        self.reader.seek(SeekFrom::Start(u64::from(desc.offset)))?;
        self.reader.read_exact(&mut buf)?;

        buf.split(|&b| b == 0)
            .map(|segment| {
                String::from_utf8(segment.to_vec())
                    .map_err(|_| LoadError::InvalidUtf8 { table, index })
            })
            .collect()
    }
}

/// Decode just the header of a catalog
pub fn read_header<R: Read + Seek>(reader: R) -> Result<MoHeader, LoadError> {
    MoCursor::new(reader)?.read_header()
}

/// Serialiser for .mo catalogs.
///
/// Entries are written in the order they were added, followed by an empty
/// hash table.  Plural entries are NUL-joined the way `msgfmt` stores them.
#[derive(Debug, Clone)]
pub struct MoWriter {
    order: Endianness,
    revision: u32,
    entries: Vec<(Vec<u8>, Vec<u8>)>,
}

impl MoWriter {
    pub fn new(order: Endianness) -> Self {
        MoWriter {
            order,
            revision: 0,
            entries: Vec::new(),
        }
    }

    pub fn revision(mut self, revision: u32) -> Self {
        self.revision = revision;
        self
    }

    /// Add a raw pair; either side may already contain NUL separators.
    pub fn entry(mut self, msgid: impl AsRef<[u8]>, msgstr: impl AsRef<[u8]>) -> Self {
        self.entries
            .push((msgid.as_ref().to_vec(), msgstr.as_ref().to_vec()));
        self
    }

    /// Add a plural entry: `msgid\0msgid_plural` mapped to NUL-joined forms.
    pub fn plural_entry(self, msgids: &[&str], msgstrs: &[&str]) -> Self {
        self.entry(msgids.join("\0"), msgstrs.join("\0"))
    }

    /// Serialise the catalog. Fails if any count, length or offset does not
    /// fit the format's 32-bit words.
    pub fn to_bytes(&self) -> io::Result<Vec<u8>> {
        let count = self.entries.len();
        let table_size = count * StringDescriptor::SIZE as usize;
        let orig_tab_offset = MoHeader::SIZE as usize;
        let trans_tab_offset = orig_tab_offset + table_size;
        let strings_offset = trans_tab_offset + table_size;

        let mut orig_table = Vec::new();
        let mut trans_table = Vec::new();
        let mut strings = Vec::new();

        for (msgid, msgstr) in &self.entries {
            for (table, bytes) in [(&mut orig_table, msgid), (&mut trans_table, msgstr)] {
                self.order.put_u32(table, word(bytes.len(), "string length")?);
                self.order
                    .put_u32(table, word(strings_offset + strings.len(), "string offset")?);
                strings.extend_from_slice(bytes);
                strings.push(0);
            }
        }

        let mut data = Vec::with_capacity(strings_offset + strings.len());
        self.order.put_u32(&mut data, MO_MAGIC_LE);
        for value in [
            self.revision,
            word(count, "string count")?,
            word(orig_tab_offset, "table offset")?,
            word(trans_tab_offset, "table offset")?,
            0, // hash table size
            word(strings_offset + strings.len(), "hash table offset")?,
        ] {
            self.order.put_u32(&mut data, value);
        }
        data.extend_from_slice(&orig_table);
        data.extend_from_slice(&trans_table);
        data.extend_from_slice(&strings);
        Ok(data)
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.to_bytes()?)
    }
}

fn word(value: usize, what: &str) -> io::Result<u32> {
    u32::try_from(value).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{what} {value} does not fit in 32 bits"),
        )
    })
}
