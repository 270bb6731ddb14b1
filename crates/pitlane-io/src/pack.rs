// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Reader for JPK object archives (`objects/objects.jpk`).
//!
//! Layout, all integers little-endian:
//!
//! | bytes | content |
//! |---|---|
//! | 8 | ASCII `JPK01.00` |
//! | 4 | entry count |
//! | 4 | maximum name length `n` |
//! | count x (8 + n) | `offset: u32`, `length: u32`, NUL padded name |
//! | ... | entry data at the absolute offsets |

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use ahash::AHashMap;
use bytemuck::{Pod, Zeroable};

use crate::error::PackError;

const SIGNATURE: &[u8; 8] = b"JPK01.00";
/// Signature plus the two header words.
const HEADER_LEN: u64 = 16;

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct RawHeader {
    count: u32,
    max_name_len: u32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct RawEntry {
    offset: u32,
    length: u32,
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    offset: u64,
    length: usize,
}

/// An open JPK archive.
#[derive(Debug)]
pub struct JpkArchive {
    path: PathBuf,
    file: File,
    entries: AHashMap<String, Entry>,
}

impl JpkArchive {
    /// Opens an archive and reads its table of contents.
    pub fn open(path: &Path) -> Result<Self, PackError> {
        let io_err = |source| PackError::Io {
            path: path.to_path_buf(),
            source,
        };
        let mut file = File::open(path).map_err(io_err)?;
        let file_len = file.metadata().map_err(io_err)?.len();

        let mut signature = [0u8; 8];
        file.read_exact(&mut signature).map_err(io_err)?;
        if &signature != SIGNATURE {
            return Err(PackError::BadSignature(path.to_path_buf()));
        }

        let header: RawHeader = read_pod(&mut file).map_err(io_err)?;
        let count = u32::from_le(header.count);
        let max_name_len = u32::from_le(header.max_name_len) as usize;

        let table_len = u64::from(count).checked_mul(8 + max_name_len as u64);
        match table_len.and_then(|len| len.checked_add(HEADER_LEN)) {
            Some(end) if end <= file_len => {}
            _ => {
                return Err(PackError::TruncatedTable {
                    path: path.to_path_buf(),
                    count,
                })
            }
        }

        let mut entries = AHashMap::new();
        // Only a non-empty table bounds the name length by the file size.
        let mut name_buf = if count == 0 {
            Vec::new()
        } else {
            vec![0u8; max_name_len]
        };
        for _ in 0..count {
            let raw: RawEntry = read_pod(&mut file).map_err(io_err)?;
            file.read_exact(&mut name_buf).map_err(io_err)?;
            let end = name_buf.iter().position(|b| *b == 0).unwrap_or(name_buf.len());
            let name = String::from_utf8_lossy(&name_buf[..end]).into_owned();

            let entry = Entry {
                offset: u64::from(u32::from_le(raw.offset)),
                length: u32::from_le(raw.length) as usize,
            };
            if entry.offset + entry.length as u64 > file_len {
                return Err(PackError::EntryOutOfBounds { name });
            }
            entries.insert(name, entry);
        }

        log::debug!("Opened {} with {} entries", path.display(), entries.len());
        Ok(Self {
            path: path.to_path_buf(),
            file,
            entries,
        })
    }

    /// Path of the archive file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `true` if the archive holds an entry with this name.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the archive is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reads the bytes of an entry.
    pub fn read(&mut self, name: &str) -> Result<Vec<u8>, PackError> {
        let entry = *self
            .entries
            .get(name)
            .ok_or_else(|| PackError::MissingEntry(name.to_string()))?;
        let io_err = |source| PackError::Io {
            path: self.path.clone(),
            source,
        };
        let mut buffer = vec![0; entry.length];
        self.file
            .seek(SeekFrom::Start(entry.offset))
            .map_err(io_err)?;
        self.file.read_exact(&mut buffer).map_err(io_err)?;
        Ok(buffer)
    }
}

fn read_pod<T: Pod>(reader: &mut impl Read) -> std::io::Result<T> {
    let mut value = T::zeroed();
    reader.read_exact(bytemuck::bytes_of_mut(&mut value))?;
    Ok(value)
}
