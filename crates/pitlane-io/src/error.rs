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

//! Error types for track file reading.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while parsing a configuration document.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("Failed to read config {path}: {source}")]
    Io {
        /// The path that failed.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// A section header is not closed.
    #[error("Malformed section header on line {line}: {text}")]
    MalformedSection {
        /// 1-based line number.
        line: usize,
        /// The offending line.
        text: String,
    },

    /// A line is neither a section, a key/value pair nor a comment.
    #[error("Expected `key = value` on line {line}: {text}")]
    MalformedLine {
        /// 1-based line number.
        line: usize,
        /// The offending line.
        text: String,
    },

    /// A required key is absent.
    #[error("Missing key `{key}` in section `{section}`")]
    MissingKey {
        /// Section searched.
        section: String,
        /// Key requested.
        key: String,
    },

    /// A value could not be converted to the requested type.
    #[error("Invalid value `{value}` for key `{key}` in section `{section}`")]
    InvalidValue {
        /// Section searched.
        section: String,
        /// Key requested.
        key: String,
        /// Raw value found.
        value: String,
    },
}

/// Errors raised by the JPK archive reader.
#[derive(Debug, Error)]
pub enum PackError {
    /// IO error while reading the archive.
    #[error("Failed to read archive {path}: {source}")]
    Io {
        /// The archive path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The file does not start with the JPK signature.
    #[error("{0} is not a JPK archive")]
    BadSignature(PathBuf),

    /// The entry table does not fit in the file.
    #[error("Archive {path} declares {count} entries that do not fit in the file")]
    TruncatedTable {
        /// The archive path.
        path: PathBuf,
        /// Declared entry count.
        count: u32,
    },

    /// An entry points outside of the archive.
    #[error("Entry `{name}` lies outside of the archive")]
    EntryOutOfBounds {
        /// Entry name.
        name: String,
    },

    /// The requested entry is not in the archive.
    #[error("No entry `{0}` in archive")]
    MissingEntry(String),
}

/// Errors raised when resolving content.
#[derive(Debug, Error)]
pub enum ContentError {
    /// The file does not exist.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// IO error while reading a file.
    #[error("Failed to read {path}: {source}")]
    Io {
        /// The path that failed.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// No model loader is registered for the file extension.
    #[error("No model loader for `{0}`")]
    UnsupportedFormat(String),

    /// A loader rejected the data.
    #[error("Failed to parse `{name}`: {message}")]
    Parse {
        /// Logical name of the asset.
        name: String,
        /// Loader message.
        message: String,
    },

    /// Archive failure.
    #[error(transparent)]
    Pack(#[from] PackError),

    /// Config failure.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors raised while reading the roads file.
#[derive(Debug, Error)]
pub enum RoadsError {
    /// The roads file could not be opened.
    #[error("Error opening roads file {path}: {source}")]
    Open {
        /// The path that failed.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The file ended in the middle of a record.
    #[error("Unexpected end of roads data while reading {0}")]
    UnexpectedEof(&'static str),

    /// A token could not be parsed.
    #[error("Invalid token `{token}` while reading {what}")]
    InvalidToken {
        /// What was being read.
        what: &'static str,
        /// The offending token.
        token: String,
    },
}

/// Errors raised by the legacy object list reader.
#[derive(Debug, Error)]
pub enum ObjectListError {
    /// The list file could not be read.
    #[error("Failed to read object list {path}: {source}")]
    Io {
        /// The path that failed.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The header is missing or not a number.
    #[error("Object list has no parameter count header")]
    MissingHeader,

    /// The header declares fewer fields than any supported version.
    #[error("Track object list has {found} params per object, expected at least {minimum}")]
    TooFewParams {
        /// Declared count.
        found: usize,
        /// Smallest supported count.
        minimum: usize,
    },

    /// A record field could not be parsed.
    #[error("Invalid {field} `{value}` in object record {record}")]
    InvalidField {
        /// 0-based record number.
        record: usize,
        /// Field name.
        field: &'static str,
        /// Raw token.
        value: String,
    },
}
