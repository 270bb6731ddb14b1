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

//! Hierarchical INI-style configuration documents.
//!
//! ```text
//! # comment
//! top level key = 1
//! [object.0]
//! body = props/lamp
//! position = 1, 2, 3
//! ```
//!
//! Section names are split on `.` into nested nodes and keys may contain
//! spaces. A leaf value can name another section, see
//! [`ConfigTree::resolve_section`].

use std::fs;
use std::path::{Path, PathBuf};

use pitlane_core::asset::Asset;
use pitlane_core::math::Vec3;

use crate::error::ConfigError;

/// A value type that can be read from a config entry.
pub trait ConfigValue: Sized {
    /// Converts a raw entry, `None` if it does not represent a `Self`.
    fn from_config(raw: &str) -> Option<Self>;
}

impl ConfigValue for String {
    fn from_config(raw: &str) -> Option<Self> {
        Some(raw.trim().to_string())
    }
}

macro_rules! parsed_config_value {
    ($($ty:ty),*) => {
        $(impl ConfigValue for $ty {
            fn from_config(raw: &str) -> Option<Self> {
                raw.trim().parse().ok()
            }
        })*
    };
}

parsed_config_value!(f32, i32, u32, usize);

impl ConfigValue for bool {
    fn from_config(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        }
    }
}

impl ConfigValue for Vec<f32> {
    fn from_config(raw: &str) -> Option<Self> {
        if raw.trim().is_empty() {
            return Some(Vec::new());
        }
        raw.split(',').map(|v| v.trim().parse().ok()).collect()
    }
}

/// Comma separated list, empty slots are kept.
impl ConfigValue for Vec<String> {
    fn from_config(raw: &str) -> Option<Self> {
        Some(raw.split(',').map(|v| v.trim().to_string()).collect())
    }
}

impl ConfigValue for Vec3 {
    fn from_config(raw: &str) -> Option<Self> {
        let values = Vec::<f32>::from_config(raw)?;
        match values.as_slice() {
            [x, y, z] => Some(Vec3::new(*x, *y, *z)),
            _ => None,
        }
    }
}

/// A node of a configuration document: a named value with ordered children.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigNode {
    name: String,
    value: String,
    children: Vec<ConfigNode>,
}

impl ConfigNode {
    /// Creates an empty node.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// The key of this node inside its parent.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The raw value of this node, empty for pure sections.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Child nodes in document order.
    pub fn children(&self) -> &[ConfigNode] {
        &self.children
    }

    /// Returns `true` if the node has children.
    pub fn is_section(&self) -> bool {
        !self.children.is_empty()
    }

    /// Looks up a direct child.
    pub fn child(&self, key: &str) -> Option<&ConfigNode> {
        self.children.iter().find(|c| c.name == key)
    }

    /// Returns `true` if a direct child with this key exists.
    pub fn has(&self, key: &str) -> bool {
        self.child(key).is_some()
    }

    /// Reads a typed value. Missing keys and unparsable values yield `None`.
    pub fn get<T: ConfigValue>(&self, key: &str) -> Option<T> {
        match self.try_get(key) {
            Ok(value) => value,
            Err(err) => {
                log::warn!("{err}");
                None
            }
        }
    }

    /// Reads a typed value, `Ok(None)` if the key is missing.
    pub fn try_get<T: ConfigValue>(&self, key: &str) -> Result<Option<T>, ConfigError> {
        let Some(node) = self.child(key) else {
            return Ok(None);
        };
        T::from_config(&node.value)
            .map(Some)
            .ok_or_else(|| ConfigError::InvalidValue {
                section: self.name.clone(),
                key: key.to_string(),
                value: node.value.clone(),
            })
    }

    /// Reads a typed value that must be present.
    pub fn require<T: ConfigValue>(&self, key: &str) -> Result<T, ConfigError> {
        self.try_get(key)?.ok_or_else(|| ConfigError::MissingKey {
            section: self.name.clone(),
            key: key.to_string(),
        })
    }

    /// Sets the value of a direct child, creating it if needed.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.child_or_insert(key).value = value.into();
    }

    fn child_or_insert(&mut self, key: &str) -> &mut ConfigNode {
        let index = match self.children.iter().position(|c| c.name == key) {
            Some(index) => index,
            None => {
                self.children.push(ConfigNode::new(key));
                self.children.len() - 1
            }
        };
        &mut self.children[index]
    }
}

/// Where a section referenced by a key lives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SectionRef<'a> {
    /// The key itself holds the section.
    Inline(&'a ConfigNode),
    /// The key names a top-level section of the same document.
    Named(&'a ConfigNode),
    /// The key names a separate document, relative to this one.
    External(&'a str),
}

/// A parsed configuration document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigTree {
    root: ConfigNode,
    dir: Option<PathBuf>,
}

impl Asset for ConfigTree {}

impl ConfigTree {
    /// Parses a document. `name` becomes the name of the root node.
    pub fn parse(name: &str, text: &str) -> Result<Self, ConfigError> {
        let mut root = ConfigNode::new(name);
        let mut section: Vec<String> = Vec::new();

        for (number, raw) in text.lines().enumerate() {
            let line = match raw.find('#') {
                Some(comment) => &raw[..comment],
                None => raw,
            }
            .trim();
            if line.is_empty() {
                continue;
            }

            if let Some(header) = line.strip_prefix('[') {
                let header = header
                    .strip_suffix(']')
                    .ok_or_else(|| ConfigError::MalformedSection {
                        line: number + 1,
                        text: raw.to_string(),
                    })?;
                section = header.split('.').map(|s| s.trim().to_string()).collect();
                // Touch the path so that empty sections still exist.
                let _ = node_at(&mut root, &section);
                continue;
            }

            let (key, value) = line.split_once('=').ok_or_else(|| ConfigError::MalformedLine {
                line: number + 1,
                text: raw.to_string(),
            })?;
            node_at(&mut root, &section).set(key.trim(), value.trim());
        }

        Ok(Self { root, dir: None })
    }

    /// Reads and parses a document from disk.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mut tree = Self::parse(&name, &text)?;
        tree.dir = path.parent().map(Path::to_path_buf);
        Ok(tree)
    }

    /// The root node holding top-level keys and sections.
    pub fn root(&self) -> &ConfigNode {
        &self.root
    }

    /// Renames the root node.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.root.name = name.into();
    }

    /// Directory the document was loaded from.
    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    /// Looks up a top-level section.
    pub fn section(&self, name: &str) -> Option<&ConfigNode> {
        self.root.child(name)
    }

    /// Resolves the section that `node[key]` refers to.
    ///
    /// A key with children is an inline section. A leaf value names a
    /// top-level section of this document if one exists, otherwise a
    /// separate document.
    pub fn resolve_section<'a>(
        &'a self,
        node: &'a ConfigNode,
        key: &str,
    ) -> Option<SectionRef<'a>> {
        let child = node.child(key)?;
        if child.is_section() {
            return Some(SectionRef::Inline(child));
        }
        let target = child.value.as_str();
        if target.is_empty() {
            return None;
        }
        Some(match self.section(target) {
            Some(section) => SectionRef::Named(section),
            None => SectionRef::External(target),
        })
    }
}

fn node_at<'a>(root: &'a mut ConfigNode, path: &[String]) -> &'a mut ConfigNode {
    let mut node = root;
    for segment in path {
        node = node.child_or_insert(segment);
    }
    node
}

#[cfg(test)]
mod tests {
    use super::*;

    const OBJECTS: &str = "\
# objects
version = 2
[object.0]
body = props/lamp
position = 1, 2, 3
[object.1]
rotation = 0, 0, 90
[object.1.body]
model = rock.obj
texture = rock.png,,rock-n.png
[props/lamp]
model = lamp.obj
mass = 0
";

    #[test]
    fn test_sections_nest_in_order() {
        let tree = ConfigTree::parse("objects.txt", OBJECTS).unwrap();
        let objects = tree.section("object").unwrap();
        let names: Vec<_> = objects.children().iter().map(ConfigNode::name).collect();
        assert_eq!(names, vec!["0", "1"]);
        assert_eq!(tree.root().get::<i32>("version"), Some(2));
    }

    #[test]
    fn test_typed_values() {
        let tree = ConfigTree::parse("objects.txt", OBJECTS).unwrap();
        let first = &tree.section("object").unwrap().children()[0];
        assert_eq!(first.get::<Vec3>("position"), Some(Vec3::new(1.0, 2.0, 3.0)));
        assert_eq!(first.get::<Vec3>("body"), None);
        assert!(first.require::<f32>("mass").is_err());

        let body = tree.section("object").unwrap().children()[1]
            .child("body")
            .unwrap();
        assert_eq!(
            body.get::<Vec<String>>("texture"),
            Some(vec!["rock.png".into(), "".into(), "rock-n.png".into()])
        );
    }

    #[test]
    fn test_section_references() {
        let tree = ConfigTree::parse("objects.txt", OBJECTS).unwrap();
        let objects = tree.section("object").unwrap();

        match tree.resolve_section(&objects.children()[0], "body") {
            Some(SectionRef::Named(section)) => assert_eq!(section.name(), "props/lamp"),
            other => panic!("unexpected {other:?}"),
        }
        match tree.resolve_section(&objects.children()[1], "body") {
            Some(SectionRef::Inline(section)) => assert_eq!(section.name(), "body"),
            other => panic!("unexpected {other:?}"),
        }

        let tree = ConfigTree::parse("o", "[object.0]\nbody = cones/cone\n").unwrap();
        let node = &tree.section("object").unwrap().children()[0];
        assert_eq!(
            tree.resolve_section(node, "body"),
            Some(SectionRef::External("cones/cone"))
        );
    }

    #[test]
    fn test_bool_and_errors() {
        let tree = ConfigTree::parse("t", "a = 1\nb = off\nc = maybe").unwrap();
        assert_eq!(tree.root().get::<bool>("a"), Some(true));
        assert_eq!(tree.root().get::<bool>("b"), Some(false));
        assert!(matches!(
            tree.root().try_get::<bool>("c"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            ConfigTree::parse("t", "[broken"),
            Err(ConfigError::MalformedSection { line: 1, .. })
        ));
        assert!(matches!(
            ConfigTree::parse("t", "\njust words"),
            Err(ConfigError::MalformedLine { line: 2, .. })
        ));
    }
}
