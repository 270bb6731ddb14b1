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

//! The two object sources of a track package.
//!
//! A track either describes its objects in a config tree (`objects.txt`,
//! one `object.N` section per object) or in the legacy flat list
//! (`list.txt`, fixed-width records). The source is chosen once when the
//! object load begins and then drained one object per step.

use std::path::Path;

use pitlane_core::asset::AssetHandle;
use pitlane_core::Diagnostics;
use pitlane_io::object_list::count_objects_in;
use pitlane_io::{
    ConfigNode, ConfigTree, ContentCache, ContentError, LegacyObject, LegacyParams, ObjectList,
    ObjectListError,
};

use super::error::TrackLoadError;
use super::settings::{LIST_FILE, OBJECTS_FILE};

/// Section of the object tree holding one child section per object.
const OBJECT_SECTION: &str = "object";

/// One object section of an object tree.
#[derive(Debug, Clone)]
pub(crate) struct ObjectRef {
    tree: AssetHandle<ConfigTree>,
    index: usize,
}

impl ObjectRef {
    /// The document the object lives in.
    pub(crate) fn tree(&self) -> &ConfigTree {
        &self.tree
    }

    /// The object section.
    pub(crate) fn node(&self) -> Option<&ConfigNode> {
        self.tree
            .section(OBJECT_SECTION)?
            .children()
            .get(self.index)
    }
}

/// The next unit of work of a source.
#[derive(Debug)]
pub(crate) enum NextObject {
    /// An object section of the tree.
    Node(ObjectRef),
    /// A record of the legacy list.
    Record(LegacyObject),
}

#[derive(Debug)]
pub(crate) struct ObjectTree {
    tree: AssetHandle<ConfigTree>,
    sections: Vec<usize>,
    next: usize,
}

#[derive(Debug)]
pub(crate) struct ObjectListSource {
    list: ObjectList,
    count: usize,
}

/// The object source of a load.
#[derive(Debug)]
pub(crate) enum ObjectSource {
    Tree(ObjectTree),
    List(ObjectListSource),
}

impl ObjectSource {
    /// Probes for an object tree in `dir` and falls back to the object list.
    ///
    /// The list is scanned once up front to count its records.
    pub(crate) fn open(
        dir: &Path,
        params: LegacyParams,
        content: &mut ContentCache,
        diagnostics: &mut Diagnostics,
    ) -> Result<Self, TrackLoadError> {
        match content.load_config(dir, OBJECTS_FILE) {
            Ok(tree) => {
                if let Some(objects) = tree.section(OBJECT_SECTION) {
                    let sections = objects
                        .children()
                        .iter()
                        .enumerate()
                        .filter(|(_, node)| node.is_section())
                        .map(|(index, _)| index)
                        .collect();
                    return Ok(Self::Tree(ObjectTree {
                        tree,
                        sections,
                        next: 0,
                    }));
                }
                log::debug!("{OBJECTS_FILE} has no {OBJECT_SECTION} section");
            }
            Err(ContentError::NotFound(_)) => {}
            Err(err) => diagnostics.warn(format!("Ignoring object tree: {err}")),
        }

        let path = dir.join(LIST_FILE);
        if !path.is_file() {
            return Err(TrackLoadError::NoObjectSource(dir.to_path_buf()));
        }
        let count = count_objects_in(&path)?;
        let list = ObjectList::open(&path, params)?;
        Ok(Self::List(ObjectListSource { list, count }))
    }

    /// Number of objects the source holds.
    pub(crate) fn len(&self) -> usize {
        match self {
            Self::Tree(tree) => tree.sections.len(),
            Self::List(list) => list.count,
        }
    }

    /// Returns `true` for the legacy object list.
    pub(crate) fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }

    /// Takes the next object, `None` once the source is drained.
    pub(crate) fn next_object(&mut self) -> Result<Option<NextObject>, ObjectListError> {
        match self {
            Self::Tree(tree) => {
                let Some(&index) = tree.sections.get(tree.next) else {
                    return Ok(None);
                };
                tree.next += 1;
                Ok(Some(NextObject::Node(ObjectRef {
                    tree: tree.tree.clone(),
                    index,
                })))
            }
            Self::List(list) => Ok(list.list.next_object()?.map(NextObject::Record)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_tree_takes_precedence() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(OBJECTS_FILE),
            "[object.a]\nbody = rock\n[object.b]\nbody = tree\n[rock]\nmodel = rock.obj\n",
        )
        .unwrap();
        fs::write(dir.path().join(LIST_FILE), "17\n").unwrap();

        let mut content = ContentCache::new();
        let mut diagnostics = Diagnostics::new();
        let mut source =
            ObjectSource::open(dir.path(), LegacyParams::default(), &mut content, &mut diagnostics)
                .unwrap();
        assert!(!source.is_list());
        assert_eq!(source.len(), 2);

        let mut names = Vec::new();
        while let Some(NextObject::Node(object)) = source.next_object().unwrap() {
            names.push(object.node().unwrap().name().to_string());
        }
        assert_eq!(names, ["a", "b"]);
    }

    #[test]
    fn test_list_fallback_counts_records() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(OBJECTS_FILE),
            "# no objects here\nversion = 1\n",
        )
        .unwrap();
        fs::write(
            dir.path().join(LIST_FILE),
            "17\n# wall\nwall.obj wall.png 1 0 0 0 0 0 1 1 0 0 0 0 0 0 0\n\
             tree.obj tree.png 1 0 0 1 0 0 0 0 0 0 0 0 0 0 0\n",
        )
        .unwrap();

        let mut content = ContentCache::new();
        let mut diagnostics = Diagnostics::new();
        let mut source =
            ObjectSource::open(dir.path(), LegacyParams::default(), &mut content, &mut diagnostics)
                .unwrap();
        assert!(source.is_list());
        assert_eq!(source.len(), 2);

        let mut models = Vec::new();
        while let Some(NextObject::Record(object)) = source.next_object().unwrap() {
            models.push(object.model);
        }
        assert_eq!(models, ["wall.obj", "tree.obj"]);
    }

    #[test]
    fn test_no_source() {
        let dir = tempfile::tempdir().unwrap();
        let mut content = ContentCache::new();
        let mut diagnostics = Diagnostics::new();
        let result =
            ObjectSource::open(dir.path(), LegacyParams::default(), &mut content, &mut diagnostics);
        assert!(matches!(result, Err(TrackLoadError::NoObjectSource(_))));
    }

    #[test]
    fn test_short_header_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(LIST_FILE), "9\na b c d e f g h i\n").unwrap();
        let mut content = ContentCache::new();
        let mut diagnostics = Diagnostics::new();
        let result =
            ObjectSource::open(dir.path(), LegacyParams::default(), &mut content, &mut diagnostics);
        assert!(matches!(
            result,
            Err(TrackLoadError::ObjectList(ObjectListError::TooFewParams { found: 9, .. }))
        ));
    }
}
