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

//! Explicit collision shape descriptions.
//!
//! ```text
//! [crate.shape]
//! type = box
//! size = 1, 1, 1
//!
//! [barrel.shape.0]
//! type = capsule
//! radius = 0.3
//! height = 0.6
//! center = 0, 0, 0.4
//! rotation = 90, 0, 0
//! ```

use pitlane_core::math::{degrees_to_radians, Quaternion, Vec3};
use pitlane_core::physics::{CollisionShape, CompoundChild, Isometry};
use pitlane_io::ConfigNode;

use crate::error::ShapeError;

/// Reads the shape description of a body section, if one is authored.
///
/// Each primitive is placed at its authored `center` and `rotation`, shifted
/// by `offset`. A single primitive at the origin is returned as is, anything
/// else becomes a compound.
pub fn load_collision_shape(
    section: &ConfigNode,
    offset: Vec3,
) -> Result<Option<CollisionShape>, ShapeError> {
    let Some(shape) = section.child("shape") else {
        return Ok(None);
    };

    let descriptions: Vec<&ConfigNode> = if shape.has("type") {
        vec![shape]
    } else {
        shape.children().iter().filter(|c| c.is_section()).collect()
    };

    let mut children = descriptions
        .into_iter()
        .map(|desc| load_child(desc, offset))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(match children.len() {
        0 => None,
        1 if children[0].transform.is_identity() => children.pop().map(|c| c.shape),
        _ => Some(CollisionShape::Compound { children }),
    })
}

fn load_child(desc: &ConfigNode, offset: Vec3) -> Result<CompoundChild, ShapeError> {
    let kind: String = desc.require("type")?;
    let shape = match kind.to_ascii_lowercase().as_str() {
        "box" => {
            let size: Vec3 = desc.require("size")?;
            if size.x <= 0.0 || size.y <= 0.0 || size.z <= 0.0 {
                return Err(ShapeError::NonPositive {
                    shape: "box",
                    parameter: "size",
                });
            }
            CollisionShape::Box {
                half_extents: size * 0.5,
            }
        }
        "sphere" => CollisionShape::Sphere {
            radius: positive(desc, "sphere", "radius")?,
        },
        "capsule" => CollisionShape::Capsule {
            radius: positive(desc, "capsule", "radius")?,
            half_height: positive(desc, "capsule", "height")? * 0.5,
        },
        _ => return Err(ShapeError::UnknownType(kind)),
    };

    let center: Vec3 = desc.try_get("center")?.unwrap_or(Vec3::ZERO);
    let angles: Vec3 = desc.try_get("rotation")?.unwrap_or(Vec3::ZERO);
    let rotation = Quaternion::from_euler_zyx(
        degrees_to_radians(angles.x),
        degrees_to_radians(angles.y),
        degrees_to_radians(angles.z),
    );

    Ok(CompoundChild {
        transform: Isometry::new(center + offset, rotation),
        shape,
    })
}

fn positive(desc: &ConfigNode, shape: &'static str, parameter: &'static str) -> Result<f32, ShapeError> {
    let value: f32 = desc.require(parameter)?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(ShapeError::NonPositive { shape, parameter })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pitlane_io::ConfigTree;

    fn body(text: &str) -> ConfigTree {
        ConfigTree::parse("body", text).unwrap()
    }

    #[test]
    fn test_no_description() {
        let tree = body("mass = 10\n");
        assert!(load_collision_shape(tree.root(), Vec3::ZERO).unwrap().is_none());
    }

    #[test]
    fn test_single_box_at_origin() {
        let tree = body("[shape]\ntype = box\nsize = 2, 4, 6\n");
        let shape = load_collision_shape(tree.root(), Vec3::ZERO).unwrap();
        assert_eq!(
            shape,
            Some(CollisionShape::Box {
                half_extents: Vec3::new(1.0, 2.0, 3.0)
            })
        );
    }

    #[test]
    fn test_offset_turns_single_shape_into_compound() {
        let tree = body("[shape]\ntype = sphere\nradius = 0.5\n");
        let shape = load_collision_shape(tree.root(), Vec3::new(0.0, 0.0, -1.0)).unwrap();
        match shape {
            Some(CollisionShape::Compound { children }) => {
                assert_eq!(children.len(), 1);
                assert_relative_eq!(children[0].transform.translation.z, -1.0);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_several_children() {
        let tree = body(
            "[shape.0]\ntype = box\nsize = 1, 1, 1\n\
             [shape.1]\ntype = capsule\nradius = 0.25\nheight = 1\ncenter = 0, 0, 1\n",
        );
        match load_collision_shape(tree.root(), Vec3::ZERO).unwrap() {
            Some(CollisionShape::Compound { children }) => {
                assert_eq!(children.len(), 2);
                assert_eq!(
                    children[1].shape,
                    CollisionShape::Capsule {
                        half_height: 0.5,
                        radius: 0.25
                    }
                );
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_invalid_descriptions() {
        let tree = body("[shape]\ntype = cone\n");
        assert!(matches!(
            load_collision_shape(tree.root(), Vec3::ZERO),
            Err(ShapeError::UnknownType(_))
        ));
        let tree = body("[shape]\ntype = sphere\nradius = 0\n");
        assert!(matches!(
            load_collision_shape(tree.root(), Vec3::ZERO),
            Err(ShapeError::NonPositive { parameter: "radius", .. })
        ));
        let tree = body("[shape]\ntype = box\n");
        assert!(matches!(
            load_collision_shape(tree.root(), Vec3::ZERO),
            Err(ShapeError::Config(_))
        ));
    }
}
