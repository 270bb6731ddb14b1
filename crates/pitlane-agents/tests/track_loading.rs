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

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use approx::assert_relative_eq;
use pitlane_agents::{LoadProgress, LoaderSettings, LoaderState, TrackLoadError, TrackLoader};
use pitlane_core::asset::AssetHandle;
use pitlane_core::math::{direction, Quaternion, PI};
use pitlane_core::physics::CollisionShape;
use pitlane_core::{Diagnostics, Severity};
use pitlane_data::{DrawLayer, PatchRef, RecordingWorld, TrackData};
use pitlane_io::ContentCache;
use tempfile::{tempdir, TempDir};

const TRACK_TXT: &str = "\
cull faces = 1
vertical tracking skyboxes = 1
start position 0 = 10, 0, 0
start orientation 0 = 0, 0, 0
start position 1 = 10, -6, 0
start orientation 1 = 0, 0, 10
";

const SURFACES_TXT: &str = "\
[surface-0]
Type = asphalt
BumpWaveLength = 10
BumpAmplitude = 0.01
FrictionNonTread = 0.9
FrictionTread = 1.0
RollResistanceCoefficient = 1.0
RollingDrag = 0.05
[surface-1]
Type = grass
BumpWaveLength = 2
BumpAmplitude = 0.05
FrictionNonTread = 0.6
FrictionTread = 0.7
RollResistanceCoefficient = 40
RollingDrag = 200
[surface-2]
Type = gravel
BumpWaveLength = 1
BumpAmplitude = 0.1
FrictionNonTread = 0.5
FrictionTread = 0.6
RollResistanceCoefficient = 60
RollingDrag = 300
";

const TRIANGLE_OBJ: &str = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";
const QUAD_OBJ: &str = "v 0 0 0\nv 2 0 0\nv 2 2 1\nv 0 2 1\nf 1 2 3 4\n";

/// A throw-away track package.
struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Result<Self> {
        let fixture = Self { dir: tempdir()? };
        fixture.write("track.txt", TRACK_TXT)?;
        fixture.write("surfaces.txt", SURFACES_TXT)?;
        Ok(fixture)
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn objects_dir(&self) -> PathBuf {
        self.path().join("objects")
    }

    fn write(&self, relative: &str, contents: impl AsRef<[u8]>) -> Result<()> {
        let path = self.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, contents)?;
        Ok(())
    }

    fn settings(&self) -> LoaderSettings {
        LoaderSettings::new(self.path())
    }
}

/// One 17-field legacy record.
fn record(model: &str, texture: &str, blend: i32, collide: i32, shadow: i32, surface: i32) -> String {
    format!("{model} {texture} 1 0 0 {blend} 0 0 1 {collide} 0 0 0 0 {shadow} 0 {surface}\n")
}

/// What a completed load left behind.
struct Loaded {
    track: TrackData,
    content: ContentCache,
    world: RecordingWorld,
    diagnostics: Diagnostics,
    objects: usize,
    steps: usize,
}

fn load_track(settings: LoaderSettings) -> Result<Loaded> {
    load_with(settings, ContentCache::new())
}

/// Loads one object per step until the loader reports completion.
fn load_with(settings: LoaderSettings, mut content: ContentCache) -> Result<Loaded> {
    let mut track = TrackData::new();
    let mut world = RecordingWorld::new();
    let mut loader = TrackLoader::new(settings, &mut track, &mut content, &mut world);
    loader.begin_load()?;
    let objects = loader.object_count();

    let mut steps = 0;
    while loader.continue_object_load()? == LoadProgress::InProgress {
        steps += 1;
    }
    assert_eq!(loader.state(), LoaderState::Finalized);
    let diagnostics = loader.into_diagnostics();

    Ok(Loaded {
        track,
        content,
        world,
        diagnostics,
        objects,
        steps,
    })
}

#[test]
fn test_legacy_record_builds_static_trimesh_on_its_surface() -> Result<()> {
    let fixture = Fixture::new()?;
    fixture.write("objects/wall.obj", TRIANGLE_OBJ)?;
    fixture.write("objects/wall.png", "png")?;
    let list = format!(
        "17\n{}{}",
        record("wall.obj", "wall.png", 0, 1, 0, 2),
        record("wall.obj", "wall.png", 0, 1, 0, 7)
    );
    fixture.write("objects/list.txt", list)?;

    let loaded = load_track(fixture.settings())?;
    assert!(loaded.track.loaded);
    assert_eq!(loaded.track.surfaces.len(), 3);

    let registered = loaded.world.registered();
    assert_eq!(registered.len(), 2);
    assert!(!registered[0].rigid);
    assert_eq!(registered[0].surface, Some(2));
    assert!(matches!(
        loaded.track.physics.shapes()[0],
        CollisionShape::TriangleMesh { surface: 2, .. }
    ));

    // Out of range surfaces fall back to the first one.
    assert_eq!(registered[1].surface, Some(0));
    assert!(loaded
        .diagnostics
        .contains(Severity::Warning, "references surface 7"));

    let drawables = loaded.track.static_node.drawlist.layer(DrawLayer::NormalNoBlend);
    assert_eq!(drawables.len(), 2);
    assert!(drawables[0].diffuse.is_some());
    assert!(drawables[0].cull);
    Ok(())
}

#[test]
fn test_object_without_mass_is_not_collidable() -> Result<()> {
    let fixture = Fixture::new()?;
    fixture.write("objects/rock.obj", QUAD_OBJ)?;
    fixture.write("objects/rock.png", "png")?;
    fixture.write(
        "objects/objects.txt",
        "[object.0]\nposition = 1, 2, 3\n[object.0.body]\nmodel = rock.obj\ntexture = rock.png\n",
    )?;

    let loaded = load_track(fixture.settings())?;
    assert!(loaded.world.registered().is_empty());
    assert!(loaded.track.physics.shapes().is_empty());
    assert!(loaded.track.physics.objects().is_empty());

    // An authored position gives the object its own node.
    assert_eq!(loaded.track.static_node.children().len(), 1);
    assert_eq!(loaded.track.static_node.drawable_count(), 1);
    Ok(())
}

#[test]
fn test_named_body_inherits_path_prefix() -> Result<()> {
    let fixture = Fixture::new()?;
    fixture.write("objects/props/lamp.obj", TRIANGLE_OBJ)?;
    fixture.write("objects/props/lamp.png", "png")?;
    fixture.write(
        "objects/objects.txt",
        "[object.0]\nbody = props/lamp\n[props/lamp]\nmodel = lamp.obj\ntexture = lamp.png,,\n",
    )?;

    let loaded = load_track(fixture.settings())?;
    let dir = fixture.objects_dir();
    assert!(loaded.content.get_model(&dir, "props/lamp.obj").is_some());

    let drawables = loaded.track.static_node.drawlist.layer(DrawLayer::NormalNoBlend);
    assert_eq!(drawables.len(), 1);
    let diffuse = drawables[0].diffuse.as_ref().expect("diffuse texture");
    assert_eq!(diffuse.path, dir.join("props/lamp.png"));
    assert!(drawables[0].misc1.is_none());
    assert!(drawables[0].misc2.is_none());
    assert!(loaded.track.static_node.children().is_empty());
    Ok(())
}

#[test]
fn test_external_body_file() -> Result<()> {
    let fixture = Fixture::new()?;
    fixture.write("objects/props/barrel.obj", QUAD_OBJ)?;
    fixture.write("objects/props/barrel.txt", "model = barrel.obj\nmass = 5\n")?;
    fixture.write(
        "objects/objects.txt",
        "[object.0]\nbody = props/barrel.txt\nposition = 0, 0, 2\n",
    )?;

    let loaded = load_track(fixture.settings())?;
    assert_eq!(loaded.world.rigid_body_count(), 1);
    assert_eq!(loaded.track.body_nodes.len(), 1);
    assert_eq!(loaded.track.dynamic_node.drawable_count(), 1);
    Ok(())
}

#[test]
fn test_shadow_objects_are_dropped_with_dynamic_shadows() -> Result<()> {
    let fixture = Fixture::new()?;
    fixture.write("objects/rock.obj", QUAD_OBJ)?;
    fixture.write("objects/shadow.obj", TRIANGLE_OBJ)?;
    fixture.write(
        "objects/objects.txt",
        "[object.0.body]\nmodel = shadow.obj\nisashadow = 1\nmass = 0\n\
         [object.1.body]\nmodel = rock.obj\n",
    )?;

    let mut settings = fixture.settings();
    settings.dynamic_shadows = true;
    let loaded = load_track(settings)?;
    assert_eq!(loaded.steps, 2);
    assert_eq!(loaded.track.static_node.drawable_count(), 1);
    assert!(loaded.world.registered().is_empty());

    let loaded = load_track(fixture.settings())?;
    assert_eq!(loaded.track.static_node.drawable_count(), 2);
    assert_eq!(loaded.world.static_object_count(), 1);
    Ok(())
}

#[test]
fn test_stepping_consumes_every_object_once() -> Result<()> {
    let fixture = Fixture::new()?;
    fixture.write("objects/a.obj", TRIANGLE_OBJ)?;
    fixture.write("objects/b.obj", QUAD_OBJ)?;
    let list = format!(
        "17\n# model texture ...\n{}# second\n{}{}\n{}",
        record("a.obj", "a.png", 0, 0, 0, 0),
        record("b.obj", "b.png", 1, 0, 0, 0),
        record("a.obj", "a.png", 0, 1, 0, 0),
        record("b.obj", "b.png", 2, 0, 0, 0),
    );
    fixture.write("objects/list.txt", list)?;

    let loaded = load_track(fixture.settings())?;
    assert_eq!(loaded.objects, 4);
    assert_eq!(loaded.steps, 4);
    assert_eq!(loaded.track.models.len(), 4);
    assert_eq!(loaded.track.static_node.drawable_count(), 4);
    assert_eq!(
        loaded
            .track
            .static_node
            .drawlist
            .layer(DrawLayer::NormalBlend)
            .len(),
        1
    );

    let fixture = Fixture::new()?;
    fixture.write("objects/a.obj", TRIANGLE_OBJ)?;
    fixture.write(
        "objects/objects.txt",
        "[object.0]\nbody = a\n[object.1]\nbody = a\nposition = 1, 0, 0\n\
         [object.2]\nbody = a\nrotation = 0, 0, 90\n[a]\nmodel = a.obj\n",
    )?;
    let loaded = load_track(fixture.settings())?;
    assert_eq!(loaded.objects, 3);
    assert_eq!(loaded.steps, 3);
    assert_eq!(loaded.track.static_node.drawable_count(), 3);
    assert_eq!(loaded.track.static_node.children().len(), 2);
    Ok(())
}

#[test]
fn test_batch_stepping_respects_objects_per_step() -> Result<()> {
    let fixture = Fixture::new()?;
    fixture.write("objects/a.obj", TRIANGLE_OBJ)?;
    let list = format!("17\n{}", record("a.obj", "a.png", 0, 0, 0, 0).repeat(3));
    fixture.write("objects/list.txt", list)?;

    let mut settings = fixture.settings();
    settings.objects_per_step = 2;
    let mut track = TrackData::new();
    let mut content = ContentCache::new();
    let mut world = RecordingWorld::new();
    let mut loader = TrackLoader::new(settings, &mut track, &mut content, &mut world);

    assert!(matches!(
        loader.continue_load(),
        Err(TrackLoadError::InvalidState(LoaderState::Idle))
    ));
    loader.begin_load()?;
    assert_eq!(loader.state(), LoaderState::ObjectLoadBegun);

    assert_eq!(loader.continue_load()?, LoadProgress::InProgress);
    assert_eq!(loader.objects_processed(), 2);
    assert_eq!(loader.state(), LoaderState::ObjectLoadInProgress);

    assert_eq!(loader.continue_load()?, LoadProgress::Complete);
    assert_eq!(loader.objects_processed(), 3);
    assert_eq!(loader.state(), LoaderState::Finalized);
    assert_eq!(loader.continue_load()?, LoadProgress::Complete);
    drop(loader);

    assert!(track.loaded);
    assert_eq!(track.static_node.drawable_count(), 3);
    Ok(())
}

#[test]
fn test_aggressive_combining_sums_vertices() -> Result<()> {
    let fixture = Fixture::new()?;
    fixture.write("objects/tri.obj", TRIANGLE_OBJ)?;
    fixture.write("objects/quad.obj", QUAD_OBJ)?;
    fixture.write("objects/shared.png", "png")?;
    fixture.write("objects/other.png", "png")?;
    let list = format!(
        "17\n{}{}{}{}",
        record("tri.obj", "shared.png", 0, 1, 0, 1),
        record("quad.obj", "shared.png", 0, 1, 0, 1),
        record("tri.obj", "other.png", 0, 1, 0, 0),
        record("quad.obj", "shared.png", 0, 1, 0, 1),
    );
    fixture.write("objects/list.txt", list)?;

    let mut settings = fixture.settings();
    settings.aggressive_combining = true;
    let loaded = load_track(settings.clone())?;
    let dir = fixture.objects_dir();

    assert_eq!(loaded.steps, 4);
    let shared = loaded.content.get_model(&dir, "shared.png").expect("combined model");
    assert_eq!(shared.vertex_array().vertex_count(), 3 + 4 + 4);
    assert_eq!(shared.vertex_array().triangle_count(), 1 + 2 + 2);
    let other = loaded.content.get_model(&dir, "other.png").expect("combined model");
    assert_eq!(other.vertex_array().vertex_count(), 3);

    assert_eq!(loaded.track.models.len(), 2);
    assert_eq!(loaded.track.static_node.drawable_count(), 2);
    assert_eq!(loaded.world.static_object_count(), 2);
    assert_eq!(loaded.content.models_parsed(), 2);

    // A second session reuses the stored combined models as they are.
    let again = load_with(settings, loaded.content)?;
    assert_eq!(again.content.models_parsed(), 2);
    let reused = again.content.get_model(&dir, "shared.png").expect("combined model");
    assert!(AssetHandle::ptr_eq(&shared, &reused));
    assert_eq!(reused.vertex_array().vertex_count(), 11);
    assert_eq!(again.track.static_node.drawable_count(), 2);
    Ok(())
}

#[test]
fn test_shared_model_is_parsed_once() -> Result<()> {
    let fixture = Fixture::new()?;
    fixture.write("objects/rock.obj", QUAD_OBJ)?;
    fixture.write(
        "objects/objects.txt",
        "[object.0]\nbody = small\n[object.1]\nbody = large\n\
         [small]\nmodel = rock.obj\n[large]\nmodel = rock.obj\nmass = 0\n",
    )?;

    let loaded = load_track(fixture.settings())?;
    assert_eq!(loaded.content.models_parsed(), 1);
    assert_eq!(loaded.track.models.len(), 2);
    assert!(AssetHandle::ptr_eq(
        &loaded.track.models[0],
        &loaded.track.models[1]
    ));
    Ok(())
}

#[test]
fn test_reversed_start_grid() -> Result<()> {
    let fixture = Fixture::new()?;
    fixture.write("objects/list.txt", "17\n")?;

    let forward = load_track(fixture.settings())?;
    let mut settings = fixture.settings();
    settings.reverse = true;
    let reversed = load_track(settings)?;

    assert!(reversed.track.reverse);
    let forward = &forward.track.start_positions;
    let reversed = &reversed.track.start_positions;
    assert_eq!(forward.len(), 2);
    assert_eq!(reversed.len(), 2);

    let turn = Quaternion::from_axis_angle(direction::UP, PI);
    for (fwd, rev) in forward.iter().zip(reversed.iter().rev()) {
        assert_eq!(fwd.position, rev.position);
        assert!(rev.orientation.same_rotation(turn * fwd.orientation, 1e-5));
    }
    Ok(())
}

#[test]
fn test_missing_track_config_aborts_load() -> Result<()> {
    let fixture = Fixture::new()?;
    fs::remove_file(fixture.path().join("track.txt"))?;
    fixture.write("objects/list.txt", "17\n")?;

    let mut track = TrackData::new();
    let mut content = ContentCache::new();
    let mut world = RecordingWorld::new();
    let mut loader = TrackLoader::new(fixture.settings(), &mut track, &mut content, &mut world);

    assert!(matches!(
        loader.begin_load(),
        Err(TrackLoadError::TrackConfig { .. })
    ));
    assert_eq!(loader.state(), LoaderState::Failed);
    assert!(matches!(loader.continue_load(), Err(TrackLoadError::Aborted)));
    assert!(matches!(loader.begin_load(), Err(TrackLoadError::Aborted)));
    assert!(loader.diagnostics().contains(Severity::Error, "track.txt"));
    drop(loader);

    assert!(!track.loaded);
    Ok(())
}

#[test]
fn test_object_without_body_aborts_load() -> Result<()> {
    let fixture = Fixture::new()?;
    fixture.write("objects/rock.obj", QUAD_OBJ)?;
    fixture.write(
        "objects/objects.txt",
        "[object.0.body]\nmodel = rock.obj\n[object.1]\nposition = 0, 0, 0\n",
    )?;

    let mut track = TrackData::new();
    let mut content = ContentCache::new();
    let mut world = RecordingWorld::new();
    let mut loader = TrackLoader::new(fixture.settings(), &mut track, &mut content, &mut world);
    loader.begin_load()?;

    assert_eq!(loader.continue_object_load()?, LoadProgress::InProgress);
    let err = loader.continue_object_load().unwrap_err();
    assert!(matches!(err, TrackLoadError::MissingBody { ref object } if object == "1"));
    assert_eq!(loader.state(), LoaderState::Failed);
    assert!(matches!(
        loader.continue_object_load(),
        Err(TrackLoadError::Aborted)
    ));
    drop(loader);

    // Objects committed before the failure stay, unpublished.
    assert!(!track.loaded);
    assert_eq!(track.static_node.drawable_count(), 1);
    Ok(())
}

#[test]
fn test_missing_surfaces_and_roads_are_recoverable() -> Result<()> {
    let fixture = Fixture::new()?;
    fs::remove_file(fixture.path().join("surfaces.txt"))?;
    fixture.write("objects/list.txt", "17\n")?;

    let loaded = load_track(fixture.settings())?;
    assert!(loaded.track.loaded);
    assert_eq!(loaded.objects, 0);
    assert_eq!(loaded.track.surfaces.len(), 1);
    assert!(loaded.track.roads.is_empty());
    assert!(loaded
        .diagnostics
        .contains(Severity::Info, "No Surfaces File"));
    assert!(loaded
        .diagnostics
        .contains(Severity::Error, "Error during road loading"));
    assert!(loaded
        .diagnostics
        .contains(Severity::Info, "No lap sequence found"));
    Ok(())
}

#[test]
fn test_massive_objects_are_simulated_or_frozen() -> Result<()> {
    let fixture = Fixture::new()?;
    fixture.write("objects/crate.obj", QUAD_OBJ)?;
    fixture.write(
        "objects/objects.txt",
        "[object.0]\nbody = crate\nposition = 0, 0, 5\n[crate]\nmodel = crate.obj\nmass = 20\n",
    )?;

    let loaded = load_track(fixture.settings())?;
    assert_eq!(loaded.world.rigid_body_count(), 1);
    assert_eq!(loaded.track.physics.motion_states().len(), 1);
    assert_eq!(loaded.track.body_nodes.len(), 1);
    assert_eq!(loaded.track.dynamic_node.drawable_count(), 1);

    let mut settings = fixture.settings();
    settings.dynamic_objects = false;
    let loaded = load_track(settings)?;
    assert_eq!(loaded.world.rigid_body_count(), 0);
    assert_eq!(loaded.world.static_object_count(), 1);
    assert!(loaded.track.body_nodes.is_empty());
    assert_eq!(loaded.track.static_node.children().len(), 1);
    Ok(())
}

#[test]
fn test_compound_track_shape_gathers_static_collidables() -> Result<()> {
    let fixture = Fixture::new()?;
    fixture.write("objects/wall.obj", TRIANGLE_OBJ)?;
    let list = format!(
        "17\n{}{}{}",
        record("wall.obj", "wall.png", 0, 1, 0, 0),
        record("wall.obj", "wall.png", 0, 1, 0, 1),
        record("wall.obj", "wall.png", 0, 0, 0, 0),
    );
    fixture.write("objects/list.txt", list)?;

    let mut settings = fixture.settings();
    settings.compound_track_shape = true;
    let loaded = load_track(settings)?;

    assert_eq!(loaded.world.static_object_count(), 1);
    match loaded.track.physics.shapes().last() {
        Some(CollisionShape::Compound { children }) => assert_eq!(children.len(), 2),
        other => panic!("expected the compound track shape, got {other:?}"),
    }
    Ok(())
}

/// A closed ring of `n` flat patches, written in the roads file format.
fn ring_roads(n: usize) -> String {
    let step = 2.0 * PI / n as f32;
    let mut text = format!("1\n{n}\n");
    for k in 0..n {
        for i in 0..4 {
            let angle = (k as f32 + 1.0 - i as f32 / 3.0) * step;
            for j in 0..4 {
                let radius = 50.0 + j as f32 * 10.0 / 3.0;
                text.push_str(&format!(
                    "{} {} 0\n",
                    radius * angle.cos(),
                    radius * angle.sin()
                ));
            }
        }
    }
    text
}

#[test]
fn test_ring_track_lap_and_racing_line() -> Result<()> {
    let fixture = Fixture::new()?;
    fixture.write(
        "track.txt",
        format!("{TRACK_TXT}lap sequences = 1\nlap sequence 0 = 0, 2\n"),
    )?;
    fixture.write("roads.trk", ring_roads(8))?;
    fixture.write("textures/racingline.png", "png")?;
    fixture.write("objects/list.txt", "17\n")?;

    let loaded = load_track(fixture.settings())?;
    let track = &loaded.track;
    assert_eq!(track.roads.len(), 1);
    assert!(track.roads[0].is_closed());
    assert_eq!(track.lap, vec![PatchRef::new(0, 2)]);

    let patches = track.roads[0].patches();
    assert_relative_eq!(patches[2].dist_from_start, 0.0);
    let mut current = 2;
    let mut last = -1.0;
    for _ in 0..patches.len() {
        assert!(patches[current].dist_from_start > last);
        last = patches[current].dist_from_start;
        current = patches[current].next_patch.expect("closed ring");
    }
    assert_eq!(current, 2);

    assert!(patches.iter().all(|p| p.racing_line.is_some()));
    assert!(track.racingline_texture.is_some());
    assert_eq!(track.racingline_node.drawlist.len(), 1);
    Ok(())
}

/// A JPK archive holding `entries`.
fn archive(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let max_name_len = 32usize;
    let mut bytes = b"JPK01.00".to_vec();
    bytes.extend_from_slice(&(entries.len() as u32).to_le_bytes());
    bytes.extend_from_slice(&(max_name_len as u32).to_le_bytes());
    let mut offset = bytes.len() + entries.len() * (8 + max_name_len);
    for (name, data) in entries {
        bytes.extend_from_slice(&(offset as u32).to_le_bytes());
        bytes.extend_from_slice(&(data.len() as u32).to_le_bytes());
        let mut padded = name.as_bytes().to_vec();
        padded.resize(max_name_len, 0);
        bytes.extend_from_slice(&padded);
        offset += data.len();
    }
    for (_, data) in entries {
        bytes.extend_from_slice(data);
    }
    bytes
}

#[test]
fn test_models_load_from_object_archive() -> Result<()> {
    let fixture = Fixture::new()?;
    fixture.write(
        "objects/objects.jpk",
        archive(&[("packed.obj", QUAD_OBJ.as_bytes())]),
    )?;
    fixture.write(
        "objects/list.txt",
        format!("17\n{}", record("packed.obj", "packed.png", 0, 0, 0, 0)),
    )?;

    let loaded = load_track(fixture.settings())?;
    assert_eq!(loaded.track.models.len(), 1);
    assert!(loaded
        .content
        .get_model(&fixture.objects_dir(), "packed.obj")
        .is_some());
    assert_eq!(loaded.track.static_node.drawable_count(), 1);
    Ok(())
}

#[test]
fn test_malformed_archive_is_ignored() -> Result<()> {
    let fixture = Fixture::new()?;
    let mut header = b"JPK01.00".to_vec();
    header.extend_from_slice(&u32::MAX.to_le_bytes());
    header.extend_from_slice(&16u32.to_le_bytes());
    fixture.write("objects/objects.jpk", header)?;
    fixture.write("objects/loose.obj", TRIANGLE_OBJ)?;
    fixture.write(
        "objects/list.txt",
        format!("17\n{}", record("loose.obj", "loose.png", 0, 0, 0, 0)),
    )?;

    let loaded = load_track(fixture.settings())?;
    assert!(loaded.track.loaded);
    assert!(loaded
        .diagnostics
        .contains(Severity::Warning, "Ignoring object archive"));
    assert_eq!(loaded.track.static_node.drawable_count(), 1);
    Ok(())
}
