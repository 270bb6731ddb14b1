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

//! The incremental track loader.

use std::path::Path;

use pitlane_core::asset::AssetHandle;
use pitlane_core::math::{degrees_to_radians, Quaternion, Vec3};
use pitlane_core::physics::CollisionWorld;
use pitlane_core::Diagnostics;
use pitlane_data::{Model, Surface, TextureInfo, TrackData};
use pitlane_io::{
    roads, surfaces, BezierStripReader, ConfigTree, ContentCache, JpkArchive, LegacyObject,
    RoadStripReader, SectionRef,
};
use pitlane_lanes::{
    load_lap_sections, load_start_positions, resolve_model, BodyBuilder, BodyContext, BodyOptions,
    CenterlineSolver, CollisionIntegrator, Placement, RacingLineBuilder, RacingLineSolver,
};

use super::combine::CombiningMap;
use super::error::TrackLoadError;
use super::settings::{
    LoaderSettings, PACK_FILE, RACINGLINE_TEXTURE, ROADS_FILE, SURFACES_FILE, TRACK_FILE,
};
use super::source::{NextObject, ObjectRef, ObjectSource};

/// Where a loader is in the load sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderState {
    /// Nothing loaded yet.
    Idle,
    /// The surface table is populated.
    SurfacesLoaded,
    /// Road strips are read, or cleared after a road error.
    RoadsLoaded,
    /// Track metadata, start grid and lap sectors are resolved.
    LapDataReady,
    /// The object source is open, no object loaded yet.
    ObjectLoadBegun,
    /// At least one object has been loaded.
    ObjectLoadInProgress,
    /// Merged legacy objects are being committed.
    Combining,
    /// The track is complete and published.
    Finalized,
    /// A fatal error occurred. The load must be discarded.
    Failed,
}

/// Outcome of a successful load step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadProgress {
    /// More objects remain; call again.
    InProgress,
    /// The track is loaded.
    Complete,
}

/// Collaborators shared by every object of a pass.
struct LoadEnv<'b> {
    content: &'b mut ContentCache,
    track: &'b mut TrackData,
    world: &'b mut dyn CollisionWorld,
    diagnostics: &'b mut Diagnostics,
}

/// Parse state of one object pass. Dropping it discards the open source
/// and the combining map; objects already committed stay in the track.
struct ObjectPass {
    source: ObjectSource,
    pack: Option<JpkArchive>,
    bodies: BodyBuilder,
    integrator: CollisionIntegrator,
    combined: CombiningMap,
    combining: bool,
}

impl ObjectPass {
    fn load_node(&mut self, object: &ObjectRef, env: &mut LoadEnv<'_>) -> Result<(), TrackLoadError> {
        let Some(node) = object.node() else {
            return Ok(());
        };
        let object_name = node.name().to_string();

        let external;
        let (section, body_name, inline) = match object.tree().resolve_section(node, "body") {
            None => return Err(TrackLoadError::MissingBody { object: object_name }),
            Some(SectionRef::Inline(section)) => (section, format!("object.{object_name}.body"), true),
            Some(SectionRef::Named(section)) => (section, section.name().to_string(), false),
            Some(SectionRef::External(file)) => {
                external = env
                    .content
                    .load_config(&self.bodies.options().objects_dir, file)
                    .map_err(|source| TrackLoadError::BodyFile {
                        object: object_name.clone(),
                        body: file.to_string(),
                        source,
                    })?;
                (external.root(), file.to_string(), false)
            }
        };

        let mut ctx = BodyContext {
            content: &mut *env.content,
            pack: self.pack.as_mut(),
            track: &mut *env.track,
            diagnostics: &mut *env.diagnostics,
        };
        let body = self
            .bodies
            .build(section, &body_name, inline, &mut ctx)
            .map_err(|source| TrackLoadError::Shape {
                body: body_name.clone(),
                source,
            })?;
        let Some(body) = body else {
            return Ok(());
        };

        let placement_error = |source| TrackLoadError::Placement {
            object: object_name.clone(),
            source,
        };
        let position: Option<Vec3> = node.try_get("position").map_err(placement_error)?;
        let angles: Option<Vec3> = node.try_get("rotation").map_err(placement_error)?;

        let instanced = position.is_some() || angles.is_some();
        let angles = angles.unwrap_or(Vec3::ZERO);
        let placement = Placement {
            position: position.unwrap_or(Vec3::ZERO),
            rotation: Quaternion::from_euler_zyx(
                degrees_to_radians(angles.x),
                degrees_to_radians(angles.y),
                degrees_to_radians(angles.z),
            ),
            instanced,
        };
        self.integrator
            .integrate(&body, placement, env.track, env.world);
        Ok(())
    }

    fn load_record(&mut self, object: LegacyObject, env: &mut LoadEnv<'_>) {
        if self.bodies.options().dynamic_shadows && object.isashadow {
            return;
        }

        let dir = self.bodies.options().objects_dir.clone();
        let mut ctx = BodyContext {
            content: &mut *env.content,
            pack: self.pack.as_mut(),
            track: &mut *env.track,
            diagnostics: &mut *env.diagnostics,
        };
        let Some(model) = resolve_model(&dir, &object.model, &mut ctx) else {
            env.diagnostics
                .info(format!("Failed to load object model {}", object.model));
            return;
        };

        if self.combining {
            self.combined.add(object, &model, &dir, env.content);
        } else {
            self.add_object(object, model, env);
        }
    }

    fn add_object(&mut self, object: LegacyObject, model: AssetHandle<Model>, env: &mut LoadEnv<'_>) {
        env.track.models.push(model.clone());
        let mut ctx = BodyContext {
            content: &mut *env.content,
            pack: self.pack.as_mut(),
            track: &mut *env.track,
            diagnostics: &mut *env.diagnostics,
        };
        let body = self.bodies.build_legacy(&object, model, &mut ctx);
        self.integrator
            .integrate(&body, Placement::default(), env.track, env.world);
    }

    /// Commits merged objects and the compound track shape.
    fn finish(&mut self, env: &mut LoadEnv<'_>) {
        let dir = self.bodies.options().objects_dir.clone();
        let combined: Vec<_> = self.combined.drain().collect();
        for (texture, entry) in combined {
            let model = match entry.cached {
                Some(model) => model,
                None => env.content.store_model(&dir, &texture, entry.mesh),
            };
            self.add_object(entry.object, model, env);
        }
        self.integrator.finish(env.track, env.world);
    }
}

/// Loads a track package into a [`TrackData`] and a collision world.
///
/// The track must not be read by anyone else until [`TrackData::loaded`] is
/// set. A failed or cleared load leaves everything committed so far in the
/// track; the caller discards it.
pub struct TrackLoader<'a> {
    settings: LoaderSettings,
    track: &'a mut TrackData,
    content: &'a mut ContentCache,
    world: &'a mut dyn CollisionWorld,
    diagnostics: Diagnostics,
    road_reader: Box<dyn RoadStripReader>,
    solver: Box<dyn RacingLineSolver>,
    state: LoaderState,
    pass: Option<ObjectPass>,
    total: usize,
    processed: usize,
}

impl<'a> TrackLoader<'a> {
    /// Creates a loader with the bezier road reader and the centerline
    /// racing line solver.
    pub fn new(
        settings: LoaderSettings,
        track: &'a mut TrackData,
        content: &'a mut ContentCache,
        world: &'a mut dyn CollisionWorld,
    ) -> Self {
        Self {
            settings,
            track,
            content,
            world,
            diagnostics: Diagnostics::new(),
            road_reader: Box::new(BezierStripReader),
            solver: Box::new(CenterlineSolver::default()),
            state: LoaderState::Idle,
            pass: None,
            total: 0,
            processed: 0,
        }
    }

    /// Replaces the road strip reader.
    pub fn with_road_reader(mut self, reader: impl RoadStripReader + 'static) -> Self {
        self.road_reader = Box::new(reader);
        self
    }

    /// Replaces the racing line solver.
    pub fn with_racing_line_solver(mut self, solver: impl RacingLineSolver + 'static) -> Self {
        self.solver = Box::new(solver);
        self
    }

    /// The settings of this load.
    pub fn settings(&self) -> &LoaderSettings {
        &self.settings
    }

    /// Current position in the load sequence.
    pub fn state(&self) -> LoaderState {
        self.state
    }

    /// Everything reported so far.
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Consumes the loader, returning its diagnostics.
    pub fn into_diagnostics(self) -> Diagnostics {
        self.diagnostics
    }

    /// Number of objects in the object source.
    pub fn object_count(&self) -> usize {
        self.total
    }

    /// Number of objects consumed so far, skipped ones included.
    pub fn objects_processed(&self) -> usize {
        self.processed
    }

    /// Runs every eager stage and opens the object source.
    ///
    /// Missing surfaces and unreadable roads are reported and worked around.
    /// A missing track config, bad start or lap data and a missing or
    /// malformed object source fail the load.
    pub fn begin_load(&mut self) -> Result<(), TrackLoadError> {
        match self.state {
            LoaderState::Idle => {}
            LoaderState::Failed => return Err(TrackLoadError::Aborted),
            state => return Err(TrackLoadError::InvalidState(state)),
        }
        let result = self.run_eager_stages();
        if let Err(err) = &result {
            self.fail(err);
        }
        result
    }

    fn run_eager_stages(&mut self) -> Result<(), TrackLoadError> {
        let track_path = self.settings.track_path.clone();
        self.diagnostics
            .info(format!("Loading track from path: {}", track_path.display()));
        self.track.reverse = self.settings.reverse;

        self.load_surfaces(&track_path);
        self.state = LoaderState::SurfacesLoaded;

        self.load_roads(&track_path);
        self.state = LoaderState::RoadsLoaded;

        self.create_racing_lines();

        let info_path = track_path.join(TRACK_FILE);
        let info = ConfigTree::load(&info_path).map_err(|source| TrackLoadError::TrackConfig {
            path: info_path,
            source,
        })?;
        let info = info.root();
        if let Some(vertical) = info.get::<bool>("vertical tracking skyboxes") {
            self.track.vertical_tracking_skyboxes = vertical;
        }
        if let Some(cull) = info.get::<bool>("cull faces") {
            self.track.cull = cull;
        }

        self.track.start_positions = load_start_positions(info, self.settings.reverse)?;
        load_lap_sections(info, self.track, &mut self.diagnostics)?;
        self.state = LoaderState::LapDataReady;

        self.begin_object_load()
    }

    fn load_surfaces(&mut self, track_path: &Path) {
        let path = track_path.join(SURFACES_FILE);
        self.track.surfaces = match surfaces::load_surfaces(&path, &mut self.diagnostics) {
            Ok(surfaces) => surfaces,
            Err(err) => {
                self.diagnostics
                    .error(format!("Error during surface loading: {err}"));
                Vec::new()
            }
        };
        if self.track.surfaces.is_empty() {
            self.diagnostics
                .info("No Surfaces File. Continuing with standard surfaces");
            self.track.surfaces.push(Surface::default());
        }
    }

    fn load_roads(&mut self, track_path: &Path) {
        let path = track_path.join(ROADS_FILE);
        match roads::read_roads(&path, self.settings.reverse, self.road_reader.as_ref()) {
            Ok(strips) => {
                log::debug!("Loaded {} road strips", strips.len());
                self.track.roads = strips;
            }
            Err(err) => {
                self.diagnostics.error(format!(
                    "Error during road loading; continuing with an unsmoothed track: {err}"
                ));
                self.track.roads.clear();
            }
        }
    }

    fn create_racing_lines(&mut self) {
        let info = TextureInfo::from_flags(true, 0, 0);
        match self
            .content
            .load_texture(&self.settings.texture_dir, RACINGLINE_TEXTURE, info)
        {
            Ok(texture) => self.track.racingline_texture = Some(texture),
            Err(err) => self
                .diagnostics
                .warn(format!("No racing line texture: {err}")),
        }

        let solved = RacingLineBuilder::new().build(self.track, self.solver.as_ref());
        log::debug!(
            "Racing line solved for {} of {} road strips",
            solved,
            self.track.roads.len()
        );
    }

    fn begin_object_load(&mut self) -> Result<(), TrackLoadError> {
        let objects_dir = self.settings.objects_dir();

        let pack_path = objects_dir.join(PACK_FILE);
        let pack = if pack_path.is_file() {
            match JpkArchive::open(&pack_path) {
                Ok(pack) => Some(pack),
                Err(err) => {
                    self.diagnostics
                        .warn(format!("Ignoring object archive: {err}"));
                    None
                }
            }
        } else {
            None
        };

        let source = ObjectSource::open(
            &objects_dir,
            self.settings.legacy_params,
            self.content,
            &mut self.diagnostics,
        )?;
        self.total = source.len();
        self.processed = 0;
        self.track.models.reserve(self.total);
        self.diagnostics
            .info(format!("Loading {} track objects", self.total));

        let combining = self.settings.aggressive_combining && source.is_list();
        self.pass = Some(ObjectPass {
            source,
            pack,
            bodies: BodyBuilder::new(BodyOptions {
                objects_dir,
                anisotropy: self.settings.anisotropy,
                dynamic_shadows: self.settings.dynamic_shadows,
            }),
            integrator: CollisionIntegrator::new(
                self.settings.dynamic_objects,
                self.settings.compound_track_shape,
            ),
            combined: CombiningMap::default(),
            combining,
        });
        self.state = LoaderState::ObjectLoadBegun;
        Ok(())
    }

    /// Loads up to `objects_per_step` objects.
    pub fn continue_load(&mut self) -> Result<LoadProgress, TrackLoadError> {
        for _ in 0..self.settings.objects_per_step.max(1) {
            if self.continue_object_load()? == LoadProgress::Complete {
                return Ok(LoadProgress::Complete);
            }
        }
        Ok(LoadProgress::InProgress)
    }

    /// Loads exactly one object.
    ///
    /// The call that finds the source drained commits merged objects and the
    /// compound track shape, publishes the track and returns
    /// [`LoadProgress::Complete`]. Later calls keep returning `Complete`.
    pub fn continue_object_load(&mut self) -> Result<LoadProgress, TrackLoadError> {
        match self.state {
            LoaderState::Finalized => return Ok(LoadProgress::Complete),
            LoaderState::Failed => return Err(TrackLoadError::Aborted),
            LoaderState::ObjectLoadBegun | LoaderState::ObjectLoadInProgress => {}
            state => return Err(TrackLoadError::InvalidState(state)),
        }

        match self.step() {
            Ok(true) => {
                self.processed += 1;
                self.state = LoaderState::ObjectLoadInProgress;
                Ok(LoadProgress::InProgress)
            }
            Ok(false) => {
                self.finalize();
                Ok(LoadProgress::Complete)
            }
            Err(err) => {
                self.fail(&err);
                Err(err)
            }
        }
    }

    fn step(&mut self) -> Result<bool, TrackLoadError> {
        let state = self.state;
        let Some(pass) = self.pass.as_mut() else {
            return Err(TrackLoadError::InvalidState(state));
        };
        let Some(next) = pass.source.next_object()? else {
            return Ok(false);
        };

        let mut env = LoadEnv {
            content: &mut *self.content,
            track: &mut *self.track,
            world: &mut *self.world,
            diagnostics: &mut self.diagnostics,
        };
        match next {
            NextObject::Node(object) => pass.load_node(&object, &mut env)?,
            NextObject::Record(object) => pass.load_record(object, &mut env),
        }
        Ok(true)
    }

    fn finalize(&mut self) {
        if let Some(mut pass) = self.pass.take() {
            if !pass.combined.is_empty() {
                self.state = LoaderState::Combining;
                log::debug!("Committing {} combined objects", pass.combined.len());
            }
            let mut env = LoadEnv {
                content: &mut *self.content,
                track: &mut *self.track,
                world: &mut *self.world,
                diagnostics: &mut self.diagnostics,
            };
            pass.finish(&mut env);
        }
        self.track.loaded = true;
        self.state = LoaderState::Finalized;
        self.diagnostics.info(format!(
            "Track loaded: {} objects, {} models",
            self.processed,
            self.track.models.len()
        ));
    }

    fn fail(&mut self, err: &TrackLoadError) {
        self.diagnostics.error(err.to_string());
        self.pass = None;
        self.state = LoaderState::Failed;
    }

    /// Discards any in-progress pass and returns to [`LoaderState::Idle`].
    ///
    /// Nothing already committed to the track is rolled back.
    pub fn clear(&mut self) {
        self.pass = None;
        self.total = 0;
        self.processed = 0;
        self.state = LoaderState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pitlane_core::Severity;
    use pitlane_data::RecordingWorld;

    #[test]
    fn test_state_guards_and_clear() {
        let mut track = TrackData::new();
        let mut content = ContentCache::new();
        let mut world = RecordingWorld::new();
        let settings = LoaderSettings::new("no/such/track");
        let mut loader = TrackLoader::new(settings, &mut track, &mut content, &mut world);

        assert!(matches!(
            loader.continue_object_load(),
            Err(TrackLoadError::InvalidState(LoaderState::Idle))
        ));

        let err = loader.begin_load().unwrap_err();
        assert!(matches!(err, TrackLoadError::TrackConfig { .. }));
        assert_eq!(loader.state(), LoaderState::Failed);
        assert!(loader.diagnostics().contains(Severity::Info, "No Surfaces File"));

        loader.clear();
        assert_eq!(loader.state(), LoaderState::Idle);
        assert_eq!(loader.object_count(), 0);
        assert_eq!(loader.objects_processed(), 0);
    }
}
