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

// Pitlane runtime
// Loads a track package step by step and prints a JSON summary of it.

use std::env;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use pitlane_agents::{LoadProgress, LoaderSettings, TrackLoader};
use pitlane_core::Severity;
use pitlane_data::{RecordingWorld, TrackData};
use pitlane_io::ContentCache;
use serde::Serialize;

const USAGE: &str = "usage: pitlane-runtime <track-dir> [settings.ron]";

/// What the load produced, as printed on stdout.
#[derive(Debug, Serialize)]
struct TrackSummary {
    track: PathBuf,
    reverse: bool,
    surfaces: usize,
    roads: usize,
    patches: usize,
    start_positions: usize,
    lap_sectors: usize,
    objects: usize,
    steps: usize,
    models: usize,
    models_parsed: usize,
    static_drawables: usize,
    dynamic_drawables: usize,
    collision_shapes: usize,
    rigid_bodies: usize,
    static_objects: usize,
    warnings: usize,
    errors: usize,
    elapsed_ms: u128,
}

fn settings_from_args() -> Result<LoaderSettings> {
    let mut args = env::args_os().skip(1);
    let Some(track_path) = args.next().map(PathBuf::from) else {
        bail!(USAGE);
    };

    let mut settings = match args.next() {
        Some(path) => {
            let path = PathBuf::from(path);
            LoaderSettings::load(&path)
                .with_context(|| format!("Failed to read settings {}", path.display()))?
        }
        None => LoaderSettings::default(),
    };
    if settings.texture_dir.as_os_str().is_empty() {
        settings.texture_dir = track_path.join("textures");
    }
    settings.track_path = track_path;
    Ok(settings)
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    let settings = settings_from_args()?;
    let track_path = settings.track_path.clone();
    let reverse = settings.reverse;

    let mut track = TrackData::new();
    let mut content = ContentCache::new();
    let mut world = RecordingWorld::new();
    let started = Instant::now();

    let mut loader = TrackLoader::new(settings, &mut track, &mut content, &mut world);
    loader
        .begin_load()
        .with_context(|| format!("Failed to load track {}", track_path.display()))?;
    let objects = loader.object_count();

    let mut steps = 0;
    loop {
        let progress = loader
            .continue_load()
            .with_context(|| format!("Failed to load objects of {}", track_path.display()))?;
        steps += 1;
        log::debug!("{} of {} objects", loader.objects_processed(), objects);
        if progress == LoadProgress::Complete {
            break;
        }
    }
    let diagnostics = loader.into_diagnostics();

    let summary = TrackSummary {
        track: track_path,
        reverse,
        surfaces: track.surfaces.len(),
        roads: track.roads.len(),
        patches: track.patch_count(),
        start_positions: track.start_positions.len(),
        lap_sectors: track.lap.len(),
        objects,
        steps,
        models: track.models.len(),
        models_parsed: content.models_parsed(),
        static_drawables: track.static_node.drawable_count(),
        dynamic_drawables: track.dynamic_node.drawable_count(),
        collision_shapes: track.physics.shapes().len(),
        rigid_bodies: world.rigid_body_count(),
        static_objects: world.static_object_count(),
        warnings: diagnostics.with_severity(Severity::Warning).count(),
        errors: diagnostics.with_severity(Severity::Error).count(),
        elapsed_ms: started.elapsed().as_millis(),
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
