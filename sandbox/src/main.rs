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

// Umbra Sandbox
// Runs the renderer headless through every mode and logs what each frame recorded.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use umbra_agents::render_agent::{Collaborators, Engine, FrameInput, RenderMode};
use umbra_agents::EngineConfig;
use umbra_core::renderer::GraphicsDevice;
use umbra_data::scene::CameraInput;
use umbra_infra::{FsSourceProvider, HeadlessDevice, ImageCrateDecoder, ObjSceneImporter};

const DEFAULT_CONFIG: &str = "sandbox/engine.ron";
const FRAMES_PER_MODE: usize = 3;
const FRAME_SECONDS: f32 = 1.0 / 60.0;

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));
    let config = EngineConfig::load(&config_path)?;

    Builder::from_env(Env::default().default_filter_or(config.log_filter.as_str())).init();
    log::info!("Sandbox: Using '{}'", config_path.display());

    let device = HeadlessDevice::new();
    let collaborators = Collaborators {
        sources: Box::new(FsSourceProvider),
        decoder: Box::new(ImageCrateDecoder),
        importer: Box::new(ObjSceneImporter),
    };
    let mut engine = Engine::from_config(
        &config,
        Arc::new(device.clone()) as Arc<dyn GraphicsDevice>,
        collaborators,
    )
    .context("Failed to start the renderer")?;

    let mut mode = engine.mode();
    for _ in 0..RenderMode::ALL.len() {
        for step in 0..FRAMES_PER_MODE {
            let input = FrameInput {
                select_mode: Some(mode),
                delta_seconds: FRAME_SECONDS,
                camera: drift(step),
            };
            let stats = engine.frame(&input).context("Frame failed")?;
            let passes = device.take_submitted_passes();
            log::info!(
                "Sandbox: Frame {} [{}] {} pass(es), {} draw(s), {} reload(s)",
                stats.index,
                stats.mode,
                passes.len(),
                stats.dispatch.draws,
                stats.reloaded_programs
            );
        }
        mode = mode.cycle();
    }

    engine.shutdown();
    log::info!("Sandbox: Done");
    Ok(())
}

/// A slow orbit-like drift so consecutive frames see the scene from new angles.
fn drift(step: usize) -> CameraInput {
    CameraInput {
        right: if step % 2 == 0 { 0.5 } else { -0.5 },
        yaw_delta: 0.02,
        ..CameraInput::default()
    }
}
