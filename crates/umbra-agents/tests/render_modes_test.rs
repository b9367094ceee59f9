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

mod common;

use anyhow::Result;
use common::Harness;
use glam::Mat4;
use std::path::Path;
use umbra_agents::render_agent::{FrameInput, RenderMode};
use umbra_core::renderer::RenderTarget;
use umbra_lanes::render_lane::GBufferAttachment;

fn input(mode: RenderMode) -> FrameInput {
    FrameInput {
        select_mode: Some(mode),
        delta_seconds: 1.0 / 60.0,
        ..Default::default()
    }
}

#[test]
fn textured_quad_draws_six_indices_with_one_texture() -> Result<()> {
    let harness = Harness::new();
    let mut engine = harness.engine();

    let stats = engine.frame(&FrameInput::default())?;
    assert_eq!(stats.mode, RenderMode::TexturedQuad);
    assert_eq!((stats.dispatch.passes, stats.dispatch.draws), (1, 1));

    let passes = harness.device.take_submitted_passes();
    assert_eq!(passes.len(), 1);
    assert_eq!(passes[0].target, RenderTarget::Screen);
    let calls = passes[0].draw_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].index_count(), 6);
    assert_eq!(calls[0].textures.len(), 1);
    assert_eq!(
        calls[0].textures.get(&0).copied(),
        engine.context().quad_texture()
    );
    Ok(())
}

#[test]
fn mesh_mode_draws_each_submesh_with_its_albedo() -> Result<()> {
    let harness = Harness::new();
    let mut engine = harness.engine();
    engine
        .spawn_file(Path::new("models/crate.obj"), Mat4::IDENTITY)
        .expect("crate loads");

    let stats = engine.frame(&input(RenderMode::Mesh))?;
    assert_eq!((stats.dispatch.passes, stats.dispatch.draws), (1, 2));

    let passes = harness.device.take_submitted_passes();
    assert!(passes[0].depth_test);
    assert_eq!(passes[0].clear_depth, Some(1.0));
    let calls = passes[0].draw_calls();
    assert_eq!(calls[0].indices, 0..6);
    assert_eq!(calls[1].indices, 6..12);
    assert!(calls.iter().all(|c| c.textures.contains_key(&0)));
    assert!(calls.iter().all(|c| c.uniforms.contains_key(&0) && c.uniforms.contains_key(&1)));
    Ok(())
}

#[test]
fn framebuffer_mode_composites_all_five_attachments() -> Result<()> {
    let harness = Harness::new();
    let mut engine = harness.engine();
    engine.spawn_file(Path::new("models/crate.obj"), Mat4::IDENTITY);

    let stats = engine.frame(&input(RenderMode::Framebuffer))?;
    assert_eq!((stats.dispatch.passes, stats.dispatch.draws), (2, 3));

    let gbuffer = engine.context().gbuffer();
    let passes = harness.device.take_submitted_passes();
    assert_eq!(passes[0].target, gbuffer.target());
    assert_eq!(passes[1].target, RenderTarget::Screen);

    let composite = &passes[1].draw_calls()[0];
    let bound: Vec<_> = composite.textures.values().copied().collect();
    assert_eq!(bound, gbuffer.color_attachments().to_vec());
    assert_eq!(
        composite.textures.keys().copied().collect::<Vec<_>>(),
        vec![0, 1, 2, 3, 4]
    );
    Ok(())
}

#[test]
fn debug_views_sample_a_single_attachment() -> Result<()> {
    let harness = Harness::new();
    let mut engine = harness.engine();
    engine.spawn_file(Path::new("models/crate.obj"), Mat4::IDENTITY);

    for (mode, attachment) in [
        (RenderMode::Albedo, GBufferAttachment::AlbedoAo),
        (RenderMode::Normal, GBufferAttachment::Normals),
        (RenderMode::Position, GBufferAttachment::Position),
    ] {
        engine.frame(&input(mode))?;
        let passes = harness.device.take_submitted_passes();
        assert_eq!(passes.len(), 2, "{mode}");
        let composite = &passes[1].draw_calls()[0];
        assert_eq!(composite.textures.len(), 1, "{mode}");
        assert_eq!(
            composite.textures.get(&0).copied(),
            Some(engine.context().gbuffer().attachment(attachment)),
            "{mode}"
        );
    }
    Ok(())
}

#[test]
fn depth_view_uses_its_own_program() -> Result<()> {
    let harness = Harness::new();
    let mut engine = harness.engine();
    engine.spawn_file(Path::new("models/crate.obj"), Mat4::IDENTITY);

    engine.frame(&input(RenderMode::Depth))?;
    let passes = harness.device.take_submitted_passes();
    let composite = &passes[1].draw_calls()[0];

    let context = engine.context();
    let depth_view = context.programs().get(context.shaders().depth_view).unwrap();
    let quad = context.programs().get(context.shaders().quad).unwrap();
    assert_eq!(composite.program, Some(depth_view.handle()));
    assert_ne!(composite.program, Some(quad.handle()));
    assert_eq!(composite.textures.get(&0).copied(), Some(context.gbuffer().depth()));
    Ok(())
}

#[test]
fn broken_depth_view_only_clears() -> Result<()> {
    let harness = Harness::new();
    harness
        .sources
        .write(&harness.config.shader_paths().depth_view, "void broken(", 1);
    let mut engine = harness.engine();

    let stats = engine.frame(&input(RenderMode::Depth))?;
    assert_eq!(stats.dispatch.passes, 2);
    let passes = harness.device.take_submitted_passes();
    assert!(passes[1].draw_calls().is_empty());
    assert!(passes[1].clear_color.is_some());

    // The quad program is untouched and still draws.
    engine.frame(&input(RenderMode::TexturedQuad))?;
    assert_eq!(harness.device.take_submitted_passes()[0].draw_calls().len(), 1);
    Ok(())
}

#[test]
fn reselecting_the_current_mode_is_a_no_op() {
    let harness = Harness::new();
    let mut engine = harness.engine();
    assert!(!engine.select_mode(RenderMode::TexturedQuad));
    assert!(engine.select_mode(RenderMode::Position));
    assert!(!engine.select_mode(RenderMode::Position));
    assert_eq!(engine.mode(), RenderMode::Position);
}

#[test]
fn render_before_update_is_rejected() {
    let harness = Harness::new();
    let mut engine = harness.engine();
    assert!(matches!(
        engine.render(),
        Err(umbra_agents::render_agent::FrameError::NotUpdated)
    ));
}
