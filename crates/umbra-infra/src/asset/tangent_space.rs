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

//! Per-vertex normal and tangent-frame generation for triangle lists.

use glam::{Vec2, Vec3};

/// Computes area-weighted smooth normals.
///
/// Vertices not referenced by any non-degenerate triangle get `+Y`.
pub fn compute_smooth_normals(positions: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    let mut accumulated = vec![Vec3::ZERO; positions.len()];

    for triangle in indices.chunks_exact(3) {
        let [a, b, c] = [triangle[0], triangle[1], triangle[2]].map(|i| i as usize);
        if a >= positions.len() || b >= positions.len() || c >= positions.len() {
            continue;
        }
        let (pa, pb, pc) = (
            Vec3::from(positions[a]),
            Vec3::from(positions[b]),
            Vec3::from(positions[c]),
        );
        // Cross product length is twice the area, so larger faces weigh more.
        let face = (pb - pa).cross(pc - pa);
        for i in [a, b, c] {
            accumulated[i] += face;
        }
    }

    accumulated
        .into_iter()
        .map(|n| n.try_normalize().unwrap_or(Vec3::Y).to_array())
        .collect()
}

/// Computes per-vertex tangents and bitangents from texture coordinates.
///
/// Tangents are orthogonalized against the normal; triangles with a degenerate UV
/// mapping are skipped. Returns `(tangents, bitangents)`.
pub fn compute_tangent_space(
    positions: &[[f32; 3]],
    normals: &[[f32; 3]],
    tex_coords: &[[f32; 2]],
    indices: &[u32],
) -> (Vec<[f32; 3]>, Vec<[f32; 3]>) {
    let count = positions.len();
    let mut tangents = vec![Vec3::ZERO; count];
    let mut bitangents = vec![Vec3::ZERO; count];

    for triangle in indices.chunks_exact(3) {
        let [a, b, c] = [triangle[0], triangle[1], triangle[2]].map(|i| i as usize);
        if a >= count || b >= count || c >= count || tex_coords.len() < count {
            continue;
        }
        let (pa, pb, pc) = (
            Vec3::from(positions[a]),
            Vec3::from(positions[b]),
            Vec3::from(positions[c]),
        );
        let (ta, tb, tc) = (
            Vec2::from(tex_coords[a]),
            Vec2::from(tex_coords[b]),
            Vec2::from(tex_coords[c]),
        );

        let (e1, e2) = (pb - pa, pc - pa);
        let (d1, d2) = (tb - ta, tc - ta);
        let det = d1.x * d2.y - d2.x * d1.y;
        if det.abs() <= f32::EPSILON {
            continue;
        }
        let r = 1.0 / det;
        let tangent = (e1 * d2.y - e2 * d1.y) * r;
        let bitangent = (e2 * d1.x - e1 * d2.x) * r;
        for i in [a, b, c] {
            tangents[i] += tangent;
            bitangents[i] += bitangent;
        }
    }

    let mut out_tangents = Vec::with_capacity(count);
    let mut out_bitangents = Vec::with_capacity(count);
    for i in 0..count {
        let n = normals
            .get(i)
            .map(|n| Vec3::from(*n))
            .and_then(Vec3::try_normalize)
            .unwrap_or(Vec3::Y);
        let t = (tangents[i] - n * n.dot(tangents[i]))
            .try_normalize()
            .unwrap_or_else(|| n.any_orthonormal_vector());
        let mut b = n.cross(t);
        if b.dot(bitangents[i]) < 0.0 {
            b = -b;
        }
        out_tangents.push(t.to_array());
        out_bitangents.push(b.to_array());
    }
    (out_tangents, out_bitangents)
}
