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

use glam::Vec3;

/// Kind of light source. The discriminant is what shaders receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i32)]
pub enum LightType {
    /// Infinitely far away; only `direction` matters.
    #[default]
    Directional = 0,
    /// Emits from `position` in all directions.
    Point = 1,
}

impl LightType {
    /// Value written into uniform data.
    pub fn as_uniform(self) -> i32 {
        self as i32
    }
}

/// A light source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    /// Directional or point.
    pub ty: LightType,
    /// Linear RGB color.
    pub color: Vec3,
    /// Direction the light travels (directional lights).
    pub direction: Vec3,
    /// World position (point lights).
    pub position: Vec3,
}

impl Light {
    /// A sun-like light shining along `direction`.
    pub fn directional(direction: Vec3, color: Vec3) -> Self {
        Self {
            ty: LightType::Directional,
            color,
            direction: direction.normalize_or_zero(),
            position: Vec3::ZERO,
        }
    }

    /// A point light at `position`.
    pub fn point(position: Vec3, color: Vec3) -> Self {
        Self {
            ty: LightType::Point,
            color,
            direction: Vec3::ZERO,
            position,
        }
    }
}
