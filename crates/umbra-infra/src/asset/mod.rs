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

//! File-format collaborators: image decoding and OBJ scene import.

mod image_decoder;
mod obj_importer;
mod tangent_space;

pub use self::image_decoder::ImageCrateDecoder;
pub use self::obj_importer::ObjSceneImporter;
pub use self::tangent_space::{compute_smooth_normals, compute_tangent_space};
