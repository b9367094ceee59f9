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

//! Minimal GLSL front end used by the headless device.
//!
//! It runs the conditional part of the preprocessor, checks that the stage has a
//! `main` entry point, and reflects `layout(location = N) in <type> <name>;`
//! declarations. Errors are formatted like a driver info log (`ERROR: 0:<line>: ...`).

use ahash::AHashSet;
use umbra_core::renderer::{ActiveVertexInput, ShaderStage, VertexInputType};

/// What survives compilation of one stage.
#[derive(Debug, Default)]
pub(crate) struct StageReflection {
    /// Declared vertex inputs, sorted by location. Empty for fragment stages.
    pub inputs: Vec<ActiveVertexInput>,
}

struct Conditional {
    parent_active: bool,
    taken: bool,
    seen_else: bool,
}

fn log_line(line: usize, message: impl AsRef<str>) -> String {
    format!("ERROR: 0:{line}: {}", message.as_ref())
}

/// Preprocesses and validates a single stage.
pub(crate) fn compile_stage(source: &str, stage: ShaderStage) -> Result<StageReflection, String> {
    let active = preprocess(source)?;

    let has_main = active.iter().any(|(_, code)| {
        let compact: String = code.split_whitespace().collect::<Vec<_>>().join(" ");
        compact.contains("void main(") || compact.contains("void main (")
    });
    if !has_main {
        return Err(log_line(0, "no function with name 'main' found"));
    }

    let mut reflection = StageReflection::default();
    if stage != ShaderStage::Vertex {
        return Ok(reflection);
    }

    for (line, code) in &active {
        if let Some(input) = parse_vertex_input(code).map_err(|msg| log_line(*line, msg))? {
            if reflection
                .inputs
                .iter()
                .any(|existing| existing.location == input.location)
            {
                return Err(log_line(
                    *line,
                    format!("location {} is already in use", input.location),
                ));
            }
            reflection.inputs.push(input);
        }
    }
    reflection.inputs.sort_by_key(|input| input.location);
    Ok(reflection)
}

/// Returns the lines that survive conditional compilation, with their 1-based line
/// numbers and without `//` comments.
fn preprocess(source: &str) -> Result<Vec<(usize, String)>, String> {
    let mut defines: AHashSet<String> = AHashSet::new();
    let mut stack: Vec<Conditional> = Vec::new();
    let mut kept = Vec::new();

    for (index, raw) in source.lines().enumerate() {
        let line = index + 1;
        let code = match raw.find("//") {
            Some(cut) => &raw[..cut],
            None => raw,
        };
        let trimmed = code.trim();
        let active = stack.last().map_or(true, |c| c.parent_active && c.taken);

        let Some(directive) = trimmed.strip_prefix('#') else {
            if active && !trimmed.is_empty() {
                kept.push((line, trimmed.to_string()));
            }
            continue;
        };

        let mut tokens = directive.split_whitespace();
        let keyword = tokens.next().unwrap_or_default();
        let argument = tokens.next();

        match keyword {
            "define" | "undef" | "ifdef" | "ifndef" => {
                let Some(name) = argument else {
                    return Err(log_line(line, format!("'#{keyword}' : missing name")));
                };
                match keyword {
                    "define" if active => {
                        defines.insert(name.to_string());
                    }
                    "undef" if active => {
                        defines.remove(name);
                    }
                    "ifdef" => stack.push(Conditional {
                        parent_active: active,
                        taken: defines.contains(name),
                        seen_else: false,
                    }),
                    "ifndef" => stack.push(Conditional {
                        parent_active: active,
                        taken: !defines.contains(name),
                        seen_else: false,
                    }),
                    _ => {}
                }
            }
            "else" => {
                let Some(top) = stack.last_mut() else {
                    return Err(log_line(line, "'#else' : unexpected without #if"));
                };
                if top.seen_else {
                    return Err(log_line(line, "'#else' : #else after #else"));
                }
                top.seen_else = true;
                top.taken = !top.taken;
            }
            "endif" => {
                if stack.pop().is_none() {
                    return Err(log_line(line, "'#endif' : unexpected without #if"));
                }
            }
            "if" | "elif" => {
                return Err(log_line(
                    line,
                    format!("'#{keyword}' : expressions are not supported"),
                ));
            }
            // #version, #extension, #pragma, #line: accepted and ignored.
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(log_line(
            source.lines().count(),
            "unexpected end of file inside conditional block",
        ));
    }
    Ok(kept)
}

/// Parses `layout(location = N) in <type> <name>;`. Lines that are not input
/// declarations yield `Ok(None)`.
fn parse_vertex_input(code: &str) -> Result<Option<ActiveVertexInput>, String> {
    let Some(rest) = code.strip_prefix("layout") else {
        return Ok(None);
    };
    let rest = rest.trim_start();
    let (Some(open), Some(close)) = (rest.find('('), rest.find(')')) else {
        return Ok(None);
    };
    if open != 0 || close < open {
        return Ok(None);
    }
    let qualifiers = &rest[open + 1..close];
    let declaration = rest[close + 1..].trim().trim_end_matches(';').trim();

    let mut words = declaration.split_whitespace();
    if words.next() != Some("in") {
        return Ok(None);
    }

    let location = qualifiers
        .split(',')
        .filter_map(|q| q.split_once('='))
        .find(|(key, _)| key.trim() == "location")
        .map(|(_, value)| value.trim())
        .ok_or_else(|| "vertex input without a location qualifier".to_string())?
        .parse::<u32>()
        .map_err(|e| format!("invalid location: {e}"))?;

    let (Some(ty), Some(name)) = (words.next(), words.next()) else {
        return Err("incomplete vertex input declaration".to_string());
    };
    let ty = VertexInputType::from_glsl(ty)
        .ok_or_else(|| format!("'{ty}' : unsupported vertex input type"))?;

    Ok(Some(ActiveVertexInput {
        name: name.to_string(),
        location,
        ty,
    }))
}
