use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use glam::Vec3;
use thiserror::Error;

use crate::sim::Aabb;

const MIN_EXTENT: f32 = 1e-5;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {message}")]
pub struct ObjSyntaxError {
    pub line: usize,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum MeshLoadError {
    #[error("failed to read model {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse model {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ObjSyntaxError,
    },
    #[error("model {path} has no drawable edges")]
    Empty { path: PathBuf },
    #[error("model {path} has degenerate bounds")]
    Degenerate { path: PathBuf },
}

/// Line-only model: positions plus undirected edges between them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WireMesh {
    vertices: Vec<Vec3>,
    edges: Vec<[u32; 2]>,
}

impl WireMesh {
    pub fn new(vertices: Vec<Vec3>, edges: Vec<[u32; 2]>) -> Self {
        let count = vertices.len() as u32;
        let edges = edges
            .into_iter()
            .filter(|[a, b]| *a < count && *b < count && a != b)
            .collect();
        Self { vertices, edges }
    }

    /// Twelve edges of a box centred at the origin.
    pub fn box_outline(size: Vec3) -> Self {
        let half = size * 0.5;
        let aabb = Aabb::new(-half, half);
        let vertices = aabb.corners().to_vec();
        #[rustfmt::skip]
        let edges = vec![
            [0, 1], [1, 2], [2, 3], [3, 0],
            [4, 5], [5, 6], [6, 7], [7, 4],
            [0, 4], [1, 5], [2, 6], [3, 7],
        ];
        Self { vertices, edges }
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn edges(&self) -> &[[u32; 2]] {
        &self.edges
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(self.vertices.iter().copied())
    }

    /// Scales uniformly to `target_height`, rests the bounds on y = 0 and
    /// centres them on the XZ origin. `None` when the result would be
    /// degenerate.
    pub fn normalized_to_height(&self, target_height: f32) -> Option<WireMesh> {
        let bounds = self.bounds()?;
        let size = bounds.size();
        if !size.is_finite() || size.y <= MIN_EXTENT {
            return None;
        }
        let scale = target_height / size.y;
        if !scale.is_finite() || scale <= 0.0 {
            return None;
        }
        let center = bounds.center();
        let anchor = Vec3::new(center.x, bounds.min.y, center.z);
        let vertices: Vec<Vec3> = self
            .vertices
            .iter()
            .map(|vertex| (*vertex - anchor) * scale)
            .collect();
        let scaled = WireMesh {
            vertices,
            edges: self.edges.clone(),
        };
        let scaled_size = scaled.bounds()?.size();
        if scaled_size.is_finite() && scaled_size.y > MIN_EXTENT {
            Some(scaled)
        } else {
            None
        }
    }
}

/// Reads the `v`, `f` and `l` statements of a Wavefront OBJ file. Faces become
/// their outline edges. Other statements are skipped.
pub fn parse_obj(source: &str) -> Result<WireMesh, ObjSyntaxError> {
    let mut vertices = Vec::new();
    let mut edges = Vec::new();
    let mut seen = HashSet::new();

    for (line_idx, raw_line) in source.lines().enumerate() {
        let line_number = line_idx + 1;
        let line = raw_line.split('#').next().unwrap_or("").trim();
        let mut parts = line.split_whitespace();
        let Some(keyword) = parts.next() else {
            continue;
        };
        match keyword {
            "v" => {
                let mut coords = [0.0f32; 3];
                for coord in &mut coords {
                    let token = parts.next().ok_or_else(|| ObjSyntaxError {
                        line: line_number,
                        message: "vertex needs three coordinates".to_string(),
                    })?;
                    *coord = token.parse::<f32>().map_err(|_| ObjSyntaxError {
                        line: line_number,
                        message: format!("invalid coordinate '{token}'"),
                    })?;
                }
                vertices.push(Vec3::from_array(coords));
            }
            "f" | "l" => {
                let indices = parts
                    .map(|token| resolve_index(token, vertices.len(), line_number))
                    .collect::<Result<Vec<u32>, _>>()?;
                if indices.len() < 2 || (keyword == "f" && indices.len() < 3) {
                    return Err(ObjSyntaxError {
                        line: line_number,
                        message: format!("'{keyword}' needs more vertices"),
                    });
                }
                let closing = if keyword == "f" { indices.len() } else { indices.len() - 1 };
                for idx in 0..closing {
                    let a = indices[idx];
                    let b = indices[(idx + 1) % indices.len()];
                    let key = if a < b { [a, b] } else { [b, a] };
                    if a != b && seen.insert(key) {
                        edges.push(key);
                    }
                }
            }
            _ => {}
        }
    }

    Ok(WireMesh { vertices, edges })
}

fn resolve_index(token: &str, vertex_count: usize, line: usize) -> Result<u32, ObjSyntaxError> {
    let head = token.split('/').next().unwrap_or(token);
    let value = head.parse::<i64>().map_err(|_| ObjSyntaxError {
        line,
        message: format!("invalid index '{token}'"),
    })?;
    let count = vertex_count as i64;
    let resolved = if value > 0 { value - 1 } else { count + value };
    if value == 0 || resolved < 0 || resolved >= count {
        return Err(ObjSyntaxError {
            line,
            message: format!("index {value} out of range for {vertex_count} vertices"),
        });
    }
    Ok(resolved as u32)
}

/// Reads, parses and normalises a model file. An empty or degenerate model is
/// an error so callers can move on to the next source.
pub fn load_wire_mesh(path: &Path, target_height: f32) -> Result<WireMesh, MeshLoadError> {
    let raw = fs::read_to_string(path).map_err(|source| MeshLoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mesh = parse_obj(&raw).map_err(|source| MeshLoadError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    if mesh.is_empty() {
        return Err(MeshLoadError::Empty {
            path: path.to_path_buf(),
        });
    }
    mesh.normalized_to_height(target_height)
        .ok_or_else(|| MeshLoadError::Degenerate {
            path: path.to_path_buf(),
        })
}
