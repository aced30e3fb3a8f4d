//! OFF mesh loading.
//!
//! Parses the text OFF format (header token, `nv nf ne` counts line,
//! vertex lines, triangle face lines) and expands it into the flat
//! per-corner layout the renderer consumes: every triangle contributes
//! three entries to each of the position/color/normal sequences, so all
//! four sequences index identically for a given draw range.
//!
//! Two normal sets are produced per corner:
//! - a *face* normal (flat shading): the triangle's edge cross product,
//!   normalized; zero-area triangles keep the zero vector,
//! - a *vertex* normal (smooth shading): the sum of incident face
//!   normals, renormalized; corners whose accumulator has no length
//!   fall back to the face normal.

use glam::Vec3;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum MeshError {
    #[error("failed to read mesh at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("missing OFF header")]
    MissingHeader,
    #[error("malformed mesh (line {line}): {reason}")]
    Malformed { line: usize, reason: String },
    #[error("counts line promised {expected} {kind}, found {found}")]
    CountMismatch {
        kind: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("degenerate face (line {line}): {reason}")]
    DegenerateFace { line: usize, reason: String },
}

/// A mesh expanded to one entry per vertex-in-triangle, ready for the
/// shared geometry arena.
#[derive(Debug, Clone)]
pub struct Mesh {
    pub positions: Vec<Vec3>,
    pub colors: Vec<Vec3>,
    pub face_normals: Vec<Vec3>,
    pub vertex_normals: Vec<Vec3>,
    pub centroid: Vec3,
    pub unit_scale: f32,
}

impl Mesh {
    pub fn load(path: &Path) -> Result<Self, MeshError> {
        let text = std::fs::read_to_string(path).map_err(|source| MeshError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, MeshError> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'));

        let (_, header) = lines.next().ok_or(MeshError::MissingHeader)?;
        if header != "OFF" {
            return Err(MeshError::MissingHeader);
        }

        let (counts_line, counts) = lines.next().ok_or(MeshError::Malformed {
            line: 0,
            reason: "missing counts line".to_string(),
        })?;
        let counts = parse_counts(counts_line, counts)?;

        let mut vertices = Vec::with_capacity(counts.vertices);
        for _ in 0..counts.vertices {
            match lines.next() {
                Some((line, raw)) => vertices.push(parse_vertex(line, raw)?),
                None => {
                    return Err(MeshError::CountMismatch {
                        kind: "vertices",
                        expected: counts.vertices,
                        found: vertices.len(),
                    })
                }
            }
        }

        let mut faces = Vec::with_capacity(counts.faces);
        for _ in 0..counts.faces {
            match lines.next() {
                Some((line, raw)) => faces.push(parse_face(line, raw, vertices.len())?),
                None => {
                    return Err(MeshError::CountMismatch {
                        kind: "faces",
                        expected: counts.faces,
                        found: faces.len(),
                    })
                }
            }
        }

        Ok(Self::expand(&vertices, &faces))
    }

    /// Expand indexed vertices/faces into the flat per-corner layout and
    /// derive normals, colors, centroid, and the unit-scale factor.
    fn expand(vertices: &[Vec3], faces: &[[usize; 3]]) -> Self {
        let corner_count = faces.len() * 3;
        let mut positions = Vec::with_capacity(corner_count);
        let mut face_normals = Vec::with_capacity(corner_count);

        // Per indexed vertex: accumulated incident face normals.
        let mut accumulated = vec![Vec3::ZERO; vertices.len()];

        for &[a, b, c] in faces {
            let (pa, pb, pc) = (vertices[a], vertices[b], vertices[c]);
            let normal = triangle_normal(pa, pb, pc);
            for (index, position) in [(a, pa), (b, pb), (c, pc)] {
                positions.push(position);
                face_normals.push(normal);
                accumulated[index] += normal;
            }
        }

        let mut vertex_normals = Vec::with_capacity(corner_count);
        for (corner, &[a, b, c]) in faces.iter().enumerate() {
            for (slot, index) in [a, b, c].into_iter().enumerate() {
                let summed = accumulated[index];
                if summed.length_squared() > f32::EPSILON {
                    vertex_normals.push(summed.normalize());
                } else {
                    // No incident-triangle data: keep the flat normal.
                    vertex_normals.push(face_normals[corner * 3 + slot]);
                }
            }
        }

        let (min, max) = bounds(&positions);
        let extent = max - min;
        let depth_span = if extent.z.abs() > f32::EPSILON {
            extent.z
        } else {
            1.0
        };
        let colors = positions
            .iter()
            .map(|p| {
                let depth = (p.z - min.z) / depth_span;
                Vec3::new(0.25 + 0.5 * depth, 0.35, 0.85 - 0.5 * depth)
            })
            .collect();

        let centroid = if positions.is_empty() {
            Vec3::ZERO
        } else {
            positions.iter().copied().sum::<Vec3>() / positions.len() as f32
        };

        let longest = extent.x.max(extent.y).max(extent.z);
        let unit_scale = if longest > f32::EPSILON {
            1.0 / longest
        } else {
            1.0
        };

        Self {
            positions,
            colors,
            face_normals,
            vertex_normals,
            centroid,
            unit_scale,
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

struct Counts {
    vertices: usize,
    faces: usize,
}

fn parse_counts(line: usize, raw: &str) -> Result<Counts, MeshError> {
    let mut fields = raw.split_whitespace();
    let mut next = |name: &str| -> Result<usize, MeshError> {
        fields
            .next()
            .ok_or_else(|| MeshError::Malformed {
                line,
                reason: format!("missing {name} count"),
            })?
            .parse()
            .map_err(|_| MeshError::Malformed {
                line,
                reason: format!("{name} count is not an integer"),
            })
    };
    let vertices = next("vertex")?;
    let faces = next("face")?;
    // Edge count is present in the format but unused.
    let _edges = next("edge")?;
    Ok(Counts { vertices, faces })
}

fn parse_vertex(line: usize, raw: &str) -> Result<Vec3, MeshError> {
    let fields: Vec<f32> = raw
        .split_whitespace()
        .map(|f| f.parse::<f32>())
        .collect::<Result<_, _>>()
        .map_err(|_| MeshError::Malformed {
            line,
            reason: "vertex coordinate is not a number".to_string(),
        })?;
    if fields.len() < 3 {
        return Err(MeshError::Malformed {
            line,
            reason: format!("vertex line has {} coordinates, need 3", fields.len()),
        });
    }
    Ok(Vec3::new(fields[0], fields[1], fields[2]))
}

fn parse_face(line: usize, raw: &str, vertex_count: usize) -> Result<[usize; 3], MeshError> {
    let fields: Vec<usize> = raw
        .split_whitespace()
        .map(|f| f.parse::<usize>())
        .collect::<Result<_, _>>()
        .map_err(|_| MeshError::Malformed {
            line,
            reason: "face index is not an integer".to_string(),
        })?;
    let Some((&arity, indices)) = fields.split_first() else {
        return Err(MeshError::Malformed {
            line,
            reason: "empty face line".to_string(),
        });
    };
    if arity != 3 || indices.len() != 3 {
        return Err(MeshError::DegenerateFace {
            line,
            reason: format!("expected a triangle, face has {arity} vertices"),
        });
    }
    for &index in indices {
        if index >= vertex_count {
            return Err(MeshError::DegenerateFace {
                line,
                reason: format!("vertex index {index} out of range ({vertex_count} vertices)"),
            });
        }
    }
    Ok([indices[0], indices[1], indices[2]])
}

/// Triangle normal from the edge cross product. Zero-area triangles
/// yield the zero vector, which callers keep as the fallback.
fn triangle_normal(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    let cross = (b - a).cross(c - a);
    if cross.length_squared() > f32::EPSILON {
        cross.normalize()
    } else {
        Vec3::ZERO
    }
}

fn bounds(positions: &[Vec3]) -> (Vec3, Vec3) {
    let mut min = Vec3::splat(f32::MAX);
    let mut max = Vec3::splat(f32::MIN);
    for &p in positions {
        min = min.min(p);
        max = max.max(p);
    }
    if positions.is_empty() {
        (Vec3::ZERO, Vec3::ZERO)
    } else {
        (min, max)
    }
}
