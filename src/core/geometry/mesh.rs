use std::collections::HashSet;
use std::path::Path;

use glam::{Vec2, Vec3};

use crate::core::geometry::{AssetError, Material};

#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    pub pos: Vec3,
    pub uv: Option<Vec2>,
}

/// Unique undirected edge between two vertex indices, kept for wireframe
/// drawing. Carries the material of the first face that produced it.
#[derive(Debug, Clone, Copy)]
pub struct Edge {
    pub a: u32,
    pub b: u32,
    pub material: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct Tri {
    pub vertices: [u32; 3],
    pub material: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct Mesh {
    pub name: String,
    pub vertices: Vec<Vertex>,
    pub normals: Vec<Vec3>,
    pub tris: Vec<Tri>,
    pub edges: Vec<Edge>,
    pub materials: Vec<Material>,
    /// Distance from the origin to the farthest vertex; doubles as the
    /// body's collision radius once scaled.
    pub bounding_radius: f32,
}

impl Mesh {
    /// Import a triangulated .obj together with its material library. Fails
    /// fast with a path-naming error when the file or a referenced resource
    /// is missing; callers run this before the frame loop starts.
    pub fn from_obj(path: &Path) -> Result<Self, AssetError> {
        if !path.exists() {
            return Err(AssetError::NotFound(path.to_path_buf()));
        }
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));

        let (models, materials_result) = tobj::load_obj(
            path,
            &tobj::LoadOptions {
                triangulate: true,
                single_index: true,
                ..Default::default()
            },
        )
        .map_err(|source| AssetError::Obj {
            path: path.to_path_buf(),
            source,
        })?;

        let raw_materials = materials_result.map_err(|source| AssetError::Mtl {
            path: path.to_path_buf(),
            source,
        })?;
        let mut materials = Vec::with_capacity(raw_materials.len());
        for raw in &raw_materials {
            materials.push(Material::from_tobj(raw, base_dir)?);
        }

        let mut mesh = Mesh {
            name: path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default(),
            vertices: Vec::new(),
            normals: Vec::new(),
            tris: Vec::new(),
            edges: Vec::new(),
            materials,
            bounding_radius: 0.0,
        };

        for model in models {
            let data = model.mesh;
            let vertex_base = mesh.vertices.len() as u32;

            for (i, pos) in data.positions.chunks_exact(3).enumerate() {
                let pos = Vec3::new(pos[0], pos[1], pos[2]);
                mesh.bounding_radius = mesh.bounding_radius.max(pos.length());
                let uv = data
                    .texcoords
                    .get(2 * i..2 * i + 2)
                    .map(|t| Vec2::new(t[0], t[1]));
                mesh.vertices.push(Vertex { pos, uv });
            }
            for n in data.normals.chunks_exact(3) {
                mesh.normals.push(Vec3::new(n[0], n[1], n[2]));
            }
            for face in data.indices.chunks_exact(3) {
                mesh.tris.push(Tri {
                    vertices: [
                        vertex_base + face[0],
                        vertex_base + face[1],
                        vertex_base + face[2],
                    ],
                    material: data.material_id,
                });
            }
        }

        mesh.rebuild_edges();
        log::debug!(
            "loaded {}: {} verts, {} tris, {} edges, r={:.2}",
            mesh.name,
            mesh.vertices.len(),
            mesh.tris.len(),
            mesh.edges.len(),
            mesh.bounding_radius
        );
        Ok(mesh)
    }

    /// Deduplicate face borders into the undirected edge list the wireframe
    /// pipeline walks.
    fn rebuild_edges(&mut self) {
        let mut seen: HashSet<(u32, u32)> = HashSet::new();
        self.edges.clear();
        for tri in &self.tris {
            let [a, b, c] = tri.vertices;
            for (u, v) in [(a, b), (b, c), (c, a)] {
                let key = (u.min(v), u.max(v));
                if seen.insert(key) {
                    self.edges.push(Edge {
                        a: key.0,
                        b: key.1,
                        material: tri.material,
                    });
                }
            }
        }
    }

    /// Material for an edge or face, falling back to the default when the
    /// index is absent or out of range.
    pub fn material_or_default(&self, id: Option<usize>) -> Material {
        id.and_then(|i| self.materials.get(i))
            .cloned()
            .unwrap_or_default()
    }

    /// Single right triangle, enough to exercise stores and pipelines in
    /// tests without touching the filesystem.
    pub fn test_triangle() -> Self {
        let vertices = vec![
            Vertex {
                pos: Vec3::new(-1.0, -1.0, 0.0),
                uv: None,
            },
            Vertex {
                pos: Vec3::new(1.0, -1.0, 0.0),
                uv: None,
            },
            Vertex {
                pos: Vec3::new(0.0, 1.0, 0.0),
                uv: None,
            },
        ];
        let tris = vec![Tri {
            vertices: [0, 1, 2],
            material: None,
        }];
        let mut mesh = Mesh {
            name: "test_triangle".to_string(),
            vertices,
            normals: Vec::new(),
            tris,
            edges: Vec::new(),
            materials: Vec::new(),
            bounding_radius: 2f32.sqrt(),
        };
        mesh.rebuild_edges();
        mesh
    }
}
