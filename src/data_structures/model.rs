//! Geometry models, materials and material-keyed draw batching.
//!
//! A [`Model`] owns one vertex buffer and one index buffer, both write-once
//! after construction, plus a list of [`IndexRange`]s that partition the index
//! buffer into per-material draw calls. The CPU-side geometry ([`MeshData`])
//! is assembled before any GPU upload so the batching invariants hold
//! independently of the device.

use cgmath::{InnerSpace, Vector2, Vector3};
use wgpu::util::DeviceExt;

use crate::data_structures::texture::Texture;

pub trait Vertex {
    fn desc() -> wgpu::VertexBufferLayout<'static>;
}

/// One vertex as stored in the GPU vertex buffer.
///
/// Tangent and bitangent are derived from positions and texture coordinates by
/// [`MeshData::compute_tangents`]; they are zero until that pass runs.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelVertex {
    pub position: [f32; 3],
    pub tex_coords: [f32; 2],
    pub normal: [f32; 3],
    pub tangent: [f32; 3],
    pub bitangent: [f32; 3],
}

impl ModelVertex {
    pub fn new(position: [f32; 3], tex_coords: [f32; 2], normal: [f32; 3]) -> Self {
        Self {
            position,
            tex_coords,
            normal,
            tangent: [0.0; 3],
            bitangent: [0.0; 3],
        }
    }
}

impl Vertex for ModelVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<ModelVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 5]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 8]>() as wgpu::BufferAddress,
                    shader_location: 3,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 11]>() as wgpu::BufferAddress,
                    shader_location: 4,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// A contiguous sub-sequence of a model's index buffer rendered with one
/// material in one draw call.
///
/// A model's ranges partition its index buffer without gaps or overlap.
/// `material` is an index into the owning model's material list, or `None`
/// for "no material": such ranges render with the untextured fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexRange {
    pub start: u32,
    pub count: u32,
    pub material: Option<usize>,
}

/// Indices of one material group of a parsed mesh, in source-file order.
#[derive(Debug, Clone)]
pub struct TriangleGroup {
    pub indices: Vec<u32>,
    pub material: Option<usize>,
}

/// CPU-side geometry: the flat vertex array, the concatenated index buffer and
/// the material-keyed ranges into it.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<ModelVertex>,
    pub indices: Vec<u32>,
    pub ranges: Vec<IndexRange>,
}

impl MeshData {
    /// Concatenate per-material triangle groups into one index buffer,
    /// recording one range per group. Group order is preserved; draw order is
    /// source-file order. Empty groups produce no range, so an empty mesh
    /// yields an empty range list and a no-op render.
    pub fn from_groups(
        vertices: Vec<ModelVertex>,
        groups: impl IntoIterator<Item = TriangleGroup>,
    ) -> Self {
        let mut indices = Vec::new();
        let mut ranges = Vec::new();
        for group in groups {
            if group.indices.is_empty() {
                continue;
            }
            let start = indices.len() as u32;
            let count = group.indices.len() as u32;
            indices.extend(group.indices);
            ranges.push(IndexRange {
                start,
                count,
                material: group.material,
            });
        }
        Self {
            vertices,
            indices,
            ranges,
        }
    }

    /// Derive per-vertex tangents and bitangents from positions and texture
    /// coordinates.
    ///
    /// Per-triangle bases are accumulated per vertex and normalized at the
    /// end. Triangles with a degenerate UV mapping are skipped, and vertices
    /// that end up without a basis fall back to one derived from the normal,
    /// so the output never contains NaNs or zero-length vectors.
    pub fn compute_tangents(&mut self) {
        let mut triangles_included = vec![0u32; self.vertices.len()];

        for c in self.indices.chunks_exact(3) {
            let v0 = self.vertices[c[0] as usize];
            let v1 = self.vertices[c[1] as usize];
            let v2 = self.vertices[c[2] as usize];

            let pos0: Vector3<f32> = v0.position.into();
            let pos1: Vector3<f32> = v1.position.into();
            let pos2: Vector3<f32> = v2.position.into();

            let uv0: Vector2<f32> = v0.tex_coords.into();
            let uv1: Vector2<f32> = v1.tex_coords.into();
            let uv2: Vector2<f32> = v2.tex_coords.into();

            let delta_pos1 = pos1 - pos0;
            let delta_pos2 = pos2 - pos0;
            let delta_uv1 = uv1 - uv0;
            let delta_uv2 = uv2 - uv0;

            // Solving delta_pos = delta_uv.x * T + delta_uv.y * B for T and B.
            let det = delta_uv1.x * delta_uv2.y - delta_uv1.y * delta_uv2.x;
            if det.abs() < 1e-8 {
                // Degenerate UV mapping, no stable basis for this triangle.
                continue;
            }
            let r = 1.0 / det;
            let tangent = (delta_pos1 * delta_uv2.y - delta_pos2 * delta_uv1.y) * r;
            // Flipped to match wgpu's texture coordinate handedness.
            let bitangent = (delta_pos2 * delta_uv1.x - delta_pos1 * delta_uv2.x) * -r;

            for &i in c {
                let v = &mut self.vertices[i as usize];
                v.tangent = (tangent + Vector3::from(v.tangent)).into();
                v.bitangent = (bitangent + Vector3::from(v.bitangent)).into();
                triangles_included[i as usize] += 1;
            }
        }

        for (i, n) in triangles_included.into_iter().enumerate() {
            let v = &mut self.vertices[i];
            if n > 0 {
                v.tangent = normalize_or_basis(v.tangent, v.normal).into();
                v.bitangent = normalize_or_basis(v.bitangent, v.normal).into();
            } else {
                let (tangent, bitangent) = basis_from_normal(v.normal);
                v.tangent = tangent.into();
                v.bitangent = bitangent.into();
            }
        }
    }
}

fn normalize_or_basis(v: [f32; 3], normal: [f32; 3]) -> Vector3<f32> {
    let v: Vector3<f32> = v.into();
    if v.magnitude2() > 1e-12 {
        v.normalize()
    } else {
        basis_from_normal(normal).0
    }
}

/// An arbitrary orthonormal tangent basis perpendicular to `normal`.
fn basis_from_normal(normal: [f32; 3]) -> (Vector3<f32>, Vector3<f32>) {
    let n: Vector3<f32> = normal.into();
    let n = if n.magnitude2() > 1e-12 {
        n.normalize()
    } else {
        Vector3::unit_z()
    };
    let helper = if n.x.abs() < 0.9 {
        Vector3::unit_x()
    } else {
        Vector3::unit_y()
    };
    let tangent = n.cross(helper).normalize();
    let bitangent = n.cross(tangent);
    (tangent, bitangent)
}

/// Procedural unit quad in the xy plane, facing +z.
pub fn quad_geometry() -> MeshData {
    let vertices = vec![
        ModelVertex::new([-0.5, -0.5, 0.0], [0.0, 0.0], [0.0, 0.0, 1.0]),
        ModelVertex::new([0.5, -0.5, 0.0], [0.0, 1.0], [0.0, 0.0, 1.0]),
        ModelVertex::new([0.5, 0.5, 0.0], [1.0, 1.0], [0.0, 0.0, 1.0]),
        ModelVertex::new([-0.5, 0.5, 0.0], [1.0, 0.0], [0.0, 0.0, 1.0]),
    ];
    let mut data = MeshData::from_groups(
        vertices,
        [TriangleGroup {
            indices: vec![0, 1, 3, 1, 2, 3],
            material: Some(0),
        }],
    );
    data.compute_tangents();
    data
}

/// Procedural unit cube: four vertices per face so each face keeps its own
/// normal, 12 triangles.
pub fn cube_geometry() -> MeshData {
    #[rustfmt::skip]
    const FACES: [([f32; 3], [[f32; 3]; 4]); 6] = [
        ([0.0, 1.0, 0.0],  [[-0.5,  0.5, -0.5], [ 0.5,  0.5, -0.5], [ 0.5,  0.5,  0.5], [-0.5,  0.5,  0.5]]),
        ([0.0, -1.0, 0.0], [[-0.5, -0.5,  0.5], [ 0.5, -0.5,  0.5], [ 0.5, -0.5, -0.5], [-0.5, -0.5, -0.5]]),
        ([1.0, 0.0, 0.0],  [[ 0.5,  0.5,  0.5], [ 0.5,  0.5, -0.5], [ 0.5, -0.5, -0.5], [ 0.5, -0.5,  0.5]]),
        ([-1.0, 0.0, 0.0], [[-0.5,  0.5, -0.5], [-0.5,  0.5,  0.5], [-0.5, -0.5,  0.5], [-0.5, -0.5, -0.5]]),
        ([0.0, 0.0, 1.0],  [[-0.5,  0.5,  0.5], [ 0.5,  0.5,  0.5], [ 0.5, -0.5,  0.5], [-0.5, -0.5,  0.5]]),
        ([0.0, 0.0, -1.0], [[ 0.5,  0.5, -0.5], [-0.5,  0.5, -0.5], [-0.5, -0.5, -0.5], [ 0.5, -0.5, -0.5]]),
    ];
    const CORNER_UVS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (normal, corners) in FACES {
        let base = vertices.len() as u32;
        for (corner, uv) in corners.into_iter().zip(CORNER_UVS) {
            vertices.push(ModelVertex::new(corner, uv, normal));
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    let mut data = MeshData::from_groups(
        vertices,
        [TriangleGroup {
            indices,
            material: Some(0),
        }],
    );
    data.compute_tangents();
    data
}

/// Phong reflectance coefficients of a material.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialParams {
    pub name: String,
    pub ambient: [f32; 3],
    pub diffuse: [f32; 3],
    pub specular: [f32; 3],
    pub shininess: f32,
}

impl Default for MaterialParams {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            ambient: [1.0, 1.0, 1.0],
            diffuse: [1.0, 1.0, 1.0],
            specular: [0.5, 0.5, 0.5],
            shininess: 16.0,
        }
    }
}

/// A material: reflectance coefficients plus the texture bind group used while
/// drawing its ranges.
///
/// Missing maps are substituted with defaults (white diffuse, grey cubemap) so
/// every range binds the same pipeline shape; the defaults are kept alive by
/// the bind group itself.
#[derive(Debug)]
pub struct Material {
    pub params: MaterialParams,
    pub diffuse_texture: Option<Texture>,
    pub cube_texture: Option<Texture>,
    pub bind_group: wgpu::BindGroup,
}

impl Material {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        params: MaterialParams,
        diffuse_texture: Option<Texture>,
        cube_texture: Option<Texture>,
        layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let default_diffuse;
        let diffuse_view = match &diffuse_texture {
            Some(texture) => &texture.view,
            None => {
                default_diffuse = Texture::default_diffuse(device, queue);
                &default_diffuse.view
            }
        };
        let default_cube;
        let cube_view = match &cube_texture {
            Some(texture) => &texture.view,
            None => {
                default_cube = Texture::default_cubemap(device, queue);
                &default_cube.view
            }
        };
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(diffuse_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(cube_view),
                },
            ],
            label: Some(&format!("{} material", params.name)),
        });

        Self {
            params,
            diffuse_texture,
            cube_texture,
            bind_group,
        }
    }

    /// How strongly the environment cubemap contributes, used by the shader.
    pub fn reflectivity(&self) -> f32 {
        if self.cube_texture.is_some() { 1.0 } else { 0.0 }
    }
}

/// GPU-resident geometry shared by all model variants: write-once vertex and
/// index buffers plus the ranges and materials that drive the draw loop.
#[derive(Debug)]
pub struct MeshBuffers {
    pub name: String,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    ranges: Vec<IndexRange>,
    materials: Vec<Material>,
    fallback: Material,
}

impl MeshBuffers {
    fn upload(
        device: &wgpu::Device,
        name: &str,
        data: &MeshData,
        materials: Vec<Material>,
        fallback: Material,
    ) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{:?} Vertex Buffer", name)),
            contents: bytemuck::cast_slice(&data.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{:?} Index Buffer", name)),
            contents: bytemuck::cast_slice(&data.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            name: name.to_string(),
            vertex_buffer,
            index_buffer,
            ranges: data.ranges.clone(),
            materials,
            fallback,
        }
    }

    fn draw<F>(&self, pass: &mut wgpu::RenderPass<'_>, apply_material: &mut F)
    where
        F: FnMut(&mut wgpu::RenderPass<'_>, &Material),
    {
        if self.ranges.is_empty() {
            return;
        }
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        for range in &self.ranges {
            let material = range
                .material
                .and_then(|i| self.materials.get(i))
                .unwrap_or(&self.fallback);
            pass.set_bind_group(0, &material.bind_group, &[]);
            apply_material(pass, material);
            pass.draw_indexed(range.start..range.start + range.count, 0, 0..1);
        }
    }
}

/// Default material for ranges whose material index is the `None` sentinel.
fn untextured_fallback(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    texture_layout: &wgpu::BindGroupLayout,
) -> Material {
    Material::new(
        device,
        queue,
        MaterialParams::default(),
        None,
        None,
        texture_layout,
    )
}

/// A renderable geometry model.
///
/// Closed set of variants; all of them own their buffers and ranges directly
/// and are dispatched by the single [`render`](Model::render) operation.
#[derive(Debug)]
pub enum Model {
    Quad(MeshBuffers),
    Cube(MeshBuffers),
    Mesh(MeshBuffers),
}

impl Model {
    /// Procedural textured quad with a single material.
    pub fn quad(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        material: Material,
        texture_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let data = quad_geometry();
        let fallback = untextured_fallback(device, queue, texture_layout);
        Self::Quad(MeshBuffers::upload(
            device,
            "quad",
            &data,
            vec![material],
            fallback,
        ))
    }

    /// Procedural cube with a single material.
    pub fn cube(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        material: Material,
        texture_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let data = cube_geometry();
        let fallback = untextured_fallback(device, queue, texture_layout);
        Self::Cube(MeshBuffers::upload(
            device,
            "cube",
            &data,
            vec![material],
            fallback,
        ))
    }

    /// Externally-authored mesh with material-keyed draw ranges.
    pub fn mesh(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        name: &str,
        data: &MeshData,
        materials: Vec<Material>,
        texture_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let fallback = untextured_fallback(device, queue, texture_layout);
        Self::Mesh(MeshBuffers::upload(device, name, data, materials, fallback))
    }

    /// Issue one indexed draw call per material-keyed range.
    ///
    /// Before each draw the range's texture bind group is bound and
    /// `apply_material` is invoked with the range's material, so the caller
    /// can push the material coefficients into GPU-visible memory. Ranges
    /// whose material index is `None` use the untextured fallback.
    pub fn render<F>(&self, pass: &mut wgpu::RenderPass<'_>, mut apply_material: F)
    where
        F: FnMut(&mut wgpu::RenderPass<'_>, &Material),
    {
        self.buffers().draw(pass, &mut apply_material);
    }

    /// Number of draw calls one `render` issues.
    pub fn range_count(&self) -> usize {
        self.buffers().ranges.len()
    }

    pub fn name(&self) -> &str {
        &self.buffers().name
    }

    fn buffers(&self) -> &MeshBuffers {
        match self {
            Model::Quad(buffers) | Model::Cube(buffers) | Model::Mesh(buffers) => buffers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_vertices(n: usize) -> Vec<ModelVertex> {
        (0..n)
            .map(|i| ModelVertex::new([i as f32, 0.0, 0.0], [0.0, 0.0], [0.0, 1.0, 0.0]))
            .collect()
    }

    #[test]
    fn quad_geometry_is_one_full_range() {
        let data = quad_geometry();
        assert_eq!(data.vertices.len(), 4);
        assert_eq!(data.indices.len(), 6);
        assert_eq!(
            data.ranges,
            vec![IndexRange {
                start: 0,
                count: 6,
                material: Some(0),
            }]
        );
    }

    #[test]
    fn cube_geometry_is_one_full_range_of_36() {
        let data = cube_geometry();
        assert_eq!(data.vertices.len(), 24);
        assert_eq!(data.indices.len(), 36);
        assert_eq!(
            data.ranges,
            vec![IndexRange {
                start: 0,
                count: 36,
                material: Some(0),
            }]
        );
    }

    #[test]
    fn groups_become_contiguous_ranges_in_file_order() {
        // Two materials, four triangles: three in group A, one in group B.
        let data = MeshData::from_groups(
            flat_vertices(6),
            [
                TriangleGroup {
                    indices: vec![0, 1, 2, 1, 2, 3, 2, 3, 4],
                    material: Some(0),
                },
                TriangleGroup {
                    indices: vec![3, 4, 5],
                    material: Some(1),
                },
            ],
        );
        assert_eq!(
            data.ranges,
            vec![
                IndexRange {
                    start: 0,
                    count: 9,
                    material: Some(0),
                },
                IndexRange {
                    start: 9,
                    count: 3,
                    material: Some(1),
                },
            ]
        );
        assert_eq!(data.indices.len(), 12);
    }

    #[test]
    fn ranges_partition_the_index_buffer() {
        let groups = [
            TriangleGroup {
                indices: vec![0, 1, 2],
                material: Some(1),
            },
            TriangleGroup {
                indices: vec![0, 2, 3, 0, 3, 1],
                material: None,
            },
            TriangleGroup {
                indices: vec![1, 2, 3],
                material: Some(0),
            },
        ];
        let data = MeshData::from_groups(flat_vertices(4), groups);

        let total: u32 = data.ranges.iter().map(|r| r.count).sum();
        assert_eq!(total as usize, data.indices.len());
        let mut expected_start = 0;
        for range in &data.ranges {
            assert_eq!(range.start, expected_start);
            expected_start += range.count;
        }
        // Sentinel material survives range building.
        assert_eq!(data.ranges[1].material, None);
    }

    #[test]
    fn empty_mesh_has_no_ranges() {
        let data = MeshData::from_groups(Vec::new(), std::iter::empty());
        assert!(data.ranges.is_empty());
        assert!(data.indices.is_empty());

        let skipped = MeshData::from_groups(
            flat_vertices(3),
            [TriangleGroup {
                indices: Vec::new(),
                material: Some(0),
            }],
        );
        assert!(skipped.ranges.is_empty());
    }

    #[test]
    fn tangents_are_normalized() {
        let data = cube_geometry();
        for v in &data.vertices {
            let t: Vector3<f32> = v.tangent.into();
            let b: Vector3<f32> = v.bitangent.into();
            assert!((t.magnitude() - 1.0).abs() < 1e-4, "tangent {:?}", v.tangent);
            assert!(
                (b.magnitude() - 1.0).abs() < 1e-4,
                "bitangent {:?}",
                v.bitangent
            );
        }
    }

    #[test]
    fn degenerate_uvs_fall_back_to_a_finite_basis() {
        // All texture coordinates collapse to one point: no triangle can
        // contribute a UV-derived basis.
        let vertices = vec![
            ModelVertex::new([0.0, 0.0, 0.0], [0.5, 0.5], [0.0, 0.0, 1.0]),
            ModelVertex::new([1.0, 0.0, 0.0], [0.5, 0.5], [0.0, 0.0, 1.0]),
            ModelVertex::new([0.0, 1.0, 0.0], [0.5, 0.5], [0.0, 0.0, 1.0]),
        ];
        let mut data = MeshData::from_groups(
            vertices,
            [TriangleGroup {
                indices: vec![0, 1, 2],
                material: None,
            }],
        );
        data.compute_tangents();
        for v in &data.vertices {
            let t: Vector3<f32> = v.tangent.into();
            let b: Vector3<f32> = v.bitangent.into();
            assert!(t.magnitude().is_finite() && (t.magnitude() - 1.0).abs() < 1e-4);
            assert!(b.magnitude().is_finite() && (b.magnitude() - 1.0).abs() < 1e-4);
            // The fallback basis stays perpendicular to the normal.
            assert!(t.dot(Vector3::unit_z()).abs() < 1e-4);
        }
    }
}
