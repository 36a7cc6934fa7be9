//! Conversion of parsed OBJ data into engine geometry.
//!
//! Each `tobj::Model` is one per-material triangle group. The groups are
//! merged into one flat vertex array and one concatenated index buffer, with
//! one draw range per group in file order. Obj files don't come with tangents
//! and bitangents, so they are derived afterwards.

use crate::data_structures::model::{MeshData, ModelVertex, TriangleGroup};

/// Flatten the parsed groups into a single [`MeshData`].
///
/// Group vertex arrays are concatenated and each group's indices are rebased
/// onto the shared array, so one vertex buffer and one index buffer serve the
/// whole model.
pub fn mesh_data_from_obj(models: &[tobj::Model]) -> MeshData {
    let mut vertices = Vec::new();
    let mut groups = Vec::with_capacity(models.len());

    for m in models {
        let base = vertices.len() as u32;
        vertices.extend((0..m.mesh.positions.len() / 3).map(|i| {
            ModelVertex::new(
                [
                    m.mesh.positions[i * 3],
                    m.mesh.positions[i * 3 + 1],
                    m.mesh.positions[i * 3 + 2],
                ],
                [
                    m.mesh.texcoords.get(i * 2).map_or(0.0, |f| *f),
                    1.0 - m.mesh.texcoords.get(i * 2 + 1).map_or(0.0, |f| *f),
                ],
                [
                    m.mesh.normals.get(i * 3).map_or(0.0, |f| *f),
                    m.mesh.normals.get(i * 3 + 1).map_or(0.0, |f| *f),
                    m.mesh.normals.get(i * 3 + 2).map_or(0.0, |f| *f),
                ],
            )
        }));
        groups.push(TriangleGroup {
            indices: m.mesh.indices.iter().map(|i| i + base).collect(),
            material: m.mesh.material_id,
        });
    }

    let mut data = MeshData::from_groups(vertices, groups);
    data.compute_tangents();
    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_structures::model::IndexRange;

    fn group(positions: Vec<f32>, indices: Vec<u32>, material_id: Option<usize>) -> tobj::Model {
        let mesh = tobj::Mesh {
            positions,
            indices,
            material_id,
            ..Default::default()
        };
        tobj::Model::new(mesh, "group".to_string())
    }

    #[test]
    fn groups_are_rebased_onto_one_vertex_array() {
        let models = vec![
            group(
                vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
                vec![0, 1, 2],
                Some(0),
            ),
            group(
                vec![0.0, 0.0, 1.0, 1.0, 0.0, 1.0, 0.0, 1.0, 1.0],
                vec![0, 1, 2],
                Some(1),
            ),
        ];
        let data = mesh_data_from_obj(&models);

        assert_eq!(data.vertices.len(), 6);
        assert_eq!(data.indices, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(
            data.ranges,
            vec![
                IndexRange {
                    start: 0,
                    count: 3,
                    material: Some(0),
                },
                IndexRange {
                    start: 3,
                    count: 3,
                    material: Some(1),
                },
            ]
        );
    }

    #[test]
    fn group_without_material_keeps_the_sentinel() {
        let models = vec![group(
            vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            vec![0, 1, 2],
            None,
        )];
        let data = mesh_data_from_obj(&models);
        assert_eq!(data.ranges.len(), 1);
        assert_eq!(data.ranges[0].material, None);
    }

    #[test]
    fn empty_obj_yields_empty_mesh() {
        let data = mesh_data_from_obj(&[]);
        assert!(data.vertices.is_empty());
        assert!(data.ranges.is_empty());
    }
}
