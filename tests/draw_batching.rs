//! Batching and camera invariants exercised through the public API.
//!
//! These tests run entirely on the CPU: geometry and draw ranges are
//! assembled before any GPU upload, and the camera is pure math.

use cgmath::{InnerSpace, Matrix4, Rad, SquareMatrix, Vector3};
use scene_ngin::camera::Camera;
use scene_ngin::data_structures::model::{
    IndexRange, MeshData, TriangleGroup, cube_geometry, quad_geometry,
};

fn vertices(n: usize) -> Vec<scene_ngin::data_structures::model::ModelVertex> {
    use scene_ngin::data_structures::model::ModelVertex;
    (0..n)
        .map(|i| {
            ModelVertex::new(
                [i as f32, (i * i) as f32, 0.0],
                [i as f32 * 0.1, 0.0],
                [0.0, 0.0, 1.0],
            )
        })
        .collect()
}

#[test]
fn cube_issues_a_single_draw_of_36_indices() {
    let cube = cube_geometry();
    assert_eq!(cube.vertices.len(), 24);
    assert_eq!(cube.indices.len(), 36);
    assert_eq!(cube.ranges.len(), 1);
    assert_eq!(cube.ranges[0].start, 0);
    assert_eq!(cube.ranges[0].count, 36);
}

#[test]
fn quad_issues_a_single_draw_of_6_indices() {
    let quad = quad_geometry();
    assert_eq!(quad.vertices.len(), 4);
    assert_eq!(quad.ranges, vec![IndexRange {
        start: 0,
        count: 6,
        material: Some(0),
    }]);
}

#[test]
fn two_material_four_triangle_source_builds_two_ranges() {
    let data = MeshData::from_groups(
        vertices(6),
        [
            TriangleGroup {
                indices: vec![0, 1, 2, 2, 1, 3, 3, 4, 5],
                material: Some(0),
            },
            TriangleGroup {
                indices: vec![1, 4, 5],
                material: Some(1),
            },
        ],
    );
    assert_eq!(data.ranges, vec![
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
    ]);
}

#[test]
fn ranges_always_partition_the_index_buffer() {
    let group_sizes = [3usize, 9, 3, 27, 6];
    let groups: Vec<TriangleGroup> = group_sizes
        .iter()
        .enumerate()
        .map(|(material, &len)| TriangleGroup {
            indices: (0..len as u32).collect(),
            material: if material == 2 { None } else { Some(material) },
        })
        .collect();
    let data = MeshData::from_groups(vertices(27), groups);

    let total: u32 = data.ranges.iter().map(|r| r.count).sum();
    assert_eq!(total as usize, data.indices.len());

    // Contiguous, non-overlapping, in source order.
    let mut cursor = 0;
    for range in &data.ranges {
        assert_eq!(range.start, cursor);
        cursor += range.count;
    }
    assert_eq!(data.ranges[2].material, None);
}

#[test]
fn empty_source_renders_nothing() {
    let data = MeshData::from_groups(Vec::new(), std::iter::empty());
    assert!(data.ranges.is_empty());
    assert!(data.indices.is_empty());
}

#[test]
fn world_to_view_is_the_exact_pose_inverse() {
    let mut camera = Camera::new(Rad(0.8), 1.5, 0.5, 200.0);
    camera.move_to(Vector3::new(-4.0, 2.0, 9.0));
    camera.yaw = Rad(1.2);
    camera.pitch = Rad(-0.6);

    let view_to_world = camera
        .world_to_view()
        .invert()
        .expect("view matrix is invertible");
    let roundtrip = camera.world_to_view() * view_to_world;
    for c in 0..4 {
        for r in 0..4 {
            let expected = if c == r { 1.0 } else { 0.0 };
            assert!((roundtrip[c][r] - expected).abs() < 1e-5);
        }
    }

    // The pose transform rebuilt by hand matches the inverse.
    let rebuilt = Matrix4::from_translation(camera.position)
        * Matrix4::from_angle_y(camera.yaw)
        * Matrix4::from_angle_x(camera.pitch);
    for c in 0..4 {
        for r in 0..4 {
            assert!((view_to_world[c][r] - rebuilt[c][r]).abs() < 1e-4);
        }
    }
}

#[test]
fn loaded_geometry_has_unit_tangent_bases() {
    let data = cube_geometry();
    for v in &data.vertices {
        let tangent: Vector3<f32> = v.tangent.into();
        let bitangent: Vector3<f32> = v.bitangent.into();
        assert!((tangent.magnitude() - 1.0).abs() < 1e-4);
        assert!((bitangent.magnitude() - 1.0).abs() < 1e-4);
    }
}
