// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use proptest::prelude::*;
use trellis_geometry::{BufferAttribute, BufferGeometry, Point3, INDEX, NORMAL, POSITION};

const SOURCE_ID: &str = "source_id";

/// Random vertices plus random triangles over them
fn mesh() -> impl Strategy<Value = (Vec<[f32; 3]>, Vec<u32>)> {
    prop::collection::vec(prop::array::uniform3(-100.0f32..100.0), 3..60)
        .prop_flat_map(|vertices| {
            let n = vertices.len() as u32;
            let faces = prop::collection::vec(prop::array::uniform3(0..n), 1..80);
            (Just(vertices), faces)
        })
        .prop_map(|(vertices, faces)| (vertices, faces.into_iter().flatten().collect()))
}

fn build(vertices: &[[f32; 3]], indices: &[u32]) -> BufferGeometry {
    let mut geometry = BufferGeometry::new();
    geometry.add_attribute(
        POSITION,
        BufferAttribute::from_f32(vertices.iter().flatten().copied().collect(), 3).unwrap(),
    );
    geometry.add_attribute(
        SOURCE_ID,
        BufferAttribute::from_f32((0..vertices.len()).map(|v| v as f32).collect(), 1).unwrap(),
    );
    geometry.add_attribute(INDEX, BufferAttribute::from_u32(indices.to_vec(), 1).unwrap());
    geometry
}

proptest! {
    #[test]
    fn test_bounding_box_is_exact(vertices in prop::collection::vec(prop::array::uniform3(-1e3f32..1e3), 1..100)) {
        let mut geometry = build(&vertices, &[]);
        let bb = *geometry.compute_bounding_box();

        for k in 0..3 {
            let min = vertices.iter().map(|v| v[k]).fold(f32::INFINITY, f32::min);
            let max = vertices.iter().map(|v| v[k]).fold(f32::NEG_INFINITY, f32::max);
            prop_assert_eq!(bb.min[k], min);
            prop_assert_eq!(bb.max[k], max);
        }
        for v in &vertices {
            prop_assert!(bb.contains_point(&Point3::from(*v)));
        }
    }

    #[test]
    fn test_bounding_sphere_contains_every_vertex(vertices in prop::collection::vec(prop::array::uniform3(-1e3f32..1e3), 1..100)) {
        let mut geometry = build(&vertices, &[]);
        let sphere = *geometry.compute_bounding_sphere();

        for v in &vertices {
            let d = nalgebra::distance(&sphere.center, &Point3::from(*v));
            prop_assert!(d <= sphere.radius * (1.0 + 1e-5) + 1e-4);
        }
    }

    #[test]
    fn test_normals_are_unit_or_flagged((vertices, indices) in mesh()) {
        let mut geometry = build(&vertices, &indices);
        let stats = geometry.compute_vertex_normals().unwrap();
        prop_assert_eq!(stats.triangles, indices.len() / 3);

        let normals = geometry.attribute(NORMAL).unwrap();
        let mut non_finite = 0;
        for v in 0..normals.count() {
            let n = normals.get_xyz(v);
            if n.iter().all(|c| c.is_finite()) {
                prop_assert!((n.norm() - 1.0).abs() < 1e-4);
            } else {
                non_finite += 1;
            }
        }
        prop_assert_eq!(non_finite, stats.degenerate);
    }

    #[test]
    fn test_chunking_keeps_every_triangle((vertices, indices) in mesh(), size in 3usize..40) {
        let mut geometry = build(&vertices, &indices);
        let draw_calls = geometry.compute_offsets_with_size(size).unwrap().to_vec();

        prop_assert_eq!(draw_calls.iter().map(|dc| dc.count).sum::<usize>(), indices.len());
        prop_assert_eq!(draw_calls[0].start, 0);
        for pair in draw_calls.windows(2) {
            prop_assert_eq!(pair[0].end(), pair[1].start);
            prop_assert_eq!(pair[1].start % 3, 0);
        }

        let index = geometry.index().unwrap().array();
        let positions = geometry.attribute(POSITION).unwrap();
        let source = geometry.attribute(SOURCE_ID).unwrap();
        for dc in &draw_calls {
            for i in dc.start..dc.end() {
                let raw = index.get_u32(i) as usize;
                prop_assert!(raw < size);

                // Same vertex as before chunking, in the same corner
                let v = dc.base_index + raw;
                let old = source.array().get_u32(v) as usize;
                prop_assert_eq!(old, indices[i] as usize);
                prop_assert_eq!(
                    [positions.component(v, 0), positions.component(v, 1), positions.component(v, 2)],
                    vertices[old]
                );
            }
        }
    }

    #[test]
    fn test_chunking_matches_validation((vertices, indices) in mesh(), size in 3usize..40) {
        let mut geometry = build(&vertices, &indices);
        geometry.compute_offsets_with_size(size).unwrap();

        prop_assert!(geometry.validate_draw_calls(size).is_ok());

        // Unreferenced vertices are dropped, shared ones may be duplicated
        let mut referenced = indices.clone();
        referenced.sort_unstable();
        referenced.dedup();
        prop_assert!(geometry.vertex_count() >= referenced.len());
        prop_assert!(geometry.vertex_count() <= indices.len());
        prop_assert_eq!(
            geometry.attribute(SOURCE_ID).unwrap().count(),
            geometry.vertex_count()
        );
    }
}
