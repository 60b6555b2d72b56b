// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use approx::assert_relative_eq;
use trellis_geometry::{BufferAttribute, BufferGeometry, Point3, Vector3, NORMAL, POSITION};

#[test]
fn test_non_indexed_triangle_round_trip() {
    let mut geometry = BufferGeometry::new();
    geometry.add_attribute(
        POSITION,
        BufferAttribute::from_f32(vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0], 3).unwrap(),
    );
    assert!(geometry.index().is_none());

    let bb = *geometry.compute_bounding_box();
    assert_eq!(bb.min, Point3::new(0.0, 0.0, 0.0));
    assert_eq!(bb.max, Point3::new(1.0, 1.0, 0.0));

    let stats = geometry.compute_vertex_normals().unwrap();
    assert_eq!(stats.triangles, 1);
    assert_eq!(stats.degenerate, 0);

    let normal = geometry.attribute(NORMAL).unwrap();
    assert_eq!(normal.count(), 3);
    for v in 0..3 {
        assert_relative_eq!(normal.get_xyz(v), Vector3::new(0.0, 0.0, 1.0));
    }
    assert!(geometry.draw_calls().is_empty());
}
