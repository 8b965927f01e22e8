use super::*;
use crate::error::GraphError;
use crate::graph::{ValidityMode, NO_GROUP};
use nalgebra::{vector, Vector2, Vector3};

fn star() -> (PlanarGraph, crate::graph::VertexId, Vec<crate::graph::EdgeId>) {
    // centre with spokes at 90°, 0°, 270°, 180° (insertion order != angular order)
    let mut g = PlanarGraph::new();
    let c = g.append_vertex(vector![0.0, 0.0]).unwrap();
    let mut es = Vec::new();
    for p in [vector![0.0, 1.0], vector![1.0, 0.0], vector![0.0, -1.0], vector![-1.0, 0.0]] {
        let v = g.append_vertex(p).unwrap();
        es.push(g.append_edge(c, v, NO_GROUP).unwrap().edge());
    }
    (g, c, es)
}

#[test]
fn non_finite_positions_are_rejected() {
    let mut g = PlanarGraph::new();
    assert!(matches!(
        g.append_vertex(vector![f64::NAN, 0.0]),
        Err(GraphError::NonFiniteInput { .. })
    ));
    let v = g.append_vertex(vector![0.0, 0.0]).unwrap();
    assert!(g.set_vertex(v, vector![0.0, f64::INFINITY]).is_err());
    assert_eq!(g.vertex(v).unwrap(), vector![0.0, 0.0]);
    assert_eq!(g.vertex_count(), 1);
}

#[test]
fn sorted_vtx_edges_orders_by_angle() {
    let (g, c, es) = star();
    let sorted = g.sorted_vtx_edges(c).unwrap();
    // 0°, 90°, 180°, 270°
    assert_eq!(sorted, vec![es[1], es[0], es[3], es[2]]);
}

#[test]
fn opening_angle_only_for_valence_two() {
    let (g, c, _) = star();
    assert_eq!(g.opening_angle(c), None);

    let mut h = PlanarGraph::new();
    let a = h.append_vertex(vector![1.0, 0.0]).unwrap();
    let m = h.append_vertex(vector![0.0, 0.0]).unwrap();
    let b = h.append_vertex(vector![0.0, 2.0]).unwrap();
    h.append_edge(a, m, NO_GROUP).unwrap();
    h.append_edge(m, b, NO_GROUP).unwrap();
    let ang = h.opening_angle(m).unwrap();
    assert!((ang - 90.0).abs() < 1e-9);

    let z = h.append_vertex(vector![0.0, 0.0]).unwrap();
    let w = h.append_vertex(vector![3.0, 0.0]).unwrap();
    h.append_edge(b, z, NO_GROUP).unwrap();
    h.append_edge(z, w, NO_GROUP).unwrap();
    assert!(h.opening_angle(z).is_some());
    let y = h.append_vertex(vector![3.0, 0.0]).unwrap();
    let q = h.append_vertex(vector![5.0, 5.0]).unwrap();
    h.append_edge(y, w, NO_GROUP).unwrap();
    h.append_edge(y, q, NO_GROUP).unwrap();
    // y sits on top of w
    assert_eq!(h.opening_angle(y), None);
}

#[test]
fn split_places_midpoint_and_averages_color() {
    let mut g = PlanarGraph::new();
    let a = g.append_vertex(vector![0.0, 0.0]).unwrap();
    let b = g.append_vertex(vector![2.0, 4.0]).unwrap();
    g.enable_vertex_colors(Vector3::new(0.0, 0.0, 0.0));
    g.set_vertex_color(b, Vector3::new(1.0, 0.5, 0.0)).unwrap();
    let e = g.append_edge(a, b, 3).unwrap().edge();
    let info = g.split_edge(e).unwrap();
    assert_eq!(g.vertex(info.new_vertex).unwrap(), vector![1.0, 2.0]);
    let col = g.vertex_color(info.new_vertex).unwrap();
    assert!((col - Vector3::new(0.5, 0.25, 0.0)).norm() < 1e-6);
    assert_eq!(g.edge_group(info.new_edge).unwrap(), 3);
    g.check_validity(ValidityMode::Panic).unwrap();
}

#[test]
fn split_at_parameter() {
    let mut g = PlanarGraph::new();
    let a = g.append_vertex(vector![0.0, 0.0]).unwrap();
    let b = g.append_vertex(vector![4.0, 0.0]).unwrap();
    let e = g.append_edge(a, b, NO_GROUP).unwrap().edge();
    let info = g.split_edge_at(e, 0.25).unwrap();
    assert_eq!(g.vertex(info.new_vertex).unwrap(), vector![1.0, 0.0]);
    assert!((g.edge_length(e).unwrap() - 1.0).abs() < 1e-12);
    assert!((g.edge_length(info.new_edge).unwrap() - 3.0).abs() < 1e-12);
}

#[test]
fn split_to_max_edge_length_bisects_long_edges() {
    let mut g = PlanarGraph::new();
    g.append_polygon(
        &[vector![0.0, 0.0], vector![4.0, 0.0], vector![4.0, 1.0], vector![0.0, 1.0]],
        0,
    )
    .unwrap();
    let n = g.split_to_max_edge_length(1.0).unwrap();
    // 4-long edges need 3 splits each, 1-long edges none
    assert_eq!(n, 6);
    assert_eq!(g.edge_count(), 10);
    for e in g.edge_ids() {
        assert!(g.edge_length(e).unwrap() <= 1.0 + 1e-12);
    }
    g.check_validity(ValidityMode::Panic).unwrap();
}

#[test]
fn bounds_cache_follows_timestamp() {
    let mut g = PlanarGraph::new();
    assert!(g.cached_bounds().is_empty());
    let a = g.append_vertex(vector![1.0, -1.0]).unwrap();
    g.append_vertex(vector![3.0, 2.0]).unwrap();
    let b = g.cached_bounds();
    assert_eq!(b.min, vector![1.0, -1.0]);
    assert_eq!(b.max, vector![3.0, 2.0]);
    g.set_vertex(a, vector![-5.0, 0.0]).unwrap();
    assert_eq!(g.cached_bounds().min, vector![-5.0, 0.0]);
    g.translate(vector![1.0, 1.0]);
    assert_eq!(g.cached_bounds().min, vector![-4.0, 1.0]);
}

#[test]
fn transform_rotates_positions() {
    let mut g = PlanarGraph::new();
    let a = g.append_vertex(vector![1.0, 0.0]).unwrap();
    g.transform(&Affine2::rotation(std::f64::consts::FRAC_PI_2));
    assert!((g.vertex(a).unwrap() - vector![0.0, 1.0]).norm() < 1e-12);
}

#[test]
fn compact_copy_removes_holes() {
    let (mut g, c, es) = star();
    let victim = g.edge_other_v(es[0], c).unwrap();
    g.remove_vertex(victim, false).unwrap();
    assert!(!g.is_compact());
    let (h, maps) = g.compact_copy().unwrap();
    assert!(h.is_compact());
    assert_eq!(h.vertex_count(), 4);
    assert_eq!(h.edge_count(), 3);
    assert_eq!(maps.vertices[victim.0], None);
    let nc = maps.vertices[c.0].unwrap();
    assert_eq!(h.vertex(nc).unwrap(), g.vertex(c).unwrap());
    h.check_validity(ValidityMode::Panic).unwrap();
}

#[test]
fn append_polyline_and_polygon() {
    let mut g = PlanarGraph::new();
    let pts: Vec<Vector2<f64>> = vec![vector![0.0, 0.0], vector![1.0, 0.0], vector![1.0, 1.0]];
    let open = g.append_polyline(&pts, 0).unwrap();
    assert_eq!(open.len(), 3);
    assert_eq!(g.edge_count(), 2);
    g.append_polygon(&pts, 1).unwrap();
    assert_eq!(g.edge_count(), 5);
    assert_eq!(g.edges_for_group(1).count(), 3);
}

#[test]
fn segment_intersection_cross_touch_and_miss() {
    let s0 = Segment2::new(vector![0.0, 0.0], vector![2.0, 0.0]);
    let s1 = Segment2::new(vector![1.0, -1.0], vector![1.0, 1.0]);
    match intersect_segments(&s0, &s1, 1e-9) {
        SegmentIntersection::Point { p, t0, t1 } => {
            assert!((p - vector![1.0, 0.0]).norm() < 1e-12);
            assert!((t0 - 0.5).abs() < 1e-12);
            assert!((t1 - 0.5).abs() < 1e-12);
        }
        other => panic!("expected point, got {other:?}"),
    }
    // shared endpoint
    let s2 = Segment2::new(vector![2.0, 0.0], vector![3.0, 5.0]);
    assert!(matches!(
        intersect_segments(&s0, &s2, 0.0),
        SegmentIntersection::Point { t0, .. } if (t0 - 1.0).abs() < 1e-12
    ));
    // disjoint
    let s3 = Segment2::new(vector![0.0, 1.0], vector![2.0, 2.0]);
    assert!(intersect_segments(&s0, &s3, 1e-6).is_empty());
    // endpoint resting on s0 within tolerance
    let s4 = Segment2::new(vector![1.0, 1e-7], vector![1.5, 1.0]);
    assert!(!intersect_segments(&s0, &s4, 1e-6).is_empty());
}

#[test]
fn segment_intersection_colinear_overlap() {
    let s0 = Segment2::new(vector![0.0, 0.0], vector![4.0, 0.0]);
    let s1 = Segment2::new(vector![3.0, 0.0], vector![1.0, 0.0]);
    match intersect_segments(&s0, &s1, 1e-9) {
        SegmentIntersection::Overlap { p0, p1, t0 } => {
            assert_eq!(p0, vector![1.0, 0.0]);
            assert_eq!(p1, vector![3.0, 0.0]);
            assert_eq!(t0, [0.25, 0.75]);
        }
        other => panic!("expected overlap, got {other:?}"),
    }
    // parallel but offset
    let s2 = Segment2::new(vector![0.0, 1.0], vector![4.0, 1.0]);
    assert!(intersect_segments(&s0, &s2, 1e-9).is_empty());
    // colinear, touching at a single point
    let s3 = Segment2::new(vector![4.0, 0.0], vector![6.0, 0.0]);
    assert!(matches!(
        intersect_segments(&s0, &s3, 1e-9),
        SegmentIntersection::Point { .. }
    ));
}

#[test]
fn side_tests_and_line_params() {
    let s = Segment2::new(vector![0.0, 0.0], vector![1.0, 0.0]);
    assert_eq!(s.which_side(vector![0.5, 1.0], 1e-9), Side::Positive);
    assert_eq!(s.which_side(vector![0.5, -1.0], 1e-9), Side::Negative);
    assert_eq!(s.which_side(vector![7.0, 1e-12], 1e-9), Side::On);
    let l = Line2::through(vector![0.0, 1.0], vector![2.0, 1.0]).unwrap();
    assert!((l.param(vector![3.0, 5.0]) - 3.0).abs() < 1e-12);
    let seg = Segment2::new(vector![1.0, 0.0], vector![1.0, 4.0]);
    assert!((l.intersect_segment_param(&seg).unwrap() - 0.25).abs() < 1e-12);
    assert!(Line2::new(vector![0.0, 0.0], vector![0.0, 0.0]).is_none());
}

#[test]
fn polygon_area_and_containment() {
    let sq = [vector![0.0, 0.0], vector![1.0, 0.0], vector![1.0, 1.0], vector![0.0, 1.0]];
    assert!((signed_area(&sq) - 1.0).abs() < 1e-12);
    let mut rev = sq;
    rev.reverse();
    assert!((signed_area(&rev) + 1.0).abs() < 1e-12);
    assert!(polygon_contains(&sq, vector![0.5, 0.5]));
    assert!(!polygon_contains(&sq, vector![1.5, 0.5]));
}
