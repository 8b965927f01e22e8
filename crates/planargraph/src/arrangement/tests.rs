use super::*;
use crate::error::GraphError;
use crate::graph::{ValidityMode, NO_GROUP};
use crate::planar::{polygon_contains, Aabb2, Line2, PlanarGraph, Segment2};
use nalgebra::{vector, Vector2};
use proptest::prelude::*;

fn unit_square() -> Vec<Vector2<f64>> {
    vec![vector![0.0, 0.0], vector![1.0, 0.0], vector![1.0, 1.0], vector![0.0, 1.0]]
}

/// Pairs of edges that cross strictly inside both (shared endpoints excluded).
fn interior_crossings(g: &PlanarGraph, margin: f64) -> Vec<(usize, usize)> {
    let edges: Vec<_> = g.edges().collect();
    let mut out = Vec::new();
    for (i, e0) in edges.iter().enumerate() {
        for e1 in &edges[i + 1..] {
            if e0.a == e1.a || e0.a == e1.b || e0.b == e1.a || e0.b == e1.b {
                continue;
            }
            let s0 = Segment2::new(g.vertex(e0.a).unwrap(), g.vertex(e0.b).unwrap());
            let s1 = Segment2::new(g.vertex(e1.a).unwrap(), g.vertex(e1.b).unwrap());
            let straddles = |s: &Segment2, t: &Segment2| {
                let da = s.signed_distance(t.a);
                let db = s.signed_distance(t.b);
                (da > margin && db < -margin) || (da < -margin && db > margin)
            };
            if straddles(&s0, &s1) && straddles(&s1, &s0) {
                out.push((e0.id.0, e1.id.0));
            }
        }
    }
    out
}

#[test]
fn square_outline_reuses_corners() {
    let mut arr = Arrangement::default();
    arr.insert_polygon(&unit_square(), 0).unwrap();
    let g = arr.graph();
    assert_eq!(g.vertex_count(), 4);
    assert_eq!(g.edge_count(), 4);
    for v in g.vertex_ids() {
        assert_eq!(g.valence(v), 2);
    }
    g.check_validity(ValidityMode::Panic).unwrap();
}

#[test]
fn square_with_diagonal() {
    let mut arr = Arrangement::default();
    arr.insert_polygon(&unit_square(), 0).unwrap();
    let added = arr
        .insert_segment(vector![0.0, 0.0], vector![1.0, 1.0], 1)
        .unwrap();
    assert_eq!(added.len(), 1);
    let g = arr.graph();
    assert_eq!(g.vertex_count(), 4);
    assert_eq!(g.edge_count(), 5);
    assert_eq!(g.edges_for_group(1).count(), 1);
}

#[test]
fn crossing_segments_meet_at_a_new_vertex() {
    let mut arr = Arrangement::default();
    arr.insert_segment(vector![0.0, 0.0], vector![2.0, 2.0], 0).unwrap();
    arr.insert_segment(vector![0.0, 2.0], vector![2.0, 0.0], 1).unwrap();
    let g = arr.graph();
    assert_eq!(g.vertex_count(), 5);
    assert_eq!(g.edge_count(), 4);
    let centre = arr.find_existing_vertex(vector![1.0, 1.0]).unwrap();
    assert_eq!(g.valence(centre), 4);
    // the split half keeps the group of the edge it came from
    assert_eq!(g.edges_for_group(0).count(), 2);
    assert_eq!(g.edges_for_group(1).count(), 2);
    assert!(interior_crossings(g, 1e-9).is_empty());
}

#[test]
fn axis_cross_splits_each_segment_once_at_unit_point() {
    let mut arr = Arrangement::default();
    let first = arr
        .insert_segment(vector![0.0, 0.0], vector![2.0, 0.0], 0)
        .unwrap();
    assert_eq!(first.len(), 1);
    let second = arr
        .insert_segment(vector![1.0, -1.0], vector![1.0, 1.0], 1)
        .unwrap();
    assert_eq!(second.len(), 2);
    let g = arr.graph();
    assert_eq!(g.vertex_count(), 5);
    assert_eq!(g.edge_count(), 4);
    let x = arr.find_existing_vertex(vector![1.0, 0.0]).unwrap();
    assert!((g.vertex(x).unwrap() - vector![1.0, 0.0]).norm() < 1e-12);
    assert_eq!(g.valence(x), 4);
    // the horizontal segment was split into exactly two halves
    assert_eq!(g.edges_for_group(0).count(), 2);
    assert_eq!(g.edges_for_group(1).count(), 2);
    assert!(interior_crossings(g, 1e-9).is_empty());
}

#[test]
fn endpoints_snap_within_tolerance() {
    let mut arr = Arrangement::default();
    arr.insert_segment(vector![0.0, 0.0], vector![1.0, 0.0], 0).unwrap();
    arr.insert_segment(vector![1.0 + 1e-7, 1e-7], vector![1.0, 1.0], 0)
        .unwrap();
    let g = arr.graph();
    assert_eq!(g.vertex_count(), 3);
    let corner = arr.find_existing_vertex(vector![1.0, 0.0]).unwrap();
    assert_eq!(g.valence(corner), 2);
    assert_eq!(g.vertex(corner).unwrap(), vector![1.0, 0.0]);
}

#[test]
fn degenerate_segments_add_no_edges() {
    let mut arr = Arrangement::default();
    let added = arr
        .insert_segment(vector![0.5, 0.5], vector![0.5, 0.5 + 1e-7], 0)
        .unwrap();
    assert!(added.is_empty());
    assert_eq!(arr.graph().vertex_count(), 1);
    assert_eq!(arr.graph().edge_count(), 0);

    // both ends resolve to the same existing vertex
    let added = arr
        .insert_segment(vector![0.5 + 1e-6, 0.5], vector![0.5, 0.5 - 1e-6], 0)
        .unwrap();
    assert!(added.is_empty());
    assert_eq!(arr.graph().vertex_count(), 1);
}

#[test]
fn t_junction_splits_the_existing_edge() {
    let mut arr = Arrangement::default();
    arr.insert_segment(vector![0.0, 0.0], vector![2.0, 0.0], 0).unwrap();
    arr.insert_segment(vector![1.0, 0.0], vector![1.0, 1.0], 1).unwrap();
    let g = arr.graph();
    assert_eq!(g.vertex_count(), 4);
    assert_eq!(g.edge_count(), 3);
    let foot = arr.find_existing_vertex(vector![1.0, 0.0]).unwrap();
    assert!(g.is_junction_vertex(foot));
}

#[test]
fn colinear_overlap_splits_without_duplicates() {
    let mut arr = Arrangement::default();
    arr.insert_segment(vector![0.0, 0.0], vector![4.0, 0.0], 0).unwrap();
    let added = arr
        .insert_segment(vector![1.0, 0.0], vector![3.0, 0.0], 1)
        .unwrap();
    assert!(added.is_empty());
    let g = arr.graph();
    assert_eq!(g.vertex_count(), 4);
    assert_eq!(g.edge_count(), 3);
    g.check_validity(ValidityMode::Panic).unwrap();
}

#[test]
fn colinear_overlap_crossed_by_third_edge_stays_simple() {
    let mut arr = Arrangement::default();
    arr.insert_segment(vector![0.0, 0.0], vector![4.0, 0.0], 0).unwrap();
    arr.insert_segment(vector![2.0, -1.0], vector![2.0, 1.0], 0).unwrap();
    arr.insert_segment(vector![1.0, 0.0], vector![3.0, 0.0], 0).unwrap();
    let g = arr.graph();
    // 0, 1, 2, 3, 4 on the axis plus the two ends of the vertical
    assert_eq!(g.vertex_count(), 7);
    assert_eq!(g.edge_count(), 6);
    g.check_validity(ValidityMode::Panic).unwrap();
}

#[test]
fn non_finite_input_leaves_graph_untouched() {
    let mut arr = Arrangement::default();
    arr.insert_segment(vector![0.0, 0.0], vector![1.0, 0.0], 0).unwrap();
    let ts = arr.graph().timestamp();
    let err = arr
        .insert_polyline(&[vector![0.0, 1.0], vector![1.0, 1.0], vector![f64::NAN, 2.0]], 0)
        .unwrap_err();
    assert!(matches!(err, GraphError::NonFiniteInput { .. }));
    assert_eq!(arr.graph().timestamp(), ts);
    assert_eq!(arr.graph().edge_count(), 1);
}

#[test]
fn insert_points_reuses_vertices() {
    let mut arr = Arrangement::default();
    let vs = arr
        .insert_points(&[vector![0.0, 0.0], vector![1.0, 0.0], vector![1e-7, 0.0]])
        .unwrap();
    assert_eq!(vs.len(), 3);
    assert_eq!(vs[0], vs[2]);
    assert_eq!(arr.graph().vertex_count(), 2);
}

#[test]
fn nearest_vertex_respects_radius_and_ignore() {
    let mut arr = Arrangement::new(ArrangementCfg {
        cell_size: Some(0.25),
        ..ArrangementCfg::default()
    });
    let vs = arr
        .insert_points(&[vector![0.0, 0.0], vector![0.3, 0.0], vector![2.0, 0.0]])
        .unwrap();
    let p = vector![0.1, 0.0];
    assert_eq!(arr.find_nearest_vertex(p, 1.0, |_| false), Some(vs[0]));
    assert_eq!(arr.find_nearest_vertex(p, 1.0, |v| v == vs[0]), Some(vs[1]));
    assert_eq!(arr.find_nearest_vertex(p, 0.05, |_| false), None);
    // radius much larger than the cell size
    assert_eq!(
        arr.find_nearest_vertex(p, 3.0, |v| v != vs[2]),
        Some(vs[2])
    );
}

#[test]
fn bounds_hint_sizes_the_grid() {
    let b = Aabb2::from_points([vector![0.0, 0.0], vector![64.0, 32.0]]);
    let arr = Arrangement::with_bounds_hint(&b, ArrangementCfg::default());
    let mut grid = PointHashGrid::for_bounds(&b);
    assert_eq!(grid.cell_size(), 1.0);
    grid.insert(crate::graph::VertexId(0), vector![0.5, 0.5]);
    assert!(grid.remove(crate::graph::VertexId(0), vector![0.5, 0.5]));
    assert!(grid.is_empty());
    assert!(arr.graph().vertex_count() == 0);
}

#[test]
fn connect_open_boundaries_closes_small_gaps() {
    let mut arr = Arrangement::default();
    arr.insert_segment(vector![0.0, 0.0], vector![1.0, 0.0], 0).unwrap();
    arr.insert_segment(vector![1.05, 0.0], vector![2.0, 0.0], 0).unwrap();
    let joins = arr.connect_open_boundaries(0.1).unwrap();
    assert_eq!(joins, 1);
    let g = arr.graph();
    assert_eq!(g.edge_count(), 3);
    let open: Vec<_> = g.vertex_ids().filter(|&v| g.is_boundary_vertex(v)).collect();
    assert_eq!(open.len(), 2);
    // nothing left within reach
    assert_eq!(arr.connect_open_boundaries(0.1).unwrap(), 0);
}

#[test]
fn radius_queries_stay_cheap_for_huge_and_infinite_radii() {
    let mut grid = PointHashGrid::new(1e-9);
    let pts = [vector![0.0, 0.0], vector![3.0, 4.0], vector![-1e6, 2e6]];
    for (i, p) in pts.iter().enumerate() {
        grid.insert(crate::graph::VertexId(i), *p);
    }
    let pos = |v: crate::graph::VertexId| pts[v.0];
    let q = vector![2.9, 4.1];
    assert_eq!(
        grid.find_nearest_in_radius(q, 1e12, pos, |_| false),
        Some(crate::graph::VertexId(1))
    );
    assert_eq!(
        grid.find_nearest_in_radius(q, f64::INFINITY, pos, |v| v.0 != 2),
        Some(crate::graph::VertexId(2))
    );
    assert_eq!(grid.find_nearest_in_radius(q, f64::NAN, pos, |_| false), None);
    assert_eq!(grid.find_nearest_in_radius(q, -1.0, pos, |_| false), None);
    // nothing within a small radius
    assert_eq!(grid.find_nearest_in_radius(q, 1e-3, pos, |_| false), None);
}

#[test]
fn connect_open_boundaries_accepts_unbounded_gap() {
    for gap in [500.0, f64::INFINITY] {
        let mut arr = Arrangement::default();
        arr.insert_segment(vector![0.0, 0.0], vector![1.0, 0.0], 0).unwrap();
        arr.insert_segment(vector![0.0, 1.0], vector![1.0, 1.0], 1).unwrap();
        assert_eq!(arr.connect_open_boundaries(gap).unwrap(), 2);
        let g = arr.graph();
        assert_eq!(g.edge_count(), 4);
        assert_eq!(g.vertex_ids().filter(|&v| g.is_boundary_vertex(v)).count(), 0);
        assert_eq!(g.edges_for_group(NO_GROUP).count(), 2);
    }
}

#[test]
fn cut_square_along_vertical_line() {
    let mut g = PlanarGraph::new();
    g.append_polygon(
        &[vector![0.0, 0.0], vector![2.0, 0.0], vector![2.0, 2.0], vector![0.0, 2.0]],
        0,
    )
    .unwrap();
    let line = Line2::new(vector![1.0, -5.0], vector![0.0, 1.0]).unwrap();
    let res = cut_graph(&mut g, &line, 1e-9).unwrap();
    assert_eq!(res.new_vertices.len(), 2);
    assert_eq!(res.new_edges.len(), 1);
    assert_eq!(g.vertex_count(), 6);
    assert_eq!(g.edge_count(), 7);
    let seg = g.edge_segment(res.new_edges[0]).unwrap();
    assert!((seg.center() - vector![1.0, 1.0]).norm() < 1e-12);
    g.check_validity(ValidityMode::Panic).unwrap();
}

#[test]
fn cut_through_corners_adds_diagonal() {
    let mut g = PlanarGraph::new();
    g.append_polygon(&unit_square(), 0).unwrap();
    let line = Line2::through(vector![0.0, 0.0], vector![1.0, 1.0]).unwrap();
    let res = LineCutter::new(&mut g, CutterCfg { tol: 1e-9, group: 7 })
        .cut(&line, None)
        .unwrap();
    assert!(res.new_vertices.is_empty());
    assert_eq!(res.new_edges.len(), 1);
    assert_eq!(g.edge_group(res.new_edges[0]).unwrap(), 7);
}

#[test]
fn cut_non_convex_polygon_with_inside_test() {
    let u = vec![
        vector![0.0, 0.0],
        vector![3.0, 0.0],
        vector![3.0, 3.0],
        vector![2.0, 3.0],
        vector![2.0, 1.0],
        vector![1.0, 1.0],
        vector![1.0, 3.0],
        vector![0.0, 3.0],
    ];
    let line = Line2::new(vector![0.0, 2.0], vector![1.0, 0.0]).unwrap();

    let mut all = PlanarGraph::new();
    all.append_polygon(&u, 0).unwrap();
    let res = cut_graph(&mut all, &line, 1e-9).unwrap();
    assert_eq!(res.new_vertices.len(), 4);
    assert_eq!(res.new_edges.len(), 3);

    let mut filtered = PlanarGraph::new();
    filtered.append_polygon(&u, 0).unwrap();
    let inside = |p: Vector2<f64>| polygon_contains(&u, p);
    let res = LineCutter::new(&mut filtered, CutterCfg::default())
        .cut(&line, Some(&inside))
        .unwrap();
    assert_eq!(res.new_edges.len(), 2);
    for e in res.new_edges {
        let c = filtered.edge_center(e).unwrap();
        assert!(polygon_contains(&u, c));
    }
}

#[test]
fn arrangement_cut_registers_new_vertices() {
    let mut arr = Arrangement::default();
    arr.insert_polygon(&unit_square(), 0).unwrap();
    let line = Line2::new(vector![0.5, 0.0], vector![0.0, 1.0]).unwrap();
    let res = arr.cut(&line, None).unwrap();
    for v in res.new_vertices {
        let p = arr.graph().vertex(v).unwrap();
        assert_eq!(arr.find_existing_vertex(p), Some(v));
    }
    // a later segment through the cut points reuses them
    arr.insert_segment(vector![0.5, 0.0], vector![0.5, -1.0], 0).unwrap();
    assert_eq!(arr.graph().vertex_count(), 7);
}

fn segment_soup() -> impl Strategy<Value = Vec<(Vector2<f64>, Vector2<f64>)>> {
    let pt = (-1.0f64..1.0, -1.0f64..1.0).prop_map(|(x, y)| vector![x, y]);
    prop::collection::vec((pt.clone(), pt), 1..8)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn random_segments_leave_no_interior_crossings(soup in segment_soup()) {
        let mut arr = Arrangement::default();
        for (i, (a, b)) in soup.iter().enumerate() {
            arr.insert_segment(*a, *b, i as i32).unwrap();
        }
        let g = arr.graph();
        prop_assert!(g.check_validity(ValidityMode::Error).is_ok());
        prop_assert!(interior_crossings(g, 1e-7).is_empty());
        for e in g.edge_ids() {
            prop_assert!(g.edge_group(e).unwrap() != NO_GROUP);
        }
    }
}
