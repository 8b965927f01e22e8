//! Build a small arrangement and print its cells and curves.
//!
//! Usage:
//!   cargo run -p planargraph --example square_cells
//!
//! Inserts a unit square, both diagonals, and a dangling spur, then prints the
//! face loops (4 triangles plus the outer face) and the curve decomposition.

use planargraph::api::{chain_group, curve_points, extract_curves, Arrangement, CellExtractor};
use planargraph::Vec2;

fn main() -> planargraph::Result<()> {
    let mut arr = Arrangement::default();
    let square = [
        Vec2::new(0.0, 0.0),
        Vec2::new(1.0, 0.0),
        Vec2::new(1.0, 1.0),
        Vec2::new(0.0, 1.0),
    ];
    arr.insert_polygon(&square, 0)?;
    arr.insert_segment(Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0), 1)?;
    arr.insert_segment(Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0), 2)?;
    arr.insert_segment(Vec2::new(1.0, 1.0), Vec2::new(1.5, 1.5), 3)?;

    let g = arr.graph();
    println!("V={} E={}", g.vertex_count(), g.edge_count());

    let cells = CellExtractor::new(g)?;
    for (i, c) in cells.cells().iter().enumerate() {
        let kind = if c.is_outer() { "outer" } else { "bounded" };
        println!(
            "cell {i}: {kind}, {} vertices, area {:.3}",
            c.len(),
            c.signed_area
        );
    }

    for (i, c) in extract_curves(g).iter().enumerate() {
        let pts = curve_points(g, c);
        println!(
            "curve {i}: closed={} points={} group={:?}",
            c.closed,
            pts.len(),
            chain_group(g, c)
        );
    }
    Ok(())
}
