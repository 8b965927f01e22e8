use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use planargraph::api::{
    draw_segment_soup, Arrangement, ArrangementCfg, Line2, ReplayToken, SoupCfg, ValidityMode,
};
use planargraph::Vec2;
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;

mod doc;
mod provenance;

use doc::{InputDoc, OutputDoc, SegmentIn};
use provenance::Payload;

#[derive(Parser)]
#[command(name = "planargraph-cli")]
#[command(about = "Build planar arrangements from JSON and extract cells and curves")]
struct Cmd {
    /// Optional run tag; propagated to provenance and logs
    #[arg(long)]
    tag: Option<String>,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Arrange the input geometry and write vertices, edges, cells and curves
    Arrange {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
        /// Vertex merge distance
        #[arg(long, default_value_t = planargraph::cfg::VERTEX_SNAP_TOL)]
        snap_tol: f64,
        /// Join dangling vertices closer than this after insertion
        #[arg(long)]
        connect_gap: Option<f64>,
        /// Cut along the line through (OX, OY) with direction (DX, DY)
        #[arg(long, num_args = 4, value_names = ["OX", "OY", "DX", "DY"], allow_negative_numbers = true)]
        cut: Option<Vec<f64>>,
        /// Only extract curves (works on inputs the cell walk rejects)
        #[arg(long)]
        curves_only: bool,
    },
    /// Write a random segment soup in the input format
    Sample {
        #[arg(long)]
        out: PathBuf,
        #[arg(long, default_value_t = 32)]
        segments: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, default_value_t = 1.0)]
        extent: f64,
    },
    /// Print a small provenance JSON block
    Report,
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Arrange {
            input,
            out,
            snap_tol,
            connect_gap,
            cut,
            curves_only,
        } => arrange(
            &input,
            &out,
            snap_tol,
            connect_gap,
            cut.as_deref(),
            curves_only,
            cmd.tag,
        ),
        Action::Sample {
            out,
            segments,
            seed,
            extent,
        } => sample(&out, segments, seed, extent, cmd.tag),
        Action::Report => report(cmd.tag),
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    Ok(())
}

fn arrange(
    input: &Path,
    out: &Path,
    snap_tol: f64,
    connect_gap: Option<f64>,
    cut: Option<&[f64]>,
    curves_only: bool,
    tag: Option<String>,
) -> Result<()> {
    tracing::info!(input = %input.display(), out = %out.display(), snap_tol, tag = ?tag, "arrange");
    if !(snap_tol > 0.0) {
        bail!("--snap-tol must be positive, got {snap_tol}");
    }
    let text = std::fs::read_to_string(input)
        .with_context(|| format!("reading {}", input.display()))?;
    let doc: InputDoc = serde_json::from_str(&text)
        .with_context(|| format!("parsing {}", input.display()))?;

    let mut arr = Arrangement::new(ArrangementCfg {
        vertex_snap_tol: snap_tol,
        ..ArrangementCfg::default()
    });
    doc.insert_into(&mut arr)?;
    let mut joins = 0;
    if let Some(gap) = connect_gap {
        joins = arr
            .connect_open_boundaries(gap)
            .context("connecting open boundaries")?;
    }
    let mut cut_edges = 0;
    if let Some(&[ox, oy, dx, dy]) = cut {
        let line = Line2::new(Vec2::new(ox, oy), Vec2::new(dx, dy))
            .context("cut direction must be non-zero")?;
        cut_edges = arr.cut(&line, None).context("cutting")?.new_edges.len();
    }
    arr.graph()
        .check_validity(ValidityMode::Error)
        .context("validating arrangement")?;
    tracing::info!(
        items = doc.item_count(),
        vertices = arr.graph().vertex_count(),
        edges = arr.graph().edge_count(),
        joins,
        cut_edges,
        "arranged"
    );

    let result = OutputDoc::from_graph(arr.graph(), !curves_only)?;
    ensure_parent(out)?;
    std::fs::write(out, serde_json::to_vec_pretty(&result)?)
        .with_context(|| format!("writing {}", out.display()))?;

    let payload = Payload::new(json!({
        "input": input.to_string_lossy(),
        "snap_tol": snap_tol,
        "connect_gap": connect_gap,
        "cut": cut,
        "curves_only": curves_only,
    }))
    .with_tag(tag)
    .with_summary(json!({
        "vertices": result.vertices.len(),
        "edges": result.edges.len(),
        "cells": result.cells.len(),
        "curves": result.curves.len(),
        "joins": joins,
        "cut_edges": cut_edges,
    }));
    let prov = provenance::write_sidecar(out, payload)?;
    tracing::info!(provenance = %prov.display(), "wrote outputs");
    Ok(())
}

fn sample(out: &Path, segments: usize, seed: u64, extent: f64, tag: Option<String>) -> Result<()> {
    tracing::info!(out = %out.display(), segments, seed, extent, "sample");
    let cfg = SoupCfg {
        segments,
        extent,
        max_len: None,
    };
    let doc = InputDoc {
        segments: draw_segment_soup(cfg, ReplayToken::new(seed, 0))
            .into_iter()
            .enumerate()
            .map(|(i, (a, b))| SegmentIn {
                a: [a.x, a.y],
                b: [b.x, b.y],
                group: i as i32,
            })
            .collect(),
        ..InputDoc::default()
    };
    ensure_parent(out)?;
    std::fs::write(out, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {}", out.display()))?;
    let payload = Payload::new(json!({
        "segments": segments,
        "seed": seed,
        "extent": extent,
    }))
    .with_tag(tag);
    provenance::write_sidecar(out, payload)?;
    Ok(())
}

fn report(tag: Option<String>) -> Result<()> {
    let obj = provenance::document(&Payload::new(json!({})).with_tag(tag), &[]);
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}
