// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CLI tool: replay a scene snapshot through post-load reconciliation
//!
//! Loads a JSON snapshot of a parsed model, reattaches orphaned meshes,
//! sanitizes materials, fits the camera and prints what was found. A model
//! that ends up empty or zero-sized is reported, not treated as a failure.
//!
//! Usage:
//!   ifc-viewport-inspect <snapshot.json> [options]

use anyhow::{bail, Context, Result};
use ifc_viewport_reconcile::{ReconcileConfig, ReconcileOutcome, Reconciler};
use ifc_viewport_scene::{CameraState, SceneSnapshot};
use std::env;
use std::fs;

struct Options {
    snapshot_path: String,
    fov: Option<f64>,
    json: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            env::var("RUST_LOG").unwrap_or_else(|_| "info,ifc_viewport=debug".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() || args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return;
    }

    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Error: {}", e);
            print_usage();
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&options) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

/// Parses the arguments after the program name. Options may appear before
/// or after the snapshot path.
fn parse_args(args: &[String]) -> Result<Options> {
    let mut snapshot_path: Option<String> = None;
    let mut fov = None;
    let mut json = false;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--fov" => {
                i += 1;
                let value = args.get(i).context("--fov needs a value")?;
                let degrees: f64 = value
                    .parse()
                    .with_context(|| format!("Invalid fov value: {}", value))?;
                fov = Some(degrees);
            }
            "--json" => {
                json = true;
            }
            other if other.starts_with('-') => bail!("Unknown option: {}", other),
            path => {
                if let Some(first) = &snapshot_path {
                    bail!("Unexpected argument {} (snapshot already given as {})", path, first);
                }
                snapshot_path = Some(path.to_string());
            }
        }
        i += 1;
    }

    Ok(Options {
        snapshot_path: snapshot_path.context("Missing <snapshot.json> argument")?,
        fov,
        json,
    })
}

fn run(options: &Options) -> Result<()> {
    let json = fs::read_to_string(&options.snapshot_path)
        .with_context(|| format!("Failed to read {}", options.snapshot_path))?;
    let scene = SceneSnapshot::from_json(&json)
        .and_then(SceneSnapshot::into_scene)
        .with_context(|| format!("Invalid snapshot {}", options.snapshot_path))?;

    let reconciler = Reconciler::new(ReconcileConfig::from_env());
    let config = reconciler.config();
    tracing::debug!(
        padding_factor = config.padding_factor,
        min_near = config.min_near,
        min_far = config.min_far,
        sanitize = ?config.sanitize,
        "Loaded reconciliation config"
    );

    let mut graph = scene.graph;
    let mut camera = scene.camera.unwrap_or_default();
    let fov = options.fov.unwrap_or(camera.fov);

    let outcome = reconciler.run_with_fov(
        &mut graph,
        scene.root,
        &scene.items,
        &mut camera,
        fov,
    );

    if options.json {
        print_json(&outcome, &camera)?;
    } else {
        print_text(&outcome, &camera);
    }
    Ok(())
}

fn print_json(outcome: &ReconcileOutcome, camera: &CameraState) -> Result<()> {
    let value = serde_json::json!({
        "repair": outcome.repair,
        "sanitize": outcome.sanitize,
        "fallback": outcome.fit.fallback_reason(),
        "camera": camera,
        "summary": outcome.summary,
        "degenerate": outcome.is_degenerate(),
        "message": outcome.summary.user_message(),
    });
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn print_text(outcome: &ReconcileOutcome, camera: &CameraState) {
    let summary = &outcome.summary;
    let repair = &outcome.repair;
    let sanitize = &outcome.sanitize;

    println!("Attachment:");
    if repair.already_populated {
        println!("  root already populated, nothing attached");
    } else {
        println!("  attached {} meshes, skipped {} items", repair.attached, repair.skipped);
    }

    println!("Materials ({} on {} meshes):", sanitize.materials, sanitize.nodes);
    println!("  opacity restored:  {}", sanitize.opacity);
    println!("  made double sided: {}", sanitize.side);
    println!("  black replaced:    {}", sanitize.color);
    println!("  made visible:      {}", sanitize.visibility);

    println!("Camera:");
    if let Some(reason) = outcome.fit.fallback_reason() {
        println!("  {}", reason);
    }
    println!(
        "  position ({:.3}, {:.3}, {:.3}) target ({:.3}, {:.3}, {:.3})",
        camera.position[0],
        camera.position[1],
        camera.position[2],
        camera.target[0],
        camera.target[1],
        camera.target[2]
    );
    println!("  near {} far {}", camera.near, camera.far);

    println!("Model:");
    println!("  meshes:    {}", summary.mesh_count);
    println!("  vertices:  {}", summary.vertex_count);
    println!("  materials: {}", summary.material_count);
    println!(
        "  center ({:.3}, {:.3}, {:.3}) size ({:.3}, {:.3}, {:.3})",
        summary.bounding_center[0],
        summary.bounding_center[1],
        summary.bounding_center[2],
        summary.bounding_size[0],
        summary.bounding_size[1],
        summary.bounding_size[2]
    );

    if let Some(message) = summary.user_message() {
        println!();
        println!("{}", message);
    }
}

fn print_usage() {
    println!(
        r#"IFC Viewport Inspector
======================

Replays a scene snapshot through post-load reconciliation: reattaches
orphaned meshes, repairs invisible materials, fits the camera and prints
the resulting diagnostics.

USAGE:
  ifc-viewport-inspect <snapshot.json> [OPTIONS]

ARGUMENTS:
  <snapshot.json>     Scene snapshot written by the viewer

OPTIONS:
  --fov <degrees>     Vertical field of view (default: the snapshot camera's)
  --json              Print the outcome as JSON
  -h, --help          Show this help message

ENVIRONMENT:
  RUST_LOG                         Log filter (default: info,ifc_viewport=debug)
  IFC_VIEWPORT_PADDING_FACTOR      Distance multiplier (default: 1.5)
  IFC_VIEWPORT_FALLBACK_POSITION   Camera position for empty models, "x,y,z"
  IFC_VIEWPORT_FALLBACK_TARGET     Look-at target for empty models, "x,y,z"
  IFC_VIEWPORT_DEFAULT_NEAR        Fallback near plane (default: 0.1)
  IFC_VIEWPORT_DEFAULT_FAR         Fallback far plane (default: 1000)
  IFC_VIEWPORT_MIN_NEAR            Lower bound of the fitted near plane
  IFC_VIEWPORT_MIN_FAR             Lower bound of the fitted far plane
  IFC_VIEWPORT_RESTORE_OPACITY     Make zero-opacity materials opaque (default: on)
  IFC_VIEWPORT_DOUBLE_SIDE         Make front-sided materials double sided (default: on)
  IFC_VIEWPORT_REPLACE_BLACK       Replace pure black colors (default: on)
  IFC_VIEWPORT_FORCE_VISIBLE       Show hidden meshes (default: on)

EXIT STATUS:
  0  snapshot processed (also when the model is empty or zero-sized)
  1  snapshot unreadable or invalid"#
    );
}
