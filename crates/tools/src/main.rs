use std::env;
use std::fs;
use std::path::PathBuf;

use foundation::math::Vec3;
use runtime::tools::{Tool, ToolKind};
use runtime::{ClickOutcome, Controller, Mode, ViewerConfig};
use scene::draw::DrawList;
use scene::hopf::{DEFAULT_FIBER_SEGMENTS, hopf_fiber};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = real_main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), String> {
    let mut args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        return Err(usage());
    }

    let cmd = args[1].clone();
    args.drain(0..2);

    match cmd.as_str() {
        "fiber" => cmd_fiber(args),
        "select" => cmd_select(args),
        "config" => cmd_config(args),
        _ => Err(usage()),
    }
}

#[derive(Debug, Serialize)]
struct FiberReport {
    base_point: Vec3,
    segments: usize,
    points: Vec<Vec3>,
}

fn cmd_fiber(args: Vec<String>) -> Result<(), String> {
    // fibration fiber <x> <y> <z> [--segments N]
    let mut segments = DEFAULT_FIBER_SEGMENTS;
    let mut coords: Vec<String> = Vec::new();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--segments" => {
                i += 1;
                let v = args.get(i).ok_or("--segments requires a value")?;
                segments = v
                    .parse::<usize>()
                    .map_err(|e| format!("invalid --segments {v:?}: {e}"))?;
                if segments == 0 {
                    return Err("--segments must be at least 1".to_string());
                }
            }
            s if s.starts_with("--") => {
                return Err(format!("unknown arg: {s}\n\n{}", usage()));
            }
            _ => coords.push(args[i].clone()),
        }
        i += 1;
    }

    let report = fiber_report(parse_point(&coords)?, segments)?;
    let payload = serde_json::to_string_pretty(&report).map_err(|e| format!("json: {e}"))?;
    println!("{payload}");
    Ok(())
}

fn fiber_report(point: Vec3, segments: usize) -> Result<FiberReport, String> {
    let n = point
        .normalized()
        .ok_or("the base point must not be the origin")?;
    debug!(x = n.x, y = n.y, z = n.z, segments, "generating fiber");
    Ok(FiberReport {
        base_point: n,
        segments,
        points: hopf_fiber(n, segments),
    })
}

#[derive(Debug, Serialize)]
struct SelectReport {
    tool: String,
    mode: String,
    hit: Vec3,
    outcome: String,
    warnings: Vec<String>,
    artifacts: DrawList,
}

fn cmd_select(args: Vec<String>) -> Result<(), String> {
    // fibration select --tool hopf|stereo --mode point|longitude|latitude <x> <y> <z> [--config FILE]
    let mut kind: Option<ToolKind> = None;
    let mut mode: Option<Mode> = None;
    let mut config_path: Option<PathBuf> = None;
    let mut coords: Vec<String> = Vec::new();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--tool" => {
                i += 1;
                let v = args.get(i).ok_or("--tool requires a value")?;
                kind = Some(ToolKind::parse(v).ok_or_else(|| format!("unknown tool: {v}"))?);
            }
            "--mode" => {
                i += 1;
                let v = args.get(i).ok_or("--mode requires a value")?;
                mode = Some(Mode::parse(v).ok_or_else(|| format!("unknown mode: {v}"))?);
            }
            "--config" => {
                i += 1;
                let v = args.get(i).ok_or("--config requires a value")?;
                config_path = Some(PathBuf::from(v));
            }
            s if s.starts_with("--") => {
                return Err(format!("unknown arg: {s}\n\n{}", usage()));
            }
            _ => coords.push(args[i].clone()),
        }
        i += 1;
    }

    let kind = kind.ok_or("select requires --tool")?;
    let mode = mode.ok_or("select requires --mode")?;
    let config = match config_path {
        Some(path) => load_config(&path)?,
        None => ViewerConfig::default(),
    };

    let report = select_report(kind, mode, parse_point(&coords)?, &config)?;
    let payload = serde_json::to_string_pretty(&report).map_err(|e| format!("json: {e}"))?;
    println!("{payload}");
    for w in &report.warnings {
        eprintln!("warning: {w}");
    }
    Ok(())
}

/// One click through a fresh controller.
///
/// `point` is moved onto the tool's sphere along the line from its center.
fn select_report(
    kind: ToolKind,
    mode: Mode,
    point: Vec3,
    config: &ViewerConfig,
) -> Result<SelectReport, String> {
    let mut controller = Controller::from_config(kind, config).map_err(|e| e.to_string())?;
    let sphere = controller.tool().sphere();
    let dir = (point - sphere.center)
        .normalized()
        .ok_or("the point must not be the sphere center")?;
    let hit = sphere.center + dir.scale(sphere.radius);

    controller.set_mode(mode, true);
    let outcome = controller.select(Some(hit));
    info!(tool = %kind, %mode, ?outcome, "click processed");

    let warnings = controller.warnings().map(str::to_string).collect();

    Ok(SelectReport {
        tool: kind.label().to_string(),
        mode: mode.label().to_string(),
        hit,
        outcome: outcome_label(&outcome).to_string(),
        warnings,
        artifacts: controller.artifacts().clone(),
    })
}

fn outcome_label(outcome: &ClickOutcome) -> &'static str {
    match outcome {
        ClickOutcome::Missed => "missed",
        ClickOutcome::Frozen => "frozen",
        ClickOutcome::Idle => "idle",
        ClickOutcome::Drawn { .. } => "drawn",
        ClickOutcome::Ignored => "ignored",
        ClickOutcome::Warned(_) => "warned",
    }
}

fn cmd_config(args: Vec<String>) -> Result<(), String> {
    // fibration config
    if !args.is_empty() {
        return Err(usage());
    }
    let payload = ViewerConfig::default()
        .to_json_pretty()
        .map_err(|e| e.to_string())?;
    println!("{payload}");
    Ok(())
}

fn load_config(path: &PathBuf) -> Result<ViewerConfig, String> {
    let text = fs::read_to_string(path).map_err(|e| format!("read {path:?}: {e}"))?;
    ViewerConfig::from_json_str(&text).map_err(|e| format!("{path:?}: {e}"))
}

fn parse_point(coords: &[String]) -> Result<Vec3, String> {
    let [x, y, z] = coords else {
        return Err(format!("expected 3 coordinates, got {}\n\n{}", coords.len(), usage()));
    };
    let parse = |s: &String| {
        s.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| format!("invalid coordinate: {s:?}"))
    };
    Ok(Vec3::new(parse(x)?, parse(y)?, parse(z)?))
}

fn usage() -> String {
    let exe = env::args().next().unwrap_or_else(|| "fibration".to_string());
    format!(
        "Usage:\n  {exe} fiber <x> <y> <z> [--segments N]\n  {exe} select --tool hopf|stereo --mode point|longitude|latitude <x> <y> <z> [--config FILE]\n  {exe} config\n\nNotes:\n- `fiber` normalizes the point onto S^2 and prints its projected Hopf fiber.\n- `select` snaps the point onto the tool's sphere, runs one click and prints the drawing.\n- Set RUST_LOG=debug for diagnostics on stderr.\n"
    )
}
