// Hide console window on Windows for release builds (GUI app).
// In debug builds, keep the console so panics/backtraces are visible.
#![cfg_attr(all(windows, not(debug_assertions)), windows_subsystem = "windows")]

use bevy::diagnostic::{FrameTimeDiagnosticsPlugin, LogDiagnosticsPlugin};
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;

use arbasket::basketball3d::{
    advance_tracking, handle_taps, limit_balls, move_device, pause_on_focus_change, replay,
    setup, start_session, toggle_pause, update_hud, AnchorNodes, BallCounter, DeviceLook,
    GameConfig, GameMode, ReplayReport, ReplayScript, SessionRng, SimulatedRoom, StepResult,
    TapOutcome, TrackingSession,
};

/// AR Basketball - hang a backboard on a wall and shoot hoops
#[derive(Parser)]
#[command(name = "arbasket")]
#[command(author, version, about = "AR Basketball - place a backboard on a tracked wall and throw balls at it")]
struct Cli {
    /// RON config file (defaults are used when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Draw physics colliders
    #[arg(long)]
    debug_physics: bool,

    /// Log frame rate and frame time diagnostics
    #[arg(long)]
    stats: bool,

    /// Print the default config as RON and exit
    #[arg(long)]
    print_default_config: bool,

    /// Replay a JSON event script without opening a window
    #[arg(long, value_name = "SCRIPT")]
    replay: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    if cli.print_default_config {
        match GameConfig::default().to_ron() {
            Ok(text) => println!("{text}"),
            Err(e) => fail(&e.to_string()),
        }
        return;
    }

    let config = match GameConfig::load_or_default(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => fail(&e.to_string()),
    };

    if let Some(script) = &cli.replay {
        run_replay(script, config);
    } else {
        run_3d_mode(&cli, config);
    }
}

fn fail(message: &str) -> ! {
    eprintln!("{} {}", "Error:".red().bold(), message);
    std::process::exit(1);
}

// ============================================================================
// Headless replay
// ============================================================================

fn run_replay(path: &std::path::Path, config: GameConfig) {
    let script = match ReplayScript::load(path) {
        Ok(script) => script,
        Err(e) => fail(&e.to_string()),
    };

    let report = replay(&script, config);
    print_report(&report);
}

fn describe_step(step: &StepResult) -> String {
    match step {
        StepResult::CameraMoved => "camera moved".dimmed().to_string(),
        StepResult::CameraLost => "camera lost".yellow().to_string(),
        StepResult::AnchorDelivered { id, changed } => {
            let effect = if *changed { "visual changed" } else { "no visual change" };
            format!("anchor {} delivered ({effect})", id.0)
        }
        StepResult::AnchorDropped(id) => {
            format!("anchor {} dropped", id.0).dimmed().to_string()
        }
        StepResult::Tap(TapOutcome::BackboardPlaced) => {
            "backboard placed".green().bold().to_string()
        }
        StepResult::Tap(TapOutcome::BallThrown) => "ball thrown".bright_green().to_string(),
        StepResult::Tap(TapOutcome::Skipped(reason)) => {
            format!("tap skipped ({reason:?})").yellow().to_string()
        }
        StepResult::Paused => "session paused".cyan().to_string(),
        StepResult::Resumed => "session resumed".cyan().to_string(),
    }
}

fn print_report(report: &ReplayReport) {
    println!("\n{}", "════════════════════════════════".cyan());
    for (i, step) in report.steps.iter().enumerate() {
        println!("{:>4}  {}", i + 1, describe_step(step));
    }
    println!("{}", "────────────────────────────────".cyan());
    println!("{} {}", "Mode:".bold().white(), report.mode.name().yellow().bold());
    println!("{} {}", "Plane visuals:".bold().white(), report.plane_visuals);
    println!("{} {}", "Backboards:".bold().white(), report.backboards);
    println!("{} {}", "Balls:".bold().white(), report.balls);
    println!("{}\n", "════════════════════════════════".cyan());
}

// ============================================================================
// 3D Mode
// ============================================================================

fn run_3d_mode(cli: &Cli, config: GameConfig) {
    if let Err(e) = config.check_assets() {
        fail(&e.to_string());
    }

    let window = Window {
        title: config.window.title.clone(),
        resolution: (config.window.width, config.window.height).into(),
        ..default()
    };
    let asset_root = config.assets.root.to_string_lossy().into_owned();

    let mut app = App::new();
    app.add_plugins(
        DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(window),
                ..default()
            })
            .set(AssetPlugin {
                file_path: asset_root,
                ..default()
            })
            .set(bevy::log::LogPlugin {
                level: bevy::log::Level::INFO,
                filter: "info,wgpu=error,naga=warn,arbasket=debug".to_string(),
                ..default()
            }),
    )
    .add_plugins(RapierPhysicsPlugin::<NoUserData>::default());

    if cli.debug_physics {
        app.add_plugins(RapierDebugRenderPlugin::default());
    }

    if cli.stats {
        app.add_plugins((
            FrameTimeDiagnosticsPlugin::default(),
            LogDiagnosticsPlugin::default(),
        ));
    }

    app.insert_resource(SimulatedRoom::from_config(&config.room))
        .insert_resource(TrackingSession::new(config.tracking.clone()))
        .insert_resource(config)
        .insert_resource(GameMode::default())
        .insert_resource(AnchorNodes::default())
        .insert_resource(BallCounter::default())
        .insert_resource(DeviceLook::default())
        .insert_resource(SessionRng::default())
        .add_systems(Startup, (setup, start_session).chain())
        .add_systems(
            Update,
            (
                (pause_on_focus_change, toggle_pause),
                move_device,
                advance_tracking,
                handle_taps,
                limit_balls,
                update_hud,
            )
                .chain(),
        )
        .run();
}
