//! Hexapod kinematics CLI.
//!
//! Subcommands:
//! - `info`: Print leg dimensions and reach for the configured model
//! - `fk`: Tip position of one leg for given joint angles
//! - `ik`: Solve one leg for a tip target and clamp to limits
//! - `joints`: World-frame joint positions of every leg
//! - `jacobian`: Positional Jacobian of a DH chain

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use nalgebra::{Isometry3, Vector3};
use tracing::info;
use tracing_subscriber::EnvFilter;

use hexapod_core::{HexapodError, JointAngles, LegId, ModelConfig};
use hexapod_dh::{DhParameters, create_jacobian};
use hexapod_ik::{JOINT_POSITIONS_PER_LEG, Model};

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

/// Hexapod leg kinematics and DH Jacobians.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Model configuration (TOML). Uses the built-in model when omitted.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print leg dimensions and reach.
    Info,

    /// Tip position of one leg, in the body frame.
    Fk {
        /// Leg name, e.g. `front_left`.
        #[arg(short, long, value_parser = parse_leg)]
        leg: LegId,

        /// Yaw angle (rad).
        #[arg(allow_negative_numbers = true)]
        yaw: f64,

        /// Lift angle (rad).
        #[arg(allow_negative_numbers = true)]
        lift: f64,

        /// Knee angle (rad).
        #[arg(allow_negative_numbers = true)]
        knee: f64,
    },

    /// Joint angles placing one leg's tip at a body-frame target.
    Ik {
        /// Leg name, e.g. `front_left`.
        #[arg(short, long, value_parser = parse_leg)]
        leg: LegId,

        #[arg(allow_negative_numbers = true)]
        x: f64,

        #[arg(allow_negative_numbers = true)]
        y: f64,

        #[arg(allow_negative_numbers = true)]
        z: f64,
    },

    /// World-frame root, hip, knee and tip positions of every leg.
    Joints {
        /// Lift angle applied to every leg (rad).
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        lift: f64,

        /// Knee angle applied to every leg (rad).
        #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
        knee: f64,
    },

    /// Positional Jacobian of a chain given as `d,r,theta,alpha` records.
    Jacobian {
        /// One DH record per joint, base first.
        #[arg(long = "dh", required = true, num_args = 1.., allow_hyphen_values = true, value_parser = parse_dh)]
        dh: Vec<DhParameters>,
    },
}

fn parse_leg(name: &str) -> Result<LegId, String> {
    LegId::from_name(name).ok_or_else(|| {
        let names: Vec<String> = LegId::ALL.iter().map(ToString::to_string).collect();
        format!("unknown leg `{name}`, expected one of: {}", names.join(", "))
    })
}

fn parse_dh(record: &str) -> Result<DhParameters, String> {
    let values = record
        .split(',')
        .map(|v| v.trim().parse::<f64>().map_err(|e| format!("`{v}`: {e}")))
        .collect::<Result<Vec<_>, _>>()?;
    let &[d, r, theta, alpha] = values.as_slice() else {
        return Err(format!(
            "expected 4 comma-separated values (d,r,theta,alpha), got {}",
            values.len()
        ));
    };
    Ok(DhParameters::new(d, r, theta, alpha))
}

fn load_model(path: Option<&PathBuf>) -> Result<Model, HexapodError> {
    let config = match path {
        Some(path) => {
            info!(path = %path.display(), "loading model configuration");
            ModelConfig::from_file(path)?
        }
        None => ModelConfig::default(),
    };
    Model::new(&config)
}

fn fmt_vec(v: &Vector3<f64>) -> String {
    format!("({:+.4}, {:+.4}, {:+.4})", v.x, v.y, v.z)
}

// ---------------------------------------------------------------------------
// Mode implementations
// ---------------------------------------------------------------------------

fn run_info(model: &Model) {
    println!("hexapod v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!(
        "{:<13} {:>6} {:>8} {:>8} {:>8} {:>9} {:>9}",
        "leg", "mirror", "hip", "femur", "tibia", "min_reach", "max_reach"
    );
    for leg in model.legs() {
        let dims = leg.dimensions();
        println!(
            "{:<13} {:>+6.0} {:>8.4} {:>8.4} {:>8.4} {:>9.4} {:>9.4}",
            leg.id().to_string(),
            leg.mirror().factor(),
            dims.hip_length,
            dims.femur_length,
            dims.tibia_length,
            dims.min_leg_length,
            dims.max_leg_length,
        );
    }
    println!();
    for leg in model.legs() {
        let limits = model.limits().for_position(leg.id().position);
        println!(
            "{:<13} yaw [{:+.3}, {:+.3}]  lift [{:+.3}, {:+.3}]  knee [{:+.3}, {:+.3}]",
            leg.id().to_string(),
            limits.yaw.min,
            limits.yaw.max,
            limits.lift.min,
            limits.lift.max,
            limits.knee.min,
            limits.knee.max,
        );
    }
}

fn run_fk(model: &Model, id: LegId, angles: JointAngles) {
    let tip = model.leg(id).calculate_fk(angles);
    println!("{id} tip {}", fmt_vec(&tip));
}

fn run_ik(model: &mut Model, id: LegId, target: Vector3<f64>) -> Result<(), HexapodError> {
    let solution = model.leg(id).solve_local_ik(&target)?;
    if solution.length_clamped() {
        println!(
            "target out of reach: length {:.4} solved as {:.4}",
            solution.requested_length, solution.solved_length
        );
    }

    let limits = model.limits().for_position(id.position);
    let leg = model.leg_mut(id);
    leg.apply_solution(&solution, &target, false);
    let mut events = Vec::new();
    leg.clamp_to(&limits, &mut events);

    let angles = leg.angles();
    println!(
        "{id} yaw {:+.4} lift {:+.4} knee {:+.4}",
        angles.yaw, angles.lift, angles.knee
    );
    println!("tip {}", fmt_vec(&leg.local_tip_position()));
    for event in &events {
        println!(
            "limit: {:?} requested {:+.4} clamped to {:+.4}",
            event.joint, event.requested, event.clamped
        );
    }
    Ok(())
}

fn run_joints(model: &mut Model, lift: f64, knee: f64) -> Result<(), HexapodError> {
    for id in LegId::ALL {
        let yaw = model.limits().stance_yaw(id.position);
        model.set_leg_start_angles(id, JointAngles::new(yaw, lift, knee));
    }
    let events = model.clamp_to_limits();
    if !events.is_empty() {
        println!("{} joint(s) clamped to limits", events.len());
    }

    let positions = model.joint_positions(&Isometry3::identity())?;
    let labels = ["root", "hip", "knee", "tip"];
    for (id, points) in LegId::ALL
        .iter()
        .zip(positions.chunks(JOINT_POSITIONS_PER_LEG))
    {
        println!("{id}");
        for (label, p) in labels.iter().zip(points) {
            println!("  {label:<5} {}", fmt_vec(&p.coords));
        }
    }
    Ok(())
}

fn run_jacobian(chain: &[DhParameters]) -> Result<(), HexapodError> {
    let j = create_jacobian(chain)?;
    for row in j.row_iter() {
        let cells: Vec<String> = row.iter().map(|v| format!("{v:+.6}")).collect();
        println!("[{}]", cells.join(", "));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn run(cli: Cli) -> Result<(), HexapodError> {
    let config = cli.config.as_ref();
    match cli.command.unwrap_or(Commands::Info) {
        Commands::Info => run_info(&load_model(config)?),
        Commands::Fk {
            leg,
            yaw,
            lift,
            knee,
        } => run_fk(&load_model(config)?, leg, JointAngles::new(yaw, lift, knee)),
        Commands::Ik { leg, x, y, z } => {
            run_ik(&mut load_model(config)?, leg, Vector3::new(x, y, z))?;
        }
        Commands::Joints { lift, knee } => run_joints(&mut load_model(config)?, lift, knee)?,
        Commands::Jacobian { dh } => run_jacobian(&dh)?,
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
