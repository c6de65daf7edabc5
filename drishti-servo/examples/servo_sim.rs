//! Servoing simulation on a square target.
//!
//! Loads the experiment configuration, stacks the selected features on the
//! four corners of the target and drives a kinematic camera from the start
//! pose to the reference pose.
//!
//! Usage:
//!   cargo run --example servo_sim -- --config configs/servo.yaml
//!   cargo run --example servo_sim -- --lambda 1.0 --z-estim 0

use clap::Parser;
use std::path::Path;

use drishti_servo::{ServoConfig, StabilityReport, experiment_id, legend};

/// Visual servoing simulation
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "configs/servo.yaml")]
    config: String,

    /// Override the control gain
    #[arg(short, long)]
    lambda: Option<f64>,

    /// Override the depth estimate (<0 tracked, 0 desired, >0 constant)
    #[arg(short, long, allow_hyphen_values = true)]
    z_estim: Option<f64>,

    /// Print the error norm every N iterations (0 disables)
    #[arg(long, default_value_t = 100)]
    print_every: usize,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    // Load configuration
    let config_path = Path::new(&args.config);
    let mut config = if config_path.exists() {
        ServoConfig::load(config_path).unwrap_or_else(|e| {
            eprintln!("Warning: Failed to load config: {}, using defaults", e);
            ServoConfig::default()
        })
    } else {
        println!(
            "Config not found at {}, using defaults",
            config_path.display()
        );
        ServoConfig::default()
    };
    if let Some(lambda) = args.lambda {
        config.control.lambda = lambda;
    }
    if let Some(z_estim) = args.z_estim {
        config.features.z_estim = z_estim;
    }

    let mut stack = config.build_stack();
    if stack.dim_s() == 0 {
        eprintln!("No feature selected, nothing to servo");
        std::process::exit(1);
    }
    println!("{}", stack.summary());

    let id = experiment_id(&stack.summary(), config.control.lambda);
    println!("Experiment: {}", id);
    println!("Rows: {}", legend(&stack.layout()));

    let servo = config.servo_loop();
    let outcome = match servo.run(&mut stack, config.scene.start_pose()) {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("Servoing failed: {}", e);
            std::process::exit(1);
        }
    };

    if args.print_every > 0 {
        for step in outcome.history.iter().step_by(args.print_every) {
            match step.min_eigenvalue {
                Some(min) => println!(
                    "iter {:5}  |e| = {:.6}  min eig = {:.4}",
                    step.iteration, step.error_norm, min
                ),
                None => println!("iter {:5}  |e| = {:.6}", step.iteration, step.error_norm),
            }
        }
    }

    println!(
        "{} after {} iterations, |e| = {:.3e}",
        if outcome.converged {
            "Converged"
        } else {
            "Stopped"
        },
        outcome.iterations,
        outcome.final_error
    );
    let t = outcome.pose.translation.vector;
    let tu = outcome.pose.rotation.scaled_axis();
    println!(
        "Final pose: t = ({:.4}, {:.4}, {:.4}), θu = ({:.4}, {:.4}, {:.4})",
        t.x, t.y, t.z, tu.x, tu.y, tu.z
    );

    // Stability at the final pose
    if stack.has_diagnostics() {
        stack.current_vector(&outcome.pose);
        match stack.stability() {
            Ok(eigenvalues) => {
                println!("Stability eigenvalues: {:?}", eigenvalues);
                if let Some(report) = StabilityReport::from_eigenvalues(eigenvalues) {
                    println!(
                        "  min {:.4}, max {:.4}, {} negative, {} zero",
                        report.min, report.max, report.negative, report.zero
                    );
                }
            }
            Err(e) => eprintln!("Stability check failed: {}", e),
        }
    }
}
