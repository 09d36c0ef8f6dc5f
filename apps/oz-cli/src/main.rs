mod error;

use clap::{Parser, Subcommand};
use error::{CliError, CliResult};
use oz_project::{RangeDef, RunConfig, load_config};
use oz_results::{PointRecord, RunRecord, RunStore, save_results};
use oz_sweep::{SweepOutcome, SweepProgress, execute_sweep, execute_sweep_parallel};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "oz-cli")]
#[command(about = "Ornstein-Zernike liquid structure solver", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a run configuration
    Validate {
        /// Path to the YAML or JSON config
        config_path: PathBuf,
    },
    /// Solve a single state point
    Solve {
        /// Path to the YAML or JSON config
        config_path: PathBuf,
        #[arg(long)]
        temperature: f64,
        #[arg(long)]
        density: f64,
        /// Write the point, including g(r), as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Run the full (temperature, density) sweep
    Sweep {
        /// Path to the YAML or JSON config
        config_path: PathBuf,
        /// Solve points independently on all cores
        #[arg(long)]
        parallel: bool,
        /// Do not store the run
        #[arg(long)]
        no_save: bool,
        /// Store g(r) and h(r) for every point
        #[arg(long)]
        profiles: bool,
    },
    /// List stored runs
    Runs {
        /// Path to the YAML or JSON config
        config_path: PathBuf,
    },
    /// Show a stored run
    ShowRun {
        /// Path to the YAML or JSON config
        config_path: PathBuf,
        /// Run ID to display
        run_id: String,
    },
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { config_path } => cmd_validate(&config_path),
        Commands::Solve {
            config_path,
            temperature,
            density,
            output,
        } => cmd_solve(&config_path, temperature, density, output.as_deref()),
        Commands::Sweep {
            config_path,
            parallel,
            no_save,
            profiles,
        } => cmd_sweep(&config_path, parallel, !no_save, profiles),
        Commands::Runs { config_path } => cmd_runs(&config_path),
        Commands::ShowRun {
            config_path,
            run_id,
        } => cmd_show_run(&config_path, &run_id),
    }
}

/// Load a config and anchor its relative directories at the config file.
fn load(config_path: &Path) -> CliResult<RunConfig> {
    let mut config = load_config(config_path)?;
    let base = config_path.parent().unwrap_or_else(|| Path::new("."));
    if config.bridge_dir.is_relative() {
        config.bridge_dir = base.join(&config.bridge_dir);
    }
    if config.results_dir.is_relative() {
        config.results_dir = base.join(&config.results_dir);
    }
    Ok(config)
}

fn cmd_validate(config_path: &Path) -> CliResult<()> {
    println!("Validating config: {}", config_path.display());
    let config = load(config_path)?;
    oz_sweep::solve_config(&config).validate(config.grid.points)?;
    println!("✓ Config is valid");
    println!(
        "  {} / {} / {}  grid {} x {}",
        config.potential,
        config.closure,
        config.method.as_str(),
        config.grid.points,
        config.grid.length
    );
    println!(
        "  {} temperatures x {} densities",
        config.temperature.len(),
        config.density.len()
    );
    Ok(())
}

fn cmd_solve(
    config_path: &Path,
    temperature: f64,
    density: f64,
    output: Option<&Path>,
) -> CliResult<()> {
    let mut config = load(config_path)?;
    config.temperature = RangeDef::single(temperature);
    config.density = RangeDef::single(density);

    let started = Instant::now();
    let outcome = execute_sweep(&config, None, None)?;
    let point = outcome
        .points
        .first()
        .ok_or_else(|| CliError::InvalidInput("no state point solved".to_string()))?;

    println!(
        "T = {:.4}, rho = {:.4}: {} after {} iterations (dg = {:.3e}) in {:.2}s",
        temperature,
        density,
        point.status.as_str(),
        point.iterations,
        point.dg.unwrap_or(f64::NAN),
        started.elapsed().as_secs_f64()
    );
    if point.bridge_fallback {
        println!("  ! bridge table missing, solved with zero bridge function");
    }
    let t = &point.thermo;
    println!("  pressure (virial)  {:>14.6}", t.pressure);
    println!("  pressure (moment)  {:>14.6}", t.pressure_moment);
    println!("  energy             {:>14.6}", t.energy);
    println!("  chemical potential {:>14.6}", t.chemical_potential);
    println!("  g_max {:.4}, h_max {:.4}", point.g_max, point.h_max);

    if let Some(path) = output {
        let record = RunRecord::from_outcome(&config, &outcome, true);
        save_results(path, &record)?;
        println!("✓ Written to {}", path.display());
    }
    Ok(())
}

fn cmd_sweep(config_path: &Path, parallel: bool, save: bool, profiles: bool) -> CliResult<()> {
    let config = load(config_path)?;
    let total = config.temperature.len() * config.density.len();
    println!(
        "Sweeping {} state points ({} / {}, {})",
        total,
        config.potential,
        config.closure,
        config.method.as_str()
    );

    let started = Instant::now();
    let outcome = if parallel {
        run_parallel(&config)?
    } else {
        execute_sweep(&config, None, Some(&mut |event| render_progress(&event)))?
    };
    clear_progress_line();

    println!(
        "✓ {} of {} points converged in {:.2}s",
        outcome.num_converged(),
        outcome.total,
        started.elapsed().as_secs_f64()
    );
    print_points(
        &outcome
            .points
            .iter()
            .map(|p| PointRecord::from_point(p, false))
            .collect::<Vec<_>>(),
    );

    if save {
        let record = RunRecord::from_outcome(&config, &outcome, profiles);
        let store = RunStore::new(config.results_dir.clone())?;
        store.save_record(&record)?;
        println!("✓ Stored run {}", record.manifest.run_id);
    }
    Ok(())
}

fn run_parallel(config: &RunConfig) -> CliResult<SweepOutcome> {
    let (tx, rx) = mpsc::channel();
    let outcome = std::thread::scope(|scope| {
        let handle = scope.spawn(move || execute_sweep_parallel(config, None, Some(tx)));
        for event in rx {
            render_progress(&event);
        }
        handle.join()
    });
    match outcome {
        Ok(result) => Ok(result?),
        Err(_) => Err(CliError::InvalidInput(
            "parallel sweep worker panicked".to_string(),
        )),
    }
}

fn cmd_runs(config_path: &Path) -> CliResult<()> {
    let config = load(config_path)?;
    let store = RunStore::new(config.results_dir.clone())?;
    let runs = store.list_runs()?;

    if runs.is_empty() {
        println!("No stored runs in {}", store.root().display());
    } else {
        println!("Stored runs:");
        for m in runs {
            println!(
                "  {}  {}  {} {} {}  {}/{} converged{}",
                m.run_id,
                m.timestamp,
                m.potential,
                m.closure,
                m.method,
                m.converged_points,
                m.total_points,
                if m.cancelled { " (cancelled)" } else { "" }
            );
        }
    }
    Ok(())
}

fn cmd_show_run(config_path: &Path, run_id: &str) -> CliResult<()> {
    let config = load(config_path)?;
    let store = RunStore::new(config.results_dir.clone())?;
    let record = store.load_record(run_id)?;
    let m = &record.manifest;

    println!("Run {}", m.run_id);
    println!("  name:      {}", m.name);
    println!("  timestamp: {}", m.timestamp);
    println!("  version:   {}", m.solver_version);
    println!(
        "  model:     {} / {} / {}, grid {} x {}",
        m.potential, m.closure, m.method, m.grid_points, m.domain_length
    );
    print_points(&record.points);
    Ok(())
}

fn print_points(points: &[PointRecord]) {
    println!(
        "  {:>8} {:>8} {:>18} {:>6} {:>12} {:>12} {:>12} {:>12}",
        "T", "rho", "status", "iter", "P", "P_moment", "E", "mu"
    );
    for p in points {
        println!(
            "  {:>8.4} {:>8.4} {:>18} {:>6} {:>12.5} {:>12.5} {:>12.5} {:>12.5}",
            p.temperature,
            p.density,
            p.status,
            p.iterations,
            p.thermo.pressure,
            p.thermo.pressure_moment,
            p.thermo.energy,
            p.thermo.chemical_potential
        );
    }
}

fn clear_progress_line() {
    print!("\r{}\r", " ".repeat(100));
    let _ = io::stdout().flush();
}

fn render_progress(event: &SweepProgress) {
    let width = 28usize;
    let fraction = event.fraction_complete();
    let filled = ((fraction * width as f64).round() as usize).min(width);
    print!(
        "\r[{}{}] {:>6.2}%  T={:.3} rho={:.3}  {} ({} iter)",
        "#".repeat(filled),
        "-".repeat(width.saturating_sub(filled)),
        fraction * 100.0,
        event.point.temperature,
        event.point.density,
        event.status.as_str(),
        event.iterations
    );
    let _ = io::stdout().flush();
}
