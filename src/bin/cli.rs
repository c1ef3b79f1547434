// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! tritarget CLI

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use nalgebra::Vector3;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use tritarget::cli::{Reporter, RunResult, Runner};
use tritarget::geometry::placement;
use tritarget::{io, TriangulateConfig};

#[derive(Parser)]
#[command(name = "tritarget")]
#[command(about = "Triangulate quads along the diagonal closest to a target surface", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Triangulate a mesh toward a target and write the result
    Triangulate {
        #[command(flatten)]
        run: RunArgs,

        /// Output file (.obj keeps remaining quads, .stl triangulates everything)
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },

    /// Print the decision for every face without writing anything
    Inspect {
        #[command(flatten)]
        run: RunArgs,
    },

    /// Write the default configuration to a TOML file
    InitConfig {
        /// Destination file
        #[arg(default_value = tritarget::config::CONFIG_FILE)]
        path: PathBuf,
    },

    /// Show version information
    Version,
}

#[derive(Args)]
struct RunArgs {
    /// Mesh to triangulate
    #[arg(value_name = "SOURCE")]
    source: PathBuf,

    /// Target surface mesh (.obj or .stl)
    #[arg(short, long, value_name = "FILE")]
    target: PathBuf,

    /// Configuration file (defaults to ./tritarget.toml when present)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Maximum search distance; 0 or less searches without limit
    #[arg(long, allow_negative_numbers = true)]
    max_distance: Option<f64>,

    /// Quads with diagonal midpoints closer than this stay quads
    #[arg(long)]
    planarity_threshold: Option<f64>,

    /// Also cast rays against the face normal
    #[arg(long)]
    both_directions: bool,

    /// Only process these face indices (comma separated)
    #[arg(long, value_delimiter = ',')]
    faces: Option<Vec<usize>>,

    /// Stop after this many faces
    #[arg(long)]
    limit: Option<usize>,

    /// Translate the target
    #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"], allow_negative_numbers = true)]
    target_translate: Option<Vec<f64>>,

    /// Uniformly scale the target
    #[arg(long, default_value_t = 1.0)]
    target_scale: f64,
}

impl RunArgs {
    fn config(&self) -> Result<TriangulateConfig> {
        let mut config = match &self.config {
            Some(path) => TriangulateConfig::load_from(Some(path.as_path()))?,
            None => TriangulateConfig::load()?,
        };
        if let Some(max_distance) = self.max_distance {
            config.max_distance = max_distance;
        }
        if let Some(threshold) = self.planarity_threshold {
            config.planarity_threshold = threshold;
        }
        if self.both_directions {
            config.cast_both_directions = true;
        }
        config.validate()?;
        Ok(config)
    }

    fn runner(&self) -> Result<Runner> {
        let translation = match self.target_translate.as_deref() {
            Some([x, y, z]) => Vector3::new(*x, *y, *z),
            _ => Vector3::zeros(),
        };
        let mut runner = Runner::new(self.config()?)
            .with_target_matrix(placement(translation, self.target_scale));
        if let Some(faces) = &self.faces {
            runner = runner.with_faces(faces.clone());
        }
        if let Some(limit) = self.limit {
            runner = runner.with_limit(limit);
        }
        Ok(runner)
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let outcome = match &cli.command {
        Commands::Triangulate { run, output } => triangulate_command(run, output),
        Commands::Inspect { run } => inspect_command(run),
        Commands::InitConfig { path } => init_config_command(path),
        Commands::Version => {
            println!("tritarget v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    };

    if let Err(err) = outcome {
        Reporter::report_error(&format!("{err:#}"));
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tritarget={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn triangulate_command(args: &RunArgs, output: &Path) -> Result<()> {
    let runner = args.runner()?;
    let object = runner.load_source(&args.source)?;
    let target = runner.load_target(&args.target)?;
    Reporter::report_info(&format!(
        "{} ({} faces) toward {} ({} faces)",
        object.name.cyan(),
        object.mesh.face_count(),
        target.name.cyan(),
        target.mesh.face_count()
    ));

    let pb = ProgressBar::new(object.mesh.quad_faces(false).len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );

    let result = runner.run(object, &target, |report, status| {
        pb.set_length(report.total as u64);
        pb.set_position(report.position as u64);
        pb.set_message(status.lines().last().unwrap_or_default().to_string());
    })?;
    pb.finish_and_clear();

    warn_if_out_of_reach(&runner, &result);

    io::save_mesh(&result.object.mesh, output)
        .with_context(|| format!("Failed to save {:?}", output))?;

    Reporter::report_summary(
        &args.source.display().to_string(),
        &result.summary,
        result.object.mesh.face_count(),
        result.duration,
    );
    Reporter::success(&format!("Wrote {}", output.display()));
    Ok(())
}

fn inspect_command(args: &RunArgs) -> Result<()> {
    let runner = args.runner()?;
    let object = runner.load_source(&args.source)?;
    let target = runner.load_target(&args.target)?;

    println!("{}", "Decisions:".bold());
    let result = runner.run(object, &target, |report, _| Reporter::report_face(report))?;

    warn_if_out_of_reach(&runner, &result);
    Reporter::report_summary(
        &args.source.display().to_string(),
        &result.summary,
        result.object.mesh.face_count(),
        result.duration,
    );
    Ok(())
}

fn warn_if_out_of_reach(runner: &Runner, result: &RunResult) {
    if let Some(radius) = runner.out_of_reach(result) {
        Reporter::report_warning(&format!(
            "Target is {:.4} away, beyond --max-distance {}; every diagonal measured unbounded",
            result.target_gap, radius
        ));
    }
}

fn init_config_command(path: &Path) -> Result<()> {
    TriangulateConfig::default().save(path)?;
    Reporter::success(&format!("Wrote default configuration to {}", path.display()));
    Ok(())
}
