use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use stepsmith_core::*;

#[derive(Parser)]
#[command(name = "stepsmith")]
#[command(about = "Workout step compiler for device export", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a workout description and write the wire emission plan
    Build {
        /// Workout description JSON file
        workout: PathBuf,

        /// Output path for the emission plan JSON
        #[arg(long, short)]
        out: Option<PathBuf>,

        /// Use lap-button completion for every exercise
        #[arg(long)]
        lap_button: bool,

        /// Force the sport classification (strength, cardio, running)
        #[arg(long)]
        sport: Option<String>,
    },

    /// Show the compiled steps without writing anything
    Preview {
        /// Workout description JSON file
        workout: PathBuf,

        /// Use lap-button completion for every exercise
        #[arg(long)]
        lap_button: bool,
    },

    /// Reconstruct a workout from a decoded record stream
    Inspect {
        /// Decoded record stream JSON file
        records: PathBuf,
    },
}

fn main() -> Result<()> {
    stepsmith_core::logging::init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    match cli.command {
        Commands::Build {
            workout,
            out,
            lap_button,
            sport,
        } => cmd_build(&workout, out, lap_button, sport, &config),
        Commands::Preview {
            workout,
            lap_button,
        } => cmd_preview(&workout, lap_button, &config),
        Commands::Inspect { records } => cmd_inspect(&records),
    }
}

fn load_workout(path: &Path) -> Result<Workout> {
    let contents = std::fs::read_to_string(path)?;
    let workout: Workout = serde_json::from_str(&contents)?;
    Ok(workout)
}

fn export_options(lap_button: bool, sport: Option<String>, config: &Config) -> ExportOptions {
    let forced_sport = sport
        .as_deref()
        .and_then(parse_sport)
        .or(config.export.force_sport);

    ExportOptions {
        use_lap_button: lap_button || config.export.use_lap_button,
        forced_sport,
        time_created: Some(chrono::Utc::now()),
    }
}

fn parse_sport(s: &str) -> Option<ForcedSport> {
    match s.to_lowercase().as_str() {
        "strength" => Some(ForcedSport::Strength),
        "cardio" => Some(ForcedSport::Cardio),
        "running" => Some(ForcedSport::Running),
        other => {
            eprintln!("Unknown sport: {}. Using auto-detection.", other);
            None
        }
    }
}

fn cmd_build(
    workout_path: &Path,
    out: Option<PathBuf>,
    lap_button: bool,
    sport: Option<String>,
    config: &Config,
) -> Result<()> {
    let workout = load_workout(workout_path)?;
    let resolver = CategoryResolver::new();
    let options = export_options(lap_button, sport, config);

    let bundle = export(&workout, &resolver, &options)?;

    let out_path = out.unwrap_or_else(|| workout_path.with_extension("plan.json"));
    let plan_json = serde_json::to_string_pretty(&bundle.plan)?;
    std::fs::write(&out_path, plan_json)?;

    display_summary(&bundle.preview);
    println!("✓ Emission plan written to {}", out_path.display());

    Ok(())
}

fn cmd_preview(workout_path: &Path, lap_button: bool, config: &Config) -> Result<()> {
    let workout = load_workout(workout_path)?;
    let resolver = CategoryResolver::new();
    let options = export_options(lap_button, None, config);

    let summary = preview(&workout, &resolver, &options)?;

    display_summary(&summary);
    println!();
    for (index, step) in summary.steps.iter().enumerate() {
        display_preview_step(index, step);
    }

    Ok(())
}

fn cmd_inspect(records_path: &Path) -> Result<()> {
    let contents = std::fs::read_to_string(records_path)?;
    let stream = parse_records(&contents)?;

    let report = validate_stream(&stream);
    let workout = decompile(&stream);

    println!("\n╭─────────────────────────────────────────╮");
    println!("│  {}", workout.name);
    println!("╰─────────────────────────────────────────╯");
    if let Some(sport) = &workout.sport {
        let sub_sport = workout.sub_sport.as_deref().unwrap_or("generic");
        println!("  Sport: {} / {}", sport, sub_sport);
    }
    if let Some(created) = &workout.created {
        println!("  Created: {}", created);
    }
    if let Some(manufacturer) = &workout.manufacturer {
        println!("  Manufacturer: {}", manufacturer);
    }
    println!();

    for step in &workout.steps {
        let duration = stepsmith_core::export::exercise_duration_display(&step.duration);
        if step.sets > 1 {
            println!("  • {} — {} × {} sets", step.name, duration, step.sets);
        } else {
            println!("  • {} — {}", step.name, duration);
        }
    }

    for warning in &report.warnings {
        println!("  ⚠ {}", warning);
    }
    if !report.valid {
        for issue in &report.issues {
            eprintln!("  ✗ {}", issue);
        }
        return Err(Error::Decode("record stream failed validation".into()));
    }

    Ok(())
}

fn display_summary(summary: &PreviewSummary) {
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  {}", summary.title);
    println!("╰─────────────────────────────────────────╯");
    println!("  Sport: {}", summary.sport_name);
    println!(
        "  Exercises: {}  Rests: {}  Sets: {}",
        summary.exercise_count, summary.rest_count, summary.total_sets
    );
    for warning in &summary.warnings {
        println!("  ⚠ {}", warning);
    }
}

fn display_preview_step(index: usize, step: &stepsmith_core::export::PreviewStep) {
    use stepsmith_core::export::PreviewStep;

    match step {
        PreviewStep::Warmup {
            display_name,
            duration_display,
        } => println!("  {:>3}. ~ {} ({})", index, display_name, duration_display),
        PreviewStep::Exercise {
            display_name,
            duration_display,
            sets,
            is_warmup_set,
            ..
        } => {
            let marker = if *is_warmup_set { "~" } else { "•" };
            if *sets > 1 {
                println!(
                    "  {:>3}. {} {} — {} × {} sets",
                    index, marker, display_name, duration_display, sets
                );
            } else {
                println!(
                    "  {:>3}. {} {} — {}",
                    index, marker, display_name, duration_display
                );
            }
        }
        PreviewStep::Rest {
            duration_display, ..
        } => println!("  {:>3}. · Rest — {}", index, duration_display),
        PreviewStep::Repeat {
            target_index,
            repeat_count,
        } => println!(
            "  {:>3}. ↺ Repeat from step {} × {}",
            index, target_index, repeat_count
        ),
    }
}
