use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use pert_cpm::{
    Activity, Analysis, CrashingOptions, CrashingScheme, EngineConfig, EstimateMethod,
    ProjectReport, ReportMetadata, ScheduleError, analyze_with, calculate_crashing_options_with,
    calculate_crashing_scheme_with, load_activities, logging, network::diagram,
};
use polars::prelude::{AnyValue, DataFrame};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "pert: CPM/PERT schedule analysis and crashing",
    long_about = None
)]
struct Cli {
    /// Engine config file (TOML).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Row format for bulk table input (`cpm` or `pert`).
    #[arg(long, global = true, default_value = "cpm")]
    method: EstimateMethod,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(about = "Compute ES/EF/LS/LF, slack and the critical path")]
    Analyze { file: PathBuf },

    #[command(about = "Probability of finishing by a deadline")]
    Probability {
        file: PathBuf,
        #[arg(long)]
        deadline: f64,
    },

    #[command(name = "crash-options", about = "Rank crashable critical activities by cost slope")]
    CrashOptions { file: PathBuf },

    #[command(about = "Crash the project toward a target duration")]
    Crash {
        file: PathBuf,
        /// Target duration; defaults to the configured ratio of the current one.
        #[arg(long)]
        target: Option<f64>,
    },

    #[command(about = "Write a JSON report bundling input and results")]
    Report {
        file: PathBuf,
        #[arg(long, default_value = "New Project")]
        name: String,
        #[arg(long, default_value = "days")]
        time_unit: String,
        /// Output path; stdout when omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    #[command(about = "Render the network as Graphviz DOT")]
    Diagram {
        file: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn schedule_error(err: ScheduleError) -> anyhow::Error {
    anyhow!("{err} [{}]", err.code())
}

fn load(cli: &Cli, config: &EngineConfig, file: &Path) -> anyhow::Result<Vec<Activity>> {
    load_activities(file, cli.method, config.predecessor_delimiter)
        .with_context(|| format!("reading {}", file.display()))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}

fn fmt_num(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

fn cell_text(av: &AnyValue<'_>) -> String {
    match av {
        AnyValue::Null => String::new(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::Float64(v) => fmt_num(*v),
        AnyValue::Boolean(v) => if *v { "yes" } else { "" }.to_string(),
        AnyValue::String(s) => s.to_string(),
        _ => av.to_string(),
    }
}

fn render_df_as_text_table(df: &DataFrame) -> String {
    let columns = df.get_columns();
    let col_names: Vec<String> = columns.iter().map(|c| c.name().to_string()).collect();

    let cells: Vec<Vec<String>> = (0..df.height())
        .map(|row_idx| {
            columns
                .iter()
                .map(|col| col.get(row_idx).map(|av| cell_text(&av)).unwrap_or_default())
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = col_names.iter().map(|n| n.len()).collect();
    for row in &cells {
        for (ci, cell) in row.iter().enumerate() {
            widths[ci] = widths[ci].max(cell.len());
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let render_row = |values: &[String]| {
        let mut line = String::from("|");
        for (ci, value) in values.iter().enumerate() {
            line.push(' ');
            line.push_str(value);
            line.push_str(&" ".repeat(widths[ci].saturating_sub(value.len())));
            line.push_str(" |");
        }
        line
    };

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    out.push_str(&render_row(&col_names));
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');
    for row in &cells {
        out.push_str(&render_row(row));
        out.push('\n');
    }
    out.push_str(&sep);
    out.push('\n');
    out
}

fn print_analysis(analysis: &Analysis) -> anyhow::Result<()> {
    let df = analysis.to_dataframe()?;
    print!("{}", render_df_as_text_table(&df));
    println!("Project duration : {}", fmt_num(analysis.project_duration));
    println!("Critical path    : {}", analysis.critical_path.join(" -> "));
    if analysis.project_variance > 0.0 {
        println!(
            "Project variance : {:.4} (std dev {:.4})",
            analysis.project_variance,
            analysis.std_deviation()
        );
    }
    Ok(())
}

fn print_options(options: &CrashingOptions) {
    println!("Project duration : {}", fmt_num(options.project_duration));
    println!("Critical path    : {}", options.critical_path.join(" -> "));
    if options.crashing_options.is_empty() {
        println!("No crashable activities on the critical path.");
        return;
    }
    println!(
        "{:<10} {:>8} {:>8} {:>10} {:>12}",
        "activity", "normal", "crash", "max cut", "cost/unit"
    );
    for option in &options.crashing_options {
        println!(
            "{:<10} {:>8} {:>8} {:>10} {:>12.2}",
            option.activity_id,
            fmt_num(option.normal_time),
            fmt_num(option.crash_time),
            fmt_num(option.max_crashable),
            option.crash_slope
        );
    }
}

fn print_scheme(scheme: &CrashingScheme) {
    println!(
        "{:>4} {:<10} {:>8} {:>10} {:>12} {:>10}",
        "step", "activity", "amount", "cost", "cumulative", "duration"
    );
    for step in &scheme.crashing_steps {
        println!(
            "{:>4} {:<10} {:>8} {:>10.2} {:>12.2} {:>10}",
            step.step,
            step.activity_crashed,
            fmt_num(step.amount_crashed),
            step.cost_increase,
            step.cumulative_cost,
            fmt_num(step.new_duration)
        );
    }
    println!(
        "Duration {} -> {} (target {}, {})",
        fmt_num(scheme.initial_duration),
        fmt_num(scheme.final_duration),
        fmt_num(scheme.target_duration),
        scheme.state
    );
    println!("Total cost increase: {:.2}", scheme.total_cost_increase);
    println!("Final critical path: {}", scheme.final_critical_path.join(" -> "));
}

fn write_output(output: Option<&Path>, contents: &str) -> anyhow::Result<()> {
    match output {
        Some(path) => fs::write(path, contents).with_context(|| format!("writing {}", path.display())),
        None => {
            print!("{contents}");
            Ok(())
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => EngineConfig::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => EngineConfig::default(),
    };

    match &cli.command {
        Commands::Analyze { file } => {
            let activities = load(&cli, &config, file)?;
            let analysis = analyze_with(&activities, &config).map_err(schedule_error)?;
            if cli.json {
                print_json(&analysis)?;
            } else {
                print_analysis(&analysis)?;
            }
        }
        Commands::Probability { file, deadline } => {
            let activities = load(&cli, &config, file)?;
            let analysis = analyze_with(&activities, &config).map_err(schedule_error)?;
            let result = analysis.probability(*deadline);
            if cli.json {
                print_json(&result)?;
            } else {
                println!("Expected duration : {}", fmt_num(analysis.project_duration));
                println!("Std deviation     : {:.4}", result.std_deviation);
                println!("Z-score           : {:.4}", result.zscore);
                println!(
                    "P(finish <= {}) : {:.4}",
                    fmt_num(*deadline),
                    result.probability
                );
            }
        }
        Commands::CrashOptions { file } => {
            let activities = load(&cli, &config, file)?;
            let options =
                calculate_crashing_options_with(&activities, &config).map_err(schedule_error)?;
            if cli.json {
                print_json(&options)?;
            } else {
                print_options(&options);
            }
        }
        Commands::Crash { file, target } => {
            let activities = load(&cli, &config, file)?;
            let scheme = calculate_crashing_scheme_with(&activities, *target, &config)
                .map_err(schedule_error)?;
            if cli.json {
                print_json(&scheme)?;
            } else {
                print_scheme(&scheme);
            }
        }
        Commands::Report {
            file,
            name,
            time_unit,
            output,
        } => {
            let activities = load(&cli, &config, file)?;
            let metadata = ReportMetadata {
                project_name: name.clone(),
                time_unit: time_unit.clone(),
                ..ReportMetadata::default()
            };
            let report =
                ProjectReport::build(metadata, &activities, &config).map_err(schedule_error)?;
            match output {
                Some(path) => {
                    let file = File::create(path)
                        .with_context(|| format!("creating {}", path.display()))?;
                    report.write_json(BufWriter::new(file))?;
                    eprintln!("report written to {}", path.display());
                }
                None => {
                    report.write_json(io::stdout().lock())?;
                    println!();
                }
            }
        }
        Commands::Diagram { file, output } => {
            let activities = load(&cli, &config, file)?;
            let dot = diagram::to_dot(&activities, &config).map_err(schedule_error)?;
            write_output(output.as_deref(), &dot)?;
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    logging::init_tracing();
    run(Cli::parse())
}
