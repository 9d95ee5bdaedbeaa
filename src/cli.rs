use anyhow::{Context as _, Result};
use autoeda::analyser::EdaSession;
use autoeda::analyser::logic::{self, DatasetOverview, MissingValueSummary, NumericSummary};
use autoeda::config::{AppSettings, load_app_config};
use autoeda::pipeline::{PipelineSpec, run_pipeline};
use autoeda::utils::{fmt_opt, fmt_pct};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "autoeda", version, about = "Exploratory data analysis and preprocessing")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show shape, duplicates, column partition and missing values
    Overview {
        /// CSV file to load. Defaults to the configured example dataset.
        file: Option<PathBuf>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Describe numeric columns or inspect one feature
    Describe {
        /// CSV file to load. Defaults to the configured example dataset.
        file: Option<PathBuf>,

        /// Statistics for a single column
        #[arg(short, long)]
        column: Option<String>,

        /// Frequency of each value in a column
        #[arg(long)]
        value_counts: Option<String>,

        /// Categorical column to group by (requires --numeric)
        #[arg(long, requires = "numeric")]
        group_by: Option<String>,

        /// Numeric column averaged per group
        #[arg(long, requires = "group_by")]
        numeric: Option<String>,

        /// Comma-separated columns for a correlation matrix
        #[arg(long, value_delimiter = ',')]
        correlate: Vec<String>,

        /// Only list columns whose name contains this text
        #[arg(long)]
        search: Option<String>,

        /// Only list columns of this dtype (e.g. `i64`, `f64`, `str`)
        #[arg(long)]
        dtype: Option<String>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Run a pipeline spec on a file and export the result
    Preprocess {
        /// CSV file to load. Defaults to the configured example dataset.
        file: Option<PathBuf>,

        /// Path to a JSON pipeline spec
        #[arg(short, long)]
        spec: PathBuf,

        /// Output CSV path. Without it the result is only summarized.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the run report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print an example pipeline spec
    SpecTemplate {
        /// Write the template to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

pub fn run_command(command: Commands) -> Result<()> {
    let settings = load_app_config();
    match command {
        Commands::Overview { file, json } => handle_overview(file, json, &settings),
        Commands::Describe {
            file,
            column,
            value_counts,
            group_by,
            numeric,
            correlate,
            search,
            dtype,
            json,
        } => {
            let session = open_session(file, &settings)?;
            let df = session.working();
            if search.is_some() || dtype.is_some() {
                let query = search.as_deref().unwrap_or_default();
                let matches = logic::search_columns(df, query, dtype.as_deref())?;
                return print_columns(&matches, json);
            }
            if let Some(name) = column {
                return print_output(&logic::feature_stats(df, &name)?, json);
            }
            if let Some(name) = value_counts {
                return print_output(&logic::value_counts(df, &name)?, json);
            }
            if let (Some(cat), Some(num)) = (group_by, numeric) {
                return print_output(&logic::group_means(df, &cat, &num)?, json);
            }
            if !correlate.is_empty() {
                let matrix = logic::correlation_matrix(df, &correlate)?
                    .context("Correlation needs at least two columns")?;
                return print_output(&matrix, json);
            }

            let partition = session.partition()?;
            let summaries = logic::describe_numeric(df, &partition.numerical)?;
            if json {
                print_output(&summaries, true)
            } else {
                print_describe(&summaries);
                Ok(())
            }
        }
        Commands::Preprocess {
            file,
            spec,
            output,
            json,
        } => {
            let input = resolve_input(file, &settings)?;
            let pipeline = PipelineSpec::from_file(&spec)?;
            let report = run_pipeline(&pipeline, &input, output.as_deref(), &settings)?;
            if json {
                print_output(&report, true)
            } else {
                println!("{}", report.summary());
                for warning in &report.warnings {
                    println!("  warning: {warning}");
                }
                if let Some(path) = output {
                    println!("Saved to {}", path.display());
                }
                Ok(())
            }
        }
        Commands::SpecTemplate { output } => {
            let template = PipelineSpec::template(&settings);
            match output {
                Some(path) => {
                    template.to_file(&path)?;
                    println!("Template written to {}", path.display());
                }
                None => println!("{}", template.to_json()?),
            }
            Ok(())
        }
    }
}

fn handle_overview(file: Option<PathBuf>, json: bool, settings: &AppSettings) -> Result<()> {
    let session = open_session(file, settings)?;
    let overview = session.overview()?;
    let missing = logic::missing_value_summary(session.working());

    if json {
        #[derive(Debug, Serialize)]
        struct Report<'a> {
            overview: &'a DatasetOverview,
            missing: &'a [MissingValueSummary],
        }
        return print_output(
            &Report {
                overview: &overview,
                missing: &missing,
            },
            true,
        );
    }

    println!(
        "{} rows x {} columns, {} duplicate rows",
        overview.rows, overview.columns, overview.duplicate_rows
    );
    println!("Numerical:   {}", overview.partition.numerical.join(", "));
    println!("Categorical: {}", overview.partition.categorical.join(", "));
    if missing.is_empty() {
        println!("No missing values");
    } else {
        println!("Missing values:");
        for m in &missing {
            println!(
                "  {:<24} {:>8} ({})",
                m.column,
                m.missing_count,
                fmt_pct(m.missing_pct)
            );
        }
    }
    println!("{}", session.working().head(Some(settings.preview_row_limit)));
    Ok(())
}

fn resolve_input(file: Option<PathBuf>, settings: &AppSettings) -> Result<PathBuf> {
    file.or_else(|| settings.example_dataset.clone()).context(
        "No input file given and no example_dataset configured (see `autoeda --help`)",
    )
}

fn open_session(file: Option<PathBuf>, settings: &AppSettings) -> Result<EdaSession> {
    let path = resolve_input(file, settings)?;
    EdaSession::from_csv_path(&path, settings)
}

fn print_output<T: Serialize + std::fmt::Debug>(value: &T, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{value:#?}");
    }
    Ok(())
}

fn print_columns(df: &polars::prelude::DataFrame, json: bool) -> Result<()> {
    let types = logic::column_types(df);
    if json {
        return print_output(&types, true);
    }
    for info in types {
        println!("{:<24} {}", info.name, info.dtype);
    }
    Ok(())
}

fn print_describe(summaries: &[NumericSummary]) {
    println!(
        "{:<20} {:>8} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12}",
        "column", "count", "mean", "std", "min", "25%", "50%", "75%", "max"
    );
    for s in summaries {
        println!(
            "{:<20} {:>8} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12}",
            s.column,
            s.count,
            fmt_opt(s.mean),
            fmt_opt(s.std),
            fmt_opt(s.min),
            fmt_opt(s.q25),
            fmt_opt(s.median),
            fmt_opt(s.q75),
            fmt_opt(s.max)
        );
    }
}
