use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use mental_health_insights::aggregate::{self, GroupKey};
use mental_health_insights::models::{Record, StressLevel};
use mental_health_insights::similarity::{self, SimilarityOptions};
use mental_health_insights::{charts, dataset, insights, normalize, report, treatment};

#[derive(Parser)]
#[command(name = "mhi")]
#[command(about = "Occupational mental health survey insights", long_about = None)]
struct Cli {
    /// Survey CSV; falls back to MHI_DATASET
    #[arg(long, global = true)]
    data: Option<PathBuf>,
    #[arg(long, global = true, conflicts_with = "quiet")]
    verbose: bool,
    #[arg(long, global = true)]
    quiet: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
struct ProfileArgs {
    #[arg(long)]
    work_hours: f64,
    #[arg(long)]
    sleep_hours: f64,
    #[arg(long, default_value_t = 0.0)]
    activity_hours: f64,
    /// Low, Medium or High
    #[arg(long, value_parser = parse_stress)]
    stress: Option<StressLevel>,
    #[arg(long)]
    has_condition: bool,
    #[arg(long)]
    consulted: bool,
}

impl ProfileArgs {
    fn to_record(&self) -> Record {
        let mut profile = Record::profile(
            self.work_hours,
            self.sleep_hours,
            self.activity_hours,
            self.stress,
        );
        profile.has_condition = self.has_condition;
        profile.sought_consultation = self.consulted;
        profile
    }
}

fn parse_stress(value: &str) -> Result<StressLevel, String> {
    StressLevel::parse(value).ok_or_else(|| format!("unknown stress level '{value}'"))
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize the whole population
    Summary,
    /// Summarize respondents grouped by a categorical key
    Group {
        #[arg(long, value_enum)]
        by: GroupKey,
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// Rank respondents similar to a profile
    Similar {
        #[command(flatten)]
        profile: ProfileArgs,
        #[arg(long, default_value_t = 5.0)]
        work_tolerance: f64,
        #[arg(long, default_value_t = 1.0)]
        sleep_tolerance: f64,
        /// Do not require an identical stress level
        #[arg(long)]
        any_stress: bool,
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Generate insights and recommendations for a profile
    Insights {
        #[command(flatten)]
        profile: ProfileArgs,
        #[arg(long)]
        json: bool,
    },
    /// Treatment access by occupation, age band and country
    Treatment,
    /// Emit chart series as JSON
    Charts {
        /// Weekly treatment survey CSV for the heatmap; falls back to
        /// MHI_TREATMENT_DATASET
        #[arg(long)]
        treatment: Option<PathBuf>,
    },
    /// Write a markdown insight report for a profile
    Report {
        #[command(flatten)]
        profile: ProfileArgs,
        #[arg(long)]
        scope: Option<String>,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let path = match cli.data {
        Some(path) => path,
        None => std::env::var("MHI_DATASET")
            .map(PathBuf::from)
            .context("pass --data or set MHI_DATASET to the survey CSV")?,
    };

    let rows = dataset::load_rows(&path)
        .with_context(|| format!("failed to load survey data from {}", path.display()))?;
    let normalized = normalize::normalize(&rows);
    if normalized.skipped_count() > 0 {
        eprintln!(
            "Skipped {} of {} rows with unreadable age, work or sleep hours.",
            normalized.skipped_count(),
            rows.len()
        );
    }
    let records = normalized.records;

    match cli.command {
        Commands::Summary => match aggregate::summarize("all", &records) {
            Some(summary) => print_summary(&summary),
            None => println!("No respondents in this dataset."),
        },
        Commands::Group { by, limit } => {
            let groups = aggregate::group_by(&records, by.key_fn());
            if groups.is_empty() {
                println!("No respondents in this dataset.");
                return Ok(());
            }
            for summary in groups.iter().take(limit) {
                print_summary(summary);
            }
        }
        Commands::Similar {
            profile,
            work_tolerance,
            sleep_tolerance,
            any_stress,
            limit,
        } => {
            let options = SimilarityOptions {
                work_hours_tolerance: work_tolerance,
                sleep_hours_tolerance: sleep_tolerance,
                match_stress: !any_stress,
                limit,
            };
            let matches = similarity::find_similar(&records, &profile.to_record(), &options);

            if matches.is_empty() {
                println!("No similar respondents within the tolerance window.");
                return Ok(());
            }

            println!("Most similar respondents:");
            for found in &matches {
                println!(
                    "- #{} ({}, {}) score {:.2}: {:.0}h work, {:.1}h sleep",
                    found.record.id,
                    found.record.occupation,
                    found.record.country,
                    found.score,
                    found.record.work_hours,
                    found.record.sleep_hours
                );
            }
        }
        Commands::Insights { profile, json } => {
            let report = insights::generate_insights(&records, &profile.to_record());
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("Cluster {}", report.cluster.label);
                if report.recommendations.is_empty() {
                    println!("No recommendations for this profile.");
                }
                for rec in &report.recommendations {
                    println!("- {}: {} {}.", rec.title, rec.description, rec.action);
                }
            }
        }
        Commands::Treatment => {
            let overview = treatment::treatment_overview(&records);
            println!("{}", serde_json::to_string_pretty(&overview)?);
        }
        Commands::Charts { treatment } => {
            let mut series = serde_json::json!({
                "severity_by_occupation": charts::severity_by_occupation(&records),
                "age_by_severity": charts::age_box_stats(&records),
            });

            let treatment_path = treatment
                .or_else(|| std::env::var("MHI_TREATMENT_DATASET").ok().map(PathBuf::from));
            if let Some(path) = treatment_path {
                let rows = dataset::load_treatment_rows(&path).with_context(|| {
                    format!("failed to load treatment data from {}", path.display())
                })?;
                let mut heatmap = serde_json::Map::new();
                for dimension in charts::TreatmentDimension::ALL {
                    heatmap.insert(
                        dimension.group_label().to_string(),
                        serde_json::to_value(charts::treatment_averages(&rows, dimension))?,
                    );
                }
                series["treatment"] = serde_json::Value::Object(heatmap);
            }

            println!("{}", serde_json::to_string_pretty(&series)?);
        }
        Commands::Report {
            profile,
            scope,
            out,
        } => {
            let population = aggregate::summarize("all", &records);
            let insight_report = insights::generate_insights(&records, &profile.to_record());
            let markdown = report::build_report(
                scope.as_deref(),
                chrono::Utc::now().date_naive(),
                population.as_ref(),
                &insight_report,
            );
            std::fs::write(&out, markdown)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}

fn print_summary(summary: &aggregate::GroupSummary) {
    println!(
        "- {}: {} respondents, work {:.1}h, sleep {:.1}h, \
         condition {:.1}%, consulted {:.1}%, high stress {:.1}%",
        summary.key,
        summary.count,
        summary.mean_work_hours,
        summary.mean_sleep_hours,
        summary.condition_rate * 100.0,
        summary.consultation_rate * 100.0,
        summary.high_stress_rate * 100.0
    );
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("MHI_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
