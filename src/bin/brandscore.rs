//! Brandscore CLI - batch scoring over JSONL corpora
//!
//! ## Commands
//!
//! - `evaluate`: Score a corpus on every rubric and save the report
//! - `compare`: Show metric deltas between two saved reports
//! - `preferences`: Rank candidates with LLM judges and write DPO pairs

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use brandscore::config::Settings;
use brandscore::models::{ComparisonReport, EvaluationReport, PreferencePair, ResponseSet, Sample};
use brandscore::services::{
    load_report, load_response_sets, load_samples, reference_sets, run_name, save_report,
    timestamped_report_path, write_pairs, PreferenceGenerator,
};

const SAMPLE_SEED: u64 = 42;

#[derive(Parser)]
#[command(name = "brandscore")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Quality scoring for domain name generation", long_about = None)]
struct Cli {
    /// Configuration file (default: config/default + config/local + environment)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a JSONL corpus on constraints, diversity, pronounceability and premium
    Evaluate {
        /// Corpus file, one {"prompt", "response"} or {"messages"} object per line
        #[arg(short, long)]
        file: PathBuf,

        /// Report name (default: file stem)
        #[arg(short, long)]
        name: Option<String>,

        /// Where to save the JSON report (default: <results-dir>/<name>_<timestamp>.json)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Directory for reports saved without an explicit --output
        #[arg(long, default_value = "results")]
        results_dir: PathBuf,

        /// Evaluate a random subsample of this many samples
        #[arg(short, long)]
        sample: Option<usize>,
    },

    /// Compare two saved evaluation reports
    Compare {
        /// Baseline report
        baseline: PathBuf,

        /// Candidate report
        candidate: PathBuf,
    },

    /// Generate preference pairs with LLM judges
    Preferences {
        /// Corpus whose reference responses are used when no responses file is given
        #[arg(long, default_value = "data/test.jsonl")]
        test_file: PathBuf,

        /// Pre-generated {"prompt", "responses"} JSONL, preferred over the test file
        #[arg(long)]
        model_responses_file: Option<PathBuf>,

        /// Output JSONL for preference pairs
        #[arg(short, long, default_value = "rlhf/preference_pairs.jsonl")]
        output: PathBuf,

        /// Maximum number of prompts to process
        #[arg(long, default_value = "500")]
        num_prompts: usize,

        /// Candidates per prompt; twice this many domains are scored
        #[arg(long)]
        candidates_per_prompt: Option<usize>,

        /// Restrict to the named judge(s); repeatable
        #[arg(long = "judge")]
        judges: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    };
    let logging = settings
        .as_ref()
        .map(|s| s.logging.clone())
        .unwrap_or_default();
    brandscore::init_tracing(&logging);

    let settings = settings.context("Failed to load configuration")?;

    match cli.command {
        Commands::Evaluate {
            file,
            name,
            output,
            results_dir,
            sample,
        } => cmd_evaluate(&settings, &file, name, output, &results_dir, sample),
        Commands::Compare {
            baseline,
            candidate,
        } => cmd_compare(&baseline, &candidate),
        Commands::Preferences {
            test_file,
            model_responses_file,
            output,
            num_prompts,
            candidates_per_prompt,
            judges,
        } => {
            cmd_preferences(
                settings,
                &test_file,
                model_responses_file.as_deref(),
                &output,
                num_prompts,
                candidates_per_prompt,
                &judges,
            )
            .await
        }
    }
}

fn cmd_evaluate(
    settings: &Settings,
    file: &Path,
    name: Option<String>,
    output: Option<PathBuf>,
    results_dir: &Path,
    sample: Option<usize>,
) -> Result<()> {
    let mut samples: Vec<Sample> =
        load_samples(file).with_context(|| format!("Failed to load {}", file.display()))?;

    let mut sampled = None;
    if let Some(n) = sample.filter(|&n| n > 0 && n < samples.len()) {
        let mut rng = StdRng::seed_from_u64(SAMPLE_SEED);
        samples = samples.choose_multiple(&mut rng, n).cloned().collect();
        info!("Sampled {} of the loaded samples", samples.len());
        sampled = Some(n);
    }

    let name = name.unwrap_or_else(|| {
        file.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "dataset".to_string())
    });
    let name = run_name(&name, sampled);

    let report = settings
        .evaluator()
        .evaluate(&name, &samples)
        .context("Evaluation failed")?;

    print_report(&report);

    let path = output
        .unwrap_or_else(|| timestamped_report_path(results_dir, &name, &chrono::Local::now()));
    save_report(&path, &report)
        .with_context(|| format!("Failed to save report to {}", path.display()))?;
    println!("\nSaved report to {}", path.display());

    Ok(())
}

fn print_report(report: &EvaluationReport) {
    println!("Evaluation: {} ({} samples)", report.name, report.num_samples);
    println!("  run id:            {}", report.run_id);
    println!("  constraints:       {:.3}", report.constraints.avg_overall);
    println!("  diversity:         {:.3}", report.diversity.avg_overall);
    println!("  pronounceability:  {:.3}", report.pronounceability.avg_overall);
    println!("  premium:           {:.3}", report.premium.avg_overall);
    println!(
        "  unique names:      {}/{} ({:.1}%)",
        report.cross_batch_diversity.unique_names,
        report.cross_batch_diversity.total_names,
        report.cross_batch_diversity.unique_ratio * 100.0
    );
    println!(
        "  combined:          {:.3} ({:.1}/10)",
        report.combined_score,
        report.combined_score * 10.0
    );
}

fn cmd_compare(baseline: &Path, candidate: &Path) -> Result<()> {
    let before = load_report(baseline)
        .with_context(|| format!("Failed to load {}", baseline.display()))?;
    let after = load_report(candidate)
        .with_context(|| format!("Failed to load {}", candidate.display()))?;

    print_comparison(&brandscore::compare_reports(&before, &after));
    Ok(())
}

fn print_comparison(comparison: &ComparisonReport) {
    println!("{} -> {}", comparison.baseline, comparison.candidate);
    println!("{:<42} {:>8} {:>8} {:>8}", "metric", "before", "after", "delta");
    for d in &comparison.deltas {
        println!(
            "{:<42} {:>8.3} {:>8.3} {:>+8.3} {}",
            d.metric,
            d.before,
            d.after,
            d.delta,
            d.direction.arrow()
        );
    }
}

/// Prompt sets from the responses file when present, else the reference corpus
fn load_prompt_sets(test_file: &Path, responses_file: Option<&Path>) -> Result<Vec<ResponseSet>> {
    if let Some(path) = responses_file {
        if path.exists() {
            return load_response_sets(path)
                .with_context(|| format!("Failed to load {}", path.display()));
        }
        warn!("Responses file {} not found, falling back to {}", path.display(), test_file.display());
    }

    let samples = load_samples(test_file)
        .with_context(|| format!("Failed to load {}", test_file.display()))?;
    Ok(reference_sets(samples))
}

async fn cmd_preferences(
    mut settings: Settings,
    test_file: &Path,
    responses_file: Option<&Path>,
    output: &Path,
    num_prompts: usize,
    candidates_per_prompt: Option<usize>,
    judges: &[String],
) -> Result<()> {
    let api_key = settings
        .require_api_key()
        .context("Judge credentials are required")?
        .to_string();

    if let Some(n) = candidates_per_prompt {
        settings.pairing.candidates_per_prompt = n;
    }

    let mut orchestrator = settings.orchestrator(&api_key)?;
    orchestrator.retain_judges(judges);
    if orchestrator.judge_names().is_empty() {
        bail!("No configured judge matches {:?}", judges);
    }
    info!("Using judges: {:?}", orchestrator.judge_names());

    let mut sets = load_prompt_sets(test_file, responses_file)?;
    sets.truncate(num_prompts);
    info!("Total prompts to process: {}", sets.len());

    let generator = PreferenceGenerator::new(orchestrator, settings.pairing_options());
    let pairs = generator.generate(&sets).await;

    write_pairs(output, &pairs)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!("Generated {} preference pairs", pairs.len());
    println!("Saved to: {}", output.display());
    if let Some(pair) = pairs.choose(&mut rand::thread_rng()) {
        print_pair(pair);
    }

    Ok(())
}

fn print_pair(pair: &PreferencePair) {
    let prompt: String = pair.prompt.chars().take(80).collect();
    println!("\nSample preference pair:");
    println!("  Prompt: {}...", prompt);
    println!("  Chosen: {} (score: {:.2})", pair.chosen, pair.chosen_score);
    println!("  Rejected: {} (score: {:.2})", pair.rejected, pair.rejected_score);
}
