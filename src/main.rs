use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;
use veriface::input::{load_pair, LabeledSample};
use veriface::render;
use veriface::security::Evaluator;
use veriface::{ModelMetadata, SecurityMode, Settings, ThresholdPolicy, Verifier};

/// Face verification decisions and threshold evaluation over embeddings
#[derive(Parser, Debug)]
#[command(name = "veriface")]
#[command(about = "Face verification decision engine", long_about = None)]
struct Args {
    /// Settings file (JSON); defaults apply when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decide whether a probe/reference pair is the same identity
    Verify {
        /// JSON file with `probe` and `reference` embeddings
        pair: PathBuf,

        /// Explicit threshold, overriding the configured preset
        #[arg(long, conflicts_with = "strict")]
        threshold: Option<f32>,

        /// Use the ultra-security preset
        #[arg(long)]
        strict: bool,

        /// Checkpoint metadata used to validate embedding length
        #[arg(long)]
        model_config: Option<PathBuf>,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Full security report at one threshold
    Report {
        /// JSON array of labeled scores or labeled embedding pairs
        scores: PathBuf,

        #[arg(long)]
        threshold: Option<f32>,

        #[arg(long)]
        json: bool,
    },
    /// FAR/FRR side by side for candidate thresholds
    Compare {
        scores: PathBuf,

        /// Comma-separated thresholds; configured presets when omitted
        #[arg(long, value_delimiter = ',')]
        thresholds: Vec<f32>,

        #[arg(long)]
        json: bool,
    },
    /// Equal Error Rate and its threshold
    Eer {
        scores: PathBuf,

        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let settings = match &args.config {
        Some(path) => Settings::from_json_file(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => Settings::default(),
    };
    debug!(?settings, "settings loaded");

    match args.command {
        Command::Verify {
            pair,
            threshold,
            strict,
            model_config,
            json,
        } => {
            let mut config = settings.verification.clone();
            if strict {
                config.mode = SecurityMode::Strict;
            }
            if let Some(path) = model_config {
                let meta = ModelMetadata::from_json_file(&path)
                    .with_context(|| format!("failed to read model config {}", path.display()))?;
                info!(
                    num_classes = meta.num_classes,
                    embedding_dim = meta.embedding_dim,
                    "model metadata loaded"
                );
                config.embedding_dim = Some(meta.embedding_dim);
            }

            let mut verifier = Verifier::new(config)?;
            if let Some(t) = threshold {
                verifier = verifier.with_policy(ThresholdPolicy::new(t)?);
            }

            let pair = load_pair(&pair)?;
            let verdict = verifier.verify(&pair.probe, &pair.reference)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&verdict)?);
            } else {
                println!("{}", render::VerdictText(&verdict));
            }
        }
        Command::Report {
            scores,
            threshold,
            json,
        } => {
            let verifier = Verifier::new(settings.verification.clone())?;
            let evaluator = Evaluator::new(settings.evaluation.clone())?;
            let sample = LabeledSample::from_json_file(&scores, &verifier)?;
            info!(pairs = sample.scores.len(), "labeled sample loaded");

            let threshold = threshold.unwrap_or_else(|| verifier.policy().threshold());
            let report = evaluator.report(&sample.scores, &sample.labels, threshold)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", render::ReportText(&report));
            }
        }
        Command::Compare {
            scores,
            thresholds,
            json,
        } => {
            let verifier = Verifier::new(settings.verification.clone())?;
            let evaluator = Evaluator::new(settings.evaluation.clone())?;
            let sample = LabeledSample::from_json_file(&scores, &verifier)?;

            let rows = evaluator.compare_thresholds(&sample.scores, &sample.labels, &thresholds)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                println!("{}", render::ComparisonText(&rows));
            }
        }
        Command::Eer { scores, json } => {
            let verifier = Verifier::new(settings.verification.clone())?;
            let evaluator = Evaluator::new(settings.evaluation.clone())?;
            let sample = LabeledSample::from_json_file(&scores, &verifier)?;

            let eer = evaluator.equal_error_rate(&sample.scores, &sample.labels)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&eer)?);
            } else {
                println!("{}", render::EerText(&eer));
            }
        }
    }

    Ok(())
}
