use clap::{Parser, Subcommand};
use serde_json::{json, Map, Value};
use std::path::PathBuf;
use tracing::Level;
use variant_decisions::{variants_from_json, DecisionError, DecisionModel, ModelFile, Result};

/// Score and choose among JSON variants with a decision model.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Model file (JSON). Without one an unloaded model named `default` is used.
    #[arg(long, global = true)]
    model: Option<PathBuf>,
    /// Givens as a JSON object
    #[arg(long, global = true)]
    givens: Option<String>,
    /// Log scoring details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print one score per variant, in input order
    Score { variants: String },
    /// Print the ranked variants and their scores
    Choose { variants: String },
    /// Expand named slots into combinations and choose among them
    ChooseMultivariate { slots: String },
    /// Print only the best variant. Each argument is JSON, or a plain string.
    Which {
        #[arg(required = true)]
        variants: Vec<String>,
    },
}

fn main() {
    // Parse CLI arguments.
    let args = Args::parse();

    // Logs go to stderr so stdout stays pure JSON.
    tracing_subscriber::fmt()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(std::io::stderr)
        .init();

    // Print the result, or the error with exit status 1.
    match render(run(&args)) {
        Ok(s) => println!("{s}"),
        Err(msg) => {
            eprintln!("{msg}");
            std::process::exit(1);
        }
    }
}

/// Pretty JSON for a result; the error message otherwise.
fn render(result: Result<Value>) -> std::result::Result<String, String> {
    let out = result.map_err(|e| e.to_string())?;
    serde_json::to_string_pretty(&out).map_err(|e| e.to_string())
}

fn run(args: &Args) -> Result<Value> {
    // Load the model, or fall back to an unloaded one.
    let model = match &args.model {
        Some(path) => ModelFile::load(path)?.into_model()?,
        None => DecisionModel::new("default")?,
    };

    // Bind the givens once for whichever command runs.
    let givens = args.givens.as_deref().map(parse_givens).transpose()?;
    let ctx = model.given(givens);

    Ok(match &args.command {
        Command::Score { variants } => {
            let variants = variants_from_json(parse_json(variants)?)?;
            json!(ctx.score(&variants)?)
        }
        Command::Choose { variants } => {
            let decision = ctx.choose_from(variants_from_json(parse_json(variants)?)?)?;
            json!({
                "best": decision.best(),
                "ranked": decision.ranked().collect::<Vec<_>>(),
                "scores": decision.scores(),
            })
        }
        Command::ChooseMultivariate { slots } => {
            let slots = match parse_json(slots)? {
                Value::Object(m) => m,
                other => {
                    return Err(DecisionError::InvalidArgument(format!(
                        "slots must be a JSON object, got {other}"
                    )))
                }
            };
            let decision = ctx.choose_multivariate(&slots)?;
            json!({
                "best": decision.best(),
                "ranked": decision.ranked().collect::<Vec<_>>(),
            })
        }
        Command::Which { variants } => {
            // Bare words are taken as strings so `vdx which a b c` works.
            let variants: Vec<Value> = variants
                .iter()
                .map(|v| serde_json::from_str(v).unwrap_or_else(|_| Value::String(v.clone())))
                .collect();
            ctx.which(variants)?
        }
    })
}

fn parse_json(s: &str) -> Result<Value> {
    serde_json::from_str(s).map_err(|e| DecisionError::InvalidArgument(format!("invalid JSON: {e}")))
}

// Givens must be an object; anything else is a caller mistake.
fn parse_givens(s: &str) -> Result<Map<String, Value>> {
    match parse_json(s)? {
        Value::Object(m) => Ok(m),
        other => Err(DecisionError::InvalidArgument(format!(
            "givens must be a JSON object, got {other}"
        ))),
    }
}
