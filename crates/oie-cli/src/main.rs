//! OIE CLI - Command-line interface
//!
//! Usage:
//!   oie extract <file> [--method pos|dep|all] [--json]
//!   oie nouns <file>
//!   oie wiki [titles]... [--llm] [--source-dir <dir>]
//!   oie evaluate <file> <gold.json>

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use oie_core::{AppConfig, LoggingConfig, Triplet};
use oie_extractor::{
    proper_noun_sequences, AggregateMetrics, Evaluator, ExtractionMethod, ExtractorComparison,
    TripletExtractor,
};
use oie_pipeline::ExtractionPipeline;
use serde::Serialize;

#[derive(Parser)]
#[command(name = "oie")]
#[command(about = "Open information extraction from encyclopedic prose")]
#[command(version)]
struct Cli {
    /// TOML configuration file (environment variables still override)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract triplets from an annotated CoNLL-U or JSON file
    Extract {
        /// Annotated file
        file: PathBuf,
        /// Extraction method
        #[arg(long, value_enum, default_value_t = MethodArg::All)]
        method: MethodArg,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// List proper-noun sequences in an annotated file
    Nouns {
        /// Annotated file
        file: PathBuf,
    },
    /// Fetch, annotate and extract encyclopedia pages
    Wiki {
        /// Exact page titles
        #[arg(default_values = ["Donald Trump", "Ruth Bader Ginsburg", "J.K. Rowling"])]
        titles: Vec<String>,
        /// Also ask the configured LLM for triplets
        #[arg(long)]
        llm: bool,
        /// Read pages from <dir>/<title>.txt instead of Wikipedia
        #[arg(long)]
        source_dir: Option<PathBuf>,
        /// Documents processed at once
        #[arg(long)]
        concurrency: Option<usize>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Score extracted triplets against a gold JSON list
    Evaluate {
        /// Annotated file
        file: PathBuf,
        /// Gold triplets: `[{"subject", "relation", "object"}, ...]`
        gold: PathBuf,
        /// Compare strings ignoring ASCII case
        #[arg(long)]
        ignore_case: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum MethodArg {
    Pos,
    Dep,
    All,
}

impl MethodArg {
    fn methods(self) -> Vec<ExtractionMethod> {
        match self {
            Self::Pos => vec![ExtractionMethod::Pos],
            Self::Dep => vec![ExtractionMethod::Dependency],
            Self::All => ExtractionMethod::ALL.to_vec(),
        }
    }
}

#[derive(Serialize)]
struct MethodOutput {
    method: ExtractionMethod,
    triplets: Vec<Triplet>,
}

fn load_config(path: Option<&Path>) -> anyhow::Result<AppConfig> {
    let config = match path {
        Some(path) => AppConfig::from_file(path)?.with_env_override()?,
        None => AppConfig::from_env()?,
    };
    Ok(config)
}

fn init_tracing(config: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_file(config.include_location)
        .with_line_number(config.include_location);

    if config.json_format {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_gold(path: &Path) -> anyhow::Result<Vec<Triplet>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read gold file {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid gold triplets in {}", path.display()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_deref())?;
    init_tracing(&config.logging);

    match cli.command {
        Commands::Extract { file, method, json } => {
            let tokens = oie_parser::parse_file(&file)?;
            tracing::info!(file = %file.display(), tokens = tokens.len(), "Parsed annotations");

            let outputs: Vec<MethodOutput> = method
                .methods()
                .into_iter()
                .map(|m| MethodOutput {
                    method: m,
                    triplets: m.extractor().extract(&tokens),
                })
                .collect();

            if json {
                println!("{}", serde_json::to_string_pretty(&outputs)?);
            } else {
                for output in &outputs {
                    println!(
                        "--- {} ({} triplets) ---",
                        output.method,
                        output.triplets.len()
                    );
                    for triplet in &output.triplets {
                        println!("{triplet}");
                    }
                }
            }
        }
        Commands::Nouns { file } => {
            let tokens = oie_parser::parse_file(&file)?;
            for sequence in proper_noun_sequences(&tokens) {
                println!("{sequence}");
            }
        }
        Commands::Wiki {
            titles,
            llm,
            source_dir,
            concurrency,
            json,
        } => {
            if let Some(dir) = source_dir {
                config.source.local_dir = Some(dir);
            }
            if llm {
                config.pipeline.llm_enabled = true;
            }
            if let Some(n) = concurrency {
                config.pipeline.concurrency = n;
            }

            let pipeline = ExtractionPipeline::from_config(&config)?;
            let report = pipeline.run(titles).await;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{report}");
            }

            if report.documents.is_empty() && !report.failures.is_empty() {
                anyhow::bail!("no document could be processed");
            }
        }
        Commands::Evaluate {
            file,
            gold,
            ignore_case,
        } => {
            let tokens = oie_parser::parse_file(&file)?;
            let gold = load_gold(&gold)?;

            let evaluator = if ignore_case {
                Evaluator::new().ignore_case()
            } else {
                Evaluator::new()
            };

            let mut aggregate = AggregateMetrics {
                num_documents: 1,
                ..Default::default()
            };
            let mut extracted = Vec::new();
            for method in ExtractionMethod::ALL {
                let triplets = method.extractor().extract(&tokens);
                aggregate.add(method, &evaluator.evaluate(&triplets, &gold));
                extracted.push(triplets);
            }
            print!("{}", aggregate.report());

            let comparison = ExtractorComparison::compare(&extracted[0], &extracted[1]);
            println!(
                "\nShared: {} | POS only: {} | Dependency only: {}",
                comparison.shared.len(),
                comparison.pos_only.len(),
                comparison.dependency_only.len()
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wiki_default_titles() {
        let cli = Cli::try_parse_from(["oie", "wiki", "--llm"]).unwrap();
        match cli.command {
            Commands::Wiki { titles, llm, .. } => {
                assert_eq!(
                    titles,
                    vec!["Donald Trump", "Ruth Bader Ginsburg", "J.K. Rowling"]
                );
                assert!(llm);
            }
            _ => panic!("expected wiki command"),
        }
    }

    #[test]
    fn test_extract_method_arg() {
        let cli =
            Cli::try_parse_from(["oie", "extract", "doc.conllu", "--method", "dep"]).unwrap();
        match cli.command {
            Commands::Extract { method, json, .. } => {
                assert_eq!(method.methods(), vec![ExtractionMethod::Dependency]);
                assert!(!json);
            }
            _ => panic!("expected extract command"),
        }
        assert!(Cli::try_parse_from(["oie", "extract", "doc.conllu", "--method", "llm"]).is_err());
    }

    #[test]
    fn test_load_gold() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gold.json");
        std::fs::write(
            &path,
            r#"[{"subject": "Brad Pitt", "relation": "married", "object": "Angelina Jolie"}]"#,
        )
        .unwrap();

        assert_eq!(
            load_gold(&path).unwrap(),
            vec![Triplet::new("Brad Pitt", "married", "Angelina Jolie")]
        );
        assert!(load_gold(&dir.path().join("missing.json")).is_err());
    }
}
