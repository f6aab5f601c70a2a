use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use jobmatch::config::Config;
use jobmatch::corpus::{sample_jobs, JobSearchClient, JobSource, JobTable};
use jobmatch::embeddings::{Embedder, EmbeddingProvider};
use jobmatch::llm::LlmProvider;
use jobmatch::models::{JobDocument, ParseOutcome, RecommendationRecord};
use jobmatch::profile::{read_resume, ProfileInput};
use jobmatch::recommend::{save_recommendations_csv, JobSession};

#[derive(Parser)]
#[command(name = "jobmatch")]
#[command(about = "Match a profile against job postings and rank them with an LLM")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Retrieve matching jobs for a profile and ask the LLM to rank them
    Recommend(RecommendArgs),
    /// Show the nearest job postings for a query without calling an LLM
    Retrieve(RetrieveArgs),
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct CorpusArgs {
    /// CSV file with title, company, description and link columns
    #[arg(long, value_name = "CSV")]
    jobs: Option<PathBuf>,

    /// Query the job-search provider configured by JOB_SEARCH_URL
    #[arg(long, value_name = "QUERY")]
    search: Option<String>,

    /// Use the built-in demo postings
    #[arg(long)]
    sample: bool,
}

#[derive(Args)]
struct RecommendArgs {
    #[command(flatten)]
    corpus: CorpusArgs,

    /// Location passed to the job-search provider
    #[arg(long)]
    location: Option<String>,

    #[arg(long, default_value = "")]
    skills: String,

    #[arg(long, default_value = "")]
    experience: String,

    #[arg(long, default_value = "")]
    preferences: String,

    /// Resume file (PDF or plain text)
    #[arg(long, value_name = "FILE")]
    resume: Option<PathBuf>,

    /// Number of postings shown to the LLM
    #[arg(long)]
    top_k: Option<usize>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Also write the recommendations to this CSV file
    #[arg(long, value_name = "CSV")]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct RetrieveArgs {
    #[command(flatten)]
    corpus: CorpusArgs,

    /// Location passed to the job-search provider
    #[arg(long)]
    location: Option<String>,

    /// Free-text query to embed
    #[arg(long)]
    query: String,

    #[arg(long)]
    top_k: Option<usize>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jobmatch=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env();

    tracing::info!("Loading embedding model: {}...", config.embeddings.model);
    let embedder: Arc<dyn Embedder> = Arc::new(EmbeddingProvider::new(&config.embeddings)?);
    let mut session = JobSession::new(embedder, config.retrieval.clone());

    match cli.command {
        Command::Recommend(args) => {
            load_corpus(&mut session, &config, &args.corpus, args.location.as_deref()).await?;
            recommend(&session, &config, args).await
        }
        Command::Retrieve(args) => {
            load_corpus(&mut session, &config, &args.corpus, args.location.as_deref()).await?;
            let documents = session.retrieve(&args.query, args.top_k).await?;
            print_documents(&documents, args.format)
        }
    }
}

async fn load_corpus(
    session: &mut JobSession,
    config: &Config,
    corpus: &CorpusArgs,
    location: Option<&str>,
) -> anyhow::Result<()> {
    let loaded = if let Some(path) = &corpus.jobs {
        let table = JobTable::from_path(path)
            .with_context(|| format!("Failed to read jobs from {}", path.display()))?;
        session.load_jobs(JobSource::Table(table)).await?
    } else if let Some(query) = &corpus.search {
        let search_config = config
            .job_search
            .clone()
            .context("JOB_SEARCH_URL must be set to use --search")?;
        let client = JobSearchClient::new(search_config)?;
        let items = client.search(query, location).await?;
        session.load_jobs(JobSource::SearchResults(items)).await?
    } else {
        session.load_records(sample_jobs()).await?
    };

    tracing::info!("Indexed {} job postings", loaded);
    Ok(())
}

async fn recommend(session: &JobSession, config: &Config, args: RecommendArgs) -> anyhow::Result<()> {
    let resume_text = match &args.resume {
        Some(path) => read_resume(path).unwrap_or_else(|e| {
            tracing::warn!("Could not read resume {}: {} - continuing without it", path.display(), e);
            String::new()
        }),
        None => String::new(),
    };

    let input = ProfileInput::new(&args.skills, &args.experience, &args.preferences, &resume_text);
    if input.is_empty() {
        anyhow::bail!("Provide at least one of --skills, --experience, --preferences or --resume");
    }
    let profile = input.build(config.profile.max_resume_chars);

    if let Some(llm_config) = &config.llm {
        tracing::info!("Initializing LLM provider: {}...", llm_config.model);
    }
    let llm = LlmProvider::new(config.llm.as_ref());
    if let Some(reason) = llm.unavailable_reason() {
        anyhow::bail!("LLM unavailable: {reason}");
    }

    let recommendation = session.recommend(&profile, &llm, args.top_k).await?;

    match recommendation.outcome {
        ParseOutcome::Parsed(records) => {
            print_recommendations(&records, args.format)?;
            if let Some(path) = &args.output {
                save_recommendations_csv(path, &records)?;
            }
        }
        ParseOutcome::Unparseable { raw } => {
            eprintln!("Could not parse the model output as recommendations. Raw output:");
            println!("{raw}");
        }
    }

    Ok(())
}

fn print_recommendations(records: &[RecommendationRecord], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(records)?),
        OutputFormat::Table => {
            if records.is_empty() {
                println!("No matching jobs recommended.");
            }
            for (rank, record) in records.iter().enumerate() {
                println!("{}. {} at {}", rank + 1, record.job_title, record.company);
                if !record.match_reason.is_empty() {
                    println!("   Why: {}", record.match_reason);
                }
                if record.has_apply_link() {
                    println!("   Apply: {}", record.apply_link);
                }
            }
        }
    }
    Ok(())
}

fn print_documents(documents: &[JobDocument], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(documents)?),
        OutputFormat::Table => {
            for (rank, document) in documents.iter().enumerate() {
                println!("{}. {}", rank + 1, document.content);
            }
        }
    }
    Ok(())
}
