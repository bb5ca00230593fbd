use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mianjing::normalize::normalize;
use mianjing::utils::{ensure_database_directory, parse_list};
use mianjing::validation::{validate_and_normalize_post, validate_tag_dimensions};
use mianjing::{
    AppConfig, Database, Dimension, DimensionCatalog, FilterAggregator, FilterOptionsCache,
    PostDraft, PostId, PostQuery, PostService, RawTagDimensions, Submission,
};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// mianjing - interview post tagging and filter options
#[derive(Parser)]
#[command(name = "mianjing")]
#[command(about = "Normalize, store and filter interview experience posts")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Normalize, validate and store a new post
    Add(AddCommand),
    /// List stored posts, newest first
    List(ListCommand),
    /// Print one post as JSON
    Show(ShowCommand),
    /// Print the canonical form of a value
    Normalize(NormalizeCommand),
    /// Validate a post draft given as JSON without storing it
    Validate(ValidateCommand),
    /// Print the filter options for every configured dimension
    FilterOptions(FilterOptionsCommand),
    /// Print per-dimension value counts
    FilterStats,
}

#[derive(Parser)]
struct AddCommand {
    /// Post title
    #[arg(value_name = "TITLE")]
    title: String,

    /// Company name, in any common spelling
    #[arg(short = 'C', long)]
    company: String,

    /// Job category (e.g. SWE, 后端, 算法)
    #[arg(short = 'c', long)]
    category: Option<String>,

    #[arg(long)]
    recruit_type: Option<String>,

    #[arg(long)]
    location: Option<String>,

    #[arg(long)]
    experience: Option<String>,

    #[arg(long)]
    salary: Option<String>,

    /// Comma-separated technologies
    #[arg(short, long, value_name = "LIST")]
    tech: Option<String>,

    /// Comma-separated custom tags
    #[arg(long, value_name = "LIST")]
    custom: Option<String>,

    /// Post body
    #[arg(long, default_value = "")]
    content: String,
}

#[derive(Parser)]
struct ListCommand {
    /// Filter as DIMENSION=VALUE; repeat to combine
    #[arg(short, long = "filter", value_name = "DIMENSION=VALUE", value_parser = parse_filter)]
    filters: Vec<(Dimension, String)>,

    /// Maximum number of posts to show
    #[arg(short, long)]
    limit: Option<usize>,
}

#[derive(Parser)]
struct ShowCommand {
    #[arg(value_name = "ID")]
    id: i64,
}

#[derive(Parser)]
struct NormalizeCommand {
    /// Dimension key (company, category, recruitType, ...)
    #[arg(value_name = "DIMENSION")]
    dimension: Dimension,

    #[arg(value_name = "VALUE")]
    value: String,
}

#[derive(Parser)]
struct ValidateCommand {
    /// Post draft as JSON
    #[arg(value_name = "JSON")]
    draft: String,

    /// Only check tag dimensions, without correcting them
    #[arg(long)]
    strict: bool,
}

#[derive(Parser)]
struct FilterOptionsCommand {
    /// Ignore any cached result
    #[arg(long)]
    refresh: bool,
}

/// Input the user can fix; exits with status 1.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
struct UserError(String);

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    let result = match AppConfig::from_env() {
        Ok(config) => run(cli.command, &config).await,
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        let exit_code = if is_user_error(&e) { 1 } else { 2 };
        eprintln!("Error: {e:#}");
        std::process::exit(exit_code);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Determines if an error is a user error (vs internal error).
fn is_user_error(error: &anyhow::Error) -> bool {
    error.downcast_ref::<UserError>().is_some()
}

async fn run(command: Commands, config: &AppConfig) -> Result<()> {
    match command {
        Commands::Normalize(cmd) => {
            println!("{}", normalize(cmd.dimension, &cmd.value));
            Ok(())
        }
        Commands::Validate(cmd) => execute_validate(&cmd),
        Commands::Add(cmd) => execute_add(&cmd, open_database(config)?),
        Commands::List(cmd) => execute_list(&cmd, open_database(config)?),
        Commands::Show(cmd) => execute_show(&cmd, open_database(config)?),
        Commands::FilterOptions(cmd) => {
            let cache = FilterOptionsCache::new(aggregator(config)?).with_ttl(config.cache_ttl);
            print_json(&cache.get(cmd.refresh).await)
        }
        Commands::FilterStats => print_json(&aggregator(config)?.stats().await),
    }
}

fn open_database(config: &AppConfig) -> Result<Database> {
    ensure_database_directory(&config.database_path)?;
    Database::open(&config.database_path).context("Failed to open database")
}

fn aggregator(config: &AppConfig) -> Result<FilterAggregator> {
    let db = Arc::new(open_database(config)?);
    let catalog = DimensionCatalog::resolve(config.dimensions_path.as_deref());
    Ok(FilterAggregator::new(db, Arc::new(catalog)).with_query_timeout(config.query_timeout))
}

/// Builds a draft from `add` arguments.
fn draft_from(cmd: &AddCommand) -> PostDraft {
    let mut tag_dimensions = RawTagDimensions::from_lists(
        cmd.tech.as_deref().map(parse_list).unwrap_or_default(),
        cmd.custom.as_deref().map(parse_list).unwrap_or_default(),
    );
    tag_dimensions.category = cmd.category.clone();
    tag_dimensions.recruit_type = cmd.recruit_type.clone();
    tag_dimensions.location = cmd.location.clone();
    tag_dimensions.experience = cmd.experience.clone();
    tag_dimensions.salary = cmd.salary.clone();

    PostDraft {
        title: cmd.title.clone(),
        company: cmd.company.clone(),
        content: cmd.content.clone(),
        tag_dimensions,
    }
}

/// Executes the add command logic with a provided database.
///
/// Separated from option handling so it can be tested with in-memory databases.
fn execute_add(cmd: &AddCommand, db: Database) -> Result<()> {
    let service = PostService::new(db);

    match service.submit(&draft_from(cmd))? {
        Submission::Accepted { post, warnings } => {
            for warning in warnings {
                eprintln!("Warning: {warning}");
            }
            println!("Post created (id: {})", post.id());
            Ok(())
        }
        Submission::Rejected { errors, warnings } => {
            for warning in warnings {
                eprintln!("Warning: {warning}");
            }
            Err(UserError(errors.join("; ")).into())
        }
    }
}

fn execute_list(cmd: &ListCommand, db: Database) -> Result<()> {
    let service = PostService::new(db);
    let query = PostQuery {
        filters: cmd.filters.clone(),
        limit: cmd.limit,
    };

    for post in service.list_posts(&query)? {
        let tags = post.tag_dimensions();
        println!(
            "#{} [{}] {} ({}) {}",
            post.id(),
            post.company(),
            post.title(),
            tags.category,
            post.created_at().date()
        );
    }
    Ok(())
}

fn execute_show(cmd: &ShowCommand, db: Database) -> Result<()> {
    let service = PostService::new(db);
    let id = PostId::new(cmd.id);

    match service.get_post(id)? {
        Some(post) => print_json(&post),
        None => Err(UserError(format!("Post {id} not found")).into()),
    }
}

fn execute_validate(cmd: &ValidateCommand) -> Result<()> {
    let draft: PostDraft = serde_json::from_str(&cmd.draft)
        .map_err(|e| UserError(format!("Invalid post JSON: {e}")))?;

    let valid = if cmd.strict {
        let report = validate_tag_dimensions(&draft.tag_dimensions);
        print_json(&report)?;
        report.valid
    } else {
        let report = validate_and_normalize_post(&draft);
        print_json(&report)?;
        report.valid
    };

    if valid {
        Ok(())
    } else {
        Err(UserError("Post is invalid".to_string()).into())
    }
}

fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Parses a `DIMENSION=VALUE` filter argument.
fn parse_filter(input: &str) -> Result<(Dimension, String), String> {
    let (key, value) = input
        .split_once('=')
        .ok_or_else(|| format!("expected DIMENSION=VALUE, got '{input}'"))?;
    let dimension = key.trim().parse::<Dimension>().map_err(|e| e.to_string())?;
    let value = value.trim();
    if value.is_empty() {
        return Err(format!("missing value for {dimension}"));
    }
    Ok((dimension, value.to_string()))
}
