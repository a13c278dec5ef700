//! Analysis Explorer CLI
//!
//! Query, count and report over a configuration analysis stored as JSON.

use analysis_explorer::config::{Config, OutputFormat};
use analysis_explorer::{
    get_formatter, ConfigAnalysis, ConsoleOutputter, Criteria, ExplorerError, Forest,
    ReportSelection, ResultPath, ResultsExplorer, Severity,
};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "analysis-explorer",
    version,
    about = "Explore configuration analysis results",
    long_about = "Count, query and report on the value host and lookup key results of a configuration analysis."
)]
struct Cli {
    /// Analysis JSON file
    file: PathBuf,

    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, global = true)]
    format: Option<Format>,

    /// Pretty print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Count matching results
    Count(QueryArgs),

    /// List matching results with their paths
    Query(QueryArgs),

    /// Check if any result matches (exit code 1 when none does)
    Has(QueryArgs),

    /// Show the first matching result
    Find(QueryArgs),

    /// Look up a matching result by its path
    Get {
        /// Path as Key=identity pairs, e.g. "ValueHost=startDate,Property=dataType"
        #[arg(long)]
        path: ResultPath,

        #[command(flatten)]
        query: QueryArgs,
    },

    /// Fail with exit code 2 if the analysis reports any errors
    Check {
        /// Attach the complete analysis to the error report
        #[arg(long)]
        include_tree: bool,
    },

    /// Print a report of matching results
    Report {
        #[command(flatten)]
        query: QueryArgs,

        /// Attach the complete analysis to the report
        #[arg(long)]
        include_tree: bool,
    },
}

#[derive(Args)]
struct QueryArgs {
    /// Which forest to search
    #[arg(long, value_enum, default_value = "all")]
    forest: ForestArg,

    #[command(flatten)]
    filters: FilterArgs,
}

#[derive(Args)]
struct FilterArgs {
    /// Features to match (comma-separated)
    #[arg(long = "feature", value_delimiter = ',')]
    features: Vec<String>,

    /// Severities to match; "none" matches results without a severity
    #[arg(long = "severity", value_delimiter = ',')]
    severities: Vec<String>,

    /// Lookup keys to match
    #[arg(long = "lookup-key", value_delimiter = ',')]
    lookup_keys: Vec<String>,

    /// Service names to match (identifier, converter, comparer, parser, formatter)
    #[arg(long = "service", value_delimiter = ',')]
    service_names: Vec<String>,

    /// Value host names to match
    #[arg(long = "value-host", value_delimiter = ',')]
    value_host_names: Vec<String>,

    /// Validator error codes to match
    #[arg(long = "error-code", value_delimiter = ',')]
    error_codes: Vec<String>,

    /// Condition types to match
    #[arg(long = "condition-type", value_delimiter = ',')]
    condition_types: Vec<String>,

    /// Property names to match
    #[arg(long = "property", value_delimiter = ',')]
    property_names: Vec<String>,

    /// Culture ids to match
    #[arg(long = "culture", value_delimiter = ',')]
    culture_ids: Vec<String>,

    /// Skip the children of results that do not match
    #[arg(long)]
    prune: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum ForestArg {
    All,
    ValueHosts,
    LookupKeys,
}

impl From<ForestArg> for Forest {
    fn from(forest: ForestArg) -> Self {
        match forest {
            ForestArg::All => Forest::All,
            ForestArg::ValueHosts => Forest::ValueHosts,
            ForestArg::LookupKeys => Forest::LookupKeys,
        }
    }
}

fn non_empty(values: &[String]) -> Option<Vec<String>> {
    (!values.is_empty()).then(|| values.to_vec())
}

impl FilterArgs {
    /// Criteria for the dimensions given on the command line
    fn to_criteria(&self) -> Result<Criteria> {
        let severities = if self.severities.is_empty() {
            None
        } else {
            let parsed = self
                .severities
                .iter()
                .map(|s| match s.to_lowercase().as_str() {
                    "none" => Ok(None),
                    _ => s.parse::<Severity>().map(Some),
                })
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(anyhow::Error::msg)?;
            Some(parsed)
        };

        Ok(Criteria {
            features: non_empty(&self.features),
            severities,
            lookup_keys: non_empty(&self.lookup_keys),
            service_names: non_empty(&self.service_names),
            value_host_names: non_empty(&self.value_host_names),
            error_codes: non_empty(&self.error_codes),
            condition_types: non_empty(&self.condition_types),
            property_names: non_empty(&self.property_names),
            culture_ids: non_empty(&self.culture_ids),
            prune_on_parent_mismatch: self.prune,
        })
    }
}

/// Report selections for the forests a query covers
fn selections(forest: Forest, criteria: &Criteria) -> (ReportSelection, ReportSelection) {
    let select = |included: bool| {
        if included {
            ReportSelection::Matching(criteria.clone())
        } else {
            ReportSelection::Omit
        }
    };
    (
        select(matches!(forest, Forest::All | Forest::ValueHosts)),
        select(matches!(forest, Forest::All | Forest::LookupKeys)),
    )
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{}: {:#}", "error".red().bold(), e);
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    let config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::load_default().unwrap_or_default(),
    };

    let colored = !cli.no_color && config.output.color.enabled();
    if !colored {
        colored::control::set_override(false);
    }

    let format = match cli.format {
        Some(Format::Text) => OutputFormat::Text,
        Some(Format::Json) => OutputFormat::Json,
        None => config.output.format,
    };
    let formatter = get_formatter(format, cli.pretty || config.output.pretty, colored);

    let analysis = ConfigAnalysis::from_file(&cli.file)
        .with_context(|| format!("Failed to load analysis {}", cli.file.display()))?;
    let explorer = ResultsExplorer::new(&analysis);

    let query = |args: &QueryArgs| -> Result<(Forest, Criteria)> {
        Ok((
            args.forest.into(),
            config.criteria_with(args.filters.to_criteria()?),
        ))
    };

    match &cli.command {
        Commands::Count(args) => {
            let (forest, criteria) = query(args)?;
            println!("{}", explorer.query(forest, Some(&criteria))?.len());
        }
        Commands::Query(args) => {
            let (forest, criteria) = query(args)?;
            for found in explorer.query(forest, Some(&criteria))? {
                println!("{}", formatter.format_result(&found));
            }
        }
        Commands::Has(args) => {
            let (forest, criteria) = query(args)?;
            let found = explorer.find(forest, Some(&criteria))?.is_some();
            println!("{}", found);
            return Ok(if found { 0 } else { 1 });
        }
        Commands::Find(args) => {
            let (forest, criteria) = query(args)?;
            match explorer.find(forest, Some(&criteria))? {
                Some(found) => println!("{}", formatter.format_result(&found)),
                None => {
                    eprintln!("No matching result");
                    return Ok(1);
                }
            }
        }
        Commands::Get { path, query: args } => {
            let (forest, criteria) = query(args)?;
            let candidates = explorer.query(forest, Some(&criteria))?;
            match ResultsExplorer::get_by_path(path, &candidates) {
                Some(found) => println!("{}", formatter.format_result(found)),
                None => {
                    eprintln!("No result at {}", path);
                    return Ok(1);
                }
            }
        }
        Commands::Check { include_tree } => {
            let include_tree = *include_tree || config.report.include_full_tree;
            match explorer.throw_on_errors(include_tree, None) {
                Ok(()) => println!("{}", "No errors".green()),
                Err(ExplorerError::ConfigurationHasErrors { content }) => {
                    eprintln!("{}", "Configuration has errors:".red().bold());
                    println!("{}", content);
                    return Ok(2);
                }
                Err(e) => return Err(e.into()),
            }
        }
        Commands::Report {
            query: args,
            include_tree,
        } => {
            let (forest, criteria) = query(args)?;
            let (value_hosts, lookup_keys) = selections(forest, &criteria);
            let outputter = ConsoleOutputter::new(formatter);
            explorer.report(
                value_hosts,
                lookup_keys,
                *include_tree || config.report.include_full_tree,
                &outputter,
            )?;
        }
    }

    Ok(0)
}
