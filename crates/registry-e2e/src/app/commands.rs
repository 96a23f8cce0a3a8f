use clap::ArgGroup;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use clap::ValueHint;
pub use clap_complete::Shell;
use std::path::PathBuf;

pub use crate::adapters::OutputFormat;
use crate::domain::QueryCategory;

const AFTER_HELP: &str =
    "Use --help for full details and examples. Use --format json for machine-readable output.";

const LONG_ABOUT: &str = "\
Run the registry lookup test catalogue against a system under test.\n\
\n\
Each case sends one payload to one query category and checks only whether the\n\
answer was a success or a failure. Infrastructure trouble is reported separately.";

const AFTER_LONG_HELP: &str = r#"TARGETS:
    --stub            Built-in deterministic registry (default)
    --server <CMD>    Spawn a tool server and talk JSON-RPC over its stdio
    --tcp <ADDR>      Connect to a tool server listening on ADDR

EXIT CODES:
    0    every case passed
    1    at least one case failed
    75   no failures, but some cases errored
    64   usage or catalogue error
    69   system under test unavailable
    130  interrupted

EXAMPLES:
    registry-e2e run --stub
    registry-e2e run --server "terraform-mcp-server stdio" --parallel
    registry-e2e run --tcp 127.0.0.1:8080 --group providerDocs --case '#1'
    registry-e2e run --server "registry-e2e serve-stub"
    registry-e2e list --group searchModules
    registry-e2e export > catalogue.json"#;

#[derive(Parser)]
#[command(name = "registry-e2e")]
#[command(author, version, propagate_version = true)]
#[command(about = "End-to-end test catalogue and harness for Terraform registry lookup tools")]
#[command(long_about = LONG_ABOUT)]
#[command(after_help = AFTER_HELP)]
#[command(after_long_help = AFTER_LONG_HELP)]
#[command(subcommand_required = true, arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (text or json)
    #[arg(
        short,
        long,
        global = true,
        value_enum,
        value_name = "FORMAT",
        default_value_t = OutputFormat::Text,
        help_heading = "Output Options"
    )]
    pub format: OutputFormat,

    /// Shorthand for --format json
    #[arg(long, global = true, help_heading = "Output Options")]
    pub json: bool,

    /// Disable colored output (also respects NO_COLOR)
    #[arg(long, global = true, help_heading = "Output Options")]
    pub no_color: bool,

    /// Enable verbose logging on stderr
    #[arg(short, long, global = true, help_heading = "Debug Options")]
    pub verbose: bool,
}

impl Cli {
    pub fn effective_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            self.format
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the catalogue against a system under test
    Run(RunArgs),

    /// List groups and cases with their expected outcomes
    List {
        #[command(flatten)]
        source: CatalogueArgs,

        /// Only list these groups
        #[arg(short, long = "group", value_name = "GROUP", value_parser = parse_category)]
        groups: Vec<QueryCategory>,
    },

    /// Print the catalogue as JSON
    Export {
        #[command(flatten)]
        source: CatalogueArgs,
    },

    /// Serve the stub registry as an MCP tool server on stdin/stdout
    #[command(after_long_help = "\
EXAMPLES:
    registry-e2e run --server \"registry-e2e serve-stub\"")]
    ServeStub,

    /// Print a shell completion script
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Debug, Args)]
pub struct CatalogueArgs {
    /// Load cases from a JSON file instead of the built-in catalogue
    #[arg(long, value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub catalogue: Option<PathBuf>,
}

#[derive(Debug, Args)]
#[command(group(
    ArgGroup::new("target")
        .args(["stub", "server", "tcp"])
        .multiple(false)
))]
pub struct RunArgs {
    /// Use the built-in stub registry
    #[arg(long, help_heading = "Target")]
    pub stub: bool,

    /// Tool server command to spawn (stdio transport)
    #[arg(
        long,
        value_name = "CMD",
        value_hint = ValueHint::CommandString,
        help_heading = "Target"
    )]
    pub server: Option<String>,

    /// Tool server address (TCP transport)
    #[arg(long, value_name = "ADDR", help_heading = "Target")]
    pub tcp: Option<String>,

    #[command(flatten)]
    pub source: CatalogueArgs,

    /// Only run these groups
    #[arg(short, long = "group", value_name = "GROUP", value_parser = parse_category)]
    pub groups: Vec<QueryCategory>,

    /// Only run these cases (name, or #index for unnamed cases)
    #[arg(short, long = "case", value_name = "NAME")]
    pub cases: Vec<String>,

    /// Per-case timeout in seconds
    #[arg(short, long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Stop scheduling cases after the first errored one
    #[arg(long)]
    pub strict: bool,

    /// Run groups concurrently
    #[arg(long)]
    pub parallel: bool,
}

fn parse_category(value: &str) -> Result<QueryCategory, String> {
    value.parse::<QueryCategory>().map_err(|err| {
        let known: Vec<&str> = QueryCategory::ALL.iter().map(QueryCategory::as_str).collect();
        format!("{} (expected one of: {})", err, known.join(", "))
    })
}
