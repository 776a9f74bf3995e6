use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use crate::utils::types::ArgSet;

/// VoltDB CLI - cluster administration for VoltDB
#[derive(Parser, Debug)]
#[command(name = "voltdb")]
#[command(about = "Cluster administration tool for VoltDB databases")]
#[command(version = "0.1.0")]
pub struct CliArgs {
    /// Print the server command line instead of running it
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// CLI configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub cli_config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initializes a new, empty database root directory
    Init(InitArgs),

    /// Starts a database, then joins or rejoins a cluster as needed
    Start(StartArgs),

    /// Deprecated: use `init` and `start`
    #[command(hide = true)]
    Rejoin(RejoinArgs),

    /// List available commands
    List {
        /// Include hidden and deprecated commands
        #[arg(long)]
        all: bool,
    },

    #[command(external_subcommand)]
    External(Vec<String>),
}

#[derive(Args, Debug, Default)]
pub struct InitArgs {
    /// Directory where the database root is created
    #[arg(short = 'D', long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Deployment configuration file
    #[arg(short = 'C', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Schema file to load on first start
    #[arg(short, long, value_name = "FILE")]
    pub schema: Option<PathBuf>,

    /// Jar of stored procedure classes
    #[arg(short = 'j', long, value_name = "JAR")]
    pub classes: Option<PathBuf>,

    /// Overwrite an existing database root
    #[arg(short, long)]
    pub force: bool,

    /// Extra arguments passed to the server
    #[arg(last = true)]
    pub extra: Vec<String>,
}

#[derive(Args, Debug, Default)]
pub struct StartArgs {
    /// Host of a cluster member to connect to
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// Directory holding the database root
    #[arg(short = 'D', long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Run the server in the background
    #[arg(short = 'B', long)]
    pub background: bool,

    /// Name of the background instance
    #[arg(short = 'I', long)]
    pub instance: Option<String>,

    /// Start in safe mode
    #[arg(long)]
    pub safemode: bool,

    /// Extra arguments passed to the server
    #[arg(last = true)]
    pub extra: Vec<String>,
}

#[derive(Args, Debug, Default)]
pub struct RejoinArgs {
    /// Host of a running cluster member
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// Directory holding the database root
    #[arg(short = 'D', long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Rejoin while the cluster keeps serving requests
    #[arg(long)]
    pub live: bool,

    /// Run the server in the background
    #[arg(short = 'B', long)]
    pub background: bool,

    /// Name of the background instance
    #[arg(short = 'I', long)]
    pub instance: Option<String>,

    /// Extra arguments passed to the server
    #[arg(last = true)]
    pub extra: Vec<String>,
}

impl From<InitArgs> for ArgSet {
    fn from(args: InitArgs) -> Self {
        ArgSet {
            dir: args.dir,
            config: args.config,
            schema: args.schema,
            classes: args.classes,
            force: args.force,
            extra: args.extra,
            ..ArgSet::default()
        }
    }
}

impl From<StartArgs> for ArgSet {
    fn from(args: StartArgs) -> Self {
        ArgSet {
            host: args.host,
            dir: args.dir,
            background: args.background,
            instance: args.instance,
            safemode: args.safemode,
            extra: args.extra,
            ..ArgSet::default()
        }
    }
}

impl From<RejoinArgs> for ArgSet {
    fn from(args: RejoinArgs) -> Self {
        ArgSet {
            host: args.host,
            dir: args.dir,
            live: args.live,
            background: args.background,
            instance: args.instance,
            extra: args.extra,
            ..ArgSet::default()
        }
    }
}

impl Commands {
    /// Registry name and arguments for commands dispatched through the runner.
    /// `None` for commands handled by the CLI itself.
    pub fn into_invocation(self) -> Option<(String, ArgSet)> {
        match self {
            Commands::Init(args) => Some(("init".to_string(), args.into())),
            Commands::Start(args) => Some(("start".to_string(), args.into())),
            Commands::Rejoin(args) => Some(("rejoin".to_string(), args.into())),
            Commands::External(mut words) => {
                if words.is_empty() {
                    return None;
                }
                let name = words.remove(0);
                Some((name, ArgSet { extra: words, ..ArgSet::default() }))
            }
            Commands::List { .. } => None,
        }
    }
}
