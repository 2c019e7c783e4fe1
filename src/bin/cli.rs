//! dictclient CLI
//!
//! Command-line interface for querying DICT servers.

use clap::{Parser, Subcommand};
use dictclient::config::{DEFAULT_HOST, DEFAULT_PORT, DEFAULT_TIMEOUT_MS};
use dictclient::{Command, Config, DictClient, DictError};
use tracing_subscriber::{fmt, EnvFilter};

/// dictclient CLI
#[derive(Parser, Debug)]
#[command(name = "dict-cli")]
#[command(about = "Query DICT (RFC 2229) dictionary servers")]
#[command(version)]
struct Args {
    /// Server host
    #[arg(short, long, default_value = DEFAULT_HOST)]
    server: String,

    /// Server port
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Timeout for connect, read and write in milliseconds (0 = none)
    #[arg(short, long, default_value_t = DEFAULT_TIMEOUT_MS)]
    timeout_ms: u64,

    /// Authenticate as this user before running the command
    #[arg(short, long, requires = "secret")]
    user: Option<String>,

    /// Shared secret for --user
    #[arg(long, requires = "user")]
    secret: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Define a word
    Define {
        /// The word to define
        word: String,

        /// Database to search
        #[arg(short, long, default_value = "*")]
        database: String,
    },

    /// Find words matching a strategy
    Match {
        /// The word to match
        word: String,

        /// Matching strategy
        #[arg(short, long, default_value = ".")]
        strategy: String,

        /// Database to search
        #[arg(short, long, default_value = "*")]
        database: String,
    },

    /// List databases
    Databases,

    /// List match strategies
    Strategies,

    /// Show information about a database
    Info {
        /// Database name
        database: String,
    },

    /// Show server information
    Server,

    /// Show server help
    Help,

    /// Send a raw command line and print every reply
    Raw {
        /// Command text, e.g. "SHOW DB"
        line: String,
    },
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,dictclient=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), DictError> {
    let config = Config::builder()
        .host(&args.server)
        .port(args.port)
        .timeout_ms(args.timeout_ms)
        .build();

    let mut client = DictClient::connect(config)?;

    if let (Some(user), Some(secret)) = (&args.user, &args.secret) {
        if !client.authenticate(user, secret)? {
            tracing::warn!("Authentication as {} was rejected", user);
        }
    }

    match args.command {
        Commands::Define { word, database } => {
            let definitions = client.define_in(&database, &word)?;
            if definitions.is_empty() {
                println!("No definitions found for \"{}\"", word);
            }
            for definition in definitions {
                println!("{}\n", definition);
            }
        }
        Commands::Match {
            word,
            strategy,
            database,
        } => {
            for found in client.match_in(&database, &strategy, &word)? {
                println!("{}", found);
            }
        }
        Commands::Databases => {
            for item in client.databases()? {
                println!("{}", item);
            }
        }
        Commands::Strategies => {
            for item in client.strategies()? {
                println!("{}", item);
            }
        }
        Commands::Info { database } => println!("{}", client.database_info(&database)?),
        Commands::Server => println!("{}", client.server_info()?),
        Commands::Help => println!("{}", client.help()?),
        Commands::Raw { line } => {
            for response in client.execute(&Command::other(line, None)?)? {
                println!("{} {}", response.status, response.message);
                if let Some(raw) = response.raw_data {
                    println!("{}\n.", raw);
                }
            }
        }
    }

    client.close()
}
