//! ironwall - validated iptables rule builder
//!
//! Command-line front end for the rule builder. It parses options, fills in
//! defaults from the config file, and prints the rendered command.
//!
//! # Usage
//!
//! ```bash
//! ironwall rule --chain INPUT --protocol tcp --action accept --dest-port 443
//! ironwall rule --chain INPUT --protocol tcp --action drop \
//!     --source-ip 203.0.113.9 --log-prefix "BLOCKED" --log-level 5
//! ironwall batch rules.json --format json
//! ironwall config --init
//! ```

use clap::builder::PossibleValuesParser;
use clap::{Args, Parser, Subcommand};
use ironwall::config::{self, AppConfig, OutputFormat};
use ironwall::core::request::{PortValue, render_all};
use ironwall::{Action, Chain, Protocol, RenderedRule, RuleBuilder, RuleRequest, Table};
use std::path::PathBuf;
use std::process::ExitCode;
use strum::IntoEnumIterator;

shadow_rs::shadow!(build);

const LONG_VERSION: &str = shadow_rs::formatcp!(
    "{}\ncommit: {}\nbuilt: {}\nrustc: {}",
    build::PKG_VERSION,
    build::SHORT_COMMIT,
    build::BUILD_TIME,
    build::RUST_VERSION
);

#[derive(Parser)]
#[command(name = "ironwall", version, long_version = LONG_VERSION)]
#[command(about = "Build validated iptables commands", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render one rule from command-line options
    Rule(Box<RuleArgs>),
    /// Render every rule in a JSON batch file
    Batch {
        /// JSON file holding an array of rule objects
        file: PathBuf,
        /// Output format (defaults to the configured format)
        #[arg(short, long)]
        format: Option<OutputFormat>,
    },
    /// Show the configuration, or write a default config file
    Config {
        /// Write the default configuration file
        #[arg(long)]
        init: bool,
        /// Overwrite an existing file when used with --init
        #[arg(long, requires = "init")]
        force: bool,
    },
}

#[derive(Args)]
struct RuleArgs {
    /// Chain to append rule to
    #[arg(long, value_parser = PossibleValuesParser::new(Chain::iter().map(Chain::as_str)))]
    chain: String,

    /// Action to perform on matching packets (any letter case)
    #[arg(
        long,
        ignore_case = true,
        value_parser = PossibleValuesParser::new(Action::iter().map(Action::as_str))
    )]
    action: String,

    /// Protocol (tcp, udp, icmp, all)
    #[arg(long, value_parser = PossibleValuesParser::new(Protocol::iter().map(Protocol::as_str)))]
    protocol: String,

    /// Table name (defaults to the configured table, normally filter)
    #[arg(long, value_parser = PossibleValuesParser::new(Table::iter().map(Table::as_str)))]
    table: Option<String>,

    /// Source IP address
    #[arg(long)]
    source_ip: Option<String>,

    /// Destination IP address
    #[arg(long)]
    dest_ip: Option<String>,

    /// Source port
    #[arg(long, allow_negative_numbers = true)]
    source_port: Option<i64>,

    /// Destination port
    #[arg(long, allow_negative_numbers = true)]
    dest_port: Option<i64>,

    /// Comment for the rule
    #[arg(long)]
    comment: Option<String>,

    /// Connection states (e.g. NEW,ESTABLISHED)
    #[arg(long)]
    state: Option<String>,

    /// Log prefix string (enables logging)
    #[arg(long)]
    log_prefix: Option<String>,

    /// Log level 0-7 (defaults to the configured level, normally 4)
    #[arg(long, allow_negative_numbers = true)]
    log_level: Option<i64>,

    /// Output format (defaults to the configured format)
    #[arg(short, long)]
    format: Option<OutputFormat>,
}

impl RuleArgs {
    fn into_request(self, config: &AppConfig) -> RuleRequest {
        RuleRequest {
            table: self
                .table
                .unwrap_or_else(|| config.default_table.as_str().to_string()),
            chain: self.chain,
            protocol: self.protocol,
            action: self.action,
            source_ip: self.source_ip,
            dest_ip: self.dest_ip,
            source_port: self.source_port.map(PortValue::Number),
            dest_port: self.dest_port.map(PortValue::Number),
            comment: self.comment,
            state: self.state,
            log_prefix: self.log_prefix,
            log_level: self.log_level.unwrap_or(config.default_log_level),
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Only config and batch files need I/O; a single-threaded runtime is enough
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: failed to start runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(handle_cli(cli.command)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!("Command failed: {e:?}");
            eprint!("{}", error_report(&e));
            ExitCode::FAILURE
        }
    }
}

/// Formats an error as `Error: ...` followed by one `  hint: ...` line per suggestion
fn error_report(e: &ironwall::Error) -> String {
    let translation = e.translate();
    let mut report = format!("Error: {}\n", translation.user_message);
    for suggestion in &translation.suggestions {
        report.push_str(&format!("  hint: {suggestion}\n"));
    }
    report
}

async fn handle_cli(command: Commands) -> ironwall::Result<()> {
    let config = config::load_config().await;
    tracing::debug!("Effective config: {config:?}");

    match command {
        Commands::Rule(args) => {
            let format = args.format.unwrap_or(config.output_format);
            let request = args.into_request(&config);

            let mut builder = RuleBuilder::new();
            let rule = request.render(&mut builder)?;
            tracing::info!("Rendered rule with {} tokens", rule.tokens.len());

            if config.show_advisories {
                print_advisories(&request);
            }
            print_rules(std::slice::from_ref(&rule), format, false)?;
        }
        Commands::Batch { file, format } => {
            let format = format.unwrap_or(config.output_format);
            let json = tokio::fs::read_to_string(&file).await?;
            let requests: Vec<RuleRequest> = serde_json::from_str(&json)?;
            tracing::info!("Loaded {} rules from {}", requests.len(), file.display());

            let rules = render_all(&requests)?;

            if config.show_advisories {
                for request in &requests {
                    print_advisories(request);
                }
            }
            print_rules(&rules, format, true)?;
        }
        Commands::Config { init, force } => {
            let path = ironwall::utils::get_config_path();
            if init {
                let Some(path) = path else {
                    return Err(std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        "Config directory not available",
                    )
                    .into());
                };
                if !force && tokio::fs::try_exists(&path).await? {
                    println!(
                        "Config already exists at {} (use --force to overwrite)",
                        path.display()
                    );
                    return Ok(());
                }
                config::save_config_to(&AppConfig::default(), &path).await?;
                println!("✓ Wrote default config to {}", path.display());
            } else {
                match path {
                    Some(p) => println!("Config file: {}", p.display()),
                    None => println!("Config file: (unavailable)"),
                }
                println!("{}", serde_json::to_string_pretty(&config)?);
            }
        }
    }
    Ok(())
}

fn print_advisories(request: &RuleRequest) {
    for note in request.advisories() {
        eprintln!("note: {note}");
    }
}

/// Prints rendered rules. A batch in JSON mode is printed as one array.
fn print_rules(
    rules: &[RenderedRule],
    format: OutputFormat,
    as_array: bool,
) -> ironwall::Result<()> {
    match format {
        OutputFormat::Text => {
            for rule in rules {
                println!("{}", rule.command);
            }
        }
        OutputFormat::Json if as_array => println!("{}", serde_json::to_string_pretty(rules)?),
        OutputFormat::Json => {
            for rule in rules {
                println!("{}", serde_json::to_string_pretty(rule)?);
            }
        }
    }
    Ok(())
}
