use clap::{Parser, Subcommand};
use opquery::cli as prog_cli;
use opquery::cluster::TopologyKind;
use opquery::config::load_config;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "opquery", version, about = "Inspect legacy query specifications", long_about = None)]
struct Cli {
    /// Path to a config file (TOML)
    #[arg(long, help = "Path to a config file (TOML). If omitted, defaults are used.")]
    config: Option<PathBuf>,
    #[arg(long, help = "Log level: error|warn|info|debug|trace. Overrides config/env.")]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(name = "build", about = "Build the legacy query specification for a find")]
    Build {
        #[arg(long, help = "Database name. Falls back to default_database from config.")]
        db: Option<String>,
        #[arg(long, help = "Collection name")]
        coll: String,
        #[arg(long, help = "Filter as a JSON object")]
        filter: Option<String>,
        #[arg(long, help = "Query options as a JSON object, e.g. '{\"sort\":{\"y\":1}}'")]
        options: Option<String>,
        #[arg(long, help = "Read preference as JSON, e.g. '{\"mode\":\"secondary\"}'")]
        read: Option<String>,
        #[arg(long, help = "Topology: single|replica_set|replica_set_no_primary|sharded|unknown")]
        topology: Option<String>,
    },
    #[command(name = "index-name", about = "Print the default name for an index spec")]
    IndexName {
        #[arg(long, help = "Index spec as a JSON object, e.g. '{\"name\":1,\"age\":-1}'")]
        spec: String,
    },
}

fn fail(msg: impl std::fmt::Display) -> ! {
    eprintln!("error: {msg}");
    std::process::exit(1);
}

fn main() {
    let cli = Cli::parse();
    let cfg = load_config(cli.config.as_deref()).unwrap_or_else(|e| fail(e));
    let level = cli.log_level.as_deref().or(cfg.log_level.as_deref());
    let logging = match (cfg.log_config.as_deref(), cfg.log_dir.as_deref()) {
        (Some(file), _) => opquery::logger::init_path(file),
        (None, Some(dir)) => opquery::logger::configure_logging(Some(dir), level, cfg.log_retention),
        (None, None) => Ok(()),
    };
    if let Err(e) = logging {
        eprintln!("warning: logging disabled: {e}");
    }

    let cmd = match cli.command {
        Commands::Build { db, coll, filter, options, read, topology } => {
            let db = db
                .or_else(|| cfg.default_database.clone())
                .unwrap_or_else(|| fail("--db is required when no default_database is configured"));
            let topology = match topology {
                Some(name) => TopologyKind::from_name(&name)
                    .unwrap_or_else(|| fail(format!("unknown topology '{name}'"))),
                None => cfg.topology.unwrap_or(TopologyKind::Single),
            };
            prog_cli::Command::BuildSpec {
                db,
                collection: coll,
                filter_json: filter,
                options_json: options,
                read_json: read,
                topology,
            }
        }
        Commands::IndexName { spec } => prog_cli::Command::IndexName { spec_json: spec },
    };

    match prog_cli::run(cmd) {
        Ok(out) => println!("{out}"),
        Err(e) => fail(e),
    }
}
