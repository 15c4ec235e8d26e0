//! docdesk CLI - one database administration operation per invocation.
//!
//! `docdesk [--uri URI] [--config PATH] [-v...] [--compact] COMMAND`
//!
//! The result envelope is printed as JSON on stdout; logs go to stderr.

mod commands;
mod format;
mod parse;

use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

use clap::ArgMatches;
use docdesk_engine::{Connector, SchemeRouter};
use docdesk_executor::{DeskConfig, Executor, CONFIG_FILE_NAME};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use commands::build_cli;
use format::{exit_code, format_result, log_filter, EXIT_OK, EXIT_USAGE};
use parse::{matches_to_action, CliAction};

fn main() {
    let matches = build_cli().get_matches();
    init_logging(&matches);

    let action = match matches_to_action(&matches) {
        Ok(action) => action,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(EXIT_USAGE);
        }
    };

    if let CliAction::InitConfig(path) = &action {
        process::exit(init_config(path));
    }

    let config = match load_config(&matches) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(EXIT_USAGE);
        }
    };

    let executor = Executor::with_config(connector(), config);
    let result = match action {
        CliAction::Execute(cmd) => executor.run(cmd),
        CliAction::Exec(body) => executor.run_json(&body),
        CliAction::InitConfig(_) => return,
    };

    println!("{}", format_result(&result, matches.get_flag("compact")));
    process::exit(exit_code(&result));
}

fn init_logging(matches: &ArgMatches) {
    let verbose = matches.get_count("verbose");
    let explicit = matches.get_one::<String>("log-level").map(String::as_str);
    let filter = if explicit.is_none() && verbose == 0 {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_filter(0, None)))
    } else {
        EnvFilter::new(log_filter(verbose, explicit))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// `--config PATH`, else `./docdesk.toml` when present, else defaults.
fn load_config(matches: &ArgMatches) -> Result<DeskConfig, String> {
    let path = match matches.get_one::<String>("config") {
        Some(path) => PathBuf::from(path),
        None => {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if !local.exists() {
                return Ok(DeskConfig::default());
            }
            local
        }
    };
    debug!(target: "docdesk::cli", path = %path.display(), "Loading config");
    DeskConfig::from_file(&path).map_err(|e| e.to_string())
}

fn init_config(path: &Path) -> i32 {
    match DeskConfig::write_default_if_missing(path) {
        Ok(()) => {
            eprintln!("Config ready at {}", path.display());
            EXIT_OK
        }
        Err(e) => {
            eprintln!("{}", e);
            format::EXIT_FAILED
        }
    }
}

fn connector() -> Arc<dyn Connector> {
    let router = SchemeRouter::new();
    #[cfg(feature = "mongodb")]
    let router = docdesk_engine::MONGO_SCHEMES
        .iter()
        .fold(router, |router, scheme| {
            router.route(*scheme, Arc::new(docdesk_engine::MongoConnector::new()))
        });
    Arc::new(router)
}
