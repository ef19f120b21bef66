// Copyright 2024-2026 ML Service Contributors
// SPDX-License-Identifier: Apache-2.0

//! `ml-service-cli` entry point.
//!
//! ## Subcommands
//!
//! - `pipeline` - store, fetch, delete and launch pipelines
//! - `model` - register and query model versions
//! - `resource` - register and query resources
//! - `config` - show or validate configuration
//! - `version`, `help`

use std::process::ExitCode;

use ml_service_core::cli::{
    config_cmd, pipeline_cmd, registry_cmd, report, EXIT_OK, EXIT_USAGE,
};
use ml_service_core::config::{self, ServiceConfig};
use ml_service_core::service::MlService;
use ml_service_core::telemetry::init_logging;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    let command = args.get(1).map(|s| s.as_str()).unwrap_or("help");
    let rest = args.get(2..).unwrap_or(&[]);

    let code = match command {
        "pipeline" => with_service(|service| pipeline_cmd::run(service, rest)),
        "model" => with_service(|service| registry_cmd::run_model(service, rest)),
        "resource" => with_service(|service| registry_cmd::run_resource(service, rest)),
        "config" => {
            let subcommand = rest.first().map(|s| s.as_str()).unwrap_or("show");
            match subcommand {
                "show" => {
                    config_cmd::run_show();
                    EXIT_OK
                }
                "defaults" => {
                    config_cmd::run_defaults();
                    EXIT_OK
                }
                "validate" => config_cmd::run_validate(rest.get(1).map(|s| s.as_str())),
                _ => {
                    eprintln!("Unknown config subcommand: {}", subcommand);
                    print_command_help("config");
                    EXIT_USAGE
                }
            }
        }
        "help" | "--help" | "-h" => {
            match rest.first() {
                Some(subcommand) => print_command_help(subcommand),
                None => print_usage(),
            }
            EXIT_OK
        }
        "version" | "--version" | "-V" => {
            println!("ml-service-cli {}", env!("CARGO_PKG_VERSION"));
            EXIT_OK
        }
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            EXIT_USAGE
        }
    };

    ExitCode::from(u8::try_from(code).unwrap_or(1))
}

/// Load configuration, set up logging and run `f` against the agent.
fn with_service(f: impl FnOnce(&MlService) -> i32) -> i32 {
    let cfg = cli_config();
    if let Err(e) = init_logging(&cfg.log) {
        eprintln!("Logging disabled: {}", e);
    }

    match MlService::from_config(&cfg) {
        Ok(service) => f(&service),
        Err(e) => report(&e),
    }
}

/// Environment configuration, quieter by default than the library.
fn cli_config() -> ServiceConfig {
    let mut cfg = config::load();
    if std::env::var_os("ML_SERVICE_LOG").is_none() {
        cfg.log.level = "warn".to_string();
    }
    cfg
}

fn print_usage() {
    let version = env!("CARGO_PKG_VERSION");
    eprintln!(
        "ml-service-cli v{}

USAGE:
    ml-service-cli <COMMAND> [ARGS]

COMMANDS:
    pipeline     Store, fetch, delete and launch pipelines
    model        Register, activate, query and delete model versions
    resource     Add, query and delete resources
    config       Manage configuration (show, defaults, validate)
    version      Show version information
    help         Show this help message

ENVIRONMENT:
    ML_SERVICE_SOCKET_PATH  Agent IPC endpoint
    ML_SERVICE_FEATURE      Set to 0 to disable the service API
    ML_SERVICE_APP_RW_PATH  Value substituted for @APP_RW_PATH@
    ML_SERVICE_APP_RO_PATH  Value substituted for @APP_RO_PATH@
    ML_SERVICE_LOG          Log filter (default: warn)

EXIT CODES:
    0  Success
    1  Operation failed
    2  Usage error
    3  Agent unreachable",
        version
    );
}

fn print_command_help(command: &str) {
    match command {
        "pipeline" => eprintln!("{}", pipeline_cmd::HELP),
        "model" => eprintln!("{}", registry_cmd::MODEL_HELP),
        "resource" => eprintln!("{}", registry_cmd::RESOURCE_HELP),
        "config" => eprintln!(
            "USAGE:
    ml-service-cli config show
    ml-service-cli config defaults
    ml-service-cli config validate [FILE]"
        ),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
        }
    }
}
