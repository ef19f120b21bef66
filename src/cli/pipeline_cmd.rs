// Copyright 2024-2026 ML Service Contributors
// SPDX-License-Identifier: Apache-2.0

//! Pipeline CLI subcommands: set, get, delete, launch.

use std::time::Duration;

use super::{flag_value, positionals, report, usage_error, EXIT_OK};
use crate::service::MlService;

pub const HELP: &str = "USAGE:
    ml-service-cli pipeline set <NAME> <DESCRIPTION>
    ml-service-cli pipeline get <NAME>
    ml-service-cli pipeline delete <NAME>
    ml-service-cli pipeline launch <NAME> [--hold SECS]";

/// Run a `pipeline` subcommand. `args` excludes the `pipeline` word.
pub fn run(service: &MlService, args: &[String]) -> i32 {
    let pos = positionals(args, &["--hold"]);
    match pos.as_slice() {
        ["set", name, desc] => match service.pipeline_set_description(name, desc) {
            Ok(()) => {
                println!("Pipeline '{}' stored.", name);
                EXIT_OK
            }
            Err(e) => report(&e),
        },
        ["get", name] => match service.pipeline_get_description(name) {
            Ok(desc) => {
                println!("{}", desc);
                EXIT_OK
            }
            Err(e) => report(&e),
        },
        ["delete", name] => match service.pipeline_delete(name) {
            Ok(()) => {
                println!("Pipeline '{}' deleted.", name);
                EXIT_OK
            }
            Err(e) => report(&e),
        },
        ["launch", name] => {
            let hold = match flag_value(args, "--hold").map(str::parse::<u64>) {
                None => 0,
                Some(Ok(secs)) => secs,
                Some(Err(_)) => return usage_error("--hold expects a number of seconds", HELP),
            };
            launch(service, name, Duration::from_secs(hold))
        }
        _ => usage_error("Unknown or incomplete pipeline command.", HELP),
    }
}

/// Launch, report the state, keep it running for `hold`, then destroy.
fn launch(service: &MlService, name: &str, hold: Duration) -> i32 {
    let mut handle = match service.pipeline_launch(name) {
        Ok(handle) => handle,
        Err(e) => return report(&e),
    };

    match service.pipeline_get_state(&handle) {
        Ok(state) => println!("Pipeline '{}' launched, state {:?}.", name, state),
        Err(e) => eprintln!("Launched, but state query failed: {}", e),
    }

    if !hold.is_zero() {
        std::thread::sleep(hold);
    }

    match handle.destroy() {
        Ok(()) => {
            println!("Pipeline '{}' destroyed.", name);
            EXIT_OK
        }
        Err(e) => report(&e),
    }
}
