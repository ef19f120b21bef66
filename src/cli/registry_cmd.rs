// Copyright 2024-2026 ML Service Contributors
// SPDX-License-Identifier: Apache-2.0

//! Model and resource CLI subcommands.

use super::{
    flag_value, has_flag, parse_version, positionals, print_information,
    print_information_list, report, usage_error, EXIT_OK,
};
use crate::error::ServiceResult;
use crate::service::MlService;

pub const MODEL_HELP: &str = "USAGE:
    ml-service-cli model register <NAME> <PATH> [--activate] [--desc TEXT]
    ml-service-cli model update <NAME> <VERSION> <DESCRIPTION>
    ml-service-cli model activate <NAME> <VERSION>
    ml-service-cli model get <NAME> <VERSION>
    ml-service-cli model active <NAME>
    ml-service-cli model list <NAME>
    ml-service-cli model delete <NAME> [VERSION]";

pub const RESOURCE_HELP: &str = "USAGE:
    ml-service-cli resource add <NAME> <PATH> [--desc TEXT]
    ml-service-cli resource get <NAME>
    ml-service-cli resource delete <NAME>";

fn finish<T>(result: ServiceResult<T>, on_ok: impl FnOnce(T)) -> i32 {
    match result {
        Ok(value) => {
            on_ok(value);
            EXIT_OK
        }
        Err(e) => report(&e),
    }
}

/// Run a `model` subcommand. `args` excludes the `model` word.
pub fn run_model(service: &MlService, args: &[String]) -> i32 {
    let pos = positionals(args, &["--desc"]);

    match pos.as_slice() {
        ["register", name, path] => {
            let desc = flag_value(args, "--desc");
            let activate = has_flag(args, "--activate");
            finish(service.model_register(name, path, activate, desc), |v| {
                println!("Registered '{}' as version {}.", name, v)
            })
        }
        ["update", name, version, desc] => match parse_version(version) {
            Some(v) => finish(service.model_update_description(name, v, desc), |_| {
                println!("Updated '{}' version {}.", name, v)
            }),
            None => usage_error("VERSION must be an unsigned integer.", MODEL_HELP),
        },
        ["activate", name, version] => match parse_version(version) {
            Some(v) => finish(service.model_activate(name, v), |_| {
                println!("Activated '{}' version {}.", name, v)
            }),
            None => usage_error("VERSION must be an unsigned integer.", MODEL_HELP),
        },
        ["get", name, version] => match parse_version(version) {
            Some(v) => finish(service.model_get(name, v), |info| print_information(&info)),
            None => usage_error("VERSION must be an unsigned integer.", MODEL_HELP),
        },
        ["active", name] => finish(service.model_get_activated(name), |info| {
            print_information(&info)
        }),
        ["list", name] => finish(service.model_get_all(name), |list| {
            print_information_list(&list)
        }),
        ["delete", name] => finish(service.model_delete(name, 0), |_| {
            println!("Deleted every version of '{}'.", name)
        }),
        ["delete", name, version] => match parse_version(version) {
            Some(v) => finish(service.model_delete(name, v), |_| {
                println!("Deleted '{}' version {}.", name, v)
            }),
            None => usage_error("VERSION must be an unsigned integer.", MODEL_HELP),
        },
        _ => usage_error("Unknown or incomplete model command.", MODEL_HELP),
    }
}

/// Run a `resource` subcommand. `args` excludes the `resource` word.
pub fn run_resource(service: &MlService, args: &[String]) -> i32 {
    let pos = positionals(args, &["--desc"]);
    match pos.as_slice() {
        ["add", name, path] => {
            let desc = flag_value(args, "--desc");
            finish(service.resource_add(name, path, desc), |_| {
                println!("Added '{}' to resource '{}'.", path, name)
            })
        }
        ["get", name] => finish(service.resource_get(name), |list| print_information_list(&list)),
        ["delete", name] => finish(service.resource_delete(name), |_| {
            println!("Resource '{}' deleted.", name)
        }),
        _ => usage_error("Unknown or incomplete resource command.", RESOURCE_HELP),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::InMemoryAgent;
    use crate::cli::{EXIT_FAILURE, EXIT_USAGE};
    use std::sync::Arc;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_model_commands() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("m.tflite");
        std::fs::write(&file, b"x").unwrap();
        let path = file.to_str().unwrap();

        let agent = Arc::new(InMemoryAgent::new());
        let service = MlService::new(agent.clone());

        assert_eq!(
            run_model(&service, &args(&["register", "m", path, "--activate", "--desc", "first"])),
            EXIT_OK
        );
        assert_eq!(run_model(&service, &args(&["active", "m"])), EXIT_OK);
        assert_eq!(run_model(&service, &args(&["list", "m"])), EXIT_OK);
        assert_eq!(run_model(&service, &args(&["activate", "m", "0"])), EXIT_FAILURE);
        assert_eq!(agent.call_count("model_activate"), 0);
        assert_eq!(run_model(&service, &args(&["get", "m", "one"])), EXIT_USAGE);
        assert_eq!(run_model(&service, &args(&["delete", "m"])), EXIT_OK);
    }

    #[test]
    fn test_resource_commands() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("labels.txt");
        std::fs::write(&file, b"cat").unwrap();
        let path = file.to_str().unwrap();
        let service = MlService::new(Arc::new(InMemoryAgent::new()));

        assert_eq!(run_resource(&service, &args(&["add", "labels", path])), EXIT_OK);
        assert_eq!(run_resource(&service, &args(&["get", "labels"])), EXIT_OK);
        assert_eq!(run_resource(&service, &args(&["delete", "labels"])), EXIT_OK);
        assert_eq!(run_resource(&service, &args(&["add", "labels"])), EXIT_USAGE);
    }
}
