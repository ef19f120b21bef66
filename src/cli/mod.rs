// Copyright 2024-2026 ML Service Contributors
// SPDX-License-Identifier: Apache-2.0

//! CLI module for `ml-service-cli`.
//!
//! Thin command layer over [`MlService`](crate::service::MlService) using the
//! IPC transport. Exit codes:
//!
//! | Code | Meaning |
//! |---|---|
//! | 0 | Success |
//! | 1 | Operation failed |
//! | 2 | Usage error |
//! | 3 | Agent unreachable |
//!
//! ## Usage
//!
//! ```bash
//! ml-service-cli pipeline set cam "v4l2src ! tensor_converter ! fakesink"
//! ml-service-cli model register mobilenet /opt/models/mobilenet.tflite --activate
//! ml-service-cli resource get labels
//! ml-service-cli config show
//! ```

pub mod config_cmd;
pub mod pipeline_cmd;
pub mod registry_cmd;

use crate::agent::AgentError;
use crate::error::ServiceError;
use crate::information::{Information, InformationList};

pub const EXIT_OK: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_USAGE: i32 = 2;
pub const EXIT_CONNECTION: i32 = 3;

/// Map a failed operation to a process exit code.
pub fn exit_code(err: &ServiceError) -> i32 {
    match err {
        ServiceError::Remote(AgentError::Transport(_) | AgentError::Timeout(_)) => EXIT_CONNECTION,
        _ => EXIT_FAILURE,
    }
}

/// Report `err` on stderr and return its exit code.
pub fn report(err: &ServiceError) -> i32 {
    let code = exit_code(err);
    eprintln!("Error: {} (status {})", err, err.code());
    if code == EXIT_CONNECTION {
        eprintln!("Is the agent running? Check ML_SERVICE_SOCKET_PATH.");
    }
    code
}

/// Print a usage error and return [`EXIT_USAGE`].
pub fn usage_error(msg: &str, help: &str) -> i32 {
    eprintln!("{}", msg);
    eprintln!("{}", help);
    EXIT_USAGE
}

/// Value following `flag` in `args`, if present.
pub fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

pub fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

/// Positional arguments, skipping flags and the values of `value_flags`.
pub fn positionals<'a>(args: &'a [String], value_flags: &[&str]) -> Vec<&'a str> {
    let mut out = Vec::new();
    let mut skip_next = false;
    for arg in args {
        if skip_next {
            skip_next = false;
            continue;
        }
        if value_flags.contains(&arg.as_str()) {
            skip_next = true;
            continue;
        }
        if arg.starts_with("--") {
            continue;
        }
        out.push(arg.as_str());
    }
    out
}

/// Parse a version argument. `0` is passed through; the service rejects it
/// where a concrete version is required.
pub fn parse_version(arg: &str) -> Option<u32> {
    arg.parse::<u32>().ok()
}

pub fn print_information(info: &Information) {
    let width = info.keys().map(str::len).max().unwrap_or(0);
    for (key, value) in info.iter() {
        println!("{:<width$}  {}", key, value, width = width);
    }
}

pub fn print_information_list(list: &InformationList) {
    if list.is_empty() {
        println!("No entries.");
        return;
    }
    for (i, info) in list.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("[{}]", i);
        print_information(info);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_exit_code_for_transport_errors() {
        let err = ServiceError::Remote(AgentError::Transport(io::Error::new(
            io::ErrorKind::NotFound,
            "no socket",
        )));
        assert_eq!(exit_code(&err), EXIT_CONNECTION);
        assert_eq!(exit_code(&ServiceError::Remote(AgentError::Timeout("model_get"))), EXIT_CONNECTION);
        assert_eq!(exit_code(&ServiceError::NotSupported), EXIT_FAILURE);
    }

    #[test]
    fn test_flag_parsing() {
        let a = args(&["mobilenet", "/m.tflite", "--desc", "v1", "--activate"]);
        assert_eq!(flag_value(&a, "--desc"), Some("v1"));
        assert!(has_flag(&a, "--activate"));
        assert_eq!(positionals(&a, &["--desc"]), vec!["mobilenet", "/m.tflite"]);
        assert_eq!(flag_value(&a, "--missing"), None);
    }

    #[test]
    fn test_parse_version() {
        assert_eq!(parse_version("3"), Some(3));
        assert_eq!(parse_version("0"), Some(0));
        assert_eq!(parse_version("-1"), None);
    }

    #[test]
    fn test_print_information_smoke() {
        let mut info = Information::new();
        info.set("version", "1").unwrap();
        info.set("path", "/m.tflite").unwrap();
        print_information(&info);
        print_information_list(&InformationList::new());
    }
}
