//! Environment variable handling for the bookotp application.
//!
//! Config files mark secrets with `"secret_from_env"`; this module maps the
//! JSON path of such a field to the environment variable holding its value.

use std::env;

use crate::models::SECRET_FROM_ENV;

/// The default prefix for configuration environment variables
pub const DEFAULT_PREFIX: &str = "BOOKOTP";

/// The prefix for secret environment variables
pub const SECRET_PREFIX: &str = "BOOKOTP_SECRET";

/// The separator for configuration environment variables
pub const CONFIG_SEPARATOR: &str = "__";

/// The separator for secret environment variables
pub const SECRET_SEPARATOR: &str = "_";

/// Get the prefix for configuration environment variables
pub fn get_config_prefix() -> String {
    env::var("PREFIX").unwrap_or_else(|_| DEFAULT_PREFIX.to_string())
}

/// Convert a secret path to an environment variable name
///
/// `twilio.auth_token` becomes `BOOKOTP_SECRET_TWILIO_AUTH_TOKEN`.
pub fn secret_path_to_env_var(path: &str) -> String {
    let path = path.replace('.', SECRET_SEPARATOR);
    format!("{}{}{}", SECRET_PREFIX, SECRET_SEPARATOR, path).to_uppercase()
}

/// Convert a secret path to its unprefixed legacy name
///
/// `twilio.auth_token` becomes `TWILIO_AUTH_TOKEN`.
pub fn legacy_secret_path_to_env_var(path: &str) -> String {
    let parts: Vec<&str> = path.split('.').collect();
    if parts.len() < 2 {
        return path.to_uppercase();
    }

    let service = parts[0];
    let key = parts[1..].join(SECRET_SEPARATOR);
    format!("{}_{}", service, key).to_uppercase()
}

/// Get an environment variable for a secret path
///
/// Tries the prefixed name first and falls back to the legacy name.
pub fn get_secret_env_var(path: &str) -> Option<String> {
    resolve_secret(path, &|name| env::var(name).ok())
}

fn resolve_secret(path: &str, lookup: &dyn Fn(&str) -> Option<String>) -> Option<String> {
    lookup(&secret_path_to_env_var(path)).or_else(|| lookup(&legacy_secret_path_to_env_var(path)))
}

/// Replace every `"secret_from_env"` string in `value` using the process environment.
///
/// Returns the paths that could not be resolved.
pub fn inject_env_vars(value: &mut serde_json::Value) -> Vec<String> {
    inject_env_vars_with(value, &|name| env::var(name).ok())
}

/// Same as [`inject_env_vars`] with an explicit variable lookup.
pub fn inject_env_vars_with(
    value: &mut serde_json::Value,
    lookup: &dyn Fn(&str) -> Option<String>,
) -> Vec<String> {
    use serde_json::Value;

    fn walk(
        path: &mut Vec<String>,
        obj: &mut Value,
        lookup: &dyn Fn(&str) -> Option<String>,
        missing: &mut Vec<String>,
    ) {
        match obj {
            Value::Object(map) => {
                for (k, v) in map.iter_mut() {
                    path.push(k.to_string());
                    walk(path, v, lookup, missing);
                    path.pop();
                }
            }
            Value::String(s) if s == SECRET_FROM_ENV => {
                let path_str = path.join(".");
                match resolve_secret(&path_str, lookup) {
                    Some(env_val) => *s = env_val,
                    None => missing.push(path_str),
                }
            }
            _ => {}
        }
    }

    let mut missing = Vec::new();
    walk(&mut Vec::new(), value, lookup, &mut missing);
    missing
}
