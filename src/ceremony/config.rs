use std::{env, sync::LazyLock};

/// Relative path of the capability read, joined onto the relying-party base URL.
pub(super) static PASSKEY_CAPABILITY_PATH: LazyLock<String> =
    LazyLock::new(|| path_from_env("PASSKEY_CAPABILITY_PATH", "passkey/capability"));

pub(super) static PASSKEY_REGISTER_BEGIN_PATH: LazyLock<String> =
    LazyLock::new(|| path_from_env("PASSKEY_REGISTER_BEGIN_PATH", "passkey/register/begin"));

pub(super) static PASSKEY_REGISTER_FINISH_PATH: LazyLock<String> =
    LazyLock::new(|| path_from_env("PASSKEY_REGISTER_FINISH_PATH", "passkey/register/finish"));

pub(super) static PASSKEY_ASSERTION_BEGIN_PATH: LazyLock<String> =
    LazyLock::new(|| path_from_env("PASSKEY_ASSERTION_BEGIN_PATH", "passkey/assertion/begin"));

pub(super) static PASSKEY_ASSERTION_FINISH_PATH: LazyLock<String> =
    LazyLock::new(|| path_from_env("PASSKEY_ASSERTION_FINISH_PATH", "passkey/assertion/finish"));

/// Per-request timeout in seconds applied by the default HTTP transport.
pub(super) static PASSKEY_REQUEST_TIMEOUT: LazyLock<u64> =
    LazyLock::new(|| timeout_from_env("PASSKEY_REQUEST_TIMEOUT", 30));

fn path_from_env(var: &str, default: &str) -> String {
    match env::var(var) {
        // A leading slash would make Url::join discard the base path
        Ok(value) => value.trim_start_matches('/').to_string(),
        Err(_) => default.to_string(),
    }
}

fn timeout_from_env(var: &str, default: u64) -> u64 {
    match env::var(var) {
        Ok(value) => match value.parse::<u64>() {
            Ok(secs) if secs > 0 => secs,
            _ => {
                tracing::warn!(
                    "Invalid {}: {}. Using default {}s",
                    var,
                    value,
                    default
                );
                default
            }
        },
        Err(_) => default,
    }
}
