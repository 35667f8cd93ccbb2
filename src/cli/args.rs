use std::collections::HashMap;
use std::path::{Path, PathBuf};

use clap::Parser;

use crate::domain::credentials::{AuthMode, Credentials};

pub const EMAIL_KEY: &str = "EMAIL";
pub const PASSWORD_KEY: &str = "PASSWORD";

/// Prints the total money spent on completed orders of an online shop account.
#[derive(Parser, Debug)]
#[command(name = "order-total", version)]
pub struct Cli {
    /// Email for login.
    #[arg(long)]
    pub email: Option<String>,

    /// Password for login.
    #[arg(long)]
    pub password: Option<String>,

    /// Manually complete the login process in the browser.
    #[arg(long)]
    pub manual_auth: bool,

    /// Configuration file, extension optional.
    #[arg(long, env = "CONFIG_PATH", default_value = "Config")]
    pub config: String,

    /// Fallback file for EMAIL and PASSWORD.
    #[arg(long, default_value = ".env")]
    pub env_file: PathBuf,

    /// Most verbose level written to the terminal and the log file.
    #[arg(long, default_value = "info")]
    pub log_level: tracing::Level,
}

impl Cli {
    /// Flags win over the env file; empty values count as missing.
    pub fn credentials(&self, env_values: &HashMap<String, String>) -> Option<Credentials> {
        let pick = |flag: &Option<String>, key: &str| {
            flag.clone()
                .filter(|value| !value.is_empty())
                .or_else(|| env_values.get(key).cloned())
                .filter(|value| !value.is_empty())
        };

        let email = pick(&self.email, EMAIL_KEY)?;
        let password = pick(&self.password, PASSWORD_KEY)?;

        Some(Credentials::new(
            email,
            password,
            AuthMode::from_manual_flag(self.manual_auth),
        ))
    }
}

/// Reads `KEY=value` pairs without touching the process environment. A missing
/// file yields an empty map.
pub fn read_env_file(path: &Path) -> HashMap<String, String> {
    let iter = match dotenvy::from_path_iter(path) {
        Ok(iter) => iter,
        Err(error) => {
            tracing::debug!("No env file at {}: {}", path.display(), error);
            return HashMap::new();
        }
    };

    iter.filter_map(|item| {
        item.map_err(|error| tracing::warn!("Skipping malformed line in {}: {}", path.display(), error))
            .ok()
    })
    .collect()
}
