use serde::{Deserialize, Serialize};

pub const APP_NAME: &str = "portfolio_grid";
pub const CONFIG_NAME: &str = "config";

/// Settings persisted with confy between runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Records shown when no file is passed on the command line.
    pub data_file: String,
    /// Column configuration; the built-in holdings columns when empty.
    pub columns_file: String,
    /// Currency for cash cells; plain two-decimal numbers when empty.
    pub currency: String,
    /// Paths toggled in order when no `--sort` is given.
    pub sort: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: String::new(),
            columns_file: String::new(),
            currency: "EUR".to_string(),
            sort: Vec::new(),
        }
    }
}

impl Config {
    pub fn currency(&self) -> Option<&str> {
        let currency = self.currency.trim();
        if currency.is_empty() {
            None
        } else {
            Some(currency)
        }
    }
}
