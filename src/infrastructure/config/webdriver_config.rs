use std::time::Duration;

#[derive(serde::Deserialize, Debug, Clone)]
#[serde(default)]
pub struct WebDriverConfig {
    /// WebDriver server executable, looked up on `PATH`.
    pub binary: String,
    /// Random when unset.
    pub port: Option<u16>,
    pub startup_timeout_secs: u64,
    pub maximize_window: bool,
    pub user_agent: Option<Box<str>>,
}

impl WebDriverConfig {
    pub fn startup_timeout(&self) -> Duration {
        Duration::from_secs(self.startup_timeout_secs)
    }
}

impl Default for WebDriverConfig {
    fn default() -> Self {
        Self {
            binary: "geckodriver".to_string(),
            port: None,
            startup_timeout_secs: 10,
            maximize_window: true,
            user_agent: None,
        }
    }
}
