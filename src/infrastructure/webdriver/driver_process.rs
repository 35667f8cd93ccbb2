use std::process::{Child, Command, Stdio};

use error_stack::ResultExt;
use thiserror::Error;
use tracing::instrument;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("Failed to spawn WebDriver process")]
    SpawnDriver,
    #[error("Failed to connect to WebDriver")]
    Connect,
    #[error("Failed to configure the browser window")]
    Configure,
}

pub fn random_port() -> u16 {
    rand::random::<u16>() % (65535 - 1024) + 1024
}

#[instrument]
pub fn spawn_driver_process(binary: &str, port: u16) -> error_stack::Result<Child, DriverError> {
    Command::new(binary)
        .arg("--port")
        .arg(port.to_string())
        .arg("--log")
        .arg("fatal")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .change_context(DriverError::SpawnDriver)
        .attach_printable_lazy(|| format!("Binary: {}, port: {}", binary, port))
}
