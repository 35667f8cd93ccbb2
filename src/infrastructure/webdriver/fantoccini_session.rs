use std::fmt;
use std::process::Child;
use std::time::Duration;

use error_stack::{Report, ResultExt};
use fantoccini::elements::Element;
use fantoccini::error::CmdError;
use fantoccini::{Client, ClientBuilder, Locator};
use tokio::time::Instant;
use tracing::instrument;

use super::driver_process::{random_port, spawn_driver_process, DriverError};
use crate::infrastructure::config::webdriver_config::WebDriverConfig;
use crate::ports::browser::{BrowserError, BrowserResult, BrowserSession, WaitCondition};

const CONNECT_RETRY_INTERVAL: Duration = Duration::from_millis(250);
const URL_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// A WebDriver client together with the driver process it talks to.
pub struct FantocciniSession {
    driver_process: Option<Child>,
    client: Client,
    closed: bool,
}

impl fmt::Debug for FantocciniSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FantocciniSession")
            .field("closed", &self.closed)
            .finish()
    }
}

#[instrument]
async fn connect_client(port: u16, timeout: Duration) -> error_stack::Result<Client, DriverError> {
    let url = format!("http://localhost:{}", port);
    let deadline = Instant::now() + timeout;

    loop {
        match ClientBuilder::native().connect(url.as_str()).await {
            Ok(client) => return Ok(client),
            Err(error) if Instant::now() < deadline => {
                tracing::trace!("WebDriver not ready yet: {}", error);
                tokio::time::sleep(CONNECT_RETRY_INTERVAL).await;
            }
            Err(error) => {
                return Err(Report::new(error)
                    .change_context(DriverError::Connect)
                    .attach_printable(format!("Failed to connect to WebDriver at {}", url)))
            }
        }
    }
}

async fn configure_client(client: &Client, config: &WebDriverConfig) -> error_stack::Result<(), DriverError> {
    if let Some(user_agent) = config.user_agent.as_deref() {
        client
            .set_ua(user_agent)
            .await
            .change_context(DriverError::Configure)?;
    }

    if config.maximize_window {
        client
            .maximize_window()
            .await
            .change_context(DriverError::Configure)?;
    }

    Ok(())
}

impl FantocciniSession {
    #[instrument(skip_all, fields(binary = %config.binary))]
    pub async fn start(config: &WebDriverConfig) -> error_stack::Result<Self, DriverError> {
        let port = config.port.unwrap_or_else(random_port);
        let mut driver_process = spawn_driver_process(&config.binary, port)?;

        let client = match connect_client(port, config.startup_timeout()).await {
            Ok(client) => client,
            Err(report) => {
                kill_driver(&mut driver_process);
                return Err(report);
            }
        };

        let mut session = FantocciniSession {
            driver_process: Some(driver_process),
            client,
            closed: false,
        };

        if let Err(report) = configure_client(&session.client, config).await {
            session.close().await;
            return Err(report);
        }

        tracing::info!("WebDriver session started on port {}", port);
        Ok(session)
    }

    async fn poll_url_change(&self, previous: &str) -> BrowserResult<()> {
        loop {
            if self.current_url().await? != previous {
                return Ok(());
            }
            tokio::time::sleep(URL_POLL_INTERVAL).await;
        }
    }

    fn command_failed(error: CmdError, detail: String) -> Report<BrowserError> {
        Report::new(error)
            .change_context(BrowserError::Command)
            .attach_printable(detail)
    }
}

fn kill_driver(process: &mut Child) {
    process
        .kill()
        .unwrap_or_else(|error| tracing::error!("Failed to kill WebDriver process: {}", error));
    // Reap it so no zombie is left behind.
    process
        .wait()
        .map(|_| ())
        .unwrap_or_else(|error| tracing::warn!("Failed to reap WebDriver process: {}", error));
}

#[async_trait::async_trait]
impl BrowserSession for FantocciniSession {
    type Element = Element;

    #[instrument(skip(self))]
    async fn navigate(&self, url: &str) -> BrowserResult<()> {
        self.client
            .goto(url)
            .await
            .map_err(|error| Self::command_failed(error, format!("Failed to navigate to {}", url)))
    }

    async fn current_url(&self) -> BrowserResult<String> {
        self.client
            .current_url()
            .await
            .map(|url| url.to_string())
            .map_err(|error| Self::command_failed(error, "Failed to read current url".to_string()))
    }

    async fn find_element(&self, selector: &str) -> BrowserResult<Option<Element>> {
        match self.client.find(Locator::Css(selector)).await {
            Ok(element) => Ok(Some(element)),
            Err(CmdError::NoSuchElement(_)) => Ok(None),
            Err(error) => Err(Self::command_failed(error, format!("Selector: {}", selector))),
        }
    }

    async fn find_elements(&self, selector: &str) -> BrowserResult<Vec<Element>> {
        self.client
            .find_all(Locator::Css(selector))
            .await
            .map_err(|error| Self::command_failed(error, format!("Selector: {}", selector)))
    }

    async fn find_child(&self, parent: &Element, selector: &str) -> BrowserResult<Option<Element>> {
        match parent.find(Locator::Css(selector)).await {
            Ok(element) => Ok(Some(element)),
            Err(CmdError::NoSuchElement(_)) => Ok(None),
            Err(error) => Err(Self::command_failed(error, format!("Child selector: {}", selector))),
        }
    }

    async fn click(&self, element: &Element) -> BrowserResult<()> {
        element
            .click()
            .await
            .map_err(|error| Self::command_failed(error, "Failed to click element".to_string()))
    }

    async fn read_text(&self, element: &Element) -> BrowserResult<String> {
        element
            .text()
            .await
            .map_err(|error| Self::command_failed(error, "Failed to read element text".to_string()))
    }

    async fn fill_field(&self, element: &Element, text: &str) -> BrowserResult<()> {
        element
            .send_keys(text)
            .await
            .map_err(|error| Self::command_failed(error, "Failed to type into field".to_string()))
    }

    #[instrument(skip(self))]
    async fn wait_until(&self, condition: WaitCondition, timeout: Duration) -> BrowserResult<()> {
        match condition {
            WaitCondition::ElementPresent(selector) => {
                match self
                    .client
                    .wait()
                    .at_most(timeout)
                    .for_element(Locator::Css(&selector))
                    .await
                {
                    Ok(_) => Ok(()),
                    Err(CmdError::WaitTimeout) => Err(Report::new(BrowserError::Timeout)
                        .attach_printable(format!("Element {} not present after {:?}", selector, timeout))),
                    Err(error) => Err(Self::command_failed(error, format!("Selector: {}", selector))),
                }
            }
            WaitCondition::UrlChangedFrom(previous) => {
                match tokio::time::timeout(timeout, self.poll_url_change(&previous)).await {
                    Ok(result) => result,
                    Err(_) => Err(Report::new(BrowserError::Timeout)
                        .attach_printable(format!("Url still {} after {:?}", previous, timeout))),
                }
            }
        }
    }

    #[instrument(skip(self))]
    async fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        tracing::info!("Closing WebDriver session");
        self.client
            .clone()
            .close()
            .await
            .unwrap_or_else(|error| tracing::error!("Failed to close WebDriver client: {}", error));

        match self.driver_process.take() {
            Some(mut process) => kill_driver(&mut process),
            None => tracing::error!("No WebDriver process to close"),
        }
    }
}

impl Drop for FantocciniSession {
    fn drop(&mut self) {
        // Only reached without close() on panic; the browser dies with its driver.
        if let Some(mut process) = self.driver_process.take() {
            tracing::warn!("WebDriver session dropped without close, killing driver");
            kill_driver(&mut process);
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use std::process::Command;

    use super::*;

    #[test]
    fn test_kill_driver_reaps_the_process() {
        let mut process = Command::new("sleep").arg("30").spawn().unwrap();
        kill_driver(&mut process);
        assert!(process.try_wait().unwrap().is_some());
    }

    #[test]
    fn test_kill_driver_twice_is_harmless() {
        let mut process = Command::new("sleep").arg("30").spawn().unwrap();
        kill_driver(&mut process);
        kill_driver(&mut process);
        assert!(process.try_wait().unwrap().is_some());
    }
}
