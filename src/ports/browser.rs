use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowserError {
    #[error("Timed out waiting for a page condition")]
    Timeout,
    #[error("WebDriver command failed")]
    Command,
}

pub type BrowserResult<T> = error_stack::Result<T, BrowserError>;

/// A page state that `BrowserSession::wait_until` can block on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaitCondition {
    /// An element matching the CSS selector exists in the document.
    ElementPresent(String),
    /// The current URL differs from the given one.
    UrlChangedFrom(String),
}

/// The browser automation surface the aggregator drives. All selectors are CSS.
///
/// A session is exclusively owned by one run; `close` releases it and must be
/// safe to call more than once.
#[async_trait::async_trait]
pub trait BrowserSession: Send + Sync {
    type Element: Clone + Send + Sync;

    async fn navigate(&self, url: &str) -> BrowserResult<()>;

    async fn current_url(&self) -> BrowserResult<String>;

    /// Returns `None` when nothing matches; other failures are errors.
    async fn find_element(&self, selector: &str) -> BrowserResult<Option<Self::Element>>;

    async fn find_elements(&self, selector: &str) -> BrowserResult<Vec<Self::Element>>;

    /// Looks up a descendant of `parent`, `None` when nothing matches.
    async fn find_child(
        &self,
        parent: &Self::Element,
        selector: &str,
    ) -> BrowserResult<Option<Self::Element>>;

    async fn click(&self, element: &Self::Element) -> BrowserResult<()>;

    async fn read_text(&self, element: &Self::Element) -> BrowserResult<String>;

    async fn fill_field(&self, element: &Self::Element, text: &str) -> BrowserResult<()>;

    /// Fails with `BrowserError::Timeout` if `condition` does not hold within `timeout`.
    async fn wait_until(&self, condition: WaitCondition, timeout: Duration) -> BrowserResult<()>;

    async fn close(&mut self);
}
