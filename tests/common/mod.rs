//! In-memory stand-in for a browser showing a paginated order history.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use error_stack::Report;
use order_total::domain::order::OrderRecord;
use order_total::infrastructure::config::site_config::SiteConfig;
use order_total::infrastructure::confirmation::OneshotConfirmation;
use order_total::ports::browser::{BrowserError, BrowserResult, BrowserSession, WaitCondition};

pub const COMPLETED: &str = "Виконано";
pub const PROCESSING: &str = "В обробці";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FakeElement {
    Page(String),
    Order(usize),
    Status(usize),
    Price(usize),
}

/// What the fake site looks like.
#[derive(Debug, Clone)]
pub struct FakeShop {
    pub pages: Vec<Vec<OrderRecord>>,
    pub body_present: bool,
    pub show_more_changes_url: bool,
    pub login_form_present: bool,
    pub logged_in_marker_present: bool,
    pub price_field_present: bool,
}

impl FakeShop {
    pub fn with_pages(pages: Vec<Vec<OrderRecord>>) -> Self {
        Self {
            pages,
            body_present: true,
            show_more_changes_url: true,
            login_form_present: true,
            logged_in_marker_present: true,
            price_field_present: true,
        }
    }

    pub fn single_page(orders: Vec<OrderRecord>) -> Self {
        Self::with_pages(vec![orders])
    }
}

/// Everything the aggregator did to the fake browser.
#[derive(Debug, Default)]
pub struct Recorded {
    pub current_url: String,
    pub loaded_pages: usize,
    pub visited: Vec<String>,
    pub clicked: Vec<String>,
    pub filled: Vec<(String, String)>,
    pub show_more_clicks: usize,
    pub close_calls: usize,
}

#[derive(Clone)]
pub struct FakeBrowser {
    shop: FakeShop,
    site: SiteConfig,
    recorded: Arc<Mutex<Recorded>>,
}

impl FakeBrowser {
    pub fn new(shop: FakeShop, site: SiteConfig) -> Self {
        Self {
            shop,
            site,
            recorded: Arc::new(Mutex::new(Recorded::default())),
        }
    }

    /// Shared view of the recording, still readable after the aggregator
    /// consumed the browser.
    pub fn recorded(&self) -> Arc<Mutex<Recorded>> {
        Arc::clone(&self.recorded)
    }

    fn state(&self) -> MutexGuard<'_, Recorded> {
        self.recorded.lock().unwrap()
    }

    fn on_orders_page(&self, state: &Recorded) -> bool {
        state.current_url.starts_with(&self.site.orders_url)
    }

    fn visible_orders(&self, state: &Recorded) -> Vec<&OrderRecord> {
        self.shop
            .pages
            .iter()
            .take(state.loaded_pages)
            .flatten()
            .collect()
    }

    fn is_present(&self, state: &Recorded, selector: &str) -> bool {
        let selectors = &self.site.selectors;

        if state.current_url.is_empty() {
            return false;
        }
        if selector == selectors.page_ready {
            return self.shop.body_present;
        }
        if selector == selectors.show_more {
            return self.on_orders_page(state) && state.loaded_pages < self.shop.pages.len();
        }
        if selector == selectors.login_trigger
            || selector == selectors.email_input
            || selector == selectors.password_input
            || selector == selectors.login_submit
        {
            return self.shop.login_form_present;
        }
        if selectors.logged_in_marker.as_deref() == Some(selector) {
            return self.shop.logged_in_marker_present;
        }
        false
    }
}

#[async_trait::async_trait]
impl BrowserSession for FakeBrowser {
    type Element = FakeElement;

    async fn navigate(&self, url: &str) -> BrowserResult<()> {
        let mut state = self.state();
        state.current_url = url.to_string();
        state.visited.push(url.to_string());
        state.loaded_pages = if url == self.site.orders_url {
            self.shop.pages.len().min(1)
        } else {
            0
        };
        Ok(())
    }

    async fn current_url(&self) -> BrowserResult<String> {
        Ok(self.state().current_url.clone())
    }

    async fn find_element(&self, selector: &str) -> BrowserResult<Option<FakeElement>> {
        let state = self.state();
        Ok(self
            .is_present(&state, selector)
            .then(|| FakeElement::Page(selector.to_string())))
    }

    async fn find_elements(&self, selector: &str) -> BrowserResult<Vec<FakeElement>> {
        let state = self.state();
        if selector != self.site.selectors.order_entry || !self.on_orders_page(&state) {
            return Ok(Vec::new());
        }
        Ok((0..self.visible_orders(&state).len())
            .map(FakeElement::Order)
            .collect())
    }

    async fn find_child(
        &self,
        parent: &FakeElement,
        selector: &str,
    ) -> BrowserResult<Option<FakeElement>> {
        let FakeElement::Order(index) = parent else {
            return Ok(None);
        };
        let selectors = &self.site.selectors;

        if selector == selectors.order_status {
            Ok(Some(FakeElement::Status(*index)))
        } else if selector == selectors.order_price && self.shop.price_field_present {
            Ok(Some(FakeElement::Price(*index)))
        } else {
            Ok(None)
        }
    }

    async fn click(&self, element: &FakeElement) -> BrowserResult<()> {
        let mut state = self.state();
        let FakeElement::Page(selector) = element else {
            return Err(Report::new(BrowserError::Command).attach_printable("not clickable"));
        };

        state.clicked.push(selector.clone());
        if *selector == self.site.selectors.show_more {
            state.show_more_clicks += 1;
            state.loaded_pages += 1;
            if self.shop.show_more_changes_url {
                state.current_url = format!("{}?page={}", self.site.orders_url, state.loaded_pages);
            }
        }
        Ok(())
    }

    async fn read_text(&self, element: &FakeElement) -> BrowserResult<String> {
        let state = self.state();
        let orders = self.visible_orders(&state);
        match element {
            FakeElement::Status(index) => Ok(orders[*index].status.clone()),
            FakeElement::Price(index) => Ok(orders[*index].price_text.clone()),
            other => Err(Report::new(BrowserError::Command)
                .attach_printable(format!("no text on {:?}", other))),
        }
    }

    async fn fill_field(&self, element: &FakeElement, text: &str) -> BrowserResult<()> {
        let FakeElement::Page(selector) = element else {
            return Err(Report::new(BrowserError::Command).attach_printable("not a field"));
        };
        self.state().filled.push((selector.clone(), text.to_string()));
        Ok(())
    }

    async fn wait_until(&self, condition: WaitCondition, _timeout: Duration) -> BrowserResult<()> {
        let state = self.state();
        let satisfied = match &condition {
            WaitCondition::ElementPresent(selector) => self.is_present(&state, selector),
            WaitCondition::UrlChangedFrom(previous) => state.current_url != *previous,
        };

        if satisfied {
            Ok(())
        } else {
            Err(Report::new(BrowserError::Timeout).attach_printable(format!("{:?}", condition)))
        }
    }

    async fn close(&mut self) {
        self.state().close_calls += 1;
    }
}

pub fn order(status: &str, price: &str) -> OrderRecord {
    OrderRecord::new(status, price)
}

/// A confirmation that has already been given.
pub fn confirmed() -> OneshotConfirmation {
    let (sender, confirmation) = OneshotConfirmation::channel();
    sender.send(()).unwrap();
    confirmation
}
