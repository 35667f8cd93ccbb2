use std::time::Duration;

use crate::domain::order::{CompletedStatusFilter, StatusMatch};

#[derive(serde::Deserialize, Debug, Clone)]
#[serde(default)]
pub struct SiteConfig {
    pub landing_url: String,
    pub orders_url: String,
    pub currency_symbol: String,
    pub completed_status: String,
    pub status_match: StatusMatch,
    pub page_load_timeout_secs: u64,
    pub selectors: SiteSelectors,
}

impl SiteConfig {
    pub fn page_load_timeout(&self) -> Duration {
        Duration::from_secs(self.page_load_timeout_secs)
    }

    pub fn completed_filter(&self) -> CompletedStatusFilter {
        CompletedStatusFilter::new(self.completed_status.clone(), self.status_match)
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            landing_url: "https://rozetka.com.ua/ua/".to_string(),
            orders_url: "https://rozetka.com.ua/ua/cabinet/orders/".to_string(),
            currency_symbol: "₴".to_string(),
            completed_status: "Виконано".to_string(),
            status_match: StatusMatch::Exact,
            page_load_timeout_secs: 10,
            selectors: SiteSelectors::default(),
        }
    }
}

/// CSS selectors for every element the run touches.
#[derive(serde::Deserialize, Debug, Clone)]
#[serde(default)]
pub struct SiteSelectors {
    pub page_ready: String,
    pub login_trigger: String,
    pub email_input: String,
    pub password_input: String,
    pub login_submit: String,
    /// Present only once logged in. When set, login is verified after confirmation.
    pub logged_in_marker: Option<String>,
    pub show_more: String,
    pub order_entry: String,
    pub order_status: String,
    pub order_price: String,
}

impl Default for SiteSelectors {
    fn default() -> Self {
        Self {
            page_ready: "body".to_string(),
            login_trigger: "button.header__button.ng-star-inserted".to_string(),
            email_input: "#auth_email".to_string(),
            password_input: "#auth_pass".to_string(),
            login_submit: "button.auth-modal__submit".to_string(),
            logged_in_marker: None,
            show_more: "span.show-more__text".to_string(),
            order_entry: "li.order".to_string(),
            order_status: "div.order-heading__status > p.order-heading__value".to_string(),
            order_price: "div.order-heading__price > p.order-heading__value".to_string(),
        }
    }
}
