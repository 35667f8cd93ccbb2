use error_stack::{Report, ResultExt};
use tracing::{debug, info, instrument, trace};

use super::run_state::RunState;
use crate::domain::credentials::{AuthMode, Credentials};
use crate::domain::errors::{AggregatorError, AggregatorResult};
use crate::domain::money::Money;
use crate::domain::order::OrderRecord;
use crate::domain::price::parse_price;
use crate::infrastructure::config::site_config::SiteConfig;
use crate::ports::browser::{BrowserSession, WaitCondition};
use crate::ports::login_confirmation::LoginConfirmation;

/// Logs into the shop, expands the whole order history and sums the prices of
/// completed orders.
///
/// The aggregator owns the browser session for the whole run and closes it
/// before `compute_total_spent` returns, whatever the outcome.
pub struct OrderAggregator<B: BrowserSession> {
    session: B,
    site: SiteConfig,
}

impl<B: BrowserSession> OrderAggregator<B> {
    pub fn new(session: B, site: SiteConfig) -> Self {
        Self { session, site }
    }

    #[instrument(skip_all, fields(auth_mode = %credentials.auth_mode))]
    pub async fn compute_total_spent(
        mut self,
        credentials: &Credentials,
        confirmation: &dyn LoginConfirmation,
    ) -> AggregatorResult<Money> {
        let result = self.run(credentials, confirmation).await;
        self.session.close().await;
        result
    }

    async fn run(
        &self,
        credentials: &Credentials,
        confirmation: &dyn LoginConfirmation,
    ) -> AggregatorResult<Money> {
        self.establish_session(credentials, confirmation).await?;
        let show_more_clicks = self.load_all_orders().await?;
        let records = self.extract_completed_orders().await?;
        let total = sum_prices(&records, &self.site.currency_symbol)?;

        info!(
            show_more_clicks,
            completed_orders = records.len(),
            "Total spent: {}",
            total
        );
        Ok(total)
    }

    #[instrument(skip_all)]
    async fn establish_session(
        &self,
        credentials: &Credentials,
        confirmation: &dyn LoginConfirmation,
    ) -> AggregatorResult<()> {
        self.open_page(&self.site.landing_url).await?;

        match credentials.auth_mode {
            AuthMode::Automatic => self.submit_login_form(credentials).await?,
            AuthMode::Manual => info!("Waiting for the login to be completed in the browser"),
        }

        confirmation
            .wait_for_login()
            .await
            .change_context(AggregatorError::Authentication)?;

        if let Some(marker) = self.site.selectors.logged_in_marker.as_deref() {
            let found = self
                .session
                .find_element(marker)
                .await
                .change_context(AggregatorError::Navigation)?;

            if found.is_none() {
                return Err(Report::new(AggregatorError::Authentication)
                    .attach_printable(format!("Logged-in marker {} not found", marker)));
            }
            debug!("Login verified");
        }

        Ok(())
    }

    async fn submit_login_form(&self, credentials: &Credentials) -> AggregatorResult<()> {
        let selectors = &self.site.selectors;

        let login_trigger = self.required_element(&selectors.login_trigger).await?;
        self.session
            .click(&login_trigger)
            .await
            .change_context(AggregatorError::Navigation)?;

        let email_input = self.required_element(&selectors.email_input).await?;
        self.session
            .fill_field(&email_input, &credentials.email)
            .await
            .change_context(AggregatorError::Navigation)?;

        let password_input = self.required_element(&selectors.password_input).await?;
        self.session
            .fill_field(&password_input, &credentials.password)
            .await
            .change_context(AggregatorError::Navigation)?;

        let submit = self.required_element(&selectors.login_submit).await?;
        self.session
            .click(&submit)
            .await
            .change_context(AggregatorError::Navigation)?;

        debug!("Login form submitted");
        Ok(())
    }

    /// Clicks "show more" until it disappears. Returns the number of clicks.
    #[instrument(skip_all)]
    async fn load_all_orders(&self) -> AggregatorResult<usize> {
        self.open_page(&self.site.orders_url).await?;

        let mut clicks = 0;
        while let Some(show_more) = self
            .session
            .find_element(&self.site.selectors.show_more)
            .await
            .change_context(AggregatorError::Navigation)?
        {
            let url_before = self
                .session
                .current_url()
                .await
                .change_context(AggregatorError::Navigation)?;

            self.session
                .click(&show_more)
                .await
                .change_context(AggregatorError::Navigation)?;

            self.session
                .wait_until(
                    WaitCondition::UrlChangedFrom(url_before),
                    self.site.page_load_timeout(),
                )
                .await
                .change_context(AggregatorError::Navigation)
                .attach_printable("Order list did not advance after clicking show more")?;

            clicks += 1;
            debug!(clicks, "Loaded more orders");
        }

        Ok(clicks)
    }

    #[instrument(skip_all)]
    async fn extract_completed_orders(&self) -> AggregatorResult<Vec<OrderRecord>> {
        let selectors = &self.site.selectors;
        let filter = self.site.completed_filter();
        debug!(
            marker = %self.site.completed_status,
            mode = %self.site.status_match,
            "Filtering completed orders"
        );

        let entries = self
            .session
            .find_elements(&selectors.order_entry)
            .await
            .change_context(AggregatorError::Navigation)?;

        let mut records = Vec::new();
        for (index, entry) in entries.iter().enumerate() {
            let status_element = self.required_child(entry, &selectors.order_status).await?;
            let status = self
                .session
                .read_text(&status_element)
                .await
                .change_context(AggregatorError::Navigation)?;

            if !filter.is_completed(&status) {
                trace!(index, status = %status, "Skipping order");
                continue;
            }

            let price_element = self.required_child(entry, &selectors.order_price).await?;
            let price_text = self
                .session
                .read_text(&price_element)
                .await
                .change_context(AggregatorError::Navigation)?;

            trace!(index, price = %price_text, "Completed order");
            records.push(OrderRecord::new(status, price_text));
        }

        info!("{} of {} orders are completed", records.len(), entries.len());
        Ok(records)
    }

    async fn open_page(&self, url: &str) -> AggregatorResult<()> {
        self.session
            .navigate(url)
            .await
            .change_context(AggregatorError::Navigation)?;

        self.session
            .wait_until(
                WaitCondition::ElementPresent(self.site.selectors.page_ready.clone()),
                self.site.page_load_timeout(),
            )
            .await
            .change_context(AggregatorError::Navigation)
            .attach_printable_lazy(|| format!("Page {} did not load", url))
    }

    async fn required_element(&self, selector: &str) -> AggregatorResult<B::Element> {
        self.session
            .find_element(selector)
            .await
            .change_context(AggregatorError::Navigation)?
            .ok_or_else(|| {
                Report::new(AggregatorError::Navigation)
                    .attach_printable(format!("Element not found: {}", selector))
            })
    }

    async fn required_child(&self, parent: &B::Element, selector: &str) -> AggregatorResult<B::Element> {
        self.session
            .find_child(parent, selector)
            .await
            .change_context(AggregatorError::Navigation)?
            .ok_or_else(|| {
                Report::new(AggregatorError::Navigation)
                    .attach_printable(format!("Order field not found: {}", selector))
            })
    }
}

/// Parses every price before adding anything, so a bad price yields no total.
pub fn sum_prices(records: &[OrderRecord], currency_symbol: &str) -> AggregatorResult<Money> {
    let prices = records
        .iter()
        .map(|record| {
            parse_price(&record.price_text, currency_symbol)
                .change_context(AggregatorError::Parse)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut state = RunState::new(currency_symbol);
    for price in prices {
        state.fold(price).change_context(AggregatorError::Parse)?;
    }

    debug!(folded = state.folded(), "Prices summed");
    Ok(state.into_total())
}
