use error_stack::Report;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::money::Money;

#[derive(Error, Debug)]
#[error("Total exceeds the largest representable amount")]
pub struct TotalOverflow;

/// Running total of one run. Only grows, since parsed prices are never negative.
#[derive(Debug, Clone)]
pub struct RunState {
    total: Money,
    folded: usize,
}

impl RunState {
    pub fn new(currency_symbol: &str) -> Self {
        Self {
            total: Money::zero(currency_symbol),
            folded: 0,
        }
    }

    /// Adds one price. On overflow the state is left as it was.
    pub fn fold(&mut self, price: Decimal) -> error_stack::Result<(), TotalOverflow> {
        debug_assert!(price >= Decimal::ZERO);
        self.total = self.total.checked_add(price).ok_or_else(|| {
            Report::new(TotalOverflow).attach_printable(format!(
                "Adding {} to {} after {} prices",
                price, self.total, self.folded
            ))
        })?;
        self.folded += 1;
        Ok(())
    }

    pub fn folded(&self) -> usize {
        self.folded
    }

    pub fn into_total(self) -> Money {
        self.total
    }
}
