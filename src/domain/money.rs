use std::fmt;

use rust_decimal::Decimal;

/// An exact amount in a single currency, identified by its symbol (e.g. `₴`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Money {
    amount: Decimal,
    symbol: Box<str>,
}

impl Money {
    pub fn new(amount: Decimal, symbol: &str) -> Self {
        Self {
            amount,
            symbol: symbol.into(),
        }
    }

    pub fn zero(symbol: &str) -> Self {
        Self::new(Decimal::ZERO, symbol)
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Adds a bare amount in the same currency. `None` when the sum leaves the
    /// range of `Decimal`.
    pub fn checked_add(&self, rhs: Decimal) -> Option<Money> {
        Some(Money {
            amount: self.amount.checked_add(rhs)?,
            symbol: self.symbol.clone(),
        })
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount.normalize(), self.symbol)
    }
}
