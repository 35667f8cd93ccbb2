use serde::Deserialize;
use strum::Display;

/// An order as read from the history page, before its price is parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRecord {
    pub status: String,
    pub price_text: String,
}

impl OrderRecord {
    pub fn new(status: impl Into<String>, price_text: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            price_text: price_text.into(),
        }
    }
}

/// How an order status is compared against the completed-order marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StatusMatch {
    /// Status text (trimmed) must equal the marker.
    #[default]
    Exact,
    /// Marker may appear anywhere in the status text.
    Contains,
}

#[derive(Debug, Clone)]
pub struct CompletedStatusFilter {
    marker: String,
    mode: StatusMatch,
}

impl CompletedStatusFilter {
    pub fn new(marker: impl Into<String>, mode: StatusMatch) -> Self {
        Self {
            marker: marker.into(),
            mode,
        }
    }

    pub fn is_completed(&self, status: &str) -> bool {
        match self.mode {
            StatusMatch::Exact => status.trim() == self.marker,
            StatusMatch::Contains => status.contains(self.marker.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMPLETED: &str = "Виконано";

    #[test]
    fn test_exact_accepts_marker() {
        let filter = CompletedStatusFilter::new(COMPLETED, StatusMatch::Exact);
        assert!(filter.is_completed("Виконано"));
        assert!(filter.is_completed("  Виконано\n"));
    }

    #[test]
    fn test_exact_rejects_partial_status() {
        let filter = CompletedStatusFilter::new(COMPLETED, StatusMatch::Exact);
        assert!(!filter.is_completed("Виконано частково"));
        assert!(!filter.is_completed("В обробці"));
        assert!(!filter.is_completed(""));
    }

    #[test]
    fn test_contains_accepts_partial_status() {
        let filter = CompletedStatusFilter::new(COMPLETED, StatusMatch::Contains);
        assert!(filter.is_completed("Виконано"));
        assert!(filter.is_completed("Виконано частково"));
        assert!(!filter.is_completed("В обробці"));
    }

    #[test]
    fn test_status_match_deserialize() {
        let mode: StatusMatch = serde_json::from_str("\"contains\"").unwrap();
        assert_eq!(mode, StatusMatch::Contains);
        assert_eq!(StatusMatch::default(), StatusMatch::Exact);
    }
}
