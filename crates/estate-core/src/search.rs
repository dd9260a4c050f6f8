//! Property search criteria
//!
//! A [`PropertyFilter`] is a conjunction of optional criteria:
//!
//! - `name`: tokenized match against the `property_text` index, which
//!   covers both name and address
//! - `address`: case-insensitive substring match on the address field
//! - `min_price` / `max_price`: inclusive bounds on price
//!
//! `name` and `address` use different matching rules and are ANDed when both
//! are given. Blank strings count as absent. No criteria matches everything.

use serde::{Deserialize, Serialize};

use crate::store::Filter;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyFilter {
    pub name: Option<String>,
    pub address: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

impl PropertyFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn min_price(mut self, min_price: f64) -> Self {
        self.min_price = Some(min_price);
        self
    }

    pub fn max_price(mut self, max_price: f64) -> Self {
        self.max_price = Some(max_price);
        self
    }

    /// Whether no criterion is set
    pub fn is_empty(&self) -> bool {
        self.to_filter() == Filter::All
    }

    /// Translate the criteria into a store filter
    pub fn to_filter(&self) -> Filter {
        let mut terms = Vec::new();

        if let Some(name) = non_blank(&self.name) {
            terms.push(Filter::text(name));
        }
        if let Some(address) = non_blank(&self.address) {
            terms.push(Filter::regex("address", regex::escape(address), true));
        }
        if self.min_price.is_some() || self.max_price.is_some() {
            terms.push(Filter::range("price", self.min_price, self.max_price));
        }

        Filter::and(terms)
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
