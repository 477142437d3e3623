//! Promotional offers
//!
//! Three rule families, each a pure function of (product, simulated instant):
//! seasonal picks, weekend produce deals, and surplus-stock markdowns. A
//! product can qualify for several at once but is only ever listed under the
//! highest-priority one: seasonal > weekend > stock.

use chrono::{DateTime, Datelike, Utc, Weekday};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

use crate::domain::aggregates::product::{Category, Product};
use crate::domain::value_objects::Money;

/// Stock above this level (kg) qualifies for the surplus markdown.
pub const SURPLUS_STOCK_KG: u32 = 150;

const WEEKEND_CATEGORIES: [Category; 2] = [Category::Vegetables, Category::Dairy];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Season {
    Summer,
    Monsoon,
    Winter,
}

impl Season {
    /// June–September is Monsoon, October–December is Winter, everything
    /// else (January–May) counts as Summer.
    pub fn at(now: DateTime<Utc>) -> Self {
        match now.month() {
            6..=9 => Self::Monsoon,
            10..=12 => Self::Winter,
            _ => Self::Summer,
        }
    }

    /// The fixed product picks promoted during this season.
    pub fn product_ids(self) -> &'static [&'static str] {
        match self {
            Self::Summer => &["prod5", "prod23", "prod28"],
            Self::Monsoon => &["prod13", "prod14", "prod15"],
            Self::Winter => &["prod3", "prod4"],
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Summer => "Summer",
            Self::Monsoon => "Monsoon",
            Self::Winter => "Winter",
        };
        write!(f, "{name}")
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OfferKind {
    Seasonal,
    Weekend,
    Stock,
}

impl OfferKind {
    /// De-duplication order: a product qualifying for more than one offer
    /// is listed under the first kind here that matches.
    pub const IN_PRIORITY_ORDER: [OfferKind; 3] = [Self::Seasonal, Self::Weekend, Self::Stock];

    pub fn percent(self) -> u32 {
        match self {
            Self::Seasonal => 20,
            Self::Weekend => 15,
            Self::Stock => 10,
        }
    }
}

fn is_weekend(now: DateTime<Utc>) -> bool {
    matches!(now.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Does `product` qualify for `kind` at the simulated instant `now`?
pub fn qualifies(product: &Product, kind: OfferKind, now: DateTime<Utc>) -> bool {
    match kind {
        OfferKind::Seasonal => Season::at(now).product_ids().contains(&product.id()),
        OfferKind::Weekend => {
            is_weekend(now) && WEEKEND_CATEGORIES.contains(&product.category())
        }
        OfferKind::Stock => product.stock_kg().amount() > rust_decimal::Decimal::from(SURPLUS_STOCK_KG),
    }
}

/// The highest-priority offer currently applying to `product`, if any.
pub fn best_discount(product: &Product, now: DateTime<Utc>) -> Option<OfferKind> {
    OfferKind::IN_PRIORITY_ORDER
        .into_iter()
        .find(|kind| qualifies(product, *kind, now))
}

/// The per-kg price under `kind`.
pub fn offer_price(product: &Product, kind: OfferKind) -> Money {
    product.price_per_kg().percent_off(kind.percent())
}

/// The per-kg price a vendor pays right now: the best discount if one
/// applies, the catalog price otherwise.
pub fn current_price(product: &Product, now: DateTime<Utc>) -> Money {
    match best_discount(product, now) {
        Some(kind) => offer_price(product, kind),
        None => product.price_per_kg().clone(),
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct OfferListing {
    pub kind: OfferKind,
    pub percent: u32,
    pub offer_price: Money,
    pub product: Product,
}

/// Every live offer, de-duplicated by product id in priority order. The
/// result keeps priority grouping: all seasonal listings first, then
/// weekend, then stock.
pub fn active_offers(products: &[Product], now: DateTime<Utc>) -> Vec<OfferListing> {
    let mut offered: HashSet<&str> = HashSet::new();
    let mut listings = Vec::new();
    for kind in OfferKind::IN_PRIORITY_ORDER {
        for product in products {
            if offered.contains(product.id()) || !qualifies(product, kind, now) {
                continue;
            }
            offered.insert(product.id());
            listings.push(OfferListing {
                kind,
                percent: kind.percent(),
                offer_price: offer_price(product, kind),
                product: product.clone(),
            });
        }
    }
    listings
}
