//! Ordering and pagination of filtered ships.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Ship;

/// Page size used when none (or a non-positive one) is requested.
pub const DEFAULT_PAGE_SIZE: i64 = 3;

/// Sort key for ship listings.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum ShipOrder {
    /// Order by identifier.
    #[default]
    Id,
    /// Order by speed.
    Speed,
    /// Order by production date.
    Date,
    /// Order by rating.
    Rating,
}

impl ShipOrder {
    /// Name of the ship field this order sorts on.
    pub fn field_name(&self) -> &'static str {
        match self {
            ShipOrder::Id => "id",
            ShipOrder::Speed => "speed",
            ShipOrder::Date => "prodDate",
            ShipOrder::Rating => "rating",
        }
    }

    /// Compare two ships by this key, ascending.
    pub fn compare(&self, left: &Ship, right: &Ship) -> Ordering {
        match self {
            ShipOrder::Id => left.id.cmp(&right.id),
            ShipOrder::Speed => left.speed.total_cmp(&right.speed),
            ShipOrder::Date => left.prod_date.cmp(&right.prod_date),
            ShipOrder::Rating => left.rating.total_cmp(&right.rating),
        }
    }
}

/// Requested ordering and page window.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Sort key.
    pub order: ShipOrder,
    /// Zero-based page number.
    pub page_number: i64,
    /// Ships per page.
    pub page_size: i64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            order: ShipOrder::Id,
            page_number: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Build a page request, filling in defaults for missing values.
    pub fn new(order: Option<ShipOrder>, page_number: Option<i64>, page_size: Option<i64>) -> Self {
        Self {
            order: order.unwrap_or_default(),
            page_number: page_number.unwrap_or(0),
            page_size: page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        }
    }

    /// Index of the first ship on the page.
    pub fn offset(&self) -> usize {
        to_usize(self.page_number.max(0)).saturating_mul(self.limit())
    }

    /// Number of ships on a full page.
    pub fn limit(&self) -> usize {
        if self.page_size > 0 {
            to_usize(self.page_size)
        } else {
            to_usize(DEFAULT_PAGE_SIZE)
        }
    }
}

/// Sort `ships` ascending by the requested key and cut out the page.
///
/// The sort is stable: ships with equal keys keep their incoming order.
pub fn paginate(mut ships: Vec<Ship>, page: &PageRequest) -> Vec<Ship> {
    ships.sort_by(|left, right| page.order.compare(left, right));
    ships
        .into_iter()
        .skip(page.offset())
        .take(page.limit())
        .collect()
}

fn to_usize(value: i64) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}
