//! Domain entities for Shipyard.

use chrono::{DateTime, Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Store-assigned ship identifier. Always positive once assigned.
pub type ShipId = i64;

/// Ship class.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum ShipType {
    /// Cargo and passenger haulers.
    Transport,
    /// Armed vessels.
    Military,
    /// Trading vessels.
    Merchant,
}

impl ShipType {
    /// Every ship type, in declaration order.
    pub const ALL: [ShipType; 3] = [ShipType::Transport, ShipType::Military, ShipType::Merchant];

    /// Wire label for the ship type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ShipType::Transport => "TRANSPORT",
            ShipType::Military => "MILITARY",
            ShipType::Merchant => "MERCHANT",
        }
    }

    /// Parse a wire label, ignoring ASCII case.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(value.trim()))
    }
}

/// Production moment of a ship, as milliseconds since the Unix epoch.
///
/// Timestamp filters compare this value directly; validation and rating only
/// look at its calendar year (see [`ProdDate::year`]).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProdDate(i64);

impl ProdDate {
    /// Wrap a millisecond epoch timestamp.
    pub const fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Midnight UTC on the first of January of `year`.
    pub fn from_year(year: i32) -> Option<Self> {
        let start = NaiveDate::from_ymd_opt(year, 1, 1)?.and_hms_opt(0, 0, 0)?;
        Some(Self(start.and_utc().timestamp_millis()))
    }

    /// Milliseconds since the Unix epoch.
    pub const fn millis(self) -> i64 {
        self.0
    }

    /// Calendar year in UTC, or `None` when the timestamp is out of range.
    pub fn year(self) -> Option<i32> {
        DateTime::from_timestamp_millis(self.0).map(|moment| moment.year())
    }
}

/// A stored ship record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Ship {
    /// Identifier; `None` until the registry assigns one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ShipId>,
    /// Ship name (1..=50 characters).
    pub name: String,
    /// Planet the ship is based on (1..=50 characters).
    pub planet: String,
    /// Ship class.
    pub ship_type: ShipType,
    /// Production timestamp, epoch milliseconds.
    #[schema(value_type = i64)]
    pub prod_date: ProdDate,
    /// Whether the ship is second-hand.
    #[serde(alias = "isUsed")]
    pub used: bool,
    /// Maximum speed (0.01..=0.99).
    pub speed: f64,
    /// Crew size (1..=9999).
    pub crew_size: i32,
    /// Derived rating.
    pub rating: f64,
}

/// Partial ship payload accepted by create and update.
///
/// Identifier and rating are never taken from callers, so they are not part
/// of the draft; unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ShipDraft {
    /// Ship name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Planet.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planet: Option<String>,
    /// Ship class.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ship_type: Option<ShipType>,
    /// Production timestamp, epoch milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<i64>)]
    pub prod_date: Option<ProdDate>,
    /// Second-hand flag.
    #[serde(alias = "isUsed", skip_serializing_if = "Option::is_none")]
    pub used: Option<bool>,
    /// Maximum speed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    /// Crew size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crew_size: Option<i32>,
}
