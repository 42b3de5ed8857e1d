//! Multi-predicate ship filtering.

use crate::domain::{ProdDate, Ship, ShipType};

/// Optional search criteria. Every supplied field must match; absent fields
/// impose no constraint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShipCriteria {
    /// Case-insensitive substring of the ship name.
    pub name: Option<String>,
    /// Case-insensitive substring of the planet.
    pub planet: Option<String>,
    /// Exact ship type.
    pub ship_type: Option<ShipType>,
    /// Production timestamp lower bound (exclusive).
    pub after: Option<i64>,
    /// Production timestamp upper bound (exclusive).
    pub before: Option<i64>,
    /// Exact second-hand flag.
    pub used: Option<bool>,
    /// Speed lower bound (exclusive).
    pub min_speed: Option<f64>,
    /// Speed upper bound (exclusive).
    pub max_speed: Option<f64>,
    /// Crew size lower bound (exclusive).
    pub min_crew_size: Option<i32>,
    /// Crew size upper bound (exclusive).
    pub max_crew_size: Option<i32>,
    /// Rating lower bound (exclusive).
    pub min_rating: Option<f64>,
    /// Rating upper bound (exclusive).
    pub max_rating: Option<f64>,
}

impl ShipCriteria {
    /// Whether no criterion is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Check a ship against every supplied criterion.
    pub fn matches(&self, ship: &Ship) -> bool {
        contains_ignore_case(&ship.name, self.name.as_deref())
            && contains_ignore_case(&ship.planet, self.planet.as_deref())
            && self.ship_type.is_none_or(|kind| kind == ship.ship_type)
            && self.produced_between(ship.prod_date)
            && self.used.is_none_or(|used| used == ship.used)
            && within(ship.speed, self.min_speed, self.max_speed)
            && within(ship.crew_size, self.min_crew_size, self.max_crew_size)
            && within(ship.rating, self.min_rating, self.max_rating)
    }

    fn produced_between(&self, prod_date: ProdDate) -> bool {
        if self.after.is_none() && self.before.is_none() {
            return true;
        }
        let after = self.after.unwrap_or(0);
        let before = self.before.unwrap_or(i64::MAX);
        prod_date.millis() > after && prod_date.millis() < before
    }
}

/// Return the ships matching `criteria`, keeping their relative order.
pub fn filter_ships(ships: Vec<Ship>, criteria: &ShipCriteria) -> Vec<Ship> {
    if criteria.is_empty() {
        return ships;
    }
    ships
        .into_iter()
        .filter(|ship| criteria.matches(ship))
        .collect()
}

fn contains_ignore_case(value: &str, needle: Option<&str>) -> bool {
    match needle {
        Some(needle) => value.to_lowercase().contains(&needle.to_lowercase()),
        None => true,
    }
}

fn within<T: PartialOrd + Copy>(value: T, min: Option<T>, max: Option<T>) -> bool {
    min.is_none_or(|min| value > min) && max.is_none_or(|max| value < max)
}
