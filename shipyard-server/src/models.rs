//! Database models for Shipyard server.

use chrono::{DateTime, NaiveDateTime};
use diesel::prelude::*;
use shipyard_core::{ProdDate, Ship, ShipType, ShipyardError};

use crate::schema::ships;

#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = ships)]
/// Ship database record.
pub struct ShipRow {
    /// Ship identifier.
    pub id: i64,
    /// Ship name.
    pub name: String,
    /// Planet.
    pub planet: String,
    /// Ship type label.
    pub ship_type: String,
    /// Production timestamp (UTC).
    pub prod_date: NaiveDateTime,
    /// Second-hand flag.
    pub is_used: bool,
    /// Maximum speed.
    pub speed: f64,
    /// Crew size.
    pub crew_size: i32,
    /// Derived rating.
    pub rating: f64,
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = ships)]
/// Insertable ship record; also used for full replacement.
pub struct NewShipRow {
    /// Ship name.
    pub name: String,
    /// Planet.
    pub planet: String,
    /// Ship type label.
    pub ship_type: String,
    /// Production timestamp (UTC).
    pub prod_date: NaiveDateTime,
    /// Second-hand flag.
    pub is_used: bool,
    /// Maximum speed.
    pub speed: f64,
    /// Crew size.
    pub crew_size: i32,
    /// Derived rating.
    pub rating: f64,
}

impl TryFrom<ShipRow> for Ship {
    type Error = ShipyardError;

    fn try_from(row: ShipRow) -> Result<Self, Self::Error> {
        let ship_type = ShipType::parse(&row.ship_type).ok_or_else(|| {
            ShipyardError::storage(format!(
                "ship {} has unknown type {:?}",
                row.id, row.ship_type
            ))
        })?;
        Ok(Ship {
            id: Some(row.id),
            name: row.name,
            planet: row.planet,
            ship_type,
            prod_date: ProdDate::from_millis(row.prod_date.and_utc().timestamp_millis()),
            used: row.is_used,
            speed: row.speed,
            crew_size: row.crew_size,
            rating: row.rating,
        })
    }
}

impl TryFrom<&Ship> for NewShipRow {
    type Error = ShipyardError;

    fn try_from(ship: &Ship) -> Result<Self, Self::Error> {
        let prod_date = DateTime::from_timestamp_millis(ship.prod_date.millis())
            .ok_or_else(|| {
                ShipyardError::storage(format!(
                    "prodDate {} cannot be stored",
                    ship.prod_date.millis()
                ))
            })?
            .naive_utc();
        Ok(NewShipRow {
            name: ship.name.clone(),
            planet: ship.planet.clone(),
            ship_type: ship.ship_type.as_str().to_string(),
            prod_date,
            is_used: ship.used,
            speed: ship.speed,
            crew_size: ship.crew_size,
            rating: ship.rating,
        })
    }
}
