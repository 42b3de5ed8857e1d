//! Field validation for ship writes.

use crate::domain::{ProdDate, Ship, ShipDraft, ShipId};
use crate::error::{Result, ShipyardError};
use crate::rating::{CURRENT_YEAR, compute_rating};

/// Longest accepted name or planet, in characters.
pub const MAX_TEXT_LEN: usize = 50;
/// Earliest accepted production year.
pub const MIN_PROD_YEAR: i32 = 2800;
/// Latest accepted production year.
pub const MAX_PROD_YEAR: i32 = CURRENT_YEAR;
/// Slowest accepted speed.
pub const MIN_SPEED: f64 = 0.01;
/// Fastest accepted speed.
pub const MAX_SPEED: f64 = 0.99;
/// Smallest accepted crew.
pub const MIN_CREW_SIZE: i32 = 1;
/// Largest accepted crew.
pub const MAX_CREW_SIZE: i32 = 9999;

/// Parse a path identifier into a positive ship id.
pub fn parse_ship_id(raw: &str) -> Result<ShipId> {
    match raw.parse::<ShipId>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ShipyardError::invalid(format!("invalid ship id: {raw:?}"))),
    }
}

/// Validate a create request and build the ship to store.
///
/// Every field except `used` is required; `used` defaults to `false`.
pub fn validate_new(draft: ShipDraft) -> Result<Ship> {
    let name = required(draft.name, "name")?;
    let planet = required(draft.planet, "planet")?;
    let ship_type = required(draft.ship_type, "shipType")?;
    let prod_date = required(draft.prod_date, "prodDate")?;
    let speed = required(draft.speed, "speed")?;
    let crew_size = required(draft.crew_size, "crewSize")?;

    check_text(&name, "name")?;
    check_text(&planet, "planet")?;
    check_prod_date(prod_date)?;
    check_speed(speed)?;
    check_crew_size(crew_size)?;

    let mut ship = Ship {
        id: None,
        name,
        planet,
        ship_type,
        prod_date,
        used: draft.used.unwrap_or(false),
        speed,
        crew_size,
        rating: 0.0,
    };
    refresh_rating(&mut ship)?;
    Ok(ship)
}

/// Merge an update request into `existing`.
///
/// Supplied fields are checked one by one against the create rules; the
/// rating is recomputed from the merged ship. `existing` is only consumed,
/// so a failure leaves the stored ship untouched.
pub fn apply_update(existing: Ship, draft: ShipDraft) -> Result<Ship> {
    let mut ship = existing;
    if let Some(name) = draft.name {
        check_text(&name, "name")?;
        ship.name = name;
    }
    if let Some(planet) = draft.planet {
        check_text(&planet, "planet")?;
        ship.planet = planet;
    }
    if let Some(ship_type) = draft.ship_type {
        ship.ship_type = ship_type;
    }
    if let Some(prod_date) = draft.prod_date {
        check_prod_date(prod_date)?;
        ship.prod_date = prod_date;
    }
    if let Some(used) = draft.used {
        ship.used = used;
    }
    if let Some(speed) = draft.speed {
        check_speed(speed)?;
        ship.speed = speed;
    }
    if let Some(crew_size) = draft.crew_size {
        check_crew_size(crew_size)?;
        ship.crew_size = crew_size;
    }
    refresh_rating(&mut ship)?;
    Ok(ship)
}

/// Recompute the derived rating of `ship` in place.
pub fn refresh_rating(ship: &mut Ship) -> Result<()> {
    let year = production_year(ship.prod_date)?;
    ship.rating = compute_rating(ship.speed, ship.used, year);
    Ok(())
}

fn required<T>(value: Option<T>, field: &str) -> Result<T> {
    value.ok_or_else(|| ShipyardError::invalid(format!("{field} is required")))
}

fn check_text(value: &str, field: &str) -> Result<()> {
    let len = value.chars().count();
    if len == 0 || len > MAX_TEXT_LEN {
        return Err(ShipyardError::invalid(format!(
            "{field} must be 1 to {MAX_TEXT_LEN} characters, got {len}"
        )));
    }
    Ok(())
}

fn production_year(prod_date: ProdDate) -> Result<i32> {
    prod_date.year().ok_or_else(|| {
        ShipyardError::invalid(format!("prodDate {} is out of range", prod_date.millis()))
    })
}

fn check_prod_date(prod_date: ProdDate) -> Result<()> {
    let year = production_year(prod_date)?;
    if !(MIN_PROD_YEAR..=MAX_PROD_YEAR).contains(&year) {
        return Err(ShipyardError::invalid(format!(
            "production year must be {MIN_PROD_YEAR} to {MAX_PROD_YEAR}, got {year}"
        )));
    }
    Ok(())
}

fn check_speed(speed: f64) -> Result<()> {
    if !(MIN_SPEED..=MAX_SPEED).contains(&speed) {
        return Err(ShipyardError::invalid(format!(
            "speed must be {MIN_SPEED} to {MAX_SPEED}, got {speed}"
        )));
    }
    Ok(())
}

fn check_crew_size(crew_size: i32) -> Result<()> {
    if !(MIN_CREW_SIZE..=MAX_CREW_SIZE).contains(&crew_size) {
        return Err(ShipyardError::invalid(format!(
            "crewSize must be {MIN_CREW_SIZE} to {MAX_CREW_SIZE}, got {crew_size}"
        )));
    }
    Ok(())
}
