//! Ship inventory operations.

use log::{debug, info};

use crate::domain::{Ship, ShipDraft};
use crate::error::{Result, ShipyardError};
use crate::filter::{ShipCriteria, filter_ships};
use crate::paging::{PageRequest, paginate};
use crate::registry::ShipRegistry;
use crate::validate::{apply_update, parse_ship_id, validate_new};

/// Search, count and CRUD over a [`ShipRegistry`].
///
/// Identifiers arrive as raw strings and are parsed before the registry is
/// touched. Writes are validated and re-rated on a working copy, which is
/// only handed to the registry once every check has passed.
#[derive(Debug, Clone)]
pub struct ShipService<R: ShipRegistry> {
    registry: R,
}

impl<R: ShipRegistry> ShipService<R> {
    /// Create a service backed by `registry`.
    pub fn new(registry: R) -> Self {
        Self { registry }
    }

    /// Filter, sort and page the stored ships.
    pub fn search(&self, criteria: &ShipCriteria, page: &PageRequest) -> Result<Vec<Ship>> {
        let matching = self.matching(criteria)?;
        debug!(
            "paging by {} (page {}, size {})",
            page.order.field_name(),
            page.page_number,
            page.page_size
        );
        Ok(paginate(matching, page))
    }

    /// Number of stored ships matching `criteria`, before paging.
    pub fn count(&self, criteria: &ShipCriteria) -> Result<usize> {
        Ok(self.matching(criteria)?.len())
    }

    /// Fetch a single ship.
    pub fn get_one(&self, raw_id: &str) -> Result<Ship> {
        let id = parse_ship_id(raw_id).inspect_err(log_rejection)?;
        self.registry
            .get_by_id(id)?
            .ok_or(ShipyardError::NotFound(id))
    }

    /// Validate and store a new ship.
    pub fn create(&self, draft: ShipDraft) -> Result<Ship> {
        let ship = validate_new(draft).inspect_err(log_rejection)?;
        let saved = self.registry.save(ship)?;
        info!("created ship {:?} ({})", saved.id, saved.name);
        Ok(saved)
    }

    /// Apply a partial update to a stored ship.
    pub fn update(&self, raw_id: &str, draft: ShipDraft) -> Result<Ship> {
        let id = parse_ship_id(raw_id).inspect_err(log_rejection)?;
        let existing = self
            .registry
            .get_by_id(id)?
            .ok_or(ShipyardError::NotFound(id))?;
        let updated = apply_update(existing, draft).inspect_err(log_rejection)?;
        let saved = self.registry.save(updated)?;
        info!("updated ship {id}");
        Ok(saved)
    }

    /// Delete a stored ship.
    pub fn delete(&self, raw_id: &str) -> Result<()> {
        let id = parse_ship_id(raw_id).inspect_err(log_rejection)?;
        if !self.registry.exists_by_id(id)? {
            return Err(ShipyardError::NotFound(id));
        }
        self.registry.delete_by_id(id)?;
        info!("deleted ship {id}");
        Ok(())
    }

    fn matching(&self, criteria: &ShipCriteria) -> Result<Vec<Ship>> {
        let ships = self.registry.list_all()?;
        let total = ships.len();
        let matching = filter_ships(ships, criteria);
        debug!("{} of {total} ships match {criteria:?}", matching.len());
        Ok(matching)
    }
}

fn log_rejection(error: &ShipyardError) {
    debug!("rejected ship request: {error}");
}
