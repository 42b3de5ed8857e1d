//! Ship storage abstractions.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use crate::domain::{Ship, ShipId};
use crate::error::{Result, ShipyardError};

/// Record store the ship service reads from and writes to.
#[cfg_attr(test, mockall::automock)]
pub trait ShipRegistry {
    /// Every stored ship.
    fn list_all(&self) -> Result<Vec<Ship>>;
    /// Fetch a ship by id.
    fn get_by_id(&self, id: ShipId) -> Result<Option<Ship>>;
    /// Insert a ship without an id (assigning one) or replace a stored ship.
    fn save(&self, ship: Ship) -> Result<Ship>;
    /// Whether a ship is stored under `id`.
    fn exists_by_id(&self, id: ShipId) -> Result<bool>;
    /// Remove a ship; `NotFound` if absent.
    fn delete_by_id(&self, id: ShipId) -> Result<()>;
}

impl<R: ShipRegistry + ?Sized> ShipRegistry for Arc<R> {
    fn list_all(&self) -> Result<Vec<Ship>> {
        (**self).list_all()
    }

    fn get_by_id(&self, id: ShipId) -> Result<Option<Ship>> {
        (**self).get_by_id(id)
    }

    fn save(&self, ship: Ship) -> Result<Ship> {
        (**self).save(ship)
    }

    fn exists_by_id(&self, id: ShipId) -> Result<bool> {
        (**self).exists_by_id(id)
    }

    fn delete_by_id(&self, id: ShipId) -> Result<()> {
        (**self).delete_by_id(id)
    }
}

#[derive(Debug, Default)]
struct Inventory {
    ships: BTreeMap<ShipId, Ship>,
    last_id: ShipId,
}

/// Registry kept entirely in process memory.
#[derive(Debug, Default)]
pub struct InMemoryRegistry {
    inner: RwLock<Inventory>,
}

impl InMemoryRegistry {
    /// Create an empty registry; the first insert gets id 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding `ships`, assigning ids to those without one.
    pub fn with_ships(ships: impl IntoIterator<Item = Ship>) -> Result<Self> {
        let registry = Self::new();
        for ship in ships {
            registry.save(ship)?;
        }
        Ok(registry)
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Inventory>> {
        self.inner
            .read()
            .map_err(|_| ShipyardError::storage("ship registry lock poisoned"))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Inventory>> {
        self.inner
            .write()
            .map_err(|_| ShipyardError::storage("ship registry lock poisoned"))
    }
}

impl ShipRegistry for InMemoryRegistry {
    fn list_all(&self) -> Result<Vec<Ship>> {
        Ok(self.read()?.ships.values().cloned().collect())
    }

    fn get_by_id(&self, id: ShipId) -> Result<Option<Ship>> {
        Ok(self.read()?.ships.get(&id).cloned())
    }

    fn save(&self, mut ship: Ship) -> Result<Ship> {
        let mut inventory = self.write()?;
        let id = match ship.id {
            Some(id) => id,
            None => inventory.last_id + 1,
        };
        inventory.last_id = inventory.last_id.max(id);
        ship.id = Some(id);
        inventory.ships.insert(id, ship.clone());
        Ok(ship)
    }

    fn exists_by_id(&self, id: ShipId) -> Result<bool> {
        Ok(self.read()?.ships.contains_key(&id))
    }

    fn delete_by_id(&self, id: ShipId) -> Result<()> {
        match self.write()?.ships.remove(&id) {
            Some(_) => Ok(()),
            None => Err(ShipyardError::NotFound(id)),
        }
    }
}
