//! PostgreSQL-backed ship registry.

use std::sync::Arc;

use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, PooledConnection};
use log::error;
use shipyard_core::{InMemoryRegistry, Ship, ShipId, ShipRegistry, ShipyardError};

use crate::config::StorageBackend;
use crate::db::{DbPool, init_pool};
use crate::models::{NewShipRow, ShipRow};
use crate::schema::ships;

/// Registry handle shared across HTTP workers.
pub type SharedRegistry = Arc<dyn ShipRegistry + Send + Sync>;

/// Open the registry selected by the server configuration.
pub fn open_registry(storage: &StorageBackend) -> Result<SharedRegistry, ShipyardError> {
    match storage {
        StorageBackend::Memory => Ok(Arc::new(InMemoryRegistry::new())),
        StorageBackend::Postgres { database_url } => {
            let pool = init_pool(database_url)?;
            Ok(Arc::new(PgShipRegistry::new(pool)))
        }
    }
}

/// Ship registry stored in the `ships` table.
#[derive(Clone)]
pub struct PgShipRegistry {
    pool: DbPool,
}

impl PgShipRegistry {
    /// Wrap a connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> Result<PooledConnection<ConnectionManager<PgConnection>>, ShipyardError> {
        self.pool
            .get()
            .map_err(|err| storage_failure("db connection failed", err))
    }
}

impl ShipRegistry for PgShipRegistry {
    fn list_all(&self) -> Result<Vec<Ship>, ShipyardError> {
        let mut conn = self.conn()?;
        let rows = ships::table
            .order(ships::id.asc())
            .select(ShipRow::as_select())
            .load::<ShipRow>(&mut conn)
            .map_err(|err| storage_failure("list ships failed", err))?;
        rows.into_iter().map(Ship::try_from).collect()
    }

    fn get_by_id(&self, id: ShipId) -> Result<Option<Ship>, ShipyardError> {
        let mut conn = self.conn()?;
        let row = ships::table
            .find(id)
            .select(ShipRow::as_select())
            .first::<ShipRow>(&mut conn)
            .optional()
            .map_err(|err| storage_failure("load ship failed", err))?;
        row.map(Ship::try_from).transpose()
    }

    fn save(&self, ship: Ship) -> Result<Ship, ShipyardError> {
        let record = NewShipRow::try_from(&ship)?;
        let mut conn = self.conn()?;
        let row = match ship.id {
            None => diesel::insert_into(ships::table)
                .values(&record)
                .returning(ShipRow::as_returning())
                .get_result::<ShipRow>(&mut conn)
                .map_err(|err| storage_failure("insert ship failed", err))?,
            Some(id) => diesel::update(ships::table.find(id))
                .set(&record)
                .returning(ShipRow::as_returning())
                .get_result::<ShipRow>(&mut conn)
                .optional()
                .map_err(|err| storage_failure("update ship failed", err))?
                .ok_or(ShipyardError::NotFound(id))?,
        };
        Ship::try_from(row)
    }

    fn exists_by_id(&self, id: ShipId) -> Result<bool, ShipyardError> {
        let mut conn = self.conn()?;
        diesel::select(diesel::dsl::exists(ships::table.find(id)))
            .get_result::<bool>(&mut conn)
            .map_err(|err| storage_failure("check ship failed", err))
    }

    fn delete_by_id(&self, id: ShipId) -> Result<(), ShipyardError> {
        let mut conn = self.conn()?;
        let deleted = diesel::delete(ships::table.find(id))
            .execute(&mut conn)
            .map_err(|err| storage_failure("delete ship failed", err))?;
        if deleted == 0 {
            return Err(ShipyardError::NotFound(id));
        }
        Ok(())
    }
}

fn storage_failure(context: &str, err: impl std::fmt::Display) -> ShipyardError {
    error!("{context}: {err}");
    ShipyardError::storage(format!("{context}: {err}"))
}
