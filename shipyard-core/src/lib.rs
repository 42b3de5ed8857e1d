#![deny(missing_docs)]
//! Shipyard core library.
//!
//! Domain types, validation, rating, filtering and paging for the ship
//! inventory, plus the registry seam the server and tests plug storage into.

pub mod domain;
pub mod error;
pub mod filter;
pub mod paging;
pub mod rating;
pub mod registry;
pub mod service;
pub mod validate;

pub use domain::{ProdDate, Ship, ShipDraft, ShipId, ShipType};
pub use error::{Result, ShipyardError};
pub use filter::{ShipCriteria, filter_ships};
pub use paging::{DEFAULT_PAGE_SIZE, PageRequest, ShipOrder, paginate};
pub use rating::compute_rating;
pub use registry::{InMemoryRegistry, ShipRegistry};
pub use service::ShipService;
pub use validate::{apply_update, parse_ship_id, validate_new};
