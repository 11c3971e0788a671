//! Data model and normalizer for the Ghibli fan site.
//!
//! This crate loads film, species and people records from JSON, resolves
//! their cross references into plain ids, and provides the lookup indexes
//! the site builder renders from.

pub mod catalog;
pub mod model;
pub mod normalize;
pub mod relation;
pub mod store;

pub use catalog::{Catalog, CompleteBackup};
pub use model::{film_href, species_href, Film, Named, Person, Species};
pub use normalize::{local_image_path, NormalizeReport, Normalizer};
pub use relation::{extract_uuid, IdPolicy, Relation};
pub use store::DataError;
