//! Static site generator for the Ghibli fan site.
//!
//! Renders home, film and species pages from a [`ghibli_data::Catalog`]
//! and copies the public asset tree next to them.

pub mod assets;
pub mod builder;
pub mod pages;
pub mod templates;

pub use builder::{BuildConfig, BuildError, BuildResult, SiteBuilder};
pub use pages::SiteMeta;
