//! Static site builder.

use std::fs;
use std::path::{Component, Path, PathBuf};
use std::time::Instant;

use serde::Serialize;

use ghibli_data::{Catalog, DataError};

use crate::assets::AssetPipeline;
use crate::pages::{film_page, home_page, species_page, Page, SiteMeta};
use crate::templates::TemplateEngine;

/// Configuration for building the site.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Consolidated backup JSON
    pub backup_path: PathBuf,

    /// Static asset tree copied verbatim into the output
    pub public_dir: PathBuf,

    /// Output directory (cleared on every build)
    pub output_dir: PathBuf,

    /// Minify HTML output
    pub minify: bool,

    /// Site-wide text
    pub site: SiteMeta,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            backup_path: PathBuf::from("data/complete-backup.json"),
            public_dir: PathBuf::from("public"),
            output_dir: PathBuf::from("dist"),
            minify: true,
            site: SiteMeta::default(),
        }
    }
}

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Total number of pages generated
    pub pages: usize,

    /// Film detail pages
    pub films: usize,

    /// Species detail pages
    pub species: usize,

    /// Files copied from the public directory
    pub assets: usize,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

/// Errors that can occur during build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Failed to load data: {0}")]
    DataError(#[from] DataError),

    #[error("Failed to copy assets: {0}")]
    AssetError(String),

    #[error("Failed to render template: {0}")]
    TemplateError(String),

    #[error("Failed to write output: {0}")]
    WriteError(String),
}

/// Static site builder.
pub struct SiteBuilder {
    config: BuildConfig,
    templates: TemplateEngine,
}

impl SiteBuilder {
    /// Create a new site builder.
    pub fn new(config: BuildConfig) -> Self {
        Self {
            config,
            templates: TemplateEngine::new(),
        }
    }

    /// Load the backup and build the site.
    pub fn build(&self) -> Result<BuildResult, BuildError> {
        let start = Instant::now();
        let catalog = Catalog::load(&self.config.backup_path)?;
        self.build_catalog(&catalog, start)
    }

    /// Build the site from an already loaded catalog.
    ///
    /// Runs strictly in order: clear output, copy assets, home page, film
    /// pages, species pages. The first error aborts the build and may leave
    /// the output directory partially written.
    pub fn build_catalog(
        &self,
        catalog: &Catalog,
        start: Instant,
    ) -> Result<BuildResult, BuildError> {
        self.prepare_output_dir()?;
        let assets = self.copy_assets()?;

        let site = &self.config.site;

        let home = home_page(catalog, site);
        self.write_page("home.html", &home, Path::new("index.html"))?;

        let mut films = 0;
        for film in catalog.films() {
            let Some(path) = detail_path("film", &film.id) else {
                continue;
            };
            let page = film_page(film, catalog, site);
            self.write_page("film.html", &page, &path)?;
            films += 1;
        }

        let mut species = 0;
        for record in catalog.species() {
            let Some(path) = detail_path("species", &record.id) else {
                continue;
            };
            let people = catalog.people_of_species(&record.id);
            let page = species_page(record, &people, catalog, site);
            self.write_page("species.html", &page, &path)?;
            species += 1;
        }

        Ok(BuildResult {
            pages: 1 + films + species,
            films,
            species,
            assets,
            duration_ms: start.elapsed().as_millis() as u64,
            output_dir: self.config.output_dir.clone(),
        })
    }

    /// Remove and recreate the output directory.
    fn prepare_output_dir(&self) -> Result<(), BuildError> {
        let output_dir = &self.config.output_dir;

        if output_dir.exists() {
            fs::remove_dir_all(output_dir)
                .map_err(|e| BuildError::WriteError(format!("{}: {}", output_dir.display(), e)))?;
        }

        fs::create_dir_all(output_dir)
            .map_err(|e| BuildError::WriteError(format!("{}: {}", output_dir.display(), e)))
    }

    fn copy_assets(&self) -> Result<usize, BuildError> {
        let public_dir = &self.config.public_dir;

        if !public_dir.is_dir() {
            tracing::warn!("Public directory not found: {}", public_dir.display());
            return Ok(0);
        }

        let count = AssetPipeline::copy_dir(public_dir, &self.config.output_dir)
            .map_err(|e| BuildError::AssetError(format!("{}: {}", public_dir.display(), e)))?;

        tracing::info!("Copied {} assets from {}", count, public_dir.display());

        Ok(count)
    }

    /// Render, optionally minify, and write one page below the output directory.
    fn write_page<T: Serialize>(
        &self,
        template: &str,
        page: &Page<T>,
        relative: &Path,
    ) -> Result<(), BuildError> {
        let html = self
            .templates
            .render_page(template, &self.config.site, page)
            .map_err(|e| BuildError::TemplateError(format!("{}: {}", relative.display(), e)))?;

        let html = if self.config.minify {
            AssetPipeline::minify_html(&html)
        } else {
            html
        };

        let output_path = self.config.output_dir.join(relative);
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| BuildError::WriteError(format!("{}: {}", parent.display(), e)))?;
        }

        fs::write(&output_path, html)
            .map_err(|e| BuildError::WriteError(format!("{}: {}", output_path.display(), e)))?;

        tracing::debug!("Wrote {}", output_path.display());

        Ok(())
    }
}

/// `<kind>/<id>/index.html`, or `None` when the id is not a single plain
/// path segment and would land outside `<kind>/`.
fn detail_path(kind: &str, id: &str) -> Option<PathBuf> {
    let mut components = Path::new(id).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(segment)), None) => {
            Some(Path::new(kind).join(segment).join("index.html"))
        }
        _ => {
            tracing::warn!("Skipping {} page with unusable id {:?}", kind, id);
            None
        }
    }
}
