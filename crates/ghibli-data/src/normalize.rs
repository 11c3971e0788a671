//! Data normalizer.
//!
//! Rewrites `films.json`, `species.json` and `people.json` in place so that
//! every relation is a bare id and every image is a local `images/<file>`
//! path. Running it on its own output changes nothing.

use std::path::PathBuf;

use crate::model::{film_href, Film, Person, RawFilm, RawPerson, RawSpecies, Species};
use crate::relation::IdPolicy;
use crate::store::{read_json, write_json, DataError};

/// Counts of records written by a normalizer run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeReport {
    pub films: usize,
    pub species: usize,
    pub people: usize,
}

/// Normalizes the raw data files in a data directory.
pub struct Normalizer {
    data_dir: PathBuf,
}

impl Normalizer {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Read, clean and overwrite the three data files.
    ///
    /// All three files are read before anything is written, so a parse
    /// failure leaves the directory untouched.
    pub fn run(&self) -> Result<NormalizeReport, DataError> {
        let films_path = self.data_dir.join("films.json");
        let species_path = self.data_dir.join("species.json");
        let people_path = self.data_dir.join("people.json");

        let films = normalize_films(read_json(&films_path)?);
        let species = normalize_species(read_json(&species_path)?);
        let people = normalize_people(read_json(&people_path)?);

        write_json(&films_path, &films)?;
        write_json(&species_path, &species)?;
        write_json(&people_path, &people)?;

        tracing::info!(
            "Normalized {} films, {} species, {} people in {}",
            films.len(),
            species.len(),
            people.len(),
            self.data_dir.display()
        );

        Ok(NormalizeReport {
            films: films.len(),
            species: species.len(),
            people: people.len(),
        })
    }
}

pub fn normalize_films(raw: Vec<RawFilm>) -> Vec<Film> {
    raw.into_iter()
        .map(|raw| {
            let mut film = Film::from_raw(raw, IdPolicy::Strict);
            film.href = film_href(&film.id);
            film.image = local_image_path(&film.image);
            film.movie_banner = local_image_path(&film.movie_banner);
            film
        })
        .collect()
}

pub fn normalize_species(raw: Vec<RawSpecies>) -> Vec<Species> {
    raw.into_iter()
        .map(|raw| Species::from_raw(raw, IdPolicy::Strict))
        .collect()
}

pub fn normalize_people(raw: Vec<RawPerson>) -> Vec<Person> {
    raw.into_iter()
        .map(|raw| {
            let mut person = Person::from_raw(raw, IdPolicy::Strict);
            person.image = local_image_path(&person.image);
            person
        })
        .collect()
}

/// Reduce an image reference to `images/<basename>`.
///
/// Absolute `http(s)` URLs contribute the basename of their path; any other
/// string its own basename. Empty input, or a reference with no file name
/// (`https://example.com/`), yields an empty string.
pub fn local_image_path(src: &str) -> String {
    let path = url_path(src).unwrap_or(src);
    match basename(path) {
        "" => String::new(),
        name => format!("images/{name}"),
    }
}

/// Path component of an absolute http(s) URL, without query or fragment.
fn url_path(src: &str) -> Option<&str> {
    let scheme_end = src.find("://")?;
    let scheme = &src[..scheme_end];
    if !scheme.eq_ignore_ascii_case("http") && !scheme.eq_ignore_ascii_case("https") {
        return None;
    }

    let rest = &src[scheme_end + 3..];
    let path = rest.find('/').map(|i| &rest[i..]).unwrap_or("");
    let end = path.find(['?', '#']).unwrap_or(path.len());
    Some(&path[..end])
}

fn basename(path: &str) -> &str {
    path.trim_end_matches(['/', '\\'])
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or("")
}
