//! Film, species and people records.
//!
//! `Raw*` types accept the loose shapes found in source data. They are
//! converted once into the concrete records ([`Film`], [`Species`],
//! [`Person`]) that everything downstream works with. The concrete records
//! also serialize to the normalized on-disk shape.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::relation::{self, resolve_all, IdPolicy, Relation};

/// A film as found in source data.
#[derive(Debug, Clone, Deserialize)]
pub struct RawFilm {
    pub id: String,
    #[serde(default, deserialize_with = "text")]
    pub href: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub original_title: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub original_title_romanised: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub movie_banner: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub director: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub producer: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub release_date: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub running_time: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub rt_score: Option<String>,
    #[serde(default, deserialize_with = "relation::list")]
    pub people: Vec<Relation>,
    #[serde(default, deserialize_with = "relation::list")]
    pub species: Vec<Relation>,
    #[serde(default, deserialize_with = "relation::list")]
    pub locations: Vec<Relation>,
    #[serde(default, deserialize_with = "relation::list")]
    pub vehicles: Vec<Relation>,
}

/// A species as found in source data.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSpecies {
    pub id: String,
    #[serde(default, deserialize_with = "text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub classification: Option<String>,
    /// Older backups use `class` instead of `classification`.
    #[serde(default, deserialize_with = "text")]
    pub class: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub eye_colors: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub hair_colors: Option<String>,
    #[serde(default, deserialize_with = "relation::list")]
    pub films: Vec<Relation>,
}

/// A person as found in source data.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPerson {
    pub id: String,
    #[serde(default, deserialize_with = "text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub gender: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub age: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub eye_color: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub hair_color: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub image: Option<String>,
    #[serde(default)]
    pub species: Option<Relation>,
}

/// A location or vehicle: only its name is ever shown.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Named {
    pub id: String,
    #[serde(default, deserialize_with = "text")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Film {
    pub id: String,
    pub href: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_title_romanised: Option<String>,
    pub image: String,
    pub movie_banner: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub director: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub producer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub running_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rt_score: Option<String>,
    pub people: Vec<String>,
    pub species: Vec<String>,
    pub locations: Vec<String>,
    pub vehicles: Vec<String>,
}

impl Film {
    /// Resolve a raw film's relations under `policy`.
    pub fn from_raw(raw: RawFilm, policy: IdPolicy) -> Self {
        let href = raw
            .href
            .as_deref()
            .map(|h| h.trim_start_matches('/'))
            .filter(|h| !h.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| film_href(&raw.id));

        Self {
            href,
            people: resolve_all(&raw.people, policy),
            species: resolve_all(&raw.species, policy),
            locations: resolve_all(&raw.locations, policy),
            vehicles: resolve_all(&raw.vehicles, policy),
            title: raw.title,
            original_title: raw.original_title,
            original_title_romanised: raw.original_title_romanised,
            image: raw.image.unwrap_or_default(),
            movie_banner: raw.movie_banner.unwrap_or_default(),
            description: raw.description,
            director: raw.director,
            producer: raw.producer,
            release_date: raw.release_date,
            running_time: raw.running_time,
            rt_score: raw.rt_score,
            id: raw.id,
        }
    }

    /// Numeric release year, if `release_date` parses as a finite number.
    pub fn release_year(&self) -> Option<f64> {
        self.release_date
            .as_deref()
            .and_then(|d| d.trim().parse::<f64>().ok())
            .filter(|y| y.is_finite())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Species {
    pub id: String,
    pub href: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub classification: String,
    pub eye_colors: String,
    pub hair_colors: String,
    pub films: Vec<String>,
}

impl Species {
    pub fn from_raw(raw: RawSpecies, policy: IdPolicy) -> Self {
        Self {
            href: species_href(&raw.id),
            name: raw.name,
            classification: raw.classification.or(raw.class).unwrap_or_default(),
            eye_colors: raw.eye_colors.unwrap_or_default(),
            hair_colors: raw.hair_colors.unwrap_or_default(),
            films: resolve_all(&raw.films, policy),
            id: raw.id,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Person {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub gender: String,
    pub age: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eye_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hair_color: Option<String>,
    pub image: String,
    pub species: Option<String>,
}

impl Person {
    pub fn from_raw(raw: RawPerson, policy: IdPolicy) -> Self {
        Self {
            name: raw.name,
            gender: raw.gender.unwrap_or_default(),
            age: raw.age.unwrap_or_default(),
            eye_color: raw.eye_color,
            hair_color: raw.hair_color,
            image: raw.image.unwrap_or_default(),
            species: raw.species.and_then(|s| s.resolve(policy)),
            id: raw.id,
        }
    }
}

/// Root-relative link to a film's detail page.
pub fn film_href(id: &str) -> String {
    format!("film/{id}/")
}

/// Root-relative link to a species' detail page.
pub fn species_href(id: &str) -> String {
    format!("species/{id}/")
}

/// Deserialize a scalar that may be a string or a number into text.
fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}
