//! In-memory lookup indexes over a complete backup.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Deserializer};

use crate::model::{Film, Named, Person, RawFilm, RawPerson, RawSpecies, Species};
use crate::relation::IdPolicy;
use crate::store::{read_json, DataError};

/// The consolidated backup file (`complete-backup.json`).
///
/// Every array is optional; a missing or `null` entry reads as empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompleteBackup {
    #[serde(default, deserialize_with = "or_empty")]
    pub films: Vec<RawFilm>,
    #[serde(default, deserialize_with = "or_empty")]
    pub species: Vec<RawSpecies>,
    #[serde(default, deserialize_with = "or_empty")]
    pub people: Vec<RawPerson>,
    #[serde(default, deserialize_with = "or_empty")]
    pub locations: Vec<Named>,
    #[serde(default, deserialize_with = "or_empty")]
    pub vehicles: Vec<Named>,
}

fn or_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// All records of one build run, with id indexes.
///
/// Ids are assumed unique; on duplicates the last record wins the index
/// entry.
#[derive(Debug, Default)]
pub struct Catalog {
    films: Vec<Film>,
    species: Vec<Species>,
    people: Vec<Person>,
    people_by_id: HashMap<String, usize>,
    species_by_id: HashMap<String, usize>,
    location_names: HashMap<String, String>,
    vehicle_names: HashMap<String, String>,
    people_by_species: HashMap<String, Vec<usize>>,
}

impl Catalog {
    /// Load and index a backup file.
    pub fn load(path: &Path) -> Result<Self, DataError> {
        let backup: CompleteBackup = read_json(path)?;
        let catalog = Self::from_backup(backup);

        tracing::info!(
            "Loaded {} films, {} species, {} people from {}",
            catalog.films.len(),
            catalog.species.len(),
            catalog.people.len(),
            path.display()
        );

        Ok(catalog)
    }

    pub fn from_backup(backup: CompleteBackup) -> Self {
        let films = backup
            .films
            .into_iter()
            .map(|f| Film::from_raw(f, IdPolicy::Lenient))
            .collect();
        let species = backup
            .species
            .into_iter()
            .map(|s| Species::from_raw(s, IdPolicy::Lenient))
            .collect();
        let people = backup
            .people
            .into_iter()
            .map(|p| Person::from_raw(p, IdPolicy::Lenient))
            .collect();

        Self::from_records(films, species, people, backup.locations, backup.vehicles)
    }

    /// Index already-resolved records.
    pub fn from_records(
        films: Vec<Film>,
        species: Vec<Species>,
        people: Vec<Person>,
        locations: Vec<Named>,
        vehicles: Vec<Named>,
    ) -> Self {
        let people_by_id = people
            .iter()
            .enumerate()
            .map(|(i, p)| (p.id.clone(), i))
            .collect();
        let species_by_id = species
            .iter()
            .enumerate()
            .map(|(i, s)| (s.id.clone(), i))
            .collect();

        let mut people_by_species: HashMap<String, Vec<usize>> = HashMap::new();
        for (i, person) in people.iter().enumerate() {
            if let Some(species_id) = &person.species {
                people_by_species
                    .entry(species_id.clone())
                    .or_default()
                    .push(i);
            }
        }

        Self {
            films,
            species,
            people,
            people_by_id,
            species_by_id,
            location_names: name_index(locations),
            vehicle_names: name_index(vehicles),
            people_by_species,
        }
    }

    /// Films in source order.
    pub fn films(&self) -> &[Film] {
        &self.films
    }

    /// Species in source order.
    pub fn species(&self) -> &[Species] {
        &self.species
    }

    pub fn people(&self) -> &[Person] {
        &self.people
    }

    pub fn person(&self, id: &str) -> Option<&Person> {
        self.people_by_id.get(id).map(|&i| &self.people[i])
    }

    pub fn find_species(&self, id: &str) -> Option<&Species> {
        self.species_by_id.get(id).map(|&i| &self.species[i])
    }

    pub fn location_name(&self, id: &str) -> Option<&str> {
        self.location_names.get(id).map(String::as_str)
    }

    pub fn vehicle_name(&self, id: &str) -> Option<&str> {
        self.vehicle_names.get(id).map(String::as_str)
    }

    /// Films ordered by numeric release year.
    ///
    /// Films whose `release_date` is not a number come last, in source order.
    pub fn films_by_release(&self) -> Vec<&Film> {
        let mut films: Vec<&Film> = self.films.iter().collect();
        films.sort_by(|a, b| match (a.release_year(), b.release_year()) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
        films
    }

    /// People belonging to a species, sorted by name (missing names sort as "").
    pub fn people_of_species(&self, species_id: &str) -> Vec<&Person> {
        let mut people: Vec<&Person> = self
            .people_by_species
            .get(species_id)
            .map(|ids| ids.iter().map(|&i| &self.people[i]).collect())
            .unwrap_or_default();
        people.sort_by(|a, b| {
            let a = a.name.as_deref().unwrap_or("");
            let b = b.name.as_deref().unwrap_or("");
            a.cmp(b)
        });
        people
    }

    /// Films featuring a species.
    ///
    /// Uses the species' own film list when it has one; otherwise scans every
    /// film's species list.
    pub fn films_featuring(&self, species: &Species) -> Vec<&Film> {
        if !species.films.is_empty() {
            return self
                .films
                .iter()
                .filter(|f| species.films.contains(&f.id))
                .collect();
        }

        self.films
            .iter()
            .filter(|f| f.species.contains(&species.id))
            .collect()
    }
}

fn name_index(records: Vec<Named>) -> HashMap<String, String> {
    records
        .into_iter()
        .filter_map(|r| match r.name {
            Some(name) if !name.is_empty() => Some((r.id, name)),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    fn catalog() -> Catalog {
        let backup: CompleteBackup = serde_json::from_value(serde_json::json!({
            "films": [
                { "id": "f-late", "title": "Late", "release_date": "2001", "species": ["s-cat"] },
                { "id": "f-unknown", "title": "Unknown", "release_date": "soon" },
                { "id": "f-early", "title": "Early", "release_date": 1984, "people": ["p-b", "p-missing"] },
                { "id": "f-mid", "title": "Mid", "release_date": "1988", "species": ["s-cat"] }
            ],
            "species": [
                { "id": "s-human", "name": "Human", "films": ["f-early"] },
                { "id": "s-cat", "name": "Cat" }
            ],
            "people": [
                { "id": "p-b", "name": "Zed", "species": "s-human" },
                { "id": "p-a", "name": "Ann", "species": { "id": "s-human" } },
                { "id": "p-c", "species": "s-human" },
                { "id": "p-d", "name": "Jiji", "species": "s-cat" }
            ],
            "locations": [
                { "id": "l1", "name": "Irontown" },
                { "id": "l2", "name": "" }
            ],
            "vehicles": [{ "id": "v1", "name": "Goliath" }]
        }))
        .unwrap();
        Catalog::from_backup(backup)
    }

    #[test]
    fn sorts_films_by_release_year() {
        let catalog = catalog();

        let titles: Vec<&str> = catalog
            .films_by_release()
            .iter()
            .map(|f| f.id.as_str())
            .collect();

        assert_eq!(titles, vec!["f-early", "f-mid", "f-late", "f-unknown"]);
    }

    #[test]
    fn release_order_is_non_decreasing() {
        let catalog = catalog();

        let years: Vec<f64> = catalog
            .films_by_release()
            .iter()
            .filter_map(|f| f.release_year())
            .collect();

        assert!(years.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn looks_up_records_by_id() {
        let catalog = catalog();

        assert_eq!(catalog.person("p-d").and_then(|p| p.name.as_deref()), Some("Jiji"));
        assert!(catalog.person("p-missing").is_none());
        assert_eq!(
            catalog.find_species("s-cat").and_then(|s| s.name.as_deref()),
            Some("Cat")
        );
        assert_eq!(catalog.location_name("l1"), Some("Irontown"));
        assert_eq!(catalog.location_name("l2"), None);
        assert_eq!(catalog.vehicle_name("v1"), Some("Goliath"));
    }

    #[test]
    fn sorts_people_of_species_by_name() {
        let catalog = catalog();

        let ids: Vec<&str> = catalog
            .people_of_species("s-human")
            .iter()
            .map(|p| p.id.as_str())
            .collect();

        assert_eq!(ids, vec!["p-c", "p-a", "p-b"]);
        assert!(catalog.people_of_species("s-nobody").is_empty());
    }

    #[test]
    fn prefers_explicit_species_film_list() {
        let catalog = catalog();
        let human = catalog.find_species("s-human").unwrap();

        let films: Vec<&str> = catalog
            .films_featuring(human)
            .iter()
            .map(|f| f.id.as_str())
            .collect();

        assert_eq!(films, vec!["f-early"]);
    }

    #[test]
    fn falls_back_to_scanning_films() {
        let catalog = catalog();
        let cat = catalog.find_species("s-cat").unwrap();

        let films: Vec<&str> = catalog
            .films_featuring(cat)
            .iter()
            .map(|f| f.id.as_str())
            .collect();

        assert_eq!(films, vec!["f-late", "f-mid"]);
    }

    #[test]
    fn loads_backup_from_disk() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("complete-backup.json");
        fs::write(&path, r#"{ "films": [{ "id": "f1", "title": "Totoro" }] }"#).unwrap();

        let catalog = Catalog::load(&path).unwrap();

        assert_eq!(catalog.films().len(), 1);
        assert!(catalog.species().is_empty());
        assert!(catalog.people().is_empty());
    }

    #[test]
    fn null_arrays_read_as_empty() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("complete-backup.json");
        fs::write(
            &path,
            r#"{ "films": [{ "id": "f1", "locations": ["l1"] }], "species": null, "locations": null, "vehicles": null }"#,
        )
        .unwrap();

        let catalog = Catalog::load(&path).unwrap();

        assert_eq!(catalog.films().len(), 1);
        assert!(catalog.species().is_empty());
        assert_eq!(catalog.location_name("l1"), None);
    }

    #[test]
    fn malformed_backup_is_an_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("complete-backup.json");
        fs::write(&path, r#"{ "films": [{ "title": "no id" }] }"#).unwrap();

        assert!(matches!(
            Catalog::load(&path),
            Err(DataError::ParseError { .. })
        ));
    }
}
