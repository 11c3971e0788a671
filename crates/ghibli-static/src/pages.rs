//! Page view models.
//!
//! Each page is assembled from the [`Catalog`] into plain serializable
//! structs; the templates only decide markup. Unresolved ids and blank
//! fields are dropped here, so a template never has to check them twice.

use serde::Serialize;

use ghibli_data::{Catalog, Film, Person, Species};

/// Site-wide text and asset names shared by every page.
#[derive(Debug, Clone, Serialize)]
pub struct SiteMeta {
    /// Short site name, used in page titles
    pub name: String,
    /// Header logo text
    pub logo: String,
    /// Home page header tagline
    pub tagline: String,
    /// Home page title
    pub title: String,
    /// Home page meta description
    pub description: String,
    /// Stylesheet path relative to the site root
    pub stylesheet: String,
    /// Decorative script loaded by the home page
    pub decoration_script: Option<String>,
    pub attribution_name: String,
    pub attribution_url: String,
    pub copyright: String,
}

impl Default for SiteMeta {
    fn default() -> Self {
        Self {
            name: "Studio Ghibli".to_string(),
            logo: "STUDIO GHIBLI".to_string(),
            tagline: "Explore the Magical World of Ghibli".to_string(),
            title: "Studio Ghibli Films".to_string(),
            description: "Explore Studio Ghibli films: titles, years, directors and more."
                .to_string(),
            stylesheet: "styles.css".to_string(),
            decoration_script: Some("soot.js".to_string()),
            attribution_name: "Ghibli API".to_string(),
            attribution_url: "https://ghibliapi.vercel.app/".to_string(),
            copyright: "© 2025 Studio Ghibli Fan Site".to_string(),
        }
    }
}

/// Header variant of the shared layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Header {
    Home,
    Detail,
    Species,
}

/// Shared layout parameters.
#[derive(Debug, Clone, Serialize)]
pub struct Layout {
    pub title: String,
    pub description: String,
    /// `../` repeated once per directory level below the output root
    pub prefix: String,
    pub header: Header,
    /// Decorative markup and script, home page only
    pub decorations: bool,
}

/// A page ready for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub layout: Layout,
    pub body: T,
}

/// Depth of detail pages (`film/<id>/`, `species/<id>/`).
pub const DETAIL_DEPTH: usize = 2;

#[derive(Debug, Clone, Serialize)]
pub struct HomeView {
    pub cards: Vec<FilmCard>,
}

/// A film card on the home page.
#[derive(Debug, Clone, Serialize)]
pub struct FilmCard {
    pub href: String,
    pub poster: Option<String>,
    pub year: Option<String>,
    pub title: String,
    pub original_title: Option<String>,
    pub original_title_romanised: Option<String>,
    pub director: Option<String>,
    pub producer: Option<String>,
    pub runtime: Option<String>,
    pub score: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FilmView {
    pub banner: Option<String>,
    pub title: String,
    pub original_title: Option<String>,
    pub original_title_romanised: Option<String>,
    pub info: Vec<InfoBox>,
    pub description: Option<String>,
    pub characters: Vec<CharacterCard>,
    pub tag_sections: Vec<TagSection>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InfoBox {
    pub label: &'static str,
    pub value: String,
}

/// Names of related records; an empty list renders as a single "None" tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagSection {
    pub title: &'static str,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CharacterCard {
    pub initials: String,
    pub avatar_class: &'static str,
    pub name: String,
    pub gender: Option<String>,
    pub age: Option<String>,
    pub eye_color: Option<String>,
    pub hair_color: Option<String>,
    pub species: Option<SpeciesLink>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeciesLink {
    pub name: String,
    pub href: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SpeciesView {
    pub name: String,
    pub hero_class: &'static str,
    pub subtitle: String,
    pub info: Vec<InfoBox>,
    pub characters: Vec<CharacterCard>,
    pub films: Vec<FilmChip>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilmChip {
    pub title: String,
    pub href: String,
}

/// Build the home page: every film, oldest first.
pub fn home_page(catalog: &Catalog, site: &SiteMeta) -> Page<HomeView> {
    let cards = catalog
        .films_by_release()
        .into_iter()
        .map(|film| FilmCard {
            href: film.href.trim_start_matches('/').to_string(),
            poster: first_present(&film.image, &film.movie_banner).map(|p| asset_path(p, 0)),
            year: present(&film.release_date),
            title: film.title.clone().unwrap_or_default(),
            original_title: present(&film.original_title),
            original_title_romanised: present(&film.original_title_romanised),
            director: present(&film.director),
            producer: present(&film.producer),
            runtime: present(&film.running_time).map(|t| format!("{t} mins")),
            score: present(&film.rt_score).map(|s| format_score(&s)),
            description: present(&film.description),
        })
        .collect();

    Page {
        layout: Layout {
            title: site.title.clone(),
            description: site.description.clone(),
            prefix: prefix_for_depth(0),
            header: Header::Home,
            decorations: true,
        },
        body: HomeView { cards },
    }
}

/// Build a film detail page.
pub fn film_page(film: &Film, catalog: &Catalog, site: &SiteMeta) -> Page<FilmView> {
    let prefix = prefix_for_depth(DETAIL_DEPTH);
    let title = film.title.clone().unwrap_or_default();

    let characters = film
        .people
        .iter()
        .filter_map(|id| catalog.person(id))
        .map(|person| character_card(person, Some(catalog), &prefix))
        .collect();

    let tag_sections = vec![
        TagSection {
            title: "Locations",
            tags: resolve_names(&film.locations, |id| catalog.location_name(id)),
        },
        TagSection {
            title: "Species",
            tags: resolve_names(&film.species, |id| {
                catalog.find_species(id).and_then(|s| s.name.as_deref())
            }),
        },
        TagSection {
            title: "Vehicles",
            tags: resolve_names(&film.vehicles, |id| catalog.vehicle_name(id)),
        },
    ];

    let mut info = Vec::new();
    push_info(&mut info, "Release Year", present(&film.release_date));
    push_info(&mut info, "Director", present(&film.director));
    push_info(&mut info, "Producer", present(&film.producer));
    push_info(
        &mut info,
        "Running Time",
        present(&film.running_time).map(|t| format!("{t} mins")),
    );
    push_info(
        &mut info,
        "RT Score",
        present(&film.rt_score).map(|s| format!("⭐ {}%", format_score(&s))),
    );

    let mut description = title.clone();
    if let Some(year) = present(&film.release_date) {
        description.push_str(&format!(" ({year})"));
    }
    if let Some(director) = present(&film.director) {
        description.push_str(&format!(" by {director}"));
    }

    Page {
        layout: Layout {
            title: format!("{} - {}", title, site.name),
            description,
            prefix,
            header: Header::Detail,
            decorations: false,
        },
        body: FilmView {
            banner: first_present(&film.movie_banner, &film.image)
                .map(|p| asset_path(p, DETAIL_DEPTH)),
            title,
            original_title: present(&film.original_title),
            original_title_romanised: present(&film.original_title_romanised),
            info,
            description: present(&film.description),
            characters,
            tag_sections,
        },
    }
}

/// Build a species detail page from the species' name-sorted people.
pub fn species_page(
    species: &Species,
    people: &[&Person],
    catalog: &Catalog,
    site: &SiteMeta,
) -> Page<SpeciesView> {
    let prefix = prefix_for_depth(DETAIL_DEPTH);
    let name = species.name.clone().unwrap_or_default();

    let films = catalog
        .films_featuring(species)
        .into_iter()
        .map(|film| FilmChip {
            title: film.title.clone().unwrap_or_default(),
            href: format!("{prefix}film/{}/", film.id),
        })
        .collect();

    let characters = people
        .iter()
        .map(|person| character_card(person, None, &prefix))
        .collect();

    Page {
        layout: Layout {
            title: format!("{name} - Species"),
            description: format!(
                "Characters and films for the {name} species from {} films.",
                site.name
            ),
            prefix: prefix.clone(),
            header: Header::Species,
            decorations: false,
        },
        body: SpeciesView {
            hero_class: hero_class(&species.classification),
            subtitle: or_default(&species.classification, "Unknown Classification"),
            info: vec![
                InfoBox {
                    label: "Classification",
                    value: or_default(&species.classification, "Unknown"),
                },
                InfoBox {
                    label: "Eye Colors",
                    value: or_default(&species.eye_colors, "Unknown"),
                },
                InfoBox {
                    label: "Hair Colors",
                    value: or_default(&species.hair_colors, "Unknown"),
                },
            ],
            name,
            characters,
            films,
        },
    }
}

/// Build a character card.
///
/// With a catalog the card gets a species row linking to the species page,
/// when the person's species resolves to a non-empty name.
pub fn character_card(person: &Person, catalog: Option<&Catalog>, prefix: &str) -> CharacterCard {
    let species = catalog.and_then(|catalog| {
        let id = person.species.as_deref()?;
        let name = catalog.find_species(id)?.name.as_deref()?;
        (!name.is_empty()).then(|| SpeciesLink {
            name: name.to_string(),
            href: format!("{prefix}species/{id}/"),
        })
    });

    CharacterCard {
        initials: initials(person.name.as_deref()),
        avatar_class: avatar_class(&person.gender),
        name: person.name.clone().unwrap_or_default(),
        gender: non_empty(&person.gender).map(capitalize_words),
        age: non_empty(&person.age).map(str::to_string),
        eye_color: non_blank(person.eye_color.as_deref()).map(capitalize_words),
        hair_color: non_blank(person.hair_color.as_deref()).map(capitalize_words),
        species,
    }
}

/// `../` repeated `depth` times.
pub fn prefix_for_depth(depth: usize) -> String {
    "../".repeat(depth)
}

/// A root-relative asset path as seen from a page `depth` levels down.
pub fn asset_path(path: &str, depth: usize) -> String {
    format!("{}{}", prefix_for_depth(depth), path.trim_start_matches('/'))
}

/// First and last initials, uppercased; `?` for a missing name.
pub fn initials(name: Option<&str>) -> String {
    let parts: Vec<&str> = name.unwrap_or("").split_whitespace().collect();
    let (Some(first), Some(last)) = (parts.first(), parts.last()) else {
        return "?".to_string();
    };

    let mut initials: String = first.chars().take(1).collect();
    if parts.len() > 1 {
        initials.extend(last.chars().take(1));
    }
    initials.to_uppercase()
}

/// Avatar style for a gender, case-insensitive.
pub fn avatar_class(gender: &str) -> &'static str {
    match gender.to_lowercase().as_str() {
        "female" => "avatar-female",
        "male" => "avatar-male",
        _ => "avatar-neutral",
    }
}

/// Hero banner style picked by keywords in a species classification.
pub fn hero_class(classification: &str) -> &'static str {
    let c = classification.to_lowercase();
    if c.contains("mammal") {
        "species-hero-mammal"
    } else if c.contains("spirit") || c.contains("god") {
        "species-hero-spirit"
    } else if c.contains("bird") || c.contains("avian") {
        "species-hero-bird"
    } else {
        "species-hero-default"
    }
}

/// Uppercase the first letter of each space-separated word, lowercase the rest.
pub fn capitalize_words(s: &str) -> String {
    s.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(c) => c.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Drop ids that do not resolve (or resolve to an empty name).
fn resolve_names<'a>(ids: &[String], lookup: impl Fn(&str) -> Option<&'a str>) -> Vec<String> {
    ids.iter()
        .filter_map(|id| lookup(id.as_str()))
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

fn push_info(info: &mut Vec<InfoBox>, label: &'static str, value: Option<String>) {
    if let Some(value) = value {
        info.push(InfoBox { label, value });
    }
}

/// Scores that parse as numbers are shown in canonical form ("095" -> "95").
fn format_score(score: &str) -> String {
    match score.trim().parse::<f64>() {
        Ok(n) if n.is_finite() => n.to_string(),
        _ => score.to_string(),
    }
}

fn present(value: &Option<String>) -> Option<String> {
    value.as_deref().and_then(non_empty).map(str::to_string)
}

fn first_present<'a>(a: &'a str, b: &'a str) -> Option<&'a str> {
    non_empty(a).or_else(|| non_empty(b))
}

fn non_empty(s: &str) -> Option<&str> {
    (!s.is_empty()).then_some(s)
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.trim().is_empty())
}

fn or_default(value: &str, fallback: &str) -> String {
    non_empty(value).unwrap_or(fallback).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ghibli_data::{CompleteBackup, Named};
    use pretty_assertions::assert_eq;

    fn catalog() -> Catalog {
        let backup: CompleteBackup = serde_json::from_value(serde_json::json!({
            "films": [
                {
                    "id": "f-totoro",
                    "title": "My Neighbor Totoro",
                    "original_title": "となりのトトロ",
                    "original_title_romanised": "Tonari no Totoro",
                    "image": "images/totoro.jpg",
                    "movie_banner": "/images/totoro-banner.jpg",
                    "director": "Hayao Miyazaki",
                    "release_date": "1988",
                    "running_time": "86",
                    "rt_score": "93",
                    "people": ["p-satsuki", "p-ghost", "p-totoro"],
                    "species": ["s-spirit", "s-ghost"],
                    "locations": [],
                    "vehicles": ["v-catbus"]
                },
                { "id": "f-castle", "title": "Castle in the Sky", "release_date": "1986" }
            ],
            "species": [
                { "id": "s-human", "name": "Human", "classification": "Mammal", "hair_colors": "Black" },
                { "id": "s-spirit", "name": "Totoro", "classification": "Spirit" }
            ],
            "people": [
                { "id": "p-satsuki", "name": "Satsuki Kusakabe", "gender": "FEMALE", "age": "11", "eye_color": "dark brown", "hair_color": "  ", "species": "s-human" },
                { "id": "p-totoro", "name": "Totoro", "gender": "NA", "age": "1300", "species": "s-spirit" },
                { "id": "p-mei", "name": "Mei Kusakabe", "gender": "Female", "species": "s-human" }
            ],
            "vehicles": [{ "id": "v-catbus", "name": "Catbus" }]
        }))
        .unwrap();
        Catalog::from_backup(backup)
    }

    #[test]
    fn single_word_name_has_one_initial() {
        assert_eq!(initials(Some("Totoro")), "T");
        assert_eq!(initials(Some("satsuki  kusakabe")), "SK");
        assert_eq!(initials(Some("Lusheeta Toel Ul Laputa")), "LL");
        assert_eq!(initials(None), "?");
        assert_eq!(initials(Some("   ")), "?");
    }

    #[test]
    fn picks_avatar_class_from_gender() {
        assert_eq!(avatar_class("Female"), "avatar-female");
        assert_eq!(avatar_class("MALE"), "avatar-male");
        assert_eq!(avatar_class("NA"), "avatar-neutral");
        assert_eq!(avatar_class(""), "avatar-neutral");
    }

    #[test]
    fn picks_hero_class_from_classification() {
        assert_eq!(hero_class("Mammal"), "species-hero-mammal");
        assert_eq!(hero_class("Forest God"), "species-hero-spirit");
        assert_eq!(hero_class("spirit"), "species-hero-spirit");
        assert_eq!(hero_class("Avian"), "species-hero-bird");
        assert_eq!(hero_class("Boar"), "species-hero-default");
        assert_eq!(hero_class(""), "species-hero-default");
    }

    #[test]
    fn capitalizes_each_word() {
        assert_eq!(capitalize_words("dark BROWN"), "Dark Brown");
        assert_eq!(capitalize_words("female"), "Female");
    }

    #[test]
    fn computes_depth_prefix() {
        assert_eq!(prefix_for_depth(0), "");
        assert_eq!(prefix_for_depth(2), "../../");
        assert_eq!(asset_path("/images/a.jpg", 2), "../../images/a.jpg");
        assert_eq!(asset_path("images/a.jpg", 0), "images/a.jpg");
    }

    #[test]
    fn home_page_sorts_and_formats_cards() {
        let catalog = catalog();

        let page = home_page(&catalog, &SiteMeta::default());

        let titles: Vec<&str> = page.body.cards.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Castle in the Sky", "My Neighbor Totoro"]);

        let totoro = &page.body.cards[1];
        assert_eq!(totoro.href, "film/f-totoro/");
        assert_eq!(totoro.poster.as_deref(), Some("images/totoro.jpg"));
        assert_eq!(totoro.runtime.as_deref(), Some("86 mins"));
        assert_eq!(totoro.score.as_deref(), Some("93"));
        assert_eq!(page.body.cards[0].poster, None);
        assert_eq!(page.body.cards[0].score, None);
        assert!(page.layout.decorations);
        assert_eq!(page.layout.prefix, "");
    }

    #[test]
    fn film_page_counts_only_resolved_characters() {
        let catalog = catalog();
        let film = &catalog.films()[0];

        let page = film_page(film, &catalog, &SiteMeta::default());

        assert_eq!(film.people.len(), 3);
        assert_eq!(page.body.characters.len(), 2);
        assert_eq!(page.body.characters[1].initials, "T");
    }

    #[test]
    fn film_page_resolves_tags() {
        let catalog = catalog();
        let film = &catalog.films()[0];

        let page = film_page(film, &catalog, &SiteMeta::default());

        assert_eq!(
            page.body.tag_sections,
            vec![
                TagSection {
                    title: "Locations",
                    tags: vec![]
                },
                TagSection {
                    title: "Species",
                    tags: vec!["Totoro".to_string()]
                },
                TagSection {
                    title: "Vehicles",
                    tags: vec!["Catbus".to_string()]
                },
            ]
        );
        assert_eq!(
            page.body.banner.as_deref(),
            Some("../../images/totoro-banner.jpg")
        );
        assert_eq!(page.layout.title, "My Neighbor Totoro - Studio Ghibli");
        assert_eq!(
            page.layout.description,
            "My Neighbor Totoro (1988) by Hayao Miyazaki"
        );
    }

    #[test]
    fn character_card_links_species() {
        let catalog = catalog();
        let satsuki = catalog.person("p-satsuki").unwrap();

        let card = character_card(satsuki, Some(&catalog), "../../");

        assert_eq!(
            card,
            CharacterCard {
                initials: "SK".to_string(),
                avatar_class: "avatar-female",
                name: "Satsuki Kusakabe".to_string(),
                gender: Some("Female".to_string()),
                age: Some("11".to_string()),
                eye_color: Some("Dark Brown".to_string()),
                hair_color: None,
                species: Some(SpeciesLink {
                    name: "Human".to_string(),
                    href: "../../species/s-human/".to_string(),
                }),
            }
        );
    }

    #[test]
    fn character_card_skips_unresolved_species() {
        let catalog = Catalog::from_records(
            vec![],
            vec![],
            vec![Person {
                id: "p1".to_string(),
                name: Some("Kiki".to_string()),
                species: Some("s-missing".to_string()),
                ..Default::default()
            }],
            Vec::<Named>::new(),
            Vec::<Named>::new(),
        );

        let card = character_card(&catalog.people()[0], Some(&catalog), "../../");

        assert_eq!(card.species, None);
    }

    #[test]
    fn species_page_defaults_unknown_fields() {
        let catalog = catalog();
        let human = catalog.find_species("s-human").unwrap();
        let people = catalog.people_of_species("s-human");

        let page = species_page(human, &people, &catalog, &SiteMeta::default());

        assert_eq!(page.body.hero_class, "species-hero-mammal");
        assert_eq!(
            page.body.info[1],
            InfoBox {
                label: "Eye Colors",
                value: "Unknown".to_string()
            }
        );
        assert_eq!(page.body.info[2].value, "Black");
        let names: Vec<&str> = page.body.characters.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Mei Kusakabe", "Satsuki Kusakabe"]);
        assert!(page.body.characters.iter().all(|c| c.species.is_none()));
        assert!(page.body.films.is_empty());
    }

    #[test]
    fn species_page_lists_featuring_films() {
        let catalog = catalog();
        let spirit = catalog.find_species("s-spirit").unwrap();
        let people = catalog.people_of_species("s-spirit");

        let page = species_page(spirit, &people, &catalog, &SiteMeta::default());

        assert_eq!(
            page.body.films,
            vec![FilmChip {
                title: "My Neighbor Totoro".to_string(),
                href: "../../film/f-totoro/".to_string(),
            }]
        );
        assert_eq!(page.layout.header, Header::Species);
        assert_eq!(page.body.subtitle, "Spirit");
    }
}
