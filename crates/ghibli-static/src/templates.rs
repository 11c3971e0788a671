//! Template engine for rendering site pages.

use std::fmt::Write as _;

use minijinja::{context, Environment, ErrorKind, Output, State, Value};
use serde::Serialize;

use crate::pages::{Page, SiteMeta};

/// Template engine using minijinja.
///
/// Every template is HTML; string values are escaped on output unless
/// marked safe.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create a new template engine with the built-in templates.
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_formatter(html_formatter);

        for (name, source) in TEMPLATES {
            env.add_template(name, source)
                .unwrap_or_else(|e| panic!("Failed to add template {name}: {e}"));
        }

        Self { env }
    }

    /// Render a page using the specified template.
    pub fn render_page<T: Serialize>(
        &self,
        template: &str,
        site: &SiteMeta,
        page: &Page<T>,
    ) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template(template)?;

        tmpl.render(context! {
            site => site,
            page => &page.layout,
            body => &page.body,
        })
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Escape text for use in HTML content and quoted attribute values.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn html_formatter(
    out: &mut Output<'_>,
    state: &State<'_, '_>,
    value: &Value,
) -> Result<(), minijinja::Error> {
    match value.as_str() {
        Some(s) if !value.is_safe() => out
            .write_str(&escape_html(s))
            .map_err(|e| minijinja::Error::new(ErrorKind::WriteFailure, e.to_string())),
        _ => minijinja::escape_formatter(out, state, value),
    }
}

const TEMPLATES: [(&str, &str); 7] = [
    ("base.html", BASE_TEMPLATE),
    ("header.html", HEADER_TEMPLATE),
    ("decorations.html", DECORATIONS_TEMPLATE),
    ("character_card.html", CHARACTER_CARD_TEMPLATE),
    ("home.html", HOME_TEMPLATE),
    ("film.html", FILM_TEMPLATE),
    ("species.html", SPECIES_TEMPLATE),
];

const BASE_TEMPLATE: &str = r##"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{ page.title }}</title>
  <meta name="description" content="{{ page.description }}">
  <link rel="stylesheet" href="{{ page.prefix }}{{ site.stylesheet }}">
  {% if page.decorations and site.decoration_script %}<script defer src="{{ page.prefix }}{{ site.decoration_script }}"></script>{% endif %}
</head>
<body>
  {% if page.decorations %}{% include "decorations.html" %}{% endif %}

  {% include "header.html" %}

  <main class="container">
    {% block content %}{% endblock %}
  </main>

  <footer>
    <div class="container">
      <p>Data provided by <a href="{{ site.attribution_url }}" target="_blank" rel="noopener">{{ site.attribution_name }}</a></p>
      <p>{{ site.copyright }}</p>
    </div>
  </footer>
</body>
</html>"##;

const HEADER_TEMPLATE: &str = r##"<header>
{% if page.header == "detail" %}
  <div class="container">
    <h1 class="logo">{{ site.logo }}</h1>
    <a href="{{ page.prefix }}" class="back-btn">← Back to All Films</a>
  </div>
{% elif page.header == "species" %}
  <div class="container header-with-buttons">
    <h1 class="logo">{{ site.logo }}</h1>
    <div class="species-header-buttons">
      <a href="{{ page.prefix }}" class="back-btn">← All Films</a>
      <a href="javascript:history.back()" class="back-btn">← Back</a>
    </div>
  </div>
{% else %}
  <div class="container">
    <h1 class="logo">{{ site.logo }}</h1>
    <p class="tagline">{{ site.tagline }}</p>
  </div>
{% endif %}
</header>"##;

const DECORATIONS_TEMPLATE: &str = r##"<div class="clouds" aria-hidden="true"></div>

<div class="soot-sprites decorations" aria-hidden="true">
  {% for n in range(6) %}<div class="soot-sprite"><div class="soot-limbs"></div></div>
  {% endfor %}
</div>

<!-- kodama -->
<div class="kodama-container decorations" aria-hidden="true">
  {% for n in range(3) %}<div class="kodama"></div>
  {% endfor %}
</div>

<div class="leaves decorations" aria-hidden="true">
  {% for n in range(4) %}<div class="leaf"></div>
  {% endfor %}
</div>"##;

const CHARACTER_CARD_TEMPLATE: &str = r##"<div class="character-card">
  <div class="character-avatar {{ card.avatar_class }}">{{ card.initials }}</div>
  <h4>{{ card.name }}</h4>
  <div class="character-details">
    {% if card.gender %}
    <div class="character-detail-item">
      <span class="detail-label">Gender:</span>
      <span class="detail-value">{{ card.gender }}</span>
    </div>
    {% endif %}
    {% if card.age %}
    <div class="character-detail-item">
      <span class="detail-label">Age:</span>
      <span class="detail-value">{{ card.age }}</span>
    </div>
    {% endif %}
    {% if card.eye_color %}
    <div class="character-detail-item">
      <span class="detail-label">Eye Color:</span>
      <span class="detail-value">{{ card.eye_color }}</span>
    </div>
    {% endif %}
    {% if card.hair_color %}
    <div class="character-detail-item">
      <span class="detail-label">Hair Color:</span>
      <span class="detail-value">{{ card.hair_color }}</span>
    </div>
    {% endif %}
    {% if card.species %}
    <div class="character-detail-item">
      <span class="detail-label">Species:</span>
      <span class="detail-value"><a href="{{ card.species.href }}" class="species-link">{{ card.species.name }}</a></span>
    </div>
    {% endif %}
  </div>
</div>"##;

const HOME_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
<section class="films-grid" aria-label="Films">
{% for card in body.cards %}
  <article class="film-card">
    <a class="film-link" href="{{ card.href }}">
      {% if card.poster %}
      <img src="{{ card.poster }}" alt="{{ card.title }}" class="film-image" loading="lazy" decoding="async">
      {% endif %}
      <div class="film-content">
        {% if card.year %}<div class="release-year">{{ card.year }}</div>{% endif %}

        <h2 class="film-title">{{ card.title }}</h2>

        {% if card.original_title %}
        <div class="original-title">
          {{ card.original_title }}{% if card.original_title_romanised %} ({{ card.original_title_romanised }}){% endif %}
        </div>
        {% endif %}

        <div class="film-info">
          {% if card.director %}
          <div class="info-item">
            <span class="info-label">Director:</span>
            <span>{{ card.director }}</span>
          </div>
          {% endif %}
          {% if card.producer %}
          <div class="info-item">
            <span class="info-label">Producer:</span>
            <span>{{ card.producer }}</span>
          </div>
          {% endif %}
          {% if card.runtime %}
          <div class="info-item">
            <span class="info-label">Runtime:</span>
            <span>{{ card.runtime }}</span>
          </div>
          {% endif %}
          {% if card.score %}
          <div class="info-item">
            <span class="rt-score">⭐ {{ card.score }}%</span>
          </div>
          {% endif %}
        </div>

        {% if card.description %}
        <div class="description">
          {{ card.description }}
        </div>
        {% endif %}
      </div>
    </a>
  </article>
{% endfor %}
</section>
{% endblock %}"##;

const FILM_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
<article class="film-detail">
  {% if body.banner %}
  <div class="detail-hero">
    <img class="detail-banner" src="{{ body.banner }}" alt="{{ body.title }}" loading="lazy" decoding="async">
  </div>
  {% endif %}

  <div class="detail-header">
    <h2>{{ body.title }}</h2>
    {% if body.original_title %}
    <div class="detail-original-title">
      {{ body.original_title }}{% if body.original_title_romanised %} ({{ body.original_title_romanised }}){% endif %}
    </div>
    {% endif %}

    <div class="info-grid">
      {% for box in body.info %}
      <div class="info-box">
        <div class="info-box-label">{{ box.label }}</div>
        <div class="info-box-value">{{ box.value }}</div>
      </div>
      {% endfor %}
    </div>

    {% if body.description %}
    <div class="detail-description">
      {{ body.description }}
    </div>
    {% endif %}
  </div>

  <section class="characters-section">
    <h3 class="section-title">Characters ({{ body.characters|length }})</h3>
    <div class="characters-grid">
      {% for card in body.characters %}
        {% include "character_card.html" %}
      {% else %}
      <p style="text-align: center; grid-column: 1 / -1; color: var(--text-dark);">No character information available for this film.</p>
      {% endfor %}
    </div>
  </section>

  <section class="additional-section">
    <h3 class="section-title">Additional Information</h3>
    {% for section in body.tag_sections %}
    <div class="info-section">
      <h4>{{ section.title }} ({{ section.tags|length }})</h4>
      <div class="info-list">
        {% for tag in section.tags %}<div class="info-tag">{{ tag }}</div>{% else %}<div class="info-tag">None</div>{% endfor %}
      </div>
    </div>
    {% endfor %}
  </section>
</article>
{% endblock %}"##;

const SPECIES_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
<section class="species-detail">
  <div class="species-hero {{ body.hero_class }}">
    <div class="species-hero-content">
      <h2 class="species-hero-title">{{ body.name }}</h2>
      <p class="species-hero-subtitle">{{ body.subtitle }}</p>
    </div>
  </div>

  <div class="detail-header">
    <h2>{{ body.name }}</h2>

    <div class="info-grid">
      {% for box in body.info %}
      <div class="info-box">
        <div class="info-box-label">{{ box.label }}</div>
        <div class="info-box-value">{{ box.value }}</div>
      </div>
      {% endfor %}
    </div>
  </div>

  <section class="characters-section">
    <h3 class="section-title">Characters of this Species ({{ body.characters|length }})</h3>
    <div class="characters-grid">
      {% for card in body.characters %}
        {% include "character_card.html" %}
      {% else %}
      <p style="text-align: center; grid-column: 1 / -1; color: var(--text-dark);">No character information available.</p>
      {% endfor %}
    </div>
  </section>

  <section class="additional-section">
    <h3 class="section-title">Films Featuring this Species</h3>
    <div class="info-list">
      {% for film in body.films %}
      <a href="{{ film.href }}" class="info-tag" style="text-decoration: none; cursor: pointer;">{{ film.title }}</a>
      {% else %}
      <div class="info-tag">None</div>
      {% endfor %}
    </div>
  </section>
</section>
{% endblock %}"##;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::{Header, Layout};

    fn page<T>(header: Header, decorations: bool, body: T) -> Page<T> {
        Page {
            layout: Layout {
                title: "Tom & <Jerry>".to_string(),
                description: "It's \"quoted\"".to_string(),
                prefix: "../../".to_string(),
                header,
                decorations,
            },
            body,
        }
    }

    #[derive(Serialize)]
    struct Empty {
        cards: Vec<()>,
    }

    #[test]
    fn escapes_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
    }

    #[test]
    fn renders_layout_with_escaped_head() {
        let engine = TemplateEngine::new();
        let site = SiteMeta::default();

        let html = engine
            .render_page("home.html", &site, &page(Header::Detail, false, Empty { cards: vec![] }))
            .unwrap();

        assert!(html.contains("<title>Tom &amp; &lt;Jerry&gt;</title>"));
        assert!(html.contains(r#"content="It&#39;s &quot;quoted&quot;""#));
        assert!(html.contains(r#"href="../../styles.css""#));
        assert!(html.contains("Back to All Films"));
        assert!(!html.contains("soot-sprite"));
        assert!(!html.contains("soot.js"));
    }

    #[test]
    fn home_header_carries_decorations() {
        let engine = TemplateEngine::new();
        let site = SiteMeta::default();
        let mut home = page(Header::Home, true, Empty { cards: vec![] });
        home.layout.prefix = String::new();

        let html = engine.render_page("home.html", &site, &home).unwrap();

        assert!(html.contains(r#"<script defer src="soot.js"></script>"#));
        assert_eq!(html.matches(r#"<div class="soot-sprite">"#).count(), 6);
        assert_eq!(html.matches(r#"<div class="kodama">"#).count(), 3);
        assert!(html.contains(&site.tagline));
        assert!(html.contains(r#"href="https://ghibliapi.vercel.app/""#));
    }

    #[test]
    fn species_header_has_two_buttons() {
        let engine = TemplateEngine::new();
        let site = SiteMeta::default();

        let html = engine
            .render_page("home.html", &site, &page(Header::Species, false, Empty { cards: vec![] }))
            .unwrap();

        assert!(html.contains("← All Films"));
        assert!(html.contains("history.back()"));
    }
}
