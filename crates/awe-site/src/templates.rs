//! Template engine for rendering site pages.

use minijinja::{context, Environment};
use serde::{Deserialize, Serialize};

use awe_content::Source;

/// Site-wide metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteMeta {
    /// Site title
    pub title: String,
    /// Default description for pages without their own
    pub description: String,
    /// Absolute site URL without a trailing slash
    pub url: String,
    /// Author shown in the footer
    pub author: String,
}

impl Default for SiteMeta {
    fn default() -> Self {
        Self {
            title: "awe in everything".to_string(),
            description: "Essays on the wonder hiding in ordinary things.".to_string(),
            url: "https://aweineverything.com".to_string(),
            author: String::new(),
        }
    }
}

impl SiteMeta {
    /// Absolute URL for a site path starting with `/`.
    pub fn absolute(&self, path: &str) -> String {
        format!("{}{}", self.url.trim_end_matches('/'), path)
    }
}

/// A table of contents entry.
#[derive(Debug, Clone, Serialize)]
pub struct TocEntry {
    /// Heading text
    pub title: String,
    /// Anchor ID
    pub id: String,
    /// Heading level (1-6)
    pub level: u8,
}

/// An essay as listed on the index page.
#[derive(Debug, Clone, Serialize)]
pub struct EssaySummary {
    pub slug: String,
    pub title: String,
    pub description: String,
    /// Site-relative URL (`/slug/`)
    pub url: String,
    /// ISO 8601 publish time
    pub date_iso: String,
    /// Human-readable publish date
    pub date_display: String,
    pub draft: bool,
}

/// Context for rendering an essay page.
#[derive(Debug, Clone, Serialize)]
pub struct EssayPage {
    #[serde(flatten)]
    pub summary: EssaySummary,
    /// Rendered body HTML
    pub content: String,
    /// Table of contents
    pub toc: Vec<TocEntry>,
    /// Cited sources
    pub sources: Vec<Source>,
    /// Web Component scripts to include, one per widget type
    pub scripts: Vec<String>,
}

/// Template engine using minijinja.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create a new template engine with default templates.
    pub fn new() -> Self {
        let mut env = Environment::new();

        env.add_template_owned("base.html".to_string(), BASE_TEMPLATE.to_string())
            .expect("Failed to add base template");
        env.add_template_owned("essay.html".to_string(), ESSAY_TEMPLATE.to_string())
            .expect("Failed to add essay template");
        env.add_template_owned("index.html".to_string(), INDEX_TEMPLATE.to_string())
            .expect("Failed to add index template");
        env.add_template_owned("404.html".to_string(), NOT_FOUND_TEMPLATE.to_string())
            .expect("Failed to add 404 template");

        Self { env }
    }

    /// Render an essay page.
    pub fn render_essay(
        &self,
        site: &SiteMeta,
        page: &EssayPage,
        hmr: bool,
    ) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template("essay.html")?;
        let essay = &page.summary;

        tmpl.render(context! {
            site => site,
            essay => page,
            page_title => format!("{} | {}", essay.title, site.title),
            description => &essay.description,
            canonical => site.absolute(&essay.url),
            og_type => "article",
            og_title => &essay.title,
            og_image => site.absolute(&format!("{}index.png", essay.url)),
            scripts => &page.scripts,
            hmr => hmr,
        })
    }

    /// Render the index page listing essays.
    pub fn render_index(
        &self,
        site: &SiteMeta,
        essays: &[EssaySummary],
        hmr: bool,
    ) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template("index.html")?;

        tmpl.render(context! {
            site => site,
            essays => essays,
            page_title => &site.title,
            description => &site.description,
            canonical => site.absolute("/"),
            og_type => "website",
            og_title => &site.title,
            og_image => site.absolute("/og.png"),
            hmr => hmr,
        })
    }

    /// Render the not-found page.
    pub fn render_not_found(&self, site: &SiteMeta, hmr: bool) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template("404.html")?;

        tmpl.render(context! {
            site => site,
            page_title => format!("Not found | {}", site.title),
            description => &site.description,
            canonical => site.absolute("/404.html"),
            og_type => "website",
            og_title => &site.title,
            og_image => site.absolute("/og.png"),
            hmr => hmr,
        })
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

const BASE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{ page_title }}</title>
  <meta name="description" content="{{ description }}">
  <link rel="canonical" href="{{ canonical }}">
  <meta property="og:type" content="{{ og_type }}">
  <meta property="og:site_name" content="{{ site.title }}">
  <meta property="og:title" content="{{ og_title }}">
  <meta property="og:description" content="{{ description }}">
  <meta property="og:url" content="{{ canonical }}">
  <meta property="og:image" content="{{ og_image }}">
  <meta property="og:image:width" content="1200">
  <meta property="og:image:height" content="630">
  <meta name="twitter:card" content="summary_large_image">
  <meta name="twitter:title" content="{{ og_title }}">
  <meta name="twitter:description" content="{{ description }}">
  <meta name="twitter:image" content="{{ og_image }}">
  <link rel="sitemap" href="/sitemap.xml">
  <link rel="stylesheet" href="/assets/main.css">
  {% block head %}{% endblock %}
</head>
<body>
  <header class="site-header">
    <a href="/" class="site-title">{{ site.title }}</a>
  </header>
  <main class="main">
    {% block content %}{% endblock %}
  </main>
  <footer class="site-footer">
    {% if site.author %}{{ site.author }} &middot; {% endif %}<a href="/">{{ site.title }}</a>
  </footer>
  <script src="/assets/main.js" defer></script>
  {% for script in scripts %}
  <script type="module">{{ script | safe }}</script>
  {% endfor %}
  {% if hmr %}<script src="/__hmr.js"></script>{% endif %}
</body>
</html>"##;

const ESSAY_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block head %}
  <meta property="article:published_time" content="{{ essay.date_iso }}">
{% endblock %}

{% block content %}
<article class="essay">
  <header class="essay-header">
    <h1>{{ essay.title }}</h1>
    <time datetime="{{ essay.date_iso }}">{{ essay.date_display }}</time>
  </header>

  {% if essay.toc %}
  <nav class="toc" aria-label="Table of contents">
    <ul>
    {% for entry in essay.toc %}
      <li class="toc-level-{{ entry.level }}">
        <a href="#{{ entry.id }}">{{ entry.title }}</a>
      </li>
    {% endfor %}
    </ul>
  </nav>
  {% endif %}

  <div class="content">
    {{ essay.content | safe }}
  </div>

  {% if essay.sources %}
  <section class="sources">
    <h2>Sources</h2>
    <ol>
    {% for source in essay.sources %}
      <li><a href="{{ source.url }}" rel="noopener">{{ source.title }}</a></li>
    {% endfor %}
    </ol>
  </section>
  {% endif %}
</article>
{% endblock %}"##;

const INDEX_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
<ul class="essay-list">
{% for essay in essays %}
  <li>
    <time datetime="{{ essay.date_iso }}">{{ essay.date_display }}</time>
    <h2><a href="{{ essay.url }}">{{ essay.title }}</a>{% if essay.draft %} <small>(draft)</small>{% endif %}</h2>
    <p>{{ essay.description }}</p>
  </li>
{% else %}
  <li>No essays yet.</li>
{% endfor %}
</ul>
{% endblock %}"##;

const NOT_FOUND_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
<section class="not-found">
  <h1>Not found</h1>
  <p>There is nothing here. <a href="/">Back to the essays</a>.</p>
</section>
{% endblock %}"##;

#[cfg(test)]
mod tests {
    use super::*;

    /// minijinja escapes `/` in HTML output.
    fn unescape_slashes(html: String) -> String {
        html.replace("&#x2f;", "/")
    }

    fn summary(title: &str) -> EssaySummary {
        EssaySummary {
            slug: "how-computers-work".to_string(),
            title: title.to_string(),
            description: "From switches to gates".to_string(),
            url: "/how-computers-work/".to_string(),
            date_iso: "2025-03-05T00:00:00+00:00".to_string(),
            date_display: "March 5, 2025".to_string(),
            draft: false,
        }
    }

    fn page(title: &str) -> EssayPage {
        EssayPage {
            summary: summary(title),
            content: "<p>Hello world</p>".to_string(),
            toc: vec![],
            sources: vec![],
            scripts: vec![],
        }
    }

    #[test]
    fn renders_essay_page() {
        let engine = TemplateEngine::new();
        let html = unescape_slashes(
            engine
                .render_essay(&SiteMeta::default(), &page("How computers work"), false)
                .unwrap(),
        );

        assert!(html.contains("<title>How computers work | awe in everything</title>"));
        assert!(html.contains("<p>Hello world</p>"));
        assert!(html.contains(r#"<time datetime="2025-03-05T00:00:00+00:00">March 5, 2025</time>"#));
        assert!(html.contains(
            r#"<meta property="og:image" content="https://aweineverything.com/how-computers-work/index.png">"#
        ));
        assert!(html.contains(r#"<meta name="twitter:card" content="summary_large_image">"#));
        assert!(!html.contains("__hmr.js"));
    }

    #[test]
    fn escapes_titles() {
        let engine = TemplateEngine::new();
        let html = engine
            .render_essay(&SiteMeta::default(), &page("Bits & <Bytes>"), false)
            .unwrap();

        assert!(html.contains("Bits &amp; &lt;Bytes&gt;"));
    }

    #[test]
    fn renders_toc_and_sources() {
        let engine = TemplateEngine::new();
        let mut page = page("Gates");
        page.toc = vec![TocEntry {
            title: "The AND gate".to_string(),
            id: "the-and-gate".to_string(),
            level: 2,
        }];
        page.sources = vec![Source {
            title: "Code".to_string(),
            url: "https://example.com/code".to_string(),
        }];

        let html = unescape_slashes(engine.render_essay(&SiteMeta::default(), &page, false).unwrap());

        assert!(html.contains(r##"<a href="#the-and-gate">The AND gate</a>"##));
        assert!(html.contains("<h2>Sources</h2>"));
        assert!(html.contains("https://example.com/code"));
    }

    #[test]
    fn includes_widget_scripts_and_hmr() {
        let engine = TemplateEngine::new();
        let mut page = page("Test");
        page.scripts = vec!["class AweCounter extends HTMLElement {}".to_string()];

        let html = engine.render_essay(&SiteMeta::default(), &page, true).unwrap();

        assert!(html.contains(r#"<script type="module">class AweCounter extends HTMLElement {}</script>"#));
        assert!(html.contains(r#"<script src="/__hmr.js"></script>"#));
    }

    #[test]
    fn renders_index_and_empty_state() {
        let engine = TemplateEngine::new();
        let site = SiteMeta::default();

        let html = unescape_slashes(engine.render_index(&site, &[summary("Gates")], false).unwrap());
        assert!(html.contains(r#"<a href="/how-computers-work/">Gates</a>"#));
        assert!(html.contains(r#"content="https://aweineverything.com/og.png""#));

        let empty = engine.render_index(&site, &[], false).unwrap();
        assert!(empty.contains("No essays yet."));
    }

    #[test]
    fn renders_not_found() {
        let html = TemplateEngine::new()
            .render_not_found(&SiteMeta::default(), false)
            .unwrap();
        assert!(html.contains("<title>Not found | awe in everything</title>"));
    }
}
