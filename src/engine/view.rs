//! Data-to-view transformation for the listing and detail pages.
//!
//! Everything here is pure: a record plus a language goes in, display
//! fields and markup come out. The `ui` layer mounts the markup and wires
//! listeners onto it.

use std::fmt::Write;

use crate::engine::models::{AppRecord, Catalog, ScreenshotSet};
use crate::env::SiteConfig;
use crate::engine::i18n::I18n;
use crate::util::{encode_component, escape_html, svg_fallback};

pub const PLATFORM_LABEL: &str = "Android";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub class: &'static str,
    pub text: String,
}

impl Badge {
    fn new(class: &'static str, text: impl Into<String>) -> Self {
        Self {
            class,
            text: text.into(),
        }
    }
}

/// Icon source plus the placeholder swapped in if it fails to load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconView {
    pub src: String,
    pub fallback_src: String,
}

impl IconView {
    fn for_record(record: &AppRecord) -> Self {
        let fallback_src = svg_fallback(record.fallback_label());
        let src = record
            .icon
            .as_deref()
            .filter(|icon| !icon.is_empty())
            .map_or_else(|| fallback_src.clone(), str::to_owned);
        Self { src, fallback_src }
    }
}

/// Screenshot strip; each thumbnail opens the viewer at its own index over
/// the full list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GalleryView {
    pub urls: Vec<String>,
    pub thumb_labels: Vec<String>,
}

impl GalleryView {
    fn new(urls: &[String], i18n: I18n<'_>) -> Self {
        Self {
            urls: urls.to_vec(),
            thumb_labels: (1..=urls.len()).map(|n| i18n.open_screenshot(n)).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    /// Thumbnail buttons, each tagged with `data-idx`.
    pub fn thumbs_markup(&self, button_class: &str) -> String {
        let mut out = String::new();
        for (idx, (src, label)) in self.urls.iter().zip(&self.thumb_labels).enumerate() {
            let _ = write!(
                out,
                r#"<button class="{button_class}" type="button" data-idx="{idx}" aria-label="{label}"><img src="{src}" loading="eager" decoding="async" fetchpriority="low" width="220" height="464" alt=""></button>"#,
                label = escape_html(label),
                src = escape_html(src),
            );
        }
        out
    }
}

/// Parse a thumbnail's `data-idx`; anything unparseable means the first image.
pub fn thumb_index(raw: Option<&str>) -> isize {
    raw.and_then(|raw| raw.trim().parse().ok()).unwrap_or(0)
}

fn play_icon(size: u32) -> String {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{size}" height="{size}" viewBox="0 0 24 24" fill="currentColor"><path d="M3 2.5c0-1 1.1-1.6 2-1.1l15 8.5c.9.5.9 1.8 0 2.3l-15 8.5c-.9.5-2-.1-2-1.1V2.5Z"/></svg>"#
    )
}

fn badges_markup(badges: &[Badge]) -> String {
    let mut out = String::new();
    for badge in badges {
        let _ = write!(
            out,
            r#"<span class="{}">{}</span>"#,
            badge.class,
            escape_html(&badge.text)
        );
    }
    out
}

fn store_button(href: &str, label: &str, icon_size: u32) -> String {
    format!(
        r#"<a class="btn" href="{href}" target="_blank" rel="noopener"><span class="btn-icon" aria-hidden="true">{icon}</span><span>{label}</span></a>"#,
        href = escape_html(href),
        icon = play_icon(icon_size),
        label = escape_html(label),
    )
}

/// Relative link to the detail page for `id`.
pub fn detail_href(config: &SiteConfig, id: &str) -> String {
    format!("{}?id={}", config.detail_page, encode_component(id))
}

/// `id` from a query string such as `?id=notes&ref=x`.
pub fn detail_id_from_search(search: &str) -> Option<String> {
    url::form_urlencoded::parse(search.trim_start_matches('?').as_bytes())
        .find(|(key, _)| key == "id")
        .map(|(_, value)| value.into_owned())
}

/// Page regions hidden when the requested app does not exist.
pub const NOT_FOUND_HIDDEN: [&str; 2] = [".app-tabs", ".app-gallery-panel"];

/// What the detail page shows for a query string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DetailOutcome<'a> {
    Found { id: &'a str, record: &'a AppRecord },
    NotFound,
}

impl DetailOutcome<'_> {
    pub fn hidden_regions(&self) -> &'static [&'static str] {
        match self {
            DetailOutcome::Found { .. } => &[],
            DetailOutcome::NotFound => &NOT_FOUND_HIDDEN,
        }
    }
}

/// Look up the `id` query parameter. A missing, empty or unknown id is
/// not found.
pub fn resolve_detail<'a>(search: &str, catalog: &'a Catalog) -> DetailOutcome<'a> {
    detail_id_from_search(search)
        .and_then(|id| catalog.by_id.get_key_value(id.as_str()))
        .map_or(DetailOutcome::NotFound, |(id, record)| DetailOutcome::Found {
            id: id.as_str(),
            record,
        })
}

#[derive(Debug, Clone, PartialEq)]
pub struct CardView {
    pub id: String,
    pub title: String,
    pub category: String,
    pub description: String,
    pub icon: IconView,
    pub detail_href: String,
    pub store_href: String,
    pub store_label: String,
    pub details_label: String,
    pub badges: Vec<Badge>,
    pub gallery: GalleryView,
    pub gallery_label: String,
}

impl CardView {
    pub fn build(
        id: &str,
        record: &AppRecord,
        screenshots: &ScreenshotSet,
        i18n: I18n<'_>,
        config: &SiteConfig,
    ) -> Self {
        let language = i18n.language();

        let mut badges = vec![Badge::new("badge", PLATFORM_LABEL)];
        if record.is_top {
            badges.push(Badge::new("pill pill-top", i18n.pill_top()));
        }
        if record.is_new {
            badges.push(Badge::new("pill pill-new", i18n.pill_new()));
        }
        if let Some(metrics) = &record.metrics {
            if let Some(rating) = &metrics.rating {
                badges.push(Badge::new("badge badge-metric", format!("★ {rating}")));
            }
            if let Some(installs) = metrics
                .installs
                .as_ref()
                .map(ToString::to_string)
                .filter(|s| !s.is_empty())
            {
                badges.push(Badge::new("badge badge-metric", installs));
            }
        }

        Self {
            id: id.to_owned(),
            title: record.display_title(language).to_owned(),
            category: record.category.text(language).to_owned(),
            description: record.desc.text(language).to_owned(),
            icon: IconView::for_record(record),
            detail_href: detail_href(config, id),
            store_href: record.link.clone(),
            store_label: i18n.open_in_store().to_owned(),
            details_label: i18n.view_details().to_owned(),
            badges,
            gallery: GalleryView::new(screenshots.for_app(id, language), i18n),
            gallery_label: i18n.screenshots_label().to_owned(),
        }
    }

    /// Inner markup of the `<article class="card">` element.
    pub fn markup(&self) -> String {
        let title = escape_html(&self.title);
        let detail = escape_html(&self.detail_href);
        let mut out = String::new();

        let _ = write!(
            out,
            r#"<div class="app-head"><img class="icon" width="72" height="72" alt="{title}" src="{icon}" loading="lazy" decoding="async"><div class="app-meta"><h3 class="title"><a class="title-link" href="{detail}">{title}</a></h3><div class="meta-row">{badges}</div><div class="category">{category}</div></div></div><p class="desc">{desc}</p>"#,
            icon = escape_html(&self.icon.src),
            badges = badges_markup(&self.badges),
            category = escape_html(&self.category),
            desc = escape_html(&self.description),
        );

        if !self.gallery.is_empty() {
            let _ = write!(
                out,
                r#"<div class="shots-strip" aria-label="{}">{}</div>"#,
                escape_html(&self.gallery_label),
                self.gallery.thumbs_markup("shot-thumb"),
            );
        }

        let _ = write!(
            out,
            r#"<div class="actions">{store}<a class="btn btn-ghost" href="{detail}">{details}</a></div>"#,
            store = store_button(&self.store_href, &self.store_label, 16),
            details = escape_html(&self.details_label),
        );
        out
    }
}

/// Cards for every resolvable id in display order.
pub fn listing_cards(
    catalog: &Catalog,
    screenshots: &ScreenshotSet,
    i18n: I18n<'_>,
    config: &SiteConfig,
) -> Vec<CardView> {
    catalog
        .ordered()
        .map(|(id, record)| CardView::build(id, record, screenshots, i18n, config))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoRow {
    pub label: String,
    pub value: String,
}

fn info_rows(record: &AppRecord, i18n: I18n<'_>) -> Vec<InfoRow> {
    let language = i18n.language();
    let info = &record.info;
    let text = |value: &Option<String>| value.clone().unwrap_or_default();

    [
        (i18n.info_category(), record.category.text(language).to_owned()),
        (i18n.info_android(), text(&info.min_android)),
        (i18n.info_size(), text(&info.size)),
        (i18n.info_iap(), i18n.yes_no(info.in_app).to_owned()),
        (i18n.info_offline(), i18n.yes_no(info.offline).to_owned()),
        (i18n.info_updated(), text(&info.updated)),
        (i18n.info_privacy(), info.privacy.text(language).to_owned()),
        (i18n.info_data(), info.data.text(language).to_owned()),
    ]
    .into_iter()
    .map(|(label, value)| InfoRow {
        label: label.to_owned(),
        value,
    })
    .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    pub id: String,
    pub title: String,
    pub page_title: String,
    pub icon: IconView,
    pub badges: Vec<Badge>,
    pub category: String,
    pub short: String,
    pub long: String,
    pub features: Vec<String>,
    pub info: Vec<InfoRow>,
    pub gallery: GalleryView,
    pub store_href: String,
    pub store_label: String,
    pub back_label: String,
}

impl DetailView {
    pub fn build(
        id: &str,
        record: &AppRecord,
        screenshots: &ScreenshotSet,
        i18n: I18n<'_>,
        config: &SiteConfig,
    ) -> Self {
        let language = i18n.language();
        let title = record.display_title(language).to_owned();

        let mut badges = vec![Badge::new("badge", PLATFORM_LABEL)];
        if record.is_top {
            badges.push(Badge::new("pill pill-top", i18n.pill_top()));
        }
        if record.is_new {
            badges.push(Badge::new("pill pill-new", i18n.pill_new()));
        }

        Self {
            id: id.to_owned(),
            page_title: format!("{title} — {}", config.site_name),
            title,
            icon: IconView::for_record(record),
            badges,
            category: record.category.text(language).to_owned(),
            short: record.short.text(language).to_owned(),
            long: record.long.text(language).to_owned(),
            features: record.feature_list(language).to_vec(),
            info: info_rows(record, i18n),
            gallery: GalleryView::new(screenshots.for_app(id, language), i18n),
            store_href: record.link.clone(),
            store_label: i18n.open_in_store().to_owned(),
            back_label: i18n.back_to_apps().to_owned(),
        }
    }

    /// Markup for `#app-hero`.
    pub fn hero_markup(&self) -> String {
        let title = escape_html(&self.title);
        format!(
            r#"<div class="app-hero-head"><img class="icon icon-large" src="{icon}" alt="{title}" width="96" height="96" loading="lazy" decoding="async"><div class="app-hero-meta"><h1 class="app-hero-title">{title}</h1><div class="meta-row">{badges}</div><div class="category">{category}</div></div></div><p class="app-hero-short">{short}</p><div class="actions app-hero-actions">{store}</div>"#,
            icon = escape_html(&self.icon.src),
            badges = badges_markup(&self.badges),
            category = escape_html(&self.category),
            short = escape_html(&self.short),
            store = store_button(&self.store_href, &self.store_label, 18),
        )
    }

    /// Markup for `#app-cta-secondary`; the button is wired to history.back.
    pub fn back_markup(&self) -> String {
        format!(
            r#"<button class="btn btn-wide btn-ghost" type="button" data-history-back><span>{}</span></button>"#,
            escape_html(&self.back_label)
        )
    }
}

/// Hero replacement when the requested id is unknown.
pub fn not_found_markup(i18n: I18n<'_>, config: &SiteConfig) -> String {
    format!(
        r#"<p>{} <a href="{}">{}</a></p>"#,
        escape_html(i18n.not_found()),
        escape_html(&config.listing_page),
        escape_html(i18n.back_to_main()),
    )
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::engine::models::TranslationTable;
    use crate::engine::state::{Language, LightboxState};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    pub(crate) fn sample_catalog() -> Catalog {
        serde_json::from_value(json!({
            "order": ["a", "missing", "b"],
            "byId": {
                "a": {
                    "title": {"uk": "Нотатки", "en": "Notes"},
                    "desc": {"en": "Quick notes"},
                    "short": {"en": "Notes, fast", "uk": "Швидкі нотатки"},
                    "long": {"en": "A long story about notes."},
                    "category": {"en": "Productivity", "uk": "Продуктивність"},
                    "features": {"en": ["Sync", "Tags"]},
                    "icon": "/assets/a.png",
                    "link": "https://play.google.com/store/apps/details?id=a",
                    "isTop": true,
                    "info": {
                        "minAndroid": "8.0",
                        "size": "12 MB",
                        "inApp": false,
                        "offline": true,
                        "updated": "2025",
                        "privacy": {"en": "No tracking"}
                    },
                    "metrics": {"rating": 4.7, "installs": "50K+"},
                    "fallback": "N"
                },
                "b": {
                    "title": {"uk": "Калькулятор", "en": "Calc"},
                    "desc": {"en": "Numbers"},
                    "category": {"en": "Tools"},
                    "link": "https://play.google.com/store/apps/details?id=b",
                    "isNew": true,
                    "fallback": "C"
                }
            }
        }))
        .unwrap()
    }

    pub(crate) fn sample_screenshots() -> ScreenshotSet {
        serde_json::from_value(json!({
            "a": {"en": ["/s/a1.png", "/s/a2.png", "/s/a3.png"], "uk": ["/s/a-uk.png"]}
        }))
        .unwrap()
    }

    fn en_table() -> TranslationTable {
        serde_json::from_value(json!({"en": {"gp": "Get it on Google Play", "infoYes": "Yes!"}}))
            .unwrap()
    }

    #[test]
    fn listing_skips_unknown_ids_and_keeps_order() {
        let table = en_table();
        let cards = listing_cards(
            &sample_catalog(),
            &sample_screenshots(),
            I18n::new(&table, Language::English),
            &SiteConfig::default(),
        );
        let titles: Vec<&str> = cards.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, ["Notes", "Calc"]);
        assert_eq!(cards[0].category, "Productivity");
        assert_eq!(cards[0].description, "Quick notes");
        assert_eq!(cards[0].detail_href, "app.html?id=a");
    }

    #[test]
    fn thumbnail_click_opens_matching_screenshot() {
        let table = en_table();
        let cards = listing_cards(
            &sample_catalog(),
            &sample_screenshots(),
            I18n::new(&table, Language::English),
            &SiteConfig::default(),
        );
        let card = &cards[0];
        assert_eq!(card.gallery.urls.len(), 3);

        let markup = card.markup();
        assert_eq!(markup.matches(r#"class="shot-thumb""#).count(), 3);
        assert!(markup.contains(r#"data-idx="1" aria-label="Open screenshot 2""#));

        let mut lightbox = LightboxState::default();
        lightbox.open(card.gallery.urls.clone(), thumb_index(Some("1")));
        assert_eq!(lightbox.current(), Some("/s/a2.png"));

        assert!(cards[1].gallery.is_empty());
        assert!(!cards[1].markup().contains("shots-strip"));
    }

    #[test]
    fn card_badges_follow_flags_and_metrics() {
        let table = en_table();
        let i18n = I18n::new(&table, Language::English);
        let catalog = sample_catalog();
        let shots = sample_screenshots();
        let cfg = SiteConfig::default();

        let a = CardView::build("a", catalog.get("a").unwrap(), &shots, i18n, &cfg);
        let texts: Vec<&str> = a.badges.iter().map(|b| b.text.as_str()).collect();
        assert_eq!(texts, ["Android", "Top", "★ 4.7", "50K+"]);

        let b = CardView::build("b", catalog.get("b").unwrap(), &shots, i18n, &cfg);
        assert_eq!(
            b.badges,
            vec![Badge::new("badge", "Android"), Badge::new("pill pill-new", "New")]
        );
        assert!(b.markup().contains("Get it on Google Play"));
    }

    #[test]
    fn missing_icon_uses_placeholder_directly() {
        let table = en_table();
        let catalog = sample_catalog();
        let card = CardView::build(
            "b",
            catalog.get("b").unwrap(),
            &ScreenshotSet::default(),
            I18n::new(&table, Language::English),
            &SiteConfig::default(),
        );
        assert_eq!(card.icon.src, card.icon.fallback_src);
        assert!(card.icon.src.starts_with("data:image/svg+xml,"));
    }

    #[test]
    fn markup_escapes_record_text() {
        let record: AppRecord = serde_json::from_value(json!({
            "title": {"en": "<script>x</script>"},
            "link": "https://x.test/?a=1&b=2"
        }))
        .unwrap();
        let table = TranslationTable::default();
        let card = CardView::build(
            "x y",
            &record,
            &ScreenshotSet::default(),
            I18n::new(&table, Language::English),
            &SiteConfig::default(),
        );
        let markup = card.markup();
        assert!(!markup.contains("<script>"));
        assert!(markup.contains("&lt;script&gt;"));
        assert!(markup.contains("https://x.test/?a=1&amp;b=2"));
        assert!(markup.contains("app.html?id=x%20y"));
    }

    #[test]
    fn detail_view_builds_hero_and_info_rows() {
        let table = en_table();
        let catalog = sample_catalog();
        let view = DetailView::build(
            "a",
            catalog.get("a").unwrap(),
            &sample_screenshots(),
            I18n::new(&table, Language::English),
            &SiteConfig::default(),
        );

        assert_eq!(view.page_title, "Notes — Sashkin Apps");
        assert!(view.hero_markup().contains(r#"<h1 class="app-hero-title">Notes</h1>"#));
        assert_eq!(view.features, ["Sync", "Tags"]);

        let rows: Vec<(&str, &str)> = view
            .info
            .iter()
            .map(|r| (r.label.as_str(), r.value.as_str()))
            .collect();
        assert_eq!(
            rows,
            [
                ("Category", "Productivity"),
                ("Android support", "8.0"),
                ("Approx. size", "12 MB"),
                ("In-app purchases", "No"),
                ("Works offline", "Yes!"),
                ("Roughly updated", "2025"),
                ("Privacy", "No tracking"),
                ("Data & safety", ""),
            ]
        );
        assert!(view.back_markup().contains("data-history-back"));
    }

    #[test]
    fn unknown_or_missing_id_is_not_found() {
        let catalog = sample_catalog();
        for search in ["?id=ghost", "?id=", "", "?other=a", "?id=missing"] {
            let outcome = resolve_detail(search, &catalog);
            assert_eq!(outcome, DetailOutcome::NotFound, "search {search:?}");
            assert_eq!(outcome.hidden_regions(), [".app-tabs", ".app-gallery-panel"]);
        }
    }

    #[test]
    fn known_id_renders_full_detail() {
        let table = en_table();
        let catalog = sample_catalog();

        let DetailOutcome::Found { id, record } = resolve_detail("?id=a&utm=x", &catalog) else {
            panic!("app a should resolve");
        };
        assert_eq!(id, "a");
        assert!(
            DetailOutcome::Found { id, record }
                .hidden_regions()
                .is_empty()
        );

        let view = DetailView::build(
            id,
            record,
            &sample_screenshots(),
            I18n::new(&table, Language::English),
            &SiteConfig::default(),
        );
        assert_eq!(view.page_title, "Notes — Sashkin Apps");
        assert_eq!(view.gallery.urls.len(), 3);
        assert!(view.hero_markup().contains("Get it on Google Play"));
    }

    #[test]
    fn not_found_links_back_to_listing() {
        let table = TranslationTable::default();
        let markup = not_found_markup(
            I18n::new(&table, Language::Ukrainian),
            &SiteConfig::default(),
        );
        assert_eq!(
            markup,
            r#"<p>App not found. <a href="index.html">Back to main page</a></p>"#
        );
    }

    #[test]
    fn reads_id_from_query_string() {
        assert_eq!(detail_id_from_search("?id=a").as_deref(), Some("a"));
        assert_eq!(
            detail_id_from_search("?ref=home&id=x%20y").as_deref(),
            Some("x y")
        );
        assert_eq!(detail_id_from_search(""), None);
    }

    #[test]
    fn thumb_index_defaults_to_zero() {
        assert_eq!(thumb_index(Some("2")), 2);
        assert_eq!(thumb_index(Some("oops")), 0);
        assert_eq!(thumb_index(None), 0);
    }
}
