use serde_json::{Value, json};
use url::Url;

use crate::engine::models::AppRecord;
use crate::engine::state::Language;
use crate::env::SiteConfig;
use crate::util::encode_component;

/// One attribute write against a `<meta>`/`<link>` element in the head.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaUpdate {
    pub selector: &'static str,
    pub attribute: &'static str,
    pub value: String,
}

/// Search and social preview metadata for a single app.
#[derive(Debug, Clone, PartialEq)]
pub struct SeoMeta {
    pub page_title: String,
    pub description: String,
    pub url: String,
    pub image: String,
    pub image_alt: String,
    pub json_ld: Value,
}

/// Site paths hang off the configured base, sub-path included, so
/// `https://host/repo` + `/assets/a.png` stays under `/repo`.
fn absolute(config: &SiteConfig, path: &str) -> String {
    if let Ok(url) = Url::parse(path) {
        return url.into();
    }
    let relative = path.trim_start_matches("./").trim_start_matches('/');
    format!("{}/{relative}", config.base())
}

impl SeoMeta {
    pub fn build(
        id: &str,
        record: &AppRecord,
        language: Language,
        page_title: &str,
        config: &SiteConfig,
    ) -> Self {
        let description = record
            .short
            .non_empty(language)
            .or_else(|| record.desc.non_empty(language))
            .or_else(|| record.short.non_empty(Language::PRIMARY))
            .unwrap_or_default()
            .to_owned();
        let name = record
            .title
            .non_empty(language)
            .or_else(|| record.title.non_empty(Language::PRIMARY))
            .or_else(|| record.title.non_empty(Language::English))
            .unwrap_or(config.site_name.as_str())
            .to_owned();
        let category = record
            .category
            .non_empty(language)
            .or_else(|| record.category.non_empty(Language::PRIMARY))
            .unwrap_or("Mobile Application");

        let url = format!(
            "{}/{}?id={}",
            config.base(),
            config.detail_page,
            encode_component(id)
        );
        let image = match record.icon.as_deref().filter(|icon| !icon.is_empty()) {
            Some(icon) => absolute(config, icon),
            None => absolute(config, &config.default_image),
        };

        let json_ld = json!({
            "@context": "https://schema.org",
            "@type": "SoftwareApplication",
            "name": name,
            "operatingSystem": "Android",
            "applicationCategory": category,
            "description": description,
            "url": url,
            "image": image,
            "inLanguage": language.code(),
            "offers": {
                "@type": "Offer",
                "price": "0",
                "priceCurrency": "USD"
            },
            "publisher": {
                "@type": "Organization",
                "name": config.site_name,
                "url": format!("{}/", config.base())
            }
        });

        Self {
            page_title: page_title.to_owned(),
            image_alt: format!("{name} app icon"),
            description,
            url,
            image,
            json_ld,
        }
    }

    /// Head writes in document order. Missing elements are skipped by the
    /// caller.
    pub fn updates(&self) -> Vec<MetaUpdate> {
        let entry = |selector, attribute, value: &str| MetaUpdate {
            selector,
            attribute,
            value: value.to_owned(),
        };
        vec![
            entry(r#"meta[name="description"]"#, "content", &self.description),
            entry("#canonical-link", "href", &self.url),
            entry("#og-url", "content", &self.url),
            entry("#og-title", "content", &self.page_title),
            entry("#og-description", "content", &self.description),
            entry("#og-image", "content", &self.image),
            entry("#og-image-alt", "content", &self.image_alt),
            entry("#twitter-title", "content", &self.page_title),
            entry("#twitter-description", "content", &self.description),
            entry("#twitter-image", "content", &self.image),
            entry("#twitter-image-alt", "content", &self.image_alt),
        ]
    }

    pub fn json_ld_text(&self) -> String {
        self.json_ld.to_string()
    }
}
