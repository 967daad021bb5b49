use log::{LevelFilter, warn};
use serde::Deserialize;

/// Storage key holding the persisted theme.
pub const THEME_KEY: &str = "theme";
/// Storage key holding the persisted language.
pub const LANG_KEY: &str = "lang";

pub const THEME_ATTR: &str = "data-theme";
pub const I18N_ATTR: &str = "data-i18n";
pub const PRESS_BOUND_ATTR: &str = "data-press-bound";

pub const THEME_TOGGLE_ID: &str = "themeToggle";
pub const YEAR_ID: &str = "y";
pub const GRID_ID: &str = "apps";
pub const HERO_ID: &str = "app-hero";
pub const FEATURES_ID: &str = "app-features";
pub const LONG_ID: &str = "app-long";
pub const INFO_ID: &str = "app-info";
pub const GALLERY_ID: &str = "app-gallery";
pub const CTA_SECONDARY_ID: &str = "app-cta-secondary";
pub const LIGHTBOX_ID: &str = "lightbox";
pub const LIGHTBOX_IMG_ID: &str = "lightbox-img";
pub const JSON_LD_ID: &str = "app-jsonld";

/// Elements that receive the pressed-state affordance.
pub const PRESSABLE_SELECTOR: &str =
    "button, a.btn, .chip button, .tbtn, .tab-btn, .shot-thumb, summary";

/// Site-wide settings. Every field has a default, so a partial JSON
/// override is enough.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SiteConfig {
    pub base_url: String,
    pub site_name: String,
    pub i18n_path: String,
    pub apps_path: String,
    pub screenshots_path: String,
    pub default_image: String,
    pub listing_page: String,
    pub detail_page: String,
    pub log_level: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://sashkinbro.github.io".into(),
            site_name: "Sashkin Apps".into(),
            i18n_path: "./data/i18n.json".into(),
            apps_path: "./data/apps.json".into(),
            screenshots_path: "./data/screenshots.json".into(),
            default_image: "/assets/sashkinapps2.png".into(),
            listing_page: "index.html".into(),
            detail_page: "app.html".into(),
            log_level: "info".into(),
        }
    }
}

impl SiteConfig {
    /// Parse an optional JSON override. Malformed input falls back to the
    /// defaults rather than breaking the page.
    pub fn from_json(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
            return Self::default();
        };
        serde_json::from_str(raw).unwrap_or_else(|err| {
            warn!("config: ignoring invalid site config ({err})");
            Self::default()
        })
    }

    pub fn log_filter(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Info)
    }

    /// Base URL without a trailing slash.
    pub fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_override_uses_defaults() {
        assert_eq!(SiteConfig::from_json(None), SiteConfig::default());
        assert_eq!(SiteConfig::from_json(Some("  ")), SiteConfig::default());
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let cfg = SiteConfig::from_json(Some(
            r#"{"baseUrl":"https://example.test/","logLevel":"debug"}"#,
        ));
        assert_eq!(cfg.base(), "https://example.test");
        assert_eq!(cfg.log_filter(), LevelFilter::Debug);
        assert_eq!(cfg.site_name, "Sashkin Apps");
        assert_eq!(cfg.apps_path, "./data/apps.json");
    }

    #[test]
    fn malformed_override_falls_back() {
        assert_eq!(SiteConfig::from_json(Some("{nope")), SiteConfig::default());
        let cfg = SiteConfig {
            log_level: "loud".into(),
            ..SiteConfig::default()
        };
        assert_eq!(cfg.log_filter(), LevelFilter::Info);
    }
}
