use std::cell::Cell;
use std::rc::Rc;

use futures_util::future::try_join3;
use log::{error, info};

use crate::engine::models::{Catalog, ScreenshotSet, TranslationTable};
use crate::engine::state::{Language, Theme, selector_states};
use crate::env::SiteConfig;
use crate::networking::{DataLoader, LoadError, Transport};
use crate::storage::{PreferenceBackend, PreferenceStore};

pub mod i18n;
pub mod models;
pub mod seo;
pub mod state;
pub mod view;

/// The three resources every page renders from.
#[derive(Clone, Debug, Default)]
pub struct PageData {
    pub i18n: TranslationTable,
    pub catalog: Catalog,
    pub screenshots: ScreenshotSet,
}

/// Per-page context: configuration, persisted preferences and the request
/// cache. Constructed once at boot and passed to whoever needs it.
pub struct Session<B, T> {
    pub config: SiteConfig,
    prefs: Rc<PreferenceStore<B>>,
    loader: DataLoader<T>,
}

impl<B: PreferenceBackend, T: Transport + 'static> Session<B, T> {
    pub fn new(config: SiteConfig, backend: B, transport: T) -> Self {
        Self {
            config,
            prefs: Rc::new(PreferenceStore::new(backend)),
            loader: DataLoader::new(transport),
        }
    }

    pub fn prefs(&self) -> &Rc<PreferenceStore<B>> {
        &self.prefs
    }

    pub fn loader(&self) -> &DataLoader<T> {
        &self.loader
    }

    /// Fetch translations, catalog and screenshots in parallel. Any failure
    /// fails the whole load; nothing is rendered from a partial set.
    pub async fn load_page_data(&self) -> Result<PageData, LoadError> {
        info!("session: loading page data");
        let cfg = &self.config;
        let (i18n, catalog, screenshots) = try_join3(
            self.loader.get_as::<TranslationTable>(&cfg.i18n_path),
            self.loader.get_as::<Catalog>(&cfg.apps_path),
            self.loader.get_as::<ScreenshotSet>(&cfg.screenshots_path),
        )
        .await
        .inspect_err(|err| error!("session: page data unavailable: {err}"))?;

        Ok(PageData {
            i18n,
            catalog,
            screenshots,
        })
    }

    /// Stored theme, else the environment's preference. The result is
    /// persisted so other pages pick it up.
    pub fn init_theme(&self, prefers_dark: bool) -> Theme {
        let theme = self
            .prefs
            .theme()
            .unwrap_or(Theme::from_prefers_dark(prefers_dark));
        self.apply_theme(theme)
    }

    pub fn apply_theme(&self, theme: Theme) -> Theme {
        self.prefs.set_theme(theme);
        theme
    }

    /// Flip the theme currently shown. An unrecognized current value flips to
    /// dark.
    pub fn toggle_theme(&self, current: Option<Theme>) -> Theme {
        self.apply_theme(current.map_or(Theme::Dark, Theme::toggled))
    }

    pub fn language_switch(&self) -> LanguageSwitch<B> {
        LanguageSwitch::new(Rc::clone(&self.prefs))
    }
}

/// Active language among the supported set, persisted on every selection.
pub struct LanguageSwitch<B> {
    prefs: Rc<PreferenceStore<B>>,
    current: Cell<Language>,
}

impl<B: PreferenceBackend> LanguageSwitch<B> {
    pub fn new(prefs: Rc<PreferenceStore<B>>) -> Self {
        let current = Cell::new(prefs.language());
        Self { prefs, current }
    }

    pub fn current(&self) -> Language {
        self.current.get()
    }

    /// Make `language` active and persist it. Returns the selector states
    /// the controls should mirror.
    pub fn select(&self, language: Language) -> [(Language, bool); 3] {
        self.current.set(language);
        self.prefs.set_language(language);
        selector_states(language)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::networking::tests::FakeTransport;
    use crate::storage::MemoryBackend;
    use serde_json::json;

    fn session(transport: FakeTransport) -> Session<MemoryBackend, FakeTransport> {
        Session::new(SiteConfig::default(), MemoryBackend::default(), transport)
    }

    fn full_transport() -> FakeTransport {
        FakeTransport::default()
            .with("./data/i18n.json", json!({"en": {"gp": "Play"}}))
            .with(
                "./data/apps.json",
                json!({"order": ["a"], "byId": {"a": {"title": {"en": "A"}}}}),
            )
            .with("./data/screenshots.json", json!({"a": {"en": ["/1.png"]}}))
    }

    #[tokio::test]
    async fn loads_all_three_resources() {
        let session = session(full_transport());
        let data = session.load_page_data().await.unwrap();
        assert_eq!(data.i18n.lookup(Language::English, "gp"), Some("Play"));
        assert_eq!(data.catalog.ordered().count(), 1);
        assert_eq!(data.screenshots.for_app("a", Language::English).len(), 1);
    }

    #[tokio::test]
    async fn one_failed_resource_fails_the_page() {
        let transport = full_transport().failing("./data/screenshots.json", 500);
        let session = session(transport);
        let err = session.load_page_data().await.unwrap_err();
        assert_eq!(
            err,
            LoadError::Status {
                url: "./data/screenshots.json".into(),
                status: 500
            }
        );
    }

    #[tokio::test]
    async fn second_load_is_served_from_cache() {
        let transport = full_transport();
        let calls = Rc::clone(&transport.calls);
        let session = session(transport);
        session.load_page_data().await.unwrap();
        session.load_page_data().await.unwrap();
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn theme_init_prefers_stored_value() {
        let s = session(FakeTransport::default());
        assert_eq!(s.init_theme(true), Theme::Dark);
        assert_eq!(s.prefs().theme(), Some(Theme::Dark));
        assert_eq!(s.init_theme(false), Theme::Dark);

        let fresh = session(FakeTransport::default());
        assert_eq!(fresh.init_theme(false), Theme::Light);
    }

    #[test]
    fn theme_toggle_alternates_and_persists() {
        for start in [Theme::Light, Theme::Dark] {
            let s = session(FakeTransport::default());
            let mut current = s.apply_theme(start);
            for _ in 0..4 {
                let next = s.toggle_theme(Some(current));
                assert_ne!(next, current);
                assert_eq!(s.prefs().theme(), Some(next));
                current = next;
            }
            assert_eq!(current, start);
        }
        let s = session(FakeTransport::default());
        assert_eq!(s.toggle_theme(None), Theme::Dark);
    }

    #[test]
    fn language_defaults_to_primary_and_persists_selection() {
        let s = session(FakeTransport::default());
        let switch = s.language_switch();
        assert_eq!(switch.current(), Language::Ukrainian);

        switch.select(Language::English);
        assert_eq!(switch.current(), Language::English);
        assert_eq!(s.prefs().language(), Language::English);
        assert_eq!(s.language_switch().current(), Language::English);
    }

    #[test]
    fn repeated_selection_is_idempotent() {
        let s = session(FakeTransport::default());
        let switch = s.language_switch();
        let first = switch.select(Language::Russian);
        let second = switch.select(Language::Russian);
        assert_eq!(first, second);
        assert_eq!(s.prefs().language(), Language::Russian);
    }

    #[test]
    fn selecting_deactivates_the_other_controls() {
        for start in Language::ALL {
            for pick in Language::ALL {
                let s = session(FakeTransport::default());
                let switch = s.language_switch();
                switch.select(start);
                let states = switch.select(pick);
                for (language, active) in states {
                    assert_eq!(active, language == pick);
                }
            }
        }
    }

    #[test]
    fn setter_codes_resolve_to_a_language() {
        let s = session(FakeTransport::default());
        let switch = s.language_switch();
        for (code, expected) in [("ru", Language::Russian), ("en-US", Language::English)] {
            let language = Language::parse(code).unwrap();
            switch.select(language);
            assert_eq!(switch.current(), expected);
        }
        assert_eq!(Language::parse("de"), None);
        assert_eq!(s.prefs().language(), Language::English);
    }
}
