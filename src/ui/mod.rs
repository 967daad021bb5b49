pub mod feedback;

#[cfg(target_arch = "wasm32")]
mod detail;
#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod lightbox;
#[cfg(target_arch = "wasm32")]
mod listing;

#[cfg(target_arch = "wasm32")]
pub use self::browser::{current_language, run, set_language};

/// Which page shell the module was loaded into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Listing,
    Detail,
}

impl PageKind {
    /// The listing grid wins when both containers are present.
    pub fn detect(has_grid: bool, has_hero: bool) -> Option<Self> {
        if has_grid {
            Some(PageKind::Listing)
        } else if has_hero {
            Some(PageKind::Detail)
        } else {
            None
        }
    }
}

#[cfg(target_arch = "wasm32")]
mod browser {
    use std::cell::RefCell;
    use std::rc::Rc;

    use log::{debug, error, info, warn};
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, Window};

    use super::PageKind;
    use super::detail::{DetailRegions, render_detail, setup_tabs};
    use super::dom::{self, on, select_all, set_active};
    use super::feedback::init_interactive_feedback;
    use super::lightbox::LightboxController;
    use super::listing::render_listing;
    use crate::engine::i18n::I18n;
    use crate::engine::state::{Language, Theme};
    use crate::engine::{LanguageSwitch, PageData, Session};
    use crate::env::{GRID_ID, HERO_ID, I18N_ATTR, SiteConfig, THEME_ATTR, THEME_TOGGLE_ID, YEAR_ID};
    use crate::networking::HttpTransport;
    use crate::storage::BrowserStorage;
    use crate::util::current_year;

    type BrowserSession = Session<BrowserStorage, HttpTransport>;
    type Render = Box<dyn Fn(Language) -> Result<(), JsValue>>;

    fn prefers_dark(window: &Window) -> bool {
        window
            .match_media("(prefers-color-scheme: dark)")
            .ok()
            .flatten()
            .is_some_and(|query| query.matches())
    }

    fn document_theme(doc: &Document) -> Option<Theme> {
        doc.document_element()?
            .get_attribute(THEME_ATTR)
            .as_deref()
            .and_then(Theme::parse)
    }

    fn set_document_theme(doc: &Document, theme: Theme) -> Result<(), JsValue> {
        match doc.document_element() {
            Some(root) => root.set_attribute(THEME_ATTR, theme.as_str()),
            None => Ok(()),
        }
    }

    fn bind_theme_toggle(
        doc: &Document,
        session: &Rc<BrowserSession>,
        button_id: &str,
    ) -> Result<(), JsValue> {
        let Some(button) = doc.get_element_by_id(button_id) else {
            debug!("theme: no #{button_id} control on this page");
            return Ok(());
        };
        let session = Rc::clone(session);
        let doc = doc.clone();
        on(&button, "click", move |_| {
            let next = session.toggle_theme(document_theme(&doc));
            if let Err(err) = set_document_theme(&doc, next) {
                warn!("theme: unable to apply {}: {err:?}", next.as_str());
            }
        })
    }

    fn apply_translations(doc: &Document, i18n: I18n<'_>) -> Result<(), JsValue> {
        if let Some(root) = doc.document_element() {
            root.set_attribute("lang", i18n.language().code())?;
        }
        for el in select_all(doc, &format!("[{I18N_ATTR}]")) {
            let key = el.get_attribute(I18N_ATTR).unwrap_or_default();
            if let Some(text) = i18n.lookup(&key) {
                el.set_text_content(Some(text));
            }
        }
        Ok(())
    }

    /// The `uk`/`ru`/`en` selector buttons plus the re-render hook.
    struct LangSwitcher {
        switch: LanguageSwitch<BrowserStorage>,
        buttons: Vec<Element>,
        doc: Document,
        data: Rc<PageData>,
        on_change: Render,
    }

    impl LangSwitcher {
        fn current(&self) -> Language {
            self.switch.current()
        }

        fn set_language(&self, language: Language) -> Result<(), JsValue> {
            let states = self.switch.select(language);
            for button in &self.buttons {
                let tagged = button
                    .get_attribute("data-lang")
                    .as_deref()
                    .and_then(Language::parse);
                let active = states
                    .iter()
                    .any(|(lang, selected)| *selected && Some(*lang) == tagged);
                set_active(button, active)?;
            }
            apply_translations(&self.doc, I18n::new(&self.data.i18n, language))?;
            (self.on_change)(language)
        }
    }

    fn bind_lang_switcher(
        doc: &Document,
        session: &BrowserSession,
        data: Rc<PageData>,
        on_change: Render,
    ) -> Result<Rc<LangSwitcher>, JsValue> {
        let buttons: Vec<Element> = Language::ALL
            .iter()
            .filter_map(|lang| doc.get_element_by_id(&format!("btn-{}", lang.code())))
            .collect();

        let switcher = Rc::new(LangSwitcher {
            switch: session.language_switch(),
            buttons,
            doc: doc.clone(),
            data,
            on_change,
        });
        switcher.set_language(switcher.current())?;

        for button in &switcher.buttons {
            let this = Rc::clone(&switcher);
            let language =
                Language::parse_or_primary(button.get_attribute("data-lang").as_deref());
            on(button, "click", move |_| {
                if let Err(err) = this.set_language(language) {
                    error!("lang: switching to {} failed: {err:?}", language.code());
                }
            })?;
        }
        Ok(switcher)
    }

    thread_local! {
        static LANG_SWITCHER: RefCell<Option<Rc<LangSwitcher>>> = const { RefCell::new(None) };
    }

    /// Language of the page's switcher; `None` before boot has finished.
    pub fn current_language() -> Option<Language> {
        LANG_SWITCHER.with_borrow(|switcher| switcher.as_ref().map(|s| s.current()))
    }

    /// Switch language as if the matching selector button was pressed.
    pub fn set_language(language: Language) -> Result<(), JsValue> {
        let switcher = LANG_SWITCHER.with_borrow(Option::clone);
        match switcher {
            Some(switcher) => switcher.set_language(language),
            None => {
                warn!("lang: page not booted; ignoring {}", language.code());
                Ok(())
            }
        }
    }

    fn stamp_year(doc: &Document) {
        if let Some(el) = doc.get_element_by_id(YEAR_ID) {
            el.set_text_content(Some(&current_year().to_string()));
        }
    }

    /// Boot whichever page this is: theme first, then data, then the
    /// language-driven render.
    pub async fn run(config: SiteConfig) -> Result<(), JsValue> {
        let window = dom::window()?;
        let doc = dom::document()?;

        let base = doc.base_uri()?;
        let session = Rc::new(Session::new(
            config,
            BrowserStorage::new(),
            HttpTransport::new(base.as_deref()),
        ));

        let theme = session.init_theme(prefers_dark(&window));
        set_document_theme(&doc, theme)?;
        bind_theme_toggle(&doc, &session, THEME_TOGGLE_ID)?;

        let grid = doc.get_element_by_id(GRID_ID);
        let Some(kind) = PageKind::detect(grid.is_some(), doc.get_element_by_id(HERO_ID).is_some())
        else {
            warn!("boot: neither #{GRID_ID} nor #{HERO_ID} found; nothing to render");
            return Ok(());
        };
        info!("boot: rendering {kind:?} page");

        let data = Rc::new(
            session
                .load_page_data()
                .await
                .map_err(|err| JsValue::from_str(&err.to_string()))?,
        );

        stamp_year(&doc);
        let lightbox = LightboxController::bind(&doc)?;

        let render: Render = match (kind, grid) {
            (PageKind::Listing, Some(grid)) => {
                let doc = doc.clone();
                let data = Rc::clone(&data);
                let session = Rc::clone(&session);
                Box::new(move |language| {
                    render_listing(&doc, &grid, &data, &session.config, language, lightbox.as_ref())
                })
            }
            _ => {
                setup_tabs(&doc)?;
                init_interactive_feedback(&doc)?;
                let regions = DetailRegions::find(&doc);
                let search = window.location().search()?;
                let doc = doc.clone();
                let data = Rc::clone(&data);
                let session = Rc::clone(&session);
                Box::new(move |language| {
                    render_detail(
                        &doc,
                        &regions,
                        &data,
                        &session.config,
                        language,
                        &search,
                        lightbox.as_ref(),
                    )
                })
            }
        };

        let switcher = bind_lang_switcher(&doc, &session, data, render)?;
        LANG_SWITCHER.set(Some(switcher));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::PageKind;

    #[test]
    fn detects_page_from_containers() {
        assert_eq!(PageKind::detect(true, false), Some(PageKind::Listing));
        assert_eq!(PageKind::detect(false, true), Some(PageKind::Detail));
        assert_eq!(PageKind::detect(true, true), Some(PageKind::Listing));
        assert_eq!(PageKind::detect(false, false), None);
    }
}
