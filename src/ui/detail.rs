use std::rc::Rc;

use log::{debug, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement};

use crate::engine::PageData;
use crate::engine::seo::SeoMeta;
use crate::engine::state::{Language, Tab, panel_visibility};
use crate::engine::view::{DetailOutcome, DetailView, not_found_markup, resolve_detail};
use crate::env::{
    CTA_SECONDARY_ID, FEATURES_ID, GALLERY_ID, HERO_ID, INFO_ID, JSON_LD_ID, LONG_ID, SiteConfig,
};
use crate::ui::dom::{bind_icon_fallback, bind_thumbs, by_id, on, select_all, set_active, window};
use crate::ui::feedback::init_interactive_feedback;
use crate::engine::i18n::I18n;
use crate::ui::lightbox::LightboxController;

/// Host-page containers filled by the detail renderer. Any may be absent.
pub struct DetailRegions {
    hero: Option<Element>,
    features: Option<Element>,
    long: Option<Element>,
    info: Option<Element>,
    gallery: Option<Element>,
    cta: Option<Element>,
}

impl DetailRegions {
    pub fn find(doc: &Document) -> Self {
        Self {
            hero: doc.get_element_by_id(HERO_ID),
            features: doc.get_element_by_id(FEATURES_ID),
            long: doc.get_element_by_id(LONG_ID),
            info: doc.get_element_by_id(INFO_ID),
            gallery: doc.get_element_by_id(GALLERY_ID),
            cta: doc.get_element_by_id(CTA_SECONDARY_ID),
        }
    }
}

/// Make the tab buttons mutually exclusive and show only the matching panel.
pub fn setup_tabs(doc: &Document) -> Result<(), JsValue> {
    let buttons = Rc::new(select_all(doc, ".tab-btn"));
    for button in buttons.iter() {
        let all = Rc::clone(&buttons);
        let this = button.clone();
        let doc = doc.clone();
        on(button, "click", move |_| {
            for other in all.iter() {
                let _ = set_active(other, other.is_same_node(Some(this.as_ref())));
            }
            let selected = this.get_attribute("data-tab").as_deref().and_then(Tab::parse);
            let visibility = match selected {
                Some(tab) => panel_visibility(tab),
                None => Tab::ALL.map(|tab| (tab, false)),
            };
            for (tab, visible) in visibility {
                if let Some(panel) = by_id::<HtmlElement>(&doc, tab.panel_id()) {
                    panel.set_hidden(!visible);
                }
            }
        })?;
    }
    Ok(())
}

fn hide(doc: &Document, selector: &str) -> Result<(), JsValue> {
    if let Some(el) = doc
        .query_selector(selector)?
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    {
        el.style().set_property("display", "none")?;
    }
    Ok(())
}

fn apply_seo(doc: &Document, meta: &SeoMeta) -> Result<(), JsValue> {
    for update in meta.updates() {
        if let Some(el) = doc.query_selector(update.selector)? {
            el.set_attribute(update.attribute, &update.value)?;
        }
    }
    if let Some(script) = doc.get_element_by_id(JSON_LD_ID) {
        script.set_text_content(Some(&meta.json_ld_text()));
    }
    Ok(())
}

/// Paint the detail page for the `id` in `search`, or the not-found state.
pub fn render_detail(
    doc: &Document,
    regions: &DetailRegions,
    data: &PageData,
    config: &SiteConfig,
    language: Language,
    search: &str,
    lightbox: Option<&Rc<LightboxController>>,
) -> Result<(), JsValue> {
    let i18n = I18n::new(&data.i18n, language);
    let outcome = resolve_detail(search, &data.catalog);
    for selector in outcome.hidden_regions() {
        hide(doc, selector)?;
    }
    let DetailOutcome::Found { id, record } = outcome else {
        warn!("detail: no app for {search:?}");
        if let Some(hero) = &regions.hero {
            hero.set_inner_html(&not_found_markup(i18n, config));
        }
        return Ok(());
    };

    debug!("detail: rendering {id} in {}", language.code());
    let view = DetailView::build(id, record, &data.screenshots, i18n, config);
    doc.set_title(&view.page_title);

    if let Some(hero) = &regions.hero {
        hero.set_inner_html(&view.hero_markup());
        bind_icon_fallback(hero, &view.icon)?;
    }

    if let Some(long) = &regions.long {
        long.set_text_content(Some(&view.long));
    }

    if let Some(features) = &regions.features {
        features.set_inner_html("");
        for feature in &view.features {
            let li = doc.create_element("li")?;
            li.set_text_content(Some(feature));
            features.append_child(&li)?;
        }
    }

    if let Some(info) = &regions.info {
        info.set_inner_html("");
        for row in &view.info {
            let dt = doc.create_element("dt")?;
            dt.set_text_content(Some(&row.label));
            let dd = doc.create_element("dd")?;
            dd.set_text_content(Some(&row.value));
            info.append_child(&dt)?;
            info.append_child(&dd)?;
        }
    }

    if let Some(gallery) = &regions.gallery {
        gallery.set_inner_html(&view.gallery.thumbs_markup("shot-thumb app-shot"));
        bind_thumbs(gallery, &view.gallery, lightbox)?;
    }

    if let Some(cta) = &regions.cta {
        cta.set_inner_html(&view.back_markup());
        if let Some(back) = cta.query_selector("[data-history-back]")? {
            on(&back, "click", |_| {
                if let Err(err) = window().and_then(|w| w.history()).and_then(|h| h.back()) {
                    warn!("detail: history.back failed: {err:?}");
                }
            })?;
        }
    }

    apply_seo(
        doc,
        &SeoMeta::build(id, record, language, &view.page_title, config),
    )?;
    init_interactive_feedback(doc)
}
