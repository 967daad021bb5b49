use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::{Document, Element};

use crate::engine::PageData;
use crate::engine::state::Language;
use crate::engine::view::listing_cards;
use crate::env::SiteConfig;
use crate::ui::dom::{bind_icon_fallback, bind_thumbs};
use crate::ui::feedback::init_interactive_feedback;
use crate::engine::i18n::I18n;
use crate::ui::lightbox::LightboxController;

/// Repaint the card grid for `language`.
pub fn render_listing(
    doc: &Document,
    grid: &Element,
    data: &PageData,
    config: &SiteConfig,
    language: Language,
    lightbox: Option<&Rc<LightboxController>>,
) -> Result<(), JsValue> {
    grid.set_inner_html("");

    let i18n = I18n::new(&data.i18n, language);
    for card in listing_cards(&data.catalog, &data.screenshots, i18n, config) {
        let article = doc.create_element("article")?;
        article.set_class_name("card");
        article.set_inner_html(&card.markup());
        bind_icon_fallback(&article, &card.icon)?;
        bind_thumbs(&article, &card.gallery, lightbox)?;
        grid.append_child(&article)?;
    }

    init_interactive_feedback(doc)
}
