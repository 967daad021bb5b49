use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    AddEventListenerOptions, Document, Element, Event, EventTarget, HtmlImageElement, NodeList,
    Window,
};

use crate::engine::view::{GalleryView, IconView, thumb_index};
use crate::ui::lightbox::LightboxController;

pub fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no window"))
}

pub fn document() -> Result<Document, JsValue> {
    window()?
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))
}

/// Element by id, cast to `T`. Missing or mistyped elements are `None`.
pub fn by_id<T: JsCast>(doc: &Document, id: &str) -> Option<T> {
    doc.get_element_by_id(id)?.dyn_into::<T>().ok()
}

fn elements(list: NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

pub fn select_all(doc: &Document, selector: &str) -> Vec<Element> {
    doc.query_selector_all(selector)
        .map(elements)
        .unwrap_or_default()
}

pub fn select_all_in(root: &Element, selector: &str) -> Vec<Element> {
    root.query_selector_all(selector)
        .map(elements)
        .unwrap_or_default()
}

/// Attach a listener for the lifetime of the page.
pub fn on(
    target: &EventTarget,
    event: &str,
    handler: impl FnMut(Event) + 'static,
) -> Result<(), JsValue> {
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

pub fn on_with_options(
    target: &EventTarget,
    event: &str,
    options: &AddEventListenerOptions,
    handler: impl FnMut(Event) + 'static,
) -> Result<(), JsValue> {
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    target.add_event_listener_with_callback_and_add_event_listener_options(
        event,
        closure.as_ref().unchecked_ref(),
        options,
    )?;
    closure.forget();
    Ok(())
}

pub fn set_active(el: &Element, active: bool) -> Result<(), JsValue> {
    el.class_list().toggle_with_force("active", active)?;
    el.set_attribute("aria-selected", if active { "true" } else { "false" })
}

/// Swap `img.icon` under `root` for the placeholder on its first load error.
pub fn bind_icon_fallback(root: &Element, icon: &IconView) -> Result<(), JsValue> {
    let Some(img) = root
        .query_selector("img.icon")?
        .and_then(|el| el.dyn_into::<HtmlImageElement>().ok())
    else {
        return Ok(());
    };
    if icon.src == icon.fallback_src {
        return Ok(());
    }

    let options = AddEventListenerOptions::new();
    options.set_once(true);
    let fallback = icon.fallback_src.clone();
    let target = img.clone();
    on_with_options(&img, "error", &options, move |_| target.set_src(&fallback))
}

/// Open the viewer over the whole gallery when a thumbnail is clicked.
pub fn bind_thumbs(
    root: &Element,
    gallery: &GalleryView,
    lightbox: Option<&Rc<LightboxController>>,
) -> Result<(), JsValue> {
    let Some(lightbox) = lightbox else {
        return Ok(());
    };
    for thumb in select_all_in(root, ".shot-thumb") {
        let index = thumb_index(thumb.get_attribute("data-idx").as_deref());
        let urls = gallery.urls.clone();
        let lightbox = Rc::clone(lightbox);
        on(&thumb, "click", move |_| lightbox.open(urls.clone(), index))?;
    }
    Ok(())
}
