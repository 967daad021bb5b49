use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, Event, HtmlElement, HtmlImageElement, KeyboardEvent};

use crate::engine::state::LightboxState;
use crate::env::{LIGHTBOX_ID, LIGHTBOX_IMG_ID};
use crate::ui::dom::{by_id, on};

/// Mirrors a `LightboxState` onto `#lightbox` / `#lightbox-img`.
pub struct LightboxController {
    state: RefCell<LightboxState>,
    root: HtmlElement,
    image: HtmlImageElement,
}

impl LightboxController {
    /// Wire the viewer controls and keyboard. `None` when the page has no
    /// viewer markup.
    pub fn bind(doc: &Document) -> Result<Option<Rc<Self>>, JsValue> {
        let (Some(root), Some(image)) = (
            by_id::<HtmlElement>(doc, LIGHTBOX_ID),
            by_id::<HtmlImageElement>(doc, LIGHTBOX_IMG_ID),
        ) else {
            return Ok(None);
        };

        let controller = Rc::new(Self {
            state: RefCell::new(LightboxState::default()),
            root,
            image,
        });

        let this = Rc::clone(&controller);
        on(&controller.root, "click", move |event: Event| {
            let Some(target) = event
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
            else {
                return;
            };
            if target.has_attribute("data-lightbox-close") {
                this.close();
            } else if target.has_attribute("data-lightbox-prev") {
                this.step(-1);
            } else if target.has_attribute("data-lightbox-next") {
                this.step(1);
            }
        })?;

        let this = Rc::clone(&controller);
        on(doc, "keydown", move |event: Event| {
            if !this.is_open() {
                return;
            }
            let Some(key) = event.dyn_ref::<KeyboardEvent>().map(KeyboardEvent::key) else {
                return;
            };
            match key.as_str() {
                "Escape" => this.close(),
                "ArrowLeft" => this.step(-1),
                "ArrowRight" => this.step(1),
                _ => {}
            }
        })?;

        Ok(Some(controller))
    }

    pub fn is_open(&self) -> bool {
        self.state.borrow().is_open()
    }

    pub fn open(&self, list: Vec<String>, index: isize) {
        self.state.borrow_mut().open(list, index);
        self.sync();
    }

    pub fn close(&self) {
        self.state.borrow_mut().close();
        self.sync();
    }

    pub fn step(&self, delta: isize) {
        self.state.borrow_mut().step(delta);
        self.sync();
    }

    fn sync(&self) {
        match self.state.borrow().current() {
            Some(src) => {
                self.image.set_src(src);
                self.root.set_hidden(false);
            }
            None => self.root.set_hidden(true),
        }
    }
}
