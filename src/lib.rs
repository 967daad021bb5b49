//! Sashkin Apps catalog pages: a listing grid and a per-app detail view,
//! rendered in the browser from JSON data.
//!
//! The host page loads the wasm bundle and calls `boot()`, optionally with a
//! JSON string overriding [`env::SiteConfig`].

pub mod engine;
pub mod env;
pub mod logging;
pub mod networking;
pub mod storage;
pub mod ui;
pub mod util;

#[cfg(target_arch = "wasm32")]
mod web {
    use log::{LevelFilter, error};
    use wasm_bindgen::prelude::*;

    use crate::engine::state::Language;
    use crate::env::SiteConfig;
    use crate::logging;

    #[wasm_bindgen(start)]
    pub fn start() {
        console_error_panic_hook::set_once();
    }

    /// Render the current page. Errors are logged to the console; a failed
    /// data load leaves the page unrendered.
    #[wasm_bindgen]
    pub fn boot(config_json: Option<String>) {
        logging::init(LevelFilter::Info);
        let config = SiteConfig::from_json(config_json.as_deref());
        log::set_max_level(config.log_filter());

        wasm_bindgen_futures::spawn_local(async move {
            if let Err(err) = crate::ui::run(config).await {
                error!("boot: page rendering aborted: {err:?}");
            }
        });
    }

    /// Current page language code, once `boot()` has rendered.
    #[wasm_bindgen(js_name = currentLanguage)]
    pub fn current_language() -> Option<String> {
        crate::ui::current_language().map(|language| language.code().to_owned())
    }

    /// Switch the page language (`uk`, `ru`, `en`, or a locale such as `en-US`).
    #[wasm_bindgen(js_name = setLanguage)]
    pub fn set_language(code: &str) -> Result<(), JsValue> {
        let language = Language::parse(code)
            .ok_or_else(|| JsValue::from_str(&format!("unsupported language {code:?}")))?;
        crate::ui::set_language(language)
    }
}
