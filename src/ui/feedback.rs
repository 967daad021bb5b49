/// Whether an element still needs the pressed-state listeners, judging by
/// its `data-press-bound` marker.
pub fn needs_binding(marker: Option<&str>) -> bool {
    marker != Some("1")
}

/// Add the pressed-state affordance to every pressable element not yet
/// bound. Call again after regenerating any region.
#[cfg(target_arch = "wasm32")]
pub fn init_interactive_feedback(doc: &web_sys::Document) -> Result<(), wasm_bindgen::JsValue> {
    use web_sys::AddEventListenerOptions;

    use crate::env::{PRESS_BOUND_ATTR, PRESSABLE_SELECTOR};
    use crate::ui::dom::{on_with_options, select_all};

    const RELEASE_EVENTS: [&str; 4] = ["pointerup", "pointercancel", "pointerleave", "blur"];

    let options = AddEventListenerOptions::new();
    options.set_passive(true);

    for el in select_all(doc, PRESSABLE_SELECTOR) {
        if !needs_binding(el.get_attribute(PRESS_BOUND_ATTR).as_deref()) {
            continue;
        }
        el.set_attribute(PRESS_BOUND_ATTR, "1")?;
        el.class_list().add_1("interactive-press")?;

        let pressed = el.clone();
        on_with_options(&el, "pointerdown", &options, move |_| {
            let _ = pressed.class_list().add_1("is-pressed");
        })?;
        for event in RELEASE_EVENTS {
            let released = el.clone();
            on_with_options(&el, event, &options, move |_| {
                let _ = released.class_list().remove_1("is-pressed");
            })?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bound_marker_prevents_rebinding() {
        assert!(needs_binding(None));
        assert!(needs_binding(Some("")));
        assert!(!needs_binding(Some("1")));
    }
}
