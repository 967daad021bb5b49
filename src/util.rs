use chrono::Datelike;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Characters escaped by a URI component encoder (everything except
/// `A-Z a-z 0-9 - _ . ! ~ * ' ( )`).
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode a value for use inside a query string or data URI.
#[must_use]
pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

/// HTML-escape text for element content or a double-quoted attribute.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// SVG-escape text placed inside a `<text>` node.
fn escape_svg(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            _ => out.push(c),
        }
    }
    out
}

/// Placeholder icon used when an app icon is missing or fails to load.
#[must_use]
pub fn svg_fallback(label: &str) -> String {
    let svg = format!(
        "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 120 120'>\
         <defs><linearGradient id='g' x1='0' y1='0' x2='1' y2='1'>\
         <stop stop-color='#e9ecff'/><stop offset='1' stop-color='#cfd9ff'/>\
         </linearGradient></defs>\
         <rect width='100%' height='100%' rx='24' fill='url(#g)'/>\
         <text x='50%' y='54%' dominant-baseline='middle' text-anchor='middle' \
         font-size='44' fill='#1b4bff' font-family='Inter,Arial,system-ui'>{}</text>\
         </svg>",
        escape_svg(label)
    );
    format!("data:image/svg+xml,{}", encode_component(&svg))
}

#[must_use]
pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_like_a_uri_component() {
        assert_eq!(encode_component("notes-app_v2"), "notes-app_v2");
        assert_eq!(encode_component("a b&c=d"), "a%20b%26c%3Dd");
        assert_eq!(encode_component("ключ"), "%D0%BA%D0%BB%D1%8E%D1%87");
    }

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(
            escape_html("<b>\"Tom\" & 'Jerry'</b>"),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
        assert_eq!(escape_html("plain text"), "plain text");
    }

    #[test]
    fn fallback_icon_embeds_encoded_label() {
        let uri = svg_fallback("N&P");
        assert!(uri.starts_with("data:image/svg+xml,%3Csvg"));
        assert!(uri.contains(&encode_component(">N&amp;P</text>")));
        assert!(!uri.contains(' '));
    }

    #[test]
    fn year_is_plausible() {
        assert!(current_year() >= 2024);
    }
}
