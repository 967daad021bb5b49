use crate::engine::models::TranslationTable;
use crate::engine::state::Language;

/// Translation lookups for one language. Every accessor has an English
/// literal to fall back on when the table has no string for the key.
#[derive(Debug, Clone, Copy)]
pub struct I18n<'a> {
    table: &'a TranslationTable,
    language: Language,
}

impl<'a> I18n<'a> {
    #[must_use]
    pub const fn new(table: &'a TranslationTable, language: Language) -> Self {
        Self { table, language }
    }

    pub const fn language(self) -> Language {
        self.language
    }

    /// Raw lookup; `None` when the key is absent or not a string.
    pub fn lookup(self, key: &str) -> Option<&'a str> {
        self.table.lookup(self.language, key)
    }

    fn pick(self, key: &str, fallback: &'a str) -> &'a str {
        self.lookup(key).unwrap_or(fallback)
    }

    pub fn open_in_store(self) -> &'a str {
        self.pick("gp", "Open in Google Play")
    }

    pub fn view_details(self) -> &'a str {
        self.pick("details", "View details")
    }

    pub fn pill_top(self) -> &'a str {
        self.pick("pillTop", "Top")
    }

    pub fn pill_new(self) -> &'a str {
        self.pick("pillNew", "New")
    }

    pub fn info_category(self) -> &'a str {
        self.pick("infoCategory", "Category")
    }

    pub fn info_android(self) -> &'a str {
        self.pick("infoAndroid", "Android support")
    }

    pub fn info_size(self) -> &'a str {
        self.pick("infoSize", "Approx. size")
    }

    pub fn info_iap(self) -> &'a str {
        self.pick("infoIap", "In-app purchases")
    }

    pub fn info_offline(self) -> &'a str {
        self.pick("infoOffline", "Works offline")
    }

    pub fn info_updated(self) -> &'a str {
        self.pick("infoUpdated", "Roughly updated")
    }

    pub fn info_privacy(self) -> &'a str {
        self.pick("infoPrivacy", "Privacy")
    }

    pub fn info_data(self) -> &'a str {
        self.pick("infoData", "Data & safety")
    }

    pub fn yes_no(self, value: bool) -> &'a str {
        if value {
            self.pick("infoYes", "Yes")
        } else {
            self.pick("infoNo", "No")
        }
    }

    pub fn back_to_apps(self) -> &'a str {
        self.pick("backToApps", "← Back to apps list")
    }

    pub fn not_found(self) -> &'a str {
        self.pick("notFound", "App not found.")
    }

    pub fn back_to_main(self) -> &'a str {
        self.pick("backToMain", "Back to main page")
    }

    pub fn screenshots_label(self) -> &'a str {
        self.pick("screenshots", "Screenshots")
    }

    pub fn open_screenshot(self, number: usize) -> String {
        format!("{} {number}", self.pick("openShot", "Open screenshot"))
    }
}
