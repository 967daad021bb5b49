// UI state shared by both pages. Everything here is plain data so the
// transitions can be tested without a browser.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub const fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub const fn from_prefers_dark(prefers_dark: bool) -> Self {
        if prefers_dark { Theme::Dark } else { Theme::Light }
    }

    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Ukrainian,
    Russian,
    English,
}

const LOCALE_LANGUAGE_CODES: [(&[&str], Language); 3] = [
    (&["uk", "ua", "ukr"], Language::Ukrainian),
    (&["ru", "rus"], Language::Russian),
    (&["en", "eng"], Language::English),
];

impl Language {
    pub const PRIMARY: Language = Language::Ukrainian;
    pub const ALL: [Language; 3] = [Language::Ukrainian, Language::Russian, Language::English];

    pub const fn code(self) -> &'static str {
        match self {
            Language::Ukrainian => "uk",
            Language::Russian => "ru",
            Language::English => "en",
        }
    }

    /// Parse a language code or locale token (`en`, `en-US`, `uk_UA.UTF-8`).
    pub fn parse(token: &str) -> Option<Self> {
        let normalized = token
            .trim()
            .split(['.', '@'])
            .next()
            .unwrap_or(token)
            .replace('-', "_")
            .to_ascii_lowercase();
        let language_code = normalized.split('_').next().unwrap_or(&normalized);

        LOCALE_LANGUAGE_CODES.iter().find_map(|(codes, language)| {
            codes
                .iter()
                .any(|code| *code == language_code)
                .then_some(*language)
        })
    }

    /// Unknown or missing values resolve to the primary language.
    pub fn parse_or_primary(token: Option<&str>) -> Self {
        token.and_then(Self::parse).unwrap_or(Self::PRIMARY)
    }
}

/// Which selector control is active for `active`: exactly one `true`.
pub fn selector_states(active: Language) -> [(Language, bool); 3] {
    Language::ALL.map(|language| (language, language == active))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Overview,
    Features,
    Info,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Overview, Tab::Features, Tab::Info];

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "overview" => Some(Tab::Overview),
            "features" => Some(Tab::Features),
            "info" => Some(Tab::Info),
            _ => None,
        }
    }

    pub const fn panel_id(self) -> &'static str {
        match self {
            Tab::Overview => "tab-overview",
            Tab::Features => "tab-features",
            Tab::Info => "tab-info",
        }
    }
}

/// Panel visibility after selecting `selected`; all others are hidden.
pub fn panel_visibility(selected: Tab) -> [(Tab, bool); 3] {
    Tab::ALL.map(|tab| (tab, tab == selected))
}

/// Modal image viewer over an ordered list of URLs. An empty list means the
/// viewer is closed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LightboxState {
    list: Vec<String>,
    index: usize,
}

impl LightboxState {
    pub fn is_open(&self) -> bool {
        !self.list.is_empty()
    }

    pub fn index(&self) -> Option<usize> {
        self.is_open().then_some(self.index)
    }

    pub fn current(&self) -> Option<&str> {
        self.list.get(self.index).map(String::as_str)
    }

    /// Show `list` at `index`. An empty list is ignored. Out-of-range
    /// indices wrap by one step: below zero to the last image, past the end
    /// to the first.
    pub fn open(&mut self, list: Vec<String>, index: isize) {
        if list.is_empty() {
            return;
        }
        let len = list.len();
        self.index = if index < 0 {
            len - 1
        } else if index as usize >= len {
            0
        } else {
            index as usize
        };
        self.list = list;
    }

    pub fn close(&mut self) {
        self.list.clear();
        self.index = 0;
    }

    pub fn step(&mut self, delta: isize) {
        if !self.is_open() {
            return;
        }
        let list = std::mem::take(&mut self.list);
        let target = self.index as isize + delta;
        self.open(list, target);
    }
}
