use std::collections::HashMap;
use std::fmt;

use log::debug;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::engine::state::Language;

/// Per-language values keyed by language code (`uk`, `ru`, `en`).
///
/// Entries that do not decode as `T` (a `null`, a number where text is
/// expected) are dropped and read as absent. A non-object value is empty.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Localized<T>(HashMap<String, T>);

impl<'de, T: DeserializeOwned> Deserialize<'de> for Localized<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = match Value::deserialize(deserializer)? {
            Value::Object(map) => map
                .into_iter()
                .filter_map(|(code, value)| {
                    serde_json::from_value(value).ok().map(|value| (code, value))
                })
                .collect(),
            _ => HashMap::new(),
        };
        Ok(Self(entries))
    }
}

impl<T> Localized<T> {
    pub fn get(&self, language: Language) -> Option<&T> {
        self.0.get(language.code())
    }
}

impl Localized<String> {
    /// Text for `language`; absent values become an empty string.
    pub fn text(&self, language: Language) -> &str {
        self.get(language).map(String::as_str).unwrap_or_default()
    }

    /// Non-empty text for `language`.
    pub fn non_empty(&self, language: Language) -> Option<&str> {
        self.get(language)
            .map(String::as_str)
            .filter(|text| !text.is_empty())
    }
}

impl<T, const N: usize> From<[(&str, T); N]> for Localized<T> {
    fn from(entries: [(&str, T); N]) -> Self {
        Self(entries.into_iter().map(|(k, v)| (k.to_owned(), v)).collect())
    }
}

/// Field decoders that degrade loosely-typed catalog values instead of
/// failing the whole file.
mod lenient {
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    use super::MetricValue;

    fn scalar_text(value: Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    pub fn opt_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Value::deserialize(d).map(scalar_text)
    }

    pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Value::deserialize(d).map(|value| scalar_text(value).unwrap_or_default())
    }

    /// Truthiness: `null`, `false`, `0` and `""` are off.
    pub fn flag<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Null => false,
            Value::Bool(b) => b,
            Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
            Value::String(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) => true,
        })
    }

    pub fn metric<'de, D: Deserializer<'de>>(d: D) -> Result<Option<MetricValue>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Number(n) => n.as_f64().map(MetricValue::Number),
            Value::String(s) => Some(MetricValue::Text(s)),
            _ => None,
        })
    }

    pub fn optional<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        Value::deserialize(d).map(|value| serde_json::from_value(value).ok())
    }

    pub fn or_default<'de, D, T>(d: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned + Default,
    {
        Value::deserialize(d).map(|value| serde_json::from_value(value).unwrap_or_default())
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct AppInfo {
    #[serde(deserialize_with = "lenient::opt_text")]
    pub min_android: Option<String>,
    #[serde(deserialize_with = "lenient::opt_text")]
    pub size: Option<String>,
    #[serde(deserialize_with = "lenient::flag")]
    pub in_app: bool,
    #[serde(deserialize_with = "lenient::flag")]
    pub offline: bool,
    #[serde(deserialize_with = "lenient::opt_text")]
    pub updated: Option<String>,
    pub privacy: Localized<String>,
    pub data: Localized<String>,
}

/// Ratings and install counts appear as numbers or pre-formatted strings.
#[derive(Clone, Debug, PartialEq)]
pub enum MetricValue {
    Number(f64),
    Text(String),
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Number(n) => write!(f, "{n}"),
            MetricValue::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Metrics {
    #[serde(deserialize_with = "lenient::metric")]
    pub rating: Option<MetricValue>,
    #[serde(deserialize_with = "lenient::metric")]
    pub installs: Option<MetricValue>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct AppRecord {
    pub title: Localized<String>,
    /// Card description on the listing page.
    pub desc: Localized<String>,
    /// Hero description on the detail page.
    pub short: Localized<String>,
    pub long: Localized<String>,
    pub category: Localized<String>,
    pub features: Localized<Vec<String>>,
    #[serde(deserialize_with = "lenient::opt_text")]
    pub icon: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub link: String,
    #[serde(deserialize_with = "lenient::flag")]
    pub is_top: bool,
    #[serde(deserialize_with = "lenient::flag")]
    pub is_new: bool,
    #[serde(deserialize_with = "lenient::or_default")]
    pub info: AppInfo,
    #[serde(deserialize_with = "lenient::optional")]
    pub metrics: Option<Metrics>,
    #[serde(deserialize_with = "lenient::opt_text")]
    pub fallback: Option<String>,
}

impl AppRecord {
    pub const DEFAULT_TITLE: &'static str = "App";
    pub const DEFAULT_FALLBACK: &'static str = "APP";

    /// `title[lang]`, then the primary-language title, then a literal.
    pub fn display_title(&self, language: Language) -> &str {
        self.title
            .non_empty(language)
            .or_else(|| self.title.non_empty(Language::PRIMARY))
            .unwrap_or(Self::DEFAULT_TITLE)
    }

    pub fn fallback_label(&self) -> &str {
        self.fallback
            .as_deref()
            .filter(|label| !label.is_empty())
            .unwrap_or(Self::DEFAULT_FALLBACK)
    }

    pub fn feature_list(&self, language: Language) -> &[String] {
        self.features.get(language).map(Vec::as_slice).unwrap_or_default()
    }
}

/// Display order plus the id → record table.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Catalog {
    pub order: Vec<String>,
    pub by_id: HashMap<String, AppRecord>,
}

impl Catalog {
    pub fn get(&self, id: &str) -> Option<&AppRecord> {
        self.by_id.get(id)
    }

    /// Records in display order. Ids without a record are skipped.
    pub fn ordered(&self) -> impl Iterator<Item = (&str, &AppRecord)> {
        self.order.iter().filter_map(|id| match self.by_id.get(id) {
            Some(record) => Some((id.as_str(), record)),
            None => {
                debug!("catalog: skipping unknown id {id:?}");
                None
            }
        })
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct ScreenshotSet(HashMap<String, Localized<Vec<String>>>);

impl ScreenshotSet {
    /// Screenshot URLs for an app in `language`; absence means none.
    pub fn for_app(&self, id: &str, language: Language) -> &[String] {
        self.0
            .get(id)
            .and_then(|by_lang| by_lang.get(language))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// `lang → key → value`. Only string values count as translations.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct TranslationTable(HashMap<String, HashMap<String, Value>>);

impl TranslationTable {
    pub fn lookup(&self, language: Language, key: &str) -> Option<&str> {
        self.0
            .get(language.code())
            .and_then(|strings| strings.get(key))
            .and_then(Value::as_str)
    }
}
