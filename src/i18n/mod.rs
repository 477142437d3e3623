//! Localization
//!
//! Flat key → template catalogs for English and Tamil, embedded at compile
//! time. Templates carry `{{name}}` placeholders. Lookups fall back from
//! the requested locale to English, and finally to the key itself, so a
//! missing translation never breaks a response.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const EN_JSON: &str = include_str!("../../locales/en.json");
const TA_JSON: &str = include_str!("../../locales/ta.json");

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ta,
}

#[derive(Clone, Debug)]
pub struct Localizer {
    en: HashMap<String, String>,
    ta: HashMap<String, String>,
}

impl Localizer {
    pub fn new() -> Result<Self, serde_json::Error> {
        Ok(Self {
            en: serde_json::from_str(EN_JSON)?,
            ta: serde_json::from_str(TA_JSON)?,
        })
    }

    fn catalog(&self, locale: Locale) -> &HashMap<String, String> {
        match locale {
            Locale::En => &self.en,
            Locale::Ta => &self.ta,
        }
    }

    /// Look up `key`, substituting `{{placeholder}}` occurrences from
    /// `args`. Unknown placeholders are left in place, like unknown keys.
    pub fn translate(&self, locale: Locale, key: &str, args: &[(&str, String)]) -> String {
        let template = self
            .catalog(locale)
            .get(key)
            .or_else(|| self.en.get(key))
            .map(String::as_str)
            .unwrap_or(key);
        let mut text = template.to_string();
        for (name, value) in args {
            text = text.replace(&format!("{{{{{name}}}}}"), value);
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn localizer() -> Localizer {
        Localizer::new().unwrap()
    }

    #[test]
    fn test_plain_lookup_in_both_locales() {
        let l = localizer();
        assert_eq!(l.translate(Locale::En, "status_Delivered", &[]), "Delivered");
        assert_eq!(l.translate(Locale::Ta, "status_Delivered", &[]), "வழங்கப்பட்டது");
    }

    #[test]
    fn test_placeholder_substitution() {
        let l = localizer();
        let text = l.translate(Locale::En, "auth_welcome", &[("name", "Saravana".into())]);
        assert_eq!(text, "Welcome back, Saravana!");
    }

    #[test]
    fn test_multiple_placeholders() {
        let l = localizer();
        let text = l.translate(
            Locale::En,
            "orders_updated",
            &[("orderId", "ab12cd3".into()), ("status", "Packed".into())],
        );
        assert_eq!(text, "Order ab12cd3 is now Packed.");
    }

    #[test]
    fn test_missing_key_falls_back_to_key() {
        let l = localizer();
        assert_eq!(l.translate(Locale::Ta, "no_such_key", &[]), "no_such_key");
    }

    #[test]
    fn test_missing_tamil_entry_falls_back_to_english() {
        let mut l = localizer();
        l.ta.remove("status_Packed");
        assert_eq!(l.translate(Locale::Ta, "status_Packed", &[]), "Packed");
    }

    #[test]
    fn test_catalogs_cover_the_same_keys() {
        let l = localizer();
        let mut en_keys: Vec<&String> = l.en.keys().collect();
        let mut ta_keys: Vec<&String> = l.ta.keys().collect();
        en_keys.sort();
        ta_keys.sort();
        assert_eq!(en_keys, ta_keys);
    }
}
