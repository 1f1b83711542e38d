use serde::Serialize;

/// Fixed directory of store keys and display labels. One entry per retail
/// location; each key owns an isolated persisted slot.
pub const DIRECTORY: &[(&str, &str)] = &[
    ("toyota-morumbi", "Toyota Morumbi"),
    ("toyota-nacoes", "Toyota Nações"),
    ("hyundai-barra-funda", "Hyundai Barra Funda"),
    ("hyundai-guarulhos", "Hyundai Guarulhos"),
    ("byd-ibirapuera", "BYD Ibirapuera"),
    ("byd-alphaville", "BYD Alphaville"),
];

pub const DEFAULT_LABEL: &str = "Loja Padrão";

/// Accent-folded, lowercased, dash-separated form of a store key or label.
pub fn slugify(raw: &str) -> String {
    slug::slugify(raw)
}

/// The resolved active tenant: slug plus display label. The scoring engine
/// never inspects ambient context; callers resolve the tenant explicitly and
/// pass it in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Store {
    slug: String,
    label: String,
}

impl Store {
    /// Resolves a raw tenant parameter. Known keys (matched after slug
    /// folding, so `Toyota Nações` works) get their directory label; unknown
    /// keys keep their own slot under the default label; an empty parameter
    /// maps to the shared `default` slot.
    pub fn resolve(raw: &str) -> Self {
        let slug = slugify(raw);
        let label = DIRECTORY
            .iter()
            .find(|(key, _)| *key == slug)
            .map(|(_, label)| (*label).to_string())
            .unwrap_or_else(|| DEFAULT_LABEL.to_string());
        Self { slug, label }
    }

    pub fn default_store() -> Self {
        Self::resolve("")
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// The persisted-slot key. Distinct tenants never share slots.
    pub fn slot(&self) -> &str {
        if self.slug.is_empty() {
            "default"
        } else {
            &self.slug
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_keys_resolve_to_directory_labels() {
        let store = Store::resolve("toyota-nacoes");
        assert_eq!(store.label(), "Toyota Nações");
        assert_eq!(store.slot(), "toyota-nacoes");
    }

    #[test]
    fn accented_labels_fold_to_their_key() {
        let store = Store::resolve("Toyota Nações");
        assert_eq!(store.label(), "Toyota Nações");
        assert_eq!(store.slot(), "toyota-nacoes");
    }

    #[test]
    fn unknown_keys_fall_back_to_the_default_label() {
        let store = Store::resolve("fiat-mooca");
        assert_eq!(store.label(), DEFAULT_LABEL);
        assert_eq!(store.slot(), "fiat-mooca");
    }

    #[test]
    fn absent_parameter_uses_the_default_slot() {
        let store = Store::default_store();
        assert_eq!(store.label(), DEFAULT_LABEL);
        assert_eq!(store.slot(), "default");
    }

    #[test]
    fn slugify_strips_accents_and_punctuation() {
        assert_eq!(slugify("Ótimo"), "otimo");
        assert_eq!(slugify("  Hyundai  Barra Funda! "), "hyundai-barra-funda");
    }
}
