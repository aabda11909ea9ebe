//! Card/word catalog
//!
//! Loaded once per session from a static JSON document:
//!
//! ```json
//! {"cards": [{"id": "cat-1a2b3c4d", "word": "CAT", "imageUrl": "...", "type": "number"}]}
//! ```
//!
//! A catalog that fails to load is treated as empty so the games keep
//! running. Card management (add/remove, id generation) is used by the
//! catalog tooling.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Catalog could not be read or edited
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("invalid catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("catalog I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("card not found: {0}")]
    NotFound(String),
    #[error("card word is empty")]
    EmptyWord,
}

/// How a card's picture was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardKind {
    /// Cropped picture with the background removed
    #[default]
    Number,
    /// Photo of a face, used as-is
    Face,
}

/// A practice item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: String,
    pub word: String,
    #[serde(rename = "imageUrl", default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: CardKind,
}

/// The full card list
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub cards: Vec<CatalogItem>,
}

/// Build a card id: optional `face-` prefix, lowercase word, 8 hex chars
pub fn generate_card_id<R: Rng>(word: &str, kind: CardKind, rng: &mut R) -> String {
    let prefix = match kind {
        CardKind::Face => "face-",
        CardKind::Number => "",
    };
    let suffix: u32 = rng.random();
    format!("{}{}-{:08x}", prefix, word.trim().to_lowercase(), suffix)
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse, or log the failure and return an empty catalog
    pub fn load_or_empty(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(catalog) => {
                log::info!("Loaded catalog with {} cards", catalog.len());
                catalog
            }
            Err(e) => {
                log::warn!("Catalog unavailable, continuing with no cards: {}", e);
                Self::new()
            }
        }
    }

    /// Read a catalog file, empty on any failure
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_file(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => Self::load_or_empty(&json),
            Err(e) => {
                log::warn!("Cannot read catalog {}: {}", path.display(), e);
                Self::new()
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_file(&self, path: &std::path::Path) -> Result<(), CatalogError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, CatalogError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&CatalogItem> {
        self.cards.iter().find(|c| c.id == id)
    }

    /// Append a new card (word upper-cased) and return it
    pub fn add_card<R: Rng>(
        &mut self,
        word: &str,
        image_url: Option<String>,
        kind: CardKind,
        rng: &mut R,
    ) -> Result<&CatalogItem, CatalogError> {
        let word = word.trim().to_uppercase();
        if word.is_empty() {
            return Err(CatalogError::EmptyWord);
        }
        let card = CatalogItem {
            id: generate_card_id(&word, kind, rng),
            word,
            image_url,
            kind,
        };
        log::info!("Added card {} ({} total)", card.id, self.cards.len() + 1);
        self.cards.push(card);
        Ok(&self.cards[self.cards.len() - 1])
    }

    /// Remove a card by id
    pub fn remove_card(&mut self, id: &str) -> Result<CatalogItem, CatalogError> {
        let index = self
            .cards
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))?;
        Ok(self.cards.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    use super::*;

    const SAMPLE: &str = r#"{
        "cards": [
            {"id": "cat-00000001", "word": "CAT", "imageUrl": "https://img/cat.png", "type": "number"},
            {"id": "face-mum-00000002", "word": "MUM", "type": "face"},
            {"id": "sun-00000003", "word": "SUN"}
        ]
    }"#;

    #[test]
    fn test_parse_sample() {
        let catalog = Catalog::from_json(SAMPLE).unwrap();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.cards[0].image_url.as_deref(), Some("https://img/cat.png"));
        assert_eq!(catalog.cards[1].kind, CardKind::Face);
        assert_eq!(catalog.cards[2].kind, CardKind::Number);
        assert!(catalog.cards[2].image_url.is_none());
    }

    #[test]
    fn test_bad_json_loads_empty() {
        assert!(Catalog::load_or_empty("not json").is_empty());
        assert!(Catalog::load_or_empty("{}").is_empty());
    }

    #[test]
    #[cfg(not(target_arch = "wasm32"))]
    fn test_missing_file_loads_empty() {
        let catalog = Catalog::load_file(std::path::Path::new("/nonexistent/cards.json"));
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_generate_card_id() {
        let mut rng = Pcg32::seed_from_u64(1);
        let id = generate_card_id("Apple", CardKind::Number, &mut rng);
        assert!(id.starts_with("apple-"));
        assert_eq!(id.len(), "apple-".len() + 8);

        let face = generate_card_id("MUM", CardKind::Face, &mut rng);
        assert!(face.starts_with("face-mum-"));
    }

    #[test]
    fn test_add_and_remove() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut catalog = Catalog::from_json(SAMPLE).unwrap();

        let id = catalog
            .add_card(" dog ", None, CardKind::Number, &mut rng)
            .unwrap()
            .id
            .clone();
        assert_eq!(catalog.len(), 4);
        assert_eq!(catalog.get(&id).unwrap().word, "DOG");

        let removed = catalog.remove_card(&id).unwrap();
        assert_eq!(removed.word, "DOG");
        assert!(matches!(catalog.remove_card(&id), Err(CatalogError::NotFound(_))));
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn test_add_empty_word_rejected() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut catalog = Catalog::new();
        assert!(matches!(
            catalog.add_card("  ", None, CardKind::Face, &mut rng),
            Err(CatalogError::EmptyWord)
        ));
    }

    #[test]
    fn test_json_keeps_field_names() {
        let catalog = Catalog::from_json(SAMPLE).unwrap();
        let json = catalog.to_json().unwrap();
        assert!(json.contains("\"imageUrl\""));
        assert!(json.contains("\"type\": \"face\""));
        assert_eq!(Catalog::from_json(&json).unwrap(), catalog);
    }
}
