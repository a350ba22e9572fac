use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Card — one printing as returned by Scryfall's card endpoints
// ---------------------------------------------------------------------------

/// A single card printing.
///
/// Only the identifying fields and the image/face data are typed; every other
/// field Scryfall returns is kept verbatim in `extra` so that a saved deck
/// round-trips the full record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub name: String,
    /// Set code as Scryfall reports it (lower case, e.g. `"ice"`).
    pub set: String,
    /// Collector number; not necessarily numeric (`"123a"`, `"★12"`).
    pub collector_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mana_cost: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_line: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_uris: Option<ImageUris>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_faces: Option<Vec<CardFace>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Card {
    /// Create a bare card record with only its identifying fields set.
    pub fn new(
        name: impl Into<String>,
        set: impl Into<String>,
        collector_number: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            set: set.into(),
            collector_number: collector_number.into(),
            id: None,
            layout: None,
            mana_cost: None,
            type_line: None,
            image_uris: None,
            card_faces: None,
            extra: serde_json::Map::new(),
        }
    }

    /// The set code in the upper-case form used by deck lists.
    pub fn set_code(&self) -> String {
        self.set.to_uppercase()
    }

    /// `normal`-size image URLs for displaying this card.
    ///
    /// Split and double-faced cards yield one URL per face when every face
    /// carries its own images; everything else yields the single card image.
    pub fn image_urls(&self) -> Vec<&str> {
        if let Some(faces) = &self.card_faces {
            if !faces.is_empty() && faces.iter().all(|f| f.image_uris.is_some()) {
                return faces
                    .iter()
                    .filter_map(|f| f.image_uris.as_ref())
                    .filter_map(|uris| uris.normal.as_deref())
                    .collect();
            }
        }
        self.image_uris
            .as_ref()
            .and_then(|uris| uris.normal.as_deref())
            .into_iter()
            .collect()
    }

    /// True for layouts whose faces are printed on two sides of the card.
    pub fn is_double_faced(&self) -> bool {
        self.layout
            .as_deref()
            .map(|l| l.contains("transform") || l.contains("modal_dfc"))
            .unwrap_or(false)
    }
}

// ---------------------------------------------------------------------------
// CardFace / ImageUris
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardFace {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mana_cost: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_line: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oracle_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_uris: Option<ImageUris>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageUris {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub small: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub large: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub png: Option<String>,
}
