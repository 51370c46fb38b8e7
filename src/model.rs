// Domain model - catalog entities and REST payloads
//
// These types are shared by the server (storage rows serialized to JSON),
// the client (JSON decoded into the same types) and the front-end pages.
// Field names match the wire format exactly.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Server-assigned identifier. The client never generates ids.
pub type Id = i64;

/// Name of the reserved feature that holds migrated categories
pub const CATEGORY_FEATURE: &str = "Categories";

/// Base color of the reserved category feature
pub const CATEGORY_FEATURE_COLOR: &str = "#808080";

/// Intensity of a feature type, applied to its feature's base color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shade {
    Light,
    #[default]
    Middle,
    Dark,
}

impl Shade {
    /// Alpha applied to the base color, as rendered in CSS
    pub fn alpha(self) -> f32 {
        match self {
            Shade::Light => 0.3,
            Shade::Middle => 0.6,
            Shade::Dark => 1.0,
        }
    }

    /// Wire name (also the storage representation)
    pub fn as_str(self) -> &'static str {
        match self {
            Shade::Light => "light",
            Shade::Middle => "middle",
            Shade::Dark => "dark",
        }
    }

    /// Parse the wire name, `None` for anything else
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "light" => Some(Shade::Light),
            "middle" => Some(Shade::Middle),
            "dark" => Some(Shade::Dark),
            _ => None,
        }
    }

    /// Single-letter chip label used in select mode
    pub fn initial(self) -> char {
        match self {
            Shade::Light => 'L',
            Shade::Middle => 'M',
            Shade::Dark => 'D',
        }
    }
}

impl fmt::Display for Shade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named sub-tag under a feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureType {
    pub id: Id,
    pub feature_id: Id,
    pub name: String,
    pub shade: Shade,
    /// 1-based position among the feature's types
    pub position: i64,
}

/// A named, colored group of feature types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub id: Id,
    pub name: String,
    /// Base color as `#RRGGBB`
    pub color: String,
    /// 1-based position among sibling features
    pub order: i64,
    #[serde(default)]
    pub types: Vec<FeatureType>,
}

impl Feature {
    pub fn find_type(&self, type_id: Id) -> Option<&FeatureType> {
        self.types.iter().find(|t| t.id == type_id)
    }
}

/// Flat tag of the simpler actor schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: Id,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub id: Id,
    pub name: String,
    /// RFC 3339 creation timestamp
    pub created_at: String,
    #[serde(default)]
    pub feature_types: Vec<FeatureType>,
}

/// Actor as embedded in a movie
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorRef {
    pub id: Id,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: Id,
    pub code: String,
    pub name: String,
    pub created_at: String,
    #[serde(default)]
    pub actors: Vec<ActorRef>,
    #[serde(default)]
    pub feature_types: Vec<FeatureType>,
}

/// Anything the client caches by id
pub trait Entity {
    fn id(&self) -> Id;
}

impl Entity for Actor {
    fn id(&self) -> Id {
        self.id
    }
}

impl Entity for Movie {
    fn id(&self) -> Id {
        self.id
    }
}

impl Entity for Feature {
    fn id(&self) -> Id {
        self.id
    }
}

impl Entity for Category {
    fn id(&self) -> Id {
        self.id
    }
}

/// Look up a feature type and its parent feature by type id
pub fn feature_for_type(features: &[Feature], type_id: Id) -> Option<(&Feature, &FeatureType)> {
    features
        .iter()
        .find_map(|f| f.find_type(type_id).map(|t| (f, t)))
}

// ─────────────────────────────────────────────────────────────────────────────
// Request payloads
// ─────────────────────────────────────────────────────────────────────────────

/// POST /api/actors
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewActor {
    pub name: String,
    #[serde(default)]
    pub feature_type_ids: Vec<Id>,
    /// Legacy schema; merged into `feature_type_ids` by the server
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub category_ids: Vec<Id>,
}

/// POST /api/categories
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
}

/// POST /api/features
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewFeature {
    pub name: String,
    pub color: String,
}

/// POST /api/feature-types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewFeatureType {
    pub feature_id: Id,
    pub name: String,
    #[serde(default)]
    pub shade: Shade,
}

/// PATCH /api/features/:id and /api/feature-types/:id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rename {
    pub name: String,
}

/// POST /api/features/reorder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReorderFeatures {
    pub feature_ids: Vec<Id>,
}

/// POST /api/movies
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewMovie {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub actor_ids: Vec<Id>,
    #[serde(default)]
    pub feature_type_ids: Vec<Id>,
}

/// Generic `{"message": ...}` acknowledgement body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
