use derive_more::{AsRef, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    Deref,
    From,
    Into,
    AsRef,
)]
#[serde(transparent)]
pub struct TrackableId(String);

crate::impl_string_newtype!(TrackableId);

/// Attributes of one tracked quantity. Static per session; values live in
/// the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackableDef {
    pub description: String,
    /// Short text rendered alongside the cell instead of an icon.
    pub label: Option<String>,
    pub min: f64,
    pub max: Option<f64>,
    /// An on/off trackable; implies the value range [0, 1].
    pub toggle: bool,
    pub target: Option<f64>,
    /// The target is waived when every one of these is fulfilled.
    pub target_unless: Vec<TrackableId>,
    /// Inverse of `target_unless`, filled in by profile resolution:
    /// trackables whose goal display depends on this one.
    pub link: Vec<TrackableId>,
    /// Step sizes selectable per increment level.
    pub increment: Vec<f64>,
}

impl Default for TrackableDef {
    fn default() -> Self {
        Self {
            description: String::new(),
            label: None,
            min: 0.0,
            max: None,
            toggle: false,
            target: None,
            target_unless: Vec::new(),
            link: Vec::new(),
            increment: vec![1.0],
        }
    }
}

impl TrackableDef {
    pub fn effective_max(&self) -> Option<f64> {
        if self.toggle { Some(1.0) } else { self.max }
    }

    pub fn effective_min(&self) -> f64 {
        if self.toggle { 0.0 } else { self.min }
    }
}

pub type TrackableSet = BTreeMap<TrackableId, TrackableDef>;

fn spell(description: &str) -> TrackableDef {
    TrackableDef {
        description: description.to_string(),
        max: Some(30.0),
        ..Default::default()
    }
}

fn weapon(description: &str) -> TrackableDef {
    TrackableDef {
        description: description.to_string(),
        max: Some(5.0),
        ..Default::default()
    }
}

/// Base definitions of every trackable the palette supports. Profiles
/// override these per run category.
pub fn base_catalog() -> TrackableSet {
    let mut catalog = TrackableSet::new();
    let mut add = |id: &str, def: TrackableDef| {
        catalog.insert(TrackableId::new(id), def);
    };

    add("foie", spell("Foie"));
    add("barta", spell("Barta"));
    add("zonde", spell("Zonde"));
    add("gifoie", spell("Gifoie"));
    add("gibarta", spell("Gibarta"));
    add("gizonde", spell("Gizonde"));
    add("rafoie", spell("Rafoie"));
    add("rabarta", spell("Rabarta"));
    add("razonde", spell("Razonde"));
    add(
        "grants-damage",
        TrackableDef {
            description: "Grants Damage Taken".to_string(),
            max: Some(311.0),
            increment: vec![1.0, 15.55],
            ..Default::default()
        },
    );
    add(
        "hp",
        TrackableDef {
            description: "HP Boost".to_string(),
            label: Some("HP+".to_string()),
            max: Some(650.0),
            increment: vec![1.0, 2.0, 10.0],
            ..Default::default()
        },
    );
    add(
        "mst",
        TrackableDef {
            description: "MST Boost".to_string(),
            label: Some("MST+".to_string()),
            max: Some(1100.0),
            increment: vec![1.0, 2.0, 5.0],
            ..Default::default()
        },
    );
    add(
        "atp",
        TrackableDef {
            description: "ATP Boost".to_string(),
            label: Some("ATP+".to_string()),
            max: Some(1100.0),
            increment: vec![1.0, 2.0, 5.0],
            ..Default::default()
        },
    );
    add(
        "ata",
        TrackableDef {
            description: "ATA Boost".to_string(),
            label: Some("ATA+".to_string()),
            max: Some(200.0),
            increment: vec![0.5, 1.0],
            ..Default::default()
        },
    );
    add(
        "slots",
        TrackableDef {
            description: "Frame Slots".to_string(),
            max: Some(4.0),
            ..Default::default()
        },
    );
    add(
        "barrier",
        TrackableDef {
            description: "Barrier Obtained?".to_string(),
            toggle: true,
            ..Default::default()
        },
    );
    add(
        "souleater",
        TrackableDef {
            description: "Soul Eater".to_string(),
            toggle: true,
            ..Default::default()
        },
    );
    add("saber", weapon("Saber"));
    add("dagger", weapon("Dagger"));
    add("sword", weapon("Sword"));
    add("partisan", weapon("Partisan"));
    add("handgun", weapon("Handgun"));
    add("mechgun", weapon("Mechgun"));
    add("shot", weapon("Shot"));
    add(
        "scape",
        TrackableDef {
            description: "Scape Doll".to_string(),
            label: Some("Scape Doll".to_string()),
            ..Default::default()
        },
    );

    catalog
}
