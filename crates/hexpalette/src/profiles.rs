use crate::trackables::{TrackableDef, TrackableId, TrackableSet};
use derive_more::{AsRef, Deref, Display, From, Into};
use hexgrid::geometry::HexCoord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

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
pub struct ProfileKey(String);

crate::impl_string_newtype!(ProfileKey);

/// Symbolic key code bound to a cell, in the layout's own vocabulary
/// (`Digit1`, `KeyQ`, ...). Interpreting it is the input layer's job.
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
pub struct ControlCode(String);

crate::impl_string_newtype!(ControlCode);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutEntry {
    pub coord: HexCoord,
    pub code: ControlCode,
}

/// Cells to show: trackable id to grid position and control code.
pub type Layout = BTreeMap<TrackableId, LayoutEntry>;

/// Per-profile adjustments layered over the base catalog attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackableOverride {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub toggle: Option<bool>,
    pub target: Option<f64>,
    pub target_unless: Vec<TrackableId>,
    pub increment: Option<Vec<f64>>,
}

impl TrackableOverride {
    fn apply(&self, base: &TrackableDef) -> TrackableDef {
        TrackableDef {
            description: base.description.clone(),
            label: base.label.clone(),
            min: self.min.unwrap_or(base.min),
            max: self.max.or(base.max),
            toggle: self.toggle.unwrap_or(base.toggle),
            target: self.target.or(base.target),
            target_unless: if self.target_unless.is_empty() {
                base.target_unless.clone()
            } else {
                self.target_unless.clone()
            },
            link: Vec::new(),
            increment: self
                .increment
                .clone()
                .unwrap_or_else(|| base.increment.clone()),
        }
    }
}

/// One run category: which trackables it uses (with overrides) and its
/// preset layouts.
#[derive(Debug, Clone)]
pub struct Profile {
    pub key: ProfileKey,
    pub name: String,
    pub trackables: BTreeMap<TrackableId, TrackableOverride>,
    pub layouts: Vec<Layout>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProfileError {
    #[error("profile '{profile}' references trackable '{id}' missing from the catalog")]
    UnknownTrackable { profile: ProfileKey, id: TrackableId },
    #[error("layout {layout} of profile '{profile}' places trackable '{id}' that the profile does not define")]
    UnknownLayoutTrackable {
        profile: ProfileKey,
        layout: usize,
        id: TrackableId,
    },
}

impl Profile {
    /// Merge the base catalog under this profile's overrides, build the
    /// link inverse of `target_unless`, and validate every reference. A
    /// mismatch between layouts and trackable definitions is a
    /// configuration error, never a silent default.
    pub fn resolve(&self, catalog: &TrackableSet) -> Result<TrackableSet, ProfileError> {
        let mut resolved = TrackableSet::new();
        for (id, over) in &self.trackables {
            let base = catalog
                .get(id)
                .ok_or_else(|| ProfileError::UnknownTrackable {
                    profile: self.key.clone(),
                    id: id.clone(),
                })?;
            resolved.insert(id.clone(), over.apply(base));
        }

        let edges: Vec<(TrackableId, Vec<TrackableId>)> = resolved
            .iter()
            .map(|(id, def)| (id.clone(), def.target_unless.clone()))
            .collect();
        for (id, unless) in edges {
            for other in unless {
                let entry =
                    resolved
                        .get_mut(&other)
                        .ok_or_else(|| ProfileError::UnknownTrackable {
                            profile: self.key.clone(),
                            id: other.clone(),
                        })?;
                entry.link.push(id.clone());
            }
        }

        for (index, layout) in self.layouts.iter().enumerate() {
            if let Some(id) = layout.keys().find(|id| !resolved.contains_key(*id)) {
                return Err(ProfileError::UnknownLayoutTrackable {
                    profile: self.key.clone(),
                    layout: index,
                    id: id.clone(),
                });
            }
        }
        Ok(resolved)
    }

    pub fn layout(&self, index: usize) -> Option<&Layout> {
        self.layouts.get(index)
    }
}

pub fn find_profile<'a>(profiles: &'a [Profile], key: &ProfileKey) -> Option<&'a Profile> {
    profiles.iter().find(|profile| profile.key == *key)
}

fn t(id: &str) -> TrackableId {
    TrackableId::new(id)
}

fn targeted(target: f64) -> TrackableOverride {
    TrackableOverride {
        target: Some(target),
        ..Default::default()
    }
}

fn entry(id: &str, col: i32, row: i32, code: &str) -> (TrackableId, LayoutEntry) {
    (
        t(id),
        LayoutEntry {
            coord: HexCoord::new(col, row),
            code: ControlCode::new(code),
        },
    )
}

/// The standard force-class spell block shared by the episode 1 and 2
/// profiles: gifoie's own target is waived once rafoie is learned.
fn force_spells() -> Vec<(TrackableId, TrackableOverride)> {
    vec![
        (
            t("foie"),
            TrackableOverride {
                min: Some(1.0),
                ..Default::default()
            },
        ),
        (t("barta"), targeted(1.0)),
        (t("zonde"), targeted(1.0)),
        (
            t("gifoie"),
            TrackableOverride {
                target: Some(1.0),
                target_unless: vec![t("rafoie")],
                ..Default::default()
            },
        ),
        (t("gibarta"), TrackableOverride::default()),
        (t("gizonde"), targeted(1.0)),
        (t("rafoie"), TrackableOverride::default()),
        (t("rabarta"), TrackableOverride::default()),
        (t("razonde"), TrackableOverride::default()),
        (t("mst"), TrackableOverride::default()),
    ]
}

/// The default force layout: spells in element rows, stats on the right.
fn force_layout() -> Layout {
    [
        entry("foie", 0, 0, "Digit1"),
        entry("gifoie", 1, 0, "Digit2"),
        entry("rafoie", 2, 0, "Digit3"),
        entry("mst", 3, 0, "Digit4"),
        entry("barta", 0, 1, "KeyQ"),
        entry("gibarta", 1, 1, "KeyW"),
        entry("rabarta", 2, 1, "KeyE"),
        entry("barrier", 3, 1, "KeyR"),
        entry("slots", 3, 2, "KeyF"),
        entry("zonde", 0, 2, "KeyA"),
        entry("gizonde", 1, 2, "KeyS"),
        entry("razonde", 2, 2, "KeyD"),
        entry("hp", 2, 3, "KeyC"),
    ]
    .into_iter()
    .collect()
}

/// Compact force layout with the spell triangle rotated into columns.
fn force_column_layout() -> Layout {
    [
        entry("zonde", 0, 1, "Digit1"),
        entry("barta", 1, 0, "Digit2"),
        entry("foie", 2, 0, "Digit3"),
        entry("gizonde", 0, 2, "KeyQ"),
        entry("gibarta", 1, 1, "KeyW"),
        entry("gifoie", 2, 1, "KeyE"),
        entry("razonde", 0, 3, "KeyA"),
        entry("rabarta", 1, 2, "KeyS"),
        entry("rafoie", 2, 2, "KeyD"),
        entry("hp", 0, 4, "KeyZ"),
        entry("slots", 1, 3, "KeyX"),
        entry("barrier", 2, 3, "KeyC"),
        entry("mst", 2, 4, "KeyV"),
    ]
    .into_iter()
    .collect()
}

fn hunter_row_layout() -> Layout {
    [
        entry("saber", 0, 0, "Digit1"),
        entry("dagger", 1, 0, "Digit2"),
        entry("sword", 2, 0, "Digit3"),
        entry("partisan", 3, 0, "Digit4"),
        entry("handgun", 0, 1, "KeyQ"),
        entry("mechgun", 1, 1, "KeyW"),
        entry("ata", 2, 1, "KeyE"),
        entry("atp", 3, 1, "KeyR"),
    ]
    .into_iter()
    .collect()
}

fn hunter_column_layout() -> Layout {
    [
        entry("saber", 0, 0, "Digit1"),
        entry("dagger", 0, 1, "Digit2"),
        entry("sword", 0, 2, "Digit3"),
        entry("partisan", 0, 3, "Digit4"),
        entry("handgun", 0, 4, "KeyQ"),
    ]
    .into_iter()
    .collect()
}

/// Built-in run-category profiles. Constructed fresh per call; the
/// registry belongs to whoever asked for it.
pub fn builtin_profiles() -> Vec<Profile> {
    vec![
        Profile {
            key: ProfileKey::new("ep1-glitchless-any%-fonewm"),
            name: "Episode 1 Glitchless Any% FOnewm".to_string(),
            trackables: force_spells()
                .into_iter()
                .chain([
                    (t("hp"), targeted(21.0)),
                    (
                        t("slots"),
                        TrackableOverride {
                            target: Some(2.0),
                            target_unless: vec![t("hp")],
                            ..Default::default()
                        },
                    ),
                    (t("barrier"), TrackableOverride::default()),
                ])
                .collect(),
            layouts: vec![force_layout(), force_column_layout()],
        },
        Profile {
            key: ProfileKey::new("ep2-glitchless-force"),
            name: "Episode 2 Glitchless Force".to_string(),
            trackables: force_spells()
                .into_iter()
                .map(|(id, mut over)| {
                    // episode 2 pushes the fire line further
                    if id.as_str() == "foie" {
                        over.target = Some(3.0);
                    } else if id.as_str() == "barta" {
                        over.target = Some(2.0);
                    } else if id.as_str() == "rafoie" || id.as_str() == "rabarta" {
                        over.target = Some(1.0);
                    }
                    (id, over)
                })
                .chain([
                    (t("hp"), targeted(31.0)),
                    (t("slots"), targeted(3.0)),
                    (t("barrier"), targeted(1.0)),
                    (t("scape"), TrackableOverride::default()),
                ])
                .collect(),
            layouts: vec![{
                let mut layout = force_layout();
                layout.extend([entry("scape", 4, 2, "KeyV")]);
                layout
            }],
        },
        Profile {
            key: ProfileKey::new("ep1-glitchless-any%-hucast"),
            name: "Episode 1 Glitchless Any% HUcast".to_string(),
            trackables: [
                (
                    t("saber"),
                    TrackableOverride {
                        min: Some(1.0),
                        target: Some(3.0),
                        ..Default::default()
                    },
                ),
                (t("dagger"), targeted(2.0)),
                (t("sword"), targeted(2.0)),
                (t("partisan"), targeted(1.0)),
                (t("handgun"), targeted(2.0)),
                (t("mechgun"), TrackableOverride::default()),
                (t("ata"), TrackableOverride::default()),
                (t("atp"), TrackableOverride::default()),
            ]
            .into_iter()
            .collect(),
            layouts: vec![hunter_row_layout(), hunter_column_layout()],
        },
        Profile {
            key: ProfileKey::new("ep1-glitchless-true-dark-falz"),
            name: "Episode 1 Glitchless True Dark Falz HUcast".to_string(),
            trackables: [
                (
                    t("saber"),
                    TrackableOverride {
                        min: Some(1.0),
                        target: Some(4.0),
                        ..Default::default()
                    },
                ),
                (t("dagger"), targeted(3.0)),
                (t("sword"), targeted(3.0)),
                (t("partisan"), targeted(3.0)),
                (t("handgun"), targeted(4.0)),
                (t("hp"), targeted(10.0)),
                (t("slots"), targeted(3.0)),
                (t("grants-damage"), TrackableOverride::default()),
                (t("ata"), TrackableOverride::default()),
                (t("atp"), TrackableOverride::default()),
            ]
            .into_iter()
            .collect(),
            layouts: vec![
                {
                    let mut layout = hunter_row_layout();
                    layout.remove(&t("mechgun"));
                    layout.extend([
                        entry("hp", 1, 1, "KeyW"),
                        entry("slots", 4, 0, "Digit5"),
                        entry("grants-damage", 4, 1, "KeyT"),
                    ]);
                    layout
                },
                hunter_column_layout(),
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trackables::base_catalog;

    #[test]
    fn test_builtin_profiles_resolve() {
        let catalog = base_catalog();
        for profile in builtin_profiles() {
            let resolved = profile.resolve(&catalog).unwrap();
            assert!(!profile.layouts.is_empty(), "{} has no layouts", profile.key);
            for layout in &profile.layouts {
                assert!(layout.keys().all(|id| resolved.contains_key(id)));
            }
        }
    }

    #[test]
    fn test_resolve_builds_link_inverse() {
        let catalog = base_catalog();
        let profiles = builtin_profiles();
        let fonewm = find_profile(&profiles, &ProfileKey::new("ep1-glitchless-any%-fonewm"))
            .expect("profile exists");
        let resolved = fonewm.resolve(&catalog).unwrap();

        // gifoie targetUnless [rafoie] inverts onto rafoie.link
        assert_eq!(resolved[&t("rafoie")].link, vec![t("gifoie")]);
        assert_eq!(resolved[&t("hp")].link, vec![t("slots")]);
        // merged base attributes survive the override
        assert_eq!(resolved[&t("gifoie")].max, Some(30.0));
        assert_eq!(resolved[&t("foie")].min, 1.0);
    }

    #[test]
    fn test_resolve_rejects_unknown_references() {
        let catalog = base_catalog();
        let profile = Profile {
            key: ProfileKey::new("broken"),
            name: "Broken".to_string(),
            trackables: [(t("no-such-item"), TrackableOverride::default())]
                .into_iter()
                .collect(),
            layouts: Vec::new(),
        };
        assert!(matches!(
            profile.resolve(&catalog),
            Err(ProfileError::UnknownTrackable { id, .. }) if id == t("no-such-item")
        ));
    }

    #[test]
    fn test_resolve_rejects_layout_mismatch() {
        let catalog = base_catalog();
        let profile = Profile {
            key: ProfileKey::new("mismatch"),
            name: "Mismatch".to_string(),
            trackables: [(t("hp"), TrackableOverride::default())]
                .into_iter()
                .collect(),
            layouts: vec![[entry("mst", 0, 0, "Digit1")].into_iter().collect()],
        };
        assert!(matches!(
            profile.resolve(&catalog),
            Err(ProfileError::UnknownLayoutTrackable { layout: 0, id, .. }) if id == t("mst")
        ));
    }
}
