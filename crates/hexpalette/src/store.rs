use crate::config::TrackerConfig;
use crate::model::{Model, ModelError};
use crate::profiles::ProfileKey;
use crate::trackables::TrackableId;
use directories::ProjectDirs;
use fs_err as fs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;

/// Everything persisted between sessions: the configuration the values
/// were recorded under, and the values themselves.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SaveData {
    pub configuration: Option<TrackerConfig>,
    #[serde(default)]
    pub values: BTreeMap<TrackableId, f64>,
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to determine data directory")]
    DataDirNotFound,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// File-backed persistence for [`SaveData`]. The store knows nothing
/// about trackables; validation happens in [`Model::restore`].
#[derive(Debug, Clone)]
pub struct SaveStore {
    path: PathBuf,
}

impl SaveStore {
    pub fn open_default() -> Result<Self, StoreError> {
        let proj_dirs = ProjectDirs::from("org", "hexpalette", "hexpalette")
            .ok_or(StoreError::DataDirNotFound)?;
        Ok(Self::at(proj_dirs.data_dir().join("save.json")))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Read the save file. A missing file is not an error, just an empty
    /// history.
    pub fn load(&self) -> Result<Option<SaveData>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, data: &SaveData) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(data)?)?;
        Ok(())
    }

    pub fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Apply saved values to a model, but only when they were recorded under
/// the active profile; values from another profile are ignored rather
/// than misapplied. Unknown ids in a matching save still surface as
/// [`ModelError::UnknownTrackable`].
pub fn apply_saved_values(
    model: &mut Model,
    data: &SaveData,
    profile: &ProfileKey,
) -> Result<bool, ModelError> {
    match &data.configuration {
        Some(configuration) if configuration.profile == *profile && !data.values.is_empty() => {
            model.restore(&data.values)?;
            Ok(true)
        }
        _ => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trackables::TrackableDef;

    fn id(s: &str) -> TrackableId {
        TrackableId::new(s)
    }

    #[test]
    fn test_save_data_round_trips_through_json() {
        let data = SaveData {
            configuration: Some(TrackerConfig {
                profile: ProfileKey::new("ep2-glitchless-force"),
                layout: 1,
                ..Default::default()
            }),
            values: vec![(id("foie"), 3.0), (id("ata"), 0.5)].into_iter().collect(),
        };

        let raw = serde_json::to_string_pretty(&data).unwrap();
        let back: SaveData = serde_json::from_str(&raw).unwrap();
        assert_eq!(back, data);
    }

    #[test]
    fn test_saved_values_only_apply_to_matching_profile() {
        let mut model = Model::new();
        model.initialize(
            vec![(id("hp"), TrackableDef::default())].into_iter().collect(),
        );

        let data = SaveData {
            configuration: Some(TrackerConfig {
                profile: ProfileKey::new("other-profile"),
                ..Default::default()
            }),
            values: vec![(id("hp"), 9.0)].into_iter().collect(),
        };

        let applied =
            apply_saved_values(&mut model, &data, &ProfileKey::new("active-profile")).unwrap();
        assert!(!applied);
        assert_eq!(model.value(&id("hp")).unwrap(), 0.0);

        let applied =
            apply_saved_values(&mut model, &data, &ProfileKey::new("other-profile")).unwrap();
        assert!(applied);
        assert_eq!(model.value(&id("hp")).unwrap(), 9.0);
    }

    #[test]
    fn test_stale_save_is_rejected() {
        let mut model = Model::new();
        model.initialize(
            vec![(id("hp"), TrackableDef::default())].into_iter().collect(),
        );

        let data = SaveData {
            configuration: Some(TrackerConfig::default()),
            values: vec![(id("removed"), 2.0)].into_iter().collect(),
        };

        let result = apply_saved_values(
            &mut model,
            &data,
            &TrackerConfig::default().profile,
        );
        assert_eq!(result, Err(ModelError::UnknownTrackable(id("removed"))));
    }
}
