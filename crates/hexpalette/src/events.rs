use crate::trackables::TrackableId;

/// A value being set in the model. `previous_value == value` marks a
/// zero-delta refresh rather than a user-facing change.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeEvent {
    pub id: TrackableId,
    pub previous_value: f64,
    pub value: f64,
}

impl ChangeEvent {
    pub fn is_change(&self) -> bool {
        self.previous_value != self.value
    }
}
