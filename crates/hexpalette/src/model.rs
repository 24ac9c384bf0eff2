use crate::events::ChangeEvent;
use crate::trackables::{TrackableDef, TrackableId, TrackableSet};
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("trackable '{0}' is not defined in the model")]
    UnknownTrackable(TrackableId),
}

/// Goal state derived from the current value: the target to display (if
/// any) and whether the goal counts as met.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoalStatus {
    pub target_value: Option<f64>,
    pub fulfilled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverHandle(u64);

type Observer = Box<dyn FnMut(&ChangeEvent)>;

/// Single source of truth for current trackable values. Enforces bounds
/// by clamping, derives goal fulfillment, and notifies observers
/// synchronously in registration order. Linked re-evaluation runs inside
/// the triggering `set_value` call, so derived state is consistent by the
/// time it returns; observers see those nested events before the outer
/// one completes.
#[derive(Default)]
pub struct Model {
    defs: TrackableSet,
    values: BTreeMap<TrackableId, f64>,
    observers: Vec<(ObserverHandle, Observer)>,
    next_handle: u64,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the definition set and reset every value to its minimum.
    /// One change notification fires per key so per-key presentation
    /// state stays consistent.
    pub fn initialize(&mut self, defs: TrackableSet) {
        self.defs = defs;
        self.reset();
    }

    /// Reset all values to their minimums, notifying per key. The
    /// notifications carry no delta, so linked trackables are not bumped
    /// while the whole set is already being refreshed.
    pub fn reset(&mut self) {
        self.values.clear();
        let ids: Vec<TrackableId> = self.defs.keys().cloned().collect();
        for id in ids {
            let min = self.defs[&id].min;
            self.values.insert(id.clone(), min);
            self.notify(&ChangeEvent {
                id,
                previous_value: min,
                value: min,
            });
        }
    }

    pub fn definition(&self, id: &TrackableId) -> Result<&TrackableDef, ModelError> {
        self.defs
            .get(id)
            .ok_or_else(|| ModelError::UnknownTrackable(id.clone()))
    }

    pub fn definitions(&self) -> &TrackableSet {
        &self.defs
    }

    pub fn value(&self, id: &TrackableId) -> Result<f64, ModelError> {
        self.values
            .get(id)
            .copied()
            .ok_or_else(|| ModelError::UnknownTrackable(id.clone()))
    }

    /// Store a value and notify. When the value actually changed, every
    /// trackable linked to this one receives a zero-delta bump so its
    /// derived goal display refreshes; that bump does not count as a
    /// change of its own, which also terminates mutual links.
    pub fn set_value(&mut self, id: &TrackableId, value: f64) -> Result<(), ModelError> {
        if !self.values.contains_key(id) {
            return Err(ModelError::UnknownTrackable(id.clone()));
        }
        let previous = self.values.insert(id.clone(), value).unwrap_or(value);
        self.notify(&ChangeEvent {
            id: id.clone(),
            previous_value: previous,
            value,
        });

        if previous != value {
            let links = self.definition(id)?.link.clone();
            for linked in &links {
                self.bump(linked, 0.0)?;
            }
        }
        Ok(())
    }

    /// Add to a value, clamping at the effective bound on the side the
    /// change moves toward. Clamping is silent and idempotent.
    pub fn bump(&mut self, id: &TrackableId, amount: f64) -> Result<(), ModelError> {
        let (effective_min, effective_max) = {
            let def = self.definition(id)?;
            (def.effective_min(), def.effective_max())
        };
        let mut next = self.value(id)? + amount;
        if amount > 0.0 {
            if let Some(max) = effective_max
                && next > max
            {
                next = max;
            }
        } else if next < effective_min {
            next = effective_min;
        }
        self.set_value(id, next)
    }

    /// Bump by the step size at `level` in the increment sequence
    /// (clamped to the last entry), scaled by `factor`.
    pub fn increment_by_level(
        &mut self,
        id: &TrackableId,
        level: usize,
        factor: f64,
    ) -> Result<(), ModelError> {
        let amount = {
            let increment = &self.definition(id)?.increment;
            let index = level.min(increment.len().saturating_sub(1));
            increment.get(index).copied().unwrap_or(1.0)
        };
        self.bump(id, amount * factor)
    }

    pub fn goal_status(&self, id: &TrackableId) -> Result<GoalStatus, ModelError> {
        let mut visiting = HashSet::new();
        self.goal_status_guarded(id, &mut visiting)
    }

    fn goal_status_guarded(
        &self,
        id: &TrackableId,
        visiting: &mut HashSet<TrackableId>,
    ) -> Result<GoalStatus, ModelError> {
        let def = self.definition(id)?;
        let value = self.value(id)?;

        // A trackable already under evaluation counts as unfulfilled;
        // this is what keeps cyclic targetUnless references finite.
        if !visiting.insert(id.clone()) {
            return Ok(GoalStatus {
                target_value: def.target,
                fulfilled: false,
            });
        }

        let mut waived = !def.target_unless.is_empty();
        for other in &def.target_unless {
            let status = self.goal_status_guarded(other, visiting)?;
            if !status.fulfilled || self.value(other)? == 0.0 {
                waived = false;
                break;
            }
        }
        visiting.remove(id);

        let fulfilled = match def.target {
            Some(target) => waived || value >= target,
            None => waived || value >= 1.0,
        };
        Ok(GoalStatus {
            target_value: def.target,
            fulfilled,
        })
    }

    /// Register a change observer. Delivery is synchronous, in
    /// registration order.
    pub fn observe(&mut self, observer: impl FnMut(&ChangeEvent) + 'static) -> ObserverHandle {
        self.next_handle += 1;
        let handle = ObserverHandle(self.next_handle);
        self.observers.push((handle, Box::new(observer)));
        handle
    }

    /// Remove an observer. Unknown handles are a no-op.
    pub fn unobserve(&mut self, handle: ObserverHandle) {
        self.observers.retain(|(h, _)| *h != handle);
    }

    fn notify(&mut self, event: &ChangeEvent) {
        for (_, observer) in self.observers.iter_mut() {
            observer(event);
        }
    }

    /// Current values, keyed by id, for the external store.
    pub fn snapshot(&self) -> BTreeMap<TrackableId, f64> {
        self.values.clone()
    }

    /// Apply a stored value mapping. Every id is validated against the
    /// definition set before anything is applied; entries then go through
    /// `set_value` so observers and links see the restored state.
    pub fn restore(&mut self, snapshot: &BTreeMap<TrackableId, f64>) -> Result<(), ModelError> {
        if let Some(unknown) = snapshot.keys().find(|id| !self.defs.contains_key(*id)) {
            return Err(ModelError::UnknownTrackable(unknown.clone()));
        }
        for (id, value) in snapshot {
            self.set_value(id, *value)?;
        }
        Ok(())
    }
}
