use tracing::debug;

use crate::actions::{reduce, Action};
use crate::ids::{IdSource, UuidIdSource};
use crate::properties::{default_property_templates, PropertyTemplate};
use crate::timeline::{
    TimeRange, TimelineConfig, TimelineObject, TimelineState, Track,
};
use crate::validation::{check_all_track_overlaps, validate_project, ValidationReport};

/// Handle returned by `subscribe`; pass it back to unsubscribe.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct SubscriptionId(u64);

type StateListener = Box<dyn FnMut(&TimelineState)>;
type ValidationListener = Box<dyn FnMut(&[String], &[String])>;

/// Stateful holder around the pure reducer: owns one state snapshot and the
/// config, applies actions atomically, and notifies registered listeners
/// after each dispatch — state listeners first, then validation listeners,
/// each channel in registration order.
///
/// Single-writer, single-threaded. Concurrent dispatch against one model
/// must be serialized by the caller.
pub struct TimelineModel {
    state: TimelineState,
    config: TimelineConfig,
    ids: Box<dyn IdSource>,
    listeners: Vec<(SubscriptionId, StateListener)>,
    validation_listeners: Vec<(SubscriptionId, ValidationListener)>,
    next_subscription: u64,
}

impl Default for TimelineModel {
    fn default() -> Self {
        Self::new()
    }
}

impl TimelineModel {
    pub fn new() -> Self {
        Self::with_config(TimelineConfig::default())
    }

    pub fn with_config(config: TimelineConfig) -> Self {
        let state = TimelineState::initial(&config);
        Self::with_state(state, config)
    }

    /// Accepts any initial state as-is. No validation runs here; callers who
    /// care run `validate()` themselves.
    pub fn with_state(state: TimelineState, config: TimelineConfig) -> Self {
        Self {
            state,
            config,
            ids: Box::new(UuidIdSource),
            listeners: Vec::new(),
            validation_listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Swaps the id source, e.g. for deterministic ids in tests.
    pub fn with_id_source(mut self, ids: Box<dyn IdSource>) -> Self {
        self.ids = ids;
        self
    }

    pub fn state(&self) -> &TimelineState {
        &self.state
    }

    /// Owned copy of the current state, the same thing subscribers receive.
    pub fn snapshot(&self) -> TimelineState {
        self.state.clone()
    }

    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    /// Default property-editor metadata (name, color, opacity). Pure
    /// description; never enforced on objects.
    pub fn property_templates(&self) -> Vec<PropertyTemplate> {
        default_property_templates()
    }

    /// Applies one action and notifies both listener channels. Infallible:
    /// actions referencing missing ids leave the state unchanged (listeners
    /// are still notified, since a dispatch completed).
    pub fn dispatch(&mut self, action: Action) {
        debug!(?action, "dispatching timeline action");
        self.state = reduce(&self.state, &self.config, &action, self.ids.as_mut());
        self.notify();
    }

    /// Replaces the whole state, e.g. when the host application loads a
    /// document. Accepted without validation, like construction.
    pub fn import_state(&mut self, state: TimelineState) {
        self.state = state;
        self.notify();
    }

    /// Back to an empty initial state for the same config.
    pub fn reset(&mut self) {
        self.state = TimelineState::initial(&self.config);
        self.notify();
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&TimelineState) + 'static) -> SubscriptionId {
        let id = self.next_subscription_id();
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    pub fn subscribe_validation(
        &mut self,
        listener: impl FnMut(&[String], &[String]) + 'static,
    ) -> SubscriptionId {
        let id = self.next_subscription_id();
        self.validation_listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe_validation(&mut self, id: SubscriptionId) -> bool {
        let before = self.validation_listeners.len();
        self.validation_listeners
            .retain(|(existing, _)| *existing != id);
        self.validation_listeners.len() != before
    }

    /// Full advisory pass: state checks, config checks, and per-track
    /// overlap warnings, concatenated into one report.
    pub fn validate(&self) -> ValidationReport {
        let mut report = validate_project(&self.state, Some(&self.config));
        report.merge(check_all_track_overlaps(&self.state));
        report
    }

    // Point queries, all linear scans over the current state.

    pub fn find_object_by_id(&self, object_id: &str) -> Option<&TimelineObject> {
        self.state.find_object(object_id)
    }

    pub fn find_track_by_object_id(&self, object_id: &str) -> Option<&Track> {
        self.state.find_track_by_object(object_id)
    }

    pub fn track_by_id(&self, track_id: &str) -> Option<&Track> {
        self.state.track_by_id(track_id)
    }

    pub fn selected_object(&self) -> Option<&TimelineObject> {
        self.state.selected_object()
    }

    pub fn track_count(&self) -> usize {
        self.state.track_count()
    }

    pub fn object_count(&self) -> usize {
        self.state.object_count()
    }

    pub fn time_range(&self) -> TimeRange {
        self.state.time_range()
    }

    pub fn objects_in_time_range(&self, start: f64, end: f64) -> Vec<&TimelineObject> {
        self.state.objects_in_range(start, end)
    }

    fn next_subscription_id(&mut self) -> SubscriptionId {
        self.next_subscription += 1;
        SubscriptionId(self.next_subscription)
    }

    fn notify(&mut self) {
        if !self.listeners.is_empty() {
            let snapshot = self.state.clone();
            for (_, listener) in &mut self.listeners {
                listener(&snapshot);
            }
        }

        if !self.validation_listeners.is_empty() {
            let report = self.validate();
            for (_, listener) in &mut self.validation_listeners {
                listener(&report.errors, &report.warnings);
            }
        }
    }
}
