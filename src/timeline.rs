use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

use crate::properties::PropertyMap;

/// Whether an object occupies a span of time or a single point.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Debug, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum ObjectKind {
    Duration,
    Instant,
}

/// A placed item on a track.
///
/// `duration` is meaningful only for `ObjectKind::Duration`. An `Instant`
/// object carrying a duration is legal but flagged by validation.
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct TimelineObject {
    pub id: String,
    pub kind: ObjectKind,
    pub start_time: f64,
    pub duration: Option<f64>,
    pub properties: PropertyMap,
}

impl TimelineObject {
    /// Effective end of the object's time span: `start_time + duration` for
    /// duration objects, `start_time` otherwise.
    pub fn end_time(&self) -> f64 {
        match (self.kind, self.duration) {
            (ObjectKind::Duration, Some(duration)) => self.start_time + duration,
            _ => self.start_time,
        }
    }

    /// Display name for messages: the `name` property, falling back to the id.
    pub fn display_name(&self) -> &str {
        self.properties
            .get("name")
            .and_then(|value| value.as_text())
            .unwrap_or(&self.id)
    }
}

/// Creation payload for a new object. The id is assigned by the reducer.
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct ObjectInit {
    pub kind: ObjectKind,
    pub start_time: f64,
    pub duration: Option<f64>,
    pub properties: PropertyMap,
}

impl ObjectInit {
    pub fn duration(start_time: f64, duration: f64) -> Self {
        Self {
            kind: ObjectKind::Duration,
            start_time,
            duration: Some(duration),
            properties: PropertyMap::new(),
        }
    }

    pub fn instant(start_time: f64) -> Self {
        Self {
            kind: ObjectKind::Instant,
            start_time,
            duration: None,
            properties: PropertyMap::new(),
        }
    }

    pub fn with_property(
        mut self,
        key: impl Into<String>,
        value: impl Into<crate::properties::PropertyValue>,
    ) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn into_object(self, id: String) -> TimelineObject {
        TimelineObject {
            id,
            kind: self.kind,
            start_time: self.start_time,
            duration: self.duration,
            properties: self.properties,
        }
    }
}

/// Partial update for an object. `None` fields are left untouched;
/// `properties` replaces the whole map, it does not merge.
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug, Default)]
pub struct ObjectPatch {
    pub kind: Option<ObjectKind>,
    pub start_time: Option<f64>,
    pub duration: Option<f64>,
    pub properties: Option<PropertyMap>,
}

impl ObjectPatch {
    pub fn apply(&self, object: &mut TimelineObject) {
        if let Some(kind) = self.kind {
            object.kind = kind;
        }
        if let Some(start_time) = self.start_time {
            object.start_time = start_time;
        }
        if let Some(duration) = self.duration {
            object.duration = Some(duration);
        }
        if let Some(properties) = &self.properties {
            object.properties = properties.clone();
        }
    }
}

/// An ordered lane owning a list of objects. Insertion order, not time order.
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct Track {
    pub id: String,
    pub name: String,
    pub objects: Vec<TimelineObject>,
}

impl Track {
    pub fn new(id: String, name: String) -> Self {
        Self {
            id,
            name,
            objects: Vec::new(),
        }
    }

    pub fn contains_object(&self, object_id: &str) -> bool {
        self.objects.iter().any(|object| object.id == object_id)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Debug, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum TimeUnit {
    Seconds,
    Frames,
}

/// Process-wide tunables, fixed at model construction.
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct TimelineConfig {
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub default_zoom: f64,
    pub time_unit: TimeUnit,
    /// Only meaningful when `time_unit` is `Frames`.
    pub fps: Option<f64>,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            min_zoom: 0.1,
            max_zoom: 10.0,
            default_zoom: 1.0,
            time_unit: TimeUnit::Seconds,
            fps: None,
        }
    }
}

/// Inclusive span covered by the timeline's objects.
#[derive(Clone, Copy, PartialEq, Serialize, Deserialize, Debug)]
pub struct TimeRange {
    pub start: f64,
    pub end: f64,
}

/// The whole document.
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct TimelineState {
    pub tracks: Vec<Track>,
    pub zoom_level: f64,
    pub scroll_position: f64,
    /// Weak reference; may dangle transiently (validation warns).
    pub selected_object_id: Option<String>,
}

impl Default for TimelineState {
    fn default() -> Self {
        Self::initial(&TimelineConfig::default())
    }
}

impl TimelineState {
    /// Empty state seeded from a config (`zoom_level = default_zoom`).
    pub fn initial(config: &TimelineConfig) -> Self {
        Self {
            tracks: Vec::new(),
            zoom_level: config.default_zoom,
            scroll_position: 0.0,
            selected_object_id: None,
        }
    }

    pub fn track_by_id(&self, track_id: &str) -> Option<&Track> {
        self.tracks.iter().find(|track| track.id == track_id)
    }

    pub fn track_by_id_mut(&mut self, track_id: &str) -> Option<&mut Track> {
        self.tracks.iter_mut().find(|track| track.id == track_id)
    }

    pub fn find_object(&self, object_id: &str) -> Option<&TimelineObject> {
        self.tracks
            .iter()
            .flat_map(|track| track.objects.iter())
            .find(|object| object.id == object_id)
    }

    pub fn find_track_by_object(&self, object_id: &str) -> Option<&Track> {
        self.tracks
            .iter()
            .find(|track| track.contains_object(object_id))
    }

    pub fn find_track_by_object_mut(&mut self, object_id: &str) -> Option<&mut Track> {
        self.tracks
            .iter_mut()
            .find(|track| track.contains_object(object_id))
    }

    pub fn selected_object(&self) -> Option<&TimelineObject> {
        self.selected_object_id
            .as_deref()
            .and_then(|id| self.find_object(id))
    }

    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    pub fn object_count(&self) -> usize {
        self.tracks.iter().map(|track| track.objects.len()).sum()
    }

    /// Every object on every track, in track order then insertion order.
    pub fn all_objects(&self) -> impl Iterator<Item = &TimelineObject> {
        self.tracks.iter().flat_map(|track| track.objects.iter())
    }

    /// All objects sorted by ascending start time. Stable, so objects at the
    /// same start keep their track/insertion order.
    pub fn objects_by_time(&self) -> Vec<&TimelineObject> {
        let mut objects: Vec<&TimelineObject> = self.all_objects().collect();
        objects.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));
        objects
    }

    /// Min start time and max end time across all objects. An empty timeline
    /// reports the `(0, 100)` default viewport span.
    pub fn time_range(&self) -> TimeRange {
        let mut start = f64::INFINITY;
        let mut end = f64::NEG_INFINITY;

        for object in self.all_objects() {
            start = start.min(object.start_time);
            end = end.max(object.end_time());
        }

        TimeRange {
            start: if start.is_finite() { start } else { 0.0 },
            end: if end.is_finite() { end } else { 100.0 },
        }
    }

    /// Objects whose effective span intersects `[start, end]`, bounds
    /// inclusive on both ends.
    pub fn objects_in_range(&self, start: f64, end: f64) -> Vec<&TimelineObject> {
        self.all_objects()
            .filter(|object| object.start_time <= end && object.end_time() >= start)
            .collect()
    }
}
