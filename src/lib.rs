//! Data model for a track-based timeline editor: entity types, a pure action
//! reducer, a stateful model with change subscriptions, and an advisory
//! validation/overlap engine. No rendering, no I/O.

pub mod actions;
pub mod ids;
pub mod model;
pub mod properties;
pub mod timeline;
pub mod validation;

pub use actions::{reduce, Action};
pub use ids::{IdSource, SequentialIdSource, UuidIdSource};
pub use model::{SubscriptionId, TimelineModel};
pub use properties::{
    default_property_templates, PropertyKind, PropertyMap, PropertyTemplate, PropertyValue,
};
pub use timeline::{
    ObjectInit, ObjectKind, ObjectPatch, TimeRange, TimeUnit, TimelineConfig, TimelineObject,
    TimelineState, Track,
};
pub use validation::ValidationReport;
