use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

/// Open property bag carried by every timeline object. A few keys are
/// conventional (`name`, `color`, `opacity`); everything else is
/// domain-specific extension data.
pub type PropertyMap = HashMap<String, PropertyValue>;

/// Tagged value for the open property bag.
///
/// `Color` holds the raw string form (`#3b82f6`, `rgb(...)`, a palette
/// name); the grammar is checked by validation, not on construction.
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub enum PropertyValue {
    Text(String),
    Number(f64),
    Boolean(bool),
    Color(String),
    List(Vec<PropertyValue>),
}

impl PropertyValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            PropertyValue::Number(number) => Some(*number),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Boolean(flag) => Some(*flag),
            _ => None,
        }
    }

    /// String form of a color-bearing value, whichever variant carries it.
    pub fn as_color_text(&self) -> Option<&str> {
        match self {
            PropertyValue::Color(color) => Some(color),
            PropertyValue::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(text: &str) -> Self {
        PropertyValue::Text(text.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(text: String) -> Self {
        PropertyValue::Text(text)
    }
}

impl From<f64> for PropertyValue {
    fn from(number: f64) -> Self {
        PropertyValue::Number(number)
    }
}

impl From<bool> for PropertyValue {
    fn from(flag: bool) -> Self {
        PropertyValue::Boolean(flag)
    }
}

/// Editor-facing kind of an editable property.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Debug, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum PropertyKind {
    Text,
    Number,
    Boolean,
    Color,
    Select,
    Multiselect,
}

/// Metadata describing an editable property for a property-editor UI.
/// Pure description of expected keys; nothing here is enforced on objects.
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct PropertyTemplate {
    pub name: String,
    pub label: String,
    pub kind: PropertyKind,
    pub default_value: Option<PropertyValue>,
    /// Number kind only.
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub step: Option<f64>,
    /// Select / Multiselect kinds only.
    pub options: Option<Vec<String>>,
}

impl PropertyTemplate {
    pub fn new(name: impl Into<String>, label: impl Into<String>, kind: PropertyKind) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind,
            default_value: None,
            min: None,
            max: None,
            step: None,
            options: None,
        }
    }
}

/// The fixed template set shipped with the model: name, color, opacity.
pub fn default_property_templates() -> Vec<PropertyTemplate> {
    vec![
        PropertyTemplate {
            default_value: Some(PropertyValue::Text("New Object".to_string())),
            ..PropertyTemplate::new("name", "Name", PropertyKind::Text)
        },
        PropertyTemplate {
            default_value: Some(PropertyValue::Color("#3b82f6".to_string())),
            ..PropertyTemplate::new("color", "Color", PropertyKind::Color)
        },
        PropertyTemplate {
            default_value: Some(PropertyValue::Number(1.0)),
            min: Some(0.0),
            max: Some(1.0),
            step: Some(0.1),
            ..PropertyTemplate::new("opacity", "Opacity", PropertyKind::Number)
        },
    ]
}
