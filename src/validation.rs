//! Advisory validation and overlap detection. Everything here is pure and
//! returns findings as data; nothing ever mutates a timeline or raises.
//!
//! Two tiers: errors mark state the model should be considered structurally
//! broken, warnings mark legal-but-suspicious state (overlaps, cosmetic
//! values out of range, a stale selection). No mutation consults validation
//! automatically; callers run it on demand.

use crate::properties::{PropertyKind, PropertyTemplate};
use crate::timeline::{ObjectKind, TimeUnit, TimelineConfig, TimelineObject, TimelineState, Track};

#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn from_parts(errors: Vec<String>, warnings: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
            warnings,
        }
    }

    pub fn merge(&mut self, other: ValidationReport) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
        self.is_valid = self.errors.is_empty();
    }
}

/// Structural and conventional-property checks for a single object.
pub fn validate_timeline_object(object: &TimelineObject) -> ValidationReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if object.id.is_empty() {
        errors.push("object id must be a non-empty string".to_string());
    }

    if !object.start_time.is_finite() || object.start_time < 0.0 {
        errors.push("start time must be a non-negative number".to_string());
    }

    match object.kind {
        ObjectKind::Duration => match object.duration {
            Some(duration) if duration.is_finite() && duration > 0.0 => {}
            _ => errors.push("duration objects must have a positive duration".to_string()),
        },
        ObjectKind::Instant => {
            if object.duration.is_some() {
                warnings.push("instant objects should not carry a duration".to_string());
            }
        }
    }

    if let Some(name) = object.properties.get("name") {
        if name.as_text().is_none() {
            warnings.push("object name should be text".to_string());
        }
    }

    if let Some(color) = object.properties.get("color") {
        match color.as_color_text() {
            Some(text) if is_valid_color(text) => {}
            _ => warnings.push("color is not a recognized color value".to_string()),
        }
    }

    if let Some(opacity) = object.properties.get("opacity") {
        match opacity.as_number() {
            Some(value) if (0.0..=1.0).contains(&value) => {}
            _ => warnings.push("opacity should be a number between 0 and 1".to_string()),
        }
    }

    ValidationReport::from_parts(errors, warnings)
}

/// Validates a track and everything on it. Per-object findings are folded in
/// with the object's index; duplicate object ids are an error.
pub fn validate_track(track: &Track) -> ValidationReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if track.id.is_empty() {
        errors.push("track id must be a non-empty string".to_string());
    }
    if track.name.is_empty() {
        errors.push("track name must be a non-empty string".to_string());
    }

    for (index, object) in track.objects.iter().enumerate() {
        let report = validate_timeline_object(object);
        if !report.is_valid {
            errors.push(format!(
                "object [{index}] failed validation: {}",
                report.errors.join(", ")
            ));
        }
        if !report.warnings.is_empty() {
            warnings.push(format!("object [{index}]: {}", report.warnings.join(", ")));
        }
    }

    let duplicates = duplicate_ids(track.objects.iter().map(|object| object.id.as_str()));
    if !duplicates.is_empty() {
        errors.push(format!(
            "duplicate object ids in track \"{}\": {}",
            track.name,
            duplicates.join(", ")
        ));
    }

    ValidationReport::from_parts(errors, warnings)
}

/// Validates the whole document: every track, track-id uniqueness, view
/// state ranges, and the selection reference (dangling is a warning only,
/// since it is tolerated transiently).
pub fn validate_timeline_state(state: &TimelineState) -> ValidationReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    for (index, track) in state.tracks.iter().enumerate() {
        let report = validate_track(track);
        if !report.is_valid {
            errors.push(format!(
                "track [{index}] failed validation: {}",
                report.errors.join(", ")
            ));
        }
        if !report.warnings.is_empty() {
            warnings.push(format!("track [{index}]: {}", report.warnings.join(", ")));
        }
    }

    let duplicates = duplicate_ids(state.tracks.iter().map(|track| track.id.as_str()));
    if !duplicates.is_empty() {
        errors.push(format!("duplicate track ids: {}", duplicates.join(", ")));
    }

    if !state.zoom_level.is_finite() || state.zoom_level <= 0.0 {
        errors.push("zoom level must be a positive number".to_string());
    }

    if !state.scroll_position.is_finite() || state.scroll_position < 0.0 {
        errors.push("scroll position must be a non-negative number".to_string());
    }

    if let Some(selected) = state.selected_object_id.as_deref() {
        if state.find_object(selected).is_none() {
            warnings.push(format!(
                "selected object id \"{selected}\" does not resolve to any object"
            ));
        }
    }

    ValidationReport::from_parts(errors, warnings)
}

pub fn validate_timeline_config(config: &TimelineConfig) -> ValidationReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let min_ok = config.min_zoom.is_finite() && config.min_zoom > 0.0;
    let max_ok = config.max_zoom.is_finite() && config.max_zoom > 0.0;
    if !min_ok {
        errors.push("minimum zoom must be a positive number".to_string());
    }
    if !max_ok {
        errors.push("maximum zoom must be a positive number".to_string());
    }
    if min_ok && max_ok && config.min_zoom >= config.max_zoom {
        errors.push("minimum zoom must be less than maximum zoom".to_string());
    }

    if !config.default_zoom.is_finite() {
        errors.push("default zoom must be a number".to_string());
    } else if min_ok
        && max_ok
        && (config.default_zoom < config.min_zoom || config.default_zoom > config.max_zoom)
    {
        warnings.push("default zoom is outside the configured zoom range".to_string());
    }

    if let Some(fps) = config.fps {
        if !fps.is_finite() || fps <= 0.0 {
            errors.push("fps must be a positive number".to_string());
        }
        if config.time_unit != TimeUnit::Frames {
            warnings.push("fps only applies when the time unit is frames".to_string());
        }
    }

    ValidationReport::from_parts(errors, warnings)
}

pub fn validate_property_template(template: &PropertyTemplate) -> ValidationReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if template.name.is_empty() {
        errors.push("property template name must be a non-empty string".to_string());
    }
    if template.label.is_empty() {
        errors.push("property template label must be a non-empty string".to_string());
    }

    match template.kind {
        PropertyKind::Number => {
            if let (Some(min), Some(max)) = (template.min, template.max) {
                if min >= max {
                    errors.push("minimum must be less than maximum".to_string());
                }
            }
        }
        PropertyKind::Select | PropertyKind::Multiselect => match &template.options {
            None => errors.push(format!("{} templates must provide options", template.kind)),
            Some(options) if options.is_empty() => {
                warnings.push("options list is empty".to_string());
            }
            Some(_) => {}
        },
        _ => {}
    }

    ValidationReport::from_parts(errors, warnings)
}

/// Combined report for a whole document plus (optionally) its config.
pub fn validate_project(
    state: &TimelineState,
    config: Option<&TimelineConfig>,
) -> ValidationReport {
    let mut report = validate_timeline_state(state);
    if let Some(config) = config {
        report.merge(validate_timeline_config(config));
    }
    report
}

/// Whether two objects' effective time spans intersect, bounds inclusive:
/// spans that merely touch at an endpoint count as overlapping. An object
/// never overlaps itself.
pub fn check_object_overlap(a: &TimelineObject, b: &TimelineObject) -> bool {
    if a.id == b.id {
        return false;
    }
    a.start_time <= b.end_time() && a.end_time() >= b.start_time
}

/// Pairwise overlap scan over one track. Overlap is permitted, so every
/// detected pair is a warning naming both objects; this never errors.
pub fn check_track_overlap(track: &Track) -> ValidationReport {
    let mut warnings = Vec::new();

    for (index, a) in track.objects.iter().enumerate() {
        for b in track.objects.iter().skip(index + 1) {
            if check_object_overlap(a, b) {
                warnings.push(format!(
                    "objects \"{}\" and \"{}\" overlap in track \"{}\"",
                    a.display_name(),
                    b.display_name(),
                    track.name
                ));
            }
        }
    }

    ValidationReport::from_parts(Vec::new(), warnings)
}

/// Overlap scan over every track. Cross-track overlap is never checked;
/// tracks are independent lanes.
pub fn check_all_track_overlaps(state: &TimelineState) -> ValidationReport {
    let mut warnings = Vec::new();
    for track in &state.tracks {
        warnings.extend(check_track_overlap(track).warnings);
    }
    ValidationReport::from_parts(Vec::new(), warnings)
}

const NAMED_COLORS: [&str; 22] = [
    "red", "green", "blue", "yellow", "orange", "purple", "pink", "brown", "black", "white",
    "gray", "grey", "cyan", "magenta", "lime", "navy", "maroon", "olive", "teal", "silver",
    "aqua", "fuchsia",
];

/// Accepts `#rrggbb`, `#rgb`, `rgb(r,g,b)`, `rgba(r,g,b,a)`, `hsl(h,s%,l%)`
/// or one of the predefined palette names, case-insensitive.
pub fn is_valid_color(color: &str) -> bool {
    let color = color.trim();

    if let Some(hex) = color.strip_prefix('#') {
        return matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit());
    }

    if let Some(args) = call_args(color, "rgba") {
        return args.len() == 4
            && args[..3].iter().all(|arg| is_integer(arg))
            && is_decimal(args[3]);
    }
    if let Some(args) = call_args(color, "rgb") {
        return args.len() == 3 && args.iter().all(|arg| is_integer(arg));
    }
    if let Some(args) = call_args(color, "hsl") {
        return args.len() == 3
            && is_integer(args[0])
            && is_percentage(args[1])
            && is_percentage(args[2]);
    }

    let lowered = color.to_ascii_lowercase();
    NAMED_COLORS.contains(&lowered.as_str())
}

/// Splits `name(a, b, c)` into trimmed argument slices.
fn call_args<'a>(color: &'a str, name: &str) -> Option<Vec<&'a str>> {
    let inner = color
        .strip_prefix(name)?
        .strip_prefix('(')?
        .strip_suffix(')')?;
    Some(inner.split(',').map(str::trim).collect())
}

fn is_integer(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_ascii_digit())
}

fn is_decimal(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_ascii_digit() || c == '.')
}

fn is_percentage(text: &str) -> bool {
    text.strip_suffix('%').is_some_and(is_integer)
}

fn duplicate_ids<'a>(ids: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = Vec::new();
    let mut duplicates = Vec::new();
    for id in ids {
        if seen.contains(&id) {
            if !duplicates.iter().any(|existing| existing == id) {
                duplicates.push(id.to_string());
            }
        } else {
            seen.push(id);
        }
    }
    duplicates
}
