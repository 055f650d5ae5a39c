//! Schema registry
//!
//! Bounds, step granularity and defaults for every editable field, keyed by
//! section and field key. Built once on first use and never mutated.

use super::error::SchemaError;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

pub const AIMING_KEY: &str = "cw::AimingProjectSettings";
pub const FOLLOW_AIM_KEY: &str = "cw::FollowAimSettings";
pub const ARMOR_OUTLINER_KEY: &str = "cw::ArmorOutlinerProjectSettings";
pub const HAPTICS_KEY: &str = "cw::HapticsProjectSettings";
pub const WINDOW_PROJECT_KEY: &str = "engine::WindowProjectSettings";
pub const WINDOW_SETTINGS_KEY: &str = "engine::WindowSettings";
pub const FRAME_LIMITER_KEY: &str = "FrameLimiterSettings";
pub const MARKER_SECTION_KEY: &str =
    "cw::hud::battle::VehicleMarkerSettingsSingleton::ProjectSettings";

/// Top-level keys that identify a game configuration file
pub const RECOGNIZED_SECTION_KEYS: &[&str] = &[
    AIMING_KEY,
    FOLLOW_AIM_KEY,
    ARMOR_OUTLINER_KEY,
    HAPTICS_KEY,
    WINDOW_PROJECT_KEY,
    WINDOW_SETTINGS_KEY,
    FRAME_LIMITER_KEY,
    MARKER_SECTION_KEY,
];

pub const STOP_TYPES: &[&str] = &["StopByRotation", "StopByDistance", "StopByTime"];

/// A logical group of fields stored in one object of the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Aiming,
    FollowAim,
    ArmorOutliner,
    Haptics,
    WindowMinSize,
    FrameLimiterClient,
    FrameLimiterInactiveClient,
}

impl Section {
    pub const ALL: [Section; 7] = [
        Section::Aiming,
        Section::FollowAim,
        Section::ArmorOutliner,
        Section::Haptics,
        Section::WindowMinSize,
        Section::FrameLimiterClient,
        Section::FrameLimiterInactiveClient,
    ];

    /// Short name used on the command line
    pub fn name(self) -> &'static str {
        match self {
            Section::Aiming => "aiming",
            Section::FollowAim => "followAim",
            Section::ArmorOutliner => "armorOutliner",
            Section::Haptics => "haptics",
            Section::WindowMinSize => "window",
            Section::FrameLimiterClient => "frameLimiter.client",
            Section::FrameLimiterInactiveClient => "frameLimiter.inactiveClient",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Section::Aiming => "General Aiming",
            Section::FollowAim => "Follow Aim Configuration",
            Section::ArmorOutliner => "Armor Detection",
            Section::Haptics => "Controller Haptics",
            Section::WindowMinSize => "Minimum Window Size",
            Section::FrameLimiterClient => "Active Client Frame Limiter",
            Section::FrameLimiterInactiveClient => "Inactive Client Frame Limiter",
        }
    }

    /// Key path from the document root to the section's object
    pub fn path(self) -> &'static [&'static str] {
        match self {
            Section::Aiming => &[AIMING_KEY],
            Section::FollowAim => &[FOLLOW_AIM_KEY],
            Section::ArmorOutliner => &[ARMOR_OUTLINER_KEY],
            Section::Haptics => &[HAPTICS_KEY],
            Section::WindowMinSize => &[WINDOW_PROJECT_KEY, "minSize"],
            Section::FrameLimiterClient => &[FRAME_LIMITER_KEY, "client"],
            Section::FrameLimiterInactiveClient => &[FRAME_LIMITER_KEY, "inactive client"],
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Section {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Section::ALL
            .into_iter()
            .find(|section| section.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| SchemaError::UnknownSection(s.to_string()))
    }
}

/// Semantic type of a field
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    FloatRange { min: f64, max: f64, step: f64 },
    IntRange { min: i64, max: i64, step: i64 },
    Boolean,
    Enum(&'static [&'static str]),
}

impl FieldKind {
    pub fn describe(&self) -> &'static str {
        match self {
            FieldKind::FloatRange { .. } => "a number",
            FieldKind::IntRange { .. } => "an integer",
            FieldKind::Boolean => "a boolean",
            FieldKind::Enum(_) => "a string",
        }
    }

    /// Whether `value` is a legal stored value for this kind
    pub fn admits(&self, value: &FieldValue) -> bool {
        match (self, value) {
            (FieldKind::FloatRange { min, max, .. }, FieldValue::Float(v)) => {
                (*min..=*max).contains(v)
            }
            (FieldKind::IntRange { min, max, .. }, FieldValue::Int(v)) => (*min..=*max).contains(v),
            (FieldKind::Boolean, FieldValue::Bool(_)) => true,
            (FieldKind::Enum(options), FieldValue::Text(v)) => options.contains(&v.as_str()),
            _ => false,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::FloatRange { min, max, step } => {
                write!(f, "{}..={} step {}", min, max, step)
            }
            FieldKind::IntRange { min, max, step } => write!(f, "{}..={} step {}", min, max, step),
            FieldKind::Boolean => f.write_str("true|false"),
            FieldKind::Enum(options) => f.write_str(&options.join("|")),
        }
    }
}

/// A typed field value
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Float(f64),
    Int(i64),
    Bool(bool),
    Text(String),
}

impl FieldValue {
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Float(v) => number(*v),
            FieldValue::Int(v) => Value::from(*v),
            FieldValue::Bool(v) => Value::Bool(*v),
            FieldValue::Text(v) => Value::String(v.clone()),
        }
    }
}

/// JSON number for `v`. Whole values are emitted without a fractional part,
/// the way the game writes them.
pub(crate) fn number(v: f64) -> Value {
    const EXACT_LIMIT: f64 = 9_007_199_254_740_992.0;
    if v.fract() == 0.0 && v.abs() < EXACT_LIMIT {
        Value::from(v as i64)
    } else {
        Value::from(v)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Float(v) => f.pad(&v.to_string()),
            FieldValue::Int(v) => f.pad(&v.to_string()),
            FieldValue::Bool(v) => f.pad(if *v { "true" } else { "false" }),
            FieldValue::Text(v) => f.pad(v),
        }
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Float(v)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Int(v)
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Bool(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Text(v.to_string())
    }
}

/// Policy for one field: where it lives, what it holds, and its default
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub section: Section,
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub default: FieldValue,
}

/// All field specs, grouped by section in display order
#[derive(Debug)]
pub struct SchemaRegistry {
    sections: Vec<(Section, Vec<FieldSpec>)>,
}

static REGISTRY: LazyLock<SchemaRegistry> = LazyLock::new(SchemaRegistry::build);

/// The process-wide registry
pub fn registry() -> &'static SchemaRegistry {
    &REGISTRY
}

/// Shorthand for `registry().spec_for(section, key)`
pub fn spec_for(section: Section, key: &str) -> Result<&'static FieldSpec, SchemaError> {
    registry().spec_for(section, key)
}

impl SchemaRegistry {
    /// Field specs of `section` in display order
    pub fn fields(&self, section: Section) -> &[FieldSpec] {
        self.sections
            .iter()
            .find(|(s, _)| *s == section)
            .map(|(_, fields)| fields.as_slice())
            .unwrap_or_default()
    }

    pub fn spec_for(&self, section: Section, key: &str) -> Result<&FieldSpec, SchemaError> {
        self.fields(section)
            .iter()
            .find(|spec| spec.key == key)
            .ok_or_else(|| SchemaError::UnknownField {
                section: section.name().to_string(),
                key: key.to_string(),
            })
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldSpec> {
        self.sections.iter().flat_map(|(_, fields)| fields.iter())
    }

    fn build() -> Self {
        let sections = Section::ALL
            .into_iter()
            .map(|section| (section, section_fields(section)))
            .collect();
        Self { sections }
    }
}

fn float(
    section: Section,
    key: &'static str,
    label: &'static str,
    min: f64,
    max: f64,
    step: f64,
    default: f64,
) -> FieldSpec {
    FieldSpec {
        section,
        key,
        label,
        kind: FieldKind::FloatRange { min, max, step },
        default: FieldValue::Float(default),
    }
}

fn int(
    section: Section,
    key: &'static str,
    label: &'static str,
    min: i64,
    max: i64,
    step: i64,
    default: i64,
) -> FieldSpec {
    FieldSpec {
        section,
        key,
        label,
        kind: FieldKind::IntRange { min, max, step },
        default: FieldValue::Int(default),
    }
}

fn boolean(section: Section, key: &'static str, label: &'static str, default: bool) -> FieldSpec {
    FieldSpec {
        section,
        key,
        label,
        kind: FieldKind::Boolean,
        default: FieldValue::Bool(default),
    }
}

fn choice(
    section: Section,
    key: &'static str,
    label: &'static str,
    options: &'static [&'static str],
    default: &str,
) -> FieldSpec {
    FieldSpec {
        section,
        key,
        label,
        kind: FieldKind::Enum(options),
        default: FieldValue::Text(default.to_string()),
    }
}

fn section_fields(section: Section) -> Vec<FieldSpec> {
    let s = section;
    match section {
        Section::Aiming => vec![
            float(
                s,
                "aimAssistSensitivityMultiplierAt500M",
                "Aim Assist Sensitivity at 500m",
                0.0,
                1.0,
                0.01,
                0.5,
            ),
            float(
                s,
                "aimAssistSensitivityMultiplierAtZeroM",
                "Aim Assist Sensitivity at 0m",
                0.0,
                1.0,
                0.01,
                0.5,
            ),
            float(
                s,
                "aimAssistTargetLockOnTime",
                "Target Lock On Time",
                0.0,
                5.0,
                0.1,
                0.0,
            ),
            float(
                s,
                "distanceUpdateSpeed",
                "Distance Update Speed",
                1.0,
                100.0,
                1.0,
                30.0,
            ),
            float(
                s,
                "maxAimingAngleError",
                "Max Aiming Angle Error",
                1.0,
                90.0,
                1.0,
                25.0,
            ),
            float(
                s,
                "maxDistance",
                "Max Distance",
                100.0,
                5000.0,
                10.0,
                2000.0,
            ),
            float(s, "minDistance", "Min Distance", 1.0, 100.0, 1.0, 35.0),
            choice(s, "stopType", "Stop Type", STOP_TYPES, "StopByRotation"),
            boolean(s, "useLocalAimPoint", "Use Local Aim Point", true),
            boolean(s, "useLocalDispersion", "Use Local Dispersion", true),
        ],
        Section::FollowAim => vec![
            float(
                s,
                "followAimAccMagnetMin",
                "Acceleration Magnet Min",
                0.0,
                1.0,
                0.01,
                0.3,
            ),
            float(
                s,
                "followAimAccMagnetMult",
                "Acceleration Magnet Mult",
                0.0,
                1.0,
                0.01,
                0.5,
            ),
            float(
                s,
                "followAimCentringTime",
                "Centring Time",
                0.0,
                5.0,
                0.1,
                1.0,
            ),
            float(
                s,
                "followAimDecMagnetMin",
                "Deceleration Magnet Min",
                0.0,
                1.0,
                0.01,
                0.4,
            ),
            float(
                s,
                "followAimDecMagnetMult",
                "Deceleration Magnet Mult",
                0.0,
                1.0,
                0.01,
                0.55,
            ),
            float(
                s,
                "followAimMaxMagnetPower",
                "Max Magnet Power",
                0.0,
                1.0,
                0.01,
                0.4,
            ),
            float(
                s,
                "followAimMaxTargetDistance",
                "Max Target Distance",
                100.0,
                1000.0,
                10.0,
                500.0,
            ),
            float(
                s,
                "followAimMinMagnetDistanceFromCenterPower",
                "Min Magnet Distance Power",
                0.0,
                1.0,
                0.01,
                0.3,
            ),
            float(
                s,
                "followAimMinRadiusScalingDistance",
                "Min Radius Scaling Distance",
                0.0,
                1000.0,
                10.0,
                200.0,
            ),
            float(
                s,
                "followAimRotationPullFactor",
                "Rotation Pull Factor",
                0.0,
                1.0,
                0.01,
                0.1,
            ),
            float(
                s,
                "followAimSelectorCenterCoef",
                "Selector Center Coefficient",
                0.0,
                5.0,
                0.1,
                1.5,
            ),
            float(
                s,
                "followAimSelectorCenterMin",
                "Selector Center Min",
                0.0,
                1.0,
                0.01,
                0.5,
            ),
            float(
                s,
                "followAimSelectorDistanceCoef",
                "Selector Distance Coefficient",
                0.0,
                1.0,
                0.01,
                0.3,
            ),
            float(
                s,
                "followAimSensitivityFactor",
                "Sensitivity Factor",
                0.0,
                1.0,
                0.01,
                0.7,
            ),
            float(
                s,
                "followAimTankCentringSize",
                "Tank Centring Size",
                0.0,
                100.0,
                1.0,
                40.0,
            ),
            float(
                s,
                "followInnerRadius",
                "Follow Inner Radius",
                1.0,
                10.0,
                0.1,
                3.5,
            ),
            float(s, "followRadius", "Follow Radius", 1.0, 10.0, 0.1, 4.3),
        ],
        Section::ArmorOutliner => vec![
            float(
                s,
                "Max Distance",
                "Max Distance",
                100.0,
                1000.0,
                10.0,
                400.0,
            ),
            boolean(s, "Is Enabled", "Enable Armor Outliner", true),
        ],
        Section::Haptics => vec![
            int(
                s,
                "heavyRumbleDurationMS",
                "Heavy Rumble Duration (ms)",
                100,
                1000,
                10,
                500,
            ),
            float(
                s,
                "heavyRumbleHighFrequency",
                "Heavy Rumble High Frequency",
                0.0,
                1.0,
                0.05,
                0.8,
            ),
            float(
                s,
                "heavyRumbleLowFrequency",
                "Heavy Rumble Low Frequency",
                0.0,
                1.0,
                0.05,
                0.8,
            ),
            int(
                s,
                "mediumRumbleDurationMS",
                "Medium Rumble Duration (ms)",
                100,
                1000,
                10,
                400,
            ),
            float(
                s,
                "mediumRumbleHighFrequency",
                "Medium Rumble High Frequency",
                0.0,
                1.0,
                0.05,
                0.5,
            ),
            float(
                s,
                "mediumRumbleLowFrequency",
                "Medium Rumble Low Frequency",
                0.0,
                1.0,
                0.05,
                0.5,
            ),
            int(
                s,
                "lightRumbleDurationMS",
                "Light Rumble Duration (ms)",
                100,
                1000,
                10,
                300,
            ),
            float(
                s,
                "lightRumbleHighFrequency",
                "Light Rumble High Frequency",
                0.0,
                1.0,
                0.05,
                0.3,
            ),
            float(
                s,
                "lightRumbleLowFrequency",
                "Light Rumble Low Frequency",
                0.0,
                1.0,
                0.05,
                0.3,
            ),
        ],
        Section::WindowMinSize => vec![
            int(s, "width", "Min Width", 800, 3840, 10, 1280),
            int(s, "height", "Min Height", 600, 2160, 10, 720),
        ],
        Section::FrameLimiterClient => vec![
            float(s, "frequency", "Frequency (FPS)", 30.0, 360.0, 1.0, 250.0),
            float(
                s,
                "carriedOverspent",
                "Carried Overspent",
                0.1,
                1.0,
                0.05,
                0.4,
            ),
        ],
        Section::FrameLimiterInactiveClient => vec![
            float(s, "frequency", "Frequency (FPS)", 10.0, 144.0, 1.0, 30.0),
            float(
                s,
                "carriedOverspent",
                "Carried Overspent",
                0.1,
                1.0,
                0.05,
                0.4,
            ),
        ],
    }
}
