//! Field placement and style descriptors.
//!
//! A [`FieldConfig`] says where and how one piece of text lands on a
//! template. Positions use a single number per axis: values `<= 1` are a
//! fraction of the canvas dimension, larger values are absolute pixels.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Logical text slots on a certificate template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldName {
    StudentName,
    SchoolName,
    ExamNumber,
    Date,
    SerialNumber,
    Year,
    GradeLevel,
}

impl FieldName {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldName::StudentName => "studentName",
            FieldName::SchoolName => "schoolName",
            FieldName::ExamNumber => "examNumber",
            FieldName::Date => "date",
            FieldName::SerialNumber => "serialNumber",
            FieldName::Year => "year",
            FieldName::GradeLevel => "gradeLevel",
        }
    }

    /// Fields the caller can switch off with an explicit `null` override.
    pub fn is_conditional(&self) -> bool {
        matches!(
            self,
            FieldName::ExamNumber | FieldName::Year | FieldName::SerialNumber
        )
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Horizontal text alignment relative to the anchor point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    #[serde(alias = "start")]
    Left,
    Center,
    #[serde(alias = "end")]
    Right,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    #[serde(alias = "400")]
    Normal,
    #[serde(alias = "700")]
    Bold,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    #[default]
    Normal,
    #[serde(alias = "oblique")]
    Italic,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextTransform {
    Uppercase,
    Lowercase,
    Capitalize,
    #[default]
    None,
}

impl TextTransform {
    /// Transform a literal string the way CSS `text-transform` does.
    ///
    /// `Capitalize` upper-cases the first character of each
    /// whitespace-separated word and leaves the rest untouched.
    pub fn apply(self, text: &str) -> String {
        match self {
            TextTransform::Uppercase => text.to_uppercase(),
            TextTransform::Lowercase => text.to_lowercase(),
            TextTransform::Capitalize => {
                let mut out = String::with_capacity(text.len());
                let mut at_word_start = true;
                for ch in text.chars() {
                    if at_word_start && !ch.is_whitespace() {
                        out.extend(ch.to_uppercase());
                    } else {
                        out.push(ch);
                    }
                    at_word_start = ch.is_whitespace();
                }
                out
            }
            TextTransform::None => text.to_string(),
        }
    }
}

/// Apply an optional transform. `None` leaves the text as-is.
pub fn apply_transform(text: &str, transform: Option<TextTransform>) -> String {
    transform.unwrap_or_default().apply(text)
}

/// Resolve one coordinate against a canvas dimension.
///
/// `v <= 1` is a fraction of `dimension`; anything larger is a pixel offset.
#[inline]
pub fn resolve_coordinate(v: f32, dimension: u32) -> f32 {
    if v <= 1.0 { v * dimension as f32 } else { v }
}

/// RGBA text colour, written as a CSS hex string in configs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub [u8; 4]);

impl Color {
    pub const BLACK: Color = Color([0, 0, 0, 255]);
    pub const WHITE: Color = Color([255, 255, 255, 255]);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color([r, g, b, 255])
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.to_lowercase().as_str() {
            "black" => return Ok(Color::BLACK),
            "white" => return Ok(Color::WHITE),
            _ => {}
        }

        let hex = s
            .strip_prefix('#')
            .ok_or_else(|| format!("Invalid color '{}': expected #rgb or #rrggbb", s))?;
        let digit = |c: char| {
            c.to_digit(16)
                .map(|d| d as u8)
                .ok_or_else(|| format!("Invalid color '{}': bad hex digit '{}'", s, c))
        };
        let digits = hex.chars().map(digit).collect::<Result<Vec<u8>, _>>()?;

        match digits.as_slice() {
            [r, g, b] => Ok(Color::rgb(r * 17, g * 17, b * 17)),
            [r1, r2, g1, g2, b1, b2] => Ok(Color::rgb(r1 * 16 + r2, g1 * 16 + g2, b1 * 16 + b2)),
            [r1, r2, g1, g2, b1, b2, a1, a2] => Ok(Color([
                r1 * 16 + r2,
                g1 * 16 + g2,
                b1 * 16 + b2,
                a1 * 16 + a2,
            ])),
            _ => Err(format!("Invalid color '{}': wrong length", s)),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b, a] = self.0;
        if a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", r, g, b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", r, g, b, a)
        }
    }
}

impl Serialize for Color {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Placement and style for one text field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldConfig {
    pub x: f32,
    pub y: f32,
    pub font_size: f32,
    #[serde(default)]
    pub font_weight: FontWeight,
    #[serde(default)]
    pub font_style: FontStyle,
    pub font_family: String,
    #[serde(default)]
    pub text_align: Alignment,
    #[serde(default)]
    pub color: Color,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_transform: Option<TextTransform>,
    /// Degrees, clockwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f32>,
}

impl FieldConfig {
    /// Shallow merge: every key present in `patch` replaces ours.
    pub fn merged(&self, patch: &FieldOverride) -> FieldConfig {
        FieldConfig {
            x: patch.x.unwrap_or(self.x),
            y: patch.y.unwrap_or(self.y),
            font_size: patch.font_size.unwrap_or(self.font_size),
            font_weight: patch.font_weight.unwrap_or(self.font_weight),
            font_style: patch.font_style.unwrap_or(self.font_style),
            font_family: patch
                .font_family
                .clone()
                .unwrap_or_else(|| self.font_family.clone()),
            text_align: patch.text_align.unwrap_or(self.text_align),
            color: patch.color.unwrap_or(self.color),
            text_transform: patch.text_transform.or(self.text_transform),
            rotation: patch.rotation.or(self.rotation),
        }
    }

    /// Anchor point in pixels for a canvas of the given size.
    pub fn anchor(&self, width: u32, height: u32) -> (f32, f32) {
        (
            resolve_coordinate(self.x, width),
            resolve_coordinate(self.y, height),
        )
    }

    pub fn rotation_degrees(&self) -> f32 {
        self.rotation.unwrap_or(0.0)
    }
}

/// Partial [`FieldConfig`] supplied by a caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<FontWeight>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_style: Option<FontStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_align: Option<Alignment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_transform: Option<TextTransform>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f32>,
}

/// Caller overrides keyed by field.
///
/// A field mapped to `None` (JSON `null`) is suppressed when it is one of
/// the conditional fields; for the others it behaves like no override.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CertificateFieldsConfig(BTreeMap<FieldName, Option<FieldOverride>>);

impl CertificateFieldsConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: FieldName, patch: FieldOverride) -> Self {
        self.0.insert(field, Some(patch));
        self
    }

    pub fn suppress(mut self, field: FieldName) -> Self {
        self.0.insert(field, None);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when the caller explicitly passed `null` for this field.
    pub fn is_suppressed(&self, field: FieldName) -> bool {
        matches!(self.0.get(&field), Some(None))
    }

    pub fn override_for(&self, field: FieldName) -> Option<&FieldOverride> {
        self.0.get(&field).and_then(Option::as_ref)
    }
}
