//! # Tier Default Tables
//!
//! Field layouts tuned against each tier's background template.
//!
//! | Tier | Template | Year badge | Exam number label |
//! |------|----------|------------|-------------------|
//! | pass | `pass.png` | none | `Exam No: …` |
//! | credit | `credit.png` | ribbon, top right | bare |
//! | distinction | `distinction.png` | seal, top right | bare |
//!
//! The tables are plain constants. [`defaults`] materialises one as owned
//! [`FieldConfig`]s so callers can merge overrides onto it.

use std::collections::BTreeMap;

use super::Tier;
use super::field::{Alignment, Color, FieldConfig, FieldName, FontStyle, FontWeight, TextTransform};

/// Family name of the decorative script face used for student names.
pub const DECORATIVE_FAMILY: &str = "Great Vibes";

/// Generic family used for everything else.
pub const FALLBACK_FAMILY: &str = "serif";

/// Const-friendly mirror of [`FieldConfig`].
#[derive(Debug, Clone, Copy)]
struct FieldSpec {
    x: f32,
    y: f32,
    font_size: f32,
    font_weight: FontWeight,
    font_style: FontStyle,
    font_family: &'static str,
    text_align: Alignment,
    color: Color,
    text_transform: Option<TextTransform>,
    rotation: Option<f32>,
}

impl FieldSpec {
    const fn serif(x: f32, y: f32, font_size: f32) -> Self {
        Self {
            x,
            y,
            font_size,
            font_weight: FontWeight::Normal,
            font_style: FontStyle::Normal,
            font_family: FALLBACK_FAMILY,
            text_align: Alignment::Left,
            color: INK,
            text_transform: None,
            rotation: None,
        }
    }

    const fn bold(mut self) -> Self {
        self.font_weight = FontWeight::Bold;
        self
    }

    const fn italic(mut self) -> Self {
        self.font_style = FontStyle::Italic;
        self
    }

    const fn center(mut self) -> Self {
        self.text_align = Alignment::Center;
        self
    }

    const fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    const fn family(mut self, family: &'static str) -> Self {
        self.font_family = family;
        self
    }

    const fn transform(mut self, transform: TextTransform) -> Self {
        self.text_transform = Some(transform);
        self
    }

    const fn rotate(mut self, degrees: f32) -> Self {
        self.rotation = Some(degrees);
        self
    }

    fn to_config(self) -> FieldConfig {
        FieldConfig {
            x: self.x,
            y: self.y,
            font_size: self.font_size,
            font_weight: self.font_weight,
            font_style: self.font_style,
            font_family: self.font_family.to_string(),
            text_align: self.text_align,
            color: self.color,
            text_transform: self.text_transform,
            rotation: self.rotation,
        }
    }
}

const INK: Color = Color::rgb(0x1b, 0x2a, 0x4a);
const GREY: Color = Color::rgb(0x33, 0x33, 0x33);
const MAROON: Color = Color::rgb(0x8b, 0x00, 0x00);
const FOREST: Color = Color::rgb(0x0f, 0x3d, 0x2e);
const GOLD: Color = Color::rgb(0xb8, 0x86, 0x0b);
const ROYAL: Color = Color::rgb(0x2a, 0x17, 0x5e);

const PASS: &[(FieldName, FieldSpec)] = &[
    (
        FieldName::StudentName,
        FieldSpec::serif(0.5, 0.47, 64.0)
            .bold()
            .center()
            .family(DECORATIVE_FAMILY)
            .transform(TextTransform::Uppercase),
    ),
    (
        FieldName::SchoolName,
        FieldSpec::serif(0.5, 0.58, 36.0)
            .center()
            .transform(TextTransform::Uppercase),
    ),
    (
        FieldName::ExamNumber,
        FieldSpec::serif(0.16, 0.86, 22.0).bold().color(GREY),
    ),
    (FieldName::Date, FieldSpec::serif(0.72, 0.86, 22.0).color(GREY)),
    (
        FieldName::SerialNumber,
        FieldSpec::serif(0.84, 0.08, 20.0).bold().color(MAROON),
    ),
    (
        FieldName::GradeLevel,
        FieldSpec::serif(0.5, 0.66, 30.0)
            .bold()
            .center()
            .transform(TextTransform::Uppercase),
    ),
];

const CREDIT: &[(FieldName, FieldSpec)] = &[
    (
        FieldName::StudentName,
        FieldSpec::serif(0.5, 0.45, 68.0)
            .bold()
            .center()
            .family(DECORATIVE_FAMILY)
            .color(FOREST)
            .transform(TextTransform::Uppercase),
    ),
    (
        FieldName::SchoolName,
        FieldSpec::serif(0.5, 0.56, 38.0)
            .center()
            .color(FOREST)
            .transform(TextTransform::Uppercase),
    ),
    // Pixel-exact: sits inside the printed exam-number box.
    (
        FieldName::ExamNumber,
        FieldSpec::serif(1290.0, 1235.0, 24.0).bold().color(GREY),
    ),
    (
        FieldName::Year,
        FieldSpec::serif(0.905, 0.135, 40.0)
            .bold()
            .center()
            .color(GOLD)
            .rotate(-8.0),
    ),
    (FieldName::Date, FieldSpec::serif(0.27, 0.873, 24.0).color(GREY)),
    (
        FieldName::SerialNumber,
        FieldSpec::serif(0.085, 0.075, 22.0).bold().color(MAROON),
    ),
    (
        FieldName::GradeLevel,
        FieldSpec::serif(0.5, 0.64, 32.0)
            .bold()
            .center()
            .color(FOREST)
            .transform(TextTransform::Uppercase),
    ),
];

const DISTINCTION: &[(FieldName, FieldSpec)] = &[
    (
        FieldName::StudentName,
        FieldSpec::serif(0.5, 0.44, 72.0)
            .bold()
            .center()
            .family(DECORATIVE_FAMILY)
            .color(ROYAL)
            .transform(TextTransform::Uppercase),
    ),
    (
        FieldName::SchoolName,
        FieldSpec::serif(0.5, 0.555, 40.0)
            .italic()
            .center()
            .color(ROYAL)
            .transform(TextTransform::Uppercase),
    ),
    (
        FieldName::ExamNumber,
        FieldSpec::serif(1300.0, 1240.0, 24.0).bold().color(GREY),
    ),
    (
        FieldName::Year,
        FieldSpec::serif(0.897, 0.148, 44.0)
            .bold()
            .center()
            .color(GOLD)
            .rotate(12.0),
    ),
    (FieldName::Date, FieldSpec::serif(0.265, 0.875, 24.0).color(GREY)),
    (
        FieldName::SerialNumber,
        FieldSpec::serif(0.08, 0.07, 22.0).bold().color(MAROON),
    ),
    (
        FieldName::GradeLevel,
        FieldSpec::serif(0.5, 0.635, 34.0)
            .bold()
            .center()
            .color(GOLD)
            .transform(TextTransform::Uppercase),
    ),
];

fn table(tier: Tier) -> &'static [(FieldName, FieldSpec)] {
    match tier {
        Tier::Pass => PASS,
        Tier::Credit => CREDIT,
        Tier::Distinction => DISTINCTION,
    }
}

/// Default field table for a tier.
pub fn defaults(tier: Tier) -> BTreeMap<FieldName, FieldConfig> {
    table(tier)
        .iter()
        .map(|(name, spec)| (*name, spec.to_config()))
        .collect()
}

/// Default config for a single field, if the tier's template has that slot.
pub fn default_field(tier: Tier, field: FieldName) -> Option<FieldConfig> {
    table(tier)
        .iter()
        .find(|(name, _)| *name == field)
        .map(|(_, spec)| spec.to_config())
}
