//! Certificate layout: student record → positioned text.
//!
//! ```text
//! CertificateData ─┐
//! Tier defaults ───┼─► merge overrides ─► field text ─► transform ─► PlacedText
//! Overrides ───────┘                                     │
//!                          template size ─► resolve x/y ─┘
//! ```
//!
//! Everything here is pure; the painter draws exactly what [`plan`] returns.

use chrono::{Datelike, NaiveDate};

use super::field::{CertificateFieldsConfig, FieldConfig, FieldName};
use super::tiers;
use super::{CertificateData, Tier};
use crate::error::CertificateError;

/// Draw order. Later fields paint over earlier ones.
pub const DRAW_ORDER: [FieldName; 6] = [
    FieldName::StudentName,
    FieldName::SchoolName,
    FieldName::ExamNumber,
    FieldName::Year,
    FieldName::Date,
    FieldName::SerialNumber,
];

/// One field ready to paint.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedText {
    pub field: FieldName,
    /// Final text, transform already applied.
    pub text: String,
    /// Anchor in pixels. `y` is the baseline.
    pub x: f32,
    pub y: f32,
    pub style: FieldConfig,
}

/// Merge caller overrides onto a tier's default for one field.
///
/// Returns `None` when the tier has no slot for the field.
pub fn effective_config(
    tier: Tier,
    field: FieldName,
    overrides: &CertificateFieldsConfig,
) -> Option<FieldConfig> {
    let base = tiers::default_field(tier, field)?;
    Some(match overrides.override_for(field) {
        Some(patch) => base.merged(patch),
        None => base,
    })
}

/// Lay out every drawable field for a template of `width` x `height` pixels.
pub fn plan(
    data: &CertificateData,
    tier: Tier,
    overrides: &CertificateFieldsConfig,
    width: u32,
    height: u32,
    today: NaiveDate,
) -> Vec<PlacedText> {
    let mut placed = Vec::with_capacity(DRAW_ORDER.len());

    for field in DRAW_ORDER {
        if field.is_conditional() && overrides.is_suppressed(field) {
            continue;
        }
        if field == FieldName::Year && tier == Tier::Pass {
            continue;
        }
        let Some(style) = effective_config(tier, field, overrides) else {
            continue;
        };

        let raw = field_text(field, data, tier, today);
        let text = style.text_transform.unwrap_or_default().apply(&raw);
        let (x, y) = style.anchor(width, height);

        placed.push(PlacedText {
            field,
            text,
            x,
            y,
            style,
        });
    }

    placed
}

/// Reject font sizes no template of `height` pixels can hold.
///
/// Sizes must be finite, positive and no taller than the template.
pub fn check_sizes(placed: &[PlacedText], height: u32) -> Result<(), CertificateError> {
    for p in placed {
        let size = p.style.font_size;
        if !size.is_finite() || size <= 0.0 || size > height as f32 {
            return Err(CertificateError::InvalidInput(format!(
                "{}: font size {} outside 0..={} for this template",
                p.field, size, height
            )));
        }
    }
    Ok(())
}

/// Untransformed text for a field.
pub fn field_text(field: FieldName, data: &CertificateData, tier: Tier, today: NaiveDate) -> String {
    let student = &data.student;
    let exam_year = student.exam_year.unwrap_or_else(|| today.year());

    match field {
        FieldName::StudentName => student.student_name.clone(),
        FieldName::SchoolName => data.school_name.clone(),
        FieldName::ExamNumber => match tier {
            Tier::Pass => format!("Exam No: {}", student.exam_number),
            Tier::Credit | Tier::Distinction => student.exam_number.clone(),
        },
        FieldName::Year => two_digit_year(exam_year),
        FieldName::Date => format_date(today, student.exam_year),
        // Credit and distinction templates print the two-digit year in the
        // serial slot. Kept as observed until the product owner confirms.
        FieldName::SerialNumber => match tier {
            Tier::Pass => format!(
                "S/N: {}",
                student
                    .serial_number
                    .as_deref()
                    .unwrap_or(&student.exam_number)
            ),
            Tier::Credit | Tier::Distinction => two_digit_year(exam_year),
        },
        FieldName::GradeLevel => tier.as_str().to_uppercase(),
    }
}

/// Last two characters of the year as written.
pub fn two_digit_year(year: i32) -> String {
    let s = year.to_string();
    let start = s.len().saturating_sub(2);
    s[start..].to_string()
}

/// Long date for `today` with its year swapped for the exam year.
///
/// `2026-10-19` with exam year 2023 → `"October 19, 2023"`.
pub fn format_date(today: NaiveDate, exam_year: Option<i32>) -> String {
    let formatted = today.format("%B %-d, %Y").to_string();
    let current = today.year().to_string();
    let shown = exam_year.unwrap_or_else(|| today.year()).to_string();
    formatted.replacen(&current, &shown, 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::certificate::Student;
    use crate::certificate::field::{FieldOverride, TextTransform};
    use pretty_assertions::assert_eq;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn data() -> CertificateData {
        CertificateData {
            student: Student::new("jane doe", "A/123").exam_year(2023),
            school_name: "st marys".into(),
        }
    }

    fn text_of(placed: &[PlacedText], field: FieldName) -> Option<&str> {
        placed
            .iter()
            .find(|p| p.field == field)
            .map(|p| p.text.as_str())
    }

    #[test]
    fn test_draw_order_is_fixed() {
        let placed = plan(&data(), Tier::Credit, &CertificateFieldsConfig::new(), 2000, 1414, today());
        let fields: Vec<FieldName> = placed.iter().map(|p| p.field).collect();
        assert_eq!(
            fields,
            vec![
                FieldName::StudentName,
                FieldName::SchoolName,
                FieldName::ExamNumber,
                FieldName::Year,
                FieldName::Date,
                FieldName::SerialNumber,
            ]
        );
    }

    #[test]
    fn test_exam_number_label_per_tier() {
        let empty = CertificateFieldsConfig::new();
        let pass = plan(&data(), Tier::Pass, &empty, 2000, 1414, today());
        assert_eq!(text_of(&pass, FieldName::ExamNumber), Some("Exam No: A/123"));
        for tier in [Tier::Credit, Tier::Distinction] {
            let placed = plan(&data(), tier, &empty, 2000, 1414, today());
            assert_eq!(text_of(&placed, FieldName::ExamNumber), Some("A/123"));
        }
    }

    #[test]
    fn test_pass_never_draws_year() {
        let overrides = CertificateFieldsConfig::new().with(
            FieldName::Year,
            FieldOverride {
                x: Some(0.5),
                y: Some(0.5),
                ..Default::default()
            },
        );
        let placed = plan(&data(), Tier::Pass, &overrides, 2000, 1414, today());
        assert_eq!(text_of(&placed, FieldName::Year), None);
    }

    #[test]
    fn test_credit_year_is_last_two_digits() {
        let empty = CertificateFieldsConfig::new();
        let placed = plan(&data(), Tier::Credit, &empty, 2000, 1414, today());
        assert_eq!(text_of(&placed, FieldName::Year), Some("23"));

        let no_year = CertificateData {
            student: Student::new("jane doe", "A/123"),
            school_name: "x".into(),
        };
        let placed = plan(&no_year, Tier::Credit, &empty, 2000, 1414, today());
        assert_eq!(text_of(&placed, FieldName::Year), Some("26"));
    }

    #[test]
    fn test_serial_number_per_tier() {
        let empty = CertificateFieldsConfig::new();
        let pass = plan(&data(), Tier::Pass, &empty, 2000, 1414, today());
        assert_eq!(text_of(&pass, FieldName::SerialNumber), Some("S/N: A/123"));

        let with_serial = CertificateData {
            student: Student::new("jane doe", "A/123").serial_number("0042"),
            school_name: "x".into(),
        };
        let pass = plan(&with_serial, Tier::Pass, &empty, 2000, 1414, today());
        assert_eq!(text_of(&pass, FieldName::SerialNumber), Some("S/N: 0042"));

        let credit = plan(&data(), Tier::Credit, &empty, 2000, 1414, today());
        assert_eq!(text_of(&credit, FieldName::SerialNumber), Some("23"));
    }

    #[test]
    fn test_null_override_suppresses_conditional_fields() {
        let overrides = CertificateFieldsConfig::new()
            .suppress(FieldName::ExamNumber)
            .suppress(FieldName::Year)
            .suppress(FieldName::SerialNumber)
            .suppress(FieldName::StudentName);
        let placed = plan(&data(), Tier::Distinction, &overrides, 2000, 1414, today());
        let fields: Vec<FieldName> = placed.iter().map(|p| p.field).collect();
        assert_eq!(
            fields,
            vec![FieldName::StudentName, FieldName::SchoolName, FieldName::Date]
        );
    }

    #[test]
    fn test_transform_applied_to_names() {
        let placed = plan(&data(), Tier::Distinction, &CertificateFieldsConfig::new(), 2000, 1414, today());
        assert_eq!(text_of(&placed, FieldName::StudentName), Some("JANE DOE"));
        assert_eq!(text_of(&placed, FieldName::SchoolName), Some("ST MARYS"));

        let overrides = CertificateFieldsConfig::new().with(
            FieldName::StudentName,
            FieldOverride {
                text_transform: Some(TextTransform::Capitalize),
                ..Default::default()
            },
        );
        let placed = plan(&data(), Tier::Distinction, &overrides, 2000, 1414, today());
        assert_eq!(text_of(&placed, FieldName::StudentName), Some("Jane Doe"));
    }

    #[test]
    fn test_anchor_resolution() {
        let empty = CertificateFieldsConfig::new();
        let placed = plan(&data(), Tier::Credit, &empty, 2000, 1400, today());
        let name = placed.iter().find(|p| p.field == FieldName::StudentName).unwrap();
        assert_eq!((name.x, name.y), (1000.0, 0.45 * 1400.0));
        let exam = placed.iter().find(|p| p.field == FieldName::ExamNumber).unwrap();
        assert_eq!((exam.x, exam.y), (1290.0, 1235.0));
    }

    #[test]
    fn test_check_sizes_bounds_font_size_by_template_height() {
        let empty = CertificateFieldsConfig::new();
        let placed = plan(&data(), Tier::Distinction, &empty, 2000, 1414, today());
        assert!(check_sizes(&placed, 1414).is_ok());

        for size in [1e7, 0.0, -12.0, f32::NAN] {
            let overrides = CertificateFieldsConfig::new().with(
                FieldName::StudentName,
                FieldOverride {
                    font_size: Some(size),
                    ..Default::default()
                },
            );
            let placed = plan(&data(), Tier::Distinction, &overrides, 2000, 1414, today());
            assert!(
                matches!(check_sizes(&placed, 1414), Err(CertificateError::InvalidInput(_))),
                "size {}",
                size
            );
        }
    }

    #[test]
    fn test_date_uses_exam_year() {
        assert_eq!(format_date(today(), Some(2023)), "October 19, 2023");
        assert_eq!(format_date(today(), None), "October 19, 2026");
        let jan = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        assert_eq!(format_date(jan, Some(2019)), "January 5, 2019");
    }

    #[test]
    fn test_two_digit_year() {
        assert_eq!(two_digit_year(2023), "23");
        assert_eq!(two_digit_year(2005), "05");
        assert_eq!(two_digit_year(7), "7");
    }
}
