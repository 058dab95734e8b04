//! # Certificate Model
//!
//! Input records and layout rules for UBEAT certificates.
//!
//! ## Modules
//!
//! - [`field`]: Field placement/style descriptors and text transforms
//! - [`tiers`]: Default field tables for each certificate tier
//! - [`layout`]: Turns a student record into positioned text for a template
//!
//! ## Example
//!
//! ```
//! use ubeat_certificate::certificate::{CertificateData, Student, Tier, download_filename};
//!
//! let data = CertificateData {
//!     student: Student::new("Jane Doe", "BECE/2024/001"),
//!     school_name: "St Marys".into(),
//! };
//! assert_eq!(
//!     download_filename(&data.student.exam_number),
//!     "UBEAT_Certificate_BECE_2024_001.png"
//! );
//! assert_eq!("Credit".parse::<Tier>().unwrap(), Tier::Credit);
//! ```

pub mod field;
pub mod layout;
pub mod tiers;

pub use field::{
    Alignment, CertificateFieldsConfig, Color, FieldConfig, FieldName, FieldOverride, FontStyle,
    FontWeight, TextTransform,
};
pub use layout::{PlacedText, check_sizes, plan};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CertificateError;

/// Certificate grade. Each tier has its own template image and field table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Pass,
    Credit,
    Distinction,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Pass, Tier::Credit, Tier::Distinction];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Pass => "pass",
            Tier::Credit => "credit",
            Tier::Distinction => "distinction",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = CertificateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pass" => Ok(Tier::Pass),
            "credit" => Ok(Tier::Credit),
            "distinction" => Ok(Tier::Distinction),
            _ => Err(CertificateError::UnknownTier(s.to_string())),
        }
    }
}

/// Student record as held by the results portal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub student_name: String,
    pub exam_number: String,
    /// Year the exam was sat. Defaults to the current year when absent.
    #[serde(default)]
    pub exam_year: Option<i32>,
    #[serde(default)]
    pub serial_number: Option<String>,
}

impl Student {
    pub fn new(student_name: impl Into<String>, exam_number: impl Into<String>) -> Self {
        Self {
            student_name: student_name.into(),
            exam_number: exam_number.into(),
            exam_year: None,
            serial_number: None,
        }
    }

    pub fn exam_year(mut self, year: i32) -> Self {
        self.exam_year = Some(year);
        self
    }

    pub fn serial_number(mut self, serial: impl Into<String>) -> Self {
        self.serial_number = Some(serial.into());
        self
    }
}

/// Everything printed on a certificate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateData {
    pub student: Student,
    pub school_name: String,
}

impl CertificateData {
    /// Reject records missing the fields every template prints.
    pub fn validate(&self) -> Result<(), CertificateError> {
        if self.student.student_name.trim().is_empty() {
            return Err(CertificateError::InvalidInput(
                "student name cannot be empty".to_string(),
            ));
        }
        if self.student.exam_number.trim().is_empty() {
            return Err(CertificateError::InvalidInput(
                "exam number cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Download filename for a certificate: every `/` in the exam number becomes `_`.
pub fn download_filename(exam_number: &str) -> String {
    format!("UBEAT_Certificate_{}.png", exam_number.replace('/', "_"))
}
