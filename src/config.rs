//! # Renderer Configuration
//!
//! Where templates and fonts come from, and how long to wait for them.
//!
//! ## Usage
//!
//! ```
//! use ubeat_certificate::config::RendererConfig;
//! use ubeat_certificate::certificate::Tier;
//!
//! let config = RendererConfig::default();
//! assert_eq!(config.fetch_timeout_secs, 30);
//! println!("pass template: {}", config.templates.for_tier(Tier::Pass));
//! ```
//!
//! ## File format
//!
//! ```json
//! {
//!   "templates": {
//!     "pass": "assets/certificates/pass.png",
//!     "credit": "https://cdn.example.com/credit.png",
//!     "distinction": "assets/certificates/distinction.png"
//!   },
//!   "decorativeFont": {
//!     "family": "Great Vibes",
//!     "source": "assets/fonts/GreatVibes-Regular.ttf"
//!   },
//!   "fallbackFont": "/usr/share/fonts/truetype/dejavu/DejaVuSerif.ttf",
//!   "fetchTimeoutSecs": 30
//! }
//! ```
//!
//! Every key is optional; missing keys take the defaults below.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::assets::AssetSource;
use crate::certificate::Tier;
use crate::certificate::tiers::DECORATIVE_FAMILY;
use crate::error::CertificateError;

/// Background template per tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateSet {
    pub pass: AssetSource,
    pub credit: AssetSource,
    pub distinction: AssetSource,
}

impl TemplateSet {
    pub fn for_tier(&self, tier: Tier) -> &AssetSource {
        match tier {
            Tier::Pass => &self.pass,
            Tier::Credit => &self.credit,
            Tier::Distinction => &self.distinction,
        }
    }
}

impl Default for TemplateSet {
    fn default() -> Self {
        Self {
            pass: AssetSource::parse("assets/certificates/pass.png"),
            credit: AssetSource::parse("assets/certificates/credit.png"),
            distinction: AssetSource::parse("assets/certificates/distinction.png"),
        }
    }
}

/// The one custom face loaded best-effort on every render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecorativeFont {
    /// Family name field configs refer to.
    pub family: String,
    pub source: AssetSource,
}

impl Default for DecorativeFont {
    fn default() -> Self {
        Self {
            family: DECORATIVE_FAMILY.to_string(),
            source: AssetSource::parse("assets/fonts/GreatVibes-Regular.ttf"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RendererConfig {
    pub templates: TemplateSet,
    pub decorative_font: DecorativeFont,
    /// TTF used for every family other than the decorative one. When unset
    /// or unloadable, the built-in bitmap face is used.
    pub fallback_font: Option<AssetSource>,
    pub fetch_timeout_secs: u64,
    pub user_agent: String,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            templates: TemplateSet::default(),
            decorative_font: DecorativeFont::default(),
            fallback_font: None,
            fetch_timeout_secs: 30,
            user_agent: concat!("ubeat-certificate/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl RendererConfig {
    /// Parse a JSON config document.
    pub fn from_json(json: &str) -> Result<Self, CertificateError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| CertificateError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values no renderer can work with.
    pub fn validate(&self) -> Result<(), CertificateError> {
        if self.fetch_timeout_secs == 0 {
            return Err(CertificateError::Config(
                "fetchTimeoutSecs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Load from a JSON file. Relative asset paths resolve against the
    /// file's directory.
    pub fn load(path: &Path) -> Result<Self, CertificateError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            CertificateError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config = Self::from_json(&json)?;
        let root = path.parent().unwrap_or_else(|| Path::new("."));
        Ok(config.rebased(root))
    }

    /// Load `path` if given, otherwise use defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, CertificateError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Resolve every relative asset path against `root`.
    pub fn rebased(mut self, root: &Path) -> Self {
        self.templates.pass = self.templates.pass.rebased(root);
        self.templates.credit = self.templates.credit.rebased(root);
        self.templates.distinction = self.templates.distinction.rebased(root);
        self.decorative_font.source = self.decorative_font.source.rebased(root);
        self.fallback_font = self.fallback_font.map(|s| s.rebased(root));
        self
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_defaults() {
        let config = RendererConfig::default();
        assert_eq!(
            config.templates.for_tier(Tier::Credit),
            &AssetSource::Path(PathBuf::from("assets/certificates/credit.png"))
        );
        assert_eq!(config.decorative_font.family, DECORATIVE_FAMILY);
        assert!(config.fallback_font.is_none());
        assert_eq!(config.fetch_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = RendererConfig::from_json(
            r#"{"templates": {"credit": "https://cdn.example.com/credit.png"}, "fetchTimeoutSecs": 5}"#,
        )
        .unwrap();
        assert_eq!(
            config.templates.credit,
            AssetSource::Url("https://cdn.example.com/credit.png".into())
        );
        assert_eq!(config.templates.pass, TemplateSet::default().pass);
        assert_eq!(config.fetch_timeout_secs, 5);
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        assert!(matches!(
            RendererConfig::from_json("{not json"),
            Err(CertificateError::Config(_))
        ));
    }

    #[test]
    fn test_zero_fetch_timeout_is_config_error() {
        assert!(matches!(
            RendererConfig::from_json(r#"{"fetchTimeoutSecs": 0}"#),
            Err(CertificateError::Config(_))
        ));
        assert!(RendererConfig::from_json(r#"{"fetchTimeoutSecs": 1}"#).is_ok());
    }

    #[test]
    fn test_rebased_paths() {
        let config = RendererConfig {
            fallback_font: Some(AssetSource::parse("fonts/serif.ttf")),
            ..Default::default()
        }
        .rebased(Path::new("/etc/ubeat"));
        assert_eq!(
            config.templates.pass,
            AssetSource::Path(PathBuf::from("/etc/ubeat/assets/certificates/pass.png"))
        );
        assert_eq!(
            config.fallback_font,
            Some(AssetSource::Path(PathBuf::from("/etc/ubeat/fonts/serif.ttf")))
        );
    }

    #[test]
    fn test_load_missing_file_is_config_error() {
        assert!(matches!(
            RendererConfig::load(Path::new("/no/such/config.json")),
            Err(CertificateError::Config(_))
        ));
    }
}
