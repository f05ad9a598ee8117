use serde::{Deserialize, Serialize};
use std::fmt;

use crate::color;
use crate::profile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ErrorCorrectionLevel {
    L,
    #[default]
    M,
    Q,
    H,
}

impl ErrorCorrectionLevel {
    pub const ALL: [Self; 4] = [Self::L, Self::M, Self::Q, Self::H];

    pub fn parse(id: &str) -> Option<Self> {
        match id {
            "L" => Some(Self::L),
            "M" => Some(Self::M),
            "Q" => Some(Self::Q),
            "H" => Some(Self::H),
            _ => None,
        }
    }

    /// Lenient lookup: unknown ids fall back to `M`.
    pub fn from_id(id: &str) -> Self {
        Self::parse(id).unwrap_or_default()
    }

    /// Approximate share of symbol data that can be restored.
    pub fn recovery_percent(self) -> u8 {
        match self {
            Self::L => 7,
            Self::M => 15,
            Self::Q => 25,
            Self::H => 30,
        }
    }

    pub fn label(self) -> String {
        let name = match self {
            Self::L => "Low",
            Self::M => "Medium",
            Self::Q => "Quartile",
            Self::H => "High",
        };
        format!("{self} ({name}, {}%)", self.recovery_percent())
    }
}

impl fmt::Display for ErrorCorrectionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::L => write!(f, "L"),
            Self::M => write!(f, "M"),
            Self::Q => write!(f, "Q"),
            Self::H => write!(f, "H"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeTier {
    Xs,
    S,
    #[default]
    M,
    L,
    Xl,
}

impl SizeTier {
    pub fn parse(id: &str) -> Option<Self> {
        match id {
            "xs" => Some(Self::Xs),
            "s" => Some(Self::S),
            "m" => Some(Self::M),
            "l" => Some(Self::L),
            "xl" => Some(Self::Xl),
            _ => None,
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            Self::Xs => "xs",
            Self::S => "s",
            Self::M => "m",
            Self::L => "l",
            Self::Xl => "xl",
        }
    }
}

impl fmt::Display for SizeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Advisory character-capacity text, one entry per error-correction level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityTable {
    #[serde(rename = "L")]
    pub l: String,
    #[serde(rename = "M")]
    pub m: String,
    #[serde(rename = "Q")]
    pub q: String,
    #[serde(rename = "H")]
    pub h: String,
}

impl CapacityTable {
    pub fn get(&self, level: ErrorCorrectionLevel) -> &str {
        match level {
            ErrorCorrectionLevel::L => &self.l,
            ErrorCorrectionLevel::M => &self.m,
            ErrorCorrectionLevel::Q => &self.q,
            ErrorCorrectionLevel::H => &self.h,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeProfile {
    pub id: SizeTier,
    pub name: String,
    /// Pixel width of one module.
    pub box_size: u32,
    /// Quiet zone, in modules, on each side.
    pub border: u32,
    pub description: String,
    pub capacity: CapacityTable,
    #[serde(default)]
    pub max_version: Option<u8>,
}

/// A color that always has the form `#RRGGBB`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ColorValue(String);

impl ColorValue {
    pub const BLACK: &'static str = "#000000";

    /// Strict parse of the six-digit form. Shorthand and palette handling
    /// live in [`color::validate`].
    pub fn parse(raw: &str) -> Option<Self> {
        let digits = raw.strip_prefix('#')?;
        if digits.len() == 6 && digits.chars().all(|c| c.is_ascii_hexdigit()) {
            Some(Self(raw.to_string()))
        } else {
            None
        }
    }

    pub fn black() -> Self {
        Self(Self::BLACK.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn rgb(&self) -> [u8; 3] {
        let channel = |range: std::ops::Range<usize>| {
            self.0
                .get(range)
                .and_then(|hex| u8::from_str_radix(hex, 16).ok())
                .unwrap_or(0)
        };
        [channel(1..3), channel(3..5), channel(5..7)]
    }
}

impl Default for ColorValue {
    fn default() -> Self {
        Self::black()
    }
}

impl fmt::Display for ColorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ColorValue {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("invalid color {value:?}, expected #RRGGBB"))
    }
}

impl From<ColorValue> for String {
    fn from(value: ColorValue) -> Self {
        value.0
    }
}

/// Per-deployment behavior of the generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    #[serde(default = "default_normalize_input")]
    pub normalize_input: bool,
    /// Longer input is cut to this many characters, with a warning.
    #[serde(default)]
    pub max_input_length: Option<usize>,
    #[serde(default = "default_contrast_background")]
    pub contrast_background: bool,
    #[serde(default = "default_size_options")]
    pub size_options: Vec<SizeProfile>,
    #[serde(default = "default_color_palette")]
    pub color_palette: Vec<String>,
}

fn default_normalize_input() -> bool { true }
fn default_contrast_background() -> bool { true }
fn default_size_options() -> Vec<SizeProfile> { profile::builtin().to_vec() }
fn default_color_palette() -> Vec<String> {
    color::DEFAULT_PALETTE.iter().map(|c| (*c).to_string()).collect()
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            normalize_input: default_normalize_input(),
            max_input_length: None,
            contrast_background: default_contrast_background(),
            size_options: default_size_options(),
            color_palette: default_color_palette(),
        }
    }
}

impl GeneratorConfig {
    pub fn resolve_size(&self, tier_id: &str) -> &SizeProfile {
        profile::resolve_in(&self.size_options, tier_id)
    }

    pub fn validate_color(&self, raw: &str) -> ColorValue {
        color::validate_with_palette(raw, &self.color_palette)
    }
}

/// A fully resolved generation request.
#[derive(Debug, Clone)]
pub struct QrRequest {
    pub text: String,
    pub size: SizeProfile,
    pub level: ErrorCorrectionLevel,
    pub color: ColorValue,
}

impl QrRequest {
    /// Resolves raw option ids leniently: unknown tier -> `m`, unknown level
    /// -> `M`, unusable color -> black.
    pub fn resolve(
        text: &str,
        size_id: Option<&str>,
        color: Option<&str>,
        level_id: Option<&str>,
        config: &GeneratorConfig,
    ) -> Self {
        Self {
            text: text.to_string(),
            size: config.resolve_size(size_id.unwrap_or("m")).clone(),
            level: level_id.map(ErrorCorrectionLevel::from_id).unwrap_or_default(),
            color: config.validate_color(color.unwrap_or_default()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QrResult {
    pub text: String,
    pub encoded_text: String,
    pub input_length: usize,
    pub size: SizeProfile,
    pub foreground: ColorValue,
    pub background: ColorValue,
    pub level: ErrorCorrectionLevel,
    pub error_level: String,
    pub size_px: (u32, u32),
    pub version: u8,
    pub capacity_estimate: String,
    pub warning: Option<String>,
    #[serde(skip)]
    pub png: Vec<u8>,
    pub data_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generator_config_default() {
        let config = GeneratorConfig::default();
        assert!(config.normalize_input);
        assert!(config.contrast_background);
        assert!(config.max_input_length.is_none());
        assert_eq!(config.size_options.len(), 5);
        assert!(config.color_palette.iter().any(|c| c == "#6c63ff"));
    }

    #[test]
    fn error_correction_level_display() {
        assert_eq!(format!("{}", ErrorCorrectionLevel::L), "L");
        assert_eq!(format!("{}", ErrorCorrectionLevel::M), "M");
        assert_eq!(format!("{}", ErrorCorrectionLevel::Q), "Q");
        assert_eq!(format!("{}", ErrorCorrectionLevel::H), "H");
    }

    #[test]
    fn error_correction_level_lenient_lookup() {
        assert_eq!(ErrorCorrectionLevel::from_id("H"), ErrorCorrectionLevel::H);
        assert_eq!(ErrorCorrectionLevel::from_id("h"), ErrorCorrectionLevel::M);
        assert_eq!(ErrorCorrectionLevel::from_id(""), ErrorCorrectionLevel::M);
        assert_eq!(ErrorCorrectionLevel::parse("X"), None);
    }

    #[test]
    fn error_correction_labels() {
        assert_eq!(ErrorCorrectionLevel::L.label(), "L (Low, 7%)");
        assert_eq!(ErrorCorrectionLevel::H.label(), "H (High, 30%)");
        let total: u32 = ErrorCorrectionLevel::ALL
            .iter()
            .map(|l| u32::from(l.recovery_percent()))
            .sum();
        assert_eq!(total, 77);
    }

    #[test]
    fn color_value_rejects_short_and_named_forms() {
        assert!(ColorValue::parse("#abc").is_none());
        assert!(ColorValue::parse("red").is_none());
        assert!(ColorValue::parse("#12345g").is_none());
        assert_eq!(ColorValue::parse("#FF8000").unwrap().rgb(), [255, 128, 0]);
    }

    #[test]
    fn color_value_serde_enforces_invariant() {
        let ok: ColorValue = serde_json::from_str("\"#a1b2c3\"").unwrap();
        assert_eq!(ok.as_str(), "#a1b2c3");
        assert!(serde_json::from_str::<ColorValue>("\"#abc\"").is_err());
    }

    #[test]
    fn request_resolution_is_lenient() {
        let config = GeneratorConfig::default();
        let req = QrRequest::resolve("hi", Some("huge"), Some("not-a-color"), Some("Z"), &config);
        assert_eq!(req.size.id, SizeTier::M);
        assert_eq!(req.color.as_str(), "#000000");
        assert_eq!(req.level, ErrorCorrectionLevel::M);

        let req = QrRequest::resolve("hi", Some("xl"), Some("#f0a"), Some("Q"), &config);
        assert_eq!(req.size.id, SizeTier::Xl);
        assert_eq!(req.color.as_str(), "#ff00aa");
        assert_eq!(req.level, ErrorCorrectionLevel::Q);
    }

    #[test]
    fn config_from_toml() {
        let toml_str = r##"
            normalize_input = false
            max_input_length = 1000
            color_palette = ["#000000", "#dc3545"]
        "##;
        let config: GeneratorConfig = toml::from_str(toml_str).unwrap();
        assert!(!config.normalize_input);
        assert_eq!(config.max_input_length, Some(1000));
        assert_eq!(config.color_palette.len(), 2);
        assert!(config.contrast_background);
        assert_eq!(config.size_options.len(), 5);
    }

    #[test]
    fn config_from_toml_with_custom_tiers() {
        let toml_str = r#"
            [[size_options]]
            id = "s"
            name = "Badge"
            box_size = 6
            border = 1
            description = "Conference badges"
            capacity = { L = "~50", M = "~40", Q = "~30", H = "~20" }
            max_version = 5
        "#;
        let config: GeneratorConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.size_options.len(), 1);
        let profile = &config.size_options[0];
        assert_eq!(profile.id, SizeTier::S);
        assert_eq!(profile.capacity.get(ErrorCorrectionLevel::Q), "~30");
        assert_eq!(profile.max_version, Some(5));
    }
}
