use qrcode::types::QrError;
use qrcode::{Color, EcLevel, QrCode, Version};
use thiserror::Error;

use crate::profile::MAX_VERSION;
use crate::types::ErrorCorrectionLevel;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeFault {
    /// The data does not fit any version the caller allowed.
    #[error("data does not fit in the allowed symbol versions")]
    CapacityOverflow,

    #[error("{0}")]
    Encoder(String),
}

/// An encoded QR matrix, row-major, `true` for dark modules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    version: u8,
    width: u32,
    modules: Vec<bool>,
}

impl Symbol {
    /// Returns `None` unless `modules` holds exactly `width * width` entries.
    pub fn new(version: u8, width: u32, modules: Vec<bool>) -> Option<Self> {
        let side = usize::try_from(width).ok()?;
        (side.checked_mul(side)? == modules.len()).then_some(Self { version, width, modules })
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    /// Modules per side, quiet zone excluded.
    pub fn module_count(&self) -> u32 {
        self.width
    }

    pub fn is_dark(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.width {
            return false;
        }
        let index = u64::from(y) * u64::from(self.width) + u64::from(x);
        usize::try_from(index)
            .ok()
            .and_then(|i| self.modules.get(i))
            .copied()
            .unwrap_or(false)
    }
}

/// Builds QR matrices. Implementations must be usable from several threads.
pub trait SymbolEncoder: Sync {
    /// Encode `text` at the smallest version that fits, but no larger than
    /// `max_version` (40 when `None`).
    fn encode(
        &self,
        text: &str,
        level: ErrorCorrectionLevel,
        max_version: Option<u8>,
    ) -> Result<Symbol, EncodeFault>;
}

/// [`SymbolEncoder`] backed by the `qrcode` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct QrcodeEncoder;

impl SymbolEncoder for QrcodeEncoder {
    fn encode(
        &self,
        text: &str,
        level: ErrorCorrectionLevel,
        max_version: Option<u8>,
    ) -> Result<Symbol, EncodeFault> {
        // Grows from version 1 until the data fits.
        let code = QrCode::with_error_correction_level(text.as_bytes(), ec_level(level))
            .map_err(convert_qr_error)?;

        let version = match code.version() {
            Version::Normal(v) => u8::try_from(v)
                .map_err(|_| EncodeFault::Encoder(format!("invalid symbol version {v}")))?,
            Version::Micro(_) => {
                return Err(EncodeFault::Encoder("unexpected Micro QR symbol".to_string()));
            }
        };
        if version > max_version.unwrap_or(MAX_VERSION).min(MAX_VERSION) {
            return Err(EncodeFault::CapacityOverflow);
        }

        let width = u32::try_from(code.width())
            .map_err(|_| EncodeFault::Encoder("symbol width out of range".to_string()))?;
        let modules = code.into_colors().into_iter().map(|c| c == Color::Dark).collect();

        Symbol::new(version, width, modules)
            .ok_or_else(|| EncodeFault::Encoder("symbol matrix is not square".to_string()))
    }
}

fn ec_level(level: ErrorCorrectionLevel) -> EcLevel {
    match level {
        ErrorCorrectionLevel::L => EcLevel::L,
        ErrorCorrectionLevel::M => EcLevel::M,
        ErrorCorrectionLevel::Q => EcLevel::Q,
        ErrorCorrectionLevel::H => EcLevel::H,
    }
}

fn convert_qr_error(err: QrError) -> EncodeFault {
    match err {
        QrError::DataTooLong => EncodeFault::CapacityOverflow,
        other => EncodeFault::Encoder(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_short_url_is_small_symbol() {
        let symbol = QrcodeEncoder.encode("https://example.com", ErrorCorrectionLevel::M, None).unwrap();
        assert_eq!(symbol.version(), 2);
        assert_eq!(symbol.module_count(), 25);
    }

    #[test]
    fn module_count_follows_version() {
        let text = "x".repeat(200);
        let symbol = QrcodeEncoder.encode(&text, ErrorCorrectionLevel::H, None).unwrap();
        assert_eq!(symbol.module_count(), 17 + 4 * u32::from(symbol.version()));
    }

    #[test]
    fn finder_pattern_corner_is_dark() {
        let symbol = QrcodeEncoder.encode("hello", ErrorCorrectionLevel::L, None).unwrap();
        assert!(symbol.is_dark(0, 0));
        assert!(!symbol.is_dark(7, 7));
        assert!(!symbol.is_dark(symbol.module_count(), 0));
    }

    #[test]
    fn max_version_caps_growth() {
        let text = "x".repeat(200);
        let result = QrcodeEncoder.encode(&text, ErrorCorrectionLevel::H, Some(5));
        assert_eq!(result.unwrap_err(), EncodeFault::CapacityOverflow);
    }

    #[test]
    fn data_beyond_version_40_overflows() {
        let text = "x".repeat(3000);
        let result = QrcodeEncoder.encode(&text, ErrorCorrectionLevel::H, None);
        assert_eq!(result.unwrap_err(), EncodeFault::CapacityOverflow);
    }

    #[test]
    fn symbol_new_checks_shape() {
        assert!(Symbol::new(1, 2, vec![true; 4]).is_some());
        assert!(Symbol::new(1, 2, vec![true; 5]).is_none());
    }

    #[test]
    fn ec_level_all_variants() {
        assert_eq!(ec_level(ErrorCorrectionLevel::L), EcLevel::L);
        assert_eq!(ec_level(ErrorCorrectionLevel::M), EcLevel::M);
        assert_eq!(ec_level(ErrorCorrectionLevel::Q), EcLevel::Q);
        assert_eq!(ec_level(ErrorCorrectionLevel::H), EcLevel::H);
    }
}
