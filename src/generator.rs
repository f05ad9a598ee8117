use tracing::{debug, error, warn};

use crate::color;
use crate::encoder::{EncodeFault, Symbol, SymbolEncoder};
use crate::error::{QrGenError, Result};
use crate::normalize::normalize;
use crate::profile::MAX_VERSION;
use crate::render;
use crate::types::{ColorValue, GeneratorConfig, QrRequest, QrResult, SizeProfile};

/// Run one request through normalization, encoding and rendering.
pub fn generate_with<E: SymbolEncoder + ?Sized>(
    encoder: &E,
    request: &QrRequest,
    config: &GeneratorConfig,
) -> Result<QrResult> {
    let trimmed = request.text.trim();
    if trimmed.is_empty() {
        return Err(QrGenError::EmptyInput);
    }

    let input_length = trimmed.chars().count();
    let mut warnings = Vec::new();

    let accepted = match config.max_input_length {
        Some(limit) if input_length > limit => {
            warn!(input_length, limit, "input truncated");
            warnings.push(format!(
                "Input was truncated from {input_length} to {limit} characters."
            ));
            trimmed.chars().take(limit).collect::<String>()
        }
        _ => trimmed.to_string(),
    };
    if accepted.trim().is_empty() {
        return Err(QrGenError::EmptyInput);
    }

    let encoded_text = if config.normalize_input {
        normalize(&accepted)
    } else {
        accepted.trim().to_string()
    };

    let symbol = encode_with_fallback(encoder, request, &encoded_text, input_length, &mut warnings)
        .inspect_err(|e| error!(error = %e, "QR code generation failed"))?;

    let background = if config.contrast_background {
        color::pick_background(&request.color)
    } else {
        ColorValue::parse(color::LIGHT_BACKGROUND).unwrap_or_default()
    };

    let SizeProfile { box_size, border, .. } = request.size;
    let side = render::pixel_size(symbol.module_count(), border, box_size)?;
    let img = render::rasterize(&symbol, box_size, border, &request.color, &background)?;
    let png = render::encode_png(&img)?;
    let data_url = render::png_data_url(&png);

    debug!(
        version = symbol.version(),
        size_px = side,
        tier = %request.size.id,
        level = %request.level,
        "QR code generated"
    );

    Ok(QrResult {
        text: trimmed.to_string(),
        encoded_text,
        input_length,
        size: request.size.clone(),
        foreground: request.color.clone(),
        background,
        level: request.level,
        error_level: request.level.label(),
        size_px: (side, side),
        version: symbol.version(),
        capacity_estimate: request.size.capacity.get(request.level).to_string(),
        warning: (!warnings.is_empty()).then(|| warnings.join(" ")),
        png,
        data_url,
    })
}

/// Encode within the tier's version ceiling first; on overflow retry with no
/// ceiling and record a warning. A tier already capped at version 40 has
/// nothing to retry.
fn encode_with_fallback<E: SymbolEncoder + ?Sized>(
    encoder: &E,
    request: &QrRequest,
    text: &str,
    input_length: usize,
    warnings: &mut Vec<String>,
) -> Result<Symbol> {
    let ceiling = request.size.max_version;
    match encoder.encode(text, request.level, ceiling) {
        Ok(symbol) => Ok(symbol),
        Err(EncodeFault::CapacityOverflow) if ceiling.unwrap_or(MAX_VERSION) >= MAX_VERSION => {
            Err(QrGenError::EncodeFailed(EncodeFault::CapacityOverflow.to_string()))
        }
        Err(EncodeFault::CapacityOverflow) => {
            warn!(
                input_length,
                tier = %request.size.id,
                level = %request.level,
                "data overflows tier, retrying with automatic version"
            );
            warnings.push(format!(
                "Warning: the data ({input_length} characters) may not fit the selected size. \
                 Choosing a larger size is recommended."
            ));
            encoder
                .encode(text, request.level, None)
                .map_err(|e| QrGenError::EncodeFailed(e.to_string()))
        }
        Err(EncodeFault::Encoder(msg)) => Err(QrGenError::EncodeFailed(msg)),
    }
}
