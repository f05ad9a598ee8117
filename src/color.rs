use crate::types::ColorValue;

pub const DEFAULT_PALETTE: [&str; 16] = [
    "#000000", "#6c63ff", "#ff6584", "#36d1dc", "#ff9966", "#59c173", "#a17fe0", "#4a00e0",
    "#ff416c", "#5d26c1", "#00b09b", "#FF5733", "#33FF57", "#3357FF", "#FF33F6", "#F0FF33",
];

pub const DARK_BACKGROUND: &str = "#121212";
pub const LIGHT_BACKGROUND: &str = "#ffffff";
pub const OFF_WHITE_BACKGROUND: &str = "#f8f9fa";

const BRIGHTNESS_THRESHOLD: u32 = 128;

/// Validate against the built-in palette.
pub fn validate(raw: &str) -> ColorValue {
    validate_with_palette(raw, &DEFAULT_PALETTE)
}

/// Normalize `raw` to `#RRGGBB`. Never fails: anything unusable becomes black.
pub fn validate_with_palette<I>(raw: &str, palette: I) -> ColorValue
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let color = raw.trim();
    if color.is_empty() {
        return ColorValue::black();
    }

    if let Some(full) = ColorValue::parse(color) {
        return full;
    }
    if let Some(expanded) = expand_shorthand(color) {
        return expanded;
    }

    // Palette entries are only usable if they already satisfy the invariant.
    palette
        .into_iter()
        .find(|entry| AsRef::<str>::as_ref(entry) == color)
        .and_then(|entry| ColorValue::parse(entry.as_ref()))
        .unwrap_or_default()
}

fn expand_shorthand(color: &str) -> Option<ColorValue> {
    let digits = color.strip_prefix('#')?;
    if digits.len() != 3 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let doubled: String = digits.chars().flat_map(|c| [c, c]).collect();
    ColorValue::parse(&format!("#{doubled}"))
}

/// BT.601 luma in integer arithmetic, 0..=255.
pub fn brightness(color: &ColorValue) -> u32 {
    let [r, g, b] = color.rgb().map(u32::from);
    (299 * r + 587 * g + 114 * b) / 1000
}

/// Pick a background that keeps `fg` readable.
pub fn pick_background(fg: &ColorValue) -> ColorValue {
    let background = match fg.rgb() {
        [0, 0, 0] => DARK_BACKGROUND,
        [255, 255, 255] => OFF_WHITE_BACKGROUND,
        _ if brightness(fg) > BRIGHTNESS_THRESHOLD => DARK_BACKGROUND,
        _ => LIGHT_BACKGROUND,
    };
    ColorValue::parse(background).unwrap_or_default()
}

/// Same as [`pick_background`] for unvalidated input; undecodable input gets
/// the light background.
pub fn pick_background_str(fg: &str) -> ColorValue {
    match ColorValue::parse(fg.trim()) {
        Some(color) => pick_background(&color),
        None => ColorValue::parse(LIGHT_BACKGROUND).unwrap_or_default(),
    }
}
