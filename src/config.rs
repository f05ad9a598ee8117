use tracing::warn;

use crate::profile::{self, MAX_VERSION};
use crate::types::{ColorValue, GeneratorConfig};

/// Command-line values that win over the config file.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigOverrides {
    pub normalize_input: Option<bool>,
    pub max_input_length: Option<usize>,
}

/// Read a TOML config, falling back to defaults when the file is missing or
/// malformed.
pub fn load_config(config_path: Option<&str>, overrides: ConfigOverrides) -> GeneratorConfig {
    let config = 'load: {
        let Some(path) = config_path else { break 'load GeneratorConfig::default() };
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                warn!(path, error = %e, "failed to read config, using defaults");
                break 'load GeneratorConfig::default();
            }
        };
        match toml::from_str(&contents) {
            Ok(c) => c,
            Err(e) => {
                warn!(path, error = %e, "failed to parse config, using defaults");
                GeneratorConfig::default()
            }
        }
    };

    let mut config = sanitize(config);
    if let Some(normalize) = overrides.normalize_input {
        config.normalize_input = normalize;
    }
    if let Some(limit) = overrides.max_input_length {
        config.max_input_length = Some(limit);
    }
    config
}

/// Drop palette entries that are not `#RRGGBB` and reject unusable size
/// catalogs. Version ceilings outside `1..=40` are cleared.
pub fn sanitize(mut config: GeneratorConfig) -> GeneratorConfig {
    config.color_palette.retain(|entry| {
        let valid = ColorValue::parse(entry).is_some();
        if !valid {
            warn!(color = %entry, "ignoring invalid palette color");
        }
        valid
    });

    if config.size_options.is_empty() || config.size_options.iter().any(|p| p.box_size == 0) {
        warn!("size catalog is empty or has a zero box size, using built-in tiers");
        config.size_options = profile::builtin().to_vec();
    }

    for tier in &mut config.size_options {
        if let Some(version) = tier.max_version.filter(|v| !(1..=MAX_VERSION).contains(v)) {
            warn!(tier = %tier.id, max_version = version, "ignoring out-of-range max_version");
            tier.max_version = None;
        }
    }
    config
}
