// THEORY:
// Runtime knobs for a glitch run. Defaults are baked in, the environment may
// override them, and command-line flags override the environment. Values that are
// present but unparseable are reported rather than silently ignored.

use crate::error::{GlitchError, Result};

pub const SEED_VAR: &str = "GLITCH_SEED";
pub const TILE_VAR: &str = "GLITCH_TILE";
pub const CLEAR_VAR: &str = "GLITCH_CLEAR";

const DEFAULT_TILE_SIZE: u32 = 8;

/// Configuration for a glitch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlitchConfig {
    /// Wipe the output raster to zero when the first input is loaded.
    pub clear_output: bool,
    /// Seed for `corrupt` steps that do not carry their own.
    pub seed: Option<u64>,
    /// Tile size for `corrupt` steps that do not carry their own.
    pub tile_width: u32,
    pub tile_height: u32,
}

impl Default for GlitchConfig {
    fn default() -> Self {
        Self {
            clear_output: true,
            seed: None,
            tile_width: DEFAULT_TILE_SIZE,
            tile_height: DEFAULT_TILE_SIZE,
        }
    }
}

impl GlitchConfig {
    /// Defaults overlaid with the `GLITCH_*` process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(value) = lookup(SEED_VAR) {
            config.seed = Some(parse_seed(&value)?);
        }
        if let Some(value) = lookup(TILE_VAR) {
            (config.tile_width, config.tile_height) = parse_tile(&value)?;
        }
        if let Some(value) = lookup(CLEAR_VAR) {
            config.clear_output = parse_flag(CLEAR_VAR, &value)?;
        }

        Ok(config)
    }
}

fn invalid(name: &str, value: &str) -> GlitchError {
    GlitchError::Config {
        name: name.to_string(),
        value: value.to_string(),
    }
}

pub fn parse_seed(value: &str) -> Result<u64> {
    value.trim().parse().map_err(|_| invalid("seed", value))
}

/// Parses `WxH`, or a single `N` meaning `NxN`.
pub fn parse_tile(value: &str) -> Result<(u32, u32)> {
    let trimmed = value.trim();
    let parse = |part: &str| part.trim().parse::<u32>().map_err(|_| invalid("tile size", value));

    let (width, height) = match trimmed.split_once(['x', 'X']) {
        Some((w, h)) => (parse(w)?, parse(h)?),
        None => {
            let side = parse(trimmed)?;
            (side, side)
        }
    };

    if width == 0 || height == 0 {
        return Err(GlitchError::InvalidTile { width, height });
    }
    Ok((width, height))
}

fn parse_flag(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(invalid(name, value)),
    }
}
