// THEORY:
// A glitch script is an ordered list of steps, each written as one command-line
// word: a step name, optionally followed by `:` and comma-separated arguments.
//
//     load:PATH[,clear]      pull:X,Y,W,H[,cut]      flip:h|v|hv|none
//     corrupt[:W,H[,SEED]]   paste:TX,TY,MODE
//
// In `corrupt`, `_,_` in place of the tile size selects the configured default, so
// a seed can be given on its own (`corrupt:_,_,7`). Every `Step` prints back in a
// form the parser accepts.
//
// The whole script is parsed before any image is touched, so a typo in the last
// step never leaves a half-written output behind. Execution then runs the steps in
// order against a `GlitchSession` and stops at the first failure.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::config::GlitchConfig;
use crate::core_modules::blend::BlendMode;
use crate::error::{GlitchError, Result};
use crate::session::GlitchSession;

/// One instruction of a glitch script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Load {
        path: PathBuf,
        clear: bool,
    },
    Pull {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        cut: bool,
    },
    Flip {
        horizontal: bool,
        vertical: bool,
    },
    /// Tile size and seed fall back to the run's `GlitchConfig` when absent.
    Corrupt {
        tile: Option<(u32, u32)>,
        seed: Option<u64>,
    },
    Paste {
        translate_x: u32,
        translate_y: u32,
        mode: BlendMode,
    },
}

impl Step {
    /// Runs this step against `session`.
    pub fn run(&self, session: &mut GlitchSession, config: &GlitchConfig) -> Result<()> {
        match self {
            Step::Load { path, clear } => session.load_input(path, *clear),
            Step::Pull {
                x,
                y,
                width,
                height,
                cut,
            } => session.pull_chunk(*x, *y, *width, *height, *cut),
            Step::Flip {
                horizontal,
                vertical,
            } => session.flip_chunk(*horizontal, *vertical),
            Step::Corrupt { tile, seed } => {
                let (tile_width, tile_height) =
                    tile.unwrap_or((config.tile_width, config.tile_height));
                session.corrupt_chunk(tile_width, tile_height, seed.or(config.seed))
            }
            Step::Paste {
                translate_x,
                translate_y,
                mode,
            } => session.paste_chunk(*translate_x, *translate_y, *mode),
        }
    }
}

fn number<T: FromStr>(field: &str, value: &str) -> std::result::Result<T, String> {
    value
        .trim()
        .parse()
        .map_err(|_| format!("{} must be a non-negative integer, got '{}'", field, value))
}

fn expect_args(name: &str, args: &[&str], allowed: &[usize]) -> std::result::Result<(), String> {
    if allowed.contains(&args.len()) {
        Ok(())
    } else {
        Err(format!(
            "'{}' takes {:?} arguments, got {}",
            name,
            allowed,
            args.len()
        ))
    }
}

impl FromStr for Step {
    type Err = String;

    fn from_str(text: &str) -> std::result::Result<Self, Self::Err> {
        let (name, rest) = match text.split_once(':') {
            Some((name, rest)) => (name, Some(rest)),
            None => (text, None),
        };
        let name = name.trim().to_lowercase();

        if name == "load" {
            let rest = rest.filter(|r| !r.is_empty()).ok_or("'load' needs a path")?;
            let (path, clear) = match rest.rsplit_once(',') {
                Some((path, flag)) if flag.trim().eq_ignore_ascii_case("clear") => (path, true),
                _ => (rest, false),
            };
            return Ok(Step::Load {
                path: PathBuf::from(path),
                clear,
            });
        }

        let args: Vec<&str> = rest
            .map(|r| r.split(',').map(str::trim).collect())
            .unwrap_or_default();

        match name.as_str() {
            "pull" => {
                expect_args("pull", &args, &[4, 5])?;
                let cut = match args.get(4) {
                    None => false,
                    Some(flag) if flag.eq_ignore_ascii_case("cut") => true,
                    Some(flag) => return Err(format!("unknown pull flag '{}'", flag)),
                };
                Ok(Step::Pull {
                    x: number("x", args[0])?,
                    y: number("y", args[1])?,
                    width: number("width", args[2])?,
                    height: number("height", args[3])?,
                    cut,
                })
            }
            "flip" => {
                expect_args("flip", &args, &[1])?;
                let (horizontal, vertical) = match args[0].to_lowercase().as_str() {
                    "h" => (true, false),
                    "v" => (false, true),
                    "hv" | "vh" => (true, true),
                    "none" => (false, false),
                    _ => {
                        return Err(format!(
                            "flip axes must be h, v, hv or none, got '{}'",
                            args[0]
                        ));
                    }
                };
                Ok(Step::Flip {
                    horizontal,
                    vertical,
                })
            }
            "corrupt" => {
                expect_args("corrupt", &args, &[0, 2, 3])?;
                let tile = match args.as_slice() {
                    ["_", "_", ..] => None,
                    [w, h, ..] => Some((number("tile width", w)?, number("tile height", h)?)),
                    _ => None,
                };
                let seed = args.get(2).map(|s| number("seed", s)).transpose()?;
                Ok(Step::Corrupt { tile, seed })
            }
            "paste" => {
                expect_args("paste", &args, &[3])?;
                Ok(Step::Paste {
                    translate_x: number("translate x", args[0])?,
                    translate_y: number("translate y", args[1])?,
                    mode: args[2].parse()?,
                })
            }
            other => Err(format!("unknown step '{}'", other)),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Load { path, clear } => {
                write!(f, "load:{}{}", path.display(), if *clear { ",clear" } else { "" })
            }
            Step::Pull {
                x,
                y,
                width,
                height,
                cut,
            } => write!(
                f,
                "pull:{},{},{},{}{}",
                x,
                y,
                width,
                height,
                if *cut { ",cut" } else { "" }
            ),
            Step::Flip {
                horizontal,
                vertical,
            } => match (*horizontal, *vertical) {
                (true, true) => f.write_str("flip:hv"),
                (true, false) => f.write_str("flip:h"),
                (false, true) => f.write_str("flip:v"),
                (false, false) => f.write_str("flip:none"),
            },
            Step::Corrupt { tile, seed } => {
                f.write_str("corrupt")?;
                match (tile, seed) {
                    (None, None) => Ok(()),
                    (Some((w, h)), None) => write!(f, ":{},{}", w, h),
                    (Some((w, h)), Some(seed)) => write!(f, ":{},{},{}", w, h, seed),
                    (None, Some(seed)) => write!(f, ":_,_,{}", seed),
                }
            }
            Step::Paste {
                translate_x,
                translate_y,
                mode,
            } => write!(f, "paste:{},{},{}", translate_x, translate_y, mode),
        }
    }
}

/// Parses every word of a script, numbering steps from 1 in errors.
pub fn parse_steps<S: AsRef<str>>(words: &[S]) -> Result<Vec<Step>> {
    words
        .iter()
        .enumerate()
        .map(|(index, word)| {
            word.as_ref()
                .parse::<Step>()
                .map_err(|message| GlitchError::Script {
                    position: index + 1,
                    message,
                })
        })
        .collect()
}

/// The recipe used when a run names no steps: a 100x100 block from the top-left
/// corner, OR-ed back in place and again 100 pixels to the right.
pub fn default_recipe() -> Vec<Step> {
    vec![
        Step::Pull {
            x: 0,
            y: 0,
            width: 100,
            height: 100,
            cut: false,
        },
        Step::Paste {
            translate_x: 0,
            translate_y: 0,
            mode: BlendMode::Or,
        },
        Step::Paste {
            translate_x: 100,
            translate_y: 0,
            mode: BlendMode::Or,
        },
    ]
}
