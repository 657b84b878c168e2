// Command-line runner for the `img_glitch` library.
//
//     img_glitch [--seed N] [--tile WxH] [--no-clear] <input> <output> [STEP...]
//
// Loads <input>, runs each STEP in order (or a default recipe when none are given)
// and writes the output raster to <output> (`-` streams PNG to stdout). Any failure
// aborts the run with a non-zero exit code.

use std::process::ExitCode;

use anyhow::{Context, bail};
use log::info;

use img_glitch::config::{GlitchConfig, parse_seed, parse_tile};
use img_glitch::script::{self, Step};
use img_glitch::GlitchSession;

const USAGE: &str = "\
Usage: img_glitch [OPTIONS] <input> <output> [STEP...]

<output> may be '-' to write PNG to stdout.

Options:
  --seed N         Seed for corrupt steps without their own seed
  --tile WxH       Default tile size for corrupt steps (or a single N for NxN)
  --no-clear       Do not wipe the output raster when loading the input
  --help           Show this help message

Steps:
  load:PATH[,clear]      Load another input (output is kept unless 'clear')
  pull:X,Y,W,H[,cut]     Pull a chunk; 'cut' zeroes it in the input
  flip:h|v|hv|none       Flip the chunk
  corrupt[:W,H[,SEED]]   Shuffle the chunk's WxH tiles ('_,_' for the default size)
  paste:TX,TY,MODE       Paste at the chunk's origin shifted by (TX, TY)
                         MODE is or, xor, and, average or overwrite

Environment: GLITCH_SEED, GLITCH_TILE, GLITCH_CLEAR, RUST_LOG";

struct Args {
    config: GlitchConfig,
    input: String,
    output: String,
    steps: Vec<String>,
}

/// Returns `None` when help was requested.
fn parse_args(mut config: GlitchConfig, raw: Vec<String>) -> anyhow::Result<Option<Args>> {
    let mut positional = Vec::new();
    let mut iter = raw.into_iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--help" | "-h" => return Ok(None),
            "--no-clear" => config.clear_output = false,
            "--seed" => {
                let value = iter.next().context("--seed needs a value")?;
                config.seed = Some(parse_seed(&value)?);
            }
            "--tile" => {
                let value = iter.next().context("--tile needs a value")?;
                (config.tile_width, config.tile_height) = parse_tile(&value)?;
            }
            flag if flag.starts_with("--") => bail!("unknown option '{}'", flag),
            other => positional.push(other.to_string()),
        }
    }

    if positional.len() < 2 {
        bail!("expected an input and an output path\n\n{}", USAGE);
    }
    let steps = positional.split_off(2);
    let output = positional.pop().unwrap_or_default();
    let input = positional.pop().unwrap_or_default();

    Ok(Some(Args {
        config,
        input,
        output,
        steps,
    }))
}

fn run(args: Args) -> anyhow::Result<()> {
    // Parse the whole script before touching any file.
    let steps: Vec<Step> = if args.steps.is_empty() {
        script::default_recipe()
    } else {
        script::parse_steps(&args.steps)?
    };

    let mut session = GlitchSession::new();
    session
        .load_input(&args.input, args.config.clear_output)
        .with_context(|| format!("failed to load input '{}'", args.input))?;

    for (index, step) in steps.iter().enumerate() {
        step.run(&mut session, &args.config)
            .with_context(|| format!("step {} ({}) failed", index + 1, step))?;
    }

    if args.output == "-" {
        session
            .write_output_png(std::io::stdout().lock())
            .context("failed to write output to stdout")?;
    } else {
        session
            .save_output(&args.output)
            .with_context(|| format!("failed to save output '{}'", args.output))?;
    }
    info!("Applied {} steps", steps.len());
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let outcome = GlitchConfig::from_env()
        .context("invalid GLITCH_* environment")
        .and_then(|config| parse_args(config, std::env::args().skip(1).collect()));

    let args = match outcome {
        Ok(Some(args)) => args,
        Ok(None) => {
            println!("{}", USAGE);
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            eprintln!("error: {:#}", err);
            return ExitCode::FAILURE;
        }
    };

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
