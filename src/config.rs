// Copyright (c) 2026 rezky_nightky

use std::io::IsTerminal;
use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;

use atmos::WeatherMode;

pub const DEFAULT_PARAMS_USAGE: &str = "DEFAULT PARAMS USAGE:\n  atmos --weather rain --map-size 64,64 --view 16,16 --fps 30 --speed 1 --color-bg black";

pub fn color_enabled_stdout() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if matches!(std::env::var("CLICOLOR").ok().as_deref(), Some("0")) {
        return false;
    }
    std::io::stdout().is_terminal()
}

fn colorize_help_detail(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 64);
    for chunk in text.split_inclusive('\n') {
        let (line, nl) = chunk
            .strip_suffix('\n')
            .map(|l| (l, "\n"))
            .unwrap_or((chunk, ""));

        let is_heading =
            !line.starts_with(' ') && line.ends_with(':') && line == line.to_ascii_uppercase();

        if is_heading {
            out.push_str("\x1b[1;36m");
            out.push_str(line);
            out.push_str("\x1b[0m");
        } else if let Some(rest) = line.strip_prefix("      Example:") {
            out.push_str("      \x1b[32mExample:\x1b[0m");
            out.push_str(rest);
        } else if let Some(rest) = line.strip_prefix("  atmos") {
            out.push_str("  \x1b[1;34matmos\x1b[0m");
            out.push_str(rest);
        } else if let Some(rest) = line.strip_prefix("  -") {
            out.push_str("  \x1b[33m-");
            out.push_str(rest);
            out.push_str("\x1b[0m");
        } else {
            out.push_str(line);
        }
        out.push_str(nl);
    }
    out
}

pub fn default_params_usage_for_help() -> String {
    if color_enabled_stdout() {
        colorize_help_detail(DEFAULT_PARAMS_USAGE)
    } else {
        DEFAULT_PARAMS_USAGE.to_string()
    }
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorBg {
    #[value(name = "black")]
    Black,
    #[value(name = "default-background")]
    DefaultBackground,
    #[value(name = "transparent")]
    Transparent,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileDims {
    pub width: u16,
    pub height: u16,
}

impl FromStr for TileDims {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (a, b) = s
            .split_once(',')
            .ok_or_else(|| "expected: WIDTH,HEIGHT".to_string())?;
        let width: u16 = a
            .trim()
            .parse()
            .map_err(|_| "invalid width".to_string())?;
        let height: u16 = b
            .trim()
            .parse()
            .map_err(|_| "invalid height".to_string())?;
        if width == 0 || height == 0 {
            return Err("width and height must be >0".to_string());
        }
        Ok(Self { width, height })
    }
}

#[derive(Parser, Debug, Clone)]
#[command(name = "atmos", version, disable_version_flag = true)]
pub struct Args {
    #[arg(
        short = 'w',
        long = "weather",
        default_value = "rain",
        help_heading = "WEATHER",
        help = "Initial weather (none, rain, snow)"
    )]
    pub weather: WeatherMode,

    #[arg(
        short = 'c',
        long = "capacity",
        help_heading = "WEATHER",
        help = "Particle pool size (min 2 max 65536). Default: map width * height"
    )]
    pub capacity: Option<usize>,

    #[arg(
        long = "seed",
        help_heading = "WEATHER",
        help = "Random seed for reproducible weather"
    )]
    pub seed: Option<u64>,

    #[arg(
        short = 'm',
        long = "map-size",
        default_value = "64,64",
        help_heading = "WORLD",
        help = "Map size in tiles: WIDTH,HEIGHT (min 4 max 256 each)"
    )]
    pub map_size: TileDims,

    #[arg(
        long = "view",
        default_value = "16,16",
        help_heading = "WORLD",
        help = "Visible tile window: WIDTH,HEIGHT (min 2 max 64 each)"
    )]
    pub view: TileDims,

    #[arg(
        long = "sight",
        default_value_t = 10,
        help_heading = "WORLD",
        help = "Observer line of sight in tiles (min 1 max 256)"
    )]
    pub sight: u16,

    #[arg(
        short = 'f',
        long = "fps",
        default_value_t = 30.0,
        help_heading = "PERFORMANCE",
        help = "Target FPS (min 1 max 240)"
    )]
    pub fps: f64,

    #[arg(
        short = 'S',
        long = "speed",
        default_value_t = 1.0,
        help_heading = "PERFORMANCE",
        help = "Game speed multiplier (min 0.125 max 8)"
    )]
    pub speed: f64,

    #[arg(
        long = "duration",
        help_heading = "GENERAL",
        help = "Stop after N seconds (min 0.1 max 86400; <=0 disables)"
    )]
    pub duration: Option<f64>,

    #[arg(
        long = "perf-stats",
        help_heading = "PERFORMANCE",
        help = "Print performance statistics summary on exit"
    )]
    pub perf_stats: bool,

    #[arg(
        long = "log-file",
        help_heading = "GENERAL",
        help = "Write log output (RUST_LOG filter) to this file"
    )]
    pub log_file: Option<PathBuf>,

    #[arg(
        long = "color-bg",
        default_value_t = ColorBg::Black,
        value_enum,
        help_heading = "APPEARANCE",
        help = "Background mode (black, default-background, transparent)"
    )]
    pub color_bg: ColorBg,

    #[arg(
        long = "colormode",
        help_heading = "APPEARANCE",
        help = "Force color mode (allowed: 0,16,8/256,24/32). Default: 24-bit if supported (COLORTERM), else 8-bit"
    )]
    pub colormode: Option<u16>,

    #[arg(
        long = "check-bitcolor",
        help_heading = "HELP",
        help = "Print detected terminal color capability and exit"
    )]
    pub check_bitcolor: bool,

    #[arg(
        long = "help-detail",
        help_heading = "HELP",
        help = "Show detailed help for all parameters and exit"
    )]
    pub help_detail: bool,

    #[arg(
        long = "info",
        short = 'i',
        help_heading = "HELP",
        help = "Print version info and exit"
    )]
    pub info: bool,

    #[arg(
        long = "version",
        short = 'v',
        help_heading = "HELP",
        help = "Print version and exit"
    )]
    pub version: bool,
}

pub fn print_help_detail() {
    let block = format!(
        "{}\n\nUSAGE:\n  atmos [OPTIONS]\n\nWEATHER:\n  -w, --weather <none|rain|snow>\n      Initial weather; switch live with r, s and n.\n      Example: atmos --weather snow\n\n  -c, --capacity <number>\n      Particle pool size. One slot always stays free.\n      Example: atmos --capacity 2000\n\n  --seed <number>\n      Seed the particle generator for repeatable runs.\n      Example: atmos --seed 42\n\nWORLD:\n  -m, --map-size <w,h>\n      Map size in tiles.\n      Example: atmos --map-size 128,96\n\n  --view <w,h>\n      Tiles visible around the camera; particles wrap inside this window.\n      Example: atmos --view 20,20\n\n  --sight <tiles>\n      Observer line of sight; rain only splashes on water in sight.\n      Example: atmos --sight 6\n\nAPPEARANCE:\n  --colormode <0|16|8|24>\n      Force color mode; otherwise auto-detected from COLORTERM/TERM.\n      Example: atmos --colormode 24\n\n  --color-bg <black|default-background|transparent>\n      Background mode.\n      Example: atmos --color-bg transparent\n\nPERFORMANCE:\n  -f, --fps <number>\n      Target FPS (min 1 max 240).\n      Example: atmos --fps 60\n\n  -S, --speed <number>\n      Game speed multiplier (min 0.125 max 8).\n      Example: atmos --speed 2\n\n  --perf-stats\n      Print performance statistics summary on exit.\n      Example: atmos --duration 10 --perf-stats\n\nGENERAL:\n  --duration <seconds>\n      Stop after N seconds (min 0.1 max 86400).\n      Example: atmos --duration 10\n\n  --log-file <path>\n      Send log records to a file; filter with RUST_LOG.\n      Example: RUST_LOG=atmos=debug atmos --log-file atmos.log\n\nKEYS:\n  q, Esc     quit\n  p          pause\n  r, s, n    rain, snow, clear sky\n  arrows     pan the camera\n  [ ]        turn the camera\n  PgUp PgDn  tilt the camera\n  + -        game speed\n\nHELP:\n  --check-bitcolor\n      Print detected terminal color capability and exit.\n\n  --help\n      Show short help.\n\n  --help-detail\n      Show this detailed help.\n\n  -v, --version\n      Print version and exit.\n\n  -i, --info\n      Print version info and exit.\n",
        DEFAULT_PARAMS_USAGE
    );

    if color_enabled_stdout() {
        print!("{}", colorize_help_detail(&block));
    } else {
        print!("{}", block);
    }

    println!();
    println!("LIMITS / VALID RANGES:");
    println!("  --capacity <number>      min 2 max 65536");
    println!("  --map-size <w,h>         min 4 max 256 (each)");
    println!("  --view <w,h>             min 2 max 64 (each)");
    println!("  --sight <tiles>          min 1 max 256");
    println!("  --fps <number>           min 1 max 240");
    println!("  --speed <number>         min 0.125 max 8");
    println!("  --duration <seconds>     min 0.1 max 86400 (<=0 disables)");
    println!("  --colormode <0|16|8|24>  allowed values only (8==256, 24==32)");
}
