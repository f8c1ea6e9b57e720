// Copyright (c) 2026 rezky_nightky

mod cell;
mod config;
mod error;
mod frame;
mod palette;
mod runtime;
mod screen;
mod terminal;
mod world;

use std::env;
use std::time::{Duration, Instant};

#[cfg(unix)]
use std::thread;

use clap::builder::styling::{AnsiColor as ClapAnsiColor, Color as ClapColor};
use clap::builder::styling::{Effects as ClapEffects, Style as ClapStyle};
use clap::builder::Styles as ClapStyles;
use clap::{CommandFactory, FromArgMatches};
use crossterm::event::{Event, KeyEventKind};
use glam::Vec3;

#[cfg(unix)]
use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM};
#[cfg(unix)]
use signal_hook::iterator::Signals;

use atmos::params::MAX_ATMOS_PARTICLES;
use atmos::{AtmosParams, Atmosphere, BillboardAssets, GameClock, TerrainMap, TickReport};

use crate::config::{color_enabled_stdout, default_params_usage_for_help, print_help_detail, Args, ColorBg};
use crate::error::DemoError;
use crate::frame::Frame;
use crate::palette::build_palette;
use crate::runtime::{key_action, ColorMode, KeyAction};
use crate::screen::{paint_hud, paint_terrain, Billboards, HudStats, Splashes};
use crate::terminal::{restore_terminal_best_effort, Terminal};
use crate::world::{DemoCamera, DemoClock, DemoMap};

const HELP_TEMPLATE_PLAIN: &str = "\
{before-help}{about-with-newline}
USAGE:
  {usage}

{all-args}{after-help}";

const HELP_TEMPLATE_COLOR: &str = "\
{before-help}{about-with-newline}
\x1b[1;36mUSAGE:\x1b[0m
  {usage}

{all-args}{after-help}";

fn build_info() -> &'static str {
    env!("ATMOS_BUILD")
}

fn git_sha() -> &'static str {
    env!("ATMOS_GIT_SHA")
}

fn clap_styles() -> ClapStyles {
    ClapStyles::styled()
        .header(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Cyan))),
        )
        .usage(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Green))),
        )
        .literal(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Yellow))))
        .placeholder(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Magenta))))
}

fn require_f64_range(name: &'static str, v: f64, min: f64, max: f64) -> Result<f64, DemoError> {
    if !v.is_finite() {
        return Err(DemoError::invalid(name, v, "must be a finite number"));
    }
    if v < min || v > max {
        return Err(DemoError::invalid(name, v, format!("min {} max {}", min, max)));
    }
    Ok(v)
}

fn require_u16_range(name: &'static str, v: u16, min: u16, max: u16) -> Result<u16, DemoError> {
    if v < min || v > max {
        return Err(DemoError::invalid(name, v, format!("min {} max {}", min, max)));
    }
    Ok(v)
}

fn require_usize_range(name: &'static str, v: usize, min: usize, max: usize) -> Result<usize, DemoError> {
    if v < min || v > max {
        return Err(DemoError::invalid(name, v, format!("min {} max {}", min, max)));
    }
    Ok(v)
}

fn detect_color_mode_auto() -> ColorMode {
    let colorterm = env::var("COLORTERM")
        .unwrap_or_default()
        .to_ascii_lowercase();
    if colorterm.contains("truecolor") || colorterm.contains("24bit") {
        return ColorMode::TrueColor;
    }

    let term = env::var("TERM").unwrap_or_default().to_ascii_lowercase();
    if term == "dumb" {
        return ColorMode::Mono;
    }
    if term.contains("256color") {
        return ColorMode::Color256;
    }

    ColorMode::Color256
}

fn detect_color_mode(args: &Args) -> Result<ColorMode, DemoError> {
    match args.colormode {
        None => Ok(detect_color_mode_auto()),
        Some(0) => Ok(ColorMode::Mono),
        Some(16) => Ok(ColorMode::Color16),
        Some(8) | Some(256) => Ok(ColorMode::Color256),
        Some(24) | Some(32) => Ok(ColorMode::TrueColor),
        Some(m) => Err(DemoError::invalid("--colormode", m, "allowed: 0,16,8,24")),
    }
}

fn color_mode_label(m: ColorMode) -> &'static str {
    match m {
        ColorMode::TrueColor => "24-bit truecolor",
        ColorMode::Color256 => "8-bit (256-color)",
        ColorMode::Mono => "mono",
        ColorMode::Color16 => "16-color",
    }
}

fn init_logging(args: &Args) -> Result<(), DemoError> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(path) = &args.log_file {
        let file = std::fs::File::create(path).map_err(|source| DemoError::LogFile {
            path: path.clone(),
            source,
        })?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    if builder.try_init().is_err() {
        eprintln!("logger already initialised");
    }
    Ok(())
}

#[derive(Default)]
struct PerfStats {
    frames: u64,
    work_sum_s: f64,
    work_max_s: f32,
    overshoot_frames: u64,
    drawn_sum: u64,
    ticks: TickReport,
}

impl PerfStats {
    fn record(&mut self, work_s: f32, overshoot: bool, drawn: usize, report: TickReport) {
        self.frames = self.frames.saturating_add(1);
        self.work_sum_s += work_s as f64;
        self.work_max_s = self.work_max_s.max(work_s);
        if overshoot {
            self.overshoot_frames = self.overshoot_frames.saturating_add(1);
        }
        self.drawn_sum = self.drawn_sum.saturating_add(drawn as u64);
        self.ticks.spawned += report.spawned;
        self.ticks.dropped += report.dropped;
        self.ticks.landed += report.landed;
        self.ticks.left_world += report.left_world;
    }

    fn print(&self, elapsed: Duration, target_fps: f64) {
        let elapsed_s = elapsed.as_secs_f64().max(0.000_001);
        let frames = self.frames.max(1);

        println!("PERF STATS:");
        println!("  elapsed_s: {:.3}", elapsed_s);
        println!("  target_fps: {:.3}", target_fps);
        println!("  avg_fps: {:.3}", self.frames as f64 / elapsed_s);
        println!("  frames: {}", self.frames);
        println!(
            "  avg_work_ms: {:.3}",
            (self.work_sum_s / frames as f64) * 1000.0
        );
        println!("  max_work_ms: {:.3}", self.work_max_s as f64 * 1000.0);
        println!(
            "  overshoot_frames: {} ({:.1}%)",
            self.overshoot_frames,
            self.overshoot_frames as f64 / frames as f64 * 100.0
        );
        println!(
            "  avg_particles_drawn: {:.1}",
            self.drawn_sum as f64 / frames as f64
        );
        println!("  spawned: {}", self.ticks.spawned);
        println!("  dropped_full_pool: {}", self.ticks.dropped);
        println!("  landed: {}", self.ticks.landed);
        println!("  left_world: {}", self.ticks.left_world);
    }
}

fn run(args: &Args) -> Result<(), DemoError> {
    let color_mode = detect_color_mode(args)?;
    let target_fps = require_f64_range("--fps", args.fps, 1.0, 240.0)?;
    let speed = require_f64_range("--speed", args.speed, 0.125, 8.0)?;
    let duration_s = match args.duration {
        Some(s) if !s.is_finite() => {
            return Err(DemoError::invalid("--duration", s, "must be a finite number"));
        }
        Some(s) if s > 0.0 => Some(require_f64_range("--duration", s, 0.1, 86400.0)?),
        _ => None,
    };
    let map_w = require_u16_range("--map-size width", args.map_size.width, 4, 256)?;
    let map_h = require_u16_range("--map-size height", args.map_size.height, 4, 256)?;
    let view_w = require_u16_range("--view width", args.view.width, 2, 64)?;
    let view_h = require_u16_range("--view height", args.view.height, 2, 64)?;
    let sight = require_u16_range("--sight", args.sight, 1, 256)?;
    let capacity = match args.capacity {
        Some(c) => require_usize_range("--capacity", c, 2, MAX_ATMOS_PARTICLES)?,
        None => map_w as usize * map_h as usize,
    };

    let mut params = AtmosParams {
        capacity,
        ..AtmosParams::default()
    };
    if let Some(seed) = args.seed {
        params.seed = seed;
    }
    let tile_units = params.tile_units;

    let assets = BillboardAssets::default();
    let mut atmos = Atmosphere::new(params)?.with_assets(assets);
    atmos.set_weather_mode(args.weather);

    let mut map = DemoMap::new(map_w as i32, map_h as i32, tile_units, sight as i32);
    let max_x = (map_w as i32 * tile_units) as f32;
    let max_z = (map_h as i32 * tile_units) as f32;
    let mut camera = DemoCamera::new(
        Vec3::new(max_x * 0.5, 0.0, max_z * 0.5),
        (view_w as u32, view_h as u32),
        tile_units,
    );
    let mut clock = DemoClock::new(speed, Duration::from_millis(250));
    let mut splashes = Splashes::default();
    let palette = build_palette(
        color_mode,
        matches!(
            args.color_bg,
            ColorBg::DefaultBackground | ColorBg::Transparent
        ),
    );

    log::info!(
        "atmos demo: map {}x{} tiles, view {}x{}, capacity {}, weather {}, colors {}",
        map_w,
        map_h,
        view_w,
        view_h,
        capacity,
        args.weather,
        color_mode_label(color_mode)
    );

    let mut term = Terminal::new()?;
    let (w, h) = term.size()?;
    camera.resize(w, h);
    let mut frame = Frame::new(w, h, palette.bg);

    let start_time = Instant::now();
    let end_time = duration_s.map(|s| start_time + Duration::from_secs_f64(s));

    let target_period = Duration::from_secs_f64(1.0 / target_fps);
    let target_period_s = target_period.as_secs_f32().max(0.000_001);
    let mut next_frame = Instant::now();
    let mut fps_est = target_fps as f32;
    let mut last_frame = Instant::now();
    let mut perf = PerfStats::default();
    let mut running = true;

    while running {
        if end_time.is_some_and(|end| Instant::now() >= end) {
            break;
        }
        let mut pending_resize: Option<(u16, u16)> = None;

        loop {
            while Terminal::poll_event(Duration::from_millis(0))? {
                match Terminal::read_event()? {
                    Event::Resize(nw, nh) => {
                        pending_resize = Some((nw, nh));
                    }
                    Event::Key(k) if k.kind == KeyEventKind::Press => {
                        let tu = tile_units as f32;
                        match key_action(k.code, k.modifiers) {
                            Some(KeyAction::Quit) => running = false,
                            Some(KeyAction::TogglePause) => clock.toggle_pause(),
                            Some(KeyAction::Weather(mode)) => atmos.set_weather_mode(mode),
                            Some(KeyAction::Pan(dx, dz)) => {
                                camera.pan(dx * tu, dz * tu, max_x, max_z)
                            }
                            Some(KeyAction::Turn(d)) => camera.turn(d),
                            Some(KeyAction::Tilt(d)) => camera.tilt(d),
                            Some(KeyAction::Faster) => clock.faster(),
                            Some(KeyAction::Slower) => clock.slower(),
                            None => {}
                        }
                    }
                    _ => {}
                }
            }

            if !running || pending_resize.is_some() {
                break;
            }

            let now = Instant::now();
            if now >= next_frame {
                break;
            }

            let mut timeout = next_frame - now;
            if let Some(end) = end_time {
                if now >= end {
                    break;
                }
                timeout = timeout.min(end - now);
            }
            let _ = Terminal::poll_event(timeout)?;
        }

        if !running {
            break;
        }

        if let Some((nw, nh)) = pending_resize {
            log::debug!("terminal resized to {}x{}", nw, nh);
            camera.resize(nw, nh);
            frame = Frame::new(nw, nh, palette.bg);
        }

        let work_start = Instant::now();
        let dt = work_start.saturating_duration_since(last_frame).as_secs_f32();
        last_frame = work_start;
        if dt > 0.0 {
            fps_est = fps_est * 0.9 + (1.0 / dt) * 0.1;
        }

        clock.tick(work_start);
        let (tx, tz) = (camera.target.x as i32, camera.target.z as i32);
        camera.target.y = map.ground_height(tx, tz) as f32;
        camera.refresh();
        map.set_observer(tx.div_euclid(tile_units), tz.div_euclid(tile_units));

        splashes.age(clock.frame_seconds());
        let report = atmos.update(&clock, &map, &camera, &mut splashes);
        if report.dropped > 0 {
            log::trace!("{:?}", report);
        }

        frame.clear_with_bg(palette.bg);
        paint_terrain(&mut frame, &map, &camera, &palette);
        let view = camera.view();
        let perspective_view = camera.perspective_view();
        let drawn = {
            let mut out = Billboards::new(&mut frame, &camera, &palette, assets);
            atmos.draw(&camera, &view, &perspective_view, &mut out)
        };
        splashes.paint(&mut frame, &camera, &palette);
        paint_hud(
            &mut frame,
            &palette,
            &HudStats {
                mode: atmos.weather_mode(),
                active: atmos.active_count(),
                capacity: atmos.capacity(),
                splashes: splashes.len(),
                speed: clock.game_speed(),
                paused: clock.is_paused(),
                fps: fps_est,
            },
        );
        term.draw(&frame)?;

        let work_s = work_start.elapsed().as_secs_f32();
        if args.perf_stats {
            perf.record(work_s, work_s > target_period_s, drawn, report);
        }

        next_frame += target_period;
        let now = Instant::now();
        if now > next_frame {
            next_frame = now;
        }
    }

    drop(term);
    if args.perf_stats {
        perf.print(start_time.elapsed(), target_fps);
    }
    Ok(())
}

fn main() {
    std::panic::set_hook(Box::new(|info| {
        restore_terminal_best_effort();
        eprintln!("{}", info);
    }));

    #[cfg(unix)]
    {
        if let Ok(mut signals) = Signals::new([SIGINT, SIGTERM, SIGHUP]) {
            thread::spawn(move || {
                if let Some(sig) = signals.forever().next() {
                    restore_terminal_best_effort();
                    std::process::exit(128 + sig);
                }
            });
        }
    }

    #[cfg(windows)]
    {
        if let Err(e) = ctrlc::set_handler(|| {
            restore_terminal_best_effort();
            std::process::exit(130);
        }) {
            eprintln!("failed to install Ctrl-C handler: {}", e);
        }
    }

    let mut cmd = Args::command();
    cmd = cmd.styles(clap_styles());
    cmd = cmd.before_help(default_params_usage_for_help());
    let help_template = if color_enabled_stdout() {
        HELP_TEMPLATE_COLOR
    } else {
        HELP_TEMPLATE_PLAIN
    };
    cmd = cmd.help_template(help_template);
    cmd.build();

    if cmd.get_arguments().any(|a| a.get_id().as_str() == "help") {
        cmd = cmd.mut_arg("help", |a| a.help_heading("HELP"));
    }
    cmd.build();

    let matches = cmd.get_matches();
    let args = Args::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    if args.help_detail {
        print_help_detail();
        return;
    }

    if args.check_bitcolor {
        let colorterm = env::var("COLORTERM").unwrap_or_default();
        let term = env::var("TERM").unwrap_or_default();
        println!("BITCOLOR CHECK:");
        println!(
            "  COLORTERM: {}",
            if colorterm.is_empty() {
                "(unset)"
            } else {
                &colorterm
            }
        );
        println!(
            "  TERM: {}",
            if term.is_empty() { "(unset)" } else { &term }
        );
        println!(
            "  auto_detected: {}",
            color_mode_label(detect_color_mode_auto())
        );
        match detect_color_mode(&args) {
            Ok(m) => println!("  effective: {}", color_mode_label(m)),
            Err(e) => println!("  effective: {}", e),
        }
        return;
    }

    if args.version {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        return;
    }

    if args.info {
        println!("Version: v{}", env!("CARGO_PKG_VERSION"));
        println!("Build: {}", build_info());
        if !git_sha().is_empty() {
            println!("Commit: {}", git_sha());
        }
        println!("Copyright: (c) 2026 {}", env!("CARGO_PKG_AUTHORS"));
        println!("License: {}", env!("CARGO_PKG_LICENSE"));
        return;
    }

    let res = init_logging(&args).and_then(|()| run(&args));
    if let Err(e) = res {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
