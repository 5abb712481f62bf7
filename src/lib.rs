use std::fs::File;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::{Arg, ArgMatches, Command};
use simplelog::{Config, LevelFilter, WriteLogger};

pub mod core;
pub mod game;
pub mod pipeline;
pub mod util;

pub use crate::core::{Body, CameraFrame, Color, Scene, ShipPose, ViewBank, ViewId};
pub use crate::game::GameState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayTarget {
    Terminal,
    Window,
}

/// Everything the binary needs from the command line.
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    pub target: DisplayTarget,
    pub assets: PathBuf,
    pub seed: Option<u64>,
}

pub fn create_clap_command() -> Command {
    Command::new("planetfall")
        .about("Space-flight arcade demo: fly to the planet, dodge the rocks")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("mode")
                .short('m')
                .long("mode")
                .value_name("MODE")
                .help("Display target ('terminal', 'window', 't', or 'w')")
                .value_parser(["terminal", "window", "t", "w"]),
        )
        .arg(
            Arg::new("assets")
                .short('a')
                .long("assets")
                .value_name("DIR")
                .help("Directory holding ship.obj, planet.obj and asteroid.obj"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .value_name("N")
                .help("Seed the level generator for a reproducible layout")
                .value_parser(clap::value_parser!(u64)),
        )
}

pub fn handle_clap_matches(matches: &ArgMatches) -> LaunchOptions {
    let target = match matches.get_one::<String>("mode").map(String::as_str) {
        Some("window") | Some("w") => DisplayTarget::Window,
        _ => DisplayTarget::Terminal,
    };
    let assets = matches
        .get_one::<String>("assets")
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            PathBuf::from(env!("CARGO_MANIFEST_DIR"))
                .join("assets")
                .join("models")
        });
    LaunchOptions {
        target,
        assets,
        seed: matches.get_one::<u64>("seed").copied(),
    }
}

/// Log to a file so terminal-mode rendering keeps stdout to itself.
pub fn init_logging() -> std::io::Result<()> {
    let log_file = File::create("planetfall.log")?;
    WriteLogger::init(LevelFilter::Debug, Config::default(), log_file)
        .map_err(std::io::Error::other)?;
    Ok(())
}

/// Frame timing: tick once per frame to get the delta, with a once-a-second
/// FPS rollup pushed to the log.
pub struct Metrics {
    last_frame: Instant,
    fps_counter: u32,
    fps_timer: Instant,
    pub current_fps: f32,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            fps_counter: 0,
            fps_timer: Instant::now(),
            current_fps: 0.0,
        }
    }

    /// Returns the seconds elapsed since the previous tick.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.fps_counter += 1;
        if now - self.fps_timer >= Duration::from_secs(1) {
            self.current_fps = self.fps_counter as f32 / (now - self.fps_timer).as_secs_f32();
            log::debug!("fps: {:.1}", self.current_fps);
            self.fps_counter = 0;
            self.fps_timer = now;
        }
        dt
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
