use std::io;
use std::time::{Duration, Instant};

use crossterm::{
    cursor::{Hide, Show},
    event::{
        self, Event, KeyCode, KeyEventKind, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{self, disable_raw_mode, enable_raw_mode, Clear, ClearType},
};
use minifb::{Key, KeyRepeat, Scale, Window, WindowOptions};
use rand::rngs::StdRng;
use rand::SeedableRng;

use planetfall::core::Color;
use planetfall::game::input::{action_for_terminal_key, action_for_window_key, Action};
use planetfall::game::level::LevelMeshes;
use planetfall::game::GameState;
use planetfall::pipeline::{FrameBuffer, Pipeline, TermBuffer};
use planetfall::{init_logging, DisplayTarget, Metrics};

const WIDTH: usize = 1000;
const HEIGHT: usize = 700;
/// Terminal character cells are roughly twice as tall as wide.
const CELL_ASPECT: f32 = 0.5;
/// Clamp runaway frame deltas (debugger pauses, window drags) so one bad
/// tick cannot teleport the ship.
const MAX_DT: f32 = 0.1;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let matches = planetfall::create_clap_command().get_matches();
    let opts = planetfall::handle_clap_matches(&matches);
    init_logging()?;
    log::info!("launching: {:?}, assets at {}", opts.target, opts.assets.display());

    // Every mesh, material library and texture must resolve here, before
    // the frame loop starts; a missing asset is not recoverable mid-game.
    let meshes = LevelMeshes::load(&opts.assets)?;

    let mut rng = match opts.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let game = GameState::new(meshes, &mut rng);

    match opts.target {
        DisplayTarget::Window => run_window(game, rng)?,
        DisplayTarget::Terminal => run_terminal(game, rng)?,
    }
    Ok(())
}

fn run_window(mut game: GameState, mut rng: StdRng) -> io::Result<()> {
    let mut window = Window::new(
        "Planetfall",
        WIDTH,
        HEIGHT,
        WindowOptions {
            resize: false,
            scale: Scale::X1,
            ..WindowOptions::default()
        },
    )
    .map_err(io::Error::other)?;
    window.set_target_fps(60);

    let mut pipeline: Pipeline<FrameBuffer> =
        Pipeline::new(WIDTH, HEIGHT, WIDTH as f32 / HEIGHT as f32);
    let mut metrics = Metrics::new();

    while window.is_open() && !window.is_key_down(Key::Escape) {
        // Level rollover happens strictly at the top of the loop, never
        // while a render pass holds the scene.
        if game.reached_planet() {
            game.advance_level(&mut rng);
        }

        for key in window.get_keys_pressed(KeyRepeat::No) {
            if let Some(action) = action_for_window_key(key) {
                game.apply_action(action, true);
            }
        }
        for key in window.get_keys_released() {
            if let Some(action) = action_for_window_key(key) {
                game.apply_action(action, false);
            }
        }

        let dt = metrics.tick().min(MAX_DT);
        game.update(dt);

        let camera = game.camera_frame();
        let (from, to) = game.guide_line();
        pipeline.render_frame(&game.scene, &camera, Some((from, to, Color::WHITE)), &mut window)?;
    }
    Ok(())
}

/// Restores the terminal on drop, so every exit path out of the raw-mode
/// loop (early `?` returns included) leaves the user's shell usable.
struct TermGuard {
    enhanced: bool,
}

impl Drop for TermGuard {
    fn drop(&mut self) {
        let mut stdout = io::stdout();
        if self.enhanced {
            let _ = execute!(stdout, PopKeyboardEnhancementFlags);
        }
        let _ = execute!(stdout, Show, terminal::LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
}

/// One simulated tick in tap-fallback mode: integrate first, then apply the
/// queued synthetic releases, so every tapped intent survives exactly one
/// tick regardless of how many input polls ran in between.
fn tick_with_taps(game: &mut GameState, dt: f32, taps: &mut Vec<Action>) {
    game.update(dt);
    for action in taps.drain(..) {
        game.apply_action(action, false);
    }
}

fn run_terminal(mut game: GameState, mut rng: StdRng) -> io::Result<()> {
    enable_raw_mode()?;
    let mut guard = TermGuard { enhanced: false };
    let mut stdout = io::stdout();
    execute!(
        stdout,
        terminal::EnterAlternateScreen,
        Hide,
        Clear(ClearType::All)
    )?;

    // Key-release events only arrive with the kitty enhancement flags
    // pushed. Without them every event is a press, so held keys are
    // emulated below from the terminal's auto-repeat.
    let enhanced = terminal::supports_keyboard_enhancement().unwrap_or(false);
    if enhanced {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )?;
        guard.enhanced = true;
    } else {
        log::warn!("terminal lacks key-release reporting; falling back to tap controls");
    }

    let (mut tw, mut th) = terminal::size()?;
    let mut pipeline: Pipeline<TermBuffer> = term_pipeline(tw, th);
    let frame_duration = Duration::from_millis(16);
    let mut metrics = Metrics::new();
    let mut last_frame = Instant::now();
    // Presses waiting for their synthetic release in non-enhanced mode.
    let mut taps: Vec<Action> = Vec::new();

    'mainloop: loop {
        if game.reached_planet() {
            game.advance_level(&mut rng);
        }

        while event::poll(Duration::from_millis(1))? {
            if let Event::Key(key) = event::read()? {
                if key.code == KeyCode::Esc {
                    break 'mainloop;
                }
                let pressed = match key.kind {
                    KeyEventKind::Press => true,
                    KeyEventKind::Release => false,
                    KeyEventKind::Repeat => continue,
                };
                if let Some(action) = action_for_terminal_key(key.code) {
                    game.apply_action(action, pressed);
                    if pressed && !enhanced {
                        taps.push(action);
                    }
                }
            }
        }

        let now = Instant::now();
        if now - last_frame >= frame_duration {
            let (nw, nh) = terminal::size()?;
            if (nw, nh) != (tw, th) {
                (tw, th) = (nw, nh);
                pipeline = term_pipeline(tw, th);
            }

            let dt = metrics.tick().min(MAX_DT);
            tick_with_taps(&mut game, dt, &mut taps);

            let camera = game.camera_frame();
            let (from, to) = game.guide_line();
            pipeline.render_frame(
                &game.scene,
                &camera,
                Some((from, to, Color::WHITE)),
                &mut stdout,
            )?;
            last_frame = now;
        }
    }

    Ok(())
}

fn term_pipeline(cols: u16, rows: u16) -> Pipeline<TermBuffer> {
    Pipeline::new(
        cols as usize,
        rows as usize,
        cols as f32 * CELL_ASPECT / rows as f32,
    )
}
