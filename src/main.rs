mod app;
mod braille;
mod config;
mod export;
mod grid;
mod palette;
mod presets;
mod settings;
mod simulation;
mod ui;

use app::App;
use clap::Parser;
use config::AppConfig;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use palette::ColorScheme;
use presets::PresetManager;
use ratatui::{backend::CrosstermBackend, Terminal};
use settings::SimulationSettings;
use simulation::SimulationState;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "brownian-field")]
#[command(about = "Brownian-motion particle simulation with a live density field in the terminal")]
struct Args {
    /// Number of particles to simulate (clamped to 100-200000)
    #[arg(short = 'p', long, default_value = "10000")]
    particles: usize,

    /// Plane width in lattice cells
    #[arg(long, default_value = "1000")]
    width: usize,

    /// Plane height in lattice cells
    #[arg(long, default_value = "1000")]
    height: usize,

    /// Density bin side length; must evenly divide width and height
    #[arg(short = 'b', long = "bin-size", default_value = "50")]
    bin_size: usize,

    /// Per-tick probability of a particle redrawing its direction (0.0-1.0)
    #[arg(short = 't', long = "turn-prob", default_value = "0.1")]
    turn_prob: f64,

    /// Particles per bin per color bucket
    #[arg(long = "density-step", default_value = "5")]
    density_step: usize,

    /// Number of graded palette buckets
    #[arg(long, default_value = "10")]
    levels: usize,

    /// Simulation speed (ticks per frame, 1-50)
    #[arg(long, default_value = "1")]
    speed: usize,

    /// RNG seed for a reproducible run (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Color scheme (midnight, ember, glacier, moss, mono)
    #[arg(long, default_value = "midnight")]
    scheme: String,

    /// Start from a named preset (builtin or user)
    #[arg(long)]
    preset: Option<String>,

    /// Load a full config file (overrides the flags above)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the effective config as JSON and exit
    #[arg(long = "export-config")]
    export_config: Option<PathBuf>,
}

fn parse_scheme(s: &str) -> ColorScheme {
    match s.to_lowercase().as_str() {
        "ember" | "fire" => ColorScheme::Ember,
        "glacier" | "ice" => ColorScheme::Glacier,
        "moss" | "green" => ColorScheme::Moss,
        "mono" | "gray" | "grey" => ColorScheme::Mono,
        _ => ColorScheme::Midnight,
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut settings = SimulationSettings {
        plane_width: args.width,
        plane_height: args.height,
        bin_size: args.bin_size,
        num_particles: args.particles.clamp(settings::MIN_PARTICLES, settings::MAX_PARTICLES),
        turn_probability: args.turn_prob,
        density_step: args.density_step,
        palette_levels: args.levels,
    };
    let mut color_scheme = parse_scheme(&args.scheme);
    let mut steps_per_frame = args.speed.clamp(1, 50);

    if let Some(path) = &args.config {
        let loaded = AppConfig::load_from_file(path)?;
        settings = loaded.settings;
        color_scheme = loaded.color_scheme;
        steps_per_frame = loaded.steps_per_frame.clamp(1, 50);
    }

    if let Some(name) = &args.preset {
        let manager = PresetManager::new();
        let preset = manager
            .find(name)
            .ok_or_else(|| format!("Unknown preset: {}", name))?;
        settings = preset.settings.clone();
    }

    if let Some(path) = &args.export_config {
        settings.validate()?;
        let config = AppConfig {
            version: 1,
            settings,
            color_scheme,
            steps_per_frame,
        };
        config.save_to_file(path)?;
        println!("Wrote config to {}", path.display());
        return Ok(());
    }

    // Build the simulation before touching the terminal so configuration
    // errors print to a normal screen
    let state = SimulationState::new(settings, args.seed)?;
    let mut app = App::new(state, color_scheme, steps_per_frame, args.seed);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, &mut app);

    // Cleanup
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    // Target ~60fps for smooth animation
    const FRAME_DURATION: Duration = Duration::from_millis(16);

    loop {
        // Render current state
        terminal.draw(|frame| ui::render(frame, app))?;

        // Poll for events with timeout
        if event::poll(FRAME_DURATION)? {
            if let Event::Key(key) = event::read()? {
                // Only process Press events
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                // Handle Ctrl+C
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(());
                }

                match key.code {
                    // System controls
                    KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(()),
                    KeyCode::Char(' ') => app.toggle_pause(),
                    KeyCode::Char('r') | KeyCode::Char('R') => app.reset(),
                    KeyCode::Char('v') | KeyCode::Char('V') => app.toggle_fullscreen(),
                    KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('?') => {
                        app.toggle_help()
                    }
                    KeyCode::Char('c') | KeyCode::Char('C') => {
                        app.cycle_color_scheme();
                        app.focus = app::Focus::Scheme;
                    }

                    // Presets
                    KeyCode::Char('1') => app.apply_preset(0),
                    KeyCode::Char('2') => app.apply_preset(1),
                    KeyCode::Char('3') => app.apply_preset(2),
                    KeyCode::Char('4') => app.apply_preset(3),
                    KeyCode::Char('5') => app.apply_preset(4),
                    KeyCode::Char('u') | KeyCode::Char('U') => app.save_preset(),

                    // Export
                    KeyCode::Char('x') | KeyCode::Char('X') => app.export_png(),
                    KeyCode::Char('g') | KeyCode::Char('G') => app.toggle_recording(),

                    // Speed
                    KeyCode::Char('+') | KeyCode::Char('=') => {
                        app.increase_speed();
                        app.focus = app::Focus::Speed;
                    }
                    KeyCode::Char('-') | KeyCode::Char('_') => {
                        app.decrease_speed();
                        app.focus = app::Focus::Speed;
                    }

                    // Navigation
                    KeyCode::Tab => app.next_focus(),
                    KeyCode::BackTab => app.prev_focus(),
                    KeyCode::Up => {
                        if !app.show_help && app.focus.is_param() {
                            app.adjust_focused_up();
                        }
                    }
                    KeyCode::Down => {
                        if !app.show_help && app.focus.is_param() {
                            app.adjust_focused_down();
                        }
                    }
                    KeyCode::Esc => {
                        if app.show_help {
                            app.toggle_help();
                        } else if app.focus.is_param() {
                            app.focus = app::Focus::Controls;
                        }
                    }
                    KeyCode::Char('j') | KeyCode::Char('J') => {
                        if app.show_help {
                            app.scroll_help_down(ui::HELP_CONTENT_LINES);
                        }
                    }
                    KeyCode::Char('k') | KeyCode::Char('K') => {
                        if app.show_help {
                            app.scroll_help_up();
                        }
                    }
                    _ => {}
                }
            }
        }

        // Run simulation tick
        app.tick();
    }
}
