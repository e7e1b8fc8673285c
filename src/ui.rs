use crate::app::{App, Focus};
use crate::braille;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

const SIDEBAR_WIDTH: u16 = 24;

/// Max scroll for help content (generous to account for text wrapping on small screens)
pub const HELP_CONTENT_LINES: u16 = 40;

// UI color scheme
const BORDER_COLOR: Color = Color::Cyan;
const HIGHLIGHT_COLOR: Color = Color::Yellow;
const TEXT_COLOR: Color = Color::White;
const DIM_TEXT_COLOR: Color = Color::Gray;

/// Creates a standard styled block with rounded borders
fn styled_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_COLOR))
        .title(title)
}

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    if app.fullscreen_mode {
        render_canvas(frame, area, app);
    } else {
        let layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
            .split(area);

        render_sidebar(frame, layout[0], app);
        render_canvas(frame, layout[1], app);
    }

    if app.show_help {
        render_help_overlay(frame, area, app);
    }
}

fn render_sidebar(frame: &mut Frame, area: Rect, app: &App) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7),  // Status
            Constraint::Length(8),  // Parameters
            Constraint::Min(10),    // Controls
        ])
        .split(area);

    render_status_box(frame, sections[0], app);
    render_params_box(frame, sections[1], app);
    render_controls_box(frame, sections[2], app);
}

fn render_status_box(frame: &mut Frame, area: Rect, app: &App) {
    let block = styled_block(" Brownian Field ");

    let snapshot = app.sim.snapshot();

    let status_text = if app.sim.paused { "PAUSED" } else { "RUNNING" };
    let status_color = if app.sim.paused {
        HIGHLIGHT_COLOR
    } else {
        BORDER_COLOR
    };

    let mut content = vec![
        Line::from(Span::styled(
            format!("tick {}", snapshot.tick),
            Style::default().fg(TEXT_COLOR),
        )),
        Line::from(Span::styled(
            format!("{} particles", snapshot.particles.len()),
            Style::default().fg(TEXT_COLOR),
        )),
        Line::from(Span::styled(
            format!("peak bin {}", snapshot.grid.peak_count()),
            Style::default().fg(DIM_TEXT_COLOR),
        )),
        Line::from(vec![
            Span::styled(status_text, Style::default().fg(status_color)),
            if app.recorder.is_some() {
                Span::styled("  REC", Style::default().fg(Color::Red))
            } else {
                Span::raw("")
            },
        ]),
    ];
    if let Some(notice) = &app.notice {
        content.push(Line::from(Span::styled(
            notice.clone(),
            Style::default().fg(DIM_TEXT_COLOR),
        )));
    }

    let paragraph = Paragraph::new(content).block(block).wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn render_params_box(frame: &mut Frame, area: Rect, app: &App) {
    let block = styled_block(" Parameters ");

    let make_line = |label: &str, value: String, focused: bool| {
        let prefix = if focused { "> " } else { "  " };
        let style = if focused {
            Style::default().fg(HIGHLIGHT_COLOR)
        } else {
            Style::default().fg(TEXT_COLOR)
        };
        Line::from(Span::styled(format!("{}{}: {}", prefix, label, value), style))
    };

    // A particle count edit only lands on reset; mark it until then
    let live_particles = app.sim.settings().num_particles;
    let particles_value = if app.pending.num_particles == live_particles {
        format!("{}", live_particles)
    } else {
        format!("{} (R)", app.pending.num_particles)
    };

    let content = vec![
        make_line(
            "Step",
            format!("{}", app.pending.density_step),
            app.focus == Focus::DensityStep,
        ),
        make_line("Particles", particles_value, app.focus == Focus::Particles),
        make_line(
            "Scheme",
            app.color_scheme.name().to_string(),
            app.focus == Focus::Scheme,
        ),
        make_line(
            "Speed",
            format!("{}", app.steps_per_frame),
            app.focus == Focus::Speed,
        ),
        make_line(
            "Turn p",
            format!("{:.2}", app.pending.turn_probability),
            app.focus == Focus::TurnProb,
        ),
        Line::from(Span::styled(
            format!(
                "  Bins: {}x{} of {}",
                app.pending.bins_x(),
                app.pending.bins_y(),
                app.pending.bin_size
            ),
            Style::default().fg(DIM_TEXT_COLOR),
        )),
    ];

    let paragraph = Paragraph::new(content).block(block);
    frame.render_widget(paragraph, area);
}

fn render_controls_box(frame: &mut Frame, area: Rect, app: &App) {
    let key_style = Style::default().fg(HIGHLIGHT_COLOR);
    let desc_style = Style::default().fg(DIM_TEXT_COLOR);

    // Helper to create a control line
    let make_control = |key: &str, desc: String| -> Line<'_> {
        Line::from(vec![
            Span::styled(format!("{:>5}", key), key_style),
            Span::styled(format!(" {}", desc), desc_style),
        ])
    };

    let content = vec![
        make_control("Space", "pause/resume".to_string()),
        make_control("H/?", "help".to_string()),
        make_control("R", "reset".to_string()),
        make_control("1-5", "presets".to_string()),
        make_control("C", format!("scheme: {}", app.color_scheme.name())),
        make_control("V", "fullscreen".to_string()),
        make_control("X", "export PNG".to_string()),
        make_control("G", "record GIF".to_string()),
        make_control("U", "save preset".to_string()),
        make_control("Tab", "focus param".to_string()),
        make_control("↑/↓", "adjust param".to_string()),
        make_control("+/-", "speed".to_string()),
        make_control("Q", "quit".to_string()),
    ];

    let block = styled_block(" Controls ");
    let paragraph = Paragraph::new(content).block(block);
    frame.render_widget(paragraph, area);
}

fn render_canvas(frame: &mut Frame, area: Rect, app: &App) {
    let block = styled_block("");

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let snapshot = app.sim.snapshot();
    let lines = braille::render_field(&snapshot, &app.lut, inner.width, inner.height);
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_help_overlay(frame: &mut Frame, area: Rect, app: &App) {
    // Calculate the canvas area (exclude sidebar unless fullscreen)
    let canvas_x = if app.fullscreen_mode { 0 } else { SIDEBAR_WIDTH };
    let canvas_width = if app.fullscreen_mode {
        area.width
    } else {
        area.width.saturating_sub(SIDEBAR_WIDTH)
    };

    // Center the help dialog within the canvas
    let help_width = 56.min(canvas_width.saturating_sub(4));
    let help_height = area.height.saturating_sub(4).min(32);
    let x = canvas_x + (canvas_width.saturating_sub(help_width)) / 2;
    let y = (area.height.saturating_sub(help_height)) / 2;

    let help_area = Rect {
        x: area.x + x,
        y: area.y + y,
        width: help_width,
        height: help_height,
    };

    // Clear the background
    frame.render_widget(Clear, help_area);

    let content = vec![
        Line::from(""),
        Line::from(Span::styled("BROWNIAN MOTION FIELD", Style::default().fg(BORDER_COLOR))),
        Line::from(""),
        Line::from("Thousands of particles walk the toroidal plane, turning at random. Each bin of the plane is shaded by how many particles currently sit in it."),
        Line::from(""),
        Line::from(Span::styled("PRESETS (1-5):", Style::default().fg(HIGHLIGHT_COLOR))),
        Line::from("1=Reference, 2=Fine Grain, 3=Coarse, 4=Jitter, 5=Drift"),
        Line::from(""),
        Line::from(Span::styled("PARAMETERS:", Style::default().fg(HIGHLIGHT_COLOR))),
        Line::from(""),
        Line::from(Span::styled("Turn p", Style::default().fg(TEXT_COLOR))),
        Line::from("Chance per tick that a particle redraws its direction. Low = long streaks, high = tight jitter."),
        Line::from(""),
        Line::from(Span::styled("Step", Style::default().fg(TEXT_COLOR))),
        Line::from("Particles per bin needed to advance one color bucket. Lower steps saturate the palette sooner."),
        Line::from(""),
        Line::from(Span::styled("Particles", Style::default().fg(TEXT_COLOR))),
        Line::from("Population size; applies when you press R."),
        Line::from(""),
        Line::from(Span::styled("EXPORT:", Style::default().fg(HIGHLIGHT_COLOR))),
        Line::from("X saves a full-resolution PNG of the current frame. G starts recording and, pressed again, writes an animated GIF."),
        Line::from(""),
        Line::from(Span::styled("BASIC CONTROLS:", Style::default().fg(HIGHLIGHT_COLOR))),
        Line::from("Space=Pause, R=Reset, C=Scheme, V=Fullscreen, Tab/Arrows=Adjust, +/-=Speed, Q=Quit"),
        Line::from(""),
    ];

    let content_height = content.len() as u16;
    let visible_height = help_height.saturating_sub(2); // minus borders
    let max_scroll = content_height.saturating_sub(visible_height);
    let is_scrollable = max_scroll > 0;

    // Update title to show scroll hint if scrollable
    let title = if is_scrollable {
        " Help (J/K scroll, H to close) "
    } else {
        " Help (H to close) "
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(HIGHLIGHT_COLOR))
        .title(title);

    let paragraph = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: true })
        .scroll((app.help_scroll, 0));

    frame.render_widget(paragraph, help_area);
}
