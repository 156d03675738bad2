use std::io;

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};
use tokio::sync::mpsc;
use tracing::info;

use pagechrome_core::{AppConfig, PageLayout};
use pagechrome_tui::{
    app::{App, Mode},
    event::{spawn_hero_load, AppEvent, EventHandler, PageSignal},
    input::{handle_key_event, Action},
    keymap::Keymap,
    widgets::{HelpWidget, PageViewWidget, StatusBarWidget},
};

pub async fn run(config: AppConfig, layout: PageLayout) -> Result<()> {
    let keymap = Keymap::from_config(&config.keymap);
    let event_handler = EventHandler::with_animation_fps(config.ui.tick_rate_ms, config.ui.animation_fps);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, SetTitle(format!("pagechrome: {}", layout.title)))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(layout, config);
    app.on_terminal_resize(terminal.size()?.height);
    info!(
        width = app.page.viewport_width(),
        height = app.page.viewport_height(),
        "Preview started"
    );

    // Hero image arrives on its own schedule
    let (signal_tx, mut signal_rx) = mpsc::unbounded_channel::<PageSignal>();
    if let Some(delay) = app.hero_load_delay() {
        spawn_hero_load(delay, signal_tx);
    }

    let result = run_loop(&mut terminal, &mut app, &keymap, &event_handler, &mut signal_rx);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    keymap: &Keymap,
    event_handler: &EventHandler,
    signal_rx: &mut mpsc::UnboundedReceiver<PageSignal>,
) -> Result<()> {
    loop {
        // Process completed background work (non-blocking)
        while let Ok(signal) = signal_rx.try_recv() {
            match signal {
                PageSignal::HeroLoaded => app.on_hero_loaded(),
            }
        }

        // One display refresh per iteration while the chrome wants frames
        let now = app.clock_ms();
        app.frame(now);

        terminal.draw(|frame| {
            let size = frame.area();
            let main_layout = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(1), Constraint::Length(1)])
                .split(size);

            PageViewWidget::render(frame, main_layout[0], app);
            StatusBarWidget::render(frame, main_layout[1], app);

            if app.mode == Mode::Help {
                HelpWidget::render(frame, &app.config.keymap);
            }
        })?;

        // Faster polling while an animation or a throttled update is pending
        let event = if app.needs_frame() {
            event_handler.next_animation()?
        } else {
            event_handler.next()?
        };

        if let Some(event) = event {
            match event {
                AppEvent::Key(key) => {
                    let action = handle_key_event(key, app, keymap);
                    if action != Action::None {
                        app.clear_status();
                    }
                    let now = app.clock_ms();
                    app.apply(action, now);
                }
                AppEvent::Resize(_, rows) => app.on_terminal_resize(rows),
                AppEvent::Tick => {}
            }
        }

        if app.should_quit {
            info!("Preview closed");
            return Ok(());
        }
    }
}
