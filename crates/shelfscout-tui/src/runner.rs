// TUI event loop and terminal management
use crate::{App, Phase};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use shelfscout_core::Library;
use std::io;
use tracing::debug;

pub async fn run_tui(mut app: App, library: Library, mouse_enabled: bool) -> anyhow::Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    if mouse_enabled {
        execute!(io::stdout(), EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let books = library.books();

    // Show the loading screen, then resolve the initial fetch
    terminal.draw(|f| crate::ui::render(f, &mut app))?;
    let snapshot = books.fetch().await;
    app.apply_snapshot(&snapshot);

    // Main loop
    loop {
        terminal.draw(|f| crate::ui::render(f, &mut app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                match app.phase {
                    Phase::Loading => match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => app.quit(),
                        _ => {}
                    },
                    Phase::Error => match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => app.quit(),
                        KeyCode::Char('r') | KeyCode::Char('R') => {
                            debug!("user retry");
                            app.retry();
                            terminal.draw(|f| crate::ui::render(f, &mut app))?;
                            let snapshot = books.refetch().await;
                            app.apply_snapshot(&snapshot);
                        }
                        _ => {}
                    },
                    Phase::Ready => match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => app.quit(),
                        KeyCode::Right | KeyCode::Char('l') | KeyCode::Tab => app.next_tab(),
                        KeyCode::Left | KeyCode::Char('h') | KeyCode::BackTab => {
                            app.previous_tab()
                        }
                        KeyCode::Down | KeyCode::Char('j') => app.scroll_down(),
                        KeyCode::Up | KeyCode::Char('k') => app.scroll_up(),
                        KeyCode::Char('r') | KeyCode::Char('R') => {
                            // Explicit refresh keeps the current shelf visible
                            // in a refetching state until the new list lands
                            debug!("user refresh");
                            let snapshot = books.refetch().await;
                            app.apply_snapshot(&snapshot);
                        }
                        _ => {}
                    },
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    if mouse_enabled {
        execute!(terminal.backend_mut(), DisableMouseCapture)?;
    }
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    Ok(())
}
