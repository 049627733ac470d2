pub mod app;
pub mod event;
pub mod layout;
pub mod toast;

use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;

use crate::app::{AppContext, Result};
use crate::fetcher::{orchestrator, FetchOutcome, FetchTicket};
use crate::share::{ShareData, ShareMethod};

use self::app::TuiApp;
use self::event::{Action, AppEvent, EventHandler};

type Tui = Terminal<CrosstermBackend<Stdout>>;

pub async fn run(ctx: Arc<AppContext>) -> Result<()> {
    let mut terminal = setup_terminal()?;
    let result = run_app(&mut terminal, ctx).await;
    restore_terminal(&mut terminal)?;
    result
}

fn setup_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run a fetch on its own task and send the outcome back to the event loop.
fn spawn_fetch(ctx: &Arc<AppContext>, tx: &mpsc::UnboundedSender<FetchOutcome>, ticket: FetchTicket) {
    let ctx = ctx.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let outcome = orchestrator::execute(ctx.client.as_ref(), ticket).await;
        // The receiver is gone only when the UI has exited
        let _ = tx.send(outcome);
    });
}

async fn run_app(terminal: &mut Tui, ctx: Arc<AppContext>) -> Result<()> {
    let reader = &ctx.config.reader;
    let mut tui_app = TuiApp::new(
        ctx.bookmarks(),
        ctx.theme(),
        reader.page_size,
        reader.search_debounce(),
        reader.toast_duration(),
    );
    let sharer = ctx.sharer();
    let event_handler = EventHandler::new(Duration::from_millis(100));
    let (tx, mut rx) = mpsc::unbounded_channel::<FetchOutcome>();

    loop {
        if let Some(ticket) = tui_app.orchestrator.observe(&tui_app.filters) {
            if ticket.page() <= 1 {
                tui_app.on_filters_changed();
            }
            spawn_fetch(&ctx, &tx, ticket);
        }

        while let Ok(outcome) = rx.try_recv() {
            tui_app.apply_outcome(outcome);
        }

        let palette = ctx.config.colors.palette(tui_app.theme.theme());
        terminal.draw(|frame| layout::render(frame, &mut tui_app, &palette))?;

        match event_handler.next()? {
            AppEvent::Key(key) if tui_app.is_searching() => {
                tui_app.handle_search_key(key, Instant::now());
            }
            AppEvent::Key(key) => match ctx.config.keybindings.get_action(&key) {
                Action::Quit => tui_app.should_quit = true,
                Action::MoveUp => tui_app.move_up(),
                Action::MoveDown => tui_app.move_down(),
                Action::NextPage => tui_app.next_page(),
                Action::PrevPage => tui_app.prev_page(),
                Action::NextPane => tui_app.next_pane(),
                Action::PrevPane => tui_app.prev_pane(),
                Action::Select => tui_app.select(),
                Action::Back => tui_app.back(),
                Action::Search => tui_app.begin_search(),
                Action::NextCategory => tui_app.next_category(),
                Action::PrevCategory => tui_app.prev_category(),
                Action::CycleSort => tui_app.cycle_sort(),
                Action::CycleCountry => tui_app.cycle_country(),
                Action::LoadMore => tui_app.load_more(),
                Action::ToggleBookmark => tui_app.toggle_bookmark(),
                Action::ToggleSidebar => tui_app.toggle_sidebar(),
                Action::RemoveBookmark => tui_app.remove_bookmark(),
                Action::ToggleTheme => tui_app.toggle_theme(),
                Action::ResetFilters => tui_app.reset_filters(),
                Action::OpenInBrowser => {
                    if let Some(url) = tui_app.preview_article().map(|a| a.url.clone()) {
                        if let Err(e) = open::that(&url) {
                            tui_app.toasts.error(format!("Failed to open browser: {}", e));
                        }
                    }
                }
                Action::Share => {
                    if let Some(data) = tui_app.preview_article().map(ShareData::from_article) {
                        match sharer.share(&data) {
                            Ok(ShareMethod::Command) => tui_app.toasts.success("Article shared"),
                            Ok(ShareMethod::Clipboard) => {
                                tui_app.toasts.success("Link copied to clipboard")
                            }
                            Err(e) => tui_app.toasts.error(e.to_string()),
                        }
                    }
                }
                Action::Retry => {
                    if tui_app.orchestrator.can_retry() {
                        let ticket = tui_app.orchestrator.retry(&tui_app.filters);
                        spawn_fetch(&ctx, &tx, ticket);
                    }
                }
                Action::None => {}
            },
            AppEvent::Tick => tui_app.tick(Instant::now()),
        }

        if tui_app.should_quit {
            break;
        }
    }

    Ok(())
}
