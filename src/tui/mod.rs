pub mod app;
pub mod event;
pub mod layout;

use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::app::{AppContext, Result};
use crate::controller::{Action, Controller, CycleReport};
use crate::scheduler::{Scheduler, SchedulerConfig};

use self::app::TuiApp;
use self::event::{AppEvent, EventHandler, KeyAction};

type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Show the reader until the user quits. Feeds keep updating in the
/// background meanwhile.
pub async fn run(ctx: &AppContext) -> Result<()> {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let scheduler = Scheduler::new(
        ctx.controller.clone(),
        SchedulerConfig {
            interval: ctx.config.fetch_interval(),
            update_on_start: true,
        },
    );
    let background = tokio::spawn(async move { scheduler.run(shutdown_rx).await });

    let mut terminal = setup_terminal()?;
    let result = run_app(&mut terminal, ctx).await;
    restore_terminal(&mut terminal)?;

    shutdown_tx.send_replace(true);
    let _ = background.await;
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

async fn run_app(terminal: &mut Tui, ctx: &AppContext) -> Result<()> {
    let controller = ctx.controller.clone();
    let keybindings = &ctx.config.keybindings;
    let mut tui_app = TuiApp::new(keybindings.help_line());
    let event_handler = EventHandler::new(Duration::from_millis(100));
    let mut views = controller.subscribe();
    let mut manual_refresh: Option<JoinHandle<CycleReport>> = None;

    tui_app.set_items(views.borrow_and_update().to_vec());
    if controller.feeds().is_empty() {
        tui_app.set_status("No feeds configured. Add [[feeds]] to the config file.".to_string());
    }

    loop {
        if views.has_changed().unwrap_or(false) {
            tui_app.set_items(views.borrow_and_update().to_vec());
        }
        if let Some(report) = finished_refresh(&mut manual_refresh).await {
            tui_app.set_status(match report {
                CycleReport::Completed { added, failed } => {
                    format!("Refreshed: {} new items, {} errors", added, failed)
                }
                CycleReport::Skipped => "An update is already running".to_string(),
            });
        }
        tui_app.is_refreshing = controller.is_refreshing();

        terminal.draw(|frame| layout::render(frame, &mut tui_app))?;

        match event_handler.next()? {
            AppEvent::Key(key) => {
                tui_app.clear_status();
                match keybindings.get_action(&key) {
                    KeyAction::Quit => tui_app.should_quit = true,
                    KeyAction::MoveUp => tui_app.move_up(),
                    KeyAction::MoveDown => tui_app.move_down(),
                    KeyAction::NextPage => tui_app.next_page(),
                    KeyAction::PrevPage => tui_app.prev_page(),
                    KeyAction::OpenLink => {
                        if let Some(item) = tui_app.selected_item() {
                            let action = Action::OpenLink {
                                link: item.link.clone(),
                                guid: item.guid.clone(),
                            };
                            if !item.has_link() {
                                tui_app.set_status("Item has no link".to_string());
                            }
                            controller.apply(action).await;
                        }
                    }
                    KeyAction::Dismiss => {
                        if let Some(item) = tui_app.selected_item() {
                            let guid = item.guid.clone();
                            controller.apply(Action::Dismiss { guid }).await;
                        }
                    }
                    KeyAction::DismissAll => {
                        controller.apply(Action::DismissAll).await;
                        tui_app.set_status("Dismissed everything".to_string());
                    }
                    KeyAction::Refresh => {
                        if manual_refresh.is_none() {
                            manual_refresh = Some(spawn_refresh(controller.clone()));
                        }
                    }
                    KeyAction::None => {}
                }
            }
            AppEvent::Tick => {}
        }

        if tui_app.should_quit {
            break;
        }
    }

    if let Some(handle) = manual_refresh {
        handle.abort();
    }
    Ok(())
}

fn spawn_refresh(controller: Arc<Controller>) -> JoinHandle<CycleReport> {
    tokio::spawn(async move { controller.refresh().await })
}

async fn finished_refresh(pending: &mut Option<JoinHandle<CycleReport>>) -> Option<CycleReport> {
    if !pending.as_ref().is_some_and(JoinHandle::is_finished) {
        return None;
    }
    match pending.take()?.await {
        Ok(report) => Some(report),
        Err(e) => {
            tracing::error!("Refresh task failed: {}", e);
            None
        }
    }
}
