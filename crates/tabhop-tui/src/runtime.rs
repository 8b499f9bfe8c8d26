use anyhow::Result;
use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::StreamExt;
use std::time::Instant;
use tracing::{debug, warn};

use crate::input::{handle_key, handle_mouse};
use crate::render::render;
use crate::ui::{App, Tui};

/// Drive the popup until it closes: draw, then wait for either a terminal
/// event or the pending filter deadline.
pub(crate) async fn run_app(terminal: &mut Tui, app: &mut App) -> Result<()> {
    let mut event_stream = EventStream::new();

    while app.is_open() {
        terminal.draw(|f| render(f, app))?;

        // The sleep future is built even when no filter is pending; the
        // branch guard keeps it from being polled.
        let deadline = app.scheduler.deadline();
        let wake_at = tokio::time::Instant::from_std(deadline.unwrap_or_else(Instant::now));

        tokio::select! {
            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        handle_key(app, key).await;
                    }
                    Some(Ok(Event::Mouse(mouse))) => {
                        handle_mouse(app, mouse).await;
                    }
                    Some(Ok(Event::Resize(width, height))) => {
                        debug!("Terminal resized to {}x{}", width, height);
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!("Terminal event error: {}", e);
                        return Err(e.into());
                    }
                    None => {
                        debug!("Terminal event stream ended");
                        app.close();
                    }
                }
            }

            _ = tokio::time::sleep_until(wake_at), if deadline.is_some() => {
                app.run_due_filter(Instant::now());
            }
        }
    }

    Ok(())
}
