use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame,
};
use tabhop_core::list::RenderedRow;
use tabhop_core::models::ItemKind;
use unicode_width::UnicodeWidthStr;

use crate::ui::help::HelpOverlay;
use crate::ui::theme::Palette;
use crate::ui::App;

const PROMPT: &str = "› ";

pub(crate) fn render(f: &mut Frame, app: &mut App) {
    let palette = app.palette;
    let bg_block = Block::default().style(Style::default().bg(palette.bg_app));
    f.render_widget(bg_block, f.area());

    let chunks = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .split(f.area());

    render_query(f, app, chunks[0]);
    render_rows(f, app, chunks[1]);
    render_footer(f, app, chunks[2]);

    if let Some(help) = &app.help {
        render_help(f, help, &palette, f.area());
    }
}

fn render_query(f: &mut Frame, app: &App, area: Rect) {
    let palette = &app.palette;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.border))
        .title(Span::styled(" tabhop ", palette.muted()));
    let inner = block.inner(area);

    let line = if app.query.is_empty() {
        Line::from(vec![
            Span::styled(PROMPT, Style::default().fg(palette.accent_primary)),
            Span::styled("Search tabs and bookmarks...", palette.muted()),
        ])
    } else {
        Line::from(vec![
            Span::styled(PROMPT, Style::default().fg(palette.accent_primary)),
            Span::styled(app.query.as_str(), palette.text()),
        ])
    };
    f.render_widget(Paragraph::new(line).block(block), area);

    if app.help.is_none() {
        let x = inner.x + (PROMPT.width() + app.query.width()) as u16;
        f.set_cursor_position((x.min(inner.right().saturating_sub(1)), inner.y));
    }
}

fn row_line<'a>(row: &'a RenderedRow, palette: &Palette) -> Line<'a> {
    let mut spans = Vec::with_capacity(row.fragments.len() + 3);

    if row.active {
        spans.push(Span::styled("▌", Style::default().fg(palette.accent_primary)));
    } else {
        spans.push(Span::raw(" "));
    }

    let marker_color = match row.item.kind {
        ItemKind::Tab => palette.accent_tab,
        ItemKind::Bookmark => palette.accent_bookmark,
    };
    spans.push(Span::styled(
        format!("{} ", row.item.kind.marker()),
        Style::default().fg(marker_color),
    ));

    let base = if row.marked_for_close {
        palette.marked()
    } else if row.active {
        palette.text().add_modifier(Modifier::BOLD)
    } else {
        palette.text()
    };
    for fragment in &row.fragments {
        let style = if fragment.matched {
            base.patch(palette.highlight())
        } else {
            base
        };
        spans.push(Span::styled(fragment.text.as_str(), style));
    }

    spans.push(Span::styled(format!("  {}", row.item.url), palette.muted()));
    Line::from(spans)
}

fn render_rows(f: &mut Frame, app: &mut App, area: Rect) {
    app.list_area = area;
    app.viewport
        .set_height(area.height as usize, app.list.active_index(), app.list.len());

    let palette = app.palette;
    if app.list.is_empty() {
        let msg = if app.query.is_empty() {
            "No open tabs or bookmarks."
        } else {
            "Nothing matches your search."
        };
        f.render_widget(Paragraph::new(msg).style(palette.muted()), area);
        return;
    }

    let items: Vec<ListItem> = app
        .viewport
        .visible(app.list.len())
        .filter_map(|i| app.list.get(i))
        .map(|row| {
            let style = if row.active {
                Style::default().bg(palette.bg_selected)
            } else {
                Style::default()
            };
            ListItem::new(row_line(row, &palette)).style(style)
        })
        .collect();

    f.render_widget(List::new(items), area);
}

fn render_footer(f: &mut Frame, app: &App, area: Rect) {
    let palette = &app.palette;
    let mut spans = vec![
        Span::styled(format!(" {} ", app.mode.label()), Style::default().fg(palette.accent_primary)),
        Span::styled(
            format!("• {}/{} ", app.list.len(), app.item_count()),
            palette.muted(),
        ),
    ];

    let marked = app.list.marked_tab_ids(None).len();
    if marked > 0 {
        spans.push(Span::styled(
            format!("• {} marked for closing ", marked),
            Style::default().fg(palette.accent_error),
        ));
    }

    match &app.status {
        Some(status) => spans.push(Span::styled(format!("• {}", status), palette.text())),
        None => spans.push(Span::styled("• F1 keys • Esc close", palette.muted())),
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);
    cell
}

fn render_help(f: &mut Frame, help: &HelpOverlay, palette: &Palette, area: Rect) {
    let key_width = help
        .lines
        .iter()
        .filter(|(_, label)| !label.is_empty())
        .map(|(keys, _)| keys.width())
        .max()
        .unwrap_or(0);
    let label_width = help
        .lines
        .iter()
        .map(|(_, label)| label.width())
        .max()
        .unwrap_or(0);

    let width = ((key_width + label_width + 6) as u16).min(area.width);
    let height = (help.lines.len() as u16 + 2).min(area.height);
    let popup = centered(area, width, height);

    let lines: Vec<Line> = help
        .lines
        .iter()
        .skip(help.scroll)
        .map(|(keys, label)| {
            if label.is_empty() {
                return Line::from(Span::styled(
                    format!(" {}", keys),
                    palette.muted().add_modifier(Modifier::BOLD),
                ));
            }
            Line::from(vec![
                Span::styled(
                    format!(" {:<width$} ", keys, width = key_width),
                    Style::default().fg(palette.accent_primary),
                ),
                Span::styled(label.as_str(), palette.text()),
            ])
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.border))
        .title(Span::styled(
            format!(" Keys ({}) • Esc to close ", help.mode.label()),
            palette.muted(),
        ))
        .style(Style::default().bg(palette.bg_app));

    f.render_widget(Clear, popup);
    f.render_widget(Paragraph::new(lines).block(block), popup);
}
