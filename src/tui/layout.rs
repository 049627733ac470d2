use chrono::Utc;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::config::Palette;
use crate::domain::filter::country_name;
use crate::domain::format::{self, TITLE_MAX_LEN};
use crate::tui::app::{ActivePane, TuiApp};
use crate::tui::toast::ToastKind;

pub fn render(frame: &mut Frame, app: &mut TuiApp, palette: &Palette) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),   // Body
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_header(frame, app, rows[0], palette);

    let body = if app.show_sidebar {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(40),
                Constraint::Percentage(35),
                Constraint::Percentage(25),
            ])
            .split(rows[1])
    } else {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(rows[1])
    };

    render_articles_pane(frame, app, body[0], palette);
    render_preview_pane(frame, app, body[1], palette);
    if app.show_sidebar {
        render_bookmarks_pane(frame, app, body[2], palette);
    }
    render_status_bar(frame, app, rows[2], palette);
}

fn border_style(active: bool, palette: &Palette) -> Style {
    if active {
        Style::default().fg(palette.active_border)
    } else {
        Style::default().fg(palette.inactive_border)
    }
}

fn highlight_style(active: bool, palette: &Palette) -> Style {
    let style = Style::default()
        .bg(palette.selection_bg)
        .fg(palette.selection_fg);
    if active {
        style.add_modifier(Modifier::BOLD)
    } else {
        style.add_modifier(Modifier::DIM)
    }
}

fn render_header(frame: &mut Frame, app: &TuiApp, area: Rect, palette: &Palette) {
    let filters = &app.filters;
    let country = country_name(filters.country()).unwrap_or(filters.country());

    let search = match &app.search_input {
        Some(input) => Span::styled(
            format!("Search: {}_", input),
            Style::default()
                .fg(palette.active_border)
                .add_modifier(Modifier::BOLD),
        ),
        None if filters.search_query().is_empty() => {
            Span::styled("/ to search", Style::default().fg(palette.muted))
        }
        None => Span::raw(format!("Search: {}", filters.search_query())),
    };

    let line = Line::from(vec![
        Span::styled(
            format!("{}  ", filters.category().name()),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("Sort: {}  ", filters.sort_by().label())),
        Span::raw(format!("Country: {}  ", country)),
        Span::styled(
            format!("Bookmarks: {}  ", app.bookmarks.len()),
            Style::default().fg(palette.bookmark),
        ),
        search,
    ]);

    let block = Block::default()
        .title(format!(" newshub [{}] ", app.theme.theme()))
        .borders(Borders::ALL)
        .border_style(border_style(app.is_searching(), palette));

    let paragraph = Paragraph::new(line)
        .block(block)
        .style(Style::default().fg(palette.text).bg(palette.background));
    frame.render_widget(paragraph, area);
}

fn render_articles_pane(frame: &mut Frame, app: &mut TuiApp, area: Rect, palette: &Palette) {
    let is_active = app.active_pane == ActivePane::Articles;
    let now = Utc::now();

    let items: Vec<ListItem> = app
        .articles()
        .iter()
        .map(|article| {
            let marker = if app.bookmarks.is_bookmarked(&article.url) {
                Span::styled("★ ", Style::default().fg(palette.bookmark))
            } else {
                Span::raw("  ")
            };
            let title = Line::from(vec![
                marker,
                Span::styled(
                    format::format_title(&article.title, TITLE_MAX_LEN),
                    Style::default().fg(palette.text),
                ),
            ]);
            let meta = Line::from(Span::styled(
                format!(
                    "  {} · {}",
                    article.source_name(),
                    format::format_relative_time(article.published_at, now)
                ),
                Style::default().fg(palette.muted),
            ));
            ListItem::new(vec![title, meta])
        })
        .collect();

    let title = if app.orchestrator.loading() {
        " Articles (loading...) ".to_string()
    } else {
        format!(
            " Articles [{}/{}] ",
            (app.article_index + 1).min(app.articles().len()),
            app.articles().len()
        )
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style(is_active, palette));

    if items.is_empty() {
        let message = match (app.orchestrator.loading(), app.orchestrator.error()) {
            (true, _) => Line::from("Loading..."),
            (false, Some(error)) => Line::from(Span::styled(
                format!("{} (R to retry)", error),
                Style::default().fg(palette.error),
            )),
            (false, None) => Line::from(Span::styled(
                "No articles found",
                Style::default().fg(palette.muted),
            )),
        };
        frame.render_widget(Paragraph::new(message).block(block), area);
        return;
    }

    let list = List::new(items)
        .block(block)
        .highlight_style(highlight_style(is_active, palette))
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut app.article_list_state);
}

fn render_bookmarks_pane(frame: &mut Frame, app: &mut TuiApp, area: Rect, palette: &Palette) {
    let is_active = app.active_pane == ActivePane::Bookmarks;

    let items: Vec<ListItem> = app
        .bookmarks
        .bookmarks()
        .iter()
        .map(|bookmark| {
            ListItem::new(vec![
                Line::from(Span::styled(
                    format::truncate_text(bookmark.article.display_title(), 40),
                    Style::default().fg(palette.text),
                )),
                Line::from(Span::styled(
                    format!("  saved {}", bookmark.bookmarked_at.format("%b %d")),
                    Style::default().fg(palette.muted),
                )),
            ])
        })
        .collect();

    let block = Block::default()
        .title(format!(" Bookmarks ({}) ", app.bookmarks.len()))
        .borders(Borders::ALL)
        .border_style(border_style(is_active, palette));

    if items.is_empty() {
        let hint = Paragraph::new(Span::styled(
            "No bookmarks yet. Press b on an article.",
            Style::default().fg(palette.muted),
        ))
        .wrap(Wrap { trim: true })
        .block(block);
        frame.render_widget(hint, area);
        return;
    }

    let list = List::new(items)
        .block(block)
        .highlight_style(highlight_style(is_active, palette))
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut app.bookmark_list_state);
}

fn render_preview_pane(frame: &mut Frame, app: &TuiApp, area: Rect, palette: &Palette) {
    let is_active = app.active_pane == ActivePane::Preview;

    let content = if let Some(article) = app.preview_article() {
        let mut lines = vec![
            Line::from(Span::styled(
                article.display_title().to_string(),
                Style::default()
                    .fg(palette.text)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                format!("By: {}", format::format_author(article.author.as_deref())),
                Style::default().fg(palette.metadata_author),
            )),
            Line::from(Span::styled(
                format!(
                    "{} · {}",
                    article.source_name(),
                    format::format_date(article.published_at)
                ),
                Style::default().fg(palette.metadata_date),
            )),
            Line::from(Span::styled(
                article.url.clone(),
                Style::default().fg(palette.metadata_link),
            )),
        ];
        if app.bookmarks.is_bookmarked(&article.url) {
            lines.push(Line::from(Span::styled(
                "★ Bookmarked",
                Style::default().fg(palette.bookmark),
            )));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(
            "─".repeat(area.width.saturating_sub(2) as usize),
        ));
        lines.push(Line::from(""));

        let body = format::clean_content(article.display_content());
        if body.is_empty() {
            lines.push(Line::from(Span::styled(
                "No description available",
                Style::default().fg(palette.muted),
            )));
        } else {
            lines.extend(body.lines().map(|l| Line::from(l.to_string())));
        }
        Text::from(lines)
    } else {
        Text::from(Span::styled(
            "No article selected",
            Style::default().fg(palette.muted),
        ))
    };

    let block = Block::default()
        .title(" Preview ")
        .borders(Borders::ALL)
        .border_style(border_style(is_active, palette));

    let paragraph = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((app.preview_scroll, 0));

    frame.render_widget(paragraph, area);
}

fn render_status_bar(frame: &mut Frame, app: &TuiApp, area: Rect, palette: &Palette) {
    let base = Style::default().fg(palette.status_fg).bg(palette.status_bg);

    let (status, style) = if let Some(toast) = app.toasts.latest() {
        let style = match toast.kind {
            ToastKind::Error | ToastKind::Warning => base.fg(palette.error),
            ToastKind::Success | ToastKind::Info => base,
        };
        (toast.message.clone(), style)
    } else if app.is_searching() {
        ("Enter:Search now  Esc:Cancel  Ctrl+u:Clear".to_string(), base)
    } else if let Some(error) = app.orchestrator.error() {
        (format!("{}  R:Retry", error), base.fg(palette.error))
    } else if let Some(notice) = app.orchestrator.notice() {
        (notice.to_string(), base)
    } else if let Some(summary) = app.summary() {
        (
            format!("{}  |  /:Search c:Category s:Sort b:Bookmark B:Sidebar q:Quit", summary),
            base,
        )
    } else {
        (
            "/:Search  c/C:Category  s:Sort  g:Country  b:Bookmark  o:Open  y:Share  t:Theme  q:Quit"
                .to_string(),
            base,
        )
    };

    frame.render_widget(Paragraph::new(status).style(style), area);
}
