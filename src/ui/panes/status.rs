//! Status bar rendering with keybindings and position indicators

use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Data needed to render the status bar
pub struct StatusRenderData<'a> {
    pub message: &'a str,
    /// 1-based segment under the top row, and the segment count
    pub segment: Option<(usize, usize)>,
    pub occupied_bytes: u64,
    pub skipped_records: usize,
    pub at_top: bool,
    pub at_bottom: bool,
}

/// Render the status bar at the bottom
pub fn render_status_bar(frame: &mut Frame, area: Rect, data: StatusRenderData) {
    // Split status bar into left and right
    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let position_text = match data.segment {
        Some((current, total)) => format!(" Segment {}/{} ", current, total),
        None => " Segment -/- ".to_string(),
    };

    let bar_style = Style::default().bg(DEFAULT_THEME.current_line_bg);
    let sep_style = bar_style.fg(DEFAULT_THEME.comment);

    let mut left_spans = vec![
        Span::styled(
            position_text,
            Style::default()
                .bg(DEFAULT_THEME.primary)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" | ", sep_style),
        Span::styled(
            format!("{} bytes used", data.occupied_bytes),
            bar_style.fg(DEFAULT_THEME.fg),
        ),
    ];

    if data.skipped_records > 0 {
        left_spans.push(Span::styled(" | ", sep_style));
        left_spans.push(Span::styled(
            format!("{} skipped", data.skipped_records),
            bar_style.fg(DEFAULT_THEME.error),
        ));
    }

    left_spans.push(Span::styled(" | ", sep_style));
    left_spans.push(Span::styled(
        format!(" {} ", data.message),
        bar_style.fg(DEFAULT_THEME.fg),
    ));

    let left_paragraph = Paragraph::new(Line::from(left_spans))
        .style(bar_style)
        .alignment(Alignment::Left);

    frame.render_widget(left_paragraph, layout[0]);

    // Right side: Keybinds with visual grouping
    let key_style = Style::default().bg(DEFAULT_THEME.comment).fg(Color::Black);
    let desc_style = bar_style.fg(DEFAULT_THEME.fg);

    let mut right_spans = vec![
        Span::styled(" ↑/↓ ", key_style),
        Span::styled(" scroll ", desc_style),
        Span::styled("│", sep_style),
        Span::styled(" ", desc_style),
        Span::styled(" ⇞/⇟ ", key_style),
        Span::styled(" page ", desc_style),
        Span::styled("│", sep_style),
        Span::styled(" ", desc_style),
        Span::styled(" n/p ", key_style),
        Span::styled(" segment ", desc_style),
        Span::styled("│", sep_style),
        Span::styled(" ", desc_style),
        Span::styled("q", key_style),
        Span::styled(" quit ", desc_style),
    ];

    if data.at_bottom {
        right_spans.push(Span::styled("│", sep_style));
        right_spans.push(Span::styled(
            " END ",
            Style::default()
                .bg(DEFAULT_THEME.secondary)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ));
    } else if data.at_top {
        right_spans.push(Span::styled("│", sep_style));
        right_spans.push(Span::styled(
            " TOP ",
            Style::default()
                .bg(DEFAULT_THEME.success)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ));
    }

    let right_paragraph = Paragraph::new(Line::from(right_spans))
        .style(bar_style)
        .alignment(Alignment::Right);

    frame.render_widget(right_paragraph, layout[1]);
}
