//! Map pane rendering
//!
//! Draws the laid-out blocks as one scrollable list: a title row per segment
//! followed by its address-labelled cell rows, with a blank row between
//! segments.

use crate::layout::{CellState, Glyphs, MapBlock, MapLine};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Padding},
    Frame,
};

/// One visual row of the map pane
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapRow {
    /// Segment title of block `n`
    Header(usize),
    /// Line `line` of block `block`
    Cells { block: usize, line: usize },
    Blank,
}

impl MapRow {
    /// Flatten blocks into rows, in block order
    pub fn build(blocks: &[MapBlock]) -> Vec<MapRow> {
        let mut rows = Vec::new();
        for (block, b) in blocks.iter().enumerate() {
            if block > 0 {
                rows.push(MapRow::Blank);
            }
            rows.push(MapRow::Header(block));
            rows.extend((0..b.lines.len()).map(|line| MapRow::Cells { block, line }));
        }
        rows
    }

    /// Index of the block this row belongs to
    pub fn block(self) -> Option<usize> {
        match self {
            MapRow::Header(block) | MapRow::Cells { block, .. } => Some(block),
            MapRow::Blank => None,
        }
    }
}

/// Render the map pane.
///
/// Returns the number of rows that fit, so the caller can page by it.
pub fn render_map_pane(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    blocks: &[MapBlock],
    rows: &[MapRow],
    glyphs: &Glyphs,
    scroll_offset: &mut usize,
) -> usize {
    let pane = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(
            Style::default()
                .fg(DEFAULT_THEME.border_focused)
                .add_modifier(Modifier::BOLD),
        )
        .padding(Padding::new(1, 0, 0, 0));

    let visible_height = area.height.saturating_sub(2).max(1) as usize; // Account for borders, min 1

    // Clamp scroll offset only if content exceeds visible area
    if rows.len() > visible_height {
        let max_scroll = rows.len() - visible_height;
        *scroll_offset = (*scroll_offset).min(max_scroll);
    } else {
        *scroll_offset = 0;
    }

    let items: Vec<ListItem> = rows
        .iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|row| match *row {
            MapRow::Header(b) => ListItem::new(Line::from(Span::styled(
                blocks[b].header(),
                Style::default()
                    .fg(DEFAULT_THEME.header)
                    .add_modifier(Modifier::BOLD),
            ))),
            MapRow::Cells { block, line } => {
                ListItem::new(styled_line(&blocks[block].lines[line], glyphs))
            }
            MapRow::Blank => ListItem::new(""),
        })
        .collect();

    frame.render_widget(List::new(items).block(pane), area);
    visible_height
}

/// Address label followed by runs of same-state cells
fn styled_line(line: &MapLine, glyphs: &Glyphs) -> Line<'static> {
    let mut spans = vec![Span::styled(
        format!("{}  ", line.label()),
        Style::default().fg(DEFAULT_THEME.comment),
    )];

    let mut cells = line.cells.iter().peekable();
    while let Some(&state) = cells.next() {
        let mut run = String::new();
        run.push(state.glyph(glyphs));
        while let Some(&&next) = cells.peek() {
            if next != state {
                break;
            }
            run.push(next.glyph(glyphs));
            cells.next();
        }

        let color = match state {
            CellState::Occupied => DEFAULT_THEME.occupied,
            CellState::Free => DEFAULT_THEME.free,
        };
        spans.push(Span::styled(run, Style::default().fg(color)));
    }

    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(lines: usize) -> MapBlock {
        MapBlock {
            segment_base: 0,
            window_end: 0x1_0000,
            span_start: 0,
            span_end: lines as u32 * 4,
            bytes_per_cell: 4,
            occupied_bytes: 1,
            lines: (0..lines)
                .map(|i| MapLine {
                    address: i as u32 * 4,
                    cells: vec![CellState::Occupied],
                })
                .collect(),
        }
    }

    #[test]
    fn test_rows_separate_blocks() {
        let rows = MapRow::build(&[block(2), block(1)]);
        assert_eq!(
            rows,
            vec![
                MapRow::Header(0),
                MapRow::Cells { block: 0, line: 0 },
                MapRow::Cells { block: 0, line: 1 },
                MapRow::Blank,
                MapRow::Header(1),
                MapRow::Cells { block: 1, line: 0 },
            ]
        );
        assert_eq!(rows[3].block(), None);
        assert_eq!(rows[5].block(), Some(1));
    }

    #[test]
    fn test_styled_line_groups_runs() {
        let line = MapLine {
            address: 0x40,
            cells: vec![
                CellState::Occupied,
                CellState::Occupied,
                CellState::Free,
                CellState::Occupied,
            ],
        };
        let styled = styled_line(&line, &Glyphs::default());
        let texts: Vec<String> = styled.spans.iter().map(|s| s.content.to_string()).collect();
        assert_eq!(texts, vec!["0x000040  ", "▓▓", "░", "▓"]);
    }
}
