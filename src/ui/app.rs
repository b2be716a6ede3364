//! Viewer state and event loop

use super::panes::{render_map_pane, render_status_bar, MapRow, StatusRenderData};
use crate::layout::{Glyphs, MapBlock};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::time::Duration;

/// The main application state
pub struct App {
    /// Name shown in the map pane title
    pub file_name: String,

    /// Laid-out segments, in appearance order
    pub blocks: Vec<MapBlock>,

    /// Flattened rows of all blocks
    pub rows: Vec<MapRow>,

    pub glyphs: Glyphs,

    /// Index of the top visible row
    pub scroll: usize,

    /// Rows that fit in the map pane at the last draw
    pub page_height: usize,

    /// Data records the builder skipped
    pub skipped_records: usize,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,
}

impl App {
    pub fn new(
        file_name: String,
        blocks: Vec<MapBlock>,
        glyphs: Glyphs,
        skipped_records: usize,
    ) -> Self {
        let rows = MapRow::build(&blocks);
        App {
            file_name,
            blocks,
            rows,
            glyphs,
            scroll: 0,
            page_height: 1,
            skipped_records,
            should_quit: false,
            status_message: String::from("Ready!"),
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if event::poll(Duration::from_millis(250))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(frame.area());

        let title = format!("{} ({} bytes per cell)", self.file_name, self.bytes_per_cell());
        self.page_height = render_map_pane(
            frame,
            chunks[0],
            &title,
            &self.blocks,
            &self.rows,
            &self.glyphs,
            &mut self.scroll,
        );

        let max_scroll = self.max_scroll();
        render_status_bar(
            frame,
            chunks[1],
            StatusRenderData {
                message: &self.status_message,
                segment: self
                    .current_block()
                    .map(|b| (b + 1, self.blocks.len())),
                occupied_bytes: self.blocks.iter().map(|b| b.occupied_bytes).sum(),
                skipped_records: self.skipped_records,
                at_top: self.scroll == 0,
                at_bottom: self.scroll >= max_scroll,
            },
        );
    }

    /// Handle keyboard events
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.scroll = self.scroll.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.scroll = (self.scroll + 1).min(self.max_scroll());
            }
            KeyCode::PageUp => {
                self.scroll = self.scroll.saturating_sub(self.page_height);
            }
            KeyCode::PageDown | KeyCode::Char(' ') => {
                self.scroll = (self.scroll + self.page_height).min(self.max_scroll());
            }
            KeyCode::Home | KeyCode::Char('g') => {
                self.scroll = 0;
                self.status_message = "Jumped to start".to_string();
            }
            KeyCode::End | KeyCode::Char('G') => {
                self.scroll = self.max_scroll();
                self.status_message = "Jumped to end".to_string();
            }
            KeyCode::Tab | KeyCode::Char('n') => self.next_segment(),
            KeyCode::BackTab | KeyCode::Char('p') => self.prev_segment(),
            _ => {}
        }
    }

    /// Block the top visible row belongs to
    pub fn current_block(&self) -> Option<usize> {
        self.rows
            .iter()
            .skip(self.scroll)
            .find_map(|row| row.block())
    }

    fn next_segment(&mut self) {
        let current = self.current_block().unwrap_or(0);
        match self.header_row(current + 1) {
            Some(row) => {
                self.scroll = row.min(self.max_scroll());
                self.status_message = self.segment_message(current + 1);
            }
            None => self.status_message = "Already at last segment".to_string(),
        }
    }

    fn prev_segment(&mut self) {
        let current = self.current_block().unwrap_or(0);
        let Some(header) = self.header_row(current) else {
            return;
        };
        // Mid-block: go back to this block's title first
        let target = if self.scroll > header || current == 0 {
            current
        } else {
            current - 1
        };
        if let Some(row) = self.header_row(target) {
            self.scroll = row;
            self.status_message = self.segment_message(target);
        }
    }

    fn header_row(&self, block: usize) -> Option<usize> {
        self.rows
            .iter()
            .position(|row| *row == MapRow::Header(block))
    }

    fn segment_message(&self, block: usize) -> String {
        format!(
            "Segment {:#06x}",
            self.blocks[block].segment_base >> crate::constants::SEGMENT_BASE_SHIFT
        )
    }

    fn max_scroll(&self) -> usize {
        self.rows.len().saturating_sub(self.page_height)
    }

    fn bytes_per_cell(&self) -> u32 {
        self.blocks.first().map(|b| b.bytes_per_cell).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{CellState, MapLine};
    use crossterm::event::KeyModifiers;

    fn block(base: u32, lines: usize) -> MapBlock {
        MapBlock {
            segment_base: base,
            window_end: base + 0x1_0000,
            span_start: base,
            span_end: base + lines as u32 * 64,
            bytes_per_cell: 64,
            occupied_bytes: 64,
            lines: (0..lines)
                .map(|i| MapLine {
                    address: base + i as u32 * 64,
                    cells: vec![CellState::Occupied],
                })
                .collect(),
        }
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn app() -> App {
        // Rows: H0, 3 lines, blank, H1, 2 lines, blank, H2, 1 line
        let blocks = vec![block(0, 3), block(0x1_0000, 2), block(0x2_0000, 1)];
        App::new("test.hex".to_string(), blocks, Glyphs::default(), 0)
    }

    #[test]
    fn test_segment_navigation() {
        let mut app = app();
        assert_eq!(app.current_block(), Some(0));

        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.scroll, 5);
        assert_eq!(app.current_block(), Some(1));
        assert_eq!(app.status_message, "Segment 0x1000");

        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.current_block(), Some(2));

        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.status_message, "Already at last segment");

        press(&mut app, KeyCode::Char('p'));
        assert_eq!(app.scroll, 5);
        press(&mut app, KeyCode::Char('p'));
        assert_eq!(app.scroll, 0);
    }

    #[test]
    fn test_scroll_clamps() {
        let mut app = app();
        app.page_height = 4;
        press(&mut app, KeyCode::Up);
        assert_eq!(app.scroll, 0);

        press(&mut app, KeyCode::End);
        assert_eq!(app.scroll, app.rows.len() - 4);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.scroll, app.rows.len() - 4);

        press(&mut app, KeyCode::PageUp);
        assert_eq!(app.scroll, app.rows.len() - 8);
    }

    #[test]
    fn test_quit() {
        let mut app = app();
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }
}
