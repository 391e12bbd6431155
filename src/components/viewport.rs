//! Virtualized pane stack.
//!
//! A [`Viewport`] owns one off-screen buffer per time unit. The panes are laid
//! end-to-end in a virtual column `unit_count * unit_height` rows tall (plus
//! one row for the closing border), and a single `offset` selects which rows
//! land on the physical area. Only panes that intersect the area are copied
//! out, so a frame costs the number of visible panes, not the total.

use std::ops::Range;

use ratatui::{buffer::Buffer, layout::Rect, style::Style, symbols::line};

/// Border shape of a pane, decided by its position in the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaneEdge {
    /// The only pane: top and bottom corners.
    Only,
    First,
    Interior,
    Last,
}

#[derive(Debug)]
pub struct Viewport {
    unit_count: usize,
    unit_height: u16,
    offset: u16,
    area: Rect,
    panes: Vec<Buffer>,
}

impl Viewport {
    /// `unit_height` is at least 2: a rule row plus one content row.
    pub fn new(unit_count: usize, unit_height: u16) -> Self {
        Self {
            unit_count,
            unit_height: unit_height.max(2),
            offset: 0,
            area: Rect::default(),
            panes: Vec::new(),
        }
    }

    pub fn offset(&self) -> u16 {
        self.offset
    }

    pub fn max_offset(&self) -> u16 {
        let units = u16::try_from(self.unit_count.saturating_sub(1)).unwrap_or(u16::MAX);
        units.saturating_mul(self.unit_height)
    }

    /// Move the offset by `delta` rows, clamped to `[0, max_offset]`.
    pub fn scroll(&mut self, delta: i32) {
        let next = (i32::from(self.offset) + delta).clamp(0, i32::from(self.max_offset()));
        self.offset = next as u16;
    }

    /// Scroll so that pane `index` starts at the top of the area.
    pub fn scroll_to_unit(&mut self, index: usize) {
        let top = u16::try_from(index)
            .unwrap_or(u16::MAX)
            .saturating_mul(self.unit_height);
        self.offset = top.min(self.max_offset());
    }

    /// Adopt a new physical area. Pane buffers are only rebuilt when the width
    /// changes; the offset is kept and re-clamped.
    pub fn resize(&mut self, area: Rect) {
        let rebuild = area.width != self.area.width || self.panes.len() != self.unit_count;
        self.area = area;
        if rebuild {
            self.rebuild_panes();
        }
        self.offset = self.offset.min(self.max_offset());
    }

    pub fn set_unit_count(&mut self, unit_count: usize) {
        if unit_count != self.unit_count {
            self.unit_count = unit_count;
            self.rebuild_panes();
            self.offset = self.offset.min(self.max_offset());
        }
    }

    fn rebuild_panes(&mut self) {
        let width = self.area.width;
        self.panes = (0..self.unit_count)
            .map(|i| Buffer::empty(Rect::new(0, 0, width, self.pane_height(i))))
            .collect();
        tracing::debug!(panes = self.unit_count, width, "rebuilt viewport panes");
    }

    /// The last pane carries one extra row for the closing border.
    pub fn pane_height(&self, index: usize) -> u16 {
        if index + 1 == self.unit_count {
            self.unit_height + 1
        } else {
            self.unit_height
        }
    }

    pub fn edge(&self, index: usize) -> PaneEdge {
        let last = index + 1 == self.unit_count;
        match (index == 0, last) {
            (true, true) => PaneEdge::Only,
            (true, false) => PaneEdge::First,
            (false, true) => PaneEdge::Last,
            (false, false) => PaneEdge::Interior,
        }
    }

    /// Physical row of pane `index`'s top edge, relative to the area. Negative
    /// when the pane is scrolled partly or fully above the area.
    pub fn pane_top(&self, index: usize) -> i32 {
        index as i32 * i32::from(self.unit_height) - i32::from(self.offset)
    }

    /// Indices of the panes whose rows intersect `[0, area.height)`.
    pub fn visible_range(&self) -> Range<usize> {
        let unit = usize::from(self.unit_height);
        let offset = usize::from(self.offset);
        let height = usize::from(self.area.height);

        let start = (offset / unit).min(self.unit_count);
        if height == 0 {
            return start..start;
        }
        let end = (offset + height).div_ceil(unit).min(self.unit_count);
        start..end.max(start)
    }

    /// Content rectangle shared by every pane, in pane coordinates.
    pub fn pane_inner(&self) -> Rect {
        Rect::new(
            1,
            1,
            self.area.width.saturating_sub(2),
            self.unit_height.saturating_sub(1),
        )
    }

    /// Clear pane `index`, redraw its border and hand it back for content.
    pub fn reset_pane(&mut self, index: usize, border_style: Style) -> Option<&mut Buffer> {
        let edge = self.edge(index);
        let height = self.pane_height(index);
        let pane = self.panes.get_mut(index)?;
        pane.reset();
        draw_border(pane, edge, height, border_style);
        Some(pane)
    }

    pub fn pane(&self, index: usize) -> Option<&Buffer> {
        self.panes.get(index)
    }

    /// Copy the visible slice of every intersecting pane onto `buf` at the
    /// viewport's area.
    pub fn render(&self, buf: &mut Buffer) {
        let area = self.area;
        for index in self.visible_range() {
            let Some(pane) = self.pane(index) else {
                continue;
            };
            let top = self.pane_top(index);
            let width = pane.area.width.min(area.width);

            for row in 0..pane.area.height {
                let y = top + i32::from(row);
                if y < 0 || y >= i32::from(area.height) {
                    continue;
                }
                let y = area.y + y as u16;
                for x in 0..width {
                    if let (Some(src), Some(dst)) =
                        (pane.cell((x, row)), buf.cell_mut((area.x + x, y)))
                    {
                        *dst = src.clone();
                    }
                }
            }
        }
    }
}

fn draw_border(pane: &mut Buffer, edge: PaneEdge, height: u16, style: Style) {
    let width = pane.area.width;
    if width < 2 || height == 0 {
        return;
    }
    let right = width - 1;

    let (top_left, top_right) = match edge {
        PaneEdge::Only | PaneEdge::First => (line::TOP_LEFT, line::TOP_RIGHT),
        PaneEdge::Interior | PaneEdge::Last => (line::VERTICAL_RIGHT, line::VERTICAL_LEFT),
    };
    put(pane, 0, 0, top_left, style);
    put(pane, right, 0, top_right, style);
    for x in 1..right {
        put(pane, x, 0, line::HORIZONTAL, style);
    }

    let closes = matches!(edge, PaneEdge::Only | PaneEdge::Last);
    let side_end = if closes { height - 1 } else { height };
    for y in 1..side_end {
        put(pane, 0, y, line::VERTICAL, style);
        put(pane, right, y, line::VERTICAL, style);
    }

    if closes && height > 1 {
        let bottom = height - 1;
        put(pane, 0, bottom, line::BOTTOM_LEFT, style);
        put(pane, right, bottom, line::BOTTOM_RIGHT, style);
        for x in 1..right {
            put(pane, x, bottom, line::HORIZONTAL, style);
        }
    }
}

fn put(buf: &mut Buffer, x: u16, y: u16, symbol: &str, style: Style) {
    if let Some(cell) = buf.cell_mut((x, y)) {
        cell.set_symbol(symbol).set_style(style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbol(buf: &Buffer, x: u16, y: u16) -> String {
        buf.cell((x, y)).map(|c| c.symbol().to_string()).unwrap_or_default()
    }

    fn sized(unit_count: usize, unit_height: u16, width: u16, height: u16) -> Viewport {
        let mut viewport = Viewport::new(unit_count, unit_height);
        viewport.resize(Rect::new(0, 0, width, height));
        viewport
    }

    #[test]
    fn scroll_clamps_at_both_ends() {
        let mut viewport = sized(24, 4, 20, 10);
        for _ in 0..200 {
            viewport.scroll(1);
        }
        assert_eq!(viewport.offset(), 92);
        assert_eq!(viewport.max_offset(), 92);

        for _ in 0..200 {
            viewport.scroll(-1);
        }
        assert_eq!(viewport.offset(), 0);
    }

    #[test]
    fn resize_keeps_offset() {
        let mut viewport = sized(24, 4, 20, 10);
        viewport.scroll(30);
        viewport.resize(Rect::new(0, 0, 20, 40));
        assert_eq!(viewport.offset(), 30);
        viewport.resize(Rect::new(0, 0, 50, 3));
        assert_eq!(viewport.offset(), 30);
    }

    #[test]
    fn fewer_units_reclamp_offset() {
        let mut viewport = sized(24, 4, 20, 10);
        viewport.scroll(92);
        viewport.set_unit_count(7);
        assert_eq!(viewport.offset(), 24);
        assert_eq!(viewport.max_offset(), 24);
    }

    #[test]
    fn visible_range_tracks_offset_and_height() {
        let mut viewport = sized(24, 4, 20, 10);
        assert_eq!(viewport.visible_range(), 0..3);

        viewport.scroll(5);
        // Rows 5..15 of the virtual column: panes 1 (4..8) through 3 (12..16).
        assert_eq!(viewport.visible_range(), 1..4);
        assert_eq!(viewport.pane_top(1), -1);

        viewport.scroll(1000);
        assert_eq!(viewport.visible_range(), 23..24);

        viewport.resize(Rect::new(0, 0, 20, 0));
        assert!(viewport.visible_range().is_empty());
    }

    #[test]
    fn border_depends_on_position() {
        let mut viewport = sized(3, 3, 6, 20);
        let style = Style::default();

        let first = viewport.reset_pane(0, style).unwrap().clone();
        assert_eq!(symbol(&first, 0, 0), line::TOP_LEFT);
        assert_eq!(symbol(&first, 5, 0), line::TOP_RIGHT);
        assert_eq!(symbol(&first, 0, 2), line::VERTICAL);

        let middle = viewport.reset_pane(1, style).unwrap().clone();
        assert_eq!(symbol(&middle, 0, 0), line::VERTICAL_RIGHT);
        assert_eq!(symbol(&middle, 5, 0), line::VERTICAL_LEFT);

        let last = viewport.reset_pane(2, style).unwrap().clone();
        assert_eq!(last.area.height, 4);
        assert_eq!(symbol(&last, 0, 3), line::BOTTOM_LEFT);
        assert_eq!(symbol(&last, 5, 3), line::BOTTOM_RIGHT);
        assert_eq!(symbol(&last, 2, 3), line::HORIZONTAL);
    }

    #[test]
    fn single_pane_is_closed_on_both_ends() {
        let mut viewport = sized(1, 2, 4, 5);
        assert_eq!(viewport.edge(0), PaneEdge::Only);
        let pane = viewport.reset_pane(0, Style::default()).unwrap().clone();
        assert_eq!(symbol(&pane, 0, 0), line::TOP_LEFT);
        assert_eq!(symbol(&pane, 0, 2), line::BOTTOM_LEFT);
    }

    #[test]
    fn render_copies_only_visible_rows() {
        let mut viewport = sized(24, 4, 8, 6);
        for i in 0..24 {
            let pane = viewport.reset_pane(i, Style::default()).unwrap();
            pane.set_string(1, 1, format!("{i:02}"), Style::default());
        }
        viewport.scroll(3);

        let mut screen = Buffer::empty(Rect::new(0, 0, 8, 6));
        viewport.render(&mut screen);

        // Pane 0 row 3 lands on screen row 0, pane 1 starts at row 1.
        assert_eq!(symbol(&screen, 0, 0), line::VERTICAL);
        assert_eq!(symbol(&screen, 0, 1), line::VERTICAL_RIGHT);
        assert_eq!(symbol(&screen, 1, 2), "0");
        assert_eq!(symbol(&screen, 2, 2), "1");
        assert_eq!(symbol(&screen, 0, 5), line::VERTICAL_RIGHT);
    }

    #[test]
    fn render_respects_area_origin() {
        let mut viewport = Viewport::new(2, 2);
        viewport.resize(Rect::new(2, 1, 4, 3));
        viewport.reset_pane(0, Style::default());
        viewport.reset_pane(1, Style::default());

        let mut screen = Buffer::empty(Rect::new(0, 0, 10, 6));
        viewport.render(&mut screen);
        assert_eq!(symbol(&screen, 2, 1), line::TOP_LEFT);
        assert_eq!(symbol(&screen, 2, 3), line::VERTICAL_RIGHT);
        assert_eq!(symbol(&screen, 0, 0), " ");
        // Row 4 would be pane 1's closing border, outside the 3-row area.
        assert_eq!(symbol(&screen, 2, 4), " ");
    }

    #[test]
    fn scrolling_does_not_rebuild_panes() {
        let mut viewport = sized(24, 4, 8, 6);
        viewport
            .reset_pane(5, Style::default())
            .unwrap()
            .set_string(2, 2, "x", Style::default());

        viewport.scroll(10);
        viewport.resize(Rect::new(0, 0, 8, 20));
        assert_eq!(symbol(viewport.pane(5).unwrap(), 2, 2), "x");

        viewport.resize(Rect::new(0, 0, 9, 20));
        assert_eq!(symbol(viewport.pane(5).unwrap(), 2, 2), " ");
    }
}
