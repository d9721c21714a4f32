mod braille;
mod halfblock;

pub use braille::BrailleRenderer;
pub use halfblock::HalfBlockRenderer;

use std::io::Write;

pub struct Frame<'a> {
    pub term_cols: u16,
    pub term_rows: u16,
    pub visual_rows: u16,
    pub pixel_width: usize,
    pub pixel_height: usize,
    pub pixels_rgba: &'a [u8],
    pub hud: &'a str,
    pub hud_rows: u16,
    pub overlay: Option<&'a str>,
    pub sync_updates: bool,
}

impl Frame<'_> {
    /// True when the pixel buffer matches the cell grid at `cell` pixels per cell.
    pub fn fits(&self, cell: (usize, usize)) -> bool {
        let cols = self.term_cols as usize;
        let rows = self.visual_rows as usize;
        let w = self.pixel_width;
        let h = self.pixel_height;
        cols > 0
            && rows > 0
            && w == cols.saturating_mul(cell.0)
            && h == rows.saturating_mul(cell.1)
            && self.pixels_rgba.len() >= w.saturating_mul(h).saturating_mul(4)
    }

    #[inline]
    pub fn rgb_at(&self, x: usize, y: usize) -> (u8, u8, u8) {
        let i = (y * self.pixel_width + x) * 4;
        (self.pixels_rgba[i], self.pixels_rgba[i + 1], self.pixels_rgba[i + 2])
    }
}

pub trait Renderer {
    fn name(&self) -> &'static str;
    /// Surface pixels covered by one terminal cell, as (width, height).
    fn cell_size(&self) -> (usize, usize);
    fn render(&mut self, frame: &Frame<'_>, out: &mut dyn Write) -> anyhow::Result<()>;
}

/// Sync-begin, home, reset and autowrap off.
pub(crate) fn begin_frame(frame: &Frame<'_>, out: &mut dyn Write) -> anyhow::Result<()> {
    if frame.sync_updates {
        out.write_all(b"\x1b[?2026h")?;
    }
    out.write_all(b"\x1b[H\x1b[0m")?;
    // Disable autowrap (DECAWM) while we paint full-width rows; some terminals will otherwise
    // wrap when the last column is written, and the subsequent newline creates visible gaps.
    out.write_all(b"\x1b[?7l")?;
    Ok(())
}

/// HUD rows, overlay, autowrap restore, sync-end and flush.
pub(crate) fn finish_frame(frame: &Frame<'_>, out: &mut dyn Write) -> anyhow::Result<()> {
    let cols = frame.term_cols as usize;
    let visual_rows = frame.visual_rows as usize;
    let mut hud_lines = frame.hud.lines();
    for i in 0..(frame.hud_rows as usize) {
        write_hud_line(out, visual_rows + i + 1, cols, hud_lines.next())?;
    }

    if let Some(text) = frame.overlay {
        draw_overlay_popup(out, frame.term_cols, frame.term_rows, text)?;
    }

    out.write_all(b"\x1b[?7h")?;
    if frame.sync_updates {
        out.write_all(b"\x1b[?2026l")?;
    }
    out.flush()?;
    Ok(())
}

pub(crate) fn write_hud_line(
    out: &mut dyn Write,
    row: usize,
    cols: usize,
    line: Option<&str>,
) -> anyhow::Result<()> {
    write!(out, "\x1b[{};1H\x1b[0m\x1b[38;2;148;163;184m\x1b[48;2;2;6;23m\x1b[2K", row)?;
    if let Some(line) = line {
        let clipped: String = line.chars().take(cols).collect();
        write!(out, "{clipped}")?;
    }
    out.write_all(b"\x1b[0m")?;
    Ok(())
}

pub fn draw_overlay_popup(
    out: &mut dyn Write,
    term_cols: u16,
    term_rows: u16,
    text: &str,
) -> anyhow::Result<()> {
    if text.trim().is_empty() {
        return Ok(());
    }

    let cols = term_cols as usize;
    let rows = term_rows as usize;
    if cols < 8 || rows < 4 {
        return Ok(());
    }

    let max_inner_w = cols.saturating_sub(6).max(1);
    let mut lines: Vec<String> = Vec::new();
    for raw in text.lines() {
        if raw.is_empty() {
            lines.push(String::new());
            continue;
        }
        let chars: Vec<char> = raw.chars().collect();
        for chunk in chars.chunks(max_inner_w) {
            lines.push(chunk.iter().collect());
        }
    }
    if lines.is_empty() {
        return Ok(());
    }

    let inner_w = lines
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0)
        .clamp(1, max_inner_w);
    let box_w = (inner_w + 4).min(cols.saturating_sub(2)).max(4);
    let inner_w = box_w.saturating_sub(4);
    let body_h = lines.len().min(rows.saturating_sub(3).max(1));
    let box_h = (body_h + 2).min(rows.saturating_sub(1)).max(3);

    let start_col = (cols.saturating_sub(box_w)) / 2 + 1;
    let start_row = (rows.saturating_sub(box_h)) / 2 + 1;

    let horiz = "-".repeat(box_w.saturating_sub(2));
    let blank = " ".repeat(inner_w);

    // The field keeps animating around the box; only the box itself is opaque.
    out.write_all(b"\x1b[0m\x1b[38;2;226;232;240m\x1b[48;2;15;23;42m")?;
    write!(out, "\x1b[{};{}H+{}+", start_row, start_col, horiz)?;

    for (i, line) in lines.iter().take(body_h).enumerate() {
        let row = start_row + 1 + i;
        write!(out, "\x1b[{};{}H| {} |", row, start_col, blank)?;
        if i == 0 {
            write!(
                out,
                "\x1b[{};{}H\x1b[1m\x1b[38;2;94;234;212m{}\x1b[22m\x1b[38;2;226;232;240m",
                row,
                start_col + 2,
                line
            )?;
        } else {
            write!(out, "\x1b[{};{}H{}", row, start_col + 2, line)?;
        }
    }

    write!(out, "\x1b[{};{}H+{}+", start_row + box_h - 1, start_col, horiz)?;
    out.write_all(b"\x1b[0m")?;
    Ok(())
}
