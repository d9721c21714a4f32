use crate::render::{Frame, Renderer, begin_frame, finish_frame};
use std::io::Write;

const HALF_BLOCK: char = '\u{2580}';

/// Two surface pixels per cell: the top one as foreground of an upper
/// half block, the bottom one as background.
pub struct HalfBlockRenderer {
    last_fg: Option<(u8, u8, u8)>,
    last_bg: Option<(u8, u8, u8)>,
}

impl HalfBlockRenderer {
    pub fn new() -> Self {
        Self {
            last_fg: None,
            last_bg: None,
        }
    }
}

impl Default for HalfBlockRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for HalfBlockRenderer {
    fn name(&self) -> &'static str {
        "halfblock"
    }

    fn cell_size(&self) -> (usize, usize) {
        (1, 2)
    }

    fn render(&mut self, frame: &Frame<'_>, out: &mut dyn Write) -> anyhow::Result<()> {
        // A resize can land between drawing and presenting; drop that frame.
        if !frame.fits(self.cell_size()) {
            return Ok(());
        }

        begin_frame(frame, out)?;
        self.last_fg = None;
        self.last_bg = None;

        let cols = frame.term_cols as usize;
        for row in 0..frame.visual_rows as usize {
            for x in 0..cols {
                let top = frame.rgb_at(x, row * 2);
                let bottom = frame.rgb_at(x, row * 2 + 1);

                if self.last_fg != Some(top) {
                    write!(out, "\x1b[38;2;{};{};{}m", top.0, top.1, top.2)?;
                    self.last_fg = Some(top);
                }
                if self.last_bg != Some(bottom) {
                    write!(out, "\x1b[48;2;{};{};{}m", bottom.0, bottom.1, bottom.2)?;
                    self.last_bg = Some(bottom);
                }
                write!(out, "{HALF_BLOCK}")?;
            }
            out.write_all(b"\r\n")?;
        }

        finish_frame(frame, out)
    }
}
