use crate::render::{Frame, Renderer, begin_frame, finish_frame};
use std::io::Write;

const DOT_BITS: [u8; 8] = [0x01, 0x08, 0x02, 0x10, 0x04, 0x20, 0x40, 0x80];

/// Dots brighter than the background by this much light up.
const LIT_MARGIN: u16 = 24;

/// 2x4 dots per cell. Suits the sparse field: dark cells stay blank and lit
/// particles become individual dots in their average colour.
pub struct BrailleRenderer {
    background: (u8, u8, u8),
    last_fg: Option<(u8, u8, u8)>,
    last_bg: Option<(u8, u8, u8)>,
}

impl BrailleRenderer {
    pub fn new(background: [u8; 3]) -> Self {
        Self {
            background: (background[0], background[1], background[2]),
            last_fg: None,
            last_bg: None,
        }
    }
}

impl Renderer for BrailleRenderer {
    fn name(&self) -> &'static str {
        "braille"
    }

    fn cell_size(&self) -> (usize, usize) {
        (2, 4)
    }

    fn render(&mut self, frame: &Frame<'_>, out: &mut dyn Write) -> anyhow::Result<()> {
        if !frame.fits(self.cell_size()) {
            return Ok(());
        }

        begin_frame(frame, out)?;
        self.last_fg = None;
        self.last_bg = None;

        let bg = self.background;
        let floor = luma_u16(bg.0, bg.1, bg.2) + LIT_MARGIN;
        let cols = frame.term_cols as usize;

        for row in 0..frame.visual_rows as usize {
            for col in 0..cols {
                let mut bits: u8 = 0;
                let (mut r, mut g, mut b, mut lit) = (0u32, 0u32, 0u32, 0u32);

                for dy in 0..4usize {
                    for dx in 0..2usize {
                        let px = frame.rgb_at(col * 2 + dx, row * 4 + dy);
                        if luma_u16(px.0, px.1, px.2) < floor {
                            continue;
                        }
                        bits |= DOT_BITS[dy * 2 + dx];
                        r += px.0 as u32;
                        g += px.1 as u32;
                        b += px.2 as u32;
                        lit += 1;
                    }
                }

                let (fg, ch) = if lit == 0 {
                    (bg, ' ')
                } else {
                    let fg = ((r / lit) as u8, (g / lit) as u8, (b / lit) as u8);
                    (fg, char::from_u32(0x2800 + bits as u32).unwrap_or(' '))
                };

                if self.last_fg != Some(fg) {
                    write!(out, "\x1b[38;2;{};{};{}m", fg.0, fg.1, fg.2)?;
                    self.last_fg = Some(fg);
                }
                if self.last_bg != Some(bg) {
                    write!(out, "\x1b[48;2;{};{};{}m", bg.0, bg.1, bg.2)?;
                    self.last_bg = Some(bg);
                }
                write!(out, "{ch}")?;
            }
            out.write_all(b"\r\n")?;
        }

        finish_frame(frame, out)
    }
}

#[inline]
fn luma_u16(r: u8, g: u8, b: u8) -> u16 {
    // Approx Rec.709 luma using integer math (0..255).
    let y = (r as u32 * 54 + g as u32 * 183 + b as u32 * 19) >> 8;
    y as u16
}
