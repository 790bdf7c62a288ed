#![forbid(unsafe_code)]

//! Presents frames to the terminal.
//!
//! The writer keeps the last presented buffer and only rewrites rows whose
//! cells changed. Each present is queued into a single buffered write and
//! flushed once. A size change (or [`TerminalWriter::invalidate`]) forces a
//! full repaint.

use std::io::{self, BufWriter, Write};

use cform_render::buffer::Buffer;
use cform_render::cell::{Cell, PackedRgba, StyleFlags};
use crossterm::style::{Attribute, Color, Print, SetAttribute, SetBackgroundColor, SetForegroundColor};
use crossterm::{cursor, queue, terminal};

pub struct TerminalWriter<W: Write> {
    out: BufWriter<W>,
    previous: Option<Buffer>,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: BufWriter::new(out),
            previous: None,
        }
    }

    /// Forget the last presented buffer so the next present repaints.
    pub fn invalidate(&mut self) {
        self.previous = None;
    }

    /// Write `buffer`, then show the cursor at `cursor_position` or hide it.
    pub fn present(&mut self, buffer: &Buffer, cursor_position: Option<(u16, u16)>) -> io::Result<()> {
        let full = self
            .previous
            .as_ref()
            .is_none_or(|prev| prev.width() != buffer.width() || prev.height() != buffer.height());

        queue!(self.out, cursor::Hide)?;
        if full {
            queue!(self.out, terminal::Clear(terminal::ClearType::All))?;
        }

        let mut rows_written = 0usize;
        for y in 0..buffer.height() {
            let changed = full
                || self
                    .previous
                    .as_ref()
                    .is_some_and(|prev| !row_eq(prev, buffer, y));
            if changed {
                self.write_row(buffer, y)?;
                rows_written += 1;
            }
        }

        queue!(self.out, SetAttribute(Attribute::Reset))?;
        if let Some((x, y)) = cursor_position {
            queue!(self.out, cursor::MoveTo(x, y), cursor::Show)?;
        }
        self.out.flush()?;

        tracing::trace!(rows_written, full, "frame presented");
        self.previous = Some(buffer.clone());
        Ok(())
    }

    fn write_row(&mut self, buffer: &Buffer, y: u16) -> io::Result<()> {
        queue!(self.out, cursor::MoveTo(0, y), SetAttribute(Attribute::Reset))?;
        let mut current: Option<(PackedRgba, PackedRgba, StyleFlags)> = None;
        for x in 0..buffer.width() {
            let Some(cell) = buffer.get(x, y) else {
                break;
            };
            if cell.is_continuation() {
                continue;
            }
            let key = (cell.fg, cell.bg, cell.attrs);
            if current != Some(key) {
                self.write_style(cell)?;
                current = Some(key);
            }
            let ch = cell.content.as_char().unwrap_or(' ');
            queue!(self.out, Print(ch))?;
        }
        Ok(())
    }

    fn write_style(&mut self, cell: &Cell) -> io::Result<()> {
        queue!(
            self.out,
            SetAttribute(Attribute::Reset),
            SetForegroundColor(to_color(cell.fg)),
            SetBackgroundColor(to_color(cell.bg))
        )?;
        for (flag, attr) in [
            (StyleFlags::BOLD, Attribute::Bold),
            (StyleFlags::DIM, Attribute::Dim),
            (StyleFlags::ITALIC, Attribute::Italic),
            (StyleFlags::UNDERLINE, Attribute::Underlined),
            (StyleFlags::REVERSE, Attribute::Reverse),
        ] {
            if cell.attrs.contains(flag) {
                queue!(self.out, SetAttribute(attr))?;
            }
        }
        Ok(())
    }

    /// Consume the writer, returning the underlying sink.
    pub fn into_inner(self) -> io::Result<W> {
        self.out.into_inner().map_err(io::IntoInnerError::into_error)
    }
}

fn row_eq(a: &Buffer, b: &Buffer, y: u16) -> bool {
    (0..a.width()).all(|x| a.get(x, y) == b.get(x, y))
}

fn to_color(c: PackedRgba) -> Color {
    if c.is_transparent() {
        Color::Reset
    } else {
        Color::Rgb {
            r: c.r(),
            g: c.g(),
            b: c.b(),
        }
    }
}
