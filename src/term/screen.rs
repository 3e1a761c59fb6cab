//! Screen: flushes a canvas to the real terminal.
//!
//! Keeps the previous frame and only rewrites changed spans; a size change
//! or an explicit invalidation forces a full redraw.

use std::io::{self, Write};

use anyhow::Result;
use crossterm::{
    cursor,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, QueueableCommand,
};

use crate::term::canvas::{Canvas, Rgb, TextStyle};

pub struct Screen {
    stdout: io::Stdout,
    prev: Option<Canvas>,
}

impl Screen {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            prev: None,
        }
    }

    /// Enter raw mode on the alternate screen.
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.stdout.queue(terminal::EnterAlternateScreen)?;
        self.stdout.queue(cursor::Hide)?;
        self.stdout.queue(terminal::DisableLineWrap)?;
        self.stdout.flush()?;
        Ok(())
    }

    /// Restore the terminal. Safe to call after a failed `enter`.
    pub fn exit(&mut self) -> Result<()> {
        self.stdout.queue(ResetColor)?;
        self.stdout.queue(SetAttribute(Attribute::Reset))?;
        self.stdout.queue(terminal::EnableLineWrap)?;
        self.stdout.queue(cursor::Show)?;
        self.stdout.queue(terminal::LeaveAlternateScreen)?;
        self.stdout.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Force the next `present` to redraw everything (e.g. after resize).
    pub fn invalidate(&mut self) {
        self.prev = None;
    }

    /// Flush a frame, diffing against the previous one when sizes match.
    pub fn present(&mut self, canvas: &Canvas) -> Result<()> {
        match self.prev.take() {
            Some(prev)
                if prev.width() == canvas.width() && prev.height() == canvas.height() =>
            {
                self.flush_diff(canvas, &prev)?;
            }
            _ => self.flush_full(canvas)?,
        }
        self.prev = Some(canvas.clone());
        Ok(())
    }

    fn flush_full(&mut self, canvas: &Canvas) -> Result<()> {
        self.stdout
            .queue(terminal::Clear(terminal::ClearType::All))?;

        let mut style: Option<TextStyle> = None;
        for y in 0..canvas.height() {
            self.stdout.queue(cursor::MoveTo(0, y))?;
            for x in 0..canvas.width() {
                let glyph = canvas.get(x, y).unwrap_or_default();
                if style != Some(glyph.style) {
                    self.queue_style(glyph.style)?;
                    style = Some(glyph.style);
                }
                self.stdout.queue(Print(glyph.ch))?;
            }
        }

        self.finish_frame()
    }

    fn flush_diff(&mut self, next: &Canvas, prev: &Canvas) -> Result<()> {
        let mut style: Option<TextStyle> = None;

        for y in 0..next.height() {
            let mut x = 0;
            while x < next.width() {
                if prev.get(x, y) == next.get(x, y) {
                    x += 1;
                    continue;
                }
                // One cursor move per changed span.
                self.stdout.queue(cursor::MoveTo(x, y))?;
                while x < next.width() && prev.get(x, y) != next.get(x, y) {
                    let glyph = next.get(x, y).unwrap_or_default();
                    if style != Some(glyph.style) {
                        self.queue_style(glyph.style)?;
                        style = Some(glyph.style);
                    }
                    self.stdout.queue(Print(glyph.ch))?;
                    x += 1;
                }
            }
        }

        self.finish_frame()
    }

    fn queue_style(&mut self, style: TextStyle) -> Result<()> {
        self.stdout.queue(SetAttribute(Attribute::Reset))?;
        self.stdout.queue(SetForegroundColor(color(style.fg)))?;
        self.stdout.queue(SetBackgroundColor(color(style.bg)))?;
        if style.bold {
            self.stdout.queue(SetAttribute(Attribute::Bold))?;
        }
        if style.dim {
            self.stdout.queue(SetAttribute(Attribute::Dim))?;
        }
        Ok(())
    }

    fn finish_frame(&mut self) -> Result<()> {
        self.stdout.queue(ResetColor)?;
        self.stdout.queue(SetAttribute(Attribute::Reset))?;
        self.stdout.flush()?;
        Ok(())
    }
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

fn color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_conversion() {
        let rgb = Rgb::new(10, 20, 30);
        assert_eq!(
            color(rgb),
            Color::Rgb {
                r: 10,
                g: 20,
                b: 30
            }
        );
    }
}
