//! Terminal output surface for display frames

use std::io::{self, Write};

use tracing::debug;

use super::layout::LayoutClass;
use super::projector::DisplayFrame;

/// Something that can show a display frame.
///
/// The poll task only talks to this trait, so tests can substitute a
/// recording surface.
pub trait DisplaySurface {
    fn apply(&mut self, frame: &DisplayFrame);
}

/// ANSI true-color terminal surface.
///
/// Redraws only when the frame actually changed; applying the same frame
/// twice writes nothing.
pub struct TerminalSurface<W: Write = io::Stdout> {
    out: W,
    last_frame: Option<DisplayFrame>,
}

impl TerminalSurface {
    pub fn stdout() -> Self {
        Self {
            out: io::stdout(),
            last_frame: None,
        }
    }
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            last_frame: None,
        }
    }

    fn draw(&mut self, frame: &DisplayFrame) -> io::Result<()> {
        let font = color_code(&frame.font_color);
        let low = color_code(&frame.low_time_color);

        // Set the background, then clear so the fill takes it, then repaint.
        write!(
            self.out,
            "{}\x1b[2J\x1b[H",
            background_code(&frame.background_color)
        )?;
        if let Some(image) = &frame.background_image {
            writeln!(self.out, "{}background: {}\x1b[0m", font, image)?;
        }

        for (id, slot) in &frame.timers {
            if !slot.visible {
                continue;
            }
            let color = if slot.low_time_style || slot.times_up_style {
                &low
            } else {
                &font
            };
            let layout = match slot.layout_class {
                Some(LayoutClass::SingleActive) => " [single]",
                Some(LayoutClass::DualActive) => " [dual]",
                None => "",
            };
            let run_state = if slot.running {
                "running"
            } else if slot.paused {
                "paused"
            } else {
                "stopped"
            };
            let logo = slot
                .logo
                .as_deref()
                .map(|l| format!("  ({})", l))
                .unwrap_or_default();

            writeln!(
                self.out,
                "{}Timer {}{}  {}  {}{}\x1b[0m",
                color, id, layout, slot.value_text, run_state, logo
            )?;
        }
        self.out.flush()
    }
}

impl<W: Write> DisplaySurface for TerminalSurface<W> {
    fn apply(&mut self, frame: &DisplayFrame) {
        if self.last_frame.as_ref() == Some(frame) {
            return;
        }
        if let Err(e) = self.draw(frame) {
            debug!("Failed to write frame to terminal: {}", e);
        }
        self.last_frame = Some(frame.clone());
    }
}

/// Translate a `#RRGGBB` theme color into an ANSI true-color escape.
/// Unparseable colors fall back to the terminal default.
fn color_code(hex: &str) -> String {
    match parse_hex_color(hex) {
        Some((r, g, b)) => format!("\x1b[38;2;{};{};{}m", r, g, b),
        None => "\x1b[0m".to_string(),
    }
}

fn background_code(hex: &str) -> String {
    match parse_hex_color(hex) {
        Some((r, g, b)) => format!("\x1b[48;2;{};{};{}m", r, g, b),
        None => String::new(),
    }
}

fn parse_hex_color(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.strip_prefix('#')?;
    // Length is in bytes, so non-ASCII input must be rejected before the
    // byte-indexed slicing below.
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::layout::LayoutMode;
    use std::collections::BTreeMap;

    fn frame(text: &str) -> DisplayFrame {
        let mut timers = BTreeMap::new();
        timers.insert(
            "1".to_string(),
            crate::render::projector::TimerDisplay {
                visible: true,
                value_text: text.to_string(),
                times_up_style: false,
                low_time_style: false,
                running: true,
                paused: false,
                logo: None,
                layout_class: Some(LayoutClass::SingleActive),
            },
        );
        DisplayFrame {
            background_color: "#000000".to_string(),
            font_color: "#FFFFFF".to_string(),
            low_time_color: "#FF4444".to_string(),
            background_image: None,
            layout: LayoutMode::Single,
            timers,
        }
    }

    #[test]
    fn parses_hex_colors() {
        assert_eq!(parse_hex_color("#FF4444"), Some((255, 68, 68)));
        assert_eq!(parse_hex_color("#000000"), Some((0, 0, 0)));
        assert_eq!(parse_hex_color("red"), None);
        assert_eq!(parse_hex_color("#12345"), None);
    }

    #[test]
    fn non_ascii_colors_fall_back_instead_of_panicking() {
        // Six bytes but not six ASCII chars; must not split a char boundary.
        assert_eq!(parse_hex_color("#a\u{e9}a\u{e9}"), None);
        assert_eq!(parse_hex_color("#ffff\u{e9}"), None);
        assert_eq!(color_code("#a\u{e9}a\u{e9}"), "\x1b[0m");
    }

    #[test]
    fn identical_frames_are_drawn_once() {
        let mut surface = TerminalSurface::new(Vec::new());
        let frame = frame("05:00");

        surface.apply(&frame);
        let after_first = surface.out.len();
        assert!(after_first > 0);

        surface.apply(&frame);
        assert_eq!(surface.out.len(), after_first);
    }

    #[test]
    fn changed_frames_are_redrawn() {
        let mut surface = TerminalSurface::new(Vec::new());
        surface.apply(&frame("05:00"));
        let after_first = surface.out.len();

        surface.apply(&frame("04:59"));
        assert!(surface.out.len() > after_first);
        let output = String::from_utf8(surface.out.clone()).unwrap();
        assert!(output.contains("04:59"));
        assert!(output.contains("[single]"));
    }
}
