//! Markdown output for the terminal.
//!
//! Rich mode styles list output with termimad; plain mode writes the
//! markdown unchanged so it can be piped or asserted on.

use termimad::{crossterm::style::Color, MadSkin};

pub struct TerminalRenderer {
    skin: Option<MadSkin>,
}

impl TerminalRenderer {
    pub fn new(rich_enabled: bool) -> Self {
        Self {
            skin: rich_enabled.then(Self::skin),
        }
    }

    fn skin() -> MadSkin {
        let mut skin = MadSkin::default();
        skin.set_headers_fg(Color::Cyan);
        skin.bold.set_fg(Color::Yellow);
        skin.italic.set_fg(Color::Magenta);
        skin.inline_code.set_fg(Color::AnsiValue(244));
        skin.inline_code.set_bg(Color::Reset);
        skin
    }

    pub fn is_rich(&self) -> bool {
        self.skin.is_some()
    }

    pub fn render(&self, markdown: &str) {
        let Some(skin) = &self.skin else {
            print!("{markdown}");
            return;
        };

        for line in markdown.lines() {
            if line.starts_with('#') {
                println!("\x1b[36m{line}\x1b[0m");
            } else {
                skin.print_inline(&decorate_checkbox(line));
                println!();
            }
        }
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Swaps the leading checklist marker for a glyph, striking through done rows.
fn decorate_checkbox(line: &str) -> String {
    let body = line.trim_start();
    let indent = &line[..line.len() - body.len()];
    if let Some(rest) = body.strip_prefix("- [x] ") {
        format!("{indent}✔ ~~{rest}~~")
    } else if let Some(rest) = body.strip_prefix("- [ ] ") {
        format!("{indent}☐ {rest}")
    } else {
        line.to_string()
    }
}
