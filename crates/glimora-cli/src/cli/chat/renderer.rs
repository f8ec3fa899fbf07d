//! Terminal markdown rendering with syntax-highlighted code blocks.
//!
//! `ChatRenderer` combines `termimad` for prose and `syntect` for code
//! block syntax highlighting. During streaming, fragments are printed raw;
//! full messages (history display) are rendered as formatted markdown.

use std::io::Write;

use syntect::easy::HighlightLines;
use syntect::highlighting::{Style, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::as_24_bit_terminal_escaped;
use termimad::MadSkin;

/// Terminal markdown renderer with syntax highlighting.
pub struct ChatRenderer {
    skin: MadSkin,
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
}

impl ChatRenderer {
    pub fn new() -> Self {
        let mut skin = MadSkin::default_dark();
        skin.inline_code
            .set_fg(termimad::crossterm::style::Color::Yellow);

        Self {
            skin,
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
        }
    }

    /// Render a complete markdown message with syntax-highlighted code
    /// blocks.
    ///
    /// Code fences with a language tag are highlighted via syntect;
    /// everything else is rendered through termimad.
    pub fn render_final(&self, markdown: &str) -> String {
        let mut output = String::new();
        let mut in_code_block = false;
        let mut code_lang = String::new();
        let mut code_buf = String::new();

        for line in markdown.lines() {
            if line.starts_with("```") && !in_code_block {
                in_code_block = true;
                code_lang = line.trim_start_matches('`').trim().to_string();
                code_buf.clear();
            } else if line.starts_with("```") && in_code_block {
                // Closing fence, render the accumulated code
                in_code_block = false;
                let highlighted = self.highlight_code(&code_buf, &code_lang);
                output.push_str(&highlighted);
                output.push('\n');
            } else if in_code_block {
                code_buf.push_str(line);
                code_buf.push('\n');
            } else {
                let rendered = self.skin.term_text(line);
                output.push_str(&format!("{rendered}"));
            }
        }

        // Handle unclosed code block
        if in_code_block && !code_buf.is_empty() {
            let highlighted = self.highlight_code(&code_buf, &code_lang);
            output.push_str(&highlighted);
        }

        output
    }

    /// Print a single streaming fragment (raw, no formatting).
    pub fn print_streaming_fragment(&self, fragment: &str) {
        print!("{fragment}");
        let _ = std::io::stdout().flush();
    }

    /// Print the footer after a completed turn.
    ///
    /// Format: "| {mode} . {time}s"
    pub fn print_turn_footer(&self, mode: &str, response_ms: u64) {
        let seconds = response_ms as f64 / 1000.0;
        let footer = format!(
            "\n  {} {} {} {:.1}s",
            console::style("|").dim(),
            console::style(mode).dim(),
            console::style("\u{00b7}").dim(),
            console::style(seconds).dim(),
        );
        println!("{footer}");
    }

    /// Highlight a code block using syntect.
    fn highlight_code(&self, code: &str, lang: &str) -> String {
        let syntax = if lang.is_empty() {
            self.syntax_set.find_syntax_plain_text()
        } else {
            self.syntax_set
                .find_syntax_by_token(lang)
                .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text())
        };

        let theme = &self.theme_set.themes["base16-ocean.dark"];
        let mut h = HighlightLines::new(syntax, theme);

        let mut output = String::new();
        output.push_str(&format!(
            "  {}\n",
            console::style(format!("--- {lang} ---")).dim()
        ));

        for line in code.lines() {
            let ranges: Vec<(Style, &str)> = h
                .highlight_line(line, &self.syntax_set)
                .unwrap_or_default();
            let escaped = as_24_bit_terminal_escaped(&ranges[..], false);
            output.push_str(&format!("  {escaped}\x1b[0m\n"));
        }

        output
    }
}
