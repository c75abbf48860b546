//! Terminal presentation for documents, search results and search state.
//!
//! Everything here renders to `String` so the output can be tested without a
//! terminal; `main.rs` decides where it is printed. Colours are applied only
//! when [`TerminalRenderer::color`] is enabled (by default: stdout is a TTY).

use owo_colors::{OwoColorize, Style};
use std::io::IsTerminal;
use std::time::Duration;
use tokio::sync::watch;

use crate::models::{Article, Block, CodeBlock, Document, OrchestratorState, SearchResult, TextRun};

/// Get the current terminal width.
pub fn terminal_width() -> usize {
    terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(100)
}

/// Check if stdout is a terminal.
pub fn is_terminal() -> bool {
    std::io::stdout().is_terminal()
}

/// Status icons for the search lifecycle.
pub fn status_icon(state: &OrchestratorState) -> &'static str {
    match state {
        OrchestratorState::Idle => "○",
        OrchestratorState::Loading { .. } => "◐",
        OrchestratorState::Success { .. } => "✓",
        OrchestratorState::Failure { .. } => "✗",
    }
}

/// Truncate text to fit within the specified width using unicode-aware truncation.
pub fn truncate_with_ellipsis(text: &str, max_width: usize) -> String {
    if max_width <= 3 {
        return "...".to_string();
    }

    if unicode_width::UnicodeWidthStr::width(text) <= max_width {
        return text.to_string();
    }

    let budget = max_width - 3;
    let mut used = 0;
    let mut truncated = String::new();

    for c in text.chars() {
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(1);
        if used + w > budget {
            break;
        }
        used += w;
        truncated.push(c);
    }

    format!("{}...", truncated)
}

/// Renders answer documents and their sources as terminal text
#[derive(Debug, Clone)]
pub struct TerminalRenderer {
    color: bool,
    width: usize,
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalRenderer {
    /// Renderer sized to the current terminal, coloured when stdout is a TTY
    pub fn new() -> Self {
        Self {
            color: is_terminal(),
            width: terminal_width(),
        }
    }

    /// Enable or disable ANSI colours
    pub fn color(mut self, enabled: bool) -> Self {
        self.color = enabled;
        self
    }

    /// Override the line width used to truncate article titles
    pub fn width(mut self, width: usize) -> Self {
        self.width = width.max(20);
        self
    }

    fn paint(&self, text: &str, style: Style) -> String {
        if self.color {
            text.style(style).to_string()
        } else {
            text.to_string()
        }
    }

    fn section(&self, title: &str) -> String {
        self.paint(&format!("━━━ {} ━━━", title), Style::new().bold().cyan())
    }

    /// Render a document, one block after another
    pub fn render_document(&self, document: &Document) -> String {
        let mut out = String::new();

        for (i, block) in document.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            self.render_block(block, &mut out);
        }

        out
    }

    fn render_block(&self, block: &Block, out: &mut String) {
        match block {
            Block::Heading {
                text,
                trailing_code,
            } => {
                out.push_str(&self.paint(text, Style::new().bold().underline()));
                out.push('\n');
                if let Some(code) = trailing_code {
                    self.render_code(code, out);
                }
            }
            Block::Code(code) => self.render_code(code, out),
            Block::Paragraph { runs } => {
                for run in runs {
                    match run {
                        TextRun::Text { value } => out.push_str(value),
                        TextRun::Citation { number } => out.push_str(
                            &self.paint(&format!("[{}]", number), Style::new().cyan().bold()),
                        ),
                    }
                }
                out.push('\n');
            }
        }
    }

    fn render_code(&self, code: &CodeBlock, out: &mut String) {
        let gutter = self.paint("│", Style::new().dimmed());

        out.push_str(&self.paint(&format!("┌─ {}", code.language), Style::new().dimmed()));
        out.push('\n');
        for line in code.code.lines() {
            out.push_str(&format!("{} {}\n", gutter, self.paint(line, Style::new().green())));
        }
        out.push_str(&self.paint("└─", Style::new().dimmed()));
        out.push('\n');
    }

    /// Render the sources section: the featured article, then the rest in order
    pub fn render_sources(&self, result: &SearchResult) -> String {
        let mut out = String::new();

        let Some(featured) = result.featured_article() else {
            return out;
        };

        out.push_str(&self.section("Sources"));
        out.push('\n');
        self.render_article(featured, "★", true, &mut out);

        for (i, article) in result.other_articles().iter().enumerate() {
            self.render_article(article, &format!("{}.", i + 2), false, &mut out);
        }

        out
    }

    fn render_article(&self, article: &Article, marker: &str, featured: bool, out: &mut String) {
        let title_width = self.width.saturating_sub(marker.chars().count() + 1);
        let title = truncate_with_ellipsis(&article.title, title_width);
        let title_style = if featured {
            Style::new().bold().yellow()
        } else {
            Style::new().bold()
        };

        out.push_str(&format!(
            "{} {}\n",
            self.paint(marker, Style::new().yellow()),
            self.paint(&title, title_style)
        ));

        let mut meta = vec![article.source_name.clone()];
        if let Some(domain) = article.domain() {
            meta.push(domain);
        }
        if let Some(author) = article.author.as_deref().filter(|_| article.has_author()) {
            meta.push(author.to_string());
        }
        meta.push(article.published_at.format("%Y-%m-%d").to_string());

        out.push_str(&format!("   {}\n", self.paint(&meta.join(" · "), Style::new().dimmed())));
        out.push_str(&format!("   {}\n", self.paint(&article.url, Style::new().blue().underline())));

        let dim = Style::new().dimmed();
        out.push_str(&format!(
            "   {}\n",
            self.paint(&format!("image: {}", article.image_or_placeholder(featured)), dim)
        ));
        if featured {
            if let Some(favicon) = article.favicon_url() {
                out.push_str(&format!("   {}\n", self.paint(&format!("icon: {}", favicon), dim)));
            }
        }
    }

    /// Render a full result: answer, then sources
    pub fn render_result(&self, result: &SearchResult) -> String {
        let mut out = self.render_document(&result.document);

        if result.has_articles() {
            out.push('\n');
            out.push_str(&self.render_sources(result));
        }

        out
    }

    /// One-line summary of the search state
    pub fn status_line(&self, state: &OrchestratorState) -> String {
        let icon = status_icon(state);

        match state {
            OrchestratorState::Idle => format!("{} Ready", self.paint(icon, Style::new().dimmed())),
            OrchestratorState::Loading { query } => format!(
                "{} Searching for \"{}\"...",
                self.paint(icon, Style::new().cyan()),
                query
            ),
            OrchestratorState::Success { result } => format!(
                "{} Answered \"{}\" with {} source{}",
                self.paint(icon, Style::new().green().bold()),
                result.query,
                result.articles.len(),
                if result.articles.len() == 1 { "" } else { "s" }
            ),
            OrchestratorState::Failure { message, .. } => {
                format!("{} {}", self.paint(icon, Style::new().red().bold()), message)
            }
        }
    }

    /// Render whatever the state has to show
    pub fn render_state(&self, state: &OrchestratorState) -> String {
        match state {
            OrchestratorState::Success { result } => self.render_result(result),
            other => format!("{}\n", self.status_line(other)),
        }
    }
}

/// Loading spinner that follows the orchestrator's state channel
pub struct SearchSpinner {
    pb: indicatif::ProgressBar,
}

impl SearchSpinner {
    /// Create a hidden-until-loading spinner
    pub fn new() -> Self {
        let pb = indicatif::ProgressBar::new_spinner();
        pb.set_style(
            indicatif::ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| indicatif::ProgressStyle::default_spinner())
                .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ "),
        );

        Self { pb }
    }

    /// Update the spinner from state changes until the search settles.
    ///
    /// Returns the settled state, or the last state seen if the channel closes.
    pub async fn follow(
        &self,
        mut rx: watch::Receiver<OrchestratorState>,
        renderer: &TerminalRenderer,
    ) -> OrchestratorState {
        loop {
            let state = rx.borrow_and_update().clone();

            if state.is_settled() {
                self.pb.finish_and_clear();
                return state;
            }

            if state.is_loading() {
                self.pb.set_message(renderer.status_line(&state));
                self.pb.enable_steady_tick(Duration::from_millis(100));
            }

            if rx.changed().await.is_err() {
                self.pb.finish_and_clear();
                return rx.borrow().clone();
            }
        }
    }
}

impl Default for SearchSpinner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{COMPACT_PLACEHOLDER_IMAGE, FEATURED_PLACEHOLDER_IMAGE};
    use crate::render::build_document;
    use chrono::{TimeZone, Utc};

    fn plain() -> TerminalRenderer {
        TerminalRenderer::new().color(false).width(80)
    }

    fn article(title: &str, url: &str) -> Article {
        Article::new(title, "Wire", url, Utc.with_ymd_and_hms(2024, 3, 9, 0, 0, 0).unwrap())
    }

    #[test]
    fn test_status_icon() {
        assert_eq!(status_icon(&OrchestratorState::Idle), "○");
        assert_eq!(
            status_icon(&OrchestratorState::Loading {
                query: "q".to_string()
            }),
            "◐"
        );
    }

    #[test]
    fn test_truncate_with_ellipsis() {
        assert_eq!(truncate_with_ellipsis("Hello", 10), "Hello");
        assert_eq!(truncate_with_ellipsis("Hello World", 8), "Hello...");
        assert_eq!(truncate_with_ellipsis("", 10), "");
        assert_eq!(truncate_with_ellipsis("Hello", 3), "...");
        assert_eq!(truncate_with_ellipsis("日本語のテキスト", 9), "日本語...");
    }

    #[test]
    fn test_render_document_plain() {
        let doc = build_document("**Setup**\n```bash\nnpm i\n```\nRun it [1].");
        let out = plain().render_document(&doc);

        assert_eq!(out, "Setup\n┌─ bash\n│ npm i\n└─\n\nRun it [1].\n");
    }

    #[test]
    fn test_render_sources_featured_first() {
        let result = SearchResult::new(
            "q",
            build_document("Answer."),
            vec![
                article("First story", "https://www.reuters.com/a"),
                article("Second story", "https://bbc.co.uk/b"),
            ],
        );

        let out = plain().render_sources(&result);
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines[0], "━━━ Sources ━━━");
        assert_eq!(lines[1], "★ First story");
        assert_eq!(lines[2], "   Wire · www.reuters.com · 2024-03-09");
        assert_eq!(lines[6], "2. Second story");
    }

    #[test]
    fn test_render_sources_images_and_favicon() {
        let mut featured = article("First story", "https://www.reuters.com/a");
        featured.image_url = Some("https://img.example.com/a.jpg".to_string());
        let result = SearchResult::new(
            "q",
            build_document("Answer."),
            vec![featured, article("Second story", "https://bbc.co.uk/b")],
        );

        let out = plain().render_sources(&result);
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines[4], "   image: https://img.example.com/a.jpg");
        assert_eq!(
            lines[5],
            "   icon: https://www.google.com/s2/favicons?domain=www.reuters.com&sz=32"
        );
        assert_eq!(lines[9], format!("   image: {}", COMPACT_PLACEHOLDER_IMAGE));
        assert_eq!(lines.len(), 10);
    }

    #[test]
    fn test_featured_card_without_image_uses_wide_placeholder() {
        let result = SearchResult::new(
            "q",
            Document::default(),
            vec![article("Only story", "https://a.com/x")],
        );

        let out = plain().render_sources(&result);
        assert!(out.contains(&format!("image: {}", FEATURED_PLACEHOLDER_IMAGE)));
    }

    #[test]
    fn test_render_result_without_articles_has_no_sources() {
        let result = SearchResult::new("q", build_document("Only text."), Vec::new());
        assert_eq!(plain().render_result(&result), "Only text.\n");
    }

    #[test]
    fn test_status_lines() {
        let renderer = plain();
        assert_eq!(
            renderer.status_line(&OrchestratorState::Failure {
                query: "q".to_string(),
                message: "Nope".to_string()
            }),
            "✗ Nope"
        );

        let success = OrchestratorState::Success {
            result: SearchResult::new("q", Document::default(), vec![article("a", "https://a.com")]),
        };
        assert_eq!(renderer.status_line(&success), "✓ Answered \"q\" with 1 source");
    }

    #[test]
    fn test_colored_output_contains_escape_codes() {
        let doc = build_document("**Title**");
        let out = TerminalRenderer::new().color(true).render_document(&doc);
        assert!(out.contains("\u{1b}["));
    }

    #[tokio::test]
    async fn test_spinner_returns_settled_state() {
        let (tx, rx) = watch::channel(OrchestratorState::Loading {
            query: "q".to_string(),
        });

        let settled = OrchestratorState::Failure {
            query: "q".to_string(),
            message: "m".to_string(),
        };
        let expected = settled.clone();

        let handle = tokio::spawn(async move {
            let spinner = SearchSpinner::new();
            spinner.follow(rx, &plain()).await
        });

        tx.send(settled).unwrap();
        assert_eq!(handle.await.unwrap(), expected);
    }
}
