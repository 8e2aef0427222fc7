use autumnus::{HtmlLinkedBuilder, formatter::Formatter, languages::Language, themes};

use crate::config::HighlightConfig;

/// Syntax highlighting for fenced code blocks, using autumnus (tree-sitter based).
///
/// Output uses CSS classes rather than inline styles; the matching stylesheet
/// comes from [`SyntaxHighlighter::generate_css`].
#[derive(Debug, Clone)]
pub struct SyntaxHighlighter {
    theme_name: String,
}

impl SyntaxHighlighter {
    pub fn new(theme_name: &str) -> Self {
        Self {
            theme_name: theme_name.to_string(),
        }
    }

    pub fn from_config(config: &HighlightConfig) -> Self {
        Self::new(&config.theme)
    }

    /// Highlight code and return HTML with CSS classes.
    ///
    /// Unknown languages fall back to an escaped `<pre><code class="language-x">` block.
    pub fn highlight(&self, code: &str, language: &str) -> String {
        // Info strings may carry attributes after the language ("rust ignore")
        let language = language.split_whitespace().next().unwrap_or("");
        let lang = Language::guess(language, code);

        if matches!(lang, Language::PlainText)
            && !language.is_empty()
            && language != "plaintext"
            && language != "text"
        {
            return plain_code_block(code, language);
        }

        let Ok(formatter) = HtmlLinkedBuilder::new().source(code).lang(lang).build() else {
            return plain_code_block(code, language);
        };

        let mut output: Vec<u8> = Vec::new();
        if formatter.format(&mut output).is_err() {
            return plain_code_block(code, language);
        }
        String::from_utf8(output).unwrap_or_else(|_| plain_code_block(code, language))
    }

    /// Stylesheet for the configured theme, or `None` if the theme is unknown.
    pub fn generate_css(&self) -> Option<String> {
        let theme = themes::get(&self.theme_name).ok()?;
        Some(theme.css(false))
    }

    pub fn theme_name(&self) -> &str {
        &self.theme_name
    }
}

impl Default for SyntaxHighlighter {
    fn default() -> Self {
        Self::from_config(&HighlightConfig::default())
    }
}

fn plain_code_block(code: &str, language: &str) -> String {
    let escaped = html_escape(code);
    if language.is_empty() {
        format!("<pre><code>{}</code></pre>", escaped)
    } else {
        format!(
            "<pre class=\"language-{lang}\"><code class=\"language-{lang}\">{}</code></pre>",
            escaped,
            lang = html_escape(language)
        )
    }
}

/// Escape HTML special characters.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlight_rust() {
        let highlighter = SyntaxHighlighter::default();
        let result = highlighter.highlight("fn main() {}", "rust");
        assert!(result.contains("<pre"));
        assert!(result.contains("</pre>"));
    }

    #[test]
    fn test_highlight_unknown_language() {
        let highlighter = SyntaxHighlighter::default();
        let result = highlighter.highlight("a < b", "unknown_lang_xyz");
        assert!(result.contains("<code class=\"language-unknown_lang_xyz\">"));
        assert!(result.contains("a &lt; b"));
    }

    #[test]
    fn test_info_string_attributes_are_ignored() {
        let highlighter = SyntaxHighlighter::default();
        let result = highlighter.highlight("<b>", "unknown_lang_xyz extra");
        assert!(result.contains("<code class=\"language-unknown_lang_xyz\">"));
        assert!(!result.contains("extra"));
        assert!(result.contains("&lt;b&gt;"));
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("<div>&</div>"), "&lt;div&gt;&amp;&lt;/div&gt;");
    }

    #[test]
    fn test_generate_css() {
        let highlighter = SyntaxHighlighter::new("dracula");
        let css = highlighter.generate_css().unwrap();
        assert!(!css.is_empty());
    }

    #[test]
    fn test_unknown_theme_has_no_css() {
        let highlighter = SyntaxHighlighter::new("no-such-theme");
        assert!(highlighter.generate_css().is_none());
    }
}
