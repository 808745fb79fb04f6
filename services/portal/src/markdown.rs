//! Guide body processing: signed-link rewriting and markdown rendering.

use pulldown_cmark::{Options, Parser, html};
use regex::{Captures, Regex};

/// Sentence punctuation and emphasis delimiters that may close a bare URL.
const TRAILING_DELIMITERS: [char; 9] = ['.', ',', ';', ':', '!', '?', '*', '_', '~'];

/// Matcher for object URLs under one storage host, compiled once.
#[derive(Debug, Clone)]
pub struct StorageLinks {
    pattern: Option<Regex>,
}

impl StorageLinks {
    /// An empty `host` matches nothing.
    pub fn new(host: &str) -> Self {
        if host.is_empty() {
            return Self { pattern: None };
        }
        let pattern = format!(r#"https?://{}/[^\s"'`<>()\[\]]+"#, regex::escape(host));
        Self {
            pattern: Regex::new(&pattern).ok(),
        }
    }

    /// Replace every `http(s)://{host}/...` URL in `text` with `sign(url)`.
    ///
    /// A URL stops at whitespace, quotes, backticks, angle brackets,
    /// parentheses and square brackets. Sentence punctuation and markdown
    /// emphasis at its end stay outside. URLs on other hosts are left alone.
    pub fn rewrite<F>(&self, text: &str, sign: F) -> String
    where
        F: Fn(&str) -> String,
    {
        let Some(re) = &self.pattern else {
            return text.to_owned();
        };
        re.replace_all(text, |caps: &Captures<'_>| {
            let matched = &caps[0];
            let url = matched.trim_end_matches(TRAILING_DELIMITERS);
            let tail = &matched[url.len()..];
            format!("{}{}", sign(url), tail)
        })
        .into_owned()
    }
}

/// Render markdown to HTML with tables and strikethrough enabled.
pub fn render_markdown(source: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    let parser = Parser::new_ext(source, options);
    let mut out = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}
