//! LaTeX output primitives shared by every section renderer.
//!
//! Document text is written only through `LatexWriter`. Fixed markup must be a
//! `&'static str`; anything else enters as `Segment::Text` (through
//! `escape_latex`) or, for `\href` targets, as `Segment::Url` (through
//! `escape_url`).

use std::borrow::Cow;

const INDENT: &str = "    ";

/// Escapes characters with special meaning in LaTeX so `text` prints verbatim.
pub fn escape_latex(text: &str) -> Cow<'_, str> {
    if !text.chars().any(is_special) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        match c {
            '\\' => out.push_str(r"\textbackslash{}"),
            '~' => out.push_str(r"\textasciitilde{}"),
            '^' => out.push_str(r"\textasciicircum{}"),
            '&' | '%' | '$' | '#' | '_' | '{' | '}' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Escapes a link target for the first argument of `\href`.
///
/// hyperref reads that argument almost verbatim: only `%` and `#` need a
/// backslash. Characters that would unbalance the group or start a control
/// sequence are percent-encoded instead, and so is whitespace.
pub fn escape_url(url: &str) -> Cow<'_, str> {
    if !url.chars().any(|c| matches!(c, '%' | '#' | '{' | '}' | '\\') || c.is_whitespace()) {
        return Cow::Borrowed(url);
    }

    let mut out = String::with_capacity(url.len() + 8);
    for c in url.chars() {
        match c {
            '%' | '#' => {
                out.push('\\');
                out.push(c);
            }
            '{' | '}' | '\\' => out.push_str(&format!(r"\%{:02X}", c as u32)),
            c if c.is_whitespace() => {
                let mut buf = [0u8; 4];
                for byte in c.encode_utf8(&mut buf).bytes() {
                    out.push_str(&format!(r"\%{byte:02X}"));
                }
            }
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

fn is_special(c: char) -> bool {
    matches!(
        c,
        '\\' | '~' | '^' | '&' | '%' | '$' | '#' | '_' | '{' | '}'
    )
}

/// One piece of an output line.
#[derive(Debug, Clone, Copy)]
pub enum Segment<'a> {
    /// Trusted template markup, written as-is.
    Markup(&'static str),
    /// Untrusted field content, escaped before insertion.
    Text(&'a str),
    /// Untrusted link target inside `\href{...}`, URL-escaped before insertion.
    Url(&'a str),
}

#[derive(Debug, Default)]
pub struct LatexWriter {
    buf: String,
}

impl LatexWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes a block of fixed markup verbatim.
    pub fn raw(&mut self, markup: &'static str) -> &mut Self {
        self.buf.push_str(markup);
        self
    }

    /// Writes a single line of fixed markup at the given depth.
    pub fn markup(&mut self, depth: usize, markup: &'static str) -> &mut Self {
        self.line(depth, &[Segment::Markup(markup)])
    }

    /// Writes one line assembled from segments at the given depth.
    pub fn line(&mut self, depth: usize, segments: &[Segment<'_>]) -> &mut Self {
        for _ in 0..depth {
            self.buf.push_str(INDENT);
        }
        for segment in segments {
            match segment {
                Segment::Markup(markup) => self.buf.push_str(markup),
                Segment::Text(text) => self.buf.push_str(&escape_latex(text)),
                Segment::Url(url) => self.buf.push_str(&escape_url(url)),
            }
        }
        self.buf.push('\n');
        self
    }

    pub fn blank(&mut self) -> &mut Self {
        self.buf.push('\n');
        self
    }

    pub fn finish(self) -> String {
        self.buf
    }
}
