//! Caption HTML for a movie post.
//!
//! A caption is one paragraph naming the movie, either linked to its reference page or as the
//! plain search text, optionally followed by a paragraph holding the user's comment.

use crate::query::ReferenceMatch;
use std::fmt;

/// Suffixes search engines append to encyclopedia page titles. Longer forms come first.
const TITLE_BOILERPLATE: &[&str] = &[
    "(Film)",
    "- Wikipedia, the free encyclopedia",
    "- Wikipedia",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caption(String);

impl Caption {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Caption {
    fn from(html: String) -> Self {
        Self(html)
    }
}

impl fmt::Display for Caption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn build_caption(
    search_text: &str,
    comment: Option<&str>,
    reference: Option<&ReferenceMatch>,
) -> Caption {
    let mut html = match reference {
        Some(reference) => {
            let mut title = clean_title(&reference.title);
            if let Some(year) = trailing_year(search_text) {
                title.push_str(&format!(" ({})", year));
            }
            format!("<p><a href=\"{}\">{}</a></p>", reference.url, title)
        }
        None => format!("<p>{}</p>", search_text),
    };

    if let Some(comment) = comment.filter(|c| !c.is_empty()) {
        html.push_str(&format!("<p>{}</p>", nl2br(comment)));
    }

    Caption(html)
}

/// Removes every boilerplate suffix (case-insensitively) and trims.
///
/// Removal repeats until nothing matches, so a suffix revealed by an earlier removal is
/// caught as well and the result is a fixed point.
pub fn clean_title(title: &str) -> String {
    let mut current = title.to_string();
    loop {
        let mut next = current.clone();
        for pattern in TITLE_BOILERPLATE {
            next = remove_ignore_case(&next, pattern);
        }
        if next == current {
            break;
        }
        current = next;
    }
    current.trim().to_string()
}

fn remove_ignore_case(haystack: &str, needle: &str) -> String {
    let needle_lower = needle.to_ascii_lowercase();
    let hay_lower = haystack.to_ascii_lowercase();
    let mut out = String::with_capacity(haystack.len());
    let mut pos = 0;
    while let Some(rel) = hay_lower[pos..].find(&needle_lower) {
        let start = pos + rel;
        out.push_str(&haystack[pos..start]);
        pos = start + needle_lower.len();
    }
    out.push_str(&haystack[pos..]);
    out
}

/// The last whitespace-separated token, if it is exactly four ASCII digits.
pub fn trailing_year(search_text: &str) -> Option<&str> {
    let last = search_text.split_whitespace().last()?;
    if last.len() == 4 && last.bytes().all(|b| b.is_ascii_digit()) {
        Some(last)
    } else {
        None
    }
}

/// Inserts `<br />` before each line ending, keeping the line ending itself.
fn nl2br(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 16);
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\r' => {
                out.push_str("<br />\r");
                if chars.peek() == Some(&'\n') {
                    out.push('\n');
                    chars.next();
                }
            }
            '\n' => out.push_str("<br />\n"),
            _ => out.push(ch),
        }
    }
    out
}
