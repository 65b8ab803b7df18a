//! Turns raw generated text into a note layout.
//!
//! The text is split on `.` into segments. A segment containing
//! [`SECTION_MARKER`] becomes a `## ` heading with the marker removed; every
//! other non-empty segment becomes a `- ` bullet.
//!
//! Segments that are empty after trimming, and segments holding nothing but
//! the marker, are dropped on purpose: a trailing `.` or a bare `section:`
//! yields no blank `- ` bullet or empty `## ` heading.

/// Substring that promotes a segment to a heading.
pub const SECTION_MARKER: &str = "section:";

/// One line of a structured note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteLine<'a> {
    Heading(String),
    Bullet(&'a str),
}

/// Formats generated text under a fixed title line.
#[derive(Debug, Clone)]
pub struct Formatter {
    title: String,
}

impl Formatter {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Render `text` as a titled, sectioned, bulleted note.
    pub fn format(&self, text: &str) -> String {
        let mut out = String::with_capacity(self.title.len() + text.len() + 16);
        out.push_str(&self.title);
        out.push_str("\n\n");

        for line in classify(text) {
            match line {
                NoteLine::Heading(heading) => {
                    out.push_str("## ");
                    out.push_str(&heading);
                    out.push_str("\n\n");
                }
                NoteLine::Bullet(bullet) => {
                    out.push_str("- ");
                    out.push_str(bullet);
                    out.push('\n');
                }
            }
        }

        out
    }
}

/// Split `text` on sentence boundaries and classify each segment.
///
/// Segments that are empty after trimming are dropped, so trailing periods
/// and runs like `...` do not produce blank bullets.
pub fn classify(text: &str) -> Vec<NoteLine<'_>> {
    text.split('.')
        .filter_map(|segment| {
            if segment.contains(SECTION_MARKER) {
                let heading = segment.replace(SECTION_MARKER, "");
                let heading = heading.trim();
                if heading.is_empty() {
                    None
                } else {
                    Some(NoteLine::Heading(heading.to_string()))
                }
            } else {
                let bullet = segment.trim();
                (!bullet.is_empty()).then_some(NoteLine::Bullet(bullet))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bullets_and_headings() {
        let f = Formatter::new("Your Great Note:");
        let out = f.format("section: Logic. P and Q. P or Q");
        assert_eq!(
            out,
            "Your Great Note:\n\n## Logic\n\n- P and Q\n- P or Q\n"
        );
    }

    #[test]
    fn test_empty_text_is_title_only() {
        let f = Formatter::new("T");
        assert_eq!(f.format(""), "T\n\n");
        assert_eq!(f.format(" . ... "), "T\n\n");
    }

    #[test]
    fn test_marker_mid_segment() {
        let lines = classify("intro section: Proofs");
        assert_eq!(lines, vec![NoteLine::Heading("intro  Proofs".to_string())]);
    }

    #[test]
    fn test_bare_marker_is_dropped() {
        assert!(classify("section:").is_empty());
    }

    #[test]
    fn test_no_blank_bullets_or_headings() {
        let f = Formatter::new("Your Great Note:");
        assert_eq!(
            f.format("Hello world. section:. Bye."),
            "Your Great Note:\n\n- Hello world\n- Bye\n"
        );
    }

    #[test]
    fn test_multibyte_text_is_preserved() {
        let f = Formatter::new("标题: 自动概述");
        let out = f.format("第一句。还是第一句. 第二句");
        assert_eq!(out, "标题: 自动概述\n\n- 第一句。还是第一句\n- 第二句\n");
    }
}
