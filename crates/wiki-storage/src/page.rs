//! Page model and title rules.

use std::sync::LazyLock;

use regex::Regex;

/// Titles are plain alphanumeric words; anything else never reaches storage.
static TITLE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9]+$").unwrap());

/// Check whether `title` may be used as a page key.
#[must_use]
pub fn is_valid_title(title: &str) -> bool {
    TITLE_RE.is_match(title)
}

/// A single wiki page.
///
/// The title is the unique key of the page document; the body is stored as
/// raw bytes and replaced wholesale on every save.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Page {
    /// Unique page title (matches `^[a-zA-Z0-9]+$`).
    pub title: String,
    /// Page content.
    pub body: Vec<u8>,
}

impl Page {
    /// Create a page from a title and body.
    #[must_use]
    pub fn new(title: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }

    /// Create a page with an empty body, used for the new-page form.
    #[must_use]
    pub fn blank(title: impl Into<String>) -> Self {
        Self::new(title, Vec::new())
    }

    /// Body decoded as UTF-8, replacing invalid sequences.
    #[must_use]
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_titles() {
        assert!(is_valid_title("Foo"));
        assert!(is_valid_title("FrontPage2"));
        assert!(is_valid_title("42"));
    }

    #[test]
    fn test_invalid_titles() {
        assert!(!is_valid_title(""));
        assert!(!is_valid_title("Foo Bar"));
        assert!(!is_valid_title("Foo/Bar"));
        assert!(!is_valid_title("../etc"));
        assert!(!is_valid_title("Foo_Bar"));
        assert!(!is_valid_title("Föö"));
        assert!(!is_valid_title("Foo\n"));
    }

    #[test]
    fn test_blank_page() {
        let page = Page::blank("Foo");

        assert_eq!(page.title, "Foo");
        assert!(page.body.is_empty());
    }

    #[test]
    fn test_body_text_lossy() {
        let page = Page::new("Foo", vec![b'h', b'i', 0xff]);

        assert_eq!(page.body_text(), "hi\u{fffd}");
    }
}
