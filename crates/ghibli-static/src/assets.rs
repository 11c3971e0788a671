//! Static asset copying and HTML minification.

use std::fs;
use std::io;
use std::path::Path;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use walkdir::WalkDir;

static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("Invalid comment regex"));

static STYLE_ATTR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\sstyle="([^"]*)""#).expect("Invalid style attribute regex"));

// Applies to the whole document, attribute values (`alt`, `content`) included.
static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Invalid whitespace regex"));

// Whitespace around these tags never renders.
static BLOCK_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\s*(<(?:!doctype|/?(?:html|head|body|header|footer|main|section|article|nav|div|h[1-6]|p|ul|ol|li|meta|link|title|script))\b[^>]*>)\s*",
    )
    .expect("Invalid block tag regex")
});

/// Asset pipeline utilities.
pub struct AssetPipeline;

impl AssetPipeline {
    /// Copy a directory tree verbatim. Returns the number of files copied.
    pub fn copy_dir(source: &Path, dest: &Path) -> io::Result<usize> {
        let mut count = 0;

        for entry in WalkDir::new(source).follow_links(true) {
            let entry = entry.map_err(io::Error::other)?;
            let relative = entry
                .path()
                .strip_prefix(source)
                .map_err(io::Error::other)?;
            let target = dest.join(relative);

            if entry.file_type().is_dir() {
                fs::create_dir_all(&target)?;
            } else {
                if let Some(parent) = target.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::copy(entry.path(), &target)?;
                count += 1;
            }
        }

        Ok(count)
    }

    /// Minify a rendered HTML page.
    ///
    /// Strips comments, collapses whitespace runs, drops whitespace around
    /// block-level tags and minifies inline `style` attributes.
    ///
    /// Whitespace runs inside attribute values collapse too, so a multi-line
    /// `alt` or `content` text comes out on one line.
    pub fn minify_html(html: &str) -> String {
        let html = COMMENT_RE.replace_all(html, "");
        let html = STYLE_ATTR_RE.replace_all(&html, |caps: &Captures| {
            let style = &caps[1];
            let minified = Self::minify_style(style).unwrap_or_else(|_| style.trim().to_string());
            format!(r#" style="{minified}""#)
        });
        let html = WHITESPACE_RE.replace_all(&html, " ");
        let html = BLOCK_TAG_RE.replace_all(&html, "${1}");

        html.trim().to_string()
    }

    /// Minify a CSS declaration list using lightningcss.
    pub fn minify_style(declarations: &str) -> Result<String, String> {
        use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleAttribute};

        let attr = StyleAttribute::parse(declarations, ParserOptions::default())
            .map_err(|e| format!("CSS parse error: {}", e))?;

        let minified = attr
            .to_css(PrinterOptions {
                minify: true,
                ..Default::default()
            })
            .map_err(|e| format!("CSS minify error: {}", e))?;

        Ok(minified.code)
    }
}
