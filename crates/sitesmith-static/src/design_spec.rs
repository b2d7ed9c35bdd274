//! Extracts color and font tokens from the design document into CSS.
//!
//! The design document is free-form Markdown written by the model. Two phrases
//! anchor the scan: "Color Palette Rationale" and "Typography Rationale". An
//! anchor written as a heading or a bold list label wins over one mentioned in
//! prose. From a heading the range runs to the next heading of the same or a
//! higher level; from anywhere else it runs to the next heading or the next
//! bold label at the same indentation. Hex colors and quoted font names found
//! in those ranges become CSS custom properties.

use std::fmt::Write;
use std::ops::Range;

use pulldown_cmark::{Event, HeadingLevel, Parser, Tag};
use regex::Regex;

/// Names bound, in order, to the first six colors found.
const COLOR_NAMES: [&str; 6] = ["primary", "secondary", "accent", "background", "text", "surface"];

/// Font weights requested for every imported family.
const FONT_WEIGHTS: &str = "400;600;700";

/// A line opening with a bold label, optionally as a list item: `- **Mood:**`.
const BOLD_LABEL: &str = r"(?m)^([ \t]*)(?:[-*+][ \t]+)?\*\*[^*\n]+\*\*";

/// Returned when the document cannot be scanned.
pub const EXTRACTION_FAILED: &str = "/* Could not automatically extract design specs. */";

#[derive(Debug, thiserror::Error)]
enum ExtractError {
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("could not format specs: {0}")]
    Format(#[from] std::fmt::Error),
}

struct Heading {
    span: Range<usize>,
    level: usize,
}

/// Derive the design-spec CSS from a design document.
///
/// Never fails: a scan error yields [`EXTRACTION_FAILED`].
pub fn extract_design_specs(design_doc: &str) -> String {
    tracing::info!("Extracting design specs from design document");

    match try_extract(design_doc) {
        Ok(specs) => {
            tracing::info!(bytes = specs.len(), "Design specs extracted");
            specs
        }
        Err(e) => {
            tracing::warn!("Could not extract design specs: {}", e);
            EXTRACTION_FAILED.to_string()
        }
    }
}

fn try_extract(doc: &str) -> Result<String, ExtractError> {
    let headings = headings(doc);

    let colors = match anchored_range(doc, r"(?i)color\s+palette\s+rationale", &headings)? {
        Some(range) => hex_colors(&doc[range])?,
        None => Vec::new(),
    };

    let fonts = match anchored_range(doc, r"(?i)typography\s+rationale", &headings)? {
        Some(range) => font_names(&doc[range])?,
        None => Vec::new(),
    };

    render_specs(&colors, &fonts)
}

fn headings(doc: &str) -> Vec<Heading> {
    Parser::new(doc)
        .into_offset_iter()
        .filter_map(|(event, span)| match event {
            Event::Start(Tag::Heading { level, .. }) => Some(Heading {
                span,
                level: heading_depth(level),
            }),
            _ => None,
        })
        .collect()
}

fn heading_depth(level: HeadingLevel) -> usize {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn line_start(doc: &str, offset: usize) -> usize {
    doc[..offset].rfind('\n').map_or(0, |i| i + 1)
}

/// True when only list, heading or emphasis markers precede `offset` on its line.
fn opens_label(doc: &str, offset: usize) -> bool {
    doc[line_start(doc, offset)..offset]
        .chars()
        .all(|c| matches!(c, '#' | '-' | '*' | '+' | '.' | ' ' | '\t') || c.is_ascii_digit())
}

fn anchored_range(
    doc: &str,
    anchor: &str,
    headings: &[Heading],
) -> Result<Option<Range<usize>>, ExtractError> {
    let re = Regex::new(anchor)?;
    let starts: Vec<usize> = re.find_iter(doc).map(|m| m.start()).collect();

    let Some(start) = starts
        .iter()
        .copied()
        .find(|&offset| opens_label(doc, offset))
        .or_else(|| starts.first().copied())
    else {
        return Ok(None);
    };

    let end = match headings.iter().find(|h| h.span.contains(&start)) {
        Some(own) => headings
            .iter()
            .find(|h| h.span.start > start && h.level <= own.level)
            .map(|h| h.span.start),
        None => {
            let next_heading = headings
                .iter()
                .map(|h| h.span.start)
                .find(|&offset| offset > start);
            let next_label = sibling_label(doc, start)?;
            match (next_heading, next_label) {
                (Some(a), Some(b)) => Some(a.min(b)),
                (a, b) => a.or(b),
            }
        }
    };

    Ok(Some(start..end.unwrap_or(doc.len())))
}

/// Start of the next bold-label line indented no deeper than the one holding `offset`.
fn sibling_label(doc: &str, offset: usize) -> Result<Option<usize>, ExtractError> {
    let re = Regex::new(BOLD_LABEL)?;
    let own_start = line_start(doc, offset);
    let indent = doc[own_start..]
        .chars()
        .take_while(|c| matches!(c, ' ' | '\t'))
        .count();
    let line_end = doc[offset..].find('\n').map_or(doc.len(), |i| offset + i);

    let next = re
        .captures_iter(&doc[line_end..])
        .find(|caps| caps[1].chars().count() <= indent)
        .and_then(|caps| caps.get(0))
        .map(|m| line_end + m.start());
    Ok(next)
}

/// Hex color literals (3 or 6 digits) in encounter order.
fn hex_colors(text: &str) -> Result<Vec<String>, ExtractError> {
    let re = Regex::new(r"#(?:[0-9a-fA-F]{6}|[0-9a-fA-F]{3})\b")?;
    Ok(re.find_iter(text).map(|m| m.as_str().to_string()).collect())
}

/// Back-ticked or single-quoted font names, deduplicated, longest first.
fn font_names(text: &str) -> Result<Vec<String>, ExtractError> {
    let re = Regex::new(r"[`']([^`'\n]+)[`']")?;

    let mut fonts: Vec<String> = Vec::new();
    for caps in re.captures_iter(text) {
        let token = caps[1].trim();
        if is_font_candidate(token) && !fonts.iter().any(|f| f == token) {
            fonts.push(token.to_string());
        }
    }

    // Stable, so equal lengths keep document order.
    fonts.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()));
    Ok(fonts)
}

fn is_font_candidate(token: &str) -> bool {
    let lower = token.to_lowercase();

    token.chars().count() > 3
        && token.chars().any(|c| c.is_alphabetic())
        && !lower.contains("sans")
        && !lower.contains("serif")
        // identifiers such as `image_prompt` and hex literals are never families
        && !token.contains('_')
        && !token.starts_with('#')
}

fn render_specs(colors: &[String], fonts: &[String]) -> Result<String, ExtractError> {
    let mut out = String::new();

    if !fonts.is_empty() {
        let families = fonts
            .iter()
            .map(|f| format!("{}:wght@{}", f.replace(' ', "+"), FONT_WEIGHTS))
            .collect::<Vec<_>>()
            .join("&family=");
        writeln!(
            out,
            "@import url('https://fonts.googleapis.com/css2?family={families}&display=swap');"
        )?;
        writeln!(out)?;
    }

    if !colors.is_empty() {
        writeln!(out, "/* --- Color Palette (from Design Doc) --- */")?;
        writeln!(out, ":root {{")?;
        for (i, color) in colors.iter().enumerate() {
            match COLOR_NAMES.get(i) {
                Some(name) => writeln!(out, "    --color-{name}: {color};")?,
                None => writeln!(out, "    --color-accent-{}: {color};", i - COLOR_NAMES.len() + 1)?,
            }
        }
        writeln!(out, "}}")?;
        writeln!(out)?;
    }

    if let Some(heading) = fonts.first() {
        let body = fonts.get(1).unwrap_or(heading);
        writeln!(out, ":root {{")?;
        writeln!(out, "    --font-heading: '{heading}', sans-serif;")?;
        writeln!(out, "    --font-body: '{body}', sans-serif;")?;
        writeln!(out, "}}")?;
    }

    Ok(out.trim_end().to_string())
}
