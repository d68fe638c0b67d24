//! Frontmatter parsing
//!
//! Pages may open with a `---` delimited block of `key: value` lines.
//! Only `title` and `description` are read; everything else is ignored.

use thiserror::Error;

/// Metadata read from a page's frontmatter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frontmatter {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Opening `---` without a matching closing line
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unterminated frontmatter")]
pub struct UnterminatedFrontmatter;

/// Split `content` into its frontmatter and the remaining body.
///
/// Content without a leading `---` line has empty frontmatter and is
/// returned whole as the body.
pub fn split(content: &str) -> Result<(Frontmatter, &str), UnterminatedFrontmatter> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let mut lines = content.split_inclusive('\n');
    match lines.next() {
        Some(first) if is_delimiter(first) => {}
        _ => return Ok((Frontmatter::default(), content)),
    }

    let start = content.find('\n').map(|i| i + 1).unwrap_or(content.len());
    let mut offset = start;
    for line in lines {
        if is_delimiter(line) {
            let block = &content[start..offset];
            let body = &content[offset + line.len()..];
            return Ok((parse_block(block), body));
        }
        offset += line.len();
    }

    Err(UnterminatedFrontmatter)
}

/// Strip frontmatter if present, returning only the body.
///
/// Unterminated frontmatter is left in place.
pub fn strip(content: &str) -> &str {
    match split(content) {
        Ok((_, body)) => body,
        Err(_) => content,
    }
}

fn is_delimiter(line: &str) -> bool {
    line.trim_end() == "---"
}

fn parse_block(block: &str) -> Frontmatter {
    let mut frontmatter = Frontmatter::default();
    for line in block.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = unquote(value.trim());
        if value.is_empty() {
            continue;
        }
        match key.trim() {
            "title" => frontmatter.title = Some(value.to_string()),
            "description" => frontmatter.description = Some(value.to_string()),
            _ => {}
        }
    }
    frontmatter
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}
