//! Page-to-text rendering
//!
//! Turns an MDX page into the plain Markdown served by the llms endpoints:
//! a title/URL header followed by the body with MDX-only syntax removed.
//!
//! Everything inside fenced or indented code blocks is passed through
//! untouched. `import`/`export` statements are only recognised in MDX pages,
//! at the start of a block.

use std::ops::Range;
use std::path::Path;

use async_trait::async_trait;
use pulldown_cmark::{Event, Parser, Tag};

use super::error::{RenderError, RenderResult};
use super::frontmatter;
use super::page::Page;

/// Produces the plain-text representation of a page
#[async_trait]
pub trait PageRenderer: Send + Sync {
    /// Render one page. Fails on malformed or unsupported content.
    async fn render_text(&self, page: &Page) -> RenderResult<String>;
}

/// Renderer for Markdown/MDX pages loaded from disk
#[derive(Debug, Clone, Default)]
pub struct MdxTextRenderer;

impl MdxTextRenderer {
    pub fn new() -> Self {
        Self
    }

    async fn process_body(&self, page: &Page) -> RenderResult<String> {
        let body = page.body.as_str();
        let code = code_block_ranges(body);
        let allow_esm = is_mdx(page);

        let mut out = String::with_capacity(body.len());
        let mut tags = TagBalance::default();
        let mut esm: Option<EsmStatement> = None;
        let mut pos = 0;
        let mut block_start = true;

        for line in body.split_inclusive('\n') {
            let span = pos..pos + line.len();
            pos = span.end;
            let at_block_start = block_start;
            block_start = line.trim().is_empty();

            if code.iter().any(|r| r.start < span.end && span.start < r.end) {
                out.push_str(line);
                continue;
            }

            if let Some(statement) = esm.as_mut() {
                if statement.feed(line) {
                    esm = None;
                    block_start = true;
                }
                continue;
            }
            if allow_esm && at_block_start && is_esm_start(line) {
                let mut statement = EsmStatement::start(line);
                if statement.feed(line) {
                    block_start = true;
                } else {
                    esm = Some(statement);
                }
                continue;
            }

            if let Some(target) = include_target(line) {
                let included = self.read_include(page, target).await?;
                out.push_str(included.trim());
                out.push('\n');
                continue;
            }

            tags.scan(line, &page.url)?;
            out.push_str(line);
        }

        if esm.is_some() {
            return Err(RenderError::malformed(&page.url, "unterminated import/export"));
        }
        tags.finish(&page.url)?;
        Ok(out)
    }

    async fn read_include(&self, page: &Page, target: &str) -> RenderResult<String> {
        let dir = page
            .source_path
            .as_deref()
            .and_then(Path::parent)
            .ok_or_else(|| RenderError::NoSourceFile(page.url.clone()))?;

        let content = tokio::fs::read_to_string(dir.join(target))
            .await
            .map_err(|source| RenderError::Include {
                url: page.url.clone(),
                target: target.to_string(),
                source,
            })?;

        Ok(frontmatter::strip(&content).to_string())
    }
}

#[async_trait]
impl PageRenderer for MdxTextRenderer {
    async fn render_text(&self, page: &Page) -> RenderResult<String> {
        let body = self.process_body(page).await?;

        let mut text = format!("# {}\nURL: {}\n\n", page.title, page.url);
        if let Some(description) = &page.description {
            text.push_str(description);
            text.push_str("\n\n");
        }
        text.push_str(body.trim());

        Ok(text.trim_end().to_string())
    }
}

/// Byte ranges of fenced and indented code blocks in `body`
fn code_block_ranges(body: &str) -> Vec<Range<usize>> {
    Parser::new(body)
        .into_offset_iter()
        .filter_map(|(event, range)| match event {
            Event::Start(Tag::CodeBlock(_)) => Some(range),
            _ => None,
        })
        .collect()
}

/// Plain `.md` pages have no ESM; pages without a file are treated as MDX
fn is_mdx(page: &Page) -> bool {
    page.source_path
        .as_deref()
        .and_then(Path::extension)
        .map(|ext| ext != "md")
        .unwrap_or(true)
}

/// First line of an `import`/`export` statement, as opposed to prose that
/// happens to start with the same word
fn is_esm_start(line: &str) -> bool {
    if let Some(rest) = line.strip_prefix("import ") {
        let rest = rest.trim_start();
        return rest.starts_with(['{', '*', '"', '\''])
            || line.contains(" from ")
            || line.contains(" from\"")
            || line.contains(" from'");
    }
    if let Some(rest) = line.strip_prefix("export ") {
        let keyword = rest.trim_start();
        return [
            "const ", "let ", "var ", "function ", "async ", "class ", "default ", "{", "*",
        ]
        .iter()
        .any(|k| keyword.starts_with(k));
    }
    false
}

/// `<include>path</include>` on a line of its own
fn include_target(line: &str) -> Option<&str> {
    line.trim()
        .strip_prefix("<include>")?
        .strip_suffix("</include>")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// A multi-line `import`/`export` statement being skipped
struct EsmStatement {
    depth: i32,
    awaiting_from: bool,
}

impl EsmStatement {
    fn start(line: &str) -> Self {
        let trimmed = line.trim();
        let side_effect = trimmed.starts_with("import \"") || trimmed.starts_with("import '");
        Self {
            depth: 0,
            awaiting_from: trimmed.starts_with("import ") && !side_effect,
        }
    }

    /// Consume a line; true once the statement is complete
    fn feed(&mut self, line: &str) -> bool {
        for c in line.chars() {
            match c {
                '{' | '(' | '[' => self.depth += 1,
                '}' | ')' | ']' => self.depth -= 1,
                _ => {}
            }
        }
        if line.contains(" from ") || line.trim_start().starts_with("from ") {
            self.awaiting_from = false;
        }
        self.depth <= 0 && !self.awaiting_from
    }
}

/// Tracks capitalised JSX component tags across lines
#[derive(Default)]
struct TagBalance {
    open: Vec<String>,
    /// Opening tag whose `>` has not been seen yet
    pending: Option<String>,
}

impl TagBalance {
    fn scan(&mut self, line: &str, url: &str) -> RenderResult<()> {
        let text = blank_inline_code(line);
        let mut i = 0;

        if let Some(name) = self.pending.take() {
            match find_tag_end(&text, 0) {
                Some((end, self_closing)) => {
                    if !self_closing {
                        self.open.push(name);
                    }
                    i = end + 1;
                }
                None => {
                    self.pending = Some(name);
                    return Ok(());
                }
            }
        }

        while let Some(rel) = text[i..].find('<') {
            let at = i + rel;

            if let Some(after) = text[at + 1..].strip_prefix('/') {
                let name = tag_name(after);
                if is_component(name) {
                    match self.open.pop() {
                        Some(open) if open == name => {}
                        Some(open) => {
                            return Err(RenderError::malformed(
                                url,
                                format!("expected </{}>, found </{}>", open, name),
                            ))
                        }
                        None => {
                            return Err(RenderError::malformed(
                                url,
                                format!("unexpected closing tag </{}>", name),
                            ))
                        }
                    }
                }
                i = at + 2 + name.len();
                continue;
            }

            let name = tag_name(&text[at + 1..]);
            if !is_component(name) {
                i = at + 1;
                continue;
            }

            match find_tag_end(&text, at + 1 + name.len()) {
                Some((end, self_closing)) => {
                    if !self_closing {
                        self.open.push(name.to_string());
                    }
                    i = end + 1;
                }
                None => {
                    self.pending = Some(name.to_string());
                    return Ok(());
                }
            }
        }

        Ok(())
    }

    fn finish(self, url: &str) -> RenderResult<()> {
        if let Some(name) = self.pending {
            return Err(RenderError::malformed(url, format!("unterminated tag <{}", name)));
        }
        if let Some(name) = self.open.last() {
            return Err(RenderError::malformed(url, format!("unclosed component <{}>", name)));
        }
        Ok(())
    }
}

fn tag_name(s: &str) -> &str {
    let end = s
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '.' || c == '_'))
        .unwrap_or(s.len());
    &s[..end]
}

fn is_component(name: &str) -> bool {
    name.chars().next().map(|c| c.is_ascii_uppercase()).unwrap_or(false)
}

/// Index of the `>` closing a tag, skipping quoted values and `{}`
/// expressions, and whether the tag self-closes.
fn find_tag_end(text: &str, from: usize) -> Option<(usize, bool)> {
    let mut quote: Option<char> = None;
    let mut depth = 0usize;

    for (offset, c) in text[from..].char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None => match c {
                '"' | '\'' => quote = Some(c),
                '{' => depth += 1,
                '}' => depth = depth.saturating_sub(1),
                '>' if depth == 0 => {
                    let end = from + offset;
                    return Some((end, text[..end].trim_end().ends_with('/')));
                }
                _ => {}
            },
        }
    }
    None
}

/// Replace inline code spans with spaces so their contents are not scanned
fn blank_inline_code(line: &str) -> String {
    let mut in_code = false;
    line.chars()
        .map(|c| {
            if c == '`' {
                in_code = !in_code;
                ' '
            } else if in_code {
                ' '
            } else {
                c
            }
        })
        .collect()
}
