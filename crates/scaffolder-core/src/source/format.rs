//! Formatting pass used before and after every source edit
//!
//! Script files are normalized in two stages:
//!
//! - **Collapse**: list-like constructs (`(...)`, `[...]`, object and import braces) are
//!   folded onto a single line so that every import statement and every array literal
//!   can be matched line by line. Block bodies, parenthesised JSX and object or type
//!   literals whose members cannot share a line keep their lines.
//! - **Finish**: per-line cleanup restoring the house style (quotes, semicolons, wrapped
//!   imports, blank lines, final newline).
//!
//! This is deliberately not a parser. It tracks just enough lexical state (strings,
//! template literals, comments, regex literals, bracket nesting) to avoid rewriting the
//! inside of literals, and reports a [`FormatError`] when that state does not balance.

use crate::error::FormatError;
use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;
use tokio::fs;
use walkdir::WalkDir;

/// Extensions that receive the full script pass
const SCRIPT_EXTENSIONS: &[&str] = &["js", "jsx", "mjs", "cjs", "ts", "tsx"];

/// Directories never descended into by [`format_tree`]
const SKIPPED_DIRS: &[&str] = &["node_modules", "dist", "build"];

/// Words after which `{` opens an object or import list rather than a block
const LIST_KEYWORDS: &[&str] = &[
    "import", "export", "return", "default", "type", "typeof", "in", "of", "yield", "await",
];

/// `case x:`, `default:` or `label:` ahead of a braced statement
static STATEMENT_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:case\b.*|default|[A-Za-z_$][\w$]*)\s*:$").expect("valid label pattern")
});

static WRAPPABLE_IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^import (?P<head>[\w$]+, )?\{ (?P<items>[^{}]*) \} from (?P<tail>.+)$")
        .expect("valid import pattern")
});

/// Trailing comma policy for wrapped lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrailingComma {
    #[default]
    All,
    Es5,
    None,
}

/// Fully resolved formatting options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatStyle {
    pub single_quote: bool,
    pub semi: bool,
    pub trailing_comma: TrailingComma,
    pub print_width: usize,
}

impl Default for FormatStyle {
    fn default() -> Self {
        Self::house()
    }
}

impl FormatStyle {
    /// The canonical house style of generated projects
    pub fn house() -> Self {
        Self {
            single_quote: true,
            semi: false,
            trailing_comma: TrailingComma::All,
            print_width: 80,
        }
    }

    /// House style with the given overrides applied on top
    pub fn resolve(overrides: &StyleOverrides) -> Self {
        let house = Self::house();
        Self {
            single_quote: overrides.single_quote.unwrap_or(house.single_quote),
            semi: overrides.semi.unwrap_or(house.semi),
            trailing_comma: overrides.trailing_comma.unwrap_or(house.trailing_comma),
            print_width: overrides.print_width.unwrap_or(house.print_width),
        }
    }

    fn quote(&self) -> char {
        if self.single_quote {
            '\''
        } else {
            '"'
        }
    }
}

/// Partial style, as read from a user style file. Keys mirror prettier's option names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StyleOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub single_quote: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semi: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trailing_comma: Option<TrailingComma>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub print_width: Option<usize>,
}

impl StyleOverrides {
    /// The same overrides with an unbounded print width, so nothing gets wrapped
    pub fn single_line(&self) -> Self {
        Self {
            print_width: Some(usize::MAX),
            ..self.clone()
        }
    }
}

/// Whether a path gets the full script pass
pub fn is_script(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SCRIPT_EXTENSIONS.contains(&ext))
}

/// Normalize `source` to the resolved style. The file path only selects the pass.
pub fn normalize(
    source: &str,
    path: &Path,
    overrides: &StyleOverrides,
) -> Result<String, FormatError> {
    let style = FormatStyle::resolve(overrides);

    if !is_script(path) {
        let lines = source
            .split('\n')
            .map(|line| (line.trim_end().to_string(), LineMeta::default()))
            .collect();
        return Ok(assemble(lines));
    }

    let (collapsed, metas) = Collapser::new(source, style.quote()).run()?;
    Ok(finish(&collapsed, &metas, &style))
}

/// Normalize a file in place. Returns whether the content changed.
pub async fn format_file(path: &Path, overrides: &StyleOverrides) -> Result<bool> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let formatted = normalize(&content, path, overrides)
        .with_context(|| format!("Failed to format {}", path.display()))?;

    if formatted == content {
        return Ok(false);
    }

    fs::write(path, &formatted)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), "formatted");
    Ok(true)
}

/// Normalize every script file below `dir`, skipping dependency and hidden directories.
/// Returns the files that changed.
pub async fn format_tree(dir: &Path, overrides: &StyleOverrides) -> Result<Vec<String>> {
    let mut changed = Vec::new();

    let walker = WalkDir::new(dir).into_iter().filter_entry(|entry| {
        let name = entry.file_name().to_string_lossy();
        entry.depth() == 0
            || !(entry.file_type().is_dir()
                && (name.starts_with('.') || SKIPPED_DIRS.contains(&name.as_ref())))
    });

    for entry in walker {
        let entry = entry.with_context(|| format!("Failed to walk {}", dir.display()))?;
        if !entry.file_type().is_file() || !is_script(entry.path()) {
            continue;
        }
        if format_file(entry.path(), overrides).await? {
            let relative = entry.path().strip_prefix(dir).unwrap_or(entry.path());
            changed.push(relative.display().to_string());
        }
    }

    Ok(changed)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    Paren,
    /// Parenthesised JSX, kept verbatim
    Jsx,
    /// `{...}` expression container inside JSX
    JsxExpr,
    Bracket,
    /// Object literal, import/export list
    List,
    /// Object or type literal whose members cannot share a line
    Members,
    /// Function, class or control-flow body
    Block,
    /// `${...}` inside a template literal
    TemplateExpr,
}

impl Frame {
    fn collapses(self) -> bool {
        matches!(self, Frame::Paren | Frame::Bracket | Frame::List)
    }

    fn opener(self) -> char {
        match self {
            Frame::Paren | Frame::Jsx => '(',
            Frame::Bracket => '[',
            _ => '{',
        }
    }

    fn closer(self) -> char {
        match self {
            Frame::Paren | Frame::Jsx => ')',
            Frame::Bracket => ']',
            _ => '}',
        }
    }
}

/// What the finishing pass needs to know about each output line
#[derive(Debug, Clone, Copy, Default)]
struct LineMeta {
    /// The line ends at statement level (top level or directly inside a block)
    statement_end: bool,
    /// The line ends inside a string, template literal or comment
    in_literal: bool,
}

struct Collapser {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    quote: char,
    out: String,
    stack: Vec<(Frame, usize)>,
    lines: Vec<LineMeta>,
    pad_next: bool,
}

impl Collapser {
    fn new(source: &str, quote: char) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            quote,
            out: String::with_capacity(source.len()),
            stack: Vec::new(),
            lines: Vec::new(),
            pad_next: false,
        }
    }

    fn run(mut self) -> Result<(String, Vec<LineMeta>), FormatError> {
        while let Some(c) = self.peek(0) {
            match c {
                ' ' | '\t' | '\r' | '\n' => self.whitespace(),
                '\'' | '"' => self.string(c)?,
                '`' => {
                    self.before_token();
                    self.out.push('`');
                    self.pos += 1;
                    self.template_body(self.line)?;
                }
                '/' if self.peek(1) == Some('/') && !self.in_jsx() => self.line_comment(),
                '/' if self.peek(1) == Some('*') => self.block_comment()?,
                '/' if !self.in_jsx() && self.regex_allowed() => self.regex()?,
                '(' => self.open_paren(),
                '[' => self.open(Frame::Bracket),
                '{' => self.open_brace(),
                ')' | ']' | '}' => self.close(c)?,
                ',' => self.comma(),
                _ => {
                    self.before_token();
                    self.out.push(c);
                    self.pos += 1;
                }
            }
        }

        if let Some(&(frame, line)) = self.stack.last() {
            return Err(FormatError::UnclosedBracket {
                opener: frame.opener(),
                line,
            });
        }

        self.lines.push(LineMeta {
            statement_end: true,
            in_literal: false,
        });
        Ok((self.out, self.lines))
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn top(&self) -> Option<Frame> {
        self.stack.last().map(|(frame, _)| *frame)
    }

    fn collapsing(&self) -> bool {
        self.top().is_some_and(Frame::collapses)
    }

    fn in_jsx(&self) -> bool {
        self.top() == Some(Frame::Jsx)
    }

    fn newline(&mut self, in_literal: bool) {
        let statement_end =
            !in_literal && matches!(self.top(), None | Some(Frame::Block | Frame::Members));
        self.lines.push(LineMeta {
            statement_end,
            in_literal,
        });
        self.out.push('\n');
    }

    /// Copy literal text, keeping line bookkeeping for embedded newlines
    fn emit_literal(&mut self, text: &str) {
        for c in text.chars() {
            if c == '\n' {
                self.newline(true);
            } else {
                self.out.push(c);
            }
        }
    }

    fn before_token(&mut self) {
        if self.pad_next {
            self.pad_next = false;
            if !self.out.ends_with(' ') {
                self.out.push(' ');
            }
        }
    }

    fn trim_spaces(&mut self) {
        while self.out.ends_with([' ', '\t']) {
            self.out.pop();
        }
    }

    fn whitespace(&mut self) {
        let start = self.pos;
        while let Some(c) = self.peek(0) {
            if !matches!(c, ' ' | '\t' | '\r' | '\n') {
                break;
            }
            if c == '\n' {
                self.line += 1;
            }
            self.pos += 1;
        }

        if self.collapsing() {
            let next = self.peek(0);
            if self.out.ends_with(['(', '['])
                || matches!(next, None | Some(')') | Some(']') | Some('}') | Some(','))
            {
                return;
            }
            self.pad_next = false;
            if !self.out.ends_with(' ') {
                self.out.push(' ');
            }
            return;
        }

        let run: String = self.chars[start..self.pos].iter().collect();
        for c in run.chars() {
            match c {
                '\n' => self.newline(false),
                '\r' => {}
                _ => self.out.push(c),
            }
        }
    }

    fn string(&mut self, quote: char) -> Result<(), FormatError> {
        let in_jsx = self.in_jsx();

        // Inside JSX text a quote is an ordinary character; only attribute values are strings.
        if in_jsx && !self.out.ends_with('=') {
            self.before_token();
            self.out.push(quote);
            self.pos += 1;
            return Ok(());
        }

        let start_line = self.line;
        self.pos += 1;
        let mut body = String::new();
        loop {
            match self.peek(0) {
                None | Some('\n') => {
                    return Err(FormatError::UnterminatedString { line: start_line })
                }
                Some('\\') => {
                    body.push('\\');
                    self.pos += 1;
                    let escaped = self
                        .peek(0)
                        .ok_or(FormatError::UnterminatedString { line: start_line })?;
                    if escaped == '\n' {
                        self.line += 1;
                    }
                    body.push(escaped);
                    self.pos += 1;
                }
                Some(c) if c == quote => {
                    self.pos += 1;
                    break;
                }
                Some(c) => {
                    body.push(c);
                    self.pos += 1;
                }
            }
        }

        let quote = if in_jsx || contains_unescaped(&body, self.quote) {
            quote
        } else {
            self.quote
        };

        self.before_token();
        self.out.push(quote);
        self.emit_literal(&body);
        self.out.push(quote);
        Ok(())
    }

    /// Copy a template literal body up to the closing backtick or the next `${`
    fn template_body(&mut self, start_line: usize) -> Result<(), FormatError> {
        loop {
            match self.peek(0) {
                None => return Err(FormatError::UnterminatedTemplate { line: start_line }),
                Some('\\') => {
                    self.out.push('\\');
                    self.pos += 1;
                    if let Some(escaped) = self.peek(0) {
                        self.emit_literal(&escaped.to_string());
                        if escaped == '\n' {
                            self.line += 1;
                        }
                        self.pos += 1;
                    }
                }
                Some('`') => {
                    self.out.push('`');
                    self.pos += 1;
                    return Ok(());
                }
                Some('$') if self.peek(1) == Some('{') => {
                    self.out.push_str("${");
                    self.pos += 2;
                    self.stack.push((Frame::TemplateExpr, self.line));
                    return Ok(());
                }
                Some(c) => {
                    if c == '\n' {
                        self.line += 1;
                        self.newline(true);
                    } else {
                        self.out.push(c);
                    }
                    self.pos += 1;
                }
            }
        }
    }

    fn line_comment(&mut self) {
        let start = self.pos;
        while self.peek(0).is_some_and(|c| c != '\n') {
            self.pos += 1;
        }
        let comment: String = self.chars[start..self.pos].iter().collect();

        self.before_token();
        if self.collapsing() {
            // The rest of the list joins this line, so the comment has to be closed.
            let text = comment[2..].trim().replace("*/", "* /");
            self.out.push_str(&format!("/* {} */", text));
        } else {
            self.out.push_str(comment.trim_end());
        }
    }

    fn block_comment(&mut self) -> Result<(), FormatError> {
        let start_line = self.line;
        let start = self.pos;
        self.pos += 2;
        loop {
            match self.peek(0) {
                None => return Err(FormatError::UnterminatedComment { line: start_line }),
                Some('*') if self.peek(1) == Some('/') => {
                    self.pos += 2;
                    break;
                }
                Some(c) => {
                    if c == '\n' {
                        self.line += 1;
                    }
                    self.pos += 1;
                }
            }
        }

        let comment: String = self.chars[start..self.pos].iter().collect();
        self.before_token();
        self.emit_literal(&comment);
        Ok(())
    }

    /// A `/` starts a regex literal when it cannot be a division
    fn regex_allowed(&self) -> bool {
        let before = self.out.trim_end();
        before.is_empty()
            || before.ends_with(['(', ',', '=', ':', '[', '!', '&', '|', '?', '{', ';'])
            || ends_with_word(before, "return")
            || ends_with_word(before, "typeof")
            || ends_with_word(before, "case")
    }

    fn regex(&mut self) -> Result<(), FormatError> {
        let start = self.pos;
        let line = self.line;
        self.pos += 1;
        let mut in_class = false;
        loop {
            match self.peek(0) {
                None | Some('\n') => return Err(FormatError::UnterminatedRegex { line }),
                Some('\\') => self.pos += 2,
                Some('[') => {
                    in_class = true;
                    self.pos += 1;
                }
                Some(']') => {
                    in_class = false;
                    self.pos += 1;
                }
                Some('/') if !in_class => {
                    self.pos += 1;
                    break;
                }
                Some(_) => self.pos += 1,
            }
        }
        while self.peek(0).is_some_and(|c| c.is_ascii_alphabetic()) {
            self.pos += 1;
        }

        let literal: String = self.chars[start..self.pos.min(self.chars.len())]
            .iter()
            .collect();
        self.before_token();
        self.out.push_str(&literal);
        Ok(())
    }

    fn open(&mut self, frame: Frame) {
        self.before_token();
        self.out.push(frame.opener());
        self.stack.push((frame, self.line));
        self.pos += 1;
        if frame == Frame::List {
            self.pad_next = true;
        }
    }

    fn open_paren(&mut self) {
        let next = self.chars[self.pos + 1..]
            .iter()
            .find(|c| !c.is_whitespace())
            .copied();
        if next == Some('<') {
            self.open(Frame::Jsx);
        } else {
            self.open(Frame::Paren);
        }
    }

    fn open_brace(&mut self) {
        if self.in_jsx() {
            self.open(Frame::JsxExpr);
            return;
        }

        let before = self.out.trim_end();
        let statement = before
            .rsplit(['\n', ';', '{', '}'])
            .next()
            .unwrap_or(before);
        if matches!(self.top(), None | Some(Frame::Block)) && STATEMENT_LABEL.is_match(statement)
        {
            self.open(Frame::Block);
            return;
        }

        let list = !before.ends_with("=>")
            && (before.ends_with(['=', ':', '(', ',', '[', '?', '!', '&', '|'])
                || (self.top() == Some(Frame::JsxExpr) && before.ends_with('{'))
                || LIST_KEYWORDS.iter().any(|word| ends_with_word(before, word)));

        let frame = if !list {
            Frame::Block
        } else if self.joinable() {
            Frame::List
        } else {
            Frame::Members
        };
        self.open(frame);
    }

    /// Whether the braces opening at the cursor fit on one line.
    ///
    /// They do not when a line break directly inside them separates two members
    /// without a comma (type literal members, statements), or when they span lines
    /// and hold a method or arrow body.
    fn joinable(&self) -> bool {
        let mut depth = 0usize;
        let mut last = '{';
        let mut arrow = false;
        let mut broken = false;
        let mut multiline = false;
        let mut holds_body = false;
        let mut i = self.pos;

        while let Some(&c) = self.chars.get(i) {
            let next = self.chars.get(i + 1).copied();
            match c {
                '\n' => {
                    multiline = true;
                    broken |= depth == 1;
                    i += 1;
                    continue;
                }
                _ if c.is_whitespace() => {
                    i += 1;
                    continue;
                }
                '/' if next == Some('/') => {
                    while self.chars.get(i).is_some_and(|&c| c != '\n') {
                        i += 1;
                    }
                    continue;
                }
                '/' if next == Some('*') => {
                    i += 2;
                    while let Some(&c) = self.chars.get(i) {
                        if c == '*' && self.chars.get(i + 1) == Some(&'/') {
                            break;
                        }
                        multiline |= c == '\n';
                        i += 1;
                    }
                    i += 2;
                    continue;
                }
                _ => {}
            }

            if std::mem::take(&mut broken) && ends_operand(last) && starts_operand(c) {
                return false;
            }

            match c {
                '\'' | '"' => i = skip_string(&self.chars, i),
                '`' => i = skip_template(&self.chars, i),
                '{' => {
                    holds_body |= depth > 0 && (last == ')' || arrow);
                    depth += 1;
                }
                '(' | '[' => depth += 1,
                '}' | ')' | ']' => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return !(multiline && holds_body);
                    }
                }
                _ => {}
            }
            arrow = last == '=' && c == '>';
            last = c;
            i += 1;
        }
        true
    }

    fn close(&mut self, c: char) -> Result<(), FormatError> {
        let line = self.line;
        let (frame, _) = self
            .stack
            .pop()
            .ok_or(FormatError::UnbalancedBracket { found: c, line })?;
        if frame.closer() != c {
            return Err(FormatError::UnbalancedBracket { found: c, line });
        }

        self.pad_next = false;
        self.pos += 1;

        if frame.collapses() {
            self.trim_spaces();
            if self.out.ends_with(',') {
                self.out.pop();
                self.trim_spaces();
            }
            if frame == Frame::List && !self.out.ends_with('{') {
                self.out.push(' ');
            }
        }
        self.out.push(c);

        if frame == Frame::TemplateExpr {
            self.template_body(line)?;
        }
        Ok(())
    }

    fn comma(&mut self) {
        self.pos += 1;
        if self.collapsing() {
            self.pad_next = false;
            self.trim_spaces();
            self.out.push(',');
            self.pad_next = true;
        } else {
            self.before_token();
            self.out.push(',');
        }
    }
}

/// Last character of a token that a following identifier could not continue
fn ends_operand(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '$' | ')' | ']' | '}' | '\'' | '"' | '`')
}

fn starts_operand(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '$' | '\'' | '"' | '#' | '@')
}

/// Index of the closing quote of the string starting at `start`, or where the line ends
fn skip_string(chars: &[char], start: usize) -> usize {
    let quote = chars[start];
    let mut i = start + 1;
    while let Some(&c) = chars.get(i) {
        match c {
            '\\' => i += 1,
            '\n' => return i,
            _ if c == quote => return i,
            _ => {}
        }
        i += 1;
    }
    i
}

/// Index of the closing backtick of the template starting at `start`
fn skip_template(chars: &[char], start: usize) -> usize {
    let mut nested = 0usize;
    let mut i = start + 1;
    while let Some(&c) = chars.get(i) {
        match c {
            '\\' => i += 1,
            '$' if nested == 0 && chars.get(i + 1) == Some(&'{') => {
                nested = 1;
                i += 1;
            }
            '{' if nested > 0 => nested += 1,
            '}' if nested > 0 => nested -= 1,
            '`' if nested == 0 => return i,
            _ => {}
        }
        i += 1;
    }
    i
}

fn ends_with_word(text: &str, word: &str) -> bool {
    text.strip_suffix(word).is_some_and(|rest| {
        !rest
            .chars()
            .next_back()
            .is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '$' || c == '.')
    })
}

fn contains_unescaped(body: &str, quote: char) -> bool {
    let mut escaped = false;
    for c in body.chars() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == quote {
            return true;
        }
    }
    false
}

fn is_module_declaration(line: &str) -> bool {
    let line = line.trim_start();
    (line.starts_with("import ") || line.starts_with("import{") || line.starts_with("export "))
        && (line.starts_with("import") || line.contains(" from "))
}

/// A line starting with one of these would be glued to the previous statement without a semicolon
fn starts_hazardously(line: &str) -> bool {
    line.trim_start().starts_with(['(', '[', '`'])
}

fn wrap_import(line: &str, style: &FormatStyle) -> Option<Vec<String>> {
    let caps = WRAPPABLE_IMPORT.captures(line)?;
    let head = caps.name("head").map_or("", |m| m.as_str());
    let items: Vec<&str> = caps["items"]
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .collect();
    if items.len() < 2 {
        return None;
    }

    let mut wrapped = vec![format!("import {}{{", head)];
    for (i, item) in items.iter().enumerate() {
        let last = i + 1 == items.len();
        if last && style.trailing_comma == TrailingComma::None {
            wrapped.push(format!("  {}", item));
        } else {
            wrapped.push(format!("  {},", item));
        }
    }
    wrapped.push(format!("}} from {}", &caps["tail"]));
    Some(wrapped)
}

fn finish(collapsed: &str, metas: &[LineMeta], style: &FormatStyle) -> String {
    let raw: Vec<&str> = collapsed.split('\n').collect();
    let mut lines: Vec<(String, LineMeta)> = Vec::with_capacity(raw.len());

    for (i, (line, meta)) in raw.iter().zip(metas).enumerate() {
        if meta.in_literal {
            lines.push((line.to_string(), *meta));
            continue;
        }

        let mut line = line.trim_end().to_string();
        if meta.statement_end {
            if style.semi {
                if is_module_declaration(&line) && line.ends_with(['\'', '"']) {
                    line.push(';');
                }
            } else if line.ends_with(';') {
                let hazard = raw[i + 1..]
                    .iter()
                    .find(|next| !next.trim().is_empty())
                    .is_some_and(|next| starts_hazardously(next));
                if !hazard {
                    line.pop();
                    line.truncate(line.trim_end().len());
                }
            }

            if line.chars().count() > style.print_width {
                if let Some(wrapped) = wrap_import(&line, style) {
                    lines.extend(wrapped.into_iter().map(|l| (l, *meta)));
                    continue;
                }
            }
        }
        lines.push((line, *meta));
    }

    assemble(lines)
}

/// Join lines, collapsing blank runs to one and ending with a single newline
fn assemble(lines: Vec<(String, LineMeta)>) -> String {
    let mut kept: Vec<String> = Vec::with_capacity(lines.len());
    let mut previous_blank = true;

    for (line, meta) in lines {
        let blank = line.trim().is_empty() && !meta.in_literal;
        if blank && previous_blank {
            continue;
        }
        previous_blank = blank;
        kept.push(if blank { String::new() } else { line });
    }

    while kept.last().is_some_and(|line| line.is_empty()) {
        kept.pop();
    }

    if kept.is_empty() {
        return String::new();
    }
    let mut text = kept.join("\n");
    text.push('\n');
    text
}
