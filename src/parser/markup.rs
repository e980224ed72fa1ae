use crate::error::MarkupError;
use crate::parser::node::MarkupNode;
use std::str::Lines;

// Line-oriented reader: every physical line carries exactly one opening or
// closing tag. Not a general XML parser.

struct LineReader<'a> {
    lines: Lines<'a>,
    line_no: usize,
}

impl<'a> LineReader<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines(),
            line_no: 0,
        }
    }

    fn next_line(&mut self) -> Result<&'a str, MarkupError> {
        match self.lines.next() {
            Some(line) => {
                self.line_no += 1;
                Ok(line.trim())
            }
            None => Err(MarkupError::UnexpectedEof { line: self.line_no }),
        }
    }
}

/// Builds the node tree of `text`; the first line (declaration) is skipped.
pub fn parse_markup(text: &str) -> Result<MarkupNode, MarkupError> {
    let mut reader = LineReader::new(text);
    reader.next_line()?;
    match load_node(&mut reader)? {
        Some(root) => Ok(root),
        None => Err(MarkupError::MissingTag {
            line: reader.line_no,
            text: "closing tag without an open element".to_string(),
        }),
    }
}

/// `None` when the consumed line closes the enclosing element.
fn load_node(reader: &mut LineReader<'_>) -> Result<Option<MarkupNode>, MarkupError> {
    let line = reader.next_line()?;
    if line.starts_with("</") {
        return Ok(None);
    }

    let tag = start_tag(line).ok_or_else(|| MarkupError::MissingTag {
        line: reader.line_no,
        text: line.to_string(),
    })?;
    let mut parts = tag.split(' ');
    let name = parts.next().unwrap_or_default().replace('/', "");
    if name.is_empty() {
        return Err(MarkupError::MissingTag {
            line: reader.line_no,
            text: line.to_string(),
        });
    }

    let mut node = MarkupNode::new(name);
    for part in parts.filter(|p| p.contains('=')) {
        add_attribute(part, &mut node);
    }
    if let Some(data) = inline_data(line) {
        node.set_data(data);
    }
    if line.contains("</") || line.contains("/>") {
        return Ok(Some(node));
    }

    while let Some(child) = load_node(reader)? {
        node.add_child(child);
    }
    Ok(Some(node))
}

/// Content between the first `<` and the next `>`.
fn start_tag(line: &str) -> Option<&str> {
    let open = line.find('<')?;
    let rest = &line[open + 1..];
    // at least one character inside the brackets
    let close = find_after_first_char(rest, '>')?;
    Some(&rest[..close])
}

/// Text between the first `>` and the following `<`, if non-empty.
fn inline_data(line: &str) -> Option<&str> {
    let gt = line.find('>')?;
    let rest = &line[gt + 1..];
    let lt = find_after_first_char(rest, '<')?;
    Some(&rest[..lt])
}

/// Byte offset of `pat` in `text`, searching past its first character.
fn find_after_first_char(text: &str, pat: char) -> Option<usize> {
    let skip = text.chars().next()?.len_utf8();
    Some(text[skip..].find(pat)? + skip)
}

fn add_attribute(part: &str, node: &mut MarkupNode) {
    let (name, value) = part.split_once('=').unwrap_or((part, ""));
    let value = value.split('"').nth(1).unwrap_or("");
    node.add_attribute(name, value);
}
