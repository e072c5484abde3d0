use std::path::Path;

use anyhow::Context;

use crate::foundation::error::{GobanError, GobanResult};
use crate::record::model::{Command, RecordNode};

/// Read and tokenize a record file.
pub fn read_record(path: impl AsRef<Path>) -> GobanResult<Vec<RecordNode>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read record '{}'", path.display()))?;
    parse_sgf(&text)
}

/// Tokenize record text into nodes along the main line.
///
/// Only the first variation at every branch point is followed. Property identifiers keep their
/// uppercase letters (old-style lowercase letters are dropped); `\` escapes the next character
/// inside a value.
pub fn parse_sgf(text: &str) -> GobanResult<Vec<RecordNode>> {
    let mut p = Tokenizer {
        chars: text.chars().collect(),
        pos: 0,
    };
    let mut nodes = Vec::<RecordNode>::new();
    // `finished[d]` is set once a variation opened at depth `d` has closed; further siblings
    // at that depth are skipped.
    let mut finished = Vec::<bool>::new();
    let mut depth = 0usize;
    let mut seen_tree = false;

    while let Some(c) = p.peek() {
        match c {
            '(' => {
                p.pos += 1;
                depth += 1;
                seen_tree = true;
                if finished.len() <= depth {
                    finished.resize(depth + 1, false);
                }
                if finished[depth] {
                    p.skip_subtree()?;
                    depth -= 1;
                    continue;
                }
                for f in finished.iter_mut().skip(depth + 1) {
                    *f = false;
                }
            }
            ')' => {
                p.pos += 1;
                if depth == 0 {
                    return Err(GobanError::record("unbalanced ')' in record"));
                }
                finished[depth] = true;
                depth -= 1;
            }
            ';' => {
                p.pos += 1;
                nodes.push(p.node()?);
            }
            c if c.is_whitespace() => p.pos += 1,
            other => {
                return Err(GobanError::record(format!(
                    "unexpected '{other}' at offset {}",
                    p.pos
                )));
            }
        }
    }

    if !seen_tree {
        return Err(GobanError::record("record has no game tree"));
    }
    if depth != 0 {
        return Err(GobanError::record("unterminated game tree"));
    }
    Ok(nodes)
}

struct Tokenizer {
    chars: Vec<char>,
    pos: usize,
}

impl Tokenizer {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn node(&mut self) -> GobanResult<RecordNode> {
        let mut commands = Vec::new();
        loop {
            self.skip_ws();
            match self.peek() {
                Some(c) if c.is_ascii_alphabetic() => commands.push(self.property()?),
                _ => break,
            }
        }
        Ok(RecordNode::new(commands))
    }

    fn property(&mut self) -> GobanResult<Command> {
        let mut ident = String::new();
        while let Some(c) = self.peek().filter(char::is_ascii_alphabetic) {
            if c.is_ascii_uppercase() {
                ident.push(c);
            }
            self.pos += 1;
        }
        let mut params = Vec::new();
        loop {
            self.skip_ws();
            if self.peek() != Some('[') {
                break;
            }
            self.pos += 1;
            params.push(self.value()?);
        }
        if params.is_empty() {
            return Err(GobanError::record(format!(
                "property '{ident}' has no value"
            )));
        }
        // `B[]` is a pass: keep the command but drop the empty value.
        params.retain(|p: &String| !p.is_empty());
        Ok(Command::new(&ident, params))
    }

    fn value(&mut self) -> GobanResult<String> {
        let mut out = String::new();
        loop {
            let Some(c) = self.peek() else {
                return Err(GobanError::record("unterminated property value"));
            };
            self.pos += 1;
            match c {
                ']' => return Ok(out),
                '\\' => {
                    if let Some(next) = self.peek() {
                        self.pos += 1;
                        // escaped line breaks are soft breaks
                        if next != '\n' && next != '\r' {
                            out.push(next);
                        }
                    }
                }
                c => out.push(c),
            }
        }
    }

    fn skip_subtree(&mut self) -> GobanResult<()> {
        let mut depth = 1usize;
        let mut in_value = false;
        while let Some(c) = self.peek() {
            self.pos += 1;
            if in_value {
                match c {
                    '\\' => self.pos += 1,
                    ']' => in_value = false,
                    _ => {}
                }
                continue;
            }
            match c {
                '[' => in_value = true,
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                _ => {}
            }
        }
        Err(GobanError::record("unterminated variation"))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/record/parse.rs"]
mod tests;
