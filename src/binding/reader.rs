//! Textual syntax for binding forms
//!
//! ```text
//! ; leader bindings
//! :prefix "SPC"  normal global-map  |  "f" #'find-file  "b" switch-to-buffer
//! || :ext t  ("w" save-buffer :which-key "save")
//! ```
//!
//! `|` separates sections, `||` separates and clears, `:name` is an option,
//! `[...]` a vector, `(...)` a list, `#'name` a function reference. A leading
//! `'` is accepted and ignored.

use thiserror::Error;

use super::element::Element;

/// Failure to read the textual syntax
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{line}:{column}: {message}")]
pub struct ReadError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

/// Read a whole binding form
pub fn read(source: &str) -> Result<Vec<Element>, ReadError> {
    Reader::new(source).read_all()
}

struct Reader {
    chars: Vec<char>,
    index: usize,
    line: usize,
    column: usize,
}

fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || matches!(c, '(' | ')' | '[' | ']' | '"' | ';')
}

impl Reader {
    fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            index: 0,
            line: 1,
            column: 1,
        }
    }

    fn eof(&self) -> bool {
        self.index >= self.chars.len()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.index).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.index + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.index += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn error<T>(&self, message: impl Into<String>) -> Result<T, ReadError> {
        Err(ReadError {
            line: self.line,
            column: self.column,
            message: message.into(),
        })
    }

    fn skip_ws_and_comments(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance();
            } else if c == ';' {
                while let Some(c) = self.advance() {
                    if c == '\n' {
                        break;
                    }
                }
            } else {
                break;
            }
        }
    }

    fn read_all(&mut self) -> Result<Vec<Element>, ReadError> {
        let mut elements = Vec::new();
        self.skip_ws_and_comments();
        while !self.eof() {
            elements.push(self.read_form()?);
            self.skip_ws_and_comments();
        }
        Ok(elements)
    }

    fn read_form(&mut self) -> Result<Element, ReadError> {
        self.skip_ws_and_comments();
        let Some(c) = self.peek() else {
            return self.error("unexpected end of input");
        };

        match c {
            '(' => self.read_seq(')').map(Element::List),
            '[' => self.read_seq(']').map(Element::Vector),
            ')' | ']' => self.error(format!("unexpected closing delimiter '{}'", c)),
            '"' => self.read_string(),
            '\'' => {
                self.advance();
                if self.peek().map_or(true, char::is_whitespace) {
                    return self.error("quote must be followed by a form");
                }
                self.read_form()
            }
            '#' if self.peek_at(1) == Some('\'') => {
                self.advance();
                self.advance();
                let name = self.read_token();
                if name.is_empty() {
                    return self.error("function reference without a name");
                }
                Ok(Element::Function(name))
            }
            ':' => {
                self.advance();
                let name = self.read_token();
                if name.is_empty() {
                    return self.error("option name without a name");
                }
                Ok(Element::Keyword(name))
            }
            _ => {
                let atom = self.read_token();
                Ok(match atom.as_str() {
                    "|" => Element::Separator,
                    "||" => Element::ClearingSeparator,
                    _ => Element::Symbol(atom),
                })
            }
        }
    }

    fn read_token(&mut self) -> String {
        let mut token = String::new();
        while let Some(c) = self.peek() {
            if is_delimiter(c) {
                break;
            }
            token.push(c);
            self.advance();
        }
        token
    }

    fn read_seq(&mut self, close: char) -> Result<Vec<Element>, ReadError> {
        let (line, column) = (self.line, self.column);
        self.advance(); // opening delimiter
        let mut items = Vec::new();
        self.skip_ws_and_comments();
        while let Some(c) = self.peek() {
            if c == close {
                self.advance();
                return Ok(items);
            }
            items.push(self.read_form()?);
            self.skip_ws_and_comments();
        }
        Err(ReadError {
            line,
            column,
            message: format!("unterminated sequence, expected '{}'", close),
        })
    }

    fn read_string(&mut self) -> Result<Element, ReadError> {
        let (line, column) = (self.line, self.column);
        self.advance(); // "
        let mut text = String::new();
        while let Some(c) = self.advance() {
            match c {
                '"' => return Ok(Element::Str(text)),
                '\\' => match self.advance() {
                    Some('n') => text.push('\n'),
                    Some('t') => text.push('\t'),
                    Some(other) => text.push(other),
                    None => break,
                },
                c => text.push(c),
            }
        }
        Err(ReadError {
            line,
            column,
            message: "unterminated string".to_string(),
        })
    }
}
