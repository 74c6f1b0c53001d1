//! Lexer (tokenizer) for netlist records.

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The kind of token
    pub kind: TokenKind,
    /// The token's text
    pub text: String,
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed)
    pub column: usize,
}

/// Token types in a netlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// A bare word (record kind, label, anything non-numeric)
    Word,
    /// A number (integer or floating point, possibly with suffix)
    Number,
    /// End of a record line
    Newline,
    /// End of file
    Eof,
}

/// Lexer for tokenizing netlist input.
///
/// Records are whitespace-delimited; `#` and `;` start a comment that runs
/// to the end of the line.
pub struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input.
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            line: 1,
            column: 1,
        }
    }

    /// Get the next token.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace_and_comments();

        let start_line = self.line;
        let start_column = self.column;

        match self.chars.peek().copied() {
            None => Token {
                kind: TokenKind::Eof,
                text: String::new(),
                line: start_line,
                column: start_column,
            },
            Some('\n') => {
                self.advance();
                Token {
                    kind: TokenKind::Newline,
                    text: "\n".to_string(),
                    line: start_line,
                    column: start_column,
                }
            }
            Some(_) => {
                let text = self.read_word();
                let kind = if parse_value(&text).is_some() {
                    TokenKind::Number
                } else {
                    TokenKind::Word
                };
                Token {
                    kind,
                    text,
                    line: start_line,
                    column: start_column,
                }
            }
        }
    }

    /// Collect the tokens of the next non-empty line, without the newline.
    ///
    /// Returns `None` at end of input.
    pub fn next_line(&mut self) -> Option<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            match token.kind {
                TokenKind::Eof => {
                    return if tokens.is_empty() { None } else { Some(tokens) };
                }
                TokenKind::Newline => {
                    if !tokens.is_empty() {
                        return Some(tokens);
                    }
                }
                TokenKind::Word | TokenKind::Number => tokens.push(token),
            }
        }
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn skip_whitespace_and_comments(&mut self) {
        while let Some(&ch) = self.chars.peek() {
            if ch == ' ' || ch == '\t' || ch == '\r' {
                self.advance();
            } else if ch == '#' || ch == ';' {
                // Skip comment until end of line
                while let Some(&c) = self.chars.peek() {
                    if c == '\n' {
                        break;
                    }
                    self.advance();
                }
            } else {
                break;
            }
        }
    }

    fn read_word(&mut self) -> String {
        let mut text = String::new();
        while let Some(&ch) = self.chars.peek() {
            if ch.is_whitespace() || ch == '#' || ch == ';' {
                break;
            }
            text.push(ch);
            self.advance();
        }
        text
    }
}

/// Parse a number string with optional unit suffix.
pub fn parse_value(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let (num_str, multiplier) = if let Some(last) = text.chars().last() {
        let mult = match last {
            'p' => 1e-12,
            'n' => 1e-9,
            'u' | 'µ' => 1e-6,
            'm' => 1e-3,
            'k' | 'K' => 1e3,
            'M' => 1e6,
            'G' => 1e9,
            _ => 1.0,
        };
        if mult != 1.0 {
            (&text[..text.len() - last.len_utf8()], mult)
        } else {
            (text, 1.0)
        }
    } else {
        (text, 1.0)
    };

    // Rust's float parser accepts "inf" and "NaN", which are never valid values here
    let value = num_str.parse::<f64>().ok()? * multiplier;
    value.is_finite().then_some(value)
}
