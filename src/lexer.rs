use crate::token::{lookup_ident, Token, TokenType};

// Sentinel for "no more input"; the language is ASCII so 0 never
// collides with a real source byte we care about.
const EOF_BYTE: u8 = 0;

/// Pull-based lexer: every `next_token` call consumes at least one input
/// byte (except at end of input) and returns exactly one token. The
/// cursors only ever move forward, so lexing terminates on any input.
pub struct Lexer {
    input: Vec<u8>,
    position: usize,
    read_position: usize,
    ch: u8,
}

impl Lexer {
    pub fn new(input: &str) -> Lexer {
        let mut lexer = Lexer {
            input: input.as_bytes().to_vec(),
            position: 0,
            read_position: 0,
            ch: EOF_BYTE,
        };
        lexer.read_char();
        lexer
    }

    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let token = match self.ch {
            b'=' => {
                if self.peek_char() == b'=' {
                    self.read_char();
                    Token::new(TokenType::Eq, "==")
                } else {
                    Token::new(TokenType::Assign, "=")
                }
            }
            b'!' => {
                if self.peek_char() == b'=' {
                    self.read_char();
                    Token::new(TokenType::NotEq, "!=")
                } else {
                    Token::new(TokenType::Bang, "!")
                }
            }
            b'+' => Token::new(TokenType::Plus, "+"),
            b'-' => Token::new(TokenType::Minus, "-"),
            b'*' => Token::new(TokenType::Asterisk, "*"),
            b'/' => Token::new(TokenType::Slash, "/"),
            b'<' => Token::new(TokenType::Lt, "<"),
            b'>' => Token::new(TokenType::Gt, ">"),
            b',' => Token::new(TokenType::Comma, ","),
            b';' => Token::new(TokenType::Semicolon, ";"),
            b':' => Token::new(TokenType::Colon, ":"),
            b'(' => Token::new(TokenType::LParen, "("),
            b')' => Token::new(TokenType::RParen, ")"),
            b'{' => Token::new(TokenType::LBrace, "{"),
            b'}' => Token::new(TokenType::RBrace, "}"),
            b'"' => Token::new(TokenType::Str, self.read_string()),
            EOF_BYTE => Token::eof(),
            _ if is_letter(self.ch) => {
                // read_identifier leaves the cursor on the byte after the
                // identifier, so return early to skip the read_char below.
                let literal = self.read_identifier();
                return Token::new(lookup_ident(&literal), literal);
            }
            _ if self.ch.is_ascii_digit() => {
                return Token::new(TokenType::Int, self.read_number());
            }
            other => Token::new(TokenType::Illegal, (other as char).to_string()),
        };

        self.read_char();
        token
    }

    fn read_char(&mut self) {
        self.ch = self
            .input
            .get(self.read_position)
            .copied()
            .unwrap_or(EOF_BYTE);
        self.position = self.read_position;
        self.read_position += 1;
    }

    fn peek_char(&self) -> u8 {
        self.input
            .get(self.read_position)
            .copied()
            .unwrap_or(EOF_BYTE)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.ch, b' ' | b'\t' | b'\r' | b'\n') {
            self.read_char();
        }
    }

    fn read_identifier(&mut self) -> String {
        let start = self.position;
        while is_letter(self.ch) || self.ch.is_ascii_digit() {
            self.read_char();
        }
        String::from_utf8_lossy(&self.input[start..self.position]).into_owned()
    }

    fn read_number(&mut self) -> String {
        let start = self.position;
        while self.ch.is_ascii_digit() {
            self.read_char();
        }
        String::from_utf8_lossy(&self.input[start..self.position]).into_owned()
    }

    // An unterminated string simply ends at end of input; string syntax
    // has no escape sequences.
    fn read_string(&mut self) -> String {
        let start = self.position + 1;
        loop {
            self.read_char();
            if self.ch == b'"' || self.ch == EOF_BYTE {
                break;
            }
        }
        String::from_utf8_lossy(&self.input[start..self.position]).into_owned()
    }
}

fn is_letter(ch: u8) -> bool {
    ch.is_ascii_alphabetic() || ch == b'_'
}
