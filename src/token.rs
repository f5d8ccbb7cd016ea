use phf::phf_map;
use strum_macros::Display;

#[rustfmt::skip]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum TokenType {
    #[strum(serialize = "ILLEGAL")] Illegal,
    #[strum(serialize = "EOF")] Eof,

    // Literals and names.
    #[strum(serialize = "IDENT")] Ident,
    #[strum(serialize = "INT")] Int,
    #[strum(serialize = "STRING")] Str,

    // Operators.
    #[strum(serialize = "=")] Assign,
    #[strum(serialize = "+")] Plus,
    #[strum(serialize = "-")] Minus,
    #[strum(serialize = "!")] Bang,
    #[strum(serialize = "*")] Asterisk,
    #[strum(serialize = "/")] Slash,
    #[strum(serialize = "<")] Lt,
    #[strum(serialize = ">")] Gt,
    #[strum(serialize = "==")] Eq,
    #[strum(serialize = "!=")] NotEq,

    // Delimiters.
    #[strum(serialize = ",")] Comma,
    #[strum(serialize = ";")] Semicolon,
    #[strum(serialize = ":")] Colon,
    #[strum(serialize = "(")] LParen,
    #[strum(serialize = ")")] RParen,
    #[strum(serialize = "{")] LBrace,
    #[strum(serialize = "}")] RBrace,

    // Keywords.
    #[strum(serialize = "fn")] Function,
    #[strum(serialize = "let")] Let,
    #[strum(serialize = "true")] True,
    #[strum(serialize = "false")] False,
    #[strum(serialize = "if")] If,
    #[strum(serialize = "else")] Else,
    #[strum(serialize = "return")] Return,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenType,
    pub literal: String,
}

impl Token {
    pub fn new(kind: TokenType, literal: impl Into<String>) -> Token {
        Token {
            kind,
            literal: literal.into(),
        }
    }

    pub fn eof() -> Token {
        Token {
            kind: TokenType::Eof,
            literal: String::new(),
        }
    }
}

static KEYWORDS: phf::Map<&'static str, TokenType> = phf_map! {
    "fn" => TokenType::Function,
    "let" => TokenType::Let,
    "true" => TokenType::True,
    "false" => TokenType::False,
    "if" => TokenType::If,
    "else" => TokenType::Else,
    "return" => TokenType::Return,
};

/// Resolve an identifier spelling to its keyword kind, or `Ident` if it
/// is not a reserved word.
pub fn lookup_ident(ident: &str) -> TokenType {
    KEYWORDS.get(ident).copied().unwrap_or(TokenType::Ident)
}
