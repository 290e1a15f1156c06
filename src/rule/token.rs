//! Tokens produced by the rule-expression tokenizer

use std::fmt;

/// Token kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    Comma,
    /// ==
    Equals,
    /// !=
    NotEquals,
    /// >
    Greater,
    /// >=
    GreaterOrEqual,
    /// <
    Less,
    /// <=
    LessOrEqual,
    And,
    Or,
    Not,
    In,
    String,
    Number,
    Boolean,
    Identifier,
    End,
}

impl TokenKind {
    /// Human-readable name used in parse errors
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::LeftParen => "'('",
            TokenKind::RightParen => "')'",
            TokenKind::LeftBracket => "'['",
            TokenKind::RightBracket => "']'",
            TokenKind::Comma => "','",
            TokenKind::Equals => "'=='",
            TokenKind::NotEquals => "'!='",
            TokenKind::Greater => "'>'",
            TokenKind::GreaterOrEqual => "'>='",
            TokenKind::Less => "'<'",
            TokenKind::LessOrEqual => "'<='",
            TokenKind::And => "AND",
            TokenKind::Or => "OR",
            TokenKind::Not => "NOT",
            TokenKind::In => "IN",
            TokenKind::String => "string literal",
            TokenKind::Number => "number literal",
            TokenKind::Boolean => "boolean literal",
            TokenKind::Identifier => "question identifier",
            TokenKind::End => "end of expression",
        }
    }

    /// Keyword lookup, case-insensitive
    pub fn keyword(word: &str) -> Option<TokenKind> {
        const KEYWORDS: [(&str, TokenKind); 6] = [
            ("AND", TokenKind::And),
            ("OR", TokenKind::Or),
            ("NOT", TokenKind::Not),
            ("IN", TokenKind::In),
            ("TRUE", TokenKind::Boolean),
            ("FALSE", TokenKind::Boolean),
        ];
        KEYWORDS
            .iter()
            .find(|(kw, _)| kw.eq_ignore_ascii_case(word))
            .map(|(_, kind)| *kind)
    }
}

/// One lexeme with its 0-based byte offset in the source
///
/// String tokens hold the unescaped contents without quotes.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub position: usize,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, position: usize) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            position,
        }
    }

    pub fn end(position: usize) -> Self {
        Self::new(TokenKind::End, "", position)
    }

    #[inline]
    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::End => f.write_str("<end>"),
            _ => f.write_str(&self.lexeme),
        }
    }
}
