//! Rule-expression tokenizer

use crate::error::{Result, RuleError};
use crate::rule::token::{Token, TokenKind};

/// Pull-based tokenizer over one expression string
///
/// `next_token` keeps returning `End` once the input is exhausted.
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    source: &'a str,
    pos: usize,
    failed: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            failed: false,
        }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Read the next token
    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace();
        let start = self.pos;

        let Some(c) = self.peek() else {
            return Ok(Token::end(start));
        };

        match c {
            '(' => Ok(self.single(TokenKind::LeftParen, start)),
            ')' => Ok(self.single(TokenKind::RightParen, start)),
            '[' => Ok(self.single(TokenKind::LeftBracket, start)),
            ']' => Ok(self.single(TokenKind::RightBracket, start)),
            ',' => Ok(self.single(TokenKind::Comma, start)),
            '=' | '!' | '>' | '<' => self.operator(c, start),
            '\'' | '"' => self.string(c, start),
            c if self.starts_number(c) => self.number_or_identifier(start),
            c if is_identifier_char(c) => Ok(self.identifier(start)),
            other => Err(RuleError::UnexpectedCharacter {
                character: other,
                position: start,
            }),
        }
    }

    #[inline]
    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    #[inline]
    fn peek_second(&self) -> Option<char> {
        self.source[self.pos..].chars().nth(1)
    }

    #[inline]
    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn single(&mut self, kind: TokenKind, start: usize) -> Token {
        self.bump();
        Token::new(kind, &self.source[start..self.pos], start)
    }

    fn operator(&mut self, first: char, start: usize) -> Result<Token> {
        self.bump();
        let followed_by_eq = self.peek() == Some('=');

        let kind = match (first, followed_by_eq) {
            ('=', true) => TokenKind::Equals,
            ('!', true) => TokenKind::NotEquals,
            ('>', true) => TokenKind::GreaterOrEqual,
            ('<', true) => TokenKind::LessOrEqual,
            ('>', false) => TokenKind::Greater,
            ('<', false) => TokenKind::Less,
            // Lone '=' or '!'
            _ => {
                return Err(RuleError::UnexpectedCharacter {
                    character: first,
                    position: start,
                })
            }
        };

        if followed_by_eq {
            self.bump();
        }
        Ok(Token::new(kind, &self.source[start..self.pos], start))
    }

    fn string(&mut self, quote: char, start: usize) -> Result<Token> {
        self.bump();
        let mut value = String::new();

        loop {
            let escape_at = self.pos;
            match self.bump() {
                None => return Err(RuleError::UnterminatedString { position: start }),
                Some('\\') => match self.bump() {
                    Some(escaped) => value.push(escaped),
                    None => {
                        return Err(RuleError::UnterminatedEscape {
                            position: escape_at,
                        })
                    }
                },
                Some(c) if c == quote => break,
                Some(c) => value.push(c),
            }
        }

        Ok(Token::new(TokenKind::String, value, start))
    }

    /// Digits, `.5`, `-5` or `-.5`
    fn starts_number(&self, c: char) -> bool {
        c.is_ascii_digit()
            || (c == '.' && self.peek_second().is_some_and(|n| n.is_ascii_digit()))
            || (c == '-' && self.peek_second().is_some_and(|n| n.is_ascii_digit() || n == '.'))
    }

    /// `123`, `.5` and `-4.5` are numbers; `123abc` and `2-b` are identifiers
    fn number_or_identifier(&mut self, start: usize) -> Result<Token> {
        if self.peek() == Some('-') {
            self.bump();
        }

        let mut digits = 0usize;
        let mut dots = 0usize;
        while let Some(c) = self.peek() {
            match c {
                '0'..='9' => digits += 1,
                '.' => dots += 1,
                _ => break,
            }
            self.bump();
        }

        let glued = self.peek().is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '-');
        if glued && dots == 0 {
            self.pos = start;
            return Ok(self.identifier(start));
        }

        let lexeme = &self.source[start..self.pos];
        if digits == 0 || dots > 1 || glued {
            return Err(RuleError::InvalidNumber {
                lexeme: lexeme.to_string(),
                position: start,
            });
        }

        Ok(Token::new(TokenKind::Number, lexeme, start))
    }

    fn identifier(&mut self, start: usize) -> Token {
        while self.peek().is_some_and(is_identifier_char) {
            self.bump();
        }
        let lexeme = &self.source[start..self.pos];
        let kind = TokenKind::keyword(lexeme).unwrap_or(TokenKind::Identifier);
        Token::new(kind, lexeme, start)
    }
}

/// Yields every token before `End`; stops after the first error
impl Iterator for Tokenizer<'_> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.next_token() {
            Ok(token) if token.is(TokenKind::End) => None,
            Ok(token) => Some(Ok(token)),
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}

#[inline]
fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// Tokenize a whole expression, including the trailing `End` token
pub fn tokenize(source: &str) -> Result<Vec<Token>> {
    let mut tokens: Vec<Token> = Tokenizer::new(source).collect::<Result<_>>()?;
    tokens.push(Token::end(source.len()));
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_punctuation_and_operators() {
        assert_eq!(
            kinds("( ) [ ] , == != >= <= > <"),
            vec![
                TokenKind::LeftParen,
                TokenKind::RightParen,
                TokenKind::LeftBracket,
                TokenKind::RightBracket,
                TokenKind::Comma,
                TokenKind::Equals,
                TokenKind::NotEquals,
                TokenKind::GreaterOrEqual,
                TokenKind::LessOrEqual,
                TokenKind::Greater,
                TokenKind::Less,
                TokenKind::End,
            ]
        );
    }

    #[test]
    fn test_operators_without_spaces() {
        assert_eq!(
            kinds("age>=65"),
            vec![TokenKind::Identifier, TokenKind::GreaterOrEqual, TokenKind::Number, TokenKind::End]
        );
        assert_eq!(
            kinds("a<b"),
            vec![TokenKind::Identifier, TokenKind::Less, TokenKind::Identifier, TokenKind::End]
        );
    }

    #[test]
    fn test_keywords_are_case_insensitive() {
        let tokens = tokenize("and Or NOT in True false Income").unwrap();
        let got: Vec<_> = tokens.iter().map(|t| (t.kind, t.lexeme.as_str())).collect();
        assert_eq!(
            got,
            vec![
                (TokenKind::And, "and"),
                (TokenKind::Or, "Or"),
                (TokenKind::Not, "NOT"),
                (TokenKind::In, "in"),
                (TokenKind::Boolean, "True"),
                (TokenKind::Boolean, "false"),
                (TokenKind::Identifier, "Income"),
                (TokenKind::End, ""),
            ]
        );
    }

    #[test]
    fn test_string_literals_and_escapes() {
        let tokens = tokenize(r#"'it\'s' "say \"hi\"" 'a\\b'"#).unwrap();
        assert_eq!(tokens[0].lexeme, "it's");
        assert_eq!(tokens[1].lexeme, r#"say "hi""#);
        assert_eq!(tokens[2].lexeme, r"a\b");
        assert!(tokens[..3].iter().all(|t| t.is(TokenKind::String)));
        // Mixed quotes do not terminate each other
        assert_eq!(tokenize(r#""it's""#).unwrap()[0].lexeme, "it's");
    }

    #[test]
    fn test_unterminated_string() {
        assert_eq!(
            tokenize("name == 'abc"),
            Err(RuleError::UnterminatedString { position: 8 })
        );
        assert_eq!(
            tokenize("name == 'abc\\"),
            Err(RuleError::UnterminatedEscape { position: 12 })
        );
    }

    #[test]
    fn test_numbers() {
        let tokens = tokenize("42 -3.5 0.25 -.5 .5 5.").unwrap();
        let lexemes: Vec<_> = tokens.iter().take(6).map(|t| t.lexeme.as_str()).collect();
        assert_eq!(lexemes, vec!["42", "-3.5", "0.25", "-.5", ".5", "5."]);
        assert!(tokens.iter().take(6).all(|t| t.is(TokenKind::Number)));

        assert_eq!(
            tokenize("x > .a"),
            Err(RuleError::UnexpectedCharacter {
                character: '.',
                position: 4,
            })
        );
    }

    #[test]
    fn test_numeral_prefix_becomes_identifier() {
        let tokens = tokenize("123abc 9_x 2-b household-size").unwrap();
        let got: Vec<_> = tokens.iter().map(|t| (t.kind, t.lexeme.as_str())).collect();
        assert_eq!(
            got,
            vec![
                (TokenKind::Identifier, "123abc"),
                (TokenKind::Identifier, "9_x"),
                (TokenKind::Identifier, "2-b"),
                (TokenKind::Identifier, "household-size"),
                (TokenKind::End, ""),
            ]
        );
    }

    #[test]
    fn test_invalid_numbers() {
        assert_eq!(
            tokenize("x > 1.2.3"),
            Err(RuleError::InvalidNumber {
                lexeme: "1.2.3".to_string(),
                position: 4,
            })
        );
        assert!(matches!(tokenize("x > -."), Err(RuleError::InvalidNumber { .. })));
        // A fractional part cannot start an identifier
        assert_eq!(
            tokenize("x > 1.5kg"),
            Err(RuleError::InvalidNumber {
                lexeme: "1.5".to_string(),
                position: 4,
            })
        );
    }

    #[test]
    fn test_unexpected_character() {
        assert_eq!(
            tokenize("age >= 65 && x"),
            Err(RuleError::UnexpectedCharacter {
                character: '&',
                position: 10,
            })
        );
        assert_eq!(
            tokenize("a = 1"),
            Err(RuleError::UnexpectedCharacter {
                character: '=',
                position: 2,
            })
        );
    }

    #[test]
    fn test_positions_are_byte_offsets() {
        let tokens = tokenize("  lang IN ['en']").unwrap();
        let positions: Vec<_> = tokens.iter().map(|t| t.position).collect();
        assert_eq!(positions, vec![2, 7, 10, 11, 15, 16]);
    }

    #[test]
    fn test_end_is_repeated() {
        let mut tokenizer = Tokenizer::new("x");
        assert!(tokenizer.next_token().unwrap().is(TokenKind::Identifier));
        for _ in 0..3 {
            let token = tokenizer.next_token().unwrap();
            assert!(token.is(TokenKind::End));
            assert_eq!(token.position, 1);
        }
    }

    #[test]
    fn test_iterator_stops_after_error() {
        let results: Vec<_> = Tokenizer::new("a # b").collect();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
    }
}
