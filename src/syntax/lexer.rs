//! Logos-based lexer for module descriptors.

use logos::Logos;

use crate::base::{TextRange, TextSize};

/// Token kinds of the descriptor language.
///
/// Every keyword is restricted: it is only a keyword where the grammar
/// expects one, and a valid name segment everywhere else.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"//[^\n]*")]
pub enum SyntaxKind {
    /// `/* ... */`. Dropped by [`lex`].
    #[token("/*", block_comment)]
    BlockComment,

    #[token("open")]
    OpenKw,
    #[token("module")]
    ModuleKw,
    #[token("requires")]
    RequiresKw,
    #[token("transitive")]
    TransitiveKw,
    #[token("static")]
    StaticKw,
    #[token("exports")]
    ExportsKw,
    #[token("opens")]
    OpensKw,
    #[token("to")]
    ToKw,
    #[token("uses")]
    UsesKw,
    #[token("provides")]
    ProvidesKw,
    #[token("with")]
    WithKw,

    #[regex(r"[\p{L}_$][\p{L}\p{N}_$]*")]
    Ident,

    /// Literals only appear inside annotation arguments.
    #[regex(r#""([^"\\\n]|\\.)*""#)]
    StringLit,
    #[regex(r"[0-9]+")]
    IntLit,

    #[token(".")]
    Dot,
    #[token(",")]
    Comma,
    #[token(";")]
    Semi,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("@")]
    At,
    #[token("=")]
    Eq,

    /// Anything the lexer could not match (stray characters, unterminated comments).
    Error,
}

impl SyntaxKind {
    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            SyntaxKind::OpenKw
                | SyntaxKind::ModuleKw
                | SyntaxKind::RequiresKw
                | SyntaxKind::TransitiveKw
                | SyntaxKind::StaticKw
                | SyntaxKind::ExportsKw
                | SyntaxKind::OpensKw
                | SyntaxKind::ToKw
                | SyntaxKind::UsesKw
                | SyntaxKind::ProvidesKw
                | SyntaxKind::WithKw
        )
    }

    /// Can this token be a segment of a qualified name?
    pub fn is_name_segment(self) -> bool {
        self == SyntaxKind::Ident || self.is_keyword()
    }

    /// Keywords that start a directive inside a module body.
    pub fn starts_directive(self) -> bool {
        matches!(
            self,
            SyntaxKind::RequiresKw
                | SyntaxKind::ExportsKw
                | SyntaxKind::OpensKw
                | SyntaxKind::UsesKw
                | SyntaxKind::ProvidesKw
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: SyntaxKind,
    pub range: TextRange,
}

/// Consume a block comment up to and including `*/`.
///
/// An unterminated comment swallows the rest of the input and is reported as
/// a single error token.
fn block_comment(lex: &mut logos::Lexer<SyntaxKind>) -> bool {
    let remainder = lex.remainder();
    match remainder.find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            true
        }
        None => {
            lex.bump(remainder.len());
            false
        }
    }
}

/// Split `text` into tokens, turning lexer failures into [`SyntaxKind::Error`].
pub fn lex(text: &str) -> Vec<Token> {
    SyntaxKind::lexer(text)
        .spanned()
        .map(|(result, span)| Token {
            kind: result.unwrap_or(SyntaxKind::Error),
            range: TextRange::new(
                TextSize::from(span.start as u32),
                TextSize::from(span.end as u32),
            ),
        })
        .filter(|token| token.kind != SyntaxKind::BlockComment)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<SyntaxKind> {
        lex(text).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_keywords_and_names() {
        assert_eq!(
            kinds("open module a.b {}"),
            vec![
                SyntaxKind::OpenKw,
                SyntaxKind::ModuleKw,
                SyntaxKind::Ident,
                SyntaxKind::Dot,
                SyntaxKind::Ident,
                SyntaxKind::LBrace,
                SyntaxKind::RBrace,
            ]
        );
    }

    #[test]
    fn test_keyword_prefix_is_identifier() {
        assert_eq!(kinds("modules"), vec![SyntaxKind::Ident]);
        assert_eq!(kinds("to_do"), vec![SyntaxKind::Ident]);
    }

    #[test]
    fn test_comments_are_skipped() {
        let text = "// line\nrequires /* block\n comment */ a;";
        assert_eq!(
            kinds(text),
            vec![SyntaxKind::RequiresKw, SyntaxKind::Ident, SyntaxKind::Semi]
        );
    }

    #[test]
    fn test_block_comment_with_spaces() {
        assert_eq!(kinds("/* x */ uses a;").len(), 3);
        assert_eq!(
            kinds("/*\n * Copyright 2024\n */\nmodule app {}"),
            vec![
                SyntaxKind::ModuleKw,
                SyntaxKind::Ident,
                SyntaxKind::LBrace,
                SyntaxKind::RBrace,
            ]
        );
        assert_eq!(
            kinds("a /** doc **/ b"),
            vec![SyntaxKind::Ident, SyntaxKind::Ident]
        );
    }

    #[test]
    fn test_unterminated_block_comment() {
        let tokens = lex("module a /* open");
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[2].kind, SyntaxKind::Error);
        assert_eq!(tokens[2].range, TextRange::new(9.into(), 16.into()));
    }

    #[test]
    fn test_stray_character_is_error() {
        assert_eq!(
            kinds("a # b"),
            vec![SyntaxKind::Ident, SyntaxKind::Error, SyntaxKind::Ident]
        );
    }

    #[test]
    fn test_token_ranges() {
        let tokens = lex("  uses x;");
        assert_eq!(tokens[0].range, TextRange::new(2.into(), 6.into()));
        assert_eq!(tokens[1].range, TextRange::new(7.into(), 8.into()));
    }
}
