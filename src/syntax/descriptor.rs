//! Recovering parser for module descriptors.
//!
//! The parser never fails outright. It records a [`ParseError`] for every
//! problem, skips to a point it can resume from, and returns whatever it
//! understood. A descriptor that produced errors is *incomplete code*: its
//! module references are resolved against the whole project rather than the
//! file's own resolve scope.

use smol_str::SmolStr;

use super::error::ParseError;
use super::lexer::{SyntaxKind, Token, lex};
use crate::base::{TextRange, TextSize};

/// A dotted name together with the range it covers in the source.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    pub text: SmolStr,
    pub range: TextRange,
}

/// How a directive refers to another module.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ModuleRefKind {
    /// `requires m;`
    Requires,
    /// `exports p to m;`
    ExportsTo,
    /// `opens p to m;`
    OpensTo,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Directive {
    Requires {
        module: QualifiedName,
        is_transitive: bool,
        is_static: bool,
    },
    Exports {
        package: QualifiedName,
        targets: Vec<QualifiedName>,
    },
    Opens {
        package: QualifiedName,
        targets: Vec<QualifiedName>,
    },
    Uses {
        service: QualifiedName,
    },
    Provides {
        service: QualifiedName,
        implementations: Vec<QualifiedName>,
    },
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ModuleDescriptor {
    pub is_open: bool,
    /// `None` when the `module` keyword was not followed by a name.
    pub name: Option<QualifiedName>,
    pub directives: Vec<Directive>,
}

impl ModuleDescriptor {
    /// Every name in the descriptor that refers to a module, in source order.
    pub fn module_refs(&self) -> impl Iterator<Item = (ModuleRefKind, &QualifiedName)> + '_ {
        self.directives.iter().flat_map(|directive| {
            let refs: Vec<(ModuleRefKind, &QualifiedName)> = match directive {
                Directive::Requires { module, .. } => vec![(ModuleRefKind::Requires, module)],
                Directive::Exports { targets, .. } => targets
                    .iter()
                    .map(|t| (ModuleRefKind::ExportsTo, t))
                    .collect(),
                Directive::Opens { targets, .. } => targets
                    .iter()
                    .map(|t| (ModuleRefKind::OpensTo, t))
                    .collect(),
                Directive::Uses { .. } | Directive::Provides { .. } => Vec::new(),
            };
            refs
        })
    }
}

/// Result of parsing one descriptor file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Parse {
    /// `None` when the text has no `module` declaration at all.
    pub descriptor: Option<ModuleDescriptor>,
    pub errors: Vec<ParseError>,
}

impl Parse {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Parse a module descriptor.
pub fn parse(text: &str) -> Parse {
    let mut parser = Parser::new(text);
    let descriptor = parser.descriptor();
    Parse {
        descriptor,
        errors: parser.errors,
    }
}

/// Parse a standalone `module <name> {}` and return the name.
///
/// Returns `None` unless the text is a clean declaration, which makes it a
/// validator for user-supplied module names.
pub fn module_from_text(text: &str) -> Option<SmolStr> {
    let parse = parse(text);
    if parse.has_errors() {
        return None;
    }
    parse.descriptor?.name.map(|name| name.text)
}

struct Parser<'t> {
    text: &'t str,
    tokens: Vec<Token>,
    pos: usize,
    errors: Vec<ParseError>,
}

impl<'t> Parser<'t> {
    fn new(text: &'t str) -> Self {
        let mut errors = Vec::new();
        let tokens = lex(text)
            .into_iter()
            .filter(|token| {
                if token.kind == SyntaxKind::Error {
                    errors.push(ParseError::new("unexpected character", token.range));
                    false
                } else {
                    true
                }
            })
            .collect();
        Self {
            text,
            tokens,
            pos: 0,
            errors,
        }
    }

    fn descriptor(&mut self) -> Option<ModuleDescriptor> {
        self.skip_annotations();
        let is_open = self.eat(SyntaxKind::OpenKw);
        if !self.expect(SyntaxKind::ModuleKw, "'module'") {
            return None;
        }

        let mut descriptor = ModuleDescriptor {
            is_open,
            name: self.qualified_name("module name"),
            directives: Vec::new(),
        };

        if !self.expect(SyntaxKind::LBrace, "'{'") {
            return Some(descriptor);
        }

        loop {
            match self.current() {
                None => {
                    self.error_here("expected '}'");
                    break;
                }
                Some(SyntaxKind::RBrace) => {
                    self.bump();
                    break;
                }
                Some(_) => {
                    if let Some(directive) = self.directive() {
                        descriptor.directives.push(directive);
                    }
                }
            }
        }

        if let Some(token) = self.tokens.get(self.pos) {
            let message = "unexpected input after module body";
            self.errors.push(ParseError::new(message, token.range));
        }

        Some(descriptor)
    }

    fn directive(&mut self) -> Option<Directive> {
        let kind = self.current()?;
        let directive = match kind {
            SyntaxKind::RequiresKw => {
                self.bump();
                let mut is_transitive = false;
                let mut is_static = false;
                // `requires transitive;` names a module called `transitive`.
                while let Some(modifier @ (SyntaxKind::TransitiveKw | SyntaxKind::StaticKw)) =
                    self.current()
                {
                    if matches!(self.nth(1), Some(SyntaxKind::Semi | SyntaxKind::Dot)) {
                        break;
                    }
                    self.bump();
                    match modifier {
                        SyntaxKind::TransitiveKw => is_transitive = true,
                        _ => is_static = true,
                    }
                }
                let module = self.qualified_name("module name");
                module.map(|module| Directive::Requires {
                    module,
                    is_transitive,
                    is_static,
                })
            }
            SyntaxKind::ExportsKw | SyntaxKind::OpensKw => {
                self.bump();
                let package = self.qualified_name("package name");
                let targets = if package.is_some() && self.eat(SyntaxKind::ToKw) {
                    self.name_list("module name")
                } else {
                    Vec::new()
                };
                package.map(|package| {
                    if kind == SyntaxKind::ExportsKw {
                        Directive::Exports { package, targets }
                    } else {
                        Directive::Opens { package, targets }
                    }
                })
            }
            SyntaxKind::UsesKw => {
                self.bump();
                self.qualified_name("service name")
                    .map(|service| Directive::Uses { service })
            }
            SyntaxKind::ProvidesKw => {
                self.bump();
                let service = self.qualified_name("service name");
                let implementations = if service.is_some()
                    && self.expect(SyntaxKind::WithKw, "'with'")
                {
                    self.name_list("implementation name")
                } else {
                    Vec::new()
                };
                service.map(|service| Directive::Provides {
                    service,
                    implementations,
                })
            }
            _ => {
                self.error_here("expected a directive");
                self.bump();
                self.recover();
                return None;
            }
        };

        if directive.is_none() {
            self.recover();
        } else if !self.eat(SyntaxKind::Semi) {
            self.error_here("expected ';'");
            self.recover();
        }
        directive
    }

    fn name_list(&mut self, what: &str) -> Vec<QualifiedName> {
        let mut names = Vec::new();
        if let Some(first) = self.qualified_name(what) {
            names.push(first);
            while self.eat(SyntaxKind::Comma) {
                match self.qualified_name(what) {
                    Some(name) => names.push(name),
                    None => break,
                }
            }
        }
        names
    }

    fn qualified_name(&mut self, what: &str) -> Option<QualifiedName> {
        if !self.current().is_some_and(SyntaxKind::is_name_segment) {
            self.error_here(&format!("expected {what}"));
            return None;
        }

        let first = self.bump_token();
        let mut text = String::from(&self.text[first.range]);
        let mut end = first.range.end();

        while self.current() == Some(SyntaxKind::Dot) {
            if !self.nth(1).is_some_and(SyntaxKind::is_name_segment) {
                let dot = self.bump_token();
                self.errors
                    .push(ParseError::new("expected identifier after '.'", dot.range));
                break;
            }
            self.bump();
            let segment = self.bump_token();
            text.push('.');
            text.push_str(&self.text[segment.range]);
            end = segment.range.end();
        }

        Some(QualifiedName {
            text: SmolStr::new(text),
            range: TextRange::new(first.range.start(), end),
        })
    }

    fn skip_annotations(&mut self) {
        while self.eat(SyntaxKind::At) {
            if self.qualified_name("annotation name").is_none() {
                continue;
            }
            if self.eat(SyntaxKind::LParen) {
                let mut depth = 1usize;
                while depth > 0 {
                    match self.current() {
                        None => {
                            self.error_here("expected ')'");
                            return;
                        }
                        Some(SyntaxKind::LParen) => depth += 1,
                        Some(SyntaxKind::RParen) => depth -= 1,
                        Some(_) => {}
                    }
                    self.bump();
                }
            }
        }
    }

    /// Skip to just after the next `;`, or up to a `}` or directive keyword.
    fn recover(&mut self) {
        while let Some(kind) = self.current() {
            match kind {
                SyntaxKind::Semi => {
                    self.bump();
                    return;
                }
                SyntaxKind::RBrace => return,
                kind if kind.starts_directive() => return,
                _ => self.bump(),
            }
        }
    }

    fn current(&self) -> Option<SyntaxKind> {
        self.nth(0)
    }

    fn nth(&self, n: usize) -> Option<SyntaxKind> {
        self.tokens.get(self.pos + n).map(|t| t.kind)
    }

    fn bump(&mut self) {
        self.pos += 1;
    }

    fn bump_token(&mut self) -> Token {
        let token = self.tokens[self.pos];
        self.pos += 1;
        token
    }

    fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.current() == Some(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: SyntaxKind, what: &str) -> bool {
        if self.eat(kind) {
            return true;
        }
        self.error_here(&format!("expected {what}"));
        false
    }

    fn error_here(&mut self, message: &str) {
        let range = match self.tokens.get(self.pos) {
            Some(token) => token.range,
            None => {
                let end = TextSize::of(self.text);
                TextRange::empty(end)
            }
        };
        self.errors.push(ParseError::new(message, range));
    }
}
