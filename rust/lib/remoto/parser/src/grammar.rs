//! Recursive-descent parser: tokens of one source → [`SourceFile`].
//!
//! Purely syntactic. Naming rules, signatures and types are checked later,
//! against the whole package.

use crate::ast::*;
use crate::comments::{self, CommentGroup};
use crate::diagnostics::{Diagnostic, Pos};
use crate::lexer::{self, Token, TokenKind};

const KEYWORDS: [&str; 6] = ["package", "import", "type", "interface", "struct", "map"];

/// Deepest `*`, `[]` and `map` nesting accepted in one type.
pub const MAX_TYPE_DEPTH: usize = 128;

/// Parse one schema source. `file` is the index stamped into positions.
pub fn parse_file(file: usize, name: &str, src: &str) -> Result<SourceFile, Diagnostic> {
    let lexed = lexer::lex(file, src).map_err(|e| Diagnostic::new(name, e.pos, e.message))?;
    let mut parser = Parser {
        name,
        tokens: lexed.tokens,
        idx: 0,
        depth: 0,
        groups: comments::group(lexed.comments),
    };
    parser.source_file()
}

struct Parser<'a> {
    name: &'a str,
    tokens: Vec<Token>,
    idx: usize,
    /// Current type nesting.
    depth: usize,
    groups: Vec<CommentGroup>,
}

impl Parser<'_> {
    fn source_file(&mut self) -> Result<SourceFile, Diagnostic> {
        self.skip_semicolons();
        let package_kw = self.expect_keyword("package")?;
        let doc = comments::doc_for(&self.groups, package_kw.line);
        let package = self.ident("package name")?;

        let mut imports = Vec::new();
        loop {
            self.skip_semicolons();
            if !self.at_keyword("import") {
                break;
            }
            self.bump();
            if self.eat(&TokenKind::LParen) {
                loop {
                    self.skip_semicolons();
                    if self.eat(&TokenKind::RParen) {
                        break;
                    }
                    imports.push(self.import_spec()?);
                }
            } else {
                imports.push(self.import_spec()?);
            }
        }

        let mut decls = Vec::new();
        loop {
            self.skip_semicolons();
            if self.peek().kind == TokenKind::Eof {
                break;
            }
            decls.push(self.type_decl()?);
        }

        Ok(SourceFile {
            name: self.name.to_string(),
            package,
            doc,
            imports,
            decls,
            comments: std::mem::take(&mut self.groups),
        })
    }

    fn import_spec(&mut self) -> Result<Import, Diagnostic> {
        let tok = self.bump();
        match tok.kind {
            TokenKind::Str(path) => {
                let namespace = path.rsplit('/').next().unwrap_or(&path).to_string();
                Ok(Import {
                    path,
                    namespace,
                    pos: tok.pos,
                })
            }
            other => Err(self.unexpected(tok.pos, "import path", &other)),
        }
    }

    fn type_decl(&mut self) -> Result<Decl, Diagnostic> {
        let type_kw = self.expect_keyword("type")?;
        let doc = comments::doc_for(&self.groups, type_kw.line);
        let name = self.ident("type name")?;
        let tok = self.bump();
        match &tok.kind {
            TokenKind::Ident(kw) if kw == "interface" => {
                let methods = self.interface_body()?;
                Ok(Decl::Interface(InterfaceDecl { name, doc, methods }))
            }
            TokenKind::Ident(kw) if kw == "struct" => {
                let fields = self.struct_body()?;
                Ok(Decl::Struct(StructDecl { name, doc, fields }))
            }
            other => Err(self.unexpected(tok.pos, "'interface' or 'struct'", other)),
        }
    }

    fn interface_body(&mut self) -> Result<Vec<MethodSig>, Diagnostic> {
        self.expect(TokenKind::LBrace)?;
        let mut methods = Vec::new();
        loop {
            self.skip_semicolons();
            if self.eat(&TokenKind::RBrace) {
                return Ok(methods);
            }
            methods.push(self.method()?);
        }
    }

    fn method(&mut self) -> Result<MethodSig, Diagnostic> {
        let name = self.ident("method name")?;
        let doc = comments::doc_for(&self.groups, name.pos.line);
        self.expect(TokenKind::LParen)?;
        let params = self.param_list()?;
        let close_line = self.tokens[self.idx - 1].pos.line;

        let (next_line, next_kind) = (self.peek().pos.line, self.peek().kind.clone());
        let results = if next_line != close_line {
            Vec::new()
        } else {
            match next_kind {
                TokenKind::LParen => {
                    self.bump();
                    self.param_list()?
                }
                TokenKind::Semicolon | TokenKind::RBrace | TokenKind::Eof => Vec::new(),
                _ => vec![Param {
                    name: None,
                    ty: self.type_expr()?,
                    variadic: false,
                }],
            }
        };

        Ok(MethodSig {
            name,
            doc,
            params,
            results,
        })
    }

    /// Parameters up to and including the closing `)`.
    fn param_list(&mut self) -> Result<Vec<Param>, Diagnostic> {
        let mut params = Vec::new();
        loop {
            if self.eat(&TokenKind::RParen) {
                return Ok(params);
            }
            params.push(self.param()?);
            if !self.eat(&TokenKind::Comma) {
                self.expect(TokenKind::RParen)?;
                return Ok(params);
            }
        }
    }

    fn param(&mut self) -> Result<Param, Diagnostic> {
        let named = match &self.peek().kind {
            TokenKind::Ident(ident) => {
                !KEYWORDS.contains(&ident.as_str())
                    && matches!(
                        self.peek_at(1).kind,
                        TokenKind::Star
                            | TokenKind::LBracket
                            | TokenKind::Ident(_)
                            | TokenKind::Ellipsis
                    )
            }
            _ => false,
        };
        let name = if named {
            Some(self.ident("parameter name")?)
        } else {
            None
        };
        let variadic = self.eat(&TokenKind::Ellipsis);
        let ty = self.type_expr()?;
        Ok(Param { name, ty, variadic })
    }

    fn struct_body(&mut self) -> Result<Vec<FieldDecl>, Diagnostic> {
        self.expect(TokenKind::LBrace)?;
        let mut fields = Vec::new();
        loop {
            self.skip_semicolons();
            if self.eat(&TokenKind::RBrace) {
                return Ok(fields);
            }
            let name = self.ident("field name")?;
            let doc = comments::doc_for(&self.groups, name.pos.line);
            let ty = self.type_expr()?;
            let tag_on_same_line = matches!(self.peek().kind, TokenKind::Str(_))
                && self.peek().pos.line == self.tokens[self.idx - 1].pos.line;
            if tag_on_same_line {
                self.bump();
            }
            fields.push(FieldDecl { name, doc, ty });
        }
    }

    fn type_expr(&mut self) -> Result<TypeExpr, Diagnostic> {
        if self.depth >= MAX_TYPE_DEPTH {
            return Err(Diagnostic::new(self.name, self.peek().pos, "type nesting too deep"));
        }
        self.depth += 1;
        let ty = self.nested_type_expr();
        self.depth -= 1;
        ty
    }

    fn nested_type_expr(&mut self) -> Result<TypeExpr, Diagnostic> {
        let tok = self.bump();
        match tok.kind {
            TokenKind::Star => Ok(TypeExpr::Pointer(Box::new(self.type_expr()?), tok.pos)),
            TokenKind::LBracket => {
                self.expect(TokenKind::RBracket)?;
                Ok(TypeExpr::Slice(Box::new(self.type_expr()?), tok.pos))
            }
            TokenKind::Ident(ref kw) if kw == "map" => {
                self.expect(TokenKind::LBracket)?;
                let key = self.type_expr()?;
                self.expect(TokenKind::RBracket)?;
                let value = self.type_expr()?;
                Ok(TypeExpr::Map {
                    key: Box::new(key),
                    value: Box::new(value),
                    pos: tok.pos,
                })
            }
            TokenKind::Ident(first) if !KEYWORDS.contains(&first.as_str()) => {
                if self.eat(&TokenKind::Dot) {
                    let name = self.ident("type name")?;
                    Ok(TypeExpr::Named {
                        namespace: Some(first),
                        name: name.name,
                        pos: tok.pos,
                    })
                } else {
                    Ok(TypeExpr::Named {
                        namespace: None,
                        name: first,
                        pos: tok.pos,
                    })
                }
            }
            other => Err(self.unexpected(tok.pos, "type", &other)),
        }
    }

    // ── token helpers ───────────────────────────────────────────────

    fn peek(&self) -> &Token {
        self.peek_at(0)
    }

    fn peek_at(&self, n: usize) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.idx + n).min(last)]
    }

    fn bump(&mut self) -> Token {
        let tok = self.peek().clone();
        if tok.kind != TokenKind::Eof {
            self.idx += 1;
        }
        tok
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if &self.peek().kind == kind {
            self.bump();
            true
        } else {
            false
        }
    }

    fn skip_semicolons(&mut self) {
        while self.eat(&TokenKind::Semicolon) {}
    }

    fn at_keyword(&self, kw: &str) -> bool {
        matches!(&self.peek().kind, TokenKind::Ident(name) if name == kw)
    }

    fn expect_keyword(&mut self, kw: &str) -> Result<Pos, Diagnostic> {
        if self.at_keyword(kw) {
            return Ok(self.bump().pos);
        }
        let tok = self.peek().clone();
        Err(self.unexpected(tok.pos, &format!("'{}'", kw), &tok.kind))
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Pos, Diagnostic> {
        let tok = self.bump();
        if tok.kind == kind {
            Ok(tok.pos)
        } else {
            Err(self.unexpected(tok.pos, &kind.describe(), &tok.kind))
        }
    }

    fn ident(&mut self, what: &str) -> Result<Ident, Diagnostic> {
        let tok = self.bump();
        match tok.kind {
            TokenKind::Ident(name) if !KEYWORDS.contains(&name.as_str()) => Ok(Ident {
                name,
                pos: tok.pos,
            }),
            other => Err(self.unexpected(tok.pos, what, &other)),
        }
    }

    fn unexpected(&self, pos: Pos, expected: &str, found: &TokenKind) -> Diagnostic {
        Diagnostic::new(
            self.name,
            pos,
            format!("expected {}, found {}", expected, found.describe()),
        )
    }
}
