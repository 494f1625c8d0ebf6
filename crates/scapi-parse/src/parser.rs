use crate::error::ParseError;
use crate::lexer::tokenize;
use crate::token::{Tok, TokKind};
use scapi_ast::ast::{
    Declaration, EndpointDecl, EndpointField, FieldDecl, HttpVerb, Ident, PathLit, Spec, TypeDecl,
    TypeExpr,
};
use scapi_ast::span::Span;

type Result<T> = std::result::Result<T, ParseError>;

pub fn parse_str(file: &str, src: &str) -> Result<Spec> {
    let mut p = Parser::new(tokenize(src));
    let spec = p.parse_spec()?;
    tracing::debug!(
        file,
        api = %spec.name.text,
        declarations = spec.declarations.len(),
        "parsed api definition"
    );
    Ok(spec)
}

struct Parser {
    toks: Vec<Tok>,
    pos: usize,
    /// End offset of the most recently consumed token.
    last_end: u32,
}

impl Parser {
    fn new(toks: Vec<Tok>) -> Self {
        debug_assert!(matches!(toks.last(), Some(t) if t.kind == TokKind::Eof));
        Self {
            toks,
            pos: 0,
            last_end: 0,
        }
    }

    fn cur(&self) -> &Tok {
        &self.toks[self.pos]
    }

    fn bump(&mut self) {
        self.last_end = self.cur().span.end;
        // never step past the trailing Eof
        if self.pos + 1 < self.toks.len() {
            self.pos += 1;
        }
    }

    fn at(&self, k: &TokKind) -> bool {
        std::mem::discriminant(&self.cur().kind) == std::mem::discriminant(k)
    }

    fn eat(&mut self, k: &TokKind) -> bool {
        if self.at(k) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, k: TokKind) -> Result<Tok> {
        if self.at(&k) {
            let t = self.cur().clone();
            self.bump();
            Ok(t)
        } else {
            Err(self.unexpected(k.to_string()))
        }
    }

    fn unexpected(&self, expected: impl Into<String>) -> ParseError {
        let tok = self.cur();
        match tok.kind {
            TokKind::Error(ch) => ParseError::Lexical {
                ch,
                offset: tok.span.start,
            },
            ref kind => ParseError::Unexpected {
                found: kind.to_string(),
                offset: tok.span.start,
                expected: expected.into(),
            },
        }
    }

    fn span_from(&self, start: u32) -> Span {
        Span {
            start,
            end: self.last_end,
        }
    }

    // ======= spec / declarations =======

    fn parse_spec(&mut self) -> Result<Spec> {
        let start = self.cur().span.start;
        self.expect(TokKind::KwApi)?;
        let name = self.parse_ident("API name")?;

        let mut declarations = Vec::new();
        while self.at(&TokKind::KwType) {
            declarations.push(Declaration::Type(self.parse_type_decl()?));
        }
        while self.at(&TokKind::KwEndpoint) {
            declarations.push(Declaration::Endpoint(self.parse_endpoint_decl()?));
        }
        if !self.at(&TokKind::Eof) {
            return Err(self.unexpected("'endpoint' or end of input"));
        }

        Ok(Spec {
            name,
            declarations,
            span: self.span_from(start),
        })
    }

    fn parse_ident(&mut self, what: &str) -> Result<Ident> {
        match &self.cur().kind {
            TokKind::Ident(s) => {
                let id = Ident {
                    text: s.clone(),
                    span: self.cur().span,
                };
                self.bump();
                Ok(id)
            }
            _ => Err(self.unexpected(what)),
        }
    }

    /// A type name: a user identifier or one of the primitive keywords.
    fn parse_type_name(&mut self) -> Result<Ident> {
        if let Some(prim) = self.cur().kind.primitive_name() {
            let id = Ident {
                text: prim.to_string(),
                span: self.cur().span,
            };
            self.bump();
            return Ok(id);
        }
        self.parse_ident("type identifier")
    }

    fn parse_type_decl(&mut self) -> Result<TypeDecl> {
        let start = self.cur().span.start;
        self.expect(TokKind::KwType)?;
        let name = self.parse_ident("type name")?;
        self.expect(TokKind::LBrace)?;
        let fields = self.parse_field_decls()?;
        self.expect(TokKind::RBrace)?;
        Ok(TypeDecl {
            name,
            fields,
            span: self.span_from(start),
        })
    }

    /// `FieldDecl*` -- stops at the first token that is not an identifier.
    fn parse_field_decls(&mut self) -> Result<Vec<FieldDecl>> {
        let mut fields = Vec::new();
        while let TokKind::Ident(_) = self.cur().kind {
            fields.push(self.parse_field_decl()?);
        }
        Ok(fields)
    }

    fn parse_field_decl(&mut self) -> Result<FieldDecl> {
        let start = self.cur().span.start;
        let name = self.parse_ident("field name")?;
        let optional = self.eat(&TokKind::Question);
        self.expect(TokKind::Colon)?;
        let ty = self.parse_type_expr()?;
        let nullable = self.eat(&TokKind::Question);
        Ok(FieldDecl {
            name,
            ty,
            optional,
            nullable,
            span: self.span_from(start),
        })
    }

    fn parse_type_expr(&mut self) -> Result<TypeExpr> {
        let start = self.cur().span.start;
        if self.eat(&TokKind::LBracket) {
            let element = self.parse_type_name()?;
            self.expect(TokKind::RBracket)?;
            return Ok(TypeExpr::Array {
                element: Box::new(TypeExpr::Simple(element)),
                span: self.span_from(start),
            });
        }
        let kind = &self.cur().kind;
        if matches!(kind, TokKind::Ident(_)) || kind.primitive_name().is_some() {
            return Ok(TypeExpr::Simple(self.parse_type_name()?));
        }
        Err(self.unexpected("type"))
    }

    // ======= endpoints =======

    fn parse_endpoint_decl(&mut self) -> Result<EndpointDecl> {
        let start = self.cur().span.start;
        self.expect(TokKind::KwEndpoint)?;

        let method = match self.cur().kind {
            TokKind::KwGet => HttpVerb::Get,
            TokKind::KwPost => HttpVerb::Post,
            TokKind::KwPut => HttpVerb::Put,
            TokKind::KwDelete => HttpVerb::Delete,
            TokKind::KwPatch => HttpVerb::Patch,
            _ => return Err(self.unexpected("HTTP method")),
        };
        self.bump();

        let path = match &self.cur().kind {
            TokKind::Path(text) => PathLit {
                text: text.clone(),
                span: self.cur().span,
            },
            _ => return Err(self.unexpected("path")),
        };
        self.bump();

        let name = self.parse_ident("endpoint name")?;
        self.expect(TokKind::LBrace)?;
        let body = self.parse_endpoint_body()?;
        self.expect(TokKind::RBrace)?;

        Ok(EndpointDecl {
            name,
            method,
            path,
            body,
            span: self.span_from(start),
        })
    }

    /// `Params? Query? Body? Responses`, in that order.
    fn parse_endpoint_body(&mut self) -> Result<Vec<EndpointField>> {
        let mut body = Vec::new();

        if self.at(&TokKind::KwParams) {
            let start = self.cur().span.start;
            let fields = self.parse_field_block()?;
            body.push(EndpointField::Params {
                fields,
                span: self.span_from(start),
            });
        }

        if self.at(&TokKind::KwQuery) {
            let start = self.cur().span.start;
            let fields = self.parse_field_block()?;
            body.push(EndpointField::Query {
                fields,
                span: self.span_from(start),
            });
        }

        if self.at(&TokKind::KwBody) {
            let start = self.cur().span.start;
            self.bump();
            let type_name = self.parse_type_name()?;
            let optional = self.eat(&TokKind::Question);
            body.push(EndpointField::Body {
                type_name,
                optional,
                span: self.span_from(start),
            });
        }

        self.parse_responses(&mut body)?;
        Ok(body)
    }

    /// `kw '{' FieldDecl* '}'` for `params` and `query`.
    fn parse_field_block(&mut self) -> Result<Vec<FieldDecl>> {
        self.bump(); // keyword
        self.expect(TokKind::LBrace)?;
        let fields = self.parse_field_decls()?;
        self.expect(TokKind::RBrace)?;
        Ok(fields)
    }

    fn parse_responses(&mut self, out: &mut Vec<EndpointField>) -> Result<()> {
        self.expect(TokKind::KwResponses)?;
        self.expect(TokKind::LBrace)?;
        while let TokKind::Number(text) = &self.cur().kind {
            let start = self.cur().span.start;
            let code: u32 = text
                .parse()
                .map_err(|_| ParseError::InvalidResponseCode {
                    text: text.clone(),
                    offset: start,
                })?;
            self.bump();
            let type_name = self.parse_type_name()?;
            out.push(EndpointField::Response {
                code,
                type_name,
                span: self.span_from(start),
            });
        }
        self.expect(TokKind::RBrace)?;
        Ok(())
    }
}
