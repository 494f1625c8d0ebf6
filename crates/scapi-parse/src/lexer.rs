use crate::token::{Tok, TokKind};
use scapi_ast::span::Span;

pub struct Lexer<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }
    fn peek2(&self) -> Option<char> {
        let mut it = self.src[self.pos..].chars();
        it.next();
        it.next()
    }

    fn span(&self, start: usize) -> Span {
        Span {
            start: start as u32,
            end: self.pos as u32,
        }
    }

    fn tok(&self, kind: TokKind, start: usize) -> Tok {
        Tok {
            kind,
            span: self.span(start),
        }
    }

    fn skip_ws_and_comments(&mut self) {
        loop {
            while matches!(self.peek(), Some(c) if c.is_whitespace()) {
                self.bump();
            }
            // line comment: //
            if self.peek() == Some('/') && self.peek2() == Some('/') {
                while let Some(c) = self.bump() {
                    if c == '\n' {
                        break;
                    }
                }
                continue;
            }
            break;
        }
    }

    /// Consume while `pred` holds and return the consumed slice.
    fn take_while(&mut self, start: usize, pred: impl Fn(char) -> bool) -> &'a str {
        while matches!(self.peek(), Some(c) if pred(c)) {
            self.bump();
        }
        let src = self.src;
        &src[start..self.pos]
    }

    pub fn next_tok(&mut self) -> Tok {
        self.skip_ws_and_comments();
        let start = self.pos;
        let Some(c) = self.bump() else {
            return self.tok(TokKind::Eof, start);
        };

        let single = match c {
            '{' => Some(TokKind::LBrace),
            '}' => Some(TokKind::RBrace),
            '[' => Some(TokKind::LBracket),
            ']' => Some(TokKind::RBracket),
            ':' => Some(TokKind::Colon),
            '?' => Some(TokKind::Question),
            _ => None,
        };
        if let Some(k) = single {
            return self.tok(k, start);
        }

        // path literal; `//` was already taken as a comment above
        if c == '/' {
            let text = self.take_while(start, |ch| !ch.is_whitespace());
            return self.tok(TokKind::Path(text.to_string()), start);
        }

        // number: digits with an optional single fractional part
        if c.is_ascii_digit() {
            self.take_while(start, |ch| ch.is_ascii_digit());
            if self.peek() == Some('.') {
                self.bump();
                self.take_while(start, |ch| ch.is_ascii_digit());
            }
            let text = &self.src[start..self.pos];
            return self.tok(TokKind::Number(text.to_string()), start);
        }

        // ident / keywords
        if c.is_alphabetic() || c == '_' {
            let text = self.take_while(start, |ch| ch.is_alphanumeric() || ch == '_');
            let kind = TokKind::keyword(text).unwrap_or_else(|| TokKind::Ident(text.to_string()));
            return self.tok(kind, start);
        }

        self.tok(TokKind::Error(c), start)
    }
}

/// Lex the whole source. The result always ends with exactly one `Eof`;
/// lexing stops at the first `Error` token.
pub fn tokenize(src: &str) -> Vec<Tok> {
    let mut lex = Lexer::new(src);
    let mut toks = Vec::new();
    loop {
        let tok = lex.next_tok();
        match tok.kind {
            TokKind::Eof => {
                toks.push(tok);
                break;
            }
            TokKind::Error(_) => {
                let end = tok.span.end;
                toks.push(tok);
                toks.push(Tok {
                    kind: TokKind::Eof,
                    span: Span { start: end, end },
                });
                break;
            }
            _ => toks.push(tok),
        }
    }
    tracing::debug!(count = toks.len(), "tokenized source");
    toks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokKind> {
        tokenize(src).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn keywords_and_idents() {
        assert_eq!(
            kinds("api Pets type Pet"),
            vec![
                TokKind::KwApi,
                TokKind::Ident("Pets".into()),
                TokKind::KwType,
                TokKind::Ident("Pet".into()),
                TokKind::Eof,
            ]
        );
    }

    #[test]
    fn keywords_are_case_sensitive() {
        assert_eq!(
            kinds("get GET"),
            vec![TokKind::Ident("get".into()), TokKind::KwGet, TokKind::Eof]
        );
    }

    #[test]
    fn path_runs_to_whitespace() {
        let toks = tokenize("/users/{id}/posts GetPosts");
        assert_eq!(toks[0].kind, TokKind::Path("/users/{id}/posts".into()));
        assert_eq!(toks[0].span, Span { start: 0, end: 17 });
        assert_eq!(toks[1].kind, TokKind::Ident("GetPosts".into()));
    }

    #[test]
    fn numbers_take_one_fraction() {
        assert_eq!(
            kinds("200 1.5 3."),
            vec![
                TokKind::Number("200".into()),
                TokKind::Number("1.5".into()),
                TokKind::Number("3.".into()),
                TokKind::Eof,
            ]
        );
    }

    #[test]
    fn comment_to_end_of_input() {
        assert_eq!(kinds("api // trailing"), vec![TokKind::KwApi, TokKind::Eof]);
    }

    #[test]
    fn unknown_char_is_error_then_eof() {
        let toks = tokenize("api @ Test");
        assert_eq!(toks.len(), 3);
        assert_eq!(toks[1].kind, TokKind::Error('@'));
        assert_eq!(toks[1].span.start, 4);
        assert_eq!(toks[2].kind, TokKind::Eof);
    }

    #[test]
    fn empty_source_is_single_eof() {
        assert_eq!(kinds("  \n\t "), vec![TokKind::Eof]);
    }
}
