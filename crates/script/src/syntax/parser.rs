//! Recursive-descent parser.
//!
//! Semicolons are optional where a line break, `}` or the end of input
//! follows. Nesting is capped so hostile input cannot exhaust the stack of
//! the thread that parses it.

use std::rc::Rc;

use super::ast::{
    BinaryOp, DeclKind, Declarator, Expr, ExprKind, Function, LogicalOp, Program, Stmt, StmtKind,
    UnaryOp,
};
use super::lexer::tokenize;
use super::token::{Keyword, Punct, Token, TokenKind};
use crate::error::SyntaxError;

/// Maximum combined depth of nested statements and expressions.
pub const MAX_NESTING: usize = 128;

type PResult<T> = Result<T, SyntaxError>;

pub fn parse(source: &str) -> PResult<Program> {
    let tokens = tokenize(source)?;
    Parser::new(tokens).program()
}

#[derive(Clone, Copy)]
enum InfixOp {
    Binary(BinaryOp),
    Logical(LogicalOp),
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
    loop_depth: usize,
    in_function: bool,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
            loop_depth: 0,
            in_function: false,
        }
    }

    fn program(mut self) -> PResult<Program> {
        let mut body = Vec::new();
        while !self.at_eof() {
            body.push(self.statement()?);
        }
        Ok(Program { body })
    }

    // ------------------------------------------------------------------------
    // Token cursor
    // ------------------------------------------------------------------------

    fn peek(&self) -> &Token {
        // The lexer always terminates the stream with `Eof`.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_kind(&self) -> &TokenKind {
        &self.peek().kind
    }

    fn line(&self) -> u32 {
        self.peek().line
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    fn at_eof(&self) -> bool {
        matches!(self.peek_kind(), TokenKind::Eof)
    }

    fn at_punct(&self, punct: Punct) -> bool {
        matches!(self.peek_kind(), TokenKind::Punct(p) if *p == punct)
    }

    fn at_keyword(&self, keyword: Keyword) -> bool {
        matches!(self.peek_kind(), TokenKind::Keyword(k) if *k == keyword)
    }

    fn eat_punct(&mut self, punct: Punct) -> bool {
        let found = self.at_punct(punct);
        if found {
            self.advance();
        }
        found
    }

    fn expect_punct(&mut self, punct: Punct) -> PResult<()> {
        if self.eat_punct(punct) {
            Ok(())
        } else {
            Err(self.unexpected(&format!("`{}`", <&'static str>::from(punct))))
        }
    }

    fn expect_keyword(&mut self, keyword: Keyword) -> PResult<()> {
        if self.at_keyword(keyword) {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected(&format!("`{}`", <&'static str>::from(keyword))))
        }
    }

    fn expect_ident(&mut self) -> PResult<String> {
        match self.peek_kind() {
            TokenKind::Ident(name) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            _ => Err(self.unexpected("an identifier")),
        }
    }

    fn unexpected(&self, expected: &str) -> SyntaxError {
        SyntaxError::new(
            self.line(),
            format!("expected {expected}, found {}", self.peek_kind()),
        )
    }

    /// Automatic semicolon insertion, restricted to the common cases.
    fn consume_semicolon(&mut self) -> PResult<()> {
        if self.eat_punct(Punct::Semicolon)
            || self.at_punct(Punct::RBrace)
            || self.at_eof()
            || self.peek().newline_before
        {
            Ok(())
        } else {
            Err(self.unexpected("`;`"))
        }
    }

    fn enter(&mut self) -> PResult<()> {
        self.depth += 1;
        if self.depth > MAX_NESTING {
            return Err(SyntaxError::new(self.line(), "nesting is too deep"));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    // ------------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------------

    fn statement(&mut self) -> PResult<Stmt> {
        self.enter()?;
        let stmt = self.statement_inner();
        self.leave();
        stmt
    }

    fn statement_inner(&mut self) -> PResult<Stmt> {
        let line = self.line();
        let kind = match self.peek_kind().clone() {
            TokenKind::Punct(Punct::LBrace) => StmtKind::Block(self.block()?),
            TokenKind::Punct(Punct::Semicolon) => {
                self.advance();
                StmtKind::Empty
            }
            TokenKind::Keyword(Keyword::Function) => {
                let function = self.function(true)?;
                StmtKind::Function(Rc::new(function))
            }
            TokenKind::Keyword(kw @ (Keyword::Let | Keyword::Const | Keyword::Var)) => {
                self.advance();
                let declare = self.declaration(decl_kind(kw))?;
                self.consume_semicolon()?;
                declare
            }
            TokenKind::Keyword(Keyword::If) => {
                self.advance();
                let test = self.parenthesized()?;
                let then = Box::new(self.statement()?);
                let otherwise = if self.at_keyword(Keyword::Else) {
                    self.advance();
                    Some(Box::new(self.statement()?))
                } else {
                    None
                };
                StmtKind::If {
                    test,
                    then,
                    otherwise,
                }
            }
            TokenKind::Keyword(Keyword::While) => {
                self.advance();
                let test = self.parenthesized()?;
                let body = Box::new(self.loop_body()?);
                StmtKind::While { test, body }
            }
            TokenKind::Keyword(Keyword::Do) => {
                self.advance();
                let body = Box::new(self.loop_body()?);
                self.expect_keyword(Keyword::While)?;
                let test = self.parenthesized()?;
                self.eat_punct(Punct::Semicolon);
                StmtKind::DoWhile { body, test }
            }
            TokenKind::Keyword(Keyword::For) => self.for_statement()?,
            TokenKind::Keyword(Keyword::Break) => {
                self.advance();
                if self.loop_depth == 0 {
                    return Err(SyntaxError::new(line, "illegal break statement"));
                }
                self.consume_semicolon()?;
                StmtKind::Break
            }
            TokenKind::Keyword(Keyword::Continue) => {
                self.advance();
                if self.loop_depth == 0 {
                    return Err(SyntaxError::new(line, "illegal continue statement"));
                }
                self.consume_semicolon()?;
                StmtKind::Continue
            }
            TokenKind::Keyword(Keyword::Return) => {
                self.advance();
                if !self.in_function {
                    return Err(SyntaxError::new(line, "illegal return statement"));
                }
                let value = if self.at_punct(Punct::Semicolon)
                    || self.at_punct(Punct::RBrace)
                    || self.at_eof()
                    || self.peek().newline_before
                {
                    None
                } else {
                    Some(self.expression()?)
                };
                self.consume_semicolon()?;
                StmtKind::Return(value)
            }
            TokenKind::Keyword(Keyword::Throw) => {
                self.advance();
                if self.peek().newline_before {
                    return Err(SyntaxError::new(line, "illegal newline after throw"));
                }
                let value = self.expression()?;
                self.consume_semicolon()?;
                StmtKind::Throw(value)
            }
            _ => {
                let expr = self.expression()?;
                self.consume_semicolon()?;
                StmtKind::Expr(expr)
            }
        };
        Ok(Stmt { kind, line })
    }

    fn block(&mut self) -> PResult<Vec<Stmt>> {
        self.expect_punct(Punct::LBrace)?;
        let mut body = Vec::new();
        while !self.at_punct(Punct::RBrace) {
            if self.at_eof() {
                return Err(self.unexpected("`}`"));
            }
            body.push(self.statement()?);
        }
        self.advance();
        Ok(body)
    }

    fn parenthesized(&mut self) -> PResult<Expr> {
        self.expect_punct(Punct::LParen)?;
        let expr = self.expression()?;
        self.expect_punct(Punct::RParen)?;
        Ok(expr)
    }

    fn loop_body(&mut self) -> PResult<Stmt> {
        self.loop_depth += 1;
        let body = self.statement();
        self.loop_depth -= 1;
        body
    }

    fn declaration(&mut self, kind: DeclKind) -> PResult<StmtKind> {
        let mut declarators = Vec::new();
        loop {
            let line = self.line();
            let name = self.expect_ident()?;
            let init = if self.eat_punct(Punct::Assign) {
                Some(self.assignment()?)
            } else if kind == DeclKind::Const {
                return Err(SyntaxError::new(
                    line,
                    format!("missing initializer in const declaration `{name}`"),
                ));
            } else {
                None
            };
            declarators.push(Declarator { name, init });
            if !self.eat_punct(Punct::Comma) {
                break;
            }
        }
        Ok(StmtKind::Declare { kind, declarators })
    }

    fn for_statement(&mut self) -> PResult<StmtKind> {
        self.advance();
        self.expect_punct(Punct::LParen)?;

        let init = if self.at_punct(Punct::Semicolon) {
            None
        } else {
            let line = self.line();
            let kind = match self.peek_kind() {
                TokenKind::Keyword(kw @ (Keyword::Let | Keyword::Const | Keyword::Var)) => {
                    let kw = *kw;
                    self.advance();
                    self.declaration(decl_kind(kw))?
                }
                _ => StmtKind::Expr(self.expression()?),
            };
            Some(Box::new(Stmt { kind, line }))
        };
        self.expect_punct(Punct::Semicolon)?;

        let test = if self.at_punct(Punct::Semicolon) {
            None
        } else {
            Some(self.expression()?)
        };
        self.expect_punct(Punct::Semicolon)?;

        let update = if self.at_punct(Punct::RParen) {
            None
        } else {
            Some(self.expression()?)
        };
        self.expect_punct(Punct::RParen)?;

        let body = Box::new(self.loop_body()?);
        Ok(StmtKind::For {
            init,
            test,
            update,
            body,
        })
    }

    fn function(&mut self, require_name: bool) -> PResult<Function> {
        let line = self.line();
        self.expect_keyword(Keyword::Function)?;
        let name = match self.peek_kind() {
            TokenKind::Ident(_) => Some(self.expect_ident()?),
            _ if require_name => return Err(self.unexpected("a function name")),
            _ => None,
        };

        self.expect_punct(Punct::LParen)?;
        let mut params = Vec::new();
        while !self.at_punct(Punct::RParen) {
            params.push(self.expect_ident()?);
            if !self.eat_punct(Punct::Comma) {
                break;
            }
        }
        self.expect_punct(Punct::RParen)?;

        let outer_loops = std::mem::take(&mut self.loop_depth);
        let outer_function = std::mem::replace(&mut self.in_function, true);
        let body = self.block();
        self.loop_depth = outer_loops;
        self.in_function = outer_function;

        Ok(Function {
            name,
            params,
            body: body?,
            line,
        })
    }

    // ------------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------------

    fn expression(&mut self) -> PResult<Expr> {
        self.assignment()
    }

    fn assignment(&mut self) -> PResult<Expr> {
        let target = self.conditional()?;
        let op = match self.peek_kind() {
            TokenKind::Punct(Punct::Assign) => None,
            TokenKind::Punct(Punct::PlusAssign) => Some(BinaryOp::Add),
            TokenKind::Punct(Punct::MinusAssign) => Some(BinaryOp::Sub),
            TokenKind::Punct(Punct::StarAssign) => Some(BinaryOp::Mul),
            TokenKind::Punct(Punct::SlashAssign) => Some(BinaryOp::Div),
            TokenKind::Punct(Punct::PercentAssign) => Some(BinaryOp::Rem),
            _ => return Ok(target),
        };
        let line = self.advance().line;
        if !target.is_assignable() {
            return Err(SyntaxError::new(line, "invalid assignment target"));
        }
        self.enter()?;
        let value = self.assignment();
        self.leave();
        Ok(Expr::new(
            ExprKind::Assign {
                op,
                target: Box::new(target),
                value: Box::new(value?),
            },
            line,
        ))
    }

    fn conditional(&mut self) -> PResult<Expr> {
        let test = self.binary(0)?;
        if !self.at_punct(Punct::Question) {
            return Ok(test);
        }
        let line = self.advance().line;
        self.enter()?;
        let branches = self.conditional_branches();
        self.leave();
        let (consequent, alternate) = branches?;
        Ok(Expr::new(
            ExprKind::Conditional {
                test: Box::new(test),
                consequent: Box::new(consequent),
                alternate: Box::new(alternate),
            },
            line,
        ))
    }

    fn conditional_branches(&mut self) -> PResult<(Expr, Expr)> {
        let consequent = self.assignment()?;
        self.expect_punct(Punct::Colon)?;
        let alternate = self.assignment()?;
        Ok((consequent, alternate))
    }

    fn infix_op(&self) -> Option<(u8, InfixOp)> {
        let TokenKind::Punct(punct) = self.peek_kind() else {
            return None;
        };
        use InfixOp::{Binary as B, Logical as L};
        Some(match punct {
            Punct::QuestionQuestion => (0, L(LogicalOp::Nullish)),
            Punct::OrOr => (1, L(LogicalOp::Or)),
            Punct::AndAnd => (2, L(LogicalOp::And)),
            Punct::EqEq => (3, B(BinaryOp::Eq)),
            Punct::NotEq => (3, B(BinaryOp::NotEq)),
            Punct::EqEqEq => (3, B(BinaryOp::StrictEq)),
            Punct::NotEqEq => (3, B(BinaryOp::StrictNotEq)),
            Punct::Lt => (4, B(BinaryOp::Lt)),
            Punct::LtEq => (4, B(BinaryOp::LtEq)),
            Punct::Gt => (4, B(BinaryOp::Gt)),
            Punct::GtEq => (4, B(BinaryOp::GtEq)),
            Punct::Plus => (5, B(BinaryOp::Add)),
            Punct::Minus => (5, B(BinaryOp::Sub)),
            Punct::Star => (6, B(BinaryOp::Mul)),
            Punct::Slash => (6, B(BinaryOp::Div)),
            Punct::Percent => (6, B(BinaryOp::Rem)),
            _ => return None,
        })
    }

    /// Precedence climbing over the left-associative infix operators.
    fn binary(&mut self, min_prec: u8) -> PResult<Expr> {
        let mut left = self.unary()?;
        let mut links = 0;
        while let Some((prec, op)) = self.infix_op() {
            if prec < min_prec {
                break;
            }
            // Each link wraps everything parsed so far one level deeper.
            self.enter()?;
            links += 1;
            let line = self.advance().line;
            let right = Box::new(self.binary(prec + 1)?);
            let left_box = Box::new(left);
            let kind = match op {
                InfixOp::Binary(op) => ExprKind::Binary {
                    op,
                    left: left_box,
                    right,
                },
                InfixOp::Logical(op) => ExprKind::Logical {
                    op,
                    left: left_box,
                    right,
                },
            };
            left = Expr::new(kind, line);
        }
        self.depth -= links;
        Ok(left)
    }

    fn unary(&mut self) -> PResult<Expr> {
        let line = self.line();
        let op = match self.peek_kind() {
            TokenKind::Punct(Punct::Bang) => UnaryOp::Not,
            TokenKind::Punct(Punct::Minus) => UnaryOp::Neg,
            TokenKind::Punct(Punct::Plus) => UnaryOp::Plus,
            TokenKind::Keyword(Keyword::Typeof) => UnaryOp::Typeof,
            TokenKind::Punct(p @ (Punct::PlusPlus | Punct::MinusMinus)) => {
                let increment = *p == Punct::PlusPlus;
                self.advance();
                self.enter()?;
                let target = self.unary();
                self.leave();
                let target = target?;
                if !target.is_assignable() {
                    return Err(SyntaxError::new(line, "invalid update target"));
                }
                return Ok(Expr::new(
                    ExprKind::Update {
                        increment,
                        prefix: true,
                        target: Box::new(target),
                    },
                    line,
                ));
            }
            _ => return self.postfix(),
        };
        self.advance();
        self.enter()?;
        let operand = self.unary();
        self.leave();
        Ok(Expr::new(
            ExprKind::Unary {
                op,
                operand: Box::new(operand?),
            },
            line,
        ))
    }

    fn postfix(&mut self) -> PResult<Expr> {
        let expr = self.call_member()?;
        let increment = match self.peek_kind() {
            TokenKind::Punct(Punct::PlusPlus) => true,
            TokenKind::Punct(Punct::MinusMinus) => false,
            _ => return Ok(expr),
        };
        if self.peek().newline_before {
            return Ok(expr);
        }
        let line = self.advance().line;
        if !expr.is_assignable() {
            return Err(SyntaxError::new(line, "invalid update target"));
        }
        Ok(Expr::new(
            ExprKind::Update {
                increment,
                prefix: false,
                target: Box::new(expr),
            },
            line,
        ))
    }

    fn call_member(&mut self) -> PResult<Expr> {
        let mut expr = self.primary()?;
        let mut links = 0;
        loop {
            let line = self.line();
            if self.at_punct(Punct::Dot)
                || self.at_punct(Punct::LBracket)
                || self.at_punct(Punct::LParen)
            {
                self.enter()?;
                links += 1;
            }
            if self.eat_punct(Punct::Dot) {
                let property = match self.advance().kind {
                    TokenKind::Ident(name) => name,
                    TokenKind::Keyword(kw) => <&'static str>::from(kw).to_owned(),
                    other => {
                        return Err(SyntaxError::new(
                            line,
                            format!("expected a property name, found {other}"),
                        ));
                    }
                };
                expr = Expr::new(
                    ExprKind::Member {
                        object: Box::new(expr),
                        property,
                    },
                    line,
                );
            } else if self.eat_punct(Punct::LBracket) {
                self.enter()?;
                let index = self.expression();
                self.leave();
                let index = index?;
                self.expect_punct(Punct::RBracket)?;
                expr = Expr::new(
                    ExprKind::Index {
                        object: Box::new(expr),
                        index: Box::new(index),
                    },
                    line,
                );
            } else if self.eat_punct(Punct::LParen) {
                self.enter()?;
                let args = self.list(Punct::RParen);
                self.leave();
                expr = Expr::new(
                    ExprKind::Call {
                        callee: Box::new(expr),
                        args: args?,
                    },
                    line,
                );
            } else {
                self.depth -= links;
                return Ok(expr);
            }
        }
    }

    /// Comma-separated expressions up to `close`, trailing comma allowed.
    fn list(&mut self, close: Punct) -> PResult<Vec<Expr>> {
        let mut items = Vec::new();
        while !self.at_punct(close) {
            items.push(self.assignment()?);
            if !self.eat_punct(Punct::Comma) {
                break;
            }
        }
        self.expect_punct(close)?;
        Ok(items)
    }

    fn primary(&mut self) -> PResult<Expr> {
        let line = self.line();
        let kind = match self.peek_kind().clone() {
            TokenKind::Number(n) => {
                self.advance();
                ExprKind::Number(n)
            }
            TokenKind::Str(s) => {
                self.advance();
                ExprKind::Str(Rc::from(s))
            }
            TokenKind::Ident(name) => {
                self.advance();
                ExprKind::Ident(name)
            }
            TokenKind::Keyword(Keyword::True) => {
                self.advance();
                ExprKind::Bool(true)
            }
            TokenKind::Keyword(Keyword::False) => {
                self.advance();
                ExprKind::Bool(false)
            }
            TokenKind::Keyword(Keyword::Null) => {
                self.advance();
                ExprKind::Null
            }
            TokenKind::Keyword(Keyword::Undefined) => {
                self.advance();
                ExprKind::Undefined
            }
            TokenKind::Keyword(Keyword::Function) => {
                self.enter()?;
                let function = self.function(false);
                self.leave();
                ExprKind::Function(Rc::new(function?))
            }
            TokenKind::Punct(Punct::LParen) => {
                self.advance();
                self.enter()?;
                let inner = self.expression();
                self.leave();
                let inner = inner?;
                self.expect_punct(Punct::RParen)?;
                return Ok(inner);
            }
            TokenKind::Punct(Punct::LBracket) => {
                self.advance();
                self.enter()?;
                let items = self.list(Punct::RBracket);
                self.leave();
                ExprKind::Array(items?)
            }
            TokenKind::Punct(Punct::LBrace) => {
                self.advance();
                self.enter()?;
                let fields = self.object_fields();
                self.leave();
                ExprKind::Object(fields?)
            }
            _ => return Err(self.unexpected("an expression")),
        };
        Ok(Expr::new(kind, line))
    }

    fn object_fields(&mut self) -> PResult<Vec<(String, Expr)>> {
        let mut fields = Vec::new();
        while !self.at_punct(Punct::RBrace) {
            let line = self.line();
            let token = self.advance();
            let (key, shorthand) = match token.kind {
                TokenKind::Ident(name) => (name, true),
                TokenKind::Str(s) => (s, false),
                TokenKind::Number(n) => (crate::interpreter::number_to_string(n), false),
                TokenKind::Keyword(kw) => (<&'static str>::from(kw).to_owned(), false),
                other => {
                    return Err(SyntaxError::new(
                        line,
                        format!("expected a property name, found {other}"),
                    ));
                }
            };
            let value = if self.eat_punct(Punct::Colon) {
                self.assignment()?
            } else if shorthand {
                Expr::new(ExprKind::Ident(key.clone()), line)
            } else {
                return Err(self.unexpected("`:`"));
            };
            fields.push((key, value));
            if !self.eat_punct(Punct::Comma) {
                break;
            }
        }
        self.expect_punct(Punct::RBrace)?;
        Ok(fields)
    }
}

fn decl_kind(keyword: Keyword) -> DeclKind {
    match keyword {
        Keyword::Const => DeclKind::Const,
        Keyword::Var => DeclKind::Var,
        _ => DeclKind::Let,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_stmt(src: &str) -> StmtKind {
        parse(src).unwrap().body.remove(0).kind
    }

    #[test]
    fn precedence_binds_multiplication_tighter() {
        let StmtKind::Expr(expr) = first_stmt("1 + 2 * 3") else {
            panic!("expected expression statement");
        };
        let ExprKind::Binary { op, right, .. } = expr.kind else {
            panic!("expected binary expression");
        };
        assert_eq!(op, BinaryOp::Add);
        assert!(matches!(right.kind, ExprKind::Binary { op: BinaryOp::Mul, .. }));
    }

    #[test]
    fn semicolons_are_optional_at_line_ends() {
        let program = parse("let a = 1\nlet b = a + 1\n").unwrap();
        assert_eq!(program.body.len(), 2);
        assert!(parse("let a = 1 let b = 2").is_err());
    }

    #[test]
    fn return_on_its_own_line_returns_nothing() {
        let program = parse("function f() {\n return\n 1\n}").unwrap();
        let StmtKind::Function(f) = &program.body[0].kind else {
            panic!("expected function");
        };
        assert_eq!(f.body[0].kind, StmtKind::Return(None));
    }

    #[test]
    fn loop_lines_point_at_the_keyword() {
        let program = parse("let x = 0\n\nwhile (x < 3) { x++ }").unwrap();
        assert_eq!(program.body[1].line, 3);
    }

    #[test]
    fn break_outside_loop_is_rejected() {
        let err = parse("function f() { break; }").unwrap_err();
        assert!(err.message.contains("illegal break"));
        assert!(parse("while (true) { function g() { break; } }").is_err());
    }

    #[test]
    fn object_literals_support_shorthand() {
        let StmtKind::Declare { declarators, .. } = first_stmt("const o = { left, up: true, 'x y': 1 }")
        else {
            panic!("expected declaration");
        };
        let Some(Expr {
            kind: ExprKind::Object(fields),
            ..
        }) = &declarators[0].init
        else {
            panic!("expected object literal");
        };
        let keys: Vec<_> = fields.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["left", "up", "x y"]);
    }

    #[test]
    fn deep_nesting_is_a_syntax_error() {
        let src = format!("let x = {}1{}", "(".repeat(500), ")".repeat(500));
        let err = parse(&src).unwrap_err();
        assert!(err.message.contains("too deep"));
    }

    #[test]
    fn long_operator_chains_count_as_nesting() {
        let chain = vec!["1"; 20_000].join(" + ");
        let err = parse(&format!("const x = {chain}")).unwrap_err();
        assert!(err.message.contains("too deep"));

        let calls = "f()".to_owned() + &"()".repeat(20_000);
        assert!(parse(&calls).unwrap_err().message.contains("too deep"));
        let members = "a".to_owned() + &".b".repeat(20_000);
        assert!(parse(&members).unwrap_err().message.contains("too deep"));

        // Ordinary chains stay well under the limit and reset afterwards.
        let short = vec!["1"; 40].join(" + ");
        let src = format!("const a = {short}\nconst b = {short}\nconst c = o.p.q[0](1)(2)");
        assert_eq!(parse(&src).unwrap().body.len(), 3);
    }

    #[test]
    fn const_requires_initializer() {
        assert!(parse("const a;").is_err());
    }
}
