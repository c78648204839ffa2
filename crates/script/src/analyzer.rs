//! Static loop safety analysis.
//!
//! A loop is dangerous when its condition can never be false and its body
//! has no reachable way out. Conditions are judged by constant folding:
//! literals, `!`, arithmetic and comparisons over literals, and `&&`/`||`
//! whose result is decided by a constant operand (`x || true`).
//!
//! A way out is a `return` outside any nested function, or a `break` that
//! belongs to the loop itself; a `break` inside an inner loop only leaves
//! the inner loop.

use std::fmt;
use std::rc::Rc;

use crate::interpreter::{number_to_string, string_to_number};
use crate::syntax::ast::{BinaryOp, Expr, ExprKind, Function, LogicalOp, Program, Stmt, StmtKind, UnaryOp};
use crate::syntax::parse;

/// Loop construct that was flagged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
pub enum LoopKind {
    #[strum(serialize = "while")]
    While,
    #[strum(serialize = "for")]
    For,
    #[strum(serialize = "do-while")]
    DoWhile,
}

/// One loop that can never terminate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DangerousLoop {
    pub line: u32,
    pub kind: LoopKind,
    pub reason: String,
}

/// Outcome of [`analyze`]. Empty means safe.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SafetyReport {
    pub loops: Vec<DangerousLoop>,
}

impl SafetyReport {
    pub fn is_safe(&self) -> bool {
        self.loops.is_empty()
    }

    /// Human-readable diagnostic listing every offending loop.
    pub fn diagnostic(&self) -> Option<String> {
        (!self.is_safe()).then(|| self.to_string())
    }
}

impl fmt::Display for SafetyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_safe() {
            return f.write_str("no infinite loops detected");
        }
        writeln!(f, "infinite loop detected")?;
        for dangerous in &self.loops {
            writeln!(f, "Line {}: {}", dangerous.line, dangerous.reason)?;
        }
        f.write_str("Fix: add a break or return inside the loop")
    }
}

/// Parses `source` and reports every unconditional loop without an exit.
///
/// Source that does not parse is reported safe; the compiler surfaces the
/// syntax error itself.
pub fn analyze(source: &str) -> SafetyReport {
    match parse(source) {
        Ok(program) => analyze_program(&program),
        Err(_) => SafetyReport::default(),
    }
}

pub fn analyze_program(program: &Program) -> SafetyReport {
    let mut walker = Walker::default();
    for stmt in &program.body {
        walker.stmt(stmt);
    }
    SafetyReport {
        loops: walker.loops,
    }
}

// ============================================================================
// Walk
// ============================================================================

#[derive(Default)]
struct Walker {
    loops: Vec<DangerousLoop>,
}

impl Walker {
    fn check(&mut self, line: u32, kind: LoopKind, condition: &str, body: &Stmt) {
        if exits(body, 0) {
            return;
        }
        self.loops.push(DangerousLoop {
            line,
            kind,
            reason: format!("infinite {kind} loop: {condition} and the body has no break or return"),
        });
    }

    fn stmt(&mut self, stmt: &Stmt) {
        match &stmt.kind {
            StmtKind::Expr(expr) | StmtKind::Throw(expr) | StmtKind::Return(Some(expr)) => {
                self.expr(expr)
            }
            StmtKind::Declare { declarators, .. } => {
                for init in declarators.iter().filter_map(|d| d.init.as_ref()) {
                    self.expr(init);
                }
            }
            StmtKind::Function(function) => self.function(function),
            StmtKind::If {
                test,
                then,
                otherwise,
            } => {
                self.expr(test);
                self.stmt(then);
                if let Some(otherwise) = otherwise {
                    self.stmt(otherwise);
                }
            }
            StmtKind::While { test, body } => {
                if truthiness(test) == Some(true) {
                    self.check(stmt.line, LoopKind::While, "condition is always true", body);
                }
                self.expr(test);
                self.stmt(body);
            }
            StmtKind::DoWhile { body, test } => {
                if truthiness(test) == Some(true) {
                    self.check(stmt.line, LoopKind::DoWhile, "condition is always true", body);
                }
                self.stmt(body);
                self.expr(test);
            }
            StmtKind::For {
                init,
                test,
                update,
                body,
            } => {
                match test {
                    None => self.check(stmt.line, LoopKind::For, "no test condition", body),
                    Some(test) if truthiness(test) == Some(true) => {
                        self.check(stmt.line, LoopKind::For, "condition is always true", body)
                    }
                    Some(_) => {}
                }
                if let Some(init) = init {
                    self.stmt(init);
                }
                for expr in test.iter().chain(update.iter()) {
                    self.expr(expr);
                }
                self.stmt(body);
            }
            StmtKind::Block(body) => {
                for stmt in body {
                    self.stmt(stmt);
                }
            }
            StmtKind::Return(None) | StmtKind::Break | StmtKind::Continue | StmtKind::Empty => {}
        }
    }

    fn function(&mut self, function: &Function) {
        for stmt in &function.body {
            self.stmt(stmt);
        }
    }

    /// Expressions can hold function literals, whose bodies may loop.
    fn expr(&mut self, expr: &Expr) {
        match &expr.kind {
            ExprKind::Function(function) => self.function(function),
            ExprKind::Array(items) => items.iter().for_each(|item| self.expr(item)),
            ExprKind::Object(fields) => fields.iter().for_each(|(_, value)| self.expr(value)),
            ExprKind::Member { object, .. } => self.expr(object),
            ExprKind::Index { object, index } => {
                self.expr(object);
                self.expr(index);
            }
            ExprKind::Call { callee, args } => {
                self.expr(callee);
                args.iter().for_each(|arg| self.expr(arg));
            }
            ExprKind::Unary { operand, .. } => self.expr(operand),
            ExprKind::Update { target, .. } => self.expr(target),
            ExprKind::Binary { left, right, .. }
            | ExprKind::Logical { left, right, .. }
            | ExprKind::Assign {
                target: left,
                value: right,
                ..
            } => {
                self.expr(left);
                self.expr(right);
            }
            ExprKind::Conditional {
                test,
                consequent,
                alternate,
            } => {
                self.expr(test);
                self.expr(consequent);
                self.expr(alternate);
            }
            ExprKind::Number(_)
            | ExprKind::Str(_)
            | ExprKind::Bool(_)
            | ExprKind::Null
            | ExprKind::Undefined
            | ExprKind::Ident(_) => {}
        }
    }
}

/// Whether `stmt` contains a reachable exit for the loop it is the body of.
///
/// `nested` counts loops entered below the analyzed one. Function bodies
/// are never searched.
fn exits(stmt: &Stmt, nested: usize) -> bool {
    match &stmt.kind {
        StmtKind::Return(_) => true,
        StmtKind::Break => nested == 0,
        StmtKind::Block(body) => body.iter().any(|s| exits(s, nested)),
        StmtKind::If {
            test,
            then,
            otherwise,
        } => {
            let then_exits = || exits(then, nested);
            let else_exits = || otherwise.as_ref().is_some_and(|o| exits(o, nested));
            match truthiness(test) {
                Some(true) => then_exits(),
                Some(false) => else_exits(),
                None => then_exits() || else_exits(),
            }
        }
        StmtKind::While { body, .. } | StmtKind::DoWhile { body, .. } | StmtKind::For { body, .. } => {
            exits(body, nested + 1)
        }
        _ => false,
    }
}

// ============================================================================
// Constant folding
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
enum Const {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    Str(Rc<str>),
    /// Any object, array or function literal.
    Object,
}

impl Const {
    fn truthy(&self) -> bool {
        match self {
            Self::Undefined | Self::Null => false,
            Self::Bool(b) => *b,
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::Str(s) => !s.is_empty(),
            Self::Object => true,
        }
    }

    fn to_number(&self) -> f64 {
        match self {
            Self::Undefined | Self::Object => f64::NAN,
            Self::Null => 0.0,
            Self::Bool(b) => f64::from(u8::from(*b)),
            Self::Number(n) => *n,
            Self::Str(s) => string_to_number(s),
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Null | Self::Object => "object",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::Str(_) => "string",
        }
    }
}

/// Truthiness of `expr` if it is the same on every evaluation.
fn truthiness(expr: &Expr) -> Option<bool> {
    if let Some(value) = fold(expr) {
        return Some(value.truthy());
    }
    match &expr.kind {
        ExprKind::Unary {
            op: UnaryOp::Not,
            operand,
        } => truthiness(operand).map(|t| !t),
        ExprKind::Logical {
            op: LogicalOp::Or,
            left,
            right,
        } => match (truthiness(left), truthiness(right)) {
            (Some(true), _) | (_, Some(true)) => Some(true),
            (Some(false), Some(false)) => Some(false),
            _ => None,
        },
        ExprKind::Logical {
            op: LogicalOp::And,
            left,
            right,
        } => match (truthiness(left), truthiness(right)) {
            (Some(false), _) | (_, Some(false)) => Some(false),
            (Some(true), Some(true)) => Some(true),
            _ => None,
        },
        ExprKind::Conditional {
            test,
            consequent,
            alternate,
        } => match truthiness(test) {
            Some(true) => truthiness(consequent),
            Some(false) => truthiness(alternate),
            None => {
                let c = truthiness(consequent)?;
                (truthiness(alternate)? == c).then_some(c)
            }
        },
        ExprKind::Assign {
            op: None, value, ..
        } => truthiness(value),
        _ => None,
    }
}

/// Value of `expr` if it only depends on literals.
fn fold(expr: &Expr) -> Option<Const> {
    Some(match &expr.kind {
        ExprKind::Number(n) => Const::Number(*n),
        ExprKind::Str(s) => Const::Str(s.clone()),
        ExprKind::Bool(b) => Const::Bool(*b),
        ExprKind::Null => Const::Null,
        ExprKind::Undefined => Const::Undefined,
        ExprKind::Array(_) | ExprKind::Object(_) | ExprKind::Function(_) => Const::Object,
        ExprKind::Unary { op, operand } => {
            let value = fold(operand)?;
            match op {
                UnaryOp::Not => Const::Bool(!value.truthy()),
                UnaryOp::Neg => Const::Number(-value.to_number()),
                UnaryOp::Plus => Const::Number(value.to_number()),
                UnaryOp::Typeof => Const::Str(Rc::from(value.type_name())),
            }
        }
        ExprKind::Binary { op, left, right } => fold_binary(*op, fold(left)?, fold(right)?)?,
        ExprKind::Logical { op, left, right } => {
            let left_value = fold(left)?;
            let use_left = match op {
                LogicalOp::And => !left_value.truthy(),
                LogicalOp::Or => left_value.truthy(),
                LogicalOp::Nullish => !matches!(left_value, Const::Null | Const::Undefined),
            };
            if use_left { left_value } else { fold(right)? }
        }
        ExprKind::Conditional {
            test,
            consequent,
            alternate,
        } => {
            if fold(test)?.truthy() {
                fold(consequent)?
            } else {
                fold(alternate)?
            }
        }
        ExprKind::Assign {
            op: None, value, ..
        } => fold(value)?,
        _ => return None,
    })
}

fn fold_binary(op: BinaryOp, left: Const, right: Const) -> Option<Const> {
    use BinaryOp::*;
    let both_numbers = || (left.to_number(), right.to_number());
    Some(match op {
        Add => match (&left, &right) {
            (Const::Object, _) | (_, Const::Object) => return None,
            (Const::Str(a), b) => Const::Str(Rc::from(format!("{a}{}", const_to_string(b)))),
            (a, Const::Str(b)) => Const::Str(Rc::from(format!("{}{b}", const_to_string(a)))),
            _ => Const::Number(left.to_number() + right.to_number()),
        },
        Sub => {
            let (a, b) = both_numbers();
            Const::Number(a - b)
        }
        Mul => {
            let (a, b) = both_numbers();
            Const::Number(a * b)
        }
        Div => {
            let (a, b) = both_numbers();
            Const::Number(a / b)
        }
        Rem => {
            let (a, b) = both_numbers();
            Const::Number(a % b)
        }
        StrictEq | StrictNotEq | Eq | NotEq => {
            if matches!(left, Const::Object) || matches!(right, Const::Object) {
                return None;
            }
            let equal = match op {
                StrictEq | StrictNotEq => strict_equals(&left, &right),
                _ => loose_equals(&left, &right),
            };
            Const::Bool(if matches!(op, StrictEq | Eq) { equal } else { !equal })
        }
        Lt | LtEq | Gt | GtEq => {
            let ordering = match (&left, &right) {
                (Const::Str(a), Const::Str(b)) => Some(a.cmp(b)),
                _ => left.to_number().partial_cmp(&right.to_number()),
            };
            Const::Bool(ordering.is_some_and(|o| match op {
                Lt => o.is_lt(),
                LtEq => o.is_le(),
                Gt => o.is_gt(),
                _ => o.is_ge(),
            }))
        }
    })
}

fn strict_equals(left: &Const, right: &Const) -> bool {
    match (left, right) {
        (Const::Number(a), Const::Number(b)) => a == b,
        _ => left == right,
    }
}

fn loose_equals(left: &Const, right: &Const) -> bool {
    match (left, right) {
        (Const::Null | Const::Undefined, Const::Null | Const::Undefined) => true,
        (Const::Null | Const::Undefined, _) | (_, Const::Null | Const::Undefined) => false,
        (Const::Str(a), Const::Str(b)) => a == b,
        _ => left.to_number() == right.to_number(),
    }
}

fn const_to_string(value: &Const) -> String {
    match value {
        Const::Undefined => "undefined".to_owned(),
        Const::Null => "null".to_owned(),
        Const::Bool(b) => b.to_string(),
        Const::Number(n) => number_to_string(*n),
        Const::Str(s) => s.to_string(),
        Const::Object => "[object Object]".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(src: &str) -> Vec<(u32, LoopKind)> {
        analyze(src).loops.iter().map(|l| (l.line, l.kind)).collect()
    }

    #[test]
    fn flags_each_unconditional_loop_kind() {
        let src = "function decide(s, o) {\n\
                   while (true) {}\n\
                   for (;;) { let x = 1 }\n\
                   do { } while (1)\n\
                   }";
        assert_eq!(
            lines(src),
            vec![(2, LoopKind::While), (3, LoopKind::For), (4, LoopKind::DoWhile)]
        );
    }

    #[test]
    fn folded_conditions_count_as_always_true() {
        for cond in ["!false", "1 === 1", "'a'", "true || x", "x || true", "2 > 1 && !0", "[]"] {
            let src = format!("while ({cond}) {{ }}");
            assert!(!analyze(&src).is_safe(), "condition {cond}");
        }
        for cond in ["x", "false", "x && true", "0", "null", "1 === 2", "x > 1"] {
            let src = format!("while ({cond}) {{ }}");
            assert!(analyze(&src).is_safe(), "condition {cond}");
        }
    }

    #[test]
    fn conditional_break_is_an_exit() {
        assert!(analyze("let n = 0; while (true) { n++; if (n > 3) break; }").is_safe());
        assert!(analyze("function f() { for (;;) { return 1 } }").is_safe());
    }

    #[test]
    fn inner_loop_break_does_not_exit_outer_loop() {
        let report = analyze("while (true) { for (let i = 0; i < 3; i++) { break; } }");
        assert_eq!(report.loops.len(), 1);
        assert_eq!(report.loops[0].kind, LoopKind::While);
    }

    #[test]
    fn nested_function_return_does_not_exit() {
        let report = analyze("while (true) { const f = function () { return 1 }; f() }");
        assert_eq!(report.loops.len(), 1);
    }

    #[test]
    fn unreachable_break_does_not_count() {
        assert!(!analyze("while (true) { if (false) { break } }").is_safe());
        assert!(analyze("while (true) { if (false) { } else { break } }").is_safe());
    }

    #[test]
    fn loops_inside_function_expressions_are_found() {
        let report = analyze("const f = function () {\n while (1) { } }");
        assert_eq!(report.loops[0].line, 2);
    }

    #[test]
    fn unparsable_source_is_reported_safe() {
        assert!(analyze("while (true) {").is_safe());
    }

    #[test]
    fn diagnostic_lists_every_loop() {
        let report = analyze("while (true) {}\nwhile (true) {}");
        let text = report.diagnostic().unwrap();
        assert!(text.contains("Line 1: infinite while loop"));
        assert!(text.contains("Line 2: infinite while loop"));
        assert!(analyze("let a = 1").diagnostic().is_none());
    }
}
