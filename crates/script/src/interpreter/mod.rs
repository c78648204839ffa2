//! Tree-walking interpreter with an operation budget.
//!
//! Every statement and expression evaluated consumes one unit of budget and
//! every script call counts toward the call-depth limit, so a loop the static
//! analysis could not prove infinite still ends with
//! [`ScriptError::BudgetExceeded`] instead of hanging its thread.

mod builtins;
mod meter;
mod ops;
mod scope;
mod value;

use std::rc::Rc;

use rand::SeedableRng;
use rand::rngs::StdRng;

pub use builtins::{Builtin, MathFn};
pub use meter::Meter;
pub use ops::{MAX_STRING_LENGTH, number_to_string, string_to_number, to_display_string};
pub use value::{Closure, Value};

use ops::{
    binary, display, same_value_zero, strict_equals, to_index, to_number, to_property_key,
};
use scope::Scope;

use crate::error::{Result, ScriptError};
use crate::syntax::ast::{
    DeclKind, Expr, ExprKind, LogicalOp, Program, Stmt, StmtKind, UnaryOp,
};

/// Longest array a script may build.
pub const MAX_ARRAY_LENGTH: usize = 65_536;

/// Per-invocation resource limits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Limits {
    pub budget: u64,
    pub max_call_depth: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            budget: 200_000,
            max_call_depth: 64,
        }
    }
}

enum Flow {
    Normal,
    Break,
    Continue,
    Return(Value),
}

/// Resolved assignment target.
enum Place {
    Binding(String),
    Property(Value, Value),
}

pub struct Interpreter {
    globals: Rc<Scope>,
    limits: Limits,
    meter: Meter,
    depth: usize,
    rng: StdRng,
}

impl Interpreter {
    pub fn new(limits: Limits, seed: u64) -> Self {
        let prelude = Scope::global();
        builtins::install(&prelude);
        Self {
            globals: Scope::child(&prelude, true),
            limits,
            meter: Meter::new(limits.budget),
            depth: 0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Runs top-level statements against the global scope with a fresh budget.
    pub fn run(&mut self, program: &Program) -> Result<()> {
        self.reset();
        let globals = Rc::clone(&self.globals);
        self.exec_block(&program.body, &globals)?;
        Ok(())
    }

    pub fn global(&self, name: &str) -> Option<Value> {
        self.globals.lookup(name)
    }

    /// Calls `callee` from the host with a fresh budget.
    pub fn invoke(&mut self, callee: &Value, args: Vec<Value>) -> Result<Value> {
        self.reset();
        self.call_value(callee, args)
    }

    /// Budget units consumed since the last reset.
    pub fn operations(&self) -> u64 {
        self.meter.used()
    }

    fn reset(&mut self) {
        self.meter.reset();
        self.depth = 0;
    }

    fn tick(&mut self) -> Result<()> {
        self.meter.charge(1)
    }

    // ------------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------------

    fn exec_block(&mut self, body: &[Stmt], scope: &Rc<Scope>) -> Result<Flow> {
        for stmt in body {
            if let StmtKind::Function(function) = &stmt.kind
                && let Some(name) = &function.name
            {
                scope.define(name, closure(function, scope));
            }
        }
        for stmt in body {
            if matches!(stmt.kind, StmtKind::Function(_)) {
                continue;
            }
            match self.exec(stmt, scope)? {
                Flow::Normal => {}
                flow => return Ok(flow),
            }
        }
        Ok(Flow::Normal)
    }

    fn exec(&mut self, stmt: &Stmt, scope: &Rc<Scope>) -> Result<Flow> {
        self.tick()?;
        match &stmt.kind {
            StmtKind::Expr(expr) => {
                self.eval(expr, scope)?;
            }
            StmtKind::Declare { kind, declarators } => {
                for declarator in declarators {
                    let value = match &declarator.init {
                        Some(init) => Some(self.eval(init, scope)?),
                        None => None,
                    };
                    match kind {
                        DeclKind::Let => {
                            scope.declare(&declarator.name, value.unwrap_or_default(), true)?
                        }
                        DeclKind::Const => {
                            scope.declare(&declarator.name, value.unwrap_or_default(), false)?
                        }
                        DeclKind::Var => scope.declare_var(&declarator.name, value)?,
                    }
                }
            }
            // Only reached outside a block, e.g. as the body of an `if`.
            StmtKind::Function(function) => {
                if let Some(name) = &function.name {
                    scope.define(name, closure(function, scope));
                }
            }
            StmtKind::If {
                test,
                then,
                otherwise,
            } => {
                if self.eval(test, scope)?.truthy() {
                    return self.exec(then, scope);
                }
                if let Some(otherwise) = otherwise {
                    return self.exec(otherwise, scope);
                }
            }
            StmtKind::While { test, body } => {
                while self.eval(test, scope)?.truthy() {
                    match self.exec(body, scope)? {
                        Flow::Break => break,
                        Flow::Normal | Flow::Continue => {}
                        ret @ Flow::Return(_) => return Ok(ret),
                    }
                }
            }
            StmtKind::DoWhile { body, test } => loop {
                match self.exec(body, scope)? {
                    Flow::Break => break,
                    Flow::Normal | Flow::Continue => {}
                    ret @ Flow::Return(_) => return Ok(ret),
                }
                if !self.eval(test, scope)?.truthy() {
                    break;
                }
            },
            StmtKind::For {
                init,
                test,
                update,
                body,
            } => {
                let scope = Scope::child(scope, false);
                if let Some(init) = init {
                    self.exec(init, &scope)?;
                }
                loop {
                    if let Some(test) = test
                        && !self.eval(test, &scope)?.truthy()
                    {
                        break;
                    }
                    match self.exec(body, &scope)? {
                        Flow::Break => break,
                        Flow::Normal | Flow::Continue => {}
                        ret @ Flow::Return(_) => return Ok(ret),
                    }
                    if let Some(update) = update {
                        self.eval(update, &scope)?;
                    }
                }
            }
            StmtKind::Block(body) => {
                let scope = Scope::child(scope, false);
                return self.exec_block(body, &scope);
            }
            StmtKind::Return(value) => {
                let value = match value {
                    Some(expr) => self.eval(expr, scope)?,
                    None => Value::Undefined,
                };
                return Ok(Flow::Return(value));
            }
            StmtKind::Break => return Ok(Flow::Break),
            StmtKind::Continue => return Ok(Flow::Continue),
            StmtKind::Throw(expr) => {
                let value = self.eval(expr, scope)?;
                return Err(ScriptError::Thrown(display(&value, &mut self.meter)?));
            }
            StmtKind::Empty => {}
        }
        Ok(Flow::Normal)
    }

    // ------------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------------

    fn eval(&mut self, expr: &Expr, scope: &Rc<Scope>) -> Result<Value> {
        self.tick()?;
        Ok(match &expr.kind {
            ExprKind::Number(n) => Value::Number(*n),
            ExprKind::Str(s) => Value::Str(Rc::clone(s)),
            ExprKind::Bool(b) => Value::Bool(*b),
            ExprKind::Null => Value::Null,
            ExprKind::Undefined => Value::Undefined,
            ExprKind::Ident(name) => scope
                .lookup(name)
                .ok_or_else(|| ScriptError::Reference(format!("{name} is not defined")))?,
            ExprKind::Array(items) => {
                if items.len() > MAX_ARRAY_LENGTH {
                    return Err(ScriptError::Range("Invalid array length".to_owned()));
                }
                let items = items
                    .iter()
                    .map(|item| self.eval(item, scope))
                    .collect::<Result<Vec<_>>>()?;
                Value::array(items)
            }
            ExprKind::Object(fields) => {
                let mut map = std::collections::BTreeMap::new();
                for (key, value) in fields {
                    map.insert(key.clone(), self.eval(value, scope)?);
                }
                Value::object(map)
            }
            ExprKind::Function(function) => closure(function, scope),
            ExprKind::Member { object, property } => {
                let object = self.eval(object, scope)?;
                get_property(&object, &Value::str(property), &mut self.meter)?
            }
            ExprKind::Index { object, index } => {
                let object = self.eval(object, scope)?;
                let index = self.eval(index, scope)?;
                get_property(&object, &index, &mut self.meter)?
            }
            ExprKind::Call { callee, args } => self.eval_call(callee, args, scope)?,
            ExprKind::Unary { op, operand } => {
                if *op == UnaryOp::Typeof
                    && let ExprKind::Ident(name) = &operand.kind
                    && scope.lookup(name).is_none()
                {
                    return Ok(Value::str("undefined"));
                }
                let value = self.eval(operand, scope)?;
                match op {
                    UnaryOp::Not => Value::Bool(!value.truthy()),
                    UnaryOp::Neg => Value::Number(-to_number(&value, &mut self.meter)?),
                    UnaryOp::Plus => Value::Number(to_number(&value, &mut self.meter)?),
                    UnaryOp::Typeof => Value::str(value.type_of()),
                }
            }
            ExprKind::Binary { op, left, right } => {
                let left = self.eval(left, scope)?;
                let right = self.eval(right, scope)?;
                binary(*op, &left, &right, &mut self.meter)?
            }
            ExprKind::Logical { op, left, right } => {
                let left = self.eval(left, scope)?;
                let short_circuit = match op {
                    LogicalOp::And => !left.truthy(),
                    LogicalOp::Or => left.truthy(),
                    LogicalOp::Nullish => !left.is_nullish(),
                };
                if short_circuit {
                    left
                } else {
                    self.eval(right, scope)?
                }
            }
            ExprKind::Conditional {
                test,
                consequent,
                alternate,
            } => {
                if self.eval(test, scope)?.truthy() {
                    self.eval(consequent, scope)?
                } else {
                    self.eval(alternate, scope)?
                }
            }
            ExprKind::Assign { op, target, value } => {
                let place = self.place(target, scope)?;
                let value = match op {
                    None => self.eval(value, scope)?,
                    Some(op) => {
                        let current = self.read(&place, scope)?;
                        let rhs = self.eval(value, scope)?;
                        binary(*op, &current, &rhs, &mut self.meter)?
                    }
                };
                self.write(&place, value.clone(), scope)?;
                value
            }
            ExprKind::Update {
                increment,
                prefix,
                target,
            } => {
                let place = self.place(target, scope)?;
                let current = self.read(&place, scope)?;
                let old = to_number(&current, &mut self.meter)?;
                let new = if *increment { old + 1.0 } else { old - 1.0 };
                self.write(&place, Value::Number(new), scope)?;
                Value::Number(if *prefix { new } else { old })
            }
        })
    }

    fn place(&mut self, target: &Expr, scope: &Rc<Scope>) -> Result<Place> {
        match &target.kind {
            ExprKind::Ident(name) => Ok(Place::Binding(name.clone())),
            ExprKind::Member { object, property } => {
                Ok(Place::Property(self.eval(object, scope)?, Value::str(property)))
            }
            ExprKind::Index { object, index } => {
                let object = self.eval(object, scope)?;
                Ok(Place::Property(object, self.eval(index, scope)?))
            }
            _ => Err(ScriptError::Type("invalid assignment target".to_owned())),
        }
    }

    fn read(&mut self, place: &Place, scope: &Rc<Scope>) -> Result<Value> {
        match place {
            Place::Binding(name) => scope
                .lookup(name)
                .ok_or_else(|| ScriptError::Reference(format!("{name} is not defined"))),
            Place::Property(object, key) => get_property(object, key, &mut self.meter),
        }
    }

    fn write(&mut self, place: &Place, value: Value, scope: &Rc<Scope>) -> Result<()> {
        match place {
            Place::Binding(name) => scope.assign(name, value),
            Place::Property(object, key) => set_property(object, key, value, &mut self.meter),
        }
    }

    fn eval_call(&mut self, callee: &Expr, args: &[Expr], scope: &Rc<Scope>) -> Result<Value> {
        let function = match &callee.kind {
            ExprKind::Member { object, property } => {
                let receiver = self.eval(object, scope)?;
                if let Value::Array(items) = &receiver
                    && let Some(method) = ArrayMethod::from_name(property)
                {
                    let args = self.eval_args(args, scope)?;
                    return method.call(items, &args, &mut self.meter);
                }
                get_property(&receiver, &Value::str(property), &mut self.meter)?
            }
            _ => self.eval(callee, scope)?,
        };
        if !function.is_callable() {
            return Err(ScriptError::Type(format!("{} is not a function", describe(callee))));
        }
        let args = self.eval_args(args, scope)?;
        self.call_value(&function, args)
    }

    fn eval_args(&mut self, args: &[Expr], scope: &Rc<Scope>) -> Result<Vec<Value>> {
        args.iter().map(|arg| self.eval(arg, scope)).collect()
    }

    fn call_value(&mut self, function: &Value, args: Vec<Value>) -> Result<Value> {
        let closure = match function {
            Value::Native(builtin) => {
                return builtins::call(*builtin, &args, &mut self.rng, &mut self.meter);
            }
            Value::Function(closure) => Rc::clone(closure),
            other => {
                return Err(ScriptError::Type(format!(
                    "{} is not a function",
                    to_display_string(other)
                )));
            }
        };
        if self.depth >= self.limits.max_call_depth {
            return Err(ScriptError::CallDepthExceeded(self.limits.max_call_depth));
        }
        let env = closure
            .env
            .upgrade()
            .ok_or_else(|| ScriptError::Type("closure scope expired".to_owned()))?;

        let scope = Scope::child(&env, true);
        if let Some(name) = &closure.decl.name {
            scope.define(name, Value::Function(Rc::clone(&closure)));
        }
        let mut args = args.into_iter();
        for param in &closure.decl.params {
            scope.define(param, args.next().unwrap_or_default());
        }

        self.depth += 1;
        let flow = self.exec_block(&closure.decl.body, &scope);
        self.depth -= 1;
        Ok(match flow? {
            Flow::Return(value) => value,
            _ => Value::Undefined,
        })
    }
}

fn closure(function: &Rc<crate::syntax::ast::Function>, scope: &Rc<Scope>) -> Value {
    Value::Function(Rc::new(Closure {
        decl: Rc::clone(function),
        env: Rc::downgrade(scope),
    }))
}

/// Source-like name of a callee for error messages.
fn describe(expr: &Expr) -> String {
    match &expr.kind {
        ExprKind::Ident(name) => name.clone(),
        ExprKind::Member { object, property } => format!("{}.{property}", describe(object)),
        ExprKind::Index { object, .. } => format!("{}[...]", describe(object)),
        ExprKind::Call { callee, .. } => format!("{}(...)", describe(callee)),
        _ => "expression".to_owned(),
    }
}

fn get_property(object: &Value, key: &Value, meter: &mut Meter) -> Result<Value> {
    match object {
        Value::Undefined | Value::Null => Err(ScriptError::Type(format!(
            "Cannot read properties of {} (reading '{}')",
            to_display_string(object),
            to_display_string(key)
        ))),
        Value::Object(fields) => {
            let name = to_property_key(key, meter)?;
            Ok(fields.borrow().get(&name).cloned().unwrap_or_default())
        }
        Value::Array(items) => {
            if let Some(index) = to_index(key) {
                return Ok(items.borrow().get(index).cloned().unwrap_or_default());
            }
            Ok(match to_property_key(key, meter)?.as_str() {
                "length" => Value::Number(items.borrow().len() as f64),
                _ => Value::Undefined,
            })
        }
        Value::Str(s) => {
            if let Some(index) = to_index(key) {
                meter.charge_bytes(s.len())?;
                return Ok(s.chars().nth(index).map_or(Value::Undefined, |c| Value::str(c.to_string())));
            }
            Ok(match to_property_key(key, meter)?.as_str() {
                "length" => {
                    meter.charge_bytes(s.len())?;
                    Value::Number(s.chars().count() as f64)
                }
                _ => Value::Undefined,
            })
        }
        Value::Bool(_) | Value::Number(_) | Value::Function(_) | Value::Native(_) => {
            Ok(Value::Undefined)
        }
    }
}

/// Keys and lengths are converted before the target is borrowed mutably,
/// since converting may read the target itself.
fn set_property(object: &Value, key: &Value, value: Value, meter: &mut Meter) -> Result<()> {
    match object {
        Value::Object(fields) => {
            let name = to_property_key(key, meter)?;
            fields.borrow_mut().insert(name, value);
            Ok(())
        }
        Value::Array(items) => {
            if let Some(index) = to_index(key) {
                if index >= MAX_ARRAY_LENGTH {
                    return Err(ScriptError::Range("Invalid array length".to_owned()));
                }
                let mut items = items.borrow_mut();
                if index >= items.len() {
                    meter.charge_items(index + 1 - items.len())?;
                    items.resize(index + 1, Value::Undefined);
                }
                items[index] = value;
                return Ok(());
            }
            match to_property_key(key, meter)?.as_str() {
                "length" => {
                    let len = to_number(&value, meter)?;
                    if !(0.0..=MAX_ARRAY_LENGTH as f64).contains(&len) || len.fract() != 0.0 {
                        return Err(ScriptError::Range("Invalid array length".to_owned()));
                    }
                    let len = len as usize;
                    let mut items = items.borrow_mut();
                    meter.charge_items(len.abs_diff(items.len()))?;
                    items.resize(len, Value::Undefined);
                    Ok(())
                }
                other => Err(ScriptError::Type(format!(
                    "Cannot create property '{other}' on an array"
                ))),
            }
        }
        Value::Undefined | Value::Null => Err(ScriptError::Type(format!(
            "Cannot set properties of {} (setting '{}')",
            to_display_string(object),
            to_display_string(key)
        ))),
        other => Err(ScriptError::Type(format!(
            "Cannot create property '{}' on {} '{}'",
            to_display_string(key),
            other.type_of(),
            to_display_string(other)
        ))),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::EnumString)]
#[strum(serialize_all = "camelCase")]
enum ArrayMethod {
    Push,
    Pop,
    Includes,
    IndexOf,
}

impl ArrayMethod {
    fn from_name(name: &str) -> Option<Self> {
        name.parse().ok()
    }

    fn call(self, items: &value::Array, args: &[Value], meter: &mut Meter) -> Result<Value> {
        let needle = args.first().cloned().unwrap_or_default();
        match self {
            Self::Push => {
                let mut items = items.borrow_mut();
                if items.len() + args.len() > MAX_ARRAY_LENGTH {
                    return Err(ScriptError::Range("Invalid array length".to_owned()));
                }
                meter.charge_items(args.len())?;
                items.extend(args.iter().cloned());
                Ok(Value::Number(items.len() as f64))
            }
            Self::Pop => Ok(items.borrow_mut().pop().unwrap_or_default()),
            Self::Includes => {
                for item in items.borrow().iter() {
                    meter.charge(1)?;
                    if same_value_zero(item, &needle, meter)? {
                        return Ok(Value::Bool(true));
                    }
                }
                Ok(Value::Bool(false))
            }
            Self::IndexOf => {
                for (i, item) in items.borrow().iter().enumerate() {
                    meter.charge(1)?;
                    if strict_equals(item, &needle, meter)? {
                        return Ok(Value::Number(i as f64));
                    }
                }
                Ok(Value::Number(-1.0))
            }
        }
    }
}
