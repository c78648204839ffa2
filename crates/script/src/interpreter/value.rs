//! Runtime values.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

use super::builtins::Builtin;
use super::scope::Scope;
use crate::syntax::ast::Function;

pub type Array = Rc<RefCell<Vec<Value>>>;
pub type Object = Rc<RefCell<BTreeMap<String, Value>>>;

#[derive(Clone, Debug, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    Str(Rc<str>),
    Array(Array),
    Object(Object),
    Function(Rc<Closure>),
    Native(Builtin),
}

/// A script function paired with the scope it was declared in.
///
/// The scope is held weakly: a closure stored into a binding of its own
/// scope would otherwise keep that scope alive forever. Calling a closure
/// whose scope has been dropped is a type error.
#[derive(Debug)]
pub struct Closure {
    pub decl: Rc<Function>,
    pub env: Weak<Scope>,
}

impl Value {
    pub fn str(s: impl AsRef<str>) -> Self {
        Self::Str(Rc::from(s.as_ref()))
    }

    pub fn array(items: Vec<Value>) -> Self {
        Self::Array(Rc::new(RefCell::new(items)))
    }

    pub fn object(fields: BTreeMap<String, Value>) -> Self {
        Self::Object(Rc::new(RefCell::new(fields)))
    }

    pub fn object_from<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Self::object(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn is_nullish(&self) -> bool {
        matches!(self, Self::Undefined | Self::Null)
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, Self::Function(_) | Self::Native(_))
    }

    pub fn truthy(&self) -> bool {
        match self {
            Self::Undefined | Self::Null => false,
            Self::Bool(b) => *b,
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::Str(s) => !s.is_empty(),
            Self::Array(_) | Self::Object(_) | Self::Function(_) | Self::Native(_) => true,
        }
    }

    pub fn type_of(&self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Null | Self::Array(_) | Self::Object(_) => "object",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::Str(_) => "string",
            Self::Function(_) | Self::Native(_) => "function",
        }
    }
}
