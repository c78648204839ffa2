//! Lexical scopes.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::value::Value;
use crate::error::{Result, ScriptError};

#[derive(Debug)]
struct Binding {
    value: Value,
    mutable: bool,
}

#[derive(Debug)]
pub struct Scope {
    bindings: RefCell<HashMap<String, Binding>>,
    parent: Option<Rc<Scope>>,
    /// Function bodies and the global scope receive `var` declarations.
    function: bool,
}

impl Scope {
    pub fn global() -> Rc<Self> {
        Rc::new(Self {
            bindings: RefCell::default(),
            parent: None,
            function: true,
        })
    }

    pub fn child(parent: &Rc<Scope>, function: bool) -> Rc<Self> {
        Rc::new(Self {
            bindings: RefCell::default(),
            parent: Some(Rc::clone(parent)),
            function,
        })
    }

    /// `let`/`const` binding in this scope.
    pub fn declare(&self, name: &str, value: Value, mutable: bool) -> Result<()> {
        let mut bindings = self.bindings.borrow_mut();
        if bindings.contains_key(name) {
            return Err(ScriptError::Type(format!(
                "Identifier '{name}' has already been declared"
            )));
        }
        bindings.insert(name.to_owned(), Binding { value, mutable });
        Ok(())
    }

    /// Mutable binding that replaces any existing one, used for parameters
    /// and function declarations.
    pub fn define(&self, name: &str, value: Value) {
        self.bindings.borrow_mut().insert(
            name.to_owned(),
            Binding {
                value,
                mutable: true,
            },
        );
    }

    /// `var` binding in the nearest function scope. Redeclaring without an
    /// initializer keeps the current value.
    pub fn declare_var(&self, name: &str, value: Option<Value>) -> Result<()> {
        if !self.function
            && let Some(parent) = &self.parent
        {
            return parent.declare_var(name, value);
        }
        let mut bindings = self.bindings.borrow_mut();
        if let Some(binding) = bindings.get_mut(name) {
            if !binding.mutable {
                return Err(ScriptError::Type(format!(
                    "Identifier '{name}' has already been declared"
                )));
            }
            if let Some(value) = value {
                binding.value = value;
            }
            return Ok(());
        }
        bindings.insert(
            name.to_owned(),
            Binding {
                value: value.unwrap_or_default(),
                mutable: true,
            },
        );
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<Value> {
        if let Some(binding) = self.bindings.borrow().get(name) {
            return Some(binding.value.clone());
        }
        self.parent.as_ref()?.lookup(name)
    }

    pub fn assign(&self, name: &str, value: Value) -> Result<()> {
        if let Some(binding) = self.bindings.borrow_mut().get_mut(name) {
            if !binding.mutable {
                return Err(ScriptError::Type("Assignment to constant variable.".to_owned()));
            }
            binding.value = value;
            return Ok(());
        }
        match &self.parent {
            Some(parent) => parent.assign(name, value),
            None => Err(ScriptError::Reference(format!("{name} is not defined"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn const_cannot_be_reassigned() {
        let scope = Scope::global();
        scope.declare("a", Value::Number(1.0), false).unwrap();
        let err = scope.assign("a", Value::Number(2.0)).unwrap_err();
        assert!(matches!(err, ScriptError::Type(_)));
    }

    #[test]
    fn var_hoists_to_function_scope() {
        let global = Scope::global();
        let block = Scope::child(&global, false);
        block.declare_var("v", Some(Value::Bool(true))).unwrap();
        assert!(matches!(global.lookup("v"), Some(Value::Bool(true))));
    }

    #[test]
    fn inner_let_shadows_outer() {
        let global = Scope::global();
        global.declare("x", Value::Number(1.0), true).unwrap();
        let inner = Scope::child(&global, false);
        inner.declare("x", Value::Number(2.0), true).unwrap();
        inner.assign("x", Value::Number(3.0)).unwrap();
        assert!(matches!(global.lookup("x"), Some(Value::Number(n)) if n == 1.0));
        assert!(global.declare("x", Value::Null, true).is_err());
    }

    #[test]
    fn undeclared_assignment_is_a_reference_error() {
        let err = Scope::global().assign("ghost", Value::Null).unwrap_err();
        assert_eq!(err, ScriptError::Reference("ghost is not defined".into()));
    }
}
