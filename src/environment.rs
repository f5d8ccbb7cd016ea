use crate::object::Object;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Chained name→value scope. Every closure capturing a scope shares it
/// (the outer link is an `Rc`, never a copy), so a binding written
/// through one closure is visible through any other closure holding the
/// same scope. The chain is strictly tree-shaped.
#[derive(Debug, Default)]
pub struct Environment {
    store: HashMap<String, Object>,
    outer: Option<Rc<RefCell<Environment>>>,
}

impl Environment {
    pub fn new() -> Environment {
        Environment::default()
    }

    /// Fresh child scope whose lookups fall through to `outer`. Used for
    /// every function invocation and for closure capture.
    pub fn new_enclosed(outer: Rc<RefCell<Environment>>) -> Environment {
        Environment {
            store: HashMap::new(),
            outer: Some(outer),
        }
    }

    pub fn get(&self, name: &str) -> Option<Object> {
        match self.store.get(name) {
            Some(object) => Some(object.clone()),
            None => self
                .outer
                .as_ref()
                .and_then(|outer| outer.borrow().get(name)),
        }
    }

    /// Bind in this scope only. An inner `set` shadows an outer binding
    /// of the same name instead of mutating it.
    pub fn set(&mut self, name: impl Into<String>, value: Object) {
        self.store.insert(name.into(), value);
    }
}
