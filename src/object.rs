use crate::ast::{BlockStatement, Identifier};
use crate::environment::Environment;
use fnv::{FnvHashMap, FnvHasher};
use std::cell::RefCell;
use std::error::Error;
use std::fmt;
use std::fmt::Formatter;
use std::hash::Hasher;
use std::rc::Rc;
use strum_macros::Display;

/// Type tag for a runtime value, as shown in diagnostics.
#[rustfmt::skip]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ObjectType {
    #[strum(serialize = "INTEGER")] Integer,
    #[strum(serialize = "BOOLEAN")] Boolean,
    #[strum(serialize = "STRING")] Str,
    #[strum(serialize = "NULL")] Null,
    #[strum(serialize = "RETURN_VALUE")] ReturnValue,
    #[strum(serialize = "ERROR")] Error,
    #[strum(serialize = "FUNCTION")] Function,
    #[strum(serialize = "BUILTIN")] Builtin,
    #[strum(serialize = "HASH")] Hash,
}

/// Host primitive exposed to the language as an ordinary binding.
pub type BuiltinFn = fn(&[Object]) -> Object;

/// Runtime value. `ReturnValue` is a control-flow carrier the evaluator
/// unwraps, never something a program observes directly; `Error` values
/// short-circuit evaluation rather than aborting the host.
#[derive(Clone)]
pub enum Object {
    Integer(i64),
    Boolean(bool),
    Str(String),
    Null,
    ReturnValue(Box<Object>),
    Error(String),
    Function(Function),
    Builtin(BuiltinFn),
    Hash(FnvHashMap<HashKey, HashPair>),
}

/// Closure: a function literal plus the environment that was active at
/// its definition site.
#[derive(Clone)]
pub struct Function {
    pub parameters: Vec<Identifier>,
    pub body: BlockStatement,
    pub env: Rc<RefCell<Environment>>,
}

#[derive(Clone)]
pub struct HashPair {
    pub key: Object,
    pub value: Object,
}

/// Comparable projection of a hashable value. Structurally different
/// variants can all serve as map keys through it; equal source values of
/// the same variant always project to the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HashKey {
    pub kind: ObjectType,
    pub value: u64,
}

#[derive(Debug)]
pub struct NotHashable {
    kind: ObjectType,
}

impl fmt::Display for NotHashable {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "unusable as hash key: {}", self.kind)
    }
}

impl Error for NotHashable {}

impl Object {
    pub fn kind(&self) -> ObjectType {
        match self {
            Object::Integer(_) => ObjectType::Integer,
            Object::Boolean(_) => ObjectType::Boolean,
            Object::Str(_) => ObjectType::Str,
            Object::Null => ObjectType::Null,
            Object::ReturnValue(_) => ObjectType::ReturnValue,
            Object::Error(_) => ObjectType::Error,
            Object::Function(_) => ObjectType::Function,
            Object::Builtin(_) => ObjectType::Builtin,
            Object::Hash(_) => ObjectType::Hash,
        }
    }

    pub fn inspect(&self) -> String {
        match self {
            Object::Integer(value) => value.to_string(),
            Object::Boolean(value) => value.to_string(),
            Object::Str(value) => value.clone(),
            Object::Null => "null".to_string(),
            Object::ReturnValue(wrapped) => wrapped.inspect(),
            Object::Error(message) => format!("ERROR: {}", message),
            Object::Function(function) => {
                let params: Vec<String> = function
                    .parameters
                    .iter()
                    .map(Identifier::to_string)
                    .collect();
                format!("fn({}) {{\n{}\n}}", params.join(", "), function.body)
            }
            Object::Builtin(_) => "builtin function".to_string(),
            Object::Hash(pairs) => {
                let pairs: Vec<String> = pairs
                    .values()
                    .map(|pair| format!("{}: {}", pair.key.inspect(), pair.value.inspect()))
                    .collect();
                format!("{{{}}}", pairs.join(", "))
            }
        }
    }

    /// Projection used for hash-map keys. Only `Integer`, `Boolean` and
    /// `Str` are hashable; anything else is a `NotHashable` error, never
    /// a silently fabricated key.
    pub fn hash_key(&self) -> Result<HashKey, NotHashable> {
        match self {
            Object::Integer(value) => Ok(HashKey {
                kind: ObjectType::Integer,
                value: *value as u64,
            }),
            Object::Boolean(value) => Ok(HashKey {
                kind: ObjectType::Boolean,
                value: *value as u64,
            }),
            Object::Str(value) => {
                let mut hasher = FnvHasher::default();
                hasher.write(value.as_bytes());
                Ok(HashKey {
                    kind: ObjectType::Str,
                    value: hasher.finish(),
                })
            }
            other => Err(NotHashable { kind: other.kind() }),
        }
    }
}

// A function's captured environment can transitively contain the function
// itself, so Debug stays shallow for closures and builtins.
impl fmt::Debug for Object {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Object::Integer(value) => f.debug_tuple("Integer").field(value).finish(),
            Object::Boolean(value) => f.debug_tuple("Boolean").field(value).finish(),
            Object::Str(value) => f.debug_tuple("Str").field(value).finish(),
            Object::Null => write!(f, "Null"),
            Object::ReturnValue(wrapped) => f.debug_tuple("ReturnValue").field(wrapped).finish(),
            Object::Error(message) => f.debug_tuple("Error").field(message).finish(),
            Object::Function(function) => {
                write!(f, "<fn/{}>", function.parameters.len())
            }
            Object::Builtin(_) => write!(f, "<native fn>"),
            Object::Hash(pairs) => write!(f, "Hash({} pairs)", pairs.len()),
        }
    }
}
