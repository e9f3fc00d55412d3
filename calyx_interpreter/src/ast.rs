use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

// Re-export the core AST types from calyx_ast
pub use calyx_ast::*;

// --- Runtime Values ---

/// Represents a runtime value in the Calyx interpreter.
///
/// Closures and storage cells are reference counted: copying a `Value`
/// shares them, it never duplicates the underlying function or slot.
#[derive(Clone)]
pub enum Value {
    Int(i64),
    Bool(bool),
    Str(String),
    /// A first-class function together with its captured environment.
    Closure(Rc<Closure>),
    /// A reference to a mutable storage cell.
    Ref(StorageCell),
}

/// The runtime kind of a value, used for equality and type errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Int,
    Bool,
    Str,
    Function,
    Ref,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Int => "int",
            ValueKind::Bool => "bool",
            ValueKind::Str => "string",
            ValueKind::Function => "function",
            ValueKind::Ref => "ref",
        };
        f.write_str(name)
    }
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Int(_) => ValueKind::Int,
            Value::Bool(_) => ValueKind::Bool,
            Value::Str(_) => ValueKind::Str,
            Value::Closure(_) => ValueKind::Function,
            Value::Ref(_) => ValueKind::Ref,
        }
    }

    pub fn is_closure(&self) -> bool {
        matches!(self, Value::Closure(_))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "Int({})", n),
            Value::Bool(b) => write!(f, "Bool({})", b),
            Value::Str(s) => write!(f, "Str({:?})", s),
            Value::Closure(c) => write!(f, "Closure({})", c.param),
            Value::Ref(_) => write!(f, "Ref"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Str(s) => f.write_str(s),
            Value::Closure(c) => write!(f, "<function {}>", c.param),
            Value::Ref(cell) => match &*cell.0.try_borrow().map_err(|_| fmt::Error)? {
                // A cell holding a closure may be reachable from that closure's
                // own environment; don't walk into it.
                Value::Closure(c) => write!(f, "<ref <function {}>>", c.param),
                inner => write!(f, "<ref {}>", inner),
            },
        }
    }
}

/// Structural equality for first-order values. Closures and cells compare
/// by identity; values of different kinds are never equal.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Closure(a), Value::Closure(b)) => Rc::ptr_eq(a, b),
            (Value::Ref(a), Value::Ref(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

/// Represents a closure: a one-parameter function with its captured lexical
/// environment.
pub struct Closure {
    pub param: String,
    pub body: Expr,
    pub captured_env: Environment,
}

impl fmt::Debug for Closure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Closure")
            .field("param", &self.param)
            .field("body", &self.body)
            .field("captured_env", &"...")
            .finish()
    }
}

// --- Storage Cells ---

/// A mutable slot holding one value. Clones alias the same slot, so an
/// assignment through one clone is visible through all of them.
#[derive(Clone)]
pub struct StorageCell(Rc<RefCell<Value>>);

impl StorageCell {
    pub fn new(value: Value) -> Self {
        StorageCell(Rc::new(RefCell::new(value)))
    }

    pub fn get(&self) -> Value {
        self.0.borrow().clone()
    }

    /// Overwrites the slot, returning the previous content.
    pub fn set(&self, value: Value) -> Value {
        self.0.replace(value)
    }

    pub fn holds_closure(&self) -> bool {
        self.0.borrow().is_closure()
    }

    pub fn ptr_eq(&self, other: &StorageCell) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for StorageCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StorageCell({:p})", Rc::as_ptr(&self.0))
    }
}

// --- Environment ---

/// What a name is bound to: a storage cell for every binding the language
/// itself creates, or a plain immutable value supplied by the host.
#[derive(Debug, Clone)]
pub enum Binding {
    Cell(StorageCell),
    Value(Value),
}

impl Binding {
    /// The current value behind the binding.
    pub fn read(&self) -> Value {
        match self {
            Binding::Cell(cell) => cell.get(),
            Binding::Value(value) => value.clone(),
        }
    }
}

struct Frame {
    name: String,
    binding: Binding,
    next: Environment,
}

/// A persistent list of bindings, newest first. Extending never touches the
/// original, and all extensions of one environment share it as their tail.
#[derive(Clone, Default)]
pub struct Environment {
    head: Option<Rc<Frame>>,
}

impl Environment {
    pub fn new() -> Self {
        Environment { head: None }
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    pub fn extend(&self, name: impl Into<String>, binding: Binding) -> Self {
        Environment {
            head: Some(Rc::new(Frame {
                name: name.into(),
                binding,
                next: self.clone(),
            })),
        }
    }

    pub fn extend_cell(&self, name: impl Into<String>, cell: StorageCell) -> Self {
        self.extend(name, Binding::Cell(cell))
    }

    pub fn extend_value(&self, name: impl Into<String>, value: Value) -> Self {
        self.extend(name, Binding::Value(value))
    }

    pub fn lookup(&self, name: &str) -> Option<&Binding> {
        self.iter()
            .find(|(bound, _)| *bound == name)
            .map(|(_, binding)| binding)
    }

    /// Walks the bindings newest first, shadowed entries included.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Binding)> {
        let mut current = self.head.as_deref();
        std::iter::from_fn(move || {
            let frame = current?;
            current = frame.next.head.as_deref();
            Some((frame.name.as_str(), &frame.binding))
        })
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter().map(|(name, _)| name)).finish()
    }
}
