//! Core AST definitions for the Calyx expression language.
//!
//! This crate contains the expression tree shared by the parser and the
//! interpreter. It deliberately knows nothing about runtime values,
//! environments or storage cells; those live in `calyx_interpreter`.
//!
//! `Display` renders an expression in the S-expression surface syntax that
//! `calyx_parser` accepts. A printed tree parses back to an equal tree as
//! long as none of its names is a reserved word of that syntax.

use std::fmt;

// --- AST (Abstract Syntax Tree) Nodes ---

/// Represents an expression that can be evaluated to a value.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    // Atoms
    Literal(Literal),
    Name(String),

    // Integer operators
    Arith {
        op: ArithOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Neg(Box<Expr>),

    // Boolean operators. `And` and `Or` short-circuit.
    And {
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Or {
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Not(Box<Expr>),

    // Comparisons
    Eq {
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Lt {
        left: Box<Expr>,
        right: Box<Expr>,
    },

    // Control Flow
    If {
        condition: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Box<Expr>,
    },
    Seq {
        first: Box<Expr>,
        second: Box<Expr>,
    },

    // Bindings
    Let {
        name: String,
        value: Box<Expr>,
        body: Box<Expr>,
    },
    /// `letfun name(param) = body in rest`; `name` is visible inside `body`.
    Letfun {
        name: String,
        param: String,
        body: Box<Expr>,
        rest: Box<Expr>,
    },
    Assign {
        name: String,
        value: Box<Expr>,
    },

    // Operations
    App {
        function: Box<Expr>,
        argument: Box<Expr>,
    },

    // Strings
    Concat {
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Replaces the first occurrence of `target` in `string`.
    Replace {
        string: Box<Expr>,
        target: Box<Expr>,
        replacement: Box<Expr>,
    },
    Length(Box<Expr>),
    Lower(Box<Expr>),

    // I/O
    Show(Box<Expr>),
    Read,
}

/// Represents a literal value in the source code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Literal {
    Int(i64),
    Bool(bool),
    Str(String),
}

/// The four integer operators. Division rounds toward negative infinity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl ArithOp {
    /// The operator as written in source.
    pub fn symbol(self) -> &'static str {
        match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::Div => "/",
        }
    }

    /// Human-readable operation name, used in diagnostics.
    pub fn describe(self) -> &'static str {
        match self {
            ArithOp::Add => "addition",
            ArithOp::Sub => "subtraction",
            ArithOp::Mul => "multiplication",
            ArithOp::Div => "division",
        }
    }
}

// --- Builders ---
//
// Shorthand for building trees by hand, mostly in tests and embedders that
// skip the parser.

impl Expr {
    pub fn int(n: i64) -> Self {
        Expr::Literal(Literal::Int(n))
    }

    pub fn bool(b: bool) -> Self {
        Expr::Literal(Literal::Bool(b))
    }

    pub fn str(s: impl Into<String>) -> Self {
        Expr::Literal(Literal::Str(s.into()))
    }

    pub fn name(name: impl Into<String>) -> Self {
        Expr::Name(name.into())
    }

    pub fn arith(op: ArithOp, left: Expr, right: Expr) -> Self {
        Expr::Arith {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn add(left: Expr, right: Expr) -> Self {
        Expr::arith(ArithOp::Add, left, right)
    }

    pub fn sub(left: Expr, right: Expr) -> Self {
        Expr::arith(ArithOp::Sub, left, right)
    }

    pub fn mul(left: Expr, right: Expr) -> Self {
        Expr::arith(ArithOp::Mul, left, right)
    }

    pub fn div(left: Expr, right: Expr) -> Self {
        Expr::arith(ArithOp::Div, left, right)
    }

    pub fn neg(operand: Expr) -> Self {
        Expr::Neg(Box::new(operand))
    }

    pub fn and(left: Expr, right: Expr) -> Self {
        Expr::And {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn or(left: Expr, right: Expr) -> Self {
        Expr::Or {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn not(operand: Expr) -> Self {
        Expr::Not(Box::new(operand))
    }

    pub fn eq(left: Expr, right: Expr) -> Self {
        Expr::Eq {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn lt(left: Expr, right: Expr) -> Self {
        Expr::Lt {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn cond(condition: Expr, then_branch: Expr, else_branch: Expr) -> Self {
        Expr::If {
            condition: Box::new(condition),
            then_branch: Box::new(then_branch),
            else_branch: Box::new(else_branch),
        }
    }

    pub fn let_in(name: impl Into<String>, value: Expr, body: Expr) -> Self {
        Expr::Let {
            name: name.into(),
            value: Box::new(value),
            body: Box::new(body),
        }
    }

    pub fn letfun(
        name: impl Into<String>,
        param: impl Into<String>,
        body: Expr,
        rest: Expr,
    ) -> Self {
        Expr::Letfun {
            name: name.into(),
            param: param.into(),
            body: Box::new(body),
            rest: Box::new(rest),
        }
    }

    pub fn app(function: Expr, argument: Expr) -> Self {
        Expr::App {
            function: Box::new(function),
            argument: Box::new(argument),
        }
    }

    pub fn concat(left: Expr, right: Expr) -> Self {
        Expr::Concat {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn replace(string: Expr, target: Expr, replacement: Expr) -> Self {
        Expr::Replace {
            string: Box::new(string),
            target: Box::new(target),
            replacement: Box::new(replacement),
        }
    }

    pub fn length(operand: Expr) -> Self {
        Expr::Length(Box::new(operand))
    }

    pub fn lower(operand: Expr) -> Self {
        Expr::Lower(Box::new(operand))
    }

    pub fn seq(first: Expr, second: Expr) -> Self {
        Expr::Seq {
            first: Box::new(first),
            second: Box::new(second),
        }
    }

    pub fn assign(name: impl Into<String>, value: Expr) -> Self {
        Expr::Assign {
            name: name.into(),
            value: Box::new(value),
        }
    }

    pub fn show(operand: Expr) -> Self {
        Expr::Show(Box::new(operand))
    }
}

// --- Printing ---

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(n) => write!(f, "{}", n),
            Literal::Bool(b) => write!(f, "{}", b),
            Literal::Str(s) => {
                f.write_str("\"")?;
                for c in s.chars() {
                    match c {
                        '"' => f.write_str("\\\"")?,
                        '\\' => f.write_str("\\\\")?,
                        '\n' => f.write_str("\\n")?,
                        '\t' => f.write_str("\\t")?,
                        c => write!(f, "{}", c)?,
                    }
                }
                f.write_str("\"")
            }
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(lit) => write!(f, "{}", lit),
            Expr::Name(name) => f.write_str(name),
            Expr::Arith { op, left, right } => write!(f, "({} {} {})", op.symbol(), left, right),
            Expr::Neg(operand) => write!(f, "(- {})", operand),
            Expr::And { left, right } => write!(f, "(and {} {})", left, right),
            Expr::Or { left, right } => write!(f, "(or {} {})", left, right),
            Expr::Not(operand) => write!(f, "(not {})", operand),
            Expr::Eq { left, right } => write!(f, "(= {} {})", left, right),
            Expr::Lt { left, right } => write!(f, "(< {} {})", left, right),
            Expr::If {
                condition,
                then_branch,
                else_branch,
            } => write!(f, "(if {} {} {})", condition, then_branch, else_branch),
            Expr::Seq { first, second } => write!(f, "(begin {} {})", first, second),
            Expr::Let { name, value, body } => write!(f, "(let ({} {}) {})", name, value, body),
            Expr::Letfun {
                name,
                param,
                body,
                rest,
            } => write!(f, "(letfun ({} {}) {} {})", name, param, body, rest),
            Expr::Assign { name, value } => write!(f, "(set! {} {})", name, value),
            Expr::App { function, argument } => write!(f, "({} {})", function, argument),
            Expr::Concat { left, right } => write!(f, "(++ {} {})", left, right),
            Expr::Replace {
                string,
                target,
                replacement,
            } => write!(f, "(replace {} {} {})", string, target, replacement),
            Expr::Length(operand) => write!(f, "(length {})", operand),
            Expr::Lower(operand) => write!(f, "(lower {})", operand),
            Expr::Show(operand) => write!(f, "(show {})", operand),
            Expr::Read => f.write_str("(read)"),
        }
    }
}
