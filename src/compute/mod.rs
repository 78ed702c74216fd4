//! Vectorized compute functions invoked by name
//!
//! The relational operators never touch column buffers directly for numeric
//! work; they go through [`call`] with a function name, the same way the engine
//! would dispatch into an external compute runtime. Array-level kernels that are
//! not elementwise (concatenation, casts, sorting, gathering, deduplication)
//! live in [`kernels`].

mod aggregate;
mod arithmetic;
pub mod kernels;

use std::collections::HashMap;
use std::fmt;

use lazy_static::lazy_static;

use crate::column::{Column, Scalar};
use crate::error::{Error, Result};

pub use aggregate::{output_type, reduce, ReduceOp};
pub use arithmetic::BinaryOp;
pub use kernels::{cast, concat, sort_indices, take, unique};

/// Operand or result of a compute function
#[derive(Debug, Clone)]
pub enum Datum {
    Column(Column),
    Scalar(Scalar),
}

impl Datum {
    pub fn is_scalar(&self) -> bool {
        matches!(self, Datum::Scalar(_))
    }

    pub fn into_column(self) -> Option<Column> {
        match self {
            Datum::Column(col) => Some(col),
            Datum::Scalar(_) => None,
        }
    }

    pub fn into_scalar(self) -> Option<Scalar> {
        match self {
            Datum::Scalar(s) => Some(s),
            Datum::Column(_) => None,
        }
    }
}

impl From<Column> for Datum {
    fn from(col: Column) -> Self {
        Datum::Column(col)
    }
}

impl From<Scalar> for Datum {
    fn from(s: Scalar) -> Self {
        Datum::Scalar(s)
    }
}

/// Kernel entry point; receives its own registered name so one kernel can
/// serve a family of functions
pub type KernelFn = fn(&str, &[Datum]) -> Result<Datum>;

#[derive(Clone, Copy)]
struct Function {
    arity: usize,
    kernel: KernelFn,
}

/// 名前付き関数のレジストリ
#[derive(Default)]
pub struct FunctionRegistry {
    functions: HashMap<String, Function>,
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionRegistry")
            .field("functions", &self.names())
            .finish()
    }
}

impl FunctionRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every arithmetic, comparison and reduction function
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for op in BinaryOp::all() {
            registry.register(op.name(), 2, arithmetic::binary_kernel);
        }
        for op in ReduceOp::all() {
            registry.register(op.name(), 1, aggregate::reduce_kernel);
        }
        registry
    }

    /// Registers (or replaces) a function
    pub fn register(&mut self, name: &str, arity: usize, kernel: KernelFn) {
        self.functions
            .insert(name.to_string(), Function { arity, kernel });
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Registered names in lexicographic order
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn call(&self, name: &str, args: &[Datum]) -> Result<Datum> {
        let function = self
            .functions
            .get(name)
            .ok_or_else(|| Error::FunctionNotFound(name.to_string()))?;
        if args.len() != function.arity {
            return Err(Error::compute(
                name,
                format!("expected {} arguments, got {}", function.arity, args.len()),
            ));
        }
        (function.kernel)(name, args)
    }
}

lazy_static! {
    static ref GLOBAL_REGISTRY: FunctionRegistry = FunctionRegistry::with_builtins();
}

/// The process-wide registry of built-in functions
pub fn registry() -> &'static FunctionRegistry {
    &GLOBAL_REGISTRY
}

/// Invokes a built-in function by name
pub fn call(name: &str, args: &[Datum]) -> Result<Datum> {
    GLOBAL_REGISTRY.call(name, args)
}
