use thiserror::Error;

/// Whole-program invariant violations found before emission.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum Error {
    #[error("redefinition of function `{0}`")]
    DuplicateFunction(String),
    #[error("no `{0}` function definition found")]
    MissingEntryPoint(String),
    #[error("variable `{0}` is declared without an initializer")]
    MissingInitializer(String),
    #[error("function `{0}` must be declared at the top level")]
    NestedFunction(String),
    #[error("float literal `{0}` has no C++ spelling")]
    NonFiniteFloat(String),
    #[error("block {0} appears more than once in the tree")]
    SharedBlock(usize),
}
