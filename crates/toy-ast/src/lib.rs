mod builtins;
mod emit;
mod error;
mod node;
pub mod sanitize;
mod validate;

pub use crate::builtins::{Builtin, IntoEnumIterator};
pub use crate::error::Error;
pub use crate::node::{
    ArithOp, Block, BlockId, CompOp, Env, Expr, ExprId, FunctionDecl, FunctionId, Ident,
    Operator, OperatorTable, Param, Stmt, StmtId, VarDecl, VarDeclId,
};
pub use crate::validate::Validated;

/// One compilation unit: the node arena plus the block holding the top level
/// of the translated file.
#[derive(Debug)]
pub struct Program {
    env: Env,
    root: BlockId,
}

impl Program {
    pub fn new(mut env: Env, root: BlockId) -> Self {
        env.set_outermost(root);
        Program { env, root }
    }

    pub fn env(&self) -> &Env {
        &self.env
    }

    pub fn root(&self) -> BlockId {
        self.root
    }

    /// Validates, then renders the whole translation unit.
    pub fn render(&self) -> Result<String, Error> {
        Ok(self.validate()?.to_string())
    }
}
