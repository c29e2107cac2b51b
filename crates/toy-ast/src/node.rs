use crate::sanitize;
use std::fmt::{self, Display};
use std::str::FromStr;
use strum::{EnumIter, EnumString};

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, PartialOrd, Ord)]
pub struct ExprId(pub(crate) usize);

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, PartialOrd, Ord)]
pub struct StmtId(pub(crate) usize);

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, PartialOrd, Ord)]
pub struct BlockId(pub(crate) usize);

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, PartialOrd, Ord)]
pub struct FunctionId(pub(crate) usize);

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, PartialOrd, Ord)]
pub struct VarDeclId(pub(crate) usize);

impl Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct Ident(String);

impl Ident {
    pub fn new(name: impl Into<String>) -> Self {
        Ident(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, EnumString, EnumIter, strum::Display)]
pub enum ArithOp {
    #[strum(serialize = "+")]
    Add,
    #[strum(serialize = "-")]
    Sub,
    #[strum(serialize = "*")]
    Mult,
    #[strum(serialize = "/")]
    Div,
}

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, EnumString, EnumIter, strum::Display)]
pub enum CompOp {
    #[strum(serialize = "==")]
    Eq,
    #[strum(serialize = "!=")]
    Neq,
    #[strum(serialize = "<=")]
    Le,
    #[strum(serialize = ">=")]
    Ge,
    #[strum(serialize = "<")]
    Lt,
    #[strum(serialize = ">")]
    Gt,
}

/// A fixed table of infix tokens.
pub trait OperatorTable: Display {
    /// Used in the placeholder rendered for a tag outside the table.
    const KIND: &'static str;
}

impl OperatorTable for ArithOp {
    const KIND: &'static str = "binary";
}

impl OperatorTable for CompOp {
    const KIND: &'static str = "comparison";
}

/// An operator tag as handed over by the front end. Tags outside the table are
/// kept so that emission can make them visible.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub enum Operator<T> {
    Known(T),
    Unknown(String),
}

impl<'a, T: FromStr> From<&'a str> for Operator<T> {
    fn from(tag: &'a str) -> Self {
        tag.parse()
            .map_or_else(|_| Operator::Unknown(tag.to_string()), Operator::Known)
    }
}

impl From<ArithOp> for Operator<ArithOp> {
    fn from(op: ArithOp) -> Self {
        Operator::Known(op)
    }
}

impl From<CompOp> for Operator<CompOp> {
    fn from(op: CompOp) -> Self {
        Operator::Known(op)
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum Expr {
    Int(i64),
    Float(f64),
    Bool(bool),
    Ident(Ident),
    Call {
        callee: Ident,
        args: Vec<ExprId>,
    },
    Arith {
        lhs: ExprId,
        op: Operator<ArithOp>,
        rhs: ExprId,
    },
    Compare {
        lhs: ExprId,
        op: Operator<CompOp>,
        rhs: ExprId,
    },
    Assign {
        target: Ident,
        value: ExprId,
    },
    Group(ExprId),
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Stmt {
    Expr(ExprId),
    Block(BlockId),
    VarDecl(VarDeclId),
    Function(FunctionId),
    Return(ExprId),
    Conditional {
        cond: ExprId,
        body: StmtId,
        otherwise: Option<StmtId>,
    },
    While {
        cond: ExprId,
        body: BlockId,
    },
    /// Counts `var` up from `start` while it is below `end`.
    For {
        var: Ident,
        start: ExprId,
        end: ExprId,
        body: BlockId,
    },
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Block {
    pub stmts: Vec<StmtId>,
    pub owner: Option<FunctionId>,
    pub is_outermost: bool,
    pub id: BlockId,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct VarDecl {
    pub ident: Ident,
    pub ty: Ident,
    pub init: Option<ExprId>,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Param {
    pub ident: Ident,
    pub ty: Ident,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct FunctionDecl {
    /// Already sanitized.
    pub ident: Ident,
    pub params: Vec<Param>,
    pub ret: Ident,
    pub body: BlockId,
}

/// Arena owning every node of one program. Nodes refer to each other by id.
#[derive(Debug, Default)]
pub struct Env {
    exprs: Vec<Expr>,
    stmts: Vec<Stmt>,
    blocks: Vec<Block>,
    var_decls: Vec<VarDecl>,
    functions: Vec<FunctionDecl>,
}

impl Env {
    pub fn new() -> Self {
        Self::default()
    }

    fn new_expr(&mut self, e: Expr) -> ExprId {
        self.exprs.push(e);
        ExprId(self.exprs.len() - 1)
    }

    pub fn int(&mut self, value: i64) -> ExprId {
        self.new_expr(Expr::Int(value))
    }

    pub fn float(&mut self, value: f64) -> ExprId {
        self.new_expr(Expr::Float(value))
    }

    pub fn bool(&mut self, value: bool) -> ExprId {
        self.new_expr(Expr::Bool(value))
    }

    pub fn ident(&mut self, name: &str) -> ExprId {
        self.new_expr(Expr::Ident(Ident::new(name)))
    }

    /// The callee name is sanitized here.
    pub fn call(&mut self, callee: &str, args: Vec<ExprId>) -> ExprId {
        let callee = Ident::new(sanitize::function_name(callee));
        self.new_expr(Expr::Call { callee, args })
    }

    pub fn arith(&mut self, lhs: ExprId, op: impl Into<Operator<ArithOp>>, rhs: ExprId) -> ExprId {
        let op = op.into();
        self.new_expr(Expr::Arith { lhs, op, rhs })
    }

    pub fn compare(&mut self, lhs: ExprId, op: impl Into<Operator<CompOp>>, rhs: ExprId) -> ExprId {
        let op = op.into();
        self.new_expr(Expr::Compare { lhs, op, rhs })
    }

    pub fn assign(&mut self, target: &str, value: ExprId) -> ExprId {
        let target = Ident::new(target);
        self.new_expr(Expr::Assign { target, value })
    }

    pub fn group(&mut self, inner: ExprId) -> ExprId {
        self.new_expr(Expr::Group(inner))
    }

    pub fn new_stmt(&mut self, s: Stmt) -> StmtId {
        self.stmts.push(s);
        StmtId(self.stmts.len() - 1)
    }

    pub fn new_block(&mut self) -> BlockId {
        let id = BlockId(self.blocks.len());
        self.blocks.push(Block {
            stmts: Vec::new(),
            owner: None,
            is_outermost: false,
            id,
        });
        id
    }

    /// Appends `stmt` to the end of `block`.
    pub fn push(&mut self, block: BlockId, stmt: StmtId) {
        self.blocks[block.0].stmts.push(stmt);
    }

    pub(crate) fn set_outermost(&mut self, block: BlockId) {
        self.blocks[block.0].is_outermost = true;
    }

    pub fn var_decl(&mut self, ident: &str, ty: &str, init: Option<ExprId>) -> VarDeclId {
        self.var_decls.push(VarDecl {
            ident: Ident::new(ident),
            ty: Ident::new(ty),
            init,
        });
        VarDeclId(self.var_decls.len() - 1)
    }

    /// Attaches the initializer of a declaration built without one.
    pub fn set_initializer(&mut self, decl: VarDeclId, init: ExprId) {
        self.var_decls[decl.0].init = Some(init);
    }

    /// Declares a function and makes it the owner of `body`. The name is
    /// sanitized here; uniqueness is checked by validation.
    pub fn function_decl(
        &mut self,
        name: &str,
        params: Vec<Param>,
        ret: &str,
        body: BlockId,
    ) -> FunctionId {
        let id = FunctionId(self.functions.len());
        self.functions.push(FunctionDecl {
            ident: Ident::new(sanitize::function_name(name)),
            params,
            ret: Ident::new(ret),
            body,
        });
        self.blocks[body.0].owner = Some(id);
        id
    }

    pub fn expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id.0]
    }

    pub fn stmt(&self, id: StmtId) -> &Stmt {
        &self.stmts[id.0]
    }

    pub fn block(&self, id: BlockId) -> &Block {
        &self.blocks[id.0]
    }

    pub fn var(&self, id: VarDeclId) -> &VarDecl {
        &self.var_decls[id.0]
    }

    pub fn function(&self, id: FunctionId) -> &FunctionDecl {
        &self.functions[id.0]
    }
}

impl Param {
    pub fn new(ident: &str, ty: &str) -> Self {
        Param {
            ident: Ident::new(ident),
            ty: Ident::new(ty),
        }
    }
}
