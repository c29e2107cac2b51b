use easy_ext::ext;
use parser::{Ast, Expr, FunctionDecl, Item, Stmt, VariableDecl};
use toy_ast::{BlockId, Env, ExprId, FunctionId, Ident, Param, Program, StmtId, VarDeclId};

#[ext(EnvExt)]
impl Env {
    fn lower_expr(&mut self, e: Expr<'_>) -> ExprId {
        match e {
            Expr::Int(a) => self.int(a),
            Expr::Float(a) => self.float(a),
            Expr::Bool(a) => self.bool(a),
            Expr::Ident(name) => self.ident(name),
            Expr::Call { callee, args } => {
                let args = args.into_iter().map(|a| self.lower_expr(a)).collect();
                self.call(callee, args)
            }
            Expr::Arith { op, lhs, rhs } => {
                let lhs = self.lower_expr(*lhs);
                let rhs = self.lower_expr(*rhs);
                self.arith(lhs, op, rhs)
            }
            Expr::Compare { op, lhs, rhs } => {
                let lhs = self.lower_expr(*lhs);
                let rhs = self.lower_expr(*rhs);
                self.compare(lhs, op, rhs)
            }
            Expr::Assign { target, value } => {
                let value = self.lower_expr(*value);
                self.assign(target, value)
            }
            Expr::Paren(e) => {
                let e = self.lower_expr(*e);
                self.group(e)
            }
        }
    }

    fn lower_stmt(&mut self, s: Stmt<'_>) -> StmtId {
        let s = match s {
            Stmt::Let(d) => toy_ast::Stmt::VarDecl(self.lower_variable(d)),
            Stmt::Return(e) => toy_ast::Stmt::Return(self.lower_expr(e)),
            Stmt::If {
                cond,
                body,
                otherwise,
            } => {
                let cond = self.lower_expr(cond);
                let body = self.lower_block(body);
                let body = self.new_stmt(toy_ast::Stmt::Block(body));
                let otherwise = otherwise.map(|s| self.lower_stmt(*s));
                toy_ast::Stmt::Conditional {
                    cond,
                    body,
                    otherwise,
                }
            }
            Stmt::While { cond, body } => toy_ast::Stmt::While {
                cond: self.lower_expr(cond),
                body: self.lower_block(body),
            },
            Stmt::For {
                var,
                start,
                end,
                body,
            } => toy_ast::Stmt::For {
                var: Ident::new(var),
                start: self.lower_expr(start),
                end: self.lower_expr(end),
                body: self.lower_block(body),
            },
            Stmt::Block(b) => toy_ast::Stmt::Block(self.lower_block(b)),
            Stmt::Expr(e) => toy_ast::Stmt::Expr(self.lower_expr(e)),
        };
        self.new_stmt(s)
    }

    fn lower_block(&mut self, stmts: Vec<Stmt<'_>>) -> BlockId {
        let block = self.new_block();
        for s in stmts {
            let s = self.lower_stmt(s);
            self.push(block, s);
        }
        block
    }

    /// The initializer is attached after the declaration, the way a
    /// bottom-up parser reduces `let` before its right-hand side is wired in.
    fn lower_variable(&mut self, d: VariableDecl<'_>) -> VarDeclId {
        let decl = self.var_decl(d.name, d.ty, None);
        let init = self.lower_expr(d.init);
        self.set_initializer(decl, init);
        decl
    }

    fn lower_function(&mut self, f: FunctionDecl<'_>) -> FunctionId {
        let params = f.params.iter().map(|p| Param::new(p.name, p.ty)).collect();
        let body = self.lower_block(f.body);
        self.function_decl(f.name, params, f.ret, body)
    }
}

fn build(ast: Ast<'_>) -> Program {
    let mut env = Env::new();
    let root = env.new_block();
    for item in ast.items {
        let s = match item {
            Item::Function(f) => toy_ast::Stmt::Function(env.lower_function(f)),
            Item::Variable(d) => toy_ast::Stmt::VarDecl(env.lower_variable(d)),
        };
        let s = env.new_stmt(s);
        env.push(root, s);
    }
    Program::new(env, root)
}

pub fn gen_cpp(ast: Ast<'_>) -> Result<String, toy_ast::Error> {
    let program = build(ast);
    log::debug!(
        "lowered {} top-level item(s)",
        program.env().block(program.root()).stmts.len()
    );
    program.render()
}
