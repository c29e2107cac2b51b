use crate::node::{BlockId, Expr, ExprId, FunctionId, Stmt, StmtId};
use crate::{sanitize, Builtin, Error, IntoEnumIterator, Program};
use rustc_hash::{FxHashMap, FxHashSet};

/// A program whose whole-program invariants hold. Only this can be rendered.
#[derive(Debug, Clone, Copy)]
pub struct Validated<'a> {
    pub(crate) program: &'a Program,
}

struct Checker<'a> {
    program: &'a Program,
    function_names: FxHashMap<&'a str, FunctionId>,
    seen_blocks: FxHashSet<BlockId>,
}

impl Program {
    pub fn validate(&self) -> Result<Validated<'_>, Error> {
        let mut checker = Checker {
            program: self,
            function_names: Default::default(),
            seen_blocks: Default::default(),
        };
        checker.block(self.root, true)?;
        let entry_point = sanitize::function_name(sanitize::ENTRY_POINT);
        if !checker.function_names.contains_key(entry_point.as_str()) {
            return Err(Error::MissingEntryPoint(sanitize::ENTRY_POINT.to_string()));
        }
        log::debug!(
            "validated {} function(s), {} block(s)",
            checker.function_names.len(),
            checker.seen_blocks.len()
        );
        Ok(Validated { program: self })
    }
}

impl<'a> Checker<'a> {
    fn block(&mut self, b: BlockId, top_level: bool) -> Result<(), Error> {
        if !self.seen_blocks.insert(b) {
            return Err(Error::SharedBlock(b.0));
        }
        let program: &'a Program = self.program;
        let env = &program.env;
        for s in &env.block(b).stmts {
            self.stmt(*s, top_level)?;
        }
        Ok(())
    }

    fn stmt(&mut self, s: StmtId, top_level: bool) -> Result<(), Error> {
        let program: &'a Program = self.program;
        let env = &program.env;
        match env.stmt(s) {
            Stmt::Expr(e) | Stmt::Return(e) => self.expr(*e),
            Stmt::Block(b) => self.block(*b, false),
            Stmt::VarDecl(d) => {
                let d = env.var(*d);
                match d.init {
                    Some(init) => self.expr(init),
                    None => Err(Error::MissingInitializer(d.ident.to_string())),
                }
            }
            Stmt::Function(f) => {
                let decl = env.function(*f);
                let name = decl.ident.as_str();
                if !top_level {
                    return Err(Error::NestedFunction(name.to_string()));
                }
                if Builtin::iter().any(|b| b.name() == name)
                    || self.function_names.insert(name, *f).is_some()
                {
                    return Err(Error::DuplicateFunction(name.to_string()));
                }
                self.block(decl.body, false)
            }
            Stmt::Conditional {
                cond,
                body,
                otherwise,
            } => {
                self.expr(*cond)?;
                self.stmt(*body, false)?;
                if let Some(e) = otherwise {
                    self.stmt(*e, false)?;
                }
                Ok(())
            }
            Stmt::While { cond, body } => {
                self.expr(*cond)?;
                self.block(*body, false)
            }
            Stmt::For {
                start, end, body, ..
            } => {
                self.expr(*start)?;
                self.expr(*end)?;
                self.block(*body, false)
            }
        }
    }

    /// C++ has no literal for NaN or infinity.
    fn expr(&mut self, e: ExprId) -> Result<(), Error> {
        let program: &'a Program = self.program;
        match program.env.expr(e) {
            Expr::Float(a) if !a.is_finite() => Err(Error::NonFiniteFloat(format!("{a:?}"))),
            Expr::Int(_) | Expr::Float(_) | Expr::Bool(_) | Expr::Ident(_) => Ok(()),
            Expr::Call { args, .. } => args.iter().try_for_each(|a| self.expr(*a)),
            Expr::Arith { lhs, rhs, .. } | Expr::Compare { lhs, rhs, .. } => {
                self.expr(*lhs)?;
                self.expr(*rhs)
            }
            Expr::Assign { value: e, .. } | Expr::Group(e) => self.expr(*e),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::node::{Env, Stmt};
    use crate::{Error, Program};

    fn function(env: &mut Env, parent: crate::BlockId, name: &str) -> crate::BlockId {
        let body = env.new_block();
        let f = env.function_decl(name, Vec::new(), "int", body);
        let f = env.new_stmt(Stmt::Function(f));
        env.push(parent, f);
        body
    }

    #[test]
    fn entry_point_present() {
        let mut env = Env::new();
        let root = env.new_block();
        function(&mut env, root, "helper");
        function(&mut env, root, "main");
        assert!(Program::new(env, root).validate().is_ok());
    }

    #[test]
    fn entry_point_missing() {
        let mut env = Env::new();
        let root = env.new_block();
        function(&mut env, root, "helper");
        assert_eq!(
            Program::new(env, root).validate().unwrap_err(),
            Error::MissingEntryPoint("main".to_string())
        );
    }

    #[test]
    fn suffixed_name_does_not_count_as_entry_point() {
        let mut env = Env::new();
        let root = env.new_block();
        function(&mut env, root, "main__func__");
        function(&mut env, root, "main");
        assert_eq!(
            Program::new(env, root).validate().unwrap_err(),
            Error::DuplicateFunction("main__func__".to_string())
        );
    }

    #[test]
    fn duplicate_function() {
        let mut env = Env::new();
        let root = env.new_block();
        function(&mut env, root, "main");
        function(&mut env, root, "f");
        function(&mut env, root, "f");
        assert_eq!(
            Program::new(env, root).validate().unwrap_err(),
            Error::DuplicateFunction("f".to_string())
        );
    }

    #[test]
    fn nested_function() {
        let mut env = Env::new();
        let root = env.new_block();
        let body = function(&mut env, root, "main");
        function(&mut env, body, "inner");
        assert_eq!(
            Program::new(env, root).validate().unwrap_err(),
            Error::NestedFunction("inner".to_string())
        );
    }

    #[test]
    fn missing_initializer() {
        let mut env = Env::new();
        let root = env.new_block();
        let body = function(&mut env, root, "main");
        let x = env.var_decl("x", "int", None);
        let x = env.new_stmt(Stmt::VarDecl(x));
        env.push(body, x);
        assert_eq!(
            Program::new(env, root).validate().unwrap_err(),
            Error::MissingInitializer("x".to_string())
        );
    }

    #[test]
    fn shared_block() {
        let mut env = Env::new();
        let root = env.new_block();
        let body = function(&mut env, root, "main");
        let inner = env.new_block();
        let s = env.new_stmt(Stmt::Block(inner));
        env.push(body, s);
        env.push(body, s);
        assert_eq!(
            Program::new(env, root).validate().unwrap_err(),
            Error::SharedBlock(inner.0)
        );
    }

    #[test]
    fn builtin_name_is_taken() {
        let mut env = Env::new();
        let root = env.new_block();
        function(&mut env, root, "main");
        function(&mut env, root, "printd");
        assert_eq!(
            Program::new(env, root).validate().unwrap_err(),
            Error::DuplicateFunction("printd".to_string())
        );
    }

    #[test]
    fn non_finite_float() {
        let mut env = Env::new();
        let root = env.new_block();
        let body = function(&mut env, root, "main");
        let one = env.float(1.0);
        let nan = env.float(f64::NAN);
        let sum = env.arith(one, crate::ArithOp::Add, nan);
        let ret = env.new_stmt(Stmt::Return(sum));
        env.push(body, ret);
        assert_eq!(
            Program::new(env, root).validate().unwrap_err(),
            Error::NonFiniteFloat("NaN".to_string())
        );
    }

    #[test]
    fn infinite_float_in_call_argument() {
        let mut env = Env::new();
        let root = env.new_block();
        let body = function(&mut env, root, "main");
        let inf = env.float(f64::INFINITY);
        let call = env.call("printd", vec![inf]);
        let call = env.new_stmt(Stmt::Expr(call));
        env.push(body, call);
        assert_eq!(
            Program::new(env, root).validate().unwrap_err(),
            Error::NonFiniteFloat("inf".to_string())
        );
    }

    #[test]
    fn programs_are_isolated() {
        for _ in 0..2 {
            let mut env = Env::new();
            let root = env.new_block();
            function(&mut env, root, "main");
            assert!(Program::new(env, root).validate().is_ok());
        }
    }
}
