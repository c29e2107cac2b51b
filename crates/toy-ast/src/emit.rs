use crate::builtins::Builtin;
use crate::node::{
    BlockId, Env, Expr, ExprId, FunctionId, Operator, OperatorTable, Param, Stmt, StmtId,
    VarDeclId,
};
use crate::sanitize;
use crate::validate::Validated;
use itertools::Itertools;
use std::fmt::{self, Display};
use stripmargin::StripMargin;
use strum::IntoEnumIterator;

impl Display for Validated<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let env = &self.program.env;
        write!(
            f,
            "#include <iostream>\n\n{}",
            Builtin::iter().map(Builtin::definition).format("\n")
        )?;
        Dis(&self.program.root, env).fmt(f)?;
        write!(
            f,
            "{}",
            format!(
                "|int main(int argc, char** argv) {{
                 |{}();
                 |return 0;
                 |}}
                 |",
                sanitize::function_name(sanitize::ENTRY_POINT)
            )
            .strip_margin()
        )
    }
}

struct Dis<'a, T>(&'a T, &'a Env);

impl<'a, T: DisplayWithEnv> Display for Dis<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt_with_env(self.1, f)
    }
}

trait DisplayWithEnv {
    fn fmt_with_env(&self, env: &Env, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

impl<T: OperatorTable> Display for Operator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operator::Known(op) => write!(f, " {op} "),
            Operator::Unknown(tag) => write!(f, " <unknown {} op `{tag}`> ", T::KIND),
        }
    }
}

impl DisplayWithEnv for ExprId {
    fn fmt_with_env(&self, env: &Env, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match env.expr(*self) {
            Expr::Int(a) => write!(f, "{a}"),
            // `{:?}` keeps the fractional part, so `2.0` does not turn into an integer literal.
            Expr::Float(a) => write!(f, "{a:?}"),
            Expr::Bool(a) => write!(f, " {a}"),
            Expr::Ident(i) => write!(f, "{i}"),
            Expr::Call { callee, args } => write!(
                f,
                "{callee}({})",
                args.iter().format_with(", ", |a, f| f(&Dis(a, env)))
            ),
            Expr::Arith { lhs, op, rhs } => {
                write!(f, "{}{op}{}", Dis(lhs, env), Dis(rhs, env))
            }
            Expr::Compare { lhs, op, rhs } => {
                write!(f, "{}{op}{}", Dis(lhs, env), Dis(rhs, env))
            }
            Expr::Assign { target, value } => write!(f, "{target} = {}", Dis(value, env)),
            Expr::Group(e) => write!(f, "({})", Dis(e, env)),
        }
    }
}

impl DisplayWithEnv for StmtId {
    fn fmt_with_env(&self, env: &Env, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match env.stmt(*self) {
            Stmt::Expr(e) => writeln!(f, "{};", Dis(e, env)),
            Stmt::Block(b) => b.fmt_with_env(env, f),
            Stmt::VarDecl(d) => d.fmt_with_env(env, f),
            Stmt::Function(d) => d.fmt_with_env(env, f),
            Stmt::Return(e) => writeln!(f, "return {};", Dis(e, env)),
            Stmt::Conditional {
                cond,
                body,
                otherwise,
            } => {
                write!(f, "\nif ({}){}", Dis(cond, env), Dis(body, env))?;
                if let Some(e) = otherwise {
                    write!(f, "else{}", Dis(e, env))?;
                }
                Ok(())
            }
            Stmt::While { cond, body } => {
                write!(f, "while ({}){}", Dis(cond, env), Dis(body, env))
            }
            Stmt::For {
                var,
                start,
                end,
                body,
            } => write!(
                f,
                "for (long long {var} = {}; {var} < {}; ++{var}){}",
                Dis(start, env),
                Dis(end, env),
                Dis(body, env)
            ),
        }
    }
}

impl DisplayWithEnv for VarDeclId {
    fn fmt_with_env(&self, env: &Env, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = env.var(*self);
        write!(f, "{} {} = ", d.ty, d.ident)?;
        match &d.init {
            Some(init) => writeln!(f, "{};", Dis(init, env)),
            // Rejected by validation.
            None => Err(fmt::Error),
        }
    }
}

impl DisplayWithEnv for FunctionId {
    fn fmt_with_env(&self, env: &Env, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = env.function(*self);
        writeln!(
            f,
            "{} {}({}){}",
            d.ret,
            d.ident,
            d.params.iter().format(", "),
            Dis(&d.body, env)
        )
    }
}

impl Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.ty, self.ident)
    }
}

impl DisplayWithEnv for BlockId {
    fn fmt_with_env(&self, env: &Env, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = env.block(*self);
        writeln!(f)?;
        if !b.is_outermost {
            write!(f, "{{")?;
            if b.owner.is_none() {
                write!(f, " // start: {}", b.id)?;
            }
        }
        writeln!(f)?;
        for s in &b.stmts {
            s.fmt_with_env(env, f)?;
        }
        if !b.is_outermost {
            match b.owner {
                None => write!(f, "}} // end: {}", b.id)?,
                Some(owner) => write!(f, "}} // end: {}", env.function(owner).ident)?,
            }
        }
        writeln!(f)
    }
}
