use ariadne::{sources, Color, Label, Report, ReportKind};
use chumsky::prelude::*;
use chumsky::text::unicode::keyword;
use chumsky::text::Char;
use std::io::Write;

#[derive(Clone, Debug)]
pub struct Ast<'a> {
    pub items: Vec<Item<'a>>,
}

#[derive(Clone, Debug)]
pub enum Item<'a> {
    Function(FunctionDecl<'a>),
    Variable(VariableDecl<'a>),
}

#[derive(Clone, Debug)]
pub struct FunctionDecl<'a> {
    pub name: &'a str,
    pub params: Vec<Param<'a>>,
    pub ret: &'a str,
    pub body: Vec<Stmt<'a>>,
}

#[derive(Clone, Debug)]
pub struct Param<'a> {
    pub name: &'a str,
    pub ty: &'a str,
}

#[derive(Clone, Debug)]
pub struct VariableDecl<'a> {
    pub name: &'a str,
    pub ty: &'a str,
    pub init: Expr<'a>,
}

#[derive(Clone, Debug)]
pub enum Stmt<'a> {
    Let(VariableDecl<'a>),
    Return(Expr<'a>),
    If {
        cond: Expr<'a>,
        body: Vec<Stmt<'a>>,
        /// Either another `If` or a `Block`.
        otherwise: Option<Box<Stmt<'a>>>,
    },
    While {
        cond: Expr<'a>,
        body: Vec<Stmt<'a>>,
    },
    For {
        var: &'a str,
        start: Expr<'a>,
        end: Expr<'a>,
        body: Vec<Stmt<'a>>,
    },
    Block(Vec<Stmt<'a>>),
    Expr(Expr<'a>),
}

#[derive(Clone, Debug)]
pub enum Expr<'a> {
    Int(i64),
    Float(f64),
    Bool(bool),
    Ident(&'a str),
    Call {
        callee: &'a str,
        args: Vec<Expr<'a>>,
    },
    Arith {
        op: &'a str,
        lhs: Box<Expr<'a>>,
        rhs: Box<Expr<'a>>,
    },
    Compare {
        op: &'a str,
        lhs: Box<Expr<'a>>,
        rhs: Box<Expr<'a>>,
    },
    Assign {
        target: &'a str,
        value: Box<Expr<'a>>,
    },
    Paren(Box<Expr<'a>>),
}

type Extra<'a> = extra::Err<Rich<'a, char>>;

fn whitespace<'a>() -> impl Parser<'a, &'a str, (), Extra<'a>> + Clone {
    let comment = just("//")
        .then(any().and_is(just('\n').not()).repeated())
        .ignored();
    any()
        .filter(|c: &char| c.is_whitespace())
        .ignored()
        .or(comment)
        .repeated()
}

fn sym<'a>(s: &'a str) -> impl Parser<'a, &'a str, &'a str, Extra<'a>> + Clone {
    just(s).padded_by(whitespace())
}

fn kw<'a>(k: &'static str) -> impl Parser<'a, &'a str, (), Extra<'a>> + Clone {
    keyword(k).ignored().padded_by(whitespace())
}

fn ident<'a>() -> impl Parser<'a, &'a str, &'a str, Extra<'a>> + Clone {
    any()
        .filter(|c: &char| c.is_ident_start() || *c == '_')
        .then(any().filter(|c: &char| c.is_ident_continue()).repeated())
        .to_slice()
        .filter(|s| {
            ![
                "fn", "let", "return", "if", "else", "while", "for", "in", "true", "false",
            ]
            .contains(s)
        })
        .padded_by(whitespace())
}

fn expr<'a>() -> impl Parser<'a, &'a str, Expr<'a>, Extra<'a>> + Clone {
    recursive(|expr| {
        let int = just('-')
            .or_not()
            .then(text::int(10))
            .to_slice()
            .validate(|digits: &str, e, emitter: &mut chumsky::input::Emitter<_>| {
                digits.parse::<i64>().unwrap_or_else(|_| {
                    emitter.emit(Rich::custom(e.span(), "integer literal out of range"));
                    0
                })
            });
        let float = just('-')
            .or_not()
            .then(text::int(10))
            .then(just('.'))
            .then(text::digits(10))
            .to_slice()
            .validate(|digits: &str, e, emitter: &mut chumsky::input::Emitter<_>| {
                digits.parse::<f64>().unwrap_or_else(|_| {
                    emitter.emit(Rich::custom(e.span(), "invalid float literal"));
                    0.0
                })
            });
        let args = expr
            .clone()
            .separated_by(sym(","))
            .allow_trailing()
            .collect::<Vec<_>>()
            .delimited_by(sym("("), sym(")"));
        let atom = choice((
            float.map(Expr::Float),
            int.map(Expr::Int),
            kw("true").to(Expr::Bool(true)),
            kw("false").to(Expr::Bool(false)),
            ident()
                .then(args)
                .map(|(callee, args)| Expr::Call { callee, args }),
            ident().map(Expr::Ident),
            expr.clone()
                .delimited_by(sym("("), sym(")"))
                .map(|e| Expr::Paren(Box::new(e))),
        ))
        .padded_by(whitespace());
        let product = atom.clone().foldl(
            choice((sym("*"), sym("/"))).then(atom).repeated(),
            |lhs, (op, rhs)| Expr::Arith {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            },
        );
        let sum = product.clone().foldl(
            choice((sym("+"), sym("-"))).then(product).repeated(),
            |lhs, (op, rhs)| Expr::Arith {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            },
        );
        let comparison_op = choice((
            sym("=="),
            sym("!="),
            sym("<="),
            sym(">="),
            sym("<"),
            sym(">"),
        ));
        let comparison = sum
            .clone()
            .then(comparison_op.then(sum).or_not())
            .map(|(lhs, rhs)| match rhs {
                Some((op, rhs)) => Expr::Compare {
                    op,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
                None => lhs,
            });
        let assign = ident()
            .then_ignore(sym("="))
            .then(expr)
            .map(|(target, value)| Expr::Assign {
                target,
                value: Box::new(value),
            });
        choice((assign, comparison))
    })
}

fn variable_decl<'a>() -> impl Parser<'a, &'a str, VariableDecl<'a>, Extra<'a>> + Clone {
    kw("let")
        .ignore_then(ident())
        .then_ignore(sym(":"))
        .then(ident())
        .then_ignore(sym("="))
        .then(expr())
        .then_ignore(sym(";"))
        .map(|((name, ty), init)| VariableDecl { name, ty, init })
}

fn block<'a>() -> impl Parser<'a, &'a str, Vec<Stmt<'a>>, Extra<'a>> + Clone {
    stmt()
        .repeated()
        .collect::<Vec<_>>()
        .delimited_by(sym("{"), sym("}"))
}

fn stmt<'a>() -> impl Parser<'a, &'a str, Stmt<'a>, Extra<'a>> + Clone {
    recursive(|stmt| {
        let block = stmt
            .repeated()
            .collect::<Vec<_>>()
            .delimited_by(sym("{"), sym("}"));
        let if_stmt = recursive(|if_stmt| {
            kw("if")
                .ignore_then(expr())
                .then(block.clone())
                .then(
                    kw("else")
                        .ignore_then(choice((if_stmt, block.clone().map(Stmt::Block))))
                        .or_not(),
                )
                .map(|((cond, body), otherwise)| Stmt::If {
                    cond,
                    body,
                    otherwise: otherwise.map(Box::new),
                })
        });
        let while_stmt = kw("while")
            .ignore_then(expr())
            .then(block.clone())
            .map(|(cond, body)| Stmt::While { cond, body });
        let for_stmt = kw("for")
            .ignore_then(ident())
            .then_ignore(kw("in"))
            .then(expr())
            .then_ignore(sym(".."))
            .then(expr())
            .then(block.clone())
            .map(|(((var, start), end), body)| Stmt::For {
                var,
                start,
                end,
                body,
            });
        let return_stmt = kw("return")
            .ignore_then(expr())
            .then_ignore(sym(";"))
            .map(Stmt::Return);
        choice((
            variable_decl().map(Stmt::Let),
            return_stmt,
            if_stmt,
            while_stmt,
            for_stmt,
            block.map(Stmt::Block),
            expr().then_ignore(sym(";")).map(Stmt::Expr),
        ))
    })
}

fn parser<'a>() -> impl Parser<'a, &'a str, Vec<Item<'a>>, Extra<'a>> {
    let param = ident()
        .then_ignore(sym(":"))
        .then(ident())
        .map(|(name, ty)| Param { name, ty });
    let function = kw("fn")
        .ignore_then(ident())
        .then(
            param
                .separated_by(sym(","))
                .allow_trailing()
                .collect::<Vec<_>>()
                .delimited_by(sym("("), sym(")")),
        )
        .then_ignore(sym("->"))
        .then(ident())
        .then(block())
        .map(|(((name, params), ret), body)| FunctionDecl {
            name,
            params,
            ret,
            body,
        });
    choice((
        function.map(Item::Function),
        variable_decl().map(Item::Variable),
    ))
    .repeated()
    .collect()
    .padded_by(whitespace())
    .then_ignore(end())
}

pub fn parse(src: &str) -> Result<Ast<'_>, ParseError<'_>> {
    match parser().parse(src).into_result() {
        Ok(items) => Ok(Ast { items }),
        Err(es) => Err(ParseError { es }),
    }
}

pub struct ParseError<'a> {
    es: Vec<Rich<'a, char>>,
}

impl<'a> ParseError<'a> {
    pub fn write(&self, mut w: impl Write, file_name: &str, src: &str) -> std::io::Result<()> {
        for e in &self.es {
            Report::build(ReportKind::Error, file_name, e.span().start)
                .with_message(e.to_string())
                .with_label(
                    Label::new((file_name.to_string(), e.span().into_range()))
                        .with_message(e.reason().to_string())
                        .with_color(Color::Red),
                )
                .finish()
                .write(sources([(file_name.to_string(), src)]), &mut w)?
        }
        Ok(())
    }
}

impl std::fmt::Debug for ParseError<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.es.iter().map(|e| e.to_string()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn main_body(src: &str) -> Vec<Stmt<'_>> {
        let ast = parse(src).unwrap();
        match ast.items.into_iter().next() {
            Some(Item::Function(f)) => f.body,
            other => panic!("expected a function, got {other:?}"),
        }
    }

    #[test]
    fn function_with_params() {
        let ast = parse("fn add(a: int, b: double) -> double { return a + b; }").unwrap();
        let Item::Function(f) = &ast.items[0] else {
            panic!()
        };
        assert_eq!(f.name, "add");
        assert_eq!(f.ret, "double");
        assert_eq!(f.params.len(), 2);
        assert_eq!((f.params[1].name, f.params[1].ty), ("b", "double"));
        assert!(matches!(
            &f.body[0],
            Stmt::Return(Expr::Arith { op: "+", .. })
        ));
    }

    #[test]
    fn precedence() {
        let body = main_body("fn main() -> int { return 1 + 2 * 3 < 7; }");
        let Stmt::Return(Expr::Compare { op: "<", lhs, .. }) = &body[0] else {
            panic!("{body:?}")
        };
        let Expr::Arith { op: "+", rhs, .. } = lhs.as_ref() else {
            panic!("{lhs:?}")
        };
        assert!(matches!(rhs.as_ref(), Expr::Arith { op: "*", .. }));
    }

    #[test]
    fn literals() {
        let body = main_body("fn main() -> int { f(1, -2, 0.5, true, false); }");
        let Stmt::Expr(Expr::Call { callee: "f", args }) = &body[0] else {
            panic!("{body:?}")
        };
        assert!(matches!(args[0], Expr::Int(1)));
        assert!(matches!(args[1], Expr::Int(-2)));
        assert!(matches!(args[2], Expr::Float(x) if x == 0.5));
        assert!(matches!(args[3], Expr::Bool(true)));
        assert!(matches!(args[4], Expr::Bool(false)));
    }

    #[test]
    fn assignment_and_equality() {
        let body = main_body("fn main() -> int { x = x == 1; }");
        let Stmt::Expr(Expr::Assign { target: "x", value }) = &body[0] else {
            panic!("{body:?}")
        };
        assert!(matches!(value.as_ref(), Expr::Compare { op: "==", .. }));
    }

    #[test]
    fn control_flow() {
        let body = main_body(
            "fn main() -> int {
                // counting
                for i in 0..5 { printi(i); }
                while x < 3 { x = x + 1; }
                if a { } else if b { } else { }
                { let y: int = 2; }
            }",
        );
        assert!(matches!(&body[0], Stmt::For { var: "i", .. }));
        assert!(matches!(&body[1], Stmt::While { .. }));
        let Stmt::If { otherwise, .. } = &body[2] else {
            panic!("{body:?}")
        };
        let Some(Stmt::If { otherwise, .. }) = otherwise.as_deref() else {
            panic!("{otherwise:?}")
        };
        assert!(matches!(otherwise.as_deref(), Some(Stmt::Block(_))));
        assert!(matches!(&body[3], Stmt::Block(b) if b.len() == 1));
    }

    #[test]
    fn top_level_variable() {
        let ast = parse("let limit: int = 10;\nfn main() -> int { return limit; }").unwrap();
        assert!(matches!(
            &ast.items[0],
            Item::Variable(VariableDecl {
                name: "limit",
                ty: "int",
                init: Expr::Int(10)
            })
        ));
    }

    #[test]
    fn keyword_is_not_identifier() {
        assert!(parse("fn main() -> int { let if: int = 1; }").is_err());
    }

    #[test]
    fn integer_out_of_range() {
        assert!(parse("fn main() -> int { return 99999999999999999999; }").is_err());
    }

    #[test]
    fn report() {
        let src = "fn main() -> int { return 1 }";
        let e = parse(src).unwrap_err();
        let mut out = Vec::new();
        e.write(&mut out, "bad.toy", src).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("bad.toy"));
    }
}
