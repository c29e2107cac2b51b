pub use gen_cpp::gen_cpp;
pub use parser::{Ast, ParseError};
pub use toy_ast::Error;

mod gen_cpp;

pub fn parse(src: &str) -> Result<Ast<'_>, ParseError<'_>> {
    parser::parse(src)
}
