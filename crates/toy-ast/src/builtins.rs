use crate::sanitize;
use std::fmt::Display;
use stripmargin::StripMargin;
pub use strum::IntoEnumIterator;
use strum::EnumIter;

/// Helpers defined at the top of every translated program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Builtin {
    PrintI64,
    PrintF64,
}

impl Builtin {
    pub fn name(self) -> String {
        sanitize::function_name(match self {
            Builtin::PrintI64 => "printi",
            Builtin::PrintF64 => "printd",
        })
    }

    pub fn param_type(self) -> &'static str {
        match self {
            Builtin::PrintI64 => "long long",
            Builtin::PrintF64 => "double",
        }
    }

    pub(crate) fn definition(self) -> impl Display {
        format!(
            "|void {}({} arg) {{
             |std::cout << arg << std::endl;
             |}}
             |",
            self.name(),
            self.param_type()
        )
        .strip_margin()
    }
}
