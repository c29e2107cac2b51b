//! Function identifiers that would clash with names the generated C++ needs
//! for itself get a fixed suffix.

/// The user function invoked by the synthetic C++ `main`, before sanitization.
pub const ENTRY_POINT: &str = "main";

const SUFFIX: &str = "__func__";

/// Not idempotent: apply exactly once per declaration or call site.
pub fn function_name(name: &str) -> String {
    if is_reserved(name) {
        [name, SUFFIX].concat()
    } else {
        name.to_string()
    }
}

fn is_reserved(name: &str) -> bool {
    name == ENTRY_POINT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_point_gets_suffix() {
        assert_eq!(function_name("main"), "main__func__");
    }

    #[test]
    fn other_names_unchanged() {
        assert_eq!(function_name("fib"), "fib");
        assert_eq!(function_name("main2"), "main2");
        assert_eq!(function_name("printi"), "printi");
    }

    #[test]
    fn suffixed_name_is_not_reserved() {
        let once = function_name("main");
        assert_eq!(function_name(&once), once);
    }
}
