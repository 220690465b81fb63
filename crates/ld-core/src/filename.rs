//! Helpers for turning free text into script filename fragments.

/// Replace spaces, quotes and dots with `_` and collapse runs of `_`.
///
/// Used to embed a user supplied description in a new script's filename.
pub fn str_to_filename(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        let ch = match ch {
            ' ' | '"' | '\'' | '.' => '_',
            other => other,
        };
        if ch == '_' && out.ends_with('_') {
            continue;
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_str_to_filename() {
        assert_eq!(str_to_filename(""), "");
        assert_eq!(str_to_filename("__"), "_");
        assert_eq!(str_to_filename("a"), "a");
        assert_eq!(str_to_filename("Abc Def"), "Abc_Def");
        assert_eq!(str_to_filename("Abc \"D\" Ef"), "Abc_D_Ef");
        assert_eq!(str_to_filename("Abc's Stuff"), "Abc_s_Stuff");
        assert_eq!(str_to_filename("a      b"), "a_b");
        assert_eq!(str_to_filename("a.b to c"), "a_b_to_c");
    }
}
