//! Positional argument interpolation for lexicon values.
//!
//! Values reference arguments as `[_1]`, `[_2]`, ... (1-indexed). A
//! placeholder without a matching argument is left as written.

use regex::{Captures, Regex};
use std::borrow::Cow;
use std::sync::OnceLock;

static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();

/// Positional arguments for a lookup.
///
/// Converts from a single scalar or from a sequence of scalars, so callers
/// can write `loc(key, "x")`, `loc(key, vec![a, b])` or `loc(key, ())`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocArgs(Vec<String>);

impl LocArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<()> for LocArgs {
    fn from(_: ()) -> Self {
        LocArgs::new()
    }
}

impl From<&str> for LocArgs {
    fn from(value: &str) -> Self {
        LocArgs(vec![value.to_string()])
    }
}

impl From<String> for LocArgs {
    fn from(value: String) -> Self {
        LocArgs(vec![value])
    }
}

impl From<Vec<String>> for LocArgs {
    fn from(values: Vec<String>) -> Self {
        LocArgs(values)
    }
}

impl From<Vec<&str>> for LocArgs {
    fn from(values: Vec<&str>) -> Self {
        LocArgs(values.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for LocArgs {
    fn from(values: &[&str]) -> Self {
        LocArgs(values.iter().map(|v| v.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for LocArgs {
    fn from(values: [&str; N]) -> Self {
        LocArgs(values.iter().map(|v| v.to_string()).collect())
    }
}

impl From<&[String]> for LocArgs {
    fn from(values: &[String]) -> Self {
        LocArgs(values.to_vec())
    }
}

/// Substitute `[_N]` placeholders with the matching 1-indexed argument.
pub fn interpolate<'a>(template: &'a str, args: &[String]) -> Cow<'a, str> {
    if args.is_empty() {
        return Cow::Borrowed(template);
    }

    let regex = PLACEHOLDER_REGEX.get_or_init(|| Regex::new(r"\[_(\d+)\]").unwrap());

    regex.replace_all(template, |caps: &Captures| {
        caps[1]
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|idx| args.get(idx))
            .cloned()
            .unwrap_or_else(|| caps[0].to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    // ==================== Substitution Tests ====================

    #[test]
    fn test_interpolate_single() {
        assert_eq!(interpolate("Hello [_1]", &args(&["Catalyst"])), "Hello Catalyst");
    }

    #[test]
    fn test_interpolate_multiple_and_reordered() {
        assert_eq!(
            interpolate("[_2] before [_1], [_2] again", &args(&["a", "b"])),
            "b before a, b again"
        );
    }

    #[test]
    fn test_interpolate_out_of_range_left_literal() {
        assert_eq!(interpolate("[_1] and [_3]", &args(&["x"])), "x and [_3]");
    }

    #[test]
    fn test_interpolate_zero_left_literal() {
        assert_eq!(interpolate("[_0]", &args(&["x"])), "[_0]");
    }

    #[test]
    fn test_interpolate_huge_index_left_literal() {
        let template = "[_99999999999999999999999]";
        assert_eq!(interpolate(template, &args(&["x"])), template);
    }

    #[test]
    fn test_interpolate_no_args_borrows() {
        assert!(matches!(interpolate("Hello [_1]", &[]), Cow::Borrowed("Hello [_1]")));
    }

    #[test]
    fn test_interpolate_ignores_other_brackets() {
        assert_eq!(
            interpolate("[quant,_1,file] [_1]", &args(&["3"])),
            "[quant,_1,file] 3"
        );
    }

    #[test]
    fn test_interpolate_argument_not_reexpanded() {
        assert_eq!(interpolate("[_1]", &args(&["[_2]", "x"])), "[_2]");
    }

    // ==================== LocArgs Conversion Tests ====================

    #[test]
    fn test_loc_args_from_scalar() {
        assert_eq!(LocArgs::from("x").as_slice(), ["x"]);
        assert_eq!(LocArgs::from("y".to_string()).as_slice(), ["y"]);
    }

    #[test]
    fn test_loc_args_from_sequence() {
        assert_eq!(LocArgs::from(vec!["a", "b"]).as_slice(), ["a", "b"]);
        assert_eq!(LocArgs::from(["a", "b", "c"]).as_slice(), ["a", "b", "c"]);
    }

    #[test]
    fn test_loc_args_from_unit() {
        assert!(LocArgs::from(()).is_empty());
    }

    proptest! {
        #[test]
        fn prop_text_without_placeholders_unchanged(text in "[a-zA-Z0-9 ,.!?]{0,40}") {
            prop_assert_eq!(interpolate(&text, &args(&["x", "y"])), text.as_str());
        }
    }
}
