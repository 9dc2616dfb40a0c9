//! Rule 12: numeric-literal canonicalization.
//!
//! Any literal that parses as a number is re-emitted in its shortest float
//! spelling and marked non-string, so `150`, `150.0` and `'150'` converge.
//! Literals with a leading `0` are left alone to preserve values like
//! `'01'`.

use crate::ast::{Node, Walk};
use crate::rewrite::rule::RewriteRule;
use crate::rewrite::rules::helpers::format_number;
use crate::schema::Schema;

pub struct NumericLiterals;

impl RewriteRule for NumericLiterals {
    fn id(&self) -> u16 {
        12
    }

    fn name(&self) -> &'static str {
        "numeric-literals"
    }

    fn apply(&self, tree: &mut Node, _schema: &mut Schema) -> bool {
        let mut changed = false;
        tree.rewrite(&mut |node| {
            if let Node::Literal { text, is_string } = node {
                if !text.starts_with('0') {
                    if let Ok(value) = text.parse::<f64>() {
                        let canonical = format_number(value);
                        if *text != canonical || *is_string {
                            *text = canonical;
                            *is_string = false;
                            changed = true;
                        }
                    }
                }
            }
            Walk::Continue
        });
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::canon;

    #[test]
    fn integer_and_float_spellings_converge() {
        assert_eq!(
            canon("SELECT id FROM emp WHERE id = 150"),
            canon("SELECT id FROM emp WHERE id = 150.0"),
        );
    }

    #[test]
    fn quoted_numbers_converge_too() {
        assert_eq!(
            canon("SELECT id FROM emp WHERE id = '150'"),
            canon("SELECT id FROM emp WHERE id = 150"),
        );
    }

    #[test]
    fn leading_zero_strings_are_preserved() {
        assert_ne!(
            canon("SELECT id FROM emp WHERE name = '01'"),
            canon("SELECT id FROM emp WHERE name = 1"),
        );
    }
}
