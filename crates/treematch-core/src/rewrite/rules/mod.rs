//! Rewrite rule implementations and registry.
//!
//! Canonicalization rules (100–108) run before the semantic rules
//! (1–25) on every pass; the registry order below is the application
//! order inside the driver's fixed-point loop. Set-operation rules (21, 3,
//! 5) and CTE inlining (26) are driver passes, not registry entries.

pub(crate) mod helpers;

pub mod r001;
pub mod r002;
pub mod r004;
pub mod r006;
pub mod r007;
pub mod r008;
pub mod r009;
pub mod r010;
pub mod r011;
pub mod r012;
pub mod r013;
pub mod r014;
pub mod r015;
pub mod r016;
pub mod r017;
pub mod r018;
pub mod r019;
pub mod r020;
pub mod r022;
pub mod r023;
pub mod r024;
pub mod r025;
pub mod r100;
pub mod r101;
pub mod r102;
pub mod r103;
pub mod r104;
pub mod r105;
pub mod r106;
pub mod r107;
pub mod r108;

use super::rule::RewriteRule;

/// All fixed-point-loop rules, in application order.
pub fn loop_rules() -> Vec<Box<dyn RewriteRule>> {
    vec![
        Box::new(r100::LowercaseIdentifiers),
        Box::new(r101::QualifyColumns),
        Box::new(r102::SortProjection),
        Box::new(r103::InlineTableAliases),
        Box::new(r104::SortJoins),
        Box::new(r105::SortCommutative),
        Box::new(r106::RemoveAliases),
        Box::new(r107::UnwrapParens),
        Box::new(r108::UnquoteIdentifiers),
        Box::new(r001::MinMaxAsOrderLimit),
        Box::new(r002::DropRedundantDistinct),
        Box::new(r004::GroupByUniqueColumn),
        Box::new(r006::CountNonNullColumn),
        Box::new(r007::DropNotNullCheck),
        Box::new(r008::SumOverCountAsAvg),
        Box::new(r009::CountCaseAsSumCase),
        Box::new(r010::OrderLimitAsMinMax),
        Box::new(r011::ExpandStar),
        Box::new(r012::NumericLiterals),
        Box::new(r013::InSubqueryAsJoin),
        Box::new(r014::EliminateKeyJoin),
        Box::new(r015::MergeSubstringPrefix),
        Box::new(r016::LikePrefixAsSubstring),
        Box::new(r017::OrderByJulianday),
        Box::new(r018::InListAsDisjunction),
        Box::new(r019::PropagateJoinEquality),
        Box::new(r020::UnwrapSelfInSubquery),
        Box::new(r022::BetweenAsRange),
        Box::new(r023::PushNotIntoComparison),
        Box::new(r024::IfAsCase),
        Box::new(r025::LeftJoinNullAsNotIn),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_order_is_canonical_then_semantic() {
        let ids: Vec<u16> = loop_rules().iter().map(|rule| rule.id()).collect();
        let canonical: Vec<u16> = ids.iter().copied().filter(|id| *id >= 100).collect();
        let semantic: Vec<u16> = ids.iter().copied().filter(|id| *id < 100).collect();
        assert_eq!(canonical, (100..=108).collect::<Vec<u16>>());
        let mut sorted = semantic.clone();
        sorted.sort_unstable();
        assert_eq!(semantic, sorted);
        assert_eq!(ids.len(), canonical.len() + semantic.len());
        assert!(ids[..canonical.len()].iter().all(|id| *id >= 100));
    }

    #[test]
    fn rule_names_are_unique() {
        let mut names: Vec<&str> = loop_rules().iter().map(|rule| rule.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), loop_rules().len());
    }
}
