use std::cmp::Ordering;

/// Natural, case-insensitive name ordering. Names that differ only by case
/// put the lowercase spelling first (`a` < `A` < `b` < `B`).
pub fn compare_names(a: &str, b: &str) -> Ordering {
    natord::compare_ignore_case(a, b).then_with(|| natord::compare(b, a))
}
