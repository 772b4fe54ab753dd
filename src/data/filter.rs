use std::cmp::Reverse;
use std::collections::BTreeSet;

use super::model::{ClassId, Roster, Status};

// ---------------------------------------------------------------------------
// Views: ordered roster indices
// ---------------------------------------------------------------------------

/// A derived, read-only subsequence of the roster, stored as indices into
/// [`Roster::records`]. Indices are only valid until the next mutation.
pub type View = Vec<usize>;

/// Every record, in roster order.
pub fn full_view(roster: &Roster) -> View {
    (0..roster.len()).collect()
}

/// Records whose name contains `term`, ignoring case. An empty term keeps
/// everything.
pub fn search(roster: &Roster, term: &str) -> View {
    let needle = term.to_lowercase();
    roster
        .records()
        .iter()
        .enumerate()
        .filter(|(_, r)| needle.is_empty() || r.name.to_lowercase().contains(&needle))
        .map(|(i, _)| i)
        .collect()
}

/// Narrow `view` to records scoring at least `min_score`.
pub fn filter_by_min_score(roster: &Roster, view: &[usize], min_score: u8) -> View {
    view.iter()
        .copied()
        .filter(|&i| roster.records()[i].score.get() >= min_score)
        .collect()
}

/// Records of one class from `view`, highest score first. Equal scores keep
/// their view order.
pub fn group_by_class(roster: &Roster, view: &[usize], class_id: ClassId) -> View {
    let records = roster.records();
    let mut out: View = view
        .iter()
        .copied()
        .filter(|&i| records[i].class_id == class_id)
        .collect();
    out.sort_by_key(|&i| Reverse(records[i].score));
    out
}

/// The whole roster ordered by class ascending, then score descending.
/// Ties keep insertion order.
pub fn sort_all(roster: &Roster) -> View {
    let records = roster.records();
    let mut out = full_view(roster);
    out.sort_by_key(|&i| (records[i].class_id, Reverse(records[i].score)));
    out
}

/// Failing students in roster order.
pub fn failing(roster: &Roster) -> View {
    roster
        .records()
        .iter()
        .enumerate()
        .filter(|(_, r)| r.status() == Status::Fail)
        .map(|(i, _)| i)
        .collect()
}

/// The `n` best scores of the roster; among equal scores the earlier
/// record wins.
pub fn top_scorers(roster: &Roster, n: usize) -> View {
    let records = roster.records();
    let mut out = full_view(roster);
    out.sort_by_key(|&i| Reverse(records[i].score));
    out.truncate(n);
    out
}

/// Distinct classes present in `view`, ascending.
pub fn class_options(roster: &Roster, view: &[usize]) -> Vec<ClassId> {
    view.iter()
        .map(|&i| roster.records()[i].class_id)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(roster: &Roster, view: &[usize]) -> Vec<String> {
        view.iter().map(|&i| roster.records()[i].name.clone()).collect()
    }

    #[test]
    fn empty_term_returns_full_roster() {
        let roster = Roster::seeded();
        assert_eq!(search(&roster, ""), full_view(&roster));
    }

    #[test]
    fn search_matches_substring() {
        let roster = Roster::seeded();
        assert_eq!(names(&roster, &search(&roster, "三")), vec!["张三"]);
        assert!(search(&roster, "不存在").is_empty());
    }

    #[test]
    fn search_ignores_case_and_keeps_order() {
        let mut roster = Roster::default();
        roster.add("Alice", 1, 70).unwrap();
        roster.add("bob", 2, 50).unwrap();
        roster.add("ALINA", 3, 90).unwrap();
        let view = search(&roster, "al");
        assert_eq!(names(&roster, &view), vec!["Alice", "ALINA"]);
        assert!(view.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn min_score_composes_with_search() {
        let roster = Roster::seeded();
        let view = filter_by_min_score(&roster, &full_view(&roster), 80);
        assert_eq!(names(&roster, &view), vec!["丁一", "王五", "赵六", "周八"]);

        let view = filter_by_min_score(&roster, &search(&roster, "三"), 80);
        assert!(view.is_empty());
    }

    #[test]
    fn group_by_class_sorts_score_descending() {
        let roster = Roster::seeded();
        let class_one = ClassId::new(1).unwrap();
        let view = group_by_class(&roster, &full_view(&roster), class_one);
        assert_eq!(names(&roster, &view), vec!["周八", "丁一", "孙七"]);
    }

    #[test]
    fn sort_all_is_stable_on_ties() {
        let mut roster = Roster::default();
        roster.add("a", 2, 70).unwrap();
        roster.add("b", 1, 70).unwrap();
        roster.add("c", 2, 70).unwrap();
        roster.add("d", 1, 90).unwrap();
        roster.add("e", 2, 80).unwrap();
        let view = sort_all(&roster);
        assert_eq!(names(&roster, &view), vec!["d", "b", "e", "a", "c"]);
    }

    #[test]
    fn sort_all_orders_seed_by_class_then_score() {
        let roster = Roster::seeded();
        let view = sort_all(&roster);
        assert_eq!(
            names(&roster, &view),
            vec!["周八", "丁一", "孙七", "赵六", "刘二", "吴九", "郑十", "王五", "张三", "李四"]
        );
    }

    #[test]
    fn failing_and_top_scorer() {
        let roster = Roster::seeded();
        assert_eq!(names(&roster, &failing(&roster)), vec!["李四", "郑十"]);
        assert_eq!(names(&roster, &top_scorers(&roster, 1)), vec!["王五"]);
        assert!(top_scorers(&Roster::default(), 1).is_empty());
    }

    #[test]
    fn top_scorer_tie_prefers_first() {
        let mut roster = Roster::default();
        roster.add("先", 1, 95).unwrap();
        roster.add("后", 2, 95).unwrap();
        assert_eq!(names(&roster, &top_scorers(&roster, 1)), vec!["先"]);
    }

    #[test]
    fn class_options_are_sorted_and_distinct() {
        let roster = Roster::seeded();
        let opts: Vec<u8> = class_options(&roster, &full_view(&roster))
            .into_iter()
            .map(ClassId::get)
            .collect();
        assert_eq!(opts, vec![1, 2, 3]);
    }
}
