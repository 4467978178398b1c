//! Property tests for the evaluation algebra and tree summaries

use crate::common::*;
use businessprocess::services::combine;
use businessprocess::{Observation, Operator, SeverityRank, StateName, StatusCode};
use proptest::prelude::*;

fn ranks_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(0u8..=SeverityRank::MAX, 1..12)
}

fn codes(ranks: &[u8]) -> Vec<StatusCode> {
    ranks
        .iter()
        .map(|rank| StatusCode::new(SeverityRank::new(*rank).unwrap(), false, false))
        .collect()
}

fn rank_of(operator: Operator, ranks: &[u8]) -> u8 {
    combine(operator, &codes(ranks)).unwrap().rank().value()
}

proptest! {
    #[test]
    fn and_is_max_or_is_min(ranks in ranks_strategy()) {
        prop_assert_eq!(rank_of(Operator::And, &ranks), *ranks.iter().max().unwrap());
        prop_assert_eq!(rank_of(Operator::Or, &ranks), *ranks.iter().min().unwrap());
    }

    #[test]
    fn not_inverts_max(ranks in ranks_strategy()) {
        let max = SeverityRank::new(*ranks.iter().max().unwrap()).unwrap();
        prop_assert_eq!(rank_of(Operator::Not, &ranks), max.invert().value());
    }

    #[test]
    fn min_of_is_kth_smallest(ranks in ranks_strategy(), pick in any::<prop::sample::Index>()) {
        let k = pick.index(ranks.len()) + 1;
        let mut sorted = ranks.clone();
        sorted.sort_unstable();
        let operator = Operator::min_of(k as u32).unwrap();
        prop_assert_eq!(rank_of(operator, &ranks), sorted[k - 1]);
    }

    #[test]
    fn min_of_bounds_match_or_and(ranks in ranks_strategy()) {
        let first = Operator::min_of(1).unwrap();
        let last = Operator::min_of(ranks.len() as u32).unwrap();
        prop_assert_eq!(rank_of(first, &ranks), rank_of(Operator::Or, &ranks));
        prop_assert_eq!(rank_of(last, &ranks), rank_of(Operator::And, &ranks));
    }

    #[test]
    fn min_of_above_count_has_no_result(ranks in ranks_strategy()) {
        let operator = Operator::min_of(ranks.len() as u32 + 1).unwrap();
        prop_assert!(combine(operator, &codes(&ranks)).is_none());
    }

    #[test]
    fn tree_evaluation_matches_combine(ranks in ranks_strategy(), symbol in prop::sample::select(vec!["&", "|", "!"])) {
        let mut factory = TreeFactory::new("prop");
        let children = factory.services_with_ranks(&ranks);
        let root = factory.process("root", symbol, &children);
        let tree = factory.finish();

        let operator: Operator = symbol.parse().unwrap();
        let status = tree.process(&root).unwrap().status(&tree).unwrap();
        prop_assert_eq!(status.rank().value(), rank_of(operator, &ranks));
    }

    #[test]
    fn census_is_additive(left in ranks_strategy(), right in ranks_strategy()) {
        let mut factory = TreeFactory::new("census");
        let left_children = factory.services_with_ranks(&left);
        let right_children = factory.services_with_ranks(&right);
        let left_node = factory.process("left", "&", &left_children);
        let right_node = factory.process("right", "|", &right_children);
        let root = factory.process("root", "&", &[left_node.clone(), right_node.clone()]);
        let tree = factory.finish();

        let census = |name: &str| tree.process(name).unwrap().state_census(&tree).unwrap();
        let mut expected = census(left_node.as_str());
        expected += &census(right_node.as_str());
        let actual = census(root.as_str());

        prop_assert_eq!(actual.total() as usize, left.len() + right.len());
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn missing_iff_every_leaf_missing(flags in prop::collection::vec(any::<bool>(), 1..10)) {
        let mut factory = TreeFactory::new("missing");
        let children: Vec<String> = flags
            .iter()
            .map(|missing| {
                if *missing {
                    factory.service_with(Observation::missing())
                } else {
                    factory.service(StateName::Ok)
                }
            })
            .collect();
        let root = factory.process("root", "|", &children);
        let tree = factory.finish();

        let missing = tree.process(&root).unwrap().is_missing(&tree).unwrap();
        prop_assert_eq!(missing, flags.iter().all(|m| *m));
    }

    #[test]
    fn rendering_is_idempotent(ranks in ranks_strategy()) {
        let mut factory = TreeFactory::new("render");
        let children = factory.services_with_ranks(&ranks);
        let shared = factory.process("shared", "&", &children);
        factory.process("left", "|", &[shared.clone()]);
        factory.process("right", "2", &[shared, children[0].clone()]);
        let tree = factory.finish();

        let first = tree.to_legacy_config().unwrap();
        prop_assert_eq!(first.matches("shared = ").count(), 1);
        prop_assert_eq!(tree.to_legacy_config().unwrap(), first);
    }
}
