//! Integration tests for state summaries and problem drill-down

use crate::common::*;
use businessprocess::{NodeKind, Observation, StateName};

#[test]
fn test_census_counts_every_reachable_leaf() {
    let tree = shop_tree();
    let census = tree.process("shop").unwrap().state_census(&tree).unwrap();

    assert_eq!(census.count(StateName::Up), 3);
    assert_eq!(census.count(StateName::Down), 2);
    assert_eq!(census.count(StateName::Ok), 1);
    assert_eq!(census.count(StateName::Warning), 1);
    assert_eq!(census.count(StateName::Critical), 0);
    assert_eq!(census.total(), 7);
    assert_eq!(census.iter().count(), StateName::ALL.len());
}

#[test]
fn test_census_is_sum_of_children() {
    let tree = shop_tree();
    let census = |name: &str| tree.process(name).unwrap().state_census(&tree).unwrap();

    let mut expected = census("network");
    expected.record(StateName::Up);
    assert_eq!(census("intranet"), expected);
}

#[test]
fn test_shared_leaf_counted_per_path() {
    let mut factory = TreeFactory::new("shared");
    let leaf = factory.service(StateName::Warning);
    let left = factory.process("left", "&", &[leaf.clone()]);
    let right = factory.process("right", "&", &[leaf]);
    let root = factory.process("root", "&", &[left, right]);
    let tree = factory.finish();

    let census = tree.process(&root).unwrap().state_census(&tree).unwrap();
    assert_eq!(census.count(StateName::Warning), 2);
}

#[test]
fn test_missing_leaf_counted_as_missing() {
    let mut factory = TreeFactory::new("missing");
    let gone = factory.service_with(Observation::missing());
    let root = factory.process("root", "&", &[gone]);
    let tree = factory.finish();

    let process = tree.process(&root).unwrap();
    let census = process.state_census(&tree).unwrap();
    assert_eq!(census.count(StateName::Missing), 1);
    assert!(!census.has_problems(&StateName::ACCEPTABLE));
}

#[test]
fn test_has_problems() {
    let tree = shop_tree();
    let has_problems = |name: &str| tree.process(name).unwrap().has_problems(&tree).unwrap();

    // own state is WARNING
    assert!(has_problems("shop"));
    // OK itself, but lb2 is DOWN below
    assert!(has_problems("intranet"));
    assert!(has_problems("network"));

    let mut factory = TreeFactory::new("lenient");
    let pending = factory.service(StateName::Pending);
    let ok = factory.service(StateName::Ok);
    let fine = factory.process("fine", "&", &[pending, ok]);
    let tree = factory.finish();
    assert!(!tree.process(&fine).unwrap().has_problems(&tree).unwrap());
}

#[test]
fn test_problematic_children() {
    let tree = shop_tree();
    let names = |name: &str| -> Vec<String> {
        tree.process(name)
            .unwrap()
            .problematic_children(&tree)
            .unwrap()
            .iter()
            .map(|child| child.name().to_string())
            .collect()
    };

    assert_eq!(names("intranet"), vec!["network"]);
    assert_eq!(names("database"), vec!["db2;postgres"]);
    assert_eq!(names("shop"), vec!["database", "network", "web"]);
}

#[test]
fn test_problem_tree() {
    let tree = shop_tree();
    let problems = tree.process("shop").unwrap().problem_tree(&tree).unwrap();

    assert_eq!(problems.names(), vec!["database", "network", "web"]);

    let database = problems.get("database").unwrap();
    assert_eq!(database.kind, NodeKind::Process);
    assert_eq!(database.state, StateName::Warning);
    assert_eq!(database.children.names(), vec!["db2;postgres"]);

    let web3 = problems.get("web").unwrap().children.get("web3;Hoststatus").unwrap();
    assert_eq!(web3.kind, NodeKind::Host);
    assert_eq!(web3.state, StateName::Down);
    assert!(web3.children.is_empty());
}

#[test]
fn test_problem_tree_uses_alias_as_label() {
    let mut factory = TreeFactory::new("labels");
    let bad = factory.service(StateName::Critical);
    factory.process("inner_process", "&", &[bad]);
    factory
        .tree_mut()
        .process_mut("inner_process")
        .unwrap()
        .set_alias("Inner_Process");
    let root = factory.process("root", "&", &["inner_process".to_string()]);
    let tree = factory.finish();

    let problems = tree.process(&root).unwrap().problem_tree(&tree).unwrap();
    assert_eq!(problems.get("inner_process").unwrap().label, "Inner Process");
}

#[test]
fn test_problem_tree_serializes_to_json() {
    let tree = shop_tree();
    let problems = tree.process("intranet").unwrap().problem_tree(&tree).unwrap();
    let json = serde_json::to_value(&problems).unwrap();

    assert_eq!(json[0]["node"], "network");
    assert_eq!(json[0]["children"][0]["node"], "lb2;Hoststatus");
    assert_eq!(json[0]["children"][0]["state"], "DOWN");
}
