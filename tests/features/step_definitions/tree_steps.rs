//! Steps building the tree under test

use cucumber::given;

use crate::features::support::world::split_list;
use crate::features::support::TestWorld;
use businessprocess::{Observation, SeverityRank, StateName};

#[given(expr = "a service {string} in state {word}")]
async fn service_in_state(world: &mut TestWorld, name: String, state: String) {
    let state: StateName = state.parse().unwrap();
    world.add_service(&name, Observation::new(state));
}

#[given(expr = "a service {string} in state {word} with downtime")]
async fn service_in_downtime(world: &mut TestWorld, name: String, state: String) {
    let state: StateName = state.parse().unwrap();
    world.add_service(&name, Observation::new(state).in_downtime());
}

#[given(expr = "a missing service {string}")]
async fn missing_service(world: &mut TestWorld, name: String) {
    world.add_service(&name, Observation::missing());
}

#[given(expr = "services {string} with ranks {string}")]
async fn services_with_ranks(world: &mut TestWorld, names: String, ranks: String) {
    let names = split_list(&names);
    let ranks = split_list(&ranks);
    assert_eq!(names.len(), ranks.len(), "one rank per service");

    for (name, rank) in names.iter().zip(ranks) {
        let rank = SeverityRank::new(rank.parse().unwrap()).unwrap();
        world.add_service(name, Observation::new(StateName::from_rank(rank)));
    }
}

#[given(expr = "a process {string} combining {string} with {string}")]
async fn process_combining(world: &mut TestWorld, name: String, children: String, operator: String) {
    world.add_process(&name, &operator, &children);
}

#[given(expr = "an empty process {string}")]
async fn empty_process(world: &mut TestWorld, name: String) {
    world.add_process(&name, "&", "");
}
