//! Test fixtures for common test data
//!
//! The shop fixture:
//!
//! ```text
//! network  = lb1 | lb2                 (UP, DOWN)          -> OK
//! web      = 2 of: web1 + web2 + web3  (UP, UP, DOWN ack)  -> OK
//! database = db1;postgres & db2;postgres (OK, WARNING)     -> WARNING
//! shop     = database & network & web                      -> WARNING
//! intranet = network & web1                                -> OK
//! ```

use businessprocess::{Observation, Operator, ProcessNode, ProcessTree, StateName};

pub const SHOP_LEGACY_CONFIG: &str = "\
network = lb1;Hoststatus | lb2;Hoststatus

intranet = network & web1;Hoststatus
info_url;intranet;https://wiki.example.com/intranet
database = db1;postgres & db2;postgres

web = 2 of: web1;Hoststatus + web2;Hoststatus + web3;Hoststatus

shop = database & network & web
display 1;shop;Web Shop
";

fn process(name: &str, operator: Operator, children: &[&str]) -> ProcessNode {
    ProcessNode::new(name, operator)
        .unwrap()
        .with_children(children.iter().copied())
}

/// The shop tree described in the module docs
pub fn shop_tree() -> ProcessTree {
    let mut tree = ProcessTree::new("shop");

    for (host, state) in [
        ("lb1", StateName::Up),
        ("lb2", StateName::Down),
        ("web1", StateName::Up),
        ("web2", StateName::Up),
    ] {
        let name = tree.add_host(host).unwrap();
        tree.observe(&name, Observation::new(state)).unwrap();
    }
    let web3 = tree.add_host("web3").unwrap();
    tree.observe(&web3, Observation::new(StateName::Down).acknowledged())
        .unwrap();

    for (host, state) in [("db1", StateName::Ok), ("db2", StateName::Warning)] {
        let name = tree.add_service(host, "postgres").unwrap();
        tree.observe(&name, Observation::new(state)).unwrap();
    }

    tree.add_process(process(
        "network",
        Operator::Or,
        &["lb1;Hoststatus", "lb2;Hoststatus"],
    ))
    .unwrap();
    tree.add_process(process(
        "web",
        Operator::min_of(2).unwrap(),
        &["web1;Hoststatus", "web2;Hoststatus", "web3;Hoststatus"],
    ))
    .unwrap();
    tree.add_process(process(
        "database",
        Operator::And,
        &["db1;postgres", "db2;postgres"],
    ))
    .unwrap();

    let mut shop = process("shop", Operator::And, &["web", "network", "database"]);
    shop.set_alias("Web_Shop");
    shop.set_display(1);
    tree.add_process(shop).unwrap();

    let mut intranet = process("intranet", Operator::And, &["network", "web1;Hoststatus"]);
    intranet.set_info_url("https://wiki.example.com/intranet");
    tree.add_process(intranet).unwrap();

    tree
}
