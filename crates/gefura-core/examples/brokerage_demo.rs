use gefura_core::algo::gefura::{global_gefura, local_gefura, GefuraConfig};
use gefura_core::{Grouping, Network};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A small collaboration network across three departments. Dana and Erin
    // are the only people with ties outside their own department.
    let mut net = Network::undirected();
    net.add_edge("alice", "bob", None);
    net.add_edge("alice", "carol", None);
    net.add_edge("bob", "carol", None);
    net.add_edge("carol", "dana", None);
    net.add_edge("dana", "erin", None);
    net.add_edge("erin", "frank", None);
    net.add_edge("frank", "grace", None);
    net.add_edge("erin", "grace", None);

    let groups = Grouping::from_membership(vec![
        ("alice", "engineering"),
        ("bob", "engineering"),
        ("carol", "engineering"),
        ("dana", "sales"),
        ("erin", "sales"),
        ("frank", "support"),
        ("grace", "support"),
    ])?;

    let config = GefuraConfig {
        normalized: true,
        ..Default::default()
    };

    let global = global_gefura(&net, &groups, config)?;
    let local = local_gefura(&net, &groups, config)?;

    let mut ranked: Vec<_> = global.iter().collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(a.1).unwrap());

    println!("Who bridges between departments?");
    println!("{:<8} {:>8} {:>8}", "node", "global", "local");
    for (node, score) in ranked {
        println!("{:<8} {:>8.4} {:>8.4}", node, score, local[node]);
    }

    Ok(())
}
