//! Arithmetic Example
//!
//! Plans `log(add(add(1, 2), add(3, 4)))` and prints the artifacts the VM
//! expects: one command word per call and the initial state table.

use alloy_primitives::address;
use strand_planner::prelude::*;
use strand_planner::Planner;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let math = Contract::new(address!("0x5FbDB2315678afecb367f032d93F642f64180aa3"))
        .with_signature("add(uint256,uint256)")?;
    let events = Contract::new(address!("0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512"))
        .with_signature("logUint(uint256)")?;

    let mut planner = Planner::new();
    let r1 = planner.add(math.call("add", args![1u64, 2u64])?);
    let r2 = planner.add(math.call("add", args![3u64, 4u64])?);
    let r3 = planner.add(math.call("add", args![r1, r2])?);
    planner.add(events.call("logUint", args![r3])?);

    let plan = planner.plan()?;

    info!("Plan digest {}", plan.digest());
    for (i, word) in plan.commands.iter().enumerate() {
        println!("command[{i}] = {word}");
    }
    for (slot, entry) in plan.state.iter().enumerate() {
        println!("state[{slot}]   = {entry}");
    }
    println!("{}", serde_json::to_string_pretty(&plan)?);

    Ok(())
}
