//! Forge a MIC for an extended message, searching the internal state from
//! scratch. Run with `RUST_LOG=info` to watch the search.

use authur1::selftest::{DEMO_KEY, DEMO_MESSAGE};
use authur1::{mac, recover_state_and_forge, ObservedPair, SearchConfig};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // What the victim publishes
    let mic = mac(DEMO_MESSAGE, &DEMO_KEY).unwrap();
    println!("observed: {:?} -> {}", String::from_utf8_lossy(DEMO_MESSAGE), hex::encode(mic));

    // What the attacker does, key unseen
    let pairs = [ObservedPair::new(DEMO_MESSAGE, mic)];
    let forgery = recover_state_and_forge(&pairs, b"ef", None, &SearchConfig::default()).unwrap();
    println!("recovered state: {:08x}", forgery.state);
    println!(
        "forged:   {:?} -> {}",
        String::from_utf8_lossy(&forgery.message),
        hex::encode(forgery.mic)
    );

    // What the victim checks
    let genuine = mac(&forgery.message, &DEMO_KEY).unwrap();
    println!("genuine:  {}", hex::encode(genuine));
    assert_eq!(genuine, forgery.mic, "forgery rejected");
}
