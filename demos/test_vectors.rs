//! Dump the authur1 reference data as JSON: the `Q` chain from the initial
//! state, digests with their pre-finalization accumulators, and one keyless
//! forgery that a verifier holding the key can replay.

use serde::Serialize;

use authur1::selftest::{DEMO_EXTENSION, DEMO_KEY, DEMO_MESSAGE, DEMO_STATE};
use authur1::{
    compress, hash, hash_prefinal, mac, recover_state_and_forge, ObservedPair, SearchConfig,
    INITIAL_STATE,
};

const OUTPUT_FILE: &str = "test_vectors/authur1.json";
const HASH_INPUTS: [&str; 7] = ["", "A", "AB", "ABC", "ABCD", "ABCDE", "AAAAaaaa"];

#[derive(Serialize)]
struct HashVector {
    input: String,
    prefinal: String,
    digest: String,
}

#[derive(Serialize)]
struct ForgeryVector {
    key: String,
    message: String,
    mic: String,
    state: String,
    forged_message: String,
    forged_mic: String,
}

#[derive(Serialize)]
struct Vectors {
    q_chain: Vec<String>,
    hash: Vec<HashVector>,
    forgery: ForgeryVector,
}

fn main() {
    let q_chain = std::iter::successors(Some(INITIAL_STATE), |&q| Some(compress(q)))
        .skip(1)
        .take(3)
        .map(|q| format!("{q:08x}"))
        .collect();

    let hash_vectors = HASH_INPUTS
        .iter()
        .map(|input| HashVector {
            input: hex::encode(input),
            prefinal: format!("{:08x}", hash_prefinal(input.as_bytes())),
            digest: hex::encode(hash(input.as_bytes())),
        })
        .collect();

    let mic = mac(DEMO_MESSAGE, &DEMO_KEY).unwrap();
    let pairs = [ObservedPair::new(DEMO_MESSAGE, mic)];
    let forgery =
        recover_state_and_forge(&pairs, DEMO_EXTENSION, Some(DEMO_STATE), &SearchConfig::default())
            .unwrap();
    assert_eq!(mac(&forgery.message, &DEMO_KEY).unwrap(), forgery.mic);

    let vectors = Vectors {
        q_chain,
        hash: hash_vectors,
        forgery: ForgeryVector {
            key: hex::encode(DEMO_KEY),
            message: hex::encode(DEMO_MESSAGE),
            mic: hex::encode(mic),
            state: format!("{:08x}", forgery.state),
            forged_message: hex::encode(&forgery.message),
            forged_mic: hex::encode(forgery.mic),
        },
    };

    let json = serde_json::to_string_pretty(&vectors).unwrap();
    println!("{json}");
    std::fs::create_dir_all("test_vectors").unwrap();
    std::fs::write(OUTPUT_FILE, json).unwrap();
    eprintln!("written to {OUTPUT_FILE}");
}
