use authur1::{hash, mac, Key};

fn main() {
    let input = "Hello, world!";
    let digest = hash(input.as_bytes());
    println!("Input: {}", input);
    println!("Input hex: {}", hex::encode(input.as_bytes()));
    println!("Hash: {}", hex::encode(digest));

    let key = Key::random();
    let mic = mac(input.as_bytes(), key.as_bytes()).unwrap();
    println!("Key: {}", hex::encode(key.as_bytes()));
    println!("MIC: {}", hex::encode(mic));
}
