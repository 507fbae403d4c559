//! Built-in check against the published reference values.

use serde::Serialize;

use crate::attack::{recover_state_and_forge, ObservedPair};
use crate::compress::compress;
use crate::config::SearchConfig;
use crate::engine::hash;
use crate::mac::mac;
use crate::{Result, Word, INITIAL_STATE, KEY_LEN};

/// Key whose accumulator after `"AAAA"` is tiny (`0xc475`), so the search
/// terminates almost immediately.
pub const DEMO_KEY: [u8; KEY_LEN] = [
    0x28, 0x94, 0x88, 0xae, 0x6d, 0x71, 0xc8, 0x2d, 0xa1, 0x50, 0x2c, 0x01, 0x30, 0xec, 0x04, 0xe0,
];
pub const DEMO_MESSAGE: &[u8] = b"AAAAaa";
pub const DEMO_STATE: Word = 0xC475;
pub const DEMO_EXTENSION: &[u8] = b"ef";

const HASH_VECTORS: [(&str, Word); 6] = [
    ("", 0xDED7_E2D2),
    ("A", 0x5D72_5F7F),
    ("AB", 0x5F3B_5F7F),
    ("ABC", 0x5F39_137F),
    ("ABCD", 0x5F39_1128),
    ("ABCDE", 0x2F69_AF58),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Check {
    pub name: String,
    pub expected: String,
    pub actual: String,
    pub passed: bool,
}

impl Check {
    fn word(name: impl Into<String>, expected: Word, actual: Word) -> Self {
        Self {
            name: name.into(),
            expected: format!("{expected:08x}"),
            actual: format!("{actual:08x}"),
            passed: expected == actual,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SelfTestReport {
    pub checks: Vec<Check>,
}

impl SelfTestReport {
    pub fn passed(&self) -> bool {
        self.checks.iter().all(|c| c.passed)
    }

    pub fn failures(&self) -> impl Iterator<Item = &Check> {
        self.checks.iter().filter(|c| !c.passed)
    }
}

/// Run every reference check. Errors only surface if the forgery step
/// itself fails to run.
pub fn self_test() -> Result<SelfTestReport> {
    let mut report = SelfTestReport::default();

    let mut q = INITIAL_STATE;
    for (i, expected) in [0xDED7_E2D2, 0x1B72_5F7D, 0xA588_6999].into_iter().enumerate() {
        q = compress(q);
        report
            .checks
            .push(Check::word(format!("Q^{}(S0)", i + 1), expected, q));
    }

    for (input, expected) in HASH_VECTORS {
        let actual = Word::from_be_bytes(hash(input.as_bytes()));
        report
            .checks
            .push(Check::word(format!("H({input:?})"), expected, actual));
    }

    let pairs = [ObservedPair::new(DEMO_MESSAGE, mac(DEMO_MESSAGE, &DEMO_KEY)?)];
    let forgery = recover_state_and_forge(
        &pairs,
        DEMO_EXTENSION,
        Some(DEMO_STATE),
        &SearchConfig::default(),
    )?;
    let genuine = mac(&forgery.message, &DEMO_KEY)?;
    report.checks.push(Check::word(
        "forged MIC",
        Word::from_be_bytes(genuine),
        Word::from_be_bytes(forgery.mic),
    ));

    for check in report.failures() {
        tracing::warn!(
            name = %check.name,
            expected = %check.expected,
            actual = %check.actual,
            "self test check failed"
        );
    }
    Ok(report)
}
