// Falling-block scenario: run with the default config and print the
// captured timeline as JSON, the same shape the golden fixtures use.

use stride_scenario::falling_block::{self, FallingBlockConfig};

fn main() {
    let report = falling_block::run(&FallingBlockConfig::default());
    println!(
        "{}",
        serde_json::to_string_pretty(&report).expect("report serializes")
    );
}
