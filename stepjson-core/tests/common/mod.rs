//! Shared fixtures for stepjson integration tests.

#![allow(dead_code)]

use stepjson_core::{Element, Parser, ParseStatus, PausePolicy};

/// A save-file sized document touching every construct the parser knows.
pub const INVENTORY: &str = r#"{
    "name": "Outpost 7",
    "tier": "3",
    "active": "true",
    "founded": "2024-03-01T08:30:00",
    "stock": {
        "ore": "1200",
        "ice": "0.75",
        "crates": []
    },
    "drones": [
        { "id": "1", "role": "miner" },
        { "id": "2", "role": "hauler" }
    ],
    "grid": [[1, 2], [3, 4]],
    "notes": {}
}
"#;

/// Drive `parser` to completion, recording progress after every `resume`.
pub fn drive<P: PausePolicy>(parser: &mut Parser<P>) -> Vec<u32> {
    let mut seen = vec![parser.progress()];
    loop {
        let status = parser.resume().expect("fixture must parse");
        seen.push(parser.progress());
        if status == ParseStatus::Complete {
            return seen;
        }
    }
}

/// Raw value of the primitive at `path`, following object keys.
pub fn raw_at<'e>(root: &'e Element, path: &[&str]) -> &'e str {
    let mut node = root;
    for key in path {
        node = node
            .as_object()
            .and_then(|o| o.get(key))
            .unwrap_or_else(|| panic!("missing member {key:?}"));
    }
    node.as_primitive().expect("path ends at a primitive").raw_value()
}
