use std::collections::HashSet;

use serde_json::{Map, Value};

/// Collect the attachment names a skeleton document's skins reference,
/// deduplicated. Object keys iterate in sorted order, so the result is
/// stable for a given document.
///
/// Handles both skin layouts found in the wild: the 3.8+ array form
/// `skins: [{ "name": .., "attachments": { slot: { key: {..} } } }]` and the
/// older map form `skins: { skinName: { slot: { key: {..} } } }`. An
/// attachment's `path` (or `name`) field overrides its key when present.
pub fn attachment_names(skeleton: &Value) -> Vec<String> {
    let mut names = Vec::new();
    let mut seen = HashSet::new();
    let Some(skins) = skeleton.get("skins") else {
        return names;
    };
    match skins {
        Value::Array(list) => {
            for skin in list {
                if let Some(slots) = skin.get("attachments").and_then(Value::as_object) {
                    collect_slots(slots, &mut names, &mut seen);
                }
            }
        }
        Value::Object(map) => {
            for slots in map.values() {
                if let Some(slots) = slots.as_object() {
                    collect_slots(slots, &mut names, &mut seen);
                }
            }
        }
        _ => {}
    }
    names
}

fn collect_slots(slots: &Map<String, Value>, names: &mut Vec<String>, seen: &mut HashSet<String>) {
    for attachments in slots.values() {
        let Some(attachments) = attachments.as_object() else {
            continue;
        };
        for (key, att) in attachments {
            let name = att
                .get("path")
                .or_else(|| att.get("name"))
                .and_then(Value::as_str)
                .unwrap_or(key);
            if seen.insert(name.to_string()) {
                names.push(name.to_string());
            }
        }
    }
}
