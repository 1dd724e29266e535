//! Key translation between the wire convention (`camelCase`) and the storage
//! convention (`snake_case`).
//!
//! Both directions are total over arbitrary key strings and leave a key
//! untouched when it is already in the target convention. For keys that are
//! in the source convention the two functions are inverses of each other.

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde_json::{Map, Value};

lazy_static! {
    static ref UPPER_RE: Regex = Regex::new(r"[A-Z]").unwrap();
    static ref UNDERSCORE_LOWER_RE: Regex = Regex::new(r"_([a-z])").unwrap();
}

/// `recruiterLinkedIn` -> `recruiter_linked_in`
pub fn to_storage_key(key: &str) -> String {
    UPPER_RE
        .replace_all(key, |caps: &Captures| format!("_{}", caps[0].to_ascii_lowercase()))
        .into_owned()
}

/// `recruiter_linked_in` -> `recruiterLinkedIn`
pub fn to_wire_key(key: &str) -> String {
    UNDERSCORE_LOWER_RE
        .replace_all(key, |caps: &Captures| caps[1].to_ascii_uppercase())
        .into_owned()
}

pub fn to_storage(map: Map<String, Value>) -> Map<String, Value> {
    map.into_iter()
        .map(|(k, v)| (to_storage_key(&k), v))
        .collect()
}

pub fn to_wire(map: Map<String, Value>) -> Map<String, Value> {
    map.into_iter().map(|(k, v)| (to_wire_key(&k), v)).collect()
}
