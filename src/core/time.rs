//! Shared timestamp/id helpers for the engine and shell envelopes.

use ulid::Ulid;

/// Returns unix-epoch seconds with `Z` suffix (e.g. `1771220592Z`).
pub fn now_epoch_z() -> String {
    format!("{}Z", now_unix_secs())
}

pub fn now_unix_secs() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Finding ids are `F-` plus a ULID so they sort by creation time.
pub fn new_finding_id() -> String {
    format!("F-{}", Ulid::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_epoch_z_format() {
        let result = now_epoch_z();
        assert!(result.ends_with('Z'));
        assert!(result.trim_end_matches('Z').parse::<u64>().is_ok());
    }

    #[test]
    fn test_finding_id_prefix_and_uniqueness() {
        let a = new_finding_id();
        let b = new_finding_id();
        assert!(a.starts_with("F-"));
        assert_ne!(a, b);
        assert!(Ulid::from_string(a.trim_start_matches("F-")).is_ok());
    }
}
