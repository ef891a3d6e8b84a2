//! Mappings from `roast_config` schema types into core tunables.

use crate::session::SessionTunables;

impl From<&roast_config::Acquisition> for SessionTunables {
    fn from(a: &roast_config::Acquisition) -> Self {
        Self {
            read_timeout_ms: a.read_timeout_ms,
            poll_backoff_ms: a.poll_backoff_ms,
            live_min_rounds: a.live_min_rounds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_map_onto_core_defaults() {
        let cfg = roast_config::Acquisition::default();
        let tunables: SessionTunables = (&cfg).into();
        let core_defaults = SessionTunables::default();
        assert_eq!(tunables.read_timeout_ms, core_defaults.read_timeout_ms);
        assert_eq!(tunables.poll_backoff_ms, core_defaults.poll_backoff_ms);
        assert_eq!(tunables.live_min_rounds, core_defaults.live_min_rounds);
    }
}
