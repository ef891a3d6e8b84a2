//! Append-only, index-aligned sample buffers for one acquisition session.

/// Channel buffers for one session.
///
/// Lengths may diverge while lines arrive because the device reports each
/// channel at its own cadence within a round; alignment is only enforced at
/// finalization. Single writer: the active session owns the store
/// exclusively and hands it off by value when the session ends.
#[derive(Debug, Default, Clone)]
pub struct SampleStore {
    time: Vec<i64>,
    hot: Vec<f64>,
    cold: Vec<f64>,
    crack: Vec<i32>,
}

/// Lengths of the four channels at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreSnapshot {
    pub time: usize,
    pub hot: usize,
    pub cold: usize,
    pub crack: usize,
}

impl StoreSnapshot {
    /// Rounds for which every channel has reported. The crack marker closes
    /// a round, so in a healthy stream this equals the crack length.
    pub fn completed_rounds(&self) -> usize {
        self.time.min(self.hot).min(self.cold).min(self.crack)
    }
}

impl SampleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append_time(&mut self, secs: i64) {
        self.time.push(secs);
    }

    pub fn append_hot(&mut self, celsius: f64) {
        self.hot.push(celsius);
    }

    pub fn append_cold(&mut self, celsius: f64) {
        self.cold.push(celsius);
    }

    pub fn append_crack(&mut self, stage: i32) {
        self.crack.push(stage);
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            time: self.time.len(),
            hot: self.hot.len(),
            cold: self.cold.len(),
            crack: self.crack.len(),
        }
    }

    pub fn completed_rounds(&self) -> usize {
        self.snapshot().completed_rounds()
    }

    pub fn time(&self) -> &[i64] {
        &self.time
    }

    pub fn hot(&self) -> &[f64] {
        &self.hot
    }

    pub fn cold(&self) -> &[f64] {
        &self.cold
    }

    pub fn crack(&self) -> &[i32] {
        &self.crack
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty() && self.hot.is_empty() && self.cold.is_empty() && self.crack.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_are_independent() {
        let mut store = SampleStore::new();
        store.append_time(0);
        store.append_time(1);
        store.append_hot(20.0);
        let snap = store.snapshot();
        assert_eq!(snap.time, 2);
        assert_eq!(snap.hot, 1);
        assert_eq!(snap.cold, 0);
        assert_eq!(snap.crack, 0);
    }

    #[test]
    fn completed_rounds_is_shortest_channel() {
        let mut store = SampleStore::new();
        for t in 0..3 {
            store.append_time(t);
            store.append_hot(20.0 + t as f64);
            store.append_cold(19.5);
        }
        store.append_crack(0);
        store.append_crack(0);
        assert_eq!(store.completed_rounds(), 2);
    }

    #[test]
    fn empty_store_has_zero_rounds() {
        let store = SampleStore::new();
        assert!(store.is_empty());
        assert_eq!(store.completed_rounds(), 0);
    }
}
