use proptest::prelude::*;
use roast_core::{LineClassifier, SampleEvent, SampleStore, finalize};

proptest! {
    // Classification is total: any byte line maps to an event or a typed
    // error, never a panic, and the result is one of the six kinds.
    #[test]
    fn classifier_is_total(line in proptest::collection::vec(any::<u8>(), 0..64)) {
        let mut classifier = LineClassifier::new();
        if let Ok(event) = classifier.classify(&line) {
            prop_assert!(matches!(
                event,
                SampleEvent::TimeMark(_)
                    | SampleEvent::HotReading(_)
                    | SampleEvent::ColdReading(_)
                    | SampleEvent::CrackMark(_)
                    | SampleEvent::Ignore
                    | SampleEvent::Terminate
            ));
        }
    }

    // Before the first time mark, marker-free lines can never terminate.
    #[test]
    fn fresh_classifier_ignores_arbitrary_ascii_noise(s in "[a-zA-Z ]{0,32}") {
        prop_assume!(
            !["Time", "Hot", "Cold", "Crack", "ADC"]
                .iter()
                .any(|m| s.contains(m))
        );
        let mut classifier = LineClassifier::new();
        prop_assert_eq!(classifier.classify(s.as_bytes()).unwrap(), SampleEvent::Ignore);
    }

    // Whatever the relative channel lengths were at shutdown, finalization
    // yields equal-length sequences cut at the shortest channel.
    #[test]
    fn finalized_channels_are_always_aligned(
        n_time in 0usize..12,
        n_hot in 0usize..12,
        n_cold in 0usize..12,
        cracks in proptest::collection::vec(0i32..4, 0..12),
    ) {
        let mut store = SampleStore::new();
        for i in 0..n_time {
            store.append_time(i as i64);
        }
        for _ in 0..n_hot {
            store.append_hot(21.0);
        }
        for _ in 0..n_cold {
            store.append_cold(19.5);
        }
        for &c in &cracks {
            store.append_crack(c);
        }

        let expected = n_time.min(n_hot).min(n_cold).min(cracks.len());
        let profile = finalize(store);
        prop_assert_eq!(profile.len(), expected);
        prop_assert_eq!(profile.time().len(), expected);
        prop_assert_eq!(profile.hot().len(), expected);
        prop_assert_eq!(profile.cold().len(), expected);
        prop_assert_eq!(profile.crack_edge().len(), expected);
    }

    // The edge flags are the stage-change signal shifted one sample late,
    // with the first flag pinned false.
    #[test]
    fn crack_edges_match_the_shifted_change_rule(cracks in proptest::collection::vec(0i32..4, 1..16)) {
        let mut store = SampleStore::new();
        for (i, &c) in cracks.iter().enumerate() {
            store.append_time(i as i64);
            store.append_hot(20.0 + i as f64);
            store.append_cold(19.5);
            store.append_crack(c);
        }
        let profile = finalize(store);
        let edges = profile.crack_edge();
        prop_assert!(!edges[0]);
        for i in 1..cracks.len() {
            prop_assert_eq!(edges[i], cracks[i - 1] != cracks[i]);
        }
    }
}
