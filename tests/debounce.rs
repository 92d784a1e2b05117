mod tests {
    use choreo::debounce::DEFAULT_STABLE_DURATION;
    use choreo::{DebounceConfig, Debouncer, Duration, Edge, ManualClock, Timestamp};

    fn at(ticks: u32) -> Timestamp {
        Timestamp::from_ticks(ticks)
    }

    #[test]
    fn test_new_is_inactive() {
        let debouncer = Debouncer::new();
        assert!(!debouncer.state());
        assert!(!debouncer.previous_state());
        assert!(!debouncer.changed());
        assert_eq!(debouncer.edge(), None);
        assert_eq!(debouncer.stable_duration(), Duration::from_millis(50));
        assert_eq!(DebounceConfig::default().stable_duration, DEFAULT_STABLE_DURATION);
    }

    #[test]
    fn test_accepts_only_after_window() {
        let mut debouncer = Debouncer::new();

        debouncer.update_at(true, at(50));
        assert!(!debouncer.changed());
        assert!(!debouncer.state());

        debouncer.update_at(true, at(51));
        assert!(debouncer.changed());
        assert!(debouncer.state());
        assert!(!debouncer.previous_state());
        assert_eq!(debouncer.edge(), Some(Edge::Rising));
        assert_eq!(debouncer.last_change(), at(51));
    }

    #[test]
    fn test_changed_flag_lasts_one_call() {
        let mut debouncer = Debouncer::new();
        debouncer.update_at(true, at(100));
        assert!(debouncer.changed());

        debouncer.update_at(true, at(101));
        assert!(!debouncer.changed());
        assert_eq!(debouncer.edge(), None);
        assert!(debouncer.state());
    }

    #[test]
    fn test_bounce_rejection() {
        let mut debouncer = Debouncer::new();
        debouncer.update_at(true, at(100));
        assert!(debouncer.changed());

        let mut raw = false;
        for t in (101..=150).step_by(3) {
            debouncer.update_at(raw, at(t));
            assert!(debouncer.state());
            assert!(!debouncer.changed());
            raw = !raw;
        }
    }

    #[test]
    fn test_change_fires_once_when_window_elapses() {
        let mut debouncer = Debouncer::new();
        debouncer.update_at(true, at(100));

        let mut fired = Vec::new();
        for t in 101..=300 {
            debouncer.update_at(false, at(t));
            if debouncer.changed() {
                fired.push(t);
            }
        }

        assert_eq!(fired, vec![151]);
        assert!(!debouncer.state());
        assert!(debouncer.previous_state());
    }

    #[test]
    fn test_fast_transitions_merge() {
        let mut debouncer = Debouncer::new();
        debouncer.update_at(true, at(100));

        // Release and re-press inside the window: the release is lost.
        debouncer.update_at(false, at(120));
        debouncer.update_at(true, at(130));
        debouncer.update_at(true, at(200));

        assert!(debouncer.state());
        assert!(!debouncer.changed());
    }

    #[test]
    fn test_custom_stable_duration() {
        let mut debouncer = Debouncer::with_config(DebounceConfig {
            stable_duration: Duration::from_millis(10),
        });
        debouncer.update_at(true, at(11));
        assert_eq!(debouncer.edge(), Some(Edge::Rising));

        debouncer.update_at(false, at(21));
        assert!(!debouncer.changed());
        debouncer.update_at(false, at(22));
        assert_eq!(debouncer.edge(), Some(Edge::Falling));

        debouncer.set_stable_duration(Duration::from_millis(100));
        debouncer.update_at(true, at(100));
        assert!(!debouncer.changed());
    }

    #[test]
    fn test_window_across_wraparound() {
        let mut debouncer = Debouncer::new();
        debouncer.update_at(true, at(u32::MAX - 20));
        assert!(debouncer.changed());

        debouncer.update_at(false, at(20));
        assert!(!debouncer.changed());
        debouncer.update_at(false, at(30));
        assert!(debouncer.changed());
    }

    #[test]
    fn test_update_reads_clock() {
        let clock = ManualClock::new(Timestamp::from_ticks(1_000));
        let mut debouncer = Debouncer::new();

        debouncer.update(true, &clock);
        assert_eq!(debouncer.edge(), Some(Edge::Rising));

        clock.advance(Duration::from_millis(10));
        debouncer.update(false, &clock);
        assert_eq!(debouncer.edge(), None);
    }
}
