mod tests {
    use std::cell::RefCell;

    use choreo::{
        Choreography, Duration, Ensemble, EnsembleFull, ManualClock, Performance, Step, Timestamp,
    };

    /// Runs for `length_ms`, logging its id every time it is advanced.
    #[derive(Debug)]
    struct Tracer<'a> {
        id: u8,
        length_ms: u64,
        log: &'a RefCell<Vec<u8>>,
    }

    impl Performance for Tracer<'_> {
        fn advance(&mut self, previous: Step, elapsed: Duration) -> Step {
            self.log.borrow_mut().push(self.id);
            if previous.is_reset() || elapsed.as_millis() >= self.length_ms {
                return Step::IDLE;
            }
            Step::at(0)
        }
    }

    fn tracer(id: u8, length_ms: u64, log: &RefCell<Vec<u8>>) -> Choreography<Tracer<'_>> {
        Choreography::once(Tracer { id, length_ms, log })
    }

    #[test]
    fn test_register_until_full() {
        let log = RefCell::new(Vec::new());
        let mut ensemble: Ensemble<Tracer<'_>, 2> = Ensemble::new();
        assert!(ensemble.is_empty());

        let first = ensemble.register(tracer(0, 100, &log)).unwrap();
        let second = ensemble.register(tracer(1, 100, &log)).unwrap();
        assert_eq!(first.index(), 0);
        assert_eq!(second.index(), 1);
        assert_eq!(ensemble.len(), 2);

        let Err(EnsembleFull(rejected)) = ensemble.register(tracer(2, 100, &log)) else {
            panic!("ensemble should be full");
        };
        assert_eq!(rejected.performance().id, 2);
    }

    #[test]
    fn test_ticks_running_in_registration_order() {
        let log = RefCell::new(Vec::new());
        let clock = ManualClock::new(Timestamp::from_ticks(0));
        let mut ensemble: Ensemble<Tracer<'_>, 4> = Ensemble::new();

        let a = ensemble.register(tracer(0, 1_000, &log)).unwrap();
        let _idle = ensemble.register(tracer(1, 1_000, &log)).unwrap();
        let c = ensemble.register(tracer(2, 1_000, &log)).unwrap();

        ensemble.start(c, &clock).unwrap();
        ensemble.start(a, &clock).unwrap();
        log.borrow_mut().clear();

        ensemble.tick(&clock);
        assert_eq!(*log.borrow(), vec![0, 2]);
        assert_eq!(ensemble.running_count(), 2);
    }

    #[test]
    fn test_finished_choreographies_drop_out() {
        let log = RefCell::new(Vec::new());
        let clock = ManualClock::new(Timestamp::from_ticks(0));
        let mut ensemble: Ensemble<Tracer<'_>, 2> = Ensemble::new();

        let short = ensemble.register(tracer(0, 100, &log)).unwrap();
        let long = ensemble.register(tracer(1, 1_000, &log)).unwrap();
        ensemble.start(short, &clock).unwrap();
        ensemble.start(long, &clock).unwrap();

        clock.advance(Duration::from_millis(150));
        ensemble.tick(&clock);
        assert!(!ensemble.is_running(short));
        assert!(ensemble.is_running(long));

        log.borrow_mut().clear();
        ensemble.tick(&clock);
        assert_eq!(*log.borrow(), vec![1]);
    }

    #[test]
    fn test_toggle_and_stop_all() {
        let log = RefCell::new(Vec::new());
        let clock = ManualClock::new(Timestamp::from_ticks(0));
        let mut ensemble: Ensemble<Tracer<'_>, 2> = Ensemble::new();

        let a = ensemble.register(tracer(0, 1_000, &log)).unwrap();
        let b = ensemble.register(tracer(1, 1_000, &log)).unwrap();

        assert_eq!(ensemble.toggle(a, &clock), Some(true));
        assert_eq!(ensemble.toggle(b, &clock), Some(true));
        assert_eq!(ensemble.toggle(b, &clock), Some(false));
        assert_eq!(ensemble.running_count(), 1);

        ensemble.stop_all();
        assert_eq!(ensemble.running_count(), 0);
        assert!(ensemble.iter().all(|choreography| choreography.step() == Step::IDLE));
    }

    #[test]
    fn test_stop_by_id() {
        let log = RefCell::new(Vec::new());
        let clock = ManualClock::new(Timestamp::from_ticks(0));
        let mut ensemble: Ensemble<Tracer<'_>, 1> = Ensemble::default();

        let id = ensemble.register(tracer(0, 1_000, &log)).unwrap();
        ensemble.start(id, &clock).unwrap();
        ensemble.stop(id).unwrap();
        assert!(!ensemble.is_running(id));
        assert_eq!(ensemble.get(id).map(Choreography::step), Some(Step::IDLE));
    }

    #[test]
    fn test_unknown_id() {
        let log = RefCell::new(Vec::new());
        let clock = ManualClock::new(Timestamp::from_ticks(0));
        let mut small: Ensemble<Tracer<'_>, 1> = Ensemble::new();
        let mut large: Ensemble<Tracer<'_>, 2> = Ensemble::new();

        small.register(tracer(0, 100, &log)).unwrap();
        large.register(tracer(0, 100, &log)).unwrap();
        let foreign = large.register(tracer(1, 100, &log)).unwrap();

        assert!(small.get(foreign).is_none());
        assert!(small.get_mut(foreign).is_none());
        assert_eq!(small.start(foreign, &clock), None);
        assert_eq!(small.stop(foreign), None);
        assert_eq!(small.toggle(foreign, &clock), None);
        assert!(!small.is_running(foreign));
    }
}
