mod tests {
    use core::cell::Cell;
    use core::future::poll_fn;
    use core::task::Poll;

    use embassy_futures::block_on;
    use embassy_futures::select::{Either, select};
    use embedded_hal_async::delay::DelayNs;
    use strand_clock::{
        ClockSyncConfig, ConnectivityFlag, DisplayConfig, DriverError, Duration,
        FrameOutcome, Mask, MaskError, NetworkLink, Rgb, StartupError, Strand, StrandConfig,
        StrandDriver, SyncOutcome, SystemClock, TIME_LOG_INTERVAL, TimeSource, pixel_from_rgb,
        prepare_display, run_clock,
    };

    const ON: Rgb = pixel_from_rgb(50, 50, 50);
    const OFF: Rgb = pixel_from_rgb(0, 0, 0);

    #[derive(Default)]
    struct RecordingDriver {
        initialized: usize,
        frames: Vec<Vec<Rgb>>,
    }

    impl StrandDriver<Rgb> for RecordingDriver {
        fn initialize<const MAX_PIXELS: usize>(
            &mut self,
            strands: &mut [Strand<Rgb, MAX_PIXELS>],
        ) -> Result<(), DriverError> {
            for strand in strands {
                strand.initialize()?;
                self.initialized += 1;
            }
            Ok(())
        }

        fn update_pixels<const MAX_PIXELS: usize>(
            &mut self,
            strand: &Strand<Rgb, MAX_PIXELS>,
        ) -> Result<(), DriverError> {
            self.frames.push(strand.pixels()?.to_vec());
            Ok(())
        }
    }

    struct NoNetwork;

    impl NetworkLink for NoNetwork {
        type Error = ();

        fn connect(&mut self) -> Result<(), ()> {
            Err(())
        }

        fn start_time_sync(&mut self, _server: &str) -> Result<(), ()> {
            Err(())
        }

        fn disconnect(&mut self) -> Result<(), ()> {
            Ok(())
        }
    }

    struct FixedClock(i64);

    impl SystemClock for FixedClock {
        fn unix_time(&self) -> i64 {
            self.0
        }
    }

    /// Counts reads, always answering with the same time
    struct CountingClock {
        time: i64,
        reads: Cell<usize>,
    }

    impl SystemClock for CountingClock {
        fn unix_time(&self) -> i64 {
            self.reads.set(self.reads.get() + 1);
            self.time
        }
    }

    /// Counts flushed frames outside the display loop
    struct CountingDriver<'a> {
        flushed: &'a Cell<usize>,
    }

    impl StrandDriver<Rgb> for CountingDriver<'_> {
        fn update_pixels<const MAX_PIXELS: usize>(
            &mut self,
            strand: &Strand<Rgb, MAX_PIXELS>,
        ) -> Result<(), DriverError> {
            strand.pixels()?;
            self.flushed.set(self.flushed.get() + 1);
            Ok(())
        }
    }

    /// Records microsecond sleeps and stops the clock after `limit`
    struct StoppingDelay<'a> {
        sleeps: Vec<u32>,
        limit: usize,
        stopped: &'a Cell<bool>,
    }

    impl DelayNs for StoppingDelay<'_> {
        async fn delay_ns(&mut self, _ns: u32) {}

        async fn delay_us(&mut self, us: u32) {
            self.sleeps.push(us);
            if self.sleeps.len() >= self.limit {
                self.stopped.set(true);
                poll_fn(|_| Poll::<()>::Pending).await;
            }
        }
    }

    struct NoDelay;

    impl DelayNs for NoDelay {
        async fn delay_ns(&mut self, _ns: u32) {}
    }

    fn display_config() -> DisplayConfig<Rgb> {
        DisplayConfig::new(ON, OFF)
    }

    #[test]
    fn test_prepare_display_initializes_every_strand() {
        let mut strands: [Strand<Rgb, 20>; 2] = [
            Strand::new(StrandConfig {
                num_pixels: 7,
                ..StrandConfig::DEFAULT
            }),
            Strand::new(StrandConfig {
                channel: 1,
                gpio: 18,
                ..StrandConfig::DEFAULT
            }),
        ];
        let mask = Mask::<20>::from_slice(&[false, true, true, true, false, true, true]).unwrap();

        let mut display = prepare_display(
            &mut strands[..],
            RecordingDriver::default(),
            mask,
            display_config(),
        )
        .unwrap();

        assert_eq!(display.driver().initialized, 2);
        assert_eq!(display.render_frame(), FrameOutcome::Flushed);
        assert_eq!(
            display.driver().frames,
            vec![vec![OFF, ON, ON, ON, OFF, ON, ON]]
        );
        drop(display);
        assert!(strands[1].is_initialized());
    }

    #[test]
    fn test_prepare_display_errors() {
        let mut none: [Strand<Rgb, 20>; 0] = [];
        let result = prepare_display(
            &mut none[..],
            RecordingDriver::default(),
            Mask::<20>::new(0).unwrap(),
            display_config(),
        );
        assert_eq!(result.err(), Some(StartupError::NoStrands));

        let mut strands = [Strand::<Rgb, 20>::new(StrandConfig::DEFAULT)];
        let result = prepare_display(
            &mut strands[..],
            RecordingDriver::default(),
            Mask::<20>::new(19).unwrap(),
            display_config(),
        );
        assert_eq!(
            result.err(),
            Some(StartupError::Mask(MaskError::LengthMismatch {
                expected: 20,
                actual: 19
            }))
        );
    }

    #[test]
    fn test_time_source_refresh() {
        let flag = ConnectivityFlag::new();

        let mut network = NoNetwork;
        let clock = FixedClock(0);
        let mut time = TimeSource {
            network: &mut network,
            connectivity: &flag,
            clock: &clock,
            config: ClockSyncConfig::DEFAULT,
        };
        assert_eq!(
            block_on(time.refresh(&mut NoDelay)),
            SyncOutcome::NetworkUnavailable
        );

        let clock = FixedClock(1_700_000_000);
        let mut time = TimeSource {
            network: &mut network,
            connectivity: &flag,
            clock: &clock,
            config: ClockSyncConfig::DEFAULT,
        };
        assert_eq!(
            block_on(time.refresh(&mut NoDelay)),
            SyncOutcome::AlreadySet { year: 2023 }
        );
    }

    /// Run the clock until `limit` sleeps, returning the sleeps and frames
    fn run_clock_until(
        time: TimeSource<'_, NoNetwork, CountingClock>,
        limit: usize,
    ) -> (Vec<u32>, usize) {
        let mut strands = [Strand::<Rgb, 20>::new(StrandConfig::DEFAULT)];
        let flushed = Cell::new(0);
        let stopped = Cell::new(false);
        let mut delay = StoppingDelay {
            sleeps: Vec::new(),
            limit,
            stopped: &stopped,
        };
        let stop = poll_fn(|_| {
            if stopped.get() {
                Poll::Ready(())
            } else {
                Poll::Pending
            }
        });

        let run = run_clock(
            &mut strands[..],
            CountingDriver { flushed: &flushed },
            time,
            &mut delay,
            Mask::<20>::single(20, 0).unwrap(),
            display_config(),
        );
        let result = block_on(select(run, stop));
        assert!(matches!(result, Either::Second(())));
        assert!(strands[0].is_initialized());

        (delay.sleeps, flushed.get())
    }

    #[test]
    fn test_run_clock_logs_time_while_running() {
        let flag = ConnectivityFlag::new();
        let mut network = NoNetwork;
        let clock = CountingClock {
            time: 1_700_000_000,
            reads: Cell::new(0),
        };
        let time = TimeSource {
            network: &mut network,
            connectivity: &flag,
            clock: &clock,
            config: ClockSyncConfig::DEFAULT,
        };

        let (sleeps, flushed) = run_clock_until(time, 12);

        assert_eq!(TIME_LOG_INTERVAL, Duration::from_millis(2500));
        assert_eq!(sleeps, vec![500_000; 12]);
        assert_eq!(flushed, 12);
        // One read deciding the clock is set, then one every 5 frames: 0, 5, 10
        assert_eq!(clock.reads.get(), 4);
    }

    #[test]
    fn test_run_clock_starts_display_when_sync_fails() {
        let flag = ConnectivityFlag::new();
        let mut network = NoNetwork;
        let clock = CountingClock {
            time: 0,
            reads: Cell::new(0),
        };
        let time = TimeSource {
            network: &mut network,
            connectivity: &flag,
            clock: &clock,
            config: ClockSyncConfig::DEFAULT,
        };

        let (sleeps, flushed) = run_clock_until(time, 3);

        assert_eq!(sleeps, vec![500_000; 3]);
        assert_eq!(flushed, 3);
        assert!(clock.reads.get() >= 2);
    }

    #[test]
    fn test_run_clock_returns_startup_errors() {
        let flag = ConnectivityFlag::new();
        let mut network = NoNetwork;
        let clock = FixedClock(1_700_000_000);
        let time = TimeSource {
            network: &mut network,
            connectivity: &flag,
            clock: &clock,
            config: ClockSyncConfig::DEFAULT,
        };
        let mut strands = [Strand::<Rgb, 20>::new(StrandConfig::DEFAULT)];

        let result = block_on(run_clock(
            &mut strands[..],
            RecordingDriver::default(),
            time,
            &mut NoDelay,
            Mask::<20>::new(5).unwrap(),
            display_config(),
        ));
        assert_eq!(
            result.err(),
            Some(StartupError::Mask(MaskError::LengthMismatch {
                expected: 20,
                actual: 5
            }))
        );
    }
}
