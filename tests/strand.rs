mod tests {
    use strand_clock::{
        LedType, Rgb, Rgbw, Strand, StrandConfig, StrandError, StrandId, pixel_from_rgb,
    };

    const ALL_LED_TYPES: [LedType; 9] = [
        LedType::Ws2812V1,
        LedType::Ws2812bV1,
        LedType::Ws2812bV2,
        LedType::Ws2812bV3,
        LedType::Ws2813V1,
        LedType::Ws2813V2,
        LedType::Ws2813V3,
        LedType::Sk6812V1,
        LedType::Sk6812wV1,
    ];

    #[test]
    fn test_led_type_names() {
        for led_type in ALL_LED_TYPES {
            assert_eq!(LedType::parse_from_str(led_type.as_str()), Some(led_type));
        }
        assert_eq!(LedType::Ws2812bV3.as_str(), "ws2812b_v3");
        assert_eq!(LedType::parse_from_str("apa102"), None);
    }

    #[test]
    fn test_led_type_from_raw() {
        assert_eq!(LedType::from_raw(3), Some(LedType::Ws2812bV3));
        assert_eq!(LedType::from_raw(8), Some(LedType::Sk6812wV1));
        assert_eq!(LedType::from_raw(9), None);
    }

    #[test]
    fn test_led_type_channels() {
        assert_eq!(LedType::Ws2812bV3.channels(), 3);
        assert_eq!(LedType::Sk6812V1.channels(), 3);
        assert_eq!(LedType::Sk6812wV1.channels(), 4);
    }

    #[test]
    fn test_default_config() {
        let config = StrandConfig::default();
        assert_eq!(config.id(), StrandId { channel: 0, gpio: 17 });
        assert_eq!(config.led_type, LedType::Ws2812bV3);
        assert_eq!(config.bright_limit, 32);
        assert_eq!(config.num_pixels, 20);
    }

    #[test]
    fn test_buffer_absent_before_initialize() {
        let mut strand: Strand<Rgb, 20> = Strand::new(StrandConfig::DEFAULT);
        assert!(!strand.is_initialized());
        assert_eq!(strand.pixels(), Err(StrandError::Uninitialized));
        assert_eq!(strand.pixels_mut().err(), Some(StrandError::Uninitialized));
        assert_eq!(strand.pixel_count(), 20);
    }

    #[test]
    fn test_initialize_allocates_dark_pixels() {
        let mut strand: Strand<Rgb, 32> = Strand::new(StrandConfig::DEFAULT);
        strand.initialize().unwrap();

        let pixels = strand.pixels().unwrap();
        assert_eq!(pixels.len(), 20);
        assert!(pixels.iter().all(|pixel| *pixel == Rgb::default()));
    }

    #[test]
    fn test_reinitialize_resets_buffer() {
        let mut strand: Strand<Rgb, 20> = Strand::new(StrandConfig::DEFAULT);
        strand.initialize().unwrap();
        strand.pixels_mut().unwrap()[5] = pixel_from_rgb(1, 2, 3);

        strand.initialize().unwrap();
        assert_eq!(strand.pixels().unwrap()[5], Rgb::default());
    }

    #[test]
    fn test_initialize_rejects_overflow() {
        let mut strand: Strand<Rgb, 10> = Strand::new(StrandConfig::DEFAULT);
        assert_eq!(
            strand.initialize(),
            Err(StrandError::TooManyPixels {
                requested: 20,
                capacity: 10
            })
        );
        assert!(!strand.is_initialized());
    }

    #[test]
    fn test_initialize_checks_color_channels() {
        let mut rgbw_on_rgb: Strand<Rgbw, 20> = Strand::new(StrandConfig::DEFAULT);
        assert_eq!(
            rgbw_on_rgb.initialize(),
            Err(StrandError::ChannelMismatch {
                led_type_channels: 3,
                color_channels: 4
            })
        );

        let mut rgbw: Strand<Rgbw, 20> = Strand::new(StrandConfig {
            led_type: LedType::Sk6812wV1,
            ..StrandConfig::DEFAULT
        });
        rgbw.initialize().unwrap();
        assert_eq!(rgbw.pixels().unwrap().len(), 20);
    }
}
