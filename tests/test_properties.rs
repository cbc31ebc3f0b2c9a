//! Property checks for colors and coordinate mapping.

use labelgen::color::normalize;
use labelgen::{Color, PageSize, Point};
use proptest::prelude::*;

proptest! {
    #[test]
    fn prop_hex_roundtrip(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
        let color = Color::new(r, g, b);
        let parsed = normalize(color.to_hex().as_str()).unwrap();
        prop_assert_eq!(parsed, color);
    }

    #[test]
    fn prop_integer_triples_in_range(r in 0i32..=255, g in 0i32..=255, b in 0i32..=255) {
        let color = normalize((r, g, b)).unwrap();
        prop_assert_eq!(color.to_array(), [r as u8, g as u8, b as u8]);
    }

    #[test]
    fn prop_out_of_range_rejected(r in 256i32..10_000, g in 0i32..=255) {
        prop_assert!(normalize((r, g, 0)).is_err());
        prop_assert!(normalize((g, -r, 0)).is_err());
    }

    #[test]
    fn prop_flip_is_involution(
        w in 1.0f32..1000.0,
        h in 1.0f32..1000.0,
        x in -500.0f32..500.0,
        y in -500.0f32..500.0,
    ) {
        let page = PageSize { width: w, height: h };
        let p = Point::new(x, y);
        let flipped = page.flip(p);
        prop_assert_eq!(flipped.x, x);
        prop_assert!((flipped.y - (h - y)).abs() < 1e-3);
        let back = page.flip(flipped);
        prop_assert!((back.y - y).abs() < 1e-2);
    }
}
