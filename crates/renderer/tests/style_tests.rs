//! Tests for color ramps: parsing from configuration and lookups.

use renderer::style::{hex_to_rgb, ColorRamp, ColorStop, YL_OR_RD};
use renderer::{Color, RenderError};

#[test]
fn test_yl_or_rd_stops_are_even() {
    let ramp = ColorRamp::yl_or_rd();
    assert_eq!(ramp.name, "YlOrRd");
    assert_eq!(ramp.stops.len(), YL_OR_RD.len());
    assert_eq!(ramp.stops[0].position, 0.0);
    assert_eq!(ramp.stops[4].position, 0.5);
    assert_eq!(ramp.stops[8].position, 1.0);
}

#[test]
fn test_every_stop_color_is_hit_exactly() {
    let ramp = ColorRamp::yl_or_rd().compile().unwrap();
    for (i, hex) in YL_OR_RD.iter().enumerate() {
        let (r, g, b) = hex_to_rgb(hex).unwrap();
        assert_eq!(ramp.color_at(i as f32 / 8.0), Color::rgb(r, g, b), "stop {}", hex);
    }
}

#[test]
fn test_lookup_clamps_out_of_range() {
    let ramp = ColorRamp::yl_or_rd().compile().unwrap();
    assert_eq!(ramp.color_at(-3.0), Color::rgb(255, 255, 204));
    assert_eq!(ramp.color_at(42.0), Color::rgb(128, 0, 38));
}

#[test]
fn test_custom_ramp_from_yaml() {
    let yaml = r##"
name: greens
stops:
  - position: 1.0
    color: "#006d2c"
  - position: 0.0
    color: "#edf8e9"
"##;
    let ramp: ColorRamp = serde_yaml::from_str(yaml).unwrap();
    let compiled = ramp.compile().unwrap();

    // Stops are sorted by position when compiled.
    assert_eq!(compiled.color_at(0.0), Color::rgb(237, 248, 233));
    assert_eq!(compiled.color_at(1.0), Color::rgb(0, 109, 44));
}

#[test]
fn test_invalid_ramps_are_rejected() {
    let bad_color = ColorRamp {
        name: "bad".into(),
        stops: vec![
            ColorStop {
                position: 0.0,
                color: "#000000".into(),
            },
            ColorStop {
                position: 1.0,
                color: "#zzzzzz".into(),
            },
        ],
    };
    assert_eq!(
        bad_color.compile(),
        Err(RenderError::InvalidColor("#zzzzzz".into()))
    );

    let bad_position = ColorRamp {
        name: "bad".into(),
        stops: vec![
            ColorStop {
                position: 0.0,
                color: "#000000".into(),
            },
            ColorStop {
                position: 1.5,
                color: "#ffffff".into(),
            },
        ],
    };
    assert!(matches!(
        bad_position.validate(),
        Err(RenderError::InvalidOption(_))
    ));
}
