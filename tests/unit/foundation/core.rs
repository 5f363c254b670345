use super::*;

#[test]
fn round_to_one_decimal_rounds_half_away_from_zero() {
    assert_eq!(round_to(5.25, 1), 5.3);
    assert_eq!(round_to(5.24, 1), 5.2);
    assert_eq!(round_to(-1.25, 1), -1.3);
    assert_eq!(round_to(5.25, 2), 5.25);
}

#[test]
fn time_span_rejects_inverted_and_non_finite_bounds() {
    assert!(TimeSpan::new(2.0, 1.0).is_err());
    assert!(TimeSpan::new(f64::NAN, 1.0).is_err());
    assert!(TimeSpan::new(0.0, f64::INFINITY).is_err());
    let s = TimeSpan::new(1.0, 1.0).unwrap();
    assert!(s.is_empty());
}

#[test]
fn time_span_at_measures_its_length() {
    let s = TimeSpan::at(5.0, 4.0);
    assert_eq!(s.end, 9.0);
    assert_eq!(s.len(), 4.0);
    assert!(!s.is_empty());
}

#[test]
fn fps_validation_and_frame_conversion() {
    assert!(Fps::new(30, 0).is_err());
    assert!(Fps::new(0, 1).is_err());
    let fps = Fps::new(30000, 1001).unwrap();
    assert_eq!(fps.secs_to_frames_round(10.0), 300);
    assert_eq!(Fps::default().secs_to_frames_round(1.5), 45);
}

#[test]
fn aspect_maps_to_full_hd_canvases() {
    assert_eq!(Aspect::Portrait.canvas().height, 1920);
    assert_eq!(Aspect::Square.canvas().width, 1080);
    assert_eq!(Canvas::default(), Aspect::Landscape.canvas());
}
