use super::*;

#[test]
fn format_number_thresholds() {
    assert_eq!(format_number(None), "0");
    assert_eq!(format_number(Some(999)), "999");
    assert_eq!(format_number(Some(1_000)), "1.0K");
    assert_eq!(format_number(Some(125_000)), "125.0K");
    assert_eq!(format_number(Some(2_500_000)), "2.5M");
    assert_eq!(format_number(Some(3_200_000_000)), "3.2B");
}

#[test]
fn format_percent_keeps_scale() {
    assert_eq!(format_percent(Some(4.2)), "4.2%");
}

#[test]
fn trend_follows_sign() {
    assert_eq!(Trend::of(Some(12.5)), Trend::Up);
    assert_eq!(Trend::of(Some(-0.1)), Trend::Down);
    assert_eq!(Trend::of(Some(0.0)), Trend::Flat);
    assert_eq!(Trend::of(None), Trend::Flat);
}

#[test]
fn format_growth_signs_and_arrows() {
    assert_eq!(format_growth(Some(12.5)), "+12.5% ↗");
    assert_eq!(format_growth(Some(-3.0)), "-3.0% ↘");
    assert_eq!(format_growth(None), "n/a →");
}
