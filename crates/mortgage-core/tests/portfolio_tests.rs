use chrono::NaiveDate;
use mortgage_core::portfolio::{analyze_portfolio, summarize_portfolio, unified_timeline, PortfolioInput};
use mortgage_core::{calculate_mortgage_details, Mortgage, MortgageError, MortgageType};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn date(y: i32, m: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, 1).unwrap()
}

fn household() -> Vec<Mortgage> {
    vec![
        Mortgage::new(dec!(300_000), dec!(3.5), dec!(30), date(2024, 1))
            .with_id("mortgage-1")
            .with_name("Primary Mortgage")
            .with_extra_payment(dec!(200)),
        Mortgage::new(dec!(100_000), dec!(4.5), dec!(10), date(2024, 6))
            .with_id("mortgage-2")
            .with_name("Renovation")
            .with_type(MortgageType::Linear),
    ]
}

// ===========================================================================
// Aggregation
// ===========================================================================

#[test]
fn test_portfolio_totals() {
    let mortgages = household();
    let summary = summarize_portfolio(&mortgages);

    assert_eq!(summary.total_amount, dec!(400_000));
    assert_eq!(summary.total_extra_payment, dec!(200));
    assert_eq!(summary.mortgages.len(), 2);
    assert_eq!(summary.mortgages[0].id, "mortgage-1");

    let primary = calculate_mortgage_details(&mortgages[0], false);
    let renovation = calculate_mortgage_details(&mortgages[1], false);
    assert_eq!(
        summary.total_interest,
        primary.total_interest + renovation.total_interest
    );
    let expected_cost = dec!(400_000) + primary.total_interest + renovation.total_interest;
    assert!((summary.total_cost - expected_cost).abs() < dec!(0.000001));
    assert!(summary.total_interest_saved > Decimal::ZERO);
    assert!(summary.new_total_interest < summary.total_interest);
}

#[test]
fn test_portfolio_weighted_terms() {
    let summary = summarize_portfolio(&household());

    // (30·300k + 10·100k) / 400k = 25
    assert_eq!(summary.weighted_term, dec!(25));
    // (3.5·300k + 4.5·100k) / 400k = 3.75
    assert_eq!(summary.weighted_interest_rate, dec!(3.75));
    // Only the primary mortgage pays extra, so only its term shrinks.
    assert!(summary.weighted_new_term < summary.weighted_term);
    assert!(summary.weighted_new_term > dec!(20));
}

#[test]
fn test_portfolio_of_degenerate_mortgages() {
    let mortgages = vec![
        Mortgage::new(Decimal::ZERO, dec!(3), dec!(30), date(2024, 1)),
        Mortgage::new(Decimal::ZERO, dec!(4), dec!(20), date(2024, 1)),
    ];
    let summary = summarize_portfolio(&mortgages);
    assert_eq!(summary.total_amount, Decimal::ZERO);
    assert_eq!(summary.weighted_term, Decimal::ZERO);
    assert_eq!(summary.weighted_new_term, Decimal::ZERO);
    assert_eq!(summary.total_interest_saved, Decimal::ZERO);

    let out = analyze_portfolio(&PortfolioInput { mortgages }).unwrap();
    assert_eq!(out.warnings.len(), 3, "{:?}", out.warnings);
    assert!(out.warnings[2].contains("weighted averages"));
}

#[test]
fn test_empty_portfolio_is_an_error() {
    let err = analyze_portfolio(&PortfolioInput { mortgages: vec![] }).unwrap_err();
    assert!(matches!(err, MortgageError::InsufficientData(_)));
}

// ===========================================================================
// Timeline
// ===========================================================================

#[test]
fn test_unified_timeline_covers_every_schedule() {
    let mortgages = household();
    let timeline = unified_timeline(&mortgages);

    let primary_months = calculate_mortgage_details(&mortgages[0], true).schedule.len();
    assert_eq!(timeline.len(), primary_months + 120);
    assert!(timeline.windows(2).all(|w| w[0].date <= w[1].date));

    let first_renovation = timeline
        .iter()
        .find(|e| e.mortgage_id == "mortgage-2")
        .unwrap();
    assert_eq!(first_renovation.date, date(2024, 6));
    assert_eq!(first_renovation.mortgage_name, "Renovation");
    assert_eq!(first_renovation.principal, dec!(100_000) / dec!(120));
}
