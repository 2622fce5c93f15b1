use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{FixedOffset, NaiveDate, Utc};
use mortgage_core::share::{
    decode_share_state, default_mortgage, default_portfolio, encode_share_state,
    restore_portfolio, share_param, share_url,
};
use mortgage_core::{calculate_mortgage_details, Mortgage, MortgageError, MortgageType, SinglePayment};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn amsterdam_summer() -> FixedOffset {
    FixedOffset::east_opt(2 * 3600).unwrap()
}

fn portfolio() -> Vec<Mortgage> {
    vec![
        Mortgage::new(dec!(300_000), dec!(3.5), dec!(30), date(2024, 1, 1))
            .with_id("mortgage-1")
            .with_name("Primary Mortgage")
            .with_extra_payment(dec!(200))
            .with_single_payments(vec![
                SinglePayment {
                    id: "payment-1".into(),
                    amount: dec!(10_000),
                    date: date(2026, 3, 1),
                },
                SinglePayment {
                    id: "payment-2".into(),
                    amount: dec!(2_500.50),
                    date: date(2027, 11, 1),
                },
            ]),
        Mortgage::new(dec!(75_000), dec!(5.1), dec!(12), date(2023, 9, 1))
            .with_id("mortgage-2")
            .with_name("Holiday home")
            .with_type(MortgageType::Linear),
    ]
}

#[test]
fn test_shared_portfolio_produces_identical_results() {
    let original = portfolio();
    let tz = amsterdam_summer();
    let url = share_url("https://mortgage.example/", &original, &tz).unwrap();
    let restored = decode_share_state(&share_param(&url), date(2030, 1, 1), &tz).unwrap();

    assert_eq!(restored, original);
    for (a, b) in original.iter().zip(&restored) {
        assert_eq!(
            calculate_mortgage_details(a, true),
            calculate_mortgage_details(b, true)
        );
    }
}

#[test]
fn test_payload_written_by_the_browser_decodes() {
    // Shape produced by JSON.stringify on the front end: no `type`, JS
    // timestamps, numbers as plain JSON numbers.
    let json = r#"[{
        "id": "mortgage-1",
        "name": "Primary Mortgage",
        "amount": 300000,
        "interestRate": 3.5,
        "term": 30,
        "extraPayment": 200,
        "startDate": "2024-01-01T00:00:00.000Z",
        "singlePayments": [{"id": "1718000000000", "amount": 5000, "date": "2025-06-10T00:00:00.000Z"}]
    }]"#;
    let decoded = decode_share_state(&STANDARD.encode(json), date(2024, 9, 1), &Utc).unwrap();

    let expected = Mortgage::new(dec!(300_000), dec!(3.5), dec!(30), date(2024, 1, 1))
        .with_id("mortgage-1")
        .with_name("Primary Mortgage")
        .with_extra_payment(dec!(200))
        .with_single_payments(vec![SinglePayment {
            id: "1718000000000".into(),
            amount: dec!(5000),
            date: date(2025, 6, 10),
        }]);
    assert_eq!(decoded, vec![expected]);
}

#[test]
fn test_link_from_east_of_utc_keeps_payment_month() {
    // toISOString() in a UTC+2 browser moves local midnight on 1 June to the
    // previous UTC day.
    let json = r#"[{
        "amount": 200000, "interestRate": 4, "term": 20, "extraPayment": 0,
        "startDate": "2024-02-29T23:00:00.000Z",
        "singlePayments": [{"amount": 25000, "date": "2024-05-31T22:00:00.000Z"}]
    }]"#;
    let decoded = decode_share_state(&STANDARD.encode(json), date(2024, 9, 1), &amsterdam_summer()).unwrap();
    let mortgage = &decoded[0];
    assert_eq!(mortgage.start_date, date(2024, 3, 1));
    assert_eq!(mortgage.single_payments[0].date, date(2024, 6, 1));

    let entered = Mortgage::new(dec!(200_000), dec!(4), dec!(20), date(2024, 3, 1))
        .with_single_payment(dec!(25_000), date(2024, 6, 1));
    let shared = calculate_mortgage_details(mortgage, true);
    let expected = calculate_mortgage_details(&entered, true);
    assert_eq!(shared.new_term, expected.new_term);
    assert_eq!(shared.interest_saved, expected.interest_saved);
    assert_eq!(shared.schedule[3].single_payment, dec!(25_000));
}

#[test]
fn test_not_a_list_is_rejected() {
    let today = date(2024, 1, 1);
    for json in ["null", "42", r#""text""#, "[]", r#"{"mortgages": []}"#] {
        let err = decode_share_state(&STANDARD.encode(json), today, &Utc).unwrap_err();
        assert!(
            matches!(err, MortgageError::InvalidShareState(_)),
            "{json}: {err:?}"
        );
    }
}

#[test]
fn test_restore_notices() {
    let today = date(2024, 2, 1);

    let restored = restore_portfolio(Some("not-a-share-link!"), today, &Utc);
    assert_eq!(restored.mortgages, default_portfolio(today));
    assert!(restored.notice.is_some());

    let url = share_url("https://mortgage.example/", &portfolio(), &Utc).unwrap();
    let restored = restore_portfolio(Some(&url), today, &Utc);
    assert!(restored.from_share);
    assert_eq!(restored.mortgages.len(), 2);
}

#[test]
fn test_default_templates() {
    let today = date(2024, 2, 14);
    let primary = &default_portfolio(today)[0];
    assert_eq!(primary.id, "mortgage-1");
    assert_eq!(primary.amount, dec!(300_000));
    assert_eq!(primary.extra_payment, dec!(200));
    assert_eq!(primary.start_date, today);

    let added = default_mortgage(3, today);
    assert_eq!(added.id, "mortgage-3");
    assert_eq!(added.name, "Mortgage 3");
    assert_eq!(added.amount, dec!(200_000));
    assert_eq!(added.extra_payment, dec!(100));

    let encoded = encode_share_state(&[added.clone()], &Utc).unwrap();
    assert_eq!(decode_share_state(&encoded, today, &Utc).unwrap(), vec![added]);
}
