use estate_token_demo::domain::catalog::Financials;
use estate_token_demo::domain::errors::{ComputationError, DomainError, ValidationError};
use estate_token_demo::domain::metrics::{
    Holding, OrderKind, OrderSide, OrderTicket, PortfolioSummary, ReturnProjection, ReturnsCalculator,
    cap_rate_percent, estimated_annual_return, round_to_cents, token_count,
};

fn financials(total_value: f64, annual_rent: Option<f64>, expenses: Option<f64>) -> Financials {
    Financials {
        total_value,
        token_price: 250.0,
        total_tokens: 80_000,
        available_tokens: 44_000,
        minimum_investment: 1_000.0,
        estimated_yield: 7.4,
        annual_rent,
        expenses,
    }
}

#[test]
fn cap_rate_of_the_reference_building() {
    let f = financials(20_000_000.0, Some(1_000_000.0), Some(200_000.0));
    let rate = cap_rate_percent(&f).unwrap();
    assert!((rate - 4.0).abs() < 1e-12);
}

#[test]
fn cap_rate_of_zero_valued_asset_is_an_error() {
    let f = financials(0.0, Some(1_000_000.0), None);
    assert_eq!(cap_rate_percent(&f), Err(ComputationError::DivisionByZero("cap rate")));
}

#[test]
fn token_count_floors() {
    assert_eq!(token_count(5_000.0, 100.0), Ok(50));
    assert_eq!(token_count(599.99, 100.0), Ok(5));
    assert_eq!(token_count(100.0, 0.0), Err(ComputationError::DivisionByZero("token count")));
    assert!(token_count(-1.0, 100.0).is_err());
}

#[test]
fn projection_for_ten_thousand_at_platform_yield() {
    let projection = ReturnsCalculator::new(7.2).project(10_000.0).unwrap().rounded();
    assert_eq!(projection.annual_income, 720.0);
    assert_eq!(projection.quarterly_dividend, 180.0);
    assert_eq!(projection.five_year_value, 14_157.09);
}

#[test]
fn projection_rejects_negative_principal() {
    assert!(matches!(
        ReturnProjection::compute(-1.0, 7.2),
        Err(ComputationError::InvalidInput(_))
    ));
    assert!(ReturnProjection::compute(f64::NAN, 7.2).is_err());
}

#[test]
fn calculator_input_parsing() {
    let calculator = ReturnsCalculator::new(7.2);
    assert_eq!(calculator.project_input("").unwrap().annual_income, 0.0);
    assert_eq!(
        round_to_cents(calculator.project_input("25,000").unwrap().annual_income),
        1_800.0
    );
    assert!(matches!(
        calculator.project_input("lots"),
        Err(DomainError::Validation(ValidationError::UnparsableAmount(_)))
    ));
}

#[test]
fn annual_return_is_principal_times_yield() {
    let value = estimated_annual_return(5_000.0, 8.2).unwrap();
    assert!((value - 410.0).abs() < 1e-9);
}

#[test]
fn portfolio_totals_and_allocation() {
    let holdings = vec![
        Holding {
            symbol: "OTP".into(),
            name: "Oslo Tech Park".into(),
            tokens: 10,
            avg_price: 180.0,
            current_price: 198.5,
        },
        Holding {
            symbol: "CPR".into(),
            name: "Copenhagen Residences".into(),
            tokens: 20,
            avg_price: 55.0,
            current_price: 52.3,
        },
    ];
    let summary = PortfolioSummary::from_holdings(&holdings).unwrap();
    assert!((summary.total_value - 3_031.0).abs() < 1e-9);
    assert!((summary.total_invested - 2_900.0).abs() < 1e-9);
    assert!((summary.total_return - 131.0).abs() < 1e-9);

    let allocation: f64 = summary.holdings.iter().map(|h| h.allocation_percent).sum();
    assert!((allocation - 100.0).abs() < 1e-9);
    assert!(summary.holdings[1].pnl < 0.0);
}

#[test]
fn empty_portfolio_is_all_zeros() {
    let summary = PortfolioSummary::from_holdings(&[]).unwrap();
    assert_eq!(summary.total_value, 0.0);
    assert_eq!(summary.return_percent, 0.0);
    assert!(summary.holdings.is_empty());
}

#[test]
fn limit_order_uses_its_price() {
    let ticket = OrderTicket {
        side: OrderSide::Sell,
        kind: OrderKind::Limit,
        limit_price: Some(110.0),
        amount: 4.0,
    };
    let quote = ticket.quote(105.2).unwrap();
    assert_eq!(quote.price, 110.0);
    assert!((quote.total - 440.0).abs() < 1e-9);
    assert!((quote.fee - 0.44).abs() < 1e-9);
}
