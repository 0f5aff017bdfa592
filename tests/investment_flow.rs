use estate_token_demo::domain::catalog::{
    Category, Financials, ListingId, ListingRecord, ListingStatus, Location,
};
use estate_token_demo::domain::errors::{DomainError, TransitionError, ValidationError};
use estate_token_demo::domain::events::{InMemoryEventDispatcher, InvestmentEvent};
use estate_token_demo::domain::investment::{
    AmountPolicy, InvestAction, InvestmentSession, InvestmentSettings, RetryPolicy, TransactionState, TransactionStep,
};
use estate_token_demo::domain::session::WalletConnection;
use estate_token_demo::infrastructure::{DemoWallet, FailureInjection, ImmediateTimer, SimulatedSettlementGateway};
use futures::executor::block_on;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

fn lofts() -> ListingRecord {
    ListingRecord {
        id: ListingId::from("stockholm-waterfront-lofts"),
        name: "Stockholm Waterfront Lofts".into(),
        symbol: None,
        location: Location {
            city: "Stockholm".into(),
            country: "Sweden".into(),
        },
        category: Category::Residential,
        status: ListingStatus::Funding,
        financials: Financials {
            total_value: 12_500_000.0,
            token_price: 100.0,
            total_tokens: 125_000,
            available_tokens: 50,
            minimum_investment: 500.0,
            estimated_yield: 6.9,
            annual_rent: None,
            expenses: None,
        },
        market: None,
        funding_deadline: None,
        funding_progress: 99.9,
        network: "Polygon".into(),
        token_symbol: Some("SWL".into()),
        is_favorite: false,
    }
}

fn gateway(failure: FailureInjection) -> SimulatedSettlementGateway<ImmediateTimer> {
    SimulatedSettlementGateway::new(ImmediateTimer::new(), Duration::from_millis(3_000))
        .with_failure(failure)
        .with_seed(42)
}

#[test]
fn opens_in_input_at_minimum() {
    let session = InvestmentSession::open(&lofts(), InvestmentSettings::default()).unwrap();
    assert_eq!(session.step(), TransactionStep::Input);
    assert_eq!(session.amount(), 500.0);
    assert_eq!(session.tokens(), 5);
}

#[test]
fn oversized_amount_clamps_to_available_supply() {
    let mut session = InvestmentSession::open(&lofts(), InvestmentSettings::default()).unwrap();
    assert_eq!(session.set_amount(10_000.0).unwrap(), 5_000.0);
    assert_eq!(session.tokens(), 50);

    assert_eq!(session.set_amount(10.0).unwrap(), 500.0);
    assert_eq!(session.tokens(), 5);
}

#[test]
fn reject_policy_reports_out_of_range() {
    let settings = InvestmentSettings {
        amount_policy: AmountPolicy::Reject,
        ..InvestmentSettings::default()
    };
    let mut session = InvestmentSession::open(&lofts(), settings).unwrap();
    let err = session.set_amount(10_000.0).unwrap_err();
    assert_eq!(
        err,
        DomainError::Validation(ValidationError::AmountOutOfRange {
            amount: 10_000.0,
            minimum: 500.0,
            maximum: 5_000.0,
        })
    );
    assert_eq!(session.amount(), 500.0);
    assert_eq!(session.set_amount(2_000.0).unwrap(), 2_000.0);
}

#[test]
fn non_finite_amount_is_rejected_under_both_policies() {
    let mut session = InvestmentSession::open(&lofts(), InvestmentSettings::default()).unwrap();
    assert_eq!(
        session.set_amount(f64::NAN),
        Err(DomainError::Validation(ValidationError::NonFiniteAmount))
    );
}

#[test]
fn quote_adds_the_flat_fee() {
    let mut session = InvestmentSession::open(&lofts(), InvestmentSettings::default()).unwrap();
    session.set_amount(1_000.0).unwrap();
    let quote = session.quote().unwrap();
    assert_eq!(quote.tokens, 10);
    assert!((quote.total - 1_000.05).abs() < 1e-9);
    assert!((quote.estimated_annual_return - 69.0).abs() < 1e-9);
}

#[test]
fn sold_out_listing_cannot_be_opened() {
    let mut listing = lofts();
    listing.financials.available_tokens = 0;
    assert!(matches!(
        InvestmentSession::open(&listing, InvestmentSettings::default()),
        Err(DomainError::Validation(ValidationError::NoAvailableSupply(_)))
    ));
}

#[test]
fn disconnected_wallet_triggers_connect_flow() {
    let mut session = InvestmentSession::open(&lofts(), InvestmentSettings::default()).unwrap();
    let mut wallet = DemoWallet::disconnected();

    assert_eq!(session.invest(&mut wallet).unwrap(), InvestAction::ConnectionRequested);
    assert_eq!(session.step(), TransactionStep::Input);
    assert!(wallet.is_pending());

    wallet.complete_connection("0x00000000000000000000000000000000000000aa");
    assert_eq!(session.invest(&mut wallet).unwrap(), InvestAction::AwaitingConfirmation);
    assert_eq!(session.step(), TransactionStep::Confirm);
}

#[test]
fn back_returns_to_input_and_keeps_amount() {
    let mut session = InvestmentSession::open(&lofts(), InvestmentSettings::default()).unwrap();
    let mut wallet = DemoWallet::connected("0xabc");
    session.set_amount(2_500.0).unwrap();
    session.invest(&mut wallet).unwrap();

    assert!(session.set_amount(3_000.0).is_err());
    session.back().unwrap();
    assert_eq!(session.step(), TransactionStep::Input);
    assert_eq!(session.amount(), 2_500.0);
}

#[test]
fn happy_path_reaches_success_with_transaction_id() {
    let mut session = InvestmentSession::open(&lofts(), InvestmentSettings::default()).unwrap();
    let mut wallet = DemoWallet::connected("0xabc");
    let mut gateway = gateway(FailureInjection::Never);
    let timer = ImmediateTimer::new();

    session.set_amount(10_000.0).unwrap();
    session.invest(&mut wallet).unwrap();
    let step = block_on(session.confirm(&mut gateway, &timer)).unwrap();

    assert_eq!(step, TransactionStep::Success);
    match session.state() {
        TransactionState::Success(outcome) => {
            assert!(!outcome.transaction_id.value().is_empty());
            assert!(outcome.transaction_id.value().starts_with("0x"));
            assert_eq!(outcome.tokens_received, 50);
            assert_eq!(outcome.amount, 5_000.0);
            assert_eq!(outcome.attempts, 1);
        }
        other => panic!("expected success, got {other:?}"),
    }
    assert_eq!(
        session.transitions(),
        &[
            (TransactionStep::Input, TransactionStep::Confirm),
            (TransactionStep::Confirm, TransactionStep::Processing),
            (TransactionStep::Processing, TransactionStep::Success),
        ]
    );
}

#[test]
fn confirm_outside_confirm_step_is_a_transition_error() {
    let mut session = InvestmentSession::open(&lofts(), InvestmentSettings::default()).unwrap();
    let mut gateway = gateway(FailureInjection::Never);
    let err = block_on(session.confirm(&mut gateway, &ImmediateTimer::new())).unwrap_err();
    assert_eq!(
        err,
        DomainError::Transition(TransitionError {
            step: TransactionStep::Input,
            action: "confirm",
        })
    );
    assert_eq!(gateway.submissions(), 0);
}

#[test]
fn failed_settlement_lands_in_error_and_retry_resets_to_input() {
    let settings = InvestmentSettings {
        retry: RetryPolicy::no_retry(),
        ..InvestmentSettings::default()
    };
    let mut session = InvestmentSession::open(&lofts(), settings).unwrap();
    let mut wallet = DemoWallet::connected("0xabc");
    let mut gateway = gateway(FailureInjection::Always);

    session.set_amount(1_500.0).unwrap();
    session.invest(&mut wallet).unwrap();
    let step = block_on(session.confirm(&mut gateway, &ImmediateTimer::new())).unwrap();
    assert_eq!(step, TransactionStep::Error);
    match session.state() {
        TransactionState::Error(failure) => {
            assert_eq!(failure.attempts, 1);
            assert!(failure.reason.contains("unavailable"));
        }
        other => panic!("expected error, got {other:?}"),
    }

    session.retry().unwrap();
    assert_eq!(session.step(), TransactionStep::Input);
    assert_eq!(session.amount(), 1_500.0);
}

#[test]
fn transitions_are_published() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut dispatcher = InMemoryEventDispatcher::new();
    let sink = seen.clone();
    dispatcher.subscribe_to_investment_events(move |event| {
        if let InvestmentEvent::StateChanged { to, .. } = event {
            sink.borrow_mut().push(*to);
        }
    });

    let mut session = InvestmentSession::open(&lofts(), InvestmentSettings::default())
        .unwrap()
        .with_dispatcher(Rc::new(dispatcher));
    let mut wallet = DemoWallet::connected("0xabc");
    session.invest(&mut wallet).unwrap();
    session.back().unwrap();

    assert_eq!(*seen.borrow(), vec![TransactionStep::Confirm, TransactionStep::Input]);
}

#[test]
fn connected_wallet_address_lands_in_snapshot() {
    let mut session = InvestmentSession::open(&lofts(), InvestmentSettings::default()).unwrap();
    let mut wallet = DemoWallet::auto_approving();
    assert_eq!(session.invest(&mut wallet).unwrap(), InvestAction::ConnectionRequested);
    session.invest(&mut wallet).unwrap();
    match session.state() {
        TransactionState::Confirm(snapshot) => {
            assert_eq!(Some(snapshot.wallet_address.as_str()), wallet.address());
            assert_eq!(snapshot.network, "Polygon");
        }
        other => panic!("expected confirm, got {other:?}"),
    }
}
