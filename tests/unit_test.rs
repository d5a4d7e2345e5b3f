mod helpers;

use collector_backend::bot::conversation::{ConversationState, Stage};
use collector_backend::bot::presenter;
use collector_backend::bot::{ExpenseParser, PurchaseParser};
use collector_backend::debts::*;
use collector_backend::error::{AppError, RepositoryError};
use collector_backend::models::*;
use collector_backend::services::purchase_service::dedup_ids;

fn record(purchase_id: i64, consumer: &str, buyer: &str) -> ConsumptionRecord {
    let id = |name: &str| name.bytes().map(i64::from).sum::<i64>();
    ConsumptionRecord {
        purchase_id,
        consumer_id: id(consumer),
        consumer_name: consumer.to_string(),
        buyer_id: id(buyer),
        buyer_name: buyer.to_string(),
    }
}

fn settle(items: Vec<CatalogItem>, records: Vec<ConsumptionRecord>) -> Ledger {
    let catalog = index_catalog(items);
    let participants = group_by_consumer(records);
    DebtCalculator::new(&participants, &catalog)
        .calculate_checked()
        .unwrap()
}

// ============================================================================
// Debt settlement
// ============================================================================

#[test]
fn test_beer_and_water_between_two_users() {
    let ledger = settle(
        vec![
            CatalogItem::new(1, "Beer", 250, 1),
            CatalogItem::new(2, "Water", 100, 1),
        ],
        vec![record(1, "user_1", "user_2"), record(2, "user_2", "user_1")],
    );

    assert_eq!(ledger.edge_count(), 1);
    let edge = ledger.get("user_1", "user_2").unwrap();
    assert_eq!(edge.total_amount, 150);
    assert_eq!(
        edge.history,
        vec![
            HistoryEntry {
                direction: Direction::Outgoing,
                item_title: "Beer".to_string(),
                amount: 250
            },
            HistoryEntry {
                direction: Direction::Incoming,
                item_title: "Water".to_string(),
                amount: 100
            },
        ]
    );
    assert!(ledger.get("user_2", "user_1").is_none());
}

#[test]
fn test_shared_pizza_bought_by_a_consumer() {
    let ledger = settle(
        vec![CatalogItem::new(1, "Pizza", 400, 2)],
        vec![record(1, "A", "A"), record(1, "B", "A")],
    );

    assert_eq!(ledger.get("B", "A").unwrap().total_amount, 200);
    assert!(ledger.get("A", "B").is_none());
    assert!(ledger.get("A", "A").is_none());
}

#[test]
fn test_remainder_is_not_redistributed() {
    let ledger = settle(
        vec![CatalogItem::new(1, "Vodka", 250, 3)],
        vec![
            record(1, "a", "d"),
            record(1, "b", "d"),
            record(1, "c", "d"),
        ],
    );

    assert_eq!(ledger.total_owed_to("d"), 249);
    for debtor in ["a", "b", "c"] {
        assert_eq!(ledger.get(debtor, "d").unwrap().total_amount, 83);
    }
}

#[test]
fn test_every_edge_is_positive() {
    let ledger = settle(
        vec![
            CatalogItem::new(1, "Beer", 100, 3),
            CatalogItem::new(2, "Chips", 90, 2),
            CatalogItem::new(3, "Cake", 300, 1),
        ],
        vec![
            record(1, "a", "b"),
            record(1, "b", "b"),
            record(1, "c", "b"),
            record(2, "a", "c"),
            record(2, "c", "c"),
            record(3, "b", "a"),
        ],
    );

    assert!(!ledger.is_empty());
    assert!(ledger.edges().all(|(_, _, edge)| edge.total_amount > 0));
}

#[test]
fn test_unknown_purchase_is_rejected() {
    let catalog = index_catalog(vec![]);
    let participants = group_by_consumer(vec![record(9, "a", "b")]);

    let result = DebtCalculator::new(&participants, &catalog).calculate_checked();

    assert!(matches!(result, Err(DebtError::UnknownPurchase { .. })));
}

// ============================================================================
// Input parsing and rendering
// ============================================================================

#[test]
fn test_parse_purchase_message() {
    let purchases = PurchaseParser::parse("Beer, 100, 3\n\nChips , 45").unwrap();

    assert_eq!(purchases.len(), 2);
    assert_eq!(purchases[0], NewPurchase::new("Beer", 100, 3));
    assert_eq!(purchases[1], NewPurchase::new("Chips", 45, 1));
    assert!(purchases.iter().all(|p| p.validate().is_ok()));
}

#[test]
fn test_negative_price_parses_but_fails_validation() {
    let purchases = PurchaseParser::parse("Refund, -10").unwrap();
    assert!(purchases[0].validate().is_err());
}

#[test]
fn test_parse_expense_message() {
    let expenses = ExpenseParser::parse("1 @bob @carol\n2").unwrap();

    assert_eq!(
        expenses[0].eaters,
        vec![
            EaterRef::Username("bob".to_string()),
            EaterRef::Username("carol".to_string())
        ]
    );
    assert_eq!(expenses[1].eaters, vec![EaterRef::Me]);
}

#[test]
fn test_render_purchase_list() {
    let session_id = uuid::Uuid::new_v4();
    let now = chrono::Utc::now().naive_utc();
    let purchases = vec![
        Purchase {
            id: 1,
            title: "Beer".to_string(),
            buyer_id: 1,
            session_id,
            price: 100,
            quantity: 1,
            created_at: now,
        },
        Purchase {
            id: 2,
            title: "Chips".to_string(),
            buyer_id: 2,
            session_id,
            price: 45,
            quantity: 1,
            created_at: now,
        },
    ];

    assert_eq!(
        presenter::render_purchases(&purchases),
        "1. Beer – 100\n2. Chips – 45"
    );
    assert_eq!(presenter::render_purchases(&[]), presenter::NO_PURCHASES);
}

#[test]
fn test_dedup_consumer_ids() {
    assert_eq!(dedup_ids(vec![1, 2, 1, 1, 3]), vec![1, 2, 3]);
}

// ============================================================================
// Conversation state
// ============================================================================

#[test]
fn test_conversation_stage_survives_other_users() {
    tokio_test::block_on(async {
        let state = ConversationState::new();
        state.begin(1, 10, Stage::Expenses).await;
        state.begin(2, 10, Stage::Purchases).await;

        assert_eq!(state.take(2, 10).await, Some(Stage::Purchases));
        assert_eq!(state.take(1, 10).await, Some(Stage::Expenses));
        assert_eq!(state.pending_count().await, 0);
    });
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_repository_errors_map_to_app_errors() {
    let err: AppError = RepositoryError::NotFound("session".into()).into();
    assert!(err.is_not_found());
    assert!(err.is_user_error());

    let err: AppError = RepositoryError::ConstraintViolation("price".into()).into();
    assert!(matches!(err, AppError::Validation(_)));

    let err: AppError = DebtError::ZeroConsumerCount {
        purchase_id: 3,
        title: "Beer".into(),
    }
    .into();
    assert!(!err.is_user_error());
}
