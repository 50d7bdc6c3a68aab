mod common;

use takeback_core::errors::CoreError;
use takeback_core::records::{BudgetPeriod, CardStatus};
use takeback_core::services::{
    BudgetPatch, BudgetService, CardBudgetService, CardPatch, CardService, NewTransaction,
    PolicyService, TransactionQuery, TransactionService,
};
use takeback_core::store::MemoryStore;

#[test]
fn budget_crud_and_validation() {
    let store = MemoryStore::new();
    let session = common::signup(&store, "casey@example.com");
    let account_id = session.account.id;

    let budget = BudgetService
        .create(
            &store,
            account_id,
            common::new_budget("Groceries", 400.0, BudgetPeriod::Monthly),
        )
        .unwrap();
    assert_eq!(budget.limit_amount, 400.0);

    let err = BudgetService
        .create(
            &store,
            account_id,
            common::new_budget("Broken", 0.0, BudgetPeriod::Weekly),
        )
        .unwrap_err();
    assert!(matches!(err, CoreError::InvalidInput(_)));

    let updated = BudgetService
        .update(
            &store,
            account_id,
            budget.id,
            BudgetPatch {
                limit_amount: Some(500.0),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(updated.limit_amount, 500.0);
    assert_eq!(updated.name, "Groceries");

    BudgetService.delete(&store, account_id, budget.id).unwrap();
    let err = BudgetService.get(&store, account_id, budget.id).unwrap_err();
    assert!(matches!(err, CoreError::NotFound(_)));
}

#[test]
fn foreign_rows_are_denied_not_hidden() {
    let store = MemoryStore::new();
    let owner = common::signup(&store, "owner@example.com");
    let intruder = common::signup(&store, "intruder@example.com");

    let budget = BudgetService
        .create(
            &store,
            owner.account.id,
            common::new_budget("Travel", 900.0, BudgetPeriod::Quarterly),
        )
        .unwrap();

    let err = BudgetService
        .get(&store, intruder.account.id, budget.id)
        .unwrap_err();
    assert!(matches!(err, CoreError::AccessDenied(_)));
}

#[test]
fn card_creation_skips_budgets_the_caller_does_not_own() {
    let store = MemoryStore::new();
    let owner = common::signup(&store, "owner@example.com");
    let other = common::signup(&store, "other@example.com");

    let mine = BudgetService
        .create(
            &store,
            owner.account.id,
            common::new_budget("Groceries", 400.0, BudgetPeriod::Monthly),
        )
        .unwrap();
    let theirs = BudgetService
        .create(
            &store,
            other.account.id,
            common::new_budget("Gas", 100.0, BudgetPeriod::Weekly),
        )
        .unwrap();

    let mut input = common::new_card("Team Card");
    input.budget_ids = vec![mine.id, theirs.id];
    let created = CardService.create(&store, owner.account.id, input).unwrap();

    assert_eq!(created.budget_ids, vec![mine.id]);
    assert_eq!(created.card.status, CardStatus::Issued);
}

#[test]
fn card_update_replaces_attachments() {
    let store = MemoryStore::new();
    let session = common::signup(&store, "casey@example.com");
    let account_id = session.account.id;

    let groceries = BudgetService
        .create(
            &store,
            account_id,
            common::new_budget("Groceries", 400.0, BudgetPeriod::Monthly),
        )
        .unwrap();
    let travel = BudgetService
        .create(
            &store,
            account_id,
            common::new_budget("Travel", 900.0, BudgetPeriod::Quarterly),
        )
        .unwrap();

    let mut input = common::new_card("Ops Card");
    input.budget_ids = vec![groceries.id];
    let card = CardService.create(&store, account_id, input).unwrap();

    let updated = CardService
        .update(
            &store,
            account_id,
            card.card.id,
            CardPatch {
                status: Some(CardStatus::Frozen),
                budget_ids: Some(vec![travel.id]),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(updated.card.status, CardStatus::Frozen);
    assert_eq!(updated.budget_ids, vec![travel.id]);
}

#[test]
fn duplicate_associations_are_rejected() {
    let store = MemoryStore::new();
    let session = common::signup(&store, "casey@example.com");
    let account_id = session.account.id;

    let budget = BudgetService
        .create(
            &store,
            account_id,
            common::new_budget("Groceries", 400.0, BudgetPeriod::Monthly),
        )
        .unwrap();
    let card = CardService
        .create(&store, account_id, common::new_card("Ops Card"))
        .unwrap();

    CardBudgetService
        .create(&store, account_id, card.card.id, budget.id)
        .unwrap();
    let err = CardBudgetService
        .create(&store, account_id, card.card.id, budget.id)
        .unwrap_err();
    assert!(matches!(err, CoreError::InvalidInput(_)));

    let listed = CardBudgetService.list(&store, account_id).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].card_name, "Ops Card");
    assert_eq!(listed[0].budget_name, "Groceries");
}

#[test]
fn transactions_flow_through_associations() {
    let store = MemoryStore::new();
    let session = common::signup(&store, "casey@example.com");
    let account_id = session.account.id;

    let budget = BudgetService
        .create(
            &store,
            account_id,
            common::new_budget("Groceries", 400.0, BudgetPeriod::Monthly),
        )
        .unwrap();
    let card = CardService
        .create(&store, account_id, common::new_card("Ops Card"))
        .unwrap();
    let association = CardBudgetService
        .create(&store, account_id, card.card.id, budget.id)
        .unwrap();

    let view = TransactionService
        .create(
            &store,
            account_id,
            NewTransaction {
                card_budget_id: association.id,
                amount: 42.5,
                name: "Market run".into(),
                date: None,
                description: None,
                category: Some("food".into()),
                merchant: Some("Corner Market".into()),
                receipt_id: None,
            },
        )
        .unwrap();
    assert_eq!(view.card_id, card.card.id);
    assert_eq!(view.budget_id, budget.id);

    let listed = TransactionService
        .list(&store, account_id, TransactionQuery::default())
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].transaction.amount, 42.5);

    let by_card = TransactionService
        .list(
            &store,
            account_id,
            TransactionQuery {
                card_id: Some(card.card.id),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(by_card.len(), 1);

    TransactionService
        .delete(&store, account_id, view.transaction.id)
        .unwrap();
    let listed = TransactionService
        .list(&store, account_id, TransactionQuery::default())
        .unwrap();
    assert!(listed.is_empty());
}

#[test]
fn transactions_on_foreign_associations_are_denied() {
    let store = MemoryStore::new();
    let owner = common::signup(&store, "owner@example.com");
    let intruder = common::signup(&store, "intruder@example.com");

    let budget = BudgetService
        .create(
            &store,
            owner.account.id,
            common::new_budget("Groceries", 400.0, BudgetPeriod::Monthly),
        )
        .unwrap();
    let card = CardService
        .create(&store, owner.account.id, common::new_card("Ops Card"))
        .unwrap();
    let association = CardBudgetService
        .create(&store, owner.account.id, card.card.id, budget.id)
        .unwrap();

    let err = TransactionService
        .create(
            &store,
            intruder.account.id,
            NewTransaction {
                card_budget_id: association.id,
                amount: 10.0,
                name: "Sneaky".into(),
                date: None,
                description: None,
                category: None,
                merchant: None,
                receipt_id: None,
            },
        )
        .unwrap_err();
    assert!(matches!(err, CoreError::AccessDenied(_)));
}

#[test]
fn policy_crud() {
    let store = MemoryStore::new();
    let session = common::signup(&store, "casey@example.com");
    let account_id = session.account.id;

    let policy = PolicyService
        .create(
            &store,
            account_id,
            takeback_core::services::NewPolicy {
                name: "Memo over 75".into(),
                description: None,
                memo_threshold: Some(75.0),
                memo_prompt: Some("What was this for?".into()),
            },
        )
        .unwrap();

    let listed = PolicyService.list(&store, account_id).unwrap();
    assert_eq!(listed.len(), 1);

    PolicyService.delete(&store, account_id, policy.id).unwrap();
    assert!(PolicyService.list(&store, account_id).unwrap().is_empty());
}
