//! Storage layout of every entity type
//!
//! Binds each model to its table and column mapping, plus the small
//! adjustments a patch gets before it is written.

use chrono::Utc;
use serde::{de::DeserializeOwned, Serialize};
use std::fmt;

use super::schema::{EntitySchema, Field};
use crate::models::{
    Account, AccountId, AccountPatch, Budget, BudgetId, BudgetPatch, Category, CategoryId,
    CategoryPatch, Goal, GoalId, GoalPatch, Money, Transaction, TransactionId, TransactionPatch,
};

/// A model stored through a [`super::Repository`]
pub trait Entity: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    type Id: Copy + From<i64> + Into<i64> + fmt::Display + Send + Sync;

    /// Every field optional; used for both create and update
    type Patch: Serialize + Default + Clone + Send + Sync;

    const SCHEMA: EntitySchema;

    fn id(&self) -> Self::Id;

    /// Adjust a patch before it is created
    fn prepare_create(_patch: &mut Self::Patch) {}

    /// Adjust a patch before it is merged onto an existing record
    fn prepare_update(_patch: &mut Self::Patch) {}
}

pub const ACCOUNT_SCHEMA: EntitySchema = EntitySchema {
    entity: "Account",
    table: "app_account_c",
    fields: &[
        Field::plain("name", "Name"),
        Field::plain("tags", "Tags"),
        Field::plain("type", "type_c"),
        Field::money("balance", "balance_c"),
        Field::plain("color", "color_c"),
    ],
    order_by_desc: None,
};

pub const TRANSACTION_SCHEMA: EntitySchema = EntitySchema {
    entity: "Transaction",
    table: "transaction_c",
    fields: &[
        Field::plain("name", "Name"),
        Field::plain("tags", "Tags"),
        Field::money("amount", "amount_c"),
        Field::plain("type", "type_c"),
        Field::plain("description", "description_c"),
        Field::plain("date", "date_c"),
        Field::reference("categoryId", "category_id_c"),
        Field::reference("accountId", "account_id_c"),
    ],
    order_by_desc: Some("date_c"),
};

pub const CATEGORY_SCHEMA: EntitySchema = EntitySchema {
    entity: "Category",
    table: "category_c",
    fields: &[
        Field::plain("name", "Name"),
        Field::plain("tags", "Tags"),
        Field::plain("icon", "icon_c"),
        Field::plain("color", "color_c"),
        Field::plain("type", "type_c"),
    ],
    order_by_desc: None,
};

pub const BUDGET_SCHEMA: EntitySchema = EntitySchema {
    entity: "Budget",
    table: "budget_c",
    fields: &[
        Field::plain("name", "Name"),
        Field::plain("tags", "Tags"),
        Field::money("amount", "amount_c"),
        Field::plain("period", "period_c"),
        Field::money("spent", "spent_c"),
        Field::reference("categoryId", "category_id_c"),
    ],
    order_by_desc: None,
};

pub const GOAL_SCHEMA: EntitySchema = EntitySchema {
    entity: "Goal",
    table: "goal_c",
    fields: &[
        Field::plain("name", "Name"),
        Field::plain("tags", "Tags"),
        Field::plain("description", "description_c"),
        Field::money("targetAmount", "target_amount_c"),
        Field::money("currentAmount", "current_amount_c"),
        Field::plain("targetDate", "target_date_c"),
        Field::plain("category", "category_c"),
        Field::plain("status", "status_c"),
        Field::plain("createdAt", "created_at_c"),
        Field::plain("updatedAt", "updated_at_c"),
    ],
    order_by_desc: None,
};

/// Every table, for seeding and snapshots
pub const ALL_SCHEMAS: [EntitySchema; 5] = [
    ACCOUNT_SCHEMA,
    TRANSACTION_SCHEMA,
    CATEGORY_SCHEMA,
    BUDGET_SCHEMA,
    GOAL_SCHEMA,
];

fn default_tags(tags: &mut Option<String>) {
    if tags.is_none() {
        *tags = Some(String::new());
    }
}

impl Entity for Account {
    type Id = AccountId;
    type Patch = AccountPatch;
    const SCHEMA: EntitySchema = ACCOUNT_SCHEMA;

    fn id(&self) -> AccountId {
        self.id
    }

    fn prepare_create(patch: &mut AccountPatch) {
        default_tags(&mut patch.tags);
    }
}

impl Entity for Transaction {
    type Id = TransactionId;
    type Patch = TransactionPatch;
    const SCHEMA: EntitySchema = TRANSACTION_SCHEMA;

    fn id(&self) -> TransactionId {
        self.id
    }

    fn prepare_create(patch: &mut TransactionPatch) {
        default_tags(&mut patch.tags);
        patch.mirror_name();
    }

    fn prepare_update(patch: &mut TransactionPatch) {
        patch.mirror_name();
    }
}

impl Entity for Category {
    type Id = CategoryId;
    type Patch = CategoryPatch;
    const SCHEMA: EntitySchema = CATEGORY_SCHEMA;

    fn id(&self) -> CategoryId {
        self.id
    }

    fn prepare_create(patch: &mut CategoryPatch) {
        default_tags(&mut patch.tags);
    }
}

impl Entity for Budget {
    type Id = BudgetId;
    type Patch = BudgetPatch;
    const SCHEMA: EntitySchema = BUDGET_SCHEMA;

    fn id(&self) -> BudgetId {
        self.id
    }

    fn prepare_create(patch: &mut BudgetPatch) {
        default_tags(&mut patch.tags);
        if patch.spent.is_none() {
            patch.spent = Some(Money::zero());
        }
    }
}

impl Entity for Goal {
    type Id = GoalId;
    type Patch = GoalPatch;
    const SCHEMA: EntitySchema = GOAL_SCHEMA;

    fn id(&self) -> GoalId {
        self.id
    }

    fn prepare_create(patch: &mut GoalPatch) {
        default_tags(&mut patch.tags);
        patch.stamp_created(Utc::now());
    }

    fn prepare_update(patch: &mut GoalPatch) {
        patch.stamp_updated(Utc::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BudgetPeriod, TransactionType};
    use chrono::NaiveDate;
    use serde_json::{json, Value};

    fn domain_map<T: Serialize>(value: &T) -> serde_json::Map<String, Value> {
        serde_json::to_value(value)
            .unwrap()
            .as_object()
            .cloned()
            .unwrap()
    }

    #[test]
    fn test_schema_tables() {
        let tables: Vec<&str> = ALL_SCHEMAS.iter().map(|s| s.table).collect();
        assert_eq!(
            tables,
            vec!["app_account_c", "transaction_c", "category_c", "budget_c", "goal_c"]
        );
    }

    #[test]
    fn test_transaction_patch_to_record() {
        let mut patch = TransactionPatch::new(
            TransactionType::Expense,
            Money::from_cents(1250),
            "Lunch",
            NaiveDate::from_ymd_opt(2025, 3, 4).unwrap(),
            CategoryId::new(2),
            AccountId::new(1),
        );
        Transaction::prepare_create(&mut patch);

        let record = TRANSACTION_SCHEMA.to_record(&domain_map(&patch)).unwrap();
        assert_eq!(record["Name"], json!("Lunch"));
        assert_eq!(record["description_c"], json!("Lunch"));
        assert_eq!(record["amount_c"], json!(12.5));
        assert_eq!(record["type_c"], json!("expense"));
        assert_eq!(record["date_c"], json!("2025-03-04"));
        assert_eq!(record["category_id_c"], json!(2));
        assert_eq!(record["Tags"], json!(""));
    }

    #[test]
    fn test_budget_create_defaults_spent() {
        let mut patch = BudgetPatch::new(
            "Food",
            Money::from_units(400),
            BudgetPeriod::Monthly,
            CategoryId::new(2),
        );
        Budget::prepare_create(&mut patch);
        assert_eq!(patch.spent, Some(Money::zero()));

        let mut update = BudgetPatch::default();
        Budget::prepare_update(&mut update);
        assert_eq!(update.spent, None);
    }

    #[test]
    fn test_goal_timestamps() {
        let mut patch = GoalPatch::new("Trip", Money::from_units(2000));
        Goal::prepare_create(&mut patch);
        assert!(patch.created_at.is_some());
        assert_eq!(patch.created_at, patch.updated_at);

        let mut update = GoalPatch::default();
        Goal::prepare_update(&mut update);
        assert!(update.created_at.is_none());
        assert!(update.updated_at.is_some());
    }

    #[test]
    fn test_record_to_account() {
        let record = json!({
            "Id": 5,
            "Name": "Savings",
            "Tags": "",
            "type_c": "savings",
            "balance_c": 1500.25,
            "color_c": "#10B981"
        });
        let domain = ACCOUNT_SCHEMA
            .to_domain(record.as_object().unwrap())
            .unwrap();
        let account: Account = serde_json::from_value(Value::Object(domain)).unwrap();
        assert_eq!(account.id, AccountId::new(5));
        assert_eq!(account.balance, Money::from_cents(150025));
    }
}
