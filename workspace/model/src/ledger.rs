use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::entities::transaction::{self, TransactionKind};

/// A lightweight reference to the category a ledger entry belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRef {
    pub id: i32,
    pub name: String,
}

/// One materialized row of a user's ledger, decoupled from the database
/// entity so the aggregation code can run over plain in-memory slices.
///
/// The category reference is resolved at load time; entries whose category
/// was deleted carry `None` and count towards totals but not towards any
/// per-category breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerEntry {
    date: NaiveDate,
    amount: Decimal,
    kind: TransactionKind,
    category: Option<CategoryRef>,
}

impl LedgerEntry {
    /// Creates a new uncategorized entry.
    pub fn new(date: NaiveDate, amount: Decimal, kind: TransactionKind) -> Self {
        Self {
            date,
            amount,
            kind,
            category: None,
        }
    }

    /// Creates a new entry attached to a category.
    pub fn with_category(
        date: NaiveDate,
        amount: Decimal,
        kind: TransactionKind,
        category_id: i32,
        category_name: impl Into<String>,
    ) -> Self {
        Self {
            date,
            amount,
            kind,
            category: Some(CategoryRef {
                id: category_id,
                name: category_name.into(),
            }),
        }
    }

    /// Builds an entry from a stored transaction, resolving the category
    /// name from a preloaded `id -> name` map. A dangling `category_id`
    /// (row deleted between queries) degrades to uncategorized.
    pub fn from_model(model: &transaction::Model, category_names: &HashMap<i32, String>) -> Self {
        let category = model.category_id.and_then(|id| {
            category_names.get(&id).map(|name| CategoryRef {
                id,
                name: name.clone(),
            })
        });

        Self {
            date: model.date,
            amount: model.amount,
            kind: model.kind,
            category,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn category(&self) -> Option<&CategoryRef> {
        self.category.as_ref()
    }

    pub fn category_id(&self) -> Option<i32> {
        self.category.as_ref().map(|c| c.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_entry_is_uncategorized() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let entry = LedgerEntry::new(date, Decimal::new(10000, 2), TransactionKind::Income);

        assert_eq!(entry.date(), date);
        assert_eq!(entry.amount(), Decimal::new(10000, 2));
        assert_eq!(entry.kind(), TransactionKind::Income);
        assert!(entry.category().is_none());
        assert!(entry.category_id().is_none());
    }

    #[test]
    fn test_with_category() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let entry = LedgerEntry::with_category(
            date,
            Decimal::new(5000, 2),
            TransactionKind::Expense,
            7,
            "Food",
        );

        assert_eq!(entry.category_id(), Some(7));
        assert_eq!(entry.category().unwrap().name, "Food");
    }

    #[test]
    fn test_from_model_resolves_category_name() {
        let model = transaction::Model {
            id: 1,
            owner_id: 1,
            amount: Decimal::new(2500, 2),
            description: "lunch".to_string(),
            category_id: Some(3),
            kind: TransactionKind::Expense,
            date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            created_at: NaiveDate::from_ymd_opt(2024, 3, 15)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            updated_at: NaiveDate::from_ymd_opt(2024, 3, 15)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
        };

        let mut names = HashMap::new();
        names.insert(3, "Food".to_string());

        let entry = LedgerEntry::from_model(&model, &names);
        assert_eq!(entry.category().unwrap().name, "Food");

        // A dangling category id falls back to uncategorized.
        let entry = LedgerEntry::from_model(&model, &HashMap::new());
        assert!(entry.category().is_none());
    }
}
