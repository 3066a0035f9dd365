//! This file serves as the root for all SeaORM entity modules.
//! The data model mirrors a conventional personal-finance tracker:
//! accounts in currencies, transactions with tags/entities, automation
//! rules with their actions, schedule definitions that spawn
//! transactions, and the queue table the automation engine feeds from.

pub mod account;
pub mod account_group;
pub mod category;
pub mod currency;
pub mod dca_entry;
pub mod dca_strategy;
pub mod entity;
pub mod installment_plan;
pub mod installment_plan_entity;
pub mod installment_plan_tag;
pub mod queued_event;
pub mod recurring_transaction;
pub mod recurring_transaction_entity;
pub mod recurring_transaction_tag;
pub mod rule_set_field_action;
pub mod rule_upsert_action;
pub mod tag;
pub mod transaction;
pub mod transaction_entity;
pub mod transaction_rule;
pub mod transaction_tag;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::account::Entity as Account;
    pub use super::account_group::Entity as AccountGroup;
    pub use super::category::Entity as Category;
    pub use super::currency::Entity as Currency;
    pub use super::dca_entry::Entity as DcaEntry;
    pub use super::dca_strategy::Entity as DcaStrategy;
    pub use super::entity::Entity as Counterparty;
    pub use super::installment_plan::Entity as InstallmentPlan;
    pub use super::installment_plan_entity::Entity as InstallmentPlanEntity;
    pub use super::installment_plan_tag::Entity as InstallmentPlanTag;
    pub use super::queued_event::Entity as QueuedEvent;
    pub use super::recurring_transaction::Entity as RecurringTransaction;
    pub use super::recurring_transaction_entity::Entity as RecurringTransactionEntity;
    pub use super::recurring_transaction_tag::Entity as RecurringTransactionTag;
    pub use super::rule_set_field_action::Entity as RuleSetFieldAction;
    pub use super::rule_upsert_action::Entity as RuleUpsertAction;
    pub use super::tag::Entity as Tag;
    pub use super::transaction::Entity as Transaction;
    pub use super::transaction_entity::Entity as TransactionEntity;
    pub use super::transaction_rule::Entity as TransactionRule;
    pub use super::transaction_tag::Entity as TransactionTag;
}
