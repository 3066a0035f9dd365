use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create currencies table
        manager
            .create_table(
                Table::create()
                    .table(Currencies::Table)
                    .if_not_exists()
                    .col(pk_auto(Currencies::Id))
                    .col(string(Currencies::Code).unique_key())
                    .col(string(Currencies::Name))
                    .col(small_integer(Currencies::DecimalPlaces))
                    .col(string_null(Currencies::Prefix))
                    .col(string_null(Currencies::Suffix))
                    .to_owned(),
            )
            .await?;

        // Create account_groups table
        manager
            .create_table(
                Table::create()
                    .table(AccountGroups::Table)
                    .if_not_exists()
                    .col(pk_auto(AccountGroups::Id))
                    .col(string(AccountGroups::Name).unique_key())
                    .to_owned(),
            )
            .await?;

        // Create accounts table
        manager
            .create_table(
                Table::create()
                    .table(Accounts::Table)
                    .if_not_exists()
                    .col(pk_auto(Accounts::Id))
                    .col(string(Accounts::Name))
                    .col(integer_null(Accounts::GroupId))
                    .col(integer(Accounts::CurrencyId))
                    .col(boolean(Accounts::IsAsset).default(false))
                    .col(boolean(Accounts::IsArchived).default(false))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_accounts_group")
                            .from(Accounts::Table, Accounts::GroupId)
                            .to(AccountGroups::Table, AccountGroups::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_accounts_currency")
                            .from(Accounts::Table, Accounts::CurrencyId)
                            .to(Currencies::Table, Currencies::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create categories table
        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(pk_auto(Categories::Id))
                    .col(string(Categories::Name).unique_key())
                    .col(boolean(Categories::Mute).default(false))
                    .to_owned(),
            )
            .await?;

        // Create tags table
        manager
            .create_table(
                Table::create()
                    .table(Tags::Table)
                    .if_not_exists()
                    .col(pk_auto(Tags::Id))
                    .col(string(Tags::Name).unique_key())
                    .to_owned(),
            )
            .await?;

        // Create entities table
        manager
            .create_table(
                Table::create()
                    .table(Entities::Table)
                    .if_not_exists()
                    .col(pk_auto(Entities::Id))
                    .col(string(Entities::Name).unique_key())
                    .col(boolean(Entities::Active).default(true))
                    .to_owned(),
            )
            .await?;

        // Create transaction_rules table
        manager
            .create_table(
                Table::create()
                    .table(TransactionRules::Table)
                    .if_not_exists()
                    .col(pk_auto(TransactionRules::Id))
                    .col(string(TransactionRules::Name))
                    .col(string_null(TransactionRules::Description))
                    .col(boolean(TransactionRules::Active).default(true))
                    .col(boolean(TransactionRules::OnCreate).default(true))
                    .col(boolean(TransactionRules::OnUpdate).default(false))
                    .col(text(TransactionRules::Trigger))
                    .to_owned(),
            )
            .await?;

        // Create rule_set_field_actions table
        manager
            .create_table(
                Table::create()
                    .table(RuleSetFieldActions::Table)
                    .if_not_exists()
                    .col(pk_auto(RuleSetFieldActions::Id))
                    .col(integer(RuleSetFieldActions::RuleId))
                    .col(integer(RuleSetFieldActions::Position).default(0))
                    .col(string(RuleSetFieldActions::Field).string_len(20))
                    .col(text(RuleSetFieldActions::Value))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rule_set_field_actions_rule")
                            .from(RuleSetFieldActions::Table, RuleSetFieldActions::RuleId)
                            .to(TransactionRules::Table, TransactionRules::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One set-field action per (rule, field)
        manager
            .create_index(
                Index::create()
                    .name("idx_rule_set_field_actions_rule_field")
                    .table(RuleSetFieldActions::Table)
                    .col(RuleSetFieldActions::RuleId)
                    .col(RuleSetFieldActions::Field)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Create rule_upsert_actions table
        manager
            .create_table(
                Table::create()
                    .table(RuleUpsertActions::Table)
                    .if_not_exists()
                    .col(pk_auto(RuleUpsertActions::Id))
                    .col(integer(RuleUpsertActions::RuleId))
                    .col(integer(RuleUpsertActions::Position).default(0))
                    .col(text(RuleUpsertActions::Guard))
                    .col(json(RuleUpsertActions::Filter))
                    .col(json(RuleUpsertActions::SetValues))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rule_upsert_actions_rule")
                            .from(RuleUpsertActions::Table, RuleUpsertActions::RuleId)
                            .to(TransactionRules::Table, TransactionRules::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create recurring_transactions table
        manager
            .create_table(
                Table::create()
                    .table(RecurringTransactions::Table)
                    .if_not_exists()
                    .col(pk_auto(RecurringTransactions::Id))
                    .col(integer(RecurringTransactions::AccountId))
                    .col(string(RecurringTransactions::Kind).string_len(2))
                    .col(decimal(RecurringTransactions::Amount).decimal_len(16, 4))
                    .col(string(RecurringTransactions::Description))
                    .col(string_null(RecurringTransactions::Notes))
                    .col(integer_null(RecurringTransactions::CategoryId))
                    .col(date_null(RecurringTransactions::ReferenceDate))
                    .col(date(RecurringTransactions::StartDate))
                    .col(date_null(RecurringTransactions::EndDate))
                    .col(string(RecurringTransactions::RecurrenceUnit).string_len(1))
                    .col(integer(RecurringTransactions::RecurrenceInterval).default(1))
                    .col(integer_null(RecurringTransactions::MaxOccurrences))
                    .col(boolean(RecurringTransactions::IsPaused).default(false))
                    .col(date_null(RecurringTransactions::LastGeneratedDate))
                    .col(boolean(RecurringTransactions::AddDescriptionToTransaction).default(true))
                    .col(boolean(RecurringTransactions::AddNotesToTransaction).default(true))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_recurring_transactions_account")
                            .from(RecurringTransactions::Table, RecurringTransactions::AccountId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_recurring_transactions_category")
                            .from(RecurringTransactions::Table, RecurringTransactions::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create recurring_transactions_tags table (join table)
        manager
            .create_table(
                Table::create()
                    .table(RecurringTransactionsTags::Table)
                    .if_not_exists()
                    .col(integer(RecurringTransactionsTags::RecurringTransactionId))
                    .col(integer(RecurringTransactionsTags::TagId))
                    .primary_key(
                        Index::create()
                            .name("pk_recurring_transactions_tags")
                            .col(RecurringTransactionsTags::RecurringTransactionId)
                            .col(RecurringTransactionsTags::TagId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_recurring_transactions_tags_recurring_transaction")
                            .from(
                                RecurringTransactionsTags::Table,
                                RecurringTransactionsTags::RecurringTransactionId,
                            )
                            .to(RecurringTransactions::Table, RecurringTransactions::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_recurring_transactions_tags_tag")
                            .from(RecurringTransactionsTags::Table, RecurringTransactionsTags::TagId)
                            .to(Tags::Table, Tags::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create recurring_transactions_entities table (join table)
        manager
            .create_table(
                Table::create()
                    .table(RecurringTransactionsEntities::Table)
                    .if_not_exists()
                    .col(integer(RecurringTransactionsEntities::RecurringTransactionId))
                    .col(integer(RecurringTransactionsEntities::EntityId))
                    .primary_key(
                        Index::create()
                            .name("pk_recurring_transactions_entities")
                            .col(RecurringTransactionsEntities::RecurringTransactionId)
                            .col(RecurringTransactionsEntities::EntityId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_recurring_transactions_entities_recurring_transaction")
                            .from(
                                RecurringTransactionsEntities::Table,
                                RecurringTransactionsEntities::RecurringTransactionId,
                            )
                            .to(RecurringTransactions::Table, RecurringTransactions::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_recurring_transactions_entities_entity")
                            .from(
                                RecurringTransactionsEntities::Table,
                                RecurringTransactionsEntities::EntityId,
                            )
                            .to(Entities::Table, Entities::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create installment_plans table
        manager
            .create_table(
                Table::create()
                    .table(InstallmentPlans::Table)
                    .if_not_exists()
                    .col(pk_auto(InstallmentPlans::Id))
                    .col(integer(InstallmentPlans::AccountId))
                    .col(string(InstallmentPlans::Kind).string_len(2))
                    .col(string(InstallmentPlans::Description))
                    .col(string_null(InstallmentPlans::Notes))
                    .col(decimal(InstallmentPlans::TotalAmount).decimal_len(16, 4))
                    .col(integer(InstallmentPlans::NumberOfInstallments))
                    .col(integer(InstallmentPlans::InstallmentStart).default(1))
                    .col(date(InstallmentPlans::StartDate))
                    .col(date_null(InstallmentPlans::ReferenceDate))
                    .col(string(InstallmentPlans::RecurrenceUnit).string_len(1))
                    .col(integer(InstallmentPlans::RecurrenceInterval).default(1))
                    .col(integer_null(InstallmentPlans::CategoryId))
                    .col(boolean(InstallmentPlans::AddDescriptionToTransaction).default(true))
                    .col(boolean(InstallmentPlans::AddNotesToTransaction).default(true))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_installment_plans_account")
                            .from(InstallmentPlans::Table, InstallmentPlans::AccountId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_installment_plans_category")
                            .from(InstallmentPlans::Table, InstallmentPlans::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create installment_plans_tags table (join table)
        manager
            .create_table(
                Table::create()
                    .table(InstallmentPlansTags::Table)
                    .if_not_exists()
                    .col(integer(InstallmentPlansTags::InstallmentPlanId))
                    .col(integer(InstallmentPlansTags::TagId))
                    .primary_key(
                        Index::create()
                            .name("pk_installment_plans_tags")
                            .col(InstallmentPlansTags::InstallmentPlanId)
                            .col(InstallmentPlansTags::TagId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_installment_plans_tags_installment_plan")
                            .from(InstallmentPlansTags::Table, InstallmentPlansTags::InstallmentPlanId)
                            .to(InstallmentPlans::Table, InstallmentPlans::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_installment_plans_tags_tag")
                            .from(InstallmentPlansTags::Table, InstallmentPlansTags::TagId)
                            .to(Tags::Table, Tags::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create installment_plans_entities table (join table)
        manager
            .create_table(
                Table::create()
                    .table(InstallmentPlansEntities::Table)
                    .if_not_exists()
                    .col(integer(InstallmentPlansEntities::InstallmentPlanId))
                    .col(integer(InstallmentPlansEntities::EntityId))
                    .primary_key(
                        Index::create()
                            .name("pk_installment_plans_entities")
                            .col(InstallmentPlansEntities::InstallmentPlanId)
                            .col(InstallmentPlansEntities::EntityId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_installment_plans_entities_installment_plan")
                            .from(
                                InstallmentPlansEntities::Table,
                                InstallmentPlansEntities::InstallmentPlanId,
                            )
                            .to(InstallmentPlans::Table, InstallmentPlans::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_installment_plans_entities_entity")
                            .from(InstallmentPlansEntities::Table, InstallmentPlansEntities::EntityId)
                            .to(Entities::Table, Entities::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create transactions table
        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(pk_auto(Transactions::Id))
                    .col(integer(Transactions::AccountId))
                    .col(string(Transactions::Kind).string_len(2))
                    .col(boolean(Transactions::IsPaid).default(true))
                    .col(date(Transactions::Date))
                    .col(date(Transactions::ReferenceDate))
                    .col(decimal(Transactions::Amount).decimal_len(16, 4))
                    .col(string(Transactions::Description))
                    .col(string_null(Transactions::Notes))
                    .col(integer_null(Transactions::CategoryId))
                    .col(integer_null(Transactions::InstallmentPlanId))
                    .col(integer_null(Transactions::InstallmentNumber))
                    .col(integer_null(Transactions::RecurringTransactionId))
                    .col(string_null(Transactions::InternalNote))
                    .col(string_null(Transactions::InternalId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transactions_account")
                            .from(Transactions::Table, Transactions::AccountId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transactions_category")
                            .from(Transactions::Table, Transactions::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transactions_installment_plan")
                            .from(Transactions::Table, Transactions::InstallmentPlanId)
                            .to(InstallmentPlans::Table, InstallmentPlans::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transactions_recurring_transaction")
                            .from(Transactions::Table, Transactions::RecurringTransactionId)
                            .to(RecurringTransactions::Table, RecurringTransactions::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create transactions_tags table (join table)
        manager
            .create_table(
                Table::create()
                    .table(TransactionsTags::Table)
                    .if_not_exists()
                    .col(integer(TransactionsTags::TransactionId))
                    .col(integer(TransactionsTags::TagId))
                    .primary_key(
                        Index::create()
                            .name("pk_transactions_tags")
                            .col(TransactionsTags::TransactionId)
                            .col(TransactionsTags::TagId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transactions_tags_transaction")
                            .from(TransactionsTags::Table, TransactionsTags::TransactionId)
                            .to(Transactions::Table, Transactions::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transactions_tags_tag")
                            .from(TransactionsTags::Table, TransactionsTags::TagId)
                            .to(Tags::Table, Tags::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create transactions_entities table (join table)
        manager
            .create_table(
                Table::create()
                    .table(TransactionsEntities::Table)
                    .if_not_exists()
                    .col(integer(TransactionsEntities::TransactionId))
                    .col(integer(TransactionsEntities::EntityId))
                    .primary_key(
                        Index::create()
                            .name("pk_transactions_entities")
                            .col(TransactionsEntities::TransactionId)
                            .col(TransactionsEntities::EntityId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transactions_entities_transaction")
                            .from(TransactionsEntities::Table, TransactionsEntities::TransactionId)
                            .to(Transactions::Table, Transactions::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transactions_entities_entity")
                            .from(TransactionsEntities::Table, TransactionsEntities::EntityId)
                            .to(Entities::Table, Entities::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create dca_strategies table
        manager
            .create_table(
                Table::create()
                    .table(DcaStrategies::Table)
                    .if_not_exists()
                    .col(pk_auto(DcaStrategies::Id))
                    .col(string(DcaStrategies::Name))
                    .col(integer(DcaStrategies::TargetCurrencyId))
                    .col(integer(DcaStrategies::PaymentCurrencyId))
                    .col(string_null(DcaStrategies::Notes))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_dca_strategies_target_currency")
                            .from(DcaStrategies::Table, DcaStrategies::TargetCurrencyId)
                            .to(Currencies::Table, Currencies::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_dca_strategies_payment_currency")
                            .from(DcaStrategies::Table, DcaStrategies::PaymentCurrencyId)
                            .to(Currencies::Table, Currencies::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create dca_entries table
        manager
            .create_table(
                Table::create()
                    .table(DcaEntries::Table)
                    .if_not_exists()
                    .col(pk_auto(DcaEntries::Id))
                    .col(integer(DcaEntries::StrategyId))
                    .col(date(DcaEntries::Date))
                    .col(decimal(DcaEntries::AmountPaid).decimal_len(16, 4))
                    .col(decimal(DcaEntries::AmountReceived).decimal_len(16, 4))
                    .col(integer_null(DcaEntries::ExpenseTransactionId))
                    .col(integer_null(DcaEntries::IncomeTransactionId))
                    .col(string_null(DcaEntries::Notes))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_dca_entries_strategy")
                            .from(DcaEntries::Table, DcaEntries::StrategyId)
                            .to(DcaStrategies::Table, DcaStrategies::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_dca_entries_expense_transaction")
                            .from(DcaEntries::Table, DcaEntries::ExpenseTransactionId)
                            .to(Transactions::Table, Transactions::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_dca_entries_income_transaction")
                            .from(DcaEntries::Table, DcaEntries::IncomeTransactionId)
                            .to(Transactions::Table, Transactions::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order to avoid foreign key constraints
        manager
            .drop_table(Table::drop().table(DcaEntries::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(DcaStrategies::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(TransactionsEntities::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(TransactionsTags::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(InstallmentPlansEntities::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(InstallmentPlansTags::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(InstallmentPlans::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(RecurringTransactionsEntities::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(RecurringTransactionsTags::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(RecurringTransactions::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(RuleUpsertActions::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(RuleSetFieldActions::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(TransactionRules::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Entities::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Tags::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Accounts::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(AccountGroups::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Currencies::Table).to_owned())
            .await?;

        Ok(())
    }
}

// Define identifiers for all tables

#[derive(DeriveIden)]
enum Currencies {
    Table,
    Id,
    Code,
    Name,
    DecimalPlaces,
    Prefix,
    Suffix,
}

#[derive(DeriveIden)]
enum AccountGroups {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum Accounts {
    Table,
    Id,
    Name,
    GroupId,
    CurrencyId,
    IsAsset,
    IsArchived,
}

#[derive(DeriveIden)]
enum Categories {
    Table,
    Id,
    Name,
    Mute,
}

#[derive(DeriveIden)]
enum Tags {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum Entities {
    Table,
    Id,
    Name,
    Active,
}

#[derive(DeriveIden)]
enum TransactionRules {
    Table,
    Id,
    Name,
    Description,
    Active,
    OnCreate,
    OnUpdate,
    Trigger,
}

#[derive(DeriveIden)]
enum RuleSetFieldActions {
    Table,
    Id,
    RuleId,
    Position,
    Field,
    Value,
}

#[derive(DeriveIden)]
enum RuleUpsertActions {
    Table,
    Id,
    RuleId,
    Position,
    Guard,
    Filter,
    SetValues,
}

#[derive(DeriveIden)]
enum RecurringTransactions {
    Table,
    Id,
    AccountId,
    Kind,
    Amount,
    Description,
    Notes,
    CategoryId,
    ReferenceDate,
    StartDate,
    EndDate,
    RecurrenceUnit,
    RecurrenceInterval,
    MaxOccurrences,
    IsPaused,
    LastGeneratedDate,
    AddDescriptionToTransaction,
    AddNotesToTransaction,
}

#[derive(DeriveIden)]
enum RecurringTransactionsTags {
    Table,
    RecurringTransactionId,
    TagId,
}

#[derive(DeriveIden)]
enum RecurringTransactionsEntities {
    Table,
    RecurringTransactionId,
    EntityId,
}

#[derive(DeriveIden)]
enum InstallmentPlans {
    Table,
    Id,
    AccountId,
    Kind,
    Description,
    Notes,
    TotalAmount,
    NumberOfInstallments,
    InstallmentStart,
    StartDate,
    ReferenceDate,
    RecurrenceUnit,
    RecurrenceInterval,
    CategoryId,
    AddDescriptionToTransaction,
    AddNotesToTransaction,
}

#[derive(DeriveIden)]
enum InstallmentPlansTags {
    Table,
    InstallmentPlanId,
    TagId,
}

#[derive(DeriveIden)]
enum InstallmentPlansEntities {
    Table,
    InstallmentPlanId,
    EntityId,
}

#[derive(DeriveIden)]
enum Transactions {
    Table,
    Id,
    AccountId,
    Kind,
    IsPaid,
    Date,
    ReferenceDate,
    Amount,
    Description,
    Notes,
    CategoryId,
    InstallmentPlanId,
    InstallmentNumber,
    RecurringTransactionId,
    InternalNote,
    InternalId,
}

#[derive(DeriveIden)]
enum TransactionsTags {
    Table,
    TransactionId,
    TagId,
}

#[derive(DeriveIden)]
enum TransactionsEntities {
    Table,
    TransactionId,
    EntityId,
}

#[derive(DeriveIden)]
enum DcaStrategies {
    Table,
    Id,
    Name,
    TargetCurrencyId,
    PaymentCurrencyId,
    Notes,
}

#[derive(DeriveIden)]
enum DcaEntries {
    Table,
    Id,
    StrategyId,
    Date,
    AmountPaid,
    AmountReceived,
    ExpenseTransactionId,
    IncomeTransactionId,
    Notes,
}
