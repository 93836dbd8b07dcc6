//! Conversions from domain models to the `shared` wire DTOs.

use crate::domain::models::{
    format_timestamp, Expense as DomainExpense, ExpenseSplit as DomainExpenseSplit,
    Household as DomainHousehold, User as DomainUser,
};
use shared::{
    Expense as SharedExpense, ExpenseSplit as SharedExpenseSplit, Household as SharedHousehold,
    SplitDebtor, User as SharedUser, UserSummary,
};

/// Mapper from domain expenses to shared Expense DTOs
pub struct ExpenseMapper;

impl ExpenseMapper {
    pub fn to_dto(domain: DomainExpense) -> SharedExpense {
        SharedExpense {
            id: domain.id,
            household_id: domain.household_id,
            creator_id: domain.creator_id,
            amount: domain.amount,
            description: domain.description,
            category: domain.category,
            split_type: domain.split_type,
            date: format_timestamp(&domain.date),
            created_at: format_timestamp(&domain.created_at),
            updated_at: format_timestamp(&domain.updated_at),
            creator: UserSummary {
                id: domain.creator.id,
                name: domain.creator.name,
                email: domain.creator.email,
            },
            splits: domain.splits.into_iter().map(Self::split_to_dto).collect(),
        }
    }

    pub fn to_dto_list(domain: Vec<DomainExpense>) -> Vec<SharedExpense> {
        domain.into_iter().map(Self::to_dto).collect()
    }

    pub fn split_to_dto(domain: DomainExpenseSplit) -> SharedExpenseSplit {
        SharedExpenseSplit {
            id: domain.id,
            expense_id: domain.expense_id,
            user_id: domain.user_id,
            amount_owed: domain.amount_owed,
            is_paid: domain.is_paid,
            user: SplitDebtor {
                id: domain.debtor.id,
                name: domain.debtor.name,
            },
        }
    }
}

/// Mapper for households and users
pub struct DirectoryMapper;

impl DirectoryMapper {
    pub fn household_to_dto(domain: DomainHousehold) -> SharedHousehold {
        SharedHousehold {
            id: domain.id,
            name: domain.name,
            created_at: format_timestamp(&domain.created_at),
        }
    }

    pub fn user_to_dto(domain: DomainUser) -> SharedUser {
        SharedUser {
            id: domain.id,
            name: domain.name,
            email: domain.email,
            created_at: format_timestamp(&domain.created_at),
        }
    }
}
