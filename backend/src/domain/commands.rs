//! Validated inputs for the domain services.
//!
//! The REST layer hands over the raw request DTOs from `shared`; the
//! conversions here are the only place where their shape is checked.

use std::collections::HashSet;

use shared::{
    CreateExpenseRequest, CreateHouseholdRequest, CreateUserRequest, ExpenseCategory,
    UpdateExpenseRequest,
};

use super::error::{LedgerError, LedgerResult};
use super::models::ExpenseChanges;

pub const DESCRIPTION_MAX_LEN: usize = 256;
pub const NAME_MAX_LEN: usize = 100;

/// Input for recording a new expense
#[derive(Debug, Clone, PartialEq)]
pub struct CreateExpenseCommand {
    pub household_id: String,
    pub creator_id: String,
    pub amount: f64,
    pub description: String,
    pub category: ExpenseCategory,
    pub member_ids: Vec<String>,
}

impl TryFrom<CreateExpenseRequest> for CreateExpenseCommand {
    type Error = LedgerError;

    fn try_from(request: CreateExpenseRequest) -> LedgerResult<Self> {
        let household_id = required_text(request.household_id, "householdId")?;
        let creator_id = required_text(request.creator_id, "creatorId")?;
        let amount = request
            .amount
            .ok_or_else(|| LedgerError::validation("amount is required"))
            .and_then(validate_amount)?;
        let description = validate_description(required_text(request.description, "description")?)?;
        let member_ids = validate_member_ids(request.member_ids)?;

        Ok(Self {
            household_id,
            creator_id,
            amount,
            description,
            category: request.category.unwrap_or_default(),
            member_ids,
        })
    }
}

impl TryFrom<UpdateExpenseRequest> for ExpenseChanges {
    type Error = LedgerError;

    fn try_from(request: UpdateExpenseRequest) -> LedgerResult<Self> {
        let amount = request.amount.map(validate_amount).transpose()?;
        let description = request
            .description
            .map(|d| {
                let trimmed = d.trim().to_string();
                if trimmed.is_empty() {
                    Err(LedgerError::validation("description cannot be empty"))
                } else {
                    validate_description(trimmed)
                }
            })
            .transpose()?;

        Ok(Self {
            amount,
            description,
            category: request.category,
        })
    }
}

/// Input for registering a household
#[derive(Debug, Clone, PartialEq)]
pub struct CreateHouseholdCommand {
    pub name: String,
}

impl TryFrom<CreateHouseholdRequest> for CreateHouseholdCommand {
    type Error = LedgerError;

    fn try_from(request: CreateHouseholdRequest) -> LedgerResult<Self> {
        Ok(Self {
            name: validate_name(required_text(request.name, "name")?)?,
        })
    }
}

/// Input for registering a user
#[derive(Debug, Clone, PartialEq)]
pub struct CreateUserCommand {
    pub name: String,
    pub email: String,
}

impl TryFrom<CreateUserRequest> for CreateUserCommand {
    type Error = LedgerError;

    fn try_from(request: CreateUserRequest) -> LedgerResult<Self> {
        let name = validate_name(required_text(request.name, "name")?)?;
        let email = required_text(request.email, "email")?.to_lowercase();

        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && domain.contains('.') && !domain.contains('@') => {}
            _ => return Err(LedgerError::validation(format!("email is not a valid address: {}", email))),
        }

        Ok(Self { name, email })
    }
}

fn required_text(value: Option<String>, field: &str) -> LedgerResult<String> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(LedgerError::validation(format!("{} is required", field))),
    }
}

fn validate_amount(amount: f64) -> LedgerResult<f64> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(LedgerError::validation("amount must be a positive number"));
    }
    Ok(amount)
}

fn validate_description(description: String) -> LedgerResult<String> {
    if description.chars().count() > DESCRIPTION_MAX_LEN {
        return Err(LedgerError::validation(format!(
            "description cannot exceed {} characters",
            DESCRIPTION_MAX_LEN
        )));
    }
    Ok(description)
}

fn validate_name(name: String) -> LedgerResult<String> {
    if name.chars().count() > NAME_MAX_LEN {
        return Err(LedgerError::validation(format!("name cannot exceed {} characters", NAME_MAX_LEN)));
    }
    Ok(name)
}

fn validate_member_ids(member_ids: Option<Vec<String>>) -> LedgerResult<Vec<String>> {
    let member_ids = member_ids.unwrap_or_default();
    if member_ids.is_empty() {
        return Err(LedgerError::validation("memberIds must be a non-empty list"));
    }

    let mut seen = HashSet::new();
    let mut cleaned = Vec::with_capacity(member_ids.len());
    for id in member_ids {
        let id = id.trim().to_string();
        if id.is_empty() {
            return Err(LedgerError::validation("memberIds cannot contain empty ids"));
        }
        if !seen.insert(id.clone()) {
            return Err(LedgerError::validation(format!("memberIds contains {} more than once", id)));
        }
        cleaned.push(id);
    }
    Ok(cleaned)
}
