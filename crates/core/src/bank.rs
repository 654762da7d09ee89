//! Bank accounts and Pix keys, stored as one `bank_info` document.
//!
//! Invariant kept by [`BankInfo::normalize_primaries`]: exactly one
//! primary account (when any account exists) and at most one primary
//! Pix key per account.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::document;
use crate::error::CoreError;
use crate::types::RecordId;

/// Kind of a Pix key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PixKind {
    Cpf,
    Cnpj,
    Email,
    Phone,
    Random,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PixKey {
    pub id: RecordId,
    pub kind: PixKind,
    pub value: String,
    #[serde(default)]
    pub is_primary: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankAccount {
    pub id: RecordId,
    pub bank_name: String,
    pub branch: String,
    pub account_number: String,
    /// e.g. "checking", "savings".
    pub account_kind: Option<String>,
    pub holder_name: Option<String>,
    #[serde(default)]
    pub is_primary: bool,
    #[serde(default)]
    pub pix_keys: Vec<PixKey>,
}

/// The organization's banking details, a single stored document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BankInfo {
    #[serde(default)]
    pub accounts: Vec<BankAccount>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PixKeyInput {
    pub id: Option<RecordId>,
    pub kind: PixKind,
    #[validate(length(min = 1, max = 200))]
    pub value: String,
    #[serde(default)]
    pub is_primary: bool,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BankAccountInput {
    pub id: Option<RecordId>,
    #[validate(length(min = 1, max = 200))]
    pub bank_name: String,
    #[validate(length(min = 1, max = 20))]
    pub branch: String,
    #[validate(length(min = 1, max = 30))]
    pub account_number: String,
    pub account_kind: Option<String>,
    pub holder_name: Option<String>,
    #[serde(default)]
    pub is_primary: bool,
    #[serde(default)]
    #[validate(nested)]
    pub pix_keys: Vec<PixKeyInput>,
}

/// Full-replace DTO for the `bank_info` document.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateBankInfo {
    #[serde(default)]
    #[validate(nested)]
    pub accounts: Vec<BankAccountInput>,
}

/// Pix keys of CPF/CNPJ kind must carry a checksum-valid number.
pub fn validate_pix_keys(input: &UpdateBankInfo) -> Result<(), CoreError> {
    for account in &input.accounts {
        for key in &account.pix_keys {
            let ok = match key.kind {
                PixKind::Cpf => document::validate_cpf(&key.value),
                PixKind::Cnpj => document::validate_cnpj(&key.value),
                PixKind::Email | PixKind::Phone | PixKind::Random => true,
            };
            if !ok {
                return Err(CoreError::Validation(format!(
                    "Invalid Pix key for {}: {}",
                    account.bank_name, key.value
                )));
            }
        }
    }
    Ok(())
}

impl BankInfo {
    pub fn from_update(input: UpdateBankInfo) -> Self {
        let accounts = input
            .accounts
            .into_iter()
            .map(|a| BankAccount {
                id: a.id.unwrap_or_else(RecordId::new_v4),
                bank_name: a.bank_name,
                branch: a.branch,
                account_number: a.account_number,
                account_kind: a.account_kind,
                holder_name: a.holder_name,
                is_primary: a.is_primary,
                pix_keys: a
                    .pix_keys
                    .into_iter()
                    .map(|k| PixKey {
                        id: k.id.unwrap_or_else(RecordId::new_v4),
                        kind: k.kind,
                        value: k.value,
                        is_primary: k.is_primary,
                    })
                    .collect(),
            })
            .collect();
        let mut info = Self { accounts };
        info.normalize_primaries();
        info
    }

    /// Enforce the primary-designation invariant.
    ///
    /// The first account flagged primary wins and the rest are cleared;
    /// when none is flagged the first account becomes primary. The same
    /// first-wins rule applies to each account's Pix keys, except that a
    /// keyless or unflagged key list stays unflagged.
    pub fn normalize_primaries(&mut self) {
        let primary_idx = self
            .accounts
            .iter()
            .position(|a| a.is_primary)
            .unwrap_or(0);
        for (idx, account) in self.accounts.iter_mut().enumerate() {
            account.is_primary = idx == primary_idx;

            let key_idx = account.pix_keys.iter().position(|k| k.is_primary);
            if let Some(key_idx) = key_idx {
                for (i, key) in account.pix_keys.iter_mut().enumerate() {
                    key.is_primary = i == key_idx;
                }
            }
        }
    }

    pub fn primary_account(&self) -> Option<&BankAccount> {
        self.accounts.iter().find(|a| a.is_primary)
    }
}
