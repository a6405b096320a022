//! Payment request domain model.

use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single payment attempt submitted by a caller.
///
/// Requests are never mutated by the workflow; the engine only borrows them.
/// `Debug` masks the card number and omits the verification code.
#[derive(Clone, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub user_id: String,
    pub amount: Decimal,
    /// ISO 4217 code as submitted; checked against the supported set during validation
    pub currency: String,
    pub card_number: String,
    pub cvv: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_zip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BTreeMap<String, serde_json::Value>>,
}

impl PaymentRequest {
    pub fn new(
        user_id: impl Into<String>,
        amount: Decimal,
        currency: impl Into<String>,
        card_number: impl Into<String>,
        cvv: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            amount,
            currency: currency.into(),
            card_number: card_number.into(),
            cvv: cvv.into(),
            email: email.into(),
            billing_zip: None,
            metadata: None,
        }
    }

    pub fn with_billing_zip(mut self, zip: impl Into<String>) -> Self {
        self.billing_zip = Some(zip.into());
        self
    }

    pub fn with_metadata(mut self, metadata: BTreeMap<String, serde_json::Value>) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Card number with spaces removed.
    pub fn normalized_card_number(&self) -> String {
        self.card_number.chars().filter(|c| *c != ' ').collect()
    }

    /// Last four characters of the card number, safe for logs and receipts.
    pub fn card_last4(&self) -> String {
        let digits: Vec<char> = self.normalized_card_number().chars().collect();
        let start = digits.len().saturating_sub(4);
        digits[start..].iter().collect()
    }

    /// True when a non-blank billing postal code was supplied.
    pub fn has_billing_zip(&self) -> bool {
        self.billing_zip
            .as_deref()
            .is_some_and(|zip| !zip.trim().is_empty())
    }
}

impl fmt::Debug for PaymentRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let masked_card = format!("****{}", self.card_last4());
        f.debug_struct("PaymentRequest")
            .field("user_id", &self.user_id)
            .field("amount", &self.amount)
            .field("currency", &self.currency)
            .field("card_number", &masked_card)
            .field("email", &self.email)
            .field("billing_zip", &self.billing_zip)
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}
