//! Payment request validation.

use payflow_types::{Currency, PaymentRequest};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Largest amount accepted for a single payment.
pub const MAX_PAYMENT_AMOUNT: Decimal = dec!(10000);

const CARD_NUMBER_LEN: usize = 16;

/// Checks required fields and basic constraints of a payment request.
///
/// Returns `false` on the first failed rule; the processor turns that into
/// `PaymentError::Validation`.
pub fn validate_payment_request(request: &PaymentRequest) -> bool {
    let required = [
        &request.user_id,
        &request.email,
        &request.card_number,
        &request.cvv,
        &request.currency,
    ];
    if required.iter().any(|field| field.is_empty()) {
        return false;
    }

    if request.amount <= Decimal::ZERO || request.amount > MAX_PAYMENT_AMOUNT {
        return false;
    }

    let card = request.normalized_card_number();
    if card.len() != CARD_NUMBER_LEN || !card.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }

    if !(3..=4).contains(&request.cvv.chars().count()) {
        return false;
    }

    request.currency.parse::<Currency>().is_ok()
}
