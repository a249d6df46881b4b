//! Money calculation and item validation
//!
//! All amounts are `Decimal` with 2 decimal places, rounded half away from
//! zero.

use rust_decimal::prelude::*;
use shared::models::NewItem;

use super::error::OrderError;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Quantity written for every inserted line
pub const DEFAULT_QUANTITY: i32 = 1;

/// Maximum allowed price per item (€1,000,000)
const MAX_PRICE: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);
/// Maximum number of items accepted in one request
pub const MAX_ITEMS_PER_REQUEST: usize = 100;
const MAX_NAME_LEN: usize = 120;
const MAX_CATEGORY_LEN: usize = 60;

/// Round to currency precision
#[inline]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// price × quantity
#[inline]
pub fn line_total(price: Decimal, quantity: i32) -> Decimal {
    round_money(price * Decimal::from(quantity))
}

/// Σ price × quantity, zero for no lines
pub fn order_total<I>(lines: I) -> Decimal
where
    I: IntoIterator<Item = (Decimal, i32)>,
{
    lines
        .into_iter()
        .fold(Decimal::ZERO, |acc, (price, quantity)| {
            acc + line_total(price, quantity)
        })
}

/// Validate a single item; accepted items are stored exactly as sent
pub fn validate_item(item: NewItem) -> Result<NewItem, OrderError> {
    let name = item.name.trim();
    if name.is_empty() {
        return Err(OrderError::Validation(
            "nombre must not be empty".to_string(),
        ));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(OrderError::Validation(format!(
            "nombre exceeds {} characters",
            MAX_NAME_LEN
        )));
    }

    if item.category.trim().chars().count() > MAX_CATEGORY_LEN {
        return Err(OrderError::Validation(format!(
            "categoria exceeds {} characters",
            MAX_CATEGORY_LEN
        )));
    }

    if item.price.is_sign_negative() && !item.price.is_zero() {
        return Err(OrderError::Validation(format!(
            "precio must be non-negative, got {}",
            item.price
        )));
    }
    if item.price > MAX_PRICE {
        return Err(OrderError::Validation(format!(
            "precio exceeds maximum allowed ({}), got {}",
            MAX_PRICE, item.price
        )));
    }
    if round_money(item.price) != item.price {
        return Err(OrderError::Validation(format!(
            "precio has more than {} decimal places, got {}",
            DECIMAL_PLACES, item.price
        )));
    }

    Ok(item)
}

/// Validate a whole request; an empty list is allowed
pub fn validate_items(items: Vec<NewItem>) -> Result<Vec<NewItem>, OrderError> {
    if items.len() > MAX_ITEMS_PER_REQUEST {
        return Err(OrderError::Validation(format!(
            "too many items in one request (max {}), got {}",
            MAX_ITEMS_PER_REQUEST,
            items.len()
        )));
    }
    items.into_iter().map(validate_item).collect()
}
