// src/services/commission.rs

use rust_decimal::Decimal;

use crate::{
    common::error::AppError,
    models::{PaymentType, Tarif},
};

/// Commission owed to one staff member for one settled sale. Pure function:
/// the caller decides whether and how to apply the result.
///
/// A `fixed` tarif pays the flat amount for the sale's payment method,
/// independent of the total. A `percentage` tarif stores the rate as a
/// multiplier (0.05 means 5%) and scales with the total.
pub fn compute_payout(
    tarif: &Tarif,
    payment_type: PaymentType,
    sale_total: Decimal,
) -> Result<Decimal, AppError> {
    let amount = match payment_type {
        PaymentType::Card => tarif.amount_for_card,
        PaymentType::Cash => tarif.amount_for_cash,
    };

    if tarif.tarif_type == Tarif::TYPE_FIXED {
        Ok(amount)
    } else if tarif.tarif_type == Tarif::TYPE_PERCENTAGE {
        Ok(amount * sale_total)
    } else {
        Err(AppError::InvalidTarif(tarif.tarif_type.clone()))
    }
}
