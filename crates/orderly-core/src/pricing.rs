//! # Pricing Module
//!
//! Pure order arithmetic: line totals, discounts, tax, order totals.
//!
//! ## Calculation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  per item:                                                              │
//! │    pre      = unit_price × qty + Σ(modifier.unit_price × modifier.qty)  │
//! │    discount = PERCENTAGE: round(pre × v / 100)   FIXED: min(v, pre)     │
//! │    subtotal = max(pre - discount, 0)                                    │
//! │                                                                         │
//! │  per order:                                                             │
//! │    subtotal = Σ item.subtotal                                           │
//! │    discount = same rule on subtotal, clamped to [0, subtotal]           │
//! │    tax      = TaxPolicy(subtotal - discount)                            │
//! │    total    = subtotal - discount + tax                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rounding is half-up to 2 digits and happens only where a percentage is
//! applied. Everything else is exact integer arithmetic on minor units.
//!
//! Discount values are clamped, never rejected: a percentage is read within
//! `[0, 100]` and any discount amount lands within `[0, base]`. Amounts that
//! leave the money range come back as `None`.

use rust_decimal::Decimal;

use crate::money::Money;
use crate::types::{Discount, DiscountType, TaxRate};

// =============================================================================
// Discounts
// =============================================================================

impl Discount {
    /// Amount this discount takes off `base`, always within `[0, base]`.
    ///
    /// Negative values take nothing off; percentages above 100 and fixed
    /// amounts above `base` take all of it.
    ///
    /// ```rust
    /// use orderly_core::money::Money;
    /// use orderly_core::types::{Discount, DiscountType};
    /// use rust_decimal::Decimal;
    ///
    /// let fixed = Discount { kind: DiscountType::FixedAmount, value: Decimal::from(500) };
    /// assert_eq!(fixed.amount_on(Money::from_major(300)), Money::from_major(300));
    /// ```
    pub fn amount_on(&self, base: Money) -> Money {
        if base.is_negative() || base.is_zero() {
            return Money::zero();
        }

        let raw = match self.kind {
            DiscountType::Percentage => base.percentage(self.value),
            DiscountType::FixedAmount if self.value <= Decimal::ZERO => Money::zero(),
            // positive values beyond the money range cap at base
            DiscountType::FixedAmount => Money::from_decimal(self.value).unwrap_or(base),
        };

        raw.floor_zero().min(base)
    }
}

// =============================================================================
// Item Pricing
// =============================================================================

/// A priced modifier selection on a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModifierCharge {
    pub unit_price: Money,
    pub quantity: i64,
}

/// Totals for a single order line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemTotals {
    /// Product plus modifiers, before the item discount.
    pub pre_discount: Money,
    pub discount_amount: Money,
    pub subtotal: Money,
}

/// Prices one order line.
///
/// ## Example
/// ```rust
/// use orderly_core::money::Money;
/// use orderly_core::pricing::{price_item, ModifierCharge};
///
/// let extra_cheese = ModifierCharge { unit_price: Money::from_major(5_000), quantity: 1 };
/// let totals = price_item(Money::from_major(25_000), 1, &[extra_cheese], None).unwrap();
/// assert_eq!(totals.subtotal.to_string(), "30000.00");
/// ```
///
/// Returns `None` when the line amount leaves the money range.
pub fn price_item(
    unit_price: Money,
    quantity: i64,
    modifiers: &[ModifierCharge],
    discount: Option<&Discount>,
) -> Option<ItemTotals> {
    let mut pre_discount = unit_price.checked_mul_quantity(quantity)?;
    for m in modifiers {
        pre_discount = pre_discount.checked_add(m.unit_price.checked_mul_quantity(m.quantity)?)?;
    }

    let discount_amount = discount
        .map(|d| d.amount_on(pre_discount))
        .unwrap_or_default();

    Some(ItemTotals {
        pre_discount,
        discount_amount,
        subtotal: pre_discount.checked_sub(discount_amount)?.floor_zero(),
    })
}

// =============================================================================
// Tax
// =============================================================================

/// Computes order-level tax on the discounted subtotal.
///
/// Tax rules live outside the engine; this is the injection point.
/// `None` means the tax does not fit the money range.
pub trait TaxPolicy: Send + Sync {
    fn tax_on(&self, taxable: Money) -> Option<Money>;
}

/// Placeholder policy: no tax.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroTax;

impl TaxPolicy for ZeroTax {
    fn tax_on(&self, _taxable: Money) -> Option<Money> {
        Some(Money::zero())
    }
}

/// Single flat rate over the whole taxable amount.
#[derive(Debug, Clone, Copy)]
pub struct FlatRateTax(pub TaxRate);

impl TaxPolicy for FlatRateTax {
    fn tax_on(&self, taxable: Money) -> Option<Money> {
        taxable.floor_zero().calculate_tax(self.0)
    }
}

// =============================================================================
// Order Pricing
// =============================================================================

/// Header totals of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OrderTotals {
    pub subtotal: Money,
    pub discount_amount: Money,
    pub tax_amount: Money,
    pub total_amount: Money,
}

/// Order-level calculator, parameterized by the tax policy.
#[derive(Debug, Clone, Default)]
pub struct PricingCalculator<T = ZeroTax> {
    tax: T,
}

impl PricingCalculator<ZeroTax> {
    pub fn new() -> Self {
        Self { tax: ZeroTax }
    }
}

impl<T: TaxPolicy> PricingCalculator<T> {
    pub fn with_tax_policy(tax: T) -> Self {
        Self { tax }
    }

    /// Rolls item subtotals up into order totals. `None` when a total leaves
    /// the money range.
    ///
    /// ```rust
    /// use orderly_core::money::Money;
    /// use orderly_core::pricing::PricingCalculator;
    /// use orderly_core::types::{Discount, DiscountType};
    /// use rust_decimal::Decimal;
    ///
    /// let ten_pct = Discount { kind: DiscountType::Percentage, value: Decimal::from(10) };
    /// let totals = PricingCalculator::new()
    ///     .order_totals([Money::from_major(50_000)], Some(&ten_pct))
    ///     .unwrap();
    /// assert_eq!(totals.discount_amount.to_string(), "5000.00");
    /// assert_eq!(totals.total_amount.to_string(), "45000.00");
    /// ```
    pub fn order_totals<I>(
        &self,
        item_subtotals: I,
        discount: Option<&Discount>,
    ) -> Option<OrderTotals>
    where
        I: IntoIterator<Item = Money>,
    {
        let subtotal = Money::checked_sum(item_subtotals)?;
        let discount_amount = discount
            .map(|d| d.amount_on(subtotal))
            .unwrap_or_default();
        let taxable = subtotal.checked_sub(discount_amount)?;
        let tax_amount = self.tax.tax_on(taxable)?;

        Some(OrderTotals {
            subtotal,
            discount_amount,
            tax_amount,
            total_amount: taxable.checked_add(tax_amount)?,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn pct(v: &str) -> Discount {
        Discount {
            kind: DiscountType::Percentage,
            value: Decimal::from_str(v).unwrap(),
        }
    }

    fn fixed(v: &str) -> Discount {
        Discount {
            kind: DiscountType::FixedAmount,
            value: Decimal::from_str(v).unwrap(),
        }
    }

    #[test]
    fn test_simple_line() {
        let t = price_item(Money::from_major(12_500), 2, &[], None).unwrap();
        assert_eq!(t.pre_discount.to_string(), "25000.00");
        assert_eq!(t.discount_amount, Money::zero());
        assert_eq!(t.subtotal.to_string(), "25000.00");
    }

    #[test]
    fn test_modifiers_are_added_per_quantity() {
        let mods = [
            ModifierCharge {
                unit_price: Money::from_major(5_000),
                quantity: 1,
            },
            ModifierCharge {
                unit_price: Money::from_minor(250),
                quantity: 3,
            },
        ];
        let t = price_item(Money::from_major(25_000), 1, &mods, None).unwrap();
        assert_eq!(t.subtotal.to_string(), "30007.50");
    }

    #[test]
    fn test_item_percentage_discount_includes_modifiers() {
        let mods = [ModifierCharge {
            unit_price: Money::from_major(5_000),
            quantity: 1,
        }];
        let t = price_item(Money::from_major(25_000), 1, &mods, Some(&pct("10"))).unwrap();
        assert_eq!(t.discount_amount.to_string(), "3000.00");
        assert_eq!(t.subtotal.to_string(), "27000.00");
    }

    #[test]
    fn test_fixed_discount_capped_at_line() {
        let t = price_item(Money::from_major(100), 1, &[], Some(&fixed("150"))).unwrap();
        assert_eq!(t.discount_amount, Money::from_major(100));
        assert_eq!(t.subtotal, Money::zero());
    }

    #[test]
    fn test_percentage_rounds_half_up_once() {
        // 33.35 * 50% = 16.675 -> 16.68
        let t = price_item(Money::from_minor(3335), 1, &[], Some(&pct("50"))).unwrap();
        assert_eq!(t.discount_amount.minor(), 1668);
        assert_eq!(t.subtotal.minor(), 1667);
    }

    #[test]
    fn test_order_percentage_discount() {
        let totals = PricingCalculator::new()
            .order_totals(
                [Money::from_major(30_000), Money::from_major(20_000)],
                Some(&pct("10")),
            )
            .unwrap();
        assert_eq!(totals.subtotal.to_string(), "50000.00");
        assert_eq!(totals.discount_amount.to_string(), "5000.00");
        assert_eq!(totals.tax_amount, Money::zero());
        assert_eq!(totals.total_amount.to_string(), "45000.00");
    }

    #[test]
    fn test_order_discount_clamped_to_subtotal() {
        let totals = PricingCalculator::new()
            .order_totals([Money::from_major(10)], Some(&fixed("99")))
            .unwrap();
        assert_eq!(totals.discount_amount, Money::from_major(10));
        assert_eq!(totals.total_amount, Money::zero());
    }

    #[test]
    fn test_total_identity_with_flat_tax() {
        let calc = PricingCalculator::with_tax_policy(FlatRateTax(TaxRate::from_bps(1100)));
        let totals = calc
            .order_totals(
                [Money::from_minor(1_234_567), Money::from_minor(89)],
                Some(&pct("12.5")),
            )
            .unwrap();
        assert_eq!(
            Some(totals.total_amount),
            totals
                .subtotal
                .checked_sub(totals.discount_amount)
                .and_then(|m| m.checked_add(totals.tax_amount))
        );
        assert!(totals.discount_amount <= totals.subtotal);
        // (12346.56 - 1543.32) * 11% = 1188.3564 -> 1188.36
        assert_eq!(totals.discount_amount.to_string(), "1543.32");
        assert_eq!(totals.tax_amount.to_string(), "1188.36");
    }

    #[test]
    fn test_zero_percent_and_empty_order() {
        let t = price_item(Money::from_major(10), 1, &[], Some(&pct("0"))).unwrap();
        assert_eq!(t.discount_amount, Money::zero());

        let totals = PricingCalculator::new().order_totals(std::iter::empty(), None);
        assert_eq!(totals, Some(OrderTotals::default()));
    }

    #[test]
    fn test_out_of_range_discount_values_are_clamped() {
        let line = Money::from_major(12_500);
        let calc = PricingCalculator::new();

        let totals = calc.order_totals([line], Some(&pct("150"))).unwrap();
        assert_eq!(totals.discount_amount, totals.subtotal);
        assert_eq!(totals.total_amount.to_string(), "0.00");

        let totals = calc.order_totals([line], Some(&pct("-10"))).unwrap();
        assert_eq!(totals.discount_amount, Money::zero());
        assert_eq!(totals.total_amount, line);

        let totals = calc.order_totals([line], Some(&fixed("-5000"))).unwrap();
        assert_eq!(totals.discount_amount, Money::zero());

        let huge = Discount {
            kind: DiscountType::FixedAmount,
            value: Decimal::MAX,
        };
        let t = price_item(line, 1, &[], Some(&huge)).unwrap();
        assert_eq!(t.discount_amount, line);
        assert_eq!(t.subtotal, Money::zero());
    }

    #[test]
    fn test_line_overflow_is_none() {
        let price = Money::from_major(12_500);
        assert!(price_item(price, 10_000_000_000_000, &[], None).is_none());

        let loud = ModifierCharge {
            unit_price: Money::from_minor(i64::MAX),
            quantity: 1,
        };
        assert!(price_item(price, 1, &[loud], None).is_none());
    }

    #[test]
    fn test_order_overflow_is_none() {
        let half = Money::from_minor(i64::MAX / 2 + 1);
        assert!(PricingCalculator::new().order_totals([half, half], None).is_none());

        let taxed = PricingCalculator::with_tax_policy(FlatRateTax(TaxRate::from_bps(20_000)));
        assert!(taxed.order_totals([half], None).is_none());
    }
}
