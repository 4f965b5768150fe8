use rust_decimal::Decimal;

use crate::item::LineItem;

/// Cart-level sums, computed in one pass over the content.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Totals {
    /// Sum of quantities.
    pub count: Decimal,
    /// Number of distinct rows.
    pub count_items: usize,
    /// Sum of quantity x unit price, before discount and tax.
    pub initial: Decimal,
    pub discount: Decimal,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub weight: Decimal,
}

impl Totals {
    pub fn of<'a>(items: impl IntoIterator<Item = &'a LineItem>) -> Self {
        items.into_iter().fold(Totals::default(), |mut totals, item| {
            let subtotal = item.subtotal();
            let tax = item.tax_total();
            totals.count += item.quantity();
            totals.count_items += 1;
            totals.initial += item.initial_total();
            totals.discount += item.discount_total();
            totals.subtotal += subtotal;
            totals.tax += tax;
            totals.total += subtotal + tax;
            totals.weight += item.weight_total();
            totals
        })
    }

    /// Same sums as [`Totals::of`], or None if any of them overflows.
    pub(crate) fn checked<'a>(items: impl IntoIterator<Item = &'a LineItem>) -> Option<Self> {
        items.into_iter().try_fold(Totals::default(), |mut totals, item| {
            let line = item.checked_amounts()?;
            totals.count = totals.count.checked_add(item.quantity())?;
            totals.count_items += 1;
            totals.initial = totals.initial.checked_add(line.initial)?;
            totals.discount = totals.discount.checked_add(line.discount)?;
            totals.subtotal = totals.subtotal.checked_add(line.subtotal)?;
            totals.tax = totals.tax.checked_add(line.tax)?;
            totals.total = totals.total.checked_add(line.total)?;
            totals.weight = totals.weight.checked_add(line.weight)?;
            Some(totals)
        })
    }
}
