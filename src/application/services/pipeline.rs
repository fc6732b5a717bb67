//! # Filter & Sort Pipeline
//!
//! Turns the full `all_providers` sequence into the comparison list:
//! keep successful quotes, apply the fee / delivery-time / custom
//! filters, then stable-sort by the selected criterion.
//!
//! Sorting is stable by construction (`Vec::sort_by`), so quotes equal
//! under the sort key keep their `all_providers` relative order.

use crate::domain::entities::aggregate::FiltersApplied;
use crate::domain::entities::quote::Quote;
use crate::domain::entities::request::QuoteOptions;
use crate::domain::value_objects::SortBy;
use rust_decimal::Decimal;
use std::cmp::Ordering;

/// Applies filters and the stable sort; returns the comparison list
/// plus a record of which filters were in force.
#[must_use]
pub fn filter_and_sort(all_providers: &[Quote], options: &QuoteOptions) -> (Vec<Quote>, FiltersApplied) {
    let mut quotes: Vec<Quote> = all_providers
        .iter()
        .filter(|q| q.success)
        .filter(|q| options.max_fee.map_or(true, |cap| q.fee <= cap))
        .filter(|q| {
            options.max_delivery_time_minutes.map_or(true, |cap| {
                // Unknown delivery times are dropped under a time filter.
                q.delivery_time_minutes.is_some_and(|minutes| minutes <= cap)
            })
        })
        .filter(|q| {
            options
                .custom_predicate
                .as_ref()
                .map_or(true, |predicate| predicate(q))
        })
        .cloned()
        .collect();

    quotes.sort_by(comparator(options.sort_by));

    let filters = FiltersApplied {
        sort_by: options.sort_by,
        max_fee: options.max_fee,
        max_delivery_time_minutes: options.max_delivery_time_minutes,
        custom_predicate: options.custom_predicate.is_some(),
    };
    (quotes, filters)
}

fn comparator(sort_by: SortBy) -> impl Fn(&Quote, &Quote) -> Ordering {
    move |a, b| match sort_by {
        SortBy::BestRate => by_best_rate(a, b),
        SortBy::LowestFee => by_lowest_fee(a, b),
        SortBy::FastestTime => by_fastest_time(a, b),
        SortBy::BestValue => by_best_value(a, b),
    }
}

fn rate_of(quote: &Quote) -> Decimal {
    quote.effective_rate().unwrap_or(Decimal::ZERO)
}

/// Descending rate; ties by ascending fee, then delivery time, then id.
fn by_best_rate(a: &Quote, b: &Quote) -> Ordering {
    rate_of(b)
        .cmp(&rate_of(a))
        .then_with(|| a.fee.cmp(&b.fee))
        .then_with(|| cmp_delivery(a, b))
        .then_with(|| a.provider_id.cmp(&b.provider_id))
}

/// Ascending fee; ties by descending rate, then delivery time, then id.
fn by_lowest_fee(a: &Quote, b: &Quote) -> Ordering {
    a.fee
        .cmp(&b.fee)
        .then_with(|| rate_of(b).cmp(&rate_of(a)))
        .then_with(|| cmp_delivery(a, b))
        .then_with(|| a.provider_id.cmp(&b.provider_id))
}

/// Ascending delivery time with unknowns last; ties by the lowest-fee
/// chain.
fn by_fastest_time(a: &Quote, b: &Quote) -> Ordering {
    cmp_delivery(a, b).then_with(|| by_lowest_fee(a, b))
}

/// Descending effective receive: `destination_amount − fee·rate`
/// expresses the fee in destination currency before subtracting.
fn by_best_value(a: &Quote, b: &Quote) -> Ordering {
    value_score(b).cmp(&value_score(a))
}

fn value_score(quote: &Quote) -> Decimal {
    quote.destination_amount - quote.fee * rate_of(quote)
}

fn cmp_delivery(a: &Quote, b: &Quote) -> Ordering {
    match (a.delivery_time_minutes, b.delivery_time_minutes) {
        (Some(ta), Some(tb)) => ta.cmp(&tb),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
