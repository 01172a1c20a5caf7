//! Unit expansion and the global loading sequence.
//!
//! Every SKU is expanded into `quantity` unit instances which are then put
//! into one fixed order that is used for a whole multi-container run:
//! 1. ascending priority rank (low-priority cargo goes in first, deepest)
//! 2. descending unit weight (heavy units meet an empty floor)
//! 3. descending unit volume (large units get first pick of open space)
//!
//! The sort is stable, so units of one SKU stay adjacent and catalog order
//! breaks any remaining ties.

use std::cmp::Ordering;

use crate::model::{CargoItem, UnitItem};
use crate::types::Dimensional;

/// Expands every SKU into `quantity` independent units, in catalog order.
pub fn expand_units(cargo: &[CargoItem]) -> Vec<UnitItem> {
    let total: usize = cargo.iter().map(|c| c.quantity as usize).sum();
    let mut units = Vec::with_capacity(total);
    for item in cargo {
        let unit = UnitItem::from_cargo(item);
        units.extend(std::iter::repeat_n(unit, item.quantity as usize));
    }
    units
}

/// Compares two units by loading order.
pub fn loading_order(a: &UnitItem, b: &UnitItem) -> Ordering {
    a.priority
        .rank()
        .cmp(&b.priority.rank())
        .then_with(|| b.weight.partial_cmp(&a.weight).unwrap_or(Ordering::Equal))
        .then_with(|| {
            b.volume()
                .partial_cmp(&a.volume())
                .unwrap_or(Ordering::Equal)
        })
}

/// Sorts units in place into the global loading order.
pub fn sort_units(units: &mut [UnitItem]) {
    units.sort_by(loading_order);
}

/// Expands and sorts the cargo catalog into the loading sequence.
pub fn build_sequence(cargo: &[CargoItem]) -> Vec<UnitItem> {
    let mut units = expand_units(cargo);
    sort_units(&mut units);
    units
}
