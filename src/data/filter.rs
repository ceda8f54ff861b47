use super::model::{FilteredView, SelectionKey, TripTable};

/// Return every record whose origin, destination and class equal `key`.
///
/// Comparison is exact and case-sensitive. No match yields an empty view;
/// callers check [`FilteredView::is_empty`] before aggregating.
pub fn filter<'a>(table: &'a TripTable, key: &SelectionKey) -> FilteredView<'a> {
    let view = FilteredView::new(
        table
            .records()
            .iter()
            .filter(|rec| {
                rec.from == key.origin && rec.to == key.destination && rec.class == key.class
            })
            .collect(),
    );

    log::debug!(
        "Selection {} → {} ({}) matched {} of {} records",
        key.origin,
        key.destination,
        key.class,
        view.len(),
        table.len()
    );
    view
}
