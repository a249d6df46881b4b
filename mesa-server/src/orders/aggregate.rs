//! Joined rows → nested table views
//!
//! Both table listings come back from the store as flat rows of
//! tables ⟕ orders ⟕ lines. They are folded back into one entry per key in a
//! single pass, keeping the order in which keys first appear.

use std::hash::Hash;

use indexmap::IndexMap;
use rust_decimal::Decimal;
use shared::models::{LineSummary, OrderSummary, TableView};

use super::money::{self, DEFAULT_QUANTITY};
use crate::db::TableOrderRow;

/// Group rows by `key`, creating each group from its first row with `init`
/// and feeding every row (the first included) to `fold`.
pub fn group_rows<R, K, G, FK, FI, FF>(
    rows: impl IntoIterator<Item = R>,
    key: FK,
    mut init: FI,
    mut fold: FF,
) -> Vec<G>
where
    K: Hash + Eq,
    FK: Fn(&R) -> K,
    FI: FnMut(&R) -> G,
    FF: FnMut(&mut G, R),
{
    let mut groups: IndexMap<K, G> = IndexMap::new();
    for row in rows {
        let group = groups.entry(key(&row)).or_insert_with(|| init(&row));
        fold(group, row);
    }
    groups.into_values().collect()
}

/// Every table with its open order (or `None`), totals computed from lines
pub fn open_table_views(rows: Vec<TableOrderRow>) -> Vec<TableView> {
    group_rows(
        rows,
        |row| row.table_id,
        |row| table_view(row, false),
        push_line,
    )
}

/// Tables with an order closed today, carrying the order timestamp
///
/// Keyed by table like the open view: when one table closed several orders,
/// the entry keeps the first order's id and date and collects every line.
pub fn closed_table_views(rows: Vec<TableOrderRow>) -> Vec<TableView> {
    group_rows(
        rows,
        |row| row.table_id,
        |row| table_view(row, true),
        push_line,
    )
}

fn table_view(row: &TableOrderRow, with_date: bool) -> TableView {
    let order = match (row.order_id, row.status) {
        (Some(id), Some(status)) => Some(OrderSummary {
            id,
            status,
            created_at: if with_date { row.created_at } else { None },
            lines: Vec::new(),
            total: Decimal::ZERO,
        }),
        _ => None,
    };
    TableView {
        id: row.table_id,
        name: row.table_name.clone(),
        order,
    }
}

fn push_line(view: &mut TableView, row: TableOrderRow) {
    // An order without lines still yields one joined row, with null line columns.
    let (Some(order), Some(_), Some(name), Some(price)) =
        (view.order.as_mut(), row.line_id, row.name, row.price)
    else {
        return;
    };
    let quantity = row.quantity.unwrap_or(DEFAULT_QUANTITY);
    order.total += money::line_total(price, quantity);
    order.lines.push(LineSummary {
        name,
        category: row.category.unwrap_or_default(),
        price,
        quantity,
    });
}
