//! Stages that turn the raw grid of an invoice into a clean [crate::table::InvoiceTable].
//!
//! Applied in order by [crate::invoice::InvoiceExtractor]: [header], [subtotal], [money],
//! [metric], then [summary].

pub mod header;
pub mod metric;
pub mod money;
pub mod subtotal;
pub mod summary;
