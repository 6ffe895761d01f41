//! Receipt
//!
//! Plain-text rendering of a cart or a placed order for terminals.

use std::io;

use tabled::{
    builder::Builder,
    settings::{
        Alignment, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::{Cart, CartLine},
    checkout::{Order, OrderSummary},
    pricing::TotalPriceError,
};

/// Errors that can occur when writing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Error calculating a line total.
    #[error(transparent)]
    TotalPrice(#[from] TotalPriceError),

    /// IO error
    #[error("IO error")]
    IO,
}

/// Write the cart's lines followed by its order summary.
///
/// # Errors
///
/// Returns an error if a line total cannot be computed or the output cannot be written.
pub fn write_cart(
    mut out: impl io::Write,
    cart: &Cart,
    summary: &OrderSummary,
) -> Result<(), ReceiptError> {
    if cart.is_empty() {
        return writeln!(out, "Your cart is empty").map_err(|_err| ReceiptError::IO);
    }

    writeln!(out, "Cart ({} items)", summary.item_count).map_err(|_err| ReceiptError::IO)?;
    write_lines(&mut out, cart.lines())?;
    write_summary(&mut out, summary)
}

/// Write a placed order: number, status, lines and summary.
///
/// # Errors
///
/// Returns an error if a line total cannot be computed or the output cannot be written.
pub fn write_order(mut out: impl io::Write, order: &Order) -> Result<(), ReceiptError> {
    writeln!(out, "Order #{} ({})", order.number, order.status).map_err(|_err| ReceiptError::IO)?;
    write_lines(&mut out, &order.lines)?;
    write_summary(&mut out, &order.summary)
}

fn write_lines(out: &mut impl io::Write, lines: &[CartLine]) -> Result<(), ReceiptError> {
    let mut builder = Builder::default();

    builder.push_record(["Item", "Unit Price", "Qty", "Line Total"]);

    for line in lines {
        builder.push_record([
            line.title().to_string(),
            line.price().to_string(),
            line.quantity().to_string(),
            line.total()?.to_string(),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Columns::new(1..4), Alignment::right());
    table.modify(Rows::first(), Alignment::center());

    writeln!(out, "{table}").map_err(|_err| ReceiptError::IO)
}

fn write_summary(out: &mut impl io::Write, summary: &OrderSummary) -> Result<(), ReceiptError> {
    let rows = [
        ("Subtotal:", summary.subtotal.to_string()),
        ("Delivery Fee:", summary.delivery_fee.to_string()),
        ("Tax:", summary.tax.to_string()),
        ("Total:", summary.total.to_string()),
    ];

    let label_width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    let value_width = rows.iter().map(|(_, value)| value.len()).max().unwrap_or(0);

    for (label, value) in rows {
        writeln!(out, " {label:<label_width$} {value:>value_width$}")
            .map_err(|_err| ReceiptError::IO)?;
    }

    Ok(())
}
