use super::ui;
use crate::converter::{ExchangeRateConverter, apply};
use crate::core::{CancelSignal, Conversion, RateSnapshot, RateSource};
use anyhow::Result;
use comfy_table::Cell;
use rust_decimal::Decimal;

/// Renders `amount` converted through every direction of one snapshot.
pub fn display_summary(amount: Decimal, snapshot: &RateSnapshot) -> Result<String> {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Conversion"),
        ui::header_cell("Amount"),
        ui::header_cell("Rate"),
        ui::header_cell("Result"),
    ]);

    for conversion in Conversion::ALL {
        let result = apply(amount, conversion, snapshot)?;
        table.add_row(vec![
            Cell::new(conversion.to_string()),
            ui::amount_cell(amount, 2),
            ui::amount_cell(conversion.rate(snapshot), 6),
            ui::amount_cell(result, 2),
        ]);
    }

    let mut output = format!(
        "Conversions for {}\n\n",
        ui::style_text(&ui::format_amount(amount, 2), ui::StyleType::Title)
    );
    output.push_str(&table.to_string());

    if let Some(date) = snapshot.dollar_date.as_deref() {
        output.push_str(&format!(
            "\n\n{} {}",
            ui::style_text("Rates published:", ui::StyleType::TotalLabel),
            date
        ));
    }
    if snapshot.euro_in_colones.is_none() {
        output.push_str(&format!(
            "\n{}",
            ui::style_text(
                "Euro ↔ colones use the cross rate through the dollar.",
                ui::StyleType::Subtle
            )
        ));
    }
    Ok(output)
}

pub async fn run<S: RateSource>(
    converter: &ExchangeRateConverter<S>,
    amount: Decimal,
    cancel: &CancelSignal,
) -> Result<()> {
    let pb = ui::new_spinner("Fetching exchange rates...");
    let snapshot = converter.snapshot(Some(cancel)).await;
    pb.finish_and_clear();

    let snapshot = snapshot?;
    println!("{}", display_summary(amount, &snapshot)?);
    Ok(())
}
