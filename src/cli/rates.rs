use super::ui;
use crate::converter::ExchangeRateConverter;
use crate::core::{CancelSignal, DollarRate, EuroRate, RateSource};
use anyhow::Result;
use comfy_table::Cell;

pub fn display_rates(dollar: &DollarRate, euro: &EuroRate) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Currency"),
        ui::header_cell("Date"),
        ui::header_cell("Sale (CRC)"),
        ui::header_cell("Purchase (CRC)"),
        ui::header_cell("In CRC"),
        ui::header_cell("In USD"),
    ]);

    table.add_row(vec![
        Cell::new("USD"),
        Cell::new(dollar.date.as_deref().unwrap_or("N/A")),
        ui::amount_cell(dollar.sale, 2),
        ui::amount_cell(dollar.purchase, 2),
        ui::na_cell(),
        ui::amount_cell(rust_decimal::Decimal::ONE, 4),
    ]);
    table.add_row(vec![
        Cell::new("EUR"),
        Cell::new(euro.date.as_deref().unwrap_or("N/A")),
        ui::na_cell(),
        ui::na_cell(),
        ui::format_optional_cell(euro.colones, |c| ui::format_amount(c, 2)),
        ui::amount_cell(euro.dollars, 4),
    ]);

    let mut output = format!(
        "{}\n\n",
        ui::style_text("Ministerio de Hacienda exchange rates", ui::StyleType::Title)
    );
    output.push_str(&table.to_string());
    if let Some(purchase_date) = dollar
        .purchase_date
        .as_deref()
        .filter(|d| Some(*d) != dollar.date.as_deref())
    {
        output.push_str(&format!(
            "\n\n{} {}",
            ui::style_text("Dollar purchase rate published:", ui::StyleType::TotalLabel),
            purchase_date
        ));
    }
    if euro.colones.is_none() {
        output.push_str(&format!(
            "\n\n{}",
            ui::style_text(
                "Euro rate in colones is only published during business hours.",
                ui::StyleType::Subtle
            )
        ));
    }
    output
}

pub async fn run<S: RateSource>(
    converter: &ExchangeRateConverter<S>,
    cancel: &CancelSignal,
) -> Result<()> {
    let pb = ui::new_spinner("Fetching exchange rates...");
    // The second call is served from the same snapshot when caching is on.
    let rates = async {
        let dollar = converter.dollar_rate(Some(cancel)).await?;
        let euro = converter.euro_rate(Some(cancel)).await?;
        Ok::<_, crate::core::RateError>((dollar, euro))
    }
    .await;
    pb.finish_and_clear();

    let (dollar, euro) = rates?;
    println!("{}", display_rates(&dollar, &euro));
    Ok(())
}
