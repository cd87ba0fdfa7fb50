use super::ui;
use crate::converter::ExchangeRateConverter;
use crate::core::{CancelSignal, Conversion, Currency, RateSource};
use anyhow::{Result, bail};
use rust_decimal::Decimal;

pub fn format_conversion(amount: Decimal, from: Currency, result: Decimal, to: Currency) -> String {
    format!(
        "{}{} {} = {}",
        from.symbol(),
        ui::format_amount(amount, 2),
        from,
        ui::style_text(
            &format!("{}{} {}", to.symbol(), ui::format_amount(result, 2), to),
            ui::StyleType::TotalValue
        )
    )
}

pub async fn run<S: RateSource>(
    converter: &ExchangeRateConverter<S>,
    amount: Decimal,
    from: Currency,
    to: Currency,
    cancel: &CancelSignal,
) -> Result<()> {
    let Some(conversion) = Conversion::between(from, to) else {
        bail!("Nothing to convert: source and target currency are both {from}");
    };

    let pb = ui::new_spinner("Fetching exchange rates...");
    let result = converter.convert(amount, conversion, Some(cancel)).await;
    pb.finish_and_clear();

    println!("{}", format_conversion(amount, from, result?, to));
    Ok(())
}
