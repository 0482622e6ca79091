//! `price` and `check` command handlers.

use rust_decimal::Decimal;
use servicearea_core::{PricingResolver, SettingsRepository};

/// Prints the price for a raw distance or for an address pair.
///
/// The provider key for address lookups comes from the stored settings.
///
/// # Errors
///
/// Returns an error if an input is missing, the provider lookup fails, or
/// the stores cannot be read.
pub(crate) async fn run_price(
    resolver: &PricingResolver,
    settings: &dyn SettingsRepository,
    distance: Option<Decimal>,
    origin: Option<String>,
    destination: Option<String>,
) -> anyhow::Result<()> {
    if let Some(distance_km) = distance {
        let price = resolver.price_for_distance(distance_km).await?;
        println!("distance: {distance_km} km");
        println!("price:    {}", fmt_price(price));
        return Ok(());
    }

    let api_key = settings.get_settings().await?.api_key;
    let quote = resolver
        .price_for_addresses(
            origin.as_deref().unwrap_or_default(),
            destination.as_deref().unwrap_or_default(),
            &api_key,
        )
        .await?;

    println!("distance: {} km", quote.distance_km);
    println!("duration: {}", quote.duration);
    println!("price:    {}", fmt_price(quote.price));
    Ok(())
}

/// Prints the service-area verdict for a customer address.
///
/// # Errors
///
/// Returns an error if the store address or provider key is not configured,
/// the provider lookup fails, or the stores cannot be read.
pub(crate) async fn run_check(resolver: &PricingResolver, destination: &str) -> anyhow::Result<()> {
    let check = resolver.check_service_area(destination).await?;

    println!("from:     {}", check.origin);
    println!("to:       {}", destination.trim());
    println!("distance: {} km", check.quote.distance_km);
    println!("duration: {}", check.quote.duration);
    println!(
        "service:  {} (radius {} km)",
        if check.within_service_area {
            "within area"
        } else {
            "outside area"
        },
        check.max_service_radius
    );
    println!("price:    {}", fmt_price(check.quote.price));
    Ok(())
}

fn fmt_price(price: Option<Decimal>) -> String {
    price.map_or_else(|| "no range covers this distance".to_string(), |p| p.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uncovered_distance_is_explained() {
        assert_eq!(fmt_price(None), "no range covers this distance");
        assert_eq!(fmt_price(Some(Decimal::new(1250, 2))), "12.50");
    }
}
