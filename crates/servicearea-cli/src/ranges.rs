//! `ranges` command handlers.

use clap::Subcommand;
use rust_decimal::Decimal;
use servicearea_core::{NewPricingRange, PricingRange, RangeRepository};

/// Sub-commands available under `ranges`.
#[derive(Debug, Subcommand)]
pub enum RangesCommands {
    /// List all pricing ranges in ascending distance order
    List,
    /// Add a pricing range covering [min, max] km inclusive
    Add {
        #[arg(long)]
        min: Decimal,
        #[arg(long)]
        max: Decimal,
        #[arg(long)]
        price: Decimal,
    },
    /// Delete a pricing range by id
    Delete { id: i64 },
}

/// # Errors
///
/// Returns an error if validation fails, the range overlaps an existing one,
/// the id does not exist, or the store cannot be reached.
pub(crate) async fn run_ranges(
    store: &dyn RangeRepository,
    command: RangesCommands,
) -> anyhow::Result<()> {
    match command {
        RangesCommands::List => {
            let ranges = store.list().await?;
            if ranges.is_empty() {
                println!("no pricing ranges configured; add one with `ranges add`");
            } else {
                print!("{}", format_ranges(&ranges));
            }
        }
        RangesCommands::Add { min, max, price } => {
            let id = store.insert(NewPricingRange::new(min, max, price)).await?;
            println!("added range {id}: {min}-{max} km at {price}");
        }
        RangesCommands::Delete { id } => {
            store.delete(id).await?;
            println!("deleted range {id}");
        }
    }
    Ok(())
}

fn format_ranges(ranges: &[PricingRange]) -> String {
    use std::fmt::Write as _;

    let mut out = format!("{:<8}{:<12}{:<12}PRICE\n", "ID", "MIN KM", "MAX KM");
    for range in ranges {
        let _ = writeln!(
            out,
            "{:<8}{:<12}{:<12}{}",
            range.id,
            range.min_distance.to_string(),
            range.max_distance.to_string(),
            range.price
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use servicearea_core::MemoryRangeStore;

    use super::*;

    #[test]
    fn format_ranges_prints_one_row_per_range() {
        let ranges = vec![PricingRange {
            id: 7,
            min_distance: Decimal::ZERO,
            max_distance: Decimal::from(10),
            price: Decimal::new(2550, 2),
            created_at: Utc::now(),
        }];

        let table = format_ranges(&ranges);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("ID"));
        assert!(lines[1].starts_with("7 "));
        assert!(lines[1].ends_with("25.50"));
    }

    #[tokio::test]
    async fn add_then_delete_through_the_store() {
        let store = MemoryRangeStore::new();
        run_ranges(
            &store,
            RangesCommands::Add {
                min: Decimal::ZERO,
                max: Decimal::from(10),
                price: Decimal::from(25),
            },
        )
        .await
        .expect("add");
        let id = store.list().await.unwrap()[0].id;

        run_ranges(&store, RangesCommands::Delete { id })
            .await
            .expect("delete");
        assert!(store.list().await.unwrap().is_empty());

        let err = run_ranges(&store, RangesCommands::Delete { id })
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not found"), "{err}");
    }
}
