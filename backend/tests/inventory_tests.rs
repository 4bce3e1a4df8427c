//! Inventory tests
//!
//! Stock totals, listing filters and paging of the stock listing.

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::{
    filter_inventory, paginate, summarize_inventory, InventoryFilter, InventoryItem, Pagination,
};
use std::str::FromStr;
use uuid::Uuid;

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn item(warehouse_id: Uuid, code: &str, client: &str, packages: i32, weight: &str) -> InventoryItem {
    InventoryItem {
        id: Uuid::new_v4(),
        warehouse_id,
        warehouse_name: "Bodega Principal".to_string(),
        order_id: Uuid::new_v4(),
        order_code: code.to_string(),
        client_id: None,
        client_name: client.to_string(),
        product: Some("Resin pellets".to_string()),
        packages,
        current_weight_kg: dec(weight),
        updated_at: Utc.with_ymd_and_hms(2024, 5, 2, 10, 0, 0).unwrap(),
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_totals_skip_empty_lines() {
        let wh = Uuid::new_v4();
        let items = vec![
            item(wh, "DO-1", "Andina", 12, "300.25"),
            item(wh, "DO-2", "Andina", 0, "0"),
            item(wh, "DO-3", "Pacifico", 8, "99.75"),
        ];

        let totals = summarize_inventory(&items);
        assert_eq!(totals.total_packages, 20);
        assert_eq!(totals.total_weight_kg, dec("400.00"));
        assert_eq!(totals.total_references, 2);
    }

    #[test]
    fn test_filter_by_warehouse_and_search() {
        let north = Uuid::new_v4();
        let south = Uuid::new_v4();
        let items = vec![
            item(north, "DO-100", "Andina", 5, "10"),
            item(north, "DO-101", "Pacifico", 5, "10"),
            item(south, "DO-102", "Andina", 5, "10"),
        ];

        let filter = InventoryFilter {
            warehouse_id: Some(north),
            client_id: None,
            search: Some("andina".to_string()),
        };

        let found = filter_inventory(items, &filter);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].order_code, "DO-100");
    }

    #[test]
    fn test_paging_stock_listing() {
        let wh = Uuid::new_v4();
        let items: Vec<_> = (0..23)
            .map(|i| item(wh, &format!("DO-{}", i), "Andina", 1, "1"))
            .collect();

        let page = paginate(items, &Pagination::new(3, 10));
        assert_eq!(page.data.len(), 3);
        assert_eq!(page.pagination.total_items, 23);
        assert_eq!(page.pagination.total_pages, 3);
        assert_eq!(page.data[0].order_code, "DO-20");
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Strategy for stock lines: packages (some empty) and weight 0.0 to 5000.0
    fn line_strategy() -> impl Strategy<Value = (i32, Decimal)> {
        (0i32..=500, 0i64..=50_000).prop_map(|(p, w)| (p, Decimal::new(w, 1)))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Totals equal the sums over lines with stock
        #[test]
        fn prop_totals_match_stocked_lines(
            lines in prop::collection::vec(line_strategy(), 0..40)
        ) {
            let wh = Uuid::new_v4();
            let items: Vec<_> = lines
                .iter()
                .map(|(p, w)| {
                    let mut i = item(wh, "DO-1", "Andina", *p, "0");
                    i.current_weight_kg = *w;
                    i
                })
                .collect();

            let totals = summarize_inventory(&items);
            let stocked: Vec<_> = lines.iter().filter(|(p, _)| *p > 0).collect();

            prop_assert_eq!(totals.total_references, stocked.len() as u64);
            prop_assert_eq!(totals.total_packages, stocked.iter().map(|(p, _)| i64::from(*p)).sum::<i64>());
            prop_assert_eq!(totals.total_weight_kg, stocked.iter().map(|(_, w)| *w).sum::<Decimal>());
        }

        /// Pages partition the listing without gaps or overlap
        #[test]
        fn prop_pages_cover_listing(len in 0usize..120, per_page in 1u32..=30) {
            let all: Vec<usize> = (0..len).collect();
            let total_pages = paginate(all.clone(), &Pagination::new(1, per_page)).pagination.total_pages;

            let mut seen = Vec::new();
            for page in 1..=total_pages {
                seen.extend(paginate(all.clone(), &Pagination::new(page, per_page)).data);
            }
            prop_assert_eq!(seen, all);
        }
    }
}
