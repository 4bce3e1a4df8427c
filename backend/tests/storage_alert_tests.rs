//! Storage billing alert tests
//!
//! Covers the free storage window rules end to end over order snapshots:
//! - Eligibility (active, has intake, nothing dispatched)
//! - Overdue and near-boundary classification
//! - Urgency ranking

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::{
    compute_storage_alerts, whole_days_between, AlertLevel, Movement, MovementKind, Order,
    StorageAlert, StorageAlertView, ALERT_LOOKAHEAD_DAYS, FREE_STORAGE_DAYS,
};
use uuid::Uuid;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
}

fn movement(kind: MovementKind, at: DateTime<Utc>) -> Movement {
    Movement {
        id: Uuid::new_v4(),
        order_id: Uuid::nil(),
        kind,
        occurred_at: at,
        packages: 20,
        gross_weight_kg: Decimal::new(14_000, 1),
        warehouse_id: None,
        notes: None,
    }
}

fn order(code: &str, movements: Vec<Movement>) -> Order {
    Order {
        id: Uuid::new_v4(),
        code: code.to_string(),
        client_id: Some(Uuid::new_v4()),
        client_name: "Textiles del Valle".to_string(),
        agency_id: None,
        agency_name: None,
        product: Some("Cotton bales".to_string()),
        bl_number: Some("MAEU123456".to_string()),
        checkpoints: Default::default(),
        is_active: true,
        movements,
        created_at: now() - Duration::days(365),
    }
}

fn stored_for(code: &str, elapsed: Duration) -> Order {
    order(code, vec![movement(MovementKind::Intake, now() - elapsed)])
}

fn codes(alerts: &[StorageAlert]) -> Vec<&str> {
    alerts.iter().map(|a| a.order_code.as_str()).collect()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_mixed_snapshot() {
        let mut closed = stored_for("DO-CLOSED", Duration::days(50));
        closed.is_active = false;

        let mut dispatched = stored_for("DO-OUT", Duration::days(40));
        dispatched
            .movements
            .push(movement(MovementKind::Dispatch, now() - Duration::days(2)));

        let orders = vec![
            stored_for("DO-FRESH", Duration::days(5)),
            stored_for("DO-25", Duration::days(25)),
            closed,
            stored_for("DO-31", Duration::days(31)),
            dispatched,
            order("DO-EMPTY", vec![]),
            stored_for("DO-95", Duration::days(95)),
            stored_for("DO-20", Duration::days(20)),
        ];

        let alerts = compute_storage_alerts(&orders, now());
        assert_eq!(codes(&alerts), vec!["DO-95", "DO-31", "DO-25", "DO-20"]);

        let oldest = &alerts[0];
        assert!(oldest.is_overdue);
        assert_eq!(oldest.days_elapsed, 95);
        assert_eq!(oldest.days_remaining, 0);
        assert_eq!(oldest.months_billable, 3);

        let last = &alerts[3];
        assert!(!last.is_overdue);
        assert_eq!(last.days_remaining, 10);
    }

    #[test]
    fn test_partial_day_does_not_count() {
        let alerts = compute_storage_alerts(
            &[stored_for("DO-1", Duration::days(30) - Duration::seconds(1))],
            now(),
        );
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].days_elapsed, 29);
        assert!(!alerts[0].is_overdue);
    }

    #[test]
    fn test_exact_boundary_is_overdue() {
        let alerts = compute_storage_alerts(&[stored_for("DO-1", Duration::days(30))], now());
        assert!(alerts[0].is_overdue);
        assert_eq!(alerts[0].months_billable, 1);
    }

    #[test]
    fn test_arrival_uses_first_intake() {
        let o = order(
            "DO-1",
            vec![
                movement(MovementKind::Intake, now() - Duration::days(3)),
                movement(MovementKind::Intake, now() - Duration::days(33)),
                movement(MovementKind::Intake, now() - Duration::days(12)),
            ],
        );

        let alerts = compute_storage_alerts(&[o], now());
        assert_eq!(alerts[0].days_elapsed, 33);
        assert_eq!(alerts[0].arrival_date, now() - Duration::days(33));
    }

    #[test]
    fn test_display_date() {
        let o = order(
            "DO-1",
            vec![movement(
                MovementKind::Intake,
                Utc.with_ymd_and_hms(2024, 1, 15, 23, 45, 0).unwrap(),
            )],
        );

        let alerts = compute_storage_alerts(&[o], now());
        assert_eq!(alerts[0].arrival_date_display, "2024-01-15");
    }

    #[test]
    fn test_alert_serializes_for_dashboard() {
        let alerts = compute_storage_alerts(&[stored_for("DO-7", Duration::days(27))], now());
        let value = serde_json::to_value(&alerts[0]).unwrap();

        assert_eq!(value["order_code"], "DO-7");
        assert_eq!(value["days_remaining"], 3);
        assert_eq!(value["is_overdue"], false);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Storage age in seconds, from slightly in the future to over a year
    fn age_strategy() -> impl Strategy<Value = i64> {
        -86_400i64..=400 * 86_400
    }

    fn orders_strategy() -> impl Strategy<Value = Vec<(i64, bool, bool)>> {
        prop::collection::vec((age_strategy(), any::<bool>(), any::<bool>()), 0..30)
    }

    fn build(snapshot: &[(i64, bool, bool)]) -> Vec<Order> {
        snapshot.iter()
            .enumerate()
            .map(|(i, (age, active, dispatched))| {
                let mut o = stored_for(&format!("DO-{}", i), Duration::seconds(*age));
                o.is_active = *active;
                if *dispatched {
                    o.movements.push(movement(MovementKind::Dispatch, now()));
                }
                o
            })
            .collect()
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Only active, undispatched orders inside or past the window are flagged
        #[test]
        fn prop_alert_eligibility(snapshot in orders_strategy()) {
            let orders = build(&snapshot);
            let alerts = compute_storage_alerts(&orders, now());

            let expected = snapshot
                .iter()
                .filter(|(age, active, dispatched)| {
                    let days = age.div_euclid(86_400);
                    *active && !*dispatched && days >= FREE_STORAGE_DAYS - ALERT_LOOKAHEAD_DAYS
                })
                .count();
            prop_assert_eq!(alerts.len(), expected);
        }

        /// Each alert's fields agree with its elapsed days
        #[test]
        fn prop_alert_fields_consistent(snapshot in orders_strategy()) {
            let orders = build(&snapshot);
            for alert in compute_storage_alerts(&orders, now()) {
                prop_assert_eq!(alert.is_overdue, alert.days_elapsed >= FREE_STORAGE_DAYS);
                prop_assert_eq!(alert.days_remaining, (FREE_STORAGE_DAYS - alert.days_elapsed).max(0));
                prop_assert_eq!(alert.months_billable, alert.days_elapsed / FREE_STORAGE_DAYS);
                prop_assert!(alert.days_remaining <= ALERT_LOOKAHEAD_DAYS);
            }
        }

        /// Overdue alerts come first, oldest first; then soonest boundary first
        #[test]
        fn prop_alerts_ranked_by_urgency(snapshot in orders_strategy()) {
            let orders = build(&snapshot);
            let alerts = compute_storage_alerts(&orders, now());

            for pair in alerts.windows(2) {
                let (a, b) = (&pair[0], &pair[1]);
                prop_assert!(a.is_overdue || !b.is_overdue);
                if a.is_overdue && b.is_overdue {
                    prop_assert!(a.days_elapsed >= b.days_elapsed);
                }
                if !a.is_overdue && !b.is_overdue {
                    prop_assert!(a.days_remaining <= b.days_remaining);
                }
            }
        }

        /// Input order only matters for ties
        #[test]
        fn prop_reversed_input_same_ranking(snapshot in orders_strategy()) {
            let orders = build(&snapshot);
            let mut reversed = orders.clone();
            reversed.reverse();

            let forward: Vec<i64> = compute_storage_alerts(&orders, now()).iter().map(|a| a.days_elapsed).collect();
            let backward: Vec<i64> = compute_storage_alerts(&reversed, now()).iter().map(|a| a.days_elapsed).collect();
            prop_assert_eq!(forward, backward);
        }

        /// Same snapshot and instant give the same result
        #[test]
        fn prop_idempotent(snapshot in orders_strategy()) {
            let orders = build(&snapshot);
            prop_assert_eq!(
                compute_storage_alerts(&orders, now()),
                compute_storage_alerts(&orders, now())
            );
        }

        /// Day counts floor the exact gap, including sub-second negative gaps
        #[test]
        fn prop_whole_days_is_floor(offset_ms in -400i64 * 86_400_000..=400 * 86_400_000) {
            let to = now() + Duration::milliseconds(offset_ms);
            prop_assert_eq!(whole_days_between(now(), to), offset_ms.div_euclid(86_400_000));
        }

        /// Dashboard level always agrees with the overdue flag
        #[test]
        fn prop_view_level_matches_flag(snapshot in orders_strategy()) {
            let orders = build(&snapshot);
            for alert in compute_storage_alerts(&orders, now()) {
                let overdue = alert.is_overdue;
                let view = StorageAlertView::from(alert);
                prop_assert_eq!(view.level == AlertLevel::Overdue, overdue);
                prop_assert!(!view.invoice_hint.is_empty());
            }
        }

        /// Any dispatch suppresses the alert regardless of age
        #[test]
        fn prop_dispatch_suppresses(age in age_strategy()) {
            let mut o = stored_for("DO-1", Duration::seconds(age));
            o.movements.push(movement(MovementKind::Dispatch, now() - Duration::seconds(age)));
            prop_assert!(compute_storage_alerts(&[o], now()).is_empty());
        }
    }
}
