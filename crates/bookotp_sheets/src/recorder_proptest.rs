#[cfg(test)]
mod tests {
    use crate::{find_open_row, SlotRow};
    use proptest::prelude::*;

    // Small alphabets so that duplicates and matches are common
    fn arb_row() -> impl Strategy<Value = SlotRow> {
        (
            prop::sample::select(vec!["Dental", "Dermatology"]),
            prop::sample::select(vec!["2024-01-01", "2024-01-02"]),
            prop::sample::select(vec!["10:00", "11:00"]),
            prop::sample::select(vec!["", "booked", "BOOKED", "pending"]),
        )
            .prop_map(|(service, date, time, status)| SlotRow {
                service: service.to_string(),
                date: date.to_string(),
                time: time.to_string(),
                status: status.to_string(),
                ..Default::default()
            })
    }

    proptest! {
        // Test that the chosen row is the earliest open match
        #[test]
        fn test_first_open_match_wins(rows in prop::collection::vec(arb_row(), 0..20)) {
            let found = find_open_row(&rows, "Dental", "", "2024-01-01", "10:00");
            let expected = rows.iter().position(|r| {
                r.service == "Dental"
                    && r.date == "2024-01-01"
                    && r.time == "10:00"
                    && !r.status.eq_ignore_ascii_case("booked")
            });
            prop_assert_eq!(found, expected);
            if let Some(i) = found {
                prop_assert!(rows[i].is_open());
            }
        }
    }
}
