#[cfg(test)]
mod tests {
    use crate::google::{a1_range, cell_text, rows_from_grid};
    use serde_json::{json, Value};

    #[test]
    fn test_a1_range_quoting() {
        assert_eq!(a1_range("Sheet1", "A:G"), "Sheet1!A:G");
        assert_eq!(a1_range("Clinic Slots", "E5:G5"), "'Clinic Slots'!E5:G5");
        assert_eq!(a1_range("Dr's", "A:G"), "'Dr''s'!A:G");
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(&json!("Dental")), "Dental");
        assert_eq!(cell_text(&json!(10)), "10");
        assert_eq!(cell_text(&Value::Null), "");
    }

    #[test]
    fn test_rows_from_grid_skips_header_and_numbers_rows() {
        let grid = vec![
            vec![json!("Service"), json!("Type"), json!("Date"), json!("Time")],
            vec![json!("Dental"), json!(""), json!("2024-01-01"), json!("10:00")],
            vec![
                json!("Dental"),
                json!(""),
                json!("2024-01-01"),
                json!("11:00"),
                json!("booked"),
                json!("Sara"),
                json!("+966500000001"),
            ],
        ];
        let rows = rows_from_grid(grid);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].row_number, 2);
        assert_eq!(rows[0].status, "");
        assert_eq!(rows[1].row_number, 3);
        assert_eq!(rows[1].name, "Sara");
        assert!(!rows[1].is_open());
    }
}
