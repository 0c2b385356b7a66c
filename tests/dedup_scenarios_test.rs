use sheet_clean::adapters::reader::read_sheets;
use sheet_clean::core::{CellValue, Row, Sheet};
use sheet_clean::{process_sheets, CleanError, ColumnSelection, ProcessingOptions, ReplacementRule};

fn sheet(name: &str, column: &str, values: &[&str]) -> Sheet {
    Sheet::from_rows(
        name,
        values.iter().map(|v| Row::new().with(column, *v)).collect(),
    )
}

#[test]
fn test_case_insensitive_match_across_sheets() {
    let sheets = vec![sheet("sheet1", "name", &["Ana"]), sheet("sheet2", "name", &["ana"])];
    let options = ProcessingOptions {
        convert_to_lowercase: true,
        remove_duplicates: true,
        ..Default::default()
    };
    let selection = ColumnSelection::new().for_all_sheets(["name"]);

    let result = process_sheets(&sheets, &options, &selection).unwrap();

    assert_eq!(result.clean.total_rows(), 1);
    assert_eq!(result.clean.rows[0].sheet_name, "sheet1");
    assert_eq!(result.duplicates.total_rows(), 1);
    let duplicate = &result.duplicates.rows[0];
    assert_eq!(duplicate.occurrence, 2);
    assert_eq!(duplicate.original_sheet, "sheet1");
    assert_eq!(duplicate.current_sheet, "sheet2");
}

#[test]
fn test_three_copies_with_dedup() {
    let sheets = vec![sheet("s", "v", &["x", "x", "x"])];
    let result = process_sheets(&sheets, &ProcessingOptions::default(), &ColumnSelection::new()).unwrap();

    assert_eq!(result.clean.total_rows(), 1);
    assert_eq!(result.duplicate_count, 2);
    let occurrences: Vec<u32> = result.duplicates.rows.iter().map(|d| d.occurrence).collect();
    assert_eq!(occurrences, vec![2, 3]);
    let rows: Vec<usize> = result.duplicates.rows.iter().map(|d| d.current_row).collect();
    assert_eq!(rows, vec![2, 3]);
}

#[test]
fn test_three_copies_without_dedup() {
    let sheets = vec![sheet("s", "v", &["x", "x", "x"])];
    let options = ProcessingOptions {
        remove_duplicates: false,
        ..Default::default()
    };
    let result = process_sheets(&sheets, &options, &ColumnSelection::new()).unwrap();

    assert_eq!(result.clean.total_rows(), 1);
    assert_eq!(result.duplicates.total_rows(), 0);
    assert_eq!(result.duplicate_count, 0);
}

#[test]
fn test_same_value_in_different_columns_collides() {
    let sheets = vec![Sheet::from_rows(
        "contacts",
        vec![
            Row::new().with("work_email", "a@x.com").with("home_email", "b@x.com"),
            Row::new().with("work_email", "c@x.com").with("home_email", "a@x.com"),
        ],
    )];

    let result = process_sheets(&sheets, &ProcessingOptions::default(), &ColumnSelection::new()).unwrap();

    assert_eq!(result.duplicate_count, 1);
    let duplicate = &result.duplicates.rows[0];
    assert_eq!(duplicate.value, "a@x.com");
    assert_eq!(duplicate.column, "home_email");
    assert_eq!(duplicate.original_row, 1);
    assert_eq!(duplicate.current_row, 2);
    // Row 2 still owns c@x.com, so it stays clean.
    assert_eq!(result.clean.total_rows(), 2);
}

#[test]
fn test_replacements_make_formats_collide() {
    let sheets = vec![sheet("phones", "phone", &["(555) 123-4567", "555.123.4567", "555-000-0000"])];
    let options = ProcessingOptions {
        custom_replacements: vec![ReplacementRule::new("[^0-9]", "")],
        ..Default::default()
    };

    let result = process_sheets(&sheets, &options, &ColumnSelection::new()).unwrap();
    assert_eq!(result.clean.total_rows(), 2);
    assert_eq!(result.duplicates.rows[0].value, "5551234567");
}

#[test]
fn test_formatted_numbers_match_numeric_cells() {
    let sheets = vec![Sheet::from_rows(
        "prices",
        vec![
            Row::new().with("amount", CellValue::Number(1000.5)),
            Row::new().with("amount", "1,000.50"),
        ],
    )];

    let plain = process_sheets(&sheets, &ProcessingOptions::default(), &ColumnSelection::new()).unwrap();
    assert_eq!(plain.duplicate_count, 0);

    let options = ProcessingOptions {
        format_numbers: true,
        ..Default::default()
    };
    let formatted = process_sheets(&sheets, &options, &ColumnSelection::new()).unwrap();
    assert_eq!(formatted.duplicate_count, 1);
}

#[test]
fn test_caller_level_errors() {
    let sheets = vec![sheet("s", "v", &["x"])];

    let selection = ColumnSelection::new().select("missing", ["v"]);
    assert!(matches!(
        process_sheets(&sheets, &ProcessingOptions::default(), &selection),
        Err(CleanError::NothingSelected)
    ));

    let options = ProcessingOptions {
        convert_to_lowercase: true,
        convert_to_uppercase: true,
        ..Default::default()
    };
    assert!(matches!(
        process_sheets(&sheets, &options, &ColumnSelection::new()),
        Err(CleanError::CaseConflict)
    ));

    assert!(matches!(
        process_sheets(&[], &ProcessingOptions::default(), &ColumnSelection::new()),
        Err(CleanError::InvalidInput { .. })
    ));
}

#[test]
fn test_order_ids_keep_their_exact_text() {
    let sheets = read_sheets("orders.csv", b"id\n9007199254740992\n9007199254740993\n00123\n").unwrap();

    let result = process_sheets(&sheets, &ProcessingOptions::default(), &ColumnSelection::new()).unwrap();

    assert_eq!(result.duplicate_count, 0);
    let ids: Vec<String> = result.clean.rows.iter().map(|clean| clean.row.get("id").to_string()).collect();
    assert_eq!(ids, vec!["9007199254740992", "9007199254740993", "00123"]);
}

#[test]
fn test_misspelled_column_is_rejected() {
    let sheets = vec![sheet("clients", "email", &["a@x.com", "a@x.com"])];
    let selection = ColumnSelection::new().for_all_sheets(["emial"]);

    let err = process_sheets(&sheets, &ProcessingOptions::default(), &selection).unwrap_err();
    assert!(matches!(
        err,
        CleanError::InvalidConfigValueError { ref field, ref value, .. } if field == "columns" && value == "emial"
    ));
}
