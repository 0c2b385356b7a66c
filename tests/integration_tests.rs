use anyhow::Result;
use clap::Parser;
use sheet_clean::config::toml_config::TomlConfig;
use sheet_clean::{CleanError, CleanPipeline, CliConfig, LocalStorage, PipelineRunner};
use std::io::{Read, Write};
use std::path::Path;
use tempfile::TempDir;

fn read_entry(zip_path: &Path, name: &str) -> Result<String> {
    let zip_data = std::fs::read(zip_path)?;
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(zip_data))?;
    let mut content = String::new();
    archive.by_name(name)?.read_to_string(&mut content)?;
    Ok(content)
}

#[tokio::test]
async fn test_end_to_end_csv_cleanup() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let input_path = temp_dir.path().join("customers.csv");
    let output_path = temp_dir.path().join("out");
    std::fs::write(
        &input_path,
        "name,email\nAna, ana@x.com\nBob,bob@x.com\n,\nANA,ana@x.com \n",
    )?;

    let config = CliConfig::try_parse_from([
        "sheet-clean",
        "--input",
        input_path.to_str().unwrap_or_default(),
        "--output-path",
        output_path.to_str().unwrap_or_default(),
        "--lowercase",
        "--columns",
        "email",
    ])?;

    let input = LocalStorage::new(".".to_string());
    let output = LocalStorage::new(config.output_path.clone());
    let runner = PipelineRunner::new_with_monitoring(CleanPipeline::new(input, output, config), false);

    let result_path = runner.run().await?;
    assert!(result_path.ends_with("customers_processed.zip"));

    let zip_path = output_path.join("customers_processed.zip");
    assert!(zip_path.exists());

    assert_eq!(read_entry(&zip_path, "clean.csv")?, "Clean Data\nAna\nBob\n");

    let duplicates = read_entry(&zip_path, "duplicates.csv")?;
    let lines: Vec<&str> = duplicates.lines().collect();
    assert_eq!(lines[0], "Duplicated Value,Original Sheet,Original Row,Column,Occurrence");
    // The blank third row is removed without renumbering: the duplicate is row 4.
    assert_eq!(lines[1], "ana@x.com,customers,1,email,2");
    assert_eq!(lines.len(), 2);

    let summary: serde_json::Value = serde_json::from_str(&read_entry(&zip_path, "summary.json")?)?;
    assert_eq!(summary["file_name"], "customers.csv");
    assert_eq!(summary["original_row_count"], 4);
    assert_eq!(summary["processed_row_count"], 2);
    assert_eq!(summary["duplicate_count"], 1);
    assert_eq!(summary["processed_columns"], serde_json::json!(["email"]));

    let result: serde_json::Value = serde_json::from_str(&read_entry(&zip_path, "result.json")?)?;
    assert_eq!(result["duplicates"]["rows"][0]["current_row"], 4);

    Ok(())
}

#[tokio::test]
async fn test_end_to_end_json_workbook_from_toml() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let input_path = temp_dir.path().join("workbook.json");
    let output_path = temp_dir.path().join("out");
    std::fs::write(
        &input_path,
        r#"{
            "clients": [{"name": "Ana", "phone": "555-1234"}, {"name": "Luis", "phone": "555 9999"}],
            "suppliers": [{"name": "Acme", "phone": "5551234"}]
        }"#,
    )?;

    let toml = format!(
        r#"
[job]
name = "workbook"

[input]
path = "{}"

[columns]
"*" = ["phone"]

[options]
on_invalid_pattern = "abort"

[[options.custom_replacements]]
from = "[^0-9]"
to = ""

[load]
output_path = "{}"
layout = "compact"
"#,
        input_path.display(),
        output_path.display()
    );
    let mut config_file = tempfile::NamedTempFile::new()?;
    config_file.write_all(toml.as_bytes())?;

    let config = TomlConfig::from_file(config_file.path())?;
    let input = LocalStorage::new(".".to_string());
    let output = LocalStorage::new(output_path.to_string_lossy().to_string());
    let runner = PipelineRunner::new(CleanPipeline::new(input, output, config));
    runner.run().await?;

    let zip_path = output_path.join("workbook_processed.zip");
    assert_eq!(read_entry(&zip_path, "clean.csv")?, "Clean Data\nAna\nLuis\n");
    assert_eq!(
        read_entry(&zip_path, "duplicates.csv")?,
        "Value,Original Row,Sheet,Times Duplicated\n5551234,1,clients,2\n"
    );

    Ok(())
}

#[tokio::test]
async fn test_oversized_input_is_rejected_before_parsing() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let input_path = temp_dir.path().join("big.csv");
    let mut content = String::from("value\n");
    while content.len() <= 1024 * 1024 {
        content.push_str("some repeated value\n");
    }
    std::fs::write(&input_path, content)?;

    let config = CliConfig::try_parse_from([
        "sheet-clean",
        "--input",
        input_path.to_str().unwrap_or_default(),
        "--output-path",
        temp_dir.path().to_str().unwrap_or_default(),
        "--max-input-mb",
        "1",
    ])?;

    let runner = PipelineRunner::new(CleanPipeline::new(
        LocalStorage::new(".".to_string()),
        LocalStorage::new(config.output_path.clone()),
        config,
    ));

    let err = runner.run().await.unwrap_err();
    assert!(matches!(err, CleanError::InputTooLarge { limit, .. } if limit == 1024 * 1024));
    assert!(!temp_dir.path().join("big_processed.zip").exists());

    Ok(())
}

#[tokio::test]
async fn test_nothing_selected_writes_nothing() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let input_path = temp_dir.path().join("people.csv");
    std::fs::write(&input_path, "name\nAna\n")?;
    let output_path = temp_dir.path().join("out");

    let config = CliConfig::try_parse_from([
        "sheet-clean",
        "--input",
        input_path.to_str().unwrap_or_default(),
        "--output-path",
        output_path.to_str().unwrap_or_default(),
        "--columns",
        "other_sheet:name",
    ])?;

    let runner = PipelineRunner::new(CleanPipeline::new(
        LocalStorage::new(".".to_string()),
        LocalStorage::new(config.output_path.clone()),
        config,
    ));

    assert!(matches!(runner.run().await, Err(CleanError::NothingSelected)));
    assert!(!output_path.exists());

    Ok(())
}
