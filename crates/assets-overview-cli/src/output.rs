use assets_overview_core::format::number_format;
use assets_overview_core::query::DisplayMode;
use assets_overview_core::{FileRecord, Report};
use colored::*;
use serde_json::Value;
use std::io::{self, Write};

pub fn print_report(report: &Report, mode: DisplayMode, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "{}", report.title.bold())?;
    writeln!(
        out,
        "{} files, {} match, {} total{}",
        number_format(report.aggregates.total_raw_count as u64),
        number_format(report.aggregates.total_filtered_count as u64),
        report.total_filtered_size,
        if report.number_of_pages > 1 {
            format!(", page {} of {}", report.page, report.number_of_pages)
        } else {
            String::new()
        }
    )?;
    if !report.available_extensions.is_empty() {
        writeln!(
            out,
            "{} {}",
            "Extensions:".dimmed(),
            report.available_extensions.join(", ")
        )?;
    }

    if report.groups.is_empty() {
        writeln!(out, "\n{}", "No files match.".yellow())?;
        return Ok(());
    }

    for group in &report.groups {
        writeln!(
            out,
            "\n{} {}",
            group.header.cyan().bold(),
            format!("({})", group.items.len()).dimmed()
        )?;
        for record in &group.items {
            match mode {
                DisplayMode::Thumbnails => print_summary_line(record, out)?,
                DisplayMode::FlatList => writeln!(out, "  {}", record.absolute_path)?,
                DisplayMode::FullRawFields => print_fields(record, out)?,
            }
        }
    }
    Ok(())
}

fn print_summary_line(record: &FileRecord, out: &mut impl Write) -> io::Result<()> {
    let mut line = format!(
        "  {:<60} {:>10}",
        record.path_from_assets_folder,
        record.human_file_size()
    );
    if record.is_image {
        line.push_str(&format!("  {}", record.human_image_dimensions()));
    }
    if !record.database_title.is_empty() {
        line.push_str(&format!("  \"{}\"", record.database_title));
    }
    writeln!(out, "{}{}", line, status_flags(record))
}

fn status_flags(record: &FileRecord) -> String {
    let mut flags = Vec::new();
    if !record.exists_on_disk {
        flags.push("missing on disk".red().to_string());
    }
    if !record.exists_in_staging_db {
        flags.push("no draft".yellow().to_string());
    }
    if !record.exists_in_live_db {
        flags.push("unpublished".yellow().to_string());
    }
    if record.has_irregular_extension {
        flags.push("extension case".red().to_string());
    }
    if record.error_in_filename_case {
        flags.push("name case".red().to_string());
    }
    if record.error_in_legacy_path_comparison {
        flags.push("legacy path".red().to_string());
    }
    if record.error_parent_folder_id {
        flags.push("bad folder".red().to_string());
    }
    if flags.is_empty() {
        String::new()
    } else {
        format!("  [{}]", flags.join(", "))
    }
}

fn print_fields(record: &FileRecord, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "  {}", record.absolute_path.bold())?;
    for (key, value) in record.field_map() {
        let rendered = match value {
            Value::String(s) => s,
            other => other.to_string(),
        };
        writeln!(out, "    {:<34} {}", key.dimmed(), rendered)?;
    }
    Ok(())
}

pub fn write_json(records: &[FileRecord], out: impl Write) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(out, records)?;
    Ok(())
}

pub fn write_csv(records: &[FileRecord], out: impl Write) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FileRecord {
        FileRecord {
            absolute_path: "/a/cat.JPG".into(),
            path_from_assets_folder: "a/cat.JPG".into(),
            folder_only: "a".into(),
            file_name: "cat.JPG".into(),
            extension: "jpg".into(),
            exists_on_disk: true,
            exists_in_staging_db: true,
            exists_in_live_db: false,
            database_title: "Cat".into(),
            class_name: "Image".into(),
            file_size: 2048,
            last_edited_timestamp: 0,
            is_image: true,
            width_px: 4,
            height_px: 2,
            ratio: 2.0,
            has_irregular_extension: true,
            error_in_filename_case: true,
            error_in_legacy_path_comparison: false,
            error_parent_folder_id: false,
        }
    }

    #[test]
    fn test_csv_has_header_and_row() {
        let mut buffer = Vec::new();
        write_csv(&[sample()], &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let mut lines = text.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("AbsolutePath,PathFromAssetsFolder"));
        assert!(header.contains("ExistsInStagingDB"));
        assert!(lines.next().unwrap().starts_with("/a/cat.JPG,a/cat.JPG"));
    }

    #[test]
    fn test_json_is_an_array_of_records() {
        let mut buffer = Vec::new();
        write_json(&[sample()], &mut buffer).unwrap();
        let value: Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(value[0]["FileSize"], 2048);
        assert_eq!(value[0]["ErrorParentFolderID"], false);
    }

    #[test]
    fn test_status_flags_list_problems() {
        colored::control::set_override(false);
        let flags = status_flags(&sample());
        assert!(flags.contains("unpublished"));
        assert!(flags.contains("extension case"));
        assert!(!flags.contains("missing on disk"));
    }
}
