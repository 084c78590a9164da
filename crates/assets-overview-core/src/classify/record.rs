use crate::format::human_file_size;
use chrono::DateTime;
use serde::Serialize;
use serde_json::{Map, Value};

/// Reconciled state of one path. Built once by the classifier and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FileRecord {
    /// Root-anchored key, e.g. `/a/cat.JPG`.
    pub absolute_path: String,
    /// Same key without the leading slash, e.g. `a/cat.JPG`.
    pub path_from_assets_folder: String,
    pub folder_only: String,
    pub file_name: String,
    /// Lower-cased, empty when the name has none.
    pub extension: String,

    pub exists_on_disk: bool,
    #[serde(rename = "ExistsInStagingDB")]
    pub exists_in_staging_db: bool,
    #[serde(rename = "ExistsInLiveDB")]
    pub exists_in_live_db: bool,

    pub database_title: String,
    pub class_name: String,

    pub file_size: u64,
    pub last_edited_timestamp: i64,

    pub is_image: bool,
    pub width_px: u32,
    pub height_px: u32,
    pub ratio: f64,

    pub has_irregular_extension: bool,
    pub error_in_filename_case: bool,
    pub error_in_legacy_path_comparison: bool,
    #[serde(rename = "ErrorParentFolderID")]
    pub error_parent_folder_id: bool,
}

impl FileRecord {
    pub fn has_any_error(&self) -> bool {
        self.has_irregular_extension
            || self.error_in_filename_case
            || self.error_in_legacy_path_comparison
            || self.error_parent_folder_id
    }

    pub fn pixels(&self) -> u64 {
        self.width_px as u64 * self.height_px as u64
    }

    pub fn first_letter(&self) -> String {
        first_letter(&self.file_name)
    }

    pub fn first_letter_db_title(&self) -> String {
        first_letter(&self.database_title)
    }

    pub fn human_file_size(&self) -> String {
        human_file_size(self.file_size, 2)
    }

    pub fn human_file_size_rounded(&self) -> String {
        human_file_size(self.file_size, 0)
    }

    /// `YYYY-MM-DD` in UTC, empty when the timestamp is unknown.
    pub fn last_edited_day(&self) -> String {
        if self.last_edited_timestamp <= 0 {
            return String::new();
        }
        DateTime::from_timestamp(self.last_edited_timestamp, 0)
            .map(|dt| dt.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    }

    pub fn human_is_image(&self) -> &'static str {
        if self.is_image {
            "Image"
        } else {
            "Other file"
        }
    }

    pub fn human_image_dimensions(&self) -> String {
        if self.width_px == 0 || self.height_px == 0 {
            "no dimensions".to_string()
        } else {
            format!("{}x{}", self.width_px, self.height_px)
        }
    }

    pub fn ratio_rounded(&self) -> String {
        format!("{:.2}", self.ratio)
    }

    /// Flat key/value view: every stored field plus the derived display fields.
    pub fn field_map(&self) -> Map<String, Value> {
        let mut map = match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        };
        map.insert("FirstLetter".into(), self.first_letter().into());
        map.insert("FirstLetterDBTitle".into(), self.first_letter_db_title().into());
        map.insert("HumanFileSize".into(), self.human_file_size().into());
        map.insert("HumanFileSizeRounded".into(), self.human_file_size_rounded().into());
        map.insert("LastEdited".into(), self.last_edited_day().into());
        map.insert("HumanIsImage".into(), self.human_is_image().into());
        map.insert("Pixels".into(), self.pixels().into());
        map.insert("HumanImageDimensions".into(), self.human_image_dimensions().into());
        map
    }
}

fn first_letter(value: &str) -> String {
    value
        .trim()
        .chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_default()
}
