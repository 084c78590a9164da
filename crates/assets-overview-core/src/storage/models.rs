/// Which of the two file tables a record was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Draft/working state (`File`).
    Staging,
    /// Published state (`File_Live`).
    Live,
}

impl Stage {
    pub fn table_name(self) -> &'static str {
        match self {
            Stage::Staging => "File",
            Stage::Live => "File_Live",
        }
    }
}

/// One file row from either the staging or the live table.
#[derive(Debug, Clone, PartialEq)]
pub struct DbFileRecord {
    pub id: i64,
    /// Normalized path relative to the asset root.
    pub path: String,
    pub title: String,
    pub class_name: String,
    /// 0 means the asset root.
    pub parent_id: i64,
    /// Path as stored by the legacy layout, when the row still carries one.
    pub legacy_filename: Option<String>,
    /// Unix seconds, parsed from the `LastEdited` column.
    pub last_edited: Option<i64>,
}
