use crate::classify::FileRecord;
use std::cmp::Ordering;

/// Named sort/group pairs offered to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortKey {
    #[default]
    ByFolder,
    ByFileName,
    ByDbTitle,
    ByFileSize,
    ByLastEdited,
    ByExtension,
    ByIsImage,
    ByClassName,
    ByDimensions,
    ByRatio,
}

impl SortKey {
    pub const ALL: [SortKey; 10] = [
        SortKey::ByFolder,
        SortKey::ByFileName,
        SortKey::ByDbTitle,
        SortKey::ByFileSize,
        SortKey::ByLastEdited,
        SortKey::ByExtension,
        SortKey::ByIsImage,
        SortKey::ByClassName,
        SortKey::ByDimensions,
        SortKey::ByRatio,
    ];

    pub fn parse(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.key() == key)
    }

    pub fn key(self) -> &'static str {
        match self {
            SortKey::ByFolder => "byfolder",
            SortKey::ByFileName => "byfilename",
            SortKey::ByDbTitle => "bydbtitle",
            SortKey::ByFileSize => "byfilesize",
            SortKey::ByLastEdited => "bylastedited",
            SortKey::ByExtension => "byextension",
            SortKey::ByIsImage => "byisimage",
            SortKey::ByClassName => "byclassname",
            SortKey::ByDimensions => "bydimensions",
            SortKey::ByRatio => "byratio",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            SortKey::ByFolder => "Folder",
            SortKey::ByFileName => "Filename",
            SortKey::ByDbTitle => "Database Title",
            SortKey::ByFileSize => "Filesize",
            SortKey::ByLastEdited => "Last Edited",
            SortKey::ByExtension => "Extension",
            SortKey::ByIsImage => "Image vs Other Files",
            SortKey::ByClassName => "Class Name",
            SortKey::ByDimensions => "Dimensions (small to big)",
            SortKey::ByRatio => "Ratio",
        }
    }

    pub fn sort_field(self) -> SortField {
        match self {
            SortKey::ByFolder => SortField::PathFromAssetsFolder,
            SortKey::ByFileName => SortField::FileName,
            SortKey::ByDbTitle => SortField::DatabaseTitle,
            SortKey::ByFileSize => SortField::FileSize,
            SortKey::ByLastEdited => SortField::LastEdited,
            SortKey::ByExtension => SortField::Extension,
            SortKey::ByIsImage => SortField::IsImage,
            SortKey::ByClassName => SortField::ClassName,
            SortKey::ByDimensions => SortField::Pixels,
            SortKey::ByRatio => SortField::Ratio,
        }
    }

    pub fn group_field(self) -> GroupField {
        match self {
            SortKey::ByFolder => GroupField::Folder,
            SortKey::ByFileName => GroupField::FirstLetter,
            SortKey::ByDbTitle => GroupField::FirstLetterDbTitle,
            SortKey::ByFileSize => GroupField::HumanFileSizeRounded,
            SortKey::ByLastEdited => GroupField::LastEditedDay,
            SortKey::ByExtension => GroupField::Extension,
            SortKey::ByIsImage => GroupField::HumanIsImage,
            SortKey::ByClassName => GroupField::ClassName,
            SortKey::ByDimensions => GroupField::HumanImageDimensions,
            SortKey::ByRatio => GroupField::Ratio,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    PathFromAssetsFolder,
    FileName,
    DatabaseTitle,
    FileSize,
    LastEdited,
    Extension,
    IsImage,
    ClassName,
    Pixels,
    Ratio,
}

impl SortField {
    /// Ascending natural order: lexical for strings, numeric otherwise.
    pub fn compare(self, a: &FileRecord, b: &FileRecord) -> Ordering {
        match self {
            SortField::PathFromAssetsFolder => {
                a.path_from_assets_folder.cmp(&b.path_from_assets_folder)
            }
            SortField::FileName => a.file_name.cmp(&b.file_name),
            SortField::DatabaseTitle => a.database_title.cmp(&b.database_title),
            SortField::FileSize => a.file_size.cmp(&b.file_size),
            SortField::LastEdited => a.last_edited_timestamp.cmp(&b.last_edited_timestamp),
            SortField::Extension => a.extension.cmp(&b.extension),
            SortField::IsImage => a.is_image.cmp(&b.is_image),
            SortField::ClassName => a.class_name.cmp(&b.class_name),
            SortField::Pixels => a.pixels().cmp(&b.pixels()),
            SortField::Ratio => a.ratio.total_cmp(&b.ratio),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupField {
    Folder,
    FirstLetter,
    FirstLetterDbTitle,
    HumanFileSizeRounded,
    LastEditedDay,
    Extension,
    HumanIsImage,
    ClassName,
    HumanImageDimensions,
    Ratio,
}

impl GroupField {
    /// Header value for `record`. Blank values get a readable placeholder.
    pub fn key_for(self, record: &FileRecord) -> String {
        let value = match self {
            GroupField::Folder => record.folder_only.clone(),
            GroupField::FirstLetter => record.first_letter(),
            GroupField::FirstLetterDbTitle => record.first_letter_db_title(),
            GroupField::HumanFileSizeRounded => record.human_file_size_rounded(),
            GroupField::LastEditedDay => record.last_edited_day(),
            GroupField::Extension => record.extension.clone(),
            GroupField::HumanIsImage => record.human_is_image().to_string(),
            GroupField::ClassName => record.class_name.clone(),
            GroupField::HumanImageDimensions => record.human_image_dimensions(),
            GroupField::Ratio => record.ratio_rounded(),
        };
        if !value.is_empty() {
            return value;
        }
        match self {
            GroupField::Folder => "/".to_string(),
            GroupField::ClassName => "(not in database)".to_string(),
            GroupField::LastEditedDay => "(unknown)".to_string(),
            _ => "(none)".to_string(),
        }
    }
}
