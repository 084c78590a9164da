use crate::classify::FileRecord;

const ONLY_TRUE: &[bool] = &[true];
const ONLY_FALSE: &[bool] = &[false];

/// Named row filters offered to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKey {
    ByExtensionError,
    ByMissingFromLive,
    ByMissingFromStaging,
    ByDatabaseError,
    ByLegacyError,
    ByFolderError,
    ByFilesystemStatus,
}

impl FilterKey {
    pub const ALL: [FilterKey; 7] = [
        FilterKey::ByExtensionError,
        FilterKey::ByMissingFromLive,
        FilterKey::ByMissingFromStaging,
        FilterKey::ByDatabaseError,
        FilterKey::ByLegacyError,
        FilterKey::ByFolderError,
        FilterKey::ByFilesystemStatus,
    ];

    pub fn parse(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.key() == key)
    }

    pub fn key(self) -> &'static str {
        match self {
            FilterKey::ByExtensionError => "byextensionerror",
            FilterKey::ByMissingFromLive => "bymissingfromlive",
            FilterKey::ByMissingFromStaging => "bymissingfromstaging",
            FilterKey::ByDatabaseError => "bydatabaseerror",
            FilterKey::ByLegacyError => "bylegacyerror",
            FilterKey::ByFolderError => "byfoldererror",
            FilterKey::ByFilesystemStatus => "byfilesystemstatus",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            FilterKey::ByExtensionError => "Case error in file type",
            FilterKey::ByMissingFromLive => "Unpublished",
            FilterKey::ByMissingFromStaging => "Missing from drafts",
            FilterKey::ByDatabaseError => "Case error in file name",
            FilterKey::ByLegacyError => "Legacy path errors",
            FilterKey::ByFolderError => "Folder Error",
            FilterKey::ByFilesystemStatus => "Missing from file system",
        }
    }

    pub fn predicate(self) -> RowFilter {
        let (field, accepted): (FilterField, &'static [bool]) = match self {
            FilterKey::ByExtensionError => (FilterField::HasIrregularExtension, ONLY_TRUE),
            FilterKey::ByMissingFromLive => (FilterField::ExistsInLiveDb, ONLY_FALSE),
            FilterKey::ByMissingFromStaging => (FilterField::ExistsInStagingDb, ONLY_FALSE),
            FilterKey::ByDatabaseError => (FilterField::ErrorInFilenameCase, ONLY_TRUE),
            FilterKey::ByLegacyError => (FilterField::ErrorInLegacyPathComparison, ONLY_TRUE),
            FilterKey::ByFolderError => (FilterField::ErrorParentFolderId, ONLY_TRUE),
            FilterKey::ByFilesystemStatus => (FilterField::ExistsOnDisk, ONLY_FALSE),
        };
        RowFilter { field, accepted }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    ExistsOnDisk,
    ExistsInStagingDb,
    ExistsInLiveDb,
    HasIrregularExtension,
    ErrorInFilenameCase,
    ErrorInLegacyPathComparison,
    ErrorParentFolderId,
}

impl FilterField {
    pub fn value(self, record: &FileRecord) -> bool {
        match self {
            FilterField::ExistsOnDisk => record.exists_on_disk,
            FilterField::ExistsInStagingDb => record.exists_in_staging_db,
            FilterField::ExistsInLiveDb => record.exists_in_live_db,
            FilterField::HasIrregularExtension => record.has_irregular_extension,
            FilterField::ErrorInFilenameCase => record.error_in_filename_case,
            FilterField::ErrorInLegacyPathComparison => record.error_in_legacy_path_comparison,
            FilterField::ErrorParentFolderId => record.error_parent_folder_id,
        }
    }
}

/// Field + accepted values predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowFilter {
    pub field: FilterField,
    pub accepted: &'static [bool],
}

impl RowFilter {
    pub fn accepts(&self, record: &FileRecord) -> bool {
        self.accepted.contains(&self.field.value(record))
    }
}
