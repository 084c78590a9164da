use assets_overview_core::engine::Aggregates;
use assets_overview_core::query::{GroupField, QueryConfig, QueryOptions, SortKey};
use assets_overview_core::report::number_of_pages;
use assets_overview_core::{FileRecord, Reconciliation, ReportAssembler};
use std::time::Duration;

fn record(path: &str, size: u64) -> FileRecord {
    let (folder, name) = match path.rfind('/') {
        Some(i) => (path[..i].to_string(), path[i + 1..].to_string()),
        None => (String::new(), path.to_string()),
    };
    let extension = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default();
    FileRecord {
        absolute_path: format!("/{}", path),
        path_from_assets_folder: path.to_string(),
        folder_only: folder,
        file_name: name,
        extension,
        exists_on_disk: true,
        exists_in_staging_db: false,
        exists_in_live_db: false,
        database_title: String::new(),
        class_name: String::new(),
        file_size: size,
        last_edited_timestamp: 0,
        is_image: false,
        width_px: 0,
        height_px: 0,
        ratio: 0.0,
        has_irregular_extension: false,
        error_in_filename_case: false,
        error_in_legacy_path_comparison: false,
        error_parent_folder_id: false,
    }
}

fn image(path: &str, width: u32, height: u32) -> FileRecord {
    FileRecord {
        is_image: true,
        width_px: width,
        height_px: height,
        ratio: width as f64 / height as f64,
        ..record(path, 100)
    }
}

fn config(sorter: &str) -> QueryConfig {
    QueryConfig::resolve(&QueryOptions {
        sorter: Some(sorter.to_string()),
        ..QueryOptions::default()
    })
    .0
}

fn sample() -> Vec<FileRecord> {
    vec![
        record("b/zeta.txt", 10),
        record("readme.md", 3_000),
        record("a/beta.pdf", 2_000_000),
        record("a/alpha.txt", 500),
        record("b/gamma.PDF", 20),
    ]
}

#[test]
fn test_groups_concatenate_to_sorted_order() {
    for sorter in SortKey::ALL {
        let config = config(sorter.key());
        let mut sorted = sample();
        ReportAssembler::sort(&mut sorted, config.sort_field());

        let groups = ReportAssembler::assemble(sample(), &config);
        let flattened: Vec<FileRecord> = groups.iter().flat_map(|g| g.items.clone()).collect();
        assert_eq!(flattened, sorted, "sorter {}", sorter.key());

        for (i, group) in groups.iter().enumerate() {
            assert_eq!(group.index, i);
            assert!(!group.items.is_empty());
            for item in &group.items {
                assert_eq!(config.group_field().key_for(item), group.header);
            }
        }
    }
}

#[test]
fn test_group_by_folder() {
    let groups = ReportAssembler::assemble(sample(), &config("byfolder"));
    let headers: Vec<&str> = groups.iter().map(|g| g.header.as_str()).collect();
    assert_eq!(headers, vec!["a", "b", "/"]);
    assert_eq!(groups[0].items[0].file_name, "alpha.txt");
    assert_eq!(groups[0].items[1].file_name, "beta.pdf");
}

#[test]
fn test_sort_by_size_is_numeric() {
    let groups = ReportAssembler::assemble(sample(), &config("byfilesize"));
    let sizes: Vec<u64> = groups
        .iter()
        .flat_map(|g| g.items.iter().map(|r| r.file_size))
        .collect();
    assert_eq!(sizes, vec![10, 20, 500, 3_000, 2_000_000]);
}

#[test]
fn test_dimension_headers_follow_pixel_order() {
    let records = vec![
        image("big.png", 100, 100),
        image("wide.png", 20, 10),
        record("doc.txt", 1),
        image("tall.png", 10, 20),
    ];
    let groups = ReportAssembler::assemble(records, &config("bydimensions"));
    let headers: Vec<&str> = groups.iter().map(|g| g.header.as_str()).collect();
    assert_eq!(headers, vec!["no dimensions", "20x10", "10x20", "100x100"]);
}

#[test]
fn test_sort_is_stable_for_equal_keys() {
    let records = vec![record("x/one.txt", 5), record("y/two.txt", 5), record("z/three.txt", 5)];
    let groups = ReportAssembler::assemble(records, &config("byfilesize"));
    assert_eq!(groups.len(), 1);
    let names: Vec<&str> = groups[0].items.iter().map(|r| r.file_name.as_str()).collect();
    assert_eq!(names, vec!["one.txt", "two.txt", "three.txt"]);
}

#[test]
fn test_empty_input_has_no_groups() {
    assert!(ReportAssembler::assemble(Vec::new(), &config("byfolder")).is_empty());
    assert!(ReportAssembler::group_sorted(Vec::new(), GroupField::Extension).is_empty());
}

#[test]
fn test_page_slice_and_page_count() {
    let records: Vec<FileRecord> = (0..25).map(|i| record(&format!("f{:02}.txt", i), 1)).collect();
    let config = QueryConfig::resolve(&QueryOptions {
        limit: Some("10".into()),
        page: Some("3".into()),
        ..QueryOptions::default()
    })
    .0;
    let slice = ReportAssembler::page_slice(&records, &config);
    assert_eq!(slice.len(), 5);
    assert_eq!(slice[0].file_name, "f20.txt");

    assert_eq!(number_of_pages(25, 10), 3);
    assert_eq!(number_of_pages(20, 10), 2);
    assert_eq!(number_of_pages(0, 10), 0);
}

#[test]
fn test_report_title_and_totals() {
    let config = QueryConfig::resolve(&QueryOptions {
        sorter: Some("byfilesize".into()),
        filter: Some("bymissingfromlive".into()),
        limit: Some("2".into()),
        page: Some("2".into()),
        ..QueryOptions::default()
    })
    .0;
    let reconciliation = Reconciliation {
        records: vec![record("c.txt", 1024), record("d.txt", 1024)],
        aggregates: Aggregates {
            total_raw_count: 9,
            total_filtered_count: 5,
            total_filtered_size_bytes: 5 * 1024,
            partial: false,
        },
        available_extensions: vec!["txt".into()],
        scan_duration: Duration::ZERO,
        classify_duration: Duration::ZERO,
    };

    let report = ReportAssembler::build_report(reconciliation, &config);
    assert_eq!(report.number_of_pages, 3);
    assert_eq!(
        report.title,
        "Showing all files sorted by Filesize, filtered for: Unpublished, from 2 to 4 out of 5"
    );
    assert_eq!(report.total_filtered_size, "5.00 KB");
    assert_eq!(report.sorter, "byfilesize");
    assert_eq!(report.filter, Some("bymissingfromlive"));
    assert_eq!(report.groups.len(), 1);
    assert_eq!(report.groups[0].header, "1 KB");
}

#[test]
fn test_partial_report_is_labelled() {
    let config = QueryConfig::default();
    let reconciliation = Reconciliation {
        records: Vec::new(),
        aggregates: Aggregates {
            partial: true,
            ..Aggregates::default()
        },
        available_extensions: Vec::new(),
        scan_duration: Duration::ZERO,
        classify_duration: Duration::ZERO,
    };
    let report = ReportAssembler::build_report(reconciliation, &config);
    assert!(report.title.ends_with("(partial scan)"));
    assert!(report.groups.is_empty());
}
