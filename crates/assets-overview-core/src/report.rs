use crate::classify::FileRecord;
use crate::engine::{Aggregates, Reconciliation};
use crate::format::{human_file_size, number_format};
use crate::query::{GroupField, QueryConfig, SortField};
use serde::Serialize;

/// A contiguous run of sorted records sharing one group key.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReportGroup {
    /// 0-based position among emitted groups.
    pub index: usize,
    pub header: String,
    pub items: Vec<FileRecord>,
}

/// Everything the rendering layer needs for one page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Report {
    pub title: String,
    pub sorter: &'static str,
    pub filter: Option<&'static str>,
    pub display_mode: &'static str,
    pub limit: usize,
    pub page: usize,
    pub number_of_pages: usize,
    pub aggregates: Aggregates,
    pub total_filtered_size: String,
    pub available_extensions: Vec<String>,
    pub groups: Vec<ReportGroup>,
}

pub struct ReportAssembler;

impl ReportAssembler {
    /// Stable ascending sort on `field`.
    pub fn sort(records: &mut [FileRecord], field: SortField) {
        records.sort_by(|a, b| field.compare(a, b));
    }

    /// Sort, then split into groups in one linear pass. A new group opens
    /// whenever the group key changes; empty input yields no groups.
    pub fn assemble(mut records: Vec<FileRecord>, config: &QueryConfig) -> Vec<ReportGroup> {
        Self::sort(&mut records, config.sort_field());
        Self::group_sorted(records, config.group_field())
    }

    /// Group records that are already in display order.
    pub fn group_sorted(records: Vec<FileRecord>, group_field: GroupField) -> Vec<ReportGroup> {
        let mut groups: Vec<ReportGroup> = Vec::new();
        // None until the first record, so the first real key always opens a group.
        let mut current_header: Option<String> = None;
        let mut current_items: Vec<FileRecord> = Vec::new();

        for record in records {
            let header = group_field.key_for(&record);
            if current_header.as_deref() != Some(header.as_str()) {
                if let Some(previous) = current_header.take() {
                    push_group(&mut groups, previous, std::mem::take(&mut current_items));
                }
                current_header = Some(header);
            }
            current_items.push(record);
        }
        if let Some(last) = current_header {
            push_group(&mut groups, last, current_items);
        }
        groups
    }

    /// One page of an already materialized, sorted sequence.
    pub fn page_slice<'r>(records: &'r [FileRecord], config: &QueryConfig) -> &'r [FileRecord] {
        let start = config.page_start().min(records.len());
        let end = config.page_end().min(records.len());
        &records[start..end]
    }

    pub fn build_report(reconciliation: Reconciliation, config: &QueryConfig) -> Report {
        let aggregates = reconciliation.aggregates;
        let number_of_pages = number_of_pages(aggregates.total_filtered_count, config.limit);
        Report {
            title: report_title(config, &aggregates, number_of_pages),
            sorter: config.sorter.key(),
            filter: config.filter.map(|f| f.key()),
            display_mode: config.display_mode.key(),
            limit: config.limit,
            page: config.page,
            number_of_pages,
            total_filtered_size: human_file_size(aggregates.total_filtered_size_bytes, 2),
            aggregates,
            available_extensions: reconciliation.available_extensions,
            groups: Self::assemble(reconciliation.records, config),
        }
    }
}

fn push_group(groups: &mut Vec<ReportGroup>, header: String, items: Vec<FileRecord>) {
    if items.is_empty() {
        return;
    }
    let index = groups.len();
    groups.push(ReportGroup {
        index,
        header,
        items,
    });
}

pub fn number_of_pages(filtered: usize, limit: usize) -> usize {
    if limit == 0 {
        return 0;
    }
    filtered.div_ceil(limit)
}

fn report_title(config: &QueryConfig, aggregates: &Aggregates, pages: usize) -> String {
    let mut parts = vec![format!("sorted by {}", config.sorter.title())];
    if let Some(filter) = config.filter {
        parts.push(format!("filtered for: {}", filter.title()));
    }
    if pages > 1 {
        let first = config.page_start().min(aggregates.total_filtered_count);
        let last = config.page_end().min(aggregates.total_filtered_count);
        parts.push(format!(
            "from {} to {} out of {}",
            number_format(first as u64),
            number_format(last as u64),
            number_format(aggregates.total_filtered_count as u64)
        ));
    }
    let mut title = format!("Showing all files {}", parts.join(", "));
    if aggregates.partial {
        title.push_str(" (partial scan)");
    }
    title
}
