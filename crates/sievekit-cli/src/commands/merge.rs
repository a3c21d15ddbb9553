use anyhow::Result;
use sievekit_core::{Filter, FilterItem, update_filter_with_partial};

use crate::cli::{MergeArgs, OutputFormat};
use crate::commands::read_json;
use crate::output::{filter_table, print_json};

pub fn merge(args: &MergeArgs, format: OutputFormat) -> Result<()> {
    let merged = merge_filters(args)?;
    match format {
        OutputFormat::Json => print_json(&merged)?,
        OutputFormat::Table => println!("{}", filter_table(&merged)),
    }
    Ok(())
}

fn merge_filters(args: &MergeArgs) -> Result<Filter> {
    let original: Filter = read_json(Some(args.filter.as_str()))?;
    let partial: Vec<FilterItem> = read_json(Some(args.partial.as_str()))?;

    let merged = update_filter_with_partial(&partial, &original);
    tracing::debug!(
        before = original.filter_items().len(),
        after = merged.filter_items().len(),
        "Merged partial filter items"
    );
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sievekit_core::PageNumber;
    use std::fs;

    #[test]
    fn reads_filter_and_partial_files() {
        let dir = tempfile::tempdir().unwrap();
        let filter = dir.path().join("filter.json");
        let partial = dir.path().join("partial.json");
        fs::write(
            &filter,
            r#"{"pageIndex": 0, "filters": [
                {"fields": ["a"], "values": ["1"], "operator": "=="},
                {"fields": ["b"], "values": ["3"], "operator": ">"}
            ]}"#,
        )
        .unwrap();
        fs::write(
            &partial,
            r#"[{"fields": ["a"], "values": ["2"], "operator": "!="}]"#,
        )
        .unwrap();

        let args = MergeArgs {
            filter: filter.display().to_string(),
            partial: partial.display().to_string(),
        };
        let merged = merge_filters(&args).unwrap();

        assert_eq!(merged.page_index, Some(PageNumber::Number(0)));
        assert_eq!(
            merged.filters,
            Some(vec![
                FilterItem::new(["b"], ["3"], ">"),
                FilterItem::new(["a"], ["2"], "!="),
            ])
        );
        merge(&args, OutputFormat::Json).unwrap();
    }

    #[test]
    fn invalid_partial_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let filter = dir.path().join("filter.json");
        fs::write(&filter, "{}").unwrap();

        let args = MergeArgs {
            filter: filter.display().to_string(),
            partial: dir.path().join("missing.json").display().to_string(),
        };
        let err = merge_filters(&args).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to read file"));
    }
}
