use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use sievekit_core::{Filter, OperatorTable, PageNumber};
use tabled::builder::Builder;
use tabled::settings::Style;

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

pub fn operator_table(table: &OperatorTable) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Name", "Token"]);
    for (name, token) in table.iter() {
        builder.push_record([name, token]);
    }
    builder.build().with(Style::rounded()).to_string()
}

/// Pagination line followed by one row per filter clause and sort.
pub fn filter_table(filter: &Filter) -> String {
    let page = |n: Option<&PageNumber>| n.map_or_else(|| "-".to_string(), PageNumber::to_string);
    let mut out = format!(
        "{}: {}  {}: {}\n",
        "Page index".cyan(),
        page(filter.page_index.as_ref()),
        "Page size".cyan(),
        page(filter.page_size.as_ref())
    );

    let mut builder = Builder::default();
    builder.push_record(["Kind", "Fields", "Operator", "Values"]);
    for item in filter.filter_items() {
        builder.push_record([
            "filter".to_string(),
            item.fields.join(", "),
            item.operator.clone(),
            item.present_values().collect::<Vec<_>>().join(", "),
        ]);
    }
    for sort in filter.sort_items() {
        builder.push_record([
            "sort".to_string(),
            sort.field.clone(),
            String::new(),
            sort.direction.to_string(),
        ]);
    }
    out.push_str(&builder.build().with(Style::rounded()).to_string());
    out
}
