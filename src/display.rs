use std::collections::HashMap;

use anyhow::{bail, Result};
use clap::ValueEnum;
use serde::Serialize;

use crate::table::Table;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DisplayStyle {
    Table,
    Json,
    Csv,
}

pub trait TerminalDisplay {
    fn table_titles() -> Vec<&'static str>;
    fn table_row(self) -> Vec<String>;

    fn csv_titles() -> Vec<&'static str>;
    fn csv_row(self) -> HashMap<&'static str, String>;
}

pub fn display_json<T: Serialize>(o: T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&o)?);
    Ok(())
}

pub fn display_list<T: Serialize + TerminalDisplay>(
    list: Vec<T>,
    style: DisplayStyle,
    headless: bool,
) -> Result<()> {
    match style {
        DisplayStyle::Table => {
            if list.is_empty() {
                println!("<empty list>");
                return Ok(());
            }
            let mut table = Table::with_capacity(list.len() + 1, headless);
            table.set_titles(T::table_titles());
            for item in list {
                table.add(item.table_row());
            }
            table.show();
        }
        DisplayStyle::Csv => {
            let titles = T::csv_titles();
            if titles.is_empty() {
                bail!("no csv column to display");
            }
            if !headless {
                println!("{}", titles.join(","));
            }
            for item in list {
                let mut row = item.csv_row();
                let values: Vec<String> = titles
                    .iter()
                    .map(|title| csv_escape(&row.remove(title).unwrap_or_default()))
                    .collect();
                println!("{}", values.join(","));
            }
        }
        DisplayStyle::Json => display_json(list)?,
    }
    Ok(())
}

fn csv_escape(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
