//! Rendering of catalog records on stdout

use anyhow::Result;
use comfy_table::{presets::UTF8_FULL, Table};
use estate_core::{Owner, Property, PropertyImage, PropertyTrace};
use serde::Serialize;

use crate::cli::OutputFormat;

/// A record that can be shown as one table row
pub trait Tabular {
    fn headers() -> Vec<&'static str>;
    fn row(&self) -> Vec<String>;
}

impl Tabular for Owner {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Name", "Address", "Birthday", "Photo"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_hex(),
            self.name.clone(),
            self.address.clone(),
            self.birthday.to_string(),
            self.photo.clone(),
        ]
    }
}

impl Tabular for Property {
    fn headers() -> Vec<&'static str> {
        vec![
            "ID", "Name", "Address", "Price", "Code", "Year", "Owner", "Images", "Traces",
        ]
    }

    fn row(&self) -> Vec<String> {
        let owner = match &self.owner {
            Some(owner) => owner.name.clone(),
            None => self.owner_id.to_hex(),
        };
        vec![
            self.id.to_hex(),
            self.name.clone(),
            self.address.clone(),
            format!("{:.2}", self.price),
            self.code_internal.clone(),
            self.year.to_string(),
            owner,
            self.images.len().to_string(),
            self.traces.len().to_string(),
        ]
    }
}

impl Tabular for PropertyImage {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Property", "File", "Enabled"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_hex(),
            self.property_id.to_hex(),
            self.file.clone(),
            if self.enabled { "yes" } else { "no" }.to_string(),
        ]
    }
}

impl Tabular for PropertyTrace {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Property", "Date", "Name", "Value", "Tax"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_hex(),
            self.property_id.to_hex(),
            self.date_sale.format("%Y-%m-%d %H:%M").to_string(),
            self.name.clone(),
            format!("{:.2}", self.value),
            format!("{:.2}", self.tax),
        ]
    }
}

pub fn table<T: Tabular>(items: &[T]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(T::headers());
    for item in items {
        table.add_row(item.row());
    }
    table
}

pub fn render_list<T: Tabular + Serialize>(items: &[T], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(items)?),
        OutputFormat::Table => Ok(table(items).to_string()),
    }
}

pub fn render_one<T: Tabular + Serialize>(item: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(item)?),
        OutputFormat::Table => Ok(table(std::slice::from_ref(item)).to_string()),
    }
}

pub fn print_list<T: Tabular + Serialize>(items: &[T], format: OutputFormat) -> Result<()> {
    println!("{}", render_list(items, format)?);
    Ok(())
}

pub fn print_one<T: Tabular + Serialize>(item: &T, format: OutputFormat) -> Result<()> {
    println!("{}", render_one(item, format)?);
    Ok(())
}
