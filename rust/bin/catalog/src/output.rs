//! Table and JSON rendering for command output.

use catalog::model::{Client, License, Notification, Product, Release};
use catalog_dashboard::pages::status_label;
use catalog_dashboard::view::{fmt_date, fmt_datetime};
use chrono::Utc;
use clap::ValueEnum;
use serde::Serialize;

/// Output format selected with `-o`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Output {
    Table,
    Json,
}

/// A record that can be printed as one table row.
pub trait Row {
    const HEADERS: &'static [&'static str];

    fn cells(&self) -> Vec<String>;
}

/// Print records in the chosen format.
pub fn print_list<T: Row + Serialize>(items: &[T], output: Output) -> anyhow::Result<()> {
    match output {
        Output::Json => println!("{}", serde_json::to_string_pretty(items)?),
        Output::Table => {
            let rows: Vec<Vec<String>> = items.iter().map(Row::cells).collect();
            print!("{}", render_table(T::HEADERS, &rows));
        }
    }
    Ok(())
}

pub fn print_one<T: Row + Serialize>(item: &T, output: Output) -> anyhow::Result<()> {
    match output {
        Output::Json => println!("{}", serde_json::to_string_pretty(item)?),
        Output::Table => print!("{}", render_table(T::HEADERS, &[item.cells()])),
    }
    Ok(())
}

/// Left-aligned columns separated by three spaces. Trailing padding is
/// trimmed.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(widths.len()) {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let line = |cells: Vec<&str>| {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:<width$}", c, width = *w))
            .collect();
        format!("{}\n", padded.join("   ").trim_end())
    };

    let mut out = line(headers.to_vec());
    for row in rows {
        out.push_str(&line(row.iter().map(String::as_str).collect()));
    }
    out
}

/// Wire name of a serde enum (`"perpetual"`, `"service_pack"`).
fn wire_name<T: Serialize>(value: &T) -> String {
    serde_json::to_value(value)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}

fn or_dash(value: Option<&str>) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or("-")
        .to_string()
}

impl Row for Product {
    const HEADERS: &'static [&'static str] = &["ID", "NAME", "SKU", "STATUS", "CREATED"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.product_id.to_string(),
            self.name.clone(),
            self.sku.clone(),
            or_dash(self.status.as_deref()),
            fmt_date(self.created_at.as_deref()),
        ]
    }
}

impl Row for Release {
    const HEADERS: &'static [&'static str] =
        &["ID", "PRODUCT", "VERSION", "TYPE", "STATUS", "DATE", "TITLE"];

    fn cells(&self) -> Vec<String> {
        let product = match &self.product_name {
            Some(name) => name.clone(),
            None => self.product_id.to_string(),
        };
        vec![
            self.release_id.to_string(),
            product,
            self.version.clone(),
            wire_name(&self.release_type),
            or_dash(Some(self.status.as_str())),
            fmt_date(Some(self.release_date.as_str())),
            or_dash(self.title.as_deref()),
        ]
    }
}

impl Row for Client {
    const HEADERS: &'static [&'static str] = &["ID", "NAME", "CONTACT", "EMAIL", "LOCATION"];

    fn cells(&self) -> Vec<String> {
        let location = self
            .locations
            .first()
            .map(|l| format!("{}, {}", l.city, l.country));
        vec![
            self.client_id.to_string(),
            self.name.clone(),
            self.primary_contact.clone(),
            self.email.clone(),
            or_dash(location.as_deref()),
        ]
    }
}

impl Row for License {
    const HEADERS: &'static [&'static str] =
        &["ID", "KEY", "CLIENT", "PRODUCT", "TYPE", "STATUS", "ENDS"];

    fn cells(&self) -> Vec<String> {
        let client = match &self.client {
            Some(c) => c.name.clone(),
            None => self.client_id.to_string(),
        };
        let product = match &self.product {
            Some(p) => p.name.clone(),
            None => self.product_id.to_string(),
        };
        vec![
            self.license_id.to_string(),
            self.license_key.clone(),
            client,
            product,
            wire_name(&self.license_type),
            status_label(self, Utc::now()),
            fmt_date(Some(self.end_date.as_str())),
        ]
    }
}

impl Row for Notification {
    const HEADERS: &'static [&'static str] = &["ID", "TYPE", "READ", "CREATED", "MESSAGE"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.notification_id.to_string(),
            self.kind.as_str().to_string(),
            if self.is_read { "yes" } else { "no" }.to_string(),
            fmt_datetime(Some(self.created_at.as_str())),
            self.message.clone(),
        ]
    }
}
