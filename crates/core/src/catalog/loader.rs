use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use super::{seed, Catalog};
use crate::domain::product::{parse_concern_tags, Category, Product, ProductId, SkinType};

/// Column order used when writing catalogs back out.
pub const CSV_COLUMNS: [&str; 7] =
    ["ID", "Brand", "Name", "Category", "Skin Type", "Concern", "Price"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CatalogSource {
    Embedded,
    CsvFile(PathBuf),
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("could not read catalog file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse catalog csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("catalog is missing required column `{0}`")]
    MissingColumn(&'static str),
    #[error("catalog row {row}: missing value for `{field}`")]
    MissingField { row: usize, field: &'static str },
    #[error("catalog row {row}: invalid price `{value}`")]
    InvalidPrice { row: usize, value: String },
    #[error("catalog row {row}: unknown category `{value}`")]
    UnknownCategory { row: usize, value: String },
    #[error("catalog row {row}: unknown skin type `{value}`")]
    UnknownSkinType { row: usize, value: String },
    #[error("catalog contains duplicate product id `{0}`")]
    DuplicateId(String),
}

pub fn load(source: &CatalogSource) -> Result<Catalog, CatalogError> {
    let catalog = match source {
        CatalogSource::Embedded => Catalog::new(seed::seed_products())?,
        CatalogSource::CsvFile(path) => load_csv_path(path)?,
    };

    info!(
        event_name = "catalog.load.completed",
        source = source_label(source),
        product_count = catalog.len(),
        "product catalog loaded"
    );
    Ok(catalog)
}

fn source_label(source: &CatalogSource) -> String {
    match source {
        CatalogSource::Embedded => "embedded".to_owned(),
        CatalogSource::CsvFile(path) => path.display().to_string(),
    }
}

fn load_csv_path(path: &Path) -> Result<Catalog, CatalogError> {
    let file = File::open(path)
        .map_err(|source| CatalogError::ReadFile { path: path.to_path_buf(), source })?;
    Catalog::from_csv(file)
}

impl Catalog {
    /// Reads a catalog table. Headers are matched case-insensitively and
    /// ignore spaces and underscores (`Skin Type`, `skin_type`). `ID` is
    /// optional; rows without one are keyed by product name.
    pub fn from_csv<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let mut reader =
            csv::ReaderBuilder::new().trim(csv::Trim::All).flexible(true).from_reader(reader);

        let columns = ColumnMap::from_headers(reader.headers()?)?;
        let mut products = Vec::new();

        for (index, record) in reader.records().enumerate() {
            let record = record?;
            // Header is line 1.
            let row = index + 2;
            if record.iter().all(str::is_empty) {
                continue;
            }
            products.push(columns.product(&record, row)?);
        }

        Catalog::new(products)
    }
}

struct ColumnMap {
    id: Option<usize>,
    brand: usize,
    name: usize,
    category: usize,
    skin_type: usize,
    concern: Option<usize>,
    price: usize,
}

impl ColumnMap {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, CatalogError> {
        let positions: HashMap<String, usize> = headers
            .iter()
            .enumerate()
            .map(|(index, header)| (normalize_header(header), index))
            .collect();
        let lookup = |names: &[&str]| names.iter().find_map(|name| positions.get(*name).copied());
        let required = |names: &[&str], label: &'static str| {
            lookup(names).ok_or(CatalogError::MissingColumn(label))
        };

        Ok(Self {
            id: lookup(&["id", "productid"]),
            brand: required(&["brand"], "Brand")?,
            name: required(&["name", "productname"], "Name")?,
            category: required(&["category"], "Category")?,
            skin_type: required(&["skintype"], "Skin Type")?,
            concern: lookup(&["concern", "concerns", "concerntags"]),
            price: required(&["price"], "Price")?,
        })
    }

    fn product(&self, record: &csv::StringRecord, row: usize) -> Result<Product, CatalogError> {
        let field = |index: usize| record.get(index).unwrap_or("").trim();
        let required = |index: usize, name: &'static str| {
            let value = field(index);
            if value.is_empty() {
                Err(CatalogError::MissingField { row, field: name })
            } else {
                Ok(value)
            }
        };

        let name = required(self.name, "Name")?;
        let id = self.id.map(field).filter(|value| !value.is_empty()).unwrap_or(name);

        let category_raw = required(self.category, "Category")?;
        let category = Category::resolve(category_raw)
            .ok_or_else(|| CatalogError::UnknownCategory { row, value: category_raw.to_owned() })?;

        let skin_type_raw = required(self.skin_type, "Skin Type")?;
        let skin_type = SkinType::parse_strict(skin_type_raw)
            .ok_or_else(|| CatalogError::UnknownSkinType { row, value: skin_type_raw.to_owned() })?;

        let price_raw = required(self.price, "Price")?;
        let price = parse_price(price_raw)
            .ok_or_else(|| CatalogError::InvalidPrice { row, value: price_raw.to_owned() })?;

        Ok(Product {
            id: ProductId(id.to_owned()),
            brand: required(self.brand, "Brand")?.to_owned(),
            name: name.to_owned(),
            category,
            skin_type,
            concern_tags: self
                .concern
                .map(|index| parse_concern_tags(field(index)))
                .unwrap_or_default(),
            price,
        })
    }
}

fn normalize_header(header: &str) -> String {
    header
        .trim()
        .trim_start_matches('\u{feff}')
        .chars()
        .filter(|ch| !matches!(ch, ' ' | '_' | '-'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Accepts whole numbers, optionally written with a zero fraction
/// (`1200.00`) or thousands separators (`1,200`).
fn parse_price(raw: &str) -> Option<u64> {
    let cleaned: String = raw.chars().filter(|ch| *ch != ',' && *ch != '_').collect();
    if let Ok(value) = cleaned.parse::<u64>() {
        return Some(value);
    }

    let (whole, fraction) = cleaned.split_once('.')?;
    if fraction.is_empty() || !fraction.chars().all(|ch| ch == '0') {
        return None;
    }
    whole.parse::<u64>().ok()
}
