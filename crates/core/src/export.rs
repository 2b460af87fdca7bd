use std::io::{Read, Write};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::{Catalog, CSV_COLUMNS};
use crate::domain::client::{ClientId, ClientRecord};
use crate::domain::product::SkinType;
use crate::errors::ApplicationError;

#[derive(Debug, Serialize, Deserialize)]
struct ClientRow {
    id: Uuid,
    name: String,
    age: u8,
    skin_type: String,
    concerns: String,
    notes: String,
    created_at: DateTime<Utc>,
}

/// Writes the catalog in the same column layout the catalog loader reads.
pub fn write_products_csv<W: Write>(catalog: &Catalog, writer: W) -> Result<(), ApplicationError> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(CSV_COLUMNS).map_err(export_error)?;

    for product in catalog {
        let concerns =
            product.concern_tags.iter().map(String::as_str).collect::<Vec<_>>().join("; ");
        let price = product.price.to_string();
        writer
            .write_record([
                product.id.0.as_str(),
                product.brand.as_str(),
                product.name.as_str(),
                product.category.as_str(),
                product.skin_type.as_str(),
                concerns.as_str(),
                price.as_str(),
            ])
            .map_err(export_error)?;
    }

    writer.flush().map_err(|error| ApplicationError::Export(error.to_string()))
}

pub fn write_clients_csv<W: Write>(
    clients: &[ClientRecord],
    writer: W,
) -> Result<(), ApplicationError> {
    let mut writer = csv::Writer::from_writer(writer);
    if clients.is_empty() {
        // Header-only file so later appends and reads see the layout.
        writer
            .write_record(["id", "name", "age", "skin_type", "concerns", "notes", "created_at"])
            .map_err(export_error)?;
    }

    for client in clients {
        writer
            .serialize(ClientRow {
                id: client.id.0,
                name: client.name.clone(),
                age: client.age,
                skin_type: client.skin_type.as_str().to_owned(),
                concerns: client.concerns.clone(),
                notes: client.notes.clone(),
                created_at: client.created_at,
            })
            .map_err(export_error)?;
    }

    writer.flush().map_err(|error| ApplicationError::Export(error.to_string()))
}

pub fn read_clients_csv<R: Read>(reader: R) -> Result<Vec<ClientRecord>, ApplicationError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::Headers).from_reader(reader);
    let mut clients = Vec::new();

    for (index, row) in reader.deserialize::<ClientRow>().enumerate() {
        let row_number = index + 2;
        let row = row.map_err(|error| {
            ApplicationError::Export(format!("clients row {row_number}: {error}"))
        })?;
        let skin_type = SkinType::parse_strict(&row.skin_type).ok_or_else(|| {
            ApplicationError::Export(format!(
                "clients row {row_number}: unknown skin type `{}`",
                row.skin_type
            ))
        })?;

        clients.push(ClientRecord {
            id: ClientId(row.id),
            name: row.name,
            age: row.age,
            skin_type,
            concerns: row.concerns,
            notes: row.notes,
            created_at: row.created_at,
        });
    }

    Ok(clients)
}

fn export_error(error: csv::Error) -> ApplicationError {
    ApplicationError::Export(error.to_string())
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use crate::catalog::Catalog;
    use crate::domain::client::NewClient;
    use crate::domain::product::SkinType;

    use super::{read_clients_csv, write_clients_csv, write_products_csv};

    #[test]
    fn exported_products_reload_as_the_same_catalog() {
        let catalog = Catalog::seeded();
        let mut buffer = Vec::new();
        write_products_csv(&catalog, &mut buffer).expect("export");

        let text = String::from_utf8(buffer.clone()).expect("utf-8");
        assert!(text.starts_with("ID,Brand,Name,Category,Skin Type,Concern,Price"));

        let reloaded = Catalog::from_csv(buffer.as_slice()).expect("reload");
        assert_eq!(reloaded, catalog);
    }

    #[test]
    fn clients_survive_a_write_and_read() {
        let created_at = Utc.with_ymd_and_hms(2026, 3, 14, 10, 30, 0).single().expect("timestamp");
        let client = NewClient {
            name: "Meera, K.".to_owned(),
            age: 34,
            skin_type: SkinType::Sensitive,
            concerns: "redness; \"rosacea\"".to_owned(),
            notes: "patch test first".to_owned(),
        }
        .validate(created_at)
        .expect("valid intake");

        let mut buffer = Vec::new();
        write_clients_csv(std::slice::from_ref(&client), &mut buffer).expect("export");
        let clients = read_clients_csv(buffer.as_slice()).expect("read back");

        assert_eq!(clients, vec![client]);
    }

    #[test]
    fn empty_client_list_writes_header_only() {
        let mut buffer = Vec::new();
        write_clients_csv(&[], &mut buffer).expect("export");

        let text = String::from_utf8(buffer.clone()).expect("utf-8");
        assert_eq!(text.lines().count(), 1);
        assert!(read_clients_csv(buffer.as_slice()).expect("read back").is_empty());
    }

    #[test]
    fn unknown_skin_type_in_client_file_is_reported_with_row() {
        let text = "id,name,age,skin_type,concerns,notes,created_at\n\
            6f1c1c1e-8a3e-4b8e-9d55-0c7b6b2a1f00,Ana,30,Scaly,,,2026-01-01T00:00:00Z\n";
        let error = read_clients_csv(text.as_bytes()).expect_err("bad skin type");
        assert!(error.to_string().contains("clients row 2"));
    }
}
