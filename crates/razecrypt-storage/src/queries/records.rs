// SPDX-FileCopyrightText: 2026 Razecrypt Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Document operations on the `vault_records` table.
//!
//! Every single-record statement filters on `(kind, owner_id, id)`. A row
//! owned by someone else behaves exactly like a missing row.

use chrono::{SecondsFormat, Utc};
use razecrypt_core::{Document, Fields, OwnerId, RecordId, RecordKind, VaultError};
use rusqlite::{OptionalExtension, Row, params};

use crate::database::{Database, map_tr_err};

const SELECT_COLUMNS: &str = "SELECT id, kind, owner_id, fields, created_at, updated_at
     FROM vault_records";

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn encode_fields(fields: &Fields) -> Result<String, rusqlite::Error> {
    serde_json::to_string(fields).map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
}

fn decode_fields(raw: &str) -> Result<Fields, rusqlite::Error> {
    serde_json::from_str(raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn row_to_document(row: &Row<'_>) -> Result<Document, rusqlite::Error> {
    let kind: String = row.get(1)?;
    let kind = kind.parse::<RecordKind>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let owner: String = row.get(2)?;
    let fields: String = row.get(3)?;

    Ok(Document {
        id: RecordId(row.get(0)?),
        kind,
        // Rows are only ever written with a validated owner.
        owner_id: OwnerId::new(owner).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
        })?,
        fields: decode_fields(&fields)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

fn select_one(
    conn: &rusqlite::Connection,
    kind: &str,
    owner: &str,
    id: &str,
) -> Result<Option<Document>, rusqlite::Error> {
    conn.query_row(
        &format!("{SELECT_COLUMNS} WHERE kind = ?1 AND owner_id = ?2 AND id = ?3"),
        params![kind, owner, id],
        row_to_document,
    )
    .optional()
}

/// Insert a new document with a generated UUID v4 id.
pub async fn insert(
    db: &Database,
    kind: RecordKind,
    owner: &OwnerId,
    fields: &Fields,
) -> Result<RecordId, VaultError> {
    let id = uuid::Uuid::new_v4().to_string();
    let kind = kind.to_string();
    let owner = owner.as_str().to_string();
    let fields = fields.clone();
    let timestamp = now();

    let inserted = id.clone();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT INTO vault_records (id, kind, owner_id, fields, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
                params![inserted, kind, owner, encode_fields(&fields)?, timestamp],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

    Ok(RecordId(id))
}

/// All documents of `kind` owned by `owner`, newest first.
///
/// Rows created within the same millisecond fall back to insertion order.
pub async fn list(
    db: &Database,
    kind: RecordKind,
    owner: &OwnerId,
) -> Result<Vec<Document>, VaultError> {
    let kind = kind.to_string();
    let owner = owner.as_str().to_string();
    db.connection()
        .call(move |conn| -> Result<Vec<Document>, rusqlite::Error> {
            let mut stmt = conn.prepare(&format!(
                "{SELECT_COLUMNS} WHERE kind = ?1 AND owner_id = ?2
                 ORDER BY created_at DESC, rowid DESC"
            ))?;
            let rows = stmt.query_map(params![kind, owner], row_to_document)?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

/// Fetch one document by its compound key.
pub async fn get(
    db: &Database,
    kind: RecordKind,
    owner: &OwnerId,
    id: &RecordId,
) -> Result<Option<Document>, VaultError> {
    let kind = kind.to_string();
    let owner = owner.as_str().to_string();
    let id = id.as_str().to_string();
    db.connection()
        .call(move |conn| select_one(conn, &kind, &owner, &id))
        .await
        .map_err(map_tr_err)
}

/// Merge `patch` into the matching document's fields and bump `updated_at`.
///
/// Read and write happen in one transaction. Returns `None` when no row
/// matches the compound key.
pub async fn update(
    db: &Database,
    kind: RecordKind,
    owner: &OwnerId,
    id: &RecordId,
    patch: &Fields,
) -> Result<Option<Document>, VaultError> {
    let kind = kind.to_string();
    let owner = owner.as_str().to_string();
    let id = id.as_str().to_string();
    let patch = patch.clone();
    let timestamp = now();

    db.connection()
        .call(move |conn| -> Result<Option<Document>, rusqlite::Error> {
            let tx = conn.transaction()?;
            let Some(mut document) = select_one(&tx, &kind, &owner, &id)? else {
                return Ok(None);
            };

            document.fields.extend(patch);
            document.updated_at = timestamp;
            tx.execute(
                "UPDATE vault_records SET fields = ?1, updated_at = ?2
                 WHERE kind = ?3 AND owner_id = ?4 AND id = ?5",
                params![
                    encode_fields(&document.fields)?,
                    document.updated_at,
                    kind,
                    owner,
                    id
                ],
            )?;
            tx.commit()?;
            Ok(Some(document))
        })
        .await
        .map_err(map_tr_err)
}

/// Remove the matching document, returning it as it was.
pub async fn delete(
    db: &Database,
    kind: RecordKind,
    owner: &OwnerId,
    id: &RecordId,
) -> Result<Option<Document>, VaultError> {
    let kind = kind.to_string();
    let owner = owner.as_str().to_string();
    let id = id.as_str().to_string();

    db.connection()
        .call(move |conn| -> Result<Option<Document>, rusqlite::Error> {
            let tx = conn.transaction()?;
            let Some(document) = select_one(&tx, &kind, &owner, &id)? else {
                return Ok(None);
            };
            tx.execute(
                "DELETE FROM vault_records WHERE kind = ?1 AND owner_id = ?2 AND id = ?3",
                params![kind, owner, id],
            )?;
            tx.commit()?;
            Ok(Some(document))
        })
        .await
        .map_err(map_tr_err)
}
