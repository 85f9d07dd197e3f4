//! Client repository implementation using SQLite

use std::sync::Arc;

use async_trait::async_trait;
use rusqlite::{params, Row, ToSql, Transaction};
use timebook_common::storage::{SqliteConnection, StorageResult};
use timebook_core::ClientRepository;
use timebook_domain::{Client, ClientActivityRate, ClientContact, Result as DomainResult, TimebookError};
use tokio::task;
use tracing::instrument;

use super::manager::DbManager;
use super::sql::{bool_to_int, from_millis, group_children, int_to_bool, query_by_ids, to_millis};
use crate::errors::{map_join_error, map_storage_error, InfraError};

const CLIENT_COLUMNS: &str =
    "id, name, contact_name, phone, email, address, archived, created_at, updated_at";

/// SQLite-backed implementation of `ClientRepository`
pub struct SqliteClientRepository {
    db: Arc<DbManager>,
}

impl SqliteClientRepository {
    /// Create a new repository instance
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ClientRepository for SqliteClientRepository {
    #[instrument(level = "debug", skip(self))]
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Client>> {
        let db = Arc::clone(&self.db);
        let id = id.to_string();

        task::spawn_blocking(move || -> DomainResult<Option<Client>> {
            let conn = db.get_connection()?;
            let clients =
                select_clients(&conn, "WHERE id = ?1", &[&id]).map_err(map_storage_error)?;
            Ok(clients.into_iter().next())
        })
        .await
        .map_err(map_join_error)?
    }

    #[instrument(level = "debug", skip(self, ids), fields(count = ids.len()))]
    async fn find_by_ids(&self, ids: &[String]) -> DomainResult<Vec<Client>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let db = Arc::clone(&self.db);
        let ids = ids.to_vec();

        task::spawn_blocking(move || -> DomainResult<Vec<Client>> {
            let conn = db.get_connection()?;
            let sql = format!("SELECT {CLIENT_COLUMNS} FROM clients WHERE id IN ({{ids}})");
            let mut clients =
                query_by_ids(&conn, &sql, &ids, map_client_row).map_err(map_storage_error)?;
            attach_activities(&conn, &mut clients).map_err(map_storage_error)?;
            Ok(clients)
        })
        .await
        .map_err(map_join_error)?
    }

    #[instrument(level = "debug", skip(self))]
    async fn list_active(&self) -> DomainResult<Vec<Client>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Vec<Client>> {
            let conn = db.get_connection()?;
            select_clients(&conn, "WHERE archived = 0 ORDER BY name COLLATE NOCASE", &[])
                .map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }

    #[instrument(level = "debug", skip(self, client), fields(client_id = %client.id))]
    async fn create(&self, client: &Client) -> DomainResult<()> {
        let db = Arc::clone(&self.db);
        let client = client.clone();

        task::spawn_blocking(move || -> DomainResult<()> {
            let mut conn = db.get_connection()?;
            let tx = conn.transaction().map_err(map_storage_error)?;
            insert_client(&tx, &client).map_err(sql_error)?;
            replace_activities(&tx, &client).map_err(sql_error)?;
            tx.commit().map_err(sql_error)
        })
        .await
        .map_err(map_join_error)?
    }

    #[instrument(level = "debug", skip(self, client), fields(client_id = %client.id))]
    async fn update(&self, client: &Client) -> DomainResult<()> {
        let db = Arc::clone(&self.db);
        let client = client.clone();

        task::spawn_blocking(move || -> DomainResult<()> {
            let mut conn = db.get_connection()?;
            let tx = conn.transaction().map_err(map_storage_error)?;
            if update_client(&tx, &client).map_err(sql_error)? == 0 {
                return Err(TimebookError::not_found("Client"));
            }
            replace_activities(&tx, &client).map_err(sql_error)?;
            tx.commit().map_err(sql_error)
        })
        .await
        .map_err(map_join_error)?
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn sql_error(err: rusqlite::Error) -> TimebookError {
    InfraError::from(err).into()
}

fn select_clients(
    conn: &SqliteConnection,
    clause: &str,
    params: &[&dyn ToSql],
) -> StorageResult<Vec<Client>> {
    let sql = format!("SELECT {CLIENT_COLUMNS} FROM clients {clause}");
    let mut clients = conn.prepare(&sql)?.query_map(params, map_client_row)?;
    attach_activities(conn, &mut clients)?;
    Ok(clients)
}

fn attach_activities(conn: &SqliteConnection, clients: &mut [Client]) -> StorageResult<()> {
    if clients.is_empty() {
        return Ok(());
    }
    let ids: Vec<String> = clients.iter().map(|c| c.id.clone()).collect();
    let rows = query_by_ids(
        conn,
        "SELECT client_id, activity_id, hourly_rate
         FROM client_activities WHERE client_id IN ({ids}) ORDER BY client_id, position",
        &ids,
        |row| {
            Ok((
                row.get::<_, String>(0)?,
                ClientActivityRate { activity_id: row.get(1)?, hourly_rate: row.get(2)? },
            ))
        },
    )?;

    let mut grouped = group_children(rows);
    for client in clients.iter_mut() {
        client.activities = grouped.remove(&client.id).unwrap_or_default();
    }
    Ok(())
}

fn map_client_row(row: &Row<'_>) -> rusqlite::Result<Client> {
    Ok(Client {
        id: row.get(0)?,
        name: row.get(1)?,
        contact: ClientContact {
            contact_name: row.get(2)?,
            phone: row.get(3)?,
            email: row.get(4)?,
            address: row.get(5)?,
        },
        activities: Vec::new(),
        archived: int_to_bool(row.get(6)?),
        created_at: from_millis(7, row.get(7)?)?,
        updated_at: from_millis(8, row.get(8)?)?,
    })
}

fn insert_client(tx: &Transaction<'_>, client: &Client) -> rusqlite::Result<()> {
    tx.execute(
        "INSERT INTO clients (
            id, name, contact_name, phone, email, address, archived, created_at, updated_at
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            client.id,
            client.name,
            client.contact.contact_name,
            client.contact.phone,
            client.contact.email,
            client.contact.address,
            bool_to_int(client.archived),
            to_millis(&client.created_at),
            to_millis(&client.updated_at),
        ],
    )?;
    Ok(())
}

fn update_client(tx: &Transaction<'_>, client: &Client) -> rusqlite::Result<usize> {
    tx.execute(
        "UPDATE clients SET
            name = ?1, contact_name = ?2, phone = ?3, email = ?4, address = ?5,
            archived = ?6, updated_at = ?7
         WHERE id = ?8",
        params![
            client.name,
            client.contact.contact_name,
            client.contact.phone,
            client.contact.email,
            client.contact.address,
            bool_to_int(client.archived),
            to_millis(&client.updated_at),
            client.id, // WHERE clause
        ],
    )
}

fn replace_activities(tx: &Transaction<'_>, client: &Client) -> rusqlite::Result<()> {
    tx.execute("DELETE FROM client_activities WHERE client_id = ?1", params![client.id])?;

    let mut stmt = tx.prepare(
        "INSERT INTO client_activities (client_id, activity_id, position, hourly_rate)
         VALUES (?1, ?2, ?3, ?4)",
    )?;
    for (position, rate) in client.activities.iter().enumerate() {
        stmt.execute(params![
            client.id,
            rate.activity_id,
            i64::try_from(position).unwrap_or(i64::MAX),
            rate.hourly_rate,
        ])?;
    }
    Ok(())
}
