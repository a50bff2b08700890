use itam_core_api::ComponentType;
use itam_core_db::models::{ComponentSlot, ComputerModel};
use sqlx::{postgres::PgRow, PgConnection, Row};
use std::collections::HashMap;
use std::error::Error;
use uuid::Uuid;

use crate::utils::{db_error, fetch_by_ids, positions, TryFromRow};

use super::repo_impl::ComputerRepositoryImpl;

/// Decodes computer rows and attaches their peripherals (by position) and slots (by type)
pub async fn hydrate(
    repo: &ComputerRepositoryImpl,
    rows: Vec<PgRow>,
) -> Result<Vec<ComputerModel>, Box<dyn Error + Send + Sync>> {
    let mut computers = Vec::with_capacity(rows.len());
    for row in rows {
        computers.push(ComputerModel::try_from_row(&row)?);
    }
    if computers.is_empty() {
        return Ok(computers);
    }
    let ids: Vec<Uuid> = computers.iter().map(|c| c.id).collect();

    let asset_rows = fetch_by_ids(
        &repo.executor,
        r#"
        SELECT computer_id, asset_id FROM computer_assigned_asset
        WHERE computer_id = ANY($1)
        ORDER BY computer_id, position
        "#,
        &ids,
    )
    .await?;
    let mut assets: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    for row in asset_rows {
        let computer_id: Uuid = row.try_get("computer_id")?;
        assets.entry(computer_id).or_default().push(row.try_get("asset_id")?);
    }

    let slot_rows = fetch_by_ids(
        &repo.executor,
        r#"
        SELECT computer_id, component_type, component_id FROM computer_component_slot
        WHERE computer_id = ANY($1)
        "#,
        &ids,
    )
    .await?;
    let mut slots: HashMap<Uuid, Vec<ComponentSlot>> = HashMap::new();
    for row in slot_rows {
        let computer_id: Uuid = row.try_get("computer_id")?;
        let component_type: ComponentType = row.try_get("component_type")?;
        slots.entry(computer_id).or_default().push(ComponentSlot {
            component_type,
            component_id: row.try_get("component_id")?,
        });
    }

    for computer in computers.iter_mut() {
        computer.assigned_assets = assets.remove(&computer.id).unwrap_or_default();
        let mut components = slots.remove(&computer.id).unwrap_or_default();
        components.sort_by_key(|slot| slot.component_type);
        computer.components = components;
    }
    Ok(computers)
}

/// Rewrites the join rows of `computers`
///
/// All old rows go first so a peripheral or component moving between two computers
/// of the same batch never trips the uniqueness constraints.
pub async fn replace_members(
    conn: &mut PgConnection,
    computers: &[&ComputerModel],
) -> Result<(), Box<dyn Error + Send + Sync>> {
    if computers.is_empty() {
        return Ok(());
    }
    let ids: Vec<Uuid> = computers.iter().map(|c| c.id).collect();

    sqlx::query(r#"DELETE FROM computer_assigned_asset WHERE computer_id = ANY($1)"#)
        .bind(ids.as_slice())
        .execute(&mut *conn)
        .await
        .map_err(db_error)?;
    sqlx::query(r#"DELETE FROM computer_component_slot WHERE computer_id = ANY($1)"#)
        .bind(ids.as_slice())
        .execute(&mut *conn)
        .await
        .map_err(db_error)?;

    for computer in computers {
        insert_members(conn, computer).await?;
    }
    Ok(())
}

pub async fn insert_members(
    conn: &mut PgConnection,
    computer: &ComputerModel,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let order = positions(&computer.assigned_assets);
    for (asset_id, position) in computer.assigned_assets.iter().zip(order) {
        sqlx::query(
            r#"
            INSERT INTO computer_assigned_asset (asset_id, computer_id, position)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(*asset_id)
        .bind(computer.id)
        .bind(position)
        .execute(&mut *conn)
        .await
        .map_err(db_error)?;
    }

    for slot in &computer.components {
        sqlx::query(
            r#"
            INSERT INTO computer_component_slot (computer_id, component_type, component_id)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(computer.id)
        .bind(slot.component_type)
        .bind(slot.component_id)
        .execute(&mut *conn)
        .await
        .map_err(db_error)?;
    }
    Ok(())
}
