use itam_core_db::models::AccountabilityModel;
use sqlx::{postgres::PgRow, PgConnection, Row};
use std::collections::HashMap;
use std::error::Error;
use uuid::Uuid;

use crate::utils::{db_error, fetch_by_ids, positions, TryFromRow};

use super::repo_impl::AccountabilityRepositoryImpl;

/// Decodes record rows and attaches their listed assets and computers in listing order
pub async fn hydrate(
    repo: &AccountabilityRepositoryImpl,
    rows: Vec<PgRow>,
) -> Result<Vec<AccountabilityModel>, Box<dyn Error + Send + Sync>> {
    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        records.push(AccountabilityModel::try_from_row(&row)?);
    }
    if records.is_empty() {
        return Ok(records);
    }
    let ids: Vec<Uuid> = records.iter().map(|r| r.id).collect();

    let asset_rows = fetch_by_ids(
        &repo.executor,
        r#"
        SELECT accountability_id, asset_id AS item_id FROM accountability_asset
        WHERE accountability_id = ANY($1)
        ORDER BY accountability_id, position
        "#,
        &ids,
    )
    .await?;
    let computer_rows = fetch_by_ids(
        &repo.executor,
        r#"
        SELECT accountability_id, computer_id AS item_id FROM accountability_computer
        WHERE accountability_id = ANY($1)
        ORDER BY accountability_id, position
        "#,
        &ids,
    )
    .await?;

    let mut assets = group_members(asset_rows)?;
    let mut computers = group_members(computer_rows)?;
    for record in records.iter_mut() {
        record.asset_ids = assets.remove(&record.id).unwrap_or_default();
        record.computer_ids = computers.remove(&record.id).unwrap_or_default();
    }
    Ok(records)
}

fn group_members(rows: Vec<PgRow>) -> Result<HashMap<Uuid, Vec<Uuid>>, Box<dyn Error + Send + Sync>> {
    let mut members: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    for row in rows {
        let record_id: Uuid = row.try_get("accountability_id")?;
        members.entry(record_id).or_default().push(row.try_get("item_id")?);
    }
    Ok(members)
}

/// Rewrites the member rows of `records`, clearing every old row before inserting,
/// so items merged from one record into another in the same batch do not collide
pub async fn replace_members(
    conn: &mut PgConnection,
    records: &[&AccountabilityModel],
) -> Result<(), Box<dyn Error + Send + Sync>> {
    if records.is_empty() {
        return Ok(());
    }
    let ids: Vec<Uuid> = records.iter().map(|r| r.id).collect();

    sqlx::query(r#"DELETE FROM accountability_asset WHERE accountability_id = ANY($1)"#)
        .bind(ids.as_slice())
        .execute(&mut *conn)
        .await
        .map_err(db_error)?;
    sqlx::query(r#"DELETE FROM accountability_computer WHERE accountability_id = ANY($1)"#)
        .bind(ids.as_slice())
        .execute(&mut *conn)
        .await
        .map_err(db_error)?;

    for record in records {
        insert_members(conn, record).await?;
    }
    Ok(())
}

pub async fn insert_members(
    conn: &mut PgConnection,
    record: &AccountabilityModel,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    if !record.asset_ids.is_empty() {
        sqlx::query(
            r#"
            INSERT INTO accountability_asset (asset_id, accountability_id, position)
            SELECT asset_id, $2, position
            FROM UNNEST($1::uuid[], $3::int4[]) AS m(asset_id, position)
            "#,
        )
        .bind(record.asset_ids.as_slice())
        .bind(record.id)
        .bind(positions(&record.asset_ids))
        .execute(&mut *conn)
        .await
        .map_err(db_error)?;
    }

    if !record.computer_ids.is_empty() {
        sqlx::query(
            r#"
            INSERT INTO accountability_computer (computer_id, accountability_id, position)
            SELECT computer_id, $2, position
            FROM UNNEST($1::uuid[], $3::int4[]) AS m(computer_id, position)
            "#,
        )
        .bind(record.computer_ids.as_slice())
        .bind(record.id)
        .bind(positions(&record.computer_ids))
        .execute(&mut *conn)
        .await
        .map_err(db_error)?;
    }
    Ok(())
}
