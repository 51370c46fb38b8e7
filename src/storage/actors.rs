// Actors and their feature-type links

use super::features::{type_from_row, TYPE_COLUMNS};
use super::{clean_name, now_rfc3339, Catalog, StorageError, StorageResult};
use crate::model::{Actor, FeatureType, Id, NewActor};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;

impl Catalog {
    /// All actors, newest first
    pub fn list_actors(&self) -> StorageResult<Vec<Actor>> {
        let conn = self.conn()?;
        list_actors(&conn)
    }

    /// Create an actor linked to the given feature types
    ///
    /// Legacy `category_ids` are merged into `feature_type_ids`; unknown
    /// ids are dropped.
    pub fn create_actor(&self, new: &NewActor) -> StorageResult<Actor> {
        let name = clean_name(&new.name, "actor name")?;
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT INTO actors (name, created_at) VALUES (?1, ?2)",
            params![name, now_rfc3339()],
        )?;
        let id = tx.last_insert_rowid();

        for type_id in new.feature_type_ids.iter().chain(&new.category_ids) {
            tx.execute(
                "INSERT OR IGNORE INTO actor_feature_types (actor_id, feature_type_id)
                 SELECT ?1, id FROM feature_types WHERE id = ?2",
                params![id, type_id],
            )?;
        }

        let actor = load_actor(&tx, id)?;
        tx.commit()?;

        tracing::debug!(actor_id = id, types = actor.feature_types.len(), "Actor created");
        Ok(actor)
    }

    pub fn delete_actor(&self, id: Id) -> StorageResult<()> {
        let conn = self.conn()?;
        let changed = conn.execute("DELETE FROM actors WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(StorageError::NotFound { entity: "actor", id });
        }
        Ok(())
    }
}

pub(super) fn list_actors(conn: &Connection) -> StorageResult<Vec<Actor>> {
    let mut actors: Vec<Actor> = {
        let mut stmt = conn.prepare(
            "SELECT id, name, COALESCE(created_at, '') FROM actors
             ORDER BY created_at DESC, id DESC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(Actor {
                id: row.get(0)?,
                name: row.get(1)?,
                created_at: row.get(2)?,
                feature_types: Vec::new(),
            })
        })?;
        rows.collect::<Result<_, _>>()?
    };

    let mut links = actor_type_links(conn, None)?;
    for actor in &mut actors {
        actor.feature_types = links.remove(&actor.id).unwrap_or_default();
    }
    Ok(actors)
}

fn load_actor(conn: &Connection, id: Id) -> StorageResult<Actor> {
    let actor = conn
        .query_row(
            "SELECT id, name, COALESCE(created_at, '') FROM actors WHERE id = ?1",
            params![id],
            |row| {
                Ok(Actor {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    created_at: row.get(2)?,
                    feature_types: Vec::new(),
                })
            },
        )
        .optional()?
        .ok_or(StorageError::NotFound { entity: "actor", id })?;

    let feature_types = actor_type_links(conn, Some(id))?
        .remove(&id)
        .unwrap_or_default();
    Ok(Actor {
        feature_types,
        ..actor
    })
}

/// Feature types per actor, in feature order then type position
fn actor_type_links(
    conn: &Connection,
    actor_id: Option<Id>,
) -> StorageResult<HashMap<Id, Vec<FeatureType>>> {
    let sql = format!(
        "SELECT l.actor_id, {TYPE_COLUMNS}
         FROM actor_feature_types l
         JOIN feature_types t ON t.id = l.feature_type_id
         JOIN features f ON f.id = t.feature_id
         WHERE ?1 IS NULL OR l.actor_id = ?1
         ORDER BY f.sort_order, t.position, t.id"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![actor_id], |row| {
        Ok((row.get::<_, Id>(0)?, type_from_row(row, 1)?))
    })?;

    let mut links: HashMap<Id, Vec<FeatureType>> = HashMap::new();
    for row in rows {
        let (actor, ty) = row?;
        links.entry(actor).or_default().push(ty);
    }
    Ok(links)
}
