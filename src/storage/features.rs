// Features, feature types and the category view over the reserved feature

use super::{clean_name, Catalog, StorageError, StorageResult};
use crate::color;
use crate::model::{
    Category, Feature, FeatureType, Id, NewCategory, NewFeature, NewFeatureType, Shade,
    CATEGORY_FEATURE, CATEGORY_FEATURE_COLOR,
};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::{HashMap, HashSet};

pub(super) const TYPE_COLUMNS: &str = "t.id, t.feature_id, t.name, t.shade, t.position";

/// Map a row selected with `TYPE_COLUMNS` (starting at `offset`)
pub(super) fn type_from_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<FeatureType> {
    Ok(FeatureType {
        id: row.get(offset)?,
        feature_id: row.get(offset + 1)?,
        name: row.get(offset + 2)?,
        shade: row.get(offset + 3)?,
        position: row.get(offset + 4)?,
    })
}

impl Catalog {
    /// All features in display order, each with its ordered types
    pub fn list_features(&self) -> StorageResult<Vec<Feature>> {
        let conn = self.conn()?;
        list_features(&conn)
    }

    pub fn create_feature(&self, new: &NewFeature) -> StorageResult<Feature> {
        let name = clean_name(&new.name, "feature name")?;
        if !color::is_valid_hex(&new.color) {
            return Err(StorageError::Validation(format!(
                "color must be #RRGGBB, got {:?}",
                new.color
            )));
        }

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let id = insert_feature(&tx, &name, &new.color, false)?;
        let feature = load_feature(&tx, id)?;
        tx.commit()?;

        tracing::debug!(feature_id = id, name = %feature.name, "Feature created");
        Ok(feature)
    }

    pub fn rename_feature(&self, id: Id, name: &str) -> StorageResult<Feature> {
        let name = clean_name(name, "feature name")?;
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let changed = tx.execute(
            "UPDATE features SET name = ?1 WHERE id = ?2",
            params![name, id],
        )?;
        if changed == 0 {
            return Err(StorageError::NotFound {
                entity: "feature",
                id,
            });
        }
        let feature = load_feature(&tx, id)?;
        tx.commit()?;
        Ok(feature)
    }

    /// Delete a feature (its types and their links cascade)
    pub fn delete_feature(&self, id: Id) -> StorageResult<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let changed = tx.execute("DELETE FROM features WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(StorageError::NotFound {
                entity: "feature",
                id,
            });
        }
        renumber_features(&tx)?;
        tx.commit()?;
        Ok(())
    }

    /// Persist a new feature order
    ///
    /// `feature_ids` must be a permutation of every existing feature id;
    /// features are renumbered 1..n in that sequence.
    pub fn reorder_features(&self, feature_ids: &[Id]) -> StorageResult<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let existing: HashSet<Id> = {
            let mut stmt = tx.prepare("SELECT id FROM features")?;
            let rows = stmt.query_map([], |row| row.get(0))?;
            rows.collect::<Result<_, _>>()?
        };
        let requested: HashSet<Id> = feature_ids.iter().copied().collect();
        if requested.len() != feature_ids.len() || requested != existing {
            return Err(StorageError::Validation(
                "feature_ids must list every feature exactly once".to_string(),
            ));
        }

        for (idx, id) in feature_ids.iter().enumerate() {
            tx.execute(
                "UPDATE features SET sort_order = ?1 WHERE id = ?2",
                params![idx as i64 + 1, id],
            )?;
        }
        tx.commit()?;

        tracing::debug!(count = feature_ids.len(), "Features reordered");
        Ok(())
    }

    pub fn create_feature_type(&self, new: &NewFeatureType) -> StorageResult<FeatureType> {
        let name = clean_name(&new.name, "feature type name")?;
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        if !feature_exists(&tx, new.feature_id)? {
            return Err(StorageError::NotFound {
                entity: "feature",
                id: new.feature_id,
            });
        }
        ensure_unique_category(&tx, new.feature_id, &name, None)?;
        let id = insert_type(&tx, new.feature_id, &name, new.shade)?;
        let ty = load_type(&tx, id)?;
        tx.commit()?;
        Ok(ty)
    }

    pub fn rename_feature_type(&self, id: Id, name: &str) -> StorageResult<FeatureType> {
        let name = clean_name(name, "feature type name")?;
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let current = load_type(&tx, id)?;
        ensure_unique_category(&tx, current.feature_id, &name, Some(id))?;
        tx.execute(
            "UPDATE feature_types SET name = ?1 WHERE id = ?2",
            params![name, id],
        )?;
        let ty = load_type(&tx, id)?;
        tx.commit()?;
        Ok(ty)
    }

    pub fn delete_feature_type(&self, id: Id) -> StorageResult<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let feature_id: Option<Id> = tx
            .query_row(
                "SELECT feature_id FROM feature_types WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()?;
        let Some(feature_id) = feature_id else {
            return Err(StorageError::NotFound {
                entity: "feature type",
                id,
            });
        };
        tx.execute("DELETE FROM feature_types WHERE id = ?1", params![id])?;
        renumber_types(&tx, feature_id)?;
        tx.commit()?;
        Ok(())
    }

    /// Categories sorted by name
    pub fn list_categories(&self) -> StorageResult<Vec<Category>> {
        let conn = self.conn()?;
        list_categories(&conn)
    }

    /// Create a category (a type under the reserved category feature)
    pub fn create_category(&self, new: &NewCategory) -> StorageResult<Category> {
        let name = clean_name(&new.name, "category name")?;
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let group_id = ensure_category_feature(&tx)?;
        ensure_unique_category(&tx, group_id, &name, None)?;

        let id = insert_type(&tx, group_id, &name, Shade::Middle)?;
        tx.commit()?;
        Ok(Category { id, name })
    }
}

pub(super) fn list_features(conn: &Connection) -> StorageResult<Vec<Feature>> {
    let mut features: Vec<Feature> = {
        let mut stmt =
            conn.prepare("SELECT id, name, color, sort_order FROM features ORDER BY sort_order, id")?;
        let rows = stmt.query_map([], |row| {
            Ok(Feature {
                id: row.get(0)?,
                name: row.get(1)?,
                color: row.get(2)?,
                order: row.get(3)?,
                types: Vec::new(),
            })
        })?;
        rows.collect::<Result<_, _>>()?
    };

    let mut by_feature: HashMap<Id, Vec<FeatureType>> = HashMap::new();
    let sql = format!(
        "SELECT {TYPE_COLUMNS} FROM feature_types t ORDER BY t.feature_id, t.position, t.id"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], |row| type_from_row(row, 0))?;
    for ty in rows {
        let ty = ty?;
        by_feature.entry(ty.feature_id).or_default().push(ty);
    }

    for feature in &mut features {
        feature.types = by_feature.remove(&feature.id).unwrap_or_default();
    }
    Ok(features)
}

pub(super) fn list_categories(conn: &Connection) -> StorageResult<Vec<Category>> {
    let mut stmt = conn.prepare(
        "SELECT t.id, t.name FROM feature_types t
         JOIN features f ON f.id = t.feature_id
         WHERE f.is_category_group = 1
         ORDER BY t.name, t.id",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(Category {
            id: row.get(0)?,
            name: row.get(1)?,
        })
    })?;
    Ok(rows.collect::<Result<_, _>>()?)
}

fn load_feature(conn: &Connection, id: Id) -> StorageResult<Feature> {
    let feature = conn
        .query_row(
            "SELECT id, name, color, sort_order FROM features WHERE id = ?1",
            params![id],
            |row| {
                Ok(Feature {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    color: row.get(2)?,
                    order: row.get(3)?,
                    types: Vec::new(),
                })
            },
        )
        .optional()?
        .ok_or(StorageError::NotFound {
            entity: "feature",
            id,
        })?;

    let sql = format!(
        "SELECT {TYPE_COLUMNS} FROM feature_types t WHERE t.feature_id = ?1 ORDER BY t.position, t.id"
    );
    let mut stmt = conn.prepare(&sql)?;
    let types = stmt
        .query_map(params![id], |row| type_from_row(row, 0))?
        .collect::<Result<_, _>>()?;

    Ok(Feature { types, ..feature })
}

fn load_type(conn: &Connection, id: Id) -> StorageResult<FeatureType> {
    let sql = format!("SELECT {TYPE_COLUMNS} FROM feature_types t WHERE t.id = ?1");
    conn.query_row(&sql, params![id], |row| type_from_row(row, 0))
        .optional()?
        .ok_or(StorageError::NotFound {
            entity: "feature type",
            id,
        })
}

fn feature_exists(conn: &Connection, id: Id) -> StorageResult<bool> {
    let found: Option<Id> = conn
        .query_row("SELECT id FROM features WHERE id = ?1", params![id], |row| {
            row.get(0)
        })
        .optional()?;
    Ok(found.is_some())
}

/// Type names under the category feature are unique; `except` skips the
/// type being renamed
fn ensure_unique_category(
    conn: &Connection,
    feature_id: Id,
    name: &str,
    except: Option<Id>,
) -> StorageResult<()> {
    let is_group: bool = conn
        .query_row(
            "SELECT is_category_group FROM features WHERE id = ?1",
            params![feature_id],
            |row| row.get(0),
        )
        .optional()?
        .unwrap_or(false);
    if !is_group {
        return Ok(());
    }

    let clash: Option<Id> = conn
        .query_row(
            "SELECT id FROM feature_types
             WHERE feature_id = ?1 AND name = ?2 AND id != ?3",
            params![feature_id, name, except.unwrap_or(-1)],
            |row| row.get(0),
        )
        .optional()?;
    match clash {
        Some(_) => Err(StorageError::Conflict("Category already exists".to_string())),
        None => Ok(()),
    }
}

fn insert_feature(conn: &Connection, name: &str, color: &str, category_group: bool) -> StorageResult<Id> {
    conn.execute(
        "INSERT INTO features (name, color, sort_order, is_category_group)
         VALUES (?1, ?2, (SELECT COALESCE(MAX(sort_order), 0) + 1 FROM features), ?3)",
        params![name, color, category_group],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Append a type at the end of its feature
pub(super) fn insert_type(conn: &Connection, feature_id: Id, name: &str, shade: Shade) -> StorageResult<Id> {
    conn.execute(
        "INSERT INTO feature_types (feature_id, name, shade, position)
         VALUES (?1, ?2, ?3,
                 (SELECT COALESCE(MAX(position), 0) + 1 FROM feature_types WHERE feature_id = ?1))",
        params![feature_id, name, shade],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Id of the reserved category feature, created on first use
pub(super) fn ensure_category_feature(conn: &Connection) -> StorageResult<Id> {
    let existing: Option<Id> = conn
        .query_row(
            "SELECT id FROM features WHERE is_category_group = 1 ORDER BY id LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;
    match existing {
        Some(id) => Ok(id),
        None => insert_feature(conn, CATEGORY_FEATURE, CATEGORY_FEATURE_COLOR, true),
    }
}

fn renumber_features(conn: &Connection) -> StorageResult<()> {
    let ids: Vec<Id> = {
        let mut stmt = conn.prepare("SELECT id FROM features ORDER BY sort_order, id")?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        rows.collect::<Result<_, _>>()?
    };
    for (idx, id) in ids.iter().enumerate() {
        conn.execute(
            "UPDATE features SET sort_order = ?1 WHERE id = ?2",
            params![idx as i64 + 1, id],
        )?;
    }
    Ok(())
}

fn renumber_types(conn: &Connection, feature_id: Id) -> StorageResult<()> {
    let ids: Vec<Id> = {
        let mut stmt = conn
            .prepare("SELECT id FROM feature_types WHERE feature_id = ?1 ORDER BY position, id")?;
        let rows = stmt.query_map(params![feature_id], |row| row.get(0))?;
        rows.collect::<Result<_, _>>()?
    };
    for (idx, id) in ids.iter().enumerate() {
        conn.execute(
            "UPDATE feature_types SET position = ?1 WHERE id = ?2",
            params![idx as i64 + 1, id],
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feature(catalog: &Catalog, name: &str) -> Feature {
        catalog
            .create_feature(&NewFeature {
                name: name.into(),
                color: "#336699".into(),
            })
            .unwrap()
    }

    fn ty(catalog: &Catalog, feature_id: Id, name: &str) -> FeatureType {
        catalog
            .create_feature_type(&NewFeatureType {
                feature_id,
                name: name.into(),
                shade: Shade::Light,
            })
            .unwrap()
    }

    #[test]
    fn features_and_types_are_appended_in_order() {
        let catalog = Catalog::open_in_memory().unwrap();
        let a = feature(&catalog, "Eyes");
        let b = feature(&catalog, "Hair");
        assert_eq!((a.order, b.order), (1, 2));

        let blue = ty(&catalog, a.id, "Blue");
        let green = ty(&catalog, a.id, "Green");
        assert_eq!((blue.position, green.position), (1, 2));

        let features = catalog.list_features().unwrap();
        assert_eq!(features.len(), 2);
        let names: Vec<_> = features[0].types.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Blue", "Green"]);
        assert!(features[1].types.is_empty());
    }

    #[test]
    fn reorder_renumbers_persistently() {
        let catalog = Catalog::open_in_memory().unwrap();
        let a = feature(&catalog, "A");
        let b = feature(&catalog, "B");
        let c = feature(&catalog, "C");

        catalog.reorder_features(&[b.id, c.id, a.id]).unwrap();

        let features = catalog.list_features().unwrap();
        let order: Vec<_> = features.iter().map(|f| (f.name.as_str(), f.order)).collect();
        assert_eq!(order, vec![("B", 1), ("C", 2), ("A", 3)]);
    }

    #[test]
    fn reorder_rejects_partial_or_duplicate_lists() {
        let catalog = Catalog::open_in_memory().unwrap();
        let a = feature(&catalog, "A");
        let b = feature(&catalog, "B");

        assert!(matches!(
            catalog.reorder_features(&[a.id]),
            Err(StorageError::Validation(_))
        ));
        assert!(matches!(
            catalog.reorder_features(&[a.id, a.id]),
            Err(StorageError::Validation(_))
        ));
        assert!(matches!(
            catalog.reorder_features(&[a.id, b.id + 100]),
            Err(StorageError::Validation(_))
        ));
    }

    #[test]
    fn rename_trims_and_reports_missing_ids() {
        let catalog = Catalog::open_in_memory().unwrap();
        let a = feature(&catalog, "Eyes");
        let blue = ty(&catalog, a.id, "Blue");

        let renamed = catalog.rename_feature(a.id, "  Eye colour ").unwrap();
        assert_eq!(renamed.name, "Eye colour");
        assert_eq!(renamed.types.len(), 1);

        let renamed = catalog.rename_feature_type(blue.id, "Navy").unwrap();
        assert_eq!(renamed.name, "Navy");

        assert!(matches!(
            catalog.rename_feature(999, "x"),
            Err(StorageError::NotFound { .. })
        ));
        assert!(matches!(
            catalog.rename_feature_type(blue.id, "   "),
            Err(StorageError::Validation(_))
        ));
    }

    #[test]
    fn deleting_closes_gaps() {
        let catalog = Catalog::open_in_memory().unwrap();
        let a = feature(&catalog, "A");
        let b = feature(&catalog, "B");
        let one = ty(&catalog, b.id, "one");
        ty(&catalog, b.id, "two");

        catalog.delete_feature(a.id).unwrap();
        catalog.delete_feature_type(one.id).unwrap();

        let features = catalog.list_features().unwrap();
        assert_eq!(features[0].order, 1);
        assert_eq!(features[0].types[0].name, "two");
        assert_eq!(features[0].types[0].position, 1);

        assert!(matches!(
            catalog.delete_feature_type(one.id),
            Err(StorageError::NotFound { .. })
        ));
    }

    #[test]
    fn invalid_color_is_rejected() {
        let catalog = Catalog::open_in_memory().unwrap();
        let result = catalog.create_feature(&NewFeature {
            name: "Eyes".into(),
            color: "blue".into(),
        });
        assert!(matches!(result, Err(StorageError::Validation(_))));
    }

    #[test]
    fn categories_live_under_the_reserved_feature() {
        let catalog = Catalog::open_in_memory().unwrap();
        let drama = catalog
            .create_category(&NewCategory {
                name: "Drama".into(),
            })
            .unwrap();
        catalog
            .create_category(&NewCategory {
                name: "Comedy".into(),
            })
            .unwrap();

        let duplicate = catalog.create_category(&NewCategory {
            name: "Drama".into(),
        });
        assert!(matches!(duplicate, Err(StorageError::Conflict(msg)) if msg == "Category already exists"));

        let names: Vec<_> = catalog
            .list_categories()
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Comedy", "Drama"]);

        let features = catalog.list_features().unwrap();
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].name, CATEGORY_FEATURE);
        assert!(features[0].find_type(drama.id).is_some());
    }
    #[test]
    fn category_names_stay_unique_through_feature_type_endpoints() {
        let catalog = Catalog::open_in_memory().unwrap();
        let drama = catalog
            .create_category(&NewCategory {
                name: "Drama".into(),
            })
            .unwrap();
        let comedy = catalog
            .create_category(&NewCategory {
                name: "Comedy".into(),
            })
            .unwrap();
        let group_id = catalog.list_features().unwrap()[0].id;

        let renamed = catalog.rename_feature_type(comedy.id, " Drama ");
        assert!(matches!(renamed, Err(StorageError::Conflict(msg)) if msg == "Category already exists"));

        let created = catalog.create_feature_type(&NewFeatureType {
            feature_id: group_id,
            name: "Drama".into(),
            shade: Shade::Dark,
        });
        assert!(matches!(created, Err(StorageError::Conflict(_))));

        // Renaming a category to its own name is not a clash
        assert_eq!(catalog.rename_feature_type(drama.id, "Drama").unwrap().name, "Drama");

        // Ordinary features allow repeated type names
        let genre = feature(&catalog, "Genre");
        ty(&catalog, genre.id, "Drama");
        ty(&catalog, genre.id, "Drama");

        let names: Vec<_> = catalog
            .list_categories()
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Comedy", "Drama"]);
    }
}
