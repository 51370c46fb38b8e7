// Movies with their actor and feature-type links

use super::features::{type_from_row, TYPE_COLUMNS};
use super::{clean_name, now_rfc3339, Catalog, StorageError, StorageResult};
use crate::model::{ActorRef, FeatureType, Id, Movie, NewMovie};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;

impl Catalog {
    /// All movies, newest first
    pub fn list_movies(&self) -> StorageResult<Vec<Movie>> {
        let conn = self.conn()?;
        list_movies(&conn)
    }

    pub fn create_movie(&self, new: &NewMovie) -> StorageResult<Movie> {
        let code = clean_name(&new.code, "movie code")?;
        let name = clean_name(&new.name, "movie name")?;
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT INTO movies (code, name, created_at) VALUES (?1, ?2, ?3)",
            params![code, name, now_rfc3339()],
        )?;
        let id = tx.last_insert_rowid();

        for actor_id in &new.actor_ids {
            tx.execute(
                "INSERT OR IGNORE INTO movie_actors (movie_id, actor_id)
                 SELECT ?1, id FROM actors WHERE id = ?2",
                params![id, actor_id],
            )?;
        }
        for type_id in &new.feature_type_ids {
            tx.execute(
                "INSERT OR IGNORE INTO movie_feature_types (movie_id, feature_type_id)
                 SELECT ?1, id FROM feature_types WHERE id = ?2",
                params![id, type_id],
            )?;
        }

        let movie = load_movie(&tx, id)?;
        tx.commit()?;

        tracing::debug!(
            movie_id = id,
            code = %movie.code,
            actors = movie.actors.len(),
            "Movie created"
        );
        Ok(movie)
    }

    pub fn delete_movie(&self, id: Id) -> StorageResult<()> {
        let conn = self.conn()?;
        let changed = conn.execute("DELETE FROM movies WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(StorageError::NotFound { entity: "movie", id });
        }
        Ok(())
    }
}

fn list_movies(conn: &Connection) -> StorageResult<Vec<Movie>> {
    let mut movies: Vec<Movie> = {
        let mut stmt = conn.prepare(
            "SELECT id, code, name, created_at FROM movies ORDER BY created_at DESC, id DESC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(Movie {
                id: row.get(0)?,
                code: row.get(1)?,
                name: row.get(2)?,
                created_at: row.get(3)?,
                actors: Vec::new(),
                feature_types: Vec::new(),
            })
        })?;
        rows.collect::<Result<_, _>>()?
    };

    let mut actors = movie_actor_links(conn, None)?;
    let mut types = movie_type_links(conn, None)?;
    for movie in &mut movies {
        movie.actors = actors.remove(&movie.id).unwrap_or_default();
        movie.feature_types = types.remove(&movie.id).unwrap_or_default();
    }
    Ok(movies)
}

fn load_movie(conn: &Connection, id: Id) -> StorageResult<Movie> {
    let movie = conn
        .query_row(
            "SELECT id, code, name, created_at FROM movies WHERE id = ?1",
            params![id],
            |row| {
                Ok(Movie {
                    id: row.get(0)?,
                    code: row.get(1)?,
                    name: row.get(2)?,
                    created_at: row.get(3)?,
                    actors: Vec::new(),
                    feature_types: Vec::new(),
                })
            },
        )
        .optional()?
        .ok_or(StorageError::NotFound { entity: "movie", id })?;

    Ok(Movie {
        actors: movie_actor_links(conn, Some(id))?.remove(&id).unwrap_or_default(),
        feature_types: movie_type_links(conn, Some(id))?.remove(&id).unwrap_or_default(),
        ..movie
    })
}

fn movie_actor_links(
    conn: &Connection,
    movie_id: Option<Id>,
) -> StorageResult<HashMap<Id, Vec<ActorRef>>> {
    let mut stmt = conn.prepare(
        "SELECT l.movie_id, a.id, a.name
         FROM movie_actors l
         JOIN actors a ON a.id = l.actor_id
         WHERE ?1 IS NULL OR l.movie_id = ?1
         ORDER BY a.name, a.id",
    )?;
    let rows = stmt.query_map(params![movie_id], |row| {
        Ok((
            row.get::<_, Id>(0)?,
            ActorRef {
                id: row.get(1)?,
                name: row.get(2)?,
            },
        ))
    })?;

    let mut links: HashMap<Id, Vec<ActorRef>> = HashMap::new();
    for row in rows {
        let (movie, actor) = row?;
        links.entry(movie).or_default().push(actor);
    }
    Ok(links)
}

fn movie_type_links(
    conn: &Connection,
    movie_id: Option<Id>,
) -> StorageResult<HashMap<Id, Vec<FeatureType>>> {
    let sql = format!(
        "SELECT l.movie_id, {TYPE_COLUMNS}
         FROM movie_feature_types l
         JOIN feature_types t ON t.id = l.feature_type_id
         JOIN features f ON f.id = t.feature_id
         WHERE ?1 IS NULL OR l.movie_id = ?1
         ORDER BY f.sort_order, t.position, t.id"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![movie_id], |row| {
        Ok((row.get::<_, Id>(0)?, type_from_row(row, 1)?))
    })?;

    let mut links: HashMap<Id, Vec<FeatureType>> = HashMap::new();
    for row in rows {
        let (movie, ty) = row?;
        links.entry(movie).or_default().push(ty);
    }
    Ok(links)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NewActor, NewFeature, NewFeatureType, Shade};

    fn seed(catalog: &Catalog) -> (Id, Id) {
        let actor = catalog
            .create_actor(&NewActor {
                name: "Ada".into(),
                ..Default::default()
            })
            .unwrap();
        let feature = catalog
            .create_feature(&NewFeature {
                name: "Genre".into(),
                color: "#aa3300".into(),
            })
            .unwrap();
        let ty = catalog
            .create_feature_type(&NewFeatureType {
                feature_id: feature.id,
                name: "Noir".into(),
                shade: Shade::Dark,
            })
            .unwrap();
        (actor.id, ty.id)
    }

    #[test]
    fn create_movie_with_links() {
        let catalog = Catalog::open_in_memory().unwrap();
        let (actor_id, type_id) = seed(&catalog);

        let movie = catalog
            .create_movie(&NewMovie {
                code: " M-001 ".into(),
                name: "The Third Man".into(),
                actor_ids: vec![actor_id, 999],
                feature_type_ids: vec![type_id],
            })
            .unwrap();

        assert_eq!(movie.code, "M-001");
        assert_eq!(
            movie.actors,
            vec![ActorRef {
                id: actor_id,
                name: "Ada".into()
            }]
        );
        assert_eq!(movie.feature_types.len(), 1);
        assert_eq!(catalog.list_movies().unwrap(), vec![movie]);
    }

    #[test]
    fn movie_requires_code_and_name() {
        let catalog = Catalog::open_in_memory().unwrap();
        let missing_code = catalog.create_movie(&NewMovie {
            code: "  ".into(),
            name: "Untitled".into(),
            ..Default::default()
        });
        assert!(matches!(missing_code, Err(StorageError::Validation(_))));
    }

    #[test]
    fn deleting_an_actor_unlinks_it_from_movies() {
        let catalog = Catalog::open_in_memory().unwrap();
        let (actor_id, _) = seed(&catalog);
        let movie = catalog
            .create_movie(&NewMovie {
                code: "M-2".into(),
                name: "Rope".into(),
                actor_ids: vec![actor_id],
                feature_type_ids: vec![],
            })
            .unwrap();
        assert_eq!(movie.actors.len(), 1);

        catalog.delete_actor(actor_id).unwrap();
        let movies = catalog.list_movies().unwrap();
        assert!(movies[0].actors.is_empty());

        catalog.delete_movie(movie.id).unwrap();
        assert!(catalog.list_movies().unwrap().is_empty());
        assert!(matches!(
            catalog.delete_movie(movie.id),
            Err(StorageError::NotFound { entity: "movie", .. })
        ));
    }
}
