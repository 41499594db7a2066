use crate::entities::{location, prelude::*};
use anyhow::Result;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set};
use tracing::info;

/// Repository for geocoded location rows. Lookup is exact-match on the
/// raw search string; rows are never updated and never expire.
pub struct LocationRepository {
    conn: DatabaseConnection,
}

impl LocationRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn find_by_query(&self, search_query: &str) -> Result<Option<location::Model>> {
        let row = Location::find()
            .filter(location::Column::SearchQuery.eq(search_query))
            .one(&self.conn)
            .await?;

        Ok(row)
    }

    /// Conflict-safe insert. When a concurrent request already saved the
    /// same query, the insert is ignored and the winning row is re-fetched
    /// so the caller always gets the store-assigned id.
    pub async fn save(&self, new: NewLocation) -> Result<location::Model> {
        let active_model = location::ActiveModel {
            search_query: Set(new.search_query.clone()),
            formatted_query: Set(new.formatted_query),
            latitude: Set(new.latitude),
            longitude: Set(new.longitude),
            ..Default::default()
        };

        let insert = Location::insert(active_model)
            .on_conflict(
                OnConflict::column(location::Column::SearchQuery)
                    .do_nothing()
                    .to_owned(),
            )
            .exec(&self.conn)
            .await;

        match insert {
            Ok(res) => {
                info!("Saved location {} for {:?}", res.last_insert_id, new.search_query);
                Location::find_by_id(res.last_insert_id)
                    .one(&self.conn)
                    .await?
                    .ok_or_else(|| {
                        anyhow::anyhow!("location {} missing after insert", res.last_insert_id)
                    })
            }
            Err(DbErr::RecordNotInserted) => self
                .find_by_query(&new.search_query)
                .await?
                .ok_or_else(|| {
                    anyhow::anyhow!(
                        "location {:?} missing after conflicting insert",
                        new.search_query
                    )
                }),
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewLocation {
    pub search_query: String,
    pub formatted_query: String,
    pub latitude: f64,
    pub longitude: f64,
}
