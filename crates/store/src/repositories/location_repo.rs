//! Repository for the `locations` collection.

use amparo_core::location::{CreateLocation, OrganizationLocation, UpdateLocation};
use amparo_core::types::RecordId;

use crate::repositories::{decode_all, decode_opt, encode};
use crate::session::OrgContext;
use crate::store::{Collection, RecordStore, StoreError};

pub struct LocationRepo;

impl LocationRepo {
    /// Fetch all locations, sorted by name.
    pub async fn list(
        store: &dyn RecordStore,
        ctx: &OrgContext,
    ) -> Result<Vec<OrganizationLocation>, StoreError> {
        let mut locations: Vec<OrganizationLocation> =
            decode_all(store.list(ctx, Collection::Locations).await?)?;
        locations.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(locations)
    }

    pub async fn get(
        store: &dyn RecordStore,
        ctx: &OrgContext,
        id: RecordId,
    ) -> Result<Option<OrganizationLocation>, StoreError> {
        decode_opt(store.get(ctx, Collection::Locations, &id.to_string()).await?)
    }

    pub async fn create(
        store: &dyn RecordStore,
        ctx: &OrgContext,
        input: CreateLocation,
    ) -> Result<OrganizationLocation, StoreError> {
        let location = OrganizationLocation::create(input);
        Self::save(store, ctx, &location).await?;
        Ok(location)
    }

    pub async fn update(
        store: &dyn RecordStore,
        ctx: &OrgContext,
        id: RecordId,
        input: UpdateLocation,
    ) -> Result<Option<OrganizationLocation>, StoreError> {
        let Some(mut location) = Self::get(store, ctx, id).await? else {
            return Ok(None);
        };
        location.apply_update(input);
        Self::save(store, ctx, &location).await?;
        Ok(Some(location))
    }

    pub async fn delete(
        store: &dyn RecordStore,
        ctx: &OrgContext,
        id: RecordId,
    ) -> Result<bool, StoreError> {
        if Self::get(store, ctx, id).await?.is_none() {
            return Ok(false);
        }
        store
            .delete(ctx, Collection::Locations, &id.to_string())
            .await?;
        Ok(true)
    }

    async fn save(
        store: &dyn RecordStore,
        ctx: &OrgContext,
        location: &OrganizationLocation,
    ) -> Result<(), StoreError> {
        store
            .put(
                ctx,
                Collection::Locations,
                &location.id.to_string(),
                encode(location)?,
            )
            .await
    }
}
