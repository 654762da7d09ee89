//! Repository for the `packages` collection.

use amparo_core::campaign::Campaign;
use amparo_core::package::{CreatePackage, Package, UpdatePackage};
use amparo_core::types::RecordId;

use crate::repositories::{decode_all, decode_opt, encode};
use crate::session::OrgContext;
use crate::store::{Collection, RecordStore, StoreError};

pub struct PackageRepo;

impl PackageRepo {
    /// Fetch all packages, sorted by name.
    pub async fn list(
        store: &dyn RecordStore,
        ctx: &OrgContext,
    ) -> Result<Vec<Package>, StoreError> {
        let mut packages: Vec<Package> =
            decode_all(store.list(ctx, Collection::Packages).await?)?;
        packages.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(packages)
    }

    pub async fn get(
        store: &dyn RecordStore,
        ctx: &OrgContext,
        id: RecordId,
    ) -> Result<Option<Package>, StoreError> {
        decode_opt(store.get(ctx, Collection::Packages, &id.to_string()).await?)
    }

    pub async fn create(
        store: &dyn RecordStore,
        ctx: &OrgContext,
        input: CreatePackage,
    ) -> Result<Package, StoreError> {
        let package = Package::create(input);
        Self::save(store, ctx, &package).await?;
        Ok(package)
    }

    pub async fn update(
        store: &dyn RecordStore,
        ctx: &OrgContext,
        id: RecordId,
        input: UpdatePackage,
    ) -> Result<Option<Package>, StoreError> {
        let Some(mut package) = Self::get(store, ctx, id).await? else {
            return Ok(None);
        };
        package.apply_update(input);
        Self::save(store, ctx, &package).await?;
        Ok(Some(package))
    }

    /// Delete a package and drop it from campaign selections.
    ///
    /// Item lists already derived from the package are left as last
    /// computed.
    pub async fn delete(
        store: &dyn RecordStore,
        ctx: &OrgContext,
        id: RecordId,
    ) -> Result<bool, StoreError> {
        if Self::get(store, ctx, id).await?.is_none() {
            return Ok(false);
        }
        store
            .delete(ctx, Collection::Packages, &id.to_string())
            .await?;

        let mut campaigns: Vec<Campaign> =
            decode_all(store.list(ctx, Collection::Campaigns).await?)?;
        for campaign in campaigns.iter_mut() {
            let before = campaign.package_ids.len();
            campaign.package_ids.retain(|selected| *selected != id);
            if campaign.package_ids.len() != before {
                store
                    .put(
                        ctx,
                        Collection::Campaigns,
                        &campaign.id.to_string(),
                        encode(campaign)?,
                    )
                    .await?;
            }
        }
        Ok(true)
    }

    async fn save(
        store: &dyn RecordStore,
        ctx: &OrgContext,
        package: &Package,
    ) -> Result<(), StoreError> {
        store
            .put(
                ctx,
                Collection::Packages,
                &package.id.to_string(),
                encode(package)?,
            )
            .await
    }
}
