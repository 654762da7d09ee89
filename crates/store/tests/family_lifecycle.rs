//! Integration tests for the family lifecycle rules:
//! registration-expiration sweep on fetch, campaign cascade, renewal.

use amparo_core::campaign::{CampaignItemInput, CreateCampaign};
use amparo_core::family::{CreateFamily, Family, FamilyStatus, HistoryKind};
use amparo_core::location::Address;
use amparo_core::settings::OrganizationSettings;
use amparo_core::types::Timestamp;
use amparo_store::repositories::{CampaignRepo, FamilyRepo, SettingsRepo};
use amparo_store::{MemStore, OrgContext};
use chrono::{NaiveDate, TimeZone, Utc};

fn ts(y: i32, m: u32, d: u32) -> Timestamp {
    Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
}

fn create_input(name: &str) -> CreateFamily {
    CreateFamily {
        name: name.to_string(),
        cpf: None,
        nis: None,
        phone: None,
        address: Address::default(),
        pregnant: false,
        pregnancy_due_date: None,
        children: vec![],
        notes: None,
    }
}

async fn seed_family(
    store: &MemStore,
    ctx: &OrgContext,
    name: &str,
    registered: Timestamp,
) -> Family {
    FamilyRepo::create(store, ctx, create_input(name), "operator", registered)
        .await
        .unwrap()
}

#[tokio::test]
async fn family_expires_after_validity_window() {
    let store = MemStore::new();
    let ctx = OrgContext::new("org");
    let family = seed_family(&store, &ctx, "Silva", ts(2024, 1, 1)).await;

    // One day past registration + 12 months: suspended on fetch.
    let listed = FamilyRepo::list(&store, &ctx, ts(2025, 1, 2)).await.unwrap();
    assert_eq!(listed[0].status, FamilyStatus::Suspended);
    assert_eq!(listed[0].history[0].kind, HistoryKind::Suspension);
    assert_eq!(listed[0].history[0].author, "System");

    // The suspension was persisted, not just computed.
    let stored = FamilyRepo::get(&store, &ctx, family.id).await.unwrap().unwrap();
    assert_eq!(stored.status, FamilyStatus::Suspended);
}

#[tokio::test]
async fn family_within_window_stays_active() {
    let store = MemStore::new();
    let ctx = OrgContext::new("org");
    seed_family(&store, &ctx, "Silva", ts(2024, 1, 1)).await;

    let listed = FamilyRepo::list(&store, &ctx, ts(2024, 12, 31)).await.unwrap();
    assert_eq!(listed[0].status, FamilyStatus::Active);
}

#[tokio::test]
async fn sweep_is_idempotent_across_fetches() {
    let store = MemStore::new();
    let ctx = OrgContext::new("org");
    seed_family(&store, &ctx, "Silva", ts(2024, 1, 1)).await;

    FamilyRepo::list(&store, &ctx, ts(2025, 1, 2)).await.unwrap();
    let listed = FamilyRepo::list(&store, &ctx, ts(2025, 2, 1)).await.unwrap();

    let suspensions = listed[0]
        .history
        .iter()
        .filter(|e| e.kind == HistoryKind::Suspension)
        .count();
    assert_eq!(suspensions, 1);
}

#[tokio::test]
async fn configured_validity_window_is_honored() {
    let store = MemStore::new();
    let ctx = OrgContext::new("org");
    let settings = OrganizationSettings {
        organization_name: "Amparo".to_string(),
        validity_months: 6,
        visit_interval_months: 3,
    };
    SettingsRepo::save(&store, &ctx, &settings).await.unwrap();
    seed_family(&store, &ctx, "Silva", ts(2024, 1, 1)).await;

    let listed = FamilyRepo::list(&store, &ctx, ts(2024, 7, 2)).await.unwrap();
    assert_eq!(listed[0].status, FamilyStatus::Suspended);
}

#[tokio::test]
async fn suspension_cascades_to_campaign_beneficiaries() {
    let store = MemStore::new();
    let ctx = OrgContext::new("org");
    let family = seed_family(&store, &ctx, "Silva", ts(2024, 1, 1)).await;

    let campaign = CampaignRepo::create(
        &store,
        &ctx,
        CreateCampaign {
            title: "Food drive".to_string(),
            kind: "food".to_string(),
            description: None,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            items: vec![CampaignItemInput {
                id: None,
                name: "Rice".to_string(),
                unit: "kg".to_string(),
                target_quantity: 10.0,
                collected_quantity: 2.0,
            }],
            beneficiary_family_ids: vec![family.id],
            package_ids: vec![],
        },
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
    )
    .await
    .unwrap();

    FamilyRepo::list(&store, &ctx, ts(2025, 1, 2)).await.unwrap();

    let updated = CampaignRepo::get(&store, &ctx, campaign.id).await.unwrap().unwrap();
    assert!(updated.beneficiary_family_ids.is_empty());
    // Item targets are intentionally left as last computed.
    assert_eq!(updated.items[0].target_quantity, 10.0);
    assert_eq!(updated.items[0].collected_quantity, 2.0);
}

#[tokio::test]
async fn renew_reactivates_suspended_family() {
    let store = MemStore::new();
    let ctx = OrgContext::new("org");
    let family = seed_family(&store, &ctx, "Silva", ts(2024, 1, 1)).await;

    FamilyRepo::list(&store, &ctx, ts(2025, 1, 2)).await.unwrap();

    let renewed = FamilyRepo::renew(&store, &ctx, family.id, "operator", ts(2025, 2, 1))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(renewed.status, FamilyStatus::Active);
    assert_eq!(renewed.last_review_date, Some(ts(2025, 2, 1)));
    assert_eq!(renewed.history[0].kind, HistoryKind::Reactivation);

    // Renewed family survives the next sweep.
    let listed = FamilyRepo::list(&store, &ctx, ts(2025, 6, 1)).await.unwrap();
    assert_eq!(listed[0].status, FamilyStatus::Active);
}

#[tokio::test]
async fn deleting_a_family_scrubs_campaign_references() {
    let store = MemStore::new();
    let ctx = OrgContext::new("org");
    let family = seed_family(&store, &ctx, "Silva", ts(2024, 1, 1)).await;

    let campaign = CampaignRepo::create(
        &store,
        &ctx,
        CreateCampaign {
            title: "Drive".to_string(),
            kind: "food".to_string(),
            description: None,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            items: vec![],
            beneficiary_family_ids: vec![family.id],
            package_ids: vec![],
        },
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
    )
    .await
    .unwrap();

    assert!(FamilyRepo::delete(&store, &ctx, family.id).await.unwrap());
    assert!(FamilyRepo::get(&store, &ctx, family.id).await.unwrap().is_none());

    let updated = CampaignRepo::get(&store, &ctx, campaign.id).await.unwrap().unwrap();
    assert!(updated.beneficiary_family_ids.is_empty());

    // Deleting again reports absence.
    assert!(!FamilyRepo::delete(&store, &ctx, family.id).await.unwrap());
}

#[tokio::test]
async fn list_is_sorted_by_name() {
    let store = MemStore::new();
    let ctx = OrgContext::new("org");
    seed_family(&store, &ctx, "Oliveira", ts(2024, 1, 1)).await;
    seed_family(&store, &ctx, "Almeida", ts(2024, 1, 1)).await;

    let listed = FamilyRepo::list(&store, &ctx, ts(2024, 6, 1)).await.unwrap();
    assert_eq!(listed[0].name, "Almeida");
    assert_eq!(listed[1].name, "Oliveira");
}
