//! Integration tests for delivery reconciliation and the campaign
//! linking guard on events.

use amparo_core::campaign::CreateCampaign;
use amparo_core::event::{CreateEvent, UpdateEvent};
use amparo_core::family::{CreateFamily, FamilyStatus, HistoryKind};
use amparo_core::location::Address;
use amparo_core::types::{Day, RecordId, Timestamp};
use amparo_store::repositories::{CampaignRepo, EventRepo, FamilyRepo, ServiceError};
use amparo_store::{MemStore, OrgContext};
use chrono::{NaiveDate, TimeZone, Utc};

fn ts(y: i32, m: u32, d: u32) -> Timestamp {
    Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
}

fn day(y: i32, m: u32, d: u32) -> Day {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn seed(
    store: &MemStore,
    ctx: &OrgContext,
    registration_review: bool,
) -> (RecordId, RecordId, RecordId) {
    let family = FamilyRepo::create(
        store,
        ctx,
        CreateFamily {
            name: "Silva".to_string(),
            cpf: None,
            nis: None,
            phone: None,
            address: Address::default(),
            pregnant: false,
            pregnancy_due_date: None,
            children: vec![],
            notes: None,
        },
        "operator",
        ts(2025, 1, 1),
    )
    .await
    .unwrap();

    let campaign = CampaignRepo::create(
        store,
        ctx,
        CreateCampaign {
            title: "Basic Basket".to_string(),
            kind: "food".to_string(),
            description: None,
            start_date: day(2025, 1, 1),
            end_date: day(2025, 3, 1),
            items: vec![],
            beneficiary_family_ids: vec![family.id],
            package_ids: vec![],
        },
        day(2025, 1, 1),
    )
    .await
    .unwrap();

    let event = EventRepo::create(
        store,
        ctx,
        CreateEvent {
            title: "March handout".to_string(),
            date: day(2025, 3, 10),
            time: None,
            location_id: None,
            is_delivery_event: true,
            is_registration_review: registration_review,
            linked_campaign_ids: vec![campaign.id],
            notes: None,
        },
    )
    .await
    .unwrap();

    (event.id, family.id, campaign.id)
}

#[tokio::test]
async fn confirming_twice_records_family_once_on_event() {
    let store = MemStore::new();
    let ctx = OrgContext::new("org");
    let (event_id, family_id, campaign_id) = seed(&store, &ctx, false).await;

    EventRepo::confirm_delivery(&store, &ctx, event_id, family_id, campaign_id, "operator", ts(2025, 3, 10))
        .await
        .unwrap();
    let event = EventRepo::confirm_delivery(&store, &ctx, event_id, family_id, campaign_id, "operator", ts(2025, 3, 10))
        .await
        .unwrap();

    let delivered = event
        .delivered_family_ids
        .iter()
        .filter(|id| **id == family_id)
        .count();
    assert_eq!(delivered, 1);
}

#[tokio::test]
async fn delivery_is_logged_in_family_history() {
    let store = MemStore::new();
    let ctx = OrgContext::new("org");
    let (event_id, family_id, campaign_id) = seed(&store, &ctx, false).await;

    EventRepo::confirm_delivery(&store, &ctx, event_id, family_id, campaign_id, "operator", ts(2025, 3, 10))
        .await
        .unwrap();

    let family = FamilyRepo::get(&store, &ctx, family_id).await.unwrap().unwrap();
    assert_eq!(family.history[0].kind, HistoryKind::Delivery);
    assert!(family.history[0].description.contains("Basic Basket"));
    assert!(family.history[0].description.contains("March handout"));
    // A plain delivery event does not renew the registration.
    assert_eq!(family.last_review_date, None);
}

#[tokio::test]
async fn review_event_renews_and_reactivates() {
    let store = MemStore::new();
    let ctx = OrgContext::new("org");
    let (event_id, family_id, campaign_id) = seed(&store, &ctx, true).await;

    // Suspend the family first by aging it out.
    FamilyRepo::list(&store, &ctx, ts(2026, 1, 2)).await.unwrap();
    let family = FamilyRepo::get(&store, &ctx, family_id).await.unwrap().unwrap();
    assert_eq!(family.status, FamilyStatus::Suspended);

    EventRepo::confirm_delivery(&store, &ctx, event_id, family_id, campaign_id, "operator", ts(2026, 2, 1))
        .await
        .unwrap();

    let family = FamilyRepo::get(&store, &ctx, family_id).await.unwrap().unwrap();
    assert_eq!(family.status, FamilyStatus::Active);
    assert_eq!(family.last_review_date, Some(ts(2026, 2, 1)));
    // Reactivation lands ahead of the delivery entry.
    assert_eq!(family.history[0].kind, HistoryKind::Reactivation);
    assert_eq!(family.history[1].kind, HistoryKind::Delivery);
}

#[tokio::test]
async fn confirming_for_unknown_family_is_a_not_found() {
    let store = MemStore::new();
    let ctx = OrgContext::new("org");
    let (event_id, _, campaign_id) = seed(&store, &ctx, false).await;

    let result = EventRepo::confirm_delivery(
        &store,
        &ctx,
        event_id,
        RecordId::new_v4(),
        campaign_id,
        "operator",
        ts(2025, 3, 10),
    )
    .await;
    assert!(matches!(result, Err(ServiceError::Core(_))));
}

#[tokio::test]
async fn linking_requires_active_campaign_ending_by_event_day() {
    let store = MemStore::new();
    let ctx = OrgContext::new("org");

    let late = CampaignRepo::create(
        &store,
        &ctx,
        CreateCampaign {
            title: "Still collecting".to_string(),
            kind: "food".to_string(),
            description: None,
            start_date: day(2025, 1, 1),
            end_date: day(2025, 6, 1),
            items: vec![],
            beneficiary_family_ids: vec![],
            package_ids: vec![],
        },
        day(2025, 1, 1),
    )
    .await
    .unwrap();

    let result = EventRepo::create(
        &store,
        &ctx,
        CreateEvent {
            title: "Early handout".to_string(),
            date: day(2025, 3, 10),
            time: None,
            location_id: None,
            is_delivery_event: true,
            is_registration_review: false,
            linked_campaign_ids: vec![late.id],
            notes: None,
        },
    )
    .await;
    assert!(matches!(result, Err(ServiceError::Core(_))));
}

#[tokio::test]
async fn stale_link_survives_an_edit_so_it_can_be_removed() {
    let store = MemStore::new();
    let ctx = OrgContext::new("org");
    let (event_id, _, campaign_id) = seed(&store, &ctx, false).await;

    // The linked campaign goes inactive after its window closes.
    CampaignRepo::list(&store, &ctx, day(2025, 4, 1)).await.unwrap();

    // Keeping the stale link in an edit is fine.
    let kept = EventRepo::update(
        &store,
        &ctx,
        event_id,
        UpdateEvent {
            title: Some("March handout (moved)".to_string()),
            date: None,
            time: None,
            location_id: None,
            is_delivery_event: None,
            is_registration_review: None,
            status: None,
            linked_campaign_ids: Some(vec![campaign_id]),
            notes: None,
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(kept.linked_campaign_ids, vec![campaign_id]);

    // And unlinking it works.
    let unlinked = EventRepo::update(
        &store,
        &ctx,
        event_id,
        UpdateEvent {
            title: None,
            date: None,
            time: None,
            location_id: None,
            is_delivery_event: None,
            is_registration_review: None,
            status: None,
            linked_campaign_ids: Some(vec![]),
            notes: None,
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert!(unlinked.linked_campaign_ids.is_empty());
}
