//! Integration tests for event ingestion and aggregation against a real database

use chrono::{Duration, TimeZone, Utc};
use datapulse_analytics::services::{generate_insights, AnalyticsError, AnalyticsService};
use datapulse_analytics::types::{AnalyticsQuery, EventPayload, GroupBy, QueryBucket};
use datapulse_auth::auth_service::AuthService;
use datapulse_database::test_utils::TestDatabase;
use sea_orm::{ActiveModelTrait, Set};

async fn create_org(test_db: &TestDatabase, name: &str) -> anyhow::Result<i32> {
    let org = datapulse_entities::organizations::ActiveModel {
        name: Set(name.to_string()),
        ..Default::default()
    }
    .insert(test_db.connection())
    .await?;
    Ok(org.id)
}

fn event(name: &str) -> EventPayload {
    EventPayload {
        name: name.to_string(),
        properties: None,
        user_id: None,
        session_id: None,
        timestamp: None,
    }
}

fn event_at(name: &str, timestamp: chrono::DateTime<Utc>) -> EventPayload {
    EventPayload {
        name: name.to_string(),
        properties: None,
        user_id: None,
        session_id: None,
        timestamp: Some(timestamp.into()),
    }
}

#[tokio::test]
async fn test_ingest_applies_defaults() -> anyhow::Result<()> {
    let test_db = TestDatabase::with_migrations().await?;
    let service = AnalyticsService::new(test_db.connection_arc());
    let org_id = create_org(&test_db, "acme").await?;

    let count = service.ingest_batch(org_id, vec![event("page_view")]).await?;
    assert_eq!(count, 1);

    let rows = test_db
        .query_sql("SELECT properties::text as props, timestamp FROM events")
        .await?;
    assert_eq!(rows.len(), 1);

    // Missing properties default to an empty object
    let props: String = rows[0].try_get("", "props")?;
    assert_eq!(props, "{}");

    Ok(())
}

#[tokio::test]
async fn test_ingest_rolls_back_whole_batch_on_failure() -> anyhow::Result<()> {
    let test_db = TestDatabase::with_migrations().await?;
    let service = AnalyticsService::new(test_db.connection_arc());

    // No organization with this id exists, so the insert violates the
    // foreign key and the transaction must roll back entirely.
    let result = service
        .ingest_batch(999_999, vec![event("a"), event("b"), event("c")])
        .await;
    assert!(matches!(result, Err(AnalyticsError::Database(_))));

    let rows = test_db.query_sql("SELECT id FROM events").await?;
    assert!(rows.is_empty(), "failed batch must not leave partial rows");

    Ok(())
}

#[tokio::test]
async fn test_query_by_name_orders_by_count_then_name() -> anyhow::Result<()> {
    let test_db = TestDatabase::with_migrations().await?;
    let service = AnalyticsService::new(test_db.connection_arc());
    let org_id = create_org(&test_db, "acme").await?;

    let batch = vec![
        event("signup"),
        event("page_view"),
        event("page_view"),
        event("page_view"),
        // "click" and "signup" tie at 1, so they sort by name ascending
        event("click"),
    ];
    service.ingest_batch(org_id, batch).await?;

    let data = service.query(org_id, AnalyticsQuery::default()).await?;

    let names: Vec<(String, i64)> = data
        .into_iter()
        .map(|bucket| match bucket {
            QueryBucket::Name(b) => (b.name, b.count),
            QueryBucket::Time(_) => panic!("expected name buckets"),
        })
        .collect();

    assert_eq!(
        names,
        vec![
            ("page_view".to_string(), 3),
            ("click".to_string(), 1),
            ("signup".to_string(), 1),
        ]
    );

    Ok(())
}

#[tokio::test]
async fn test_query_is_scoped_to_organization() -> anyhow::Result<()> {
    let test_db = TestDatabase::with_migrations().await?;
    let service = AnalyticsService::new(test_db.connection_arc());
    let org_a = create_org(&test_db, "org-a").await?;
    let org_b = create_org(&test_db, "org-b").await?;

    service.ingest_batch(org_a, vec![event("a_only")]).await?;
    service
        .ingest_batch(org_b, vec![event("b_only"), event("b_only")])
        .await?;

    let data = service.query(org_a, AnalyticsQuery::default()).await?;
    assert_eq!(data.len(), 1);
    match &data[0] {
        QueryBucket::Name(b) => {
            assert_eq!(b.name, "a_only");
            assert_eq!(b.count, 1);
        }
        QueryBucket::Time(_) => panic!("expected name bucket"),
    }

    Ok(())
}

#[tokio::test]
async fn test_query_grouped_by_day_is_chronological() -> anyhow::Result<()> {
    let test_db = TestDatabase::with_migrations().await?;
    let service = AnalyticsService::new(test_db.connection_arc());
    let org_id = create_org(&test_db, "acme").await?;

    let jan_16 = Utc.with_ymd_and_hms(2024, 1, 16, 9, 0, 0).unwrap();
    let jan_14 = Utc.with_ymd_and_hms(2024, 1, 14, 23, 30, 0).unwrap();
    let jan_14_later = Utc.with_ymd_and_hms(2024, 1, 14, 23, 45, 0).unwrap();

    service
        .ingest_batch(
            org_id,
            vec![
                event_at("page_view", jan_16),
                event_at("page_view", jan_14),
                event_at("page_view", jan_14_later),
            ],
        )
        .await?;

    let data = service
        .query(
            org_id,
            AnalyticsQuery {
                group_by: Some(GroupBy::Day),
                ..Default::default()
            },
        )
        .await?;

    let buckets: Vec<(String, i64)> = data
        .into_iter()
        .map(|bucket| match bucket {
            QueryBucket::Time(b) => (b.date, b.count),
            QueryBucket::Name(_) => panic!("expected time buckets"),
        })
        .collect();

    assert_eq!(
        buckets,
        vec![
            ("2024-01-14".to_string(), 2),
            ("2024-01-16".to_string(), 1),
        ]
    );

    Ok(())
}

#[tokio::test]
async fn test_query_grouped_by_hour_formats_bucket_labels() -> anyhow::Result<()> {
    let test_db = TestDatabase::with_migrations().await?;
    let service = AnalyticsService::new(test_db.connection_arc());
    let org_id = create_org(&test_db, "acme").await?;

    let morning = Utc.with_ymd_and_hms(2024, 1, 15, 9, 12, 0).unwrap();
    let same_hour = Utc.with_ymd_and_hms(2024, 1, 15, 9, 48, 0).unwrap();

    service
        .ingest_batch(
            org_id,
            vec![event_at("click", morning), event_at("click", same_hour)],
        )
        .await?;

    let data = service
        .query(
            org_id,
            AnalyticsQuery {
                group_by: Some(GroupBy::Hour),
                ..Default::default()
            },
        )
        .await?;

    assert_eq!(data.len(), 1);
    match &data[0] {
        QueryBucket::Time(b) => {
            assert_eq!(b.date, "2024-01-15 09:00");
            assert_eq!(b.count, 2);
        }
        QueryBucket::Name(_) => panic!("expected time bucket"),
    }

    Ok(())
}

#[tokio::test]
async fn test_query_filters_by_name_and_date_range() -> anyhow::Result<()> {
    let test_db = TestDatabase::with_migrations().await?;
    let service = AnalyticsService::new(test_db.connection_arc());
    let org_id = create_org(&test_db, "acme").await?;

    let inside = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
    let before = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
    let after = Utc.with_ymd_and_hms(2024, 2, 15, 12, 0, 0).unwrap();

    service
        .ingest_batch(
            org_id,
            vec![
                event_at("purchase", inside),
                event_at("purchase", before),
                event_at("purchase", after),
                event_at("page_view", inside),
            ],
        )
        .await?;

    let data = service
        .query(
            org_id,
            AnalyticsQuery {
                event_name: Some("purchase".to_string()),
                start_date: Some(Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap().into()),
                end_date: Some(Utc.with_ymd_and_hms(2024, 1, 20, 0, 0, 0).unwrap().into()),
                group_by: None,
            },
        )
        .await?;

    assert_eq!(data.len(), 1);
    match &data[0] {
        QueryBucket::Name(b) => {
            assert_eq!(b.name, "purchase");
            assert_eq!(b.count, 1);
        }
        QueryBucket::Time(_) => panic!("expected name bucket"),
    }

    Ok(())
}

#[tokio::test]
async fn test_top_events_limited_to_five() -> anyhow::Result<()> {
    let test_db = TestDatabase::with_migrations().await?;
    let service = AnalyticsService::new(test_db.connection_arc());
    let org_id = create_org(&test_db, "acme").await?;

    let mut batch = Vec::new();
    for i in 0..7 {
        // event_0 once, event_1 twice, ... event_6 seven times
        for _ in 0..=i {
            batch.push(event(&format!("event_{}", i)));
        }
    }
    service.ingest_batch(org_id, batch).await?;

    let top = service.top_events(org_id).await?;

    assert_eq!(top.len(), 5);
    assert_eq!(top[0].name, "event_6");
    assert_eq!(top[0].count, 7);
    assert_eq!(top[4].name, "event_2");
    assert_eq!(top[4].count, 3);

    Ok(())
}

#[tokio::test]
async fn test_account_flow_from_signup_to_insights() -> anyhow::Result<()> {
    let test_db = TestDatabase::with_migrations().await?;
    let auth = AuthService::new(test_db.connection_arc());
    let service = AnalyticsService::new(test_db.connection_arc());

    auth.register(
        "pat@example.com",
        "correct-horse-battery",
        "Pat",
        Some("Patterns Co"),
    )
    .await?;

    let session = auth.login("pat@example.com", "correct-horse-battery").await?;
    let org_id = session.org.id;

    // A quiet yesterday followed by a busy today
    let now = Utc::now();
    let yesterday = now - Duration::days(1);
    let mut batch: Vec<EventPayload> = (0..10).map(|_| event_at("page_view", yesterday)).collect();
    batch.extend((0..50).map(|_| event_at("page_view", now)));
    batch.extend((0..3).map(|_| event_at("signup", now)));

    let ingested = service.ingest_batch(org_id, batch).await?;
    assert_eq!(ingested, 63);

    let total = service.total_events(org_id).await?;
    let top = service.top_events(org_id).await?;
    let trend = service.recent_trend(org_id).await?;

    assert_eq!(total, 63);
    assert_eq!(top[0].name, "page_view");
    assert_eq!(top[0].count, 60);

    let insights = generate_insights(total, &top, &trend);
    assert_eq!(insights[0].title, "Traffic Surge Detected");
    assert_eq!(insights.last().unwrap().title, "Event Volume Summary");

    // Re-reading the same data produces the same insights
    let again = generate_insights(
        service.total_events(org_id).await?,
        &service.top_events(org_id).await?,
        &service.recent_trend(org_id).await?,
    );
    assert_eq!(insights, again);

    Ok(())
}

#[tokio::test]
async fn test_recent_trend_excludes_old_events() -> anyhow::Result<()> {
    let test_db = TestDatabase::with_migrations().await?;
    let service = AnalyticsService::new(test_db.connection_arc());
    let org_id = create_org(&test_db, "acme").await?;

    let now = Utc::now();
    service
        .ingest_batch(
            org_id,
            vec![
                event_at("page_view", now - Duration::hours(1)),
                event_at("page_view", now - Duration::days(2)),
                event_at("page_view", now - Duration::days(30)),
            ],
        )
        .await?;

    let trend = service.recent_trend(org_id).await?;

    let total: i64 = trend.iter().map(|b| b.count).sum();
    assert_eq!(total, 2, "events older than the window must be excluded");

    Ok(())
}
