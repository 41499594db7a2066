use cityscout::db::{CacheLookup, NewForecast, NewLocation, NewMovie, Store};
use cityscout::entities::prelude::{Movie, Weather};

async fn test_store() -> Store {
    Store::new("sqlite::memory:")
        .await
        .expect("Failed to create in-memory store")
}

fn tacoma() -> NewLocation {
    NewLocation {
        search_query: "98405".to_string(),
        formatted_query: "Tacoma, WA 98405, USA".to_string(),
        latitude: 47.2456,
        longitude: -122.4594,
    }
}

#[tokio::test]
async fn test_store_connects_and_answers_ping() {
    let store = test_store().await;
    store.ping().await.unwrap();
}

#[tokio::test]
async fn test_save_location_is_idempotent_per_query() {
    let store = test_store().await;

    let first = store.save_location(tacoma()).await.unwrap();
    let second = store.save_location(tacoma()).await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.formatted_query, "Tacoma, WA 98405, USA");

    let found = store.find_location("98405").await.unwrap().unwrap();
    assert_eq!(found.id, first.id);

    assert!(store.find_location("seattle").await.unwrap().is_none());
}

#[tokio::test]
async fn test_distinct_queries_get_distinct_rows() {
    let store = test_store().await;

    let first = store.save_location(tacoma()).await.unwrap();
    let second = store
        .save_location(NewLocation {
            search_query: "tacoma".to_string(),
            ..tacoma()
        })
        .await
        .unwrap();

    // Same coordinates under a different raw query is a separate row.
    assert_ne!(first.id, second.id);
}

#[tokio::test]
async fn test_cache_lookup_hit_evict_miss_cycle() {
    let store = test_store().await;
    let loc = store.save_location(tacoma()).await.unwrap();

    match store.cached_rows::<Weather>(loc.id).await.unwrap() {
        CacheLookup::Miss => {}
        CacheLookup::Hit(rows) => panic!("expected empty cache, got {} rows", rows.len()),
    }

    let forecasts = vec![
        NewForecast {
            forecast: "Partly cloudy throughout the day.".to_string(),
            time: "Mon Apr 01 2019".to_string(),
        },
        NewForecast {
            forecast: "Light rain in the morning.".to_string(),
            time: "Tue Apr 02 2019".to_string(),
        },
    ];
    let saved = store.save_forecasts(loc.id, &forecasts).await.unwrap();
    assert_eq!(saved.len(), 2);
    // The whole set shares one timestamp and ages together.
    assert_eq!(saved[0].created_at, saved[1].created_at);

    match store.cached_rows::<Weather>(loc.id).await.unwrap() {
        CacheLookup::Hit(rows) => {
            assert_eq!(rows.len(), 2);
            assert_eq!(rows[0].time, "Mon Apr 01 2019");
        }
        CacheLookup::Miss => panic!("expected cached forecasts"),
    }

    let deleted = store.evict_cached::<Weather>(loc.id).await.unwrap();
    assert_eq!(deleted, 2);

    assert!(matches!(
        store.cached_rows::<Weather>(loc.id).await.unwrap(),
        CacheLookup::Miss
    ));
}

#[tokio::test]
async fn test_caches_are_scoped_per_location_and_table() {
    let store = test_store().await;
    let tacoma_loc = store.save_location(tacoma()).await.unwrap();
    let seattle_loc = store
        .save_location(NewLocation {
            search_query: "seattle".to_string(),
            formatted_query: "Seattle, WA, USA".to_string(),
            latitude: 47.6062,
            longitude: -122.3321,
        })
        .await
        .unwrap();

    store
        .save_forecasts(
            tacoma_loc.id,
            &[NewForecast {
                forecast: "Overcast.".to_string(),
                time: "Mon Apr 01 2019".to_string(),
            }],
        )
        .await
        .unwrap();

    store
        .save_movies(
            tacoma_loc.id,
            &[NewMovie {
                title: "Tacoma FD".to_string(),
                overview: "A firehouse comedy.".to_string(),
                average_votes: 7.1,
                image_url: String::new(),
                popularity: 12.5,
                released_on: "2019-03-28".to_string(),
            }],
        )
        .await
        .unwrap();

    // The other location sees nothing.
    assert!(matches!(
        store.cached_rows::<Weather>(seattle_loc.id).await.unwrap(),
        CacheLookup::Miss
    ));

    // Evicting forecasts leaves the movie cache untouched.
    store.evict_cached::<Weather>(tacoma_loc.id).await.unwrap();
    match store.cached_rows::<Movie>(tacoma_loc.id).await.unwrap() {
        CacheLookup::Hit(rows) => assert_eq!(rows[0].title, "Tacoma FD"),
        CacheLookup::Miss => panic!("movie cache should survive weather eviction"),
    }
}

#[tokio::test]
async fn test_repeated_forecast_saves_accumulate() {
    let store = test_store().await;
    let loc = store.save_location(tacoma()).await.unwrap();

    let day = [NewForecast {
        forecast: "Overcast.".to_string(),
        time: "Mon Apr 01 2019".to_string(),
    }];

    store.save_forecasts(loc.id, &day).await.unwrap();
    store.save_forecasts(loc.id, &day).await.unwrap();

    // Nothing deduplicates cache rows; only eviction clears them.
    match store.cached_rows::<Weather>(loc.id).await.unwrap() {
        CacheLookup::Hit(rows) => assert_eq!(rows.len(), 2),
        CacheLookup::Miss => panic!("expected accumulated rows"),
    }
}
