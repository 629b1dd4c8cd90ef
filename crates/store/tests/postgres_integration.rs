//! PostgreSQL integration tests
//!
//! These tests use a shared PostgreSQL container and need a Docker daemon,
//! so they are ignored by default. Run with:
//!
//! ```bash
//! cargo test -p store --test postgres_integration -- --ignored --test-threads=1
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use domain::{Criteria, Domain, Group, Invariant, User};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use store::{
    EntityId, InMemoryStore, JoinIndex, PostgresJoinIndex, PostgresStore, Store, StoreExt,
    StoreRegistry, run_migrations,
};
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

/// Shared container info - container stays alive for all tests
struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

/// Global shared container
static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            let temp_pool = PgPool::connect(&connection_string).await.unwrap();
            run_migrations(&temp_pool).await.unwrap();
            temp_pool.close().await;

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

/// Get a fresh pool with cleared tables
async fn get_test_pool() -> PgPool {
    let info = get_container_info().await;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&info.connection_string)
        .await
        .unwrap();

    sqlx::query("TRUNCATE TABLE entries, links")
        .execute(&pool)
        .await
        .unwrap();

    pool
}

fn user(age: u32) -> User {
    User::new("user", "user@example.com", age)
}

#[tokio::test]
#[ignore = "requires a Docker daemon"]
async fn create_then_get_one() {
    let store = PostgresStore::<User>::new(get_test_pool().await);

    let id = store.create(user(36)).await.unwrap();
    let entry = store.get_one(id).await.unwrap().unwrap();

    assert_eq!(entry.id, id);
    assert_eq!(entry.value, user(36));
    assert!(store.get_one(EntityId::new()).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires a Docker daemon"]
async fn update_and_delete_report_matches() {
    let store = PostgresStore::<User>::new(get_test_pool().await);
    let id = store.create(user(1)).await.unwrap();

    assert!(store.update(id, user(2)).await.unwrap());
    assert_eq!(store.get_one(id).await.unwrap().unwrap().value, user(2));
    assert!(!store.update(EntityId::new(), user(3)).await.unwrap());
    assert_eq!(store.count().await.unwrap(), 1);

    assert!(store.delete(id).await.unwrap());
    assert!(!store.delete(id).await.unwrap());
    assert!(!store.exists(id).await.unwrap());
}

#[tokio::test]
#[ignore = "requires a Docker daemon"]
async fn get_many_filters_then_paginates_in_insertion_order() {
    let store = PostgresStore::<User>::new(get_test_pool().await);
    let mut forties = Vec::new();
    for age in [40, 20, 40, 30, 40] {
        let id = store.create(user(age)).await.unwrap();
        if age == 40 {
            forties.push(id);
        }
    }

    let criteria = Criteria::example(&User {
        age: 40,
        ..User::default()
    })
    .unwrap();

    let all = store.get_many(&criteria, 0, 30).await.unwrap();
    assert_eq!(all.keys().copied().collect::<Vec<_>>(), forties);

    let page = store.get_many(&criteria, 1, 1).await.unwrap();
    assert_eq!(page.keys().copied().collect::<Vec<_>>(), vec![forties[1]]);

    let everything = store.get_many(&Criteria::any(), 0, usize::MAX).await.unwrap();
    assert_eq!(everything.len(), 5);
}

#[tokio::test]
#[ignore = "requires a Docker daemon"]
async fn domains_are_partitioned() {
    let pool = get_test_pool().await;
    let users = PostgresStore::<User>::new(pool.clone());
    let groups = PostgresStore::<Group>::new(pool);

    let id = users.create(user(1)).await.unwrap();

    assert!(groups.get_one(id).await.unwrap().is_none());
    assert_eq!(groups.count().await.unwrap(), 0);
}

#[tokio::test]
#[ignore = "requires a Docker daemon"]
async fn join_index_edges_are_unique() {
    let index = PostgresJoinIndex::between::<User, Group>(get_test_pool().await);
    let (root, a, b) = (EntityId::new(), EntityId::new(), EntityId::new());

    assert!(index.add(root, a).await.unwrap());
    assert!(!index.add(root, a).await.unwrap());
    assert!(index.add(root, b).await.unwrap());
    assert_eq!(index.linked(root).await.unwrap(), HashSet::from([a, b]));

    assert!(index.remove(root, a).await.unwrap());
    assert!(!index.remove(root, a).await.unwrap());
    assert!(!index.contains(root, a).await.unwrap());
    assert!(index.contains(root, b).await.unwrap());
}

#[tokio::test]
#[ignore = "requires a Docker daemon"]
async fn registry_binds_stores_to_the_pool() {
    let registry = StoreRegistry::postgres(get_test_pool().await);

    let id = registry.store::<User>().unwrap().create(user(5)).await.unwrap();

    let again = registry.store::<User>().unwrap();
    assert_eq!(again.get_one(id).await.unwrap().unwrap().value, user(5));
}

/// Domain with a nested array, where containment and equality differ.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
struct Tagged {
    name: String,
    tags: Vec<String>,
}

impl Domain for Tagged {
    const NAME: &'static str = "tagged";

    fn invariants() -> Vec<Invariant<Self>> {
        vec![]
    }
}

fn tagged(name: &str, tags: &[&str]) -> Tagged {
    Tagged {
        name: name.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

#[tokio::test]
#[ignore = "requires a Docker daemon"]
async fn criteria_fields_match_by_equality_like_memory() {
    let postgres = PostgresStore::<Tagged>::new(get_test_pool().await);
    let memory = InMemoryStore::<Tagged>::new();
    for value in [tagged("a", &["x"]), tagged("b", &["x", "y"])] {
        postgres.create(value.clone()).await.unwrap();
        memory.create(value).await.unwrap();
    }

    let criteria = Criteria::any().field("tags", ["x"]).unwrap();

    let from_postgres: Vec<_> = postgres.get_all(&criteria).await.unwrap().into_values().collect();
    let from_memory: Vec<_> = memory.get_all(&criteria).await.unwrap().into_values().collect();
    assert_eq!(from_postgres, vec![tagged("a", &["x"])]);
    assert_eq!(from_postgres, from_memory);
}
