use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::CountryAggregateRow;

/// One of the two collections that can be placed on the location map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Members,
    Organizations,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Members => "members",
            EntityKind::Organizations => "organizations",
        }
    }

    fn aggregate_sql(self) -> &'static str {
        match self {
            EntityKind::Members => SQL_AGGREGATE_MEMBERS_BY_COUNTRY,
            EntityKind::Organizations => SQL_AGGREGATE_ORGANIZATIONS_BY_COUNTRY,
        }
    }
}

// ?1 = number of segment ids, ?2 = JSON array of lower-case hyphenated ids.
// The mean only takes rows carrying both coordinates.
const SQL_AGGREGATE_MEMBERS_BY_COUNTRY: &str = r#"
SELECT
  m.country_code AS country_code,
  COUNT(*) AS record_count,
  AVG(CASE WHEN m.latitude IS NOT NULL AND m.longitude IS NOT NULL THEN m.latitude END) AS mean_latitude,
  AVG(CASE WHEN m.latitude IS NOT NULL AND m.longitude IS NOT NULL THEN m.longitude END) AS mean_longitude
FROM members m
WHERE m.country_code IS NOT NULL
  AND m.deleted_at IS NULL
  AND (
    ?1 = 0
    OR lower(m.segment_id) IN (SELECT value FROM json_each(?2))
  )
GROUP BY m.country_code
ORDER BY record_count DESC, m.country_code ASC
"#;

const SQL_AGGREGATE_ORGANIZATIONS_BY_COUNTRY: &str = r#"
SELECT
  o.country_code AS country_code,
  COUNT(*) AS record_count,
  AVG(CASE WHEN o.latitude IS NOT NULL AND o.longitude IS NOT NULL THEN o.latitude END) AS mean_latitude,
  AVG(CASE WHEN o.latitude IS NOT NULL AND o.longitude IS NOT NULL THEN o.longitude END) AS mean_longitude
FROM organizations o
WHERE o.country_code IS NOT NULL
  AND o.deleted_at IS NULL
  AND (
    ?1 = 0
    OR lower(o.segment_id) IN (SELECT value FROM json_each(?2))
  )
GROUP BY o.country_code
ORDER BY record_count DESC, o.country_code ASC
"#;

pub async fn load_country_aggregates(
    pool: &SqlitePool,
    kind: EntityKind,
    segment_ids: &[Uuid],
) -> sqlx::Result<Vec<CountryAggregateRow>> {
    let segments_json = serde_json::to_string(
        &segment_ids
            .iter()
            .map(|id| id.hyphenated().to_string())
            .collect::<Vec<_>>(),
    )
    .unwrap_or_else(|_| "[]".to_string());

    sqlx::query_as::<_, CountryAggregateRow>(kind.aggregate_sql())
        .bind(segment_ids.len() as i64)
        .bind(segments_json)
        .fetch_all(pool)
        .await
}


#[cfg(test)]
mod tests {
    use super::test_support::{insert, memory_pool, Record};
    use super::*;

    #[tokio::test]
    async fn groups_by_country_and_orders_by_count() {
        let pool = memory_pool().await;
        let seg = Uuid::new_v4();
        for _ in 0..3 {
            insert(&pool, EntityKind::Members, Record::new("DE", seg)).await;
        }
        insert(&pool, EntityKind::Members, Record::new("FR", seg)).await;
        for _ in 0..2 {
            insert(&pool, EntityKind::Members, Record::new("US", seg)).await;
        }

        let rows = load_country_aggregates(&pool, EntityKind::Members, &[])
            .await
            .unwrap();
        let got: Vec<(&str, i64)> = rows
            .iter()
            .map(|r| (r.country_code.as_str(), r.record_count))
            .collect();
        assert_eq!(got, vec![("DE", 3), ("US", 2), ("FR", 1)]);
    }

    #[tokio::test]
    async fn skips_deleted_and_null_country_records() {
        let pool = memory_pool().await;
        let seg = Uuid::new_v4();
        insert(&pool, EntityKind::Organizations, Record::new("NL", seg)).await;
        insert(
            &pool,
            EntityKind::Organizations,
            Record::new("NL", seg).deleted(),
        )
        .await;
        insert(
            &pool,
            EntityKind::Organizations,
            Record {
                country_code: None,
                coords: Some((1.0, 2.0)),
                segment_id: seg,
                deleted: false,
            },
        )
        .await;

        let rows = load_country_aggregates(&pool, EntityKind::Organizations, &[])
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].country_code, "NL");
        assert_eq!(rows[0].record_count, 1);
    }

    #[tokio::test]
    async fn mean_ignores_records_without_coordinates() {
        let pool = memory_pool().await;
        let seg = Uuid::new_v4();
        insert(&pool, EntityKind::Members, Record::new("BR", seg).at(10.0, 20.0)).await;
        insert(&pool, EntityKind::Members, Record::new("BR", seg).at(20.0, 40.0)).await;
        insert(&pool, EntityKind::Members, Record::new("BR", seg)).await;
        insert(&pool, EntityKind::Members, Record::new("CL", seg)).await;

        let rows = load_country_aggregates(&pool, EntityKind::Members, &[])
            .await
            .unwrap();
        let br = rows.iter().find(|r| r.country_code == "BR").unwrap();
        assert_eq!(br.record_count, 3);
        assert_eq!(br.mean_latitude, Some(15.0));
        assert_eq!(br.mean_longitude, Some(30.0));

        let cl = rows.iter().find(|r| r.country_code == "CL").unwrap();
        assert_eq!(cl.mean_latitude, None);
        assert_eq!(cl.mean_longitude, None);
    }

    #[tokio::test]
    async fn segment_filter_restricts_records() {
        let pool = memory_pool().await;
        let wanted = Uuid::new_v4();
        let other = Uuid::new_v4();
        insert(&pool, EntityKind::Members, Record::new("IE", wanted)).await;
        insert(&pool, EntityKind::Members, Record::new("IE", other)).await;
        insert(&pool, EntityKind::Members, Record::new("PT", other)).await;

        let rows = load_country_aggregates(&pool, EntityKind::Members, &[wanted])
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].country_code, "IE");
        assert_eq!(rows[0].record_count, 1);

        let none = load_country_aggregates(&pool, EntityKind::Members, &[Uuid::new_v4()])
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn closed_pool_surfaces_error() {
        let pool = memory_pool().await;
        pool.close().await;
        let res = load_country_aggregates(&pool, EntityKind::Members, &[]).await;
        assert!(res.is_err());
    }
}
