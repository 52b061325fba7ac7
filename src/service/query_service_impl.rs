use crate::common::*;

use crate::traits::{
    repository_traits::sqlserver_repository::*, service_traits::query_service::*,
};

use crate::model::configs::{rdb_config::*, total_config::*};

use crate::dto::series::{density_sample::*, trend_row::*};

#[derive(new)]
pub struct QueryServiceImpl<R: SqlServerRepository> {
    rdb_conn: Arc<R>,
}

impl<R: SqlServerRepository> QueryServiceImpl<R> {
    #[doc = "쿼리 템플릿의 `{name}` 자리표시자를 따옴표 리터럴로 치환해주는 함수"]
    fn bind_entity_literal(query_template: &str, sql_literal: &str) -> String {
        query_template.replace("{name}", sql_literal)
    }

    #[doc = r#"
        트렌드 조회 결과 행들을 TrendRow 목록으로 파싱하는 제네릭 함수.

        1. `name` 컬럼은 엔터티명, `date` 컬럼은 날짜 문자열로 해석
        2. `date` 가 없는 행은 오류 - 라벨 재작성 전에 날짜가 반드시 있어야 한다
        3. 나머지 컬럼 중 숫자/NULL 컬럼을 메트릭 맵에 수집 (NULL → None)
        4. 숫자가 아닌 부가 컬럼은 경고 로그 후 무시
        5. 행 순서는 그대로 유지

        # Arguments
        * `rows` - 저장소 계층이 반환한 JSON 행 목록

        # Returns
        * `Vec<TrendRow>` - 파싱된 시계열 행들
        * `anyhow::Error` - 행 구조가 깨져있거나 `date` 컬럼이 없는 경우
    "#]
    fn parse_trend_rows(rows: &[Value]) -> Result<Vec<TrendRow>, anyhow::Error> {
        rows.iter()
            .map(|row| {
                let object = row.as_object().ok_or_else(|| {
                    anyhow!(
                        "[QueryServiceImpl->parse_trend_rows] Row is not an object: {}",
                        row
                    )
                })?;

                let entity_name: String = object
                    .get("name")
                    .and_then(|value| value.as_str())
                    .unwrap_or_default()
                    .to_string();

                let date: String = object
                    .get("date")
                    .and_then(|value| value.as_str())
                    .ok_or_else(|| {
                        anyhow!(
                            "[QueryServiceImpl->parse_trend_rows] Missing 'date' column in the trend result"
                        )
                    })?
                    .to_string();

                let mut metrics: BTreeMap<String, Option<f64>> = BTreeMap::new();

                for (column, value) in object {
                    if column == "name" || column == "date" {
                        continue;
                    }

                    match value {
                        Value::Null => {
                            metrics.insert(column.clone(), None);
                        }
                        Value::Number(number) => {
                            metrics.insert(column.clone(), number.as_f64());
                        }
                        _ => {
                            warn!(
                                "[QueryServiceImpl->parse_trend_rows] Non-numeric column ignored: {}",
                                column
                            );
                        }
                    }
                }

                Ok(TrendRow::new(entity_name, date, None, metrics))
            })
            .collect()
    }

    #[doc = r#"
        밀도 조회 결과 행들을 (side, height) 표본 목록으로 파싱하는 함수.

        숫자 쌍이 갖춰지지 않은 행은 경고 로그 후 건너뛴다.
    "#]
    fn parse_density_samples(rows: &[Value]) -> Vec<DensitySample> {
        let mut samples: Vec<DensitySample> = Vec::new();

        for row in rows {
            let side: Option<f64> = row.get("side").and_then(|value| value.as_f64());
            let height: Option<f64> = row.get("height").and_then(|value| value.as_f64());

            match (side, height) {
                (Some(side), Some(height)) => samples.push(DensitySample::new(side, height)),
                _ => {
                    warn!(
                        "[QueryServiceImpl->parse_density_samples] Row without a numeric side/height pair skipped"
                    );
                }
            }
        }

        samples
    }
}

#[async_trait]
impl<R: SqlServerRepository> QueryService for QueryServiceImpl<R> {
    #[doc = r#"
        엔터티의 트렌드 시계열을 조회하는 함수.

        연결/쿼리 실패는 로그로 남기고 빈 결과를 반환한다 - 호출 측은
        빈 결과를 "데이터 없음" 으로 보고 해당 티켓을 건너뛴다.

        # Arguments
        * `sql_literal` - 따옴표로 감싼 정식 엔터티명 리터럴

        # Returns
        * `Vec<TrendRow>` - 시계열 행들 (실패 시 빈 벡터)
    "#]
    async fn get_trend_series(&self, sql_literal: &str) -> Result<Vec<TrendRow>, anyhow::Error> {
        let rdb_config: &'static RdbConfig = get_rdb_config_info();
        let sql: String = Self::bind_entity_literal(rdb_config.trend_query(), sql_literal);

        let rows: Vec<Value> = match self.rdb_conn.select_rows(&sql).await {
            Ok(rows) => rows,
            Err(e) => {
                error!("[QueryServiceImpl->get_trend_series] {:?}", e);
                return Ok(Vec::new());
            }
        };

        Self::parse_trend_rows(&rows)
    }

    #[doc = r#"
        엔터티의 밀도 표본을 조회하는 함수.

        연결/쿼리 실패는 로그로 남기고 빈 결과를 반환한다.

        # Arguments
        * `sql_literal` - 따옴표로 감싼 정식 엔터티명 리터럴

        # Returns
        * `Vec<DensitySample>` - (side, height) 표본들 (실패 시 빈 벡터)
    "#]
    async fn get_density_samples(
        &self,
        sql_literal: &str,
    ) -> Result<Vec<DensitySample>, anyhow::Error> {
        let rdb_config: &'static RdbConfig = get_rdb_config_info();
        let sql: String = Self::bind_entity_literal(rdb_config.density_query(), sql_literal);

        let rows: Vec<Value> = match self.rdb_conn.select_rows(&sql).await {
            Ok(rows) => rows,
            Err(e) => {
                error!("[QueryServiceImpl->get_density_samples] {:?}", e);
                return Ok(Vec::new());
            }
        };

        Ok(Self::parse_density_samples(&rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::repository::sqlserver_repository_impl::SqlServerRepositoryImpl;

    type TestService = QueryServiceImpl<SqlServerRepositoryImpl>;

    #[test]
    fn entity_literal_is_bound_into_the_template() {
        let sql: String = TestService::bind_entity_literal(
            "SELECT name, date, variableA FROM metrics WHERE name = {name}",
            "'Acme One'",
        );

        assert_eq!(
            sql,
            "SELECT name, date, variableA FROM metrics WHERE name = 'Acme One'"
        );
    }

    #[test]
    fn trend_rows_parse_numeric_and_null_columns() {
        let rows: Vec<Value> = vec![
            json!({ "name": "Acme One", "date": "20200315", "variableA": 1.5, "variableC": null }),
            json!({ "name": "Acme One", "date": "20200316", "variableA": 2, "variableC": 0.25 }),
        ];

        let parsed: Vec<TrendRow> = TestService::parse_trend_rows(&rows).unwrap();

        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].entity_name(), "Acme One");
        assert_eq!(parsed[0].date(), "20200315");
        assert_eq!(parsed[0].metrics()["variableA"], Some(1.5));
        assert_eq!(parsed[0].metrics()["variableC"], None);
        assert_eq!(parsed[1].metrics()["variableA"], Some(2.0));
    }

    #[test]
    fn a_row_without_a_date_column_is_an_error() {
        let rows: Vec<Value> = vec![json!({ "name": "Acme One", "variableA": 1.0 })];
        assert!(TestService::parse_trend_rows(&rows).is_err());
    }

    #[test]
    fn density_rows_without_numeric_pairs_are_skipped() {
        let rows: Vec<Value> = vec![
            json!({ "name": "Acme One", "side": -0.2, "height": 2.1 }),
            json!({ "name": "Acme One", "side": null, "height": 2.5 }),
            json!({ "name": "Acme One", "side": 0.4 }),
        ];

        let samples: Vec<DensitySample> = TestService::parse_density_samples(&rows);

        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].side, -0.2);
        assert_eq!(samples[0].height, 2.1);
    }
}
