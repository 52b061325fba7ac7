use crate::common::*;

use crate::model::configs::rdb_config::*;

use crate::traits::repository_traits::sqlserver_repository::*;

pub struct SqlServerRepositoryImpl {
    pool: Pool,
}

impl SqlServerRepositoryImpl {
    pub fn new(rdb_config: &RdbConfig) -> Result<Self, anyhow::Error> {
        let pool: Pool = Manager::new()
            .host(rdb_config.database_host())
            .port(*rdb_config.database_port())
            .database(rdb_config.database_name())
            .basic_authentication(
                rdb_config.database_user(),
                rdb_config.database_password(),
            )
            .trust_cert()
            .max_size(1)
            .create_pool()
            .map_err(|e| {
                anyhow!(
                    "[SqlServerRepositoryImpl->new] Failed to build the connection pool: {:?}",
                    e
                )
            })?;

        Ok(SqlServerRepositoryImpl { pool })
    }

    #[doc = r#"
        조회 결과 한 행을 컬럼명 → 값의 JSON 오브젝트로 변환하는 함수.

        상위 계층이 serde 로 타입을 해석할 수 있도록 행 단위 통화를 Value 로 통일한다.

        # Arguments
        * `row` - tiberius 조회 결과 행

        # Returns
        * `Value` - {"컬럼명": 값} 형태의 JSON 오브젝트
    "#]
    fn convert_row_to_json(row: Row) -> Value {
        let column_names: Vec<String> = row
            .columns()
            .iter()
            .map(|col| col.name().to_string())
            .collect();

        let mut object: serde_json::Map<String, Value> = serde_json::Map::new();

        for (name, data) in column_names.into_iter().zip(row.into_iter()) {
            object.insert(name, Self::convert_column_data(data));
        }

        Value::Object(object)
    }

    #[doc = "tiberius 컬럼 값을 JSON 값으로 변환 - 미지원 타입은 NULL 처리하고 경고 로그"]
    fn convert_column_data(data: ColumnData<'_>) -> Value {
        match data {
            ColumnData::Bit(v) => v.map(Value::Bool).unwrap_or(Value::Null),
            ColumnData::U8(v) => v.map(|x| json!(x)).unwrap_or(Value::Null),
            ColumnData::I16(v) => v.map(|x| json!(x)).unwrap_or(Value::Null),
            ColumnData::I32(v) => v.map(|x| json!(x)).unwrap_or(Value::Null),
            ColumnData::I64(v) => v.map(|x| json!(x)).unwrap_or(Value::Null),
            /* json! 은 NaN/무한대를 NULL 로 떨어뜨린다 */
            ColumnData::F32(v) => v.map(|x| json!(x)).unwrap_or(Value::Null),
            ColumnData::F64(v) => v.map(|x| json!(x)).unwrap_or(Value::Null),
            ColumnData::String(v) => v
                .map(|s| Value::String(s.into_owned()))
                .unwrap_or(Value::Null),
            ColumnData::Numeric(v) => v
                .map(|n| json!(n.value() as f64 / 10f64.powi(n.scale() as i32)))
                .unwrap_or(Value::Null),
            other => {
                warn!(
                    "[SqlServerRepositoryImpl->convert_column_data] Unsupported column type treated as NULL: {:?}",
                    other
                );
                Value::Null
            }
        }
    }
}

#[async_trait]
impl SqlServerRepository for SqlServerRepositoryImpl {
    #[doc = r#"
        SELECT 쿼리를 실행하고 첫 번째 결과 집합을 JSON 행 목록으로 반환하는 함수.

        1. 풀에서 연결을 하나 가져온다
        2. `simple_query` 로 쿼리 실행 (엔터티명은 호출 측에서 리터럴로 치환되어 있음)
        3. 각 행을 컬럼명 → 값 JSON 오브젝트로 변환

        # Arguments
        * `sql` - 실행할 SQL 문자열

        # Returns
        * `Vec<Value>` - 행 목록. 결과가 없으면 빈 벡터
        * `anyhow::Error` - 연결 또는 쿼리 실패 시
    "#]
    async fn select_rows(&self, sql: &str) -> Result<Vec<Value>, anyhow::Error> {
        let mut client = self.pool.get().await.map_err(|e| {
            anyhow!(
                "[SqlServerRepositoryImpl->select_rows] Failed to take a connection from the pool: {:?}",
                e
            )
        })?;

        let rows: Vec<Row> = client
            .simple_query(sql)
            .await
            .map_err(|e| {
                anyhow!(
                    "[SqlServerRepositoryImpl->select_rows] Query execution failed: {:?}",
                    e
                )
            })?
            .into_first_result()
            .await
            .map_err(|e| {
                anyhow!(
                    "[SqlServerRepositoryImpl->select_rows] Failed to collect the result set: {:?}",
                    e
                )
            })?;

        let converted: Vec<Value> = rows
            .into_iter()
            .map(Self::convert_row_to_json)
            .collect();

        Ok(converted)
    }
}
