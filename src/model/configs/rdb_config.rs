use crate::common::*;

#[doc = r#"
    SQL Server 접속 정보와 엔터티별 조회 쿼리 템플릿.

    `trend_query` / `density_query` 는 `{name}` 자리표시자를 포함하는 SQL 템플릿으로,
    실행 시점에 따옴표로 감싼 정식 엔터티명 리터럴로 치환된다.
"#]
#[derive(Debug, Deserialize, Serialize, Getters)]
#[getset(get = "pub")]
pub struct RdbConfig {
    pub database_host: String,
    pub database_port: u16,
    pub database_name: String,
    pub database_user: String,
    pub database_password: String,
    pub trend_query: String,
    pub density_query: String,
}
