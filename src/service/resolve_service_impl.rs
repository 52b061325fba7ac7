use crate::common::*;

use crate::traits::service_traits::resolve_service::*;

use crate::model::reference::reference_table::*;

use crate::dto::resolved_entity::*;

use crate::utils_modules::io_utils::*;

use crate::env_configuration::env_config::*;

/* 엔터티 커스텀 필드의 고정 포맷: entity:"<label>" */
const LABEL_PREFIX: &str = "entity:\"";
const LABEL_SUFFIX: &str = "\"";

#[derive(Debug, Getters)]
#[getset(get = "pub")]
pub struct ResolveServiceImpl {
    reference_table: ReferenceTableConfig,
}

impl ResolveServiceImpl {
    #[doc = "ResolveServiceImpl 구조체의 생성자 - 참조 테이블을 실행당 한 번 적재한다"]
    pub fn new() -> Self {
        let reference_table: ReferenceTableConfig =
            read_toml_from_file::<ReferenceTableConfig>(&REFERENCE_TABLE_PATH)
                .unwrap_or_else(|e| {
                    let err_msg: &str = "[ERROR][ResolveServiceImpl->new] Failed to retrieve information 'reference_table'.";
                    error!("{} : {:?}", err_msg, e);
                    panic!("{} : {:?}", err_msg, e)
                });

        ResolveServiceImpl { reference_table }
    }

    #[doc = "이미 적재된 참조 테이블로 서비스를 구성해주는 함수"]
    pub fn from_table(reference_table: ReferenceTableConfig) -> Self {
        ResolveServiceImpl { reference_table }
    }

    #[doc = "조회 쿼리에 바인딩할 작은따옴표 리터럴 - 내부 따옴표는 겹따옴표로 이스케이프"]
    fn build_sql_literal(canonical_name: &str) -> String {
        format!("'{}'", canonical_name.replace('\'', "''"))
    }

    #[doc = "산출물 파일명용 토큰 - 정식 이름에서 공백과 하이픈을 제거"]
    fn build_file_token(canonical_name: &str) -> String {
        canonical_name
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-')
            .collect()
    }
}

impl ResolveService for ResolveServiceImpl {
    #[doc = r#"
        커스텀 필드 값에서 엔터티 라벨을 추출하는 함수.

        필드 값은 `entity:"<label>"` 고정 포맷을 따라야 한다.
        포맷이 다르거나 라벨이 비어있으면 명확한 오류를 반환한다
        (조용한 오파싱 방지).

        # Arguments
        * `raw_field` - 티켓 커스텀 필드의 원본 문자열 값

        # Returns
        * `String` - 추출된 라벨
        * `anyhow::Error` - 포맷 불일치 또는 빈 라벨
    "#]
    fn extract_ticket_label(&self, raw_field: &str) -> Result<String, anyhow::Error> {
        let label: &str = raw_field
            .trim()
            .strip_prefix(LABEL_PREFIX)
            .and_then(|rest| rest.strip_suffix(LABEL_SUFFIX))
            .ok_or_else(|| {
                anyhow!(
                    "[ResolveServiceImpl->extract_ticket_label] Field value does not match the entity:\"<label>\" format: {}",
                    raw_field
                )
            })?;

        if label.is_empty() {
            return Err(anyhow!(
                "[ResolveServiceImpl->extract_ticket_label] Field value carries an empty label: {}",
                raw_field
            ));
        }

        Ok(label.to_string())
    }

    #[doc = r#"
        추출된 라벨을 참조 테이블과 정확히 일치 비교해 엔터티를 해석하는 함수.

        1. `ticket_label` 과 정확히 일치하는 행을 모두 수집
        2. 0건이면 Ok(None) - 호출 측에서 해당 티켓을 건너뛴다
        3. 2건 이상이면 오류 - 중복 라벨은 데이터 품질 문제로 표면화한다
        4. 1건이면 표기용/쿼리용/파일명용 세 가지 이름 형태를 만들어 반환

        # Arguments
        * `ticket_label` - `extract_ticket_label` 이 추출한 라벨

        # Returns
        * `Option<ResolvedEntity>` - 매칭된 엔터티 (없으면 None)
        * `anyhow::Error` - 참조 테이블에 중복 라벨이 있는 경우
    "#]
    fn resolve(&self, ticket_label: &str) -> Result<Option<ResolvedEntity>, anyhow::Error> {
        let matched_rows: Vec<&ReferenceRow> = self
            .reference_table
            .row()
            .iter()
            .filter(|row| row.ticket_label().as_str() == ticket_label)
            .collect();

        match matched_rows.len() {
            0 => Ok(None),
            1 => {
                let canonical_name: &str = matched_rows[0].canonical_name();

                Ok(Some(ResolvedEntity::new(
                    canonical_name.to_string(),
                    Self::build_sql_literal(canonical_name),
                    Self::build_file_token(canonical_name),
                )))
            }
            duplicate_cnt => Err(anyhow!(
                "[ResolveServiceImpl->resolve] Reference label '{}' is duplicated ({} rows) - the reference table must be corrected",
                ticket_label,
                duplicate_cnt
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_service() -> ResolveServiceImpl {
        ResolveServiceImpl::from_table(ReferenceTableConfig::new(vec![
            ReferenceRow::new(String::from("Acme-1"), String::from("Acme One")),
            ReferenceRow::new(String::from("Acme-2"), String::from("Acme-Two Plant")),
        ]))
    }

    #[test]
    fn label_extraction_follows_the_tagged_format() {
        let service: ResolveServiceImpl = sample_service();

        let label: String = service
            .extract_ticket_label("entity:\"Acme-1\"")
            .unwrap();
        assert_eq!(label, "Acme-1");

        /* 앞뒤 공백은 허용 */
        let label: String = service
            .extract_ticket_label("  entity:\"Acme-2\"  ")
            .unwrap();
        assert_eq!(label, "Acme-2");
    }

    #[test]
    fn malformed_field_values_are_rejected() {
        let service: ResolveServiceImpl = sample_service();

        assert!(service.extract_ticket_label("Acme-1").is_err());
        assert!(service.extract_ticket_label("entity:Acme-1").is_err());
        assert!(service.extract_ticket_label("entity:\"\"").is_err());
        assert!(service.extract_ticket_label("").is_err());
    }

    #[test]
    fn resolve_returns_the_exact_matching_canonical_name() {
        let service: ResolveServiceImpl = sample_service();

        let entity: ResolvedEntity = service.resolve("Acme-1").unwrap().unwrap();
        assert_eq!(entity.canonical_name(), "Acme One");
        assert_eq!(entity.sql_literal(), "'Acme One'");
        assert_eq!(entity.file_token(), "AcmeOne");
    }

    #[test]
    fn resolve_returns_none_for_an_absent_label() {
        let service: ResolveServiceImpl = sample_service();
        assert!(service.resolve("Acme-9").unwrap().is_none());
    }

    #[test]
    fn duplicate_reference_labels_are_surfaced_as_errors() {
        let service: ResolveServiceImpl =
            ResolveServiceImpl::from_table(ReferenceTableConfig::new(vec![
                ReferenceRow::new(String::from("Acme-1"), String::from("Acme One")),
                ReferenceRow::new(String::from("Acme-1"), String::from("Acme Uno")),
            ]));

        assert!(service.resolve("Acme-1").is_err());
    }

    #[test]
    fn file_token_drops_whitespace_and_hyphens() {
        let service: ResolveServiceImpl = sample_service();

        let entity: ResolvedEntity = service.resolve("Acme-2").unwrap().unwrap();
        assert_eq!(entity.file_token(), "AcmeTwoPlant");
    }

    #[test]
    fn sql_literal_escapes_embedded_quotes() {
        assert_eq!(
            ResolveServiceImpl::build_sql_literal("O'Brien Site"),
            "'O''Brien Site'"
        );
    }
}
