use crate::common::*;

use crate::dto::resolved_entity::*;

pub trait ResolveService: Send + Sync {
    #[doc = r#"
        커스텀 필드 값에서 엔터티 라벨을 추출한다.
        필드 값은 `entity:"<label>"` 형식을 따라야 하며, 형식이 다르면 오류를 반환한다.
    "#]
    fn extract_ticket_label(&self, raw_field: &str) -> Result<String, anyhow::Error>;

    #[doc = r#"
        추출된 라벨을 참조 테이블과 정확히 일치 비교해 엔터티를 해석한다.
        매칭이 없으면 Ok(None), 라벨이 중복이면 오류를 반환한다.
    "#]
    fn resolve(&self, ticket_label: &str) -> Result<Option<ResolvedEntity>, anyhow::Error>;
}
