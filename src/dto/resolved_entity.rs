use crate::common::*;

#[doc = r#"
    참조 테이블 매칭이 끝난 엔터티의 세 가지 이름 형태.

    * `canonical_name` - 차트 제목 등 표기용 정식 이름
    * `sql_literal` - 조회 쿼리에 바인딩할 작은따옴표 리터럴 (내부 따옴표는 겹따옴표 처리)
    * `file_token` - 산출물 파일명에 쓰는 토큰 (공백/하이픈 제거)
"#]
#[derive(Debug, Clone, PartialEq, Eq, Getters, new)]
#[getset(get = "pub")]
pub struct ResolvedEntity {
    pub canonical_name: String,
    pub sql_literal: String,
    pub file_token: String,
}
