use crate::common::*;

#[doc = "참조 테이블 한 행 - 티켓에 내장된 라벨과 정식 엔터티명의 쌍"]
#[derive(Debug, Clone, Deserialize, Serialize, Getters, new)]
#[getset(get = "pub")]
pub struct ReferenceRow {
    pub ticket_label: String,
    pub canonical_name: String,
}

#[doc = r#"
    티켓 라벨 → 정식 엔터티명 참조 테이블 (`REFERENCE_TABLE_PATH` TOML).

    실행당 한 번 메모리에 적재되며 이후 읽기 전용이다.
    `ticket_label` 은 유일해야 하며, 중복은 데이터 품질 오류로 처리한다.
"#]
#[derive(Debug, Clone, Deserialize, Serialize, Getters, new)]
#[getset(get = "pub")]
pub struct ReferenceTableConfig {
    pub row: Vec<ReferenceRow>,
}
