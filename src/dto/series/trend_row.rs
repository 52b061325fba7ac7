use crate::common::*;

#[doc = r#"
    트렌드 조회 결과의 한 행.

    `metrics` 는 컬럼명 → 값 맵으로, DB 에서 NULL 로 내려온 값은 None 이다.
    행 순서는 업스트림 쿼리가 반환한 순서를 그대로 따르며 재정렬하지 않는다.
    `newdate` 는 표시용 라벨로 준비 단계에서 채워지고, `date` 원본은 보존된다.
"#]
#[derive(Debug, Clone, Serialize, Deserialize, Getters, Setters, new)]
#[getset(get = "pub", set = "pub")]
pub struct TrendRow {
    pub entity_name: String,
    pub date: String,
    pub newdate: Option<String>,
    pub metrics: BTreeMap<String, Option<f64>>,
}
