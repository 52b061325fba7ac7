use crate::common::*;

#[doc = "밀도 추정에 사용하는 (side, height) 표본 한 쌍 - 순서 불변 조건 없음"]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, new)]
pub struct DensitySample {
    pub side: f64,
    pub height: f64,
}
