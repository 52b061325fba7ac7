use crate::common::*;

#[doc = "트렌드 차트의 중심 경향선 종류 - 메트릭 정책 파일에서 컬럼별로 지정"]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CentralTendency {
    Median,
    Mean,
}

impl CentralTendency {
    #[doc = "차트 범례에 표기할 이름"]
    pub fn label(&self) -> &'static str {
        match self {
            CentralTendency::Median => "Median",
            CentralTendency::Mean => "Mean",
        }
    }
}
