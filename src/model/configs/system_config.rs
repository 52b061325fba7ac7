use crate::common::*;

fn default_chart_window_size() -> usize {
    30
}

fn default_relabel_epoch_year() -> i32 {
    2020
}

#[doc = r#"
    배치 전반의 시스템 설정.

    * `scratch_dir` - 차트/병합 문서/최종 이미지가 거쳐가는 임시 디렉토리
    * `search_lookback_days` - 티켓 검색 시 생성일 기준 조회 기간(일)
    * `chart_window_size` - 트렌드 차트에 사용할 최근 행 개수 (기본 30)
    * `relabel_epoch_year` - 날짜 라벨 재작성 대상 연도 (기본 2020)
    * `trend_metric` - 트렌드 차트를 그릴 메트릭 컬럼명
"#]
#[derive(Debug, Deserialize, Serialize, Getters)]
#[getset(get = "pub")]
pub struct SystemConfig {
    pub scratch_dir: String,
    pub search_lookback_days: i64,
    #[serde(default = "default_chart_window_size")]
    pub chart_window_size: usize,
    #[serde(default = "default_relabel_epoch_year")]
    pub relabel_epoch_year: i32,
    pub trend_metric: String,
}
