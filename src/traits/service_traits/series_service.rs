use crate::common::*;

use crate::dto::series::{chart_spec::*, prepared_series::*, trend_row::*};

pub trait SeriesService: Send + Sync {
    #[doc = r#"
        원시 시계열을 차트에 넣을 수 있는 형태로 준비한다.
        결측 보정(0 채움) → 꼬리 윈도잉 → 날짜 라벨 재작성 순서로 수행하며
        행 순서는 입력 순서를 유지한다.
    "#]
    fn prepare(&self, rows: Vec<TrendRow>, window: usize)
    -> Result<PreparedSeries, anyhow::Error>;

    #[doc = r#"
        지정한 메트릭 컬럼의 규격 한계/중심 경향/Y축 범위를 해석한다.
        비어있는 시계열이나 존재하지 않는 컬럼은 오류다.
    "#]
    fn chart_spec(
        &self,
        prepared: &PreparedSeries,
        metric_name: &str,
    ) -> Result<ChartSpec, anyhow::Error>;
}
