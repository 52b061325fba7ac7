use crate::common::*;

use crate::enums::central_tendency::*;

#[doc = r#"
    메트릭 하나를 그리기 위한 해석 완료된 렌더링 입력.

    * `usl` / `lsl` - 규격 한계선. `lsl` 이 None 이면 하한선을 그리지 않는다
    * `center` / `center_value` - 중심 경향선 종류와 윈도 데이터 기준 계산값
    * `y_range` - Y축 (최소, 최대)
"#]
#[derive(Debug, Clone, PartialEq, Getters, new)]
#[getset(get = "pub")]
pub struct ChartSpec {
    pub metric_name: String,
    pub usl: f64,
    pub lsl: Option<f64>,
    pub center: CentralTendency,
    pub center_value: f64,
    pub y_range: (f64, f64),
}
