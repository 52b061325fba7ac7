use crate::common::*;

use crate::dto::series::trend_row::*;

#[doc = r#"
    준비 단계(결측 보정 → 윈도잉 → 라벨 재작성)가 끝난 시계열.

    행 순서는 입력 순서를 그대로 유지한다.
"#]
#[derive(Debug, Clone, Serialize, Deserialize, Getters, new)]
#[getset(get = "pub")]
pub struct PreparedSeries {
    pub rows: Vec<TrendRow>,
}

impl PreparedSeries {
    #[doc = "X축 라벨 목록 - 재작성된 라벨이 없으면 원본 날짜를 사용"]
    pub fn x_labels(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(|row| match row.newdate() {
                Some(label) => label.clone(),
                None => row.date().clone(),
            })
            .collect()
    }

    #[doc = "지정한 메트릭 컬럼의 값 벡터 - 보정이 끝난 시계열이므로 결측은 0.0"]
    pub fn metric_values(&self, metric_name: &str) -> Vec<f64> {
        self.rows
            .iter()
            .map(|row| {
                row.metrics()
                    .get(metric_name)
                    .copied()
                    .flatten()
                    .unwrap_or(0.0)
            })
            .collect()
    }

    #[doc = "해당 메트릭 컬럼이 시계열에 존재하는지 여부"]
    pub fn has_metric(&self, metric_name: &str) -> bool {
        self.rows
            .iter()
            .any(|row| row.metrics().contains_key(metric_name))
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}
