use crate::common::*;

use crate::traits::service_traits::series_service::*;

use crate::model::{configs::total_config::*, policy::metric_policy::*};

use crate::dto::series::{chart_spec::*, prepared_series::*, trend_row::*};

use crate::enums::central_tendency::*;

use crate::utils_modules::io_utils::*;

use crate::env_configuration::env_config::*;

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(Debug, Getters)]
#[getset(get = "pub")]
pub struct SeriesServiceImpl {
    metric_policies: MetricPolicyConfig,
    relabel_epoch_year: i32,
}

impl SeriesServiceImpl {
    #[doc = "SeriesServiceImpl 구조체의 생성자 - 메트릭 정책 테이블을 실행당 한 번 적재한다"]
    pub fn new() -> Self {
        let metric_policies: MetricPolicyConfig =
            read_toml_from_file::<MetricPolicyConfig>(&METRIC_POLICY_PATH).unwrap_or_else(|e| {
                let err_msg: &str = "[ERROR][SeriesServiceImpl->new] Failed to retrieve information 'metric_policies'.";
                error!("{} : {:?}", err_msg, e);
                panic!("{} : {:?}", err_msg, e)
            });

        let relabel_epoch_year: i32 = *get_system_config_info().relabel_epoch_year();

        Self::from_parts(metric_policies, relabel_epoch_year)
    }

    #[doc = "이미 적재된 정책 테이블과 라벨 대상 연도로 서비스를 구성해주는 함수"]
    pub fn from_parts(metric_policies: MetricPolicyConfig, relabel_epoch_year: i32) -> Self {
        SeriesServiceImpl {
            metric_policies,
            relabel_epoch_year,
        }
    }

    #[doc = r#"
        결측 보정 함수 - 모든 메트릭 컬럼의 결측값을 0.0 으로 채운다.

        차트 렌더링이 결측 구간을 처리하지 못하므로 의도적으로 손실이 있는
        정책(0 채움, null 전파 아님)을 그대로 유지한다. 두 번 적용해도
        결과가 같다 (멱등).
    "#]
    fn fill_missing_values(rows: &mut [TrendRow]) {
        for row in rows.iter_mut() {
            for value in row.metrics.values_mut() {
                if value.is_none() {
                    *value = Some(0.0);
                }
            }
        }
    }

    #[doc = r#"
        꼬리 윈도잉 함수 - 기존 순서 기준으로 마지막 `window` 개 행만 남긴다.

        날짜 기준 최신성 필터가 아니라 위치 기반 선택이다. 업스트림 쿼리의
        정렬 순서가 암묵적 계약이며, 여기서는 재정렬하지 않는다.
    "#]
    fn window_tail(mut rows: Vec<TrendRow>, window: usize) -> Vec<TrendRow> {
        if rows.len() > window {
            rows.split_off(rows.len() - window)
        } else {
            rows
        }
    }

    #[doc = r#"
        날짜 라벨 재작성 함수.

        `YYYYMMDD` 형식이면서 대상 연도(`relabel_epoch_year`)로 시작하는 날짜만
        두 줄 라벨 `"<연도> \n <월약어>-<일>"` 로 바꾼다. 그 외의 날짜는
        그대로 통과시킨다. 예) "20200315" → "2020 \n Mar-15"

        # Arguments
        * `date` - 원본 날짜 문자열

        # Returns
        * `String` - 표시용 라벨 (재작성 대상이 아니면 원본 그대로)
    "#]
    fn relabel_date(&self, date: &str) -> String {
        let epoch: String = self.relabel_epoch_year.to_string();

        let is_candidate: bool = epoch.len() == 4
            && date.len() == 8
            && date.starts_with(&epoch)
            && date.chars().all(|c| c.is_ascii_digit());

        if is_candidate {
            if let Ok(month) = date[4..6].parse::<usize>() {
                if (1..=12).contains(&month) {
                    return format!(
                        "{} \n {}-{}",
                        epoch,
                        MONTH_ABBREVIATIONS[month - 1],
                        &date[6..]
                    );
                }
            }
        }

        date.to_string()
    }

    #[doc = "중앙값 계산 - 짝수 길이면 가운데 두 값의 평균"]
    fn calculate_median(values: &[f64]) -> f64 {
        let mut sorted: Vec<f64> = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let mid: usize = sorted.len() / 2;

        if sorted.len() % 2 == 0 {
            (sorted[mid - 1] + sorted[mid]) / 2.0
        } else {
            sorted[mid]
        }
    }

    #[doc = "산술 평균 계산"]
    fn calculate_mean(values: &[f64]) -> f64 {
        values.iter().sum::<f64>() / values.len() as f64
    }

    #[doc = r#"
        Y축 범위를 결정하는 함수.

        정책에 `y_headroom` 이 있으면 0 ~ (데이터 최대값 + headroom) 으로 고정하고,
        없으면 최소/최대에 10% 패딩을 더한 범위를 사용한다.
    "#]
    fn calculate_y_range(values: &[f64], policy: &ResolvedMetricPolicy) -> (f64, f64) {
        let max_val: f64 = values.iter().copied().fold(f64::MIN, f64::max);

        if let Some(headroom) = policy.y_headroom {
            return (0.0, max_val + headroom);
        }

        let min_val: f64 = values.iter().copied().fold(f64::MAX, f64::min);
        let padding: f64 = ((max_val - min_val) * 0.1).max(0.1);

        (min_val - padding, max_val + padding)
    }
}

impl SeriesService for SeriesServiceImpl {
    #[doc = r#"
        원시 시계열을 차트에 넣을 수 있는 형태로 준비하는 함수.

        1. 결측 보정: 모든 결측 메트릭 값을 0.0 으로 채운다
        2. 윈도잉: 기존 순서 기준 마지막 `window` 개 행만 유지
        3. 라벨 재작성: 대상 연도의 날짜를 두 줄 표시 라벨로 변환해 `newdate` 에 기록
           (`date` 원본은 보존)

        # Arguments
        * `rows` - 업스트림 쿼리 순서 그대로의 원시 행들
        * `window` - 유지할 꼬리 행 개수

        # Returns
        * `PreparedSeries` - 준비가 끝난 시계열 (입력이 비어있으면 빈 시계열)
    "#]
    fn prepare(
        &self,
        rows: Vec<TrendRow>,
        window: usize,
    ) -> Result<PreparedSeries, anyhow::Error> {
        let mut rows: Vec<TrendRow> = rows;

        Self::fill_missing_values(&mut rows);

        let mut windowed: Vec<TrendRow> = Self::window_tail(rows, window);

        for row in windowed.iter_mut() {
            let relabeled: String = self.relabel_date(row.date());
            row.set_newdate(Some(relabeled));
        }

        Ok(PreparedSeries::new(windowed))
    }

    #[doc = r#"
        메트릭 컬럼 하나의 렌더링 입력을 해석하는 함수.

        1. 빈 시계열/존재하지 않는 컬럼은 렌더링 오류로 처리
        2. 정책 테이블에서 규격 한계(USL/LSL)와 중심 경향 종류를 해석
        3. 윈도 데이터 기준으로 중심 경향 값과 Y축 범위를 계산

        # Arguments
        * `prepared` - 준비가 끝난 시계열
        * `metric_name` - 차트를 그릴 메트릭 컬럼명

        # Returns
        * `ChartSpec` - 해석 완료된 렌더링 입력
        * `anyhow::Error` - 빈 시계열 또는 미존재 컬럼
    "#]
    fn chart_spec(
        &self,
        prepared: &PreparedSeries,
        metric_name: &str,
    ) -> Result<ChartSpec, anyhow::Error> {
        if prepared.is_empty() {
            return Err(anyhow!(
                "[SeriesServiceImpl->chart_spec] Cannot build a chart spec from an empty series"
            ));
        }

        if !prepared.has_metric(metric_name) {
            return Err(anyhow!(
                "[SeriesServiceImpl->chart_spec] Metric column not found in the series: {}",
                metric_name
            ));
        }

        let values: Vec<f64> = prepared.metric_values(metric_name);
        let policy: ResolvedMetricPolicy = self.metric_policies.resolve_policy(metric_name);

        let center_value: f64 = match policy.center {
            CentralTendency::Median => Self::calculate_median(&values),
            CentralTendency::Mean => Self::calculate_mean(&values),
        };

        let y_range: (f64, f64) = Self::calculate_y_range(&values, &policy);

        Ok(ChartSpec::new(
            metric_name.to_string(),
            policy.usl,
            policy.lsl,
            policy.center,
            center_value,
            y_range,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_policies() -> MetricPolicyConfig {
        MetricPolicyConfig::new(
            1.0,
            -1.0,
            vec![
                MetricPolicy::new(
                    String::from("variableA"),
                    7.0,
                    None,
                    CentralTendency::Median,
                    Some(2.0),
                ),
                MetricPolicy::new(
                    String::from("variableC"),
                    1.0,
                    Some(0.0),
                    CentralTendency::Median,
                    None,
                ),
            ],
        )
    }

    fn sample_service() -> SeriesServiceImpl {
        SeriesServiceImpl::from_parts(sample_policies(), 2020)
    }

    fn make_row(date: &str, value: Option<f64>) -> TrendRow {
        let mut metrics: BTreeMap<String, Option<f64>> = BTreeMap::new();
        metrics.insert(String::from("variableA"), value);

        TrendRow::new(String::from("Acme One"), date.to_string(), None, metrics)
    }

    #[test]
    fn missing_values_are_filled_with_zero() {
        let service: SeriesServiceImpl = sample_service();

        let rows: Vec<TrendRow> = vec![
            make_row("20200101", Some(3.0)),
            make_row("20200102", None),
            make_row("20200103", None),
        ];

        let prepared: PreparedSeries = service.prepare(rows, 30).unwrap();
        let values: Vec<f64> = prepared.metric_values("variableA");

        assert_eq!(values, vec![3.0, 0.0, 0.0]);
        assert!(
            prepared
                .rows()
                .iter()
                .all(|row| row.metrics().values().all(|v| v.is_some()))
        );
    }

    #[test]
    fn fill_is_idempotent() {
        let service: SeriesServiceImpl = sample_service();

        let rows: Vec<TrendRow> = vec![make_row("20200101", None), make_row("20200102", Some(1.5))];

        let once: PreparedSeries = service.prepare(rows, 30).unwrap();
        let twice: PreparedSeries = service.prepare(once.rows().clone(), 30).unwrap();

        assert_eq!(
            once.metric_values("variableA"),
            twice.metric_values("variableA")
        );
        assert_eq!(once.x_labels(), twice.x_labels());
    }

    #[test]
    fn windowing_keeps_the_positional_tail_in_order() {
        let service: SeriesServiceImpl = sample_service();

        let rows: Vec<TrendRow> = (1..=40)
            .map(|day| make_row(&format!("202001{:02}", ((day - 1) % 28) + 1), Some(day as f64)))
            .collect();

        let prepared: PreparedSeries = service.prepare(rows, 30).unwrap();

        assert_eq!(prepared.len(), 30);

        let values: Vec<f64> = prepared.metric_values("variableA");
        assert_eq!(values.first(), Some(&11.0));
        assert_eq!(values.last(), Some(&40.0));
    }

    #[test]
    fn short_series_survive_windowing_untouched() {
        let service: SeriesServiceImpl = sample_service();

        let rows: Vec<TrendRow> = (1..=5)
            .map(|day| make_row(&format!("2020010{}", day), Some(day as f64)))
            .collect();

        let prepared: PreparedSeries = service.prepare(rows, 30).unwrap();
        assert_eq!(prepared.len(), 5);
    }

    #[test]
    fn epoch_year_dates_get_the_two_line_label() {
        let service: SeriesServiceImpl = sample_service();

        assert_eq!(service.relabel_date("20200315"), "2020 \n Mar-15");
        assert_eq!(service.relabel_date("20201201"), "2020 \n Dec-01");
    }

    #[test]
    fn other_years_pass_through_unchanged() {
        let service: SeriesServiceImpl = sample_service();

        assert_eq!(service.relabel_date("20190315"), "20190315");
        assert_eq!(service.relabel_date("20210101"), "20210101");
        /* 형식이 깨진 값도 손대지 않는다 */
        assert_eq!(service.relabel_date("2020-03-15"), "2020-03-15");
    }

    #[test]
    fn relabeling_preserves_the_original_date_field() {
        let service: SeriesServiceImpl = sample_service();

        let rows: Vec<TrendRow> = vec![make_row("20200315", Some(1.0))];
        let prepared: PreparedSeries = service.prepare(rows, 30).unwrap();

        assert_eq!(prepared.rows()[0].date(), "20200315");
        assert_eq!(
            prepared.rows()[0].newdate().as_deref(),
            Some("2020 \n Mar-15")
        );
    }

    #[test]
    fn chart_spec_resolves_limits_from_the_policy_table() {
        let service: SeriesServiceImpl = sample_service();

        let rows: Vec<TrendRow> = vec![make_row("20200101", Some(2.0)), make_row("20200102", Some(4.0))];
        let prepared: PreparedSeries = service.prepare(rows, 30).unwrap();

        let spec: ChartSpec = service.chart_spec(&prepared, "variableA").unwrap();
        assert_eq!(*spec.usl(), 7.0);
        assert_eq!(*spec.lsl(), None);
        assert_eq!(*spec.center(), CentralTendency::Median);
        /* y_headroom 2.0 → 0 ~ (최대 4.0 + 2.0) */
        assert_eq!(*spec.y_range(), (0.0, 6.0));
    }

    #[test]
    fn chart_spec_uses_defaults_for_unregistered_metrics() {
        let service: SeriesServiceImpl = sample_service();

        let mut metrics: BTreeMap<String, Option<f64>> = BTreeMap::new();
        metrics.insert(String::from("variableZ"), Some(0.5));
        let rows: Vec<TrendRow> = vec![TrendRow::new(
            String::from("Acme One"),
            String::from("20200101"),
            None,
            metrics,
        )];

        let prepared: PreparedSeries = service.prepare(rows, 30).unwrap();
        let spec: ChartSpec = service.chart_spec(&prepared, "variableZ").unwrap();

        assert_eq!(*spec.usl(), 1.0);
        assert_eq!(*spec.lsl(), Some(-1.0));
        assert_eq!(*spec.center(), CentralTendency::Mean);
    }

    #[test]
    fn central_tendency_values_match_their_kind() {
        let service: SeriesServiceImpl = sample_service();

        /* variableA 는 median */
        let rows: Vec<TrendRow> = vec![
            make_row("20200101", Some(1.0)),
            make_row("20200102", Some(10.0)),
            make_row("20200103", Some(2.0)),
        ];
        let prepared: PreparedSeries = service.prepare(rows, 30).unwrap();
        let spec: ChartSpec = service.chart_spec(&prepared, "variableA").unwrap();
        assert_eq!(*spec.center_value(), 2.0);

        /* 짝수 길이 median 은 가운데 두 값의 평균 */
        assert_eq!(
            SeriesServiceImpl::calculate_median(&[1.0, 2.0, 3.0, 10.0]),
            2.5
        );

        assert_eq!(SeriesServiceImpl::calculate_mean(&[1.0, 2.0, 3.0]), 2.0);
    }

    #[test]
    fn empty_series_and_unknown_columns_are_spec_errors() {
        let service: SeriesServiceImpl = sample_service();

        let empty: PreparedSeries = service.prepare(Vec::new(), 30).unwrap();
        assert!(service.chart_spec(&empty, "variableA").is_err());

        let rows: Vec<TrendRow> = vec![make_row("20200101", Some(1.0))];
        let prepared: PreparedSeries = service.prepare(rows, 30).unwrap();
        assert!(service.chart_spec(&prepared, "no_such_metric").is_err());
    }
}
