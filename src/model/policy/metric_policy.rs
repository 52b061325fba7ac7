use crate::common::*;

use crate::enums::central_tendency::*;

fn default_usl() -> f64 {
    1.0
}

fn default_lsl() -> f64 {
    -1.0
}

#[doc = r#"
    메트릭 컬럼 하나에 대한 차트 정책.

    * `usl` - 상한 규격선 값
    * `lsl` - 하한 규격선 값. 생략하면 하한선을 그리지 않는다
    * `center` - 중심 경향선 종류 (median / mean)
    * `y_headroom` - 지정 시 Y축을 0 ~ (데이터 최대값 + headroom) 으로 고정
"#]
#[derive(Debug, Clone, Deserialize, Serialize, Getters, new)]
#[getset(get = "pub")]
pub struct MetricPolicy {
    pub name: String,
    pub usl: f64,
    pub lsl: Option<f64>,
    pub center: CentralTendency,
    pub y_headroom: Option<f64>,
}

#[doc = r#"
    메트릭별 차트 정책 테이블 (`METRIC_POLICY_PATH` TOML).

    테이블에 없는 컬럼은 `default_usl` / `default_lsl` 과 mean 중심선으로 처리한다.
"#]
#[derive(Debug, Clone, Deserialize, Serialize, Getters, new)]
#[getset(get = "pub")]
pub struct MetricPolicyConfig {
    #[serde(default = "default_usl")]
    pub default_usl: f64,
    #[serde(default = "default_lsl")]
    pub default_lsl: f64,
    pub metric: Vec<MetricPolicy>,
}

#[doc = "정책 조회 결과 - 미등록 컬럼의 기본값까지 해석이 끝난 형태"]
#[derive(Debug, Clone, PartialEq, new)]
pub struct ResolvedMetricPolicy {
    pub usl: f64,
    pub lsl: Option<f64>,
    pub center: CentralTendency,
    pub y_headroom: Option<f64>,
}

impl MetricPolicyConfig {
    #[doc = "컬럼명으로 차트 정책을 해석해주는 함수 - 미등록 컬럼은 기본 한계값과 mean 사용"]
    pub fn resolve_policy(&self, metric_name: &str) -> ResolvedMetricPolicy {
        match self.metric.iter().find(|policy| policy.name == metric_name) {
            Some(policy) => ResolvedMetricPolicy::new(
                policy.usl,
                policy.lsl,
                policy.center,
                policy.y_headroom,
            ),
            None => ResolvedMetricPolicy::new(
                self.default_usl,
                Some(self.default_lsl),
                CentralTendency::Mean,
                None,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> MetricPolicyConfig {
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
                MetricPolicy::new(
                    String::from("variableD"),
                    1.0,
                    Some(0.0),
                    CentralTendency::Mean,
                    None,
                ),
            ],
        )
    }

    #[test]
    fn registered_metric_resolves_to_its_policy() {
        let config: MetricPolicyConfig = sample_config();

        let policy: ResolvedMetricPolicy = config.resolve_policy("variableA");
        assert_eq!(policy.usl, 7.0);
        assert_eq!(policy.lsl, None);
        assert_eq!(policy.center, CentralTendency::Median);

        let policy: ResolvedMetricPolicy = config.resolve_policy("variableC");
        assert_eq!(policy.usl, 1.0);
        assert_eq!(policy.lsl, Some(0.0));
    }

    #[test]
    fn unregistered_metric_falls_back_to_defaults() {
        let config: MetricPolicyConfig = sample_config();

        let policy: ResolvedMetricPolicy = config.resolve_policy("variableZ");
        assert_eq!(policy.usl, 1.0);
        assert_eq!(policy.lsl, Some(-1.0));
        assert_eq!(policy.center, CentralTendency::Mean);
        assert_eq!(policy.y_headroom, None);
    }

    #[test]
    fn policy_table_deserializes_from_toml() {
        let raw: &str = r#"
            [[metric]]
            name = "variableA"
            usl = 7.0
            center = "median"
            y_headroom = 2.0

            [[metric]]
            name = "variableC"
            usl = 1.0
            lsl = 0.0
            center = "median"
        "#;

        let config: MetricPolicyConfig = toml::from_str(raw).unwrap();
        assert_eq!(config.metric.len(), 2);
        assert_eq!(config.default_usl, 1.0);
        assert_eq!(config.default_lsl, -1.0);
        assert_eq!(config.resolve_policy("variableA").y_headroom, Some(2.0));
    }
}
