use crate::common::*;

use crate::dto::series::{density_sample::*, trend_row::*};

#[async_trait]
pub trait QueryService: Send + Sync {
    #[doc = "엔터티의 트렌드 시계열을 조회한다 - 연결 실패는 로그 후 빈 결과로 처리"]
    async fn get_trend_series(&self, sql_literal: &str) -> Result<Vec<TrendRow>, anyhow::Error>;

    #[doc = "엔터티의 밀도 표본을 조회한다 - 연결 실패는 로그 후 빈 결과로 처리"]
    async fn get_density_samples(
        &self,
        sql_literal: &str,
    ) -> Result<Vec<DensitySample>, anyhow::Error>;
}
