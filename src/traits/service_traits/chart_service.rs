use crate::common::*;

use crate::dto::series::{chart_spec::*, density_sample::*, prepared_series::*};

#[async_trait]
pub trait ChartService: Send + Sync {
    #[doc = "
        Render a prepared series as a single-page trend chart document
        # Arguments
        * `prepared` - Windowed and relabeled series
        * `chart_spec` - Resolved limits, central tendency and y-range
        * `entity_name` - Canonical entity name for the title
        * `output_path` - Path where the one-page PDF will be saved
    "]
    async fn render_trend_chart(
        &self,
        prepared: &PreparedSeries,
        chart_spec: &ChartSpec,
        entity_name: &str,
        output_path: &Path,
    ) -> anyhow::Result<()>;

    #[doc = "
        Render paired samples as a single-page density plot document
        with the fixed viewport and region-of-interest overlay
    "]
    async fn render_density_chart(
        &self,
        samples: &[DensitySample],
        entity_name: &str,
        output_path: &Path,
    ) -> anyhow::Result<()>;
}
