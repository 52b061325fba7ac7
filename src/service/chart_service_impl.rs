use crate::common::*;
use crate::traits::service_traits::chart_service::*;
use plotters::prelude::*;

use crate::dto::series::{chart_spec::*, density_sample::*, prepared_series::*};

use crate::enums::central_tendency::*;

use crate::utils_modules::pdf_utils::*;

const TREND_CHART_HEIGHT: u32 = 700;
const TREND_CHART_MIN_WIDTH: u32 = 1300;
/* 라벨 하나가 차지하는 가로폭 - 라벨 수에 비례해 캔버스를 넓혀 겹침을 막는다 */
const TREND_LABEL_SLOT_WIDTH: u32 = 46;

const DENSITY_CANVAS_SIZE: (u32, u32) = (900, 900);
const DENSITY_GRID_RESOLUTION: usize = 120;
/* 밀도 플롯의 고정 뷰포트와 관심 영역 */
const DENSITY_X_RANGE: (f64, f64) = (-2.0, 2.0);
const DENSITY_Y_RANGE: (f64, f64) = (1.0, 4.0);
const ROI_ORIGIN: (f64, f64) = (-1.0, 1.5);
const ROI_SIZE: (f64, f64) = (2.0, 2.0);
/* 최저 밀도 구간은 칠하지 않는다 */
const DENSITY_SHADE_FLOOR: f64 = 0.05;

#[derive(Debug, Clone, new)]
pub struct ChartServiceImpl;

impl ChartServiceImpl {
    #[doc = "Helper function to size the trend canvas from the label count"]
    fn calculate_canvas_width(label_count: usize) -> u32 {
        let dynamic_width: u32 = 260 + (label_count as u32) * TREND_LABEL_SLOT_WIDTH;

        dynamic_width.max(TREND_CHART_MIN_WIDTH)
    }

    #[doc = "렌더링이 끝난 RGB 프레임을 JPEG 로 인코딩해 단일 페이지 PDF 로 저장해주는 함수"]
    fn save_frame_as_document(
        frame: Vec<u8>,
        width: u32,
        height: u32,
        title: &str,
        output_path: &Path,
    ) -> anyhow::Result<()> {
        let mut jpeg_bytes: Vec<u8> = Vec::new();

        {
            let mut encoder =
                image::codecs::jpeg::JpegEncoder::new_with_quality(&mut jpeg_bytes, 90);
            encoder
                .encode(&frame, width, height, image::ColorType::Rgb8)
                .map_err(|e| {
                    anyhow!(
                        "[ChartServiceImpl->save_frame_as_document] Failed to encode the chart frame: {:?}",
                        e
                    )
                })?;
        }

        write_single_image_pdf(jpeg_bytes, width, height, title, output_path)
    }

    #[doc = r#"
        트렌드 차트 프레임을 그리는 함수 (동기 - spawn_blocking 내부에서 호출).

        1. 선 + 마커로 메트릭 시계열을 그린다
        2. USL / LSL(존재 시) / 중심 경향선을 수평 기준선으로 그린다
        3. 각 기준선은 범례에 표기한다
        4. X축 라벨은 준비 단계가 만든 표시 라벨을 그대로 사용한다
    "#]
    fn draw_trend_frame(
        x_labels: &[String],
        y_data: &[f64],
        chart_spec: &ChartSpec,
        title: &str,
        y_desc: &str,
        width: u32,
        height: u32,
    ) -> anyhow::Result<Vec<u8>> {
        let mut frame: Vec<u8> = vec![255u8; (width as usize) * (height as usize) * 3];

        {
            /* ---- 여기부터는 동기 코드 (plotters) ---- */
            let root = BitMapBackend::with_buffer(&mut frame, (width, height)).into_drawing_area();
            root.fill(&WHITE)?;

            let (y_min, y_max) = *chart_spec.y_range();
            let last_index: usize = x_labels.len() - 1;

            let mut chart = ChartBuilder::on(&root)
                .caption(title, ("sans-serif", 40).into_font().color(&BLACK))
                .margin(30)
                .x_label_area_size(70)
                .y_label_area_size(90)
                .build_cartesian_2d(0..last_index, y_min..y_max)?;

            let line_color: RGBColor = RGBColor(31, 119, 180);
            let grid_color: RGBColor = RGBColor(210, 210, 210);
            let text_color: RGBColor = RGBColor(40, 40, 40);

            chart
                .configure_mesh()
                .x_desc("Date")
                .y_desc(y_desc)
                .x_labels(x_labels.len().min(40))
                .y_labels(10)
                .disable_x_mesh()
                .axis_style(ShapeStyle::from(&RGBColor(120, 120, 120)).stroke_width(2))
                .light_line_style(ShapeStyle::from(&grid_color).stroke_width(1))
                .bold_line_style(ShapeStyle::from(&grid_color).stroke_width(2))
                .x_label_style(("sans-serif", 16).into_font().color(&text_color))
                .y_label_style(("sans-serif", 22).into_font().color(&text_color))
                .x_label_formatter(&|x| {
                    if *x < x_labels.len() {
                        x_labels[*x].clone()
                    } else {
                        String::new()
                    }
                })
                .draw()?;

            chart.draw_series(LineSeries::new(
                y_data.iter().enumerate().map(|(i, &y)| (i, y)),
                ShapeStyle::from(&line_color).stroke_width(3),
            ))?;

            chart.draw_series(
                y_data
                    .iter()
                    .enumerate()
                    .map(|(i, &y)| Circle::new((i, y), 4, line_color.filled())),
            )?;

            /* 상한 규격선 */
            chart
                .draw_series(LineSeries::new(
                    vec![(0usize, *chart_spec.usl()), (last_index, *chart_spec.usl())],
                    ShapeStyle::from(&BLACK).stroke_width(2),
                ))?
                .label("USL")
                .legend(|(x, y)| {
                    PathElement::new(
                        vec![(x, y), (x + 20, y)],
                        ShapeStyle::from(&BLACK).stroke_width(2),
                    )
                });

            /* 하한 규격선은 정책에 있을 때만 그린다 */
            if let Some(lsl) = *chart_spec.lsl() {
                chart
                    .draw_series(LineSeries::new(
                        vec![(0usize, lsl), (last_index, lsl)],
                        ShapeStyle::from(&BLACK).stroke_width(2),
                    ))?
                    .label("LSL")
                    .legend(|(x, y)| {
                        PathElement::new(
                            vec![(x, y), (x + 20, y)],
                            ShapeStyle::from(&BLACK).stroke_width(2),
                        )
                    });
            }

            let center_color: RGBColor = match chart_spec.center() {
                CentralTendency::Median => RGBColor(255, 165, 0),
                CentralTendency::Mean => RGBColor(34, 139, 34),
            };

            chart
                .draw_series(DashedLineSeries::new(
                    vec![
                        (0usize, *chart_spec.center_value()),
                        (last_index, *chart_spec.center_value()),
                    ],
                    8,
                    5,
                    ShapeStyle::from(&center_color).stroke_width(2),
                ))?
                .label(chart_spec.center().label())
                .legend(move |(x, y)| {
                    PathElement::new(
                        vec![(x, y), (x + 20, y)],
                        ShapeStyle::from(&center_color).stroke_width(2),
                    )
                });

            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .background_style(&WHITE.mix(0.8))
                .border_style(&BLACK)
                .label_font(("sans-serif", 18))
                .draw()?;

            root.present()?;
        }

        Ok(frame)
    }

    #[doc = "Scott 규칙 기반의 2차원 커널 대역폭 - 퇴화 표본 방어를 위해 하한을 둔다"]
    fn scott_bandwidth(values: &[f64]) -> f64 {
        let count: f64 = (values.len() as f64).max(1.0);
        let mean: f64 = values.iter().sum::<f64>() / count;
        let variance: f64 = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count;

        (variance.sqrt() * count.powf(-1.0 / 6.0)).max(1e-3)
    }

    #[doc = r#"
        고정 뷰포트 위에서 가우시안 커널 밀도를 격자로 평가하는 함수.

        셀 중심마다 모든 표본의 커널 기여를 합산한 뒤 최대값이 1.0 이 되도록
        정규화한다.
    "#]
    fn kernel_density_grid(samples: &[DensitySample], resolution: usize) -> Vec<Vec<f64>> {
        let sides: Vec<f64> = samples.iter().map(|s| s.side).collect();
        let heights: Vec<f64> = samples.iter().map(|s| s.height).collect();

        let bandwidth_x: f64 = Self::scott_bandwidth(&sides);
        let bandwidth_y: f64 = Self::scott_bandwidth(&heights);

        let cell_width: f64 = (DENSITY_X_RANGE.1 - DENSITY_X_RANGE.0) / resolution as f64;
        let cell_height: f64 = (DENSITY_Y_RANGE.1 - DENSITY_Y_RANGE.0) / resolution as f64;

        let mut grid: Vec<Vec<f64>> = vec![vec![0.0; resolution]; resolution];
        let mut max_density: f64 = 0.0;

        for (iy, grid_row) in grid.iter_mut().enumerate() {
            let y: f64 = DENSITY_Y_RANGE.0 + (iy as f64 + 0.5) * cell_height;

            for (ix, cell) in grid_row.iter_mut().enumerate() {
                let x: f64 = DENSITY_X_RANGE.0 + (ix as f64 + 0.5) * cell_width;

                let mut total: f64 = 0.0;
                for sample in samples {
                    let dx: f64 = (x - sample.side) / bandwidth_x;
                    let dy: f64 = (y - sample.height) / bandwidth_y;
                    total += (-0.5 * (dx * dx + dy * dy)).exp();
                }

                *cell = total;
                max_density = max_density.max(total);
            }
        }

        if max_density > 0.0 {
            for grid_row in grid.iter_mut() {
                for cell in grid_row.iter_mut() {
                    *cell /= max_density;
                }
            }
        }

        grid
    }

    #[doc = r#"
        밀도 플롯 프레임을 그리는 함수 (동기 - spawn_blocking 내부에서 호출).

        1. 커널 밀도 격자를 흰색 → 빨간색 그라데이션 셀로 칠한다
        2. 최저 밀도 구간은 칠하지 않는다
        3. 고정 좌표의 관심 영역 사각형을 테두리만 그린다
        4. 축은 고정 뷰포트로 클리핑된다
    "#]
    fn draw_density_frame(
        samples: &[DensitySample],
        title: &str,
        width: u32,
        height: u32,
    ) -> anyhow::Result<Vec<u8>> {
        let grid: Vec<Vec<f64>> = Self::kernel_density_grid(samples, DENSITY_GRID_RESOLUTION);

        let mut frame: Vec<u8> = vec![255u8; (width as usize) * (height as usize) * 3];

        {
            let root = BitMapBackend::with_buffer(&mut frame, (width, height)).into_drawing_area();
            root.fill(&WHITE)?;

            let mut chart = ChartBuilder::on(&root)
                .caption(title, ("sans-serif", 30).into_font().color(&BLACK))
                .margin(30)
                .x_label_area_size(60)
                .y_label_area_size(70)
                .build_cartesian_2d(
                    DENSITY_X_RANGE.0..DENSITY_X_RANGE.1,
                    DENSITY_Y_RANGE.0..DENSITY_Y_RANGE.1,
                )?;

            chart
                .configure_mesh()
                .x_desc("side")
                .y_desc("height")
                .x_labels(9)
                .y_labels(7)
                .light_line_style(ShapeStyle::from(&RGBColor(230, 230, 230)).stroke_width(1))
                .axis_style(ShapeStyle::from(&RGBColor(120, 120, 120)).stroke_width(2))
                .x_label_style(("sans-serif", 18).into_font())
                .y_label_style(("sans-serif", 18).into_font())
                .draw()?;

            let cell_width: f64 =
                (DENSITY_X_RANGE.1 - DENSITY_X_RANGE.0) / DENSITY_GRID_RESOLUTION as f64;
            let cell_height: f64 =
                (DENSITY_Y_RANGE.1 - DENSITY_Y_RANGE.0) / DENSITY_GRID_RESOLUTION as f64;

            let mut cells: Vec<Rectangle<(f64, f64)>> = Vec::new();

            for (iy, grid_row) in grid.iter().enumerate() {
                for (ix, &density) in grid_row.iter().enumerate() {
                    if density < DENSITY_SHADE_FLOOR {
                        continue;
                    }

                    let x0: f64 = DENSITY_X_RANGE.0 + ix as f64 * cell_width;
                    let y0: f64 = DENSITY_Y_RANGE.0 + iy as f64 * cell_height;
                    let shade: u8 = (235.0 * (1.0 - density)) as u8;

                    cells.push(Rectangle::new(
                        [(x0, y0), (x0 + cell_width, y0 + cell_height)],
                        RGBColor(255, shade, shade).filled(),
                    ));
                }
            }

            chart.draw_series(cells)?;

            /* 관심 영역 오버레이 */
            chart.draw_series(std::iter::once(Rectangle::new(
                [
                    ROI_ORIGIN,
                    (ROI_ORIGIN.0 + ROI_SIZE.0, ROI_ORIGIN.1 + ROI_SIZE.1),
                ],
                ShapeStyle::from(&BLACK).stroke_width(1),
            )))?;

            root.present()?;
        }

        Ok(frame)
    }
}

#[async_trait]
impl ChartService for ChartServiceImpl {
    async fn render_trend_chart(
        &self,
        prepared: &PreparedSeries,
        chart_spec: &ChartSpec,
        entity_name: &str,
        output_path: &Path,
    ) -> anyhow::Result<()> {
        let x_labels: Vec<String> = prepared.x_labels();
        let y_data: Vec<f64> = prepared.metric_values(chart_spec.metric_name());

        if x_labels.len() != y_data.len() {
            return Err(anyhow!(
                "[ChartServiceImpl->render_trend_chart] X labels and Y data must have the same length: {} vs {}",
                x_labels.len(),
                y_data.len()
            ));
        }

        if x_labels.is_empty() {
            return Err(anyhow!(
                "[ChartServiceImpl->render_trend_chart] Cannot generate chart with empty data"
            ));
        }

        /* Create parent directory if it doesn't exist */
        if let Some(parent) = output_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let title: String = format!("{} - {} Chart", entity_name, chart_spec.metric_name());
        let y_desc: String = format!("Average {} per Event", chart_spec.metric_name());
        let chart_spec: ChartSpec = chart_spec.clone();
        let output_path_buf: PathBuf = output_path.to_path_buf();

        let width: u32 = Self::calculate_canvas_width(x_labels.len());

        let handle: tokio::task::JoinHandle<Result<(), anyhow::Error>> =
            tokio::task::spawn_blocking(move || {
                let frame: Vec<u8> = Self::draw_trend_frame(
                    &x_labels,
                    &y_data,
                    &chart_spec,
                    &title,
                    &y_desc,
                    width,
                    TREND_CHART_HEIGHT,
                )?;

                Self::save_frame_as_document(
                    frame,
                    width,
                    TREND_CHART_HEIGHT,
                    &title,
                    &output_path_buf,
                )
            });

        let drawing_result: Result<(), anyhow::Error> = handle.await.context(
            "[ChartServiceImpl->render_trend_chart] blocking task join failed (panic/cancelled)",
        )?;

        drawing_result
            .context("[ChartServiceImpl->render_trend_chart] drawing/present failed")?;

        info!("Trend chart generated successfully: {:?}", output_path);

        Ok(())
    }

    async fn render_density_chart(
        &self,
        samples: &[DensitySample],
        entity_name: &str,
        output_path: &Path,
    ) -> anyhow::Result<()> {
        if samples.is_empty() {
            return Err(anyhow!(
                "[ChartServiceImpl->render_density_chart] Cannot generate a density plot with empty data"
            ));
        }

        if let Some(parent) = output_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let title: String = format!("{} - Density Plot", entity_name);
        let samples: Vec<DensitySample> = samples.to_vec();
        let output_path_buf: PathBuf = output_path.to_path_buf();

        let (width, height) = DENSITY_CANVAS_SIZE;

        let handle: tokio::task::JoinHandle<Result<(), anyhow::Error>> =
            tokio::task::spawn_blocking(move || {
                let frame: Vec<u8> = Self::draw_density_frame(&samples, &title, width, height)?;

                Self::save_frame_as_document(frame, width, height, &title, &output_path_buf)
            });

        let drawing_result: Result<(), anyhow::Error> = handle.await.context(
            "[ChartServiceImpl->render_density_chart] blocking task join failed (panic/cancelled)",
        )?;

        drawing_result
            .context("[ChartServiceImpl->render_density_chart] drawing/present failed")?;

        info!("Density plot generated successfully: {:?}", output_path);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::model::policy::metric_policy::*;
    use crate::service::series_service_impl::*;
    use crate::traits::service_traits::series_service::*;
    use crate::utils_modules::pdf_utils::read_document_title;

    fn sample_series_service() -> SeriesServiceImpl {
        SeriesServiceImpl::from_parts(
            MetricPolicyConfig::new(
                1.0,
                -1.0,
                vec![MetricPolicy::new(
                    String::from("variableA"),
                    7.0,
                    None,
                    CentralTendency::Median,
                    Some(2.0),
                )],
            ),
            2020,
        )
    }

    fn forty_row_series() -> Vec<crate::dto::series::trend_row::TrendRow> {
        (0..40)
            .map(|i| {
                let mut metrics: BTreeMap<String, Option<f64>> = BTreeMap::new();
                metrics.insert(String::from("variableA"), Some(1.0 + (i % 5) as f64));

                crate::dto::series::trend_row::TrendRow::new(
                    String::from("Acme One"),
                    format!("2020{:02}{:02}", (i / 28) + 3, (i % 28) + 1),
                    None,
                    metrics,
                )
            })
            .collect()
    }

    #[tokio::test]
    async fn trend_render_produces_one_page_titled_for_the_entity() {
        let series_service: SeriesServiceImpl = sample_series_service();
        let chart_service: ChartServiceImpl = ChartServiceImpl::new();

        let prepared = series_service.prepare(forty_row_series(), 30).unwrap();
        assert_eq!(prepared.len(), 30);

        let spec = series_service.chart_spec(&prepared, "variableA").unwrap();

        let scratch = tempfile::tempdir().unwrap();
        let output: PathBuf = scratch.path().join("AcmeOneT.pdf");

        chart_service
            .render_trend_chart(&prepared, &spec, "Acme One", &output)
            .await
            .unwrap();

        let doc = lopdf::Document::load(&output).unwrap();
        assert_eq!(doc.get_pages().len(), 1);

        let title: String = read_document_title(&output).unwrap().unwrap();
        assert!(title.contains("Acme One"));
    }

    #[tokio::test]
    async fn density_render_produces_a_single_page_document() {
        let chart_service: ChartServiceImpl = ChartServiceImpl::new();

        let samples: Vec<DensitySample> = (0..50)
            .map(|i| {
                DensitySample::new(
                    -0.5 + (i % 10) as f64 * 0.1,
                    2.0 + (i % 7) as f64 * 0.15,
                )
            })
            .collect();

        let scratch = tempfile::tempdir().unwrap();
        let output: PathBuf = scratch.path().join("AcmeOneD.pdf");

        chart_service
            .render_density_chart(&samples, "Acme One", &output)
            .await
            .unwrap();

        let doc = lopdf::Document::load(&output).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[tokio::test]
    async fn empty_series_is_a_render_error() {
        let chart_service: ChartServiceImpl = ChartServiceImpl::new();

        let empty = PreparedSeries::new(Vec::new());
        let spec = ChartSpec::new(
            String::from("variableA"),
            7.0,
            None,
            CentralTendency::Median,
            0.0,
            (0.0, 1.0),
        );

        let scratch = tempfile::tempdir().unwrap();
        let output: PathBuf = scratch.path().join("empty.pdf");

        assert!(
            chart_service
                .render_trend_chart(&empty, &spec, "Acme One", &output)
                .await
                .is_err()
        );
        assert!(
            chart_service
                .render_density_chart(&[], "Acme One", &output)
                .await
                .is_err()
        );
    }

    #[test]
    fn canvas_width_grows_with_the_label_count() {
        assert_eq!(ChartServiceImpl::calculate_canvas_width(5), 1300);
        assert!(
            ChartServiceImpl::calculate_canvas_width(60)
                > ChartServiceImpl::calculate_canvas_width(30)
        );
    }
}
