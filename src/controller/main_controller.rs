use crate::common::*;

use crate::utils_modules::time_utils::*;

use crate::model::configs::{system_config::*, total_config::*};

use crate::dto::{
    resolved_entity::*,
    series::{chart_spec::*, density_sample::*, prepared_series::*, trend_row::*},
    ticket::ticket_info::*,
};

use crate::enums::ticket_outcome::*;

use crate::traits::{
    repository_traits::ticket_repository::*,
    service_traits::{
        chart_service::*, query_service::*, report_service::*, resolve_service::*,
        series_service::*,
    },
};

const REPORT_COMMENT_BODY: &str = "Uploaded Trend Charts and Density Plots";

#[derive(new)]
pub struct MainController<R, Q, S, C, A, T>
where
    R: ResolveService,
    Q: QueryService,
    S: SeriesService,
    C: ChartService,
    A: ReportService,
    T: TicketRepository,
{
    resolve_service: R,
    query_service: Q,
    series_service: S,
    chart_service: C,
    report_service: A,
    ticket_repo: Arc<T>,
}

impl<R, Q, S, C, A, T> MainController<R, Q, S, C, A, T>
where
    R: ResolveService,
    Q: QueryService,
    S: SeriesService,
    C: ChartService,
    A: ReportService,
    T: TicketRepository,
{
    #[doc = r#"
        배치 전체를 수행하는 핵심 함수.

        1. 설정된 조회 기간으로 티켓을 검색한다
           (검색 실패는 "티켓 없음" 으로 처리하고 배치를 정상 종료)
        2. 티켓을 순서대로 한 건씩 처리한다 - 병렬 처리 없음
        3. 한 티켓의 실패가 나머지 티켓 처리를 중단시키지 않는다
        4. 종료 시 업로드/건너뜀/실패 건수를 요약 로그로 남긴다

        # Returns
        * `anyhow::Result<()>` - 정상 종료 시 Ok(())
    "#]
    pub async fn main_task(&self) -> anyhow::Result<()> {
        let system_config: &'static SystemConfig = get_system_config_info();

        let (created_from, created_to) =
            calc_search_window(*system_config.search_lookback_days());

        info!(
            "Searching tickets created between {} and {}",
            created_from, created_to
        );

        let tickets: Vec<TicketInfo> = match self
            .ticket_repo
            .search_tickets(&created_from, &created_to)
            .await
        {
            Ok(tickets) => tickets,
            Err(e) => {
                /* 연결 실패는 빈 배치로 처리한다 - 배치 자체를 중단시키지 않음 */
                error!("[MainController->main_task] {:?}", e);
                Vec::new()
            }
        };

        info!("{} tickets matched the search filter", tickets.len());

        let mut uploaded_cnt: usize = 0;
        let mut skipped_cnt: usize = 0;
        let mut failed_cnt: usize = 0;

        for ticket in &tickets {
            info!("Processing ticket {}", ticket.id());

            match self.process_ticket(ticket, system_config).await {
                TicketOutcome::Uploaded => uploaded_cnt += 1,
                TicketOutcome::Skipped => skipped_cnt += 1,
                TicketOutcome::Failed => failed_cnt += 1,
            }
        }

        info!(
            "Report batch finished at {} - uploaded: {}, skipped: {}, failed: {}",
            get_current_local_datetime_str(),
            uploaded_cnt,
            skipped_cnt,
            failed_cnt
        );

        Ok(())
    }

    #[doc = r#"
        티켓 한 건을 처리하고 종료 상태를 반환하는 함수.

        파이프라인의 어느 단계에서든 오류가 나면 해당 티켓만 Failed 로
        기록하고 다음 티켓으로 넘어간다. 중간 산출물은 성공/실패와 무관하게
        최선 노력으로 정리하지만, 파이프라인 도중 실패 시 정리가 보장되지는
        않는다 (스크래치 디렉토리는 소모성으로 취급).
    "#]
    async fn process_ticket(
        &self,
        ticket: &TicketInfo,
        system_config: &SystemConfig,
    ) -> TicketOutcome {
        let mut artifacts: Vec<PathBuf> = Vec::new();

        let outcome: TicketOutcome = match self
            .run_report_pipeline(ticket, system_config, &mut artifacts)
            .await
        {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(
                    "[MainController->process_ticket] Ticket {} failed: {:?}",
                    ticket.id(),
                    e
                );
                TicketOutcome::Failed
            }
        };

        self.cleanup_artifacts(&artifacts).await;

        outcome
    }

    #[doc = r#"
        티켓 한 건의 보고 파이프라인.

        해석 → 데이터 조회 → 시계열 준비 → 차트 2종 렌더링 → 병합 →
        래스터화 → 세로 결합 → 업로드 → 티켓 코멘트 순서로 수행한다.

        * 참조 매칭이 없거나 조회 결과가 비어있으면 Skipped
        * 필드 형식 오류, 중복 라벨, 렌더링/업로드 오류는 Err 로 전파 (Failed)
    "#]
    async fn run_report_pipeline(
        &self,
        ticket: &TicketInfo,
        system_config: &SystemConfig,
        artifacts: &mut Vec<PathBuf>,
    ) -> anyhow::Result<TicketOutcome> {
        let entity_field_id: u64 = *get_zendesk_config_info().entity_field_id();

        /* 1. 엔터티 해석 */
        let raw_field: &str = ticket.custom_field_value(entity_field_id).ok_or_else(|| {
            anyhow!(
                "[MainController->run_report_pipeline] Ticket {} has no entity custom field ({})",
                ticket.id(),
                entity_field_id
            )
        })?;

        let ticket_label: String = self.resolve_service.extract_ticket_label(raw_field)?;

        let entity: ResolvedEntity = match self.resolve_service.resolve(&ticket_label)? {
            Some(entity) => entity,
            None => {
                info!(
                    "Ticket {}: label '{}' has no reference match - skipped",
                    ticket.id(),
                    ticket_label
                );
                return Ok(TicketOutcome::Skipped);
            }
        };

        /* 2. 데이터 조회 - 빈 결과는 "데이터 없음" 으로 보고 건너뛴다 */
        let trend_rows: Vec<TrendRow> =
            self.query_service.get_trend_series(entity.sql_literal()).await?;

        if trend_rows.is_empty() {
            info!(
                "Ticket {}: no trend data for {} - skipped",
                ticket.id(),
                entity.canonical_name()
            );
            return Ok(TicketOutcome::Skipped);
        }

        let density_samples: Vec<DensitySample> = self
            .query_service
            .get_density_samples(entity.sql_literal())
            .await?;

        if density_samples.is_empty() {
            info!(
                "Ticket {}: no density data for {} - skipped",
                ticket.id(),
                entity.canonical_name()
            );
            return Ok(TicketOutcome::Skipped);
        }

        /* 3. 시계열 준비 */
        let prepared: PreparedSeries = self
            .series_service
            .prepare(trend_rows, *system_config.chart_window_size())?;

        let chart_spec: ChartSpec = self
            .series_service
            .chart_spec(&prepared, system_config.trend_metric())?;

        /* 4. 산출물 경로 - 정식 이름에서 만든 파일 토큰으로 결정적으로 명명 */
        let scratch_dir: PathBuf = PathBuf::from(system_config.scratch_dir());
        let trend_pdf: PathBuf = scratch_dir.join(format!("{}T.pdf", entity.file_token()));
        let density_pdf: PathBuf = scratch_dir.join(format!("{}D.pdf", entity.file_token()));
        let merged_pdf: PathBuf = scratch_dir.join(format!("{}.pdf", entity.file_token()));
        let final_image: PathBuf = scratch_dir.join(format!("{}out.png", entity.file_token()));

        artifacts.extend([
            trend_pdf.clone(),
            density_pdf.clone(),
            merged_pdf.clone(),
            final_image.clone(),
        ]);

        /* 5. 차트 렌더링 */
        self.chart_service
            .render_trend_chart(&prepared, &chart_spec, entity.canonical_name(), &trend_pdf)
            .await?;

        self.chart_service
            .render_density_chart(&density_samples, entity.canonical_name(), &density_pdf)
            .await?;

        /* 6. 병합 → 래스터화 → 세로 결합 */
        self.report_service
            .merge_documents(
                &[trend_pdf, density_pdf],
                &merged_pdf,
                entity.canonical_name(),
            )
            .await?;

        let page_images = self.report_service.rasterize_document(&merged_pdf).await?;

        self.report_service
            .stack_pages_vertically(page_images, &final_image)
            .await?;

        /* 7. 업로드 및 티켓 갱신 */
        let upload_token: String = self.ticket_repo.upload_attachment(&final_image).await?;

        self.ticket_repo
            .add_ticket_comment(*ticket.id(), REPORT_COMMENT_BODY, &upload_token)
            .await?;

        info!(
            "Ticket {}: report for {} uploaded",
            ticket.id(),
            entity.canonical_name()
        );

        Ok(TicketOutcome::Uploaded)
    }

    #[doc = "중간 산출물을 최선 노력으로 삭제해주는 함수 - 실패는 경고 로그만 남긴다"]
    async fn cleanup_artifacts(&self, artifacts: &[PathBuf]) {
        for path in artifacts {
            match tokio::fs::remove_file(path).await {
                Ok(_) => info!("Removed intermediate artifact {:?}", path),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    warn!(
                        "[MainController->cleanup_artifacts] Failed to remove {:?}: {:?}",
                        path, e
                    );
                }
            }
        }
    }
}
