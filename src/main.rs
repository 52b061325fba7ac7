/*
Author      : Seunghwan Shin
Create date : 2025-11-00
Description :

History     : 2025-11-00 Seunghwan Shin       # [v.1.0.0] first create
*/

mod common;
mod external_deps;
mod prelude;
use common::*;

mod repository;
use repository::{sqlserver_repository_impl::*, zendesk_repository_impl::*};

mod env_configuration;

mod traits;

mod enums;

mod model;
use model::configs::total_config::*;

mod dto;

mod utils_modules;
use utils_modules::logger_utils::*;

mod service;
use service::{
    chart_service_impl::*, query_service_impl::*, report_service_impl::*,
    resolve_service_impl::*, series_service_impl::*,
};

mod controller;
use controller::main_controller::*;

#[tokio::main]
async fn main() {
    /* 전역로거 설정 및 초기 설정 */
    dotenv().ok();
    set_global_logger();

    info!("Ticket chart report batch start!");

    /* SQL Server connection pool */
    let sql_conn: Arc<SqlServerRepositoryImpl> =
        Arc::new(SqlServerRepositoryImpl::new(get_rdb_config_info()).unwrap_or_else(|e| {
            let err_msg: &str = "[main] An issue occurred while initializing sql_conn.";
            error!("{} {:?}", err_msg, e);
            panic!("{} {:?}", err_msg, e)
        }));

    /* Zendesk API client */
    let zendesk_conn: Arc<ZendeskRepositoryImpl> =
        Arc::new(ZendeskRepositoryImpl::new(get_zendesk_config_info()).unwrap_or_else(|e| {
            let err_msg: &str = "[main] An issue occurred while initializing zendesk_conn.";
            error!("{} {:?}", err_msg, e);
            panic!("{} {:?}", err_msg, e)
        }));

    /* 의존 주입 */
    let resolve_service: ResolveServiceImpl = ResolveServiceImpl::new();
    let series_service: SeriesServiceImpl = SeriesServiceImpl::new();
    let query_service: QueryServiceImpl<SqlServerRepositoryImpl> =
        QueryServiceImpl::new(sql_conn);
    let chart_service: ChartServiceImpl = ChartServiceImpl::new();
    let report_service: ReportServiceImpl = ReportServiceImpl::new();

    let main_controller: MainController<
        ResolveServiceImpl,
        QueryServiceImpl<SqlServerRepositoryImpl>,
        SeriesServiceImpl,
        ChartServiceImpl,
        ReportServiceImpl,
        ZendeskRepositoryImpl,
    > = MainController::new(
        resolve_service,
        query_service,
        series_service,
        chart_service,
        report_service,
        zendesk_conn,
    );

    main_controller.main_task().await.unwrap_or_else(|e| {
        error!("{:?}", e);
        panic!("{:?}", e)
    });
}
