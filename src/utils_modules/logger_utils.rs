use crate::common::*;

#[doc = "로그 라인 공통 포맷 - 시각/레벨/모듈 순으로 기록"]
fn custom_log_format(
    w: &mut dyn Write,
    now: &mut DeferredNow,
    record: &Record,
) -> Result<(), std::io::Error> {
    write!(
        w,
        "[{}] [{}] [{}] {}",
        now.now().format("%Y-%m-%d %H:%M:%S%.3f"),
        record.level(),
        record.module_path().unwrap_or("unknown"),
        record.args()
    )
}

#[doc = r#"
    전역 로거를 설정해주는 함수.

    1. `logs/` 디렉토리 하위에 일 단위로 로테이션되는 로그 파일을 생성
    2. 최근 30개의 로그 파일만 보관하고 나머지는 정리
    3. 로그 레벨은 info 를 기본으로 사용

    # Panics
    로거 초기화에 실패한 경우 애플리케이션 종료
"#]
pub fn set_global_logger() {
    Logger::try_with_str("info")
        .expect("[logger_utils->set_global_logger] Invalid log level specification")
        .log_to_file(
            FileSpec::default()
                .directory("logs")
                .basename("ticket_chart_reporter"),
        )
        .rotate(
            Criterion::Age(Age::Day),
            Naming::Timestamps,
            Cleanup::KeepLogFiles(30),
        )
        .format(custom_log_format)
        .print_message()
        .start()
        .expect("[logger_utils->set_global_logger] Failed to initialize the global logger");
}
