use crate::common::*;

#[doc = "티켓 검색에 사용할 생성일 범위를 (시작일, 종료일) 문자열 쌍으로 반환해주는 함수"]
pub fn calc_search_window(lookback_days: i64) -> (String, String) {
    let now_local: DateTime<Local> = Local::now();
    let from_local: DateTime<Local> = now_local - chrono::Duration::days(lookback_days);

    (
        convert_date_to_ymd(from_local),
        convert_date_to_ymd(now_local),
    )
}

#[doc = ""]
pub fn convert_date_to_ymd<Tz>(time: DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    time.format("%Y-%m-%d").to_string()
}

#[doc = "로그 표기용 현재 로컬 시각 문자열"]
pub fn get_current_local_datetime_str() -> String {
    Local::now().format("%Y-%m-%dT%H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_window_is_ordered() {
        let (from, to) = calc_search_window(365);

        assert_eq!(from.len(), 10);
        assert_eq!(to.len(), 10);
        assert!(from.as_str() <= to.as_str());
    }

    #[test]
    fn ymd_format_matches_search_syntax() {
        let dt: DateTime<Utc> = Utc.with_ymd_and_hms(2020, 3, 15, 12, 0, 0).unwrap();
        assert_eq!(convert_date_to_ymd(dt), "2020-03-15");
    }
}
