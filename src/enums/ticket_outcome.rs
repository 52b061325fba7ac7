#[doc = "티켓 한 건 처리의 종료 상태"]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketOutcome {
    Uploaded,
    Skipped,
    Failed,
}
