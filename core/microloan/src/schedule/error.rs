use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("ScheduleError - IndexOutOfRange: period {index} of {term_in_periods}")]
    IndexOutOfRange { index: u8, term_in_periods: u8 },
    #[error("ScheduleError - NoPaymentDue")]
    NoPaymentDue,
    #[error("ScheduleError - NoPeriods")]
    NoPeriods,
    #[error(
        "ScheduleError - InconsistentPeriods: {pending_payments} pending of {term_in_periods}"
    )]
    InconsistentPeriods {
        pending_payments: u8,
        term_in_periods: u8,
    },
    #[error("ScheduleError - TimestampOverflow")]
    TimestampOverflow,
}
