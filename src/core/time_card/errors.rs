use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BreakError {
    #[error("the break has already finished")]
    AlreadyFinished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TimeCardError {
    #[error("the time card has already finished")]
    AlreadyFinished,

    #[error("the time card is already on a break")]
    AlreadyOnABreak,

    #[error("the time card has multiple unfinished breaks")]
    MultipleUnfinishedBreaks,

    #[error("the time card is not currently on a break")]
    NotOnABreak,

    #[error("the time card is currently on a break")]
    OnABreak,

    #[error(transparent)]
    Break(#[from] BreakError),
}
