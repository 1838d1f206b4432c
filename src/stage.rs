use std::fmt;

use log::{error, info};

use crate::models::BookId;

pub fn update(id: &BookId, stage: Stage) {
    match stage {
        Stage::Fail(err) => error!("{}: {}: {:#}", id, stage, err),
        other => info!("{}: {}", id, other),
    }
}

pub enum Stage<'a> {
    Opened,
    Closed,
    LoadedSummary,
    LoadedComments,
    SubmittedRating,
    SubmittedComment,
    Rejected,
    Fail(&'a anyhow::Error),
}

impl<'a> fmt::Display for Stage<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = match self {
            Self::Opened => "Opened",
            Self::Closed => "Closed",
            Self::LoadedSummary => "Loaded Summary",
            Self::LoadedComments => "Loaded Comments",
            Self::SubmittedRating => "Submitted Rating",
            Self::SubmittedComment => "Submitted Comment",
            Self::Rejected => "Rejected",
            Self::Fail(_) => "Fail",
        };

        f.write_str(r)
    }
}
