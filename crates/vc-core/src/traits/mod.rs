//! Ports - traits the infrastructure layer implements

mod clock;
mod repositories;

pub use clock::{Clock, ManualClock, SystemClock};
pub use repositories::{
    IdentityRepository, RepoResult, SessionRepository, SummaryRepository, VoiceStore,
    VoiceUnitOfWork,
};
