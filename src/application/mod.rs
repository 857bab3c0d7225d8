mod errors;
pub mod precheck;
mod status_tracker;
pub mod submission;

#[allow(unused_imports)]
pub use errors::{BackgroundTaskError, PrecheckError, SubmitError};
#[allow(unused_imports)]
pub use precheck::PrecheckDeps;
#[allow(unused_imports)]
pub use status_tracker::StatusTracker;
#[allow(unused_imports)]
pub use submission::{
    SubmitRequestCommand, SubmitResponse, Submission, SubmissionDeps, submit_request,
};
