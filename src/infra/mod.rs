//! Transport and background plumbing: the REST client and the notification
//! poller built on top of it.

pub mod api;
pub mod poll;

pub use api::{
    BookingQuery, CategoryTools, Credentials, EarningsRange, NewBooking, NewMessage, NewReview,
    NewTool, Page, PageQuery, ProfileUpdate, Registration, ReviewPage, ReviewUpdate, ToolQuery,
    ToolShareClient, ToolSort, ToolUpdate,
};
pub use poll::{NotificationPoller, DEFAULT_POLL_INTERVAL};
