//! Async client library for the ToolShare rental marketplace.
//!
//! - [`ToolShareClient`] wraps every REST endpoint with typed requests and
//!   responses, riding the server's cookie session.
//! - [`domain`] carries the marketplace model plus the local availability
//!   and price-quoting logic that mirrors the server's rules, so a UI can
//!   answer "is this free, and what would it cost" without a round trip.
//! - [`NotificationPoller`] keeps the unread-notification feed warm in the
//!   background.
//!
//! ```no_run
//! use toolshare_client::{Credentials, ToolShareClient};
//!
//! # async fn run() -> Result<(), toolshare_client::ClientError> {
//! let client = ToolShareClient::new()?;
//! let session = client
//!     .login(&Credentials::new("ines@example.com", "hunter2!"))
//!     .await?;
//!
//! let tools = client.get_tools(&Default::default()).await?;
//! println!("{} tools listed", tools.total);
//!
//! client.logout(session).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod domain;
pub mod error;
pub mod infra;

pub use config::{load_config, save_config, ClientConfig, DEFAULT_BASE_URL};
pub use domain::{
    booking_on, has_conflict, is_booked, quote, upcoming, Booking, BookingId, BookingRole,
    BookingStats, BookingStatus, Category, CategoryId, Conversation, DashboardStats, DateRange,
    EarningsReport, Message, Notification, NotificationFeed, NotificationKind, PickupDelivery,
    PickupMethod, PublicProfile, Quote, RentalPeriod, Review, ReviewKind, Session, Tool,
    ToolCondition, ToolId, ToolImage, TopTool, UserId, UserProfile,
};
pub use error::{ClientError, ValidationError};
pub use infra::{
    BookingQuery, CategoryTools, Credentials, EarningsRange, NewBooking, NewMessage, NewReview,
    NewTool, NotificationPoller, Page, PageQuery, ProfileUpdate, Registration, ReviewPage,
    ReviewUpdate, ToolQuery, ToolShareClient, ToolSort, ToolUpdate, DEFAULT_POLL_INTERVAL,
};
