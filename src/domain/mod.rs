//! Domain logic for the rental marketplace lives here.

pub mod availability;
pub mod entities;
pub mod pricing;
pub mod session;

pub use availability::{booking_on, has_conflict, is_booked, upcoming, DateRange};
pub use entities::{
    Booking, BookingId, BookingRole, BookingStats, BookingStatus, Category, CategoryId,
    Conversation, DashboardStats, EarningsReport, Message, Notification, NotificationFeed,
    NotificationKind, PickupDelivery, PickupMethod, PublicProfile, Review, ReviewKind, Tool,
    ToolCondition, ToolId, ToolImage, TopTool, UserId, UserProfile,
};
pub use pricing::{quote, Quote, RentalPeriod, BILLABLE_HOURS_PER_DAY, WEEKLY_DISCOUNT};
pub use session::Session;
