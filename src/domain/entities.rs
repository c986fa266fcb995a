use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

/// Server-assigned identifier for a user account.
pub type UserId = i64;
/// Server-assigned identifier for a tool listing.
pub type ToolId = i64;
/// Server-assigned identifier for a booking.
pub type BookingId = i64;
/// Server-assigned identifier for a category.
pub type CategoryId = i64;

/// What other members see of a user.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PublicProfile {
    pub id: UserId,
    pub username: String,
    pub full_name: String,
    pub location: Option<String>,
    pub profile_picture_url: Option<String>,
    pub is_verified: bool,
    pub created_at: Option<OffsetDateTime>,
}

/// The signed-in user's own account, including contact details.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub phone_number: Option<String>,
    pub location: Option<String>,
    pub profile_picture_url: Option<String>,
    pub is_verified: bool,
    pub created_at: Option<OffsetDateTime>,
    pub updated_at: Option<OffsetDateTime>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: Option<String>,
    pub icon_url: Option<String>,
    /// Number of available tools in the category. Only reported by the
    /// category endpoints, not when a category is embedded in a tool.
    pub tool_count: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolImage {
    pub id: i64,
    pub tool_id: ToolId,
    pub image_url: String,
    pub is_primary: bool,
    pub created_at: Option<OffsetDateTime>,
}

/// A tool listing as returned by the API.
///
/// `condition` and `pickup_delivery_options` are kept as the server's raw
/// strings; the typed [`ToolCondition`] and [`PickupDelivery`] enums are for
/// composing create and update requests.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    pub id: ToolId,
    pub owner_id: UserId,
    pub category_id: CategoryId,
    pub name: String,
    pub brand_model: Option<String>,
    pub description: Option<String>,
    pub condition: Option<String>,
    pub price_per_hour: Option<f64>,
    pub price_per_day: f64,
    pub price_per_week: Option<f64>,
    pub security_deposit: f64,
    pub pickup_delivery_options: Option<String>,
    pub is_available: bool,
    pub owner: Option<PublicProfile>,
    pub category: Option<Category>,
    pub images: Vec<ToolImage>,
    pub average_rating: f64,
    pub review_count: u32,
    pub created_at: Option<OffsetDateTime>,
    pub updated_at: Option<OffsetDateTime>,
}

impl Tool {
    /// The image flagged as primary, falling back to the first image.
    /// At most one image carries the primary flag.
    pub fn primary_image(&self) -> Option<&ToolImage> {
        self.images
            .iter()
            .find(|image| image.is_primary)
            .or_else(|| self.images.first())
    }
}

/// Tool condition as offered on the listing form.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToolCondition {
    Excellent,
    #[serde(rename = "Very Good")]
    VeryGood,
    #[default]
    Good,
    Fair,
}

impl ToolCondition {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolCondition::Excellent => "Excellent",
            ToolCondition::VeryGood => "Very Good",
            ToolCondition::Good => "Good",
            ToolCondition::Fair => "Fair",
        }
    }
}

/// Handover options advertised on a listing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickupDelivery {
    #[default]
    #[serde(rename = "Pickup only")]
    PickupOnly,
    #[serde(rename = "Delivery available")]
    DeliveryAvailable,
    #[serde(rename = "Pickup or delivery")]
    PickupOrDelivery,
}

impl PickupDelivery {
    pub fn as_str(&self) -> &'static str {
        match self {
            PickupDelivery::PickupOnly => "Pickup only",
            PickupDelivery::DeliveryAvailable => "Delivery available",
            PickupDelivery::PickupOrDelivery => "Pickup or delivery",
        }
    }
}

/// Handover method chosen for a single booking.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PickupMethod {
    #[default]
    Pickup,
    Delivery,
}

impl PickupMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PickupMethod::Pickup => "pickup",
            PickupMethod::Delivery => "delivery",
        }
    }
}

/// Lifecycle state of a booking. The server owns every transition; the
/// client mirrors the table to decide which actions to offer inline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Active,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Active => "active",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    /// Only confirmed and active bookings make dates unavailable; pending,
    /// completed and cancelled never block.
    pub fn blocks_availability(&self) -> bool {
        matches!(self, BookingStatus::Confirmed | BookingStatus::Active)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::Completed | BookingStatus::Cancelled)
    }

    /// The transition table the server enforces.
    pub fn can_become(&self, next: BookingStatus) -> bool {
        use BookingStatus::*;
        matches!(
            (*self, next),
            (Pending, Confirmed | Cancelled)
                | (Confirmed, Active | Cancelled)
                | (Active, Completed | Cancelled)
        )
    }

    /// The transitions each party may propose from this state, matching the
    /// actions shown on a booking card: the lender accepts or declines a
    /// request and marks the rental active then completed; the borrower can
    /// withdraw a pending request.
    pub fn proposable_by(&self, role: BookingRole) -> &'static [BookingStatus] {
        use BookingStatus::*;
        match (role, self) {
            (BookingRole::Lender, Pending) => &[Confirmed, Cancelled],
            (BookingRole::Lender, Confirmed) => &[Active],
            (BookingRole::Lender, Active) => &[Completed],
            (BookingRole::Borrower, Pending) => &[Cancelled],
            _ => &[],
        }
    }
}

/// Which side of a booking a user is on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingRole {
    Borrower,
    Lender,
}

impl BookingRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingRole::Borrower => "borrower",
            BookingRole::Lender => "lender",
        }
    }
}

/// A rental agreement over an inclusive date range.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub tool_id: ToolId,
    pub borrower_id: UserId,
    pub lender_id: UserId,
    pub start_date: Date,
    pub end_date: Date,
    pub total_price: f64,
    /// Deposit snapshot taken from the tool at booking time.
    pub security_deposit: f64,
    pub status: BookingStatus,
    pub pickup_delivery_method: Option<String>,
    pub tool: Option<Tool>,
    pub borrower: Option<PublicProfile>,
    pub lender: Option<PublicProfile>,
    pub created_at: Option<OffsetDateTime>,
    pub updated_at: Option<OffsetDateTime>,
}

impl Booking {
    /// True if the date falls inside `[start_date, end_date]`, both
    /// boundaries included.
    pub fn covers(&self, date: Date) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

/// Whether a review rates the tool or the counterparty.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewKind {
    ToolReview,
    UserReview,
}

impl ReviewKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewKind::ToolReview => "tool_review",
            ReviewKind::UserReview => "user_review",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: i64,
    pub booking_id: BookingId,
    pub reviewer_id: UserId,
    pub reviewee_id: UserId,
    pub tool_id: ToolId,
    /// 1 through 5.
    pub rating: u8,
    pub comment: Option<String>,
    pub kind: ReviewKind,
    pub reviewer: Option<PublicProfile>,
    pub reviewee: Option<PublicProfile>,
    pub created_at: Option<OffsetDateTime>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub booking_id: BookingId,
    pub sender_id: UserId,
    pub receiver_id: UserId,
    pub content: String,
    pub is_read: bool,
    pub sender: Option<PublicProfile>,
    pub receiver: Option<PublicProfile>,
    pub created_at: Option<OffsetDateTime>,
}

/// One thread in the inbox: a booking, the other party, and unread state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub booking_id: BookingId,
    pub other_user: Option<PublicProfile>,
    pub tool: Option<Tool>,
    pub last_message_at: Option<OffsetDateTime>,
    pub unread_count: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    BookingRequest,
    BookingConfirmed,
    BookingCancelled,
    NewMessage,
    NewReview,
    /// Kinds this client version does not know about yet.
    #[serde(other)]
    Other,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: Option<OffsetDateTime>,
}

/// The notification list together with the server's unread tally.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NotificationFeed {
    pub notifications: Vec<Notification>,
    pub unread_count: u32,
}

/// Earnings analytics for the signed-in lender over a chosen range.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EarningsReport {
    pub total_earnings: f64,
    pub monthly_earnings: f64,
    pub top_tools: Vec<TopTool>,
    pub booking_stats: BookingStats,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TopTool {
    pub id: ToolId,
    pub name: String,
    pub category: String,
    pub earnings: f64,
    pub bookings: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BookingStats {
    pub active_tools: u32,
    pub avg_daily_rate: f64,
}

/// Headline numbers for the lender dashboard.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_earnings: f64,
    pub active_listings: u32,
    pub total_bookings: u32,
    pub average_rating: f64,
    pub pending_requests: u32,
    pub unread_messages: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn image(id: i64, is_primary: bool) -> ToolImage {
        ToolImage {
            id,
            tool_id: 1,
            image_url: format!("https://img.example/{id}.jpg"),
            is_primary,
            created_at: None,
        }
    }

    fn tool_with_images(images: Vec<ToolImage>) -> Tool {
        Tool {
            id: 1,
            owner_id: 7,
            category_id: 2,
            name: "Cordless Drill".to_string(),
            brand_model: None,
            description: None,
            condition: None,
            price_per_hour: None,
            price_per_day: 12.0,
            price_per_week: None,
            security_deposit: 0.0,
            pickup_delivery_options: None,
            is_available: true,
            owner: None,
            category: None,
            images,
            average_rating: 0.0,
            review_count: 0,
            created_at: None,
            updated_at: None,
        }
    }

    fn booking(start: Date, end: Date) -> Booking {
        Booking {
            id: 1,
            tool_id: 1,
            borrower_id: 3,
            lender_id: 7,
            start_date: start,
            end_date: end,
            total_price: 36.0,
            security_deposit: 0.0,
            status: BookingStatus::Confirmed,
            pickup_delivery_method: None,
            tool: None,
            borrower: None,
            lender: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn transition_table_matches_server() {
        use BookingStatus::*;
        assert!(Pending.can_become(Confirmed));
        assert!(Pending.can_become(Cancelled));
        assert!(!Pending.can_become(Active));
        assert!(!Pending.can_become(Completed));

        assert!(Confirmed.can_become(Active));
        assert!(Confirmed.can_become(Cancelled));
        assert!(!Confirmed.can_become(Completed));
        assert!(!Confirmed.can_become(Pending));

        assert!(Active.can_become(Completed));
        assert!(Active.can_become(Cancelled));
        assert!(!Active.can_become(Confirmed));
    }

    #[test]
    fn terminal_states_allow_nothing() {
        use BookingStatus::*;
        for next in [Pending, Confirmed, Active, Completed, Cancelled] {
            assert!(!Completed.can_become(next));
            assert!(!Cancelled.can_become(next));
        }
        assert!(Completed.is_terminal());
        assert!(Cancelled.is_terminal());
        assert!(!Active.is_terminal());
    }

    #[test]
    fn lender_actions_follow_the_booking_card() {
        use BookingStatus::*;
        assert_eq!(
            Pending.proposable_by(BookingRole::Lender),
            &[Confirmed, Cancelled]
        );
        assert_eq!(Confirmed.proposable_by(BookingRole::Lender), &[Active]);
        assert_eq!(Active.proposable_by(BookingRole::Lender), &[Completed]);
        assert!(Completed.proposable_by(BookingRole::Lender).is_empty());
    }

    #[test]
    fn borrower_can_only_withdraw_a_pending_request() {
        use BookingStatus::*;
        assert_eq!(Pending.proposable_by(BookingRole::Borrower), &[Cancelled]);
        assert!(Confirmed.proposable_by(BookingRole::Borrower).is_empty());
        assert!(Active.proposable_by(BookingRole::Borrower).is_empty());
        assert!(Completed.proposable_by(BookingRole::Borrower).is_empty());
    }

    #[test]
    fn only_confirmed_and_active_block() {
        use BookingStatus::*;
        assert!(Confirmed.blocks_availability());
        assert!(Active.blocks_availability());
        assert!(!Pending.blocks_availability());
        assert!(!Completed.blocks_availability());
        assert!(!Cancelled.blocks_availability());
    }

    #[test]
    fn primary_image_prefers_the_flag() {
        let tool = tool_with_images(vec![image(1, false), image(2, true), image(3, false)]);
        assert_eq!(tool.primary_image().map(|i| i.id), Some(2));
    }

    #[test]
    fn primary_image_falls_back_to_first() {
        let tool = tool_with_images(vec![image(4, false), image(5, false)]);
        assert_eq!(tool.primary_image().map(|i| i.id), Some(4));
        assert!(tool_with_images(Vec::new()).primary_image().is_none());
    }

    #[test]
    fn covers_is_inclusive_on_both_ends() {
        let b = booking(date!(2026 - 03 - 10), date!(2026 - 03 - 12));
        assert!(b.covers(date!(2026 - 03 - 10)));
        assert!(b.covers(date!(2026 - 03 - 11)));
        assert!(b.covers(date!(2026 - 03 - 12)));
        assert!(!b.covers(date!(2026 - 03 - 09)));
        assert!(!b.covers(date!(2026 - 03 - 13)));
    }

    #[test]
    fn wire_labels_match_the_api() {
        assert_eq!(
            serde_json::to_value(BookingStatus::Pending).ok(),
            Some(serde_json::json!("pending"))
        );
        assert_eq!(
            serde_json::to_value(ToolCondition::VeryGood).ok(),
            Some(serde_json::json!("Very Good"))
        );
        assert_eq!(
            serde_json::to_value(PickupDelivery::PickupOnly).ok(),
            Some(serde_json::json!("Pickup only"))
        );
        assert_eq!(
            serde_json::to_value(ReviewKind::ToolReview).ok(),
            Some(serde_json::json!("tool_review"))
        );
    }

    #[test]
    fn unknown_notification_kinds_decode_as_other() {
        let kind: NotificationKind =
            serde_json::from_value(serde_json::json!("payout_ready")).unwrap();
        assert_eq!(kind, NotificationKind::Other);
        let known: NotificationKind =
            serde_json::from_value(serde_json::json!("booking_request")).unwrap();
        assert_eq!(known, NotificationKind::BookingRequest);
    }
}
