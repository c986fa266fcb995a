//! Thin asynchronous client for the ToolShare REST API.
//!
//! - Provides typed accessors for every marketplace resource: accounts,
//!   listings, bookings, reviews, messaging, notifications and analytics.
//! - Owns the cookie jar the server session rides in; methods that hit
//!   protected routes take a [`Session`] as proof of login.

use reqwest::{Client, StatusCode, Url};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use time::format_description::well_known::{Iso8601, Rfc3339};
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime};
use tracing::debug;

use crate::config::ClientConfig;
use crate::domain::availability::DateRange;
use crate::domain::entities::{
    Booking, BookingId, BookingRole, BookingStats, BookingStatus, Category, CategoryId,
    Conversation, DashboardStats, EarningsReport, Message, Notification, NotificationFeed,
    NotificationKind, PickupDelivery, PickupMethod, PublicProfile, Review, ReviewKind, Tool,
    ToolCondition, ToolId, ToolImage, TopTool, UserId, UserProfile,
};
use crate::domain::session::Session;
use crate::error::{ClientError, ValidationError};

const USER_AGENT: &str = "toolshare-client/1.0.0";

#[derive(Clone)]
pub struct ToolShareClient {
    http: Client,
    base_url: Url,
}

impl ToolShareClient {
    /// Client against the default local API.
    pub fn new() -> Result<Self, ClientError> {
        Self::with_config(&ClientConfig::default())
    }

    pub fn with_base_url(base: &str) -> Result<Self, ClientError> {
        Self::with_config(&ClientConfig {
            base_url: base.to_string(),
            ..ClientConfig::default()
        })
    }

    pub fn with_config(config: &ClientConfig) -> Result<Self, ClientError> {
        let base_url = Url::parse(&config.base_url)?;
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .cookie_store(true)
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self { http, base_url })
    }

    // --- accounts ---

    /// Creates an account. The server signs the new user in, so this hands
    /// back a live [`Session`].
    pub async fn register(&self, registration: &Registration) -> Result<Session, ClientError> {
        registration.validate()?;
        let url = self.url("auth/register")?;
        let dto: UserProfileDto = self
            .request_json(self.http.post(url).json(registration))
            .await?;
        debug!(user_id = dto.id, "account registered");
        Ok(Session::new(dto.into()))
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<Session, ClientError> {
        credentials.validate()?;
        let url = self.url("auth/login")?;
        let dto: UserProfileDto = self
            .request_json(self.http.post(url).json(credentials))
            .await?;
        debug!(user_id = dto.id, "session established");
        Ok(Session::new(dto.into()))
    }

    /// Ends the server session. Consumes the [`Session`] since the cookie it
    /// vouches for is gone afterwards.
    pub async fn logout(&self, _session: Session) -> Result<(), ClientError> {
        let url = self.url("auth/logout")?;
        self.request_ack(self.http.post(url)).await
    }

    /// Re-fetches the signed-in user's own profile.
    pub async fn get_profile(&self, _session: &Session) -> Result<UserProfile, ClientError> {
        let url = self.url("auth/profile")?;
        let dto: UserProfileDto = self.request_json(self.http.get(url)).await?;
        Ok(dto.into())
    }

    /// Applies a partial profile update and refreshes the profile cached on
    /// the session.
    pub async fn update_profile(
        &self,
        session: &mut Session,
        update: &ProfileUpdate,
    ) -> Result<UserProfile, ClientError> {
        let url = self.url("auth/profile")?;
        let dto: UserProfileDto = self.request_json(self.http.put(url).json(update)).await?;
        let profile: UserProfile = dto.into();
        session.refresh(profile.clone());
        Ok(profile)
    }

    /// Public view of any member.
    pub async fn get_user(&self, user_id: UserId) -> Result<PublicProfile, ClientError> {
        let url = self.url(&format!("auth/users/{user_id}"))?;
        let dto: PublicProfileDto = self.request_json(self.http.get(url)).await?;
        Ok(dto.into())
    }

    // --- tool listings ---

    /// Searches available listings. Pass `ToolQuery::default()` for the
    /// first page of everything, newest first.
    pub async fn get_tools(&self, query: &ToolQuery) -> Result<Page<Tool>, ClientError> {
        let mut url = self.url("tools/")?;
        query.apply_to(&mut url);
        let dto: PageDto<ToolDto> = self.request_json(self.http.get(url)).await?;
        Ok(dto.into())
    }

    pub async fn get_tool(&self, tool_id: ToolId) -> Result<Tool, ClientError> {
        let url = self.url(&format!("tools/{tool_id}"))?;
        let dto: ToolDto = self.request_json(self.http.get(url)).await?;
        Ok(dto.into())
    }

    pub async fn create_tool(
        &self,
        _session: &Session,
        new_tool: &NewTool,
    ) -> Result<Tool, ClientError> {
        new_tool.validate()?;
        let url = self.url("tools/")?;
        let dto: ToolDto = self.request_json(self.http.post(url).json(new_tool)).await?;
        Ok(dto.into())
    }

    /// Partial update; only the fields set in `update` are touched.
    pub async fn update_tool(
        &self,
        _session: &Session,
        tool_id: ToolId,
        update: &ToolUpdate,
    ) -> Result<Tool, ClientError> {
        let url = self.url(&format!("tools/{tool_id}"))?;
        let dto: ToolDto = self.request_json(self.http.put(url).json(update)).await?;
        Ok(dto.into())
    }

    pub async fn delete_tool(&self, _session: &Session, tool_id: ToolId) -> Result<(), ClientError> {
        let url = self.url(&format!("tools/{tool_id}"))?;
        self.request_ack(self.http.delete(url)).await
    }

    /// Every listing owned by the signed-in user, unpaginated.
    pub async fn get_my_tools(&self, _session: &Session) -> Result<Vec<Tool>, ClientError> {
        let url = self.url("tools/my-tools")?;
        let dtos: Vec<ToolDto> = self.request_json(self.http.get(url)).await?;
        Ok(dtos.into_iter().map(Tool::from).collect())
    }

    /// Bookings recorded against one listing, for availability calendars.
    pub async fn get_tool_bookings(&self, tool_id: ToolId) -> Result<Vec<Booking>, ClientError> {
        let url = self.url(&format!("tools/{tool_id}/bookings"))?;
        let dto: BookingListDto = self.request_json(self.http.get(url)).await?;
        Ok(dto.bookings.into_iter().map(Booking::from).collect())
    }

    // --- bookings ---

    /// Requests a rental. The server prices it, snapshots the deposit and
    /// creates the booking as pending.
    pub async fn create_booking(
        &self,
        _session: &Session,
        request: &NewBooking,
    ) -> Result<Booking, ClientError> {
        let url = self.url("bookings/")?;
        let dto: BookingDto = self
            .request_json(self.http.post(url).json(&request.wire()))
            .await?;
        Ok(dto.into())
    }

    /// Bookings the signed-in user is involved in, newest first.
    pub async fn get_bookings(
        &self,
        _session: &Session,
        query: &BookingQuery,
    ) -> Result<Page<Booking>, ClientError> {
        let mut url = self.url("bookings/")?;
        query.apply_to(&mut url);
        let dto: PageDto<BookingDto> = self.request_json(self.http.get(url)).await?;
        Ok(dto.into())
    }

    pub async fn get_booking(
        &self,
        _session: &Session,
        booking_id: BookingId,
    ) -> Result<Booking, ClientError> {
        let url = self.url(&format!("bookings/{booking_id}"))?;
        let dto: BookingDto = self.request_json(self.http.get(url)).await?;
        Ok(dto.into())
    }

    /// Proposes a lifecycle transition. The server enforces the transition
    /// table and who may request it; an illegal move comes back as a
    /// [`ClientError::Api`] with status 400 or 403.
    pub async fn update_booking_status(
        &self,
        _session: &Session,
        booking_id: BookingId,
        status: BookingStatus,
    ) -> Result<Booking, ClientError> {
        let url = self.url(&format!("bookings/{booking_id}/status"))?;
        let body = serde_json::json!({ "status": status });
        let dto: BookingDto = self.request_json(self.http.put(url).json(&body)).await?;
        Ok(dto.into())
    }

    /// Removes a booking. Only pending ones can be deleted.
    pub async fn delete_booking(
        &self,
        _session: &Session,
        booking_id: BookingId,
    ) -> Result<(), ClientError> {
        let url = self.url(&format!("bookings/{booking_id}"))?;
        self.request_ack(self.http.delete(url)).await
    }

    // --- reviews ---

    pub async fn create_review(
        &self,
        _session: &Session,
        review: &NewReview,
    ) -> Result<Review, ClientError> {
        review.validate()?;
        let url = self.url("reviews/")?;
        let dto: ReviewDto = self.request_json(self.http.post(url).json(review)).await?;
        Ok(dto.into())
    }

    pub async fn get_tool_reviews(
        &self,
        tool_id: ToolId,
        page: &PageQuery,
    ) -> Result<ReviewPage, ClientError> {
        let mut url = self.url(&format!("reviews/tool/{tool_id}"))?;
        page.apply_to(&mut url);
        let dto: ReviewPageDto = self.request_json(self.http.get(url)).await?;
        Ok(dto.into())
    }

    /// Reviews received by a member as a counterparty.
    pub async fn get_user_reviews(
        &self,
        user_id: UserId,
        page: &PageQuery,
    ) -> Result<ReviewPage, ClientError> {
        let mut url = self.url(&format!("reviews/user/{user_id}"))?;
        page.apply_to(&mut url);
        let dto: ReviewPageDto = self.request_json(self.http.get(url)).await?;
        Ok(dto.into())
    }

    pub async fn get_review(&self, review_id: i64) -> Result<Review, ClientError> {
        let url = self.url(&format!("reviews/{review_id}"))?;
        let dto: ReviewDto = self.request_json(self.http.get(url)).await?;
        Ok(dto.into())
    }

    pub async fn update_review(
        &self,
        _session: &Session,
        review_id: i64,
        update: &ReviewUpdate,
    ) -> Result<Review, ClientError> {
        update.validate()?;
        let url = self.url(&format!("reviews/{review_id}"))?;
        let dto: ReviewDto = self.request_json(self.http.put(url).json(update)).await?;
        Ok(dto.into())
    }

    pub async fn delete_review(
        &self,
        _session: &Session,
        review_id: i64,
    ) -> Result<(), ClientError> {
        let url = self.url(&format!("reviews/{review_id}"))?;
        self.request_ack(self.http.delete(url)).await
    }

    // --- messaging ---

    pub async fn send_message(
        &self,
        _session: &Session,
        message: &NewMessage,
    ) -> Result<Message, ClientError> {
        message.validate()?;
        let url = self.url("messages/")?;
        let dto: MessageDto = self.request_json(self.http.post(url).json(message)).await?;
        Ok(dto.into())
    }

    /// The full thread for a booking, oldest first. Fetching it marks the
    /// messages addressed to the signed-in user as read.
    pub async fn get_booking_messages(
        &self,
        _session: &Session,
        booking_id: BookingId,
    ) -> Result<Vec<Message>, ClientError> {
        let url = self.url(&format!("messages/booking/{booking_id}"))?;
        let dto: MessageListDto = self.request_json(self.http.get(url)).await?;
        Ok(dto.messages.into_iter().map(Message::from).collect())
    }

    /// Inbox overview: one entry per booking with messages, most recent
    /// activity first.
    pub async fn get_conversations(
        &self,
        _session: &Session,
    ) -> Result<Vec<Conversation>, ClientError> {
        let url = self.url("messages/conversations")?;
        let dto: ConversationListDto = self.request_json(self.http.get(url)).await?;
        Ok(dto.conversations.into_iter().map(Conversation::from).collect())
    }

    pub async fn mark_message_read(
        &self,
        _session: &Session,
        message_id: i64,
    ) -> Result<Message, ClientError> {
        let url = self.url(&format!("messages/{message_id}/read"))?;
        let dto: MessageDto = self.request_json(self.http.put(url)).await?;
        Ok(dto.into())
    }

    // --- notifications ---

    pub async fn get_notifications(
        &self,
        _session: &Session,
    ) -> Result<NotificationFeed, ClientError> {
        let url = self.url("notifications/")?;
        let dto: NotificationFeedDto = self.request_json(self.http.get(url)).await?;
        Ok(dto.into())
    }

    pub async fn mark_notification_read(
        &self,
        _session: &Session,
        notification_id: i64,
    ) -> Result<(), ClientError> {
        let url = self.url(&format!("notifications/{notification_id}/read"))?;
        self.request_ack(self.http.put(url)).await
    }

    // --- categories ---

    /// All categories with their available-tool counts.
    pub async fn get_categories(&self) -> Result<Vec<Category>, ClientError> {
        let url = self.url("categories/")?;
        let dtos: Vec<CategoryDto> = self.request_json(self.http.get(url)).await?;
        Ok(dtos.into_iter().map(Category::from).collect())
    }

    pub async fn get_category(&self, category_id: CategoryId) -> Result<Category, ClientError> {
        let url = self.url(&format!("categories/{category_id}"))?;
        let dto: CategoryDto = self.request_json(self.http.get(url)).await?;
        Ok(dto.into())
    }

    pub async fn get_category_tools(
        &self,
        category_id: CategoryId,
        sort: ToolSort,
        page: &PageQuery,
    ) -> Result<CategoryTools, ClientError> {
        let mut url = self.url(&format!("categories/{category_id}/tools"))?;
        {
            let mut pairs = url.query_pairs_mut();
            if let Some(sort) = sort.as_param() {
                pairs.append_pair("sort_by", sort);
            }
        }
        page.apply_to(&mut url);
        let dto: CategoryToolsDto = self.request_json(self.http.get(url)).await?;
        Ok(dto.into())
    }

    // --- analytics ---

    /// Earnings analytics for the signed-in lender over the chosen range.
    pub async fn get_earnings(
        &self,
        _session: &Session,
        range: EarningsRange,
    ) -> Result<EarningsReport, ClientError> {
        let mut url = self.url("analytics/earnings")?;
        url.query_pairs_mut().append_pair("range", range.as_str());
        let dto: EarningsReportDto = self.request_json(self.http.get(url)).await?;
        Ok(dto.into())
    }

    /// Completed-booking earnings as CSV, ready to write to a file.
    pub async fn export_earnings(
        &self,
        _session: &Session,
        range: EarningsRange,
    ) -> Result<String, ClientError> {
        let mut url = self.url("analytics/export")?;
        url.query_pairs_mut().append_pair("range", range.as_str());
        self.request_text(self.http.get(url)).await
    }

    pub async fn get_dashboard_stats(
        &self,
        _session: &Session,
    ) -> Result<DashboardStats, ClientError> {
        let url = self.url("dashboard/stats")?;
        let dto: DashboardStatsDto = self.request_json(self.http.get(url)).await?;
        Ok(dto.into())
    }

    /// Health check; resolves to the server's status string.
    pub async fn health(&self) -> Result<String, ClientError> {
        let url = self.url("health")?;
        let dto: HealthDto = self.request_json(self.http.get(url)).await?;
        Ok(dto.status)
    }

    // --- plumbing ---

    async fn request_json<T>(&self, builder: reqwest::RequestBuilder) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
    {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(api_error(status, &body));
        }
        Ok(serde_json::from_str(&body)?)
    }

    async fn request_text(&self, builder: reqwest::RequestBuilder) -> Result<String, ClientError> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(api_error(status, &body));
        }
        Ok(body)
    }

    async fn request_ack(&self, builder: reqwest::RequestBuilder) -> Result<(), ClientError> {
        let ack: AckDto = self.request_json(builder).await?;
        debug!(ack = %ack.message, "server acknowledged");
        Ok(())
    }

    fn url(&self, path: &str) -> Result<Url, url::ParseError> {
        self.base_url.join(path)
    }
}

/// Maps a non-2xx response to [`ClientError::Api`], preferring the server's
/// own `error` field over the bare status line.
fn api_error(status: StatusCode, body: &str) -> ClientError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .or_else(|| status.canonical_reason().map(str::to_string))
        .unwrap_or_else(|| status.to_string());
    ClientError::Api {
        status: status.as_u16(),
        message,
    }
}

// --- request payloads ---

/// Fields for a new account.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture_url: Option<String>,
}

impl Registration {
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("username", &self.username),
            ("email", &self.email),
            ("password", &self.password),
            ("full_name", &self.full_name),
            ("location", &self.location),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::MissingField(field));
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.email.trim().is_empty() {
            return Err(ValidationError::MissingField("email"));
        }
        if self.password.is_empty() {
            return Err(ValidationError::MissingField("password"));
        }
        Ok(())
    }
}

/// Partial profile update; unset fields are left alone.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture_url: Option<String>,
}

/// Fields for a new listing. `images` are URLs; the first becomes the
/// primary image.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewTool {
    pub name: String,
    pub category_id: CategoryId,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand_model: Option<String>,
    pub condition: ToolCondition,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_per_hour: Option<f64>,
    pub price_per_day: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_per_week: Option<f64>,
    pub security_deposit: f64,
    pub pickup_delivery_options: PickupDelivery,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
}

impl NewTool {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField("name"));
        }
        if self.description.trim().is_empty() {
            return Err(ValidationError::MissingField("description"));
        }
        if self.price_per_day < 0.0 {
            return Err(ValidationError::NegativeRate {
                field: "price_per_day",
                value: self.price_per_day,
            });
        }
        // the API reads a zero daily rate as absent and rejects the request
        if self.price_per_day == 0.0 {
            return Err(ValidationError::MissingField("price_per_day"));
        }
        Ok(())
    }
}

/// Partial listing update; unset fields are left alone.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ToolUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<ToolCondition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_per_hour: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_per_day: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_per_week: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security_deposit: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pickup_delivery_options: Option<PickupDelivery>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_available: Option<bool>,
}

/// A rental request. The inclusive [`DateRange`] already guarantees the
/// dates are ordered.
#[derive(Clone, Debug, PartialEq)]
pub struct NewBooking {
    pub tool_id: ToolId,
    pub dates: DateRange,
    pub pickup_delivery_method: PickupMethod,
    /// Optional note to the lender, shown with the request.
    pub message: Option<String>,
}

impl NewBooking {
    fn wire(&self) -> NewBookingWire<'_> {
        NewBookingWire {
            tool_id: self.tool_id,
            start_date: wire_datetime(self.dates.start()),
            end_date: wire_datetime(self.dates.end()),
            pickup_delivery_method: self.pickup_delivery_method.as_str(),
            message: self.message.as_deref(),
        }
    }
}

#[derive(Debug, Serialize)]
struct NewBookingWire<'a> {
    tool_id: ToolId,
    start_date: String,
    end_date: String,
    pickup_delivery_method: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewReview {
    pub booking_id: BookingId,
    /// 1 through 5.
    pub rating: u8,
    #[serde(rename = "review_type")]
    pub kind: ReviewKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl NewReview {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(1..=5).contains(&self.rating) {
            return Err(ValidationError::RatingOutOfRange(self.rating));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ReviewUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl ReviewUpdate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(rating) = self.rating {
            if !(1..=5).contains(&rating) {
                return Err(ValidationError::RatingOutOfRange(rating));
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewMessage {
    pub booking_id: BookingId,
    pub receiver_id: UserId,
    pub content: String,
}

impl NewMessage {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.content.trim().is_empty() {
            return Err(ValidationError::MissingField("content"));
        }
        Ok(())
    }
}

// --- query parameters ---

/// Pagination window, 1-based.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageQuery {
    pub page: u32,
    pub per_page: u32,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 20,
        }
    }
}

impl PageQuery {
    /// First page at the configured page size.
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            page: 1,
            per_page: config.per_page,
        }
    }

    fn apply_to(&self, url: &mut Url) {
        url.query_pairs_mut()
            .append_pair("page", &self.page.to_string())
            .append_pair("per_page", &self.per_page.to_string());
    }
}

/// Listing sort order. [`ToolSort::Relevance`] leaves the ordering to the
/// server, which falls back to newest first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ToolSort {
    #[default]
    Relevance,
    PriceLow,
    PriceHigh,
    Newest,
}

impl ToolSort {
    pub fn as_param(&self) -> Option<&'static str> {
        match self {
            ToolSort::Relevance => None,
            ToolSort::PriceLow => Some("price_low"),
            ToolSort::PriceHigh => Some("price_high"),
            ToolSort::Newest => Some("newest"),
        }
    }
}

/// Filters for browsing listings.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ToolQuery {
    /// Matches name, description and brand.
    pub search: Option<String>,
    pub category_id: Option<CategoryId>,
    pub sort: ToolSort,
    pub page: PageQuery,
}

impl ToolQuery {
    fn apply_to(&self, url: &mut Url) {
        {
            let mut pairs = url.query_pairs_mut();
            if let Some(search) = self.search.as_deref() {
                if !search.is_empty() {
                    pairs.append_pair("search", search);
                }
            }
            if let Some(category_id) = self.category_id {
                pairs.append_pair("category_id", &category_id.to_string());
            }
            if let Some(sort) = self.sort.as_param() {
                pairs.append_pair("sort_by", sort);
            }
        }
        self.page.apply_to(url);
    }
}

/// Filters for the signed-in user's bookings. A `role` of `None` returns
/// both sides.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BookingQuery {
    pub role: Option<BookingRole>,
    pub status: Option<BookingStatus>,
    pub page: PageQuery,
}

impl BookingQuery {
    fn apply_to(&self, url: &mut Url) {
        {
            let mut pairs = url.query_pairs_mut();
            if let Some(role) = self.role {
                pairs.append_pair("type", role.as_str());
            }
            if let Some(status) = self.status {
                pairs.append_pair("status", status.as_str());
            }
        }
        self.page.apply_to(url);
    }
}

/// Reporting window for earnings analytics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EarningsRange {
    Week,
    #[default]
    Month,
    Year,
}

impl EarningsRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            EarningsRange::Week => "week",
            EarningsRange::Month => "month",
            EarningsRange::Year => "year",
        }
    }
}

// --- paginated results ---

/// One page of a listing endpoint, with the server's pagination counters.
#[derive(Clone, Debug, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Total matching items across all pages.
    pub total: u32,
    pub pages: u32,
    pub current_page: u32,
    pub per_page: u32,
}

/// A page of reviews plus the aggregate rating over every review of the
/// subject, not just this page.
#[derive(Clone, Debug, PartialEq)]
pub struct ReviewPage {
    pub page: Page<Review>,
    pub average_rating: f64,
    pub review_count: u32,
}

/// A category together with a page of its tools.
#[derive(Clone, Debug, PartialEq)]
pub struct CategoryTools {
    pub category: Category,
    pub tools: Page<Tool>,
}

// --- wire types ---

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AckDto {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct HealthDto {
    status: String,
}

/// List envelope keyed by resource name; `items` is accepted too so the
/// parser survives a generic rename on the server side. The default is
/// spelled as a path so the derive does not demand `T: Default`.
#[derive(Debug, Deserialize)]
struct PageDto<T> {
    #[serde(
        default = "Vec::new",
        alias = "tools",
        alias = "bookings",
        alias = "reviews"
    )]
    items: Vec<T>,
    #[serde(default)]
    total: Option<u32>,
    #[serde(default)]
    pages: Option<u32>,
    #[serde(default)]
    current_page: Option<u32>,
    #[serde(default)]
    per_page: Option<u32>,
}

impl<Dto, T: From<Dto>> From<PageDto<Dto>> for Page<T> {
    fn from(dto: PageDto<Dto>) -> Self {
        let items: Vec<T> = dto.items.into_iter().map(T::from).collect();
        let total = dto.total.unwrap_or(items.len() as u32);
        Self {
            total,
            pages: dto.pages.unwrap_or(1),
            current_page: dto.current_page.unwrap_or(1),
            per_page: dto.per_page.unwrap_or(total.max(1)),
            items,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ReviewPageDto {
    #[serde(default)]
    reviews: Vec<ReviewDto>,
    #[serde(default)]
    total: Option<u32>,
    #[serde(default)]
    pages: Option<u32>,
    #[serde(default)]
    current_page: Option<u32>,
    #[serde(default)]
    per_page: Option<u32>,
    #[serde(default)]
    average_rating: f64,
    #[serde(default)]
    review_count: Option<u32>,
}

impl From<ReviewPageDto> for ReviewPage {
    fn from(dto: ReviewPageDto) -> Self {
        let page: Page<Review> = PageDto {
            items: dto.reviews,
            total: dto.total,
            pages: dto.pages,
            current_page: dto.current_page,
            per_page: dto.per_page,
        }
        .into();
        Self {
            average_rating: dto.average_rating,
            review_count: dto.review_count.unwrap_or(page.total),
            page,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CategoryToolsDto {
    category: CategoryDto,
    #[serde(default)]
    tools: Vec<ToolDto>,
    #[serde(default)]
    total: Option<u32>,
    #[serde(default)]
    pages: Option<u32>,
    #[serde(default)]
    current_page: Option<u32>,
    #[serde(default)]
    per_page: Option<u32>,
}

impl From<CategoryToolsDto> for CategoryTools {
    fn from(dto: CategoryToolsDto) -> Self {
        Self {
            category: dto.category.into(),
            tools: PageDto {
                items: dto.tools,
                total: dto.total,
                pages: dto.pages,
                current_page: dto.current_page,
                per_page: dto.per_page,
            }
            .into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct BookingListDto {
    #[serde(default)]
    bookings: Vec<BookingDto>,
}

#[derive(Debug, Deserialize)]
struct MessageListDto {
    #[serde(default)]
    messages: Vec<MessageDto>,
}

#[derive(Debug, Deserialize)]
struct ConversationListDto {
    #[serde(default)]
    conversations: Vec<ConversationDto>,
}

#[derive(Debug, Deserialize)]
struct UserProfileDto {
    id: i64,
    username: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    full_name: Option<String>,
    #[serde(default)]
    phone_number: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    profile_picture_url: Option<String>,
    #[serde(default)]
    is_verified: Option<bool>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    updated_at: Option<String>,
}

impl From<UserProfileDto> for UserProfile {
    fn from(dto: UserProfileDto) -> Self {
        Self {
            id: dto.id,
            username: dto.username,
            email: dto.email.unwrap_or_default(),
            full_name: dto.full_name.unwrap_or_default(),
            phone_number: dto.phone_number,
            location: dto.location,
            profile_picture_url: dto.profile_picture_url,
            is_verified: dto.is_verified.unwrap_or(false),
            created_at: parse_timestamp(dto.created_at.as_deref()),
            updated_at: parse_timestamp(dto.updated_at.as_deref()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PublicProfileDto {
    id: i64,
    username: String,
    #[serde(default)]
    full_name: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    profile_picture_url: Option<String>,
    #[serde(default)]
    is_verified: Option<bool>,
    #[serde(default)]
    created_at: Option<String>,
}

impl From<PublicProfileDto> for PublicProfile {
    fn from(dto: PublicProfileDto) -> Self {
        Self {
            id: dto.id,
            username: dto.username,
            full_name: dto.full_name.unwrap_or_default(),
            location: dto.location,
            profile_picture_url: dto.profile_picture_url,
            is_verified: dto.is_verified.unwrap_or(false),
            created_at: parse_timestamp(dto.created_at.as_deref()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CategoryDto {
    id: i64,
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    icon_url: Option<String>,
    #[serde(default)]
    tool_count: Option<u32>,
}

impl From<CategoryDto> for Category {
    fn from(dto: CategoryDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            description: dto.description,
            icon_url: dto.icon_url,
            tool_count: dto.tool_count,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ToolImageDto {
    id: i64,
    tool_id: i64,
    image_url: String,
    #[serde(default)]
    is_primary: Option<bool>,
    #[serde(default)]
    created_at: Option<String>,
}

impl From<ToolImageDto> for ToolImage {
    fn from(dto: ToolImageDto) -> Self {
        Self {
            id: dto.id,
            tool_id: dto.tool_id,
            image_url: dto.image_url,
            is_primary: dto.is_primary.unwrap_or(false),
            created_at: parse_timestamp(dto.created_at.as_deref()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ToolDto {
    id: i64,
    owner_id: i64,
    category_id: i64,
    name: String,
    #[serde(default)]
    brand_model: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    condition: Option<String>,
    #[serde(default)]
    price_per_hour: Option<f64>,
    #[serde(default)]
    price_per_day: f64,
    #[serde(default)]
    price_per_week: Option<f64>,
    #[serde(default)]
    security_deposit: f64,
    #[serde(default)]
    pickup_delivery_options: Option<String>,
    #[serde(default)]
    is_available: Option<bool>,
    #[serde(default)]
    owner: Option<PublicProfileDto>,
    #[serde(default)]
    category: Option<CategoryDto>,
    #[serde(default)]
    images: Vec<ToolImageDto>,
    #[serde(default)]
    average_rating: f64,
    #[serde(default)]
    review_count: u32,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    updated_at: Option<String>,
}

impl From<ToolDto> for Tool {
    fn from(dto: ToolDto) -> Self {
        Self {
            id: dto.id,
            owner_id: dto.owner_id,
            category_id: dto.category_id,
            name: dto.name,
            brand_model: dto.brand_model,
            description: dto.description,
            condition: dto.condition,
            price_per_hour: dto.price_per_hour,
            price_per_day: dto.price_per_day,
            price_per_week: dto.price_per_week,
            security_deposit: dto.security_deposit,
            pickup_delivery_options: dto.pickup_delivery_options,
            is_available: dto.is_available.unwrap_or(true),
            owner: dto.owner.map(PublicProfile::from),
            category: dto.category.map(Category::from),
            images: dto.images.into_iter().map(ToolImage::from).collect(),
            average_rating: dto.average_rating,
            review_count: dto.review_count,
            created_at: parse_timestamp(dto.created_at.as_deref()),
            updated_at: parse_timestamp(dto.updated_at.as_deref()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct BookingDto {
    id: i64,
    tool_id: i64,
    borrower_id: i64,
    lender_id: i64,
    #[serde(deserialize_with = "date_from_wire")]
    start_date: Date,
    #[serde(deserialize_with = "date_from_wire")]
    end_date: Date,
    #[serde(default)]
    total_price: f64,
    #[serde(default)]
    security_deposit: f64,
    status: BookingStatus,
    #[serde(default)]
    pickup_delivery_method: Option<String>,
    #[serde(default)]
    tool: Option<ToolDto>,
    #[serde(default)]
    borrower: Option<PublicProfileDto>,
    #[serde(default)]
    lender: Option<PublicProfileDto>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    updated_at: Option<String>,
}

impl From<BookingDto> for Booking {
    fn from(dto: BookingDto) -> Self {
        Self {
            id: dto.id,
            tool_id: dto.tool_id,
            borrower_id: dto.borrower_id,
            lender_id: dto.lender_id,
            start_date: dto.start_date,
            end_date: dto.end_date,
            total_price: dto.total_price,
            security_deposit: dto.security_deposit,
            status: dto.status,
            pickup_delivery_method: dto.pickup_delivery_method,
            tool: dto.tool.map(Tool::from),
            borrower: dto.borrower.map(PublicProfile::from),
            lender: dto.lender.map(PublicProfile::from),
            created_at: parse_timestamp(dto.created_at.as_deref()),
            updated_at: parse_timestamp(dto.updated_at.as_deref()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ReviewDto {
    id: i64,
    booking_id: i64,
    reviewer_id: i64,
    reviewee_id: i64,
    tool_id: i64,
    rating: u8,
    #[serde(default)]
    comment: Option<String>,
    #[serde(rename = "review_type")]
    kind: ReviewKind,
    #[serde(default)]
    reviewer: Option<PublicProfileDto>,
    #[serde(default)]
    reviewee: Option<PublicProfileDto>,
    #[serde(default)]
    created_at: Option<String>,
}

impl From<ReviewDto> for Review {
    fn from(dto: ReviewDto) -> Self {
        Self {
            id: dto.id,
            booking_id: dto.booking_id,
            reviewer_id: dto.reviewer_id,
            reviewee_id: dto.reviewee_id,
            tool_id: dto.tool_id,
            rating: dto.rating,
            comment: dto.comment,
            kind: dto.kind,
            reviewer: dto.reviewer.map(PublicProfile::from),
            reviewee: dto.reviewee.map(PublicProfile::from),
            created_at: parse_timestamp(dto.created_at.as_deref()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct MessageDto {
    id: i64,
    booking_id: i64,
    sender_id: i64,
    receiver_id: i64,
    #[serde(default)]
    content: String,
    #[serde(default)]
    is_read: Option<bool>,
    #[serde(default)]
    sender: Option<PublicProfileDto>,
    #[serde(default)]
    receiver: Option<PublicProfileDto>,
    #[serde(default)]
    created_at: Option<String>,
}

impl From<MessageDto> for Message {
    fn from(dto: MessageDto) -> Self {
        Self {
            id: dto.id,
            booking_id: dto.booking_id,
            sender_id: dto.sender_id,
            receiver_id: dto.receiver_id,
            content: dto.content,
            is_read: dto.is_read.unwrap_or(false),
            sender: dto.sender.map(PublicProfile::from),
            receiver: dto.receiver.map(PublicProfile::from),
            created_at: parse_timestamp(dto.created_at.as_deref()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ConversationDto {
    booking_id: i64,
    #[serde(default)]
    other_user: Option<PublicProfileDto>,
    #[serde(default)]
    tool: Option<ToolDto>,
    #[serde(default)]
    last_message_at: Option<String>,
    #[serde(default)]
    unread_count: u32,
}

impl From<ConversationDto> for Conversation {
    fn from(dto: ConversationDto) -> Self {
        Self {
            booking_id: dto.booking_id,
            other_user: dto.other_user.map(PublicProfile::from),
            tool: dto.tool.map(Tool::from),
            last_message_at: parse_timestamp(dto.last_message_at.as_deref()),
            unread_count: dto.unread_count,
        }
    }
}

#[derive(Debug, Deserialize)]
struct NotificationDto {
    id: i64,
    #[serde(rename = "type")]
    kind: NotificationKind,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    is_read: Option<bool>,
    #[serde(default)]
    created_at: Option<String>,
}

impl From<NotificationDto> for Notification {
    fn from(dto: NotificationDto) -> Self {
        Self {
            id: dto.id,
            kind: dto.kind,
            title: dto.title.unwrap_or_default(),
            message: dto.message.unwrap_or_default(),
            is_read: dto.is_read.unwrap_or(false),
            created_at: parse_timestamp(dto.created_at.as_deref()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct NotificationFeedDto {
    #[serde(default)]
    notifications: Vec<NotificationDto>,
    #[serde(default)]
    unread_count: Option<u32>,
}

impl From<NotificationFeedDto> for NotificationFeed {
    fn from(dto: NotificationFeedDto) -> Self {
        let notifications: Vec<Notification> =
            dto.notifications.into_iter().map(Notification::from).collect();
        let unread_count = dto
            .unread_count
            .unwrap_or_else(|| notifications.iter().filter(|n| !n.is_read).count() as u32);
        Self {
            notifications,
            unread_count,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EarningsReportDto {
    #[serde(default)]
    total_earnings: f64,
    #[serde(default)]
    monthly_earnings: f64,
    #[serde(default)]
    top_tools: Vec<TopToolDto>,
    #[serde(default)]
    booking_stats: BookingStatsDto,
}

impl From<EarningsReportDto> for EarningsReport {
    fn from(dto: EarningsReportDto) -> Self {
        Self {
            total_earnings: dto.total_earnings,
            monthly_earnings: dto.monthly_earnings,
            top_tools: dto.top_tools.into_iter().map(TopTool::from).collect(),
            booking_stats: dto.booking_stats.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TopToolDto {
    id: i64,
    name: String,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    earnings: f64,
    #[serde(default)]
    bookings: u32,
}

impl From<TopToolDto> for TopTool {
    fn from(dto: TopToolDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            category: dto.category.unwrap_or_else(|| "Unknown".to_string()),
            earnings: dto.earnings,
            bookings: dto.bookings,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BookingStatsDto {
    #[serde(default)]
    active_tools: u32,
    #[serde(default)]
    avg_daily_rate: f64,
}

impl From<BookingStatsDto> for BookingStats {
    fn from(dto: BookingStatsDto) -> Self {
        Self {
            active_tools: dto.active_tools,
            avg_daily_rate: dto.avg_daily_rate,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DashboardStatsDto {
    #[serde(default)]
    total_earnings: f64,
    #[serde(default)]
    active_listings: u32,
    #[serde(default)]
    total_bookings: u32,
    #[serde(default)]
    average_rating: f64,
    #[serde(default)]
    pending_requests: u32,
    #[serde(default)]
    unread_messages: u32,
}

impl From<DashboardStatsDto> for DashboardStats {
    fn from(dto: DashboardStatsDto) -> Self {
        Self {
            total_earnings: dto.total_earnings,
            active_listings: dto.active_listings,
            total_bookings: dto.total_bookings,
            average_rating: dto.average_rating,
            pending_requests: dto.pending_requests,
            unread_messages: dto.unread_messages,
        }
    }
}

// --- date handling ---

/// Booking dates arrive as `YYYY-MM-DD`, sometimes with a time tail. The
/// calendar day is what matters, so the tail is dropped rather than parsed.
fn parse_wire_date(raw: &str) -> Result<Date, time::error::Parse> {
    let head = raw
        .split(|c: char| c == 'T' || c == ' ')
        .next()
        .unwrap_or(raw);
    let format = format_description!("[year]-[month]-[day]");
    Date::parse(head, &format)
}

fn date_from_wire<'de, D>(deserializer: D) -> Result<Date, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_wire_date(&raw).map_err(serde::de::Error::custom)
}

/// Display timestamps are best effort: RFC 3339, then the offset-less ISO
/// form the server's clock emits, then a bare date.
fn parse_timestamp(raw: Option<&str>) -> Option<OffsetDateTime> {
    let value = raw?;
    OffsetDateTime::parse(value, &Rfc3339)
        .ok()
        .or_else(|| {
            PrimitiveDateTime::parse(value, &Iso8601::DEFAULT)
                .ok()
                .map(PrimitiveDateTime::assume_utc)
        })
        .or_else(|| {
            parse_wire_date(value)
                .ok()
                .map(|date| date.midnight().assume_utc())
        })
}

/// Outbound booking dates as UTC midnight in RFC 3339. The fallback bare
/// date is still a valid value for the server's parser.
fn wire_datetime(date: Date) -> String {
    date.midnight()
        .assume_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| date.to_string())
}
