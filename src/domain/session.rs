//! Proof of an authenticated login.
//!
//! A [`Session`] can only be minted by the client's login and register calls,
//! so holding one is the type-level guarantee that the cookie jar carries a
//! server session. It also caches the signed-in profile so callers can
//! answer "is this my tool, which side of this booking am I on" without a
//! request.

use time::OffsetDateTime;

use crate::domain::entities::{Booking, BookingRole, Tool, UserId, UserProfile};

#[derive(Clone, Debug)]
pub struct Session {
    profile: UserProfile,
    established_at: OffsetDateTime,
}

impl Session {
    pub(crate) fn new(profile: UserProfile) -> Self {
        Self {
            profile,
            established_at: OffsetDateTime::now_utc(),
        }
    }

    /// Replaces the cached profile after a server-side update.
    pub(crate) fn refresh(&mut self, profile: UserProfile) {
        self.profile = profile;
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn user_id(&self) -> UserId {
        self.profile.id
    }

    /// When the login happened, in UTC.
    pub fn established_at(&self) -> OffsetDateTime {
        self.established_at
    }

    /// Which side of the booking the signed-in user is on, if either.
    pub fn role_in(&self, booking: &Booking) -> Option<BookingRole> {
        if booking.borrower_id == self.profile.id {
            Some(BookingRole::Borrower)
        } else if booking.lender_id == self.profile.id {
            Some(BookingRole::Lender)
        } else {
            None
        }
    }

    pub fn owns(&self, tool: &Tool) -> bool {
        tool.owner_id == self.profile.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::BookingStatus;
    use time::macros::date;

    fn session_for(user_id: UserId) -> Session {
        Session::new(UserProfile {
            id: user_id,
            username: "sam".to_string(),
            email: "sam@example.com".to_string(),
            full_name: "Sam Carpenter".to_string(),
            phone_number: None,
            location: None,
            profile_picture_url: None,
            is_verified: true,
            created_at: None,
            updated_at: None,
        })
    }

    fn booking(borrower_id: UserId, lender_id: UserId) -> Booking {
        Booking {
            id: 1,
            tool_id: 4,
            borrower_id,
            lender_id,
            start_date: date!(2026 - 05 - 01),
            end_date: date!(2026 - 05 - 02),
            total_price: 0.0,
            security_deposit: 0.0,
            status: BookingStatus::Pending,
            pickup_delivery_method: None,
            tool: None,
            borrower: None,
            lender: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn role_follows_the_booking_sides() {
        let session = session_for(3);
        assert_eq!(session.role_in(&booking(3, 7)), Some(BookingRole::Borrower));
        assert_eq!(session.role_in(&booking(7, 3)), Some(BookingRole::Lender));
        assert_eq!(session.role_in(&booking(7, 9)), None);
    }

    #[test]
    fn ownership_compares_owner_ids() {
        let session = session_for(7);
        let mut tool = Tool {
            id: 4,
            owner_id: 7,
            category_id: 1,
            name: "Ladder".to_string(),
            brand_model: None,
            description: None,
            condition: None,
            price_per_hour: None,
            price_per_day: 5.0,
            price_per_week: None,
            security_deposit: 0.0,
            pickup_delivery_options: None,
            is_available: true,
            owner: None,
            category: None,
            images: Vec::new(),
            average_rating: 0.0,
            review_count: 0,
            created_at: None,
            updated_at: None,
        };
        assert!(session.owns(&tool));
        tool.owner_id = 8;
        assert!(!session.owns(&tool));
    }
}
