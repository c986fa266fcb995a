//! Local availability calculus over a tool's bookings.
//!
//! The server is the final authority on conflicts; everything here exists so
//! a client can render a calendar and reject impossible requests without a
//! round trip. All ranges are inclusive on both ends: a rental that starts
//! the day another ends is a conflict, because handover happens mid-day.

use serde::{Deserialize, Serialize};
use time::Date;

use crate::domain::entities::Booking;
use crate::error::ValidationError;

/// An inclusive span of calendar days. `start == end` is a one-day rental.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: Date,
    end: Date,
}

impl DateRange {
    /// Builds a range, rejecting `end < start`.
    pub fn new(start: Date, end: Date) -> Result<Self, ValidationError> {
        if end < start {
            return Err(ValidationError::EndBeforeStart { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> Date {
        self.start
    }

    pub fn end(&self) -> Date {
        self.end
    }

    /// Number of billable days, counting both endpoints. Never zero.
    pub fn days(&self) -> i64 {
        i64::from(self.end.to_julian_day() - self.start.to_julian_day()) + 1
    }

    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn overlaps(&self, other: DateRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

/// True if any blocking booking covers the date.
pub fn is_booked(date: Date, bookings: &[Booking]) -> bool {
    bookings
        .iter()
        .any(|b| b.status.blocks_availability() && b.covers(date))
}

/// True if any blocking booking overlaps the requested range.
pub fn has_conflict(range: DateRange, bookings: &[Booking]) -> bool {
    bookings.iter().any(|b| {
        b.status.blocks_availability() && b.start_date <= range.end() && range.start() <= b.end_date
    })
}

/// The booking covering a date, regardless of status. Calendars use this to
/// show pending requests as well as firm reservations.
pub fn booking_on(date: Date, bookings: &[Booking]) -> Option<&Booking> {
    bookings.iter().find(|b| b.covers(date))
}

/// Bookings starting strictly after `today`, soonest first.
pub fn upcoming(bookings: &[Booking], today: Date) -> Vec<&Booking> {
    let mut ahead: Vec<&Booking> = bookings.iter().filter(|b| b.start_date > today).collect();
    ahead.sort_by_key(|b| b.start_date);
    ahead
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::BookingStatus;
    use time::macros::date;

    fn booking(id: i64, start: Date, end: Date, status: BookingStatus) -> Booking {
        Booking {
            id,
            tool_id: 1,
            borrower_id: 3,
            lender_id: 7,
            start_date: start,
            end_date: end,
            total_price: 0.0,
            security_deposit: 0.0,
            status,
            pickup_delivery_method: None,
            tool: None,
            borrower: None,
            lender: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn range(start: Date, end: Date) -> DateRange {
        DateRange::new(start, end).unwrap()
    }

    #[test]
    fn rejects_inverted_range() {
        let err = DateRange::new(date!(2026 - 05 - 04), date!(2026 - 05 - 01)).unwrap_err();
        assert_eq!(
            err,
            ValidationError::EndBeforeStart {
                start: date!(2026 - 05 - 04),
                end: date!(2026 - 05 - 01),
            }
        );
    }

    #[test]
    fn single_day_range_is_one_day() {
        let r = range(date!(2026 - 05 - 01), date!(2026 - 05 - 01));
        assert_eq!(r.days(), 1);
        assert!(r.contains(date!(2026 - 05 - 01)));
    }

    #[test]
    fn days_count_both_endpoints() {
        assert_eq!(range(date!(2026 - 05 - 01), date!(2026 - 05 - 03)).days(), 3);
        // across a month boundary
        assert_eq!(range(date!(2026 - 03 - 30), date!(2026 - 04 - 02)).days(), 4);
    }

    #[test]
    fn overlap_is_inclusive_at_the_boundary() {
        let a = range(date!(2026 - 05 - 01), date!(2026 - 05 - 03));
        assert!(a.overlaps(range(date!(2026 - 05 - 03), date!(2026 - 05 - 06))));
        assert!(a.overlaps(range(date!(2026 - 04 - 28), date!(2026 - 05 - 01))));
        assert!(!a.overlaps(range(date!(2026 - 05 - 04), date!(2026 - 05 - 06))));
        assert!(!a.overlaps(range(date!(2026 - 04 - 28), date!(2026 - 04 - 30))));
    }

    #[test]
    fn booked_on_first_and_last_day() {
        let bookings = vec![booking(
            1,
            date!(2026 - 05 - 10),
            date!(2026 - 05 - 12),
            BookingStatus::Confirmed,
        )];
        assert!(is_booked(date!(2026 - 05 - 10), &bookings));
        assert!(is_booked(date!(2026 - 05 - 12), &bookings));
        assert!(!is_booked(date!(2026 - 05 - 09), &bookings));
        assert!(!is_booked(date!(2026 - 05 - 13), &bookings));
    }

    #[test]
    fn non_blocking_statuses_never_mark_days() {
        for status in [
            BookingStatus::Pending,
            BookingStatus::Completed,
            BookingStatus::Cancelled,
        ] {
            let bookings = vec![booking(1, date!(2026 - 05 - 10), date!(2026 - 05 - 12), status)];
            assert!(!is_booked(date!(2026 - 05 - 11), &bookings));
            assert!(!has_conflict(
                range(date!(2026 - 05 - 10), date!(2026 - 05 - 12)),
                &bookings
            ));
        }
    }

    #[test]
    fn conflict_on_partial_overlap_and_containment() {
        let bookings = vec![booking(
            1,
            date!(2026 - 05 - 10),
            date!(2026 - 05 - 14),
            BookingStatus::Active,
        )];
        // overlapping tail
        assert!(has_conflict(
            range(date!(2026 - 05 - 13), date!(2026 - 05 - 20)),
            &bookings
        ));
        // request entirely inside the booking
        assert!(has_conflict(
            range(date!(2026 - 05 - 11), date!(2026 - 05 - 12)),
            &bookings
        ));
        // request swallowing the booking
        assert!(has_conflict(
            range(date!(2026 - 05 - 01), date!(2026 - 05 - 31)),
            &bookings
        ));
        // touching at the boundary still conflicts
        assert!(has_conflict(
            range(date!(2026 - 05 - 14), date!(2026 - 05 - 16)),
            &bookings
        ));
        assert!(!has_conflict(
            range(date!(2026 - 05 - 15), date!(2026 - 05 - 16)),
            &bookings
        ));
    }

    #[test]
    fn conflict_does_not_depend_on_booking_order() {
        let a = booking(
            1,
            date!(2026 - 05 - 01),
            date!(2026 - 05 - 03),
            BookingStatus::Cancelled,
        );
        let b = booking(
            2,
            date!(2026 - 05 - 02),
            date!(2026 - 05 - 05),
            BookingStatus::Confirmed,
        );
        let request = range(date!(2026 - 05 - 03), date!(2026 - 05 - 04));
        assert!(has_conflict(request, &[a.clone(), b.clone()]));
        assert!(has_conflict(request, &[b.clone(), a.clone()]));
        assert!(has_conflict(request, &[b.clone(), b, a]));
    }

    #[test]
    fn calendar_lookup_sees_pending_requests() {
        let bookings = vec![booking(
            9,
            date!(2026 - 06 - 01),
            date!(2026 - 06 - 02),
            BookingStatus::Pending,
        )];
        assert_eq!(
            booking_on(date!(2026 - 06 - 01), &bookings).map(|b| b.id),
            Some(9)
        );
        assert!(booking_on(date!(2026 - 06 - 03), &bookings).is_none());
    }

    #[test]
    fn upcoming_is_strictly_future_and_sorted() {
        let today = date!(2026 - 05 - 10);
        let bookings = vec![
            booking(1, date!(2026 - 05 - 20), date!(2026 - 05 - 21), BookingStatus::Pending),
            booking(2, date!(2026 - 05 - 10), date!(2026 - 05 - 12), BookingStatus::Active),
            booking(3, date!(2026 - 05 - 11), date!(2026 - 05 - 12), BookingStatus::Confirmed),
        ];
        let ahead = upcoming(&bookings, today);
        let ids: Vec<i64> = ahead.iter().map(|b| b.id).collect();
        // the booking starting today is excluded
        assert_eq!(ids, vec![3, 1]);
    }
}
