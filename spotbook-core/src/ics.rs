use chrono::NaiveDate;
use ics::escape_text;
use ics::properties::{Description, DtEnd, DtStart, Location, Summary};

use crate::structs::{Booking, Spot};

fn midnight(date: NaiveDate) -> String {
    format!("{}T000000", date.format("%Y%m%d"))
}

/// Renders the occupancy of a spot, one event per booking.
#[must_use]
pub fn spot_calendar<'a>(spot: &'a Spot, bookings: &'a [Booking]) -> ics::ICalendar<'a> {
    let mut icalendar = ics::ICalendar::new("2.0", "-//spotbook//bookings//EN");

    for booking in bookings {
        icalendar.add_event(booking_event(spot, booking));
    }

    icalendar
}

#[must_use]
pub fn booking_event<'a>(spot: &'a Spot, booking: &Booking) -> ics::Event<'a> {
    let start = midnight(booking.start_date);
    let end = midnight(booking.end_date);
    let stamp = booking.created_at.format("%Y%m%dT%H%M%SZ").to_string();

    let id = format!("booking-{}-spot-{}@spotbook", booking.id, spot.id);

    let mut ics_event = ics::Event::new(id, stamp);

    ics_event.push(DtStart::new(start));
    ics_event.push(DtEnd::new(end));
    ics_event.push(Summary::new(escape_text(format!("Booked: {}", spot.name))));
    ics_event.push(Location::new(escape_text(format!(
        "{}, {}, {}, {}",
        spot.address, spot.city, spot.state, spot.country
    ))));
    ics_event.push(Description::new(escape_text(format!(
        "{} night(s)",
        booking.range().nights()
    ))));

    ics_event
}
