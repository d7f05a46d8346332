use chrono::{NaiveDate, Utc};
use spotbook_core::{DateRange, ImageDraft, ReviewDraft, SignupDraft, SpotDraft};
use tracing::info;

use crate::{auth::hash_password, error::ApiError, state::AppState};

fn user(email: &str, username: &str, first: &str, last: &str, password: &str) -> SignupDraft {
    SignupDraft {
        email: email.into(),
        username: username.into(),
        password: password.into(),
        first_name: first.into(),
        last_name: last.into(),
    }
}

#[allow(clippy::too_many_arguments)]
fn spot(
    address: &str,
    city: &str,
    state: &str,
    lat: f64,
    lng: f64,
    name: &str,
    description: &str,
    price: f64,
) -> SpotDraft {
    SpotDraft {
        address: address.into(),
        city: city.into(),
        state: state.into(),
        country: "USA".into(),
        lat: Some(lat),
        lng: Some(lng),
        name: name.into(),
        description: description.into(),
        price: Some(price),
    }
}

fn image(url: &str, preview: bool) -> ImageDraft {
    ImageDraft {
        url: url.into(),
        preview,
    }
}

fn review(text: &str, stars: f64) -> ReviewDraft {
    ReviewDraft {
        review: text.into(),
        stars: Some(stars),
    }
}

fn stay(start: (i32, u32, u32), end: (i32, u32, u32)) -> Option<DateRange> {
    Some(DateRange::new(
        NaiveDate::from_ymd_opt(start.0, start.1, start.2)?,
        NaiveDate::from_ymd_opt(end.0, end.1, end.2)?,
    ))
}

/// Demo data. Written straight into the tables, so the booking dates may lie
/// in the past.
pub async fn load(state: &AppState) -> Result<(), ApiError> {
    let now = Utc::now();

    let drafts = [
        user(
            "human.persons@example.com",
            "human_persons",
            "Human",
            "Persons",
            "password1",
        ),
        user(
            "other.people@example.com",
            "other_people",
            "Other",
            "People",
            "password2",
        ),
    ];

    let mut hashes = Vec::with_capacity(drafts.len());
    for draft in &drafts {
        hashes.push(hash_password(draft.password.clone(), state.hash_cost).await?);
    }

    let mut tables = state.store.write().await;

    let users = drafts
        .iter()
        .zip(hashes)
        .map(|(draft, hash)| tables.insert_user(draft, hash))
        .collect::<Vec<_>>();

    let condo = tables.insert_spot(
        users[0].id,
        &spot(
            "1221 Grove St",
            "Compton",
            "CA",
            34.0194,
            -118.4912,
            "Lovely Neighborhood",
            "A beautiful condo with views.",
            250.0,
        ),
        now,
    );
    let penthouse = tables.insert_spot(
        users[1].id,
        &spot(
            "456 Main St",
            "New York",
            "NY",
            39.7392,
            -104.9903,
            "Penthouse in the Sky",
            "Lush skyline views.",
            300.0,
        ),
        now,
    );

    tables.insert_spot_image(condo.id, &image("https://example.com/condo1.jpg", true));
    tables.insert_spot_image(condo.id, &image("https://example.com/condo2.jpg", false));
    tables.insert_spot_image(
        penthouse.id,
        &image("https://example.com/penthouse1.jpg", true),
    );

    tables.insert_review(
        users[1].id,
        condo.id,
        &review("Amazing spot, beautiful views!", 5.0),
        now,
    );
    tables.insert_review(
        users[0].id,
        penthouse.id,
        &review("Cozy condo, perfect for a getaway.", 4.0),
        now,
    );

    let stays = [
        (condo.id, users[1].id, stay((2024, 12, 1), (2024, 12, 5))),
        (penthouse.id, users[0].id, stay((2024, 11, 10), (2024, 11, 15))),
    ];
    for (spot_id, user_id, range) in stays {
        if let Some(range) = range {
            tables.insert_booking(spot_id, user_id, range, now);
        }
    }

    info!(users = users.len(), spots = 2, "demo data loaded");

    Ok(())
}
