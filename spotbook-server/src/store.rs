use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use spotbook_core::{
    Booking, BookingId, DateRange, ImageDraft, Review, ReviewDraft, ReviewId, ReviewImage,
    ReviewImageId, SignupDraft, Spot, SpotDraft, SpotId, SpotImage, SpotImageId, User, UserId,
};
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

pub struct UserRecord {
    pub user: User,
    /// bcrypt hash, salt and cost included.
    pub password_hash: String,
}

#[derive(Default)]
pub struct Store {
    tables: RwLock<Tables>,
}

impl Store {
    pub async fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().await
    }

    pub async fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().await
    }
}

#[derive(Default)]
struct Sequence(u32);

impl Sequence {
    fn next(&mut self) -> u32 {
        self.0 += 1;
        self.0
    }
}

#[derive(Default)]
pub struct Tables {
    users: BTreeMap<UserId, UserRecord>,
    spots: BTreeMap<SpotId, Spot>,
    spot_images: BTreeMap<SpotImageId, SpotImage>,
    reviews: BTreeMap<ReviewId, Review>,
    review_images: BTreeMap<ReviewImageId, ReviewImage>,
    bookings: BTreeMap<BookingId, Booking>,

    user_ids: Sequence,
    spot_ids: Sequence,
    spot_image_ids: Sequence,
    review_ids: Sequence,
    review_image_ids: Sequence,
    booking_ids: Sequence,
}

impl Tables {
    // Users

    pub fn user(&self, id: UserId) -> Option<&User> {
        self.users.get(&id).map(|record| &record.user)
    }

    /// Matches either the username or the email address.
    pub fn find_login(&self, credential: &str) -> Option<&UserRecord> {
        let credential = credential.trim();
        self.users.values().find(|record| {
            record.user.username == credential || record.user.email.eq_ignore_ascii_case(credential)
        })
    }

    pub fn email_taken(&self, email: &str) -> bool {
        self.users
            .values()
            .any(|record| record.user.email.eq_ignore_ascii_case(email.trim()))
    }

    pub fn username_taken(&self, username: &str) -> bool {
        self.users
            .values()
            .any(|record| record.user.username == username.trim())
    }

    pub fn insert_user(&mut self, draft: &SignupDraft, password_hash: String) -> User {
        let user = User {
            id: self.user_ids.next(),
            first_name: draft.first_name.trim().to_string(),
            last_name: draft.last_name.trim().to_string(),
            email: draft.email.trim().to_string(),
            username: draft.username.trim().to_string(),
        };

        self.users.insert(
            user.id,
            UserRecord {
                user: user.clone(),
                password_hash,
            },
        );

        user
    }

    // Spots

    pub fn spot(&self, id: SpotId) -> Option<&Spot> {
        self.spots.get(&id)
    }

    pub fn spots(&self) -> impl Iterator<Item = &Spot> {
        self.spots.values()
    }

    pub fn insert_spot(&mut self, owner_id: UserId, draft: &SpotDraft, now: DateTime<Utc>) -> Spot {
        let spot = Spot {
            id: self.spot_ids.next(),
            owner_id,
            address: draft.address.trim().to_string(),
            city: draft.city.trim().to_string(),
            state: draft.state.trim().to_string(),
            country: draft.country.trim().to_string(),
            lat: draft.lat.unwrap_or_default(),
            lng: draft.lng.unwrap_or_default(),
            name: draft.name.trim().to_string(),
            description: draft.description.trim().to_string(),
            price: draft.price.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };

        self.spots.insert(spot.id, spot.clone());
        spot
    }

    pub fn update_spot(&mut self, id: SpotId, draft: &SpotDraft, now: DateTime<Utc>) -> Option<Spot> {
        let spot = self.spots.get_mut(&id)?;

        spot.address = draft.address.trim().to_string();
        spot.city = draft.city.trim().to_string();
        spot.state = draft.state.trim().to_string();
        spot.country = draft.country.trim().to_string();
        spot.lat = draft.lat.unwrap_or(spot.lat);
        spot.lng = draft.lng.unwrap_or(spot.lng);
        spot.name = draft.name.trim().to_string();
        spot.description = draft.description.trim().to_string();
        spot.price = draft.price.unwrap_or(spot.price);
        spot.updated_at = now;

        Some(spot.clone())
    }

    /// Removes the spot together with its images, reviews and bookings.
    pub fn delete_spot(&mut self, id: SpotId) -> Option<Spot> {
        let spot = self.spots.remove(&id)?;

        self.spot_images.retain(|_, image| image.spot_id != id);
        self.bookings.retain(|_, booking| booking.spot_id != id);

        let review_ids = self
            .reviews
            .values()
            .filter(|review| review.spot_id == id)
            .map(|review| review.id)
            .collect::<Vec<_>>();
        for review_id in review_ids {
            self.delete_review(review_id);
        }

        Some(spot)
    }

    pub fn avg_rating(&self, spot_id: SpotId) -> Option<f64> {
        let (count, total) = self
            .reviews
            .values()
            .filter(|review| review.spot_id == spot_id)
            .fold((0u32, 0u32), |(count, total), review| {
                (count + 1, total + u32::from(review.stars))
            });

        (count > 0).then(|| (f64::from(total) / f64::from(count) * 10.0).round() / 10.0)
    }

    pub fn num_reviews(&self, spot_id: SpotId) -> usize {
        self.reviews
            .values()
            .filter(|review| review.spot_id == spot_id)
            .count()
    }

    pub fn preview_image(&self, spot_id: SpotId) -> Option<&str> {
        self.spot_images
            .values()
            .find(|image| image.spot_id == spot_id && image.preview)
            .map(|image| image.url.as_str())
    }

    // Spot images

    pub fn spot_image(&self, id: SpotImageId) -> Option<&SpotImage> {
        self.spot_images.get(&id)
    }

    pub fn spot_images(&self, spot_id: SpotId) -> Vec<&SpotImage> {
        self.spot_images
            .values()
            .filter(|image| image.spot_id == spot_id)
            .collect()
    }

    pub fn insert_spot_image(&mut self, spot_id: SpotId, draft: &ImageDraft) -> SpotImage {
        let image = SpotImage {
            id: self.spot_image_ids.next(),
            spot_id,
            url: draft.url.trim().to_string(),
            preview: draft.preview,
        };

        self.spot_images.insert(image.id, image.clone());
        image
    }

    pub fn delete_spot_image(&mut self, id: SpotImageId) -> Option<SpotImage> {
        self.spot_images.remove(&id)
    }

    // Reviews

    pub fn review(&self, id: ReviewId) -> Option<&Review> {
        self.reviews.get(&id)
    }

    pub fn reviews_for_spot(&self, spot_id: SpotId) -> Vec<&Review> {
        self.reviews
            .values()
            .filter(|review| review.spot_id == spot_id)
            .collect()
    }

    pub fn reviews_by_user(&self, user_id: UserId) -> Vec<&Review> {
        self.reviews
            .values()
            .filter(|review| review.user_id == user_id)
            .collect()
    }

    pub fn review_by(&self, user_id: UserId, spot_id: SpotId) -> Option<&Review> {
        self.reviews
            .values()
            .find(|review| review.user_id == user_id && review.spot_id == spot_id)
    }

    pub fn insert_review(
        &mut self,
        user_id: UserId,
        spot_id: SpotId,
        draft: &ReviewDraft,
        now: DateTime<Utc>,
    ) -> Review {
        let review = Review {
            id: self.review_ids.next(),
            user_id,
            spot_id,
            review: draft.review.trim().to_string(),
            stars: draft.stars(),
            created_at: now,
            updated_at: now,
        };

        self.reviews.insert(review.id, review.clone());
        review
    }

    pub fn update_review(
        &mut self,
        id: ReviewId,
        draft: &ReviewDraft,
        now: DateTime<Utc>,
    ) -> Option<Review> {
        let review = self.reviews.get_mut(&id)?;

        review.review = draft.review.trim().to_string();
        review.stars = draft.stars();
        review.updated_at = now;

        Some(review.clone())
    }

    pub fn delete_review(&mut self, id: ReviewId) -> Option<Review> {
        let review = self.reviews.remove(&id)?;
        self.review_images.retain(|_, image| image.review_id != id);
        Some(review)
    }

    // Review images

    pub fn review_image(&self, id: ReviewImageId) -> Option<&ReviewImage> {
        self.review_images.get(&id)
    }

    pub fn review_images(&self, review_id: ReviewId) -> Vec<&ReviewImage> {
        self.review_images
            .values()
            .filter(|image| image.review_id == review_id)
            .collect()
    }

    pub fn insert_review_image(&mut self, review_id: ReviewId, draft: &ImageDraft) -> ReviewImage {
        let image = ReviewImage {
            id: self.review_image_ids.next(),
            review_id,
            url: draft.url.trim().to_string(),
        };

        self.review_images.insert(image.id, image.clone());
        image
    }

    pub fn delete_review_image(&mut self, id: ReviewImageId) -> Option<ReviewImage> {
        self.review_images.remove(&id)
    }

    // Bookings

    pub fn booking(&self, id: BookingId) -> Option<&Booking> {
        self.bookings.get(&id)
    }

    /// Ordered by check-in date.
    pub fn bookings_for_spot(&self, spot_id: SpotId) -> Vec<&Booking> {
        let mut bookings = self
            .bookings
            .values()
            .filter(|booking| booking.spot_id == spot_id)
            .collect::<Vec<_>>();
        bookings.sort_by_key(|booking| (booking.start_date, booking.id));
        bookings
    }

    pub fn bookings_by_user(&self, user_id: UserId) -> Vec<&Booking> {
        let mut bookings = self
            .bookings
            .values()
            .filter(|booking| booking.user_id == user_id)
            .collect::<Vec<_>>();
        bookings.sort_by_key(|booking| (booking.start_date, booking.id));
        bookings
    }

    /// `None` when the spot no longer exists.
    pub fn insert_booking(
        &mut self,
        spot_id: SpotId,
        user_id: UserId,
        range: DateRange,
        now: DateTime<Utc>,
    ) -> Option<Booking> {
        if !self.spots.contains_key(&spot_id) {
            return None;
        }

        let booking = Booking {
            id: self.booking_ids.next(),
            spot_id,
            user_id,
            start_date: range.start,
            end_date: range.end,
            created_at: now,
            updated_at: now,
        };

        self.bookings.insert(booking.id, booking.clone());
        Some(booking)
    }

    pub fn update_booking(
        &mut self,
        id: BookingId,
        range: DateRange,
        now: DateTime<Utc>,
    ) -> Option<Booking> {
        let booking = self.bookings.get_mut(&id)?;

        booking.start_date = range.start;
        booking.end_date = range.end;
        booking.updated_at = now;

        Some(booking.clone())
    }

    pub fn delete_booking(&mut self, id: BookingId) -> Option<Booking> {
        self.bookings.remove(&id)
    }
}
