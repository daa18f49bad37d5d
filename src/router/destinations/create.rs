//! Host a new destination from a multipart form with image uploads.

use axum::body::Bytes;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use uuid::Uuid;
use validator::{ValidationError, ValidationErrors};

use crate::AppState;
use crate::destination::{Availability, Destination, DestinationRepository};
use crate::error::{Result, ServerError};
use crate::storage::{MAX_IMAGE_BYTES, MediaStore};

#[derive(Debug, Default)]
struct Form {
    title: Option<String>,
    room_type: Option<String>,
    description: Option<String>,
    address: Option<String>,
    city: Option<String>,
    country: Option<String>,
    price: Option<f64>,
    amenities: Vec<String>,
    max_guests: Option<i32>,
    bedrooms: Option<i32>,
    bathrooms: Option<i32>,
    beds: Option<i32>,
    available_from: Option<DateTime<Utc>>,
    available_to: Option<DateTime<Utc>>,
    images: Vec<(&'static str, Bytes)>,
}

fn invalid(field: &'static str, message: String) -> ValidationError {
    ValidationError::new(field).with_message(message.into())
}

fn parse_timestamp(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: &str,
) -> Option<DateTime<Utc>> {
    match DateTime::parse_from_rfc3339(value) {
        Ok(date) => Some(date.with_timezone(&Utc)),
        Err(_) => {
            errors.add(
                field,
                invalid(field, format!("{field} must be an RFC 3339 date.")),
            );
            None
        },
    }
}

fn parse_number<T: std::str::FromStr>(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: &str,
) -> Option<T> {
    match value.trim().parse::<T>() {
        Ok(number) => Some(number),
        Err(_) => {
            errors.add(
                field,
                invalid(field, format!("{field} must be a number.")),
            );
            None
        },
    }
}

fn require<T>(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: Option<T>,
) -> Option<T> {
    if value.is_none() {
        errors.add(field, invalid(field, format!("{field} is required.")));
    }
    value
}

fn text(value: String) -> Option<String> {
    Some(value).filter(|text| !text.trim().is_empty())
}

async fn parse_form(
    mut multipart: Multipart,
) -> Result<(Form, ValidationErrors)> {
    let mut form = Form::default();
    let mut errors = ValidationErrors::new();

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };

        match name.as_str() {
            "images" => {
                let content_type =
                    field.content_type().unwrap_or_default().to_owned();
                let data = field.bytes().await?;

                let Some(extension) = MediaStore::extension_for(&content_type)
                else {
                    errors.add(
                        "images",
                        invalid(
                            "images",
                            "Images must be jpeg, jpg, png or webp."
                                .to_owned(),
                        ),
                    );
                    continue;
                };
                if data.len() > MAX_IMAGE_BYTES {
                    errors.add(
                        "images",
                        invalid(
                            "images",
                            "Images must not exceed 5MB.".to_owned(),
                        ),
                    );
                    continue;
                }

                form.images.push((extension, data));
            },
            _ => {
                let value = field.text().await?;

                match name.as_str() {
                    "title" => form.title = text(value),
                    "roomType" => form.room_type = text(value),
                    "description" => form.description = text(value),
                    "address" => form.address = text(value),
                    "city" => form.city = text(value),
                    "country" => form.country = text(value),
                    "price" => {
                        form.price = parse_number(&mut errors, "price", &value)
                    },
                    "amenities" => form.amenities.extend(text(value)),
                    "maxGuests" => {
                        form.max_guests =
                            parse_number(&mut errors, "maxGuests", &value)
                    },
                    "bedrooms" => {
                        form.bedrooms =
                            parse_number(&mut errors, "bedrooms", &value)
                    },
                    "bathrooms" => {
                        form.bathrooms =
                            parse_number(&mut errors, "bathrooms", &value)
                    },
                    "beds" => {
                        form.beds = parse_number(&mut errors, "beds", &value)
                    },
                    "availableFrom" => {
                        form.available_from = parse_timestamp(
                            &mut errors,
                            "availableFrom",
                            &value,
                        )
                    },
                    "availableTo" => {
                        form.available_to =
                            parse_timestamp(&mut errors, "availableTo", &value)
                    },
                    // unknown fields are ignored.
                    _ => {},
                }
            },
        }
    }

    Ok((form, errors))
}

/// Handler to create a destination.
pub async fn handler(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Destination>)> {
    let (mut form, mut errors) = parse_form(multipart).await?;

    let title = require(&mut errors, "title", form.title.take());
    let room_type = require(&mut errors, "roomType", form.room_type.take());
    let description =
        require(&mut errors, "description", form.description.take());
    let address = require(&mut errors, "address", form.address.take());
    let country = require(&mut errors, "country", form.country.take());
    let price = require(&mut errors, "price", form.price.take());
    let available_from =
        require(&mut errors, "availableFrom", form.available_from.take());
    let available_to =
        require(&mut errors, "availableTo", form.available_to.take());

    if !errors.is_empty() {
        return Err(errors.into());
    }

    let id = Uuid::new_v4();
    let mut images = Vec::with_capacity(form.images.len());
    for (extension, data) in &form.images {
        let url = state.storage.save(id, extension, data).await.map_err(
            |err| ServerError::Internal {
                details: err.to_string(),
            },
        )?;
        images.push(url);
    }

    let destination = Destination {
        id,
        title: title.unwrap_or_default(),
        room_type: room_type.unwrap_or_default(),
        description: description.unwrap_or_default(),
        address: address.unwrap_or_default(),
        city: form.city,
        country: country.unwrap_or_default(),
        price: price.unwrap_or_default(),
        images,
        amenities: form.amenities,
        max_guests: form.max_guests.unwrap_or(1),
        bedrooms: form.bedrooms.unwrap_or(1),
        bathrooms: form.bathrooms.unwrap_or(1),
        beds: form.beds.unwrap_or(1),
        availability: Availability {
            from: available_from.unwrap_or_default(),
            to: available_to.unwrap_or_default(),
        },
        occupied: false,
        created_at: Utc::now(),
    };

    if let Err(err) = DestinationRepository::new(state.db.postgres.clone())
        .insert(&destination)
        .await
    {
        // stored files have no record pointing at them anymore.
        if let Err(err) = state.storage.remove_all(id).await {
            tracing::warn!(destination_id = %id, error = %err,
                "orphaned images left after failed insert");
        }
        return Err(err);
    }

    tracing::info!(destination_id = %id, "destination created");

    Ok((StatusCode::CREATED, Json(destination)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timestamp_accepts_rfc3339() {
        let mut errors = ValidationErrors::new();
        let parsed = parse_timestamp(
            &mut errors,
            "availableTo",
            "2026-09-01T12:00:00Z",
        );

        assert!(parsed.is_some());
        assert!(errors.is_empty());
    }

    #[test]
    fn test_parse_timestamp_flags_garbage() {
        let mut errors = ValidationErrors::new();
        assert!(parse_timestamp(&mut errors, "availableTo", "tomorrow")
            .is_none());
        assert!(errors.field_errors().contains_key("availableTo"));
    }

    #[test]
    fn test_require_collects_every_missing_field() {
        let mut errors = ValidationErrors::new();
        require::<String>(&mut errors, "title", None);
        require::<f64>(&mut errors, "price", None);
        require(&mut errors, "country", Some("Norway".to_owned()));

        let fields = errors.field_errors();
        assert!(fields.contains_key("title"));
        assert!(fields.contains_key("price"));
        assert!(!fields.contains_key("country"));
    }

    #[test]
    fn test_blank_text_counts_as_missing() {
        assert_eq!(text("  ".to_owned()), None);
        assert_eq!(text(String::new()), None);
        assert_eq!(text("Loft".to_owned()), Some("Loft".to_owned()));
    }
}
