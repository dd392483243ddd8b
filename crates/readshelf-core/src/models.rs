//! Data models for readshelf
//!
//! Defines the records parsed from a Goodreads shelf feed: `Shelf` and
//! `ShelfItem`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A book on a Goodreads shelf, as published in the shelf's RSS feed
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ShelfItem {
    pub guid: String,
    pub pub_date: String,
    pub title: String,
    pub link: String,
    /// Goodreads book ID, the join key against local notes
    pub book_id: String,
    pub book_image_url: String,
    pub book_small_image_url: String,
    pub book_medium_image_url: String,
    pub book_large_image_url: String,
    pub book_description: String,
    pub author_name: String,
    pub isbn: String,
    pub user_name: String,
    /// The user's rating, 0 when unrated
    pub user_rating: u8,
    pub user_read_at: String,
    pub user_date_added: String,
    pub user_date_created: String,
    pub user_shelves: String,
    pub user_review: String,
    pub average_rating: f64,
    pub book_published: String,
    pub description: String,
}

impl ShelfItem {
    /// Create an item with just an ID and a title
    pub fn new(book_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            book_id: book_id.into(),
            title: title.into(),
            ..Default::default()
        }
    }

    /// Build an item from the text of its feed elements, keyed by element name
    ///
    /// Missing elements become empty strings; ratings that fail to parse become 0.
    pub fn from_fields(mut fields: HashMap<String, String>) -> Self {
        let mut take = |name: &str| fields.remove(name).unwrap_or_default();

        let user_rating = take("user_rating").trim().parse().unwrap_or(0);
        let average_rating = take("average_rating").trim().parse().unwrap_or(0.0);

        Self {
            guid: take("guid"),
            pub_date: take("pubDate"),
            title: take("title"),
            link: take("link"),
            book_id: take("book_id"),
            book_image_url: take("book_image_url"),
            book_small_image_url: take("book_small_image_url"),
            book_medium_image_url: take("book_medium_image_url"),
            book_large_image_url: take("book_large_image_url"),
            book_description: take("book_description"),
            author_name: take("author_name"),
            isbn: take("isbn"),
            user_name: take("user_name"),
            user_rating,
            user_read_at: take("user_read_at"),
            user_date_added: take("user_date_added"),
            user_date_created: take("user_date_created"),
            user_shelves: take("user_shelves"),
            user_review: take("user_review"),
            average_rating,
            book_published: take("book_published"),
            description: take("description"),
        }
    }

    /// Look up a field by name, as used by note templates
    ///
    /// Accepts every field name plus a few aliases (`author`, `bookID`,
    /// `rating`, `pubDate`).
    pub fn field(&self, name: &str) -> Option<String> {
        let value = match name {
            "guid" => self.guid.clone(),
            "pub_date" | "pubDate" => self.pub_date.clone(),
            "title" => self.title.clone(),
            "link" => self.link.clone(),
            "book_id" | "bookID" => self.book_id.clone(),
            "book_image_url" => self.book_image_url.clone(),
            "book_small_image_url" => self.book_small_image_url.clone(),
            "book_medium_image_url" => self.book_medium_image_url.clone(),
            "book_large_image_url" => self.book_large_image_url.clone(),
            "book_description" => self.book_description.clone(),
            "author_name" | "author" => self.author_name.clone(),
            "isbn" => self.isbn.clone(),
            "user_name" => self.user_name.clone(),
            "user_rating" | "rating" => self.user_rating.to_string(),
            "user_read_at" => self.user_read_at.clone(),
            "user_date_added" => self.user_date_added.clone(),
            "user_date_created" => self.user_date_created.clone(),
            "user_shelves" => self.user_shelves.clone(),
            "user_review" => self.user_review.clone(),
            "average_rating" => self.average_rating.to_string(),
            "book_published" => self.book_published.clone(),
            "description" => self.description.clone(),
            _ => return None,
        };
        Some(value)
    }
}

/// A shelf feed: channel metadata plus its books
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Shelf {
    pub title: String,
    pub link: String,
    pub description: String,
    pub last_build_date: String,
    pub items: Vec<ShelfItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_from_fields() {
        let item = ShelfItem::from_fields(fields(&[
            ("book_id", "5907"),
            ("title", "The Hobbit"),
            ("author_name", "J.R.R. Tolkien"),
            ("user_rating", "5"),
            ("average_rating", "4.28"),
            ("pubDate", "Mon, 01 Jan 2024 10:00:00 -0800"),
        ]));

        assert_eq!(item.book_id, "5907");
        assert_eq!(item.title, "The Hobbit");
        assert_eq!(item.author_name, "J.R.R. Tolkien");
        assert_eq!(item.user_rating, 5);
        assert!((item.average_rating - 4.28).abs() < f64::EPSILON);
        assert_eq!(item.pub_date, "Mon, 01 Jan 2024 10:00:00 -0800");
        assert!(item.isbn.is_empty());
    }

    #[test]
    fn test_from_fields_bad_numbers() {
        let item = ShelfItem::from_fields(fields(&[
            ("book_id", "1"),
            ("user_rating", ""),
            ("average_rating", "n/a"),
        ]));

        assert_eq!(item.user_rating, 0);
        assert_eq!(item.average_rating, 0.0);
    }

    #[test]
    fn test_field_aliases() {
        let mut item = ShelfItem::new("12", "Dune");
        item.author_name = "Frank Herbert".to_string();
        item.user_rating = 4;

        assert_eq!(item.field("author").as_deref(), Some("Frank Herbert"));
        assert_eq!(item.field("author_name").as_deref(), Some("Frank Herbert"));
        assert_eq!(item.field("bookID").as_deref(), Some("12"));
        assert_eq!(item.field("rating").as_deref(), Some("4"));
        assert!(item.field("nope").is_none());
    }
}
