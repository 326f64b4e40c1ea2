//! Course catalog lookups.
//!
//! The cart only stores what it needs to price and list an item; thumbnails
//! and the rest of a course's presentation live here.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cart::{CartItem, Price};
use crate::error::CartError;

/// A course offered in the marketplace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub title: String,
    pub instructor: String,
    pub price: Price,
    #[serde(default)]
    pub thumbnail: String,
}

impl Course {
    pub fn to_cart_item(&self) -> CartItem {
        CartItem::new(
            self.id.clone(),
            self.title.clone(),
            self.instructor.clone(),
            self.price,
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    courses: Vec<Course>,
}

impl Catalog {
    pub fn new(courses: Vec<Course>) -> Self {
        Self { courses }
    }

    /// The sample catalog shipped with the storefront.
    pub fn builtin() -> Self {
        let course = |id: &str, title: &str, instructor: &str, price: u32, thumb: &str| Course {
            id: id.to_string(),
            title: title.to_string(),
            instructor: instructor.to_string(),
            price: Price::whole(price),
            thumbnail: format!("https://images.course-cart.dev/thumbnails/{}.jpg", thumb),
        };

        Self::new(vec![
            course("1", "Complete Web Development Bootcamp", "Angela Yu", 499, "web-bootcamp"),
            course("2", "React - The Complete Guide", "Maximilian Schwarzmuller", 649, "react-guide"),
            course("3", "Python for Data Science", "Jose Portilla", 549, "python-data"),
            course("4", "Introduction to Programming", "Open Courseware", 0, "intro-programming"),
            course("5", "Systems Programming with Rust", "Carol Nichols", 799, "rust-systems"),
            course("6", "UI/UX Design Fundamentals", "Gary Simon", 399, "uiux-fundamentals"),
        ])
    }

    /// Load a catalog from a TOML file with a `[[courses]]` array.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CartError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read catalog {}", path.display()))?;
        let catalog = Self::from_toml(&raw)?;
        debug!(path = %path.display(), courses = catalog.len(), "loaded catalog");
        Ok(catalog)
    }

    pub fn from_toml(raw: &str) -> Result<Self, CartError> {
        let catalog: Catalog =
            toml::from_str(raw).map_err(|e| CartError::Catalog(format!("invalid catalog: {}", e)))?;

        for (index, course) in catalog.courses.iter().enumerate() {
            if catalog.courses[..index].iter().any(|c| c.id == course.id) {
                return Err(CartError::Catalog(format!(
                    "duplicate course id '{}'",
                    course.id
                )));
            }
        }
        Ok(catalog)
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    pub fn course(&self, id: &str) -> Option<&Course> {
        self.courses.iter().find(|c| c.id == id)
    }

    /// Thumbnail URL for a course, or an empty string if unknown.
    pub fn thumbnail(&self, id: &str) -> &str {
        self.course(id).map(|c| c.thumbnail.as_str()).unwrap_or("")
    }

    /// Resolve a course id into an item that can be put in a cart.
    pub fn cart_item(&self, id: &str) -> Result<CartItem, CartError> {
        self.course(id)
            .map(Course::to_cart_item)
            .ok_or_else(|| CartError::UnknownCourse(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_has_a_free_course() {
        let catalog = Catalog::builtin();
        assert!(catalog.courses().iter().any(|c| c.price.is_free()));
    }

    #[test]
    fn test_thumbnail_for_unknown_id_is_empty() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.thumbnail("missing"), "");
        assert!(catalog.thumbnail("1").ends_with("web-bootcamp.jpg"));
    }

    #[test]
    fn test_cart_item_unknown_course() {
        let err = Catalog::builtin().cart_item("missing").unwrap_err();
        assert!(matches!(err, CartError::UnknownCourse(ref id) if id == "missing"));
    }

    #[test]
    fn test_from_toml() {
        let catalog = Catalog::from_toml(
            r#"
            [[courses]]
            id = "rust"
            title = "Rust in Action"
            instructor = "Tim"
            price = 450

            [[courses]]
            id = "free"
            title = "Git Basics"
            instructor = "Linus"
            price = 0
            thumbnail = "https://example.com/git.png"
            "#,
        )
        .unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.thumbnail("rust"), "");
        assert_eq!(catalog.cart_item("rust").unwrap().price, Price::whole(450));
        assert!(catalog.course("free").unwrap().price.is_free());
    }

    #[test]
    fn test_from_toml_rejects_duplicates_and_negative_prices() {
        let dup = r#"
            [[courses]]
            id = "a"
            title = "A"
            instructor = "x"
            price = 1
            [[courses]]
            id = "a"
            title = "A2"
            instructor = "y"
            price = 2
        "#;
        assert!(matches!(Catalog::from_toml(dup), Err(CartError::Catalog(_))));

        let negative = r#"
            [[courses]]
            id = "a"
            title = "A"
            instructor = "x"
            price = -3
        "#;
        assert!(Catalog::from_toml(negative).is_err());
    }
}
