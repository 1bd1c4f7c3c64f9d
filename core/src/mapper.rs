//! Catalog records to display records, and thumbnail URL construction.

use url::Url;

use crate::types::{CatalogRecord, DisplayRecord, ImageVariant};

impl From<CatalogRecord> for DisplayRecord {
    fn from(record: CatalogRecord) -> Self {
        DisplayRecord {
            name: record.name,
            description: record.description,
            photo_url: record.thumbnail.path,
            photo_extension: record.thumbnail.extension,
        }
    }
}

/// Order-preserving, one-to-one conversion of a fetched list.
pub fn to_display_records(records: Vec<CatalogRecord>) -> Vec<DisplayRecord> {
    records.into_iter().map(DisplayRecord::from).collect()
}

/// Thumbnail URL at the default `portrait_xlarge` size.
///
/// `image_url("http://example.com/image", "jpg")` is
/// `http://example.com/image/portrait_xlarge.jpg`.
pub fn image_url(photo_url: &str, extension: &str) -> Option<String> {
    image_url_for(photo_url, extension, ImageVariant::default())
}

/// Append `{variant}.{extension}` as a new path segment of `photo_url`.
///
/// `photo_url` is only parsed to validate it; the result keeps its text as
/// given, so host case and explicit ports survive. Returns `None` when
/// `photo_url` is not an absolute URL that can carry path segments.
pub fn image_url_for(photo_url: &str, extension: &str, variant: ImageVariant) -> Option<String> {
    let url = Url::parse(photo_url).ok()?;
    if url.cannot_be_a_base() {
        return None;
    }
    let base = photo_url.trim_end_matches('/');
    Some(format!("{base}/{}.{extension}", variant.as_str()))
}

impl DisplayRecord {
    pub fn image_url(&self) -> Option<String> {
        image_url(&self.photo_url, &self.photo_extension)
    }

    pub fn image_url_for(&self, variant: ImageVariant) -> Option<String> {
        image_url_for(&self.photo_url, &self.photo_extension, variant)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::types::Thumbnail;

    fn record(name: &str) -> CatalogRecord {
        CatalogRecord {
            name: name.to_string(),
            description: format!("{name} description"),
            thumbnail: Thumbnail {
                path: format!("http://i.annihil.us/u/prod/marvel/i/mg/{name}"),
                extension: "jpg".to_string(),
            },
        }
    }

    #[test]
    fn conversion_is_field_identity() {
        let display = DisplayRecord::from(record("hulk"));
        assert_eq!(
            display,
            DisplayRecord {
                name: "hulk".to_string(),
                description: "hulk description".to_string(),
                photo_url: "http://i.annihil.us/u/prod/marvel/i/mg/hulk".to_string(),
                photo_extension: "jpg".to_string(),
            }
        );
    }

    #[test]
    fn list_conversion_preserves_order_and_duplicates() {
        let names = ["storm", "hulk", "storm", "angel"];
        let display = to_display_records(names.iter().map(|n| record(n)).collect());
        let got: Vec<&str> = display.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(got, names);
    }

    #[test]
    fn image_url_appends_portrait_xlarge() {
        assert_eq!(
            image_url("http://example.com/image", "jpg").as_deref(),
            Some("http://example.com/image/portrait_xlarge.jpg")
        );
    }

    #[test]
    fn image_url_trailing_slash_does_not_double() {
        assert_eq!(
            image_url("http://example.com/image/", "png").as_deref(),
            Some("http://example.com/image/portrait_xlarge.png")
        );
    }

    #[test]
    fn image_url_for_other_variant() {
        assert_eq!(
            image_url_for("https://cdn.example.com/a/b", "gif", ImageVariant::StandardLarge)
                .as_deref(),
            Some("https://cdn.example.com/a/b/standard_large.gif")
        );
    }

    #[test]
    fn image_url_keeps_base_text_verbatim() {
        assert_eq!(
            image_url("http://Example.COM:80/Image", "jpg").as_deref(),
            Some("http://Example.COM:80/Image/portrait_xlarge.jpg")
        );
    }

    #[test]
    fn image_url_rejects_unparseable_base() {
        assert_eq!(image_url("mailto:storm@example.com", "jpg"), None);
        assert_eq!(image_url("not a url", "jpg"), None);
        assert_eq!(image_url("", "jpg"), None);
    }

    #[test]
    fn display_record_image_url_uses_its_fields() {
        let display = DisplayRecord::from(record("hulk"));
        assert_eq!(
            display.image_url().as_deref(),
            Some("http://i.annihil.us/u/prod/marvel/i/mg/hulk/portrait_xlarge.jpg")
        );
    }
}
