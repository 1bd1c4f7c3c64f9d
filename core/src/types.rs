//! Catalog DTOs and the UI-facing character record.
//!
//! # Design
//! `CatalogRecord` mirrors the wire shape of one character; `DisplayRecord`
//! is the flat record the UI layer renders. They are defined separately so a
//! change in the API's field names never reaches a view.
//!
//! The response envelope keeps `data` and `results` optional. A body that
//! decodes but lacks the list is a missing-data failure, which is reported
//! differently from a decode failure. Envelope fields other than `results`
//! are informational and decode leniently: a value of the wrong type reads
//! as absent instead of failing the whole response.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// Decode an optional field, treating a value of the wrong type as absent.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Thumbnail locator as returned by the catalog: a base path without the
/// size variant, plus the file extension.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Thumbnail {
    pub path: String,
    pub extension: String,
}

/// One character as returned by the catalog API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogRecord {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub thumbnail: Thumbnail,
}

/// The `data` object of a catalog response.
///
/// `results` is kept as raw JSON until extraction so that a non-array value
/// is classified as missing data rather than a decode error.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CharacterDataContainer {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub total: Option<u32>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<serde_json::Value>,
}

/// Top-level envelope of a catalog response.
///
/// A `data` that is not an object reads as `None`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CharacterDataWrapper {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<serde_json::Value>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub attribution_text: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub data: Option<CharacterDataContainer>,
}

/// A character ready for display. Built from exactly one `CatalogRecord`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DisplayRecord {
    pub name: String,
    pub description: String,
    pub photo_url: String,
    pub photo_extension: String,
}

/// Image size variants understood by the catalog's image CDN.
///
/// The variant name is the file stem appended to a thumbnail path, e.g.
/// `{path}/portrait_xlarge.{extension}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ImageVariant {
    PortraitSmall,
    PortraitMedium,
    #[default]
    PortraitXlarge,
    PortraitFantastic,
    PortraitUncanny,
    PortraitIncredible,
    StandardSmall,
    StandardMedium,
    StandardLarge,
    StandardXlarge,
    StandardFantastic,
    StandardAmazing,
    LandscapeSmall,
    LandscapeMedium,
    LandscapeLarge,
    LandscapeXlarge,
    LandscapeAmazing,
    LandscapeIncredible,
    Detail,
}

impl ImageVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageVariant::PortraitSmall => "portrait_small",
            ImageVariant::PortraitMedium => "portrait_medium",
            ImageVariant::PortraitXlarge => "portrait_xlarge",
            ImageVariant::PortraitFantastic => "portrait_fantastic",
            ImageVariant::PortraitUncanny => "portrait_uncanny",
            ImageVariant::PortraitIncredible => "portrait_incredible",
            ImageVariant::StandardSmall => "standard_small",
            ImageVariant::StandardMedium => "standard_medium",
            ImageVariant::StandardLarge => "standard_large",
            ImageVariant::StandardXlarge => "standard_xlarge",
            ImageVariant::StandardFantastic => "standard_fantastic",
            ImageVariant::StandardAmazing => "standard_amazing",
            ImageVariant::LandscapeSmall => "landscape_small",
            ImageVariant::LandscapeMedium => "landscape_medium",
            ImageVariant::LandscapeLarge => "landscape_large",
            ImageVariant::LandscapeXlarge => "landscape_xlarge",
            ImageVariant::LandscapeAmazing => "landscape_amazing",
            ImageVariant::LandscapeIncredible => "landscape_incredible",
            ImageVariant::Detail => "detail",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_record_description_defaults_to_empty() {
        let record: CatalogRecord = serde_json::from_str(
            r#"{"name":"3-D Man","thumbnail":{"path":"http://i.annihil.us/a","extension":"jpg"}}"#,
        )
        .unwrap();
        assert_eq!(record.description, "");
    }

    #[test]
    fn catalog_record_ignores_unknown_fields() {
        let record: CatalogRecord = serde_json::from_str(
            r#"{"id":1011334,"name":"3-D Man","description":"","modified":"2014-04-29T14:18:17-0400",
                "thumbnail":{"path":"http://i.annihil.us/a","extension":"jpg"},"comics":{"available":12}}"#,
        )
        .unwrap();
        assert_eq!(record.name, "3-D Man");
        assert_eq!(record.thumbnail.extension, "jpg");
    }

    #[test]
    fn wrapper_reads_camel_case_attribution() {
        let wrapper: CharacterDataWrapper = serde_json::from_str(
            r#"{"code":200,"status":"Ok","attributionText":"Data provided by Marvel. © 2024 MARVEL","data":{"count":0,"results":[]}}"#,
        )
        .unwrap();
        assert_eq!(
            wrapper.attribution_text.as_deref(),
            Some("Data provided by Marvel. © 2024 MARVEL")
        );
        assert_eq!(wrapper.data.unwrap().count, Some(0));
    }

    #[test]
    fn wrapper_tolerates_mistyped_informational_fields() {
        let wrapper: CharacterDataWrapper = serde_json::from_str(
            r#"{"code":200,"status":200,"attributionText":7,"data":{"total":"1","count":null,"results":[]}}"#,
        )
        .unwrap();
        assert_eq!(wrapper.status, None);
        assert_eq!(wrapper.attribution_text, None);
        let data = wrapper.data.unwrap();
        assert_eq!(data.total, None);
        assert_eq!(data.count, None);
        assert_eq!(data.results, Some(serde_json::json!([])));
    }

    #[test]
    fn wrapper_reads_non_object_data_as_absent() {
        let wrapper: CharacterDataWrapper = serde_json::from_str(r#"{"data":"nope"}"#).unwrap();
        assert_eq!(wrapper.data, None);
    }

    #[test]
    fn default_variant_is_portrait_xlarge() {
        assert_eq!(ImageVariant::default().as_str(), "portrait_xlarge");
    }
}
