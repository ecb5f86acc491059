use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date format used by the APOD endpoint in both requests and responses.
/// Lexicographic order on this format equals chronological order, which the
/// list merge and the favorites table both rely on.
pub const APOD_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
}

/// One day's APOD entry. `date` is the unique business key within any feed
/// or favorites collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Apod {
    pub date: String,
    pub title: String,
    pub explanation: String,
    pub media_type: MediaType,
    /// Primary media URL. Absent for some historical entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Higher-resolution variant, image entries only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hdurl: Option<String>,
    pub service_version: String,
}

impl Apod {
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, APOD_DATE_FORMAT).ok()
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(APOD_DATE_FORMAT).to_string()
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, APOD_DATE_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Apod {
        Apod {
            date: "2024-01-01".to_string(),
            title: "Test".to_string(),
            explanation: "An explanation".to_string(),
            media_type: MediaType::Image,
            url: Some("https://example.com/image.jpg".to_string()),
            hdurl: None,
            service_version: "v1".to_string(),
        }
    }

    #[test]
    fn test_decode_wire_format() {
        let json = r#"{
            "date": "2024-03-15",
            "explanation": "A galaxy far away",
            "hdurl": "https://apod.nasa.gov/hd.jpg",
            "media_type": "image",
            "service_version": "v1",
            "title": "Galaxy",
            "url": "https://apod.nasa.gov/sd.jpg"
        }"#;
        let apod: Apod = serde_json::from_str(json).unwrap();
        assert_eq!(apod.date, "2024-03-15");
        assert_eq!(apod.media_type, MediaType::Image);
        assert_eq!(apod.hdurl.as_deref(), Some("https://apod.nasa.gov/hd.jpg"));
    }

    #[test]
    fn test_decode_missing_optionals() {
        // Video entries commonly omit hdurl; some entries omit url entirely.
        let json = r#"{
            "date": "2024-03-16",
            "explanation": "A video",
            "media_type": "video",
            "service_version": "v1",
            "title": "Video Day"
        }"#;
        let apod: Apod = serde_json::from_str(json).unwrap();
        assert_eq!(apod.media_type, MediaType::Video);
        assert!(apod.url.is_none());
        assert!(apod.hdurl.is_none());
    }

    #[test]
    fn test_roundtrip_preserves_absent_fields() {
        let mut apod = sample();
        apod.url = None;
        let encoded = serde_json::to_string(&apod).unwrap();
        // Absent must stay absent, not become an empty string or null.
        assert!(!encoded.contains("\"url\""));
        assert!(!encoded.contains("\"hdurl\""));
        let decoded: Apod = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, apod);
    }

    #[test]
    fn test_roundtrip_full() {
        let apod = Apod {
            hdurl: Some("https://example.com/hd.jpg".to_string()),
            ..sample()
        };
        let decoded: Apod =
            serde_json::from_str(&serde_json::to_string(&apod).unwrap()).unwrap();
        assert_eq!(decoded, apod);
    }

    #[test]
    fn test_date_helpers() {
        let d = parse_date("2024-02-29").unwrap();
        assert_eq!(format_date(d), "2024-02-29");
        assert!(parse_date("not-a-date").is_none());
        assert_eq!(sample().parsed_date(), parse_date("2024-01-01"));
    }
}
