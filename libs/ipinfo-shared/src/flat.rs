use serde::{Deserialize, Serialize};

use crate::{Field, Section, null_as_default};

pub const DEFAULT_BASE_URL: &str = "http://ip-api.com/json/";

pub const DEFAULT_FIELDS: &str = "status,message,continent,continentCode,country,countryCode,\
region,regionName,city,district,zip,lat,lon,timezone,offset,currency,isp,org,as,asname,\
reverse,mobile,proxy,hosting,query";

/// ip-api.com lookup result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FlatRecord {
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    #[serde(deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(deserialize_with = "null_as_default")]
    pub continent: String,
    #[serde(deserialize_with = "null_as_default")]
    pub continent_code: String,
    #[serde(deserialize_with = "null_as_default")]
    pub country: String,
    #[serde(deserialize_with = "null_as_default")]
    pub country_code: String,
    #[serde(deserialize_with = "null_as_default")]
    pub region: String,
    #[serde(deserialize_with = "null_as_default")]
    pub region_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub city: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    #[serde(deserialize_with = "null_as_default")]
    pub district: String,
    #[serde(deserialize_with = "null_as_default")]
    pub zip: String,
    #[serde(deserialize_with = "null_as_default")]
    pub lat: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub lon: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub timezone: String,
    /// Seconds from UTC.
    #[serde(deserialize_with = "null_as_default")]
    pub offset: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub currency: String,
    #[serde(deserialize_with = "null_as_default")]
    pub isp: String,
    #[serde(deserialize_with = "null_as_default")]
    pub org: String,
    #[serde(rename = "as")]
    #[serde(deserialize_with = "null_as_default")]
    pub as_number: String,
    #[serde(rename = "asname")]
    #[serde(deserialize_with = "null_as_default")]
    pub as_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub reverse: String,
    #[serde(deserialize_with = "null_as_default")]
    pub mobile: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub proxy: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub hosting: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub query: String,
}

impl FlatRecord {
    pub fn sections(&self) -> Vec<Section> {
        vec![
            Section {
                id: "General",
                title: "General Information",
                fields: vec![
                    Field::new("IP", &self.query),
                    Field::new("Status", &self.status),
                    Field::new("Message", &self.message),
                    Field::new("Reverse DNS", &self.reverse),
                ],
            },
            Section {
                id: "Location",
                title: "Location",
                fields: vec![
                    Field::new("Continent", &self.continent),
                    Field::new("Continent Code", &self.continent_code),
                    Field::new("Country", &self.country),
                    Field::new("Country Code", &self.country_code),
                    Field::new("Region", &self.region),
                    Field::new("Region Name", &self.region_name),
                    Field::new("City", &self.city),
                    Field::new("District", &self.district),
                    Field::new("ZIP", &self.zip),
                    Field::new("Latitude", self.lat),
                    Field::new("Longitude", self.lon),
                    Field::new("Timezone", &self.timezone),
                    Field::new("UTC Offset", self.offset),
                    Field::new("Currency", &self.currency),
                ],
            },
            Section {
                id: "Network",
                title: "Network",
                fields: vec![
                    Field::new("ISP", &self.isp),
                    Field::new("Organization", &self.org),
                    Field::new("AS", &self.as_number),
                    Field::new("AS Name", &self.as_name),
                ],
            },
            Section {
                id: "Risk",
                title: "Risk Flags",
                fields: vec![
                    Field::new("Mobile", self.mobile),
                    Field::new("Proxy", self.proxy),
                    Field::new("Hosting", self.hosting),
                ],
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BERLIN: &str = r#"{
        "status": "success",
        "continent": "Europe",
        "continentCode": "EU",
        "country": "Germany",
        "countryCode": "DE",
        "region": "BE",
        "regionName": "Land Berlin",
        "city": "Berlin",
        "zip": "10115",
        "lat": 52.52,
        "lon": 13.405,
        "timezone": "Europe/Berlin",
        "offset": 7200,
        "currency": "EUR",
        "isp": "Deutsche Telekom",
        "org": "Deutsche Telekom AG",
        "as": "AS3320",
        "asname": "DTAG",
        "reverse": "p5b0c.dip0.t-ipconnect.de",
        "mobile": false,
        "proxy": false,
        "hosting": false,
        "query": "91.12.1.1"
    }"#;

    #[test]
    fn parses_full_response() {
        let record: FlatRecord = serde_json::from_str(BERLIN).unwrap();
        assert_eq!(record.query, "91.12.1.1");
        assert_eq!(record.continent_code, "EU");
        assert_eq!(record.region_name, "Land Berlin");
        assert_eq!(record.as_number, "AS3320");
        assert_eq!(record.as_name, "DTAG");
        assert_eq!(record.offset, 7200);
        assert!((record.lat - 52.52).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_fields_default_and_unknown_fields_are_ignored() {
        let record: FlatRecord =
            serde_json::from_str(r#"{"query":"8.8.8.8","isMobileCarrier":"yes"}"#).unwrap();
        assert_eq!(record.query, "8.8.8.8");
        assert_eq!(record.city, "");
        assert_eq!(record.lat, 0.0);
        assert!(!record.hosting);
    }

    #[test]
    fn integer_coordinates_are_accepted() {
        let record: FlatRecord = serde_json::from_str(r#"{"lat":52,"lon":13}"#).unwrap();
        assert_eq!(record.lat, 52.0);
    }

    #[test]
    fn mistyped_value_is_rejected() {
        assert!(serde_json::from_str::<FlatRecord>(r#"{"lat":"north"}"#).is_err());
        assert!(serde_json::from_str::<FlatRecord>(r#"{"mobile":"yes"}"#).is_err());
    }

    #[test]
    fn null_scalars_take_zero_values() {
        let body = br#"{"query":"1.1.1.1","district":null,"lat":null,"offset":null,"mobile":null,"as":null}"#;
        let record = match crate::Record::parse(crate::Schema::Flat, body).unwrap() {
            crate::Record::Flat(record) => record,
            other => panic!("unexpected record: {other:?}"),
        };
        assert_eq!(record.query, "1.1.1.1");
        assert_eq!(record.district, "");
        assert_eq!(record.lat, 0.0);
        assert_eq!(record.offset, 0);
        assert!(!record.mobile);
        assert_eq!(record.as_number, "");
    }

    #[test]
    fn sections_render_flags_as_text() {
        let record = FlatRecord {
            mobile: true,
            proxy: false,
            hosting: true,
            ..Default::default()
        };
        let risk = record
            .sections()
            .into_iter()
            .find(|s| s.id == "Risk")
            .unwrap();
        let values: Vec<_> = risk.fields.iter().map(|f| f.value.as_str()).collect();
        assert_eq!(values, ["true", "false", "true"]);
    }

    #[test]
    fn empty_optional_fields_are_not_serialized() {
        let value = serde_json::to_value(FlatRecord::default()).unwrap();
        assert!(value.get("message").is_none());
        assert!(value.get("district").is_none());
        assert_eq!(value["as"], "");
    }
}
