use serde::{Deserialize, Serialize};

use crate::{Field, Section, null_as_default};

pub const DEFAULT_BASE_URL: &str = "https://ipinfo.io/widget";

/// ipinfo.io widget lookup result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetRecord {
    #[serde(deserialize_with = "null_as_default")]
    pub ip: String,
    #[serde(deserialize_with = "null_as_default")]
    pub hostname: String,
    #[serde(deserialize_with = "null_as_default")]
    pub city: String,
    #[serde(deserialize_with = "null_as_default")]
    pub region: String,
    #[serde(deserialize_with = "null_as_default")]
    pub country: String,
    /// "lat,lon"
    #[serde(deserialize_with = "null_as_default")]
    pub loc: String,
    #[serde(deserialize_with = "null_as_default")]
    pub org: String,
    #[serde(deserialize_with = "null_as_default")]
    pub postal: String,
    #[serde(deserialize_with = "null_as_default")]
    pub timezone: String,
    #[serde(deserialize_with = "null_as_default")]
    pub asn: Asn,
    #[serde(deserialize_with = "null_as_default")]
    pub company: Company,
    #[serde(deserialize_with = "null_as_default")]
    pub privacy: Privacy,
    #[serde(deserialize_with = "null_as_default")]
    pub abuse: Abuse,
    #[serde(deserialize_with = "null_as_default")]
    pub domains: Domains,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Asn {
    #[serde(deserialize_with = "null_as_default")]
    pub asn: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub domain: String,
    #[serde(deserialize_with = "null_as_default")]
    pub route: String,
    #[serde(rename = "type")]
    #[serde(deserialize_with = "null_as_default")]
    pub kind: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Company {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub domain: String,
    #[serde(rename = "type")]
    #[serde(deserialize_with = "null_as_default")]
    pub kind: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Privacy {
    #[serde(deserialize_with = "null_as_default")]
    pub vpn: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub proxy: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub tor: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub relay: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub hosting: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub service: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Abuse {
    #[serde(deserialize_with = "null_as_default")]
    pub address: String,
    #[serde(deserialize_with = "null_as_default")]
    pub country: String,
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub network: String,
    #[serde(deserialize_with = "null_as_default")]
    pub phone: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Domains {
    #[serde(deserialize_with = "null_as_default")]
    pub page: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub total: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub domains: Vec<String>,
}

impl WidgetRecord {
    pub fn sections(&self) -> Vec<Section> {
        vec![
            Section {
                id: "General",
                title: "General Information",
                fields: vec![
                    Field::new("IP", &self.ip),
                    Field::new("Hostname", &self.hostname),
                    Field::new("City", &self.city),
                    Field::new("Region", &self.region),
                    Field::new("Country", &self.country),
                    Field::new("Location", &self.loc),
                    Field::new("Organization", &self.org),
                    Field::new("Postal", &self.postal),
                    Field::new("Timezone", &self.timezone),
                ],
            },
            Section {
                id: "ASN",
                title: "ASN Information",
                fields: vec![
                    Field::new("ASN", &self.asn.asn),
                    Field::new("Name", &self.asn.name),
                    Field::new("Domain", &self.asn.domain),
                    Field::new("Route", &self.asn.route),
                    Field::new("Type", &self.asn.kind),
                ],
            },
            Section {
                id: "Company",
                title: "Company Information",
                fields: vec![
                    Field::new("Name", &self.company.name),
                    Field::new("Domain", &self.company.domain),
                    Field::new("Type", &self.company.kind),
                ],
            },
            Section {
                id: "Privacy",
                title: "Privacy Information",
                fields: vec![
                    Field::new("VPN", self.privacy.vpn),
                    Field::new("Proxy", self.privacy.proxy),
                    Field::new("Tor", self.privacy.tor),
                    Field::new("Relay", self.privacy.relay),
                    Field::new("Hosting", self.privacy.hosting),
                    Field::new("Service", &self.privacy.service),
                ],
            },
            Section {
                id: "Abuse",
                title: "Abuse Information",
                fields: vec![
                    Field::new("Address", &self.abuse.address),
                    Field::new("Country", &self.abuse.country),
                    Field::new("Email", &self.abuse.email),
                    Field::new("Name", &self.abuse.name),
                    Field::new("Network", &self.abuse.network),
                    Field::new("Phone", &self.abuse.phone),
                ],
            },
            Section {
                id: "Domains",
                title: "Domains Information",
                fields: vec![
                    Field::new("Page", self.domains.page),
                    Field::new("Total", self.domains.total),
                    Field::new("Domains", self.domains.domains.join(", ")),
                ],
            },
        ]
    }
}
