//! Hotel XML to JSON conversion
//!
//! The mapping is fixed:
//!
//! ```text
//! <Hotels>                                   {"Hotels": {"Hotel": [
//!   <Hotel Rating="..">                        {"Name": .., "Phone": [..],
//!     <Name>..</Name>                           "Address": {"Number": .., "Street": ..,
//!     <Phone>..</Phone>*                                    "City": .., "State": ..,
//!     <Address Number=".." Street=".."                      "Zip": ..,
//!              City=".." State=".." Zip=".."                "_NearestAirport": ..},
//!              NearestAirport=".."/>            "_Rating": ..}
//!   </Hotel>*                                ]}}
//! </Hotels>
//! ```
//!
//! Only `Rating` and `NearestAirport` carry the `_` prefix, and both are left
//! out when the attribute is missing or empty. The other `Address` attributes
//! map to `null` when missing.

use serde::{Deserialize, Serialize};

use crate::document_loader::DocumentFetcher;
use crate::error::Result;
use crate::libxml2::{LibXml2Wrapper, XmlDocument, XmlElement};

const HOTEL: &str = "Hotel";
const NAME: &str = "Name";
const PHONE: &str = "Phone";
const ADDRESS: &str = "Address";
const RATING: &str = "Rating";
const NEAREST_AIRPORT: &str = "NearestAirport";

/// Top-level JSON object: `{"Hotels": {"Hotel": [...]}}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotelsDocument {
    #[serde(rename = "Hotels")]
    pub hotels: HotelList,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotelList {
    #[serde(rename = "Hotel")]
    pub hotel: Vec<HotelRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotelRecord {
    #[serde(rename = "Name")]
    pub name: Option<String>,
    #[serde(rename = "Phone")]
    pub phones: Vec<String>,
    #[serde(rename = "Address", skip_serializing_if = "Option::is_none")]
    pub address: Option<AddressRecord>,
    #[serde(rename = "_Rating", skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressRecord {
    #[serde(rename = "Number")]
    pub number: Option<String>,
    #[serde(rename = "Street")]
    pub street: Option<String>,
    #[serde(rename = "City")]
    pub city: Option<String>,
    #[serde(rename = "State")]
    pub state: Option<String>,
    #[serde(rename = "Zip")]
    pub zip: Option<String>,
    #[serde(rename = "_NearestAirport", skip_serializing_if = "Option::is_none")]
    pub nearest_airport: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl AddressRecord {
    pub fn from_element(address: &XmlElement<'_>) -> Self {
        AddressRecord {
            number: address.attribute("Number"),
            street: address.attribute("Street"),
            city: address.attribute("City"),
            state: address.attribute("State"),
            zip: address.attribute("Zip"),
            nearest_airport: non_empty(address.attribute(NEAREST_AIRPORT)),
        }
    }
}

impl HotelRecord {
    pub fn from_element(hotel: &XmlElement<'_>) -> Self {
        HotelRecord {
            name: hotel.first_child_named(NAME).map(|e| e.text_content()),
            phones: hotel
                .children_named(PHONE)
                .map(|e| e.text_content())
                .collect(),
            address: hotel
                .first_child_named(ADDRESS)
                .map(|e| AddressRecord::from_element(&e)),
            rating: non_empty(hotel.attribute(RATING)),
        }
    }
}

impl HotelsDocument {
    /// Build the JSON model from the `Hotel` children of the root element
    pub fn from_document(document: &XmlDocument) -> Self {
        let hotel = document
            .root_element()
            .map(|root| {
                root.children_named(HOTEL)
                    .map(|e| HotelRecord::from_element(&e))
                    .collect()
            })
            .unwrap_or_default();

        HotelsDocument {
            hotels: HotelList { hotel },
        }
    }

    /// Pretty-printed JSON text
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Parse in-memory XML and convert it
///
/// # Errors
///
/// Returns `Error::MalformedXml` when the input is not well-formed.
pub fn convert_bytes(xml: &[u8]) -> Result<HotelsDocument> {
    let document = LibXml2Wrapper::new().parse_document(xml)?;
    Ok(HotelsDocument::from_document(&document))
}

/// Convert in-memory XML to JSON text
pub fn convert_str(xml: &str) -> Result<String> {
    convert_bytes(xml.as_bytes())?.to_json()
}

/// Converts documents retrieved through a [`DocumentFetcher`]
pub struct Converter<'a, F: DocumentFetcher + ?Sized> {
    fetcher: &'a F,
}

impl<'a, F: DocumentFetcher + ?Sized> Converter<'a, F> {
    pub fn new(fetcher: &'a F) -> Self {
        Self { fetcher }
    }

    /// Fetch the document at `xml_locator` and convert it to JSON text
    ///
    /// # Errors
    ///
    /// Fetch and well-formedness failures propagate unchanged.
    pub async fn xml_to_json(&self, xml_locator: &str) -> Result<String> {
        let data = self.fetcher.fetch(xml_locator).await?;
        let hotels = convert_bytes(&data)?;
        tracing::info!(
            document = xml_locator,
            hotels = hotels.hotels.hotel.len(),
            "conversion finished"
        );
        hotels.to_json()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use serde_json::{Value, json};

    fn to_value(xml: &str) -> Value {
        serde_json::from_str(&convert_str(xml).unwrap()).unwrap()
    }

    #[test]
    fn test_phones_keep_document_order() {
        let value = to_value(
            r#"<Hotels><Hotel><Name>Sun</Name><Phone>555-1111</Phone><Phone>555-2222</Phone></Hotel></Hotels>"#,
        );
        assert_eq!(
            value["Hotels"]["Hotel"][0]["Phone"],
            json!(["555-1111", "555-2222"])
        );
    }

    #[test]
    fn test_missing_phones_become_empty_array() {
        let value = to_value("<Hotels><Hotel><Name>Sun</Name></Hotel></Hotels>");
        assert_eq!(value["Hotels"]["Hotel"][0]["Phone"], json!([]));
    }

    #[test]
    fn test_nearest_airport_omitted_when_empty_or_absent() {
        let value = to_value(
            r#"<Hotels>
                 <Hotel><Address Number="1" Street="Main" City="Tempe" State="AZ" Zip="85281" NearestAirport=""/></Hotel>
                 <Hotel><Address Number="2" Street="Mill" City="Tempe" State="AZ" Zip="85281"/></Hotel>
                 <Hotel><Address Number="3" Street="Ash" City="Tempe" State="AZ" Zip="85281" NearestAirport="PHX"/></Hotel>
               </Hotels>"#,
        );
        let hotels = &value["Hotels"]["Hotel"];

        assert!(hotels[0]["Address"].get("_NearestAirport").is_none());
        assert!(hotels[1]["Address"].get("_NearestAirport").is_none());
        assert_eq!(hotels[2]["Address"]["_NearestAirport"], json!("PHX"));
        assert!(hotels[2]["Address"].get("NearestAirport").is_none());
    }

    #[test]
    fn test_rating_only_when_present_and_non_empty() {
        let value = to_value(
            r#"<Hotels><Hotel><Name>A</Name></Hotel><Hotel Rating=""><Name>B</Name></Hotel><Hotel Rating="5"><Name>C</Name></Hotel></Hotels>"#,
        );
        let hotels = &value["Hotels"]["Hotel"];

        assert!(hotels[0].get("_Rating").is_none());
        assert!(hotels[1].get("_Rating").is_none());
        assert_eq!(hotels[2]["_Rating"], json!("5"));
        assert!(hotels[2].get("Rating").is_none());
    }

    #[test]
    fn test_missing_name_and_address_attributes_are_null() {
        let value = to_value(r#"<Hotels><Hotel><Address City="Tempe"/></Hotel></Hotels>"#);
        let hotel = &value["Hotels"]["Hotel"][0];

        assert_eq!(hotel["Name"], Value::Null);
        assert!(hotel.as_object().unwrap().contains_key("Name"));
        assert_eq!(
            hotel["Address"],
            json!({"Number": null, "Street": null, "City": "Tempe", "State": null, "Zip": null})
        );
    }

    #[test]
    fn test_address_omitted_without_element() {
        let value = to_value("<Hotels><Hotel><Name>Sun</Name></Hotel></Hotels>");
        assert!(value["Hotels"]["Hotel"][0].get("Address").is_none());
    }

    #[test]
    fn test_empty_document() {
        let value = to_value("<Hotels/>");
        assert_eq!(value, json!({"Hotels": {"Hotel": []}}));
    }

    #[test]
    fn test_only_direct_unqualified_hotel_children() {
        let value = to_value(
            r#"<Hotels xmlns:x="urn:other"><Motel/><Group><Hotel/></Group><x:Hotel/><Hotel><Name>Only</Name></Hotel></Hotels>"#,
        );
        let hotels = value["Hotels"]["Hotel"].as_array().unwrap();

        assert_eq!(hotels.len(), 1);
        assert_eq!(hotels[0]["Name"], json!("Only"));
    }

    #[test]
    fn test_key_order() {
        let json = convert_str(
            r#"<Hotels><Hotel Rating="4"><Name>Sun</Name><Phone>1</Phone><Address Number="1" Street="S" City="C" State="AZ" Zip="1" NearestAirport="PHX"/></Hotel></Hotels>"#,
        )
        .unwrap();

        let order = [
            "Name",
            "Phone",
            "Address",
            "Number",
            "Street",
            "City",
            "State",
            "Zip",
            "_NearestAirport",
            "_Rating",
        ];
        let positions: Vec<usize> = order
            .iter()
            .map(|key| json.find(&format!("\"{}\":", key)).unwrap())
            .collect();
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_malformed_input_propagates() {
        let err = convert_str("<Hotels><Hotel></Hotels>").unwrap_err();
        assert!(matches!(err, Error::MalformedXml { .. }));
    }
}
