//! Directory entry and attribute model
//!
//! Data holders for already-parsed directory data: an entry is a
//! distinguished name plus a set of attributes; an attribute is a name plus
//! one value or an ordered list of values, fixed at creation. Attribute
//! names compare case-insensitively.

use std::collections::HashMap;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use ldap3::SearchEntry;
use serde::{Deserialize, Serialize};

/// A single attribute value, text or binary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// UTF-8 text value.
    Text(String),
    /// Raw binary value.
    Binary(Vec<u8>),
}

impl AttributeValue {
    /// Get as text if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(s) => Some(s),
            AttributeValue::Binary(_) => None,
        }
    }

    /// Get the raw bytes of the value (UTF-8 bytes for text).
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            AttributeValue::Text(s) => s.as_bytes(),
            AttributeValue::Binary(b) => b,
        }
    }

    /// Whether this is a binary value.
    pub fn is_binary(&self) -> bool {
        matches!(self, AttributeValue::Binary(_))
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        AttributeValue::Text(s.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        AttributeValue::Text(s)
    }
}

impl From<Vec<u8>> for AttributeValue {
    fn from(bytes: Vec<u8>) -> Self {
        AttributeValue::Binary(bytes)
    }
}

impl From<&[u8]> for AttributeValue {
    fn from(bytes: &[u8]) -> Self {
        AttributeValue::Binary(bytes.to_vec())
    }
}

/// Value payload of an attribute. The single/multi distinction is fixed
/// when the attribute is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Values {
    Single(AttributeValue),
    Multi(Vec<AttributeValue>),
}

/// A named attribute of a directory entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    name: String,
    values: Values,
}

impl Attribute {
    /// Create a single-valued attribute.
    pub fn single(name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        Self {
            name: name.into(),
            values: Values::Single(value.into()),
        }
    }

    /// Create a multi-valued attribute with the given values, in order.
    pub fn multi<V>(name: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self
    where
        V: Into<AttributeValue>,
    {
        Self {
            name: name.into(),
            values: Values::Multi(values.into_iter().map(Into::into).collect()),
        }
    }

    /// The attribute name, with the case it was created with.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the attribute was created multi-valued.
    pub fn is_multi_valued(&self) -> bool {
        matches!(self.values, Values::Multi(_))
    }

    /// The first value, if any.
    pub fn value(&self) -> Option<&AttributeValue> {
        self.values().first()
    }

    /// All values, in order.
    pub fn values(&self) -> &[AttributeValue] {
        match &self.values {
            Values::Single(v) => std::slice::from_ref(v),
            Values::Multi(vs) => vs,
        }
    }

    /// Number of values.
    pub fn value_count(&self) -> usize {
        self.values().len()
    }

    /// Render the attribute as LDIF lines, one newline-terminated line per
    /// value: `name: value` for text, `name:: <base64>` for binary.
    pub fn to_ldif(&self) -> String {
        let mut out = String::new();
        for value in self.values() {
            out.push_str(&self.name);
            match value {
                AttributeValue::Text(s) => {
                    out.push_str(": ");
                    out.push_str(s);
                }
                AttributeValue::Binary(b) => {
                    out.push_str(":: ");
                    out.push_str(&BASE64.encode(b));
                }
            }
            out.push('\n');
        }
        out
    }
}

/// A set of attributes keyed by case-folded name.
///
/// Holds at most one attribute per case-folded name; adding an attribute
/// with an already-present name replaces the previous one. Iteration order
/// is not guaranteed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttributeSet {
    attributes: HashMap<String, Attribute>,
}

impl AttributeSet {
    /// Create an empty attribute set.
    pub fn new() -> Self {
        Self {
            attributes: HashMap::new(),
        }
    }

    /// Add an attribute, replacing any attribute with the same case-folded
    /// name.
    pub fn add(&mut self, attribute: Attribute) {
        self.attributes
            .insert(attribute.name().to_lowercase(), attribute);
    }

    /// Get an attribute by name, case-insensitively.
    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(&name.to_lowercase())
    }

    /// Remove an attribute by name, case-insensitively.
    pub fn remove(&mut self, name: &str) -> Option<Attribute> {
        self.attributes.remove(&name.to_lowercase())
    }

    /// Remove all attributes.
    pub fn clear(&mut self) {
        self.attributes.clear();
    }

    /// Number of attributes in the set.
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Iterate over the attributes.
    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.values()
    }
}

impl FromIterator<Attribute> for AttributeSet {
    fn from_iter<T: IntoIterator<Item = Attribute>>(iter: T) -> Self {
        let mut set = Self::new();
        for attribute in iter {
            set.add(attribute);
        }
        set
    }
}

/// A directory entry: a distinguished name plus its attributes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Entry {
    dn: String,
    attributes: AttributeSet,
}

impl Entry {
    /// Create an entry with the given DN and no attributes.
    pub fn new(dn: impl Into<String>) -> Self {
        Self {
            dn: dn.into(),
            attributes: AttributeSet::new(),
        }
    }

    /// Add an attribute, builder style.
    #[must_use]
    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.add(attribute);
        self
    }

    /// The distinguished name.
    pub fn dn(&self) -> &str {
        &self.dn
    }

    /// The attribute set.
    pub fn attributes(&self) -> &AttributeSet {
        &self.attributes
    }

    /// Mutable access to the attribute set.
    pub fn attributes_mut(&mut self) -> &mut AttributeSet {
        &mut self.attributes
    }

    /// Add an attribute, replacing any attribute with the same case-folded
    /// name.
    pub fn add_attribute(&mut self, attribute: Attribute) {
        self.attributes.add(attribute);
    }

    /// Get an attribute by name, case-insensitively.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    /// Render the entry as LDIF: a `dn:` line followed by every attribute,
    /// ordered by case-folded name.
    pub fn to_ldif(&self) -> String {
        let mut out = format!("dn: {}\n", self.dn);
        let mut names: Vec<&String> = self.attributes.attributes.keys().collect();
        names.sort();
        for name in names {
            out.push_str(&self.attributes.attributes[name].to_ldif());
        }
        out
    }
}

impl From<SearchEntry> for Entry {
    fn from(entry: SearchEntry) -> Self {
        let mut result = Entry::new(entry.dn);

        for (name, values) in entry.attrs {
            result.add_attribute(from_values(
                name,
                values.into_iter().map(AttributeValue::Text).collect(),
            ));
        }

        // The client splits values that are not valid UTF-8 into a separate
        // map; an attribute may appear in both.
        for (name, values) in entry.bin_attrs {
            let mut combined: Vec<AttributeValue> = result
                .attributes
                .remove(&name)
                .map(|a| a.values().to_vec())
                .unwrap_or_default();
            combined.extend(values.into_iter().map(AttributeValue::Binary));
            result.add_attribute(from_values(name, combined));
        }

        result
    }
}

fn from_values(name: String, mut values: Vec<AttributeValue>) -> Attribute {
    if values.len() == 1 {
        Attribute::single(name, values.remove(0))
    } else {
        Attribute::multi(name, values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive_lookup() {
        let mut set = AttributeSet::new();
        set.add(Attribute::single("mail", "user@example.com"));

        for name in ["mail", "MAIL", "Mail", "mAiL"] {
            let attr = set.get(name).expect("attribute should be found");
            assert_eq!(attr.value().unwrap().as_text(), Some("user@example.com"));
        }

        // The attribute retains the case it was created with.
        assert_eq!(set.get("MAIL").unwrap().name(), "mail");
    }

    #[test]
    fn test_last_write_wins() {
        let mut set = AttributeSet::new();
        set.add(Attribute::single("telephoneNumber", "+1 555 0100"));
        set.add(Attribute::single("TELEPHONENUMBER", "+1 555 0199"));

        assert_eq!(set.len(), 1);
        let attr = set.get("telephonenumber").unwrap();
        assert_eq!(attr.value().unwrap().as_text(), Some("+1 555 0199"));
    }

    #[test]
    fn test_clear_and_count() {
        let mut set = AttributeSet::new();
        set.add(Attribute::single("cn", "Admin"));
        set.add(Attribute::single("sn", "Istrator"));
        assert_eq!(set.len(), 2);

        set.clear();
        assert!(set.is_empty());
        assert!(set.get("cn").is_none());
    }

    #[test]
    fn test_single_valued_attribute() {
        let attr = Attribute::single("cn", "Admin");
        assert!(!attr.is_multi_valued());
        assert_eq!(attr.value_count(), 1);
        assert_eq!(attr.values().len(), 1);
        assert_eq!(attr.value().unwrap().as_text(), Some("Admin"));
    }

    #[test]
    fn test_multi_valued_attribute_preserves_order() {
        let attr = Attribute::multi("mail", ["a@example.com", "b@example.com"]);
        assert!(attr.is_multi_valued());
        let values: Vec<&str> = attr.values().iter().filter_map(|v| v.as_text()).collect();
        assert_eq!(values, vec!["a@example.com", "b@example.com"]);
    }

    #[test]
    fn test_ldif_text_value() {
        let attr = Attribute::single("cn", "Admin");
        assert_eq!(attr.to_ldif(), "cn: Admin\n");
    }

    #[test]
    fn test_ldif_binary_value() {
        let attr = Attribute::single("jpegPhoto", vec![0xDEu8, 0xAD, 0xBE, 0xEF]);
        assert_eq!(attr.to_ldif(), "jpegPhoto:: 3q2+7w==\n");
    }

    #[test]
    fn test_ldif_one_line_per_value() {
        let attr = Attribute::multi("mail", ["a@example.com", "b@example.com"]);
        assert_eq!(attr.to_ldif(), "mail: a@example.com\nmail: b@example.com\n");
    }

    #[test]
    fn test_entry_ldif() {
        let entry = Entry::new("cn=Admin,dc=example,dc=com")
            .with_attribute(Attribute::single("cn", "Admin"))
            .with_attribute(Attribute::single("sn", "Istrator"));

        assert_eq!(
            entry.to_ldif(),
            "dn: cn=Admin,dc=example,dc=com\ncn: Admin\nsn: Istrator\n"
        );
    }

    #[test]
    fn test_entry_from_search_entry() {
        let mut attrs = HashMap::new();
        attrs.insert("cn".to_string(), vec!["Admin".to_string()]);
        attrs.insert(
            "mail".to_string(),
            vec!["a@example.com".to_string(), "b@example.com".to_string()],
        );
        let mut bin_attrs = HashMap::new();
        bin_attrs.insert("objectGUID".to_string(), vec![vec![1u8, 2, 3]]);

        let entry: Entry = SearchEntry {
            dn: "cn=Admin,dc=example,dc=com".to_string(),
            attrs,
            bin_attrs,
        }
        .into();

        assert_eq!(entry.dn(), "cn=Admin,dc=example,dc=com");
        assert!(!entry.attribute("cn").unwrap().is_multi_valued());
        assert!(entry.attribute("mail").unwrap().is_multi_valued());
        assert!(entry.attribute("objectguid").unwrap().value().unwrap().is_binary());
    }

    #[test]
    fn test_entry_from_search_entry_merges_mixed_values() {
        let mut attrs = HashMap::new();
        attrs.insert("userCertificate".to_string(), vec!["text".to_string()]);
        let mut bin_attrs = HashMap::new();
        bin_attrs.insert("userCertificate".to_string(), vec![vec![0u8, 1]]);

        let entry: Entry = SearchEntry {
            dn: "cn=X".to_string(),
            attrs,
            bin_attrs,
        }
        .into();

        let attr = entry.attribute("usercertificate").unwrap();
        assert!(attr.is_multi_valued());
        assert_eq!(attr.value_count(), 2);
    }

    #[test]
    fn test_attribute_serde_round_trip() {
        let attr = Attribute::multi("mail", ["a@example.com", "b@example.com"]);
        let json = serde_json::to_string(&attr).unwrap();
        let parsed: Attribute = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, attr);
    }
}
