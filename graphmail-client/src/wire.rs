//! JSON wire format.
//!
//! Property names map to camelCase keys (`IsRead` becomes `isRead`).
//! Recipients nest their address under `emailAddress`, bodies carry
//! `contentType` and `content`, and date-times travel as RFC 3339 strings
//! or, for zoned properties, as `{ dateTime, timeZone }` in UTC.

use crate::error::{ClientError, ClientResult};
use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use graphmail_model::{
    BodyType, ItemBody, ObjectSchema, Persisted, PropertyBag, PropertyDefinition, PropertyValue,
    Recipient, ValueKind,
};
use graphmail_types::{EntityKind, ItemId, Mailbox};
use serde_json::{Map, Value, json};
use std::sync::Arc;

const ZONED_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const ZONED_PARSE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// JSON key for a property name.
#[must_use]
pub fn json_key(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Encodes one value for `property`.
#[must_use]
pub fn encode(property: &PropertyDefinition, value: &PropertyValue) -> Value {
    match value {
        PropertyValue::Null => Value::Null,
        PropertyValue::String(s) => Value::String(s.clone()),
        PropertyValue::Int(n) => json!(n),
        PropertyValue::Float(n) => json!(n),
        PropertyValue::Boolean(b) => Value::Bool(*b),
        PropertyValue::DateTime(dt) => match property.value_kind() {
            ValueKind::DateTimeTimeZone => json!({
                "dateTime": dt.format(ZONED_FORMAT).to_string(),
                "timeZone": "UTC",
            }),
            _ => Value::String(dt.to_rfc3339_opts(SecondsFormat::Secs, true)),
        },
        PropertyValue::Recipient(r) => encode_recipient(r),
        PropertyValue::Recipients(rs) => Value::Array(rs.iter().map(encode_recipient).collect()),
        PropertyValue::Body(body) => json!({
            "contentType": body.content_type,
            "content": body.content,
        }),
        PropertyValue::Strings(items) => json!(items),
    }
}

fn encode_recipient(recipient: &Recipient) -> Value {
    let mut address = Map::new();
    if let Some(name) = &recipient.name {
        address.insert("name".to_string(), Value::String(name.clone()));
    }
    address.insert(
        "address".to_string(),
        Value::String(recipient.address.clone()),
    );
    json!({ "emailAddress": address })
}

/// Decodes the JSON for `property`. `null` decodes to [`PropertyValue::Null`].
pub fn decode(property: &PropertyDefinition, value: &Value) -> ClientResult<PropertyValue> {
    if value.is_null() {
        return Ok(PropertyValue::Null);
    }
    let name = property.name();
    let mismatch = || {
        ClientError::decode(
            name,
            format!("expected {}, got {value}", property.value_kind()),
        )
    };
    match property.value_kind() {
        ValueKind::String => value.as_str().map(PropertyValue::from).ok_or_else(mismatch),
        ValueKind::Number => match value.as_i64() {
            Some(n) => Ok(PropertyValue::Int(n)),
            None => value.as_f64().map(PropertyValue::Float).ok_or_else(mismatch),
        },
        ValueKind::Boolean => value.as_bool().map(PropertyValue::Boolean).ok_or_else(mismatch),
        ValueKind::DateTime => {
            let text = value.as_str().ok_or_else(mismatch)?;
            parse_date_time(name, text).map(PropertyValue::DateTime)
        }
        ValueKind::DateTimeTimeZone => {
            let text = value
                .get("dateTime")
                .and_then(Value::as_str)
                .ok_or_else(mismatch)?;
            match value.get("timeZone").and_then(Value::as_str) {
                None => {}
                Some(zone) if zone.eq_ignore_ascii_case("utc") => {}
                Some(zone) => {
                    return Err(ClientError::decode(
                        name,
                        format!("expected a UTC time, got zone {zone}"),
                    ));
                }
            }
            parse_date_time(name, text).map(PropertyValue::DateTime)
        }
        ValueKind::Recipient => decode_recipient(value)
            .map(PropertyValue::Recipient)
            .ok_or_else(mismatch),
        ValueKind::RecipientCollection => value
            .as_array()
            .ok_or_else(mismatch)?
            .iter()
            .map(|item| decode_recipient(item).ok_or_else(mismatch))
            .collect::<ClientResult<Vec<_>>>()
            .map(PropertyValue::Recipients),
        ValueKind::Body => {
            if !value.is_object() {
                return Err(mismatch());
            }
            let html = value
                .get("contentType")
                .and_then(Value::as_str)
                .is_some_and(|t| t.eq_ignore_ascii_case("html"));
            Ok(PropertyValue::Body(ItemBody {
                content_type: if html { BodyType::Html } else { BodyType::Text },
                content: value
                    .get("content")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
            }))
        }
        ValueKind::StringCollection => value
            .as_array()
            .ok_or_else(mismatch)?
            .iter()
            .map(|item| item.as_str().map(str::to_string).ok_or_else(mismatch))
            .collect::<ClientResult<Vec<_>>>()
            .map(PropertyValue::Strings),
    }
}

fn decode_recipient(value: &Value) -> Option<Recipient> {
    let email = value.get("emailAddress")?;
    let address = email.get("address").and_then(Value::as_str).unwrap_or_default();
    let name = email
        .get("name")
        .and_then(Value::as_str)
        .filter(|n| !n.is_empty())
        .map(str::to_string);
    Some(Recipient {
        name,
        address: address.to_string(),
    })
}

/// Accepts RFC 3339, or a zone-less timestamp taken as UTC.
fn parse_date_time(property: &str, text: &str) -> ClientResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| NaiveDateTime::parse_from_str(text, ZONED_PARSE_FORMAT).map(|n| n.and_utc()))
        .map_err(|e| ClientError::decode(property, format!("bad date-time {text:?}: {e}")))
}

fn object<'a>(
    entries: impl Iterator<Item = (&'a PropertyDefinition, &'a PropertyValue)>,
) -> Value {
    Value::Object(
        entries
            .map(|(property, value)| (json_key(property.name()), encode(property, value)))
            .collect(),
    )
}

/// Request body for an update: changed properties only, in change order.
#[must_use]
pub fn patch_body(bag: &PropertyBag) -> Value {
    object(bag.changes())
}

/// Request body for a create: every populated property.
#[must_use]
pub fn create_body(bag: &PropertyBag) -> Value {
    object(bag.iter())
}

/// Builds a loaded bag from a server object. Keys the schema does not
/// know, including `@odata.*` annotations, are ignored.
pub fn bag_from_json(schema: Arc<ObjectSchema>, json: &Value) -> ClientResult<PropertyBag> {
    let fields = json.as_object().ok_or_else(|| {
        ClientError::decode(schema.entity_kind().to_string(), "expected a JSON object")
    })?;
    let mut values = Vec::new();
    for property in schema.properties() {
        if let Some(raw) = fields.get(&json_key(property.name())) {
            values.push((property.name().to_string(), decode(property, raw)?));
        }
    }
    Ok(PropertyBag::loaded(schema, values)?)
}

/// Reads the server id and properties of one entity.
pub fn persisted_from_json(
    kind: EntityKind,
    mailbox: &Mailbox,
    schema: Arc<ObjectSchema>,
    json: &Value,
) -> ClientResult<Persisted> {
    let id = json
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| ClientError::decode("id", "missing from response"))?;
    let id = ItemId::new(kind, id, mailbox.clone())?;
    let bag = bag_from_json(schema, json)?;
    Ok(Persisted { id, bag })
}
