//! Raw provider profiles and the normalized identity record

use serde_json::Value;

use crate::core::BrokerError;
use crate::core::timezone::normalize_timezone;

/// Provider user-info payload, opaque at the fetch layer.
///
/// Shape is provider-specific; the typed accessors below cover the
/// variations the mappers actually meet (string or numeric ids, boolean
/// flags encoded as strings, nested objects).
#[derive(Debug, Clone)]
pub struct RawProfile(Value);

impl RawProfile {
	/// Wraps a decoded JSON payload.
	pub fn new(value: Value) -> Self {
		Self(value)
	}

	/// The underlying JSON value.
	pub fn value(&self) -> &Value {
		&self.0
	}

	/// First non-empty string among the given top-level keys. Numeric
	/// values are stringified, so integer user ids (GitHub) work too.
	pub fn string(&self, keys: &[&str]) -> Option<String> {
		for key in keys {
			match self.0.get(key) {
				Some(Value::String(s)) if !s.trim().is_empty() => return Some(s.trim().to_string()),
				Some(Value::Number(n)) => return Some(n.to_string()),
				_ => {}
			}
		}
		None
	}

	/// Nested string lookup by path, e.g. `&["name", "givenName"]`.
	pub fn string_path(&self, path: &[&str]) -> Option<String> {
		let mut current = &self.0;
		for key in path {
			current = current.get(key)?;
		}
		match current {
			Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
			Value::Number(n) => Some(n.to_string()),
			_ => None,
		}
	}

	/// Boolean field, tolerating `"true"`/`"false"`/`"1"`/`"0"` strings.
	pub fn boolean(&self, key: &str) -> Option<bool> {
		match self.0.get(key)? {
			Value::Bool(b) => Some(*b),
			Value::String(s) => match s.as_str() {
				"true" | "1" => Some(true),
				"false" | "0" => Some(false),
				_ => None,
			},
			Value::Number(n) => n.as_i64().map(|v| v != 0),
			_ => None,
		}
	}
}

/// Canonical representation of a social identity, one per login attempt.
///
/// Constructed only through [`NormalizedIdentity::new`], which trims and
/// validates once; the fields are immutable afterwards. The external id
/// is guaranteed non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedIdentity {
	external_id: String,
	display_name: String,
	email: String,
	verified_by_provider: bool,
	timezone: String,
	avatar_url: Option<String>,
}

impl NormalizedIdentity {
	/// Validating factory.
	///
	/// Fails with [`BrokerError::Mapping`] when `external_id` is empty
	/// after trimming; a record without a usable id must never exist.
	/// Email and display name may be empty (many providers do not
	/// guarantee either). The timezone is normalized to an IANA name,
	/// falling back to `UTC`.
	pub fn new(
		external_id: impl Into<String>,
		display_name: impl Into<String>,
		email: impl Into<String>,
		verified_by_provider: bool,
		timezone: Option<&str>,
		avatar_url: Option<String>,
	) -> Result<Self, BrokerError> {
		let external_id = external_id.into().trim().to_string();
		if external_id.is_empty() {
			return Err(BrokerError::Mapping(
				"provider profile carried no usable user id".to_string(),
			));
		}

		Ok(Self {
			external_id,
			display_name: display_name.into().trim().to_string(),
			email: email.into().trim().to_string(),
			verified_by_provider,
			timezone: normalize_timezone(timezone.unwrap_or("")),
			avatar_url: avatar_url.filter(|url| !url.trim().is_empty()),
		})
	}

	/// Provider-scoped unique id; never empty.
	pub fn external_id(&self) -> &str {
		&self.external_id
	}

	/// Human-readable name; may be empty.
	pub fn display_name(&self) -> &str {
		&self.display_name
	}

	/// Email address; may be empty.
	pub fn email(&self) -> &str {
		&self.email
	}

	/// Whether the provider vouches for the email.
	pub fn verified_by_provider(&self) -> bool {
		self.verified_by_provider
	}

	/// Normalized IANA timezone name; `UTC` when unknown.
	pub fn timezone(&self) -> &str {
		&self.timezone
	}

	/// Avatar URL, if the provider supplied one.
	pub fn avatar_url(&self) -> Option<&str> {
		self.avatar_url.as_deref()
	}
}
