//! Partial updates for fulfillment addresses.

use super::{AddressFields, AddressMetadata};

/// Change requested for a single nullable column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldUpdate<T> {
    /// Leave the stored value untouched.
    #[default]
    Keep,
    /// Replace the stored value.
    Set(T),
    /// Null the column.
    Clear,
}

impl<T> FieldUpdate<T> {
    /// Build an update from an optional value: `Some` sets, `None` clears.
    pub fn from_option(value: Option<T>) -> Self {
        match value {
            Some(inner) => Self::Set(inner),
            None => Self::Clear,
        }
    }

    fn is_keep(&self) -> bool {
        matches!(self, Self::Keep)
    }

    fn apply_to(self, target: &mut Option<T>) {
        match self {
            Self::Keep => {}
            Self::Set(value) => *target = Some(value),
            Self::Clear => *target = None,
        }
    }
}

/// Partial update applied through [`super::FulfillmentAddress::apply`].
///
/// Every field defaults to [`FieldUpdate::Keep`], so callers name only the
/// columns they change:
///
/// ```
/// use fulfillment::domain::{AddressPatch, FieldUpdate};
///
/// let patch = AddressPatch {
///     city: FieldUpdate::Set("Leeds".to_owned()),
///     address_2: FieldUpdate::Clear,
///     ..AddressPatch::default()
/// };
/// assert!(!patch.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddressPatch {
    pub fulfillment_id: FieldUpdate<String>,
    pub company: FieldUpdate<String>,
    pub first_name: FieldUpdate<String>,
    pub last_name: FieldUpdate<String>,
    pub address_1: FieldUpdate<String>,
    pub address_2: FieldUpdate<String>,
    pub city: FieldUpdate<String>,
    pub country_code: FieldUpdate<String>,
    pub province: FieldUpdate<String>,
    pub postal_code: FieldUpdate<String>,
    pub phone: FieldUpdate<String>,
    pub metadata: FieldUpdate<AddressMetadata>,
}

impl AddressPatch {
    /// Report whether the patch leaves every column untouched.
    pub fn is_empty(&self) -> bool {
        self.fulfillment_id.is_keep()
            && self.company.is_keep()
            && self.first_name.is_keep()
            && self.last_name.is_keep()
            && self.address_1.is_keep()
            && self.address_2.is_keep()
            && self.city.is_keep()
            && self.country_code.is_keep()
            && self.province.is_keep()
            && self.postal_code.is_keep()
            && self.phone.is_keep()
            && self.metadata.is_keep()
    }

    pub(super) fn apply_to(self, fields: &mut AddressFields) {
        let Self {
            fulfillment_id,
            company,
            first_name,
            last_name,
            address_1,
            address_2,
            city,
            country_code,
            province,
            postal_code,
            phone,
            metadata,
        } = self;

        fulfillment_id.apply_to(&mut fields.fulfillment_id);
        company.apply_to(&mut fields.company);
        first_name.apply_to(&mut fields.first_name);
        last_name.apply_to(&mut fields.last_name);
        address_1.apply_to(&mut fields.address_1);
        address_2.apply_to(&mut fields.address_2);
        city.apply_to(&mut fields.city);
        country_code.apply_to(&mut fields.country_code);
        province.apply_to(&mut fields.province);
        postal_code.apply_to(&mut fields.postal_code);
        phone.apply_to(&mut fields.phone);
        metadata.apply_to(&mut fields.metadata);
    }
}
